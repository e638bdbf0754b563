//! Console data models for the WAF management API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// --- Sites ---

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum WafMode {
    Protection,
    Observation,
}

impl WafMode {
    pub fn label(&self) -> &'static str {
        match self {
            WafMode::Protection => "Protection",
            WafMode::Observation => "Observation",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UpstreamServer {
    pub host: String,
    pub port: u16,
    #[serde(rename = "isSSL", default)]
    pub is_ssl: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Backend {
    #[serde(default)]
    pub servers: Vec<UpstreamServer>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SiteCertificate {
    pub cert_name: String,
    pub expire_date: String,
    pub finger_print: String,
    pub issuer_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Site {
    pub id: String,
    pub name: String,
    pub domain: String,
    pub listen_port: u16,
    #[serde(rename = "enableHTTPS", default)]
    pub enable_https: bool,
    #[serde(default)]
    pub active_status: bool,
    #[serde(default)]
    pub waf_enabled: bool,
    pub waf_mode: WafMode,
    #[serde(default)]
    pub backend: Backend,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub certificate: Option<SiteCertificate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Site {
    /// `scheme://domain:port` as shown on the site card.
    pub fn public_url(&self) -> String {
        let scheme = if self.enable_https { "https" } else { "http" };
        match (self.enable_https, self.listen_port) {
            (true, 443) | (false, 80) => format!("{scheme}://{}", self.domain),
            _ => format!("{scheme}://{}:{}", self.domain, self.listen_port),
        }
    }
}

// --- Certificates ---

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Certificate {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub expire_date: DateTime<Utc>,
    #[serde(default)]
    pub finger_print: String,
    #[serde(default)]
    pub issuer_name: String,
    #[serde(default)]
    pub domains: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Certificate {
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expire_date <= now
    }
}

// --- IP groups ---

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct IpGroup {
    pub id: String,
    pub name: String,
    /// IP addresses or CIDR ranges.
    #[serde(default)]
    pub items: Vec<String>,
}

// --- Alerts ---

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AlertChannelType {
    Webhook,
    Feishu,
    Dingtalk,
    Wechat,
    Email,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AlertChannel {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub channel_type: AlertChannelType,
    /// Channel-specific settings; shape depends on `channel_type`.
    #[serde(default)]
    pub config: serde_json::Value,
    #[serde(default)]
    pub enabled: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// --- Micro rules ---

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RuleType {
    Whitelist,
    Blacklist,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RuleStatus {
    Enabled,
    Disabled,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum LogicalOperator {
    #[serde(rename = "AND")]
    And,
    #[serde(rename = "OR")]
    Or,
}

/// Match tree of a micro rule. Field names are snake_case on the wire.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum RuleCondition {
    Simple {
        /// `source_ip`, `url` or `path`.
        target: String,
        match_type: String,
        match_value: String,
    },
    Composite {
        operator: LogicalOperator,
        #[serde(default)]
        conditions: Vec<RuleCondition>,
    },
}

impl RuleCondition {
    /// One-line rendering, e.g. `(source_ip in_cidr 10.0.0.0/8 AND path prefix_keyword /admin)`.
    pub fn summary(&self) -> String {
        match self {
            RuleCondition::Simple {
                target,
                match_type,
                match_value,
            } => format!("{target} {match_type} {match_value}"),
            RuleCondition::Composite {
                operator,
                conditions,
            } => {
                let joiner = match operator {
                    LogicalOperator::And => " AND ",
                    LogicalOperator::Or => " OR ",
                };
                let parts: Vec<String> = conditions.iter().map(RuleCondition::summary).collect();
                format!("({})", parts.join(joiner))
            }
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MicroRule {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub rule_type: RuleType,
    pub status: RuleStatus,
    #[serde(default)]
    pub priority: i64,
    pub condition: RuleCondition,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

// --- Attack events ---

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct LocalizedName {
    #[serde(default)]
    pub name_zh: String,
    #[serde(default)]
    pub name_en: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct IpInfo {
    #[serde(default)]
    pub city: LocalizedName,
    #[serde(default)]
    pub country: LocalizedName,
}

impl IpInfo {
    /// "City, Country" in English, skipping unknown parts.
    pub fn location(&self) -> Option<String> {
        let parts: Vec<&str> = [&self.city.name_en, &self.country.name_en]
            .into_iter()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .collect();
        if parts.is_empty() {
            None
        } else {
            Some(parts.join(", "))
        }
    }
}

/// Attacks from one source IP against one site, aggregated.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AttackEventAggregate {
    pub src_ip: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub src_ip_info: Option<IpInfo>,
    pub count: u64,
    pub domain: String,
    pub dst_port: u16,
    #[serde(default)]
    pub duration_in_minutes: f64,
    pub first_attack_time: DateTime<Utc>,
    pub last_attack_time: DateTime<Utc>,
    #[serde(default)]
    pub is_ongoing: bool,
}

/// Filter parameters for the attack event list.
///
/// Serialized into the query key, so two equal filters share one collection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct AttackEventFilter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub src_ip: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dst_ip: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub src_port: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dst_port: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<Utc>>,
}

impl AttackEventFilter {
    /// Query parameters for the set fields, blank strings skipped.
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        let mut push = |name: &str, value: Option<String>| {
            if let Some(value) = value.filter(|v| !v.trim().is_empty()) {
                pairs.push((name.to_string(), value.trim().to_string()));
            }
        };
        push("srcIp", self.src_ip.clone());
        push("dstIp", self.dst_ip.clone());
        push("domain", self.domain.clone());
        push("srcPort", self.src_port.map(|p| p.to_string()));
        push("dstPort", self.dst_port.map(|p| p.to_string()));
        push("startTime", self.start_time.map(|t| t.to_rfc3339()));
        push("endTime", self.end_time.map(|t| t.to_rfc3339()));
        pairs
    }

    pub fn is_empty(&self) -> bool {
        self.query_pairs().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Page;

    #[test]
    fn site_list_page_decodes() {
        let body = r#"{
            "items": [{
                "id": "66a1",
                "name": "shop",
                "domain": "shop.example.com",
                "listenPort": 8443,
                "enableHTTPS": true,
                "activeStatus": true,
                "wafEnabled": true,
                "wafMode": "protection",
                "backend": {"servers": [{"host": "10.0.0.2", "port": 8080, "isSSL": false}]},
                "createdAt": "2025-03-01T08:00:00Z",
                "updatedAt": "2025-03-02T08:00:00Z"
            }],
            "total": 1
        }"#;
        let page: Page<Site> = serde_json::from_str(body).unwrap();
        let site = &page.items[0];
        assert_eq!(site.waf_mode, WafMode::Protection);
        assert_eq!(site.backend.servers[0].port, 8080);
        assert_eq!(site.public_url(), "https://shop.example.com:8443");
    }

    #[test]
    fn default_ports_are_omitted_from_url() {
        let mut site: Site = serde_json::from_value(serde_json::json!({
            "id": "1", "name": "a", "domain": "a.test", "listenPort": 80,
            "wafMode": "observation",
            "createdAt": "2025-03-01T08:00:00Z", "updatedAt": "2025-03-01T08:00:00Z"
        }))
        .unwrap();
        assert_eq!(site.public_url(), "http://a.test");
        site.enable_https = true;
        site.listen_port = 443;
        assert_eq!(site.public_url(), "https://a.test");
    }

    #[test]
    fn filter_skips_blank_fields() {
        let filter = AttackEventFilter {
            src_ip: Some("  ".to_string()),
            domain: Some(" example.com ".to_string()),
            dst_port: Some(443),
            ..Default::default()
        };
        assert_eq!(
            filter.query_pairs(),
            vec![
                ("domain".to_string(), "example.com".to_string()),
                ("dstPort".to_string(), "443".to_string()),
            ]
        );
        assert!(AttackEventFilter::default().is_empty());
    }

    #[test]
    fn micro_rule_with_nested_condition_decodes() {
        let rule: MicroRule = serde_json::from_value(serde_json::json!({
            "id": "r1",
            "name": "block admin from outside",
            "type": "blacklist",
            "status": "enabled",
            "priority": 100,
            "condition": {
                "type": "composite",
                "operator": "AND",
                "conditions": [
                    {"type": "simple", "target": "source_ip", "match_type": "not_in_cidr", "match_value": "10.0.0.0/8"},
                    {"type": "simple", "target": "path", "match_type": "prefix_keyword", "match_value": "/admin"}
                ]
            }
        }))
        .unwrap();
        assert_eq!(rule.rule_type, RuleType::Blacklist);
        assert_eq!(rule.status, RuleStatus::Enabled);
        assert!(rule.created_at.is_none());
        assert_eq!(
            rule.condition.summary(),
            "(source_ip not_in_cidr 10.0.0.0/8 AND path prefix_keyword /admin)"
        );
    }

    #[test]
    fn ip_info_location_skips_unknown_parts() {
        let info = IpInfo {
            city: LocalizedName::default(),
            country: LocalizedName {
                name_zh: "德国".to_string(),
                name_en: "Germany".to_string(),
            },
        };
        assert_eq!(info.location().as_deref(), Some("Germany"));
        assert_eq!(IpInfo::default().location(), None);
    }
}
