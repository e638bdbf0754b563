//! HTTP client for the WAF management API.

use reqwest::Client;
use ruiqi_shared::{
    server_error_from_body, AlertChannel, ApiEnvelope, ApiError, AttackEventAggregate,
    AttackEventFilter, Certificate, IpGroup, MicroRule, Page, Site,
};
use serde::de::DeserializeOwned;

use crate::config::ConsoleConfig;

/// A paginated list endpoint.
///
/// Endpoints disagree on the name of the page-size parameter, so it travels
/// with the path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListResource {
    pub path: &'static str,
    pub size_param: &'static str,
}

impl ListResource {
    pub const fn new(path: &'static str) -> Self {
        Self {
            path,
            size_param: "pageSize",
        }
    }

    pub const fn with_size_param(mut self, size_param: &'static str) -> Self {
        self.size_param = size_param;
        self
    }

    /// `page` and page-size query parameters for one request.
    pub fn page_query(&self, page: u32, page_size: u32) -> Vec<(String, String)> {
        vec![
            ("page".to_string(), page.to_string()),
            (self.size_param.to_string(), page_size.to_string()),
        ]
    }
}

pub const SITES: ListResource = ListResource::new("/site").with_size_param("size");
pub const CERTIFICATES: ListResource = ListResource::new("/certificate").with_size_param("size");
pub const IP_GROUPS: ListResource = ListResource::new("/ip-groups").with_size_param("size");
pub const ALERT_CHANNELS: ListResource = ListResource::new("/alert/channel").with_size_param("size");
pub const MICRO_RULES: ListResource = ListResource::new("/micro-rules").with_size_param("size");
pub const ATTACK_EVENTS: ListResource = ListResource::new("/log/event");

/// HTTP client for the console API.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    /// Create a new API client
    pub fn new() -> Self {
        Self {
            client: Client::new(),
            base_url: String::new(),
            token: None,
        }
    }

    /// Build a client from configuration, applying the request timeout.
    ///
    /// Browsers own request timeouts, so the timeout only applies to native builds.
    pub fn from_config(config: &ConsoleConfig) -> Result<Self, ApiError> {
        let builder = Client::builder();
        #[cfg(not(target_arch = "wasm32"))]
        let builder = builder.timeout(config.api_timeout);
        let client = builder
            .build()
            .map_err(|e| ApiError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.api_base_url.clone(),
            token: config.api_token.clone(),
        })
    }

    /// Set the base URL for API requests
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Send `Authorization: Bearer <token>` with every request.
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }
        let joined = if self.base_url.is_empty() {
            if path.starts_with('/') {
                path.to_string()
            } else {
                format!("/{path}")
            }
        } else {
            let base = self.base_url.trim_end_matches('/');
            let path = path.trim_start_matches('/');
            format!("{base}/{path}")
        };
        with_origin(joined)
    }

    /// Resolve `path` and append `query`, percent-encoded.
    pub fn url_with_query(&self, path: &str, query: &[(String, String)]) -> String {
        let url = self.url(path);
        if query.is_empty() {
            return url;
        }
        let encoded: Vec<String> = query
            .iter()
            .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
            .collect();
        let separator = if url.contains('?') { '&' } else { '?' };
        format!("{url}{separator}{}", encoded.join("&"))
    }

    /// Make a GET request and unwrap the response envelope
    pub async fn get_json<TRes: DeserializeOwned>(&self, path: &str) -> Result<TRes, ApiError> {
        self.get_json_with_query(path, &[]).await
    }

    /// Make a GET request with query parameters and unwrap the response envelope
    pub async fn get_json_with_query<TRes: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(String, String)],
    ) -> Result<TRes, ApiError> {
        let url = self.url_with_query(path, query);
        let request_id = uuid::Uuid::new_v4().to_string();

        let mut rb = self.client.get(&url).header("X-Request-ID", &request_id);
        if let Some(token) = &self.token {
            rb = rb.bearer_auth(token);
        }

        crate::log_debug!("GET {} (request {})", url, request_id);

        let resp = rb.send().await.map_err(|e| {
            if e.is_timeout() {
                ApiError::Network(format!("request timed out: {e}"))
            } else {
                ApiError::Network(e.to_string())
            }
        })?;

        let status = resp.status().as_u16();
        let is_success = resp.status().is_success();

        let text = resp
            .text()
            .await
            .map_err(|e| ApiError::Network(format!("failed to read body: {e}")))?;

        if !is_success {
            return Err(server_error_from_body(status, &text));
        }

        let envelope: ApiEnvelope<TRes> =
            serde_json::from_str(&text).map_err(|e| ApiError::Deserialize(e.to_string()))?;

        envelope
            .into_result(status)?
            .ok_or_else(|| ApiError::Deserialize(format!("response to {path} carried no data")))
    }

    /// Fetch one page of a list endpoint
    pub async fn list_page<T: DeserializeOwned>(
        &self,
        resource: ListResource,
        page: u32,
        page_size: u32,
        filters: &[(String, String)],
    ) -> Result<Page<T>, ApiError> {
        let mut query = filters.to_vec();
        query.extend(resource.page_query(page, page_size));
        self.get_json_with_query(resource.path, &query).await
    }

    // --- Typed list endpoints ---

    pub async fn list_sites(&self, page: u32, size: u32) -> Result<Page<Site>, ApiError> {
        self.list_page(SITES, page, size, &[]).await
    }

    pub async fn list_certificates(
        &self,
        page: u32,
        size: u32,
    ) -> Result<Page<Certificate>, ApiError> {
        self.list_page(CERTIFICATES, page, size, &[]).await
    }

    pub async fn list_ip_groups(&self, page: u32, size: u32) -> Result<Page<IpGroup>, ApiError> {
        self.list_page(IP_GROUPS, page, size, &[]).await
    }

    pub async fn list_alert_channels(
        &self,
        page: u32,
        size: u32,
    ) -> Result<Page<AlertChannel>, ApiError> {
        self.list_page(ALERT_CHANNELS, page, size, &[]).await
    }

    pub async fn list_micro_rules(
        &self,
        page: u32,
        size: u32,
    ) -> Result<Page<MicroRule>, ApiError> {
        self.list_page(MICRO_RULES, page, size, &[]).await
    }

    pub async fn list_attack_events(
        &self,
        filter: &AttackEventFilter,
        page: u32,
        page_size: u32,
    ) -> Result<Page<AttackEventAggregate>, ApiError> {
        self.list_page(ATTACK_EVENTS, page, page_size, &filter.query_pairs())
            .await
    }
}

impl Default for ApiClient {
    fn default() -> Self {
        Self::new()
    }
}

/// Browsers resolve origin-relative paths against the page; reqwest needs
/// them spelled out.
#[cfg(target_arch = "wasm32")]
fn with_origin(url: String) -> String {
    if !url.starts_with('/') {
        return url;
    }
    match web_sys::window().and_then(|w| w.location().origin().ok()) {
        Some(origin) => format!("{origin}{url}"),
        None => url,
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn with_origin(url: String) -> String {
    url
}
