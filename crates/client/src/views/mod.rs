//! View components for the console.

pub mod alert_channels;
pub mod attack_events;
pub mod certificates;
pub mod ip_groups;
pub mod layouts;
pub mod micro_rules;
pub mod sites;

pub use alert_channels::AlertChannels;
pub use attack_events::AttackEvents;
pub use certificates::Certificates;
pub use ip_groups::IpGroups;
pub use layouts::{ConsoleLayout, NotFound};
pub use micro_rules::MicroRules;
pub use sites::Sites;
