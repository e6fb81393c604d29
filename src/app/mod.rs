pub mod config;
pub mod monitor;

pub use config::{Config, NotificationConfig, PollConfig, QueryConfig};
pub use monitor::Monitor;
