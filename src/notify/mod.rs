//! Desktop notification for the final creation status
//!
//! [`NotificationContent::for_status`] composes the title/subtitle/message
//! from the last observed record; a [`Notifier`] delivers it.

pub mod desktop;

pub use desktop::DesktopNotifier;

use std::path::PathBuf;

use crate::app::config::NotificationConfig;
use crate::package::CreationStatus;

/// Icon shipped next to the executable
pub const DEFAULT_ICON: &str = "assets/package.png";

/// Everything handed to the notification facility
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationContent {
    pub title: String,
    pub subtitle: Option<String>,
    pub message: String,
    pub icon: Option<PathBuf>,
    pub sound: bool,
    pub timeout_secs: u32,
}

impl NotificationContent {
    /// Compose the notification for a final status
    pub fn for_status(status: &CreationStatus, config: &NotificationConfig) -> Self {
        let message = match (&status.status, &status.subscriber_package_version_id) {
            (Some(label), Some(id)) => format!("{}! \nSubscriberPackageVersionId: {}", label, id),
            (Some(label), None) => label.clone(),
            (None, _) => match &status.err {
                Some(err) => format!("Failed: {}", err),
                None => "Timed out".to_string(),
            },
        };

        Self {
            title: config.title.clone(),
            subtitle: status.status.clone(),
            message,
            icon: config.icon_path.clone().or_else(default_icon_path),
            sound: config.sound,
            timeout_secs: config.timeout_secs,
        }
    }
}

/// `assets/package.png` resolved against the executable's directory
pub fn default_icon_path() -> Option<PathBuf> {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join(DEFAULT_ICON)))
}

/// Fire-and-forget notification sink
pub trait Notifier {
    fn notify(&self, content: &NotificationContent);
}

/// Used with `--no-notify`
#[derive(Debug, Default)]
pub struct NoopNotifier;

impl Notifier for NoopNotifier {
    fn notify(&self, content: &NotificationContent) {
        tracing::debug!("Notification suppressed: {}", content.title);
    }
}
