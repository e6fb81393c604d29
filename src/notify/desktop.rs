//! Native desktop notifications via notify-rust

use notify_rust::{Notification, Timeout};

use super::{NotificationContent, Notifier};

/// Sends notifications through the platform's notification center
#[derive(Debug, Default)]
pub struct DesktopNotifier;

impl DesktopNotifier {
    pub fn new() -> Self {
        Self
    }

    fn build(content: &NotificationContent) -> Notification {
        let mut notification = Notification::new();
        notification
            .summary(&content.title)
            .body(&content.message)
            .timeout(Timeout::Milliseconds(content.timeout_secs.saturating_mul(1000)));

        if let Some(subtitle) = &content.subtitle {
            notification.subtitle(subtitle);
        }
        if let Some(icon) = &content.icon {
            notification.icon(&icon.to_string_lossy());
        }
        if content.sound {
            notification.sound_name("default");
        }
        notification
    }
}

impl Notifier for DesktopNotifier {
    fn notify(&self, content: &NotificationContent) {
        if let Err(e) = Self::build(content).show() {
            tracing::warn!("Notification failed: {}", e);
        }
    }
}
