//! Desktop notification backend.

use notify_rust::{Notification as DesktopNotification, Timeout};
use seisen_core::{Notification, Notifier, NotifyError};

/// Posts notifications through the platform notification service.
pub struct DesktopNotifier {
    app_name: String,
}

impl DesktopNotifier {
    pub fn new(app_name: impl Into<String>) -> Self {
        Self {
            app_name: app_name.into(),
        }
    }
}

impl Notifier for DesktopNotifier {
    fn deliver(&self, notification: &Notification) -> Result<(), NotifyError> {
        DesktopNotification::new()
            .summary(&notification.title)
            .body(&notification.body)
            .appname(&self.app_name)
            .timeout(Timeout::Default)
            .show()
            .map(|_| ())
            .map_err(|err| NotifyError::Delivery(err.to_string()))
    }
}
