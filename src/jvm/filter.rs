use crate::jvm::types::GcNotification;

/// Selects notifications from one collector with one action label.
///
/// Emitters evaluate the filter before a listener is woken, so listeners only
/// ever see matching notifications.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GcEventFilter {
    collector_name: String,
    action: String,
}

impl GcEventFilter {
    pub fn new(collector_name: impl Into<String>, action: impl Into<String>) -> Self {
        Self {
            collector_name: collector_name.into(),
            action: action.into(),
        }
    }

    pub fn collector_name(&self) -> &str {
        &self.collector_name
    }

    pub fn action(&self) -> &str {
        &self.action
    }

    pub fn is_enabled(&self, notification: &GcNotification) -> bool {
        notification.collector_name == self.collector_name && notification.action == self.action
    }
}
