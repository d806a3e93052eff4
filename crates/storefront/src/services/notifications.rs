//! Transient user notifications (toasts).

use chrono::{DateTime, Utc};
use mlk_shop_core::{NotificationId, NotificationKind};
use serde::{Deserialize, Serialize};

use crate::observable::{Observable, Subscription};

/// A message shown to the user until dismissed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: NotificationId,
    pub kind: NotificationKind,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

/// Publishes the list of active notifications in insertion order.
///
/// Expiry is left to the presentation layer, which calls
/// [`NotificationCenter::dismiss`].
#[derive(Debug, Clone, Default)]
pub struct NotificationCenter {
    active: Observable<Vec<Notification>>,
}

impl NotificationCenter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a notification and return its id.
    pub fn push(&self, kind: NotificationKind, message: impl Into<String>) -> NotificationId {
        let notification = Notification {
            id: NotificationId::generate(),
            kind,
            message: message.into(),
            created_at: Utc::now(),
        };
        let id = notification.id.clone();
        tracing::debug!(%kind, message = %notification.message, "Notification");

        let mut active = self.active.get();
        active.push(notification);
        self.active.set(active);
        id
    }

    pub fn success(&self, message: impl Into<String>) -> NotificationId {
        self.push(NotificationKind::Success, message)
    }

    pub fn error(&self, message: impl Into<String>) -> NotificationId {
        self.push(NotificationKind::Error, message)
    }

    pub fn warning(&self, message: impl Into<String>) -> NotificationId {
        self.push(NotificationKind::Warning, message)
    }

    pub fn info(&self, message: impl Into<String>) -> NotificationId {
        self.push(NotificationKind::Info, message)
    }

    /// Remove the notification with `id`. Returns whether it was active.
    pub fn dismiss(&self, id: &NotificationId) -> bool {
        let mut active = self.active.get();
        let before = active.len();
        active.retain(|n| &n.id != id);
        if active.len() == before {
            return false;
        }
        self.active.set(active);
        true
    }

    /// Snapshot of the active notifications, oldest first.
    #[must_use]
    pub fn notifications(&self) -> Vec<Notification> {
        self.active.get()
    }

    /// Subscribe to the active list. The current list is delivered immediately.
    #[must_use = "dropping the subscription unsubscribes immediately"]
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&Vec<Notification>) + Send + Sync + 'static,
    {
        self.active.subscribe(callback)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insertion_order_without_dedup() {
        let center = NotificationCenter::new();
        center.success("Saved");
        center.error("Failed");
        center.success("Saved");

        let kinds: Vec<_> = center.notifications().iter().map(|n| n.kind).collect();
        assert_eq!(
            kinds,
            vec![
                NotificationKind::Success,
                NotificationKind::Error,
                NotificationKind::Success
            ]
        );
    }

    #[test]
    fn test_dismiss() {
        let center = NotificationCenter::new();
        let first = center.info("one");
        let second = center.warning("two");

        assert!(center.dismiss(&first));
        assert!(!center.dismiss(&first));

        let remaining = center.notifications();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].id, second);
    }

    #[test]
    fn test_ids_are_unique() {
        let center = NotificationCenter::new();
        assert_ne!(center.info("a"), center.info("a"));
    }
}
