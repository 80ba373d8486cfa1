use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::models::ScheduledNotification;
use crate::storage::KeyValueStorage;
use crate::store::{CollectionKey, RecordStore};
use crate::utils::{format_iso, generate_id, parse_datetime};

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("Failed to schedule notification: {0}")]
    ScheduleFailed(String),
    #[error("Failed to cancel notification {0}")]
    CancelFailed(String),
}

/// Device capability that raises an alert at a given time
pub trait NotificationScheduler {
    /// Ask for permission to show notifications. Returns whether it was granted.
    fn request_permission(&self) -> bool;

    /// Schedule an alert and return the scheduler's opaque id for it
    fn schedule(
        &self,
        title: &str,
        body: &str,
        fire_at: DateTime<Utc>,
    ) -> Result<String, NotifyError>;

    fn cancel(&self, notification_id: &str) -> Result<(), NotifyError>;
}

/// Scheduler that queues notifications in local storage.
///
/// There is no daemon; `due` reports what should have fired by a given time.
pub struct StoredScheduler<'a> {
    queue: RecordStore<'a, ScheduledNotification>,
}

impl<'a> StoredScheduler<'a> {
    pub fn new(storage: &'a dyn KeyValueStorage) -> Self {
        Self {
            queue: RecordStore::new(storage, CollectionKey::ScheduledNotifications),
        }
    }

    pub fn pending(&self) -> Vec<ScheduledNotification> {
        self.queue.load()
    }

    /// Notifications whose fire time is at or before `now`
    pub fn due(&self, now: DateTime<Utc>) -> Vec<ScheduledNotification> {
        self.queue
            .load()
            .into_iter()
            .filter(|n| parse_datetime(&n.fire_at).is_some_and(|at| at <= now))
            .collect()
    }
}

impl NotificationScheduler for StoredScheduler<'_> {
    fn request_permission(&self) -> bool {
        true
    }

    fn schedule(
        &self,
        title: &str,
        body: &str,
        fire_at: DateTime<Utc>,
    ) -> Result<String, NotifyError> {
        let notification = ScheduledNotification {
            id: generate_id(),
            title: title.to_string(),
            body: body.to_string(),
            fire_at: format_iso(&fire_at),
        };
        let id = notification.id.clone();
        self.queue
            .try_add(notification)
            .map_err(|e| NotifyError::ScheduleFailed(e.to_string()))?;
        tracing::debug!(notification_id = %id, %fire_at, "queued notification");
        Ok(id)
    }

    fn cancel(&self, notification_id: &str) -> Result<(), NotifyError> {
        match self.queue.remove(notification_id) {
            Some(_) => Ok(()),
            None => Err(NotifyError::CancelFailed(notification_id.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;
    use chrono::TimeZone;

    #[test]
    fn queued_notifications_become_due() {
        let storage = MemoryStorage::new();
        let scheduler = StoredScheduler::new(&storage);
        let early = Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap();
        let late = Utc.with_ymd_and_hms(2024, 5, 3, 8, 0, 0).unwrap();

        let first = scheduler.schedule("Quiz", "Chapter 4", early).unwrap();
        scheduler.schedule("Essay", "Draft", late).unwrap();

        let now = Utc.with_ymd_and_hms(2024, 5, 2, 0, 0, 0).unwrap();
        let due = scheduler.due(now);
        assert_eq!(due.len(), 1);
        assert_eq!(due[0].id, first);
        assert_eq!(scheduler.pending().len(), 2);
    }

    #[test]
    fn cancel_removes_from_queue() {
        let storage = MemoryStorage::new();
        let scheduler = StoredScheduler::new(&storage);
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap();
        let id = scheduler.schedule("Quiz", "", at).unwrap();

        scheduler.cancel(&id).unwrap();
        assert!(scheduler.pending().is_empty());
        assert!(matches!(scheduler.cancel(&id), Err(NotifyError::CancelFailed(_))));
    }

    #[test]
    fn schedule_on_corrupt_queue_fails_without_overwriting() {
        let storage = MemoryStorage::new();
        storage.set_item("scheduledNotifications", "[{broken").unwrap();
        let scheduler = StoredScheduler::new(&storage);
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap();

        assert!(matches!(
            scheduler.schedule("Quiz", "", at),
            Err(NotifyError::ScheduleFailed(_))
        ));
        assert_eq!(
            storage.get_item("scheduledNotifications").unwrap().as_deref(),
            Some("[{broken")
        );
    }
}
