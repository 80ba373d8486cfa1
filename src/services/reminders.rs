use chrono::{DateTime, Utc};
use std::cell::Cell;
use thiserror::Error;

use crate::models::Reminder;
use crate::notify::NotificationScheduler;
use crate::storage::KeyValueStorage;
use crate::store::{CollectionKey, RecordStore};
use crate::utils::{format_iso, generate_id, is_blank};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReminderError {
    #[error("Title is required")]
    TitleRequired,
    #[error("Reminder id already exists: {0}")]
    DuplicateId(String),
}

/// Reminders and the notifications scheduled for them.
///
/// The store keeps the reminder and the scheduler's opaque notification id;
/// the alarm itself belongs to the scheduler.
pub struct ReminderService<'a> {
    reminders: RecordStore<'a, Reminder>,
    scheduler: &'a dyn NotificationScheduler,
    default_body: String,
    permission: Cell<Option<bool>>,
}

impl<'a> ReminderService<'a> {
    pub fn new(
        storage: &'a dyn KeyValueStorage,
        scheduler: &'a dyn NotificationScheduler,
        default_body: impl Into<String>,
    ) -> Self {
        Self {
            reminders: RecordStore::new(storage, CollectionKey::Reminders),
            scheduler,
            default_body: default_body.into(),
            permission: Cell::new(None),
        }
    }

    pub fn reminders(&self) -> Vec<Reminder> {
        self.reminders.load()
    }

    /// Whether notifications may be scheduled; asks the scheduler only once
    pub fn ensure_permission(&self) -> bool {
        if let Some(granted) = self.permission.get() {
            return granted;
        }
        let granted = self.scheduler.request_permission();
        if !granted {
            tracing::warn!(
                "notification permission denied; reminders will be saved without alerts"
            );
        }
        self.permission.set(Some(granted));
        granted
    }

    fn schedule(&self, title: &str, body: &str, fire_at: DateTime<Utc>) -> Option<String> {
        if !self.ensure_permission() {
            return None;
        }
        let body = if is_blank(body) { self.default_body.as_str() } else { body };
        match self.scheduler.schedule(title, body, fire_at) {
            Ok(id) => Some(id),
            Err(e) => {
                tracing::error!(error = %e, "failed to schedule reminder notification");
                None
            }
        }
    }

    /// Save a new reminder and schedule its notification.
    ///
    /// A reminder is saved even when no notification could be scheduled; it
    /// then has no `notification_id`.
    pub fn save_reminder(
        &self,
        title: &str,
        body: &str,
        fire_at: DateTime<Utc>,
    ) -> Result<Reminder, ReminderError> {
        if is_blank(title) {
            return Err(ReminderError::TitleRequired);
        }
        let reminder = Reminder {
            id: generate_id(),
            title: title.to_string(),
            body: body.to_string(),
            date: format_iso(&fire_at),
            notification_id: self.schedule(title, body, fire_at),
        };
        if !self.reminders.insert(reminder.clone()) {
            if let Some(notification_id) = reminder.notification_id.as_deref() {
                self.cancel(notification_id);
            }
            return Err(ReminderError::DuplicateId(reminder.id));
        }
        Ok(reminder)
    }

    /// Delete a reminder, cancelling its notification first if it has one
    pub fn delete_reminder(&self, id: &str) -> Option<Reminder> {
        let reminder = self.reminders.get(id)?;
        if let Some(notification_id) = reminder.notification_id.as_deref() {
            self.cancel(notification_id);
        }
        self.reminders.remove(id)
    }

    fn cancel(&self, notification_id: &str) {
        if let Err(e) = self.scheduler.cancel(notification_id) {
            tracing::warn!(notification_id, error = %e, "failed to cancel reminder notification");
        }
    }
}
