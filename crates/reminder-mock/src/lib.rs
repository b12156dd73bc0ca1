//! Mock reminder-deletion API used by the API-simulation benchmark.
//!
//! Holds an in-memory store of reminders and a validated delete operation.
//! Token resolution is a trait seam so the simulation can plug in its own
//! account subsystem.

use chrono::NaiveDateTime;
use std::collections::{BTreeMap, HashMap};
use thiserror::Error;

/// Timestamp format accepted by the API.
pub const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Errors produced by the reminder API.
#[derive(Error, Debug)]
pub enum ReminderError {
    /// The token did not resolve to a user.
    #[error("Invalid token: {token}")]
    InvalidToken { token: String },

    /// An input parameter failed validation.
    #[error("Validation failed: {message}")]
    Validation { message: String },

    /// No reminder matched the caller's content or time.
    #[error("You have no reminder about '{content}' or at time {time}")]
    NotFound { content: String, time: String },
}

impl ReminderError {
    /// Create an invalid token error.
    pub fn invalid_token(token: impl Into<String>) -> Self {
        Self::InvalidToken {
            token: token.into(),
        }
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }
}

/// Resolves an access token to the owning username.
pub trait TokenChecker {
    fn check_token(&self, token: &str) -> Result<String, ReminderError>;
}

/// Map-backed token checker for tests and local simulation runs.
#[derive(Debug, Default)]
pub struct StaticTokenChecker {
    tokens: HashMap<String, String>,
}

impl StaticTokenChecker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(mut self, token: impl Into<String>, username: impl Into<String>) -> Self {
        self.tokens.insert(token.into(), username.into());
        self
    }
}

impl TokenChecker for StaticTokenChecker {
    fn check_token(&self, token: &str) -> Result<String, ReminderError> {
        self.tokens
            .get(token)
            .cloned()
            .ok_or_else(|| ReminderError::invalid_token(token))
    }
}

/// One stored reminder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reminder {
    pub username: String,
    pub content: String,
    pub time: String,
}

/// In-memory reminder store keyed by insertion id.
///
/// A `BTreeMap` keeps iteration in insertion-id order, so "the first
/// matching reminder" is deterministic.
#[derive(Debug, Default)]
pub struct ReminderStore {
    reminders: BTreeMap<u64, Reminder>,
    next_id: u64,
}

impl ReminderStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a reminder and return its id.
    pub fn insert(&mut self, reminder: Reminder) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.reminders.insert(id, reminder);
        id
    }

    pub fn len(&self) -> usize {
        self.reminders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reminders.is_empty()
    }

    /// Delete the caller's first reminder matching `content` OR `time`.
    ///
    /// `time` must parse as [`TIME_FORMAT`] and `content` must be non-blank;
    /// either violation is a [`ReminderError::Validation`]. Exactly one
    /// record is removed on success.
    pub fn delete(
        &mut self,
        checker: &dyn TokenChecker,
        token: &str,
        content: &str,
        time: &str,
    ) -> Result<(), ReminderError> {
        NaiveDateTime::parse_from_str(time, TIME_FORMAT).map_err(|_| {
            ReminderError::validation(format!("time must match the format {}", TIME_FORMAT))
        })?;
        if content.trim().is_empty() {
            return Err(ReminderError::validation("content should not be empty"));
        }

        let username = checker.check_token(token)?;

        let matched = self
            .reminders
            .iter()
            .find(|(_, reminder)| {
                reminder.username == username
                    && (reminder.content == content || reminder.time == time)
            })
            .map(|(id, _)| *id);

        match matched {
            Some(id) => {
                self.reminders.remove(&id);
                Ok(())
            }
            None => Err(ReminderError::NotFound {
                content: content.to_string(),
                time: time.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checker() -> StaticTokenChecker {
        StaticTokenChecker::new().with_token("tok-alice", "alice")
    }

    fn store_with_reminders() -> ReminderStore {
        let mut store = ReminderStore::new();
        store.insert(Reminder {
            username: "alice".to_string(),
            content: "standup".to_string(),
            time: "2023-01-02 09:00:00".to_string(),
        });
        store.insert(Reminder {
            username: "alice".to_string(),
            content: "review".to_string(),
            time: "2023-01-02 15:00:00".to_string(),
        });
        store.insert(Reminder {
            username: "bob".to_string(),
            content: "standup".to_string(),
            time: "2023-01-02 09:00:00".to_string(),
        });
        store
    }

    #[test]
    fn test_blank_content_fails_validation() {
        let mut store = store_with_reminders();
        let err = store
            .delete(&checker(), "tok-alice", "   ", "2023-01-02 09:00:00")
            .unwrap_err();

        assert!(matches!(err, ReminderError::Validation { .. }));
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn test_malformed_time_fails_validation() {
        let mut store = store_with_reminders();
        let err = store
            .delete(&checker(), "tok-alice", "standup", "tomorrow at nine")
            .unwrap_err();

        assert!(matches!(err, ReminderError::Validation { .. }));
    }

    #[test]
    fn test_no_matching_record_is_not_found() {
        let mut store = store_with_reminders();
        let err = store
            .delete(&checker(), "tok-alice", "dentist", "1999-12-31 23:59:59")
            .unwrap_err();

        assert!(matches!(err, ReminderError::NotFound { .. }));
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn test_delete_removes_exactly_one_record() {
        let mut store = store_with_reminders();
        store
            .delete(&checker(), "tok-alice", "standup", "1999-12-31 23:59:59")
            .unwrap();

        // Only alice's matching reminder is gone; bob's identical one stays.
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_delete_matches_on_time_alone() {
        let mut store = store_with_reminders();
        store
            .delete(&checker(), "tok-alice", "unrelated", "2023-01-02 15:00:00")
            .unwrap();

        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_unknown_token_is_rejected() {
        let mut store = store_with_reminders();
        let err = store
            .delete(&checker(), "tok-mallory", "standup", "2023-01-02 09:00:00")
            .unwrap_err();

        assert!(matches!(err, ReminderError::InvalidToken { .. }));
        assert_eq!(store.len(), 3);
    }
}
