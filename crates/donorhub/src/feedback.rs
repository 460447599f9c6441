//! Per-user feedback log.
//!
//! Feedback entries live outside the donor registry proper, one namespace
//! per account, newest first.

use chrono::{Local, Utc};
use serde::{Deserialize, Serialize};

use crate::donor::account_identity;
use crate::error::{Error, Result};
use crate::profile::UserProfile;
use crate::store::Store;

/// Highest star rating a feedback entry can carry.
pub const MAX_RATING: u8 = 5;

/// Format used for feedback timestamps.
const FEEDBACK_DATE_FORMAT: &str = "%-m/%-d/%Y %H:%M:%S";

/// A single feedback entry left by a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackEntry {
    /// Unique identifier, derived from the submission timestamp.
    pub id: i64,

    /// Identifier of the account that left the feedback.
    pub user_id: String,

    /// Name of the account at submission time.
    pub name: String,

    /// Star rating, 0 to [`MAX_RATING`].
    pub rating: u8,

    /// Optional mood tag.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mood: Option<String>,

    /// The feedback text.
    pub comment: String,

    /// Submission timestamp, formatted for display.
    pub date: String,
}

/// Namespace key holding one account's feedback entries.
#[must_use]
pub fn feedback_namespace(user_id: &str) -> String {
    format!("feedbacks_{user_id}")
}

/// Record a feedback entry for an authenticated account.
///
/// The new entry is prepended, keeping the stored list newest-first.
///
/// # Errors
///
/// - [`Error::NotAuthenticated`] if the account is missing its identity.
/// - [`Error::Validation`] if the comment is empty or the rating exceeds
///   [`MAX_RATING`].
/// - A store error if the write fails.
pub fn submit_feedback(
    store: &Store,
    account: &UserProfile,
    rating: u8,
    mood: Option<String>,
    comment: &str,
) -> Result<FeedbackEntry> {
    let (user_id, name, _email) = account_identity(account)?;

    let comment = comment.trim();
    if comment.is_empty() {
        return Err(Error::validation("comment", "Feedback comment is required"));
    }
    if rating > MAX_RATING {
        return Err(Error::validation(
            "rating",
            format!("Rating must be between 0 and {MAX_RATING}"),
        ));
    }

    let namespace = feedback_namespace(&user_id);
    let mut entries: Vec<FeedbackEntry> = store.get_or_default(&namespace);

    let entry = FeedbackEntry {
        id: Utc::now().timestamp_millis(),
        user_id,
        name,
        rating,
        mood: mood.map(|m| m.trim().to_string()).filter(|m| !m.is_empty()),
        comment: comment.to_string(),
        date: Local::now().format(FEEDBACK_DATE_FORMAT).to_string(),
    };

    entries.insert(0, entry.clone());
    store.set(&namespace, &entries)?;

    Ok(entry)
}

/// Load an account's feedback entries, newest first.
///
/// An absent or unreadable namespace yields an empty list.
#[must_use]
pub fn list_feedbacks(store: &Store, user_id: &str) -> Vec<FeedbackEntry> {
    store.get_or_default(&feedback_namespace(user_id))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_account() -> UserProfile {
        UserProfile {
            id: Some("u1".to_string()),
            name: Some("Alice".to_string()),
            email: Some("a@x.com".to_string()),
            ..UserProfile::default()
        }
    }

    #[test]
    fn test_feedback_namespace() {
        assert_eq!(feedback_namespace("u1"), "feedbacks_u1");
    }

    #[test]
    fn test_submit_and_list() {
        let store = Store::open_in_memory().unwrap();

        let entry =
            submit_feedback(&store, &test_account(), 4, Some("happy".to_string()), "Great")
                .unwrap();
        assert_eq!(entry.rating, 4);
        assert_eq!(entry.name, "Alice");

        let entries = list_feedbacks(&store, "u1");
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0], entry);
    }

    #[test]
    fn test_submit_prepends_newest_first() {
        let store = Store::open_in_memory().unwrap();

        submit_feedback(&store, &test_account(), 3, None, "first").unwrap();
        submit_feedback(&store, &test_account(), 5, None, "second").unwrap();

        let entries = list_feedbacks(&store, "u1");
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].comment, "second");
        assert_eq!(entries[1].comment, "first");
    }

    #[test]
    fn test_submit_requires_comment() {
        let store = Store::open_in_memory().unwrap();

        let err = submit_feedback(&store, &test_account(), 3, None, "   ").unwrap_err();
        assert!(err.is_validation());
        assert!(list_feedbacks(&store, "u1").is_empty());
    }

    #[test]
    fn test_submit_rejects_out_of_range_rating() {
        let store = Store::open_in_memory().unwrap();

        let err = submit_feedback(&store, &test_account(), 6, None, "too many stars").unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_submit_requires_account() {
        let store = Store::open_in_memory().unwrap();

        let err = submit_feedback(&store, &UserProfile::default(), 3, None, "hi").unwrap_err();
        assert!(err.is_not_authenticated());
    }

    #[test]
    fn test_feedback_lists_are_per_user() {
        let store = Store::open_in_memory().unwrap();
        submit_feedback(&store, &test_account(), 3, None, "mine").unwrap();

        assert!(list_feedbacks(&store, "u2").is_empty());
        assert_eq!(list_feedbacks(&store, "u1").len(), 1);
    }

    #[test]
    fn test_blank_mood_is_dropped() {
        let store = Store::open_in_memory().unwrap();
        let entry =
            submit_feedback(&store, &test_account(), 3, Some("  ".to_string()), "hi").unwrap();
        assert!(entry.mood.is_none());
    }
}
