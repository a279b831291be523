// feedback.rs — Feedback form validation and the list of past submissions.
//
// Validation never throws: each field check yields `Ok(())` or the message
// to show under that field. A submission is stored only when every field
// passes.

use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::Serialize;

use crate::models::{FeedbackEntry, FeedbackForm, FeedbackTopic};
use crate::persistence::FeedbackStore;

pub const MIN_MESSAGE_LEN: usize = 10;

const STATUS_FIX_ERRORS: &str = "Please fix the errors and try again.";
const STATUS_SENT: &str = "Sent! Thanks for your feedback.";
const STATUS_CLEARED: &str = "All submissions cleared.";

fn name_pattern() -> &'static Regex {
    static NAME: OnceLock<Regex> = OnceLock::new();
    NAME.get_or_init(|| {
        Regex::new(r"^[A-Za-zÇçĞğİıÖöŞşÜü\s]{2,}$").expect("name pattern is valid")
    })
}

// Same grammar as an HTML <input type="email">.
fn email_pattern() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| {
        Regex::new(
            r#"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$"#,
        )
        .expect("email pattern is valid")
    })
}

// ---------------------------------------------------------------------------
// Field checks
// ---------------------------------------------------------------------------

pub fn validate_name(name: &str) -> Result<(), &'static str> {
    if name.trim().is_empty() {
        Err("Name is required.")
    } else if !name_pattern().is_match(name) {
        Err("Letters and spaces only, at least 2 characters.")
    } else {
        Ok(())
    }
}

pub fn validate_email(email: &str) -> Result<(), &'static str> {
    let email = email.trim();
    if email.is_empty() {
        Err("Email is required.")
    } else if !email_pattern().is_match(email) {
        Err("Enter a valid email address.")
    } else {
        Ok(())
    }
}

pub fn validate_topic(topic: &str) -> Result<FeedbackTopic, &'static str> {
    FeedbackTopic::parse(topic).ok_or("Choose a topic.")
}

pub fn validate_message(message: &str) -> Result<(), &'static str> {
    let len = message.trim().chars().count();
    if len == 0 {
        Err("Message is required.")
    } else if len < MIN_MESSAGE_LEN {
        Err("Write at least 10 characters.")
    } else {
        Ok(())
    }
}

pub fn validate_rating(rating: Option<u8>) -> Result<u8, &'static str> {
    match rating {
        Some(r @ 1..=5) => Ok(r),
        _ => Err("Choose a satisfaction rating."),
    }
}

/// Live counter shown under the message box.
pub fn message_counter(message: &str) -> String {
    format!("{} / min {MIN_MESSAGE_LEN}", message.trim().chars().count())
}

/// Per-field messages; `None` means the field is fine.
#[derive(Debug, Serialize, Clone, Default, PartialEq)]
pub struct FieldErrors {
    pub name:    Option<String>,
    pub email:   Option<String>,
    pub topic:   Option<String>,
    pub message: Option<String>,
    pub rating:  Option<String>,
}

impl FieldErrors {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.email.is_none()
            && self.topic.is_none()
            && self.message.is_none()
            && self.rating.is_none()
    }
}

/// Check every field (not just up to the first failure) and build the entry.
pub fn validate(form: &FeedbackForm, now: DateTime<Utc>) -> Result<FeedbackEntry, FieldErrors> {
    let name = validate_name(&form.name);
    let email = validate_email(&form.email);
    let topic = validate_topic(&form.topic);
    let message = validate_message(&form.message);
    let rating = validate_rating(form.rating);

    match (name, email, topic, message, rating) {
        (Ok(()), Ok(()), Ok(topic), Ok(()), Ok(rating)) => Ok(FeedbackEntry {
            name: form.name.trim().to_string(),
            email: form.email.trim().to_string(),
            topic,
            message: form.message.trim().to_string(),
            rating,
            created_at: now,
        }),
        (name, email, topic, message, rating) => Err(FieldErrors {
            name:    name.err().map(str::to_string),
            email:   email.err().map(str::to_string),
            topic:   topic.err().map(str::to_string),
            message: message.err().map(str::to_string),
            rating:  rating.err().map(str::to_string),
        }),
    }
}

// ---------------------------------------------------------------------------
// Submissions
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct SubmitOutcome {
    pub accepted: bool,
    pub errors:   FieldErrors,
    pub status:   String,
}

/// Stored submissions plus the status line shown above the list.
pub struct FeedbackBook {
    store:  FeedbackStore,
    status: String,
}

impl FeedbackBook {
    pub fn new(store: FeedbackStore) -> Self {
        Self { store, status: String::new() }
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn len(&self) -> usize {
        self.store.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.entries().is_empty()
    }

    /// Newest first, as the list is displayed.
    pub fn newest_first(&self) -> Vec<FeedbackEntry> {
        self.store.entries().iter().rev().cloned().collect()
    }

    pub fn submit(&mut self, form: &FeedbackForm, now: DateTime<Utc>) -> SubmitOutcome {
        let entry = match validate(form, now) {
            Ok(entry) => entry,
            Err(errors) => {
                self.status = STATUS_FIX_ERRORS.to_string();
                return SubmitOutcome { accepted: false, errors, status: self.status.clone() };
            }
        };

        if let Err(e) = self.store.append(entry) {
            log::warn!("could not persist feedback: {e}");
        }
        self.status = STATUS_SENT.to_string();
        SubmitOutcome {
            accepted: true,
            errors: FieldErrors::default(),
            status: self.status.clone(),
        }
    }

    /// Delete the row at `display_index` of `newest_first()`.
    pub fn delete_displayed(&mut self, display_index: usize) -> Option<FeedbackEntry> {
        let stored_index = self.len().checked_sub(display_index + 1)?;
        match self.store.remove_at(stored_index) {
            Ok(removed) => removed,
            Err(e) => {
                log::warn!("could not persist feedback deletion: {e}");
                None
            }
        }
    }

    pub fn clear(&mut self) {
        if let Err(e) = self.store.clear() {
            log::warn!("could not persist cleared feedback: {e}");
        }
        self.status = STATUS_CLEARED.to_string();
    }
}
