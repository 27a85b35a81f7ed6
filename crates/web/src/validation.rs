//! Contact edit form validation.
//!
//! Rules:
//! - `first`, `last`: at least 3 characters
//! - `avatar`: absolute URL, at least 3 characters
//! - `twitter`: at least 3 characters, or empty
//! - `notes`: optional, unchecked

use std::collections::BTreeMap;

use rolodex_core::ContactMutation;
use serde::Deserialize;

const MIN_FIELD_LENGTH: usize = 3;

/// Message shown above the form when any field fails.
pub const INVALID_FORM_MESSAGE: &str = "Please fill out all missing fields.";

const REQUIRED: &str = "Required";
const TOO_SHORT: &str = "String must contain at least 3 character(s)";
const INVALID_URL: &str = "Invalid url";
const INVALID_TWITTER: &str = "Must be at least 3 characters or left empty";

/// Submitted edit form. Fields missing from the submission are `None`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContactForm {
    pub first: Option<String>,
    pub last: Option<String>,
    pub avatar: Option<String>,
    pub twitter: Option<String>,
    pub notes: Option<String>,
}

/// Validation messages keyed by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<&'static str, Vec<String>>);

impl FieldErrors {
    fn push(&mut self, field: &'static str, message: &str) {
        self.0.entry(field).or_default().push(message.to_string());
    }

    /// Messages for one field. Empty if the field is valid.
    #[must_use]
    pub fn get(&self, field: &str) -> &[String] {
        self.0.get(field).map(Vec::as_slice).unwrap_or_default()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Names of the fields that failed.
    pub fn fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.0.keys().copied()
    }
}

/// Validate a submitted form.
///
/// # Errors
///
/// Returns every failing field with its messages.
pub fn validate(form: &ContactForm) -> Result<ContactMutation, FieldErrors> {
    let mut errors = FieldErrors::default();

    check_min_length(&mut errors, "first", form.first.as_deref());
    check_min_length(&mut errors, "last", form.last.as_deref());

    match form.avatar.as_deref() {
        None => errors.push("avatar", REQUIRED),
        Some(avatar) => {
            if url::Url::parse(avatar).is_err() {
                errors.push("avatar", INVALID_URL);
            }
            if avatar.chars().count() < MIN_FIELD_LENGTH {
                errors.push("avatar", TOO_SHORT);
            }
        }
    }

    match form.twitter.as_deref() {
        None => errors.push("twitter", REQUIRED),
        Some(twitter) if !twitter.is_empty() && twitter.chars().count() < MIN_FIELD_LENGTH => {
            errors.push("twitter", INVALID_TWITTER);
        }
        Some(_) => {}
    }

    if !errors.is_empty() {
        return Err(errors);
    }

    Ok(ContactMutation {
        first: form.first.clone(),
        last: form.last.clone(),
        avatar: form.avatar.clone(),
        twitter: form.twitter.clone(),
        notes: form.notes.clone(),
        favorite: None,
    })
}

fn check_min_length(errors: &mut FieldErrors, field: &'static str, value: Option<&str>) {
    match value {
        None => errors.push(field, REQUIRED),
        Some(value) if value.chars().count() < MIN_FIELD_LENGTH => errors.push(field, TOO_SHORT),
        Some(_) => {}
    }
}
