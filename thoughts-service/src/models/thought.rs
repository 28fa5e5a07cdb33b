use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use validator::{Validate, ValidationError, ValidationErrors};

/// Message bounds, in UTF-16 code units (the length a browser reports).
pub const MESSAGE_MIN_LEN: usize = 5;
pub const MESSAGE_MAX_LEN: usize = 140;

/// A stored thought, as persisted in the `thoughts` collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Thought {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub message: String,
    #[serde(rename = "likeCount", default)]
    pub like_count: i64,
    #[serde(
        rename = "createdAt",
        with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime"
    )]
    pub created_at: DateTime<Utc>,
}

impl Thought {
    /// Materialise a validated message into a fresh record.
    ///
    /// The timestamp is taken at millisecond precision, which is what the
    /// store keeps, so in-memory and persisted copies compare equal.
    pub fn new(new_thought: NewThought) -> Self {
        Self {
            id: ObjectId::new(),
            message: new_thought.message,
            like_count: 0,
            created_at: mongodb::bson::DateTime::now().to_chrono(),
        }
    }
}

/// A message that passed validation and may be inserted.
///
/// The only way to obtain one is [`NewThought::parse`], so holding a
/// `NewThought` means the trimmed message is within bounds.
#[derive(Debug, Clone, PartialEq, Eq, Validate)]
pub struct NewThought {
    #[validate(custom(function = "validate_message_length"))]
    message: String,
}

/// Measure in UTF-16 code units, so an emoji outside the BMP counts as two.
fn validate_message_length(message: &str) -> Result<(), ValidationError> {
    let len = message.encode_utf16().count();
    if (MESSAGE_MIN_LEN..=MESSAGE_MAX_LEN).contains(&len) {
        return Ok(());
    }

    let mut error = ValidationError::new("length");
    error.message = Some(Cow::from(format!(
        "Message must be between {} and {} characters",
        MESSAGE_MIN_LEN, MESSAGE_MAX_LEN
    )));
    error.add_param(Cow::from("min"), &MESSAGE_MIN_LEN);
    error.add_param(Cow::from("max"), &MESSAGE_MAX_LEN);
    error.add_param(Cow::from("value"), &len);
    Err(error)
}

impl NewThought {
    /// Trim and validate a raw message.
    ///
    /// A missing or blank message is a `required` failure; otherwise the
    /// trimmed length in UTF-16 code units must lie in
    /// [`MESSAGE_MIN_LEN`, `MESSAGE_MAX_LEN`].
    pub fn parse(raw: Option<&str>) -> Result<Self, ValidationErrors> {
        let message = raw.map(str::trim).unwrap_or_default();

        if message.is_empty() {
            let mut error = ValidationError::new("required");
            error.message = Some(Cow::from("Message is required"));
            let mut errors = ValidationErrors::new();
            errors.add("message", error);
            return Err(errors);
        }

        let candidate = Self {
            message: message.to_string(),
        };
        candidate.validate()?;
        Ok(candidate)
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}
