//! Request and response shapes of the `web` module, their parsing implementations and tests for those.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use unicode_segmentation::UnicodeSegmentation;
use validator::ValidateEmail;

use crate::database::Subscriber;

pub const MAX_EMAIL_GRAPHEMES: usize = 256;
pub const MAX_NAME_GRAPHEMES: usize = 255;

// ###################################
// ->   REQUESTS
// ###################################
/// Deserializable Subscriber
/// The body of `POST /subscribe`. Fields are present but not yet validated.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DeserSubscriber {
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
}

/// Validated Subscriber
#[derive(Debug, Clone)]
pub struct ValidSubscriber {
    pub email: ValidEmail,
    pub name: Option<ValidName>,
}

impl ValidSubscriber {
    /// `check_format` additionally requires the email to look like an actual address.
    pub fn parse(deser_sub: DeserSubscriber, check_format: bool) -> Result<Self, DataParsingError> {
        let email = if check_format {
            ValidEmail::parse_strict(deser_sub.email)?
        } else {
            ValidEmail::parse(deser_sub.email)?
        };
        let name = deser_sub.name.map(ValidName::parse).transpose()?.flatten();

        Ok(ValidSubscriber { email, name })
    }
}

/// Validated Subscriber Email
#[derive(Debug, Clone)]
pub struct ValidEmail(String);

impl AsRef<str> for ValidEmail {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl ValidEmail {
    /// Structural check only: not blank and not absurdly long.
    pub fn parse<S>(value: S) -> Result<Self, DataParsingError>
    where
        S: AsRef<str>,
    {
        let value = value.as_ref();

        if value.trim().is_empty() {
            return Err(DataParsingError::EmailEmpty);
        }
        if value.graphemes(true).count() > MAX_EMAIL_GRAPHEMES {
            return Err(DataParsingError::EmailTooLong);
        }

        Ok(ValidEmail(value.to_owned()))
    }

    pub fn parse_strict<S>(value: S) -> Result<Self, DataParsingError>
    where
        S: AsRef<str>,
    {
        let email = Self::parse(value)?;
        if email.0.validate_email() {
            Ok(email)
        } else {
            Err(DataParsingError::EmailInvalid)
        }
    }
}

/// Validated Subscriber Name
#[derive(Debug, Clone)]
pub struct ValidName(String);

impl AsRef<str> for ValidName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl ValidName {
    /// Returns `Ok(None)` for a blank name, which gets stored as `NULL`.
    pub fn parse<S>(value: S) -> Result<Option<Self>, DataParsingError>
    where
        S: AsRef<str>,
    {
        let value = value.as_ref();

        if value.trim().is_empty() {
            return Ok(None);
        }
        if value.graphemes(true).count() > MAX_NAME_GRAPHEMES {
            return Err(DataParsingError::SubscriberNameTooLong);
        }

        Ok(Some(ValidName(value.to_owned())))
    }
}

// ###################################
// ->   RESPONSES
// ###################################
#[derive(Debug, Serialize)]
pub struct SubscribeResponse {
    pub message: &'static str,
}

impl Default for SubscribeResponse {
    fn default() -> Self {
        Self {
            message: "Thanks for subscribing!",
        }
    }
}

/// A single subscriber as seen by the admin.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SubscriberView {
    pub id: i64,
    pub email: String,
    pub name: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl From<Subscriber> for SubscriberView {
    fn from(sub: Subscriber) -> Self {
        SubscriberView {
            id: sub.id,
            email: sub.email,
            name: sub.name,
            timestamp: sub.timestamp,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SubscribersResponse {
    pub subscribers: Vec<SubscriberView>,
}

// ###################################
// ->   ERROR
// ###################################
#[derive(Debug, thiserror::Error)]
pub enum DataParsingError {
    #[error("email is empty")]
    EmailEmpty,
    #[error("email is too long")]
    EmailTooLong,
    #[error("email is not a valid address")]
    EmailInvalid,

    #[error("subscriber name is too long")]
    SubscriberNameTooLong,
}
