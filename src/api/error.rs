// ABOUTME: Typed API errors decoded once from portal failure responses
// Callers match on variants instead of re-reading raw response bodies

use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

/// Shown when the server cannot be reached at all
pub const NETWORK_MESSAGE: &str =
    "Unable to reach the server. Please check your internet connection and try again.";

/// Shown when a registration collides with an existing account
pub const DUPLICATE_ACCOUNT_MESSAGE: &str =
    "An account with this email already exists. Please sign in instead.";

pub const LOCKED_MESSAGE: &str = "Your account is locked. Please contact your tutor.";

pub const FORBIDDEN_MESSAGE: &str =
    "You do not have permission to sign in. Please contact support.";

const DUPLICATE_MARKER: &str = "already exists";
const DATABASE_VALIDATION_MARKER: &str = "Database validation errors";

/// One entry of a server-side validation error list.
///
/// The portal returns several shapes for the same concept; they are all
/// accepted here so the rest of the client never sees raw JSON.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ValidationItem {
    Text(String),
    Msg {
        msg: String,
        #[serde(default)]
        param: Option<Value>,
    },
    Message {
        message: String,
        #[serde(default)]
        path: Option<Value>,
    },
    Param {
        param: Value,
    },
    Other(Value),
}

impl ValidationItem {
    /// Human-readable text for this entry
    pub fn message(&self) -> String {
        match self {
            Self::Text(text) => text.clone(),
            Self::Msg { msg, .. } => msg.clone(),
            Self::Message { message, path } => match path.as_ref().map(value_text) {
                Some(path) if !path.is_empty() => format!("{path}: {message}"),
                _ => message.clone(),
            },
            Self::Param { param } => format!("Invalid value for {}", value_text(param)),
            Self::Other(_) => "Invalid value".to_string(),
        }
    }
}

/// Field names arrive as strings, numbers or arrays of path segments
fn value_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Array(parts) => parts.iter().map(value_text).collect::<Vec<_>>().join("."),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Items of a list-valued field; any other shape counts as absent
fn item_list(body: &Value, key: &str) -> Vec<ValidationItem> {
    body.get(key)
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .map(|item| {
                    serde_json::from_value(item.clone())
                        .unwrap_or_else(|_| ValidationItem::Other(item.clone()))
                })
                .collect()
        })
        .unwrap_or_default()
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Validation failed with {} error(s)", .0.len())]
    Validation(Vec<ValidationItem>),

    #[error("Account already exists: {0}")]
    DuplicateAccount(String),

    #[error("Database validation failed with {} error(s)", .0.len())]
    DatabaseValidation(Vec<ValidationItem>),

    #[error("Account is locked")]
    Locked,

    #[error("Access forbidden")]
    Forbidden,

    #[error("Not signed in")]
    Unauthorized,

    #[error("Server error {status}: {message}")]
    Server { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Invalid endpoint URL: {0}")]
    InvalidEndpoint(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl ApiError {
    /// Decode a non-success response into a typed error
    pub fn from_response(status: StatusCode, body: &str) -> Self {
        // Each part is read on its own so one odd field never hides the others
        let parsed: Value = serde_json::from_str(body).unwrap_or(Value::Null);
        let message = parsed
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        let errors = item_list(&parsed, "errors");
        if !errors.is_empty() {
            return Self::Validation(errors);
        }
        if message.contains(DUPLICATE_MARKER) {
            return Self::DuplicateAccount(message);
        }
        if message.contains(DATABASE_VALIDATION_MARKER) {
            return Self::DatabaseValidation(item_list(&parsed, "validationErrors"));
        }

        match status {
            StatusCode::LOCKED => Self::Locked,
            StatusCode::FORBIDDEN => Self::Forbidden,
            StatusCode::UNAUTHORIZED if message.is_empty() => Self::Unauthorized,
            _ => Self::Server {
                status: status.as_u16(),
                message,
            },
        }
    }

    /// Whether the request never got an answer from the server
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Network(_))
    }

    /// Whether the user should be offered a shortcut to sign in
    pub fn suggests_sign_in(&self) -> bool {
        matches!(self, Self::DuplicateAccount(_))
    }

    /// Text shown to the user; `fallback` covers errors without a message
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            Self::Validation(items) => {
                let lines: Vec<String> = items.iter().map(|i| format!("• {}", i.message())).collect();
                format!("Please fix the following errors:\n{}", lines.join("\n"))
            }
            Self::DuplicateAccount(_) => DUPLICATE_ACCOUNT_MESSAGE.to_string(),
            Self::DatabaseValidation(items) if items.is_empty() => {
                "Some of your details were rejected by the server.".to_string()
            }
            Self::DatabaseValidation(items) => {
                let lines: Vec<String> = items.iter().map(|i| format!("- {}", i.message())).collect();
                format!(
                    "Some of your details were rejected by the server:\n{}",
                    lines.join("\n")
                )
            }
            Self::Locked => LOCKED_MESSAGE.to_string(),
            Self::Forbidden => FORBIDDEN_MESSAGE.to_string(),
            Self::Server { message, .. } if !message.trim().is_empty() => message.clone(),
            Self::Network(_) => NETWORK_MESSAGE.to_string(),
            Self::InvalidRequest(message) => message.clone(),
            Self::Unauthorized
            | Self::Server { .. }
            | Self::MalformedResponse(_)
            | Self::InvalidEndpoint(_) => fallback.to_string(),
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::MalformedResponse(err.to_string())
        } else if err.is_builder() {
            Self::InvalidRequest(err.to_string())
        } else {
            // Connect, timeout and body errors all mean we never got a usable answer
            Self::Network(err.to_string())
        }
    }
}
