use serde_json::{json, Value};
use std::time::Duration;
use thiserror::Error;

/// Code for input that was rejected before any upstream call.
pub const VALIDATION_CODE: i32 = 1;
/// Code for a missing access token on the ID endpoint.
pub const MISSING_TOKEN_CODE: i32 = 2;
/// Code for anything that went wrong talking to the Graph API.
pub const UPSTREAM_CODE: i32 = -1;

#[derive(Error, Debug)]
pub enum SearchError {
    #[error("Please specify the lat and lng parameters!")]
    MissingCoordinates,

    #[error("Please specify the venue details!")]
    MissingVenueIds,

    #[error("venueIdArray has {venues} entries but eventIdArray has {events}")]
    MismatchedIds { venues: usize, events: usize },

    #[error("Please specify an Access Token, either as environment variable or as accessToken parameter!")]
    MissingAccessToken,

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON deserialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Graph API error: {message}")]
    Upstream {
        message: String,
        payload: Option<Value>,
    },

    #[error("upstream did not answer within {0:?}")]
    Timeout(Duration),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl SearchError {
    pub fn code(&self) -> i32 {
        match self {
            SearchError::MissingCoordinates
            | SearchError::MissingVenueIds
            | SearchError::MismatchedIds { .. } => VALIDATION_CODE,
            SearchError::MissingAccessToken => MISSING_TOKEN_CODE,
            _ => UPSTREAM_CODE,
        }
    }

    /// JSON body returned to HTTP callers: `{message, code}` plus the raw
    /// upstream payload under `details` when the Graph API sent one.
    pub fn to_body(&self) -> Value {
        let mut body = json!({
            "message": self.to_string(),
            "code": self.code(),
        });
        if let SearchError::Upstream {
            payload: Some(payload),
            ..
        } = self
        {
            body["details"] = payload.clone();
        }
        body
    }
}

pub type Result<T> = std::result::Result<T, SearchError>;
