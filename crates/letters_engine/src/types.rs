use std::fmt;

use serde::{Deserialize, Serialize};

use crate::ApiError;

pub type RequestId = u64;

/// Page size the letters endpoints use when no `length` is given.
pub const PAGE_SIZE: usize = 10;

/// A letter as returned by the letters endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LetterRecord {
    pub id: String,
    pub author: String,
    pub message: String,
    #[serde(default)]
    pub secret: bool,
    pub created_at: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LettersEndpoint {
    Public,
    Privileged,
}

impl LettersEndpoint {
    pub fn path(self) -> &'static str {
        match self {
            LettersEndpoint::Public => "api/letters",
            LettersEndpoint::Privileged => "api/letters/all",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub endpoint: LettersEndpoint,
    pub offset: usize,
}

/// Bearer token taken from the login cookie. Never printed.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn token(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(..)")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LetterSubmission {
    pub author: String,
    pub message: String,
    pub secret: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportSubmission {
    #[serde(skip)]
    pub letter_id: String,
    pub email: String,
    #[serde(rename = "type")]
    pub kind: i32,
    pub details: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LoginGrant {
    pub moderator: bool,
    pub viewer: bool,
    pub token: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    PageFetched {
        request_id: RequestId,
        result: Result<Vec<LetterRecord>, ApiError>,
    },
    AvailabilityChecked(Result<bool, ApiError>),
    LetterSubmitted(Result<(), ApiError>),
    LoggedIn(Result<LoginGrant, ApiError>),
    ReportSubmitted(Result<(), ApiError>),
}
