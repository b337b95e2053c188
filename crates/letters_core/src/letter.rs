/// A letter as shown on the dashboard.
///
/// Persisted letters always carry an `id`. Entries without one are loading
/// placeholders that only exist while a page request is in flight.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Letter {
    pub id: Option<String>,
    pub author: String,
    pub message: String,
    pub secret: bool,
    /// ISO-8601 creation timestamp as sent by the server.
    pub created_at: String,
}

impl Letter {
    pub fn placeholder() -> Self {
        Self::default()
    }

    pub fn is_placeholder(&self) -> bool {
        self.id.is_none()
    }
}

/// Outcome of a failed request, as seen by the pure state layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchFailure {
    /// The request was aborted on purpose. Never shown to the user.
    Cancelled,
    /// Transport failure (connection, timeout).
    Network(String),
    /// HTTP 429.
    RateLimited,
    /// Any other non-2xx status, with the server's `message` when it sent one.
    Server {
        status: u16,
        message: Option<String>,
    },
    /// 2xx response whose body could not be decoded.
    Malformed(String),
}

impl FetchFailure {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, FetchFailure::Cancelled)
    }

    pub fn server_message(&self) -> Option<&str> {
        match self {
            FetchFailure::Server {
                message: Some(message),
                ..
            } if !message.is_empty() => Some(message),
            _ => None,
        }
    }
}

impl std::fmt::Display for FetchFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FetchFailure::Cancelled => write!(f, "cancelled"),
            FetchFailure::Network(detail) => write!(f, "network error: {detail}"),
            FetchFailure::RateLimited => write!(f, "rate limited"),
            FetchFailure::Server { status, message } => match message {
                Some(message) => write!(f, "server error {status}: {message}"),
                None => write!(f, "server error {status}"),
            },
            FetchFailure::Malformed(detail) => write!(f, "malformed response: {detail}"),
        }
    }
}
