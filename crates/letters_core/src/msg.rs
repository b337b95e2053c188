use crate::{FetchFailure, Letter, LoginGrant, ReportKind, RequestId, Route, SessionFlags};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// Session flags read from durable storage at start-up.
    SessionRestored(SessionFlags),
    /// User switched pages.
    Navigate(Route),
    /// User pressed "load more" on the dashboard.
    LoadMoreClicked,
    /// Engine delivered a page for a dashboard request.
    PageLoaded {
        request: RequestId,
        page: Vec<Letter>,
    },
    /// Engine reported a failed dashboard request.
    PageFailed {
        request: RequestId,
        failure: FetchFailure,
    },
    /// Result of `GET /api/available`.
    AvailabilityLoaded(Result<bool, FetchFailure>),
    AuthorChanged(String),
    MessageChanged(String),
    SecretChanged(bool),
    SubmitClicked,
    SubmitFinished(Result<(), FetchFailure>),
    UsernameChanged(String),
    PasswordChanged(String),
    LoginClicked,
    LoginFinished(Result<LoginGrant, FetchFailure>),
    LogoutClicked,
    /// User reported the dashboard entry at `index`.
    ReportRequested {
        index: usize,
        email: String,
        kind: ReportKind,
        details: String,
    },
    ReportFinished(Result<(), FetchFailure>),
    QuitRequested,
    /// Fallback for placeholder wiring.
    NoOp,
}
