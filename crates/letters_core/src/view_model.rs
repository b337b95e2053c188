use crate::{LoginDiagnostic, Route, SubmissionDiagnostic};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub route: Route,
    pub session: SessionView,
    pub dashboard: Option<DashboardView>,
    pub submission: SubmissionView,
    pub login: LoginView,
    pub report_notice: Option<String>,
    pub dirty: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SessionView {
    pub logged_in: bool,
    pub viewer: bool,
    pub moderator: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DashboardView {
    /// Reading from the endpoint that includes secret letters.
    pub privileged: bool,
    pub rows: Vec<LetterRow>,
    /// Letters actually received, placeholders excluded.
    pub confirmed: usize,
    pub initial_loading: bool,
    pub loading_more: bool,
    pub exhausted: bool,
    pub show_load_more: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LetterRow {
    pub id: Option<String>,
    pub author: String,
    pub message: String,
    pub secret: bool,
    pub created_at: String,
    /// Rendered as a loading skeleton.
    pub placeholder: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SubmissionView {
    pub author: String,
    pub message: String,
    pub message_chars: usize,
    pub secret: bool,
    pub diagnostic: SubmissionDiagnostic,
    pub disabled: bool,
    pub submitted: bool,
    pub unavailable: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LoginView {
    pub username: String,
    pub password_len: usize,
    pub diagnostic: Option<LoginDiagnostic>,
    pub disabled: bool,
}
