//! Letters core: pure state machines and view-model helpers.
mod effect;
mod forms;
mod letter;
pub mod list;
mod msg;
mod state;
mod update;
mod view_model;

pub use effect::Effect;
pub use forms::{
    LetterDraft, LoginDiagnostic, LoginForm, LoginGrant, ReportDraft, ReportKind,
    SubmissionDiagnostic, SubmissionForm, MAX_MESSAGE_CHARS, MAX_REPORT_DETAILS_CHARS,
    MAX_REPORT_EMAIL_CHARS, MIN_MESSAGE_CHARS, MIN_REPORT_EMAIL_CHARS,
};
pub use letter::{FetchFailure, Letter};
pub use list::{LetterEndpoint, ListConfig, ListPhase, ListState, RequestId, PAGE_SIZE};
pub use msg::Msg;
pub use state::{AppState, Route, SessionFlags};
pub use update::update;
pub use view_model::{
    AppViewModel, DashboardView, LetterRow, LoginView, SessionView, SubmissionView,
};
