//! Letters engine: HTTP calls against the letters API and their cancellation.
mod cancel;
mod engine;
mod error;
mod fetch;
mod types;

pub use cancel::{CancelHandle, RequestCanceller};
pub use engine::EngineHandle;
pub use error::ApiError;
pub use fetch::{cookie_value, ApiClient, ClientSettings, PageFetcher};
pub use types::{
    Credential, EngineEvent, LetterRecord, LetterSubmission, LettersEndpoint, LoginGrant,
    PageRequest, ReportSubmission, RequestId, PAGE_SIZE,
};
