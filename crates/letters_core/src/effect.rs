use crate::{FetchFailure, LetterDraft, LetterEndpoint, ReportDraft, RequestId, SessionFlags};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    FetchPage {
        request: RequestId,
        endpoint: LetterEndpoint,
        offset: usize,
    },
    CancelFetch {
        request: RequestId,
    },
    RefreshLayout,
    ReportFetchFailure {
        request: RequestId,
        failure: FetchFailure,
    },
    CheckAvailability,
    SubmitLetter(LetterDraft),
    Login {
        username: String,
        password: String,
    },
    PersistSession(SessionFlags),
    SubmitReport(ReportDraft),
    Quit,
}
