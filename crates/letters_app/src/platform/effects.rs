use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use letters_core::{
    Effect, FetchFailure, Letter, LetterEndpoint, LoginGrant, Msg, SessionFlags,
};
use letters_engine::{
    ApiError, ClientSettings, Credential, EngineEvent, EngineHandle, LetterRecord,
    LetterSubmission, LettersEndpoint, PageRequest, ReportSubmission,
};
use letters_logging::{letters_debug, letters_error, letters_info, letters_warn};

use super::persistence;

/// What the event loop should do after a batch of effects ran.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunOutcome {
    pub relayout: bool,
    pub quit: bool,
}

pub struct EffectRunner {
    engine: EngineHandle,
    session_file: PathBuf,
    credential: Option<Credential>,
}

impl EffectRunner {
    pub fn new(
        settings: ClientSettings,
        session_file: PathBuf,
        session: &SessionFlags,
        msg_tx: mpsc::Sender<Msg>,
    ) -> Result<Self, ApiError> {
        let engine = EngineHandle::new(settings)?;
        let runner = Self {
            engine,
            session_file,
            credential: session.token.clone().map(Credential::new),
        };
        runner.spawn_event_loop(msg_tx);
        Ok(runner)
    }

    pub fn run(&mut self, effects: Vec<Effect>) -> RunOutcome {
        let mut outcome = RunOutcome::default();
        for effect in effects {
            match effect {
                Effect::FetchPage {
                    request,
                    endpoint,
                    offset,
                } => {
                    letters_info!(
                        "FetchPage request={} endpoint={:?} offset={}",
                        request,
                        endpoint,
                        offset
                    );
                    let page = PageRequest {
                        endpoint: map_endpoint(endpoint),
                        offset,
                    };
                    self.engine.fetch_page(request, page, self.credential.clone());
                }
                Effect::CancelFetch { request } => {
                    letters_debug!("CancelFetch request={}", request);
                    self.engine.cancel_fetch(request);
                }
                Effect::RefreshLayout => outcome.relayout = true,
                Effect::ReportFetchFailure { request, failure } => {
                    letters_warn!("Letters request {} failed: {}", request, failure);
                }
                Effect::CheckAvailability => self.engine.check_availability(),
                Effect::SubmitLetter(draft) => {
                    self.engine.submit_letter(LetterSubmission {
                        author: draft.author,
                        message: draft.message,
                        secret: draft.secret,
                    });
                }
                Effect::Login { username, password } => {
                    letters_info!("Login attempt for {}", username);
                    self.engine.login(username, password);
                }
                Effect::PersistSession(session) => {
                    self.credential = session.token.clone().map(Credential::new);
                    if let Err(err) = persistence::save_session(&self.session_file, &session) {
                        letters_error!(
                            "Failed to save session to {:?}: {}",
                            self.session_file,
                            err
                        );
                    }
                }
                Effect::SubmitReport(draft) => {
                    self.engine.submit_report(ReportSubmission {
                        letter_id: draft.letter_id,
                        email: draft.email,
                        kind: draft.kind.code(),
                        details: draft.details,
                    });
                }
                Effect::Quit => outcome.quit = true,
            }
        }
        outcome
    }

    fn spawn_event_loop(&self, msg_tx: mpsc::Sender<Msg>) {
        let engine = self.engine.clone();
        thread::spawn(move || loop {
            let Some(event) = engine.recv_timeout(Duration::from_millis(100)) else {
                continue;
            };
            if msg_tx.send(map_event(event)).is_err() {
                break;
            }
        });
    }
}

pub(crate) fn map_event(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::PageFetched { request_id, result } => match result {
            Ok(records) => Msg::PageLoaded {
                request: request_id,
                page: records.into_iter().map(map_letter).collect(),
            },
            Err(err) => Msg::PageFailed {
                request: request_id,
                failure: map_failure(err),
            },
        },
        EngineEvent::AvailabilityChecked(result) => {
            Msg::AvailabilityLoaded(result.map_err(map_failure))
        }
        EngineEvent::LetterSubmitted(result) => Msg::SubmitFinished(result.map_err(map_failure)),
        EngineEvent::LoggedIn(result) => Msg::LoginFinished(
            result
                .map(|grant| LoginGrant {
                    moderator: grant.moderator,
                    viewer: grant.viewer,
                    token: grant.token,
                })
                .map_err(map_failure),
        ),
        EngineEvent::ReportSubmitted(result) => Msg::ReportFinished(result.map_err(map_failure)),
    }
}

fn map_letter(record: LetterRecord) -> Letter {
    Letter {
        id: Some(record.id),
        author: record.author,
        message: record.message,
        secret: record.secret,
        created_at: record.created_at,
    }
}

fn map_failure(err: ApiError) -> FetchFailure {
    match err {
        ApiError::Cancelled => FetchFailure::Cancelled,
        ApiError::RateLimited => FetchFailure::RateLimited,
        ApiError::Server { status, message } => FetchFailure::Server { status, message },
        ApiError::Payload(detail) => FetchFailure::Malformed(detail),
        ApiError::Timeout => FetchFailure::Network("request timed out".to_string()),
        ApiError::Network(detail) | ApiError::InvalidUrl(detail) => FetchFailure::Network(detail),
    }
}

fn map_endpoint(endpoint: LetterEndpoint) -> LettersEndpoint {
    match endpoint {
        LetterEndpoint::Public => LettersEndpoint::Public,
        LetterEndpoint::Privileged => LettersEndpoint::Privileged,
    }
}
