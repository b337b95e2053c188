use std::sync::{mpsc, Arc, Mutex};
use std::thread;
use std::time::Duration;

use letters_logging::letters_debug;

use crate::cancel::RequestCanceller;
use crate::fetch::{ApiClient, ClientSettings, PageFetcher};
use crate::{
    ApiError, Credential, EngineEvent, LetterSubmission, PageRequest, ReportSubmission, RequestId,
};

enum EngineCommand {
    FetchPage {
        request_id: RequestId,
        request: PageRequest,
        auth: Option<Credential>,
    },
    CancelFetch {
        request_id: RequestId,
    },
    CheckAvailability,
    SubmitLetter(LetterSubmission),
    Login {
        username: String,
        password: String,
    },
    SubmitReport(ReportSubmission),
}

/// Runs API calls on a background tokio runtime and reports back as events.
///
/// Page fetches are single-flight: a new fetch cancels the previous one, and a
/// cancelled fetch never produces an event.
#[derive(Clone)]
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: Arc<Mutex<mpsc::Receiver<EngineEvent>>>,
}

impl EngineHandle {
    pub fn new(settings: ClientSettings) -> Result<Self, ApiError> {
        let client = Arc::new(ApiClient::new(&settings)?);
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        // Fetch tasks report the ids they finished so the canceller can drop them.
        let (settled_tx, settled_rx) = mpsc::channel::<RequestId>();

        thread::spawn(move || {
            let runtime = tokio::runtime::Runtime::new().expect("tokio runtime");
            let mut canceller = RequestCanceller::new();
            while let Ok(command) = cmd_rx.recv() {
                while let Ok(request_id) = settled_rx.try_recv() {
                    canceller.forget(request_id);
                }
                handle_command(
                    &runtime,
                    &mut canceller,
                    &client,
                    command,
                    &event_tx,
                    &settled_tx,
                );
            }
            canceller.cancel_all();
        });

        Ok(Self {
            cmd_tx,
            event_rx: Arc::new(Mutex::new(event_rx)),
        })
    }

    pub fn fetch_page(
        &self,
        request_id: RequestId,
        request: PageRequest,
        auth: Option<Credential>,
    ) {
        let _ = self.cmd_tx.send(EngineCommand::FetchPage {
            request_id,
            request,
            auth,
        });
    }

    pub fn cancel_fetch(&self, request_id: RequestId) {
        let _ = self.cmd_tx.send(EngineCommand::CancelFetch { request_id });
    }

    pub fn check_availability(&self) {
        let _ = self.cmd_tx.send(EngineCommand::CheckAvailability);
    }

    pub fn submit_letter(&self, letter: LetterSubmission) {
        let _ = self.cmd_tx.send(EngineCommand::SubmitLetter(letter));
    }

    pub fn login(&self, username: impl Into<String>, password: impl Into<String>) {
        let _ = self.cmd_tx.send(EngineCommand::Login {
            username: username.into(),
            password: password.into(),
        });
    }

    pub fn submit_report(&self, report: ReportSubmission) {
        let _ = self.cmd_tx.send(EngineCommand::SubmitReport(report));
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.lock().ok()?.try_recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<EngineEvent> {
        self.event_rx.lock().ok()?.recv_timeout(timeout).ok()
    }
}

fn handle_command(
    runtime: &tokio::runtime::Runtime,
    canceller: &mut RequestCanceller,
    client: &Arc<ApiClient>,
    command: EngineCommand,
    event_tx: &mpsc::Sender<EngineEvent>,
    settled_tx: &mpsc::Sender<RequestId>,
) {
    let client = Arc::clone(client);
    let event_tx = event_tx.clone();
    match command {
        EngineCommand::FetchPage {
            request_id,
            request,
            auth,
        } => {
            if let Some(previous) = canceller.in_flight() {
                letters_debug!("[engine] request {} superseded by {}", previous, request_id);
            }
            let handle = canceller.issue(request_id);
            let settled_tx = settled_tx.clone();
            runtime.spawn(async move {
                let result = client
                    .fetch_page(&request, auth.as_ref(), handle.token())
                    .await;
                if handle.is_cancelled() {
                    letters_debug!("[engine] request {} cancelled; dropping result", request_id);
                    return;
                }
                if let Err(err) = &result {
                    letters_debug!("[engine] request {} failed: {}", request_id, err);
                }
                let _ = event_tx.send(EngineEvent::PageFetched { request_id, result });
                let _ = settled_tx.send(request_id);
            });
        }
        EngineCommand::CancelFetch { request_id } => {
            if canceller.cancel_request(request_id) {
                letters_debug!("[engine] request {} cancelled", request_id);
            }
        }
        EngineCommand::CheckAvailability => {
            runtime.spawn(async move {
                let result = client.availability().await;
                let _ = event_tx.send(EngineEvent::AvailabilityChecked(result));
            });
        }
        EngineCommand::SubmitLetter(letter) => {
            runtime.spawn(async move {
                let result = client.submit_letter(&letter).await;
                let _ = event_tx.send(EngineEvent::LetterSubmitted(result));
            });
        }
        EngineCommand::Login { username, password } => {
            runtime.spawn(async move {
                let result = client.login(&username, &password).await;
                let _ = event_tx.send(EngineEvent::LoggedIn(result));
            });
        }
        EngineCommand::SubmitReport(report) => {
            runtime.spawn(async move {
                let result = client.submit_report(&report).await;
                let _ = event_tx.send(EngineEvent::ReportSubmitted(result));
            });
        }
    }
}
