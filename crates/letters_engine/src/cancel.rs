use tokio_util::sync::CancellationToken;

use crate::RequestId;

/// Cancellation handle for one issued request.
#[derive(Debug, Clone)]
pub struct CancelHandle {
    request_id: RequestId,
    token: CancellationToken,
}

impl CancelHandle {
    pub fn request_id(&self) -> RequestId {
        self.request_id
    }

    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }
}

/// Keeps at most one request in flight per consumer.
///
/// Issuing a new request cancels the previous handle first. Cancelling a handle
/// that already completed or was already cancelled does nothing.
#[derive(Debug, Default)]
pub struct RequestCanceller {
    current: Option<CancelHandle>,
}

impl RequestCanceller {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn issue(&mut self, request_id: RequestId) -> CancelHandle {
        if let Some(previous) = self.current.take() {
            previous.token.cancel();
        }
        let handle = CancelHandle {
            request_id,
            token: CancellationToken::new(),
        };
        self.current = Some(handle.clone());
        handle
    }

    pub fn cancel(&mut self, handle: &CancelHandle) {
        handle.token.cancel();
        if self.in_flight() == Some(handle.request_id) {
            self.current = None;
        }
    }

    /// Cancels the current handle if it belongs to `request_id`.
    pub fn cancel_request(&mut self, request_id: RequestId) -> bool {
        match self.current.take() {
            Some(handle) if handle.request_id == request_id => {
                handle.token.cancel();
                true
            }
            other => {
                self.current = other;
                false
            }
        }
    }

    /// Drops the handle of a finished request without cancelling it.
    pub fn forget(&mut self, request_id: RequestId) {
        if self.in_flight() == Some(request_id) {
            self.current = None;
        }
    }

    pub fn cancel_all(&mut self) {
        if let Some(handle) = self.current.take() {
            handle.token.cancel();
        }
    }

    pub fn in_flight(&self) -> Option<RequestId> {
        self.current.as_ref().map(|handle| handle.request_id)
    }
}
