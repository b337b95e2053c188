//! Incremental letter list: a pure `(state, event) -> (state, effects)` machine.
//!
//! The list owns the accumulated letters, the offset cursor and the loading
//! flags. It never performs IO; fetches and cancellations are returned as
//! [`ListEffect`]s for the caller to execute.

use crate::{FetchFailure, Letter};

/// Number of letters the server returns per page.
pub const PAGE_SIZE: usize = 10;

pub type RequestId = u64;

/// Which letters endpoint the list reads from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LetterEndpoint {
    /// `GET /api/letters`, non-secret letters only.
    #[default]
    Public,
    /// `GET /api/letters/all`, includes secret letters. Needs a credential.
    Privileged,
}

/// Fixed per mount; the endpoint never changes between pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ListConfig {
    pub endpoint: LetterEndpoint,
}

impl ListConfig {
    pub fn for_viewer(viewer: bool) -> Self {
        let endpoint = if viewer {
            LetterEndpoint::Privileged
        } else {
            LetterEndpoint::Public
        };
        Self { endpoint }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListPhase {
    Idle,
    LoadingInitial,
    Ready,
    LoadingMore,
    Exhausted,
    Unmounted,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListEvent {
    /// View mounted. Issues the first page request.
    Start { request: RequestId },
    /// User asked for the next page.
    LoadMore { request: RequestId },
    PageLoaded {
        request: RequestId,
        page: Vec<Letter>,
    },
    PageFailed {
        request: RequestId,
        failure: FetchFailure,
    },
    /// View torn down. Cancels whatever is in flight; later events are ignored.
    Unmount,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListEffect {
    Fetch {
        request: RequestId,
        endpoint: LetterEndpoint,
        offset: usize,
    },
    Cancel {
        request: RequestId,
    },
    /// Appended rows changed the list height; containers should re-measure.
    RefreshLayout,
    ReportFailure {
        request: RequestId,
        failure: FetchFailure,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ListState {
    config: ListConfig,
    items: Vec<Letter>,
    offset: usize,
    initial_loading: bool,
    loading_more: bool,
    exhausted: bool,
    started: bool,
    unmounted: bool,
    in_flight: Option<RequestId>,
}

impl ListState {
    pub fn new(config: ListConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn config(&self) -> ListConfig {
        self.config
    }

    /// Rendered entries, placeholders included.
    pub fn items(&self) -> &[Letter] {
        &self.items
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn initial_loading(&self) -> bool {
        self.initial_loading
    }

    pub fn loading_more(&self) -> bool {
        self.loading_more
    }

    pub fn exhausted(&self) -> bool {
        self.exhausted
    }

    pub fn in_flight(&self) -> Option<RequestId> {
        self.in_flight
    }

    pub fn phase(&self) -> ListPhase {
        if self.unmounted {
            ListPhase::Unmounted
        } else if !self.started {
            ListPhase::Idle
        } else if self.initial_loading {
            ListPhase::LoadingInitial
        } else if self.loading_more {
            ListPhase::LoadingMore
        } else if self.exhausted {
            ListPhase::Exhausted
        } else {
            ListPhase::Ready
        }
    }

    /// Whether a "load more" affordance should be offered right now.
    pub fn can_load_more(&self) -> bool {
        self.phase() == ListPhase::Ready && self.in_flight.is_none()
    }

    fn issue(&mut self, request: RequestId, offset: usize) -> Vec<ListEffect> {
        let mut effects = Vec::with_capacity(2);
        if let Some(previous) = self.in_flight.replace(request) {
            effects.push(ListEffect::Cancel { request: previous });
        }
        effects.push(ListEffect::Fetch {
            request,
            endpoint: self.config.endpoint,
            offset,
        });
        effects
    }

    fn discard_placeholders(&mut self) {
        self.items.retain(|letter| !letter.is_placeholder());
    }

    fn settle(&mut self, request: RequestId) -> bool {
        if self.in_flight != Some(request) {
            return false;
        }
        self.in_flight = None;
        true
    }
}

/// Applies one event to the list and returns the effects it asks for.
pub fn transition(mut state: ListState, event: ListEvent) -> (ListState, Vec<ListEffect>) {
    if state.unmounted {
        return (state, Vec::new());
    }

    let effects = match event {
        ListEvent::Start { request } => {
            if state.started {
                return (state, Vec::new());
            }
            state.started = true;
            state.initial_loading = true;
            state.issue(request, 0)
        }
        ListEvent::LoadMore { request } => {
            if !state.can_load_more() {
                return (state, Vec::new());
            }
            state.loading_more = true;
            state
                .items
                .extend(std::iter::repeat_with(Letter::placeholder).take(PAGE_SIZE));
            let offset = state.offset;
            state.issue(request, offset)
        }
        ListEvent::PageLoaded { request, page } => {
            if !state.settle(request) {
                return (state, Vec::new());
            }
            state.discard_placeholders();
            let received = page.len();
            let appended = state.loading_more;
            if state.initial_loading {
                state.items = page;
                state.offset = received;
            } else {
                state.items.extend(page);
                state.offset += received;
            }
            if received < PAGE_SIZE {
                state.exhausted = true;
            }
            state.initial_loading = false;
            state.loading_more = false;
            if appended {
                vec![ListEffect::RefreshLayout]
            } else {
                Vec::new()
            }
        }
        ListEvent::PageFailed { request, failure } => {
            if !state.settle(request) {
                return (state, Vec::new());
            }
            if failure.is_cancelled() {
                return (state, Vec::new());
            }
            state.discard_placeholders();
            state.initial_loading = false;
            state.loading_more = false;
            vec![ListEffect::ReportFailure { request, failure }]
        }
        ListEvent::Unmount => {
            state.unmounted = true;
            state
                .in_flight
                .take()
                .map(|request| vec![ListEffect::Cancel { request }])
                .unwrap_or_default()
        }
    };

    (state, effects)
}
