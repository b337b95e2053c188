use crate::list::{self, ListConfig, ListEffect, ListEvent, ListState, RequestId};
use crate::view_model::{
    AppViewModel, DashboardView, LetterRow, LoginView, SessionView, SubmissionView,
};
use crate::{Effect, LoginForm, SubmissionForm};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Route {
    #[default]
    Submission,
    Login,
    Dashboard,
    /// Moderator landing page.
    Reports,
}

/// Privileges and credential kept across runs.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SessionFlags {
    pub viewer: bool,
    pub moderator: bool,
    pub token: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    route: Route,
    entered: bool,
    session: SessionFlags,
    dashboard: Option<ListState>,
    pub(crate) submission: SubmissionForm,
    pub(crate) login: LoginForm,
    available: Option<bool>,
    availability_requested: bool,
    report_notice: Option<String>,
    report_pending: bool,
    next_request: RequestId,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_session(session: SessionFlags) -> Self {
        Self {
            session,
            ..Self::default()
        }
    }

    pub fn route(&self) -> Route {
        self.route
    }

    pub fn session(&self) -> &SessionFlags {
        &self.session
    }

    pub fn dashboard(&self) -> Option<&ListState> {
        self.dashboard.as_ref()
    }

    pub fn available(&self) -> Option<bool> {
        self.available
    }

    /// Returns and clears the dirty flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn set_session(&mut self, session: SessionFlags) {
        self.session = session;
        self.mark_dirty();
    }

    pub(crate) fn set_available(&mut self, available: Option<bool>) {
        self.available = available;
        self.mark_dirty();
    }

    pub(crate) fn set_report_notice(&mut self, notice: impl Into<String>) {
        self.report_notice = Some(notice.into());
        self.mark_dirty();
    }

    pub(crate) fn report_pending(&self) -> bool {
        self.report_pending
    }

    pub(crate) fn set_report_pending(&mut self, pending: bool) {
        self.report_pending = pending;
    }

    fn allocate_request(&mut self) -> RequestId {
        self.next_request += 1;
        self.next_request
    }

    /// Leaves the current route and enters `route`.
    ///
    /// Re-entering the current route is a no-op so the dashboard keeps its
    /// endpoint and pages for the lifetime of one mount.
    pub(crate) fn navigate(&mut self, route: Route) -> Vec<Effect> {
        if self.entered && route == self.route {
            return Vec::new();
        }

        let mut effects = self.unmount_dashboard();
        self.entered = true;
        self.route = route;
        self.report_notice = None;
        self.mark_dirty();

        match route {
            Route::Dashboard => {
                let config = ListConfig::for_viewer(self.session.viewer);
                self.dashboard = Some(ListState::new(config));
                let request = self.allocate_request();
                effects.extend(self.apply_list_event(ListEvent::Start { request }));
            }
            Route::Submission => {
                self.submission = SubmissionForm::default();
                if !self.availability_requested {
                    self.availability_requested = true;
                    effects.push(Effect::CheckAvailability);
                }
            }
            Route::Login => {
                self.login = LoginForm::default();
            }
            Route::Reports => {}
        }
        effects
    }

    pub(crate) fn unmount_dashboard(&mut self) -> Vec<Effect> {
        let effects = self.apply_list_event(ListEvent::Unmount);
        self.dashboard = None;
        effects
    }

    pub(crate) fn load_more(&mut self) -> Vec<Effect> {
        match &self.dashboard {
            Some(list) if list.can_load_more() => {
                let request = self.allocate_request();
                self.apply_list_event(ListEvent::LoadMore { request })
            }
            _ => Vec::new(),
        }
    }

    /// Feeds an event to the mounted list, if any, and lifts its effects.
    pub(crate) fn apply_list_event(&mut self, event: ListEvent) -> Vec<Effect> {
        let Some(list) = self.dashboard.take() else {
            return Vec::new();
        };
        let before = list.clone();
        let (list, effects) = list::transition(list, event);
        if list != before {
            self.mark_dirty();
        }
        self.dashboard = Some(list);
        effects.into_iter().map(lift_list_effect).collect()
    }

    pub fn view(&self) -> AppViewModel {
        AppViewModel {
            route: self.route,
            session: SessionView {
                logged_in: self.session.token.is_some(),
                viewer: self.session.viewer,
                moderator: self.session.moderator,
            },
            dashboard: self.dashboard.as_ref().map(dashboard_view),
            submission: SubmissionView {
                author: self.submission.author.clone(),
                message: self.submission.message.clone(),
                message_chars: self.submission.message.chars().count(),
                secret: self.submission.secret,
                diagnostic: self.submission.diagnostic.clone(),
                disabled: self.submission.pending,
                submitted: self.submission.submitted,
                unavailable: self.available == Some(false),
            },
            login: LoginView {
                username: self.login.username.clone(),
                password_len: self.login.password.chars().count(),
                diagnostic: self.login.diagnostic.clone(),
                disabled: self.login.pending,
            },
            report_notice: self.report_notice.clone(),
            dirty: self.dirty,
        }
    }
}

fn lift_list_effect(effect: ListEffect) -> Effect {
    match effect {
        ListEffect::Fetch {
            request,
            endpoint,
            offset,
        } => Effect::FetchPage {
            request,
            endpoint,
            offset,
        },
        ListEffect::Cancel { request } => Effect::CancelFetch { request },
        ListEffect::RefreshLayout => Effect::RefreshLayout,
        ListEffect::ReportFailure { request, failure } => {
            Effect::ReportFetchFailure { request, failure }
        }
    }
}

fn dashboard_view(list: &ListState) -> DashboardView {
    let privileged = list.config().endpoint == crate::LetterEndpoint::Privileged;
    let rows = list
        .items()
        .iter()
        .map(|letter| LetterRow {
            id: letter.id.clone(),
            author: letter.author.clone(),
            message: letter.message.clone(),
            secret: letter.secret,
            created_at: letter.created_at.clone(),
            placeholder: letter.is_placeholder(),
        })
        .collect();
    DashboardView {
        privileged,
        rows,
        confirmed: list.offset(),
        initial_loading: list.initial_loading(),
        loading_more: list.loading_more(),
        exhausted: list.exhausted(),
        show_load_more: list.can_load_more(),
    }
}
