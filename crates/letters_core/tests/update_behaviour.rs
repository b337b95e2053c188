use std::sync::Once;

use letters_core::{
    update, AppState, Effect, FetchFailure, Letter, LetterEndpoint, LoginGrant, Msg, ReportKind,
    Route, SessionFlags, PAGE_SIZE,
};
use pretty_assertions::assert_eq;

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(letters_logging::initialize_for_tests);
}

fn letters(from: usize, count: usize) -> Vec<Letter> {
    (from..from + count)
        .map(|n| Letter {
            id: Some(format!("id-{n}")),
            author: format!("author {n}"),
            message: format!("message {n}"),
            secret: n % 2 == 0,
            created_at: "2022-10-01T12:00:00".to_string(),
        })
        .collect()
}

fn fetch_request(effects: &[Effect]) -> u64 {
    effects
        .iter()
        .find_map(|effect| match effect {
            Effect::FetchPage { request, .. } => Some(*request),
            _ => None,
        })
        .expect("fetch effect")
}

fn open_dashboard(state: AppState) -> (AppState, u64) {
    let (state, effects) = update(state, Msg::Navigate(Route::Dashboard));
    let request = fetch_request(&effects);
    (state, request)
}

#[test]
fn update_is_noop() {
    let state = AppState::new();
    let (next, effects) = update(state.clone(), Msg::NoOp);

    assert_eq!(state, next);
    assert!(effects.is_empty());
}

#[test]
fn entering_submission_checks_availability_once() {
    init_logging();
    let (state, effects) = update(AppState::new(), Msg::Navigate(Route::Submission));
    assert_eq!(effects, vec![Effect::CheckAvailability]);

    let (state, _) = update(state, Msg::Navigate(Route::Login));
    let (_state, effects) = update(state, Msg::Navigate(Route::Submission));
    assert!(effects.is_empty());
}

#[test]
fn scenario_full_first_page_shows_load_more() {
    init_logging();
    let (state, request) = open_dashboard(AppState::new());
    let view = state.view();
    let dashboard = view.dashboard.expect("dashboard mounted");
    assert!(dashboard.initial_loading);
    assert!(!dashboard.show_load_more);

    let (mut state, effects) = update(
        state,
        Msg::PageLoaded {
            request,
            page: letters(0, PAGE_SIZE),
        },
    );
    assert!(effects.is_empty());
    assert!(state.consume_dirty());

    let dashboard = state.view().dashboard.unwrap();
    assert!(!dashboard.initial_loading);
    assert_eq!(dashboard.confirmed, 10);
    assert!(!dashboard.exhausted);
    assert!(dashboard.show_load_more);
}

#[test]
fn scenario_short_first_page_hides_load_more() {
    let (state, request) = open_dashboard(AppState::new());
    let (state, _) = update(
        state,
        Msg::PageLoaded {
            request,
            page: letters(0, 7),
        },
    );

    let dashboard = state.view().dashboard.unwrap();
    assert!(dashboard.exhausted);
    assert!(!dashboard.show_load_more);
}

#[test]
fn scenario_load_more_renders_skeletons_then_appends() {
    init_logging();
    let (state, request) = open_dashboard(AppState::new());
    let (state, _) = update(
        state,
        Msg::PageLoaded {
            request,
            page: letters(0, PAGE_SIZE),
        },
    );

    let (state, effects) = update(state, Msg::LoadMoreClicked);
    let next_request = fetch_request(&effects);
    assert_eq!(
        effects,
        vec![Effect::FetchPage {
            request: next_request,
            endpoint: LetterEndpoint::Public,
            offset: 10,
        }]
    );
    let dashboard = state.view().dashboard.unwrap();
    assert!(dashboard.loading_more);
    assert!(!dashboard.show_load_more);
    assert_eq!(dashboard.rows.iter().filter(|r| r.placeholder).count(), 10);

    let (state, again) = update(state, Msg::LoadMoreClicked);
    assert!(again.is_empty());

    let (state, effects) = update(
        state,
        Msg::PageLoaded {
            request: next_request,
            page: letters(10, PAGE_SIZE),
        },
    );
    assert_eq!(effects, vec![Effect::RefreshLayout]);
    let dashboard = state.view().dashboard.unwrap();
    assert_eq!(dashboard.rows.len(), 20);
    assert_eq!(dashboard.confirmed, 20);
    assert!(!dashboard.exhausted);
}

#[test]
fn scenario_failed_load_more_reports_and_allows_retry() {
    let (state, request) = open_dashboard(AppState::new());
    let (state, _) = update(
        state,
        Msg::PageLoaded {
            request,
            page: letters(0, PAGE_SIZE),
        },
    );
    let (state, effects) = update(state, Msg::LoadMoreClicked);
    let next_request = fetch_request(&effects);

    let failure = FetchFailure::Server {
        status: 503,
        message: None,
    };
    let (state, effects) = update(
        state,
        Msg::PageFailed {
            request: next_request,
            failure: failure.clone(),
        },
    );
    assert_eq!(
        effects,
        vec![Effect::ReportFetchFailure {
            request: next_request,
            failure,
        }]
    );
    let dashboard = state.view().dashboard.unwrap();
    assert_eq!(dashboard.rows.len(), 10);
    assert_eq!(dashboard.confirmed, 10);
    assert!(!dashboard.loading_more);
    assert!(dashboard.show_load_more);
}

#[test]
fn scenario_leaving_dashboard_cancels_and_ignores_late_page() {
    init_logging();
    let (state, request) = open_dashboard(AppState::new());

    let (state, effects) = update(state, Msg::Navigate(Route::Login));
    assert_eq!(effects, vec![Effect::CancelFetch { request }]);

    let before = state.clone();
    let (after, effects) = update(
        state,
        Msg::PageLoaded {
            request,
            page: letters(0, PAGE_SIZE),
        },
    );
    assert_eq!(after, before);
    assert!(effects.is_empty());
}

#[test]
fn remounted_dashboard_ignores_previous_mount_results() {
    let (state, first) = open_dashboard(AppState::new());
    let (state, _) = update(state, Msg::Navigate(Route::Submission));
    let (state, second) = open_dashboard(state);
    assert_ne!(first, second);

    let (state, _) = update(
        state,
        Msg::PageLoaded {
            request: first,
            page: letters(0, 3),
        },
    );
    let dashboard = state.view().dashboard.unwrap();
    assert!(dashboard.initial_loading);
    assert!(dashboard.rows.is_empty());
}

#[test]
fn endpoint_is_chosen_from_session_at_mount() {
    let session = SessionFlags {
        viewer: true,
        moderator: false,
        token: Some("jwt".to_string()),
    };
    let (state, effects) = update(
        AppState::with_session(session),
        Msg::Navigate(Route::Dashboard),
    );
    assert!(matches!(
        effects.as_slice(),
        [Effect::FetchPage {
            endpoint: LetterEndpoint::Privileged,
            offset: 0,
            ..
        }]
    ));

    // A session change does not switch the endpoint of a live list.
    let (state, _) = update(state, Msg::SessionRestored(SessionFlags::default()));
    assert!(state.view().dashboard.unwrap().privileged);
}

#[test]
fn quit_cancels_dashboard_request() {
    let (state, request) = open_dashboard(AppState::new());
    let (_state, effects) = update(state, Msg::QuitRequested);
    assert_eq!(
        effects,
        vec![Effect::CancelFetch { request }, Effect::Quit]
    );
}

#[test]
fn successful_viewer_login_persists_and_opens_privileged_dashboard() {
    init_logging();
    let (state, _) = update(AppState::new(), Msg::Navigate(Route::Login));
    let (state, _) = update(state, Msg::UsernameChanged("mod".into()));
    let (state, _) = update(state, Msg::PasswordChanged("hunter2hunter2".into()));
    let (state, effects) = update(state, Msg::LoginClicked);
    assert_eq!(
        effects,
        vec![Effect::Login {
            username: "mod".into(),
            password: "hunter2hunter2".into(),
        }]
    );
    assert!(state.view().login.disabled);

    let grant = LoginGrant {
        moderator: false,
        viewer: true,
        token: Some("jwt".into()),
    };
    let (state, effects) = update(state, Msg::LoginFinished(Ok(grant)));
    let session = SessionFlags {
        viewer: true,
        moderator: false,
        token: Some("jwt".into()),
    };
    assert_eq!(effects[0], Effect::PersistSession(session.clone()));
    assert!(matches!(
        effects[1],
        Effect::FetchPage {
            endpoint: LetterEndpoint::Privileged,
            ..
        }
    ));
    assert_eq!(state.route(), Route::Dashboard);
    assert_eq!(state.session(), &session);
}

#[test]
fn moderator_login_lands_on_reports() {
    let (state, _) = update(AppState::new(), Msg::Navigate(Route::Login));
    let (state, _) = update(state, Msg::UsernameChanged("root".into()));
    let (state, _) = update(state, Msg::PasswordChanged("pw".into()));
    let (state, _) = update(state, Msg::LoginClicked);
    let grant = LoginGrant {
        moderator: true,
        viewer: true,
        token: None,
    };
    let (state, effects) = update(state, Msg::LoginFinished(Ok(grant)));

    assert_eq!(state.route(), Route::Reports);
    assert_eq!(effects.len(), 1);
}

#[test]
fn logout_clears_session() {
    let session = SessionFlags {
        viewer: true,
        moderator: true,
        token: Some("jwt".into()),
    };
    let (state, effects) = update(AppState::with_session(session), Msg::LogoutClicked);
    assert_eq!(
        effects,
        vec![Effect::PersistSession(SessionFlags::default())]
    );
    assert_eq!(state.route(), Route::Login);
    assert_eq!(state.session(), &SessionFlags::default());
}

#[test]
fn report_requires_persisted_letter() {
    let (state, request) = open_dashboard(AppState::new());
    let (state, _) = update(
        state,
        Msg::PageLoaded {
            request,
            page: letters(0, PAGE_SIZE),
        },
    );
    let (state, _) = update(state, Msg::LoadMoreClicked);

    // Index 12 is a loading placeholder.
    let (state, effects) = update(
        state,
        Msg::ReportRequested {
            index: 12,
            email: "me@example.com".into(),
            kind: ReportKind::Spam,
            details: "advertising".into(),
        },
    );
    assert!(effects.is_empty());
    assert_eq!(
        state.view().report_notice.as_deref(),
        Some("That letter cannot be reported")
    );

    let (state, effects) = update(
        state,
        Msg::ReportRequested {
            index: 2,
            email: "me@example.com".into(),
            kind: ReportKind::Abuse,
            details: "rude".into(),
        },
    );
    assert!(matches!(
        effects.as_slice(),
        [Effect::SubmitReport(draft)] if draft.letter_id == "id-2" && draft.kind == ReportKind::Abuse
    ));

    let (state, _) = update(state, Msg::ReportFinished(Err(FetchFailure::RateLimited)));
    assert_eq!(
        state.view().report_notice.as_deref(),
        Some("You're being ratelimited!")
    );
}
