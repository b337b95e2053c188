use crate::forms::report_notice;
use crate::list::ListEvent;
use crate::{AppState, Effect, Msg, ReportDraft, Route, SessionFlags};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::SessionRestored(session) => {
            // Only consulted when the dashboard mounts, so a live list keeps its endpoint.
            state.set_session(session);
            Vec::new()
        }
        Msg::Navigate(route) => state.navigate(route),
        Msg::LoadMoreClicked => state.load_more(),
        Msg::PageLoaded { request, page } => {
            state.apply_list_event(ListEvent::PageLoaded { request, page })
        }
        Msg::PageFailed { request, failure } => {
            state.apply_list_event(ListEvent::PageFailed { request, failure })
        }
        Msg::AvailabilityLoaded(result) => {
            state.set_available(result.ok());
            Vec::new()
        }
        Msg::AuthorChanged(author) => {
            if !state.submission.pending {
                state.submission.author = author;
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::MessageChanged(message) => {
            if !state.submission.pending {
                state.submission.message = message;
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::SecretChanged(secret) => {
            if !state.submission.pending {
                state.submission.secret = secret;
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::SubmitClicked => submit_letter(&mut state),
        Msg::SubmitFinished(outcome) => {
            if state.submission.pending {
                state.submission.apply_outcome(outcome);
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::UsernameChanged(username) => {
            if !state.login.pending {
                state.login.username = username;
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::PasswordChanged(password) => {
            if !state.login.pending {
                state.login.password = password;
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::LoginClicked => {
            if state.login.pending {
                return (state, Vec::new());
            }
            state.mark_dirty();
            match state.login.validate() {
                Ok((username, password)) => {
                    state.login.diagnostic = None;
                    state.login.pending = true;
                    vec![Effect::Login { username, password }]
                }
                Err(diagnostic) => {
                    state.login.diagnostic = Some(diagnostic);
                    Vec::new()
                }
            }
        }
        Msg::LoginFinished(outcome) => {
            if !state.login.pending {
                return (state, Vec::new());
            }
            state.mark_dirty();
            match outcome {
                Ok(grant) => {
                    state.login.pending = false;
                    let session = SessionFlags {
                        viewer: grant.viewer,
                        moderator: grant.moderator,
                        token: grant.token,
                    };
                    state.set_session(session.clone());
                    let landing = if session.moderator {
                        Route::Reports
                    } else {
                        Route::Dashboard
                    };
                    let mut effects = vec![Effect::PersistSession(session)];
                    effects.extend(state.navigate(landing));
                    effects
                }
                Err(failure) => {
                    state.login.apply_failure(&failure);
                    Vec::new()
                }
            }
        }
        Msg::LogoutClicked => {
            if *state.session() == SessionFlags::default() {
                return (state, Vec::new());
            }
            state.set_session(SessionFlags::default());
            let mut effects = vec![Effect::PersistSession(SessionFlags::default())];
            effects.extend(state.navigate(Route::Login));
            effects
        }
        Msg::ReportRequested {
            index,
            email,
            kind,
            details,
        } => {
            if state.report_pending() {
                return (state, Vec::new());
            }
            let letter_id = state
                .dashboard()
                .and_then(|list| list.items().get(index))
                .and_then(|letter| letter.id.clone());
            let Some(letter_id) = letter_id else {
                state.set_report_notice("That letter cannot be reported");
                return (state, Vec::new());
            };
            let draft = ReportDraft {
                letter_id,
                email,
                kind,
                details,
            };
            match draft.validate() {
                Ok(()) => {
                    state.set_report_pending(true);
                    state.set_report_notice("Sending report...");
                    vec![Effect::SubmitReport(draft)]
                }
                Err(why) => {
                    state.set_report_notice(why);
                    Vec::new()
                }
            }
        }
        Msg::ReportFinished(outcome) => {
            if state.report_pending() {
                state.set_report_pending(false);
                state.set_report_notice(report_notice(outcome));
            }
            Vec::new()
        }
        Msg::QuitRequested => {
            let mut effects = state.unmount_dashboard();
            effects.push(Effect::Quit);
            effects
        }
        Msg::NoOp => Vec::new(),
    };

    (state, effects)
}

fn submit_letter(state: &mut AppState) -> Vec<Effect> {
    if state.submission.pending || state.submission.submitted || state.available() == Some(false)
    {
        return Vec::new();
    }
    state.mark_dirty();
    match state.submission.validate() {
        Ok(draft) => {
            state.submission.diagnostic = Default::default();
            state.submission.pending = true;
            vec![Effect::SubmitLetter(draft)]
        }
        Err(diagnostic) => {
            state.submission.diagnostic = diagnostic;
            Vec::new()
        }
    }
}
