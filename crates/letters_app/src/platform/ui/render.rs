use chrono::{DateTime, NaiveDateTime};
use letters_core::{
    AppViewModel, DashboardView, LetterRow, LoginView, Route, SubmissionView, MAX_MESSAGE_CHARS,
};

const SKELETON: &str = "  ░░░░░░░░░░░░░░░░░░░░░░░░";
const RULE: &str = "----------------------------------------";

/// Turns the view model into the lines printed for the current route.
pub fn render(view: &AppViewModel) -> Vec<String> {
    let mut lines = vec![header(view), RULE.to_string()];

    match view.route {
        Route::Submission => render_submission(&view.submission, &mut lines),
        Route::Login => render_login(&view.login, &mut lines),
        Route::Dashboard => match &view.dashboard {
            Some(dashboard) => render_dashboard(dashboard, &mut lines),
            None => lines.push("Dashboard is not mounted.".to_string()),
        },
        Route::Reports => render_reports(view, &mut lines),
    }

    if let Some(notice) = &view.report_notice {
        lines.push(String::new());
        lines.push(format!("! {notice}"));
    }
    lines
}

fn header(view: &AppViewModel) -> String {
    let page = match view.route {
        Route::Submission => "Write a letter",
        Route::Login => "Login",
        Route::Dashboard => "Letters",
        Route::Reports => "Reports",
    };
    let who = if view.session.moderator {
        "moderator"
    } else if view.session.viewer {
        "viewer"
    } else if view.session.logged_in {
        "signed in"
    } else {
        "guest"
    };
    format!("== {page} ==  [{who}]")
}

fn render_submission(form: &SubmissionView, lines: &mut Vec<String>) {
    if form.unavailable {
        lines.push("Sending letters is currently unavailable.".to_string());
        lines.push("Please come back later.".to_string());
        return;
    }
    if form.submitted {
        lines.push("Congratulations! Your letter has been sent.".to_string());
        lines.push("It will show up once it has been approved.".to_string());
        return;
    }

    let mark = |invalid: bool| if invalid { " *" } else { "" };
    lines.push(format!(
        "Author{}: {}",
        mark(form.diagnostic.author_invalid),
        form.author
    ));
    lines.push(format!(
        "Message{} ({}/{}): {}",
        mark(form.diagnostic.message_invalid),
        form.message_chars,
        MAX_MESSAGE_CHARS,
        form.message
    ));
    lines.push(format!(
        "Secret: {}",
        if form.secret { "on" } else { "off" }
    ));
    if !form.diagnostic.is_clear() {
        lines.push(format!("! {}", form.diagnostic.message));
    }
    if form.disabled {
        lines.push("Sending...".to_string());
    } else {
        lines.push("Type `send` to submit.".to_string());
    }
}

fn render_login(form: &LoginView, lines: &mut Vec<String>) {
    let diagnostic = form.diagnostic.as_ref();
    let mark = |invalid: bool| if invalid { " *" } else { "" };
    lines.push(format!(
        "Username{}: {}",
        mark(diagnostic.is_some_and(|d| d.username_invalid)),
        form.username
    ));
    lines.push(format!(
        "Password{}: {}",
        mark(diagnostic.is_some_and(|d| d.password_invalid)),
        "*".repeat(form.password_len)
    ));
    if let Some(diagnostic) = diagnostic {
        lines.push(format!("! {}", diagnostic.why));
    }
    if form.disabled {
        lines.push("Signing in...".to_string());
    } else {
        lines.push("Type `login` to sign in.".to_string());
    }
}

fn render_dashboard(view: &DashboardView, lines: &mut Vec<String>) {
    let title = if view.privileged {
        "All Letters"
    } else {
        "Public Letters"
    };
    lines.push(format!("{title} ({} in total)", view.confirmed));

    if view.initial_loading {
        lines.push("Loading letters...".to_string());
        return;
    }
    if view.rows.is_empty() {
        lines.push("No letters yet.".to_string());
    }

    for (index, row) in view.rows.iter().enumerate() {
        lines.push(String::new());
        render_row(index, row, lines);
    }

    lines.push(String::new());
    if view.loading_more {
        lines.push("Loading more letters...".to_string());
    } else if view.exhausted {
        lines.push("You have reached the end.".to_string());
    } else if view.show_load_more {
        lines.push("Type `more` to load more letters.".to_string());
    }
}

fn render_row(index: usize, row: &LetterRow, lines: &mut Vec<String>) {
    if row.placeholder {
        lines.push(SKELETON.to_string());
        lines.push(SKELETON.to_string());
        return;
    }
    let secret = if row.secret { " (secret)" } else { "" };
    lines.push(format!("[{index}] {}{secret}", row.author));
    for line in row.message.lines() {
        lines.push(format!("    {line}"));
    }
    lines.push(format!("    {}", created_label(&row.created_at)));
}

fn render_reports(view: &AppViewModel, lines: &mut Vec<String>) {
    if !view.session.moderator {
        lines.push("Only moderators can see reports.".to_string());
        return;
    }
    lines.push("Moderation tools are not available here yet.".to_string());
    lines.push("Use `go dashboard` to browse letters.".to_string());
}

/// "Created on 1 October 2022 at 12:00", or the raw value when it does not parse.
pub(crate) fn created_label(raw: &str) -> String {
    let parsed = DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.naive_local())
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f"));
    match parsed {
        Ok(dt) => format!(
            "Created on {} at {}",
            dt.format("%-d %B %Y"),
            dt.format("%H:%M")
        ),
        Err(_) => format!("Created on {raw}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use letters_core::SessionView;

    fn row(author: &str) -> LetterRow {
        LetterRow {
            id: Some(author.to_lowercase()),
            author: author.to_string(),
            message: "hello".to_string(),
            secret: false,
            created_at: "2022-10-01T12:05:00".to_string(),
            placeholder: false,
        }
    }

    fn placeholder() -> LetterRow {
        LetterRow {
            id: None,
            author: String::new(),
            message: String::new(),
            secret: false,
            created_at: String::new(),
            placeholder: true,
        }
    }

    fn dashboard_view(dashboard: DashboardView) -> AppViewModel {
        AppViewModel {
            route: Route::Dashboard,
            dashboard: Some(dashboard),
            ..AppViewModel::default()
        }
    }

    #[test]
    fn created_label_accepts_both_timestamp_shapes() {
        assert_eq!(
            created_label("2022-10-01T12:05:00"),
            "Created on 1 October 2022 at 12:05"
        );
        assert_eq!(
            created_label("2022-10-01T12:05:00.123456+00:00"),
            "Created on 1 October 2022 at 12:05"
        );
        assert_eq!(created_label("yesterday"), "Created on yesterday");
    }

    #[test]
    fn load_more_hint_follows_view_flag() {
        let lines = render(&dashboard_view(DashboardView {
            rows: vec![row("Alice")],
            confirmed: 1,
            show_load_more: true,
            ..DashboardView::default()
        }));

        assert!(lines.iter().any(|l| l == "Public Letters (1 in total)"));
        assert!(lines.iter().any(|l| l.contains("`more`")));
    }

    #[test]
    fn placeholders_render_as_skeletons() {
        let lines = render(&dashboard_view(DashboardView {
            rows: vec![row("Alice"), placeholder(), placeholder()],
            confirmed: 1,
            loading_more: true,
            ..DashboardView::default()
        }));

        assert_eq!(lines.iter().filter(|l| *l == SKELETON).count(), 4);
        assert!(lines.iter().any(|l| l == "Loading more letters..."));
        assert!(!lines.iter().any(|l| l.contains("`more`")));
    }

    #[test]
    fn exhausted_list_shows_end_marker() {
        let lines = render(&dashboard_view(DashboardView {
            privileged: true,
            rows: vec![row("Alice")],
            confirmed: 1,
            exhausted: true,
            ..DashboardView::default()
        }));

        assert!(lines.iter().any(|l| l == "All Letters (1 in total)"));
        assert!(lines.iter().any(|l| l == "You have reached the end."));
    }

    #[test]
    fn unavailable_submission_hides_form() {
        let view = AppViewModel {
            submission: SubmissionView {
                unavailable: true,
                ..SubmissionView::default()
            },
            ..AppViewModel::default()
        };
        let lines = render(&view);

        assert!(lines.iter().any(|l| l.contains("unavailable")));
        assert!(!lines.iter().any(|l| l.starts_with("Author")));
    }

    #[test]
    fn header_names_role() {
        let view = AppViewModel {
            route: Route::Reports,
            session: SessionView {
                logged_in: true,
                viewer: false,
                moderator: true,
            },
            ..AppViewModel::default()
        };
        assert_eq!(render(&view)[0], "== Reports ==  [moderator]");
    }
}
