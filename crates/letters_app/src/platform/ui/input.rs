use letters_core::{Msg, ReportKind, Route};
use thiserror::Error;

pub const HELP: &str = "\
commands:
  go submit|login|dashboard|reports   switch page
  more                                load more letters
  author <text> / message <text>      edit the letter
  secret on|off                       hide the letter from the public list
  send                                submit the letter
  user <name> / pass <password>       edit the login form
  login / logout
  report <index> <kind> <email> <details...>
  help / quit";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("unknown command `{0}`, type `help`")]
    UnknownCommand(String),
    #[error("unknown page `{0}`")]
    UnknownRoute(String),
    #[error("`{0}` needs an argument")]
    MissingArgument(&'static str),
    #[error("expected on or off, got `{0}`")]
    BadToggle(String),
    #[error("`{0}` is not a letter index")]
    BadIndex(String),
    #[error("unknown report kind `{0}`")]
    UnknownKind(String),
}

/// What a line of user input asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Dispatch(Msg),
    Help,
    Nothing,
}

pub fn parse_command(line: &str) -> Result<Command, InputError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(Command::Nothing);
    }
    let (verb, rest) = match line.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (line, ""),
    };

    let msg = match verb.to_ascii_lowercase().as_str() {
        "help" | "?" => return Ok(Command::Help),
        "quit" | "exit" => Msg::QuitRequested,
        "go" => Msg::Navigate(parse_route(rest)?),
        "more" => Msg::LoadMoreClicked,
        "author" => Msg::AuthorChanged(rest.to_string()),
        "message" => Msg::MessageChanged(rest.to_string()),
        "secret" => Msg::SecretChanged(parse_toggle(rest)?),
        "send" => Msg::SubmitClicked,
        "user" => Msg::UsernameChanged(rest.to_string()),
        "pass" => Msg::PasswordChanged(rest.to_string()),
        "login" => Msg::LoginClicked,
        "logout" => Msg::LogoutClicked,
        "report" => parse_report(rest)?,
        other => return Err(InputError::UnknownCommand(other.to_string())),
    };
    Ok(Command::Dispatch(msg))
}

fn parse_route(arg: &str) -> Result<Route, InputError> {
    match arg.to_ascii_lowercase().as_str() {
        "" => Err(InputError::MissingArgument("go")),
        "submit" | "submission" | "write" => Ok(Route::Submission),
        "login" => Ok(Route::Login),
        "dashboard" | "letters" => Ok(Route::Dashboard),
        "reports" => Ok(Route::Reports),
        other => Err(InputError::UnknownRoute(other.to_string())),
    }
}

fn parse_toggle(arg: &str) -> Result<bool, InputError> {
    match arg.to_ascii_lowercase().as_str() {
        "on" | "yes" | "true" => Ok(true),
        "off" | "no" | "false" => Ok(false),
        "" => Err(InputError::MissingArgument("secret")),
        other => Err(InputError::BadToggle(other.to_string())),
    }
}

fn parse_report(rest: &str) -> Result<Msg, InputError> {
    let mut parts = rest.splitn(4, char::is_whitespace);
    let index = parts.next().filter(|s| !s.is_empty());
    let (Some(index), Some(kind), Some(email)) = (index, parts.next(), parts.next()) else {
        return Err(InputError::MissingArgument("report"));
    };
    let details = parts.next().unwrap_or_default().trim().to_string();

    let index = index
        .parse::<usize>()
        .map_err(|_| InputError::BadIndex(index.to_string()))?;
    let kind = ReportKind::from_label(kind).ok_or_else(|| InputError::UnknownKind(kind.to_string()))?;

    Ok(Msg::ReportRequested {
        index,
        email: email.to_string(),
        kind,
        details,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dispatched(line: &str) -> Msg {
        match parse_command(line) {
            Ok(Command::Dispatch(msg)) => msg,
            other => panic!("expected a message for {line:?}, got {other:?}"),
        }
    }

    #[test]
    fn blank_line_does_nothing() {
        assert_eq!(parse_command("   "), Ok(Command::Nothing));
        assert_eq!(parse_command("help"), Ok(Command::Help));
    }

    #[test]
    fn navigation_and_paging() {
        assert_eq!(dispatched("go dashboard"), Msg::Navigate(Route::Dashboard));
        assert_eq!(dispatched("GO Login"), Msg::Navigate(Route::Login));
        assert_eq!(dispatched("more"), Msg::LoadMoreClicked);
        assert_eq!(
            parse_command("go nowhere"),
            Err(InputError::UnknownRoute("nowhere".into()))
        );
        assert_eq!(parse_command("go"), Err(InputError::MissingArgument("go")));
    }

    #[test]
    fn form_fields_keep_inner_spacing() {
        assert_eq!(
            dispatched("message Dear   friend, hello"),
            Msg::MessageChanged("Dear   friend, hello".into())
        );
        assert_eq!(dispatched("author"), Msg::AuthorChanged(String::new()));
        assert_eq!(dispatched("secret on"), Msg::SecretChanged(true));
        assert_eq!(
            parse_command("secret maybe"),
            Err(InputError::BadToggle("maybe".into()))
        );
    }

    #[test]
    fn report_parses_all_parts() {
        assert_eq!(
            dispatched("report 2 spam me@example.com buy cheap things"),
            Msg::ReportRequested {
                index: 2,
                email: "me@example.com".into(),
                kind: ReportKind::Spam,
                details: "buy cheap things".into(),
            }
        );
        assert_eq!(
            parse_command("report x spam a@b.c d"),
            Err(InputError::BadIndex("x".into()))
        );
        assert_eq!(
            parse_command("report 1 weird a@b.c d"),
            Err(InputError::UnknownKind("weird".into()))
        );
        assert_eq!(
            parse_command("report 1"),
            Err(InputError::MissingArgument("report"))
        );
    }

    #[test]
    fn unknown_verb_is_rejected() {
        assert_eq!(
            parse_command("dance"),
            Err(InputError::UnknownCommand("dance".into()))
        );
    }
}
