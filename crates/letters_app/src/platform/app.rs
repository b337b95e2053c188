use std::io::{self, BufRead, Write};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use anyhow::Context;
use letters_core::{update, AppState, AppViewModel, Msg, Route};
use letters_engine::ClientSettings;
use letters_logging::{letters_debug, letters_info};
use log::LevelFilter;

use super::effects::EffectRunner;
use super::ui::input::{self, Command};
use super::ui::render;
use super::{logging, persistence, Args};

pub fn run_app(args: Args) -> anyhow::Result<()> {
    let level = if args.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    logging::initialize(args.log, level);
    letters_info!("Starting letters client against {}", args.base_url);

    let session = persistence::load_session(&args.session_file);
    let settings = ClientSettings {
        base_url: args.base_url.clone(),
        request_timeout: Duration::from_secs(args.request_timeout_secs.max(1)),
        ..ClientSettings::default()
    };

    let (msg_tx, msg_rx) = mpsc::channel::<Msg>();
    let mut runner = EffectRunner::new(settings, args.session_file.clone(), &session, msg_tx.clone())
        .with_context(|| format!("cannot use API base URL {:?}", args.base_url))?;

    spawn_input_reader(msg_tx.clone());
    msg_tx.send(Msg::SessionRestored(session))?;
    msg_tx.send(Msg::Navigate(Route::Submission))?;
    drop(msg_tx);

    let mut state = AppState::new();
    while let Ok(msg) = msg_rx.recv() {
        letters_debug!("dispatch {}", msg_label(&msg));
        let (next, effects) = update(state, msg);
        state = next;

        let outcome = runner.run(effects);
        let view = state.view();
        if state.consume_dirty() || outcome.relayout {
            print_view(&view)?;
        }
        if outcome.quit {
            break;
        }
    }

    letters_info!("Letters client stopped");
    Ok(())
}

fn spawn_input_reader(msg_tx: mpsc::Sender<Msg>) {
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            match input::parse_command(&line) {
                Ok(Command::Dispatch(msg)) => {
                    if msg_tx.send(msg).is_err() {
                        return;
                    }
                }
                Ok(Command::Help) => println!("{}", input::HELP),
                Ok(Command::Nothing) => {}
                Err(err) => println!("{err}"),
            }
        }
        let _ = msg_tx.send(Msg::QuitRequested);
    });
}

fn print_view(view: &AppViewModel) -> io::Result<()> {
    let mut out = io::stdout().lock();
    writeln!(out)?;
    for line in render::render(view) {
        writeln!(out, "{line}")?;
    }
    write!(out, "> ")?;
    out.flush()
}

// Keeps typed passwords out of the debug log.
fn msg_label(msg: &Msg) -> &'static str {
    match msg {
        Msg::SessionRestored(_) => "SessionRestored",
        Msg::Navigate(_) => "Navigate",
        Msg::LoadMoreClicked => "LoadMoreClicked",
        Msg::PageLoaded { .. } => "PageLoaded",
        Msg::PageFailed { .. } => "PageFailed",
        Msg::AvailabilityLoaded(_) => "AvailabilityLoaded",
        Msg::AuthorChanged(_) => "AuthorChanged",
        Msg::MessageChanged(_) => "MessageChanged",
        Msg::SecretChanged(_) => "SecretChanged",
        Msg::SubmitClicked => "SubmitClicked",
        Msg::SubmitFinished(_) => "SubmitFinished",
        Msg::UsernameChanged(_) => "UsernameChanged",
        Msg::PasswordChanged(_) => "PasswordChanged",
        Msg::LoginClicked => "LoginClicked",
        Msg::LoginFinished(_) => "LoginFinished",
        Msg::LogoutClicked => "LogoutClicked",
        Msg::ReportRequested { .. } => "ReportRequested",
        Msg::ReportFinished(_) => "ReportFinished",
        Msg::QuitRequested => "QuitRequested",
        Msg::NoOp => "NoOp",
    }
}
