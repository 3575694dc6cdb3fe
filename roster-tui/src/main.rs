//! Roster console entry point.

use crossterm::{
    event::{self, Event as CrosstermEvent, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use roster_tui::api_client::RestClient;
use roster_tui::config::TuiConfig;
use roster_tui::credentials::{CredentialStore, FileTokenStorage};
use roster_tui::error::TuiError;
use roster_tui::events::TuiEvent;
use roster_tui::notifications::NotificationLevel;
use roster_tui::persistence::{self, PersistedState};
use roster_tui::service::ResourceService;
use roster_tui::state::App;
use roster_tui::tasks;
use roster_tui::views::render_view;
use std::io::{self, Stdout};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

const TICK_RATE: Duration = Duration::from_millis(250);

#[tokio::main]
async fn main() -> Result<(), TuiError> {
    let config = TuiConfig::load()?;
    roster_tui::logging::init(&config.log_path)?;

    let credentials = Arc::new(CredentialStore::new(Box::new(FileTokenStorage::new(
        config.credentials_path.clone(),
    ))));
    let mut startup_warning = None;
    if let Err(err) = credentials.load() {
        tracing::warn!(error = %err, "could not read stored credentials");
        startup_warning = Some(format!("Stored credentials unreadable: {err}"));
    }

    let api = RestClient::new(&config, credentials.shared())?;
    tracing::info!(base_url = api.base_url(), "roster console starting");
    let service = Arc::new(ResourceService::new(Arc::new(api), credentials));

    let mut app = App::new(config, Arc::clone(&service));
    match persistence::load(&app.config.persistence_path) {
        Ok(Some(state)) => app.active_view = state.restored_view(),
        Ok(None) => {}
        Err(err) => tracing::warn!(error = %err, "ignoring unreadable UI state"),
    }
    if let Some(message) = startup_warning {
        app.notify(NotificationLevel::Warning, message);
    }

    let mut terminal = setup_terminal()?;
    let _guard = TerminalGuard {};

    let (event_tx, mut event_rx) = mpsc::channel::<TuiEvent>(256);

    spawn_input_reader(event_tx.clone());
    tasks::spawn_all(&service, &event_tx, app.start());

    let mut ticker = tokio::time::interval(TICK_RATE);

    loop {
        terminal.draw(|f| render_view(f, &app))?;

        tokio::select! {
            _ = ticker.tick() => {
                app.apply_event(TuiEvent::Tick);
            }
            Some(event) = event_rx.recv() => {
                let follow_up = app.apply_event(event);
                tasks::spawn_all(&service, &event_tx, follow_up);
            }
        }

        if app.should_quit {
            break;
        }
    }

    let persisted = PersistedState {
        active_view: app.active_view,
    };
    if let Err(err) = persistence::save(&app.config.persistence_path, &persisted) {
        tracing::warn!(error = %err, "failed to save UI state");
    }
    tracing::info!("roster console stopped");

    Ok(())
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>, TuiError> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    Ok(Terminal::new(backend)?)
}

struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let mut stdout = io::stdout();
        let _ = execute!(stdout, LeaveAlternateScreen);
    }
}

fn spawn_input_reader(sender: mpsc::Sender<TuiEvent>) {
    std::thread::spawn(move || loop {
        if let Ok(true) = event::poll(Duration::from_millis(200)) {
            if let Ok(evt) = event::read() {
                let sent = match evt {
                    CrosstermEvent::Key(key) if key.kind == KeyEventKind::Press => {
                        sender.blocking_send(TuiEvent::Input(key))
                    }
                    CrosstermEvent::Resize(width, height) => {
                        sender.blocking_send(TuiEvent::Resize { width, height })
                    }
                    _ => Ok(()),
                };
                if sent.is_err() {
                    break;
                }
            }
        }
    });
}
