mod config;
mod controller;
mod logging;
mod model;
mod player;
mod session;
mod view;

use std::io;
use std::sync::Arc;
use anyhow::Result;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use config::Config;
use controller::{AppController, RefreshTiming};
use model::AppModel;
use player::WebApiPlayer;
use session::SessionData;
use view::{AppView, ViewState};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::load();

    let _log_guard = match logging::init_logging(&config.log_dir) {
        Ok(guard) => Some(guard),
        Err(e) => {
            eprintln!("Warning: Failed to initialize logging: {}", e);
            None
        }
    };

    tracing::info!("=== disk-player starting ===");
    if let Some(path) = &config.env_file {
        tracing::debug!(path = %path.display(), "Loaded .env");
    }

    // Step 1: Token and playlist for this run
    let session = match load_session(&config).await {
        Ok(session) => session,
        Err(e) => {
            tracing::error!(error = %e, "Session unavailable");
            return Err(e.into());
        }
    };
    if session.tracks.is_empty() {
        tracing::warn!("Session has no playable tracks");
    }

    // Step 2: Remote player and controller
    let player = WebApiPlayer::new(
        config.api_base.clone(),
        session.token.clone(),
        config.device_name.clone(),
        config.connect_timeout(),
    )?;

    let model = Arc::new(Mutex::new(AppModel::new(session.tracks, config.view)));
    let timing = RefreshTiming {
        after_play: config.art_delay(),
        after_resume: config.resume_art_delay(),
    };
    let controller = AppController::new(model.clone(), Arc::new(player), timing);

    // Readiness arrives later; controls stay disabled until then
    controller.initialize();

    tracing::info!("Starting TUI...");

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, model, controller, config.state_poll_interval()).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        tracing::error!(error = ?err, "Application error");
    }

    tracing::info!("disk-player shutting down");
    Ok(())
}

async fn load_session(config: &Config) -> Result<SessionData, session::SessionError> {
    match (&config.playlist, &config.token) {
        (Some(playlist), Some(token)) => session::load_direct(playlist, token).await,
        _ => session::load_from_endpoint(&config.session_url, config.session_cookie.as_deref()).await,
    }
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    model: Arc<Mutex<AppModel>>,
    controller: AppController,
    poll_interval: Duration,
) -> io::Result<()> {
    let mut last_state_poll = Instant::now();

    loop {
        // Periodically pick up changes made from other clients
        if last_state_poll.elapsed() >= poll_interval {
            last_state_poll = Instant::now();
            let controller = controller.clone();
            tokio::spawn(async move { controller.sync_remote_state().await });
        }

        let (view, should_quit) = {
            let model_guard = model.lock().await;

            // Auto-clear old errors (after 5 seconds)
            model_guard.auto_clear_old_errors().await;
            model_guard.advance_animation().await;

            let session = model_guard.get_session().await;
            let ui_state = model_guard.get_ui_state().await;
            (
                ViewState::project(&session, &ui_state),
                model_guard.should_quit().await,
            )
        };

        if should_quit {
            break;
        }

        terminal.draw(|f| {
            AppView::render(f, &view);
        })?;

        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                // Intents wait on the network; keep drawing meanwhile
                let controller = controller.clone();
                tokio::spawn(async move { controller.handle_key_event(key).await });
            }
        }
    }

    Ok(())
}
