mod app;
mod controller;
mod view;

use std::io;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};

use spotify_preview::audio::RodioProvider;
use spotify_preview::auth::ClientCredentialsTokens;
use spotify_preview::catalog::{CatalogClient, HttpTransport};
use spotify_preview::config::{Settings, resolve_config_path};
use spotify_preview::identity::{Account, SupabaseIdentity};
use spotify_preview::logging;
use spotify_preview::session::PlaybackSession;

use app::AppModel;
use controller::AppController;
use view::AppView;

#[tokio::main]
async fn main() -> Result<()> {
    if let Err(e) = logging::init_logging() {
        eprintln!("Warning: Failed to initialize logging: {}", e);
    }

    tracing::info!("=== Spotify Preview Starting ===");

    let settings = Settings::load().context("Failed to load settings")?;
    if let Err(e) = settings.validate() {
        let path = resolve_config_path()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "<no config path>".to_string());
        anyhow::bail!("Invalid configuration ({}): {}", path, e);
    }

    let catalog = CatalogClient::new(
        Arc::new(HttpTransport::new(settings.catalog.api_base_url.clone())),
        Arc::new(ClientCredentialsTokens::new(
            settings.catalog.client_id.clone(),
            settings.catalog.client_secret.clone(),
            settings.catalog.token_policy(),
        )),
        settings.catalog.market.clone(),
        settings.catalog.search_limit,
    );

    let provider = RodioProvider::new().context("Failed to open audio output")?;
    let session = PlaybackSession::start(Arc::new(provider), settings.playback.session_config());

    let account = settings
        .identity
        .is_enabled()
        .then(|| Arc::new(Account::new(Arc::new(SupabaseIdentity::new(&settings.identity)))));

    let model = Arc::new(AppModel::new());
    let controller = AppController::new(
        model.clone(),
        catalog,
        session.clone(),
        account,
        settings.playback.seek_step_secs as f64,
    );

    let controller_for_init = controller.clone();
    let identity = settings.identity.clone();
    tokio::spawn(async move {
        if !identity.email.is_empty() {
            controller_for_init.sign_in(&identity.email, &identity.password).await;
        }
        controller_for_init.load_home().await;
    });

    tracing::info!("Starting TUI...");

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, model, controller).await;

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    session.shutdown().await;

    if let Err(err) = res {
        tracing::error!(error = ?err, "Application error");
    }

    tracing::info!("Spotify Preview shutting down");
    Ok(())
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    model: Arc<AppModel>,
    controller: AppController,
) -> io::Result<()> {
    loop {
        model.auto_clear_old_errors().await;

        let snapshot = controller.session.snapshot();
        let ui_state = model.get_ui_state().await;
        let content_state = model.get_content_state().await;

        terminal.draw(|f| {
            AppView::render(f, &snapshot, &ui_state, &content_state);
        })?;

        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if let Err(e) = controller.handle_key_event(key).await {
                    tracing::warn!(error = %e, "Key handling failed");
                }
            }
        }

        if model.should_quit().await {
            break;
        }
    }

    Ok(())
}
