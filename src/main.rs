//! Application entry point: Fridge Chef.
//!
//! # Startup sequence
//!
//! 1. Initialise logging.
//! 2. Load [`AppConfig`] from disk (returns default on first run).
//! 3. Create [`tokio`] runtime (multi-thread, 2 workers).
//! 4. Build the capabilities: [`GeminiAnalyzer`], [`StillImageCamera`] and
//!    the speech device behind the [`Narrator`].
//! 5. Create the command channel.
//! 6. Spawn the [`SessionRunner`] on the tokio runtime.
//! 7. Run [`eframe::run_native`]: blocks the main thread until the window
//!    is closed.

use std::sync::Arc;

use eframe::egui;
use tokio::sync::mpsc;

use fridge_chef::{
    analysis::{GeminiAnalyzer, RecipeAnalyzer},
    app::KitchenApp,
    camera::{Camera, StillImageCamera},
    config::AppConfig,
    session::{new_shared_session, Command, KitchenAssistant, SessionRunner},
    voice::{CommandSpeech, Narrator, SilentSpeech, SpeechOutput},
};

fn native_options(config: &AppConfig) -> eframe::NativeOptions {
    let (width, height) = config.ui.window_size;
    let viewport = egui::ViewportBuilder::default()
        .with_title("Fridge Chef")
        .with_inner_size([width, height])
        .with_min_inner_size([320.0, 480.0]);

    eframe::NativeOptions {
        viewport,
        ..Default::default()
    }
}

fn main() -> anyhow::Result<()> {
    // 1. Logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Fridge Chef starting up");

    // 2. Configuration
    let config = AppConfig::load().unwrap_or_else(|e| {
        log::warn!("Failed to load config ({e}); using defaults");
        AppConfig::default()
    });

    // 3. Tokio runtime
    let rt = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()?;

    // 4. Capabilities
    let analyzer: Arc<dyn RecipeAnalyzer> = Arc::new(GeminiAnalyzer::from_config(&config.analysis));
    if config.analysis.resolve_api_key().is_none() {
        log::warn!("No Gemini API key configured; scans will fail until one is set");
    }

    let camera = StillImageCamera::from_config(&config);
    log::info!("Camera source: {}", camera.source().display());
    let camera: Arc<dyn Camera> = Arc::new(camera);

    let speech: Arc<dyn SpeechOutput> = if config.voice.enabled {
        Arc::new(CommandSpeech::from_config(&config.voice))
    } else {
        log::info!("Voice narration disabled");
        Arc::new(SilentSpeech)
    };
    let narrator = Narrator::new(speech, &config.voice);

    // 5. Channel setup
    let (command_tx, command_rx) = mpsc::channel::<Command>(32);

    // 6. Session runner
    let session = new_shared_session();
    let assistant = KitchenAssistant::new(
        Arc::clone(&session),
        camera,
        analyzer,
        narrator.clone(),
    );
    rt.spawn(SessionRunner::new(assistant).run(command_rx));

    // 7. egui event loop (blocks until the window is closed)
    let app = KitchenApp::new(session, narrator, command_tx, config.clone());
    eframe::run_native(
        "Fridge Chef",
        native_options(&config),
        Box::new(move |_cc| Ok(Box::new(app))),
    )
    .map_err(|e| anyhow::anyhow!("window error: {e}"))?;

    log::info!("Fridge Chef shut down");
    Ok(())
}
