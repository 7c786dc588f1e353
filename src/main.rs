use anyhow::Result;
use loopdeck::clips::ClipStore;
use loopdeck::engine::{self, EngineConfig};
use loopdeck::transport::Transport;
use loopdeck::ui::LoopdeckApp;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "loopdeck=debug,info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Loopdeck");

    let config = EngineConfig::default();
    config.validate()?;

    let (bridge, endpoint) = engine::channel();

    #[cfg(feature = "audio-io")]
    let _engine = engine::NativeEngine::spawn(config.clone(), endpoint);

    #[cfg(not(feature = "audio-io"))]
    {
        tracing::warn!("Built without audio-io; transport requests will fail");
        drop(endpoint);
    }

    let transport = Transport::new(bridge, ClipStore::new());
    let bpm = config.bpm;

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([520.0, 680.0])
            .with_title("Loopdeck"),
        ..Default::default()
    };

    eframe::run_native(
        "Loopdeck",
        options,
        Box::new(move |cc| Ok(Box::new(LoopdeckApp::new(cc, transport, bpm)))),
    )
    .map_err(|e| anyhow::anyhow!("Failed to start UI: {}", e))?;

    Ok(())
}
