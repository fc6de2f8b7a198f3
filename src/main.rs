//! Heartcheck: cardiovascular risk intake form
//!
//! Main entry point for the terminal application.

use anyhow::Result;
use std::io::IsTerminal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use heartcheck::adapters::sanitize::SanitizingMakeWriter;
use heartcheck::config::{AppConfig, LogMode, PredictorBackend};
use heartcheck::tui::App;

fn main() -> Result<()> {
    let config = AppConfig::from_env()?;

    // Writing logs to the terminal would corrupt the TUI (alternate screen):
    // interactive sessions log to a file unless told otherwise.
    let use_file = match config.log_mode {
        LogMode::File => true,
        LogMode::Stdout => false,
        LogMode::Auto => std::io::stdout().is_terminal(),
    };

    let (writer, _guard) = if use_file {
        if let Some(parent) = std::path::Path::new(&config.log_file).parent() {
            // Best-effort: don't fail startup just because the directory is missing.
            let _ = std::fs::create_dir_all(parent);
        }

        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&config.log_file)?;
        tracing_appender::non_blocking(file)
    } else {
        tracing_appender::non_blocking(std::io::stdout())
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(SanitizingMakeWriter::new(writer)))
        .init();

    match &config.backend {
        PredictorBackend::Simulated { latency } => {
            tracing::info!("Starting Heartcheck (simulated predictor, {:?} latency)", latency);
        }
        PredictorBackend::Http { endpoint, .. } => {
            tracing::info!("Starting Heartcheck (prediction endpoint {})", endpoint);
        }
    }

    let mut app = App::new(&config)?;
    app.run()?;

    tracing::info!("Heartcheck shutdown complete.");
    Ok(())
}
