//! Hark demo binary - composition root.
//!
//! Ties the session crates together into a runnable executable:
//! 1. Parse CLI args and load configuration from TOML
//! 2. Initialize tracing
//! 3. Wire a scripted demo recognizer into a SessionController
//! 4. Subscribe both event sinks and print what arrives
//! 5. Drive a demo session: init -> load -> start -> word switch -> stop

use clap::Parser;

use hark_core::config::HarkConfig;
use hark_core::events::RecognitionEvent;
use hark_session::SessionController;

mod cli;
mod demo;

use cli::CliArgs;
use demo::ScriptedRecognizerFactory;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();

    // Config first: the log level may come from it.
    let config_file = args.resolve_config_path();
    let config = HarkConfig::load_or_default(&config_file);
    let log_level = args.resolve_log_level(&config.general.log_level);

    // Tracing.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .init();

    tracing::info!("Starting Hark v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!(path = %config_file.display(), "Configuration resolved");

    let assets_dir = args.resolve_assets_dir(&config.general.assets_dir);

    let controller = SessionController::new(
        Box::new(ScriptedRecognizerFactory::default()),
        config.session.clone(),
        config.model.clone(),
    );

    // Subscribe before issuing any command; the sinks never replay.
    let mut lifecycle = controller.sinks().subscribe_lifecycle();
    let mut recognition = controller.sinks().subscribe_recognition();

    let lifecycle_printer = tokio::spawn(async move {
        while let Ok(event) = lifecycle.recv().await {
            println!("state  {}", event.to_payload());
        }
    });
    let recognition_printer = tokio::spawn(async move {
        while let Ok(event) = recognition.recv().await {
            match event {
                RecognitionEvent::PartialHypothesis { text } => {
                    println!("partial {}", text.as_deref().unwrap_or(""));
                }
                RecognitionEvent::FinalHypothesis { text } => {
                    println!("final   {}", text.as_deref().unwrap_or(""));
                }
                RecognitionEvent::EngineError { reason } => {
                    println!("engine error: {reason}");
                }
                other => {
                    tracing::debug!(event = ?other, "Recognition event");
                }
            }
        }
    });

    controller.init(&assets_dir)?;
    controller.load()?;

    controller.start()?;
    tokio::time::sleep(std::time::Duration::from_secs(args.listen_secs)).await;

    if let Some(ref word) = args.word {
        controller.start_word(word)?;
        tokio::time::sleep(std::time::Duration::from_secs(args.listen_secs)).await;
    }

    controller.stop()?;
    tracing::info!(state = %controller.current_state(), "Demo session finished");

    controller.shutdown();
    drop(controller);

    // The printers exit once the sinks close with the controller.
    let _ = lifecycle_printer.await;
    let _ = recognition_printer.await;

    Ok(())
}
