//! Console host for the solace pipeline.
//!
//! Runs the coordinator with a terminal presentation surface and stdin as
//! the typed-input channel. Camera and microphone adapters are wired by
//! platform frontends; without them the pipeline runs in chat-only mode.

use anyhow::Context;
use solace::{AssistantConfig, GeminiBackend, PipelineCoordinator, PipelineEvent, UiEvent};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    let config_path = AssistantConfig::default_config_path();
    let config = if config_path.exists() {
        AssistantConfig::from_file(&config_path)
            .with_context(|| format!("loading {}", config_path.display()))?
    } else {
        info!("no config at {}; using defaults", config_path.display());
        AssistantConfig::default()
    };

    let backend = Arc::new(GeminiBackend::new(&config.backend)?);

    let (ui_tx, mut ui_rx) = mpsc::unbounded_channel::<UiEvent>();
    let coordinator = PipelineCoordinator::new(config, backend).with_presentation(ui_tx);
    let event_tx = coordinator.event_sender();
    let cancel = coordinator.cancel_token();

    // Presentation surface: a plain terminal renderer.
    let render = tokio::spawn(async move {
        while let Some(event) = ui_rx.recv().await {
            match event {
                UiEvent::Message(message) => {
                    println!("[{}] {}", message.sender, message.text);
                }
                UiEvent::EmotionIndicator { label, confidence } => {
                    println!("(you seem {label}, {:.0}%)", confidence * 100.0);
                }
            }
        }
    });

    // Typed input: one line per message, EOF or Ctrl-C ends the session.
    let input_cancel = cancel.clone();
    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            match lines.next_line().await {
                Ok(Some(line)) => {
                    if !line.trim().is_empty()
                        && event_tx.send(PipelineEvent::UserText(line)).await.is_err()
                    {
                        break;
                    }
                }
                Ok(None) => break,
                Err(e) => {
                    warn!("stdin read failed: {e}");
                    break;
                }
            }
        }
        input_cancel.cancel();
    });

    let ctrlc_cancel = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            ctrlc_cancel.cancel();
        }
    });

    coordinator.run().await?;
    render.abort();
    Ok(())
}
