//! `TravelPal` terminal chat client
//!
//! Drives a conversation from the keyboard through [`tui::run`].

use crossterm::event::{self, Event as TermEvent};
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use travelpal::chat::HttpRelayClient;
use travelpal::config::ClientConfig;
use travelpal::tui::{self, Input};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = ClientConfig::from_env();

    // Log to a file; the terminal belongs to the UI
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.log_path)?;
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "travelpal=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(Mutex::new(log_file))
                .with_current_span(false)
                .with_span_list(false),
        )
        .init();

    let relay = Arc::new(HttpRelayClient::new(&config.relay_url)?);
    tracing::info!(relay = %relay.base_url(), log = %config.log_path.display(), "Chat client starting");

    let mut terminal = ratatui::init();
    let result = tui::run(&mut terminal, &relay, spawn_input_reader()).await;
    ratatui::restore();

    if let Err(e) = &result {
        tracing::error!(error = %e, "Chat client exited with an error");
    }
    Ok(result?)
}

/// Read terminal events on a dedicated thread (crossterm reads block)
fn spawn_input_reader() -> mpsc::UnboundedReceiver<Input> {
    let (tx, rx) = mpsc::unbounded_channel();
    std::thread::spawn(move || loop {
        let input = match event::read() {
            Ok(TermEvent::Key(key)) => Input::Key(key),
            Ok(TermEvent::Resize(..)) => Input::Resize,
            Ok(_) => continue,
            Err(e) => {
                tracing::error!(error = %e, "Terminal input failed");
                break;
            }
        };
        if tx.send(input).is_err() {
            break;
        }
    });
    rx
}
