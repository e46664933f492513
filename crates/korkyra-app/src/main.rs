//! Korkyra console driver entry point.
//!
//! Wires the experience session to console adapters and drives it from
//! stdin: action indices navigate, `voice` toggles narration, `scan N`
//! simulates a marker recognition, `done` simulates the simulation's
//! completion message.

use std::error::Error;

use korkyra_core::clock::SystemClock;
use korkyra_core::ids::MarkerId;
use korkyra_handoff::MISSION_COMPLETE_SENTINEL;
use korkyra_session::{ExperienceSession, SessionConfig, SessionEvent, SessionPorts};
use korkyra_stages::{StageRegistry, story};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

mod config;
mod console;

/// Readiness checks the console simulation withholds, to make the
/// handshake retry visible.
const CONSOLE_BRIDGE_READY_AFTER: u32 = 2;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn Error>> {
    // Initialize tracing subscriber.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    tracing::info!("Starting the Korkyra narrative experience");

    let app_config = config::AppConfig::from_env()?;

    let registry = match &app_config.story_path {
        Some(path) => {
            let source = std::fs::read_to_string(path)?;
            StageRegistry::from_yaml(&source)?
        }
        None => story::builtin(),
    };

    let session_config = SessionConfig {
        entry_hint: app_config.entry_hint,
        retry_interval: app_config.retry_interval,
        max_handshake_attempts: app_config.max_attempts,
        marker_bindings: story::marker_bindings(),
    };

    let mut session = ExperienceSession::new(
        session_config,
        registry,
        SessionPorts {
            stage_view: Box::new(console::ConsoleStageView),
            camera_view: Box::new(console::ConsoleCameraView),
            ambient: Box::new(console::ConsoleAudio::default()),
            speech: Box::new(console::ConsoleSpeech),
            tracking: Box::new(console::ConsoleTrackingProvider),
            bridge: Box::new(console::ConsoleBridge::new(CONSOLE_BRIDGE_READY_AFTER)),
            clock: Box::new(SystemClock),
        },
    );

    session.initialize();

    let (tx, mut rx) = mpsc::unbounded_channel();
    tokio::spawn(read_input(tx));

    session.run(&mut rx).await;

    Ok(())
}

/// Reads stdin lines and forwards them as session events. Sends
/// `Shutdown` when stdin closes.
async fn read_input(tx: mpsc::UnboundedSender<SessionEvent>) {
    println!("(commands: action index, 'voice', 'back', 'scan N', 'done', 'quit')");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Ok(Some(line)) = lines.next_line().await {
        match parse_command(line.trim()) {
            Some(event) => {
                if tx.send(event).is_err() {
                    return;
                }
            }
            None => println!("(unrecognized command: {line})"),
        }
    }
    let _ = tx.send(SessionEvent::Shutdown);
}

fn parse_command(line: &str) -> Option<SessionEvent> {
    if let Ok(index) = line.parse::<usize>() {
        return Some(SessionEvent::ActionPressed(index));
    }
    if let Some(marker) = line.strip_prefix("scan ") {
        return marker
            .trim()
            .parse::<u32>()
            .ok()
            .map(|id| SessionEvent::MarkerFound(MarkerId(id)));
    }
    match line {
        "voice" => Some(SessionEvent::VoiceTogglePressed),
        "back" => Some(SessionEvent::ArBackPressed),
        "done" => Some(SessionEvent::SimulationMessage(
            MISSION_COMPLETE_SENTINEL.to_owned(),
        )),
        "quit" | "exit" => Some(SessionEvent::Shutdown),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_command_action_index() {
        // Act + Assert
        assert_eq!(parse_command("2"), Some(SessionEvent::ActionPressed(2)));
    }

    #[test]
    fn test_parse_command_scan() {
        // Act + Assert
        assert_eq!(
            parse_command("scan 1"),
            Some(SessionEvent::MarkerFound(MarkerId(1)))
        );
    }

    #[test]
    fn test_parse_command_done_sends_completion_sentinel() {
        // Act + Assert
        assert_eq!(
            parse_command("done"),
            Some(SessionEvent::SimulationMessage("MissionComplete".to_owned()))
        );
    }

    #[test]
    fn test_parse_command_rejects_garbage() {
        // Act + Assert
        assert_eq!(parse_command("open sesame"), None);
    }
}
