//! Console adapters for the port traits.
//!
//! These stand in for the browser surfaces: the stage and camera views
//! print to stdout, narration is echoed as text, the tracking engine and
//! simulation runtime are loggers with scripted readiness. They make the
//! whole experience drivable from a terminal.

use std::sync::atomic::{AtomicU32, Ordering};

use async_trait::async_trait;
use korkyra_core::error::ExperienceError;
use korkyra_core::ports::{
    ActiveView, AmbientAudio, CameraView, PlaybackOutcome, SimulationBridge, SpeechSynthesizer,
    StageView, TrackingEngine, TrackingProvider,
};

/// Prints the narrative view to stdout.
#[derive(Debug, Default)]
pub struct ConsoleStageView;

impl StageView for ConsoleStageView {
    fn set_title(&mut self, title: &str) {
        println!("\n== {title} ==");
    }

    fn set_body(&mut self, markup: &str) {
        println!("{markup}");
    }

    fn set_background(&mut self, background: &str) {
        tracing::debug!(background, "background changed");
    }

    fn replace_actions(&mut self, labels: &[String]) {
        for (index, label) in labels.iter().enumerate() {
            println!("  [{index}] {label}");
        }
    }

    fn set_sound_indicator(&mut self, enabled: bool) {
        println!("(sound {})", if enabled { "on" } else { "off" });
    }

    fn clear_history_marker(&mut self) {
        tracing::debug!("history marker cleared");
    }
}

/// Prints the camera layer state to stdout.
#[derive(Debug, Default)]
pub struct ConsoleCameraView;

impl CameraView for ConsoleCameraView {
    fn show_view(&mut self, view: ActiveView) {
        match view {
            ActiveView::Narrative => println!("(story view)"),
            ActiveView::Camera => println!("(camera view — type 'scan 0' or 'scan 1')"),
        }
    }

    fn set_camera_feed_visible(&mut self, visible: bool) {
        tracing::debug!(visible, "camera feed visibility");
    }

    fn set_simulation_visible(&mut self, visible: bool) {
        tracing::debug!(visible, "simulation surface visibility");
    }

    fn set_status(&mut self, text: &str) {
        println!("* {text}");
    }
}

/// Pretends to loop an ambient track.
#[derive(Debug, Default)]
pub struct ConsoleAudio {
    playing: bool,
}

impl AmbientAudio for ConsoleAudio {
    fn play_looping(&mut self, volume: f32) -> PlaybackOutcome {
        self.playing = true;
        tracing::info!(volume, "ambient loop playing");
        PlaybackOutcome::Played
    }

    fn stop(&mut self) {
        if self.playing {
            tracing::info!("ambient loop stopped");
        }
        self.playing = false;
    }
}

/// Echoes narration as text.
#[derive(Debug, Default)]
pub struct ConsoleSpeech;

impl SpeechSynthesizer for ConsoleSpeech {
    fn speak(&mut self, text: &str) -> PlaybackOutcome {
        println!("[voice] {text}");
        PlaybackOutcome::Played
    }

    fn cancel(&mut self) {
        tracing::debug!("narration cancelled");
    }
}

#[derive(Debug)]
struct ConsoleTrackingEngine;

impl TrackingEngine for ConsoleTrackingEngine {
    fn start(&mut self) {
        tracing::info!("tracking started");
    }

    fn stop(&mut self) {
        tracing::info!("tracking stopped");
    }

    fn pause(&mut self) {
        tracing::info!("tracking paused");
    }

    fn unpause(&mut self) {
        tracing::info!("tracking resumed");
    }
}

/// A scene that always exposes the console tracking engine.
#[derive(Debug, Default)]
pub struct ConsoleTrackingProvider;

impl TrackingProvider for ConsoleTrackingProvider {
    fn resolve(&mut self) -> Option<Box<dyn TrackingEngine>> {
        Some(Box::new(ConsoleTrackingEngine))
    }
}

/// A simulation runtime whose instance handle appears after a few
/// readiness checks, to exercise the handshake retry visibly.
#[derive(Debug)]
pub struct ConsoleBridge {
    ready_after: u32,
    checks: AtomicU32,
}

impl ConsoleBridge {
    /// Creates a bridge that reports ready starting with readiness check
    /// number `ready_after + 1`.
    #[must_use]
    pub fn new(ready_after: u32) -> Self {
        Self {
            ready_after,
            checks: AtomicU32::new(0),
        }
    }
}

#[async_trait]
impl SimulationBridge for ConsoleBridge {
    async fn instance_ready(&self) -> bool {
        let checks = self.checks.fetch_add(1, Ordering::Relaxed) + 1;
        if checks <= self.ready_after {
            tracing::info!(checks, "simulation not ready yet");
            return false;
        }
        true
    }

    async fn send_message(
        &mut self,
        target: &str,
        method: &str,
        argument: u32,
    ) -> Result<(), ExperienceError> {
        println!("[simulation] {target}.{method}({argument}) — type 'done' when finished");
        Ok(())
    }
}
