//! Port traits for the external collaborators.
//!
//! The engine treats its surroundings as black boxes behind these seams: a
//! narrative view surface, a camera/simulation layer, an ambient audio
//! output, a speech synthesizer, a marker-tracking engine, and the embedded
//! simulation runtime. Production adapters bind them to a real front-end;
//! tests inject recording fakes.
//!
//! Every audio/speech capability is optional: adapters report
//! [`PlaybackOutcome::Unavailable`] instead of erroring, and callers only
//! ever log the outcome.

use async_trait::async_trait;

use crate::error::ExperienceError;

/// Which top-level layer is currently shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActiveView {
    /// The story view (title, body, action buttons).
    Narrative,
    /// The AR camera layer (feed, status line, simulation surface).
    Camera,
}

/// Result of a best-effort, fire-and-forget playback operation.
///
/// Callers may log this but must never gate navigation on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackOutcome {
    /// Playback started.
    Played,
    /// The output device refused (e.g. an autoplay restriction).
    Rejected,
    /// No output capability is present in this environment.
    Unavailable,
    /// Sound is disabled; nothing was attempted.
    Skipped,
}

/// The narrative rendering surface.
///
/// `set_body` receives rendered markup and must not escape it.
pub trait StageView: Send {
    /// Replaces the title slot.
    fn set_title(&mut self, title: &str);

    /// Replaces the body slot with rendered markup.
    fn set_body(&mut self, markup: &str);

    /// Sets the background resource of the stage container.
    fn set_background(&mut self, background: &str);

    /// Replaces the action controls wholesale; previously bound controls
    /// are discarded.
    fn replace_actions(&mut self, labels: &[String]);

    /// Updates the sound-indicator affordance.
    fn set_sound_indicator(&mut self, enabled: bool);

    /// Clears the transient navigation history marker so a reload does not
    /// replay the current stage.
    fn clear_history_marker(&mut self);
}

/// The camera layer: feed visibility, status line, and the embedded
/// simulation surface.
pub trait CameraView: Send {
    /// Switches between the narrative and camera layers.
    fn show_view(&mut self, view: ActiveView);

    /// Shows or hides the raw camera feed element.
    fn set_camera_feed_visible(&mut self, visible: bool);

    /// Shows or hides the embedded simulation surface.
    fn set_simulation_visible(&mut self, visible: bool);

    /// Replaces the status line.
    fn set_status(&mut self, text: &str);
}

/// A playable ambient-audio resource.
pub trait AmbientAudio: Send {
    /// Starts looping playback at the given volume.
    fn play_looping(&mut self, volume: f32) -> PlaybackOutcome;

    /// Stops playback; safe to call when nothing is playing.
    fn stop(&mut self);
}

/// A speech-synthesis capability.
pub trait SpeechSynthesizer: Send {
    /// Submits an utterance. Callers cancel any previous utterance first.
    fn speak(&mut self, text: &str) -> PlaybackOutcome;

    /// Cancels any speaking or pending utterance; safe when idle.
    fn cancel(&mut self);
}

/// The marker-tracking engine's lifecycle surface.
pub trait TrackingEngine: Send {
    /// Starts the camera and marker processing.
    fn start(&mut self);

    /// Stops the camera entirely.
    fn stop(&mut self);

    /// Suspends marker processing without tearing the session down.
    fn pause(&mut self);

    /// Resumes marker processing after a pause.
    fn unpause(&mut self);
}

/// Lazy lookup of the tracking engine on the hosting scene.
///
/// Resolution is attempted on every AR entry until it succeeds; a scene
/// without the engine leaves the system silently inert.
pub trait TrackingProvider: Send {
    /// Returns a handle to the tracking engine, if the scene exposes one.
    fn resolve(&mut self) -> Option<Box<dyn TrackingEngine>>;
}

/// The embedded simulation runtime, reached across a context boundary.
#[async_trait]
pub trait SimulationBridge: Send {
    /// Whether the embedded runtime has exposed a ready instance handle.
    async fn instance_ready(&self) -> bool;

    /// Delivers a method-style message to the runtime.
    ///
    /// # Errors
    ///
    /// Returns `ExperienceError::Bridge` if delivery fails even though the
    /// instance reported ready.
    async fn send_message(
        &mut self,
        target: &str,
        method: &str,
        argument: u32,
    ) -> Result<(), ExperienceError>;
}
