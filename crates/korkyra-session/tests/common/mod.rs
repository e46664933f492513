//! Shared harness for session integration tests.
#![allow(dead_code)]

use chrono::TimeZone;
use korkyra_session::{ExperienceSession, SessionConfig, SessionPorts};
use korkyra_stages::story;
use korkyra_test_support::{
    FixedClock, RecordingAudio, RecordingCameraView, RecordingSpeech, RecordingStageView,
    ScriptedBridge, ScriptedTrackingProvider,
};

/// A fully wired session plus clones of every fake for inspection.
pub struct Harness {
    pub session: ExperienceSession,
    pub stage_view: RecordingStageView,
    pub camera_view: RecordingCameraView,
    pub audio: RecordingAudio,
    pub speech: RecordingSpeech,
    pub bridge: ScriptedBridge,
    pub tracking: ScriptedTrackingProvider,
}

/// Builds a session over the built-in story with the given config and
/// bridge script.
pub fn harness_with(config: SessionConfig, bridge: ScriptedBridge) -> Harness {
    let stage_view = RecordingStageView::new();
    let camera_view = RecordingCameraView::new();
    let audio = RecordingAudio::new();
    let speech = RecordingSpeech::new();
    let tracking = ScriptedTrackingProvider::available();
    let clock = FixedClock(
        chrono::Utc
            .with_ymd_and_hms(2026, 1, 15, 10, 0, 0)
            .unwrap(),
    );

    let session = ExperienceSession::new(
        config,
        story::builtin(),
        SessionPorts {
            stage_view: Box::new(stage_view.clone()),
            camera_view: Box::new(camera_view.clone()),
            ambient: Box::new(audio.clone()),
            speech: Box::new(speech.clone()),
            tracking: Box::new(tracking.clone()),
            bridge: Box::new(bridge.clone()),
            clock: Box::new(clock),
        },
    );

    Harness {
        session,
        stage_view,
        camera_view,
        audio,
        speech,
        bridge,
        tracking,
    }
}

/// Default harness: built-in story, immediately ready simulation.
pub fn harness() -> Harness {
    harness_with(SessionConfig::default(), ScriptedBridge::ready_after(0))
}
