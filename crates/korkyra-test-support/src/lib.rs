//! Shared test fakes and utilities for the Korkyra AR narrative engine.
//!
//! Every fake that gets moved into a component keeps its observable state
//! behind an `Arc<Mutex<_>>`, so tests clone the fake before handing it
//! over and inspect the shared state afterwards.

mod audio;
mod bridge;
mod clock;
mod tracking;
mod view;

pub use audio::{RecordingAudio, RecordingSpeech};
pub use bridge::{BridgeCall, ScriptedBridge};
pub use clock::FixedClock;
pub use tracking::{ScriptedTrackingProvider, TrackingCall, TrackingLog};
pub use view::{CameraViewState, RecordingCameraView, RecordingStageView, StageViewState};
