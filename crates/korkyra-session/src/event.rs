//! Inbound session events.

use korkyra_core::ids::MarkerId;

/// Everything the outside world can feed into the session loop: UI
/// presses, marker-tracking signals, and cross-context messages from the
/// embedded simulation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// The action control at this index was pressed.
    ActionPressed(usize),
    /// The voice-toggle affordance was pressed.
    VoiceTogglePressed,
    /// The back control of the AR layer was pressed.
    ArBackPressed,
    /// The tracking engine recognized a marker.
    MarkerFound(MarkerId),
    /// A cross-context message arrived from the embedded simulation.
    /// Payloads other than the completion sentinel are silently ignored.
    SimulationMessage(String),
    /// Tear the session down.
    Shutdown,
}
