//! Korkyra — AR Session Manager.
//!
//! Wraps the marker-tracking engine's lifecycle and toggles visibility
//! between the narrative view and the camera view. The engine handle is
//! resolved lazily on entry; a scene without the engine still switches the
//! view and stays silently inert — a degraded but non-fatal state.
//!
//! Pause/unpause keep the underlying camera session alive so the handoff
//! to the simulation avoids the re-initialization cost.

use korkyra_core::ids::{MarkerId, MissionId};
use korkyra_core::ports::{ActiveView, CameraView, TrackingEngine, TrackingProvider};

/// Lifecycle state of the AR session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArSessionState {
    /// No engine lookup attempted yet.
    Uninitialized,
    /// Engine handle resolved, camera not started.
    Ready,
    /// Camera running and markers being processed.
    Running,
    /// Camera alive, marker processing suspended.
    Paused,
    /// Camera stopped; the handle is kept for restart.
    Stopped,
}

/// Manages the AR session and the marker-to-mission bindings.
pub struct ArSessionManager {
    state: ArSessionState,
    provider: Box<dyn TrackingProvider>,
    engine: Option<Box<dyn TrackingEngine>>,
    bindings: Vec<(MarkerId, MissionId)>,
}

impl ArSessionManager {
    /// Creates a manager in the `Uninitialized` state.
    #[must_use]
    pub fn new(
        provider: Box<dyn TrackingProvider>,
        bindings: Vec<(MarkerId, MissionId)>,
    ) -> Self {
        Self {
            state: ArSessionState::Uninitialized,
            provider,
            engine: None,
            bindings,
        }
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn state(&self) -> ArSessionState {
        self.state
    }

    /// Hides the narrative view, shows the camera view, resolves the
    /// engine handle if not yet resolved, and starts tracking when a
    /// handle exists. Resolution failure is logged, never surfaced.
    pub fn enter(&mut self, view: &mut dyn CameraView) {
        view.show_view(ActiveView::Camera);

        if self.engine.is_none() {
            match self.provider.resolve() {
                Some(engine) => {
                    self.engine = Some(engine);
                    self.state = ArSessionState::Ready;
                }
                None => {
                    tracing::warn!("tracking engine not present, AR entry is inert");
                }
            }
        }

        if let Some(engine) = &mut self.engine {
            engine.start();
            self.state = ArSessionState::Running;
            tracing::info!("AR session running");
        }
    }

    /// Stops tracking (if a handle exists) and switches back to the
    /// narrative view. Safe to call even if AR was never entered.
    pub fn exit(&mut self, view: &mut dyn CameraView) {
        if let Some(engine) = &mut self.engine {
            engine.stop();
            self.state = ArSessionState::Stopped;
            tracing::info!("AR session stopped");
        }
        view.show_view(ActiveView::Narrative);
    }

    /// Suspends marker processing without tearing the session down.
    /// No-op unless the session is running.
    pub fn pause(&mut self) {
        if self.state != ArSessionState::Running {
            tracing::debug!(state = ?self.state, "pause ignored");
            return;
        }
        if let Some(engine) = &mut self.engine {
            engine.pause();
            self.state = ArSessionState::Paused;
        }
    }

    /// Resumes marker processing after a pause. No-op unless paused.
    pub fn unpause(&mut self) {
        if self.state != ArSessionState::Paused {
            tracing::debug!(state = ?self.state, "unpause ignored");
            return;
        }
        if let Some(engine) = &mut self.engine {
            engine.unpause();
            self.state = ArSessionState::Running;
        }
    }

    /// Handles a marker's "target found" signal: returns the bound mission
    /// to launch. Signals for unbound markers, or arriving while the
    /// session is not running (e.g. during an active handoff), are logged
    /// and ignored.
    #[must_use]
    pub fn marker_found(&self, marker: MarkerId) -> Option<MissionId> {
        if self.state != ArSessionState::Running {
            tracing::debug!(%marker, state = ?self.state, "marker signal ignored");
            return None;
        }
        let mission = self
            .bindings
            .iter()
            .find(|(bound, _)| *bound == marker)
            .map(|&(_, mission)| mission);
        if mission.is_none() {
            tracing::debug!(%marker, "no mission bound to marker");
        }
        mission
    }
}
