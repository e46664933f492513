//! Korkyra — Mission Handoff Protocol.
//!
//! On marker recognition the experience pauses AR processing, hides the
//! camera feed, shows the embedded simulation surface, and polls until the
//! simulation exposes a ready instance handle; then it delivers exactly
//! one "load mission" message. Mission completion (the sentinel arriving
//! as a cross-context message, or the runtime's direct callback) reverses
//! the process.
//!
//! Handoffs are single-flight: a launch while one is pending is ignored,
//! so a re-fired marker signal never overwrites the pending mission. The
//! polling loop is bounded; exhaustion returns the player to the scanning
//! view instead of looping forever.

use std::time::Duration;

use korkyra_ar::ArSessionManager;
use korkyra_core::ids::MissionId;
use korkyra_core::ports::{CameraView, SimulationBridge};
use korkyra_narration::NarrationController;
use tokio::time::Interval;
use uuid::Uuid;

/// Payload of the inbound cross-context message signalling completion.
pub const MISSION_COMPLETE_SENTINEL: &str = "MissionComplete";

/// Receiver object of the outbound load instruction.
pub const BRIDGE_TARGET: &str = "GameManager";

/// Method invoked on the receiver object.
pub const LOAD_MISSION_METHOD: &str = "LoadMission";

/// Status line while the handshake is in progress.
pub const STATUS_LOADING: &str = "Loading Simulation...";

/// Status line after a completed mission.
pub const STATUS_SCAN_NEXT: &str = "Scan the next card...";

/// Status line after handshake exhaustion.
pub const STATUS_RETRY: &str = "The simulation did not respond. Scan the card again to retry.";

/// Default handshake retry interval.
pub const DEFAULT_RETRY_INTERVAL: Duration = Duration::from_millis(500);

/// Default maximum handshake attempts (~2 minutes at the default
/// interval).
pub const DEFAULT_MAX_ATTEMPTS: u32 = 240;

/// Result of a launch request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchOutcome {
    /// The handoff started and the handshake loop is running.
    Started {
        /// Correlation id threading this handoff through the logs.
        correlation_id: Uuid,
    },
    /// A handoff is already pending; the request was ignored.
    AlreadyPending,
}

/// Result of one handshake attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandshakeProgress {
    /// No handoff is pending; nothing to do.
    Idle,
    /// The simulation is not ready yet; the loop keeps retrying.
    Waiting,
    /// The load instruction was delivered; retrying stopped.
    Delivered {
        /// The delivered mission.
        mission: MissionId,
        /// Readiness checks it took, including the successful one.
        attempts: u32,
        /// Correlation id of the handoff.
        correlation_id: Uuid,
    },
    /// The attempt budget ran out; the caller should abandon the handoff.
    Exhausted {
        /// The undelivered mission.
        mission: MissionId,
        /// Correlation id of the handoff.
        correlation_id: Uuid,
    },
}

#[derive(Debug)]
struct Pending {
    mission: MissionId,
    correlation_id: Uuid,
    attempts: u32,
    delivered: bool,
}

/// State of the handoff protocol. Exactly one mission can be pending at a
/// time; the slot is cleared by `close` or `abandon`.
pub struct MissionHandoff {
    retry_interval: Duration,
    max_attempts: u32,
    pending: Option<Pending>,
    timer: Option<Interval>,
}

impl MissionHandoff {
    /// Creates an idle handoff with the given handshake parameters.
    #[must_use]
    pub fn new(retry_interval: Duration, max_attempts: u32) -> Self {
        Self {
            retry_interval,
            max_attempts,
            pending: None,
            timer: None,
        }
    }

    /// Whether a handoff is pending (polling or simulation active).
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// The mission currently pending, if any.
    #[must_use]
    pub fn pending_mission(&self) -> Option<MissionId> {
        self.pending.as_ref().map(|p| p.mission)
    }

    /// Whether the load instruction has been delivered for the pending
    /// handoff.
    #[must_use]
    pub fn is_delivered(&self) -> bool {
        self.pending.as_ref().is_some_and(|p| p.delivered)
    }

    /// Whether the handshake loop wants retry ticks.
    #[must_use]
    pub fn needs_tick(&self) -> bool {
        self.timer.is_some()
    }

    /// Starts a handoff: sets the loading status, stops ambient audio,
    /// pauses AR (the camera session stays initialized), swaps the camera
    /// feed for the simulation surface, records the pending mission, and
    /// arms the retry timer. Single-flight: ignored while another handoff
    /// is pending.
    pub fn launch(
        &mut self,
        mission: MissionId,
        view: &mut dyn CameraView,
        narration: &mut NarrationController,
        ar: &mut ArSessionManager,
    ) -> LaunchOutcome {
        if let Some(pending) = &self.pending {
            tracing::debug!(
                pending = %pending.mission,
                requested = %mission,
                "handoff already pending, launch ignored"
            );
            return LaunchOutcome::AlreadyPending;
        }

        let correlation_id = Uuid::new_v4();
        view.set_status(STATUS_LOADING);
        narration.stop_ambient();
        ar.pause();
        view.set_camera_feed_visible(false);
        view.set_simulation_visible(true);

        self.pending = Some(Pending {
            mission,
            correlation_id,
            attempts: 0,
            delivered: false,
        });
        // The first interval tick completes immediately, so the first
        // readiness check happens right away.
        self.timer = Some(tokio::time::interval(self.retry_interval));

        tracing::info!(%mission, %correlation_id, "mission handoff launched");
        LaunchOutcome::Started { correlation_id }
    }

    /// Waits for the next retry tick. Pends forever while no handshake is
    /// in progress; guard calls with [`MissionHandoff::needs_tick`].
    pub async fn wait_tick(&mut self) {
        match &mut self.timer {
            Some(timer) => {
                timer.tick().await;
            }
            None => std::future::pending::<()>().await,
        }
    }

    /// Runs one handshake attempt: checks the bridge for a ready instance
    /// and delivers the load instruction on success. Delivery failures
    /// count as attempts and are retried.
    pub async fn poll(&mut self, bridge: &mut dyn SimulationBridge) -> HandshakeProgress {
        let Some(pending) = &mut self.pending else {
            self.timer = None;
            return HandshakeProgress::Idle;
        };
        if pending.delivered {
            self.timer = None;
            return HandshakeProgress::Idle;
        }

        pending.attempts += 1;
        if bridge.instance_ready().await {
            match bridge
                .send_message(BRIDGE_TARGET, LOAD_MISSION_METHOD, pending.mission.get())
                .await
            {
                Ok(()) => {
                    pending.delivered = true;
                    self.timer = None;
                    tracing::info!(
                        mission = %pending.mission,
                        attempts = pending.attempts,
                        correlation_id = %pending.correlation_id,
                        "load instruction delivered"
                    );
                    return HandshakeProgress::Delivered {
                        mission: pending.mission,
                        attempts: pending.attempts,
                        correlation_id: pending.correlation_id,
                    };
                }
                Err(error) => {
                    tracing::warn!(%error, "load instruction delivery failed, will retry");
                }
            }
        }

        if pending.attempts >= self.max_attempts {
            self.timer = None;
            tracing::warn!(
                mission = %pending.mission,
                attempts = pending.attempts,
                correlation_id = %pending.correlation_id,
                "handshake attempts exhausted"
            );
            return HandshakeProgress::Exhausted {
                mission: pending.mission,
                correlation_id: pending.correlation_id,
            };
        }
        HandshakeProgress::Waiting
    }

    /// Ends the handoff after mission completion: hides the simulation
    /// surface, restores the camera feed, unpauses AR, prompts for the
    /// next scan, and resumes ambient audio (subject to sound being
    /// enabled). Idempotent — a second call with no intervening launch
    /// changes nothing.
    pub fn close(
        &mut self,
        view: &mut dyn CameraView,
        narration: &mut NarrationController,
        ar: &mut ArSessionManager,
    ) {
        if self.pending.is_none() {
            tracing::debug!("close with no pending handoff");
        }
        self.restore(STATUS_SCAN_NEXT, view, narration, ar);
    }

    /// Ends the handoff after handshake exhaustion, prompting a rescan.
    pub fn abandon(
        &mut self,
        view: &mut dyn CameraView,
        narration: &mut NarrationController,
        ar: &mut ArSessionManager,
    ) {
        self.restore(STATUS_RETRY, view, narration, ar);
    }

    fn restore(
        &mut self,
        status: &str,
        view: &mut dyn CameraView,
        narration: &mut NarrationController,
        ar: &mut ArSessionManager,
    ) {
        view.set_simulation_visible(false);
        view.set_camera_feed_visible(true);
        ar.unpause();
        view.set_status(status);
        narration.play_ambient();
        self.pending = None;
        self.timer = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use korkyra_ar::ArSessionState;
    use korkyra_core::ids::MarkerId;
    use korkyra_test_support::{
        BridgeCall, RecordingAudio, RecordingCameraView, RecordingSpeech, RecordingStageView,
        ScriptedTrackingProvider,
    };

    struct Fixture {
        handoff: MissionHandoff,
        view: RecordingCameraView,
        narration: NarrationController,
        ar: ArSessionManager,
        audio: RecordingAudio,
    }

    fn fixture(max_attempts: u32) -> Fixture {
        let audio = RecordingAudio::new();
        let speech = RecordingSpeech::new();
        let mut view = RecordingCameraView::new();
        let mut ar = ArSessionManager::new(
            Box::new(ScriptedTrackingProvider::available()),
            vec![(MarkerId(0), MissionId::new(1).unwrap())],
        );
        ar.enter(&mut view);
        Fixture {
            handoff: MissionHandoff::new(DEFAULT_RETRY_INTERVAL, max_attempts),
            view,
            narration: NarrationController::new(Box::new(audio.clone()), Box::new(speech)),
            ar,
            audio,
        }
    }

    fn mission(n: u32) -> MissionId {
        MissionId::new(n).unwrap()
    }

    #[tokio::test]
    async fn test_launch_swaps_surfaces_and_pauses_ar() {
        // Arrange
        let mut f = fixture(DEFAULT_MAX_ATTEMPTS);

        // Act
        let outcome = f
            .handoff
            .launch(mission(2), &mut f.view, &mut f.narration, &mut f.ar);

        // Assert
        assert!(matches!(outcome, LaunchOutcome::Started { .. }));
        let view = f.view.state();
        assert!(!view.camera_feed_visible);
        assert!(view.simulation_visible);
        assert_eq!(view.status, STATUS_LOADING);
        assert_eq!(f.ar.state(), ArSessionState::Paused);
        assert!(f.handoff.needs_tick());
    }

    #[tokio::test]
    async fn test_handshake_delivers_exactly_one_load_instruction() {
        // Arrange
        let mut f = fixture(DEFAULT_MAX_ATTEMPTS);
        let mut bridge = korkyra_test_support::ScriptedBridge::ready_after(1);
        f.handoff
            .launch(mission(2), &mut f.view, &mut f.narration, &mut f.ar);

        // Act
        assert_eq!(
            f.handoff.poll(&mut bridge).await,
            HandshakeProgress::Waiting
        );
        let progress = f.handoff.poll(&mut bridge).await;

        // Assert
        assert_eq!(bridge.ready_checks(), 2);
        assert!(matches!(
            progress,
            HandshakeProgress::Delivered {
                attempts: 2,
                mission: m,
                ..
            } if m == mission(2)
        ));
        assert_eq!(
            bridge.sent(),
            vec![BridgeCall {
                target: BRIDGE_TARGET.to_owned(),
                method: LOAD_MISSION_METHOD.to_owned(),
                argument: 2,
            }]
        );
        // Retrying stopped, and another poll delivers nothing new.
        assert!(!f.handoff.needs_tick());
        assert_eq!(f.handoff.poll(&mut bridge).await, HandshakeProgress::Idle);
        assert_eq!(bridge.sent().len(), 1);
    }

    #[tokio::test]
    async fn test_launch_is_single_flight() {
        // Arrange
        let mut f = fixture(DEFAULT_MAX_ATTEMPTS);
        let mut bridge = korkyra_test_support::ScriptedBridge::ready_after(0);
        f.handoff
            .launch(mission(2), &mut f.view, &mut f.narration, &mut f.ar);

        // Act
        let second = f
            .handoff
            .launch(mission(3), &mut f.view, &mut f.narration, &mut f.ar);

        // Assert
        assert_eq!(second, LaunchOutcome::AlreadyPending);
        assert_eq!(f.handoff.pending_mission(), Some(mission(2)));

        f.handoff.poll(&mut bridge).await;
        assert_eq!(bridge.sent().len(), 1);
        assert_eq!(bridge.sent()[0].argument, 2);
    }

    #[tokio::test]
    async fn test_close_twice_is_idempotent() {
        // Arrange
        let mut f = fixture(DEFAULT_MAX_ATTEMPTS);
        f.handoff
            .launch(mission(1), &mut f.view, &mut f.narration, &mut f.ar);

        // Act
        f.handoff.close(&mut f.view, &mut f.narration, &mut f.ar);
        let first = f.view.state();
        let first_ar = f.ar.state();
        f.handoff.close(&mut f.view, &mut f.narration, &mut f.ar);

        // Assert
        let second = f.view.state();
        assert_eq!(second.camera_feed_visible, first.camera_feed_visible);
        assert_eq!(second.simulation_visible, first.simulation_visible);
        assert_eq!(f.ar.state(), first_ar);
        assert!(second.camera_feed_visible);
        assert!(!second.simulation_visible);
        assert_eq!(second.status, STATUS_SCAN_NEXT);
        assert_eq!(f.ar.state(), ArSessionState::Running);
        assert!(!f.handoff.is_pending());
    }

    #[tokio::test]
    async fn test_close_resumes_ambient_when_sound_enabled() {
        // Arrange
        let mut f = fixture(DEFAULT_MAX_ATTEMPTS);
        let mut stage_view = RecordingStageView::new();
        f.narration.enable_sound(&mut stage_view);
        f.handoff
            .launch(mission(1), &mut f.view, &mut f.narration, &mut f.ar);
        assert!(!f.audio.is_playing());

        // Act
        f.handoff.close(&mut f.view, &mut f.narration, &mut f.ar);

        // Assert
        assert!(f.audio.is_playing());
    }

    #[tokio::test]
    async fn test_exhaustion_reports_and_abandon_restores_scanning() {
        // Arrange
        let mut f = fixture(3);
        let mut bridge = korkyra_test_support::ScriptedBridge::never_ready();
        f.handoff
            .launch(mission(2), &mut f.view, &mut f.narration, &mut f.ar);

        // Act
        assert_eq!(
            f.handoff.poll(&mut bridge).await,
            HandshakeProgress::Waiting
        );
        assert_eq!(
            f.handoff.poll(&mut bridge).await,
            HandshakeProgress::Waiting
        );
        let progress = f.handoff.poll(&mut bridge).await;
        assert!(matches!(progress, HandshakeProgress::Exhausted { mission: m, .. } if m == mission(2)));
        assert!(!f.handoff.needs_tick());

        f.handoff.abandon(&mut f.view, &mut f.narration, &mut f.ar);

        // Assert
        let view = f.view.state();
        assert!(view.camera_feed_visible);
        assert!(!view.simulation_visible);
        assert_eq!(view.status, STATUS_RETRY);
        assert_eq!(f.ar.state(), ArSessionState::Running);
        assert!(!f.handoff.is_pending());
        assert!(bridge.sent().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_retry_ticks_follow_the_configured_interval() {
        // Arrange
        let mut f = fixture(DEFAULT_MAX_ATTEMPTS);
        let started = tokio::time::Instant::now();
        f.handoff
            .launch(mission(1), &mut f.view, &mut f.narration, &mut f.ar);

        // Act: the first tick is immediate, the second waits out the
        // interval.
        f.handoff.wait_tick().await;
        f.handoff.wait_tick().await;

        // Assert
        assert!(started.elapsed() >= DEFAULT_RETRY_INTERVAL);
    }
}
