//! The experience session object and its event loop.

use std::time::Duration;

use korkyra_ar::{ArSessionManager, ArSessionState};
use korkyra_core::clock::Clock;
use korkyra_core::ids::{MarkerId, MissionId, StageId};
use korkyra_core::ports::{
    AmbientAudio, CameraView, SimulationBridge, SpeechSynthesizer, StageView, TrackingProvider,
};
use korkyra_handoff::{
    DEFAULT_MAX_ATTEMPTS, DEFAULT_RETRY_INTERVAL, HandshakeProgress, LaunchOutcome,
    MISSION_COMPLETE_SENTINEL, MissionHandoff,
};
use korkyra_narration::NarrationController;
use korkyra_navigator::{Navigator, NavigatorOutcome};
use korkyra_stages::{StageRegistry, story};
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::event::SessionEvent;
use crate::journal::{Journal, JournalKind};

/// Session parameters, read once at startup.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Optional stage-id hint from the entry context (the page's query
    /// string). Unknown hints fall back to the start stage.
    pub entry_hint: Option<StageId>,
    /// Handshake retry interval.
    pub retry_interval: Duration,
    /// Handshake attempt budget.
    pub max_handshake_attempts: u32,
    /// Marker-to-mission bindings for the AR session.
    pub marker_bindings: Vec<(MarkerId, MissionId)>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            entry_hint: None,
            retry_interval: DEFAULT_RETRY_INTERVAL,
            max_handshake_attempts: DEFAULT_MAX_ATTEMPTS,
            marker_bindings: story::marker_bindings(),
        }
    }
}

/// The external collaborators, bundled for construction.
pub struct SessionPorts {
    /// The narrative rendering surface.
    pub stage_view: Box<dyn StageView>,
    /// The camera/simulation layer.
    pub camera_view: Box<dyn CameraView>,
    /// The ambient audio output.
    pub ambient: Box<dyn AmbientAudio>,
    /// The speech synthesizer.
    pub speech: Box<dyn SpeechSynthesizer>,
    /// Lazy lookup of the tracking engine.
    pub tracking: Box<dyn TrackingProvider>,
    /// The embedded simulation runtime.
    pub bridge: Box<dyn SimulationBridge>,
    /// Time source for journal entries.
    pub clock: Box<dyn Clock>,
}

enum Input {
    Event(Option<SessionEvent>),
    Tick,
}

/// One page session of the experience: owns every component and runs the
/// cooperative event loop.
pub struct ExperienceSession {
    id: Uuid,
    entry_hint: Option<StageId>,
    navigator: Navigator,
    narration: NarrationController,
    ar: ArSessionManager,
    handoff: MissionHandoff,
    journal: Journal,
    stage_view: Box<dyn StageView>,
    camera_view: Box<dyn CameraView>,
    bridge: Box<dyn SimulationBridge>,
    clock: Box<dyn Clock>,
}

impl ExperienceSession {
    /// Wires a session together. Call [`ExperienceSession::initialize`]
    /// before feeding it events.
    #[must_use]
    pub fn new(config: SessionConfig, registry: StageRegistry, ports: SessionPorts) -> Self {
        let id = Uuid::new_v4();
        Self {
            id,
            entry_hint: config.entry_hint,
            navigator: Navigator::new(registry),
            narration: NarrationController::new(ports.ambient, ports.speech),
            ar: ArSessionManager::new(ports.tracking, config.marker_bindings),
            handoff: MissionHandoff::new(config.retry_interval, config.max_handshake_attempts),
            journal: Journal::new(id),
            stage_view: ports.stage_view,
            camera_view: ports.camera_view,
            bridge: ports.bridge,
            clock: ports.clock,
        }
    }

    /// The session id.
    #[must_use]
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// The session journal.
    #[must_use]
    pub fn journal(&self) -> &Journal {
        &self.journal
    }

    /// Id of the currently displayed stage.
    #[must_use]
    pub fn current_stage_id(&self) -> Option<&StageId> {
        self.navigator.current_stage_id()
    }

    /// Whether sound is currently enabled.
    #[must_use]
    pub fn is_sound_enabled(&self) -> bool {
        self.narration.is_enabled()
    }

    /// Lifecycle state of the AR session.
    #[must_use]
    pub fn ar_state(&self) -> ArSessionState {
        self.ar.state()
    }

    /// The mission handoff state.
    #[must_use]
    pub fn handoff(&self) -> &MissionHandoff {
        &self.handoff
    }

    /// Performs the initial navigation. Run exactly once, before the
    /// event loop.
    pub fn initialize(&mut self) {
        let hint = self.entry_hint.take();
        self.navigator
            .initialize(hint.as_ref(), self.stage_view.as_mut(), &mut self.narration);
        if let Some(stage) = self.navigator.current_stage_id().cloned() {
            self.record(JournalKind::StageEntered { stage });
        }
    }

    /// Dispatches one inbound event. `Shutdown` is a no-op here; the
    /// event loop in [`ExperienceSession::run`] handles it.
    pub fn handle_event(&mut self, event: SessionEvent) {
        let span = tracing::debug_span!("session_event", session_id = %self.id, correlation_id = %Uuid::new_v4());
        let _guard = span.enter();

        match event {
            SessionEvent::ActionPressed(index) => self.on_action_pressed(index),
            SessionEvent::VoiceTogglePressed => self.on_voice_toggle(),
            SessionEvent::ArBackPressed => self.on_ar_back(),
            SessionEvent::MarkerFound(marker) => self.on_marker_found(marker),
            SessionEvent::SimulationMessage(payload) => self.on_simulation_message(&payload),
            SessionEvent::Shutdown => {}
        }
    }

    /// Runs one handshake attempt against the simulation bridge. Normally
    /// driven by the retry timer inside [`ExperienceSession::run`].
    pub async fn poll_handshake(&mut self) {
        match self.handoff.poll(self.bridge.as_mut()).await {
            HandshakeProgress::Delivered {
                mission,
                attempts,
                correlation_id,
            } => {
                self.record(JournalKind::MissionDelivered {
                    mission,
                    attempts,
                    correlation_id,
                });
            }
            HandshakeProgress::Exhausted {
                mission,
                correlation_id,
            } => {
                self.handoff
                    .abandon(self.camera_view.as_mut(), &mut self.narration, &mut self.ar);
                self.record(JournalKind::HandshakeExhausted {
                    mission,
                    correlation_id,
                });
            }
            HandshakeProgress::Waiting | HandshakeProgress::Idle => {}
        }
    }

    /// The cooperative event loop: processes inbound events one at a time
    /// and interleaves handshake retry ticks while a handoff is polling.
    /// Returns when `Shutdown` arrives or all senders are dropped.
    pub async fn run(&mut self, events: &mut mpsc::UnboundedReceiver<SessionEvent>) {
        loop {
            let input = if self.handoff.needs_tick() {
                tokio::select! {
                    event = events.recv() => Input::Event(event),
                    () = self.handoff.wait_tick() => Input::Tick,
                }
            } else {
                Input::Event(events.recv().await)
            };

            match input {
                Input::Event(Some(SessionEvent::Shutdown) | None) => {
                    tracing::info!(session_id = %self.id, "session shutting down");
                    break;
                }
                Input::Event(Some(event)) => self.handle_event(event),
                Input::Tick => self.poll_handshake().await,
            }
        }
    }

    fn on_action_pressed(&mut self, index: usize) {
        let before = self.navigator.current_stage_id().cloned();
        let outcome =
            self.navigator
                .execute(index, self.stage_view.as_mut(), &mut self.narration);

        match outcome {
            NavigatorOutcome::EnterAr => {
                self.ar.enter(self.camera_view.as_mut());
                self.record(JournalKind::ArEntered);
            }
            NavigatorOutcome::Handled => {
                let after = self.navigator.current_stage_id().cloned();
                if let Some(stage) = after.filter(|stage| Some(stage) != before.as_ref()) {
                    self.record(JournalKind::StageEntered { stage });
                }
            }
        }
    }

    fn on_voice_toggle(&mut self) {
        let body = self.navigator.current_body().map(ToOwned::to_owned);
        self.narration
            .toggle(self.stage_view.as_mut(), body.as_deref());
        if self.narration.is_enabled() {
            self.record(JournalKind::SoundEnabled);
        } else {
            self.record(JournalKind::SoundDisabled);
        }
    }

    fn on_ar_back(&mut self) {
        if self.handoff.is_pending() {
            tracing::debug!("AR back ignored while a handoff is pending");
            return;
        }
        self.ar.exit(self.camera_view.as_mut());
        self.record(JournalKind::ArExited);
    }

    fn on_marker_found(&mut self, marker: MarkerId) {
        let Some(mission) = self.ar.marker_found(marker) else {
            return;
        };
        match self.handoff.launch(
            mission,
            self.camera_view.as_mut(),
            &mut self.narration,
            &mut self.ar,
        ) {
            LaunchOutcome::Started { correlation_id } => {
                self.record(JournalKind::HandoffLaunched {
                    mission,
                    correlation_id,
                });
            }
            LaunchOutcome::AlreadyPending => {
                self.record(JournalKind::HandoffIgnored { mission });
            }
        }
    }

    fn on_simulation_message(&mut self, payload: &str) {
        if payload == MISSION_COMPLETE_SENTINEL {
            self.handoff
                .close(self.camera_view.as_mut(), &mut self.narration, &mut self.ar);
            self.record(JournalKind::HandoffClosed);
        } else {
            tracing::debug!(%payload, "unrelated cross-context message ignored");
        }
    }

    fn record(&mut self, kind: JournalKind) {
        self.journal.append(kind, &*self.clock);
    }
}
