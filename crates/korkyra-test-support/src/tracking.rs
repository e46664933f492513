//! Scripted fakes for the `TrackingEngine`/`TrackingProvider` ports.

use std::sync::{Arc, Mutex};

use korkyra_core::ports::{TrackingEngine, TrackingProvider};

/// A single recorded tracking-engine lifecycle call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackingCall {
    /// `start()` was invoked.
    Start,
    /// `stop()` was invoked.
    Stop,
    /// `pause()` was invoked.
    Pause,
    /// `unpause()` was invoked.
    Unpause,
}

/// Shared log of tracking-engine calls, inspectable after the engine has
/// been moved into the session manager.
#[derive(Debug, Clone, Default)]
pub struct TrackingLog {
    calls: Arc<Mutex<Vec<TrackingCall>>>,
}

impl TrackingLog {
    /// Returns a snapshot of all recorded calls, in order.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn calls(&self) -> Vec<TrackingCall> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: TrackingCall) {
        self.calls.lock().unwrap().push(call);
    }
}

#[derive(Debug)]
struct RecordingTrackingEngine {
    log: TrackingLog,
}

impl TrackingEngine for RecordingTrackingEngine {
    fn start(&mut self) {
        self.log.record(TrackingCall::Start);
    }

    fn stop(&mut self) {
        self.log.record(TrackingCall::Stop);
    }

    fn pause(&mut self) {
        self.log.record(TrackingCall::Pause);
    }

    fn unpause(&mut self) {
        self.log.record(TrackingCall::Unpause);
    }
}

/// A `TrackingProvider` scripted to either expose a recording engine or
/// model a scene without the tracking system. Clones share state, so keep
/// a clone around to inspect after moving the provider into the manager.
#[derive(Debug, Clone)]
pub struct ScriptedTrackingProvider {
    available: bool,
    log: TrackingLog,
    resolve_calls: Arc<Mutex<usize>>,
}

impl ScriptedTrackingProvider {
    /// A provider whose scene exposes the tracking engine.
    #[must_use]
    pub fn available() -> Self {
        Self {
            available: true,
            log: TrackingLog::default(),
            resolve_calls: Arc::new(Mutex::new(0)),
        }
    }

    /// A provider whose scene has no tracking engine; `resolve` always
    /// returns `None`.
    #[must_use]
    pub fn absent() -> Self {
        Self {
            available: false,
            log: TrackingLog::default(),
            resolve_calls: Arc::new(Mutex::new(0)),
        }
    }

    /// The shared call log of any engine handed out by this provider.
    #[must_use]
    pub fn log(&self) -> TrackingLog {
        self.log.clone()
    }

    /// Number of resolution attempts observed.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn resolve_calls(&self) -> usize {
        *self.resolve_calls.lock().unwrap()
    }
}

impl TrackingProvider for ScriptedTrackingProvider {
    fn resolve(&mut self) -> Option<Box<dyn TrackingEngine>> {
        *self.resolve_calls.lock().unwrap() += 1;
        if self.available {
            Some(Box::new(RecordingTrackingEngine {
                log: self.log.clone(),
            }))
        } else {
            None
        }
    }
}
