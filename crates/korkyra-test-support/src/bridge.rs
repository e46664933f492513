//! Scripted fake for the `SimulationBridge` port.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use korkyra_core::error::ExperienceError;
use korkyra_core::ports::SimulationBridge;

/// A message delivered through a [`ScriptedBridge`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BridgeCall {
    /// The receiver object inside the simulation.
    pub target: String,
    /// The method invoked on the receiver.
    pub method: String,
    /// The integer argument passed along.
    pub argument: u32,
}

#[derive(Debug, Default)]
struct BridgeState {
    ready_checks: u32,
    sent: Vec<BridgeCall>,
}

/// A `SimulationBridge` whose instance handle appears after a scripted
/// number of readiness checks, recording every delivered message.
#[derive(Debug, Clone)]
pub struct ScriptedBridge {
    ready_after: u32,
    inner: Arc<Mutex<BridgeState>>,
}

impl ScriptedBridge {
    /// Creates a bridge that reports ready starting with readiness check
    /// number `ready_after + 1`. Zero means ready immediately.
    #[must_use]
    pub fn ready_after(checks: u32) -> Self {
        Self {
            ready_after: checks,
            inner: Arc::new(Mutex::new(BridgeState::default())),
        }
    }

    /// A bridge that never becomes ready, for exhaustion scenarios.
    #[must_use]
    pub fn never_ready() -> Self {
        Self::ready_after(u32::MAX)
    }

    /// All messages delivered so far, in order.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn sent(&self) -> Vec<BridgeCall> {
        self.inner.lock().unwrap().sent.clone()
    }

    /// Number of readiness checks observed.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn ready_checks(&self) -> u32 {
        self.inner.lock().unwrap().ready_checks
    }
}

#[async_trait]
impl SimulationBridge for ScriptedBridge {
    async fn instance_ready(&self) -> bool {
        let mut state = self.inner.lock().unwrap();
        state.ready_checks += 1;
        state.ready_checks > self.ready_after
    }

    async fn send_message(
        &mut self,
        target: &str,
        method: &str,
        argument: u32,
    ) -> Result<(), ExperienceError> {
        self.inner.lock().unwrap().sent.push(BridgeCall {
            target: target.to_owned(),
            method: method.to_owned(),
            argument,
        });
        Ok(())
    }
}
