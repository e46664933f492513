//! In-memory session journal.
//!
//! Every significant transition is recorded as a timestamped entry keyed
//! to the session. Nothing is persisted — the journal exists for tests
//! and diagnostics.

use chrono::{DateTime, Utc};
use korkyra_core::clock::Clock;
use korkyra_core::ids::{MissionId, StageId};
use serde::Serialize;
use uuid::Uuid;

/// What happened.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum JournalKind {
    /// The navigator entered a stage.
    StageEntered {
        /// The stage entered.
        stage: StageId,
    },
    /// Sound was switched on.
    SoundEnabled,
    /// Sound was switched off.
    SoundDisabled,
    /// The AR camera session was entered.
    ArEntered,
    /// The AR layer was left for the narrative view.
    ArExited,
    /// A mission handoff started.
    HandoffLaunched {
        /// The pending mission.
        mission: MissionId,
        /// Correlation id threading the handoff through the logs.
        correlation_id: Uuid,
    },
    /// A launch request was ignored because a handoff was pending.
    HandoffIgnored {
        /// The mission whose launch was ignored.
        mission: MissionId,
    },
    /// The load instruction reached the simulation.
    MissionDelivered {
        /// The delivered mission.
        mission: MissionId,
        /// Readiness checks it took.
        attempts: u32,
        /// Correlation id of the handoff.
        correlation_id: Uuid,
    },
    /// The handshake gave up after exhausting its attempt budget.
    HandshakeExhausted {
        /// The undelivered mission.
        mission: MissionId,
        /// Correlation id of the handoff.
        correlation_id: Uuid,
    },
    /// The handoff closed and control returned to the scanning view.
    HandoffClosed,
}

impl JournalKind {
    /// Type name of this entry, for logs.
    #[must_use]
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::StageEntered { .. } => "session.stage_entered",
            Self::SoundEnabled => "session.sound_enabled",
            Self::SoundDisabled => "session.sound_disabled",
            Self::ArEntered => "session.ar_entered",
            Self::ArExited => "session.ar_exited",
            Self::HandoffLaunched { .. } => "session.handoff_launched",
            Self::HandoffIgnored { .. } => "session.handoff_ignored",
            Self::MissionDelivered { .. } => "session.mission_delivered",
            Self::HandshakeExhausted { .. } => "session.handshake_exhausted",
            Self::HandoffClosed => "session.handoff_closed",
        }
    }
}

/// A single recorded transition.
#[derive(Debug, Clone, Serialize)]
pub struct JournalEntry {
    /// Unique entry identifier.
    pub event_id: Uuid,
    /// The session this entry belongs to.
    pub session_id: Uuid,
    /// What happened.
    pub kind: JournalKind,
    /// When it happened, per the injected clock.
    pub occurred_at: DateTime<Utc>,
}

impl JournalEntry {
    /// Serializes the entry payload to JSON.
    #[must_use]
    pub fn to_payload(&self) -> serde_json::Value {
        // Serialization of derived Serialize types to Value is infallible.
        serde_json::to_value(&self.kind).expect("JournalKind serialization is infallible")
    }
}

/// Ordered in-memory log of a session's transitions.
#[derive(Debug)]
pub struct Journal {
    session_id: Uuid,
    entries: Vec<JournalEntry>,
}

impl Journal {
    /// Creates an empty journal for a session.
    #[must_use]
    pub fn new(session_id: Uuid) -> Self {
        Self {
            session_id,
            entries: Vec::new(),
        }
    }

    /// Appends an entry stamped with the clock's current time.
    pub fn append(&mut self, kind: JournalKind, clock: &dyn Clock) {
        let entry = JournalEntry {
            event_id: Uuid::new_v4(),
            session_id: self.session_id,
            kind,
            occurred_at: clock.now(),
        };
        tracing::debug!(event_type = entry.kind.event_type(), session_id = %self.session_id, "journal entry");
        self.entries.push(entry);
    }

    /// All entries in append order.
    #[must_use]
    pub fn entries(&self) -> &[JournalEntry] {
        &self.entries
    }

    /// The session this journal belongs to.
    #[must_use]
    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    /// The stages entered so far, in visit order.
    #[must_use]
    pub fn stages_entered(&self) -> Vec<StageId> {
        self.entries
            .iter()
            .filter_map(|entry| match &entry.kind {
                JournalKind::StageEntered { stage } => Some(stage.clone()),
                _ => None,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use korkyra_test_support::FixedClock;

    #[test]
    fn test_append_stamps_entries_with_session_and_clock() {
        // Arrange
        let session_id = Uuid::new_v4();
        let fixed_now = Utc.with_ymd_and_hms(2026, 3, 1, 9, 30, 0).unwrap();
        let clock = FixedClock(fixed_now);
        let mut journal = Journal::new(session_id);

        // Act
        journal.append(
            JournalKind::StageEntered {
                stage: StageId::from("intro"),
            },
            &clock,
        );
        journal.append(JournalKind::SoundEnabled, &clock);

        // Assert
        assert_eq!(journal.session_id(), session_id);
        let entries = journal.entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].session_id, session_id);
        assert_eq!(entries[0].occurred_at, fixed_now);
        assert_eq!(entries[0].kind.event_type(), "session.stage_entered");
        assert_eq!(entries[1].kind.event_type(), "session.sound_enabled");
        assert_eq!(journal.stages_entered(), vec![StageId::from("intro")]);
    }

    #[test]
    fn test_payload_round_trips_through_json() {
        // Arrange
        let clock = FixedClock(Utc.with_ymd_and_hms(2026, 3, 1, 9, 30, 0).unwrap());
        let mut journal = Journal::new(Uuid::new_v4());
        journal.append(
            JournalKind::HandoffIgnored {
                mission: korkyra_core::ids::MissionId::new(2).unwrap(),
            },
            &clock,
        );

        // Act
        let payload = journal.entries()[0].to_payload();

        // Assert
        assert_eq!(payload["kind"], "handoff_ignored");
        assert_eq!(payload["mission"], 2);
    }
}
