//! Stage and action definitions.

use korkyra_core::ids::StageId;
use serde::{Deserialize, Serialize};

/// A single screen of narrative content plus its available actions.
///
/// The body is Markdown; it is rendered for the view and reduced to plain
/// text for narration. Stages are immutable once the registry is built.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Stage {
    /// Registry key of this stage.
    pub id: StageId,
    /// Title shown in the title slot.
    pub title: String,
    /// Markdown body shown in the body slot and narrated aloud.
    pub body: String,
    /// Optional background resource locator. When absent, the previous
    /// background is left in place.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,
    /// Ordered action controls. Empty is valid: a dead-end stage whose
    /// follow-up control is created dynamically.
    #[serde(default)]
    pub actions: Vec<StageAction>,
}

/// A labeled control bound to a stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageAction {
    /// Label shown on the control.
    pub label: String,
    /// What pressing the control does.
    pub effect: ActionEffect,
}

/// Declarative form of a stage action's side effect.
///
/// Effects execute synchronously and exactly once per press.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ActionEffect {
    /// Navigate to another stage.
    GoTo {
        /// The destination stage.
        target: StageId,
    },
    /// Navigate with a hard reset: narration silenced, sound forced off,
    /// transient history cleared.
    Restart {
        /// The destination stage.
        target: StageId,
    },
    /// Leave the narrative and enter the AR camera session.
    EnterAr,
    /// Replace the action list with a single freshly created follow-up
    /// control that navigates on press.
    RevealFollowUp {
        /// Label of the follow-up control.
        label: String,
        /// Where the follow-up control navigates.
        target: StageId,
    },
}

impl ActionEffect {
    /// The stage this effect navigates to, if any. Used by registry
    /// validation to reject dangling targets.
    #[must_use]
    pub fn target(&self) -> Option<&StageId> {
        match self {
            Self::GoTo { target } | Self::Restart { target } | Self::RevealFollowUp { target, .. } => {
                Some(target)
            }
            Self::EnterAr => None,
        }
    }
}
