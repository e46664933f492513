//! Korkyra — Navigator state machine.
//!
//! Holds the current stage, renders stage content through the view port,
//! and executes the declarative action effects. Unknown stage ids are a
//! deliberate silent no-op: stage ids are programmer-controlled constants,
//! not user input.

use korkyra_core::ids::StageId;
use korkyra_core::ports::StageView;
use korkyra_narration::NarrationController;
use korkyra_stages::markup;
use korkyra_stages::{ActionEffect, Stage, StageAction, StageRegistry};

/// What the navigator asks its owner to do after executing an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigatorOutcome {
    /// The effect was handled inside the navigator.
    Handled,
    /// The action requests entry into the AR camera session; the session
    /// owns that transition.
    EnterAr,
}

/// The narrative navigation state machine.
pub struct Navigator {
    registry: StageRegistry,
    current: Option<StageId>,
    /// The actions currently bound to the view. Usually the current
    /// stage's actions, but a revealed follow-up control replaces them.
    active_actions: Vec<StageAction>,
    initialized: bool,
}

impl Navigator {
    /// Creates a navigator over an immutable registry. No stage is current
    /// until [`Navigator::initialize`] runs.
    #[must_use]
    pub fn new(registry: StageRegistry) -> Self {
        Self {
            registry,
            current: None,
            active_actions: Vec::new(),
            initialized: false,
        }
    }

    /// The registry this navigator walks.
    #[must_use]
    pub fn registry(&self) -> &StageRegistry {
        &self.registry
    }

    /// Id of the currently displayed stage, once initialized.
    #[must_use]
    pub fn current_stage_id(&self) -> Option<&StageId> {
        self.current.as_ref()
    }

    /// The currently displayed stage definition.
    #[must_use]
    pub fn current_stage(&self) -> Option<&Stage> {
        self.current.as_ref().and_then(|id| self.registry.get(id))
    }

    /// Markdown body of the current stage, for the voice toggle.
    #[must_use]
    pub fn current_body(&self) -> Option<&str> {
        self.current_stage().map(|stage| stage.body.as_str())
    }

    /// Labels of the actions currently bound to the view.
    #[must_use]
    pub fn active_action_labels(&self) -> Vec<String> {
        self.active_actions
            .iter()
            .map(|action| action.label.clone())
            .collect()
    }

    /// Performs the initial navigation: to the entry hint if it names a
    /// registered stage, else to the designated start stage. Runs exactly
    /// once; later calls are logged and ignored.
    pub fn initialize(
        &mut self,
        entry_hint: Option<&StageId>,
        view: &mut dyn StageView,
        narration: &mut NarrationController,
    ) {
        if self.initialized {
            tracing::warn!("navigator initialized twice, ignoring");
            return;
        }
        self.initialized = true;

        let start = match entry_hint {
            Some(hint) if self.registry.contains(hint) => hint.clone(),
            Some(hint) => {
                tracing::debug!(%hint, "entry hint names no registered stage, using start stage");
                self.registry.start_stage().clone()
            }
            None => self.registry.start_stage().clone(),
        };
        self.transition(&start, false, view, narration);
    }

    /// Transitions to a stage and renders it.
    ///
    /// Unknown ids leave the displayed state untouched. With `hard_reset`,
    /// narration is cancelled, ambient stopped, sound forced off (and the
    /// indicator updated), and the transient history marker cleared before
    /// the new stage renders. After a successful transition the displayed
    /// title, body, background and bound actions are exactly the new
    /// stage's.
    pub fn transition(
        &mut self,
        stage_id: &StageId,
        hard_reset: bool,
        view: &mut dyn StageView,
        narration: &mut NarrationController,
    ) {
        let Some(stage) = self.registry.get(stage_id).cloned() else {
            tracing::debug!(stage = %stage_id, "transition to unknown stage ignored");
            return;
        };

        if hard_reset {
            narration.disable_sound(view);
            view.clear_history_marker();
        }

        self.current = Some(stage.id.clone());
        view.set_title(&stage.title);
        view.set_body(&markup::to_html(&stage.body));
        if let Some(background) = &stage.background {
            view.set_background(background);
        }

        view.replace_actions(&labels_of(&stage.actions));
        self.active_actions = stage.actions;

        if narration.is_enabled() {
            narration.speak(&stage.body);
        }

        tracing::info!(stage = %stage_id, hard_reset, "entered stage");
    }

    /// Executes the action currently bound at `index`. Out-of-range
    /// indices are logged and ignored.
    pub fn execute(
        &mut self,
        index: usize,
        view: &mut dyn StageView,
        narration: &mut NarrationController,
    ) -> NavigatorOutcome {
        let Some(action) = self.active_actions.get(index).cloned() else {
            tracing::debug!(index, "action index out of range, ignoring");
            return NavigatorOutcome::Handled;
        };

        match action.effect {
            ActionEffect::GoTo { target } => {
                self.transition(&target, false, view, narration);
                NavigatorOutcome::Handled
            }
            ActionEffect::Restart { target } => {
                self.transition(&target, true, view, narration);
                NavigatorOutcome::Handled
            }
            ActionEffect::EnterAr => NavigatorOutcome::EnterAr,
            ActionEffect::RevealFollowUp { label, target } => {
                let follow_up = StageAction {
                    label: label.clone(),
                    effect: ActionEffect::GoTo { target },
                };
                view.replace_actions(std::slice::from_ref(&label));
                self.active_actions = vec![follow_up];
                NavigatorOutcome::Handled
            }
        }
    }
}

fn labels_of(actions: &[StageAction]) -> Vec<String> {
    actions.iter().map(|action| action.label.clone()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use korkyra_stages::story;
    use korkyra_test_support::{RecordingAudio, RecordingSpeech, RecordingStageView};

    struct Fixture {
        navigator: Navigator,
        view: RecordingStageView,
        narration: NarrationController,
        audio: RecordingAudio,
        speech: RecordingSpeech,
    }

    fn fixture() -> Fixture {
        let audio = RecordingAudio::new();
        let speech = RecordingSpeech::new();
        Fixture {
            navigator: Navigator::new(story::builtin()),
            view: RecordingStageView::new(),
            narration: NarrationController::new(Box::new(audio.clone()), Box::new(speech.clone())),
            audio,
            speech,
        }
    }

    #[test]
    fn test_initialize_without_hint_starts_at_intro() {
        // Arrange
        let mut f = fixture();

        // Act
        f.navigator
            .initialize(None, &mut f.view, &mut f.narration);

        // Assert
        let state = f.view.state();
        assert_eq!(state.title, "The Craftsmen of Archaic Korkyra");
        assert_eq!(state.action_labels, vec!["Continue".to_owned()]);
        assert_eq!(
            f.navigator.current_stage_id(),
            Some(&StageId::from("intro"))
        );
    }

    #[test]
    fn test_initialize_with_known_hint_starts_there() {
        // Arrange
        let mut f = fixture();
        let hint = StageId::from("instructions");

        // Act
        f.navigator
            .initialize(Some(&hint), &mut f.view, &mut f.narration);

        // Assert
        assert_eq!(f.view.state().title, "How to Play — Overview");
    }

    #[test]
    fn test_initialize_with_unknown_hint_falls_back_to_start() {
        // Arrange
        let mut f = fixture();
        let hint = StageId::from("nonexistent-id");

        // Act
        f.navigator
            .initialize(Some(&hint), &mut f.view, &mut f.narration);

        // Assert
        assert_eq!(
            f.navigator.current_stage_id(),
            Some(&StageId::from("intro"))
        );
    }

    #[test]
    fn test_initialize_runs_exactly_once() {
        // Arrange
        let mut f = fixture();
        f.navigator.initialize(None, &mut f.view, &mut f.narration);

        // Act
        let hint = StageId::from("role");
        f.navigator
            .initialize(Some(&hint), &mut f.view, &mut f.narration);

        // Assert
        assert_eq!(
            f.navigator.current_stage_id(),
            Some(&StageId::from("intro"))
        );
    }

    #[test]
    fn test_transition_renders_exactly_the_new_stage() {
        // Arrange
        let mut f = fixture();
        f.navigator.initialize(None, &mut f.view, &mut f.narration);

        // Act
        f.navigator
            .transition(&StageId::from("role"), false, &mut f.view, &mut f.narration);

        // Assert
        let state = f.view.state();
        assert_eq!(state.title, "Your Quest");
        assert!(state.body.contains("<strong>coins</strong>"));
        assert_eq!(
            state.action_labels,
            vec!["Continue".to_owned(), "Game Instructions".to_owned()]
        );
    }

    #[test]
    fn test_transition_to_unknown_stage_is_a_no_op() {
        // Arrange
        let mut f = fixture();
        f.navigator.initialize(None, &mut f.view, &mut f.narration);
        let before = f.view.state();

        // Act
        f.navigator.transition(
            &StageId::from("nonexistent-id"),
            false,
            &mut f.view,
            &mut f.narration,
        );

        // Assert
        let after = f.view.state();
        assert_eq!(after.title, before.title);
        assert_eq!(after.action_labels, before.action_labels);
        assert_eq!(after.action_replacements, before.action_replacements);
        assert_eq!(
            f.navigator.current_stage_id(),
            Some(&StageId::from("intro"))
        );
    }

    #[test]
    fn test_hard_reset_forces_sound_off_and_clears_history() {
        // Arrange
        let mut f = fixture();
        f.navigator.initialize(None, &mut f.view, &mut f.narration);
        f.narration.enable_sound(&mut f.view);

        // Act
        f.navigator
            .transition(&StageId::from("intro"), true, &mut f.view, &mut f.narration);

        // Assert
        assert!(!f.narration.is_enabled());
        let state = f.view.state();
        assert!(!state.sound_indicator);
        assert_eq!(state.history_clears, 1);
        assert!(f.audio.stop_calls() >= 1);
    }

    #[test]
    fn test_transition_narrates_stripped_body_when_sound_enabled() {
        // Arrange
        let mut f = fixture();
        f.navigator.initialize(None, &mut f.view, &mut f.narration);
        f.narration.enable_sound(&mut f.view);

        // Act
        f.navigator
            .transition(&StageId::from("role"), false, &mut f.view, &mut f.narration);

        // Assert
        let spoken = f.speech.spoken();
        assert_eq!(spoken.len(), 1);
        assert!(spoken[0].contains("earn coins!"));
        assert!(!spoken[0].contains('*'));
    }

    #[test]
    fn test_reveal_follow_up_rebinds_a_single_control() {
        // Arrange
        let mut f = fixture();
        f.navigator.initialize(None, &mut f.view, &mut f.narration);

        // Act
        let outcome = f.navigator.execute(0, &mut f.view, &mut f.narration);

        // Assert
        assert_eq!(outcome, NavigatorOutcome::Handled);
        assert_eq!(f.view.state().action_labels, vec!["Continue".to_owned()]);

        // The revealed control navigates to the role stage.
        f.navigator.execute(0, &mut f.view, &mut f.narration);
        assert_eq!(f.navigator.current_stage_id(), Some(&StageId::from("role")));
    }

    #[test]
    fn test_execute_out_of_range_is_a_no_op() {
        // Arrange
        let mut f = fixture();
        f.navigator.initialize(None, &mut f.view, &mut f.narration);

        // Act
        let outcome = f.navigator.execute(7, &mut f.view, &mut f.narration);

        // Assert
        assert_eq!(outcome, NavigatorOutcome::Handled);
        assert_eq!(
            f.navigator.current_stage_id(),
            Some(&StageId::from("intro"))
        );
    }

    #[test]
    fn test_enter_ar_is_delegated_to_the_owner() {
        // Arrange
        let mut f = fixture();
        f.navigator.initialize(None, &mut f.view, &mut f.narration);
        f.navigator
            .transition(&StageId::from("main-screen"), false, &mut f.view, &mut f.narration);

        // Act
        let outcome = f.navigator.execute(0, &mut f.view, &mut f.narration);

        // Assert
        assert_eq!(outcome, NavigatorOutcome::EnterAr);
        // The navigator itself stays on the hub stage.
        assert_eq!(
            f.navigator.current_stage_id(),
            Some(&StageId::from("main-screen"))
        );
    }
}
