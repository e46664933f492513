//! Korkyra — Narration Controller.
//!
//! Owns the sound-enabled flag and the start/stop of ambient audio and
//! speech output. Narration is a best-effort enhancement: every playback
//! path degrades silently and only leaves a trace in the logs.

use korkyra_core::ports::{AmbientAudio, PlaybackOutcome, SpeechSynthesizer, StageView};
use korkyra_stages::markup;

/// Looping ambient playback volume.
const AMBIENT_VOLUME: f32 = 0.4;

/// Gates and drives all audio/speech side effects of the experience.
pub struct NarrationController {
    sound_enabled: bool,
    audio: Box<dyn AmbientAudio>,
    speech: Box<dyn SpeechSynthesizer>,
}

impl NarrationController {
    /// Creates a controller with sound disabled, as on page load.
    #[must_use]
    pub fn new(audio: Box<dyn AmbientAudio>, speech: Box<dyn SpeechSynthesizer>) -> Self {
        Self {
            sound_enabled: false,
            audio,
            speech,
        }
    }

    /// Whether audio/speech side effects are currently allowed.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.sound_enabled
    }

    /// Enables sound and updates the sound-indicator affordance.
    pub fn enable_sound(&mut self, view: &mut dyn StageView) {
        self.sound_enabled = true;
        view.set_sound_indicator(true);
    }

    /// Disables sound, updates the indicator, cancels any in-progress
    /// narration, and stops ambient playback. Safe to call repeatedly and
    /// when nothing is playing.
    pub fn disable_sound(&mut self, view: &mut dyn StageView) {
        self.sound_enabled = false;
        view.set_sound_indicator(false);
        self.speech.cancel();
        self.audio.stop();
    }

    /// The voice-toggle control: disables sound when enabled; otherwise
    /// enables it, starts the ambient loop, and narrates the current
    /// stage's body if one is displayed.
    pub fn toggle(&mut self, view: &mut dyn StageView, current_body: Option<&str>) {
        if self.sound_enabled {
            self.disable_sound(view);
        } else {
            self.enable_sound(view);
            self.play_ambient();
            if let Some(body) = current_body {
                self.speak(body);
            }
        }
    }

    /// Starts looping ambient playback at a fixed moderate volume. A
    /// rejected attempt (autoplay policy) is logged and swallowed.
    pub fn play_ambient(&mut self) -> PlaybackOutcome {
        if !self.sound_enabled {
            return PlaybackOutcome::Skipped;
        }
        let outcome = self.audio.play_looping(AMBIENT_VOLUME);
        match outcome {
            PlaybackOutcome::Rejected => {
                tracing::debug!("ambient playback rejected by the output device");
            }
            PlaybackOutcome::Unavailable => {
                tracing::debug!("no ambient audio capability present");
            }
            PlaybackOutcome::Played | PlaybackOutcome::Skipped => {}
        }
        outcome
    }

    /// Stops ambient playback unconditionally.
    pub fn stop_ambient(&mut self) {
        self.audio.stop();
    }

    /// Narrates a stage body. Any current utterance is cancelled first; at
    /// most one utterance is ever active. The Markdown body is reduced to
    /// plain text before synthesis. No-op (beyond the cancellation) while
    /// sound is disabled.
    pub fn speak(&mut self, body_markdown: &str) -> PlaybackOutcome {
        self.speech.cancel();
        if !self.sound_enabled {
            return PlaybackOutcome::Skipped;
        }
        let text = markup::speech_text(body_markdown);
        let outcome = self.speech.speak(&text);
        if outcome == PlaybackOutcome::Unavailable {
            tracing::debug!("speech synthesis unavailable, narration skipped");
        }
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use korkyra_test_support::{RecordingAudio, RecordingSpeech, RecordingStageView};

    fn controller(
        audio: &RecordingAudio,
        speech: &RecordingSpeech,
    ) -> NarrationController {
        NarrationController::new(Box::new(audio.clone()), Box::new(speech.clone()))
    }

    #[test]
    fn test_disable_sound_twice_is_safe_and_stays_off() {
        // Arrange
        let audio = RecordingAudio::new();
        let speech = RecordingSpeech::new();
        let mut view = RecordingStageView::new();
        let mut narration = controller(&audio, &speech);

        // Act
        narration.enable_sound(&mut view);
        narration.disable_sound(&mut view);
        narration.disable_sound(&mut view);

        // Assert
        assert!(!narration.is_enabled());
        assert!(!view.state().sound_indicator);
        assert_eq!(audio.stop_calls(), 2);
        assert_eq!(speech.cancel_calls(), 2);
    }

    #[test]
    fn test_speak_reduces_markup_to_plain_text() {
        // Arrange
        let audio = RecordingAudio::new();
        let speech = RecordingSpeech::new();
        let mut view = RecordingStageView::new();
        let mut narration = controller(&audio, &speech);
        narration.enable_sound(&mut view);

        // Act
        let outcome = narration.speak("Complete their requests to earn **coins**!");

        // Assert
        assert_eq!(outcome, PlaybackOutcome::Played);
        assert_eq!(
            speech.spoken(),
            vec!["Complete their requests to earn coins!".to_owned()]
        );
    }

    #[test]
    fn test_speak_cancels_previous_utterance_even_when_disabled() {
        // Arrange
        let audio = RecordingAudio::new();
        let speech = RecordingSpeech::new();
        let mut narration = controller(&audio, &speech);

        // Act
        let outcome = narration.speak("Anything");

        // Assert
        assert_eq!(outcome, PlaybackOutcome::Skipped);
        assert_eq!(speech.cancel_calls(), 1);
        assert!(speech.spoken().is_empty());
    }

    #[test]
    fn test_play_ambient_skipped_while_disabled() {
        // Arrange
        let audio = RecordingAudio::new();
        let speech = RecordingSpeech::new();
        let mut narration = controller(&audio, &speech);

        // Act + Assert
        assert_eq!(narration.play_ambient(), PlaybackOutcome::Skipped);
        assert_eq!(audio.play_calls(), 0);
    }

    #[test]
    fn test_play_ambient_swallows_autoplay_rejection() {
        // Arrange
        let audio = RecordingAudio::with_outcome(PlaybackOutcome::Rejected);
        let speech = RecordingSpeech::new();
        let mut view = RecordingStageView::new();
        let mut narration = controller(&audio, &speech);
        narration.enable_sound(&mut view);

        // Act + Assert
        assert_eq!(narration.play_ambient(), PlaybackOutcome::Rejected);
        assert!(!audio.is_playing());
        // Sound stays enabled: rejection is not an error state.
        assert!(narration.is_enabled());
    }

    #[test]
    fn test_toggle_enables_ambient_and_narrates_current_body() {
        // Arrange
        let audio = RecordingAudio::new();
        let speech = RecordingSpeech::new();
        let mut view = RecordingStageView::new();
        let mut narration = controller(&audio, &speech);

        // Act
        narration.toggle(&mut view, Some("Your **Quest**"));

        // Assert
        assert!(narration.is_enabled());
        assert!(view.state().sound_indicator);
        assert!((audio.last_volume().unwrap() - 0.4).abs() < f32::EPSILON);
        assert_eq!(speech.spoken(), vec!["Your Quest".to_owned()]);

        narration.toggle(&mut view, Some("Your **Quest**"));
        assert!(!narration.is_enabled());
        assert!(!audio.is_playing());
    }
}
