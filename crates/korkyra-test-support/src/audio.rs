//! Recording fakes for the `AmbientAudio` and `SpeechSynthesizer` ports.

use std::sync::{Arc, Mutex};

use korkyra_core::ports::{AmbientAudio, PlaybackOutcome, SpeechSynthesizer};

#[derive(Debug, Default)]
struct AudioState {
    playing: bool,
    last_volume: Option<f32>,
    play_calls: usize,
    stop_calls: usize,
}

/// An `AmbientAudio` fake that records play/stop calls and returns a
/// configured outcome from every play attempt.
#[derive(Debug, Clone)]
pub struct RecordingAudio {
    outcome: PlaybackOutcome,
    inner: Arc<Mutex<AudioState>>,
}

impl RecordingAudio {
    /// Creates an audio fake that accepts every play attempt.
    #[must_use]
    pub fn new() -> Self {
        Self::with_outcome(PlaybackOutcome::Played)
    }

    /// Creates an audio fake that returns `outcome` from every play
    /// attempt. Use `PlaybackOutcome::Rejected` to model an autoplay
    /// restriction.
    #[must_use]
    pub fn with_outcome(outcome: PlaybackOutcome) -> Self {
        Self {
            outcome,
            inner: Arc::new(Mutex::new(AudioState::default())),
        }
    }

    /// Whether playback is currently considered running.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn is_playing(&self) -> bool {
        self.inner.lock().unwrap().playing
    }

    /// The volume passed to the most recent play attempt.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn last_volume(&self) -> Option<f32> {
        self.inner.lock().unwrap().last_volume
    }

    /// Number of play attempts observed.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn play_calls(&self) -> usize {
        self.inner.lock().unwrap().play_calls
    }

    /// Number of stop calls observed.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn stop_calls(&self) -> usize {
        self.inner.lock().unwrap().stop_calls
    }
}

impl Default for RecordingAudio {
    fn default() -> Self {
        Self::new()
    }
}

impl AmbientAudio for RecordingAudio {
    fn play_looping(&mut self, volume: f32) -> PlaybackOutcome {
        let mut state = self.inner.lock().unwrap();
        state.play_calls += 1;
        state.last_volume = Some(volume);
        if self.outcome == PlaybackOutcome::Played {
            state.playing = true;
        }
        self.outcome
    }

    fn stop(&mut self) {
        let mut state = self.inner.lock().unwrap();
        state.stop_calls += 1;
        state.playing = false;
    }
}

#[derive(Debug, Default)]
struct SpeechState {
    spoken: Vec<String>,
    cancel_calls: usize,
}

/// A `SpeechSynthesizer` fake that records utterances and cancellations.
#[derive(Debug, Clone)]
pub struct RecordingSpeech {
    outcome: PlaybackOutcome,
    inner: Arc<Mutex<SpeechState>>,
}

impl RecordingSpeech {
    /// Creates a synthesizer fake that accepts every utterance.
    #[must_use]
    pub fn new() -> Self {
        Self::with_outcome(PlaybackOutcome::Played)
    }

    /// Creates a synthesizer fake returning `outcome` from every `speak`
    /// call. Use `PlaybackOutcome::Unavailable` to model an environment
    /// without speech synthesis.
    #[must_use]
    pub fn with_outcome(outcome: PlaybackOutcome) -> Self {
        Self {
            outcome,
            inner: Arc::new(Mutex::new(SpeechState::default())),
        }
    }

    /// All utterances submitted so far, in order.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn spoken(&self) -> Vec<String> {
        self.inner.lock().unwrap().spoken.clone()
    }

    /// Number of cancel calls observed.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn cancel_calls(&self) -> usize {
        self.inner.lock().unwrap().cancel_calls
    }
}

impl Default for RecordingSpeech {
    fn default() -> Self {
        Self::new()
    }
}

impl SpeechSynthesizer for RecordingSpeech {
    fn speak(&mut self, text: &str) -> PlaybackOutcome {
        if self.outcome != PlaybackOutcome::Unavailable {
            self.inner.lock().unwrap().spoken.push(text.to_owned());
        }
        self.outcome
    }

    fn cancel(&mut self) {
        self.inner.lock().unwrap().cancel_calls += 1;
    }
}
