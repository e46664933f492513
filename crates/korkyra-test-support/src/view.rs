//! Recording view fakes for the `StageView` and `CameraView` ports.

use std::sync::{Arc, Mutex};

use korkyra_core::ports::{ActiveView, CameraView, StageView};

/// Observable state of a [`RecordingStageView`].
#[derive(Debug, Clone, Default)]
pub struct StageViewState {
    /// Last title written.
    pub title: String,
    /// Last body markup written.
    pub body: String,
    /// Last background set, if any.
    pub background: Option<String>,
    /// Currently bound action labels.
    pub action_labels: Vec<String>,
    /// How many times the action list was replaced.
    pub action_replacements: usize,
    /// Last sound-indicator value written.
    pub sound_indicator: bool,
    /// How many times the history marker was cleared.
    pub history_clears: usize,
}

/// A `StageView` that records every write for later inspection.
#[derive(Debug, Clone, Default)]
pub struct RecordingStageView {
    inner: Arc<Mutex<StageViewState>>,
}

impl RecordingStageView {
    /// Creates an empty recording view.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of the recorded state.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn state(&self) -> StageViewState {
        self.inner.lock().unwrap().clone()
    }
}

impl StageView for RecordingStageView {
    fn set_title(&mut self, title: &str) {
        self.inner.lock().unwrap().title = title.to_owned();
    }

    fn set_body(&mut self, markup: &str) {
        self.inner.lock().unwrap().body = markup.to_owned();
    }

    fn set_background(&mut self, background: &str) {
        self.inner.lock().unwrap().background = Some(background.to_owned());
    }

    fn replace_actions(&mut self, labels: &[String]) {
        let mut state = self.inner.lock().unwrap();
        state.action_labels = labels.to_vec();
        state.action_replacements += 1;
    }

    fn set_sound_indicator(&mut self, enabled: bool) {
        self.inner.lock().unwrap().sound_indicator = enabled;
    }

    fn clear_history_marker(&mut self) {
        self.inner.lock().unwrap().history_clears += 1;
    }
}

/// Observable state of a [`RecordingCameraView`].
#[derive(Debug, Clone)]
pub struct CameraViewState {
    /// Which layer is currently shown.
    pub active_view: ActiveView,
    /// Whether the raw camera feed element is visible.
    pub camera_feed_visible: bool,
    /// Whether the embedded simulation surface is visible.
    pub simulation_visible: bool,
    /// Last status line written.
    pub status: String,
}

impl Default for CameraViewState {
    fn default() -> Self {
        Self {
            active_view: ActiveView::Narrative,
            camera_feed_visible: true,
            simulation_visible: false,
            status: String::new(),
        }
    }
}

/// A `CameraView` that records every write for later inspection.
#[derive(Debug, Clone, Default)]
pub struct RecordingCameraView {
    inner: Arc<Mutex<CameraViewState>>,
}

impl RecordingCameraView {
    /// Creates a camera view in its initial state (narrative layer shown,
    /// feed visible, simulation hidden).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of the recorded state.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn state(&self) -> CameraViewState {
        self.inner.lock().unwrap().clone()
    }
}

impl CameraView for RecordingCameraView {
    fn show_view(&mut self, view: ActiveView) {
        self.inner.lock().unwrap().active_view = view;
    }

    fn set_camera_feed_visible(&mut self, visible: bool) {
        self.inner.lock().unwrap().camera_feed_visible = visible;
    }

    fn set_simulation_visible(&mut self, visible: bool) {
        self.inner.lock().unwrap().simulation_visible = visible;
    }

    fn set_status(&mut self, text: &str) {
        self.inner.lock().unwrap().status = text.to_owned();
    }
}
