//! Progress indicators.
//!
//! # Responsibilities
//! - Show a determinate bar (percentage) or an indeterminate spinner
//! - Clamp reported percentages to 0..=100
//! - Hide the indicator when the operation ends

/// Kind of indicator to show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressMode {
    /// Known completion percentage.
    Determinate,
    /// No known percentage; shown as a continuous animation.
    Indeterminate,
}

/// A visible indicator returned by [`ProgressReporter::show`].
pub trait ProgressHandle: Send {
    /// Report completion in percent. Ignored for indeterminate indicators.
    fn update(&mut self, percent: f64);
    fn hide(self: Box<Self>);
}

/// Creates progress indicators for named targets.
pub trait ProgressReporter: Send + Sync {
    fn show(&self, target: &str, mode: ProgressMode) -> Box<dyn ProgressHandle>;
}

/// Indicator state without any rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressState {
    pub mode: ProgressMode,
    /// Bar fill, 0.0..=100.0.
    pub fill: f64,
}

impl ProgressState {
    pub fn new(mode: ProgressMode) -> Self {
        Self { mode, fill: 0.0 }
    }

    /// Apply an update. Returns false when the update was ignored.
    pub fn apply(&mut self, percent: f64) -> bool {
        if self.mode == ProgressMode::Indeterminate || percent.is_nan() {
            return false;
        }
        self.fill = percent.clamp(0.0, 100.0);
        true
    }

    /// Label text, e.g. "42%". None while indeterminate.
    pub fn label(&self) -> Option<String> {
        match self.mode {
            ProgressMode::Determinate => Some(format!("{}%", self.fill.round() as u32)),
            ProgressMode::Indeterminate => None,
        }
    }
}

/// Reports progress through tracing events.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogProgress;

struct LogProgressHandle {
    target: String,
    state: ProgressState,
    last_logged: Option<u32>,
}

impl ProgressHandle for LogProgressHandle {
    fn update(&mut self, percent: f64) {
        if !self.state.apply(percent) {
            return;
        }
        // Log at most once per 10% step.
        let step = (self.state.fill / 10.0).floor() as u32;
        if self.last_logged != Some(step) {
            self.last_logged = Some(step);
            tracing::info!(target_id = %self.target, progress = ?self.state.label(), "Progress");
        }
    }

    fn hide(self: Box<Self>) {
        tracing::debug!(target_id = %self.target, "Progress hidden");
    }
}

impl ProgressReporter for LogProgress {
    fn show(&self, target: &str, mode: ProgressMode) -> Box<dyn ProgressHandle> {
        tracing::debug!(target_id = target, mode = ?mode, "Progress shown");
        Box::new(LogProgressHandle {
            target: target.to_string(),
            state: ProgressState::new(mode),
            last_logged: None,
        })
    }
}
