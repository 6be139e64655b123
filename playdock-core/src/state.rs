//! Load and fullscreen state shared between the core and the web bridge.

/// Load lifecycle of a single runtime boot attempt.
///
/// Exactly one variant is active at a time. Per attempt, transitions only
/// move forward: `Ready` is never followed by `Loading` — a new attempt
/// resets to `Loading { 0 }` first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    Idle,
    Loading { progress: u8 },
    Error { message: String },
    Ready,
}

impl LoadState {
    /// Stable identifier handed to the host page.
    pub fn kind(&self) -> &'static str {
        match self {
            LoadState::Idle => "idle",
            LoadState::Loading { .. } => "loading",
            LoadState::Error { .. } => "error",
            LoadState::Ready => "ready",
        }
    }

    pub fn progress(&self) -> u8 {
        match self {
            LoadState::Loading { progress } => *progress,
            LoadState::Ready => 100,
            _ => 0,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            LoadState::Error { message } => Some(message),
            _ => None,
        }
    }

    /// Terminal states stay put until a new attempt resets the machine.
    pub fn is_terminal(&self) -> bool {
        matches!(self, LoadState::Error { .. } | LoadState::Ready)
    }
}

/// Map the factory's 0.0–1.0 fraction to an integer percent.
///
/// Range-clamped only. There is no clamping against the previously reported
/// value: a runtime that reports a transient decrease shows a regressing
/// percentage, matching the raw callback.
pub fn progress_percent(fraction: f64) -> u8 {
    if !fraction.is_finite() {
        return 0;
    }
    (fraction.clamp(0.0, 1.0) * 100.0).round() as u8
}

/// Fullscreen presentation state, independent of the load lifecycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FullscreenState {
    pub is_fullscreen: bool,
    pub show_rotate_hint: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_percent_is_integer_in_range() {
        assert_eq!(progress_percent(0.0), 0);
        assert_eq!(progress_percent(0.5), 50);
        assert_eq!(progress_percent(1.0), 100);
        assert_eq!(progress_percent(0.004), 0);
        assert_eq!(progress_percent(0.996), 100);
    }

    #[test]
    fn progress_percent_clamps_out_of_range_fractions() {
        assert_eq!(progress_percent(-0.3), 0);
        assert_eq!(progress_percent(1.7), 100);
        assert_eq!(progress_percent(f64::NAN), 0);
        assert_eq!(progress_percent(f64::INFINITY), 0);
    }

    #[test]
    fn progress_percent_tolerates_regression() {
        // Direct rounding of whatever the runtime reports, in any order.
        let reported = [0.1, 0.6, 0.4, 0.9];
        let shown: Vec<u8> = reported.iter().map(|f| progress_percent(*f)).collect();
        assert_eq!(shown, vec![10, 60, 40, 90]);
    }

    #[test]
    fn load_state_accessors() {
        assert_eq!(LoadState::Idle.kind(), "idle");
        assert_eq!(LoadState::Loading { progress: 42 }.progress(), 42);
        assert_eq!(LoadState::Ready.progress(), 100);

        let err = LoadState::Error { message: "boom".into() };
        assert_eq!(err.error_message(), Some("boom"));
        assert!(err.is_terminal());
        assert!(LoadState::Ready.is_terminal());
        assert!(!LoadState::Loading { progress: 0 }.is_terminal());
    }

    #[test]
    fn fullscreen_state_defaults_off() {
        let fs = FullscreenState::default();
        assert!(!fs.is_fullscreen);
        assert!(!fs.show_rotate_hint);
    }
}
