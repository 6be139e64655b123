//! Platform heuristics and orientation policy, kept free of browser handles
//! so they compile and test on the host.

/// Platforms with no usable element-fullscreen API (iOS Safari, and iPadOS
/// masquerading as macOS). Recent iPads report a `MacIntel` platform string;
/// the touch-point count is what gives them away.
pub fn is_ios_like(user_agent: &str, platform: &str, max_touch_points: i32) -> bool {
    user_agent.contains("iPhone")
        || user_agent.contains("iPad")
        || user_agent.contains("iPod")
        || (platform == "MacIntel" && max_touch_points > 1)
}

/// What the orientation monitor should do after a recheck.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrientationAction {
    /// Not fullscreen: nothing to enforce.
    None,
    /// Landscape while fullscreen: clear any rotate hint.
    HideHint,
    /// Portrait while fullscreen on a platform that can go fullscreen but
    /// not lock orientation: keep asking until the user rotates.
    ShowStickyHint,
    /// Portrait on a platform without a fullscreen API: the CSS-only
    /// presentation cannot force landscape, so leave fullscreen entirely.
    ExitFullscreen,
}

/// Whether the orientation monitors (orientation change, resize,
/// window orientationchange) should be wired. They follow the fullscreen
/// flag itself, regardless of how the flag was set — user toggle, native
/// fullscreen-change event, or the toggle's failure recovery.
pub fn monitors_active(is_fullscreen: bool) -> bool {
    is_fullscreen
}

pub fn orientation_action(
    is_fullscreen: bool,
    is_landscape: bool,
    no_fullscreen_api: bool,
) -> OrientationAction {
    if !is_fullscreen {
        OrientationAction::None
    } else if is_landscape {
        OrientationAction::HideHint
    } else if no_fullscreen_api {
        OrientationAction::ExitFullscreen
    } else {
        OrientationAction::ShowStickyHint
    }
}
