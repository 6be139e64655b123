//! Vendor-prefixed browser capability tables.
//!
//! Each capability is probed in fixed order; the first name that exists on
//! the target object wins. The unprefixed standard always comes first.

pub const REQUEST_FULLSCREEN: [&str; 4] = [
    "requestFullscreen",
    "webkitRequestFullscreen",
    "mozRequestFullScreen",
    "msRequestFullscreen",
];

pub const EXIT_FULLSCREEN: [&str; 4] = [
    "exitFullscreen",
    "webkitExitFullscreen",
    "mozCancelFullScreen",
    "msExitFullscreen",
];

pub const FULLSCREEN_ELEMENT: [&str; 4] = [
    "fullscreenElement",
    "webkitFullscreenElement",
    "mozFullScreenElement",
    "msFullscreenElement",
];

pub const FULLSCREEN_CHANGE_EVENTS: [&str; 4] = [
    "fullscreenchange",
    "webkitfullscreenchange",
    "mozfullscreenchange",
    "MSFullscreenChange",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_names_are_probed_first() {
        assert_eq!(REQUEST_FULLSCREEN[0], "requestFullscreen");
        assert_eq!(EXIT_FULLSCREEN[0], "exitFullscreen");
        assert_eq!(FULLSCREEN_ELEMENT[0], "fullscreenElement");
        assert_eq!(FULLSCREEN_CHANGE_EVENTS[0], "fullscreenchange");
    }

    #[test]
    fn every_capability_covers_the_same_vendor_families() {
        // webkit, moz, ms variants exist for each table.
        for table in [
            &REQUEST_FULLSCREEN,
            &EXIT_FULLSCREEN,
            &FULLSCREEN_ELEMENT,
        ] {
            assert!(table.iter().any(|n| n.starts_with("webkit")));
            assert!(table.iter().any(|n| n.starts_with("moz")));
            assert!(table.iter().any(|n| n.starts_with("ms")));
        }
    }
}
