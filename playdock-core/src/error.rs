//! User-visible load failures.
//!
//! Manifest-fetch problems are deliberately absent: a missing or malformed
//! `Build.json` degrades to the default asset locations instead of surfacing.

use thiserror::Error;

/// Failures that surface as the blocking error state. The only supported
/// recovery is reloading the hosting page; the runtime cannot be safely
/// re-initialized against a reused drawing surface.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LoadError {
    #[error(
        "failed to load the runtime script at {url} — check that the build path is \
         correct, the files were deployed, and the server allows cross-origin requests"
    )]
    ScriptLoad { url: String },

    #[error("runtime factory not found on the page; the loader script did not define it")]
    FactoryMissing,

    #[error("drawing surface not found in the document")]
    SurfaceMissing,

    #[error("drawing surface is not attached to the visible document")]
    SurfaceDetached,

    #[error("runtime failed to start: {message}")]
    Instantiation { message: String },

    #[error("{message}")]
    RuntimeReported { message: String },
}

/// Markers that a factory rejection came from the runtime querying the
/// document for its canvas and finding it gone.
const DOM_QUERY_MARKERS: [&str; 3] = ["querySelector", "getElementById", "appendChild"];

/// Annotate a factory rejection message when it indicates a DOM query
/// failure; the usual cause is the host page replacing the drawing surface
/// while the runtime was still booting. Other messages pass through.
pub fn annotate_instantiation_error(message: &str) -> String {
    if DOM_QUERY_MARKERS.iter().any(|m| message.contains(m)) {
        format!(
            "{message} (the runtime queried the document for its canvas and failed; \
             the host page likely replaced or detached the drawing surface during load)"
        )
    } else {
        message.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn script_load_error_names_url_and_causes() {
        let err = LoadError::ScriptLoad { url: "/game/Build/GODUCK.loader.js".into() };
        let text = err.to_string();
        assert!(text.contains("/game/Build/GODUCK.loader.js"));
        assert!(text.contains("cross-origin"));
    }

    #[test]
    fn dom_query_rejections_are_annotated() {
        let annotated = annotate_instantiation_error("null is not an object (querySelector)");
        assert!(annotated.contains("querySelector"));
        assert!(annotated.contains("drawing surface"));
    }

    #[test]
    fn other_rejections_pass_through() {
        let message = "wasm streaming compile failed";
        assert_eq!(annotate_instantiation_error(message), message);
    }
}
