//! Core logic for the Playdock game runtime loader.
//!
//! Everything in this crate is pure and host-testable: parsing the optional
//! `Build.json` manifest, resolving asset URLs with deterministic fallbacks,
//! and the load/fullscreen state types shared with the web bridge.

pub mod error;
pub mod manifest;
pub mod resolve;
pub mod state;

pub use error::{annotate_instantiation_error, LoadError};
pub use manifest::{BuildManifest, CodeUrl};
pub use resolve::{
    build_path, detect_build_name, loader_script_url, resolve_config, RuntimeInstanceConfig,
    DEFAULT_BUILD_NAME,
};
pub use state::{progress_percent, FullscreenState, LoadState};
