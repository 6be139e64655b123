//! Playdock WASM Web Bridge
//!
//! Boots an externally supplied WebGL game runtime inside the hosting page:
//! resolves asset locations from an optional `Build.json` manifest, injects
//! the runtime's loader script, instantiates the runtime against a canvas
//! with progress reporting, and manages a cross-browser fullscreen and
//! orientation experience.

#[cfg(target_arch = "wasm32")]
mod dom;
#[cfg(target_arch = "wasm32")]
mod factory;
#[cfg(target_arch = "wasm32")]
mod fullscreen;
pub mod handles;
#[cfg(target_arch = "wasm32")]
mod loader;
pub mod platform;
pub mod vendor;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
pub use loader::GameLoader;

/// Entry point — called when the WASM module loads.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).expect("Failed to init logger");
    log::info!("Playdock web bridge initialized");
}

/// Create a loader for one build.
///
/// `canvas_id` is the drawing surface the runtime renders into and
/// `container_id` the element taken fullscreen around it. The build name is
/// optional; when absent it is detected from the manifest or the base URL.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub fn create_loader(
    canvas_id: String,
    container_id: String,
    base_url: String,
    build_folder: String,
    build_name: Option<String>,
) -> GameLoader {
    GameLoader::new(canvas_id, container_id, base_url, build_folder, build_name)
}
