//! Small async wrappers over browser scheduling primitives.

use js_sys::Promise;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Document, Window};

pub fn window() -> Result<Window, JsValue> {
    web_sys::window().ok_or_else(|| JsValue::from_str("no window"))
}

pub fn document() -> Result<Document, JsValue> {
    window()?
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))
}

/// Resolves after `ms` milliseconds.
pub async fn sleep_ms(ms: i32) -> Result<(), JsValue> {
    let promise = Promise::new(&mut |resolve, _reject| {
        if let Some(win) = web_sys::window() {
            let _ = win.set_timeout_with_callback_and_timeout_and_arguments_0(&resolve, ms);
        }
    });
    JsFuture::from(promise).await?;
    Ok(())
}

/// Resolves at the next animation frame boundary.
pub async fn next_animation_frame() -> Result<(), JsValue> {
    let promise = Promise::new(&mut |resolve, _reject| {
        if let Some(win) = web_sys::window() {
            let _ = win.request_animation_frame(&resolve);
        }
    });
    JsFuture::from(promise).await?;
    Ok(())
}

/// Resolves once the document is fully loaded; immediately if it already is.
pub async fn document_ready() -> Result<(), JsValue> {
    if document()?.ready_state() == "complete" {
        return Ok(());
    }
    let win = window()?;
    let promise = Promise::new(&mut |resolve, _reject| {
        let _ = win.add_event_listener_with_callback("load", &resolve);
    });
    JsFuture::from(promise).await?;
    Ok(())
}
