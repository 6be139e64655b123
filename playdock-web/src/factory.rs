//! Lookup and invocation of the page-global runtime factory.

use js_sys::{Array, Function, Object, Promise, Reflect};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys::HtmlCanvasElement;

use playdock_core::RuntimeInstanceConfig;

/// Global the loader script is expected to define.
pub const FACTORY_GLOBAL: &str = "createUnityInstance";

/// The externally supplied function that boots the game player against a
/// drawing surface. Resolved at call time, never cached across attempts.
pub struct RuntimeFactory {
    func: Function,
}

impl RuntimeFactory {
    pub fn lookup() -> Option<RuntimeFactory> {
        let win = web_sys::window()?;
        let value = Reflect::get(win.as_ref(), &JsValue::from_str(FACTORY_GLOBAL)).ok()?;
        value
            .dyn_into::<Function>()
            .ok()
            .map(|func| RuntimeFactory { func })
    }

    /// `factory(canvas, config, onProgress) -> Promise<instance>`.
    pub async fn instantiate(
        &self,
        canvas: &HtmlCanvasElement,
        config: &Object,
        on_progress: &Function,
    ) -> Result<RuntimeInstance, JsValue> {
        let promise: Promise = self
            .func
            .call3(&JsValue::NULL, canvas.as_ref(), config.as_ref(), on_progress)?
            .dyn_into()?;
        let handle = JsFuture::from(promise).await?;
        Ok(RuntimeInstance { handle })
    }
}

/// Opaque handle returned by the factory; exposes shutdown via `Quit()`.
pub struct RuntimeInstance {
    handle: JsValue,
}

impl RuntimeInstance {
    /// Best-effort shutdown. The quit promise is awaited in a detached task;
    /// every failure is logged and swallowed.
    pub fn quit(self) {
        let quit = match Reflect::get(&self.handle, &JsValue::from_str("Quit"))
            .ok()
            .and_then(|value| value.dyn_into::<Function>().ok())
        {
            Some(func) => func,
            None => {
                log::debug!("runtime instance has no Quit method");
                return;
            }
        };
        match quit.call0(&self.handle) {
            Ok(value) => {
                if let Ok(promise) = value.dyn_into::<Promise>() {
                    spawn_local(async move {
                        if let Err(err) = JsFuture::from(promise).await {
                            log::debug!("runtime quit rejected: {err:?}");
                        }
                    });
                }
            }
            Err(err) => log::debug!("runtime quit threw: {err:?}"),
        }
    }
}

/// Build the JS config object for the factory call.
pub fn to_js_config(
    config: &RuntimeInstanceConfig,
    show_banner: &Function,
) -> Result<Object, JsValue> {
    let obj = Object::new();
    set(&obj, "dataUrl", &JsValue::from_str(&config.data_url))?;
    set(&obj, "frameworkUrl", &JsValue::from_str(&config.framework_url))?;
    set(&obj, "codeUrl", &JsValue::from_str(config.code_url()))?;
    set(
        &obj,
        "streamingAssetsUrl",
        &JsValue::from_str(&config.streaming_assets_url),
    )?;
    set(&obj, "companyName", &JsValue::from_str(&config.company_name))?;
    set(&obj, "productName", &JsValue::from_str(&config.product_name))?;
    set(&obj, "productVersion", &JsValue::from_str(&config.product_version))?;
    let arguments = Array::new();
    for arg in &config.arguments {
        arguments.push(&JsValue::from_str(arg));
    }
    set(&obj, "arguments", arguments.as_ref())?;
    set(&obj, "showBanner", show_banner.as_ref())?;
    Ok(obj)
}

fn set(obj: &Object, key: &str, value: &JsValue) -> Result<(), JsValue> {
    Reflect::set(obj.as_ref(), &JsValue::from_str(key), value)?;
    Ok(())
}
