//! Script lifecycle and runtime instantiation state machine.
//!
//! One load attempt moves `Loading -> (Ready | Error)`. Every attempt gets
//! an epoch; state updates carrying a stale epoch are discarded, so a restart
//! mid-flight can never leave two runtime instances fighting over the canvas.

use std::cell::RefCell;
use std::rc::Rc;

use js_sys::{Function, Promise};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys::{HtmlCanvasElement, HtmlScriptElement};

use playdock_core::{
    annotate_instantiation_error, build_path, detect_build_name, loader_script_url,
    progress_percent, resolve_config, BuildManifest, LoadError, LoadState,
};

use crate::dom;
use crate::factory::{to_js_config, RuntimeFactory, RuntimeInstance};
use crate::fullscreen::FullscreenController;
use crate::handles::AttemptHandles;

const MANIFEST_FILE: &str = "Build.json";

struct Inner {
    canvas_id: String,
    base_url: String,
    build_folder: String,
    build_name: Option<String>,
    load: LoadState,
    on_change: Option<Function>,
    /// Monotonically increasing attempt id.
    epoch: u64,
    /// Take-once storage: restart and unload both tear down through it.
    handles: AttemptHandles<HtmlScriptElement, RuntimeInstance>,
    /// Callbacks handed to the runtime. Kept alive for the instance
    /// lifetime; replaced (and only then dropped) by the next attempt.
    progress_cb: Option<Closure<dyn FnMut(f64)>>,
    banner_cb: Option<Closure<dyn FnMut(JsValue, JsValue)>>,
}

/// Browser-facing handle for one hosted build.
#[wasm_bindgen]
pub struct GameLoader {
    inner: Rc<RefCell<Inner>>,
    fullscreen: FullscreenController,
}

impl GameLoader {
    pub(crate) fn new(
        canvas_id: String,
        container_id: String,
        base_url: String,
        build_folder: String,
        build_name: Option<String>,
    ) -> GameLoader {
        let inner = Rc::new(RefCell::new(Inner {
            canvas_id: canvas_id.clone(),
            base_url,
            build_folder,
            build_name,
            load: LoadState::Idle,
            on_change: None,
            epoch: 0,
            handles: AttemptHandles::new(),
            progress_cb: None,
            banner_cb: None,
        }));
        let fullscreen = FullscreenController::new(container_id, canvas_id);
        GameLoader { inner, fullscreen }
    }
}

#[wasm_bindgen]
impl GameLoader {
    /// Start (or restart) a load attempt. A previous attempt's script tag
    /// and instance are torn down before the new one begins.
    pub fn load(&self) {
        let epoch = {
            let mut st = self.inner.borrow_mut();
            st.epoch += 1;
            teardown(&mut st);
            st.epoch
        };
        set_state(&self.inner, epoch, LoadState::Loading { progress: 0 });
        let inner = self.inner.clone();
        spawn_local(async move {
            if let Err(err) = run_attempt(&inner, epoch).await {
                set_state(&inner, epoch, LoadState::Error { message: err.to_string() });
            }
        });
    }

    /// Tear down: remove the injected script tag if still attached and quit
    /// the runtime instance exactly once, swallowing shutdown errors.
    pub fn unload(&self) {
        {
            let mut st = self.inner.borrow_mut();
            st.epoch += 1;
            st.load = LoadState::Idle;
            teardown(&mut st);
        }
        self.fullscreen.unhook();
    }

    /// Register a change callback; invoked with `"load"` or `"fullscreen"`
    /// whenever the corresponding state changes. The host reads details
    /// back through the getters.
    pub fn set_on_change(&self, callback: Function) {
        self.inner.borrow_mut().on_change = Some(callback.clone());
        self.fullscreen.set_on_change(callback);
    }

    pub fn state(&self) -> String {
        self.inner.borrow().load.kind().to_string()
    }

    pub fn progress(&self) -> u32 {
        self.inner.borrow().load.progress() as u32
    }

    pub fn error_message(&self) -> Option<String> {
        self.inner.borrow().load.error_message().map(str::to_string)
    }

    pub fn toggle_fullscreen(&self) {
        self.fullscreen.toggle();
    }

    pub fn is_fullscreen(&self) -> bool {
        self.fullscreen.is_fullscreen()
    }

    pub fn show_rotate_hint(&self) -> bool {
        self.fullscreen.show_rotate_hint()
    }
}

fn stale(inner: &Rc<RefCell<Inner>>, epoch: u64) -> bool {
    inner.borrow().epoch != epoch
}

fn set_state(inner: &Rc<RefCell<Inner>>, epoch: u64, state: LoadState) {
    let callback = {
        let mut st = inner.borrow_mut();
        if st.epoch != epoch {
            return;
        }
        st.load = state;
        st.on_change.clone()
    };
    if let Some(cb) = callback {
        let _ = cb.call1(&JsValue::NULL, &JsValue::from_str("load"));
    }
}

fn teardown(st: &mut Inner) {
    let (script, instance) = st.handles.take_for_teardown();
    if let Some(script) = script {
        if script.is_connected() {
            script.remove();
        }
    }
    if let Some(instance) = instance {
        instance.quit();
    }
}

async fn run_attempt(inner: &Rc<RefCell<Inner>>, epoch: u64) -> Result<(), LoadError> {
    let (base_url, build_folder, explicit) = {
        let st = inner.borrow();
        (st.base_url.clone(), st.build_folder.clone(), st.build_name.clone())
    };
    let path = build_path(&base_url, &build_folder);

    // Best-effort: a missing or malformed manifest means defaults, never an error.
    let manifest = fetch_manifest(&format!("{path}/{MANIFEST_FILE}")).await;
    let name = detect_build_name(&base_url, explicit.as_deref(), manifest.as_ref());
    let config = resolve_config(&base_url, &build_folder, explicit.as_deref(), manifest.as_ref());

    if stale(inner, epoch) {
        return Ok(());
    }

    let script_url = loader_script_url(&path, &name);
    inject_script(inner, epoch, &script_url).await?;

    // The surface may still be mid-reconciliation when the script finishes;
    // wait for the document to fully load plus two frame boundaries before
    // letting the runtime touch it.
    let _ = dom::document_ready().await;
    let _ = dom::next_animation_frame().await;
    let _ = dom::next_animation_frame().await;

    if stale(inner, epoch) {
        return Ok(());
    }

    let factory = RuntimeFactory::lookup().ok_or(LoadError::FactoryMissing)?;
    let canvas = lookup_canvas(inner)?;

    let progress_cb = make_progress_callback(inner, epoch);
    let banner_cb = make_banner_callback(inner, epoch);
    let progress_fn: Function = progress_cb.as_ref().unchecked_ref::<Function>().clone();
    let banner_fn: Function = banner_cb.as_ref().unchecked_ref::<Function>().clone();
    {
        let mut st = inner.borrow_mut();
        st.progress_cb = Some(progress_cb);
        st.banner_cb = Some(banner_cb);
    }

    let config_obj = to_js_config(&config, &banner_fn)
        .map_err(|err| LoadError::Instantiation { message: js_message(&err) })?;

    let instance = factory
        .instantiate(&canvas, &config_obj, &progress_fn)
        .await
        .map_err(|err| LoadError::Instantiation {
            message: annotate_instantiation_error(&js_message(&err)),
        })?;

    if stale(inner, epoch) {
        // A newer attempt started while the factory was running; this
        // instance must not survive alongside it.
        instance.quit();
        return Ok(());
    }
    inner.borrow_mut().handles.set_instance(instance);
    set_state(inner, epoch, LoadState::Ready);
    Ok(())
}

async fn fetch_manifest(url: &str) -> Option<BuildManifest> {
    let win = web_sys::window()?;
    let response: web_sys::Response = JsFuture::from(win.fetch_with_str(url))
        .await
        .ok()?
        .dyn_into()
        .ok()?;
    if !response.ok() {
        return None;
    }
    let text = JsFuture::from(response.text().ok()?).await.ok()?;
    let text = text.as_string()?;
    match BuildManifest::from_json(&text) {
        Ok(manifest) => Some(manifest),
        Err(err) => {
            log::warn!("ignoring malformed {MANIFEST_FILE}: {err}");
            None
        }
    }
}

async fn inject_script(
    inner: &Rc<RefCell<Inner>>,
    epoch: u64,
    url: &str,
) -> Result<(), LoadError> {
    let attempt = async {
        let document = dom::document()?;
        let script: HtmlScriptElement = document
            .create_element("script")?
            .dyn_into()
            .map_err(|_| JsValue::from_str("script element cast failed"))?;
        script.set_src(url);
        // Ordered execution relative to any other injected script tag.
        script.set_async(false);
        let loaded = Promise::new(&mut |resolve, reject| {
            script.set_onload(Some(&resolve));
            script.set_onerror(Some(&reject));
        });
        let body = document
            .body()
            .ok_or_else(|| JsValue::from_str("no body"))?;
        body.append_child(script.as_ref())?;
        if !stale(inner, epoch) {
            inner.borrow_mut().handles.set_script(script.clone());
        }
        JsFuture::from(loaded).await?;
        Ok::<(), JsValue>(())
    };
    attempt
        .await
        .map_err(|_| LoadError::ScriptLoad { url: url.to_string() })
}

fn lookup_canvas(inner: &Rc<RefCell<Inner>>) -> Result<HtmlCanvasElement, LoadError> {
    let canvas_id = inner.borrow().canvas_id.clone();
    let document = dom::document().map_err(|_| LoadError::SurfaceMissing)?;
    let canvas: HtmlCanvasElement = document
        .get_element_by_id(&canvas_id)
        .ok_or(LoadError::SurfaceMissing)?
        .dyn_into()
        .map_err(|_| LoadError::SurfaceMissing)?;
    if !canvas.is_connected() {
        return Err(LoadError::SurfaceDetached);
    }
    Ok(canvas)
}

fn make_progress_callback(inner: &Rc<RefCell<Inner>>, epoch: u64) -> Closure<dyn FnMut(f64)> {
    let inner = inner.clone();
    Closure::new(move |fraction: f64| {
        // Direct mapping of whatever the runtime reports; a transient
        // decrease shows as a regressing percentage.
        let progress = progress_percent(fraction);
        let updating = matches!(inner.borrow().load, LoadState::Loading { .. });
        if updating {
            set_state(&inner, epoch, LoadState::Loading { progress });
        }
    })
}

fn make_banner_callback(
    inner: &Rc<RefCell<Inner>>,
    epoch: u64,
) -> Closure<dyn FnMut(JsValue, JsValue)> {
    let inner = inner.clone();
    Closure::new(move |message: JsValue, level: JsValue| {
        let text = message.as_string().unwrap_or_default();
        if level.as_string().as_deref() == Some("error") {
            set_state(&inner, epoch, LoadState::Error { message: text });
        } else {
            log::warn!("runtime banner: {text}");
        }
    })
}

fn js_message(err: &JsValue) -> String {
    if let Some(error) = err.dyn_ref::<js_sys::Error>() {
        String::from(error.message())
    } else {
        err.as_string().unwrap_or_else(|| format!("{err:?}"))
    }
}
