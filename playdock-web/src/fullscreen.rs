//! Cross-browser fullscreen and orientation controller.
//!
//! Browsers disagree on three things here: whether an element fullscreen API
//! exists at all (iOS Safari: no), which vendor prefix it hides behind, and
//! whether the screen orientation can be locked. This module degrades through
//! those layers: native request, CSS-only presentation, rotate hint.

use std::cell::RefCell;
use std::rc::Rc;

use js_sys::{Function, Promise, Reflect};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys::{
    Element, EventTarget, HtmlElement, OrientationLockType, OrientationType, ScreenOrientation,
};

use playdock_core::FullscreenState;

use crate::dom;
use crate::platform::{is_ios_like, monitors_active, orientation_action, OrientationAction};
use crate::vendor;

/// Delay before attempting an orientation lock, letting the fullscreen
/// transition settle.
const LOCK_SETTLE_MS: i32 = 300;
/// Rotate-hint auto-hide delay when the hint is advisory.
const HINT_AUTOHIDE_MS: i32 = 4_000;
/// Delay before refocusing the canvas after leaving fullscreen.
const FOCUS_SETTLE_MS: i32 = 100;

struct FsInner {
    container_id: String,
    canvas_id: String,
    /// Platform has no usable element-fullscreen API (iOS-like).
    no_fullscreen_api: bool,
    state: FullscreenState,
    on_change: Option<Function>,
    hint_timer: Option<i32>,
    hint_timer_cb: Option<Closure<dyn FnMut()>>,
    /// Orientation listeners, attached only while fullscreen.
    monitors: Vec<(EventTarget, &'static str, Closure<dyn FnMut()>)>,
    /// Normalized fullscreen-change listener, attached for the controller's
    /// lifetime under every vendor event name.
    change_cb: Option<Closure<dyn FnMut()>>,
}

pub struct FullscreenController {
    inner: Rc<RefCell<FsInner>>,
}

impl FullscreenController {
    pub fn new(container_id: String, canvas_id: String) -> Self {
        let inner = Rc::new(RefCell::new(FsInner {
            container_id,
            canvas_id,
            no_fullscreen_api: detect_no_fullscreen_api(),
            state: FullscreenState::default(),
            on_change: None,
            hint_timer: None,
            hint_timer_cb: None,
            monitors: Vec::new(),
            change_cb: None,
        }));
        attach_change_listener(&inner);
        FullscreenController { inner }
    }

    pub fn set_on_change(&self, callback: Function) {
        self.inner.borrow_mut().on_change = Some(callback);
    }

    pub fn is_fullscreen(&self) -> bool {
        self.inner.borrow().state.is_fullscreen
    }

    pub fn show_rotate_hint(&self) -> bool {
        self.inner.borrow().state.show_rotate_hint
    }

    /// Toggle between windowed and fullscreen presentation. A throwing
    /// browser API never leaves the UI half-toggled: the flag is forced on
    /// and the orientation check re-run.
    pub fn toggle(&self) {
        let inner = self.inner.clone();
        spawn_local(async move {
            let entering = !inner.borrow().state.is_fullscreen;
            let result = if entering { enter(&inner).await } else { exit(&inner).await };
            if let Err(err) = result {
                log::warn!("fullscreen toggle failed: {err:?}");
                set_fullscreen(&inner, true);
                // The flag may have been true all along; make sure rotation
                // listeners are wired either way.
                attach_monitors(&inner);
                recheck_orientation(&inner);
            }
        });
    }

    /// Detach every listener and timer; used on unload.
    pub fn unhook(&self) {
        {
            let mut st = self.inner.borrow_mut();
            cancel_hint_timer(&mut st);
            detach_monitors(&mut st);
        }
        let change_cb = self.inner.borrow_mut().change_cb.take();
        if let (Some(cb), Ok(document)) = (change_cb, dom::document()) {
            for event in vendor::FULLSCREEN_CHANGE_EVENTS {
                let _ = document
                    .remove_event_listener_with_callback(event, cb.as_ref().unchecked_ref());
            }
        }
    }
}

async fn enter(inner: &Rc<RefCell<FsInner>>) -> Result<(), JsValue> {
    if inner.borrow().no_fullscreen_api {
        // No element fullscreen on this platform: CSS-driven presentation,
        // and the user has to rotate by hand.
        set_fullscreen(inner, true);
        show_hint_with_autohide(inner);
        return Ok(());
    }

    let container = lookup_container(inner)?;
    let requested = call_first(container.as_ref(), &vendor::REQUEST_FULLSCREEN).await?;
    if !requested {
        log::debug!("no fullscreen request API; falling back to CSS presentation");
    }
    set_fullscreen(inner, true);

    dom::sleep_ms(LOCK_SETTLE_MS).await?;
    if lock_landscape().await {
        hide_hint(inner);
    } else {
        show_hint_with_autohide(inner);
    }
    Ok(())
}

async fn exit(inner: &Rc<RefCell<FsInner>>) -> Result<(), JsValue> {
    unlock_orientation();
    {
        let mut st = inner.borrow_mut();
        cancel_hint_timer(&mut st);
    }
    set_hint(inner, false);

    if inner.borrow().no_fullscreen_api {
        set_fullscreen(inner, false);
        return Ok(());
    }
    if native_fullscreen_element().is_some() {
        let document = dom::document()?;
        call_first(document.as_ref(), &vendor::EXIT_FULLSCREEN).await?;
    }
    set_fullscreen(inner, false);

    dom::sleep_ms(FOCUS_SETTLE_MS).await?;
    focus_canvas(inner);
    Ok(())
}

/// Call the first method from `names` that exists on `target`, awaiting a
/// returned promise. Returns false when no candidate exists.
async fn call_first(target: &JsValue, names: &[&str]) -> Result<bool, JsValue> {
    for name in names {
        let value = Reflect::get(target, &JsValue::from_str(name))?;
        if let Some(func) = value.dyn_ref::<Function>() {
            let out = func.call0(target)?;
            if let Ok(promise) = out.dyn_into::<Promise>() {
                JsFuture::from(promise).await?;
            }
            return Ok(true);
        }
    }
    Ok(false)
}

/// First defined vendor property decides; a null value means not fullscreen.
fn native_fullscreen_element() -> Option<Element> {
    let document = dom::document().ok()?;
    for name in vendor::FULLSCREEN_ELEMENT {
        let value = Reflect::get(document.as_ref(), &JsValue::from_str(name)).ok()?;
        if !value.is_undefined() {
            return if value.is_null() { None } else { value.dyn_into().ok() };
        }
    }
    None
}

fn detect_no_fullscreen_api() -> bool {
    let Some(win) = web_sys::window() else { return false };
    let navigator = win.navigator();
    let user_agent = navigator.user_agent().unwrap_or_default();
    let platform = navigator.platform().unwrap_or_default();
    is_ios_like(&user_agent, &platform, navigator.max_touch_points())
}

fn lookup_container(inner: &Rc<RefCell<FsInner>>) -> Result<Element, JsValue> {
    let id = inner.borrow().container_id.clone();
    dom::document()?
        .get_element_by_id(&id)
        .ok_or_else(|| JsValue::from_str("fullscreen container not found"))
}

fn screen_orientation() -> Option<ScreenOrientation> {
    let screen = web_sys::window()?.screen().ok()?;
    // Probed dynamically: older iOS exposes no screen.orientation at all.
    let value = Reflect::get(screen.as_ref(), &JsValue::from_str("orientation")).ok()?;
    if value.is_undefined() || value.is_null() {
        return None;
    }
    value.dyn_into().ok()
}

async fn lock_landscape() -> bool {
    let Some(orientation) = screen_orientation() else { return false };
    match orientation.lock(OrientationLockType::Landscape) {
        Ok(promise) => JsFuture::from(promise).await.is_ok(),
        Err(_) => false,
    }
}

fn unlock_orientation() {
    if let Some(orientation) = screen_orientation() {
        if let Err(err) = orientation.unlock() {
            log::debug!("orientation unlock failed: {err:?}");
        }
    }
}

fn is_landscape() -> bool {
    if let Some(orientation) = screen_orientation() {
        return matches!(
            orientation.type_(),
            OrientationType::LandscapePrimary | OrientationType::LandscapeSecondary
        );
    }
    // Viewport fallback for browsers without the Screen Orientation API.
    let Ok(win) = dom::window() else { return true };
    let width = win.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
    let height = win.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
    width >= height
}

fn recheck_orientation(inner: &Rc<RefCell<FsInner>>) {
    let (fullscreen, no_api) = {
        let st = inner.borrow();
        (st.state.is_fullscreen, st.no_fullscreen_api)
    };
    match orientation_action(fullscreen, is_landscape(), no_api) {
        OrientationAction::None => {}
        OrientationAction::HideHint => hide_hint(inner),
        OrientationAction::ShowStickyHint => show_hint_sticky(inner),
        OrientationAction::ExitFullscreen => {
            let inner = inner.clone();
            spawn_local(async move {
                if let Err(err) = exit(&inner).await {
                    log::warn!("auto-exit fullscreen failed: {err:?}");
                }
            });
        }
    }
}

fn attach_monitors(inner: &Rc<RefCell<FsInner>>) {
    if !inner.borrow().monitors.is_empty() {
        return;
    }
    let mut targets: Vec<(EventTarget, &'static str)> = Vec::new();
    if let Some(orientation) = screen_orientation() {
        targets.push((EventTarget::from(orientation), "change"));
    }
    if let Ok(win) = dom::window() {
        let target = EventTarget::from(win);
        targets.push((target.clone(), "resize"));
        targets.push((target, "orientationchange"));
    }
    let mut monitors = Vec::new();
    for (target, event) in targets {
        let cb = Closure::<dyn FnMut()>::new({
            let inner = inner.clone();
            move || recheck_orientation(&inner)
        });
        if target
            .add_event_listener_with_callback(event, cb.as_ref().unchecked_ref())
            .is_ok()
        {
            monitors.push((target, event, cb));
        }
    }
    inner.borrow_mut().monitors = monitors;
}

fn detach_monitors(st: &mut FsInner) {
    for (target, event, cb) in st.monitors.drain(..) {
        let _ = target.remove_event_listener_with_callback(event, cb.as_ref().unchecked_ref());
    }
}

fn attach_change_listener(inner: &Rc<RefCell<FsInner>>) {
    let Ok(document) = dom::document() else { return };
    let cb = Closure::<dyn FnMut()>::new({
        let inner = inner.clone();
        move || sync_with_native(&inner)
    });
    for event in vendor::FULLSCREEN_CHANGE_EVENTS {
        let _ = document.add_event_listener_with_callback(event, cb.as_ref().unchecked_ref());
    }
    inner.borrow_mut().change_cb = Some(cb);
}

/// Keep the flag in sync with browser-driven changes (the Escape key and the
/// like) that bypass this controller.
fn sync_with_native(inner: &Rc<RefCell<FsInner>>) {
    let native = native_fullscreen_element().is_some();
    if native == inner.borrow().state.is_fullscreen {
        return;
    }
    if native {
        set_fullscreen(inner, true);
        recheck_orientation(inner);
    } else {
        {
            let mut st = inner.borrow_mut();
            cancel_hint_timer(&mut st);
        }
        set_hint(inner, false);
        set_fullscreen(inner, false);
    }
}

fn focus_canvas(inner: &Rc<RefCell<FsInner>>) {
    let id = inner.borrow().canvas_id.clone();
    let element = dom::document().ok().and_then(|d| d.get_element_by_id(&id));
    if let Some(el) = element.and_then(|e| e.dyn_into::<HtmlElement>().ok()) {
        let _ = el.focus();
    }
}

fn set_fullscreen(inner: &Rc<RefCell<FsInner>>, on: bool) {
    let changed = {
        let mut st = inner.borrow_mut();
        let changed = st.state.is_fullscreen != on;
        st.state.is_fullscreen = on;
        changed
    };
    if !changed {
        return;
    }
    // Rotation listeners track the flag itself, not the path that set it;
    // a flag forced on by failure recovery still ends up monitored.
    if monitors_active(on) {
        attach_monitors(inner);
    } else {
        let mut st = inner.borrow_mut();
        detach_monitors(&mut st);
    }
    notify(inner);
}

fn set_hint(inner: &Rc<RefCell<FsInner>>, on: bool) {
    let changed = {
        let mut st = inner.borrow_mut();
        let changed = st.state.show_rotate_hint != on;
        st.state.show_rotate_hint = on;
        changed
    };
    if changed {
        notify(inner);
    }
}

fn hide_hint(inner: &Rc<RefCell<FsInner>>) {
    {
        let mut st = inner.borrow_mut();
        cancel_hint_timer(&mut st);
    }
    set_hint(inner, false);
}

/// Advisory hint: shown now, gone after [`HINT_AUTOHIDE_MS`].
fn show_hint_with_autohide(inner: &Rc<RefCell<FsInner>>) {
    {
        let mut st = inner.borrow_mut();
        cancel_hint_timer(&mut st);
    }
    set_hint(inner, true);
    let cb = Closure::<dyn FnMut()>::new({
        let inner = inner.clone();
        move || {
            // Leaves hint_timer_cb in place: a closure must not drop itself.
            inner.borrow_mut().hint_timer = None;
            set_hint(&inner, false);
        }
    });
    let Ok(win) = dom::window() else { return };
    match win.set_timeout_with_callback_and_timeout_and_arguments_0(
        cb.as_ref().unchecked_ref(),
        HINT_AUTOHIDE_MS,
    ) {
        Ok(id) => {
            let mut st = inner.borrow_mut();
            st.hint_timer = Some(id);
            st.hint_timer_cb = Some(cb);
        }
        Err(err) => log::debug!("hint auto-hide timer failed: {err:?}"),
    }
}

/// Sticky hint for genuine portrait while fullscreen: no auto-hide, cleared
/// only when the orientation recheck sees landscape.
fn show_hint_sticky(inner: &Rc<RefCell<FsInner>>) {
    {
        let mut st = inner.borrow_mut();
        cancel_hint_timer(&mut st);
    }
    set_hint(inner, true);
}

fn cancel_hint_timer(st: &mut FsInner) {
    if let Some(id) = st.hint_timer.take() {
        if let Some(win) = web_sys::window() {
            win.clear_timeout_with_handle(id);
        }
    }
    st.hint_timer_cb = None;
}

fn notify(inner: &Rc<RefCell<FsInner>>) {
    let cb = inner.borrow().on_change.clone();
    if let Some(cb) = cb {
        let _ = cb.call1(&JsValue::NULL, &JsValue::from_str("fullscreen"));
    }
}
