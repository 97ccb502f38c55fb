//! `#[wasm_bindgen]` exports for driving a tweener from browser UI glue.
//!
//! One runner per page, kept in a `thread_local!`. Usage from JS:
//!
//! ```ignore
//! tweener_init(manifestJson, 1);
//! tweener_spawn_target(2, "badge");
//! tweener_play_group("menu");
//! // every animation frame:
//! tweener_tick(dt);
//! const floats = new Float32Array(memory.buffer, get_instances_ptr(),
//!     get_instance_count() * get_instance_floats());
//! ```
//!
//! Every export is a no-op (with a warning) until `tweener_init` succeeds.
//! Float/color callbacks run inside `tweener_tick`; exports they call are
//! rejected with a warning while the tick holds the runner.

pub mod runner;

pub use runner::TweenerRunner;

use std::cell::RefCell;
use tweener::{Color, Entity, TargetId, TweenCommand, TweenManifest};
use wasm_bindgen::prelude::*;

thread_local! {
    static RUNNER: RefCell<Option<TweenerRunner>> = const { RefCell::new(None) };
}

fn with_runner<R>(f: impl FnOnce(&mut TweenerRunner) -> R) -> Option<R> {
    RUNNER.with(|cell| {
        let Ok(mut borrow) = cell.try_borrow_mut() else {
            log::warn!("tweener-web: runner is busy; exports cannot be called from a tween callback");
            return None;
        };
        match borrow.as_mut() {
            Some(runner) => Some(f(runner)),
            None => {
                log::warn!("tweener-web: not initialized; call tweener_init() first");
                None
            }
        }
    })
}

fn with_entity(id: u32, f: impl FnOnce(&mut Entity)) {
    with_runner(|r| match r.scene_mut().get_mut(TargetId(id)) {
        Some(e) => f(e),
        None => log::warn!("tweener-web: no target {}", id),
    });
}

fn push(command: TweenCommand) {
    with_runner(|r| r.push_command(command));
}

// ---- Setup ----

/// Parse `manifest_json` and create the runner. `owner_id` is the target
/// written by animations without an override; it is spawned automatically.
#[wasm_bindgen]
pub fn tweener_init(manifest_json: &str, owner_id: u32) -> bool {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);

    let manifest = match TweenManifest::from_json(manifest_json) {
        Ok(m) => m,
        Err(e) => {
            log::error!("tweener-web: {}", e);
            return false;
        }
    };
    let count = manifest.animations.len();
    let runner = TweenerRunner::new(TargetId(owner_id), manifest);
    let installed = RUNNER.with(|cell| match cell.try_borrow_mut() {
        Ok(mut slot) => {
            *slot = Some(runner);
            true
        }
        Err(_) => false,
    });
    if !installed {
        log::warn!("tweener-web: tweener_init called from a tween callback; ignored");
        return false;
    }
    log::info!("tweener-web: initialized with {} animations", count);
    true
}

/// Add (or replace) a target object.
#[wasm_bindgen]
pub fn tweener_spawn_target(id: u32, tag: &str) {
    with_runner(|r| r.scene_mut().spawn(Entity::new(TargetId(id)).with_tag(tag)));
}

#[wasm_bindgen]
pub fn tweener_despawn_target(id: u32) {
    with_runner(|r| r.scene_mut().despawn(TargetId(id)));
}

// ---- Property setters ----

#[wasm_bindgen]
pub fn tweener_set_anchored(id: u32, x: f32, y: f32) {
    with_entity(id, |e| e.anchored_pos = [x, y].into());
}

#[wasm_bindgen]
pub fn tweener_set_position(id: u32, x: f32, y: f32, z: f32) {
    with_entity(id, |e| e.pos = [x, y, z].into());
}

#[wasm_bindgen]
pub fn tweener_set_scale(id: u32, x: f32, y: f32, z: f32) {
    with_entity(id, |e| e.scale = [x, y, z].into());
}

#[wasm_bindgen]
pub fn tweener_set_rotation(id: u32, x: f32, y: f32, z: f32) {
    with_entity(id, |e| e.rotation = [x, y, z].into());
}

/// A negative alpha removes the opacity channel.
#[wasm_bindgen]
pub fn tweener_set_opacity(id: u32, alpha: f32) {
    with_entity(id, |e| e.opacity = (alpha >= 0.0).then_some(alpha));
}

/// Current opacity, or -1 when the target is missing or has none.
#[wasm_bindgen]
pub fn tweener_get_opacity(id: u32) -> f32 {
    with_runner(|r| r.scene().get(TargetId(id)).and_then(|e| e.opacity))
        .flatten()
        .unwrap_or(-1.0)
}

// ---- Frame ----

#[wasm_bindgen]
pub fn tweener_tick(dt: f32) {
    with_runner(|r| r.tick(dt));
}

// ---- Commands (applied at the next tick) ----

#[wasm_bindgen]
pub fn tweener_play(name: &str) {
    push(TweenCommand::Play(name.to_string()));
}

#[wasm_bindgen]
pub fn tweener_play_group(group: &str) {
    push(TweenCommand::PlayGroup(group.to_string()));
}

#[wasm_bindgen]
pub fn tweener_rewind(name: &str) {
    push(TweenCommand::Rewind(name.to_string()));
}

#[wasm_bindgen]
pub fn tweener_rewind_group(group: &str) {
    push(TweenCommand::RewindGroup(group.to_string()));
}

#[wasm_bindgen]
pub fn tweener_toggle(name: &str, forward: bool) {
    push(TweenCommand::Toggle { name: name.to_string(), forward });
}

#[wasm_bindgen]
pub fn tweener_toggle_group(group: &str, forward: bool) {
    push(TweenCommand::ToggleGroup { group: group.to_string(), forward });
}

#[wasm_bindgen]
pub fn tweener_play_all() {
    push(TweenCommand::PlayAll);
}

#[wasm_bindgen]
pub fn tweener_stop_all() {
    push(TweenCommand::StopAll);
}

/// Fire the manifest binding at `index` for a toggle value change.
#[wasm_bindgen]
pub fn tweener_binding_toggle(index: u32, is_on: bool) {
    with_runner(|r| r.binding_toggle(index as usize, is_on));
}

/// Fire the manifest binding at `index` for an enable event.
#[wasm_bindgen]
pub fn tweener_binding_enable(index: u32) {
    with_runner(|r| r.binding_enable(index as usize));
}

// ---- Queries ----

#[wasm_bindgen]
pub fn tweener_is_playing(name: &str) -> bool {
    with_runner(|r| r.tweener().is_playing(name)).unwrap_or(false)
}

#[wasm_bindgen]
pub fn tweener_is_at_initial_state(name: &str) -> bool {
    with_runner(|r| r.tweener().is_at_initial_state(name, r.scene())).unwrap_or(true)
}

#[wasm_bindgen]
pub fn tweener_active_count() -> u32 {
    with_runner(|r| r.tweener().active_count() as u32).unwrap_or(0)
}

// ---- Custom value callbacks ----

/// `callback(value)` on every write of custom float animation `name`.
#[wasm_bindgen]
pub fn tweener_on_float(name: &str, callback: js_sys::Function) {
    with_runner(|r| {
        r.tweener_mut().on_float(name, move |v| {
            if let Err(e) = callback.call1(&JsValue::NULL, &JsValue::from_f64(v as f64)) {
                log::warn!("tweener-web: float callback threw {:?}", e);
            }
        })
    });
}

/// `callback(Float32Array [r, g, b, a])` on every write of custom color animation `name`.
#[wasm_bindgen]
pub fn tweener_on_color(name: &str, callback: js_sys::Function) {
    with_runner(|r| {
        r.tweener_mut().on_color(name, move |c: Color| {
            let rgba = js_sys::Float32Array::from(&c.to_array()[..]);
            if let Err(e) = callback.call1(&JsValue::NULL, &rgba) {
                log::warn!("tweener-web: color callback threw {:?}", e);
            }
        })
    });
}

// ---- Data accessors ----

#[wasm_bindgen]
pub fn get_instances_ptr() -> *const f32 {
    with_runner(|r| r.instances_ptr()).unwrap_or(std::ptr::null())
}

#[wasm_bindgen]
pub fn get_instance_count() -> u32 {
    with_runner(|r| r.instance_count()).unwrap_or(0)
}

#[wasm_bindgen]
pub fn get_instance_floats() -> u32 {
    with_runner(|r| r.instance_floats()).unwrap_or(0)
}
