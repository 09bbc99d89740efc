pub mod runner;

pub use runner::GameRunner;

use std::cell::RefCell;

use fuse_engine::{GameEvent, InputEvent};
use js_sys::{Object, Reflect};
use wasm_bindgen::prelude::*;

thread_local! {
    static RUNNER: RefCell<Option<GameRunner>> = const { RefCell::new(None) };
    // Kept outside the runner so callbacks may call back into the exports.
    static LISTENERS: RefCell<Vec<js_sys::Function>> = const { RefCell::new(Vec::new()) };
}

/// Run `f` against the live runner. Calls made before `game_init` are logged
/// and return `None`.
fn with_runner<R>(f: impl FnOnce(&mut GameRunner) -> R) -> Option<R> {
    RUNNER.with(|cell| match cell.borrow_mut().as_mut() {
        Some(runner) => Some(f(runner)),
        None => {
            log::warn!("game not initialized, call game_init() first");
            None
        }
    })
}

fn event_payload(event: &GameEvent) -> (&'static str, Object) {
    let payload = Object::new();
    let set = |key: &str, value: f64| {
        let _ = Reflect::set(&payload, &JsValue::from_str(key), &JsValue::from_f64(value));
    };
    let name = match *event {
        GameEvent::Score { score } => {
            set("score", score as f64);
            "score"
        }
        GameEvent::Merged { rank, x, y } => {
            set("rank", rank as f64);
            set("x", x as f64);
            set("y", y as f64);
            "merged"
        }
        GameEvent::GameOver { score, tile_count } => {
            set("score", score as f64);
            set("tileCount", tile_count as f64);
            "gameOver"
        }
        GameEvent::Restarted => "restarted",
    };
    (name, payload)
}

#[wasm_bindgen]
pub fn game_init() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);

    RUNNER.with(|cell| {
        *cell.borrow_mut() = Some(GameRunner::new());
    });
    log::info!("fuse: initialized");
}

/// Replace the configuration with a JSON object. Returns `false` if it was rejected.
#[wasm_bindgen]
pub fn game_load_config(json: &str) -> bool {
    with_runner(|r| r.load_config(json)).unwrap_or_default()
}

#[wasm_bindgen]
pub fn game_attach(surface: &str) {
    with_runner(|r| r.attach(surface));
}

#[wasm_bindgen]
pub fn game_set_width(width: f32) {
    with_runner(|r| r.set_width(width));
}

#[wasm_bindgen]
pub fn game_tick(dt_ms: f32) {
    let events = with_runner(|r| {
        r.tick(dt_ms);
        r.core().frame_events().to_vec()
    })
    .unwrap_or_default();
    if events.is_empty() {
        return;
    }

    let listeners = LISTENERS.with(|cell| cell.borrow().clone());
    for event in &events {
        let (name, payload) = event_payload(event);
        for callback in &listeners {
            if let Err(err) = callback.call2(&JsValue::NULL, &JsValue::from_str(name), &payload) {
                web_sys::console::error_2(&JsValue::from_str(&format!("fuse: '{name}' listener threw")), &err);
            }
        }
    }
}

/// Pointer moved to normalized `x` (0..1 of the container width).
#[wasm_bindgen]
pub fn game_pointer_move(x: f32) {
    with_runner(|r| r.push_input(InputEvent::PointerMove { x }));
}

/// Pointer released at normalized `x`: drop the preview tile there.
#[wasm_bindgen]
pub fn game_pointer_up(x: f32) {
    with_runner(|r| r.push_input(InputEvent::Commit { x }));
}

/// Pointer moved to `screen_x` pixels from the surface's left edge.
#[wasm_bindgen]
pub fn game_pointer_move_screen(screen_x: f32) {
    with_runner(|r| r.pointer_move_screen(screen_x));
}

#[wasm_bindgen]
pub fn game_pointer_up_screen(screen_x: f32) {
    with_runner(|r| r.pointer_up_screen(screen_x));
}

#[wasm_bindgen]
pub fn game_restart() {
    with_runner(|r| r.push_input(InputEvent::Restart));
}

/// Register `callback(name, payload)`, called after each frame for every event it produced.
#[wasm_bindgen]
pub fn game_on_event(callback: js_sys::Function) {
    LISTENERS.with(|cell| cell.borrow_mut().push(callback));
}

// ---- Data accessors ----

#[wasm_bindgen]
pub fn get_tiles_ptr() -> *const f32 {
    with_runner(|r| r.tiles_ptr()).unwrap_or(std::ptr::null())
}

#[wasm_bindgen]
pub fn get_tile_count() -> u32 {
    with_runner(|r| r.tile_count()).unwrap_or_default()
}

#[wasm_bindgen]
pub fn get_overlay_ptr() -> *const f32 {
    with_runner(|r| r.overlay_ptr()).unwrap_or(std::ptr::null())
}

#[wasm_bindgen]
pub fn get_game_events_ptr() -> *const f32 {
    with_runner(|r| r.game_events_ptr()).unwrap_or(std::ptr::null())
}

#[wasm_bindgen]
pub fn get_game_events_len() -> u32 {
    with_runner(|r| r.game_events_len()).unwrap_or_default()
}

#[wasm_bindgen]
pub fn get_world_width() -> f32 {
    with_runner(|r| r.world_width()).unwrap_or_default()
}

#[wasm_bindgen]
pub fn get_world_height() -> f32 {
    with_runner(|r| r.world_height()).unwrap_or_default()
}

#[wasm_bindgen]
pub fn get_screen_width() -> f32 {
    with_runner(|r| r.screen_width()).unwrap_or_default()
}

#[wasm_bindgen]
pub fn get_screen_height() -> f32 {
    with_runner(|r| r.screen_height()).unwrap_or_default()
}

#[wasm_bindgen]
pub fn get_score() -> f64 {
    with_runner(|r| r.score()).unwrap_or_default()
}

#[wasm_bindgen]
pub fn is_game_over() -> bool {
    with_runner(|r| r.is_game_over()).unwrap_or_default()
}

// ---- Wire format constants ----

#[wasm_bindgen]
pub fn get_tile_floats() -> u32 {
    fuse_engine::TILE_FLOATS as u32
}

#[wasm_bindgen]
pub fn get_overlay_floats() -> u32 {
    fuse_engine::OVERLAY_FLOATS as u32
}

#[wasm_bindgen]
pub fn get_event_floats() -> u32 {
    fuse_engine::EVENT_FLOATS as u32
}

#[wasm_bindgen]
pub fn get_protocol_version() -> f32 {
    fuse_engine::bridge::protocol::PROTOCOL_VERSION
}
