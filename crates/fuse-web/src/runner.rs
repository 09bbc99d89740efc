use fuse_engine::{encode_events, GameConfig, GameCore, InputEvent, WireEvent};

/// Owns the game core on behalf of the host page.
///
/// The bridge keeps one `GameRunner` in a `thread_local!` and exports free
/// functions via `#[wasm_bindgen]`, because wasm-bindgen cannot export the
/// core's borrowing API directly.
pub struct GameRunner {
    core: GameCore,
    surface: Option<String>,
    wire_events: Vec<WireEvent>,
}

impl GameRunner {
    pub fn new() -> Self {
        Self::from_core(GameCore::new())
    }

    fn from_core(core: GameCore) -> Self {
        let max_events = core.config().max_events;
        Self {
            core,
            surface: None,
            wire_events: Vec::with_capacity(max_events),
        }
    }

    /// Replace the configuration and start a fresh game. Invalid JSON or values
    /// are logged and the current game keeps running. The attached surface and
    /// screen width carry over.
    pub fn load_config(&mut self, json: &str) -> bool {
        let core = match GameConfig::from_json(json).and_then(GameCore::with_config) {
            Ok(core) => core,
            Err(err) => {
                log::warn!("config rejected: {err}");
                return false;
            }
        };
        let width = self.core.viewport().screen_width();
        self.core = core;
        self.core.set_logical_width(width);
        self.wire_events.clear();
        log::info!("config loaded");
        true
    }

    /// Bind the render target the host draws into.
    pub fn attach(&mut self, surface: &str) {
        log::info!("attached to surface '{surface}'");
        self.surface = Some(surface.to_owned());
    }

    pub fn surface(&self) -> Option<&str> {
        self.surface.as_deref()
    }

    pub fn set_width(&mut self, width: f32) {
        self.core.set_logical_width(width);
    }

    pub fn push_input(&mut self, event: InputEvent) {
        self.core.push_input(event);
    }

    /// Pointer moved to `screen_x` pixels from the surface's left edge.
    pub fn pointer_move_screen(&mut self, screen_x: f32) {
        let x = self.core.viewport().normalize_x(screen_x);
        self.core.pointer_move(x);
    }

    /// Pointer released at `screen_x` pixels from the surface's left edge.
    pub fn pointer_up_screen(&mut self, screen_x: f32) {
        let x = self.core.viewport().normalize_x(screen_x);
        self.core.pointer_commit(x);
    }

    /// Run one frame, then encode the events it produced for host-side reads.
    pub fn tick(&mut self, dt_ms: f32) {
        self.core.tick(dt_ms);

        let events = self.core.frame_events();
        let dropped = encode_events(events, self.core.config().max_events, &mut self.wire_events);
        if dropped > 0 {
            log::warn!("event buffer full: {dropped} events not encoded");
        }
    }

    pub fn core(&self) -> &GameCore {
        &self.core
    }

    // ---- Pointer accessors for host-side reads ----

    pub fn tiles_ptr(&self) -> *const f32 {
        self.core.render_buffer().instances_ptr()
    }

    pub fn tile_count(&self) -> u32 {
        self.core.render_buffer().instance_count()
    }

    pub fn overlay_ptr(&self) -> *const f32 {
        self.core.render_buffer().overlay_ptr()
    }

    pub fn game_events_ptr(&self) -> *const f32 {
        self.wire_events().as_ptr() as *const f32
    }

    pub fn game_events_len(&self) -> u32 {
        self.wire_events().len() as u32
    }

    pub fn wire_events(&self) -> &[WireEvent] {
        &self.wire_events
    }

    pub fn world_width(&self) -> f32 {
        self.core.config().world_width
    }

    pub fn world_height(&self) -> f32 {
        self.core.config().world_height
    }

    pub fn screen_width(&self) -> f32 {
        self.core.viewport().screen_width()
    }

    pub fn screen_height(&self) -> f32 {
        self.core.viewport().screen_height()
    }

    pub fn score(&self) -> f64 {
        self.core.score() as f64
    }

    pub fn is_game_over(&self) -> bool {
        !self.core.state().is_playing()
    }
}

impl Default for GameRunner {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fuse_engine::bridge::protocol::EVENT_SCORE;
    use fuse_engine::GameEvent;

    #[test]
    fn bad_config_keeps_current_game() {
        let mut runner = GameRunner::new();
        assert!(!runner.load_config("{ not json"));
        assert!(!runner.load_config(r#"{ "world_width": -5 }"#));
        assert_eq!(runner.world_width(), 300.0);
    }

    #[test]
    fn partial_config_overrides_defaults() {
        let mut runner = GameRunner::new();
        runner.set_width(600.0);
        runner.tick(16.0);
        assert!(runner.load_config(r#"{ "world_width": 400, "overflow_threshold_ms": 1500 }"#));
        assert_eq!(runner.world_width(), 400.0);
        assert_eq!(runner.core().config().overflow_threshold_ms, 1500.0);
        assert_eq!(runner.core().config().world_height, 500.0);

        runner.tick(16.0);
        assert_eq!(runner.screen_width(), 600.0);
        assert_eq!(runner.screen_height(), 750.0);
    }

    #[test]
    fn screen_pointer_is_normalized() {
        let mut runner = GameRunner::new();
        runner.set_width(600.0);
        runner.tick(16.0);
        runner.pointer_up_screen(120.0);
        runner.tick(16.0);

        let tile = runner.core().tiles().next().unwrap();
        assert!((tile.pos.x - 60.0).abs() < 0.5);
        assert_eq!(runner.tile_count(), 1);
    }

    #[test]
    fn frame_events_are_encoded() {
        let mut runner = GameRunner::new();
        runner.push_input(InputEvent::Commit { x: 0.5 });
        runner.tick(16.0);

        assert_eq!(runner.game_events_len(), 1);
        assert_eq!(runner.wire_events()[0].kind, EVENT_SCORE);
        assert_eq!(runner.wire_events()[0].a, 1.0);
        assert_eq!(runner.core().frame_events(), &[GameEvent::Score { score: 1 }]);

        runner.tick(16.0);
        assert_eq!(runner.game_events_len(), 0);
    }

    #[test]
    fn attach_records_surface() {
        let mut runner = GameRunner::new();
        assert_eq!(runner.surface(), None);
        runner.attach("board");
        assert_eq!(runner.surface(), Some("board"));
    }
}
