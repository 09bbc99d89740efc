use glam::Vec2;

use crate::api::config::{ConfigError, GameConfig};
use crate::api::events::{EventBus, GameEvent};
use crate::api::types::{GameState, TileId};
use crate::components::tile::Tile;
use crate::core::physics::{Container, ContactPair, PhysicsWorld, StepLimits};
use crate::core::registry::TileRegistry;
use crate::core::time::FramePacer;
use crate::core::viewport::Viewport;
use crate::input::queue::{InputEvent, InputQueue};
use crate::renderer::instance::TileBuffer;
use crate::systems::boundary::BoundaryMonitor;
use crate::systems::merge::resolve_merges;
use crate::systems::preview::{Preview, PreviewController};
use crate::systems::render::{build_tile_buffer, OverlayInput};

/// The whole simulation: physics world, live tiles and their pool, preview,
/// boundary timers, and the frame loop that ties them together.
///
/// Per frame ([`GameCore::tick`]):
/// 1. apply a pending viewport resize
/// 2. apply every queued input, in arrival order
/// 3. while playing, step physics in substeps of at most `max_step_ms` (at most
///    one merge per substep), then scan the boundary with the full frame delta
/// 4. rebuild the render buffer, also while the game is over
pub struct GameCore {
    config: GameConfig,
    world: PhysicsWorld,
    container: Container,
    registry: TileRegistry,
    boundary: BoundaryMonitor,
    preview: PreviewController,
    pacer: FramePacer,
    viewport: Viewport,
    input: InputQueue,
    events: EventBus,
    render: TileBuffer,
    contacts: Vec<ContactPair>,
    state: GameState,
    frame: u64,
}

impl GameCore {
    /// A core with the default configuration.
    pub fn new() -> Self {
        Self::build(GameConfig::default())
    }

    /// A core with a custom configuration. Fails if the configuration is invalid.
    pub fn with_config(config: GameConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: GameConfig) -> Self {
        let mut world = PhysicsWorld::new(Vec2::from(config.gravity));
        world.set_limits(StepLimits {
            max_step_ms: config.max_step_ms,
            max_correction: config.max_correction,
        });
        let container = world.add_container(config.world_width, config.world_height, config.wall_thickness);

        log::info!(
            "game core ready: {}x{} world, boundary at {}",
            config.world_width,
            config.world_height,
            config.boundary_y
        );

        Self {
            world,
            container,
            registry: TileRegistry::with_capacity(config.max_tiles),
            boundary: BoundaryMonitor::from_config(&config),
            preview: PreviewController::new(&config),
            pacer: FramePacer::new(),
            viewport: Viewport::new(config.world_width, config.world_height, config.world_width),
            input: InputQueue::new(),
            events: EventBus::with_capacity(config.max_events),
            render: TileBuffer::with_capacity(config.max_tiles),
            contacts: Vec::with_capacity(64),
            state: GameState::Playing,
            frame: 0,
            config,
        }
    }

    // -- Host-facing surface --

    /// Register an event listener. Listeners run synchronously as events are emitted.
    pub fn on(&mut self, listener: impl FnMut(&GameEvent) + 'static) {
        self.events.on(listener);
    }

    /// Queue input for the next frame.
    pub fn push_input(&mut self, event: InputEvent) {
        self.input.push(event);
    }

    /// Queue a pointer move to normalized `x` (0..1 of the container width).
    pub fn pointer_move(&mut self, x: f32) {
        self.push_input(InputEvent::PointerMove { x });
    }

    /// Queue a commit at normalized `x`.
    pub fn pointer_commit(&mut self, x: f32) {
        self.push_input(InputEvent::Commit { x });
    }

    /// Request a new on-screen width, applied at the start of the next frame.
    pub fn set_logical_width(&mut self, width: f32) {
        self.viewport.set_logical_width(width);
    }

    /// Drop the current preview tile. Ignored while the game is over.
    pub fn spawn_request(&mut self) -> Option<TileId> {
        if !self.state.is_playing() {
            log::debug!("spawn ignored: game over");
            return None;
        }
        let (rank, x) = self.preview.commit(&self.config);
        self.spawn_tile(rank, Vec2::new(x, self.config.spawn_y))
    }

    /// Spawn a tile of `rank` at `pos` directly. Ignored while the game is over.
    pub fn spawn_tile(&mut self, rank: u32, pos: Vec2) -> Option<TileId> {
        if !self.state.is_playing() {
            return None;
        }
        let id = self.registry.spawn(&mut self.world, &self.config, rank, pos);
        self.events.emit(GameEvent::Score {
            score: self.registry.score(),
        });
        Some(id)
    }

    /// Clear every tile back into the pool and resume play.
    pub fn restart(&mut self) {
        self.registry.clear(&mut self.world);
        self.boundary.reset();
        self.preview.reset(&self.config);
        self.state = GameState::Playing;
        log::info!("restart: {} bodies pooled", self.registry.pooled());
        self.events.emit(GameEvent::Restarted);
        self.events.emit(GameEvent::Score { score: 0 });
    }

    /// Advance one display frame of `elapsed_ms` milliseconds.
    pub fn tick(&mut self, elapsed_ms: f32) {
        self.events.clear_frame();
        self.viewport.apply_pending();

        for event in self.input.drain() {
            self.apply_input(event);
        }

        let (delta, ratio) = self.pacer.advance(elapsed_ms);
        if self.state.is_playing() && delta > 0.0 {
            self.step_physics(delta, ratio);
            if self.boundary.scan(self.registry.iter_mut(), delta) {
                self.game_over();
            }
        }

        self.rebuild_render();
        self.frame += 1;
    }

    // -- Frame stages --

    fn apply_input(&mut self, event: InputEvent) {
        match event {
            InputEvent::PointerMove { x } => {
                if self.state.is_playing() {
                    self.preview.set_pointer(x, &self.config);
                }
            }
            InputEvent::Commit { x } => {
                if self.state.is_playing() {
                    self.preview.set_pointer(x, &self.config);
                    self.spawn_request();
                }
            }
            InputEvent::Restart => self.restart(),
        }
    }

    fn step_physics(&mut self, delta_ms: f32, ratio: f32) {
        let plan = self.world.plan_steps(delta_ms, ratio);
        for _ in 0..plan.count {
            self.contacts.clear();
            self.world.step_into(plan.step_ms, &mut self.contacts);
            self.registry.sync_from_physics(&self.world);

            if let Some(outcome) = resolve_merges(&self.contacts, &mut self.registry, &mut self.world, &self.config) {
                self.events.emit(GameEvent::Merged {
                    rank: outcome.rank,
                    x: outcome.pos.x,
                    y: outcome.pos.y,
                });
                self.events.emit(GameEvent::Score {
                    score: self.registry.score(),
                });
            }
        }
    }

    fn game_over(&mut self) {
        self.state = GameState::GameOver;
        let score = self.registry.score();
        let tile_count = self.registry.len() as u32;
        log::info!("game over at frame {}: score {score}, {tile_count} tiles", self.frame);
        self.events.emit(GameEvent::GameOver { score, tile_count });
    }

    fn rebuild_render(&mut self) {
        build_tile_buffer(
            self.registry.iter(),
            OverlayInput {
                preview: self.preview.preview(),
                danger: self.boundary.danger(),
                scale: self.viewport.scale(),
                state: self.state,
                boundary_y: self.boundary.boundary_y(),
            },
            &mut self.render,
        );
    }

    // -- Accessors --

    pub fn state(&self) -> GameState {
        self.state
    }

    /// Sum of `2^rank` over the live tiles.
    pub fn score(&self) -> u64 {
        self.registry.score()
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn tiles(&self) -> impl Iterator<Item = &Tile> {
        self.registry.iter()
    }

    pub fn tile(&self, id: TileId) -> Option<&Tile> {
        self.registry.get(id)
    }

    pub fn tile_count(&self) -> usize {
        self.registry.len()
    }

    pub fn registry(&self) -> &TileRegistry {
        &self.registry
    }

    pub fn preview(&self) -> &Preview {
        self.preview.preview()
    }

    pub fn boundary(&self) -> &BoundaryMonitor {
        &self.boundary
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn container(&self) -> &Container {
        &self.container
    }

    pub fn world(&self) -> &PhysicsWorld {
        &self.world
    }

    pub fn render_buffer(&self) -> &TileBuffer {
        &self.render
    }

    /// Events emitted during the last [`GameCore::tick`] (plus any emitted since).
    pub fn frame_events(&self) -> &[GameEvent] {
        self.events.frame_events()
    }

    /// Frames ticked since construction.
    pub fn frame(&self) -> u64 {
        self.frame
    }
}

impl Default for GameCore {
    fn default() -> Self {
        Self::new()
    }
}
