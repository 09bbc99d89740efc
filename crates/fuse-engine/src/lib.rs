pub mod api;
pub mod core;
pub mod components;
pub mod systems;
pub mod renderer;
pub mod bridge;
pub mod input;

// Re-export key types at crate root for convenience
pub use api::config::{ConfigError, GameConfig, RadiusCurve, TileMaterial};
pub use api::events::{EventBus, GameEvent};
pub use api::game::GameCore;
pub use api::types::{GameState, TileId};
pub use bridge::protocol::{encode_events, WireEvent, EVENT_FLOATS, OVERLAY_FLOATS, TILE_FLOATS};
pub use components::tile::{color_for_rank, radius_for_rank, value_for_rank, Tile, TileColor};
pub use crate::core::physics::{ContactPair, Container, PhysicsBody, PhysicsWorld, StepLimits, StepPlan};
pub use crate::core::registry::TileRegistry;
pub use crate::core::time::FramePacer;
pub use crate::core::viewport::Viewport;
pub use input::queue::{InputEvent, InputQueue};
pub use renderer::instance::{FrameOverlay, TileBuffer, TileInstance};
pub use systems::boundary::BoundaryMonitor;
pub use systems::merge::{find_merge, merge, resolve_merges, MergeOutcome};
pub use systems::preview::{Preview, PreviewController};
