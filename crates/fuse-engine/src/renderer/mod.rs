pub mod instance;

pub use instance::{FrameOverlay, TileBuffer, TileInstance};
