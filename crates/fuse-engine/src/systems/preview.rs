use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::api::config::GameConfig;
use crate::components::tile::{color_for_rank, radius_for_rank, value_for_rank, TileColor};

/// The tile waiting to be dropped, plus the one after it.
#[derive(Debug, Clone, PartialEq)]
pub struct Preview {
    pub rank: u32,
    pub radius: f32,
    pub color: TileColor,
    /// Horizontal drop position in world units.
    pub x: f32,
    pub y: f32,
    /// Rank that becomes `rank` on the next commit.
    pub next: u32,
}

impl Preview {
    pub fn value(&self) -> u64 {
        value_for_rank(self.rank)
    }
}

/// Draws preview ranks and tracks the pointer-driven drop position.
pub struct PreviewController {
    preview: Preview,
    rng: Pcg32,
    ranks: u32,
}

impl PreviewController {
    pub fn new(config: &GameConfig) -> Self {
        let mut controller = Self {
            preview: Preview {
                rank: 0,
                radius: radius_for_rank(0, config),
                color: color_for_rank(0),
                x: config.world_width * 0.5,
                y: config.preview_y,
                next: 0,
            },
            rng: Pcg32::seed_from_u64(config.seed),
            ranks: config.preview_ranks.max(1),
        };
        controller.update_preview(config);
        controller
    }

    pub fn preview(&self) -> &Preview {
        &self.preview
    }

    /// Promote `next` to the current preview and draw a fresh `next`.
    pub fn update_preview(&mut self, config: &GameConfig) {
        let rank = self.preview.next;
        self.preview.rank = rank;
        self.preview.radius = radius_for_rank(rank, config);
        self.preview.color = color_for_rank(rank);
        self.preview.next = self.rng.random_range(0..self.ranks);
        self.preview.x = clamp_x(self.preview.x, self.preview.radius, config);
    }

    /// Move the drop position from a normalized pointer x (0..1 of the container width).
    pub fn set_pointer(&mut self, normalized_x: f32, config: &GameConfig) {
        let t = if normalized_x.is_finite() { normalized_x.clamp(0.0, 1.0) } else { 0.5 };
        self.preview.x = clamp_x(t * config.world_width, self.preview.radius, config);
    }

    /// Take the current preview for spawning and advance to the next one.
    /// Returns the committed rank and drop x.
    pub fn commit(&mut self, config: &GameConfig) -> (u32, f32) {
        let committed = (self.preview.rank, self.preview.x);
        self.update_preview(config);
        committed
    }

    /// Return to the start-of-game preview: a rank 0 tile at the center.
    pub fn reset(&mut self, config: &GameConfig) {
        self.preview.next = 0;
        self.preview.x = config.world_width * 0.5;
        self.update_preview(config);
    }
}

/// Keep a tile of `radius` inside the side walls.
fn clamp_x(x: f32, radius: f32, config: &GameConfig) -> f32 {
    let min = radius.min(config.world_width * 0.5);
    let max = (config.world_width - radius).max(min);
    x.clamp(min, max)
}
