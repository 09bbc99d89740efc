use glam::Vec2;

use crate::api::config::GameConfig;
use crate::api::types::TileId;
use crate::core::physics::PhysicsBody;

/// RGB color of a tile, 0.0-1.0 per channel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TileColor {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl TileColor {
    pub const fn from_hex(hex: u32) -> Self {
        Self {
            r: ((hex >> 16) & 0xFF) as f32 / 255.0,
            g: ((hex >> 8) & 0xFF) as f32 / 255.0,
            b: (hex & 0xFF) as f32 / 255.0,
        }
    }
}

/// Color of ranks 0 and 1.
pub const BASE_COLOR: TileColor = TileColor::from_hex(0xFAF0E6);

/// Colors cycled by ranks 2 and above.
pub const PALETTE: [TileColor; 7] = [
    TileColor::from_hex(0xFFADAD),
    TileColor::from_hex(0xFFD6A5),
    TileColor::from_hex(0xCAFFBF),
    TileColor::from_hex(0x9BF6FF),
    TileColor::from_hex(0xA0C4FF),
    TileColor::from_hex(0xBDB2FF),
    TileColor::from_hex(0xFFC6FF),
];

/// Radius for a rank. Non-decreasing in `rank`, never above `config.radius_cap()`.
pub fn radius_for_rank(rank: u32, config: &GameConfig) -> f32 {
    let r = rank as f32;
    let curve = &config.radius;
    (curve.base + curve.linear * r + curve.quadratic * r * r).min(config.radius_cap())
}

/// Color for a rank. Ranks past the palette wrap around it.
pub fn color_for_rank(rank: u32) -> TileColor {
    if rank <= 1 {
        return BASE_COLOR;
    }
    PALETTE[(rank as usize - 2) % PALETTE.len()]
}

/// Displayed value `2^rank`, saturating for ranks that overflow.
pub fn value_for_rank(rank: u32) -> u64 {
    1u64.checked_shl(rank).unwrap_or(u64::MAX)
}

/// A live tile: a rank paired with exactly one physics body.
///
/// `radius` and `color` are caches of `rank`; call [`Tile::set_rank`] to change
/// all three together.
#[derive(Debug, Clone)]
pub struct Tile {
    pub id: TileId,
    pub rank: u32,
    pub radius: f32,
    pub color: TileColor,
    /// Position synced from the physics body after each step.
    pub pos: Vec2,
    /// Rotation in radians, synced from the physics body.
    pub rotation: f32,
    /// Milliseconds the top edge has continuously been above the boundary line.
    pub overflow_ms: f32,
    pub(crate) body: PhysicsBody,
}

impl Tile {
    pub(crate) fn new(id: TileId, rank: u32, pos: Vec2, body: PhysicsBody, config: &GameConfig) -> Self {
        Self {
            id,
            rank,
            radius: radius_for_rank(rank, config),
            color: color_for_rank(rank),
            pos,
            rotation: 0.0,
            overflow_ms: 0.0,
            body,
        }
    }

    pub fn set_rank(&mut self, rank: u32, config: &GameConfig) {
        self.rank = rank;
        self.radius = radius_for_rank(rank, config);
        self.color = color_for_rank(rank);
    }

    pub fn value(&self) -> u64 {
        value_for_rank(self.rank)
    }

    /// Y of the tile's top edge (Y-down, so smaller is higher).
    pub fn top(&self) -> f32 {
        self.pos.y - self.radius
    }

    pub fn body(&self) -> &PhysicsBody {
        &self.body
    }
}
