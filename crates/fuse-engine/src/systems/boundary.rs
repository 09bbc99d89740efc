use crate::api::config::GameConfig;
use crate::components::tile::Tile;

/// Per-tile overflow timers against the boundary line.
#[derive(Debug, Clone)]
pub struct BoundaryMonitor {
    boundary_y: f32,
    threshold_ms: f32,
    max_overflow_ms: f32,
}

impl BoundaryMonitor {
    pub fn new(boundary_y: f32, threshold_ms: f32) -> Self {
        Self {
            boundary_y,
            threshold_ms,
            max_overflow_ms: 0.0,
        }
    }

    pub fn from_config(config: &GameConfig) -> Self {
        Self::new(config.boundary_y, config.overflow_threshold_ms)
    }

    /// Advance every tile's timer by `elapsed_ms` if its top edge is above the
    /// line, otherwise reset it to zero. Returns `true` once the longest timer
    /// has reached the threshold.
    pub fn scan<'a>(&mut self, tiles: impl Iterator<Item = &'a mut Tile>, elapsed_ms: f32) -> bool {
        let mut max = 0.0f32;
        for tile in tiles {
            if tile.top() < self.boundary_y {
                tile.overflow_ms += elapsed_ms;
                max = max.max(tile.overflow_ms);
            } else {
                tile.overflow_ms = 0.0;
            }
        }
        self.max_overflow_ms = max;
        self.threshold_reached()
    }

    pub fn threshold_reached(&self) -> bool {
        self.max_overflow_ms >= self.threshold_ms
    }

    /// Longest overflow timer seen by the last scan.
    pub fn max_overflow_ms(&self) -> f32 {
        self.max_overflow_ms
    }

    /// Warning intensity for the boundary overlay, 0.1 at rest and 1.0 at
    /// three quarters of the threshold.
    pub fn danger(&self) -> f32 {
        (self.max_overflow_ms / (self.threshold_ms * 0.75)).clamp(0.1, 1.0)
    }

    pub fn reset(&mut self) {
        self.max_overflow_ms = 0.0;
    }

    pub fn boundary_y(&self) -> f32 {
        self.boundary_y
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::TileId;
    use crate::core::physics::PhysicsWorld;
    use glam::Vec2;

    fn tile_at(world: &mut PhysicsWorld, config: &GameConfig, id: u64, y: f32) -> Tile {
        let body = world.create_circle_body(Vec2::new(100.0, y), 10.0, config.material);
        Tile::new(TileId(id), 0, Vec2::new(100.0, y), body, config)
    }

    #[test]
    fn timer_accumulates_above_line_and_trips_at_threshold() {
        let config = GameConfig::default();
        let mut world = PhysicsWorld::new(Vec2::ZERO);
        let mut tiles = vec![tile_at(&mut world, &config, 1, 15.0)];
        let mut monitor = BoundaryMonitor::from_config(&config);

        assert!(!monitor.scan(tiles.iter_mut(), 2999.0));
        assert!(monitor.scan(tiles.iter_mut(), 1.0));
        assert_eq!(tiles[0].overflow_ms, 3000.0);
    }

    #[test]
    fn dipping_below_line_resets_timer() {
        let config = GameConfig::default();
        let mut world = PhysicsWorld::new(Vec2::ZERO);
        let mut tiles = vec![tile_at(&mut world, &config, 1, 15.0)];
        let mut monitor = BoundaryMonitor::from_config(&config);

        assert!(!monitor.scan(tiles.iter_mut(), 2900.0));
        tiles[0].pos.y = 200.0;
        assert!(!monitor.scan(tiles.iter_mut(), 1.0));
        assert_eq!(tiles[0].overflow_ms, 0.0);
        tiles[0].pos.y = 15.0;
        assert!(!monitor.scan(tiles.iter_mut(), 2900.0));
        assert_eq!(monitor.max_overflow_ms(), 2900.0);
    }

    #[test]
    fn maximum_is_taken_across_tiles() {
        let config = GameConfig::default();
        let mut world = PhysicsWorld::new(Vec2::ZERO);
        let mut tiles = vec![
            tile_at(&mut world, &config, 1, 15.0),
            tile_at(&mut world, &config, 2, 300.0),
        ];
        tiles[0].overflow_ms = 1000.0;
        let mut monitor = BoundaryMonitor::from_config(&config);

        monitor.scan(tiles.iter_mut(), 500.0);
        assert_eq!(monitor.max_overflow_ms(), 1500.0);
        assert_eq!(tiles[1].overflow_ms, 0.0);
    }

    #[test]
    fn top_edge_not_center_is_tested() {
        let config = GameConfig::default();
        let mut world = PhysicsWorld::new(Vec2::ZERO);
        // Center below the line, top edge (25 - 10 = 15) above it.
        let mut tiles = vec![tile_at(&mut world, &config, 1, 25.0)];
        let mut monitor = BoundaryMonitor::from_config(&config);
        monitor.scan(tiles.iter_mut(), 100.0);
        assert_eq!(tiles[0].overflow_ms, 100.0);
    }

    #[test]
    fn danger_ramps_from_floor_to_full() {
        let mut monitor = BoundaryMonitor::new(20.0, 3000.0);
        assert!((monitor.danger() - 0.1).abs() < 0.0001);
        monitor.max_overflow_ms = 1125.0;
        assert!((monitor.danger() - 0.5).abs() < 0.0001);
        monitor.max_overflow_ms = 2900.0;
        assert_eq!(monitor.danger(), 1.0);
    }
}
