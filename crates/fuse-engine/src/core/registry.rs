use std::collections::HashMap;

use glam::Vec2;
use rapier2d::prelude::RigidBodyHandle;

use crate::api::config::GameConfig;
use crate::api::types::TileId;
use crate::components::tile::{radius_for_rank, value_for_rank, Tile};
use crate::core::physics::{PhysicsBody, PhysicsWorld};

/// Live tiles plus a pool of retired bodies waiting for reuse.
///
/// Tiles live in a flat `Vec` with an id → slot index, so lookup and retirement
/// are O(1). The body → tile side table is the only back-reference from physics
/// to game state; an entry is dropped before its body is pooled.
pub struct TileRegistry {
    tiles: Vec<Tile>,
    slots: HashMap<TileId, usize>,
    by_body: HashMap<RigidBodyHandle, TileId>,
    pool: Vec<PhysicsBody>,
    next_id: u64,
    allocated: usize,
}

impl TileRegistry {
    pub fn new() -> Self {
        Self::with_capacity(256)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            tiles: Vec::with_capacity(capacity),
            slots: HashMap::with_capacity(capacity),
            by_body: HashMap::with_capacity(capacity),
            pool: Vec::new(),
            next_id: 1,
            allocated: 0,
        }
    }

    /// Create a tile of `rank` at `pos`, reusing a pooled body when one is available.
    ///
    /// A reused body is resized from its previous radius, moved, and stripped of
    /// any velocity or spin before it re-enters the simulation.
    pub fn spawn(&mut self, world: &mut PhysicsWorld, config: &GameConfig, rank: u32, pos: Vec2) -> TileId {
        let radius = radius_for_rank(rank, config);
        let body = match self.pool.pop() {
            Some(body) => {
                if let Some(previous) = world.body_radius(&body) {
                    let factor = radius / previous;
                    world.scale_body(&body, factor, factor);
                }
                world.set_body_position(&body, pos);
                world.reset_motion(&body);
                world.add_body(&body);
                log::debug!("spawn rank {rank}: reused pooled body ({} left)", self.pool.len());
                body
            }
            None => {
                self.allocated += 1;
                log::debug!("spawn rank {rank}: allocated body #{}", self.allocated);
                world.create_circle_body(pos, radius, config.material)
            }
        };
        debug_assert!(!self.by_body.contains_key(&body.body_handle));

        let id = TileId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.slots.insert(id, self.tiles.len());
        self.by_body.insert(body.body_handle, id);
        self.tiles.push(Tile::new(id, rank, pos, body, config));
        id
    }

    /// Remove a tile from play and pool its body. Returns the retired tile.
    pub fn retire(&mut self, world: &mut PhysicsWorld, id: TileId) -> Option<Tile> {
        let slot = self.slots.remove(&id)?;
        let tile = self.tiles.swap_remove(slot);
        if let Some(moved) = self.tiles.get(slot) {
            self.slots.insert(moved.id, slot);
        }
        self.by_body.remove(&tile.body.body_handle);
        world.remove_body(&tile.body);
        self.pool.push(tile.body);
        Some(tile)
    }

    /// Retire every live tile.
    pub fn clear(&mut self, world: &mut PhysicsWorld) {
        while let Some(id) = self.tiles.last().map(|t| t.id) {
            self.retire(world, id);
        }
    }

    /// Copy body positions and rotations onto their tiles.
    pub fn sync_from_physics(&mut self, world: &PhysicsWorld) {
        for tile in &mut self.tiles {
            let (pos, rot) = world.body_position(&tile.body);
            tile.pos = pos;
            tile.rotation = rot;
        }
    }

    /// The live tile owning `body`, if any.
    pub fn tile_for_body(&self, body: RigidBodyHandle) -> Option<TileId> {
        self.by_body.get(&body).copied()
    }

    pub fn get(&self, id: TileId) -> Option<&Tile> {
        self.slots.get(&id).and_then(|&slot| self.tiles.get(slot))
    }

    pub fn get_mut(&mut self, id: TileId) -> Option<&mut Tile> {
        let slot = *self.slots.get(&id)?;
        self.tiles.get_mut(slot)
    }

    pub fn contains(&self, id: TileId) -> bool {
        self.slots.contains_key(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Tile> {
        self.tiles.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Retired bodies available for reuse.
    pub fn pooled(&self) -> usize {
        self.pool.len()
    }

    /// Bodies created by this registry over its lifetime.
    pub fn allocated(&self) -> usize {
        self.allocated
    }

    /// Sum of `2^rank` over the live tiles.
    pub fn score(&self) -> u64 {
        self.tiles
            .iter()
            .fold(0u64, |sum, t| sum.saturating_add(value_for_rank(t.rank)))
    }
}

impl Default for TileRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> (PhysicsWorld, GameConfig, TileRegistry) {
        let config = GameConfig::default();
        let world = PhysicsWorld::new(Vec2::from(config.gravity));
        (world, config, TileRegistry::new())
    }

    #[test]
    fn spawn_registers_tile_and_body() {
        let (mut world, config, mut reg) = setup();
        let id = reg.spawn(&mut world, &config, 2, Vec2::new(100.0, 50.0));

        let tile = reg.get(id).unwrap();
        assert_eq!(tile.rank, 2);
        assert_eq!(reg.tile_for_body(tile.body().body_handle), Some(id));
        assert!(world.contains(tile.body()));
        assert!((world.body_radius(tile.body()).unwrap() - tile.radius).abs() < 0.001);
        assert_eq!(reg.allocated(), 1);
    }

    #[test]
    fn retire_pools_body_and_drops_back_reference() {
        let (mut world, config, mut reg) = setup();
        let id = reg.spawn(&mut world, &config, 0, Vec2::new(100.0, 50.0));
        let handle = reg.get(id).unwrap().body().body_handle;

        let retired = reg.retire(&mut world, id).unwrap();
        assert!(!reg.contains(id));
        assert_eq!(reg.tile_for_body(handle), None);
        assert!(!world.contains(retired.body()));
        assert_eq!(reg.pooled(), 1);
        assert!(reg.retire(&mut world, id).is_none());
    }

    #[test]
    fn retire_keeps_slot_index_consistent() {
        let (mut world, config, mut reg) = setup();
        let ids: Vec<_> = (0..4)
            .map(|i| reg.spawn(&mut world, &config, i, Vec2::new(40.0 + i as f32 * 50.0, 100.0)))
            .collect();

        reg.retire(&mut world, ids[0]);
        for (i, id) in ids.iter().enumerate().skip(1) {
            assert_eq!(reg.get(*id).unwrap().rank, i as u32);
        }
        assert_eq!(reg.len(), 3);
    }

    #[test]
    fn pooled_body_is_reused_without_allocation() {
        let (mut world, config, mut reg) = setup();
        let old = reg.spawn(&mut world, &config, 5, Vec2::new(100.0, 300.0));
        let old_body = *reg.get(old).unwrap().body();
        world.set_velocity(&old_body, Vec2::new(300.0, -200.0));
        world.set_angular_velocity(&old_body, 7.0);
        reg.retire(&mut world, old);
        let bodies_before = world.body_count();

        let new = reg.spawn(&mut world, &config, 1, Vec2::new(50.0, 10.0));
        let tile = reg.get(new).unwrap();

        assert_eq!(*tile.body(), old_body);
        assert_eq!(reg.allocated(), 1);
        assert_eq!(reg.pooled(), 0);
        assert_eq!(world.body_count(), bodies_before);
        assert_eq!(world.velocity(tile.body()), Vec2::ZERO);
        assert_eq!(world.angular_velocity(tile.body()), 0.0);
        assert!((world.body_radius(tile.body()).unwrap() - radius_for_rank(1, &config)).abs() < 0.001);
        let (pos, _) = world.body_position(tile.body());
        assert!((pos - Vec2::new(50.0, 10.0)).length() < 0.001);
        assert_eq!(reg.tile_for_body(old_body.body_handle), Some(new));
        assert_ne!(new, old);
    }

    #[test]
    fn clear_empties_registry_into_pool() {
        let (mut world, config, mut reg) = setup();
        for i in 0..5 {
            reg.spawn(&mut world, &config, 0, Vec2::new(30.0 + i as f32 * 40.0, 100.0));
        }
        reg.clear(&mut world);
        assert!(reg.is_empty());
        assert_eq!(reg.pooled(), 5);
        assert_eq!(world.active_body_count(), 0);
    }

    #[test]
    fn id_counter_wraps_instead_of_overflowing() {
        let (mut world, config, mut reg) = setup();
        reg.next_id = u64::MAX;
        let last = reg.spawn(&mut world, &config, 0, Vec2::new(50.0, 100.0));
        let wrapped = reg.spawn(&mut world, &config, 0, Vec2::new(150.0, 100.0));
        assert_eq!(last, TileId(u64::MAX));
        assert_eq!(wrapped, TileId(0));
        assert_eq!(reg.len(), 2);
    }

    #[test]
    fn score_sums_tile_values() {
        let (mut world, config, mut reg) = setup();
        for (i, rank) in [0u32, 0, 1, 3].into_iter().enumerate() {
            reg.spawn(&mut world, &config, rank, Vec2::new(30.0 + i as f32 * 60.0, 200.0));
        }
        assert_eq!(reg.score(), 12);
    }
}
