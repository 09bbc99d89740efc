use glam::Vec2;

use crate::api::config::GameConfig;
use crate::api::types::TileId;
use crate::core::physics::{ContactPair, PhysicsWorld};
use crate::core::registry::TileRegistry;

/// Result of the merge performed during one physics step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MergeOutcome {
    pub survivor: TileId,
    pub absorbed: TileId,
    /// Rank of the survivor after the merge.
    pub rank: u32,
    pub pos: Vec2,
}

/// First pair, in contact order, whose bodies both belong to live tiles of equal rank.
///
/// The first body of the pair is the survivor.
pub fn find_merge(contacts: &[ContactPair], registry: &TileRegistry) -> Option<(TileId, TileId)> {
    contacts.iter().find_map(|pair| {
        let a = registry.tile_for_body(pair.body_a)?;
        let b = registry.tile_for_body(pair.body_b)?;
        if a == b {
            return None;
        }
        let same_rank = registry.get(a)?.rank == registry.get(b)?.rank;
        same_rank.then_some((a, b))
    })
}

/// Resolve one step's contacts. At most one merge happens per call, so no
/// tile can merge twice within a step and chain reactions wait for later steps.
pub fn resolve_merges(
    contacts: &[ContactPair],
    registry: &mut TileRegistry,
    world: &mut PhysicsWorld,
    config: &GameConfig,
) -> Option<MergeOutcome> {
    let (survivor, absorbed) = find_merge(contacts, registry)?;
    merge(survivor, absorbed, registry, world, config)
}

/// Absorb `absorbed` into `survivor`.
///
/// The survivor moves to the midpoint of the two bodies, gains one rank, and its
/// body is scaled by `new_radius / absorbed_radius`. The absorbed tile is retired.
pub fn merge(
    survivor: TileId,
    absorbed: TileId,
    registry: &mut TileRegistry,
    world: &mut PhysicsWorld,
    config: &GameConfig,
) -> Option<MergeOutcome> {
    let (b_body, b_radius) = {
        let b = registry.get(absorbed)?;
        (*b.body(), b.radius)
    };
    let a_body = *registry.get(survivor)?.body();

    let (pos_a, _) = world.body_position(&a_body);
    let (pos_b, _) = world.body_position(&b_body);
    let mid = (pos_a + pos_b) * 0.5;
    world.set_body_position(&a_body, mid);

    let tile = registry.get_mut(survivor)?;
    tile.set_rank(tile.rank.saturating_add(1), config);
    tile.pos = mid;
    let rank = tile.rank;
    let ratio = tile.radius / b_radius;
    world.scale_body(&a_body, ratio, ratio);

    registry.retire(world, absorbed);
    log::debug!("merged {absorbed:?} into {survivor:?}: rank {rank} at ({:.1}, {:.1})", mid.x, mid.y);

    Some(MergeOutcome {
        survivor,
        absorbed,
        rank,
        pos: mid,
    })
}
