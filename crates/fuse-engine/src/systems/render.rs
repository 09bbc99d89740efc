use crate::api::types::GameState;
use crate::components::tile::Tile;
use crate::renderer::instance::{FrameOverlay, TileBuffer, TileInstance};
use crate::systems::preview::Preview;

/// Everything besides the tiles that one frame draws.
pub struct OverlayInput<'a> {
    pub preview: &'a Preview,
    pub danger: f32,
    pub scale: f32,
    pub state: GameState,
    pub boundary_y: f32,
}

/// Rebuild the render buffer from the live tiles and the overlay state.
pub fn build_tile_buffer<'a>(tiles: impl Iterator<Item = &'a Tile>, overlay: OverlayInput<'_>, buffer: &mut TileBuffer) {
    buffer.clear();

    for tile in tiles {
        buffer.push(TileInstance {
            x: tile.pos.x,
            y: tile.pos.y,
            radius: tile.radius,
            rotation: tile.rotation,
            r: tile.color.r,
            g: tile.color.g,
            b: tile.color.b,
            value: tile.value() as f32,
        });
    }

    let preview = overlay.preview;
    buffer.set_overlay(FrameOverlay {
        preview_x: preview.x,
        preview_y: preview.y,
        preview_radius: preview.radius,
        preview_r: preview.color.r,
        preview_g: preview.color.g,
        preview_b: preview.color.b,
        preview_value: preview.value() as f32,
        danger: overlay.danger,
        scale: overlay.scale,
        game_over: if overlay.state.is_playing() { 0.0 } else { 1.0 },
        boundary_y: overlay.boundary_y,
        _pad: 0.0,
    });
}
