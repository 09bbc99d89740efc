use bytemuck::{Pod, Zeroable};

/// Per-tile render data read by the host renderer.
/// 8 floats = 32 bytes stride.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct TileInstance {
    /// X position in world space.
    pub x: f32,
    /// Y position in world space (Y-down).
    pub y: f32,
    pub radius: f32,
    /// Rotation in radians.
    pub rotation: f32,
    pub r: f32,
    pub g: f32,
    pub b: f32,
    /// Displayed value `2^rank`, as a float.
    pub value: f32,
}

impl TileInstance {
    pub const FLOATS: usize = 8;
    pub const STRIDE_BYTES: usize = Self::FLOATS * 4;
}

/// Per-frame state drawn on top of the tiles: the preview, the danger
/// indicator, and the game state flag.
/// 12 floats = 48 bytes.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct FrameOverlay {
    pub preview_x: f32,
    pub preview_y: f32,
    pub preview_radius: f32,
    pub preview_r: f32,
    pub preview_g: f32,
    pub preview_b: f32,
    pub preview_value: f32,
    /// Boundary line indicator strength, 0.1..=1.0.
    pub danger: f32,
    /// Screen pixels per world unit.
    pub scale: f32,
    /// 0.0 while playing, 1.0 once the game is over.
    pub game_over: f32,
    pub boundary_y: f32,
    pub _pad: f32,
}

impl FrameOverlay {
    pub const FLOATS: usize = 12;
}

/// Tile instances for one frame plus the overlay.
pub struct TileBuffer {
    instances: Vec<TileInstance>,
    overlay: FrameOverlay,
}

impl TileBuffer {
    pub fn new() -> Self {
        Self::with_capacity(256)
    }

    pub fn with_capacity(max: usize) -> Self {
        Self {
            instances: Vec::with_capacity(max),
            overlay: FrameOverlay::default(),
        }
    }

    pub fn clear(&mut self) {
        self.instances.clear();
    }

    pub fn push(&mut self, instance: TileInstance) {
        self.instances.push(instance);
    }

    pub fn instances(&self) -> &[TileInstance] {
        &self.instances
    }

    pub fn instance_count(&self) -> u32 {
        self.instances.len() as u32
    }

    /// Raw pointer to instance data for host-side reads.
    pub fn instances_ptr(&self) -> *const f32 {
        self.instances.as_ptr() as *const f32
    }

    pub fn overlay(&self) -> &FrameOverlay {
        &self.overlay
    }

    pub fn set_overlay(&mut self, overlay: FrameOverlay) {
        self.overlay = overlay;
    }

    pub fn overlay_ptr(&self) -> *const f32 {
        &self.overlay as *const FrameOverlay as *const f32
    }
}

impl Default for TileBuffer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_sizes() {
        assert_eq!(std::mem::size_of::<TileInstance>(), TileInstance::STRIDE_BYTES);
        assert_eq!(std::mem::size_of::<FrameOverlay>(), FrameOverlay::FLOATS * 4);
    }

    #[test]
    fn floats_follow_field_order() {
        let mut buf = TileBuffer::new();
        buf.push(TileInstance { x: 1.0, y: 2.0, radius: 3.0, rotation: 4.0, r: 0.5, g: 0.25, b: 0.125, value: 8.0 });
        buf.push(TileInstance::default());
        assert_eq!(buf.instance_count(), 2);
        let floats: &[f32] = bytemuck::cast_slice(buf.instances());
        assert_eq!(&floats[..8], &[1.0, 2.0, 3.0, 4.0, 0.5, 0.25, 0.125, 8.0]);
        buf.clear();
        assert_eq!(buf.instance_count(), 0);
    }
}
