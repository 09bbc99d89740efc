/// Maps the world container onto the host surface.
///
/// Width changes are deferred: [`Viewport::set_logical_width`] only records the
/// request, and [`Viewport::apply_pending`] recomputes scale and height at the
/// start of the next frame.
#[derive(Debug, Clone)]
pub struct Viewport {
    world_width: f32,
    world_height: f32,
    screen_width: f32,
    screen_height: f32,
    scale: f32,
    pending_width: Option<f32>,
}

impl Viewport {
    pub fn new(world_width: f32, world_height: f32, screen_width: f32) -> Self {
        let mut viewport = Self {
            world_width,
            world_height,
            screen_width,
            screen_height: 0.0,
            scale: 0.0,
            pending_width: Some(screen_width),
        };
        viewport.apply_pending();
        viewport
    }

    /// Request a new on-screen width. Non-positive widths are ignored.
    pub fn set_logical_width(&mut self, width: f32) {
        if width.is_finite() && width > 0.0 {
            self.pending_width = Some(width);
        }
    }

    /// Apply a pending width change. Returns `true` if anything changed.
    pub fn apply_pending(&mut self) -> bool {
        let Some(width) = self.pending_width.take() else {
            return false;
        };
        self.screen_width = width;
        self.screen_height = width * self.world_height / self.world_width;
        self.scale = width / self.world_width;
        log::debug!("viewport resized to {:.0}x{:.0} (scale {:.3})", self.screen_width, self.screen_height, self.scale);
        true
    }

    pub fn screen_width(&self) -> f32 {
        self.screen_width
    }

    pub fn screen_height(&self) -> f32 {
        self.screen_height
    }

    /// Screen pixels per world unit.
    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// Convert a surface-relative pointer x in screen pixels to 0..1 of the container.
    pub fn normalize_x(&self, screen_x: f32) -> f32 {
        if self.screen_width > 0.0 {
            (screen_x / self.screen_width).clamp(0.0, 1.0)
        } else {
            0.5
        }
    }
}
