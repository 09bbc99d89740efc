/// Input the core understands.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// The pointer moved to normalized x (0..1 of the container width).
    PointerMove { x: f32 },
    /// The pointer was released at normalized x: move the preview there, then drop it.
    Commit { x: f32 },
    /// Clear the board and start over.
    Restart,
}

/// A queue of input events.
/// The host pushes events between frames; the core applies all of them at the
/// start of the next frame, before the physics step.
pub struct InputQueue {
    events: Vec<InputEvent>,
}

impl InputQueue {
    pub fn new() -> Self {
        Self {
            events: Vec::with_capacity(32),
        }
    }

    pub fn push(&mut self, event: InputEvent) {
        self.events.push(event);
    }

    /// Drain all pending events in arrival order.
    pub fn drain(&mut self) -> Vec<InputEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }
}

impl Default for InputQueue {
    fn default() -> Self {
        Self::new()
    }
}
