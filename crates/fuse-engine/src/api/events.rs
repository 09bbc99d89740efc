/// Notifications emitted by the simulation core.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    /// Live score (sum of `2^rank` over the live tiles) after a spawn or merge.
    Score { score: u64 },
    /// Two tiles merged into one of `rank` at `(x, y)`.
    Merged { rank: u32, x: f32, y: f32 },
    /// The boundary timer expired. Emitted once per game.
    GameOver { score: u64, tile_count: u32 },
    /// The board was cleared and play resumed.
    Restarted,
}

type Listener = Box<dyn FnMut(&GameEvent)>;

/// Typed event dispatch.
///
/// Events are kept in a per-frame buffer (for hosts that poll after each tick)
/// and handed to every registered listener as they are emitted.
pub struct EventBus {
    frame: Vec<GameEvent>,
    listeners: Vec<Listener>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::with_capacity(32)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            frame: Vec::with_capacity(capacity),
            listeners: Vec::new(),
        }
    }

    /// Register a listener. Listeners run in registration order.
    pub fn on(&mut self, listener: impl FnMut(&GameEvent) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    pub fn emit(&mut self, event: GameEvent) {
        for listener in &mut self.listeners {
            listener(&event);
        }
        self.frame.push(event);
    }

    /// Events emitted since the last [`EventBus::clear_frame`].
    pub fn frame_events(&self) -> &[GameEvent] {
        &self.frame
    }

    pub fn clear_frame(&mut self) {
        self.frame.clear();
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
