/// Flat float layouts shared with the host.
///
/// ```text
/// [Tiles:   tile_count × 8 floats]   x, y, radius, rotation, r, g, b, value
/// [Overlay: 12 floats]               see FrameOverlay
/// [Events:  event_count × 4 floats]  kind, a, b, c
/// ```
///
/// Event payloads by kind:
///
/// | kind | a          | b          | c    |
/// |------|------------|------------|------|
/// | 1    | score      | 0          | 0    |
/// | 2    | rank       | x          | y    |
/// | 3    | score      | tile count | 0    |
/// | 4    | 0          | 0          | 0    |
use bytemuck::{Pod, Zeroable};

use crate::api::events::GameEvent;
use crate::renderer::instance::{FrameOverlay, TileInstance};

/// Protocol version reported to the host.
pub const PROTOCOL_VERSION: f32 = 1.0;

/// Floats per tile instance (wire format, never changes).
pub const TILE_FLOATS: usize = TileInstance::FLOATS;

/// Floats in the frame overlay.
pub const OVERLAY_FLOATS: usize = FrameOverlay::FLOATS;

/// Floats per game event: kind, a, b, c (wire format, never changes).
pub const EVENT_FLOATS: usize = 4;

pub const EVENT_SCORE: f32 = 1.0;
pub const EVENT_MERGED: f32 = 2.0;
pub const EVENT_GAME_OVER: f32 = 3.0;
pub const EVENT_RESTARTED: f32 = 4.0;

/// One game event on the wire.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct WireEvent {
    pub kind: f32,
    pub a: f32,
    pub b: f32,
    pub c: f32,
}

impl From<&GameEvent> for WireEvent {
    fn from(event: &GameEvent) -> Self {
        match *event {
            GameEvent::Score { score } => Self { kind: EVENT_SCORE, a: score as f32, b: 0.0, c: 0.0 },
            GameEvent::Merged { rank, x, y } => Self { kind: EVENT_MERGED, a: rank as f32, b: x, c: y },
            GameEvent::GameOver { score, tile_count } => Self {
                kind: EVENT_GAME_OVER,
                a: score as f32,
                b: tile_count as f32,
                c: 0.0,
            },
            GameEvent::Restarted => Self { kind: EVENT_RESTARTED, ..Self::default() },
        }
    }
}

/// Encode up to `max_events` events into `out`, replacing its contents.
/// Returns the number of events dropped for lack of room.
pub fn encode_events(events: &[GameEvent], max_events: usize, out: &mut Vec<WireEvent>) -> usize {
    out.clear();
    out.extend(events.iter().take(max_events).map(WireEvent::from));
    events.len().saturating_sub(max_events)
}
