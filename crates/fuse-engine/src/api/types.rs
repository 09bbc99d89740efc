/// Stable identifier for a live tile.
///
/// Identifiers are never reused within a `GameCore`, so a stale id held across
/// a retirement can never alias the tile that later reuses the same body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TileId(pub u64);

/// Process-wide game phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GameState {
    #[default]
    Playing,
    GameOver,
}

impl GameState {
    pub fn is_playing(self) -> bool {
        self == GameState::Playing
    }
}
