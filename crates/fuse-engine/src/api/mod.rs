pub mod config;
pub mod events;
pub mod game;
pub mod types;
