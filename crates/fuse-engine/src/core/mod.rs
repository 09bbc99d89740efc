pub mod physics;
pub mod registry;
pub mod time;
pub mod viewport;
