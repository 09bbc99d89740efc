pub mod boundary;
pub mod merge;
pub mod preview;
pub mod render;
