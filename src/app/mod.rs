pub mod album;
pub mod cli;
pub mod config;
pub mod events;
pub mod inputs;
pub mod keys;
pub mod state;

pub use album::{Album, Track};
pub use state::*;
