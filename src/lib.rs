pub mod app;
pub mod error;
pub mod lyrics;
pub mod player;
pub mod sync;
pub mod ui;
