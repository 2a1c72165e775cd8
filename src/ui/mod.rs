//! Terminal User Interface module.
//!
//! - `loop_runner` - Main event loop and terminal management
//! - `input` - Keyboard input handling
//! - `events` - Background fetch event processing
//! - `render` - View rendering

mod events;
mod input;
mod loop_runner;
mod render;

pub use loop_runner::{run, Action};
