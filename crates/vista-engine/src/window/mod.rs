//! Window + runtime loop.
//!
//! Owns the `winit` EventLoop and the window, feeds input into the view
//! state and drives one frame per redraw.

mod runtime;

pub use runtime::{Runtime, RuntimeConfig};
