//! View transform state.
//!
//! `ViewState` owns zoom, pan offset and framebuffer size for one window.
//! The runtime feeds it input events and calls `advance_frame` once per
//! redraw; renderers read a `ViewUniforms` snapshot afterwards.

mod state;
mod types;

pub use state::ViewState;
pub use types::{Direction, DirectionKeys, EventPolicy, KeyAction, ViewConfig, ViewUniforms};
