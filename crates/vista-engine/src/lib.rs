//! Vista engine crate.
//!
//! Window runtime, input, GPU device and the 2D view transform used by the
//! shape viewer. One window, one camera-like view, one drawable.

pub mod device;
pub mod window;
pub mod input;
pub mod core;
pub mod view;

pub mod logging;
pub mod coords;
pub mod render;
