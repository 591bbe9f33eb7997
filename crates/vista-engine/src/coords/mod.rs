//! Coordinate types shared by the view transform and renderers.
//!
//! Three spaces are in play:
//! - screen: physical pixels, origin top-left, +Y down
//! - NDC: `[-1, 1] x [-1, 1]`, origin center, +Y up
//! - world: shape vertex space, mapped to NDC by the view's normalized scale
//!
//! Conversions live on `view::ViewState`; this module only holds the plain types.

mod color;
mod vec2;

pub use color::ColorRgba;
pub use vec2::Vec2;
