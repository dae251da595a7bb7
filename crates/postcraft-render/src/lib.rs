//! Postcraft Render Library
//!
//! Renderer abstraction for Postcraft. The engine's scene is turned into a
//! screen-space display list that any drawing backend can consume.

mod display_list;
mod renderer;

pub use display_list::{DisplayItem, DisplayList, DisplayListRenderer, ShapeGeometry};
pub use renderer::{RenderContext, RenderResult, Renderer, RendererError};
