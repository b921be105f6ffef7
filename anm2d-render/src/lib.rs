//! CPU rasterisation and export for `anm2d` animations.
//!
//! Builds on the renderer-agnostic core: loads animation files and their
//! atlas textures from a configured game root, rasterises sprites onto an
//! RGBA canvas, and exports still PNGs or VP9/WebM video via an external
//! `ffmpeg` encoder.

#![forbid(unsafe_code)]

mod canvas;
mod error;
mod locator;
mod renderer;
mod sink;
mod texture;
mod video;

pub use canvas::*;
pub use error::*;
pub use locator::*;
pub use renderer::*;
pub use sink::*;
pub use texture::*;
pub use video::*;

#[cfg(test)]
mod canvas_tests;
