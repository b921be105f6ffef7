//! Pure Rust decoder and render walker for `.anm` sprite animation containers.
//!
//! This crate is renderer-agnostic: it decodes an animation file into a typed
//! model and walks sprite graphs against a caller-provided blit sink.
//! Rasterisation, atlas loading, and video export live in separate crates
//! (e.g. `anm2d-render`).

#![forbid(unsafe_code)]

mod cursor;
mod error;
mod geometry;
mod model;
mod render;
mod version;

pub mod binary;

pub use cursor::*;
pub use error::*;
pub use geometry::*;
pub use model::*;
pub use render::*;
pub use version::*;

pub use binary::decode;




#[cfg(test)]
mod render_tests;
