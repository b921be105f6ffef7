//! Container version flag bits.

/// The animation references a texture atlas.
pub const VERSION_USE_ATLAS: u8 = 0x1;

/// A local index block follows the header.
pub const VERSION_USE_LOCAL_INDEX: u8 = 0x2;

/// Shapes carry data for pixel-accurate hit testing.
pub const VERSION_PERFECT_HIT_TEST: u8 = 0x4;

/// Written by the optimizing exporter.
pub const VERSION_OPTIMIZED: u8 = 0x8;

/// A shared transform table precedes the sprites.
pub const VERSION_USE_TRANSFORM_INDEX: u8 = 0x10;
