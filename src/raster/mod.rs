//! Slice rasterization.
//!
//! Turns one slice of a decoded volume pair into RGBA pixel buffers for a
//! 2-D rendering surface. See [`compositor`] for the layer semantics.

pub mod compositor;

pub use compositor::{
    ensure_same_dimensions, SliceCompositor, SliceRaster, SliceRasterPair, CATEGORY_COLORS,
};
