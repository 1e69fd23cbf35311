//! # voxelview
//!
//! Decoders and slice compositing for volumetric medical images and surface
//! meshes: the core of a slice-by-slice segmentation viewer.
//!
//! This library turns raw file bytes into typed, validated structures and
//! renders volume slices into RGBA pixel buffers. Everything around it
//! (file I/O, canvas/GPU rendering, user interaction, annotation storage) is
//! a consumer of these structures, not part of this crate.
//!
//! ## Features
//!
//! - **NRRD volumes**: text header parsing, raw and gzip-compressed payloads
//! - **NIfTI-1 volumes**: fixed-header parsing with intensity rescaling
//! - **STL meshes**: ASCII and binary, with automatic fallback detection
//! - **Slice compositing**: per-slice grayscale normalization plus a
//!   color-mapped, alpha-blended label overlay
//! - **Category detection**: full-scan, deterministic label category tables
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`io`] - little-endian field extraction helpers
//! - [`mod@format`] - NRRD/NIfTI/STL decoders and format detection
//! - [`volume`] - typed voxel buffers and label category tables
//! - [`mesh`] - triangle-mesh structures
//! - [`raster`] - slice extraction and label compositing
//! - [`error`] - the decode/composite error taxonomy
//!
//! ## Example
//!
//! ```rust,no_run
//! use voxelview::{nrrd, CategoryTable, SliceCompositor, ensure_same_dimensions};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let image_bytes = std::fs::read("scan.nrrd")?;
//! let label_bytes = std::fs::read("segmentation.nrrd")?;
//!
//! let image = nrrd::decode(&image_bytes)?;
//! let label = nrrd::decode(&label_bytes)?;
//! ensure_same_dimensions(&image, &label)?;
//!
//! let categories = CategoryTable::detect(&label);
//! let compositor = SliceCompositor::new();
//! let slices = compositor.composite(&image, &label, &categories, image.depth() / 2, 0.5);
//! # Ok(())
//! # }
//! ```
//!
//! Every decoder either returns a fully valid structure or fails with an
//! error from [`error`]; there are no partial or best-effort decodes.

pub mod error;
pub mod format;
pub mod io;
pub mod mesh;
pub mod raster;
pub mod volume;

// Re-export commonly used types
pub use error::{
    DecodeError, DecompressionError, DimensionMismatchError, FormatError, UnsupportedTypeError,
};
pub use format::{
    decode_volume, is_nifti_header, is_nrrd_header, is_supported_volume_file, nifti, nrrd, stl,
    volume_format_from_name, VolumeFormat,
};
pub use mesh::{BoundingBox, Mesh};
pub use raster::{
    ensure_same_dimensions, SliceCompositor, SliceRaster, SliceRasterPair, CATEGORY_COLORS,
};
pub use volume::categories::CategoryTable;
pub use volume::{ScalarType, Volume, VoxelData};
