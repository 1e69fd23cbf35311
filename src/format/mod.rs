//! Decoders for volume and mesh file formats.
//!
//! Three format families are supported:
//!
//! - [`nrrd`] - NRRD volumes (text header, raw or gzip payload)
//! - [`nifti`] - NIfTI-1 single-file volumes (fixed binary header)
//! - [`stl`] - STL surface meshes (ASCII or binary)
//!
//! Use [`detect`] to route an incoming file by name or probe its magic bytes
//! before committing to a full decode.

pub mod detect;
pub mod nifti;
pub mod nrrd;
pub mod stl;

pub use detect::{
    decode_volume, is_nifti_header, is_nrrd_header, is_supported_volume_file,
    volume_format_from_name, VolumeFormat,
};
