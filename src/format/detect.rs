//! Format detection for volume files.
//!
//! Viewers route an incoming file by its name (the extension the user
//! selected) and can cheaply probe the first bytes before committing to a
//! full decode. `.nii.gz` routes to NIfTI like plain `.nii`; the gzip layer
//! is the caller's to remove before decoding.

use crate::error::DecodeError;
use crate::format::{nifti, nrrd};
use crate::io::read_u32_le;
use crate::volume::Volume;

/// Leading bytes of every NRRD file (`NRRD00` + format version digits).
const NRRD_MAGIC: &[u8] = b"NRRD00";

// =============================================================================
// VolumeFormat
// =============================================================================

/// Recognized volume container format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VolumeFormat {
    /// NRRD (text header + raw/gzip payload)
    Nrrd,
    /// NIfTI-1 single-file
    Nifti,
}

impl VolumeFormat {
    /// Get a human-readable name for the format.
    pub const fn name(&self) -> &'static str {
        match self {
            VolumeFormat::Nrrd => "NRRD",
            VolumeFormat::Nifti => "NIfTI-1",
        }
    }
}

// =============================================================================
// Detection
// =============================================================================

/// Route a file to a volume format by its name, case-insensitively.
///
/// Returns `None` for anything that is not `.nrrd`, `.nii` or `.nii.gz`.
pub fn volume_format_from_name(file_name: &str) -> Option<VolumeFormat> {
    let lower = file_name.to_lowercase();
    if lower.ends_with(".nrrd") {
        Some(VolumeFormat::Nrrd)
    } else if lower.ends_with(".nii") || lower.ends_with(".nii.gz") {
        Some(VolumeFormat::Nifti)
    } else {
        None
    }
}

/// Whether a file name carries a supported volume extension.
pub fn is_supported_volume_file(file_name: &str) -> bool {
    volume_format_from_name(file_name).is_some()
}

/// Check if bytes begin like an NRRD file.
///
/// This is a quick probe that can be used before attempting a full parse.
pub fn is_nrrd_header(bytes: &[u8]) -> bool {
    bytes.len() >= NRRD_MAGIC.len() && &bytes[..NRRD_MAGIC.len()] == NRRD_MAGIC
}

/// Check if bytes begin like a NIfTI-1 single-file image.
pub fn is_nifti_header(bytes: &[u8]) -> bool {
    bytes.len() >= nifti::HEADER_SIZE && read_u32_le(&bytes[344..348]) == nifti::NIFTI1_MAGIC
}

/// Decode a volume file with the given format's decoder.
pub fn decode_volume(bytes: &[u8], format: VolumeFormat) -> Result<Volume, DecodeError> {
    match format {
        VolumeFormat::Nrrd => nrrd::decode(bytes),
        VolumeFormat::Nifti => nifti::decode(bytes),
    }
}

// =============================================================================
// Tests
// =============================================================================
