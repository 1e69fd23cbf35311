//! NIfTI-1 volume decoder.
//!
//! NIfTI-1 single-file (`.nii`) images carry a fixed 348-byte little-endian
//! binary header followed by the voxel payload. This decoder handles the
//! single-file layout only, and it does not inflate `.nii.gz`; callers must
//! hand it already-decompressed bytes.
//!
//! # Header Fields Used
//!
//! ```text
//! Offset 40:  dim[8]     (8 x u16) dim[0] = number of active dimensions
//! Offset 70:  datatype   (u16)     element type code
//! Offset 108: vox_offset (f32)     payload start; <= 0 means "right after header"
//! Offset 112: scl_slope  (f32)     intensity rescale slope
//! Offset 116: scl_inter  (f32)     intensity rescale intercept
//! Offset 344: magic      (4 bytes) single-file format marker
//! ```
//!
//! When `scl_slope` is neither 0 nor 1, intensities are rescaled into a fresh
//! f32 buffer as `v * slope + inter`; failing that, a nonzero `scl_inter`
//! alone shifts into f32 as `v + inter`; otherwise the payload keeps its
//! original element type. The slope branch wins even when the intercept is
//! zero; callers depend on exactly this precedence.

use crate::error::{DecodeError, FormatError, UnsupportedTypeError};
use crate::io::{read_f32_le, read_u16_le, read_u32_le};
use crate::volume::{element_count, reinterpret_scalars, ScalarType, Volume};

/// Size of the fixed NIfTI-1 header in bytes.
pub const HEADER_SIZE: usize = 348;

/// Little-endian encoding of the NIfTI-1 single-file magic at offset 344.
pub const NIFTI1_MAGIC: u32 = 0x2B31_696E;

/// Byte offset of the `dim` array.
const DIM_OFFSET: usize = 40;

/// Byte offset of the `datatype` field.
const DATATYPE_OFFSET: usize = 70;

/// Byte offset of the `vox_offset` field.
const VOX_OFFSET_OFFSET: usize = 108;

/// Byte offset of the `scl_slope` field.
const SCL_SLOPE_OFFSET: usize = 112;

/// Byte offset of the `scl_inter` field.
const SCL_INTER_OFFSET: usize = 116;

/// Byte offset of the magic field.
const MAGIC_OFFSET: usize = 344;

// =============================================================================
// Header
// =============================================================================

/// Parsed NIfTI-1 header, reduced to the fields decoding needs.
#[derive(Debug, Clone, PartialEq)]
pub struct NiftiHeader {
    /// Active dimensions, `dim[1..=dim[0]]`.
    pub sizes: Vec<usize>,
    /// Element type mapped from the datatype code.
    pub scalar_type: ScalarType,
    /// Byte offset where the payload starts.
    pub data_start: usize,
    /// Intensity rescale slope.
    pub scl_slope: f32,
    /// Intensity rescale intercept.
    pub scl_inter: f32,
}

impl NiftiHeader {
    /// Parse the fixed 348-byte header from the start of `buffer`.
    ///
    /// # Errors
    /// - `FormatError::FileTooSmall` if fewer than 348 bytes are present
    /// - `FormatError::InvalidMagic` if offset 344 does not hold the
    ///   single-file magic
    /// - `UnsupportedTypeError` for a datatype code outside the table
    pub fn parse(buffer: &[u8]) -> Result<Self, DecodeError> {
        if buffer.len() < HEADER_SIZE {
            return Err(FormatError::FileTooSmall {
                required: HEADER_SIZE,
                actual: buffer.len(),
            }
            .into());
        }

        let magic = read_u32_le(&buffer[MAGIC_OFFSET..MAGIC_OFFSET + 4]);
        if magic != NIFTI1_MAGIC {
            return Err(FormatError::InvalidMagic(magic).into());
        }

        let mut dims = [0u16; 8];
        for (i, dim) in dims.iter_mut().enumerate() {
            *dim = read_u16_le(&buffer[DIM_OFFSET + i * 2..DIM_OFFSET + i * 2 + 2]);
        }
        let ndim = (dims[0] as usize).min(7);
        let sizes: Vec<usize> = dims[1..=ndim].iter().map(|&d| d as usize).collect();

        let datatype = read_u16_le(&buffer[DATATYPE_OFFSET..DATATYPE_OFFSET + 2]);
        let scalar_type = scalar_type_from_code(datatype)?;

        let vox_offset = read_f32_le(&buffer[VOX_OFFSET_OFFSET..VOX_OFFSET_OFFSET + 4]);
        let data_start = if vox_offset > 0.0 {
            vox_offset.floor() as usize
        } else {
            HEADER_SIZE
        };

        let scl_slope = read_f32_le(&buffer[SCL_SLOPE_OFFSET..SCL_SLOPE_OFFSET + 4]);
        let scl_inter = read_f32_le(&buffer[SCL_INTER_OFFSET..SCL_INTER_OFFSET + 4]);

        Ok(Self {
            sizes,
            scalar_type,
            data_start,
            scl_slope,
            scl_inter,
        })
    }
}

/// Map a NIfTI datatype code to its element type.
///
/// Code 256 is conventionally signed 8-bit; it decodes as `Int8` but still
/// reports the `"unsigned char"` label through [`ScalarType::display_name`].
fn scalar_type_from_code(code: u16) -> Result<ScalarType, UnsupportedTypeError> {
    match code {
        2 => Ok(ScalarType::Uint8),
        4 => Ok(ScalarType::Int16),
        8 => Ok(ScalarType::Int32),
        16 => Ok(ScalarType::Float32),
        64 => Ok(ScalarType::Float64),
        256 => Ok(ScalarType::Int8),
        512 => Ok(ScalarType::Uint16),
        768 => Ok(ScalarType::Uint32),
        other => Err(UnsupportedTypeError::UnknownDatatypeCode(other)),
    }
}

// =============================================================================
// Decoding
// =============================================================================

/// Decode a NIfTI-1 single-file image into a [`Volume`].
///
/// The returned volume's `type_name` is the on-disk element-type label; after
/// an intensity rescale the stored buffer is f32 while the label still names
/// the disk type, as consumers expect.
///
/// # Errors
/// - [`FormatError`] for a short buffer, bad magic, or truncated payload
/// - [`UnsupportedTypeError`] for an unknown datatype code
pub fn decode(buffer: &[u8]) -> Result<Volume, DecodeError> {
    let header = NiftiHeader::parse(buffer)?;

    if header.data_start > buffer.len() {
        return Err(FormatError::TruncatedPayload {
            required: header.data_start,
            actual: buffer.len(),
        }
        .into());
    }

    let count = element_count(&header.sizes)?;
    let data = reinterpret_scalars(&buffer[header.data_start..], header.scalar_type, count)?;

    // Slope-driven rescale takes priority over intercept-only; an untouched
    // buffer keeps its original element type.
    let slope = header.scl_slope;
    let inter = header.scl_inter;
    let data = if slope != 0.0 && slope != 1.0 {
        data.map_to_f32(|v| (v * slope as f64 + inter as f64) as f32)
    } else if inter != 0.0 {
        data.map_to_f32(|v| (v + inter as f64) as f32)
    } else {
        data
    };

    tracing::debug!(
        sizes = ?header.sizes,
        data_type = header.scalar_type.display_name(),
        voxels = count,
        "decoded NIfTI volume"
    );

    Ok(Volume::new(
        data,
        header.sizes,
        header.scalar_type.display_name(),
    )?)
}

// =============================================================================
// Tests
// =============================================================================
