//! Volume data model.
//!
//! A [`Volume`] is a decoded scalar field: a flat, typed voxel buffer plus
//! its grid dimensions. Both volume decoders ([`crate::format::nrrd`] and
//! [`crate::format::nifti`]) produce one through the same generic
//! little-endian reinterpretation routine, [`reinterpret_scalars`], so the
//! per-type byte handling lives in exactly one place.
//!
//! Volumes are immutable once constructed. Intensity rescaling (NIfTI
//! `scl_slope`/`scl_inter`) produces a new buffer rather than mutating in
//! place.

pub mod categories;

use crate::error::FormatError;

// =============================================================================
// ScalarType
// =============================================================================

/// Element type of a voxel buffer.
///
/// `Int8` is only ever produced by the NIfTI decoder (datatype code 256);
/// the NRRD type-name table has no signed 8-bit entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarType {
    Uint8,
    Int8,
    Int16,
    Uint16,
    Int32,
    Uint32,
    Float32,
    Float64,
}

impl ScalarType {
    /// Width of one element in bytes.
    #[inline]
    pub const fn byte_width(self) -> usize {
        match self {
            ScalarType::Uint8 | ScalarType::Int8 => 1,
            ScalarType::Int16 | ScalarType::Uint16 => 2,
            ScalarType::Int32 | ScalarType::Uint32 | ScalarType::Float32 => 4,
            ScalarType::Float64 => 8,
        }
    }

    /// Human-readable element-type label, as reported to viewers.
    ///
    /// `Int8` deliberately reports `"unsigned char"`: NIfTI datatype code 256
    /// is signed 8-bit, but downstream consumers expect the label that code 2
    /// carries. Kept for output compatibility.
    pub const fn display_name(self) -> &'static str {
        match self {
            ScalarType::Uint8 | ScalarType::Int8 => "unsigned char",
            ScalarType::Int16 => "short",
            ScalarType::Uint16 => "unsigned short",
            ScalarType::Int32 => "int",
            ScalarType::Uint32 => "unsigned int",
            ScalarType::Float32 => "float",
            ScalarType::Float64 => "double",
        }
    }
}

// =============================================================================
// VoxelData
// =============================================================================

/// Typed voxel buffer.
///
/// The runtime-tagged analogue of a typed array: a closed union over the
/// element types the decoders can produce. Values are read back as `f64`
/// through [`VoxelData::get`], which is lossless for every variant except
/// the extreme ends of `Uint32`/`Int32` beyond 2^53 (unreachable for voxel
/// data in practice).
#[derive(Debug, Clone, PartialEq)]
pub enum VoxelData {
    Uint8(Vec<u8>),
    Int8(Vec<i8>),
    Int16(Vec<i16>),
    Uint16(Vec<u16>),
    Int32(Vec<i32>),
    Uint32(Vec<u32>),
    Float32(Vec<f32>),
    Float64(Vec<f64>),
}

impl VoxelData {
    /// Number of elements in the buffer.
    pub fn len(&self) -> usize {
        match self {
            VoxelData::Uint8(v) => v.len(),
            VoxelData::Int8(v) => v.len(),
            VoxelData::Int16(v) => v.len(),
            VoxelData::Uint16(v) => v.len(),
            VoxelData::Int32(v) => v.len(),
            VoxelData::Uint32(v) => v.len(),
            VoxelData::Float32(v) => v.len(),
            VoxelData::Float64(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Element type tag of this buffer.
    pub const fn scalar_type(&self) -> ScalarType {
        match self {
            VoxelData::Uint8(_) => ScalarType::Uint8,
            VoxelData::Int8(_) => ScalarType::Int8,
            VoxelData::Int16(_) => ScalarType::Int16,
            VoxelData::Uint16(_) => ScalarType::Uint16,
            VoxelData::Int32(_) => ScalarType::Int32,
            VoxelData::Uint32(_) => ScalarType::Uint32,
            VoxelData::Float32(_) => ScalarType::Float32,
            VoxelData::Float64(_) => ScalarType::Float64,
        }
    }

    /// Read element `index` as `f64`.
    ///
    /// # Panics
    /// Panics if `index` is out of bounds.
    #[inline]
    pub fn get(&self, index: usize) -> f64 {
        match self {
            VoxelData::Uint8(v) => v[index] as f64,
            VoxelData::Int8(v) => v[index] as f64,
            VoxelData::Int16(v) => v[index] as f64,
            VoxelData::Uint16(v) => v[index] as f64,
            VoxelData::Int32(v) => v[index] as f64,
            VoxelData::Uint32(v) => v[index] as f64,
            VoxelData::Float32(v) => v[index] as f64,
            VoxelData::Float64(v) => v[index],
        }
    }

    /// Map every element through `f` into a fresh f32 buffer.
    ///
    /// Used by the NIfTI intensity-rescale pass; the source buffer is left
    /// untouched.
    pub fn map_to_f32(&self, f: impl Fn(f64) -> f32) -> VoxelData {
        let mapped = (0..self.len()).map(|i| f(self.get(i))).collect();
        VoxelData::Float32(mapped)
    }
}

// =============================================================================
// Reinterpretation
// =============================================================================

/// Total element count for a dimension list, checked for overflow.
///
/// An empty list or an overflowing product is rejected; a zero dimension is
/// rejected too, since every axis of a voxel grid must be positive.
pub fn element_count(sizes: &[usize]) -> Result<usize, FormatError> {
    if sizes.is_empty() || sizes.contains(&0) {
        return Err(FormatError::InvalidDimensions {
            sizes: sizes.to_vec(),
        });
    }
    sizes
        .iter()
        .try_fold(1usize, |acc, &s| acc.checked_mul(s))
        .ok_or(FormatError::InvalidDimensions {
            sizes: sizes.to_vec(),
        })
}

/// Reinterpret raw little-endian payload bytes as `count` typed elements.
///
/// The payload may be larger than needed (a prefix is reinterpreted), but
/// fewer bytes than `count * byte_width` is a corrupt file, not a
/// truncation-tolerant warning.
pub fn reinterpret_scalars(
    bytes: &[u8],
    scalar_type: ScalarType,
    count: usize,
) -> Result<VoxelData, FormatError> {
    let required = count
        .checked_mul(scalar_type.byte_width())
        .ok_or(FormatError::TruncatedPayload {
            required: usize::MAX,
            actual: bytes.len(),
        })?;
    if bytes.len() < required {
        return Err(FormatError::TruncatedPayload {
            required,
            actual: bytes.len(),
        });
    }
    let bytes = &bytes[..required];

    // Byte-wise conversion keeps this correct on any host endianness and for
    // unaligned payloads.
    Ok(match scalar_type {
        ScalarType::Uint8 => VoxelData::Uint8(bytes.to_vec()),
        ScalarType::Int8 => VoxelData::Int8(bytes.iter().map(|&b| b as i8).collect()),
        ScalarType::Int16 => VoxelData::Int16(
            bytes
                .chunks_exact(2)
                .map(|c| i16::from_le_bytes([c[0], c[1]]))
                .collect(),
        ),
        ScalarType::Uint16 => VoxelData::Uint16(
            bytes
                .chunks_exact(2)
                .map(|c| u16::from_le_bytes([c[0], c[1]]))
                .collect(),
        ),
        ScalarType::Int32 => VoxelData::Int32(
            bytes
                .chunks_exact(4)
                .map(|c| i32::from_le_bytes([c[0], c[1], c[2], c[3]]))
                .collect(),
        ),
        ScalarType::Uint32 => VoxelData::Uint32(
            bytes
                .chunks_exact(4)
                .map(|c| u32::from_le_bytes([c[0], c[1], c[2], c[3]]))
                .collect(),
        ),
        ScalarType::Float32 => VoxelData::Float32(
            bytes
                .chunks_exact(4)
                .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
                .collect(),
        ),
        ScalarType::Float64 => VoxelData::Float64(
            bytes
                .chunks_exact(8)
                .map(|c| {
                    f64::from_le_bytes([c[0], c[1], c[2], c[3], c[4], c[5], c[6], c[7]])
                })
                .collect(),
        ),
    })
}

// =============================================================================
// Volume
// =============================================================================

/// A decoded scalar field on a regular 3-D (or higher) grid.
///
/// `sizes` is ordered fastest-varying first: `sizes[0]` is x (width),
/// `sizes[1]` is y (height), `sizes[2]` is z (depth). The flat buffer is
/// row-major with x innermost, so slice `k` occupies the contiguous run
/// `data[k*w*h .. (k+1)*w*h]`.
///
/// A volume whose values are discrete category identifiers (a label map) is
/// represented by the same type; value `0` is reserved as background and
/// never receives a display color.
#[derive(Debug, Clone)]
pub struct Volume {
    data: VoxelData,
    sizes: Vec<usize>,
    type_name: String,
}

impl Volume {
    /// Build a volume, enforcing the size invariant.
    ///
    /// # Errors
    /// - `InvalidDimensions` if fewer than 3 dimensions are given, any is
    ///   zero, or the product overflows
    /// - `SizeMismatch` if `data.len()` is not exactly the dimension product
    pub fn new(
        data: VoxelData,
        sizes: Vec<usize>,
        type_name: impl Into<String>,
    ) -> Result<Self, FormatError> {
        if sizes.len() < 3 {
            return Err(FormatError::InvalidDimensions { sizes });
        }
        let expected = element_count(&sizes)?;
        if data.len() != expected {
            return Err(FormatError::SizeMismatch {
                sizes,
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            data,
            sizes,
            type_name: type_name.into(),
        })
    }

    /// The typed voxel buffer.
    pub fn data(&self) -> &VoxelData {
        &self.data
    }

    /// Grid dimensions, fastest-varying axis first.
    pub fn sizes(&self) -> &[usize] {
        &self.sizes
    }

    /// Element-type label as reported by the source format: the literal NRRD
    /// header string, or the NIfTI display-name table.
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Element type of the stored buffer (after any rescale pass).
    pub fn scalar_type(&self) -> ScalarType {
        self.data.scalar_type()
    }

    /// Total number of voxels.
    pub fn voxel_count(&self) -> usize {
        self.data.len()
    }

    /// In-plane width (`sizes[0]`).
    #[inline]
    pub fn width(&self) -> usize {
        self.sizes[0]
    }

    /// In-plane height (`sizes[1]`).
    #[inline]
    pub fn height(&self) -> usize {
        self.sizes[1]
    }

    /// Number of slices (`sizes[2]`).
    #[inline]
    pub fn depth(&self) -> usize {
        self.sizes[2]
    }
}

// =============================================================================
// Tests
// =============================================================================
