use thiserror::Error;

/// Errors for malformed or truncated file structure.
///
/// A `FormatError` means the input bytes do not form a valid file of the
/// format being decoded. It is never recoverable: the load must be aborted
/// and the failing file reported to the user by the caller.
#[derive(Debug, Clone, Error)]
pub enum FormatError {
    /// NRRD header is not terminated by a blank line (two consecutive LF bytes)
    #[error("NRRD header terminator (empty line) not found")]
    MissingHeaderTerminator,

    /// A required header field is absent
    #[error("missing required header field: {0}")]
    MissingField(&'static str),

    /// A header field is present but cannot be parsed
    #[error("invalid value for header field {field}: {message}")]
    InvalidFieldValue {
        field: &'static str,
        message: String,
    },

    /// Dimension list is empty or its element product overflows
    #[error("invalid volume dimensions: {sizes:?}")]
    InvalidDimensions { sizes: Vec<usize> },

    /// Invalid NIfTI-1 magic number at byte offset 344
    #[error("invalid NIfTI magic: expected 0x2B31696E, got 0x{0:08X}")]
    InvalidMagic(u32),

    /// Buffer is too small to contain the fixed-size structure being read
    #[error("file too small: need at least {required} bytes, got {actual}")]
    FileTooSmall { required: usize, actual: usize },

    /// Payload holds fewer bytes than the declared element count requires
    #[error("truncated payload: need {required} bytes, got {actual}")]
    TruncatedPayload { required: usize, actual: usize },

    /// Volume data length does not match the product of its dimensions
    #[error("data length {actual} does not match dimensions {sizes:?} ({expected} elements)")]
    SizeMismatch {
        sizes: Vec<usize>,
        expected: usize,
        actual: usize,
    },

    /// Binary STL declares zero triangles
    #[error("STL file contains no triangles")]
    NoTriangles,

    /// STL parsing produced no vertices
    #[error("no vertices found in STL file")]
    EmptyMesh,

    /// STL vertex data is ragged (incomplete coordinate triple or face)
    #[error("invalid vertex data: {message}")]
    InvalidVertexData { message: String },

    /// A mesh coordinate is NaN or infinite
    #[error("non-finite coordinate at element {index}")]
    NonFiniteCoordinate { index: usize },

    /// An ASCII STL line could not be parsed
    #[error("malformed ASCII STL at line {line}: {message}")]
    MalformedAscii { line: usize, message: String },
}

/// Recognized format, unsupported element type.
#[derive(Debug, Clone, Error)]
pub enum UnsupportedTypeError {
    /// NRRD `type` field names a type this decoder does not handle
    #[error("unsupported NRRD data type: {0:?}")]
    UnknownTypeName(String),

    /// NIfTI `datatype` code is not in the supported table
    #[error("unsupported NIfTI datatype code: {0}")]
    UnknownDatatypeCode(u16),
}

/// Compressed payload could not be inflated.
#[derive(Debug, Clone, Error)]
pub enum DecompressionError {
    /// Gzip stream is corrupt or truncated
    #[error("failed to decompress gzip data: {0}")]
    Gzip(String),
}

/// Umbrella error returned by the decoders.
///
/// Groups the three failure classes a decode can hit so callers can match on
/// one type while the taxonomy stays distinct underneath.
#[derive(Debug, Clone, Error)]
pub enum DecodeError {
    #[error(transparent)]
    Format(#[from] FormatError),

    #[error(transparent)]
    UnsupportedType(#[from] UnsupportedTypeError),

    #[error(transparent)]
    Decompression(#[from] DecompressionError),
}

/// Two co-registered volumes disagree on their dimensions.
///
/// Raised by [`crate::raster::ensure_same_dimensions`] before compositing is
/// attempted, never from inside the compositor itself.
#[derive(Debug, Clone, Error)]
#[error("volume dimensions do not match: image {image:?}, label {label:?}")]
pub struct DimensionMismatchError {
    pub image: Vec<usize>,
    pub label: Vec<usize>,
}
