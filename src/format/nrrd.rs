//! NRRD volume decoder.
//!
//! NRRD files carry a line-oriented text header terminated by an empty line,
//! followed by the voxel payload (raw or gzip-compressed), little-endian,
//! row-major with x fastest-varying.
//!
//! # Header Structure
//!
//! ```text
//! NRRD0004
//! type: unsigned char
//! dimension: 3
//! sizes: 64 64 32
//! encoding: gzip
//! <empty line>
//! <payload bytes>
//! ```
//!
//! Only `sizes`, `type` and `encoding` are interpreted; every other field is
//! ignored. A repeated field keeps its last occurrence.

use std::io::Read;

use flate2::read::GzDecoder;

use crate::error::{DecodeError, DecompressionError, FormatError, UnsupportedTypeError};
use crate::volume::{element_count, reinterpret_scalars, ScalarType, Volume};

/// Header/data boundary: two consecutive line feeds.
const HEADER_TERMINATOR: [u8; 2] = [0x0A, 0x0A];

// =============================================================================
// Header
// =============================================================================

/// Payload encoding declared in the header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Encoding {
    Raw,
    Gzip,
}

impl Encoding {
    /// `gzip` and `gz` select gzip; anything else (including an absent
    /// field) is treated as raw.
    fn from_field(value: Option<&str>) -> Self {
        match value {
            Some("gzip") | Some("gz") => Encoding::Gzip,
            _ => Encoding::Raw,
        }
    }
}

/// The recognized fields of an NRRD header.
#[derive(Debug)]
struct NrrdHeader {
    sizes: Vec<usize>,
    type_name: String,
    encoding: Encoding,
}

/// Parse the text region of an NRRD file.
///
/// Lines without a colon (the `NRRD0004` signature line, comments) are
/// skipped. Field names are lowercased and trimmed, values trimmed.
fn parse_header(text: &str) -> Result<NrrdHeader, DecodeError> {
    let mut sizes: Option<Vec<usize>> = None;
    let mut type_name: Option<String> = None;
    let mut encoding: Option<String> = None;

    for line in text.split('\n') {
        let Some(colon) = line.find(':') else {
            continue;
        };
        let field = line[..colon].trim().to_lowercase();
        let value = line[colon + 1..].trim();

        match field.as_str() {
            "sizes" => {
                let parsed = value
                    .split_whitespace()
                    .map(str::parse::<usize>)
                    .collect::<Result<Vec<_>, _>>()
                    .map_err(|e| FormatError::InvalidFieldValue {
                        field: "sizes",
                        message: e.to_string(),
                    })?;
                sizes = Some(parsed);
            }
            "type" => type_name = Some(value.to_string()),
            "encoding" => encoding = Some(value.to_string()),
            _ => {}
        }
    }

    let sizes = sizes.ok_or(FormatError::MissingField("sizes"))?;
    let type_name = type_name.ok_or(FormatError::MissingField("type"))?;
    let encoding = Encoding::from_field(encoding.as_deref());

    Ok(NrrdHeader {
        sizes,
        type_name,
        encoding,
    })
}

/// Map an NRRD type name to its element type.
///
/// Names are matched case-sensitively; several aliases map to one type.
fn scalar_type_from_name(name: &str) -> Result<ScalarType, UnsupportedTypeError> {
    match name {
        "unsigned char" | "uint8" => Ok(ScalarType::Uint8),
        "short" | "int16" => Ok(ScalarType::Int16),
        "unsigned short" | "uint16" => Ok(ScalarType::Uint16),
        "int" | "signed int" | "int32" => Ok(ScalarType::Int32),
        "unsigned int" | "uint32" => Ok(ScalarType::Uint32),
        "float" => Ok(ScalarType::Float32),
        "double" => Ok(ScalarType::Float64),
        other => Err(UnsupportedTypeError::UnknownTypeName(other.to_string())),
    }
}

// =============================================================================
// Decoding
// =============================================================================

/// Decode an NRRD file into a [`Volume`].
///
/// # Errors
/// - [`FormatError`] if the header terminator is missing, a required field is
///   absent or unparsable, or the payload is shorter than the dimensions
///   require
/// - [`UnsupportedTypeError`] for a type name outside the supported table
/// - [`DecompressionError`] if a gzip payload cannot be inflated
pub fn decode(buffer: &[u8]) -> Result<Volume, DecodeError> {
    // Locate the first empty line: the byte after it starts the payload.
    let boundary = buffer
        .windows(2)
        .position(|w| w == HEADER_TERMINATOR)
        .ok_or(FormatError::MissingHeaderTerminator)?;
    let header_end = boundary + HEADER_TERMINATOR.len();

    let header_text = String::from_utf8_lossy(&buffer[..header_end]);
    let header = parse_header(&header_text)?;

    let scalar_type = scalar_type_from_name(&header.type_name)?;

    let payload = &buffer[header_end..];
    let payload = match header.encoding {
        Encoding::Raw => std::borrow::Cow::Borrowed(payload),
        Encoding::Gzip => {
            let mut inflated = Vec::new();
            GzDecoder::new(payload)
                .read_to_end(&mut inflated)
                .map_err(|e| DecompressionError::Gzip(e.to_string()))?;
            std::borrow::Cow::Owned(inflated)
        }
    };

    let count = element_count(&header.sizes)?;
    let data = reinterpret_scalars(&payload, scalar_type, count)?;

    tracing::debug!(
        sizes = ?header.sizes,
        data_type = %header.type_name,
        voxels = count,
        "decoded NRRD volume"
    );

    Ok(Volume::new(data, header.sizes, header.type_name)?)
}

// =============================================================================
// Tests
// =============================================================================
