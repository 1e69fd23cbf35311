//! STL mesh decoder (ASCII and binary).
//!
//! # Format Detection
//!
//! A buffer whose first five bytes case-insensitively spell `"solid"` is
//! first parsed as ASCII; if ASCII parsing fails for any reason the decoder
//! falls back to binary and surfaces *that* parse's error. This matters in
//! practice: plenty of binary STL files begin their free-form 80-byte header
//! with the word "solid". The fallback makes the failure mode deterministic:
//! an ASCII file with unparsable vertex data ends up rejected by the binary
//! parser (usually as a truncated or zero-triangle buffer), never half-read.
//!
//! # Binary Layout
//!
//! ```text
//! Bytes 0-79:  free-form header (ignored)
//! Bytes 80-83: triangle count (u32, little-endian)
//! Then per triangle, 50 bytes:
//!   12 bytes facet normal (3 x f32)
//!   36 bytes vertices     (3 x 3 x f32)
//!   2 bytes attribute byte count (skipped)
//! ```
//!
//! Both paths emit three fresh vertices per triangle (geometrically
//! coincident corners are never merged) with the facet normal copied onto
//! each corner, and reject any non-finite coordinate.

use crate::error::{DecodeError, FormatError};
use crate::io::{read_f32_le, read_u32_le};
use crate::mesh::Mesh;

/// Minimum size of a binary STL: 80-byte header + u32 triangle count.
pub const BINARY_MIN_SIZE: usize = 84;

/// Size of one binary triangle record.
const TRIANGLE_RECORD_SIZE: usize = 50;

// =============================================================================
// Decoding
// =============================================================================

/// Decode an STL file (ASCII or binary) into a [`Mesh`].
///
/// # Errors
/// [`FormatError`] if the buffer is smaller than a binary header, declares
/// zero triangles, is truncated mid-record, yields no vertices, carries a
/// non-finite coordinate, or ends on an incomplete facet.
pub fn decode(buffer: &[u8]) -> Result<Mesh, DecodeError> {
    if buffer.len() >= 5 && buffer[..5].eq_ignore_ascii_case(b"solid") {
        match parse_ascii(buffer) {
            Ok(mesh) => Ok(mesh),
            Err(_) => parse_binary(buffer),
        }
    } else {
        parse_binary(buffer)
    }
}

// =============================================================================
// ASCII
// =============================================================================

/// Parse the `solid ... facet normal ... vertex ...` text form.
fn parse_ascii(buffer: &[u8]) -> Result<Mesh, DecodeError> {
    let text = String::from_utf8_lossy(buffer);

    let mut vertices: Vec<f32> = Vec::new();
    let mut normals: Vec<f32> = Vec::new();
    let mut indices: Vec<u32> = Vec::new();

    // Normal in effect for subsequent vertex lines; a vertex seen before any
    // facet line gets the zero normal.
    let mut current_normal = [0.0f32; 3];
    let mut face: Vec<u32> = Vec::with_capacity(3);

    for (line_no, raw_line) in text.split('\n').enumerate() {
        let line = raw_line.trim();

        if line.starts_with("facet normal") {
            let parts: Vec<&str> = line.split_whitespace().collect();
            if parts.len() < 5 {
                return Err(FormatError::MalformedAscii {
                    line: line_no + 1,
                    message: "facet normal needs 3 components".to_string(),
                }
                .into());
            }
            for (axis, part) in parts[2..5].iter().enumerate() {
                current_normal[axis] = parse_finite_f32(part, line_no + 1)?;
            }
        } else if line.starts_with("vertex") {
            let parts: Vec<&str> = line.split_whitespace().collect();
            if parts.len() < 4 {
                return Err(FormatError::MalformedAscii {
                    line: line_no + 1,
                    message: "vertex needs 3 coordinates".to_string(),
                }
                .into());
            }

            let index = (vertices.len() / 3) as u32;
            for part in &parts[1..4] {
                vertices.push(parse_finite_f32(part, line_no + 1)?);
            }
            normals.extend_from_slice(&current_normal);

            face.push(index);
            if face.len() == 3 {
                indices.extend_from_slice(&face);
                face.clear();
            }
        }
    }

    if !face.is_empty() {
        return Err(FormatError::InvalidVertexData {
            message: format!("incomplete trailing facet with {} vertices", face.len()),
        }
        .into());
    }

    let mesh = build_mesh(vertices, normals, indices)?;
    tracing::debug!(
        triangles = mesh.triangle_count,
        vertices = mesh.vertices.len() / 3,
        "parsed ASCII STL"
    );
    Ok(mesh)
}

fn parse_finite_f32(token: &str, line: usize) -> Result<f32, FormatError> {
    let value: f32 = token.parse().map_err(|_| FormatError::MalformedAscii {
        line,
        message: format!("not a number: {token:?}"),
    })?;
    if !value.is_finite() {
        return Err(FormatError::MalformedAscii {
            line,
            message: format!("non-finite value: {token:?}"),
        });
    }
    Ok(value)
}

// =============================================================================
// Binary
// =============================================================================

/// Parse the 84-byte-header binary form.
fn parse_binary(buffer: &[u8]) -> Result<Mesh, DecodeError> {
    if buffer.len() < BINARY_MIN_SIZE {
        return Err(FormatError::FileTooSmall {
            required: BINARY_MIN_SIZE,
            actual: buffer.len(),
        }
        .into());
    }

    let triangle_count = read_u32_le(&buffer[80..84]) as usize;
    tracing::debug!(triangles = triangle_count, "parsing binary STL");

    if triangle_count == 0 {
        return Err(FormatError::NoTriangles.into());
    }

    let required = BINARY_MIN_SIZE + triangle_count * TRIANGLE_RECORD_SIZE;
    if buffer.len() < required {
        return Err(FormatError::TruncatedPayload {
            required,
            actual: buffer.len(),
        }
        .into());
    }

    let mut vertices: Vec<f32> = Vec::with_capacity(triangle_count * 9);
    let mut normals: Vec<f32> = Vec::with_capacity(triangle_count * 9);
    let mut indices: Vec<u32> = Vec::with_capacity(triangle_count * 3);

    let mut offset = BINARY_MIN_SIZE;
    for _ in 0..triangle_count {
        let mut normal = [0.0f32; 3];
        for component in &mut normal {
            *component = read_finite_f32(buffer, offset, normals.len())?;
            offset += 4;
        }

        for _ in 0..3 {
            let index = (vertices.len() / 3) as u32;
            for _ in 0..3 {
                vertices.push(read_finite_f32(buffer, offset, vertices.len())?);
                offset += 4;
            }
            normals.extend_from_slice(&normal);
            indices.push(index);
        }

        // Attribute byte count, unused
        offset += 2;
    }

    build_mesh(vertices, normals, indices)
}

fn read_finite_f32(buffer: &[u8], offset: usize, element: usize) -> Result<f32, FormatError> {
    let value = read_f32_le(&buffer[offset..offset + 4]);
    if !value.is_finite() {
        return Err(FormatError::NonFiniteCoordinate { index: element });
    }
    Ok(value)
}

// =============================================================================
// Validation
// =============================================================================

/// Final structural checks shared by both paths.
fn build_mesh(vertices: Vec<f32>, normals: Vec<f32>, indices: Vec<u32>) -> Result<Mesh, DecodeError> {
    if vertices.is_empty() {
        return Err(FormatError::EmptyMesh.into());
    }
    if vertices.len() % 3 != 0 {
        return Err(FormatError::InvalidVertexData {
            message: format!("coordinate count {} not divisible by 3", vertices.len()),
        }
        .into());
    }
    if vertices.len() != indices.len() * 3 {
        return Err(FormatError::InvalidVertexData {
            message: format!(
                "{} vertices for {} face corners",
                vertices.len() / 3,
                indices.len()
            ),
        }
        .into());
    }

    let triangle_count = indices.len() / 3;
    Ok(Mesh {
        vertices,
        normals,
        indices,
        triangle_count,
    })
}

// =============================================================================
// Tests
// =============================================================================
