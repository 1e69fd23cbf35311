//! Shared builders for synthetic test files.
//!
//! Real NRRD/NIfTI/STL fixtures are large and binary; the decoders only care
//! about structure, so every test assembles a minimal file from scratch.

use flate2::write::GzEncoder;
use flate2::Compression;
use std::io::Write;

/// Assemble an NRRD file from header lines and a payload.
pub fn make_nrrd(header_lines: &[&str], payload: &[u8]) -> Vec<u8> {
    let mut buf = Vec::new();
    buf.extend_from_slice(b"NRRD0004\n");
    for line in header_lines {
        buf.extend_from_slice(line.as_bytes());
        buf.push(b'\n');
    }
    buf.push(b'\n');
    buf.extend_from_slice(payload);
    buf
}

/// Gzip-compress a byte slice.
pub fn gzip_bytes(data: &[u8]) -> Vec<u8> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data).unwrap();
    encoder.finish().unwrap()
}

/// Build a 348-byte NIfTI-1 header.
///
/// `dims[0]` is the active-dimension count, `dims[1..]` the extents.
pub fn make_nifti_header(dims: &[u16], datatype: u16, slope: f32, inter: f32) -> Vec<u8> {
    let mut buf = vec![0u8; 348];
    for (i, &d) in dims.iter().enumerate() {
        let at = 40 + i * 2;
        buf[at..at + 2].copy_from_slice(&d.to_le_bytes());
    }
    buf[70..72].copy_from_slice(&datatype.to_le_bytes());
    buf[112..116].copy_from_slice(&slope.to_le_bytes());
    buf[116..120].copy_from_slice(&inter.to_le_bytes());
    buf[344..348].copy_from_slice(&0x2B31_696Eu32.to_le_bytes());
    buf
}

/// Build a complete NIfTI-1 file with the payload right after the header.
pub fn make_nifti(dims: &[u16], datatype: u16, payload: &[u8]) -> Vec<u8> {
    let mut buf = make_nifti_header(dims, datatype, 0.0, 0.0);
    buf.extend_from_slice(payload);
    buf
}

/// Serialize triangles as binary STL; each entry is (normal, [v0, v1, v2]).
pub fn make_binary_stl(triangles: &[([f32; 3], [[f32; 3]; 3])]) -> Vec<u8> {
    let mut buf = vec![0u8; 80];
    buf.extend_from_slice(&(triangles.len() as u32).to_le_bytes());
    for (normal, verts) in triangles {
        for c in normal {
            buf.extend_from_slice(&c.to_le_bytes());
        }
        for vert in verts {
            for c in vert {
                buf.extend_from_slice(&c.to_le_bytes());
            }
        }
        buf.extend_from_slice(&[0, 0]);
    }
    buf
}

/// Serialize the same triangles as ASCII STL.
pub fn make_ascii_stl(triangles: &[([f32; 3], [[f32; 3]; 3])]) -> String {
    let mut text = String::from("solid fixture\n");
    for (normal, verts) in triangles {
        text.push_str(&format!(
            "  facet normal {} {} {}\n    outer loop\n",
            normal[0], normal[1], normal[2]
        ));
        for vert in verts {
            text.push_str(&format!("      vertex {} {} {}\n", vert[0], vert[1], vert[2]));
        }
        text.push_str("    endloop\n  endfacet\n");
    }
    text.push_str("endsolid fixture\n");
    text
}

/// A small two-triangle surface used by the mesh tests.
pub fn sample_triangles() -> Vec<([f32; 3], [[f32; 3]; 3])> {
    vec![
        (
            [0.0, 0.0, 1.0],
            [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
        ),
        (
            [1.0, 0.0, 0.0],
            [[0.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.5]],
        ),
    ]
}
