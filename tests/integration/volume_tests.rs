//! Volume decoding integration tests.
//!
//! Tests verify:
//! - NRRD and NIfTI decodes agree on the Volume contract
//! - Gzip-encoded NRRD payloads inflate transparently
//! - NIfTI intensity rescaling end to end
//! - Format routing and magic probes

use voxelview::{
    decode_volume, is_nifti_header, is_nrrd_header, nifti, nrrd, volume_format_from_name,
    DecodeError, FormatError, ScalarType, Volume, VolumeFormat, VoxelData,
};

use super::test_utils::{gzip_bytes, make_nifti, make_nifti_header, make_nrrd};

// =============================================================================
// Cross-format contract
// =============================================================================

#[test]
fn test_same_voxels_through_both_volume_decoders() {
    let payload: Vec<u8> = (0..24).collect();

    let nrrd_buf = make_nrrd(&["type: unsigned char", "sizes: 4 3 2"], &payload);
    let nifti_buf = make_nifti(&[3, 4, 3, 2], 2, &payload);

    let from_nrrd = nrrd::decode(&nrrd_buf).unwrap();
    let from_nifti = nifti::decode(&nifti_buf).unwrap();

    assert_eq!(from_nrrd.sizes(), from_nifti.sizes());
    assert_eq!(from_nrrd.data(), from_nifti.data());
    assert_eq!(from_nrrd.type_name(), from_nifti.type_name());
}

#[test]
fn test_data_length_equals_dimension_product() {
    let cases: Vec<(Vec<u8>, &str)> = vec![
        (
            make_nrrd(&["type: short", "sizes: 3 4 5"], &[0u8; 120]),
            "nrrd",
        ),
        (make_nifti(&[3, 3, 4, 5], 4, &[0u8; 120]), "nifti"),
    ];

    for (buf, kind) in cases {
        let volume = match kind {
            "nrrd" => nrrd::decode(&buf).unwrap(),
            _ => nifti::decode(&buf).unwrap(),
        };
        let product: usize = volume.sizes().iter().product();
        assert_eq!(volume.voxel_count(), product, "{kind}");
        assert_eq!(volume.voxel_count(), 60, "{kind}");
    }
}

// =============================================================================
// Gzip
// =============================================================================

#[test]
fn test_gzip_nrrd_roundtrip() {
    let raw: Vec<u8> = (0..64).map(|i| (i * 3) as u8).collect();
    let buf = make_nrrd(
        &["type: unsigned char", "sizes: 4 4 4", "encoding: gzip"],
        &gzip_bytes(&raw),
    );

    let volume = nrrd::decode(&buf).unwrap();
    assert_eq!(volume.data(), &VoxelData::Uint8(raw));
}

#[test]
fn test_gzip_nrrd_int16_values_survive() {
    let values: Vec<i16> = vec![-300, -1, 0, 1, 255, 1024, -32768, 32767];
    let raw: Vec<u8> = values.iter().flat_map(|v| v.to_le_bytes()).collect();
    let buf = make_nrrd(
        &["type: short", "sizes: 2 2 2", "encoding: gzip"],
        &gzip_bytes(&raw),
    );

    let volume = nrrd::decode(&buf).unwrap();
    assert_eq!(volume.data(), &VoxelData::Int16(values));
}

// =============================================================================
// NIfTI rescaling
// =============================================================================

#[test]
fn test_nifti_rescale_end_to_end() {
    let mut buf = make_nifti_header(&[3, 2, 2, 1], 4, 0.5, -100.0);
    for v in [0i16, 100, 200, 1000] {
        buf.extend_from_slice(&v.to_le_bytes());
    }

    let volume = nifti::decode(&buf).unwrap();
    assert_eq!(
        volume.data(),
        &VoxelData::Float32(vec![-100.0, -50.0, 0.0, 400.0])
    );
    // The label still names the on-disk type
    assert_eq!(volume.type_name(), "short");
    assert_eq!(volume.scalar_type(), ScalarType::Float32);
}

#[test]
fn test_nifti_without_rescale_keeps_integer_type() {
    let payload: Vec<u8> = 42i16
        .to_le_bytes()
        .iter()
        .copied()
        .cycle()
        .take(8)
        .collect();
    let buf = make_nifti(&[3, 2, 2, 1], 4, &payload);

    let volume = nifti::decode(&buf).unwrap();
    assert_eq!(volume.scalar_type(), ScalarType::Int16);
}

// =============================================================================
// Routing and probes
// =============================================================================

#[test]
fn test_decode_volume_routes_by_format() {
    let nrrd_buf = make_nrrd(&["type: uint8", "sizes: 1 1 1"], &[7]);
    let nifti_buf = make_nifti(&[3, 1, 1, 1], 2, &[7]);

    let a = decode_volume(&nrrd_buf, VolumeFormat::Nrrd).unwrap();
    let b = decode_volume(&nifti_buf, VolumeFormat::Nifti).unwrap();
    assert_eq!(a.data(), b.data());
}

#[test]
fn test_extension_routing_matches_decoders() {
    assert_eq!(
        volume_format_from_name("case01_image.nrrd"),
        Some(VolumeFormat::Nrrd)
    );
    assert_eq!(
        volume_format_from_name("case01_label.nii"),
        Some(VolumeFormat::Nifti)
    );
    assert_eq!(
        volume_format_from_name("case01_label.nii.gz"),
        Some(VolumeFormat::Nifti)
    );
    assert_eq!(volume_format_from_name("report.pdf"), None);
}

#[test]
fn test_magic_probes_agree_with_decoders() {
    let nrrd_buf = make_nrrd(&["type: uint8", "sizes: 1 1 1"], &[0]);
    let nifti_buf = make_nifti(&[3, 1, 1, 1], 2, &[0]);

    assert!(is_nrrd_header(&nrrd_buf));
    assert!(!is_nrrd_header(&nifti_buf));
    assert!(is_nifti_header(&nifti_buf));
    assert!(!is_nifti_header(&nrrd_buf));
}

// =============================================================================
// Error surface
// =============================================================================

#[test]
fn test_wrong_decoder_rejects_cleanly() {
    // Feeding an NRRD file to the NIfTI decoder must fail with a structural
    // error, never mis-decode.
    let nrrd_buf = make_nrrd(&["type: uint8", "sizes: 1 1 1"], &[0u8; 400]);
    let result = nifti::decode(&nrrd_buf);
    assert!(matches!(
        result,
        Err(DecodeError::Format(FormatError::InvalidMagic(_)))
    ));
}

#[test]
fn test_volume_is_immutable_value_type() {
    // A decoded volume can be cloned and the clone compared; decoders hand
    // out owned structures with no shared mutable state.
    let buf = make_nrrd(&["type: uint8", "sizes: 1 1 2"], &[1, 2]);
    let volume: Volume = nrrd::decode(&buf).unwrap();
    let copy = volume.clone();
    assert_eq!(volume.data(), copy.data());
    assert_eq!(volume.sizes(), copy.sizes());
}
