//! Full viewer-pipeline integration tests.
//!
//! Exercises the flow a viewer runs on every load: decode both files,
//! validate their dimensions, detect label categories, then composite
//! slices as the user scrubs through the volume.

use voxelview::{
    ensure_same_dimensions, nifti, nrrd, CategoryTable, SliceCompositor, CATEGORY_COLORS,
};

use super::test_utils::{gzip_bytes, make_nifti, make_nrrd};

/// 4x4x2 intensity image with a bright square in slice 1.
fn image_bytes() -> Vec<u8> {
    let mut voxels = vec![0u8; 32];
    // Slice 1: ramp plus a bright spot
    for (i, v) in voxels[16..].iter_mut().enumerate() {
        *v = (i * 10) as u8;
    }
    make_nrrd(
        &["type: unsigned char", "sizes: 4 4 2", "encoding: gzip"],
        &gzip_bytes(&voxels),
    )
}

/// Co-registered label map with categories {0, 3, 7} in slice 1.
fn label_bytes() -> Vec<u8> {
    let mut voxels = vec![0u8; 32];
    voxels[16] = 3;
    voxels[17] = 7;
    voxels[18] = 3;
    make_nifti(&[3, 4, 4, 2], 2, &voxels)
}

#[test]
fn test_decode_validate_detect_composite() {
    // Image and label arrive through different formats, as in real sessions
    let image = nrrd::decode(&image_bytes()).unwrap();
    let label = nifti::decode(&label_bytes()).unwrap();

    ensure_same_dimensions(&image, &label).unwrap();

    let categories = CategoryTable::detect(&label);
    assert_eq!(categories.values(), &[0.0, 3.0, 7.0]);

    let compositor = SliceCompositor::new();
    let pair = compositor.composite(&image, &label, &categories, 1, 0.5);

    // Value 3 is the first non-background category, value 7 the second
    assert_eq!(pair.label.pixel(0, 0)[..3], CATEGORY_COLORS[0]);
    assert_eq!(pair.label.pixel(1, 0)[..3], CATEGORY_COLORS[1]);
    assert_eq!(pair.label.pixel(2, 0)[..3], CATEGORY_COLORS[0]);
    assert_eq!(pair.label.pixel(0, 0)[3], 127);
    // Unlabeled voxels stay transparent
    assert_eq!(pair.label.pixel(3, 3), [0, 0, 0, 0]);

    // The intensity ramp normalizes to the slice's own range
    assert_eq!(pair.image.pixel(0, 0), [0, 0, 0, 255]);
    assert_eq!(pair.image.pixel(3, 3), [255, 255, 255, 255]);
}

#[test]
fn test_uniform_slice_in_scrub_sequence() {
    // Slice 0 of the image fixture is uniform zero: range 0, all black
    let image = nrrd::decode(&image_bytes()).unwrap();
    let label = nifti::decode(&label_bytes()).unwrap();
    let categories = CategoryTable::detect(&label);

    let pair = SliceCompositor::new().composite(&image, &label, &categories, 0, 0.5);
    for y in 0..4 {
        for x in 0..4 {
            assert_eq!(pair.image.pixel(x, y), [0, 0, 0, 255]);
            assert_eq!(pair.label.pixel(x, y), [0, 0, 0, 0]);
        }
    }
}

#[test]
fn test_dimension_mismatch_rejected_before_compositing() {
    let image = nrrd::decode(&image_bytes()).unwrap();
    let other = nrrd::decode(&make_nrrd(
        &["type: unsigned char", "sizes: 4 4 3"],
        &[0u8; 48],
    ))
    .unwrap();

    let err = ensure_same_dimensions(&image, &other).unwrap_err();
    assert_eq!(err.image, vec![4, 4, 2]);
    assert_eq!(err.label, vec![4, 4, 3]);
    // The load handler stops here; no raster is ever produced for this pair.
}

#[test]
fn test_opacity_change_rerenders_label_layer_only() {
    let image = nrrd::decode(&image_bytes()).unwrap();
    let label = nifti::decode(&label_bytes()).unwrap();
    let categories = CategoryTable::detect(&label);
    let compositor = SliceCompositor::new();

    let half = compositor.composite(&image, &label, &categories, 1, 0.5);
    let full = compositor.composite(&image, &label, &categories, 1, 1.0);

    assert_eq!(half.image, full.image);
    assert_eq!(half.label.pixel(0, 0)[3], 127);
    assert_eq!(full.label.pixel(0, 0)[3], 255);
    // Colors are unaffected by opacity
    assert_eq!(half.label.pixel(0, 0)[..3], full.label.pixel(0, 0)[..3]);
}

#[test]
fn test_category_colors_shift_when_new_category_appears() {
    // Color assignment is positional: introducing a new category below an
    // existing one shifts the existing one's color. This is load-bearing
    // viewer behavior, verified here so a refactor cannot quietly change it.
    let image = nrrd::decode(&image_bytes()).unwrap();

    let mut voxels = vec![0u8; 32];
    voxels[16] = 7;
    let label_a = nifti::decode(&make_nifti(&[3, 4, 4, 2], 2, &voxels)).unwrap();

    voxels[17] = 3;
    let label_b = nifti::decode(&make_nifti(&[3, 4, 4, 2], 2, &voxels)).unwrap();

    let compositor = SliceCompositor::new();

    let table_a = CategoryTable::detect(&label_a);
    let pair_a = compositor.composite(&image, &label_a, &table_a, 1, 1.0);
    // Alone, 7 is the first non-background category: slot 0
    assert_eq!(pair_a.label.pixel(0, 0)[..3], CATEGORY_COLORS[0]);

    let table_b = CategoryTable::detect(&label_b);
    let pair_b = compositor.composite(&image, &label_b, &table_b, 1, 1.0);
    // With 3 present, 7 moves to slot 1
    assert_eq!(pair_b.label.pixel(0, 0)[..3], CATEGORY_COLORS[1]);
}

#[test]
fn test_raster_pair_converts_for_rendering_surface() {
    let image = nrrd::decode(&image_bytes()).unwrap();
    let label = nifti::decode(&label_bytes()).unwrap();
    let categories = CategoryTable::detect(&label);

    let pair = SliceCompositor::new().composite(&image, &label, &categories, 1, 0.5);
    let image_layer = pair.image.into_image().unwrap();
    let label_layer = pair.label.into_image().unwrap();
    assert_eq!(image_layer.dimensions(), (4, 4));
    assert_eq!(label_layer.dimensions(), (4, 4));
}
