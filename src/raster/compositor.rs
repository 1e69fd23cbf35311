//! Slice extraction and label compositing.
//!
//! One slice of a co-registered (image, label) volume pair becomes two RGBA
//! buffers: a grayscale image layer normalized to the slice's own intensity
//! range, and a label layer mapping categories to palette colors with a
//! caller-chosen overlay opacity. The two layers stay separate; blending
//! them is the rendering surface's job, which lets the viewer change overlay
//! opacity without re-extracting the slice.
//!
//! # Design Decisions
//!
//! - **Per-slice normalization**: the grayscale window is computed from the
//!   slice being shown, not the whole volume, so thin low-contrast slices
//!   stay visible.
//!
//! - **Rank-based colors**: a category's color comes from its rank in the
//!   volume's own [`CategoryTable`], not from its literal value. Introducing
//!   a new category anywhere in a volume shifts the colors after it; viewers
//!   depend on this assignment and it is preserved as-is.

use image::RgbaImage;

use crate::error::DimensionMismatchError;
use crate::volume::categories::CategoryTable;
use crate::volume::Volume;

/// Default category palette (RGB).
///
/// Category counts beyond the palette wrap by modulo, reusing colors.
pub const CATEGORY_COLORS: [[u8; 3]; 8] = [
    [255, 0, 0],   // Red
    [0, 255, 0],   // Green
    [0, 0, 255],   // Blue
    [255, 255, 0], // Yellow
    [255, 0, 255], // Magenta
    [0, 255, 255], // Cyan
    [255, 128, 0], // Orange
    [128, 0, 255], // Purple
];

// =============================================================================
// SliceRaster
// =============================================================================

/// One rendered slice layer: RGBA8, row-major, origin top-left.
#[derive(Debug, Clone, PartialEq)]
pub struct SliceRaster {
    width: usize,
    height: usize,
    pixels: Vec<u8>,
}

impl SliceRaster {
    fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![0u8; width * height * 4],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Raw RGBA bytes, `width * height * 4` of them.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// RGBA components of the pixel at (x, y).
    ///
    /// # Panics
    /// Panics if the coordinates are out of range.
    pub fn pixel(&self, x: usize, y: usize) -> [u8; 4] {
        let idx = (y * self.width + x) * 4;
        [
            self.pixels[idx],
            self.pixels[idx + 1],
            self.pixels[idx + 2],
            self.pixels[idx + 3],
        ]
    }

    /// Convert into an [`image::RgbaImage`] for downstream consumers.
    pub fn into_image(self) -> Option<RgbaImage> {
        RgbaImage::from_raw(self.width as u32, self.height as u32, self.pixels)
    }
}

/// The two layers rendered from one slice.
#[derive(Debug, Clone, PartialEq)]
pub struct SliceRasterPair {
    /// Grayscale intensity layer, fully opaque.
    pub image: SliceRaster,
    /// Category overlay, transparent where unlabeled.
    pub label: SliceRaster,
}

// =============================================================================
// Dimension validation
// =============================================================================

/// Require two co-registered volumes to agree on their dimensions.
///
/// Call this before compositing; the compositor itself assumes the check has
/// passed and never produces a partial raster for mismatched inputs.
pub fn ensure_same_dimensions(
    image: &Volume,
    label: &Volume,
) -> Result<(), DimensionMismatchError> {
    if image.sizes() == label.sizes() {
        Ok(())
    } else {
        Err(DimensionMismatchError {
            image: image.sizes().to_vec(),
            label: label.sizes().to_vec(),
        })
    }
}

// =============================================================================
// SliceCompositor
// =============================================================================

/// Renders slices of an (image, label) volume pair into RGBA layer pairs.
///
/// The palette is explicit compositor state so two viewers can run different
/// color schemes side by side.
#[derive(Debug, Clone)]
pub struct SliceCompositor {
    palette: Vec<[u8; 3]>,
}

impl SliceCompositor {
    /// Compositor with the default 8-color palette.
    pub fn new() -> Self {
        Self {
            palette: CATEGORY_COLORS.to_vec(),
        }
    }

    /// Compositor with a custom palette.
    ///
    /// # Panics
    /// Panics if the palette is empty.
    pub fn with_palette(palette: Vec<[u8; 3]>) -> Self {
        assert!(!palette.is_empty(), "palette must not be empty");
        Self { palette }
    }

    pub fn palette(&self) -> &[[u8; 3]] {
        &self.palette
    }

    /// Render slice `slice_index` of a volume pair.
    ///
    /// `opacity` is the label overlay opacity and is clamped to `[0, 1]`.
    /// Callers must have validated the pair with [`ensure_same_dimensions`]
    /// first and keep `slice_index` within `0..image.depth()` (the viewer's
    /// slice slider clamps for them).
    ///
    /// # Panics
    /// Panics if `slice_index` is out of range.
    pub fn composite(
        &self,
        image: &Volume,
        label: &Volume,
        categories: &CategoryTable,
        slice_index: usize,
        opacity: f32,
    ) -> SliceRasterPair {
        debug_assert_eq!(image.sizes(), label.sizes());

        let width = image.width();
        let height = image.height();
        let slice_size = width * height;
        let offset = slice_index * slice_size;
        assert!(
            offset + slice_size <= image.voxel_count(),
            "slice index {slice_index} out of range"
        );

        SliceRasterPair {
            image: self.render_image_layer(image, offset, width, height),
            label: self.render_label_layer(label, categories, offset, width, height, opacity),
        }
    }

    /// Grayscale layer: slice intensities normalized to the slice's own
    /// min/max, alpha 255.
    fn render_image_layer(
        &self,
        image: &Volume,
        offset: usize,
        width: usize,
        height: usize,
    ) -> SliceRaster {
        let data = image.data();
        let slice_size = width * height;

        // Seed from the first element so a uniform slice reports range 0
        // instead of leaving the bounds at +/-infinity.
        let mut min_val = data.get(offset);
        let mut max_val = min_val;
        for i in 0..slice_size {
            let value = data.get(offset + i);
            if value < min_val {
                min_val = value;
            }
            if value > max_val {
                max_val = value;
            }
        }
        let range = max_val - min_val;

        let mut raster = SliceRaster::new(width, height);
        for i in 0..slice_size {
            let raw = data.get(offset + i);
            let normalized = if range > 0.0 {
                ((raw - min_val) / range * 255.0).floor() as u8
            } else {
                0
            };
            let idx = i * 4;
            raster.pixels[idx] = normalized;
            raster.pixels[idx + 1] = normalized;
            raster.pixels[idx + 2] = normalized;
            raster.pixels[idx + 3] = 255;
        }
        raster
    }

    /// Label layer: category colors by table rank, background transparent.
    fn render_label_layer(
        &self,
        label: &Volume,
        categories: &CategoryTable,
        offset: usize,
        width: usize,
        height: usize,
        opacity: f32,
    ) -> SliceRaster {
        let data = label.data();
        let slice_size = width * height;
        let alpha = (opacity.clamp(0.0, 1.0) * 255.0).floor() as u8;

        let mut raster = SliceRaster::new(width, height);
        for i in 0..slice_size {
            let value = data.get(offset + i);
            let idx = i * 4;
            if value > 0.0 {
                let color = self.palette[categories.color_index(value, self.palette.len())];
                raster.pixels[idx] = color[0];
                raster.pixels[idx + 1] = color[1];
                raster.pixels[idx + 2] = color[2];
                raster.pixels[idx + 3] = alpha;
            }
            // Background stays (0, 0, 0, 0)
        }
        raster
    }
}

impl Default for SliceCompositor {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Tests
// =============================================================================
