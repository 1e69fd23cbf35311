//! Label category detection and color-rank lookup.
//!
//! A label volume stores category identifiers (integers, possibly in a
//! float-backed buffer). Before compositing, the whole volume is scanned once
//! to build a [`CategoryTable`]: the sorted, deduplicated set of values that
//! actually occur. Color assignment is positional (a category's color
//! depends on its rank within this table, not on its literal value), so the
//! scan must see every element; sampling would shift every color after a
//! missed rare category.

use ordered_float::OrderedFloat;
use rayon::prelude::*;
use std::collections::BTreeSet;

use crate::volume::{Volume, VoxelData};

/// Elements per scan chunk.
const SCAN_CHUNK_SIZE: usize = 100_000;

// =============================================================================
// CategoryTable
// =============================================================================

/// Sorted, deduplicated list of distinct values in a label volume.
///
/// Background (`0`) appears in the table like any other value but is mapped
/// to full transparency by the compositor, not to a color.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryTable {
    values: Vec<f64>,
}

impl CategoryTable {
    /// Scan a label volume and collect its distinct values, ascending.
    ///
    /// Every element is visited exactly once. The scan runs chunk-parallel;
    /// per-chunk sets are merged, so the result is deterministic regardless
    /// of thread scheduling.
    pub fn detect(label: &Volume) -> Self {
        let unique = match label.data() {
            VoxelData::Uint8(v) => collect_unique(v, |x| x as f64),
            VoxelData::Int8(v) => collect_unique(v, |x| x as f64),
            VoxelData::Int16(v) => collect_unique(v, |x| x as f64),
            VoxelData::Uint16(v) => collect_unique(v, |x| x as f64),
            VoxelData::Int32(v) => collect_unique(v, |x| x as f64),
            VoxelData::Uint32(v) => collect_unique(v, |x| x as f64),
            VoxelData::Float32(v) => collect_unique(v, |x| x as f64),
            VoxelData::Float64(v) => collect_unique(v, |x| x),
        };

        let values: Vec<f64> = unique.into_iter().map(|v| v.into_inner()).collect();
        tracing::debug!(categories = ?values, "label categories detected");
        Self { values }
    }

    /// Build a table from already-known values (sorted and deduplicated here).
    pub fn from_values(mut values: Vec<f64>) -> Self {
        values.sort_by(f64::total_cmp);
        values.dedup();
        Self { values }
    }

    /// The distinct values, ascending.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Number of distinct values, background included.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Rank of `value` within the sorted table, if present.
    pub fn rank(&self, value: f64) -> Option<usize> {
        self.values
            .binary_search_by(|probe| probe.total_cmp(&value))
            .ok()
    }

    /// Palette slot for a label value.
    ///
    /// `max(0, rank - 1) mod palette_len`: rank 0 is background, so the first
    /// non-background category lands on slot 0 and categories beyond the
    /// palette wrap. A value missing from the table also lands on slot 0,
    /// matching the linear-search-miss arithmetic of the original viewer.
    pub fn color_index(&self, value: f64, palette_len: usize) -> usize {
        let rank = self.rank(value).map(|r| r as isize).unwrap_or(-1);
        (rank - 1).max(0) as usize % palette_len
    }
}

/// Chunk-parallel unique-value scan over a typed slice.
fn collect_unique<T: Copy + Send + Sync>(
    data: &[T],
    to_f64: impl Fn(T) -> f64 + Send + Sync,
) -> BTreeSet<OrderedFloat<f64>> {
    data.par_chunks(SCAN_CHUNK_SIZE)
        .map(|chunk| {
            chunk
                .iter()
                .map(|&v| OrderedFloat(to_f64(v)))
                .collect::<BTreeSet<_>>()
        })
        .reduce(BTreeSet::new, |mut acc, set| {
            acc.extend(set);
            acc
        })
}

// =============================================================================
// Tests
// =============================================================================
