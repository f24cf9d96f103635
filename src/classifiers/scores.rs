//! Score decoding shared by the classifier backends

use crate::models::{Label, GLYPH_SIZE};

/// Index of the largest value; ties go to the lowest index
pub(crate) fn argmax(values: impl Iterator<Item = f32>) -> usize {
    let mut best = 0;
    let mut best_value = f32::NEG_INFINITY;
    for (i, v) in values.enumerate() {
        if v > best_value {
            best = i;
            best_value = v;
        }
    }
    best
}

/// Decode a row-major `[batch, classes]` score buffer into one label per row
#[cfg_attr(not(feature = "network"), allow(dead_code))]
pub(crate) fn best_labels(scores: &[f32], labels: &[Label]) -> Vec<Label> {
    if labels.is_empty() {
        return Vec::new();
    }
    scores
        .chunks(labels.len())
        .map(|row| labels[argmax(row.iter().copied())])
        .collect()
}

/// Image tensor shape for a glyph batch
#[cfg_attr(not(feature = "network"), allow(dead_code))]
pub(crate) fn glyph_batch_shape(batch: usize, channels_last: bool) -> [usize; 4] {
    let side = GLYPH_SIZE as usize;
    if channels_last {
        [batch, side, side, 1]
    } else {
        [batch, 1, side, side]
    }
}
