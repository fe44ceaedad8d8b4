//! Per-frame L2 normalization

use ndarray::Array2;

/// Return a copy of `features` with every frame (row) divided by its own
/// Euclidean norm.
///
/// A frame whose norm is exactly zero divides by zero and yields
/// non-finite values; callers that care must screen their input.
pub fn l2_normalize(features: &Array2<f64>) -> Array2<f64> {
    let mut normalized = features.clone();
    for mut row in normalized.rows_mut() {
        let norm = row.iter().map(|v| v * v).sum::<f64>().sqrt();
        row.mapv_inplace(|v| v / norm);
    }
    normalized
}
