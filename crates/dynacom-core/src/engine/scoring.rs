use nalgebra::{DMatrix, RowDVector};
use std::collections::BTreeMap;

/// Calinski–Harabasz variance ratio of a labelling of the rows of `features`.
///
/// `(B / (k - 1)) / (W / (n - k))`, with `B` the between-cluster and `W` the
/// within-cluster dispersion, `k` distinct labels and `n` rows. A partition with no
/// within-cluster dispersion scores `1.0`.
///
/// # Return
///
/// Returns `None` unless `2 <= k <= n - 1` and `labels` has one entry per row.
pub fn calinski_harabasz(features: &DMatrix<f64>, labels: &[usize]) -> Option<f64> {
    let n = features.nrows();
    if labels.len() != n {
        return None;
    }

    let mut clusters: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
    for (row, &label) in labels.iter().enumerate() {
        clusters.entry(label).or_default().push(row);
    }
    let k = clusters.len();
    if k < 2 || k >= n {
        return None;
    }

    let centroid = |rows: &[usize]| -> RowDVector<f64> {
        let mut sum = RowDVector::zeros(features.ncols());
        for &r in rows {
            sum += features.row(r);
        }
        sum / rows.len() as f64
    };

    let all: Vec<usize> = (0..n).collect();
    let mean = centroid(&all);

    let (mut between, mut within) = (0.0, 0.0);
    for rows in clusters.values() {
        let cluster_mean = centroid(rows);
        between += rows.len() as f64 * (&cluster_mean - &mean).norm_squared();
        within += rows
            .iter()
            .map(|&r| (features.row(r) - &cluster_mean).norm_squared())
            .sum::<f64>();
    }

    if within == 0.0 {
        return Some(1.0);
    }
    Some(between * (n - k) as f64 / (within * (k - 1) as f64))
}
