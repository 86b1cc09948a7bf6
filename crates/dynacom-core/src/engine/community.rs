//! Dynamic community detection on a correlation-derived distance matrix.
//!
//! Two modes are supported. A sweep tries every community count from 2 up to
//! [`MAX_SWEEP_COMMUNITIES`] and keeps the partition with the best Calinski–Harabasz
//! score. A fixed count cuts the tree once and is not scored.
//!
//! The two modes intentionally see different inputs: the sweep clusters
//! `sqrt(2·D)`, the fixed cut clusters `D` itself. In both modes the observations are
//! the rows of the upper triangle of that matrix.

use super::error::EngineError;
use super::linkage::WardTree;
use super::scoring::calinski_harabasz;
use nalgebra::DMatrix;
use rayon::prelude::*;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use tracing::{debug, info};

pub const MIN_COMMUNITIES: usize = 2;
pub const MAX_SWEEP_COMMUNITIES: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommunityMode {
    /// Sweep community counts and keep the best-scoring partition.
    Sweep,
    /// Cut the tree into exactly this many communities.
    Fixed(usize),
}

impl From<Option<usize>> for CommunityMode {
    fn from(n_communities: Option<usize>) -> Self {
        n_communities.map_or(Self::Sweep, Self::Fixed)
    }
}

/// Outcome of community detection.
///
/// Labels are 1-based and aligned with the rows of the input distance matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct Communities {
    /// The selected partition.
    pub best: Vec<usize>,
    /// Every partition that was computed, keyed by requested community count.
    pub labelings: BTreeMap<usize, Vec<usize>>,
    /// Calinski–Harabasz score per community count; empty for a fixed cut.
    pub scores: BTreeMap<usize, f64>,
    /// Scores ordered from best to worst. Equal scores list the larger count first.
    pub ranked: Vec<(usize, f64)>,
}

fn rank_scores(scores: &BTreeMap<usize, f64>) -> Vec<(usize, f64)> {
    let mut ranked: Vec<(usize, f64)> = scores.iter().map(|(&k, &s)| (k, s)).collect();
    ranked.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(Ordering::Equal));
    ranked.reverse();
    ranked
}

impl Communities {
    /// Number of distinct communities in the selected partition.
    pub fn community_count(&self) -> usize {
        let mut labels = self.best.clone();
        labels.sort_unstable();
        labels.dedup();
        labels.len()
    }
}

fn validate_square(distance: &DMatrix<f64>) -> Result<usize, EngineError> {
    let (rows, cols) = distance.shape();
    if rows != cols {
        return Err(EngineError::Dimension {
            expected: rows.max(cols),
            rows,
            cols,
        });
    }
    if rows == 0 {
        return Err(EngineError::EmptyModel);
    }
    Ok(rows)
}

/// Splits the nodes behind `distance` (`1 - C`) into communities.
///
/// # Errors
///
/// Returns [`EngineError::Dimension`] for a non-square matrix,
/// [`EngineError::Validation`] when a fixed count lies outside `2..=N` or a sweep has
/// fewer than three nodes, and [`EngineError::NoScorableCount`] when no count in the
/// sweep yields a scorable partition.
pub fn detect_communities(
    distance: &DMatrix<f64>,
    mode: CommunityMode,
) -> Result<Communities, EngineError> {
    let n = validate_square(distance)?;
    match mode {
        CommunityMode::Fixed(k) => fixed_cut(distance, k, n),
        CommunityMode::Sweep => sweep(distance, n),
    }
}

fn fixed_cut(distance: &DMatrix<f64>, k: usize, n: usize) -> Result<Communities, EngineError> {
    if !(MIN_COMMUNITIES..=n).contains(&k) {
        return Err(EngineError::Validation(format!(
            "community count must be between {MIN_COMMUNITIES} and the number of residues ({n}), got {k}"
        )));
    }

    let tree = WardTree::from_observations(&distance.upper_triangle())?;
    let labels = tree.cut(k);
    info!(requested = k, "Cut community tree at a fixed count");

    Ok(Communities {
        best: labels.clone(),
        labelings: BTreeMap::from([(k, labels)]),
        scores: BTreeMap::new(),
        ranked: Vec::new(),
    })
}

fn sweep(distance: &DMatrix<f64>, n: usize) -> Result<Communities, EngineError> {
    if n < 3 {
        return Err(EngineError::Validation(format!(
            "sweeping community counts needs at least 3 residues, got {n}"
        )));
    }

    // Round-off can push 1 - C slightly below zero.
    let transformed = distance.map(|d| (2.0 * d).max(0.0).sqrt());
    let tree = WardTree::from_observations(&transformed.upper_triangle())?;
    let max_k = MAX_SWEEP_COMMUNITIES.min(n - 1);

    let results: Vec<(usize, Vec<usize>, Option<f64>)> = (MIN_COMMUNITIES..=max_k)
        .into_par_iter()
        .map(|k| {
            let labels = tree.cut(k);
            let score = calinski_harabasz(&transformed, &labels);
            (k, labels, score)
        })
        .collect();

    let mut labelings = BTreeMap::new();
    let mut scores = BTreeMap::new();
    let mut best: Option<(usize, f64)> = None;
    for (k, labels, score) in results {
        match score {
            Some(score) => {
                if score > best.map_or(0.0, |(_, s)| s) {
                    best = Some((k, score));
                }
                scores.insert(k, score);
            }
            None => debug!(k, "Partition has too few or too many distinct communities to score"),
        }
        labelings.insert(k, labels);
    }

    if scores.is_empty() {
        return Err(EngineError::NoScorableCount);
    }

    let best_k = best.map_or(MIN_COMMUNITIES, |(k, _)| k);
    let best = labelings
        .get(&best_k)
        .cloned()
        .ok_or(EngineError::NoScorableCount)?;
    info!(
        best_k,
        tried = labelings.len(),
        "Selected community count with the highest Calinski-Harabasz score"
    );

    Ok(Communities {
        best,
        labelings,
        ranked: rank_scores(&scores),
        scores,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Deterministic noise in `[0, 1)`, symmetric in its arguments.
    fn jitter(i: usize, j: usize) -> f64 {
        let (a, b) = (i.min(j) as u64, i.max(j) as u64);
        let mut h = a.wrapping_mul(0x9E37_79B9_7F4A_7C15) ^ b.wrapping_mul(0xC2B2_AE3D_27D4_EB4F);
        h ^= h >> 29;
        h = h.wrapping_mul(0xBF58_476D_1CE4_E5B9);
        h ^= h >> 32;
        (h % 10_000) as f64 / 10_000.0
    }

    /// 1 - C for two groups of 25 residues that barely correlate with each other.
    fn two_group_distances() -> DMatrix<f64> {
        DMatrix::from_fn(50, 50, |i, j| {
            if i == j {
                0.0
            } else if (i < 25) == (j < 25) {
                0.01 + 0.04 * jitter(i, j)
            } else {
                0.95 + 0.05 * jitter(i, j)
            }
        })
    }

    #[test]
    fn sweep_finds_two_well_separated_groups() {
        let communities = detect_communities(&two_group_distances(), CommunityMode::Sweep).unwrap();

        assert_eq!(communities.community_count(), 2);
        assert_eq!(communities.best, communities.labelings[&2]);
        let first = communities.best[0];
        let second = communities.best[25];
        assert_ne!(first, second);
        assert!(communities.best[..25].iter().all(|&l| l == first));
        assert!(communities.best[25..].iter().all(|&l| l == second));

        assert_eq!(communities.ranked[0].0, 2);
        assert_eq!(communities.ranked.len(), communities.scores.len());
        assert_eq!(communities.labelings.len(), MAX_SWEEP_COMMUNITIES - 1);
        assert_eq!(*communities.labelings.keys().next().unwrap(), 2);
        assert_eq!(*communities.labelings.keys().last().unwrap(), 20);
    }

    #[test]
    fn sweep_upper_bound_shrinks_for_small_inputs() {
        let distance = DMatrix::from_fn(5, 5, |i, j| (i as f64 - j as f64).abs() * 0.1);
        let communities = detect_communities(&distance, CommunityMode::Sweep).unwrap();
        let keys: Vec<_> = communities.labelings.keys().copied().collect();
        assert_eq!(keys, vec![2, 3, 4]);
    }

    #[test]
    fn fixed_count_produces_single_unscored_labelling() {
        let communities = detect_communities(&two_group_distances(), CommunityMode::Fixed(2)).unwrap();
        assert!(communities.scores.is_empty());
        assert_eq!(communities.labelings.len(), 1);
        assert_eq!(communities.community_count(), 2);
        assert_ne!(communities.best[0], communities.best[49]);
    }

    #[test]
    fn fixed_count_outside_range_is_rejected() {
        let distance = two_group_distances();
        for k in [0, 1, 51] {
            assert!(matches!(
                detect_communities(&distance, CommunityMode::Fixed(k)),
                Err(EngineError::Validation(_))
            ));
        }
        assert!(detect_communities(&distance, CommunityMode::Fixed(50)).is_ok());
    }

    #[test]
    fn non_square_matrix_is_rejected() {
        let distance = DMatrix::<f64>::zeros(3, 4);
        assert!(matches!(
            detect_communities(&distance, CommunityMode::Sweep),
            Err(EngineError::Dimension { rows: 3, cols: 4, .. })
        ));
    }

    #[test]
    fn sweep_needs_three_nodes() {
        let distance = DMatrix::<f64>::zeros(2, 2);
        assert!(matches!(
            detect_communities(&distance, CommunityMode::Sweep),
            Err(EngineError::Validation(_))
        ));
    }

    #[test]
    fn ranked_scores_sort_descending_with_later_counts_first_on_ties() {
        let scores = BTreeMap::from([(2, 5.0), (3, 9.0), (4, 5.0)]);
        assert_eq!(rank_scores(&scores), vec![(3, 9.0), (4, 5.0), (2, 5.0)]);
    }

    #[test]
    fn mode_from_optional_count() {
        assert_eq!(CommunityMode::from(None), CommunityMode::Sweep);
        assert_eq!(CommunityMode::from(Some(4)), CommunityMode::Fixed(4));
    }
}
