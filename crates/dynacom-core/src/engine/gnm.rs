//! Gaussian Network Model of residue fluctuations.
//!
//! Residues are nodes joined by identical springs whenever their alpha-carbons lie within
//! a cutoff distance. The Kirchhoff (connectivity) matrix Γ of that network is
//!
//! ```text
//! Γᵢⱼ = -γ          if i ≠ j and |rᵢ - rⱼ|² ≤ cutoff²
//! Γᵢᵢ = -Σⱼ≠ᵢ Γᵢⱼ
//! ```
//!
//! Its pseudo-inverse, built from every mode except the zero mode, gives the residue
//! covariance up to a constant factor. Normalising it yields the cross-correlation matrix.
//!
//! The analysis is expressed as a chain of values, each produced from the previous one:
//! [`KirchhoffMatrix::build`] → [`KirchhoffMatrix::decompose`] → [`GnmModes::cross_correlation`].
//!
//! The network is assumed to be connected. A disconnected network has several zero
//! modes, and the ones after the first are inverted like any other mode.

use super::error::EngineError;
use nalgebra::{DMatrix, DVector, Point3, SymmetricEigen};
use std::cmp::Ordering;

/// Uniform spring constant of the network.
pub const SPRING_CONSTANT: f64 = 1.0;

/// The contact network of a set of alpha-carbons.
#[derive(Debug, Clone)]
pub struct KirchhoffMatrix {
    matrix: DMatrix<f64>,
    cutoff: f64,
}

impl KirchhoffMatrix {
    /// Builds the Kirchhoff matrix for `coords` with a contact `cutoff` in Angstroms.
    ///
    /// Pairs at exactly the cutoff distance are in contact.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Validation`] if the cutoff is not a finite positive number,
    /// and [`EngineError::EmptyModel`] if there are no coordinates.
    pub fn build(coords: &[Point3<f64>], cutoff: f64) -> Result<Self, EngineError> {
        if !cutoff.is_finite() || cutoff <= 0.0 {
            return Err(EngineError::Validation(format!(
                "cutoff must be a positive distance, got {cutoff}"
            )));
        }
        if coords.is_empty() {
            return Err(EngineError::EmptyModel);
        }

        let n = coords.len();
        let cutoff_sq = cutoff * cutoff;
        let mut matrix = DMatrix::zeros(n, n);

        for i in 0..n {
            for j in (i + 1)..n {
                if (coords[j] - coords[i]).norm_squared() <= cutoff_sq {
                    matrix[(i, j)] = -SPRING_CONSTANT;
                    matrix[(j, i)] = -SPRING_CONSTANT;
                    matrix[(i, i)] += SPRING_CONSTANT;
                    matrix[(j, j)] += SPRING_CONSTANT;
                }
            }
        }

        Ok(Self { matrix, cutoff })
    }

    pub fn matrix(&self) -> &DMatrix<f64> {
        &self.matrix
    }

    pub fn cutoff(&self) -> f64 {
        self.cutoff
    }

    pub fn size(&self) -> usize {
        self.matrix.nrows()
    }

    /// Number of contacts of node `i` (its coordination number).
    pub fn contacts(&self, i: usize) -> usize {
        (self.matrix[(i, i)] / SPRING_CONSTANT).round() as usize
    }

    /// Full symmetric eigendecomposition, with modes sorted by ascending eigenvalue.
    pub fn decompose(self) -> GnmModes {
        let eigen = SymmetricEigen::new(self.matrix.clone());

        // nalgebra does not order eigenpairs
        let mut order: Vec<usize> = (0..eigen.eigenvalues.len()).collect();
        order.sort_by(|&a, &b| {
            eigen.eigenvalues[a]
                .partial_cmp(&eigen.eigenvalues[b])
                .unwrap_or(Ordering::Equal)
        });

        let eigenvalues = DVector::from_iterator(order.len(), order.iter().map(|&k| eigen.eigenvalues[k]));
        let columns: Vec<DVector<f64>> = order
            .iter()
            .map(|&k| eigen.eigenvectors.column(k).into_owned())
            .collect();
        let eigenvectors = DMatrix::from_columns(&columns);

        GnmModes {
            kirchhoff: self,
            eigenvalues,
            eigenvectors,
        }
    }
}

/// Normal modes of the network.
#[derive(Debug, Clone)]
pub struct GnmModes {
    kirchhoff: KirchhoffMatrix,
    eigenvalues: DVector<f64>,
    eigenvectors: DMatrix<f64>,
}

impl GnmModes {
    pub fn kirchhoff(&self) -> &KirchhoffMatrix {
        &self.kirchhoff
    }

    /// Eigenvalues in ascending order.
    pub fn eigenvalues(&self) -> &DVector<f64> {
        &self.eigenvalues
    }

    /// Eigenvectors as columns, in the same order as [`eigenvalues`](Self::eigenvalues).
    pub fn eigenvectors(&self) -> &DMatrix<f64> {
        &self.eigenvectors
    }

    /// `Σ_{k≥1} v_k v_kᵀ / λ_k`, the Kirchhoff pseudo-inverse without the zero mode.
    pub fn pseudo_inverse(&self) -> DMatrix<f64> {
        let n = self.eigenvalues.len();
        let mut inverse = DMatrix::zeros(n, n);
        for k in 1..n {
            let mode = self.eigenvectors.column(k);
            inverse.ger(1.0 / self.eigenvalues[k], &mode, &mode, 1.0);
        }
        inverse
    }

    /// Relative mean-square fluctuation of each node, the pseudo-inverse diagonal.
    pub fn fluctuations(&self) -> Vec<f64> {
        self.pseudo_inverse().diagonal().iter().copied().collect()
    }

    /// Normalised covariance between every pair of nodes.
    pub fn cross_correlation(self) -> CrossCorrelation {
        let pseudo_inverse = self.pseudo_inverse();
        let n = pseudo_inverse.nrows();
        let correlation = DMatrix::from_fn(n, n, |i, j| {
            pseudo_inverse[(i, j)] / (pseudo_inverse[(i, i)] * pseudo_inverse[(j, j)]).sqrt()
        });

        CrossCorrelation {
            modes: self,
            pseudo_inverse,
            correlation,
        }
    }
}

/// Final state of the analysis: modes, pseudo-inverse and cross-correlations.
#[derive(Debug, Clone)]
pub struct CrossCorrelation {
    modes: GnmModes,
    pseudo_inverse: DMatrix<f64>,
    correlation: DMatrix<f64>,
}

impl CrossCorrelation {
    pub fn modes(&self) -> &GnmModes {
        &self.modes
    }

    pub fn pseudo_inverse(&self) -> &DMatrix<f64> {
        &self.pseudo_inverse
    }

    /// Correlation matrix with entries in `[-1, 1]` and a unit diagonal.
    pub fn matrix(&self) -> &DMatrix<f64> {
        &self.correlation
    }

    /// `1 - C`, the dissimilarity used for community detection.
    pub fn distance_matrix(&self) -> DMatrix<f64> {
        self.correlation.map(|c| 1.0 - c)
    }
}
