//! # Engine Module
//!
//! The numerical core of dynamic community analysis: the Gaussian network model, the
//! Ward hierarchy built over correlation distances, and the scoring used to pick a
//! community count.
//!
//! ## Architecture
//!
//! - **Network model** ([`gnm`]) - Kirchhoff matrix, eigen-decomposition, pseudo-inverse
//!   and normalized cross-correlation
//! - **Hierarchy** ([`linkage`]) - Ward agglomerative clustering and max-cluster cuts
//! - **Scoring** ([`scoring`]) - Calinski–Harabasz variance ratio
//! - **Communities** ([`community`]) - Sweep or fixed-count partitioning
//! - **Configuration** ([`config`]) - Analysis parameters and their validation
//! - **Progress Monitoring** ([`progress`]) - Phase callbacks for front-ends
//! - **Error Handling** ([`error`]) - Engine-specific error types

pub mod community;
pub mod config;
pub mod error;
pub mod gnm;
pub mod linkage;
pub mod progress;
pub mod scoring;
