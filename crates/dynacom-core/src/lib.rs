//! # DynaCom Core Library
//!
//! Dynamic community identification for protein structures. Alpha-carbons are treated
//! as nodes of a Gaussian network model; residues whose fluctuations are strongly
//! correlated are grouped into communities by Ward clustering.
//!
//! ## Architectural Philosophy
//!
//! - **[`core`]: The Foundation.** Structure models, PDB/mmCIF parsing and report
//!   writers. Nothing here knows about network models.
//!
//! - **[`engine`]: The Numerical Core.** Kirchhoff matrices, normal modes, cross-correlation,
//!   hierarchical clustering and Calinski–Harabasz scoring.
//!
//! - **[`workflows`]: The Public API.** Ties `core` and `engine` together into the
//!   end-to-end analysis used by front-ends such as the command-line tool.

pub mod core;
pub mod engine;
pub mod workflows;
