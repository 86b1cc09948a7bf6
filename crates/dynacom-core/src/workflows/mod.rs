//! # Workflows Module
//!
//! Top-level entry points that run a complete analysis on a parsed [`Protein`](crate::core::models::protein::Protein).
//!
//! - **Dynamic community identification** ([`dci`]) - alpha-carbon selection, Gaussian
//!   network model and community detection in one call.

pub mod dci;
