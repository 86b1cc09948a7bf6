//! # Core Module
//!
//! Data structures and file handling shared by every analysis.
//!
//! - **Molecular Representation** ([`models`]) - Proteins, models, chains, residues and atoms
//! - **File I/O** ([`io`]) - PDB and mmCIF readers, residue selections and report writers
//! - **Utilities** ([`utils`]) - Element radii and distance-based bond inference

pub mod io;
pub mod models;
pub mod utils;
