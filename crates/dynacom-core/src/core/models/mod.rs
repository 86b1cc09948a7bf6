//! # Core Models Module
//!
//! The structure record model: every parsed file becomes a [`protein::Protein`] holding
//! one [`model::Model`] per frame.
//!
//! ## Overview
//!
//! Each model owns its chains, residues (standard residues and het-mols share one type,
//! told apart by [`residue::ResidueKind`]) and atoms in typed `slotmap` arenas. Ownership
//! runs forward from model to atom; the parent links stored on chains, residues and atoms
//! are plain keys assigned once by [`builder::ModelBuilder::build`].
//!
//! ## Key Components
//!
//! - [`atom`] - Atom records with coordinates, occupancy, B-factor and extra properties
//! - [`residue`] - Residues and het-mols with their ordered atoms
//! - [`chain`] - Chains with separate residue and het-mol numbering
//! - [`model`] - A single frame and its lookup tables
//! - [`builder`] - Get-or-create construction of a frame
//! - [`protein`] - The parsed file: frames plus annotations
//! - [`ensemble`] - Multi-frame positional spread written into B-factors
//! - [`topology`] - Inferred covalent bonds
//! - [`ids`] - Typed arena keys
//!
//! ## Usage
//!
//! ```ignore
//! use dynacom::core::models::builder::ModelBuilder;
//! use dynacom::core::models::residue::ResidueKind;
//!
//! let mut builder = ModelBuilder::new(1);
//! let residue = builder.residue("A", 1, "ALA", ResidueKind::Standard);
//! builder.add_atom(residue, Atom::new(1, "CA", Point3::origin()));
//! let model = builder.build();
//! ```

pub mod atom;
pub mod builder;
pub mod chain;
pub mod ensemble;
pub mod ids;
pub mod model;
pub mod protein;
pub mod residue;
pub mod topology;
