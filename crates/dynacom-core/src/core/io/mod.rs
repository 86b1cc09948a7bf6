//! Reading structure files and writing analysis results.
//!
//! Parsers for PDB and mmCIF share the [`traits::StructureFile`] interface;
//! [`format`] picks one from a file extension. The report writers turn community
//! labels into PyMOL selection commands and score tables.

pub mod format;
pub mod mmcif;
pub mod pdb;
pub mod report;
pub mod selection;
pub mod traits;

pub use format::{StructureError, StructureFormat, load_structure, parse_structure};
