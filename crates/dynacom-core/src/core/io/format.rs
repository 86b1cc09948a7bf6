use crate::core::io::mmcif::{CifError, CifFile};
use crate::core::io::pdb::{PdbError, PdbFile};
use crate::core::io::traits::StructureFile;
use crate::core::models::ensemble::FrameMismatch;
use crate::core::models::protein::Protein;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

/// Supported structure file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StructureFormat {
    Pdb,
    Cif,
}

impl StructureFormat {
    /// Maps a file extension (without the dot) to a format, ignoring case.
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension.to_ascii_lowercase().as_str() {
            "pdb" | "ent" => Some(Self::Pdb),
            "cif" | "mmcif" => Some(Self::Cif),
            _ => None,
        }
    }

    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }

    /// The canonical file extension, also used for RCSB downloads.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Pdb => "pdb",
            Self::Cif => "cif",
        }
    }
}

impl fmt::Display for StructureFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for StructureFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_extension(s.trim()).ok_or_else(|| {
            format!("unknown structure format '{s}' (expected 'pdb' or 'cif')")
        })
    }
}

#[derive(Debug, Error)]
pub enum StructureError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("PDB error: {0}")]
    Pdb(PdbError),
    #[error("mmCIF error: {0}")]
    Cif(CifError),
    #[error("Cannot determine the structure format of '{}'", .0.display())]
    UnknownFormat(PathBuf),
    #[error("Inconsistent ensemble: {0}")]
    FrameMismatch(#[from] FrameMismatch),
}

impl From<PdbError> for StructureError {
    fn from(err: PdbError) -> Self {
        match err {
            PdbError::Io(e) => Self::Io(e),
            PdbError::Ensemble(e) => Self::FrameMismatch(e),
            other => Self::Pdb(other),
        }
    }
}

impl From<CifError> for StructureError {
    fn from(err: CifError) -> Self {
        match err {
            CifError::Io(e) => Self::Io(e),
            CifError::Ensemble(e) => Self::FrameMismatch(e),
        }
    }
}

/// Parses structure text, choosing the parser from `format` or else the extension of `id`.
///
/// # Arguments
///
/// * `text` - The complete file contents.
/// * `id` - Identifier stored on the resulting protein, usually a file name.
/// * `format` - The format of `text`, if known.
///
/// # Errors
///
/// Returns [`StructureError::UnknownFormat`] when the format cannot be determined,
/// [`StructureError::Pdb`] for malformed PDB records and
/// [`StructureError::FrameMismatch`] when ensemble frames disagree in size.
pub fn parse_structure(
    text: &str,
    id: &str,
    format: Option<StructureFormat>,
) -> Result<Protein, StructureError> {
    let format = format
        .or_else(|| StructureFormat::from_path(Path::new(id)))
        .ok_or_else(|| StructureError::UnknownFormat(PathBuf::from(id)))?;
    let protein = match format {
        StructureFormat::Pdb => PdbFile::parse(text, id)?,
        StructureFormat::Cif => CifFile::parse(text, id)?,
    };
    Ok(protein)
}

/// Loads a structure file, choosing the parser from `format` or else the file extension.
///
/// The protein id is the file name.
///
/// # Errors
///
/// Returns [`StructureError::UnknownFormat`] when no format is given and the extension
/// is not recognised, [`StructureError::Io`] when the file cannot be read, and the
/// parser's error otherwise.
pub fn load_structure(
    path: impl AsRef<Path>,
    format: Option<StructureFormat>,
) -> Result<Protein, StructureError> {
    let path = path.as_ref();
    let format = format
        .or_else(|| StructureFormat::from_path(path))
        .ok_or_else(|| StructureError::UnknownFormat(path.to_path_buf()))?;
    let protein = match format {
        StructureFormat::Pdb => PdbFile::read_from_path(path)?,
        StructureFormat::Cif => CifFile::read_from_path(path)?,
    };
    Ok(protein)
}
