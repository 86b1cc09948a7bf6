use crate::core::models::protein::Protein;
use std::error::Error;
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

/// Defines the interface for reading structure file formats into a [`Protein`].
///
/// Implementors only provide [`parse`](StructureFile::parse) over the complete file
/// text; both supported formats need whole-file views (frame and section splitting)
/// before any record can be interpreted.
pub trait StructureFile {
    /// The error type for read operations.
    type Error: Error + From<io::Error>;

    /// Parses the full text of a structure file.
    ///
    /// # Arguments
    ///
    /// * `text` - The complete file contents.
    /// * `id` - Identifier stored on the resulting protein (usually the file name).
    ///
    /// # Errors
    ///
    /// Returns an error if the text violates the format's fatal parsing rules.
    fn parse(text: &str, id: &str) -> Result<Protein, Self::Error>;

    /// Reads and parses a structure from any reader.
    ///
    /// # Errors
    ///
    /// Returns an error if reading fails or the contents cannot be parsed.
    fn read_from(reader: &mut impl Read, id: &str) -> Result<Protein, Self::Error> {
        let mut text = String::new();
        reader.read_to_string(&mut text)?;
        Self::parse(&text, id)
    }

    /// Reads a structure from a file path, using the file name as the protein id.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or parsing fails.
    fn read_from_path<P: AsRef<Path>>(path: P) -> Result<Protein, Self::Error> {
        let path = path.as_ref();
        let id = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let file = File::open(path)?;
        let mut reader = BufReader::new(file);
        Self::read_from(&mut reader, &id)
    }
}
