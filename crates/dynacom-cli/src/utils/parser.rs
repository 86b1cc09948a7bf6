use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("PDB identifier cannot be empty.")]
    EmptyId,

    #[error("Invalid PDB identifier '{0}'. Expected four characters such as '1ubq'.")]
    InvalidLength(String),

    #[error("Invalid PDB identifier '{0}'. Only ASCII letters and digits are allowed.")]
    InvalidCharacter(String),
}

/// Checks a four-character PDB identifier, returning it trimmed.
pub fn parse_pdb_id(raw: &str) -> Result<&str, ParseError> {
    let id = raw.trim();
    if id.is_empty() {
        return Err(ParseError::EmptyId);
    }
    if !id.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(ParseError::InvalidCharacter(id.to_string()));
    }
    if id.len() != 4 {
        return Err(ParseError::InvalidLength(id.to_string()));
    }
    Ok(id)
}
