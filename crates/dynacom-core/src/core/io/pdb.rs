use crate::core::io::traits::StructureFile;
use crate::core::models::atom::Atom;
use crate::core::models::builder::ModelBuilder;
use crate::core::models::ensemble::{FrameMismatch, apply_ensemble_disorder};
use crate::core::models::protein::Protein;
use crate::core::models::residue::ResidueKind;
use nalgebra::Point3;
use std::io;
use thiserror::Error;
use tracing::info;

const FRAME_DELIMITER: &str = "\nMODEL";

#[derive(Debug, Error)]
pub enum PdbError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Parse error on line {line}: {kind}")]
    Parse {
        line: usize,
        kind: PdbParseErrorKind,
    },
    #[error("Inconsistent ensemble: {0}")]
    Ensemble(#[from] FrameMismatch),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PdbParseErrorKind {
    #[error("Line is too short for an ATOM/HETATM record (no chain identifier in column 22)")]
    LineTooShort,
    #[error("Invalid integer format in columns {columns} (value: '{value}')")]
    InvalidInt {
        columns: &'static str,
        value: String,
    },
    #[error("Invalid float format in columns {columns} (value: '{value}')")]
    InvalidFloat {
        columns: &'static str,
        value: String,
    },
}

/// Returns the byte columns `start..end`, clipped to the line; short lines yield short or empty slices.
fn columns(line: &str, start: usize, end: usize) -> &str {
    let end = end.min(line.len());
    if start >= end {
        return "";
    }
    line.get(start..end).unwrap_or("")
}

fn parse_int(line: &str, start: usize, end: usize, label: &'static str) -> Result<i64, PdbParseErrorKind> {
    let raw = columns(line, start, end);
    raw.trim().parse().map_err(|_| PdbParseErrorKind::InvalidInt {
        columns: label,
        value: raw.to_string(),
    })
}

fn parse_float(line: &str, start: usize, end: usize, label: &'static str) -> Result<f64, PdbParseErrorKind> {
    let raw = columns(line, start, end);
    raw.trim().parse().map_err(|_| PdbParseErrorKind::InvalidFloat {
        columns: label,
        value: raw.to_string(),
    })
}

struct AtomRecord {
    chain_id: String,
    residue_number: i64,
    residue_name: String,
    atom: Atom,
}

fn parse_atom_record(line: &str) -> Result<AtomRecord, PdbParseErrorKind> {
    let chain_id = line
        .get(21..22)
        .ok_or(PdbParseErrorKind::LineTooShort)?
        .to_string();
    let residue_number = parse_int(line, 22, 26, "23-26")?;
    let residue_name = columns(line, 17, 20).trim().to_string();
    let serial = parse_int(line, 6, 11, "7-11")?;
    let name = columns(line, 12, 16).trim();
    let position = Point3::new(
        parse_float(line, 30, 38, "31-38")?,
        parse_float(line, 38, 46, "39-46")?,
        parse_float(line, 46, 54, "47-54")?,
    );

    let mut atom = Atom::new(serial, name, position);
    atom.occupancy = parse_float(line, 54, 60, "55-60")?;
    atom.b_factor = parse_float(line, 60, 66, "61-66")?;
    atom.element = columns(line, 76, 78).trim().to_string();
    atom.charge = columns(line, 78, 80).to_string();

    Ok(AtomRecord {
        chain_id,
        residue_number,
        residue_name,
        atom,
    })
}

fn record_kind(line: &str) -> Option<ResidueKind> {
    if line.starts_with("ATOM") {
        Some(ResidueKind::Standard)
    } else if line.starts_with("HETATM") {
        Some(ResidueKind::Het)
    } else {
        None
    }
}

/// Reader for fixed-column PDB files.
///
/// Text is split into frames on `MODEL` records; when the file has any, whatever
/// precedes the first `MODEL` is header and only contributes annotations. Every
/// malformed ATOM/HETATM record aborts the load. Bonds are not inferred for PDB input.
///
/// Three details go beyond a plain column split. Residue names are trimmed, so a
/// right-aligned `" DA"` is stored as `"DA"`. Header lines before the first `MODEL`
/// are kept as annotations. Blank lines are dropped rather than stored. None of these
/// change which atoms are read or how they are grouped.
pub struct PdbFile;

impl StructureFile for PdbFile {
    type Error = PdbError;

    fn parse(text: &str, id: &str) -> Result<Protein, Self::Error> {
        let pieces: Vec<&str> = text.split(FRAME_DELIMITER).collect();

        let mut first_lines = Vec::with_capacity(pieces.len());
        let mut next_line = 1;
        for piece in &pieces {
            first_lines.push(next_line);
            next_line += piece.matches('\n').count() + 1;
        }

        let frame_start = if pieces.len() > 1 { 1 } else { 0 };
        let mut annotations = Vec::new();
        let mut models = Vec::with_capacity(pieces.len() - frame_start);

        for (index, (piece, &first_line)) in pieces.iter().zip(&first_lines).enumerate() {
            let is_header = index < frame_start;
            let mut builder = ModelBuilder::new(index + 1 - frame_start);

            for (offset, raw_line) in piece.split('\n').enumerate() {
                let line = raw_line.strip_suffix('\r').unwrap_or(raw_line);
                match record_kind(line) {
                    Some(kind) if !is_header => {
                        let record = parse_atom_record(line).map_err(|kind| PdbError::Parse {
                            line: first_line + offset,
                            kind,
                        })?;
                        let residue = builder.residue(
                            &record.chain_id,
                            record.residue_number,
                            &record.residue_name,
                            kind,
                        );
                        builder.add_atom(residue, record.atom);
                    }
                    _ if line.trim().is_empty() => {}
                    _ => annotations.push(line.to_string()),
                }
            }

            if !is_header {
                models.push(builder.build());
            }
        }

        apply_ensemble_disorder(&mut models)?;
        info!(
            id,
            frames = models.len(),
            atoms = models.first().map_or(0, |m| m.atom_count()),
            "Parsed PDB structure"
        );
        Ok(Protein::new(id, models, annotations))
    }
}
