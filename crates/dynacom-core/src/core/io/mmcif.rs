use crate::core::io::traits::StructureFile;
use crate::core::models::atom::Atom;
use crate::core::models::builder::ModelBuilder;
use crate::core::models::ensemble::{FrameMismatch, apply_ensemble_disorder};
use crate::core::models::protein::Protein;
use crate::core::models::residue::ResidueKind;
use nalgebra::Point3;
use std::collections::HashMap;
use std::io;
use thiserror::Error;
use tracing::{debug, info, trace};

const SECTION_DELIMITER: &str = "loop_\n";
const SUBSECTION_DELIMITER: char = '#';
const ATOM_SITE_PREFIX: &str = "_atom_site.";

#[derive(Debug, Error)]
pub enum CifError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Inconsistent ensemble: {0}")]
    Ensemble(#[from] FrameMismatch),
}

/// Why a single `_atom_site` row was dropped.
#[derive(Debug, Error, PartialEq)]
enum RowError {
    #[error("no present and parsable column for the {0}")]
    Unresolved(&'static str),
    #[error("invalid {field} value '{value}'")]
    Invalid { field: &'static str, value: String },
    #[error("model number {0} is not a positive frame index")]
    InvalidFrame(i64),
    #[error("model number {frame} skips ahead of the {loaded} frame(s) read so far")]
    FrameOutOfSequence { frame: usize, loaded: usize },
}

/// A logical `_atom_site` field and the columns that may supply it, most preferred first.
struct Field {
    name: &'static str,
    candidates: &'static [&'static str],
    /// Column stored as an atom property whenever the first candidate supplied the value.
    label_alternate: Option<&'static str>,
}

const fn field(name: &'static str, candidates: &'static [&'static str]) -> Field {
    Field {
        name,
        candidates,
        label_alternate: None,
    }
}

const fn auth_field(name: &'static str, candidates: &'static [&'static str], label: &'static str) -> Field {
    Field {
        name,
        candidates,
        label_alternate: Some(label),
    }
}

const MODEL_NUMBER: Field = field("model number", &["pdbx_PDB_model_num"]);
const CHAIN_ID: Field = auth_field("chain id", &["auth_asym_id", "label_asym_id"], "label_asym_id");
const RESIDUE_NUMBER: Field = auth_field("residue number", &["auth_seq_id", "label_seq_id"], "label_seq_id");
const RESIDUE_NAME: Field = auth_field("residue name", &["auth_comp_id", "label_comp_id"], "label_comp_id");
const SERIAL: Field = field("atom serial", &["id"]);
const ATOM_NAME: Field = auth_field("atom name", &["auth_atom_id", "label_atom_id"], "label_atom_id");
const CARTN_X: Field = field("x coordinate", &["Cartn_x"]);
const CARTN_Y: Field = field("y coordinate", &["Cartn_y"]);
const CARTN_Z: Field = field("z coordinate", &["Cartn_z"]);
const OCCUPANCY: Field = field("occupancy", &["occupancy"]);
const B_FACTOR: Field = field("B-factor", &["B_iso_or_equiv"]);
const ELEMENT: Field = field("element", &["type_symbol"]);
const CHARGE: Field = field("formal charge", &["pdbx_formal_charge"]);

/// A resolved field value and the position of the candidate that supplied it.
struct Resolved<T> {
    value: T,
    candidate: usize,
}

/// Column positions of the `_atom_site` tags declared in the current subsection.
#[derive(Default)]
struct Columns<'a> {
    index: HashMap<&'a str, usize>,
}

impl<'a> Columns<'a> {
    fn register(&mut self, tag: &'a str, position: usize) {
        if let Some(column) = tag.strip_prefix(ATOM_SITE_PREFIX) {
            self.index.insert(column, position);
        }
    }

    fn raw<'r>(&self, row: &[&'r str], column: &str) -> Option<&'r str> {
        self.index.get(column).and_then(|&i| row.get(i)).copied()
    }

    fn text<'r>(&self, row: &[&'r str], field: &Field) -> Option<Resolved<&'r str>> {
        field.candidates.iter().enumerate().find_map(|(candidate, column)| {
            self.raw(row, column)
                .map(|value| Resolved { value, candidate })
        })
    }

    fn int(&self, row: &[&str], field: &Field) -> Option<Resolved<i64>> {
        field.candidates.iter().enumerate().find_map(|(candidate, column)| {
            self.raw(row, column)
                .and_then(|raw| raw.parse().ok())
                .map(|value| Resolved { value, candidate })
        })
    }

    fn required_text<'r>(&self, row: &[&'r str], field: &Field) -> Result<Resolved<&'r str>, RowError> {
        self.text(row, field).ok_or(RowError::Unresolved(field.name))
    }

    fn required_float(&self, row: &[&str], field: &Field) -> Result<f64, RowError> {
        let Resolved { value, .. } = self.required_text(row, field)?;
        value.parse().map_err(|_| RowError::Invalid {
            field: field.name,
            value: value.to_string(),
        })
    }

    /// Copies the label column of `field` onto the atom when the auth column was used.
    fn record_label(&self, row: &[&str], field: &Field, candidate: usize, atom: &mut Atom) {
        if candidate != 0 {
            return;
        }
        if let Some(label) = field.label_alternate {
            if let Some(value) = self.raw(row, label) {
                atom.set_property(&format!("{ATOM_SITE_PREFIX}{label}"), value);
            }
        }
    }
}

struct AtomSiteRow {
    frame: usize,
    kind: ResidueKind,
    chain_id: String,
    residue_number: i64,
    residue_name: String,
    atom: Atom,
}

fn extract_row(
    row: &[&str],
    kind: ResidueKind,
    columns: &Columns<'_>,
    line_index: usize,
) -> Result<AtomSiteRow, RowError> {
    let frame = columns
        .int(row, &MODEL_NUMBER)
        .ok_or(RowError::Unresolved(MODEL_NUMBER.name))?
        .value;
    let frame = usize::try_from(frame)
        .ok()
        .filter(|&f| f > 0)
        .ok_or(RowError::InvalidFrame(frame))?;

    let chain = columns.required_text(row, &CHAIN_ID)?;
    let residue_number = match (columns.int(row, &RESIDUE_NUMBER), kind) {
        (Some(resolved), _) => resolved,
        (None, ResidueKind::Het) => Resolved {
            value: line_index as i64,
            candidate: RESIDUE_NUMBER.candidates.len(),
        },
        (None, ResidueKind::Standard) => return Err(RowError::Unresolved(RESIDUE_NUMBER.name)),
    };
    let residue_name = columns.required_text(row, &RESIDUE_NAME)?;
    let serial = columns
        .int(row, &SERIAL)
        .ok_or(RowError::Unresolved(SERIAL.name))?
        .value;
    let atom_name = columns.required_text(row, &ATOM_NAME)?;
    let position = Point3::new(
        columns.required_float(row, &CARTN_X)?,
        columns.required_float(row, &CARTN_Y)?,
        columns.required_float(row, &CARTN_Z)?,
    );

    let mut atom = Atom::new(serial, atom_name.value, position);
    atom.occupancy = columns.required_float(row, &OCCUPANCY)?;
    atom.b_factor = columns.required_float(row, &B_FACTOR)?;
    atom.element = columns.required_text(row, &ELEMENT)?.value.to_string();
    atom.charge = columns.required_text(row, &CHARGE)?.value.to_string();

    columns.record_label(row, &CHAIN_ID, chain.candidate, &mut atom);
    columns.record_label(row, &RESIDUE_NUMBER, residue_number.candidate, &mut atom);
    columns.record_label(row, &RESIDUE_NAME, residue_name.candidate, &mut atom);
    columns.record_label(row, &ATOM_NAME, atom_name.candidate, &mut atom);

    Ok(AtomSiteRow {
        frame,
        kind,
        chain_id: chain.value.to_string(),
        residue_number: residue_number.value,
        residue_name: residue_name.value.to_string(),
        atom,
    })
}

/// Splits a data line into whitespace-separated tokens.
///
/// A token starting with `'` or `"` runs until the same quote followed by whitespace
/// or the end of the line; the quotes are not part of the token.
fn tokenize(line: &str) -> Vec<&str> {
    let bytes = line.as_bytes();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        let b = bytes[i];
        if b.is_ascii_whitespace() {
            i += 1;
            continue;
        }
        if b == b'\'' || b == b'"' {
            let start = i + 1;
            let mut end = start;
            while end < bytes.len()
                && !(bytes[end] == b
                    && bytes.get(end + 1).is_none_or(|next| next.is_ascii_whitespace()))
            {
                end += 1;
            }
            tokens.push(&line[start..end]);
            i = end + 1;
        } else {
            let start = i;
            while i < bytes.len() && !bytes[i].is_ascii_whitespace() {
                i += 1;
            }
            tokens.push(&line[start..i]);
        }
    }

    tokens
}

fn record_kind(token: &str) -> Option<ResidueKind> {
    match token {
        "ATOM" => Some(ResidueKind::Standard),
        "HETATM" => Some(ResidueKind::Het),
        _ => None,
    }
}

/// Per-frame builders, grown one frame at a time as model numbers are encountered.
#[derive(Default)]
struct Frames {
    builders: Vec<ModelBuilder>,
}

impl Frames {
    /// Returns the builder for `frame`, opening it when it is the next one in sequence.
    fn get_or_grow(&mut self, frame: usize) -> Result<&mut ModelBuilder, RowError> {
        let loaded = self.builders.len();
        if frame == loaded + 1 {
            self.builders.push(ModelBuilder::new(frame));
        }
        frame
            .checked_sub(1)
            .and_then(|index| self.builders.get_mut(index))
            .ok_or(RowError::FrameOutOfSequence { frame, loaded })
    }

    /// Inserts a row, returning `false` when its residue already has an atom of that name.
    fn insert(&mut self, row: AtomSiteRow) -> Result<bool, RowError> {
        let builder = self.get_or_grow(row.frame)?;
        let residue = builder.residue(&row.chain_id, row.residue_number, &row.residue_name, row.kind);
        Ok(builder.try_insert_atom(residue, row.atom).is_some())
    }
}

/// Reader for PDBx/mmCIF files.
///
/// Only `_atom_site` rows become atoms; every other line is kept as an annotation.
/// Unlike [`PdbFile`](super::pdb::PdbFile), a malformed atom row is skipped rather
/// than failing the load; this includes a row whose model number is neither an open
/// frame nor the next one. When several rows name the same atom of one residue
/// (alternate locations), the first one wins. Covalent bonds are inferred for every
/// model on a best-effort basis.
pub struct CifFile;

impl StructureFile for CifFile {
    type Error = CifError;

    fn parse(text: &str, id: &str) -> Result<Protein, Self::Error> {
        let mut frames = Frames::default();
        let mut annotations: Vec<String> = Vec::new();
        let (mut skipped, mut duplicates) = (0usize, 0usize);

        for section in text.split(SECTION_DELIMITER) {
            for subsection in section.split(SUBSECTION_DELIMITER) {
                let mut columns = Columns::default();
                let mut tag_count = 0;

                for (line_index, raw_line) in subsection.split('\n').enumerate() {
                    let line = raw_line.strip_suffix('\r').unwrap_or(raw_line);
                    let tokens = tokenize(line);
                    let Some(&first) = tokens.first() else {
                        continue;
                    };

                    if line.starts_with('_') {
                        let tag = line.trim();
                        annotations.push(tag.to_string());
                        if tokens.len() == 1 {
                            columns.register(tag, tag_count);
                            tag_count += 1;
                        }
                    } else if let Some(kind) = record_kind(first) {
                        match extract_row(&tokens, kind, &columns, line_index)
                            .and_then(|row| frames.insert(row))
                        {
                            Ok(true) => {}
                            Ok(false) => duplicates += 1,
                            Err(err) => {
                                skipped += 1;
                                trace!(line_index, error = %err, "Skipping mmCIF atom row");
                            }
                        }
                    } else {
                        annotations.push(line.trim().to_string());
                    }
                }

                if annotations.last().is_some_and(|last| last != "#") {
                    annotations.push("#".to_string());
                }
            }
            annotations.push("loop_".to_string());
        }

        let mut models: Vec<_> = frames.builders.into_iter().map(ModelBuilder::build).collect();
        apply_ensemble_disorder(&mut models)?;

        for model in &mut models {
            if let Err(err) = model.compute_bonds() {
                debug!(model = model.id, error = %err, "Bond inference failed; bonds left absent");
            }
        }

        info!(
            id,
            frames = models.len(),
            atoms = models.first().map_or(0, |m| m.atom_count()),
            skipped,
            duplicates,
            "Parsed mmCIF structure"
        );
        Ok(Protein::new(id, models, annotations))
    }
}
