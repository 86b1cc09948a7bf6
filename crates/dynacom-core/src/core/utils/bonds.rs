use super::elements::covalent_radius;
use crate::core::models::ids::AtomKey;
use crate::core::models::model::Model;
use crate::core::models::residue::Residue;
use crate::core::models::topology::{Bond, BondKind};
use nalgebra::Point3;
use thiserror::Error;

/// Slack in Angstroms added to the sum of covalent radii.
pub const BOND_TOLERANCE: f64 = 0.45;

const CARBONYL_CARBON: &str = "C";
const AMIDE_NITROGEN: &str = "N";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BondError {
    #[error("Model contains no atoms")]
    EmptyModel,
    #[error("No covalent radius known for element '{element}' (atom {atom_id})")]
    UnknownElement { element: String, atom_id: i64 },
}

struct BondCandidate {
    key: AtomKey,
    position: Point3<f64>,
    radius: f64,
}

impl BondCandidate {
    fn is_bonded_to(&self, other: &Self) -> bool {
        nalgebra::distance(&self.position, &other.position)
            <= self.radius + other.radius + BOND_TOLERANCE
    }
}

fn candidates(model: &Model, residue: &Residue) -> Result<Vec<BondCandidate>, BondError> {
    residue
        .atoms()
        .iter()
        .filter_map(|&key| model.atom(key).map(|atom| (key, atom)))
        .map(|(key, atom)| {
            let radius = covalent_radius(&atom.element).ok_or_else(|| BondError::UnknownElement {
                element: atom.element.clone(),
                atom_id: atom.id,
            })?;
            Ok(BondCandidate {
                key,
                position: atom.position,
                radius,
            })
        })
        .collect()
}

fn named_candidate<'a>(
    residue: &Residue,
    name: &str,
    candidates: &'a [BondCandidate],
) -> Option<&'a BondCandidate> {
    let key = residue.atom_by_name(name)?;
    candidates.iter().find(|c| c.key == key)
}

/// Infers covalent bonds within each residue and het-mol, plus backbone peptide
/// bonds between consecutive residues of a chain.
///
/// Two atoms are bonded when their distance does not exceed the sum of their
/// covalent radii plus [`BOND_TOLERANCE`].
///
/// # Errors
///
/// Returns [`BondError::EmptyModel`] for a frame without atoms, and
/// [`BondError::UnknownElement`] as soon as an atom's element has no known radius.
pub fn infer_bonds(model: &Model) -> Result<Vec<Bond>, BondError> {
    if model.atom_count() + model.het_atom_count() == 0 {
        return Err(BondError::EmptyModel);
    }

    let mut bonds = Vec::new();

    for (_, chain) in model.chains() {
        let mut previous: Option<(&Residue, Vec<BondCandidate>)> = None;

        for &key in chain.residues() {
            let Some(residue) = model.residue(key) else {
                continue;
            };
            let current = candidates(model, residue)?;
            push_intraresidue_bonds(&current, &mut bonds);

            if let Some((prev_residue, prev)) = &previous {
                let carbon = named_candidate(prev_residue, CARBONYL_CARBON, prev);
                let nitrogen = named_candidate(residue, AMIDE_NITROGEN, &current);
                if let (Some(c), Some(n)) = (carbon, nitrogen) {
                    if c.is_bonded_to(n) {
                        bonds.push(Bond::new(c.key, n.key, BondKind::Peptide));
                    }
                }
            }
            previous = Some((residue, current));
        }

        for &key in chain.het_mols() {
            if let Some(het_mol) = model.residue(key) {
                push_intraresidue_bonds(&candidates(model, het_mol)?, &mut bonds);
            }
        }
    }

    Ok(bonds)
}

fn push_intraresidue_bonds(candidates: &[BondCandidate], bonds: &mut Vec<Bond>) {
    for (i, first) in candidates.iter().enumerate() {
        for second in &candidates[i + 1..] {
            if first.is_bonded_to(second) {
                bonds.push(Bond::new(first.key, second.key, BondKind::Intraresidue));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::atom::Atom;
    use crate::core::models::builder::ModelBuilder;
    use crate::core::models::residue::ResidueKind;

    fn atom(id: i64, name: &str, element: &str, xyz: [f64; 3]) -> Atom {
        let mut atom = Atom::new(id, name, Point3::new(xyz[0], xyz[1], xyz[2]));
        atom.element = element.to_string();
        atom
    }

    fn dipeptide(gap: f64) -> Model {
        let mut builder = ModelBuilder::new(1);
        let first = builder.residue("A", 1, "GLY", ResidueKind::Standard);
        builder.add_atom(first, atom(1, "N", "N", [0.0, 0.0, 0.0]));
        builder.add_atom(first, atom(2, "CA", "C", [1.46, 0.0, 0.0]));
        builder.add_atom(first, atom(3, "C", "C", [2.98, 0.0, 0.0]));
        let second = builder.residue("A", 2, "GLY", ResidueKind::Standard);
        builder.add_atom(second, atom(4, "N", "N", [2.98 + gap, 0.0, 0.0]));
        builder.add_atom(second, atom(5, "CA", "C", [4.44 + gap, 0.0, 0.0]));
        builder.build()
    }

    fn kinds(bonds: &[Bond]) -> (usize, usize) {
        let peptide = bonds.iter().filter(|b| b.kind == BondKind::Peptide).count();
        (bonds.len() - peptide, peptide)
    }

    #[test]
    fn bonded_backbone_yields_intraresidue_and_peptide_bonds() {
        let model = dipeptide(1.33);
        let bonds = infer_bonds(&model).unwrap();
        // N-CA, CA-C in residue 1; N-CA in residue 2; C-N across.
        assert_eq!(kinds(&bonds), (3, 1));

        let c = model.atom_by_id(3).unwrap();
        let n = model.atom_by_id(4).unwrap();
        let peptide = bonds.iter().find(|b| b.kind == BondKind::Peptide).unwrap();
        assert!(peptide.contains(c) && peptide.contains(n));
    }

    #[test]
    fn distant_residues_get_no_peptide_bond() {
        let bonds = infer_bonds(&dipeptide(4.0)).unwrap();
        assert_eq!(kinds(&bonds), (3, 0));
    }

    #[test]
    fn atoms_of_different_residues_are_not_bonded_without_backbone_link() {
        let mut builder = ModelBuilder::new(1);
        let water = builder.residue("A", 100, "HOH", ResidueKind::Het);
        builder.add_atom(water, atom(1, "O", "O", [0.0, 0.0, 0.0]));
        let ion = builder.residue("A", 101, "NA", ResidueKind::Het);
        builder.add_atom(ion, atom(2, "NA", "Na", [0.5, 0.0, 0.0]));

        assert!(infer_bonds(&builder.build()).unwrap().is_empty());
    }

    #[test]
    fn unknown_element_fails_inference() {
        let mut builder = ModelBuilder::new(1);
        let residue = builder.residue("A", 1, "UNK", ResidueKind::Standard);
        builder.add_atom(residue, atom(7, "X", "Xx", [0.0, 0.0, 0.0]));

        assert_eq!(
            infer_bonds(&builder.build()),
            Err(BondError::UnknownElement {
                element: "Xx".to_string(),
                atom_id: 7
            })
        );
    }

    #[test]
    fn empty_model_fails_inference() {
        assert_eq!(
            infer_bonds(&ModelBuilder::new(1).build()),
            Err(BondError::EmptyModel)
        );
    }
}
