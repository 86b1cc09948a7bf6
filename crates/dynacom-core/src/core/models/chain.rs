use super::ids::ResidueKey;
use super::residue::ResidueKind;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chain {
    pub id: String,                             // Chain identifier (e.g., "A")
    pub(crate) model: Option<usize>,            // Id of the owning model, linked after construction
    residues: Vec<ResidueKey>,                  // Standard residues in parse order
    residue_numbers: HashMap<i64, ResidueKey>,  // Residue number -> standard residue
    het_mols: Vec<ResidueKey>,                  // Het-mols in parse order
    het_mol_numbers: HashMap<i64, ResidueKey>,  // Residue number -> het-mol
}

impl Chain {
    pub(crate) fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            model: None,
            residues: Vec::new(),
            residue_numbers: HashMap::new(),
            het_mols: Vec::new(),
            het_mol_numbers: HashMap::new(),
        }
    }

    /// Registers a residue under its number in the namespace selected by `kind`.
    ///
    /// Registering the same number twice in one namespace is a no-op.
    pub(crate) fn insert(&mut self, number: i64, key: ResidueKey, kind: ResidueKind) {
        let (order, numbers) = match kind {
            ResidueKind::Standard => (&mut self.residues, &mut self.residue_numbers),
            ResidueKind::Het => (&mut self.het_mols, &mut self.het_mol_numbers),
        };
        if numbers.insert(number, key).is_none() {
            order.push(key);
        }
    }

    pub fn model(&self) -> Option<usize> {
        self.model
    }

    pub fn residues(&self) -> &[ResidueKey] {
        &self.residues
    }

    pub fn het_mols(&self) -> &[ResidueKey] {
        &self.het_mols
    }

    pub fn residue(&self, number: i64) -> Option<ResidueKey> {
        self.residue_numbers.get(&number).copied()
    }

    pub fn het_mol(&self, number: i64) -> Option<ResidueKey> {
        self.het_mol_numbers.get(&number).copied()
    }
}
