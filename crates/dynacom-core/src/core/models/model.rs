use super::atom::Atom;
use super::chain::Chain;
use super::ids::{AtomKey, ChainKey, ResidueKey};
use super::residue::Residue;
use super::topology::Bond;
use crate::core::utils::bonds::{BondError, infer_bonds};
use nalgebra::Point3;
use slotmap::SlotMap;
use std::collections::HashMap;

/// One frame of a structure: chains, residues, het-mols and atoms owned in typed arenas.
///
/// A `Model` is produced by [`ModelBuilder`](super::builder::ModelBuilder) and has a
/// fixed topology afterwards. Atom coordinates and B-factors stay mutable through
/// [`Model::atom_mut`] and [`Model::set_b_factors`].
#[derive(Debug, Clone, Default)]
pub struct Model {
    /// Frame index, starting at 1.
    pub id: usize,
    pub(crate) atoms: SlotMap<AtomKey, Atom>,
    pub(crate) residues: SlotMap<ResidueKey, Residue>,
    pub(crate) chains: SlotMap<ChainKey, Chain>,
    /// Chains in order of first appearance.
    pub(crate) chain_order: Vec<ChainKey>,
    pub(crate) chain_ids: HashMap<String, ChainKey>,
    /// Standard atoms in parse order, plus lookup by serial.
    pub(crate) atom_order: Vec<AtomKey>,
    pub(crate) atom_ids: HashMap<i64, AtomKey>,
    /// Heteroatoms in parse order, plus lookup by serial.
    pub(crate) het_atom_order: Vec<AtomKey>,
    pub(crate) het_atom_ids: HashMap<i64, AtomKey>,
    pub(crate) bonds: Option<Vec<Bond>>,
}

impl Model {
    /// Retrieves an immutable reference to an atom by its key.
    ///
    /// # Arguments
    ///
    /// * `key` - The atom key to look up.
    ///
    /// # Return
    ///
    /// Returns `Some(&Atom)` if the atom exists, otherwise `None`.
    pub fn atom(&self, key: AtomKey) -> Option<&Atom> {
        self.atoms.get(key)
    }

    /// Retrieves a mutable reference to an atom by its key.
    ///
    /// Only the atom's own fields can change; membership is fixed once the model is built.
    pub fn atom_mut(&mut self, key: AtomKey) -> Option<&mut Atom> {
        self.atoms.get_mut(key)
    }

    pub fn residue(&self, key: ResidueKey) -> Option<&Residue> {
        self.residues.get(key)
    }

    pub fn chain_by_key(&self, key: ChainKey) -> Option<&Chain> {
        self.chains.get(key)
    }

    /// Finds a chain by its identifier (e.g. `"A"`).
    pub fn chain(&self, id: &str) -> Option<&Chain> {
        self.chain_ids.get(id).and_then(|&key| self.chains.get(key))
    }

    /// Returns the chains of this frame in order of first appearance.
    pub fn chains(&self) -> impl Iterator<Item = (ChainKey, &Chain)> {
        self.chain_order
            .iter()
            .filter_map(move |&key| self.chains.get(key).map(|chain| (key, chain)))
    }

    /// Returns all standard residues, chain by chain, each chain in parse order.
    pub fn residues(&self) -> impl Iterator<Item = (ResidueKey, &Residue)> {
        self.chains().flat_map(move |(_, chain)| {
            chain
                .residues()
                .iter()
                .filter_map(move |&key| self.residues.get(key).map(|residue| (key, residue)))
        })
    }

    /// Returns all het-mols, chain by chain, each chain in parse order.
    pub fn het_mols(&self) -> impl Iterator<Item = (ResidueKey, &Residue)> {
        self.chains().flat_map(move |(_, chain)| {
            chain
                .het_mols()
                .iter()
                .filter_map(move |&key| self.residues.get(key).map(|residue| (key, residue)))
        })
    }

    /// Returns standard (ATOM record) atoms in parse order.
    pub fn atoms(&self) -> impl Iterator<Item = (AtomKey, &Atom)> {
        self.atom_order
            .iter()
            .filter_map(move |&key| self.atoms.get(key).map(|atom| (key, atom)))
    }

    /// Returns heteroatoms (HETATM records) in parse order.
    pub fn het_atoms(&self) -> impl Iterator<Item = (AtomKey, &Atom)> {
        self.het_atom_order
            .iter()
            .filter_map(move |&key| self.atoms.get(key).map(|atom| (key, atom)))
    }

    pub fn atom_count(&self) -> usize {
        self.atom_order.len()
    }

    pub fn het_atom_count(&self) -> usize {
        self.het_atom_order.len()
    }

    /// Finds a standard atom by its serial number.
    pub fn atom_by_id(&self, id: i64) -> Option<AtomKey> {
        self.atom_ids.get(&id).copied()
    }

    /// Finds a heteroatom by its serial number.
    pub fn het_atom_by_id(&self, id: i64) -> Option<AtomKey> {
        self.het_atom_ids.get(&id).copied()
    }

    /// Returns the residue or het-mol that owns an atom.
    pub fn residue_of(&self, atom: AtomKey) -> Option<&Residue> {
        self.atoms
            .get(atom)
            .and_then(|a| a.residue())
            .and_then(|key| self.residues.get(key))
    }

    /// Returns the chain that owns a residue.
    pub fn chain_of(&self, residue: ResidueKey) -> Option<&Chain> {
        self.residues
            .get(residue)
            .and_then(|r| r.chain())
            .and_then(|key| self.chains.get(key))
    }

    /// Alpha-carbons of every standard residue that has one, chain by chain.
    pub fn calpha_atoms(&self) -> Vec<AtomKey> {
        self.residues().filter_map(|(_, r)| r.calpha()).collect()
    }

    /// Alpha-carbons of the standard residues of one chain.
    ///
    /// # Return
    ///
    /// Returns `None` if the chain does not exist in this frame.
    pub fn chain_calpha_atoms(&self, chain_id: &str) -> Option<Vec<AtomKey>> {
        let chain = self.chain(chain_id)?;
        Some(
            chain
                .residues()
                .iter()
                .filter_map(|&key| self.residues.get(key).and_then(Residue::calpha))
                .collect(),
        )
    }

    /// Coordinates of the standard atoms in parse order.
    pub fn positions(&self) -> Vec<Point3<f64>> {
        self.atoms().map(|(_, atom)| atom.position).collect()
    }

    /// Overwrites the B-factor of each standard atom, in parse order.
    ///
    /// Extra values are ignored; missing values leave the remaining atoms untouched.
    pub fn set_b_factors(&mut self, values: &[f64]) {
        let Self {
            atoms, atom_order, ..
        } = self;
        for (&key, &value) in atom_order.iter().zip(values) {
            if let Some(atom) = atoms.get_mut(key) {
                atom.b_factor = value;
            }
        }
    }

    /// Bonds inferred for this frame, absent when never computed or when inference failed.
    pub fn bonds(&self) -> Option<&[Bond]> {
        self.bonds.as_deref()
    }

    /// Infers covalent bonds from interatomic distances and stores them on the model.
    ///
    /// On failure the previous bond list is cleared so that `bonds()` reports absence.
    ///
    /// # Errors
    ///
    /// Returns [`BondError`] if the frame is empty or an element has no known radius.
    pub fn compute_bonds(&mut self) -> Result<usize, BondError> {
        self.bonds = None;
        let bonds = infer_bonds(self)?;
        let count = bonds.len();
        self.bonds = Some(bonds);
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::builder::ModelBuilder;
    use crate::core::models::residue::ResidueKind;

    fn atom(id: i64, name: &str, element: &str, x: f64) -> Atom {
        let mut atom = Atom::new(id, name, Point3::new(x, 0.0, 0.0));
        atom.element = element.to_string();
        atom
    }

    fn sample_model() -> Model {
        let mut builder = ModelBuilder::new(1);
        let gly = builder.residue("A", 1, "GLY", ResidueKind::Standard);
        builder.add_atom(gly, atom(1, "N", "N", 0.0));
        builder.add_atom(gly, atom(2, "CA", "C", 1.45));
        let ala = builder.residue("B", 2, "ALA", ResidueKind::Standard);
        builder.add_atom(ala, atom(3, "CA", "C", 10.0));
        let hoh = builder.residue("A", 1, "HOH", ResidueKind::Het);
        builder.add_atom(hoh, atom(4, "O", "O", 20.0));
        builder.build()
    }

    #[test]
    fn accessors_expose_hierarchy_in_parse_order() {
        let model = sample_model();

        let chain_ids: Vec<_> = model.chains().map(|(_, c)| c.id.as_str()).collect();
        assert_eq!(chain_ids, vec!["A", "B"]);
        assert_eq!(model.residues().count(), 2);
        assert_eq!(model.het_mols().count(), 1);
        assert_eq!(model.atom_count(), 3);
        assert_eq!(model.het_atom_count(), 1);

        let serials: Vec<_> = model.atoms().map(|(_, a)| a.id).collect();
        assert_eq!(serials, vec![1, 2, 3]);
        assert!(model.atom_by_id(4).is_none());
        assert!(model.het_atom_by_id(4).is_some());
    }

    #[test]
    fn parent_lookups_follow_back_references() {
        let model = sample_model();
        let ca = model.atom_by_id(2).unwrap();

        let residue = model.residue_of(ca).unwrap();
        assert_eq!(residue.name, "GLY");

        let residue_key = model.atom(ca).unwrap().residue().unwrap();
        let chain = model.chain_of(residue_key).unwrap();
        assert_eq!(chain.id, "A");
        assert_eq!(chain.model(), Some(1));
    }

    #[test]
    fn calpha_atoms_are_collected_per_model_and_per_chain() {
        let model = sample_model();
        assert_eq!(model.calpha_atoms().len(), 2);
        assert_eq!(model.chain_calpha_atoms("B").unwrap().len(), 1);
        assert!(model.chain_calpha_atoms("Z").is_none());
    }

    #[test]
    fn set_b_factors_writes_standard_atoms_in_order() {
        let mut model = sample_model();
        model.set_b_factors(&[1.0, 2.0, 3.0]);
        let values: Vec<_> = model.atoms().map(|(_, a)| a.b_factor).collect();
        assert_eq!(values, vec![1.0, 2.0, 3.0]);
        let het_b: Vec<_> = model.het_atoms().map(|(_, a)| a.b_factor).collect();
        assert_eq!(het_b, vec![0.0]);
    }

    #[test]
    fn atom_mut_updates_position() {
        let mut model = sample_model();
        let key = model.atom_by_id(1).unwrap();
        model.atom_mut(key).unwrap().position = Point3::new(5.0, 5.0, 5.0);
        assert_eq!(model.positions()[0], Point3::new(5.0, 5.0, 5.0));
    }

    #[test]
    fn compute_bonds_records_bonds_on_success() {
        let mut model = sample_model();
        assert!(model.bonds().is_none());
        let count = model.compute_bonds().unwrap();
        assert_eq!(count, 1);
        assert_eq!(model.bonds().unwrap().len(), 1);
    }

    #[test]
    fn compute_bonds_leaves_bonds_absent_on_unknown_element() {
        let mut builder = ModelBuilder::new(1);
        let res = builder.residue("A", 1, "UNK", ResidueKind::Standard);
        builder.add_atom(res, atom(1, "X1", "Qq", 0.0));
        let mut model = builder.build();

        assert!(model.compute_bonds().is_err());
        assert!(model.bonds().is_none());
    }
}
