use super::atom::Atom;
use super::chain::Chain;
use super::ids::{AtomKey, ChainKey, ResidueKey};
use super::model::Model;
use super::residue::{Residue, ResidueKind};

/// Incrementally assembles one [`Model`] from parsed records.
///
/// Contents are created top-down with get-or-create semantics. Parent back-references
/// (atom → residue, residue → chain, chain → model) are only assigned by [`build`](Self::build),
/// once every record of the frame is present.
#[derive(Debug, Default)]
pub struct ModelBuilder {
    model: Model,
}

impl ModelBuilder {
    pub fn new(id: usize) -> Self {
        Self {
            model: Model {
                id,
                ..Model::default()
            },
        }
    }

    pub fn id(&self) -> usize {
        self.model.id
    }

    /// Returns the chain with the given identifier, creating it on first use.
    pub fn chain(&mut self, id: &str) -> ChainKey {
        let model = &mut self.model;
        if let Some(&key) = model.chain_ids.get(id) {
            return key;
        }
        let key = model.chains.insert(Chain::new(id));
        model.chain_ids.insert(id.to_string(), key);
        model.chain_order.push(key);
        key
    }

    /// Returns the residue (or het-mol) `number` of chain `chain_id`, creating both on first use.
    ///
    /// The residue name is only taken from the first record that creates the entry.
    pub fn residue(
        &mut self,
        chain_id: &str,
        number: i64,
        name: &str,
        kind: ResidueKind,
    ) -> ResidueKey {
        let chain_key = self.chain(chain_id);
        let model = &mut self.model;
        let chain = &mut model.chains[chain_key];
        let existing = match kind {
            ResidueKind::Standard => chain.residue(number),
            ResidueKind::Het => chain.het_mol(number),
        };
        if let Some(key) = existing {
            return key;
        }
        let key = model.residues.insert(Residue::new(number, name, kind));
        chain.insert(number, key, kind);
        key
    }

    /// Adds an atom to a residue unconditionally.
    ///
    /// # Return
    ///
    /// Returns `None` if the residue key does not belong to this builder.
    pub fn add_atom(&mut self, residue: ResidueKey, atom: Atom) -> Option<AtomKey> {
        self.insert_atom(residue, atom, false)
    }

    /// Adds an atom unless its residue already holds an atom with the same name.
    ///
    /// # Return
    ///
    /// Returns `Some(key)` when the atom was inserted, `None` when it was a duplicate
    /// (or the residue key is unknown).
    pub fn try_insert_atom(&mut self, residue: ResidueKey, atom: Atom) -> Option<AtomKey> {
        self.insert_atom(residue, atom, true)
    }

    fn insert_atom(&mut self, residue: ResidueKey, atom: Atom, dedup: bool) -> Option<AtomKey> {
        let model = &mut self.model;
        let target = model.residues.get(residue)?;
        if dedup && target.contains_atom_named(&atom.name) {
            return None;
        }
        let is_het = target.is_het();
        let (id, name) = (atom.id, atom.name.clone());

        let key = model.atoms.insert(atom);
        model.residues[residue].add_atom(id, &name, key);
        if is_het {
            model.het_atom_order.push(key);
            model.het_atom_ids.insert(id, key);
        } else {
            model.atom_order.push(key);
            model.atom_ids.insert(id, key);
        }
        Some(key)
    }

    /// Finishes the frame, linking every entity to its parent.
    pub fn build(mut self) -> Model {
        let model = &mut self.model;
        let model_id = model.id;
        for (chain_key, chain) in model.chains.iter_mut() {
            chain.model = Some(model_id);
            for &residue_key in chain.residues().iter().chain(chain.het_mols()) {
                if let Some(residue) = model.residues.get_mut(residue_key) {
                    residue.chain = Some(chain_key);
                    for &atom_key in residue.atoms() {
                        if let Some(atom) = model.atoms.get_mut(atom_key) {
                            atom.residue = Some(residue_key);
                        }
                    }
                }
            }
        }
        self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point3;

    fn atom(id: i64, name: &str) -> Atom {
        Atom::new(id, name, Point3::origin())
    }

    #[test]
    fn chain_and_residue_are_get_or_create() {
        let mut builder = ModelBuilder::new(1);
        let a1 = builder.chain("A");
        let a2 = builder.chain("A");
        assert_eq!(a1, a2);

        let r1 = builder.residue("A", 5, "ALA", ResidueKind::Standard);
        let r2 = builder.residue("A", 5, "GLY", ResidueKind::Standard);
        assert_eq!(r1, r2);

        let model = builder.build();
        assert_eq!(model.residue(r1).unwrap().name, "ALA");
        assert_eq!(model.chains().count(), 1);
    }

    #[test]
    fn standard_and_het_records_with_same_number_do_not_collide() {
        let mut builder = ModelBuilder::new(1);
        let residue = builder.residue("A", 1, "ALA", ResidueKind::Standard);
        let het_mol = builder.residue("A", 1, "HOH", ResidueKind::Het);
        assert_ne!(residue, het_mol);

        builder.add_atom(residue, atom(1, "CA"));
        builder.add_atom(het_mol, atom(1, "O"));
        let model = builder.build();

        assert_eq!(model.residues().count(), 1);
        assert_eq!(model.het_mols().count(), 1);
        assert!(model.atom_by_id(1).is_some());
        assert!(model.het_atom_by_id(1).is_some());
    }

    #[test]
    fn try_insert_atom_skips_duplicate_names_and_reports_it() {
        let mut builder = ModelBuilder::new(1);
        let residue = builder.residue("A", 1, "SER", ResidueKind::Standard);
        assert!(builder.try_insert_atom(residue, atom(1, "OG")).is_some());
        assert!(builder.try_insert_atom(residue, atom(2, "OG")).is_none());
        assert!(builder.add_atom(residue, atom(3, "OG")).is_some());

        let model = builder.build();
        assert_eq!(model.atom_count(), 2);
        assert!(model.atom_by_id(2).is_none());
    }

    #[test]
    fn build_links_every_back_reference() {
        let mut builder = ModelBuilder::new(3);
        let residue = builder.residue("C", 7, "LYS", ResidueKind::Standard);
        let key = builder.add_atom(residue, atom(10, "NZ")).unwrap();
        let model = builder.build();

        let atom = model.atom(key).unwrap();
        assert_eq!(atom.residue(), Some(residue));
        let chain_key = model.residue(residue).unwrap().chain().unwrap();
        assert_eq!(model.chain_by_key(chain_key).unwrap().model(), Some(3));
    }
}
