use super::ids::{AtomKey, ChainKey};
use std::collections::HashMap;
use std::fmt;

/// Distinguishes standard residues (ATOM records) from het-mols (HETATM records).
///
/// Both live in the same container type; a chain keeps a separate numbering
/// namespace for each kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ResidueKind {
    #[default]
    Standard,
    Het,
}

impl fmt::Display for ResidueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                ResidueKind::Standard => "Residue",
                ResidueKind::Het => "HetMol",
            }
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Residue {
    pub number: i64,                     // Residue sequence number from source file
    pub name: String,                    // Residue name (e.g., "ALA", "HOH")
    pub kind: ResidueKind,               // Standard residue or het-mol
    pub(crate) chain: Option<ChainKey>,  // Parent chain, linked after construction
    atoms: Vec<AtomKey>,                 // Atoms in parse order
    atom_ids: HashMap<i64, AtomKey>,     // Map from atom serial to its key
    atom_names: HashMap<String, AtomKey>, // Map from atom name to the first atom of that name
}

impl Residue {
    pub(crate) fn new(number: i64, name: &str, kind: ResidueKind) -> Self {
        Self {
            number,
            name: name.to_string(),
            kind,
            chain: None,
            atoms: Vec::new(),
            atom_ids: HashMap::new(),
            atom_names: HashMap::new(),
        }
    }

    /// Records an atom unconditionally. A repeated name keeps the first mapping.
    pub(crate) fn add_atom(&mut self, atom_id: i64, atom_name: &str, key: AtomKey) {
        self.atoms.push(key);
        self.atom_ids.insert(atom_id, key);
        self.atom_names.entry(atom_name.to_string()).or_insert(key);
    }

    pub fn is_het(&self) -> bool {
        self.kind == ResidueKind::Het
    }

    pub fn chain(&self) -> Option<ChainKey> {
        self.chain
    }

    pub fn atoms(&self) -> &[AtomKey] {
        &self.atoms
    }

    pub fn atom_by_id(&self, atom_id: i64) -> Option<AtomKey> {
        self.atom_ids.get(&atom_id).copied()
    }

    pub fn atom_by_name(&self, name: &str) -> Option<AtomKey> {
        self.atom_names.get(name).copied()
    }

    pub fn contains_atom_named(&self, name: &str) -> bool {
        self.atom_names.contains_key(name)
    }

    /// The alpha-carbon of this residue, if it has one.
    pub fn calpha(&self) -> Option<AtomKey> {
        self.atom_by_name(super::atom::CALPHA_ATOM_NAME)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slotmap::KeyData;

    fn dummy_atom_key(n: u64) -> AtomKey {
        AtomKey::from(KeyData::from_ffi(n))
    }

    #[test]
    fn new_residue_initializes_fields_correctly() {
        let residue = Residue::new(10, "GLY", ResidueKind::Standard);
        assert_eq!(residue.number, 10);
        assert_eq!(residue.name, "GLY");
        assert!(!residue.is_het());
        assert!(residue.chain().is_none());
        assert!(residue.atoms().is_empty());
        assert!(residue.calpha().is_none());
    }

    #[test]
    fn add_atom_keeps_parse_order_and_maps_ids_and_names() {
        let mut residue = Residue::new(5, "ALA", ResidueKind::Standard);
        let n = dummy_atom_key(1);
        let ca = dummy_atom_key(2);
        residue.add_atom(11, "N", n);
        residue.add_atom(12, "CA", ca);

        assert_eq!(residue.atoms(), &[n, ca]);
        assert_eq!(residue.atom_by_id(12), Some(ca));
        assert_eq!(residue.atom_by_name("N"), Some(n));
        assert_eq!(residue.calpha(), Some(ca));
    }

    #[test]
    fn add_atom_with_repeated_name_keeps_first_name_mapping() {
        let mut residue = Residue::new(5, "SER", ResidueKind::Standard);
        let first = dummy_atom_key(1);
        let second = dummy_atom_key(2);
        residue.add_atom(1, "OG", first);
        residue.add_atom(2, "OG", second);

        assert_eq!(residue.atoms().len(), 2);
        assert_eq!(residue.atom_by_name("OG"), Some(first));
        assert_eq!(residue.atom_by_id(2), Some(second));
    }

    #[test]
    fn residue_kind_display_uses_record_role_names() {
        assert_eq!(ResidueKind::Standard.to_string(), "Residue");
        assert_eq!(ResidueKind::Het.to_string(), "HetMol");
    }
}
