use super::ids::AtomKey;
use std::fmt;

/// How an inferred bond was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BondKind {
    /// Both atoms belong to the same residue or het-mol.
    Intraresidue,
    /// Backbone C(i)–N(i+1) link between consecutive residues of a chain.
    Peptide,
}

impl fmt::Display for BondKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Self::Intraresidue => "Intraresidue",
                Self::Peptide => "Peptide",
            }
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Bond {
    pub atom1: AtomKey, // Key of the first atom
    pub atom2: AtomKey, // Key of the second atom
    pub kind: BondKind,
}

impl Bond {
    pub fn new(atom1: AtomKey, atom2: AtomKey, kind: BondKind) -> Self {
        Self { atom1, atom2, kind }
    }

    pub fn contains(&self, atom: AtomKey) -> bool {
        self.atom1 == atom || self.atom2 == atom
    }
}
