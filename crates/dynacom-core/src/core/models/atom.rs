use super::ids::ResidueKey;
use nalgebra::Point3;

/// Name of the alpha-carbon atom used as the representative point of a residue.
pub const CALPHA_ATOM_NAME: &str = "CA";

/// A single atom record from a structure file.
///
/// Atoms are owned by the arena of their [`Model`](super::model::Model). The link
/// back to the enclosing residue (or het-mol) is a non-owning key that is only
/// filled in once the whole model has been assembled.
#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    /// Atom serial number; unique only within one frame.
    pub id: i64,
    /// The atom name (e.g., "CA", "N", "O").
    pub name: String,
    /// Cartesian coordinates in Angstroms.
    pub position: Point3<f64>,
    /// Crystallographic occupancy.
    pub occupancy: f64,
    /// Temperature factor, or the ensemble disorder value for multi-frame files.
    pub b_factor: f64,
    /// Element symbol as written in the file.
    pub element: String,
    /// Formal charge, kept as the raw format-dependent string.
    pub charge: String,
    pub(crate) residue: Option<ResidueKey>,
    properties: Vec<(String, String)>,
}

impl Atom {
    /// Creates a new `Atom` with neutral defaults for the optional record fields.
    ///
    /// # Arguments
    ///
    /// * `id` - The atom serial number.
    /// * `name` - The atom name.
    /// * `position` - The 3D coordinates of the atom.
    pub fn new(id: i64, name: &str, position: Point3<f64>) -> Self {
        Self {
            id,
            name: name.to_string(),
            position,
            occupancy: 1.0,
            b_factor: 0.0,
            element: String::new(),
            charge: String::new(),
            residue: None,
            properties: Vec::new(),
        }
    }

    /// Key of the parent residue or het-mol, once parents have been linked.
    pub fn residue(&self) -> Option<ResidueKey> {
        self.residue
    }

    pub fn is_calpha(&self) -> bool {
        self.name == CALPHA_ATOM_NAME
    }

    /// Looks up an extra named property (e.g., `_atom_site.label_atom_id`).
    pub fn property(&self, name: &str) -> Option<&str> {
        self.properties
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Sets an extra named property, replacing any previous value of the same name.
    pub fn set_property(&mut self, name: &str, value: &str) {
        match self.properties.iter_mut().find(|(key, _)| key == name) {
            Some((_, existing)) => *existing = value.to_string(),
            None => self.properties.push((name.to_string(), value.to_string())),
        }
    }

    /// Iterates over the extra properties in the order they were recorded.
    pub fn properties(&self) -> impl Iterator<Item = (&str, &str)> {
        self.properties
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }
}
