//! Chemistry helpers shared by the structure readers: covalent radii and
//! distance-based bond inference.

pub mod bonds;
pub mod elements;
