use phf::{Map, phf_map};

/// Single-bond covalent radii in Angstroms, keyed by upper-case element symbol.
///
/// Values follow Cordero et al., Dalton Trans. 2008 (low-spin values for Mn, Fe, Co).
static COVALENT_RADII: Map<&'static str, f64> = phf_map! {
    "H" => 0.31, "D" => 0.31, "HE" => 0.28,
    "LI" => 1.28, "BE" => 0.96, "B" => 0.84, "C" => 0.76, "N" => 0.71, "O" => 0.66,
    "F" => 0.57, "NE" => 0.58,
    "NA" => 1.66, "MG" => 1.41, "AL" => 1.21, "SI" => 1.11, "P" => 1.07, "S" => 1.05,
    "CL" => 1.02, "AR" => 1.06,
    "K" => 2.03, "CA" => 1.76, "SC" => 1.70, "TI" => 1.60, "V" => 1.53, "CR" => 1.39,
    "MN" => 1.39, "FE" => 1.32, "CO" => 1.26, "NI" => 1.24, "CU" => 1.32, "ZN" => 1.22,
    "GA" => 1.22, "GE" => 1.20, "AS" => 1.19, "SE" => 1.20, "BR" => 1.20, "KR" => 1.16,
    "RB" => 2.20, "SR" => 1.95, "Y" => 1.90, "ZR" => 1.75, "MO" => 1.54, "RU" => 1.46,
    "RH" => 1.42, "PD" => 1.39, "AG" => 1.45, "CD" => 1.44, "IN" => 1.42, "SN" => 1.39,
    "SB" => 1.39, "TE" => 1.38, "I" => 1.39, "XE" => 1.40,
    "CS" => 2.44, "BA" => 2.15, "GD" => 1.96, "W" => 1.62, "OS" => 1.44, "IR" => 1.41,
    "PT" => 1.36, "AU" => 1.36, "HG" => 1.32, "TL" => 1.45, "PB" => 1.46, "U" => 1.96,
};

/// Looks up the covalent radius of an element symbol, ignoring case and surrounding whitespace.
pub fn covalent_radius(symbol: &str) -> Option<f64> {
    let symbol = symbol.trim();
    if symbol.bytes().all(|b| b.is_ascii_uppercase()) {
        return COVALENT_RADII.get(symbol).copied();
    }
    COVALENT_RADII
        .get(symbol.to_ascii_uppercase().as_str())
        .copied()
}
