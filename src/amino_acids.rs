use serde::{Deserialize, Serialize};
use std::{cmp::Ordering, fmt};

/// Display order of the known amino acid codes; stop and the unnatural placeholder come last
pub const CANONICAL_ORDER: [&str; 22] = [
    "A", "C", "D", "E", "F", "G", "H", "I", "K", "L", "M", "N", "P", "Q", "R", "S", "T", "V", "W",
    "Y", "*", "U",
];

pub const STOP: &str = "*";

/// An amino acid, identified by its code.
///
/// The alphabet is open: genetic code tables may introduce codes of their own.
/// Two amino acids are equal iff their codes are equal. Sorting follows
/// `CANONICAL_ORDER`, with unknown codes after the known ones.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AminoAcid(String);

impl AminoAcid {
    pub fn new(code: &str) -> Self {
        Self(code.trim().to_ascii_uppercase())
    }

    pub fn from_letter(letter: u8) -> Self {
        Self((letter.to_ascii_uppercase() as char).to_string())
    }

    pub fn stop() -> Self {
        Self(STOP.to_string())
    }

    pub fn code(&self) -> &str {
        &self.0
    }

    pub fn is_stop(&self) -> bool {
        self.0 == STOP
    }

    fn rank(&self) -> usize {
        CANONICAL_ORDER
            .iter()
            .position(|code| *code == self.0)
            .unwrap_or(CANONICAL_ORDER.len())
    }

    pub fn three_letter(&self) -> &str {
        match self.0.as_str() {
            "A" => "Ala",
            "C" => "Cys",
            "D" => "Asp",
            "E" => "Glu",
            "F" => "Phe",
            "G" => "Gly",
            "H" => "His",
            "I" => "Ile",
            "K" => "Lys",
            "L" => "Leu",
            "M" => "Met",
            "N" => "Asn",
            "P" => "Pro",
            "Q" => "Gln",
            "R" => "Arg",
            "S" => "Ser",
            "T" => "Thr",
            "V" => "Val",
            "W" => "Trp",
            "Y" => "Tyr",
            "*" => "Stop",
            "U" => "Unn",
            other => other,
        }
    }

    pub fn full_name(&self) -> &str {
        match self.0.as_str() {
            "A" => "Alanine",
            "C" => "Cysteine",
            "D" => "Aspartic acid",
            "E" => "Glutamic acid",
            "F" => "Phenylalanine",
            "G" => "Glycine",
            "H" => "Histidine",
            "I" => "Isoleucine",
            "K" => "Lysine",
            "L" => "Leucine",
            "M" => "Methionine",
            "N" => "Asparagine",
            "P" => "Proline",
            "Q" => "Glutamine",
            "R" => "Arginine",
            "S" => "Serine",
            "T" => "Threonine",
            "V" => "Valine",
            "W" => "Tryptophan",
            "Y" => "Tyrosine",
            "*" => "Stop",
            "U" => "Unnatural AA",
            other => other,
        }
    }

    /// Label like "Met (M)"
    pub fn label(&self) -> String {
        format!("{} ({})", self.three_letter(), self.0)
    }
}

impl Ord for AminoAcid {
    fn cmp(&self, other: &Self) -> Ordering {
        self.rank()
            .cmp(&other.rank())
            .then_with(|| self.0.cmp(&other.0))
    }
}

impl PartialOrd for AminoAcid {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for AminoAcid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for AminoAcid {
    fn from(code: &str) -> Self {
        Self::new(code)
    }
}
