use crate::{
    error::{AntError, ErrorCode},
    iupac_code::{IupacCode, Nucleotide},
};
use itertools::iproduct;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A concrete codon
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Codon([Nucleotide; 3]);

impl Codon {
    pub fn new(first: Nucleotide, second: Nucleotide, third: Nucleotide) -> Self {
        Self([first, second, third])
    }

    pub fn from_text(text: &str) -> Option<Self> {
        let bytes = text.as_bytes();
        if bytes.len() != 3 {
            return None;
        }
        Some(Self([
            Nucleotide::from_letter(bytes[0])?,
            Nucleotide::from_letter(bytes[1])?,
            Nucleotide::from_letter(bytes[2])?,
        ]))
    }

    /// Position in NCBI table order (TTT, TTC, TTA, TTG, TCT, ..., GGG)
    #[inline(always)]
    pub fn ncbi_index(&self) -> usize {
        let idx = |n: Nucleotide| match n {
            Nucleotide::T => 0,
            Nucleotide::C => 1,
            Nucleotide::A => 2,
            Nucleotide::G => 3,
        };
        idx(self.0[0]) * 16 + idx(self.0[1]) * 4 + idx(self.0[2])
    }

    /// All 64 codons in NCBI table order
    pub fn all() -> Vec<Codon> {
        const NCBI_BASES: [Nucleotide; 4] =
            [Nucleotide::T, Nucleotide::C, Nucleotide::A, Nucleotide::G];
        iproduct!(NCBI_BASES, NCBI_BASES, NCBI_BASES)
            .map(|(a, b, c)| Codon::new(a, b, c))
            .collect()
    }
}

impl fmt::Display for Codon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for base in self.0 {
            write!(f, "{}", base.letter() as char)?;
        }
        Ok(())
    }
}

/// Three IUPAC codes, one per codon position
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DegenerateCodon([IupacCode; 3]);

impl DegenerateCodon {
    pub fn new(first: IupacCode, second: IupacCode, third: IupacCode) -> Self {
        Self([first, second, third])
    }

    /// Parses case-insensitive codon text like "NNK"
    pub fn parse(text: &str) -> Result<Self, AntError> {
        let normalized = IupacCode::validate_codon_text(text)?;
        let mut codes = normalized.bytes().filter_map(IupacCode::from_letter);
        match (codes.next(), codes.next(), codes.next()) {
            (Some(a), Some(b), Some(c)) => Ok(Self([a, b, c])),
            _ => Err(AntError::new(
                ErrorCode::InvalidCodonFormat,
                format!("'{text}' does not decode to three IUPAC codes"),
            )),
        }
    }

    pub fn positions(&self) -> &[IupacCode; 3] {
        &self.0
    }

    /// Number of concrete codons
    pub fn codon_count(&self) -> usize {
        self.0.iter().map(|code| code.degeneracy()).product()
    }

    /// The concrete codons, i.e. the Cartesian product of the expanded positions
    pub fn codons(&self) -> Vec<Codon> {
        iproduct!(self.0[0].expand(), self.0[1].expand(), self.0[2].expand())
            .map(|(a, b, c)| Codon::new(a, b, c))
            .collect()
    }

    /// Every one of the 15^3 degenerate codons, in tie-break order
    pub fn all() -> impl Iterator<Item = DegenerateCodon> {
        iproduct!(IupacCode::ALL, IupacCode::ALL, IupacCode::ALL)
            .map(|(a, b, c)| DegenerateCodon::new(a, b, c))
    }
}

impl fmt::Display for DegenerateCodon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.0[0], self.0[1], self.0[2])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ncbi_index() {
        assert_eq!(Codon::from_text("TTT").unwrap().ncbi_index(), 0);
        assert_eq!(Codon::from_text("ATG").unwrap().ncbi_index(), 35);
        assert_eq!(Codon::from_text("GGG").unwrap().ncbi_index(), 63);
        let all = Codon::all();
        assert_eq!(all.len(), 64);
        assert!(all.iter().enumerate().all(|(i, c)| c.ncbi_index() == i));
    }

    #[test]
    fn test_codon_text() {
        assert_eq!(Codon::from_text("aug").unwrap().to_string(), "ATG");
        assert!(Codon::from_text("ATN").is_none());
        assert!(Codon::from_text("AT").is_none());
    }

    #[test]
    fn test_degenerate_codon_expansion() {
        let codon = DegenerateCodon::parse("wkg").unwrap();
        assert_eq!(codon.to_string(), "WKG");
        assert_eq!(codon.codon_count(), 4);
        let codons: Vec<String> = codon.codons().iter().map(|c| c.to_string()).collect();
        assert_eq!(codons, vec!["AGG", "ATG", "TGG", "TTG"]);
    }

    #[test]
    fn test_nnn_has_64_codons() {
        let codon = DegenerateCodon::parse("NNN").unwrap();
        assert_eq!(codon.codon_count(), 64);
        assert_eq!(codon.codons().len(), 64);
    }

    #[test]
    fn test_parse_rejects_malformed() {
        for bad in ["AT", "ATX", "NNNN", "NNK "] {
            assert_eq!(
                DegenerateCodon::parse(bad).unwrap_err().code,
                ErrorCode::InvalidCodonFormat
            );
        }
    }

    #[test]
    fn test_all_candidates() {
        let all: Vec<DegenerateCodon> = DegenerateCodon::all().collect();
        assert_eq!(all.len(), 3375);
        assert_eq!(all[0].to_string(), "AAA");
        assert_eq!(all[1].to_string(), "AAB");
        assert_eq!(all[3374].to_string(), "YYY");
    }
}
