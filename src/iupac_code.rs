use crate::error::{AntError, ErrorCode};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

const DNA_BITMASK_A: u8 = 1;
const DNA_BITMASK_C: u8 = 2;
const DNA_BITMASK_G: u8 = 4;
const DNA_BITMASK_T: u8 = 8;
const DNA_BITMASK_N: u8 = DNA_BITMASK_A | DNA_BITMASK_C | DNA_BITMASK_G | DNA_BITMASK_T;

lazy_static! {
    static ref DEGENERATE_CODON_TEXT: Regex =
        Regex::new("^[GATCRYWSMKHBVDN]{3}$").expect("Invalid degenerate codon pattern");
}

/// One of the four concrete DNA bases
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Nucleotide {
    A,
    C,
    G,
    T,
}

impl Nucleotide {
    pub const ALL: [Nucleotide; 4] = [Nucleotide::A, Nucleotide::C, Nucleotide::G, Nucleotide::T];

    #[inline(always)]
    pub fn from_letter(letter: u8) -> Option<Self> {
        match letter.to_ascii_uppercase() {
            b'A' => Some(Self::A),
            b'C' => Some(Self::C),
            b'G' => Some(Self::G),
            b'T' | b'U' => Some(Self::T),
            _ => None,
        }
    }

    #[inline(always)]
    pub fn letter(self) -> u8 {
        match self {
            Self::A => b'A',
            Self::C => b'C',
            Self::G => b'G',
            Self::T => b'T',
        }
    }

    #[inline(always)]
    fn bitmask(self) -> u8 {
        match self {
            Self::A => DNA_BITMASK_A,
            Self::C => DNA_BITMASK_C,
            Self::G => DNA_BITMASK_G,
            Self::T => DNA_BITMASK_T,
        }
    }
}

/// A bitmasked IUPAC code for DNA bases, eg DNA_BITMASK_A|DNA_BITMASK_C
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub struct IupacCode(u8);

impl IupacCode {
    /// All 15 codes, in alphabetical order of their letters.
    /// This order is the tie-break order of the degenerate codon search.
    pub const ALL: [IupacCode; 15] = [
        IupacCode(DNA_BITMASK_A),
        IupacCode(DNA_BITMASK_C | DNA_BITMASK_G | DNA_BITMASK_T),
        IupacCode(DNA_BITMASK_C),
        IupacCode(DNA_BITMASK_A | DNA_BITMASK_G | DNA_BITMASK_T),
        IupacCode(DNA_BITMASK_G),
        IupacCode(DNA_BITMASK_A | DNA_BITMASK_C | DNA_BITMASK_T),
        IupacCode(DNA_BITMASK_G | DNA_BITMASK_T),
        IupacCode(DNA_BITMASK_A | DNA_BITMASK_C),
        IupacCode(DNA_BITMASK_N),
        IupacCode(DNA_BITMASK_A | DNA_BITMASK_G),
        IupacCode(DNA_BITMASK_C | DNA_BITMASK_G),
        IupacCode(DNA_BITMASK_T),
        IupacCode(DNA_BITMASK_A | DNA_BITMASK_C | DNA_BITMASK_G),
        IupacCode(DNA_BITMASK_A | DNA_BITMASK_T),
        IupacCode(DNA_BITMASK_C | DNA_BITMASK_T),
    ];

    #[inline(always)]
    pub fn from_letter(letter: u8) -> Option<Self> {
        let bitmask = match letter.to_ascii_uppercase() {
            b'A' => DNA_BITMASK_A,
            b'C' => DNA_BITMASK_C,
            b'G' => DNA_BITMASK_G,
            b'T' => DNA_BITMASK_T,
            b'U' => DNA_BITMASK_T,
            b'W' => DNA_BITMASK_A | DNA_BITMASK_T,
            b'S' => DNA_BITMASK_C | DNA_BITMASK_G,
            b'M' => DNA_BITMASK_A | DNA_BITMASK_C,
            b'K' => DNA_BITMASK_G | DNA_BITMASK_T,
            b'R' => DNA_BITMASK_A | DNA_BITMASK_G,
            b'Y' => DNA_BITMASK_C | DNA_BITMASK_T,
            b'B' => DNA_BITMASK_C | DNA_BITMASK_G | DNA_BITMASK_T,
            b'D' => DNA_BITMASK_A | DNA_BITMASK_G | DNA_BITMASK_T,
            b'H' => DNA_BITMASK_A | DNA_BITMASK_C | DNA_BITMASK_T,
            b'V' => DNA_BITMASK_A | DNA_BITMASK_C | DNA_BITMASK_G,
            b'N' => DNA_BITMASK_N,
            _ => return None,
        };
        Some(Self(bitmask))
    }

    #[inline(always)]
    pub fn letter(self) -> u8 {
        match self.0 {
            DNA_BITMASK_A => b'A',
            DNA_BITMASK_C => b'C',
            DNA_BITMASK_G => b'G',
            DNA_BITMASK_T => b'T',
            0b0011 => b'M',
            0b0101 => b'R',
            0b1001 => b'W',
            0b0110 => b'S',
            0b1010 => b'Y',
            0b1100 => b'K',
            0b0111 => b'V',
            0b1011 => b'H',
            0b1101 => b'D',
            0b1110 => b'B',
            _ => b'N',
        }
    }

    /// The concrete bases this code stands for, in A, C, G, T order
    #[inline(always)]
    pub fn expand(self) -> Vec<Nucleotide> {
        Nucleotide::ALL
            .into_iter()
            .filter(|base| self.0 & base.bitmask() != 0)
            .collect()
    }

    /// The code standing for exactly the given bases
    pub fn contract(bases: &[Nucleotide]) -> Result<Self, AntError> {
        let bitmask = bases.iter().fold(0, |acc, base| acc | base.bitmask());
        if bitmask == 0 {
            return Err(AntError {
                code: ErrorCode::InvalidNucleotideSet,
                message: "Cannot contract an empty set of nucleotides".to_string(),
            });
        }
        Ok(Self(bitmask))
    }

    #[inline(always)]
    pub fn contains(self, base: Nucleotide) -> bool {
        self.0 & base.bitmask() != 0
    }

    #[inline(always)]
    pub fn degeneracy(self) -> usize {
        self.0.count_ones() as usize
    }

    /// Upper-cases `text`, reads U as T and checks it is exactly three IUPAC symbols.
    pub fn validate_codon_text(text: &str) -> Result<String, AntError> {
        let normalized = text.to_ascii_uppercase().replace('U', "T");
        if !DEGENERATE_CODON_TEXT.is_match(&normalized) {
            return Err(AntError {
                code: ErrorCode::InvalidCodonFormat,
                message: format!(
                    "'{text}' is not a degenerate codon: expected three of GATCRYWSMKHBVDN"
                ),
            });
        }
        Ok(normalized)
    }
}

impl fmt::Debug for IupacCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "IupacCode({})", self.letter() as char)
    }
}

impl fmt::Display for IupacCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter() as char)
    }
}

impl Serialize for IupacCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_char(self.letter() as char)
    }
}

impl<'de> Deserialize<'de> for IupacCode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let letter = char::deserialize(deserializer)?;
        u8::try_from(letter)
            .ok()
            .and_then(IupacCode::from_letter)
            .ok_or_else(|| serde::de::Error::custom(format!("Not an IUPAC code: '{letter}'")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base2iupac() {
        assert!(IupacCode::from_letter(b'V')
            .unwrap()
            .contains(Nucleotide::G));
        assert!(!IupacCode::from_letter(b'H')
            .unwrap()
            .contains(Nucleotide::G));
        assert_eq!(IupacCode::from_letter(b'A'), Some(IupacCode(DNA_BITMASK_A)));
        assert_eq!(IupacCode::from_letter(b'C'), Some(IupacCode(DNA_BITMASK_C)));
        assert_eq!(IupacCode::from_letter(b'G'), Some(IupacCode(DNA_BITMASK_G)));
        assert_eq!(IupacCode::from_letter(b'T'), Some(IupacCode(DNA_BITMASK_T)));
        assert_eq!(IupacCode::from_letter(b'U'), Some(IupacCode(DNA_BITMASK_T)));
        assert_eq!(IupacCode::from_letter(b'k'), Some(IupacCode(DNA_BITMASK_G | DNA_BITMASK_T)));
        assert_eq!(IupacCode::from_letter(b'X'), None);
    }

    #[test]
    fn test_expand() {
        let expand = |letter: u8| IupacCode::from_letter(letter).unwrap().expand();
        assert_eq!(expand(b'A'), vec![Nucleotide::A]);
        assert_eq!(expand(b'T'), vec![Nucleotide::T]);
        assert_eq!(expand(b'M'), vec![Nucleotide::A, Nucleotide::C]);
        assert_eq!(expand(b'K'), vec![Nucleotide::G, Nucleotide::T]);
        assert_eq!(
            expand(b'V'),
            vec![Nucleotide::A, Nucleotide::C, Nucleotide::G]
        );
        assert_eq!(expand(b'N'), Nucleotide::ALL.to_vec());
    }

    #[test]
    fn test_round_trip_all_codes() {
        for code in IupacCode::ALL {
            assert_eq!(IupacCode::contract(&code.expand()).unwrap(), code);
            assert_eq!(IupacCode::from_letter(code.letter()), Some(code));
        }
    }

    #[test]
    fn test_all_is_a_bijection_in_alphabetical_order() {
        let letters: String = IupacCode::ALL.iter().map(|c| c.letter() as char).collect();
        assert_eq!(letters, "ABCDGHKMNRSTVWY");
        let mut masks: Vec<u8> = IupacCode::ALL.iter().map(|c| c.0).collect();
        masks.sort();
        assert_eq!(masks, (1..=15).collect::<Vec<u8>>());
    }

    #[test]
    fn test_contract_empty() {
        let err = IupacCode::contract(&[]).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidNucleotideSet);
    }

    #[test]
    fn test_contract_ignores_duplicates() {
        let code = IupacCode::contract(&[Nucleotide::G, Nucleotide::A, Nucleotide::G]).unwrap();
        assert_eq!(code.letter(), b'R');
        assert_eq!(code.degeneracy(), 2);
    }

    #[test]
    fn test_validate_codon_text() {
        assert_eq!(IupacCode::validate_codon_text("nnk").unwrap(), "NNK");
        assert_eq!(IupacCode::validate_codon_text("AUG").unwrap(), "ATG");
        for bad in ["AT", "ATX", "ATGC", "", "A-G", " ATG", "ATG\n", "\tNNK "] {
            let err = IupacCode::validate_codon_text(bad).unwrap_err();
            assert_eq!(err.code, ErrorCode::InvalidCodonFormat);
        }
    }

    #[test]
    fn test_serde_as_letter() {
        let code = IupacCode::from_letter(b'Y').unwrap();
        assert_eq!(serde_json::to_string(&code).unwrap(), "\"Y\"");
        let back: IupacCode = serde_json::from_str("\"y\"").unwrap();
        assert_eq!(back, code);
        assert!(serde_json::from_str::<IupacCode>("\"X\"").is_err());
    }
}
