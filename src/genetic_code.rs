//! Genetic code tables and the registry holding them.
//!
//! Tables are plain data: 64 amino acid letters in NCBI codon order
//! (TTT, TTC, TTA, TTG, TCT, ...). Variation between tables is only a
//! difference in that string.

use crate::{
    amino_acids::AminoAcid,
    codon::Codon,
    error::{AntError, ErrorCode},
};
use ant_protocol::TableDescriptor;
use std::collections::BTreeMap;
use tracing::warn;

pub type TableId = u16;

pub const STANDARD_TABLE: TableId = 1;

/// Standard code with the amber stop codon (TAG) read as an unnatural amino acid
pub const STANDARD_UAG_REASSIGNED_TABLE: TableId = 1001;

const NCBI_TABLES: [(TableId, &str, &str); 20] = [
    (
        1,
        "Standard Code",
        "FFLLSSSSYY**CC*WLLLLPPPPHHQQRRRRIIIMTTTTNNKKSSRRVVVVAAAADDEEGGGG",
    ),
    (
        2,
        "Vertebrate Mitochondrial Code",
        "FFLLSSSSYY**CCWWLLLLPPPPHHQQRRRRIIMMTTTTNNKKSS**VVVVAAAADDEEGGGG",
    ),
    (
        3,
        "Yeast Mitochondrial Code",
        "FFLLSSSSYY**CCWWTTTTPPPPHHQQRRRRIIMMTTTTNNKKSSRRVVVVAAAADDEEGGGG",
    ),
    (
        4,
        "Mold, Protozoan, Coelenterate Mitochondrial Code",
        "FFLLSSSSYY**CCWWLLLLPPPPHHQQRRRRIIIMTTTTNNKKSSRRVVVVAAAADDEEGGGG",
    ),
    (
        5,
        "Invertebrate Mitochondrial Code",
        "FFLLSSSSYY**CCWWLLLLPPPPHHQQRRRRIIMMTTTTNNKKSSSSVVVVAAAADDEEGGGG",
    ),
    (
        6,
        "Ciliate, Dasycladacean and Hexamita Nuclear Code",
        "FFLLSSSSYYQQCC*WLLLLPPPPHHQQRRRRIIIMTTTTNNKKSSRRVVVVAAAADDEEGGGG",
    ),
    (
        9,
        "Echinoderm and Flatworm Mitochondrial Code",
        "FFLLSSSSYY**CCWWLLLLPPPPHHQQRRRRIIIMTTTTNNNKSSSSVVVVAAAADDEEGGGG",
    ),
    (
        10,
        "Euplotid Nuclear Code",
        "FFLLSSSSYY**CCCWLLLLPPPPHHQQRRRRIIIMTTTTNNKKSSRRVVVVAAAADDEEGGGG",
    ),
    (
        11,
        "Bacterial, Archaeal and Plant Plastid Code",
        "FFLLSSSSYY**CC*WLLLLPPPPHHQQRRRRIIIMTTTTNNKKSSRRVVVVAAAADDEEGGGG",
    ),
    (
        12,
        "Alternative Yeast Nuclear Code",
        "FFLLSSSSYY**CC*WLLLSPPPPHHQQRRRRIIIMTTTTNNKKSSRRVVVVAAAADDEEGGGG",
    ),
    (
        13,
        "Ascidian Mitochondrial Code",
        "FFLLSSSSYY**CCWWLLLLPPPPHHQQRRRRIIMMTTTTNNKKSSGGVVVVAAAADDEEGGGG",
    ),
    (
        14,
        "Alternative Flatworm Mitochondrial Code",
        "FFLLSSSSYYY*CCWWLLLLPPPPHHQQRRRRIIIMTTTTNNNKSSSSVVVVAAAADDEEGGGG",
    ),
    (
        15,
        "Blepharisma Nuclear Code",
        "FFLLSSSSYY*QCC*WLLLLPPPPHHQQRRRRIIIMTTTTNNKKSSRRVVVVAAAADDEEGGGG",
    ),
    (
        16,
        "Chlorophycean Mitochondrial Code",
        "FFLLSSSSYY*LCC*WLLLLPPPPHHQQRRRRIIIMTTTTNNKKSSRRVVVVAAAADDEEGGGG",
    ),
    (
        21,
        "Trematode Mitochondrial Code",
        "FFLLSSSSYY**CCWWLLLLPPPPHHQQRRRRIIMMTTTTNNNKSSSSVVVVAAAADDEEGGGG",
    ),
    (
        22,
        "Scenedesmus obliquus mitochondrial Code",
        "FFLLSS*SYY*LCC*WLLLLPPPPHHQQRRRRIIIMTTTTNNKKSSRRVVVVAAAADDEEGGGG",
    ),
    (
        23,
        "Thraustochytrium Mitochondrial Code",
        "FF*LSSSSYY**CC*WLLLLPPPPHHQQRRRRIIIMTTTTNNKKSSRRVVVVAAAADDEEGGGG",
    ),
    (
        24,
        "Pterobranchia mitochondrial Code",
        "FFLLSSSSYY**CCWWLLLLPPPPHHQQRRRRIIIMTTTTNNKKSSSKVVVVAAAADDEEGGGG",
    ),
    (
        25,
        "Candidate Division SR1 and Gracilibacteria Code",
        "FFLLSSSSYY**CCGWLLLLPPPPHHQQRRRRIIIMTTTTNNKKSSRRVVVVAAAADDEEGGGG",
    ),
    (
        STANDARD_UAG_REASSIGNED_TABLE,
        "Standard Code With UAG Codon Reassignment",
        "FFLLSSSSYY*UCC*WLLLLPPPPHHQQRRRRIIIMTTTTNNKKSSRRVVVVAAAADDEEGGGG",
    ),
];

/// A complete codon to amino acid mapping
#[derive(Clone, Debug)]
pub struct CodeTable {
    id: TableId,
    name: String,
    alphabet: Vec<AminoAcid>,
    // Index into `alphabet`, per codon in NCBI order
    codon_to_aa: [u8; 64],
}

impl CodeTable {
    /// Builds a table from a 64-letter NCBI amino acid string
    pub fn from_ncbieaa(id: TableId, name: &str, ncbieaa: &str) -> Result<Self, AntError> {
        let letters = ncbieaa.as_bytes();
        if letters.len() != 64 {
            return Err(AntError::new(
                ErrorCode::InvalidInput,
                format!(
                    "Genetic code {id} has {} codon assignments, expected 64",
                    letters.len()
                ),
            ));
        }
        let mut alphabet: Vec<AminoAcid> = letters.iter().map(|l| AminoAcid::from_letter(*l)).collect();
        alphabet.sort();
        alphabet.dedup();

        let mut codon_to_aa = [0u8; 64];
        for (slot, letter) in codon_to_aa.iter_mut().zip(letters) {
            let aa = AminoAcid::from_letter(*letter);
            let idx = alphabet.binary_search(&aa).map_err(|_| {
                AntError::new(
                    ErrorCode::Internal,
                    format!("Genetic code {id}: '{aa}' missing from its own alphabet"),
                )
            })?;
            *slot = idx as u8;
        }

        Ok(Self {
            id,
            name: name.to_string(),
            alphabet,
            codon_to_aa,
        })
    }

    pub fn id(&self) -> TableId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Every amino acid this table can produce, in canonical order
    pub fn alphabet(&self) -> &[AminoAcid] {
        &self.alphabet
    }

    #[inline(always)]
    pub fn translate(&self, codon: &Codon) -> &AminoAcid {
        &self.alphabet[self.aa_index(codon)]
    }

    /// Index of the codon's amino acid within `alphabet()`
    #[inline(always)]
    pub fn aa_index(&self, codon: &Codon) -> usize {
        self.codon_to_aa[codon.ncbi_index()] as usize
    }

    pub fn alphabet_index(&self, aa: &AminoAcid) -> Option<usize> {
        self.alphabet.binary_search(aa).ok()
    }

    /// Label used by table choosers, eg "1: Standard Code"
    pub fn label(&self) -> String {
        format!("{}: {}", self.id, self.name)
    }

    pub fn descriptor(&self) -> TableDescriptor {
        TableDescriptor {
            id: self.id,
            name: self.name.clone(),
            alphabet: self.alphabet.iter().map(|aa| aa.code().to_string()).collect(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct CodeTableRegistry {
    tables: BTreeMap<TableId, CodeTable>,
}

impl Default for CodeTableRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl CodeTableRegistry {
    pub fn new() -> Self {
        let tables = NCBI_TABLES
            .iter()
            .filter_map(|(id, name, ncbieaa)| {
                CodeTable::from_ncbieaa(*id, name, ncbieaa)
                    .inspect_err(|e| warn!("Skipping genetic code {id}: {e}"))
                    .ok()
            })
            .map(|table| (table.id(), table))
            .collect();
        Self { tables }
    }

    pub fn get(&self, id: TableId) -> Result<&CodeTable, AntError> {
        self.tables.get(&id).ok_or_else(|| {
            AntError::new(
                ErrorCode::UnsupportedTable,
                format!("Genetic code {id} is not supported"),
            )
        })
    }

    pub fn translate(&self, id: TableId, codon: &Codon) -> Result<AminoAcid, AntError> {
        Ok(self.get(id)?.translate(codon).to_owned())
    }

    pub fn ids(&self) -> Vec<TableId> {
        self.tables.keys().copied().collect()
    }

    pub fn tables(&self) -> impl Iterator<Item = &CodeTable> {
        self.tables.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn codon(text: &str) -> Codon {
        Codon::from_text(text).unwrap()
    }

    fn codons_for(table: &CodeTable, aa: &AminoAcid) -> Vec<Codon> {
        Codon::all()
            .into_iter()
            .filter(|c| table.translate(c) == aa)
            .collect()
    }

    #[test]
    fn test_all_advertised_tables_registered() {
        let registry = CodeTableRegistry::new();
        assert_eq!(
            registry.ids(),
            vec![1, 2, 3, 4, 5, 6, 9, 10, 11, 12, 13, 14, 15, 16, 21, 22, 23, 24, 25, 1001]
        );
    }

    #[test]
    fn test_standard_code_translation() {
        let registry = CodeTableRegistry::new();
        let aa = |text: &str| registry.translate(STANDARD_TABLE, &codon(text)).unwrap();
        assert_eq!(aa("ATG"), AminoAcid::new("M"));
        assert_eq!(aa("TGG"), AminoAcid::new("W"));
        assert_eq!(aa("TAA"), AminoAcid::stop());
        assert_eq!(aa("TAG"), AminoAcid::stop());
        assert_eq!(aa("TGA"), AminoAcid::stop());
        assert_eq!(aa("TTT"), AminoAcid::new("F"));
        assert_eq!(aa("GGG"), AminoAcid::new("G"));
    }

    #[test]
    fn test_different_genetic_codes() {
        let registry = CodeTableRegistry::new();
        assert_eq!(
            registry.translate(2, &codon("TGA")).unwrap(),
            AminoAcid::new("W")
        );
        assert_eq!(
            registry.translate(2, &codon("AGA")).unwrap(),
            AminoAcid::stop()
        );
        assert_eq!(
            registry.translate(3, &codon("CTT")).unwrap(),
            AminoAcid::new("T")
        );
        assert_eq!(
            registry.translate(6, &codon("TAA")).unwrap(),
            AminoAcid::new("Q")
        );
        assert_eq!(
            registry.translate(25, &codon("TGA")).unwrap(),
            AminoAcid::new("G")
        );
    }

    #[test]
    fn test_uag_reassignment() {
        let registry = CodeTableRegistry::new();
        let table = registry.get(STANDARD_UAG_REASSIGNED_TABLE).unwrap();
        assert_eq!(table.translate(&codon("TAG")), &AminoAcid::new("U"));
        assert_eq!(table.translate(&codon("TAA")), &AminoAcid::stop());
        assert_eq!(table.alphabet().len(), 22);
        assert_eq!(table.label(), "1001: Standard Code With UAG Codon Reassignment");
    }

    #[test]
    fn test_standard_alphabet() {
        let registry = CodeTableRegistry::new();
        let table = registry.get(STANDARD_TABLE).unwrap();
        let codes: String = table.alphabet().iter().map(|aa| aa.code()).collect();
        assert_eq!(codes, "ACDEFGHIKLMNPQRSTVWY*");
        assert_eq!(codons_for(table, &AminoAcid::new("M")), vec![codon("ATG")]);
        assert_eq!(codons_for(table, &AminoAcid::new("L")).len(), 6);
    }

    #[test]
    fn test_every_table_is_total() {
        let registry = CodeTableRegistry::new();
        for table in registry.tables() {
            let total: usize = table
                .alphabet()
                .iter()
                .map(|aa| codons_for(table, aa).len())
                .sum();
            assert_eq!(total, 64, "table {}", table.id());
        }
    }

    #[test]
    fn test_unsupported_table() {
        let registry = CodeTableRegistry::new();
        let err = registry.get(999).unwrap_err();
        assert_eq!(err.code, ErrorCode::UnsupportedTable);
        assert!(registry.translate(7, &codon("ATG")).is_err());
    }

    #[test]
    fn test_codes_outside_canonical_order_map_to_their_own_slot() {
        let ncbieaa = format!("{}{}", "X".repeat(35), "M".repeat(29));
        let table = CodeTable::from_ncbieaa(900, "Custom", &ncbieaa).unwrap();
        assert_eq!(table.alphabet().len(), 2);
        assert_eq!(table.translate(&codon("TTT")), &AminoAcid::new("X"));
        assert_eq!(table.translate(&codon("ATG")), &AminoAcid::new("M"));
        assert_eq!(table.alphabet_index(&AminoAcid::new("X")), Some(1));
    }

    #[test]
    fn test_wrong_length_rejected() {
        assert!(CodeTable::from_ncbieaa(99, "Short", "FFLL").is_err());
    }
}
