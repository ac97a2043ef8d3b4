use genetic_code::CodeTableRegistry;
use lazy_static::lazy_static;

pub mod about;
pub mod amino_acids;
pub mod codon;
pub mod error;
pub mod genetic_code;
pub mod iupac_code;
pub mod report;
pub mod selection;
pub mod settings;
pub mod solver;

pub use ant_protocol::{Capabilities, SolveRequest, TableDescriptor, PROTOCOL_VERSION};

lazy_static! {
    // Genetic code tables, keyed by NCBI id
    pub static ref GENETIC_CODES: CodeTableRegistry = CodeTableRegistry::new();
}

pub fn capabilities() -> Capabilities {
    Capabilities {
        protocol_version: PROTOCOL_VERSION.to_string(),
        supported_requests: vec!["targets".to_string(), "codon".to_string()],
        report_formats: vec!["text".to_string(), "csv".to_string(), "json".to_string()],
        tables: GENETIC_CODES.tables().map(|t| t.descriptor()).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capabilities_list_every_table() {
        let caps = capabilities();
        assert_eq!(caps.protocol_version, "v1");
        assert_eq!(caps.tables.len(), 20);
        assert_eq!(caps.tables[0].name, "Standard Code");
        assert!(caps.tables[19].alphabet.contains(&"U".to_string()));
    }
}
