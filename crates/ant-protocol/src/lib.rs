//! Machine-readable contracts shared by the ANT library and its front ends.

use serde::{Deserialize, Serialize};

pub const PROTOCOL_VERSION: &str = "v1";

/// What a caller asks the solver to do
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum SolveRequest {
    /// Find the best degenerate codon for a set of amino acids
    Targets {
        amino_acids: Vec<String>,
        #[serde(default = "default_table_id")]
        table_id: u16,
    },
    /// Evaluate a typed degenerate codon, eg "NNK"
    Codon {
        codon: String,
        #[serde(default = "default_table_id")]
        table_id: u16,
    },
}

impl SolveRequest {
    pub fn table_id(&self) -> u16 {
        match self {
            SolveRequest::Targets { table_id, .. } | SolveRequest::Codon { table_id, .. } => {
                *table_id
            }
        }
    }

    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}

fn default_table_id() -> u16 {
    1
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableDescriptor {
    pub id: u16,
    pub name: String,
    pub alphabet: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Capabilities {
    pub protocol_version: String,
    pub supported_requests: Vec<String>,
    pub report_formats: Vec<String>,
    pub tables: Vec<TableDescriptor>,
}
