//! Plain-text, CSV and JSON renderings of a solver result.

use crate::{
    amino_acids::AminoAcid,
    codon::DegenerateCodon,
    error::{AntError, ErrorCode},
    solver::SolverResult,
};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

pub const NO_SELECTION: &str = "No selection has been made.";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReportFormat {
    #[default]
    Text,
    Csv,
    Json,
}

impl ReportFormat {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "text" | "txt" => Some(Self::Text),
            "csv" => Some(Self::Csv),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

fn list(amino_acids: &BTreeSet<AminoAcid>) -> String {
    if amino_acids.is_empty() {
        return "none".to_string();
    }
    amino_acids.iter().map(|aa| aa.label()).join(", ")
}

fn category(result: &SolverResult, aa: &AminoAcid) -> &'static str {
    if result.target().contains(aa) {
        "target"
    } else if result.offtarget().contains(aa) {
        "offtarget"
    } else if result.possible().contains(aa) {
        "possible"
    } else {
        "none"
    }
}

/// Text rendering of a result that has a chosen codon
struct TextReport<'a> {
    result: &'a SolverResult,
    codon: &'a DegenerateCodon,
}

impl fmt::Display for TextReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let result = self.result;
        writeln!(f, "Degenerate codon: {}", self.codon)?;
        writeln!(
            f,
            "Genetic code: {}: {}",
            result.table_id(),
            result.table_name()
        )?;
        for (num, code) in self.codon.positions().iter().enumerate() {
            let bases = code.expand().iter().map(|b| b.letter() as char).join(", ");
            writeln!(f, "Position {}: {code} = {bases}", num + 1)?;
        }
        let codons = self.codon.codons();
        writeln!(
            f,
            "Encoded codons: {} ({})",
            codons.len(),
            codons.iter().join(", ")
        )?;
        writeln!(f, "Target amino acids: {}", list(result.target()))?;
        writeln!(f, "Off-target amino acids: {}", list(result.offtarget()))?;
        writeln!(f, "Possible amino acids: {}", list(result.possible()))?;
        writeln!(f, "Codons per amino acid:")?;
        for (aa, count) in result.codons_per_aa() {
            writeln!(f, "  {}: {count}", aa.label())?;
        }
        Ok(())
    }
}

/// Clipboard text for a result. Same result, same bytes.
pub fn render(result: &SolverResult) -> String {
    match result.chosen() {
        Some(codon) => TextReport { result, codon }.to_string(),
        None => NO_SELECTION.to_string(),
    }
}

/// One row per amino acid of the table
pub fn render_csv(result: &SolverResult) -> Result<String, AntError> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(["amino_acid", "three_letter", "name", "codons", "category"])?;
    for (aa, count) in result.codons_per_aa() {
        wtr.write_record([
            aa.code(),
            aa.three_letter(),
            aa.full_name(),
            count.to_string().as_str(),
            category(result, aa),
        ])?;
    }
    let bytes = wtr
        .into_inner()
        .map_err(|e| AntError::new(ErrorCode::Internal, e.to_string()))?;
    String::from_utf8(bytes)
        .map_err(|e| AntError::new(ErrorCode::Internal, e.to_string()))
}

pub fn render_json(result: &SolverResult) -> Result<String, AntError> {
    serde_json::to_string_pretty(result).map_err(|e| {
        AntError::new(
            ErrorCode::Internal,
            format!("Could not serialize result: {e}"),
        )
    })
}

pub fn render_as(result: &SolverResult, format: ReportFormat) -> Result<String, AntError> {
    match format {
        ReportFormat::Text => Ok(render(result)),
        ReportFormat::Csv => render_csv(result),
        ReportFormat::Json => render_json(result),
    }
}
