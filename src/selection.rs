//! The user's current selection: which amino acids are targeted, under which
//! genetic code, and the result they produced.
//!
//! Every action re-runs the solver and swaps the whole result; nothing derived
//! from a result is updated in place.

use crate::{
    amino_acids::AminoAcid,
    error::AntError,
    genetic_code::TableId,
    report::NO_SELECTION,
    solver::{DegenerateCodonSolver, SolverResult},
};
use std::collections::BTreeSet;
use tracing::{info, warn};

#[derive(Clone, Debug)]
pub struct CodonSelection<'a> {
    solver: DegenerateCodonSolver<'a>,
    table_id: TableId,
    targets: BTreeSet<AminoAcid>,
    result: SolverResult,
}

impl<'a> CodonSelection<'a> {
    pub fn new(solver: DegenerateCodonSolver<'a>, table_id: TableId) -> Result<Self, AntError> {
        let table = solver.registry().get(table_id)?;
        Ok(Self {
            solver,
            table_id,
            targets: BTreeSet::new(),
            result: SolverResult::empty(table),
        })
    }

    pub fn table_id(&self) -> TableId {
        self.table_id
    }

    pub fn targets(&self) -> &BTreeSet<AminoAcid> {
        &self.targets
    }

    pub fn result(&self) -> &SolverResult {
        &self.result
    }

    /// Adds `aa` to the targets, or removes it if already targeted
    pub fn toggle(&mut self, aa: AminoAcid) -> Result<&SolverResult, AntError> {
        let mut targets = self.targets.clone();
        if !targets.remove(&aa) {
            targets.insert(aa);
        }
        self.resolve(self.table_id, targets)
    }

    pub fn reset(&mut self) -> Result<&SolverResult, AntError> {
        self.resolve(self.table_id, BTreeSet::new())
    }

    /// Re-solves the current targets under another genetic code.
    /// Targets the new code cannot encode are dropped.
    pub fn set_table(&mut self, table_id: TableId) -> Result<&SolverResult, AntError> {
        let table = self.solver.registry().get(table_id)?;
        let (kept, dropped): (BTreeSet<AminoAcid>, BTreeSet<AminoAcid>) = self
            .targets
            .iter()
            .cloned()
            .partition(|aa| table.alphabet_index(aa).is_some());
        if !dropped.is_empty() {
            warn!(
                table_id,
                dropped = ?dropped.iter().map(|aa| aa.code()).collect::<Vec<_>>(),
                "genetic code cannot encode some targets, dropping them"
            );
        }
        self.resolve(table_id, kept)
    }

    /// Replaces the selection by what a typed degenerate codon encodes
    pub fn evaluate_codon(&mut self, codon_text: &str) -> Result<&SolverResult, AntError> {
        let result = self.solver.solve_for_codon(codon_text, self.table_id)?;
        self.targets = result.target().clone();
        self.result = result;
        Ok(&self.result)
    }

    pub fn clipboard_text(&self) -> &str {
        if self.result.is_empty() {
            NO_SELECTION
        } else {
            self.result.report()
        }
    }

    fn resolve(
        &mut self,
        table_id: TableId,
        targets: BTreeSet<AminoAcid>,
    ) -> Result<&SolverResult, AntError> {
        let result = if targets.is_empty() {
            SolverResult::empty(self.solver.registry().get(table_id)?)
        } else {
            self.solver.solve_for_targets(&targets, table_id)?
        };
        info!(
            table_id,
            targets = targets.len(),
            codon = %result.chosen().map(|c| c.to_string()).unwrap_or_default(),
            "selection updated"
        );
        self.table_id = table_id;
        self.targets = result.target().clone();
        self.result = result;
        Ok(&self.result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        error::ErrorCode,
        genetic_code::{STANDARD_TABLE, STANDARD_UAG_REASSIGNED_TABLE},
    };

    fn selection() -> CodonSelection<'static> {
        CodonSelection::new(DegenerateCodonSolver::default(), STANDARD_TABLE).unwrap()
    }

    #[test]
    fn test_toggle_adds_and_removes() {
        let mut sel = selection();
        assert!(sel.result().is_empty());
        sel.toggle(AminoAcid::new("M")).unwrap();
        assert_eq!(sel.result().chosen().unwrap().to_string(), "ATG");
        sel.toggle(AminoAcid::new("W")).unwrap();
        assert_eq!(sel.result().chosen().unwrap().to_string(), "WKG");
        sel.toggle(AminoAcid::new("M")).unwrap();
        assert_eq!(sel.result().chosen().unwrap().to_string(), "TGG");
        sel.toggle(AminoAcid::new("W")).unwrap();
        assert!(sel.result().is_empty());
        assert!(sel.targets().is_empty());
        assert_eq!(sel.clipboard_text(), NO_SELECTION);
    }

    #[test]
    fn test_reset() {
        let mut sel = selection();
        sel.toggle(AminoAcid::new("K")).unwrap();
        sel.reset().unwrap();
        assert!(sel.result().is_empty());
        assert!(sel.targets().is_empty());
    }

    #[test]
    fn test_set_table_drops_unencodable_targets() {
        let mut sel = CodonSelection::new(
            DegenerateCodonSolver::default(),
            STANDARD_UAG_REASSIGNED_TABLE,
        )
        .unwrap();
        sel.toggle(AminoAcid::new("U")).unwrap();
        sel.toggle(AminoAcid::new("W")).unwrap();
        assert_eq!(sel.targets().len(), 2);

        sel.set_table(STANDARD_TABLE).unwrap();
        assert_eq!(sel.table_id(), STANDARD_TABLE);
        assert_eq!(sel.result().chosen().unwrap().to_string(), "TGG");
        assert_eq!(sel.targets().len(), 1);
    }

    #[test]
    fn test_set_unknown_table_keeps_state() {
        let mut sel = selection();
        sel.toggle(AminoAcid::new("M")).unwrap();
        let before = sel.result().clone();
        assert_eq!(sel.set_table(999).unwrap_err().code, ErrorCode::UnsupportedTable);
        assert_eq!(sel.result(), &before);
        assert_eq!(sel.table_id(), STANDARD_TABLE);
    }

    #[test]
    fn test_evaluate_codon() {
        let mut sel = selection();
        sel.evaluate_codon("nnk").unwrap();
        assert_eq!(sel.targets().len(), 21);
        assert!(sel.clipboard_text().starts_with("Degenerate codon: NNK"));
        assert_eq!(
            sel.evaluate_codon("ATX").unwrap_err().code,
            ErrorCode::InvalidCodonFormat
        );
        assert_eq!(sel.targets().len(), 21);
    }
}
