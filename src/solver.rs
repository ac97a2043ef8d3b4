//! Degenerate codon search.
//!
//! Every one of the 15^3 candidate codons is translated once per call and kept
//! as a bitmask over the table's amino acid alphabet. A search is then a scan
//! over those masks for the candidate that covers the target with the fewest
//! off-target amino acids, then the fewest concrete codons, then the
//! alphabetically smallest codon text.

use crate::{
    amino_acids::AminoAcid,
    codon::DegenerateCodon,
    error::{AntError, ErrorCode},
    genetic_code::{CodeTable, CodeTableRegistry, TableId},
    report, GENETIC_CODES,
};
use ant_protocol::SolveRequest;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

/// Set of amino acids, as bits indexing `CodeTable::alphabet()`
type AaMask = u64;

#[inline(always)]
fn bit(idx: usize) -> AaMask {
    1 << idx
}

#[derive(Clone, Copy, Debug)]
struct CandidateProfile {
    codon: DegenerateCodon,
    translated: AaMask,
    codon_count: usize,
}

impl CandidateProfile {
    #[inline(always)]
    fn covers(&self, target: AaMask) -> bool {
        self.translated & target == target
    }

    #[inline(always)]
    fn offtarget_count(&self, target: AaMask) -> u32 {
        (self.translated & !target).count_ones()
    }
}

/// All candidates translated under one table
struct CandidateSpace<'a> {
    table: &'a CodeTable,
    profiles: Vec<CandidateProfile>,
}

impl<'a> CandidateSpace<'a> {
    fn new(table: &'a CodeTable) -> Self {
        let profiles = DegenerateCodon::all()
            .map(|codon| CandidateProfile {
                codon,
                translated: translated_mask(table, &codon),
                codon_count: codon.codon_count(),
            })
            .collect();
        Self { table, profiles }
    }

    /// Best covering candidate; `profiles` is in tie-break order, so the first minimum wins
    fn search(&self, target: AaMask) -> Option<&CandidateProfile> {
        let mut best: Option<(&CandidateProfile, (u32, usize))> = None;
        for profile in self.profiles.iter().filter(|p| p.covers(target)) {
            let key = (profile.offtarget_count(target), profile.codon_count);
            if best.is_none_or(|(_, best_key)| key < best_key) {
                best = Some((profile, key));
            }
        }
        best.map(|(profile, _)| profile)
    }

    /// Amino acids outside `target` and `offtarget` whose addition keeps the
    /// winner's off-target count at or below `baseline`
    fn possible(&self, target: AaMask, offtarget: AaMask, baseline: u32) -> AaMask {
        (0..self.table.alphabet().len())
            .map(bit)
            .filter(|aa| (target | offtarget) & aa == 0)
            .filter(|aa| {
                let extended = target | aa;
                self.search(extended)
                    .is_some_and(|winner| winner.offtarget_count(extended) <= baseline)
            })
            .fold(0, |acc, aa| acc | aa)
    }
}

fn translated_mask(table: &CodeTable, codon: &DegenerateCodon) -> AaMask {
    codon
        .codons()
        .iter()
        .fold(0, |mask, c| mask | bit(table.aa_index(c)))
}

fn mask_to_set(table: &CodeTable, mask: AaMask) -> BTreeSet<AminoAcid> {
    table
        .alphabet()
        .iter()
        .enumerate()
        .filter(|(idx, _)| mask & bit(*idx) != 0)
        .map(|(_, aa)| aa.to_owned())
        .collect()
}

fn set_to_mask(table: &CodeTable, amino_acids: &BTreeSet<AminoAcid>) -> Result<AaMask, AntError> {
    amino_acids.iter().try_fold(0, |mask, aa| {
        let idx = table.alphabet_index(aa).ok_or_else(|| {
            AntError::new(
                ErrorCode::UnknownAminoAcid,
                format!(
                    "Amino acid '{aa}' is not encoded by genetic code {}",
                    table.id()
                ),
            )
        })?;
        Ok(mask | bit(idx))
    })
}

fn codons_per_aa(table: &CodeTable, codon: &DegenerateCodon) -> BTreeMap<AminoAcid, usize> {
    let mut counts: BTreeMap<AminoAcid, usize> = table
        .alphabet()
        .iter()
        .map(|aa| (aa.to_owned(), 0))
        .collect();
    for concrete in codon.codons() {
        if let Some(count) = counts.get_mut(table.translate(&concrete)) {
            *count += 1;
        }
    }
    counts
}

/// Outcome of one solver call. Never changed after construction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolverResult {
    table_id: TableId,
    table_name: String,
    target: BTreeSet<AminoAcid>,
    chosen: Option<DegenerateCodon>,
    offtarget: BTreeSet<AminoAcid>,
    possible: BTreeSet<AminoAcid>,
    codons_per_aa: BTreeMap<AminoAcid, usize>,
    report: String,
}

impl SolverResult {
    /// The "nothing selected" state: no codon, empty sets, all counts zero
    pub fn empty(table: &CodeTable) -> Self {
        let mut ret = Self {
            table_id: table.id(),
            table_name: table.name().to_string(),
            target: BTreeSet::new(),
            chosen: None,
            offtarget: BTreeSet::new(),
            possible: BTreeSet::new(),
            codons_per_aa: table.alphabet().iter().map(|aa| (aa.to_owned(), 0)).collect(),
            report: String::new(),
        };
        ret.report = report::render(&ret);
        ret
    }

    fn from_mask_sets(
        table: &CodeTable,
        chosen: DegenerateCodon,
        target: AaMask,
        offtarget: AaMask,
        possible: AaMask,
    ) -> Self {
        let mut ret = Self {
            table_id: table.id(),
            table_name: table.name().to_string(),
            target: mask_to_set(table, target),
            chosen: Some(chosen),
            offtarget: mask_to_set(table, offtarget),
            possible: mask_to_set(table, possible),
            codons_per_aa: codons_per_aa(table, &chosen),
            report: String::new(),
        };
        ret.report = report::render(&ret);
        ret
    }

    pub fn table_id(&self) -> TableId {
        self.table_id
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    pub fn target(&self) -> &BTreeSet<AminoAcid> {
        &self.target
    }

    pub fn chosen(&self) -> Option<&DegenerateCodon> {
        self.chosen.as_ref()
    }

    pub fn offtarget(&self) -> &BTreeSet<AminoAcid> {
        &self.offtarget
    }

    pub fn possible(&self) -> &BTreeSet<AminoAcid> {
        &self.possible
    }

    pub fn codons_per_aa(&self) -> &BTreeMap<AminoAcid, usize> {
        &self.codons_per_aa
    }

    pub fn codon_count(&self, aa: &AminoAcid) -> usize {
        self.codons_per_aa.get(aa).copied().unwrap_or(0)
    }

    pub fn report(&self) -> &str {
        &self.report
    }

    pub fn is_empty(&self) -> bool {
        self.chosen.is_none()
    }
}

/// Finds degenerate codons against the tables of a registry
#[derive(Clone, Copy, Debug)]
pub struct DegenerateCodonSolver<'a> {
    registry: &'a CodeTableRegistry,
}

impl Default for DegenerateCodonSolver<'static> {
    fn default() -> Self {
        Self::new(&GENETIC_CODES)
    }
}

impl<'a> DegenerateCodonSolver<'a> {
    pub fn new(registry: &'a CodeTableRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &'a CodeTableRegistry {
        self.registry
    }

    /// Best degenerate codon encoding every amino acid of `target`
    pub fn solve_for_targets(
        &self,
        target: &BTreeSet<AminoAcid>,
        table_id: TableId,
    ) -> Result<SolverResult, AntError> {
        let table = self.registry.get(table_id)?;
        if target.is_empty() {
            return Err(AntError::new(
                ErrorCode::EmptyTarget,
                "At least one target amino acid is required",
            ));
        }
        let target_mask = set_to_mask(table, target)?;

        let space = CandidateSpace::new(table);
        let winner = *space.search(target_mask).ok_or_else(|| {
            AntError::new(
                ErrorCode::Internal,
                format!("No degenerate codon covers the target in genetic code {table_id}"),
            )
        })?;
        let offtarget_mask = winner.translated & !target_mask;
        let possible_mask = space.possible(
            target_mask,
            offtarget_mask,
            winner.offtarget_count(target_mask),
        );

        debug!(
            table_id,
            codon = %winner.codon,
            offtarget = offtarget_mask.count_ones(),
            possible = possible_mask.count_ones(),
            "solved degenerate codon for targets"
        );
        Ok(SolverResult::from_mask_sets(
            table,
            winner.codon,
            target_mask,
            offtarget_mask,
            possible_mask,
        ))
    }

    /// Evaluates a typed degenerate codon; its translation becomes the target
    pub fn solve_for_codon(
        &self,
        codon_text: &str,
        table_id: TableId,
    ) -> Result<SolverResult, AntError> {
        let codon = DegenerateCodon::parse(codon_text)?;
        let table = self.registry.get(table_id)?;

        let space = CandidateSpace::new(table);
        let target_mask = translated_mask(table, &codon);
        let baseline = space
            .search(target_mask)
            .map(|winner| winner.offtarget_count(target_mask))
            .unwrap_or(0);
        let possible_mask = space.possible(target_mask, 0, baseline);

        debug!(
            table_id,
            codon = %codon,
            encoded = target_mask.count_ones(),
            possible = possible_mask.count_ones(),
            "evaluated degenerate codon"
        );
        Ok(SolverResult::from_mask_sets(
            table,
            codon,
            target_mask,
            0,
            possible_mask,
        ))
    }

    /// Solves `target` under every registered table that can encode all of it, in table id order
    pub fn compare_tables(
        &self,
        target: &BTreeSet<AminoAcid>,
    ) -> Result<Vec<SolverResult>, AntError> {
        let tables: Vec<&CodeTable> = self
            .registry
            .tables()
            .filter(|table| target.iter().all(|aa| table.alphabet_index(aa).is_some()))
            .collect();
        tables
            .par_iter()
            .map(|table| self.solve_for_targets(target, table.id()))
            .collect()
    }

    pub fn solve_request(&self, request: &SolveRequest) -> Result<SolverResult, AntError> {
        match request {
            SolveRequest::Targets {
                amino_acids,
                table_id,
            } => {
                let target: BTreeSet<AminoAcid> = amino_acids
                    .iter()
                    .map(|code| AminoAcid::new(code))
                    .collect();
                self.solve_for_targets(&target, *table_id)
            }
            SolveRequest::Codon { codon, table_id } => self.solve_for_codon(codon, *table_id),
        }
    }
}
