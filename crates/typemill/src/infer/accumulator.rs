//! Incremental per-column evidence accumulation.

use std::collections::HashSet;

use crate::schema::{TypeCandidate, ALL_CANDIDATES};

use super::recognize::{is_missing, RecognizerSet};

/// Accumulated match/missing/distinct statistics for one column.
///
/// Produced by [`ColumnAccumulator::finalize`] and immutable from then on.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnEvidence {
    /// Total sampled cells, missing included.
    pub sampled: usize,
    /// Missing cells; they never count toward any candidate.
    pub missing: usize,
    /// Distinct non-missing string forms observed, capped.
    pub distinct_count: usize,
    /// False once the distinct cap was exceeded; Category is then
    /// permanently ineligible for this column.
    pub category_eligible: bool,
    /// First non-missing values in row order, bounded.
    pub preview: Vec<String>,
    match_counts: [usize; ALL_CANDIDATES.len()],
}

impl ColumnEvidence {
    /// Number of non-missing sampled cells.
    pub fn non_missing(&self) -> usize {
        self.sampled - self.missing
    }

    /// Match count for a candidate. String matches everything by definition;
    /// Category carries no per-cell count.
    pub fn matches(&self, candidate: TypeCandidate) -> usize {
        match candidate {
            TypeCandidate::String => self.non_missing(),
            TypeCandidate::Category => 0,
            other => self.match_counts[other.precedence()],
        }
    }

    /// Match ratio for a candidate over non-missing cells; 0.0 for a fully
    /// missing column.
    pub fn match_ratio(&self, candidate: TypeCandidate) -> f64 {
        let non_missing = self.non_missing();
        if non_missing == 0 {
            0.0
        } else {
            self.matches(candidate) as f64 / non_missing as f64
        }
    }
}

/// Consumes sampled cells for one column and accumulates type evidence in a
/// single pass with bounded memory.
#[derive(Debug)]
pub struct ColumnAccumulator {
    sampled: usize,
    missing: usize,
    match_counts: [usize; ALL_CANDIDATES.len()],
    distinct: HashSet<String>,
    category_cap: usize,
    category_eligible: bool,
    preview: Vec<String>,
    preview_len: usize,
}

impl ColumnAccumulator {
    /// Create an accumulator with the given distinct cap and preview bound.
    pub fn new(category_cap: usize, preview_len: usize) -> Self {
        Self {
            sampled: 0,
            missing: 0,
            match_counts: [0; ALL_CANDIDATES.len()],
            distinct: HashSet::new(),
            category_cap,
            category_eligible: true,
            preview: Vec::with_capacity(preview_len),
            preview_len,
        }
    }

    /// Observe one sampled cell, in row order.
    pub fn observe(&mut self, cell: &str, recognizers: &RecognizerSet) {
        self.sampled += 1;

        if is_missing(cell) {
            self.missing += 1;
            return;
        }

        let trimmed = cell.trim();

        if self.preview.len() < self.preview_len {
            self.preview.push(trimmed.to_string());
        }

        // A single cell may match several candidates ("5" is Integer, Float,
        // and in the default vocabulary Boolean).
        for candidate in ALL_CANDIDATES {
            if candidate.is_cell_recognized() && recognizers.matches(candidate, trimmed) {
                self.match_counts[candidate.precedence()] += 1;
            }
        }

        // Bounded distinct tracking: once the cap is exceeded the set stops
        // growing and Category stays ineligible for good.
        if self.category_eligible {
            if self.distinct.len() < self.category_cap || self.distinct.contains(trimmed) {
                self.distinct.insert(trimmed.to_string());
            } else {
                self.category_eligible = false;
                self.distinct.clear();
            }
        }
    }

    /// Freeze the accumulated state into immutable evidence.
    pub fn finalize(self) -> ColumnEvidence {
        ColumnEvidence {
            sampled: self.sampled,
            missing: self.missing,
            distinct_count: self.distinct.len(),
            category_eligible: self.category_eligible,
            preview: self.preview,
            match_counts: self.match_counts,
        }
    }
}
