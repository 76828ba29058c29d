//! Column and file level inference reports.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{Result, TypemillError};

use super::types::TypeCandidate;

/// Inference outcome for a single column.
///
/// `inferred` is never mutated after the job completes; a later user override
/// is recorded alongside it so the original decision stays auditable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnReport {
    /// Column name from the header.
    pub name: String,
    /// Zero-based position in the original column order.
    pub position: usize,
    /// Inferred data type.
    pub inferred: TypeCandidate,
    /// Match ratio of the selected candidate (0.0-1.0).
    pub confidence: f64,
    /// Sampled cells for this column, including missing ones.
    pub sampled: usize,
    /// Missing cells among the sampled ones.
    pub missing: usize,
    /// First non-missing values, in row order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub preview: Vec<String>,
    /// User-declared type override, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub r#override: Option<TypeCandidate>,
}

impl ColumnReport {
    /// The type consumers should use: the override when present, otherwise
    /// the inferred type.
    pub fn effective_type(&self) -> TypeCandidate {
        self.r#override.unwrap_or(self.inferred)
    }

    /// Fraction of sampled cells that were missing.
    pub fn missing_ratio(&self) -> f64 {
        if self.sampled == 0 {
            0.0
        } else {
            self.missing as f64 / self.sampled as f64
        }
    }
}

/// Complete inference report for one file, columns in original order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileReport {
    /// Source file name without path.
    pub file: String,
    /// Per-column reports, ordered by original column position.
    pub columns: Vec<ColumnReport>,
    /// Number of data rows actually sampled.
    pub row_count: usize,
    /// Number of columns.
    pub column_count: usize,
    /// Wall-clock processing time in seconds.
    pub processing_time: f64,
    /// When the inference was performed.
    pub inferred_at: DateTime<Utc>,
}

impl FileReport {
    /// Find a column report by name.
    pub fn column(&self, name: &str) -> Option<&ColumnReport> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Mutable lookup by name.
    pub fn column_mut(&mut self, name: &str) -> Option<&mut ColumnReport> {
        self.columns.iter_mut().find(|c| c.name == name)
    }

    /// Effective type per column, overrides applied. Keyed by name, in
    /// original column order.
    pub fn effective_types(&self) -> IndexMap<String, TypeCandidate> {
        self.columns
            .iter()
            .map(|c| (c.name.clone(), c.effective_type()))
            .collect()
    }

    /// Save the report to a JSON file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|e| TypemillError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        serde_json::to_writer_pretty(BufWriter::new(file), self)?;
        Ok(())
    }

    /// Load a report from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| TypemillError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        let report = serde_json::from_reader(BufReader::new(file))?;
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_report() -> FileReport {
        FileReport {
            file: "data.csv".to_string(),
            columns: vec![ColumnReport {
                name: "age".to_string(),
                position: 0,
                inferred: TypeCandidate::Integer,
                confidence: 1.0,
                sampled: 3,
                missing: 1,
                preview: vec!["5".to_string(), "7".to_string()],
                r#override: None,
            }],
            row_count: 3,
            column_count: 1,
            processing_time: 0.01,
            inferred_at: Utc::now(),
        }
    }

    #[test]
    fn test_effective_type_prefers_override() {
        let mut report = sample_report();
        assert_eq!(report.columns[0].effective_type(), TypeCandidate::Integer);

        report.columns[0].r#override = Some(TypeCandidate::String);
        assert_eq!(report.columns[0].effective_type(), TypeCandidate::String);
        // The original inference is untouched.
        assert_eq!(report.columns[0].inferred, TypeCandidate::Integer);
    }

    #[test]
    fn test_effective_types_reflects_overrides_in_order() {
        let mut report = sample_report();
        report.columns.push(ColumnReport {
            name: "label".to_string(),
            position: 1,
            inferred: TypeCandidate::String,
            confidence: 1.0,
            sampled: 3,
            missing: 0,
            preview: vec![],
            r#override: Some(TypeCandidate::Category),
        });

        let types = report.effective_types();
        assert_eq!(
            types.into_iter().collect::<Vec<_>>(),
            vec![
                ("age".to_string(), TypeCandidate::Integer),
                ("label".to_string(), TypeCandidate::Category),
            ]
        );
    }

    #[test]
    fn test_missing_ratio() {
        let report = sample_report();
        assert!((report.columns[0].missing_ratio() - 1.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_save_load_round_trip() {
        let report = sample_report();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");
        report.save(&path).unwrap();
        let back = FileReport::load(&path).unwrap();
        assert_eq!(back, report);
    }
}
