//! Single-pass inference over one file.

use std::path::Path;
use std::time::Instant;

use chrono::Utc;
use tracing::debug;

use crate::config::InferenceConfig;
use crate::error::{Result, TypemillError};
use crate::input::RowSampler;
use crate::schema::{ColumnReport, FileReport};

use super::accumulator::ColumnAccumulator;
use super::recognize::RecognizerSet;
use super::resolver::TypeResolver;

/// Observer invoked once per row batch during a run.
///
/// Returning `false` stops the run at that checkpoint; the engine surfaces
/// this as a `Cancelled` error. The worker uses this hook for heartbeats and
/// cooperative cancellation.
pub trait Checkpoint {
    fn observe(&self, rows_seen: usize) -> bool;
}

/// Checkpoint that never cancels.
pub struct NoCheckpoint;

impl Checkpoint for NoCheckpoint {
    fn observe(&self, _rows_seen: usize) -> bool {
        true
    }
}

/// Orchestrates sampler, accumulators, and resolver for one file.
pub struct InferenceEngine {
    config: InferenceConfig,
}

impl InferenceEngine {
    /// Create an engine with default configuration.
    pub fn new() -> Self {
        Self::with_config(InferenceConfig::default())
    }

    /// Create an engine with custom configuration.
    pub fn with_config(config: InferenceConfig) -> Self {
        Self { config }
    }

    /// The active configuration.
    pub fn config(&self) -> &InferenceConfig {
        &self.config
    }

    /// Infer column types for a file.
    pub fn run(&self, path: impl AsRef<Path>) -> Result<FileReport> {
        self.run_with_checkpoint(path, &NoCheckpoint)
    }

    /// Infer column types, invoking `checkpoint` once per row batch.
    ///
    /// Streams sampled rows once through one accumulator per column; memory
    /// stays proportional to the column count, never the file size. Any
    /// failure aborts the whole run; a partial report is never produced.
    pub fn run_with_checkpoint(
        &self,
        path: impl AsRef<Path>,
        checkpoint: &dyn Checkpoint,
    ) -> Result<FileReport> {
        let path = path.as_ref();
        let started = Instant::now();

        let mut sampler = RowSampler::open(path, &self.config)?;
        let headers: Vec<String> = sampler.headers().to_vec();

        let recognizers = RecognizerSet::new(&self.config);
        let mut accumulators: Vec<ColumnAccumulator> = headers
            .iter()
            .map(|_| ColumnAccumulator::new(self.config.category_cap, self.config.preview_len))
            .collect();

        let batch = self.config.batch_size.max(1);
        let mut rows = 0usize;
        for row in &mut sampler {
            let row = row?;
            for (accumulator, cell) in accumulators.iter_mut().zip(row.iter()) {
                accumulator.observe(cell, &recognizers);
            }
            rows += 1;

            if rows % batch == 0 && !checkpoint.observe(rows) {
                return Err(TypemillError::Cancelled(format!(
                    "stopped at row-batch checkpoint after {rows} rows"
                )));
            }
        }

        if rows == 0 {
            return Err(TypemillError::EmptyFile(
                "file has a header but zero data rows".to_string(),
            ));
        }

        let resolver = TypeResolver::new(&self.config);
        let columns: Vec<ColumnReport> = headers
            .iter()
            .zip(accumulators)
            .enumerate()
            .map(|(position, (name, accumulator))| {
                let evidence = accumulator.finalize();
                let (inferred, confidence) = resolver.resolve(&evidence);
                ColumnReport {
                    name: name.clone(),
                    position,
                    inferred,
                    confidence,
                    sampled: evidence.sampled,
                    missing: evidence.missing,
                    preview: evidence.preview,
                    r#override: None,
                }
            })
            .collect();

        let processing_time = started.elapsed().as_secs_f64();
        debug!(
            file = %path.display(),
            rows,
            columns = columns.len(),
            elapsed_s = processing_time,
            "inference complete"
        );

        Ok(FileReport {
            file: path
                .file_name()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default(),
            column_count: columns.len(),
            columns,
            row_count: rows,
            processing_time,
            inferred_at: Utc::now(),
        })
    }
}

impl Default for InferenceEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use tempfile::NamedTempFile;

    use crate::schema::TypeCandidate;

    use super::*;

    fn write_file(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_run_mixed_columns() {
        let file = write_file(
            "age,score,active\n\
             5,1.5,true\n\
             ,2.5,false\n\
             7,,yes\n",
        );
        let engine = InferenceEngine::new();
        let report = engine.run(file.path()).unwrap();

        assert_eq!(report.row_count, 3);
        assert_eq!(report.column_count, 3);

        let age = report.column("age").unwrap();
        assert_eq!(age.inferred, TypeCandidate::Integer);
        assert_eq!(age.missing, 1);
        assert!((age.confidence - 1.0).abs() < f64::EPSILON);

        let score = report.column("score").unwrap();
        assert_eq!(score.inferred, TypeCandidate::Float);
        assert_eq!(score.missing, 1);

        let active = report.column("active").unwrap();
        assert_eq!(active.inferred, TypeCandidate::Boolean);
        assert_eq!(active.missing, 0);
    }

    #[test]
    fn test_column_order_preserved() {
        let file = write_file("z,a,m\n1,x,2.5\n2,y,3.5\n");
        let report = InferenceEngine::new().run(file.path()).unwrap();
        let names: Vec<&str> = report.columns.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["z", "a", "m"]);
        assert_eq!(report.columns[2].position, 2);
    }

    #[test]
    fn test_empty_file_error() {
        let file = write_file("a,b\n");
        let err = InferenceEngine::new().run(file.path()).unwrap_err();
        assert!(matches!(err, TypemillError::EmptyFile(_)));
    }

    #[test]
    fn test_duplicate_header_error() {
        let file = write_file("id,id,name\n1,2,x\n");
        let err = InferenceEngine::new().run(file.path()).unwrap_err();
        assert!(matches!(err, TypemillError::Header(_)));
    }

    #[test]
    fn test_idempotent_reports() {
        let file = write_file("a,b\n1,red\n2,blue\n3,red\n");
        let engine = InferenceEngine::new();
        let first = engine.run(file.path()).unwrap();
        let second = engine.run(file.path()).unwrap();
        assert_eq!(first.columns, second.columns);
        assert_eq!(first.row_count, second.row_count);
    }

    #[test]
    fn test_checkpoint_cancels_run() {
        let mut content = String::from("n\n");
        for i in 0..100 {
            content.push_str(&format!("{i}\n"));
        }
        let file = write_file(&content);

        struct CancelImmediately;
        impl Checkpoint for CancelImmediately {
            fn observe(&self, _rows_seen: usize) -> bool {
                false
            }
        }

        let engine = InferenceEngine::with_config(InferenceConfig {
            batch_size: 10,
            ..InferenceConfig::default()
        });
        let err = engine
            .run_with_checkpoint(file.path(), &CancelImmediately)
            .unwrap_err();
        assert!(matches!(err, TypemillError::Cancelled(_)));
    }

    #[test]
    fn test_checkpoint_called_per_batch() {
        let mut content = String::from("n\n");
        for i in 0..50 {
            content.push_str(&format!("{i}\n"));
        }
        let file = write_file(&content);

        struct Counting(AtomicUsize);
        impl Checkpoint for Counting {
            fn observe(&self, _rows_seen: usize) -> bool {
                self.0.fetch_add(1, Ordering::SeqCst);
                true
            }
        }

        let probe = Counting(AtomicUsize::new(0));
        let engine = InferenceEngine::with_config(InferenceConfig {
            batch_size: 10,
            ..InferenceConfig::default()
        });
        engine.run_with_checkpoint(file.path(), &probe).unwrap();
        assert_eq!(probe.0.load(Ordering::SeqCst), 5);
    }
}
