//! Bounded, lazy row sampling over delimited files.
//!
//! The sampler streams records straight from the CSV reader: memory stays
//! constant no matter how large the file is, and for a fixed file, strategy,
//! and row budget the produced sequence is reproducible across runs.

use std::collections::HashSet;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::config::{InferenceConfig, SamplingStrategy};
use crate::error::{Result, TypemillError};

/// Delimiters to try when auto-detecting.
const DELIMITERS: &[u8] = &[b'\t', b',', b';', b'|'];

/// Lines inspected during delimiter detection.
const DETECT_LINES: usize = 10;

/// Lazily yields sampled data rows from a delimited file.
///
/// The header is read and validated eagerly at open; rows are pulled from the
/// underlying reader one at a time as the iterator is consumed.
#[derive(Debug)]
pub struct RowSampler {
    reader: csv::Reader<BufReader<File>>,
    headers: Vec<String>,
    delimiter: u8,
    max_rows: usize,
    strategy: SamplingStrategy,
    yielded: usize,
    seen: usize,
    done: bool,
}

impl RowSampler {
    /// Open a file and prepare sampled row iteration.
    ///
    /// Fails with `Header` on an absent header row, empty column names, or
    /// duplicate column names; with `FileFormat` when the file cannot be read
    /// as delimited text.
    pub fn open(path: impl AsRef<Path>, config: &InferenceConfig) -> Result<Self> {
        let path = path.as_ref();

        let delimiter = match config.delimiter {
            Some(d) => d,
            None => detect_delimiter(path)?,
        };

        let file = File::open(path).map_err(|e| TypemillError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(true)
            .flexible(true)
            .from_reader(BufReader::new(file));

        let headers: Vec<String> = reader
            .headers()
            .map_err(|e| TypemillError::FileFormat(format!("unreadable header: {e}")))?
            .iter()
            .map(|s| s.trim().to_string())
            .collect();

        validate_headers(&headers)?;

        Ok(Self {
            reader,
            headers,
            delimiter,
            max_rows: config.sample_size,
            strategy: config.strategy,
            yielded: 0,
            seen: 0,
            done: false,
        })
    }

    /// Column names, in file order.
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// The delimiter in use (detected or configured).
    pub fn delimiter(&self) -> u8 {
        self.delimiter
    }

    /// Whether a data row at this zero-based index is part of the sample.
    fn selected(&self, index: usize) -> bool {
        match self.strategy {
            SamplingStrategy::FirstN => true,
            SamplingStrategy::Stride { step } => {
                let step = step.max(1);
                index % step == 0
            }
        }
    }
}

impl Iterator for RowSampler {
    type Item = Result<Vec<String>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done || self.yielded >= self.max_rows {
            return None;
        }

        let width = self.headers.len();
        let mut record = csv::StringRecord::new();
        loop {
            match self.reader.read_record(&mut record) {
                Ok(false) => {
                    self.done = true;
                    return None;
                }
                Ok(true) => {
                    let index = self.seen;
                    self.seen += 1;
                    if !self.selected(index) {
                        continue;
                    }

                    let mut row: Vec<String> =
                        record.iter().map(|s| s.to_string()).collect();
                    // Ragged rows are padded or truncated to the header width.
                    row.resize(width, String::new());

                    self.yielded += 1;
                    return Some(Ok(row));
                }
                Err(e) => {
                    self.done = true;
                    return Some(Err(TypemillError::FileFormat(format!(
                        "malformed record at data row {}: {e}",
                        self.seen + 1
                    ))));
                }
            }
        }
    }
}

/// Reject absent, empty, or duplicate column names.
fn validate_headers(headers: &[String]) -> Result<()> {
    if headers.is_empty() {
        return Err(TypemillError::Header("no columns found".to_string()));
    }

    let mut seen = HashSet::new();
    for (idx, name) in headers.iter().enumerate() {
        if name.is_empty() {
            return Err(TypemillError::Header(format!(
                "column {} has an empty name",
                idx + 1
            )));
        }
        if !seen.insert(name.as_str()) {
            return Err(TypemillError::Header(format!(
                "duplicate column name '{name}'"
            )));
        }
    }
    Ok(())
}

/// Detect the delimiter by analyzing the first few lines of the file.
pub fn detect_delimiter(path: impl AsRef<Path>) -> Result<u8> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| TypemillError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;

    let reader = BufReader::new(file);
    let mut lines = Vec::new();
    for line in reader.lines().take(DETECT_LINES) {
        let line = line.map_err(|e| {
            TypemillError::FileFormat(format!("file is not readable text: {e}"))
        })?;
        if !line.trim().is_empty() {
            lines.push(line);
        }
    }

    if lines.is_empty() {
        return Err(TypemillError::EmptyFile("no lines to analyze".to_string()));
    }

    let mut best_delimiter = b',';
    let mut best_score = 0;

    for &delim in DELIMITERS {
        let counts: Vec<usize> = lines
            .iter()
            .map(|line| count_delimiter_in_line(line, delim))
            .collect();

        let first_count = counts[0];
        if first_count == 0 {
            continue;
        }

        // Consistent counts across lines is the strongest signal; tabs get a
        // small bonus since they rarely appear inside actual values.
        let consistent = counts.iter().all(|&c| c == first_count);
        let score = if consistent {
            first_count * 1000 + (if delim == b'\t' { 100 } else { 0 })
        } else {
            first_count
        };

        if score > best_score {
            best_score = score;
            best_delimiter = delim;
        }
    }

    Ok(best_delimiter)
}

/// Count delimiter occurrences in a line, respecting quotes.
fn count_delimiter_in_line(line: &str, delimiter: u8) -> usize {
    let delim_char = delimiter as char;
    let mut count = 0;
    let mut in_quotes = false;

    for ch in line.chars() {
        match ch {
            '"' => in_quotes = !in_quotes,
            c if c == delim_char && !in_quotes => count += 1,
            _ => {}
        }
    }

    count
}
