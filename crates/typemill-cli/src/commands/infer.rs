//! Infer command - run a file through the job machinery and print the report.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use colored::Colorize;
use typemill::{
    FileReport, InferenceConfig, JobStatus, JobStore, SamplingStrategy, WorkerPool,
};

#[allow(clippy::too_many_arguments)]
pub fn run(
    file: PathBuf,
    sample_size: usize,
    stride: Option<usize>,
    threshold: f64,
    category_cap: usize,
    output: Option<PathBuf>,
    json: bool,
    verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if !file.exists() {
        return Err(format!("File not found: {}", file.display()).into());
    }

    let config = InferenceConfig {
        sample_size,
        strategy: match stride {
            Some(step) => SamplingStrategy::Stride { step },
            None => SamplingStrategy::FirstN,
        },
        acceptance_threshold: threshold,
        category_cap,
        ..InferenceConfig::default()
    };

    if !json {
        println!(
            "{} {}",
            "Inferring".cyan().bold(),
            file.display().to_string().white()
        );
    }

    // Drive the file through the same job lifecycle a service would use.
    let store = Arc::new(JobStore::new());
    let pool = WorkerPool::start(Arc::clone(&store), 1);
    let id = store.submit(file, config);

    let snapshot = loop {
        let snapshot = store.snapshot(id)?;
        if snapshot.status.is_terminal() {
            break snapshot;
        }
        std::thread::sleep(Duration::from_millis(20));
    };
    pool.shutdown();

    match snapshot.status {
        JobStatus::Completed => {
            let report = snapshot
                .report
                .ok_or("completed job carries no report")?;
            if let Some(ref path) = output {
                report.save(path)?;
                if !json {
                    println!("Report written to {}", path.display().to_string().white());
                }
            }
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print_report(&report, verbose);
            }
            Ok(())
        }
        JobStatus::Failed => {
            let message = match snapshot.error {
                Some(error) => format!("{:?}: {}", error.kind, error.message),
                None => "job failed without a recorded error".to_string(),
            };
            Err(message.into())
        }
        other => Err(format!("job ended in unexpected state {other:?}").into()),
    }
}

fn print_report(report: &FileReport, verbose: bool) {
    println!(
        "Sampled {} rows across {} columns in {:.3}s",
        report.row_count.to_string().white().bold(),
        report.column_count.to_string().white().bold(),
        report.processing_time
    );
    println!();
    println!(
        "  {:<24} {:<14} {:>10}   {}",
        "column".yellow().bold(),
        "type".yellow().bold(),
        "confidence".yellow().bold(),
        "preview".yellow().bold()
    );

    for column in &report.columns {
        let type_name = column.effective_type().display_name();
        println!(
            "  {:<24} {:<14} {:>9.0}%   {}",
            column.name,
            type_name.green(),
            column.confidence * 100.0,
            column.preview.join(", ")
        );
        if verbose && column.missing > 0 {
            println!(
                "  {:<24} {} of {} sampled values missing",
                "",
                column.missing.to_string().blue(),
                column.sampled
            );
        }
    }
}
