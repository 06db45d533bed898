// src/runner.rs
use crate::config::PipelineConfig;
use crate::documents::load_document;
use crate::extractors::SectionStatus;
use crate::pipeline::{DocumentReport, Pipeline};
use crate::storage::{RunMetadata, RunReport, StorageManager};
use crate::utils::AppError;
use std::io::Write;
use std::path::{Path, PathBuf};
use tokio::task::JoinError;

/// What the command line asked for, minus pipeline configuration.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    pub files: Vec<PathBuf>,
    pub output_dir: Option<String>,
    pub debug: bool,
    pub compact: bool,
}

/// Counts and reports from a finished run.
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    pub closed_count: usize,
    pub failure_count: usize,
    pub reports: Vec<DocumentReport>,
}

impl RunSummary {
    /// Counts one document's outcome. A load error or a task that panicked is a
    /// failure; later documents still run.
    fn settle(
        &mut self,
        path: &Path,
        outcome: Result<Result<DocumentReport, AppError>, JoinError>,
    ) -> Option<DocumentReport> {
        match outcome {
            Ok(Ok(report)) => {
                if report.status == SectionStatus::Closed {
                    self.closed_count += 1;
                } else {
                    self.failure_count += 1;
                }
                Some(report)
            }
            Ok(Err(e)) => {
                tracing::error!("Failed to process {}: {}", path.display(), e);
                self.failure_count += 1;
                None
            }
            Err(e) => {
                tracing::error!("Processing task for {} did not complete: {}", path.display(), e);
                self.failure_count += 1;
                None
            }
        }
    }
}

/// Loads and processes every file in parallel, writing one JSON report per
/// document to `out` in input order.
///
/// Fails with [`AppError::Processing`] when no document produced a closed section.
pub async fn run<W: Write>(
    options: &RunOptions,
    config: PipelineConfig,
    out: &mut W,
) -> Result<RunSummary, AppError> {
    if options.debug && options.output_dir.is_none() {
        return Err(AppError::Config("--debug requires --output-dir".to_string()));
    }

    let storage = options.output_dir.as_deref().map(StorageManager::new).transpose()?;

    let pipeline = Pipeline::new(config);
    let handles: Vec<_> = options
        .files
        .iter()
        .cloned()
        .map(|path| {
            let task_path = path.clone();
            let handle = tokio::spawn(async move {
                let doc = load_document(&task_path).await?;
                let report = tokio::task::spawn_blocking(move || {
                    pipeline.process_lines(&doc.name, doc.lines())
                })
                .await?;
                Ok::<DocumentReport, AppError>(report)
            });
            (path, handle)
        })
        .collect();

    let mut summary = RunSummary::default();

    for (index, (path, handle)) in handles.into_iter().enumerate() {
        let Some(report) = summary.settle(&path, handle.await) else {
            continue;
        };

        let rendered = if options.compact {
            serde_json::to_string(&report)
        } else {
            serde_json::to_string_pretty(&report)
        }
        .map_err(|e| AppError::Processing(format!("Failed to render report: {}", e)))?;
        writeln!(out, "{}", rendered)?;

        if options.debug {
            if let Some(storage) = &storage {
                if let Err(e) = storage.save_debug_dump(index, &report) {
                    tracing::warn!("Failed to save debug dump for {}: {}", report.document, e);
                }
            }
        }

        summary.reports.push(report);
    }

    if let Some(storage) = &storage {
        let run = RunReport {
            metadata: RunMetadata::new(&config, summary.reports.len()),
            documents: summary.reports.clone(),
        };
        match storage.save_report(&run) {
            Ok(path) => tracing::info!("Saved report to: {}", path.display()),
            Err(e) => tracing::error!("Failed to save report: {}", e),
        }
    }

    tracing::info!(
        "Processing finished. Closed sections: {}, Failures: {}",
        summary.closed_count,
        summary.failure_count
    );

    if summary.closed_count == 0 && summary.failure_count > 0 {
        return Err(AppError::Processing(format!(
            "No Content of Annual Reports section extracted from {} documents",
            summary.failure_count
        )));
    }

    Ok(summary)
}
