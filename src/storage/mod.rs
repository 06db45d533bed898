// src/storage/mod.rs
use crate::config::{PipelineConfig, UnterminatedPolicy};
use crate::pipeline::DocumentReport;
use crate::utils::error::StorageError;
use crate::utils::text_debug::annotate_matches;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

pub const REPORT_FILENAME: &str = "annual_report_requirements.json";

// Looser, display-only forms of the boundary and delimiter patterns: they run
// on the raw section text, where headings still contain whitespace.
static DEBUG_HEADING_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?im)^[ \t]*Section[ \t]*\d{1,2}[ \t]*\.").expect("Failed to compile DEBUG_HEADING_RE")
});
static DEBUG_ITEM_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^[ \t]*\([^()\n]*\) |^\d\. ").expect("Failed to compile DEBUG_ITEM_RE")
});

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunMetadata {
    pub generated_at: String,
    pub tool_version: String,
    pub unterminated_policy: UnterminatedPolicy,
    pub document_count: usize,
}

impl RunMetadata {
    pub fn new(config: &PipelineConfig, document_count: usize) -> Self {
        Self {
            generated_at: chrono::Utc::now().to_rfc3339(),
            tool_version: env!("CARGO_PKG_VERSION").to_string(),
            unterminated_policy: config.unterminated,
            document_count,
        }
    }
}

/// Everything written to the JSON report file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunReport {
    pub metadata: RunMetadata,
    pub documents: Vec<DocumentReport>,
}

pub struct StorageManager {
    base_dir: PathBuf,
}

impl StorageManager {
    /// Creates a new StorageManager with the specified base directory
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self, StorageError> {
        let base_path = base_dir.as_ref().to_path_buf();

        // Create the base directory if it doesn't exist
        if !base_path.exists() {
            fs::create_dir_all(&base_path).map_err(StorageError::IoError)?;
        }

        Ok(Self { base_dir: base_path })
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Saves the run report as pretty JSON
    pub fn save_report(&self, report: &RunReport) -> Result<PathBuf, StorageError> {
        let file_path = self.base_dir.join(REPORT_FILENAME);

        let json = serde_json::to_string_pretty(report)
            .map_err(|e| StorageError::SerializationError(e.to_string()))?;

        fs::write(&file_path, json).map_err(StorageError::IoError)?;

        tracing::info!("Saved report for {} documents to {}", report.documents.len(), file_path.display());

        Ok(file_path)
    }

    /// Saves a plain-text dump of one document's pipeline stages under `debug/`.
    /// `index` is the document's input position; it keeps same-named inputs apart.
    pub fn save_debug_dump(&self, index: usize, report: &DocumentReport) -> Result<PathBuf, StorageError> {
        let debug_dir = self.base_dir.join("debug");
        if !debug_dir.exists() {
            fs::create_dir_all(&debug_dir).map_err(StorageError::IoError)?;
        }

        let file_path = debug_dir.join(format!("{:03}_{}.txt", index, sanitize_file_stem(&report.document)));
        fs::write(&file_path, render_debug_dump(report)).map_err(StorageError::IoError)?;

        tracing::debug!("Saved debug dump to {}", file_path.display());

        Ok(file_path)
    }
}

/// Renders the annotated section text, the requirement list and the flags.
pub fn render_debug_dump(report: &DocumentReport) -> String {
    let mut out = String::new();

    // Writing to a String never fails.
    let _ = writeln!(out, "document: {}", report.document);
    let _ = writeln!(out, "status: {:?}", report.status);

    out.push_str("\n== section ==\n");
    match &report.section {
        Some(text) => {
            let annotated = annotate_matches(
                text,
                &[(&*DEBUG_HEADING_RE, "heading"), (&*DEBUG_ITEM_RE, "item")],
            );
            out.push_str(&annotated);
            out.push('\n');
        }
        None => out.push_str("(none)\n"),
    }

    out.push_str("\n== requirements ==\n");
    for (i, requirement) in report.requirements.iter().enumerate() {
        let _ = writeln!(out, "{:>3}. {}", i + 1, requirement);
    }

    out.push_str("\n== classification ==\n");
    for (label, present) in report.classification.iter() {
        let _ = writeln!(out, "{}: {}", label, present);
    }

    out
}

fn sanitize_file_stem(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') { c } else { '_' })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::Pipeline;

    const DOC: &str = "\
Section 4. Content of Annual Reports.
(a) The annual budget.
(b) Assessed valuation.
Section 5. Next.
";

    #[test]
    fn report_round_trips_through_json() {
        let dir = tempfile::tempdir().unwrap();
        let storage = StorageManager::new(dir.path().join("out")).unwrap();
        assert!(storage.base_dir().is_dir());

        let config = PipelineConfig::default();
        let documents = vec![Pipeline::new(config).process_text("OS1.txt", DOC)];
        let report = RunReport {
            metadata: RunMetadata::new(&config, documents.len()),
            documents,
        };

        let path = storage.save_report(&report).unwrap();
        assert_eq!(path.file_name().unwrap(), REPORT_FILENAME);

        let raw = fs::read_to_string(&path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        let keys: Vec<&String> = value["documents"][0]["classification"]
            .as_object()
            .unwrap()
            .keys()
            .collect();
        assert_eq!(keys.len(), 5);
        assert_eq!(value["metadata"]["unterminated_policy"], "skip");

        let loaded: RunReport = serde_json::from_str(&raw).unwrap();
        assert_eq!(loaded, report);
    }

    #[test]
    fn debug_dump_annotates_headings_and_items() {
        let report = Pipeline::default().process_text("OS 1/x.txt", DOC);
        let dump = render_debug_dump(&report);

        assert!(dump.contains("[[heading]]Section 4.[[/heading]] Content of Annual Reports."));
        assert!(dump.contains("[[item]](a) [[/item]]The annual budget."));
        assert!(dump.contains("  1. The annual budget"));
        assert!(dump.contains("assessed valuation: true"));
        assert!(dump.contains("top taxpayers: false"));

        let dir = tempfile::tempdir().unwrap();
        let storage = StorageManager::new(dir.path()).unwrap();
        let path = storage.save_debug_dump(7, &report).unwrap();
        assert_eq!(path, dir.path().join("debug").join("007_OS_1_x.txt.txt"));
    }

    #[test]
    fn debug_dump_without_section() {
        let report = Pipeline::default().process_text("empty.txt", "");
        let dump = render_debug_dump(&report);
        assert!(dump.contains("== section ==\n(none)\n"));
    }
}
