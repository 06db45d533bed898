// src/pipeline.rs
use crate::config::{PipelineConfig, UnterminatedPolicy};
use crate::extractors::{
    Classification, RequirementClassifier, RequirementSegmenter, SectionExtractor, SectionScan,
    SectionStatus,
};
use serde::{Deserialize, Serialize};

/// Result of running one document through the pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentReport {
    pub document: String,
    pub status: SectionStatus,
    /// Section text that was segmented, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section: Option<String>,
    pub requirements: Vec<String>,
    pub classification: Classification,
}

/// Extract, segment and classify, one document at a time.
///
/// Holds no per-document state; one instance can serve any number of documents,
/// from any number of threads.
#[derive(Debug, Default, Clone, Copy)]
pub struct Pipeline {
    config: PipelineConfig,
    extractor: SectionExtractor,
    segmenter: RequirementSegmenter,
    classifier: RequirementClassifier,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Runs all three stages over lines that keep their terminators.
    pub fn process_lines<I, S>(&self, document: &str, lines: I) -> DocumentReport
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let scan = self.extractor.scan(lines);
        let status = scan.status();

        let section = match scan {
            SectionScan::Closed(text) => Some(text),
            SectionScan::Unterminated { partial } => match self.config.unterminated {
                UnterminatedPolicy::Skip => {
                    tracing::warn!("{}: section never closed; skipping", document);
                    None
                }
                UnterminatedPolicy::AcceptPartial => {
                    tracing::warn!("{}: section never closed; using text collected so far", document);
                    Some(partial)
                }
            },
            SectionScan::Missing => {
                tracing::warn!("{}: no Content of Annual Reports section found", document);
                None
            }
        };

        let requirements = section
            .as_deref()
            .map(|text| self.segmenter.segment(text))
            .unwrap_or_default();
        let classification = self.classifier.classify(&requirements);

        tracing::info!(
            "{}: section {:?}, {} requirements, categories {:?}",
            document,
            status,
            requirements.len(),
            classification.present()
        );

        DocumentReport {
            document: document.to_string(),
            status,
            section,
            requirements,
            classification,
        }
    }

    /// Splits `text` into lines (terminators kept) and runs [`Pipeline::process_lines`].
    pub fn process_text(&self, document: &str, text: &str) -> DocumentReport {
        self.process_lines(document, text.split_inclusive('\n'))
    }
}
