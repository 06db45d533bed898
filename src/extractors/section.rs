// src/extractors/section.rs

// --- Imports ---
use crate::utils::error::ExtractError;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::io::BufRead;

// --- Regex Patterns for Boundary Matching (Lazy Static) ---
// Both patterns run against the line with ALL whitespace removed, so a heading
// like "Section 6.  Content of\tAnnual Reports." is seen as
// "Section6.ContentofAnnualReports.".

/// Any numbered section heading, anchored to the start of the squeezed line.
pub static ANY_SECTION_HEADING_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^Section\d{1,2}\.").expect("Failed to compile ANY_SECTION_HEADING_RE")
});

/// The "Content of Annual Reports" heading, anchored to the start of the squeezed line.
pub static TARGET_HEADING_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^Section\d{1,2}\.ContentOfAnnualReports\.")
        .expect("Failed to compile TARGET_HEADING_RE")
});

// --- Data Structures ---

/// Outcome of scanning a document for the target section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SectionScan {
    /// The section started and a later section heading closed it.
    Closed(String),
    /// The section started but input ended before any later heading.
    Unterminated { partial: String },
    /// The target heading never appeared.
    Missing,
}

/// Serializable summary of a [`SectionScan`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionStatus {
    Closed,
    Unterminated,
    Missing,
}

impl SectionScan {
    /// Text for a closed section; `None` for both unterminated and missing.
    pub fn into_text(self) -> Option<String> {
        match self {
            SectionScan::Closed(text) => Some(text),
            SectionScan::Unterminated { .. } | SectionScan::Missing => None,
        }
    }

    pub fn status(&self) -> SectionStatus {
        match self {
            SectionScan::Closed(_) => SectionStatus::Closed,
            SectionScan::Unterminated { .. } => SectionStatus::Unterminated,
            SectionScan::Missing => SectionStatus::Missing,
        }
    }

    /// Strict form of [`SectionScan::into_text`] for callers that treat anything
    /// but a closed section as an error.
    pub fn require(self, document: &str) -> Result<String, ExtractError> {
        match self {
            SectionScan::Closed(text) => Ok(text),
            SectionScan::Unterminated { .. } => {
                Err(ExtractError::SectionUnterminated(document.to_string()))
            }
            SectionScan::Missing => Err(ExtractError::SectionNotFound(document.to_string())),
        }
    }
}

/// Line-at-a-time state for the section scan.
#[derive(Debug, Default)]
struct SectionTracker {
    in_section: bool,
    collected: Vec<String>,
}

impl SectionTracker {
    /// Feeds one line. Returns the finished section text when this line is the
    /// heading of the section that follows the target.
    fn feed(&mut self, line: &str) -> Option<String> {
        let squeezed = squeeze_whitespace(line);

        if self.in_section && ANY_SECTION_HEADING_RE.is_match(&squeezed) {
            tracing::trace!("Section closed by heading: '{}'", line.trim());
            return Some(trim_text_whitespace(&self.collected.concat()).to_string());
        }

        if !self.in_section && TARGET_HEADING_RE.is_match(&squeezed) {
            tracing::debug!("Entered Content of Annual Reports section at: '{}'", line.trim());
            self.in_section = true;
        }

        if self.in_section {
            self.collected.push(line.to_string());
        }

        None
    }

    fn finish(self) -> SectionScan {
        if self.in_section {
            let partial = trim_text_whitespace(&self.collected.concat()).to_string();
            tracing::debug!("Input ended inside the section ({} bytes collected)", partial.len());
            SectionScan::Unterminated { partial }
        } else {
            SectionScan::Missing
        }
    }
}

/// Whitespace as text-mode tools see it: Unicode whitespace plus the
/// U+001C..U+001F separators that PDF-to-text converters emit.
pub fn is_text_whitespace(c: char) -> bool {
    c.is_whitespace() || ('\u{1c}'..='\u{1f}').contains(&c)
}

pub fn trim_text_whitespace(text: &str) -> &str {
    text.trim_matches(is_text_whitespace)
}

/// Removes every whitespace character, including those inside the line.
fn squeeze_whitespace(line: &str) -> String {
    line.chars().filter(|c| !is_text_whitespace(*c)).collect()
}

// --- Main Extractor Structure ---

/// Pulls the "Content of Annual Reports" section out of an official statement.
#[derive(Debug, Default, Clone, Copy)]
pub struct SectionExtractor;

impl SectionExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Scans lines in document order and reports how the target section ended.
    ///
    /// Lines should keep their terminators; the section text is the plain
    /// concatenation of the collected lines, trimmed.
    pub fn scan<I, S>(&self, lines: I) -> SectionScan
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut tracker = SectionTracker::default();

        for line in lines {
            if let Some(text) = tracker.feed(line.as_ref()) {
                return SectionScan::Closed(text);
            }
        }

        tracker.finish()
    }

    /// Returns the section text, or `None` unless a later heading closed it.
    pub fn extract<I, S>(&self, lines: I) -> Option<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.scan(lines).into_text()
    }

    /// Same as [`SectionExtractor::scan`], reading lines (terminators kept) from a reader.
    /// Stops reading as soon as the section closes.
    pub fn scan_reader<R: BufRead>(&self, mut reader: R) -> Result<SectionScan, ExtractError> {
        let mut tracker = SectionTracker::default();
        let mut line = String::new();

        loop {
            line.clear();
            if reader.read_line(&mut line)? == 0 {
                break;
            }
            if let Some(text) = tracker.feed(&line) {
                return Ok(SectionScan::Closed(text));
            }
        }

        Ok(tracker.finish())
    }

    pub fn extract_from_reader<R: BufRead>(&self, reader: R) -> Result<Option<String>, ExtractError> {
        Ok(self.scan_reader(reader)?.into_text())
    }
}

// --- Tests ---
#[cfg(test)]
mod tests {
    use super::*;

    fn sample_lines() -> Vec<&'static str> {
        vec![
            "Section 5. Unrelated.\n",
            "x\n",
            "Section 6. Content of Annual Reports.\n",
            "req text (a) foo\n",
            "Section 7. Next.\n",
            "y\n",
        ]
    }

    #[test]
    fn closes_at_next_section_heading() {
        let text = SectionExtractor::new().extract(sample_lines()).unwrap();

        assert!(text.starts_with("Section 6. Content of Annual Reports."), "Heading line should be kept");
        assert!(text.contains("req text (a) foo"));
        assert!(!text.contains("Section 7"), "Closing heading must not be included");
        assert!(!text.contains('y'));
        assert!(!text.contains("Unrelated"));
        assert_eq!(text, "Section 6. Content of Annual Reports.\nreq text (a) foo");
    }

    #[test]
    fn heading_split_by_whitespace_still_matches() {
        let lines = [
            "  SECTION 12 .  CONTENT OF\tANNUAL   REPORTS.\n",
            "(a) budget\n",
            "Section 13. Reporting of Events.\n",
        ];
        let scan = SectionExtractor::new().scan(lines);
        assert_eq!(scan.status(), SectionStatus::Closed);
        assert!(scan.into_text().unwrap().ends_with("(a) budget"));
    }

    #[test]
    fn three_digit_section_numbers_are_not_headings() {
        let lines = [
            "Section 4. Content of Annual Reports.\n",
            "Section 100. not a heading\n",
            "Section 5. Next.\n",
        ];
        let text = SectionExtractor::new().extract(lines).unwrap();
        assert!(text.contains("Section 100."));
    }

    #[test]
    fn heading_must_start_the_line() {
        let lines = [
            "See Section 4. Content of Annual Reports.\n",
            "Section 5. Next.\n",
        ];
        assert_eq!(SectionExtractor::new().scan(lines), SectionScan::Missing);
    }

    #[test]
    fn unterminated_section_yields_no_text() {
        let lines = ["Section 4. Content of Annual Reports.\n", "(a) budget\n"];
        let extractor = SectionExtractor::new();

        assert_eq!(extractor.extract(lines), None);
        match extractor.scan(lines) {
            SectionScan::Unterminated { partial } => {
                assert_eq!(partial, "Section 4. Content of Annual Reports.\n(a) budget");
            }
            other => panic!("expected unterminated scan, got {:?}", other),
        }
    }

    #[test]
    fn separator_controls_count_as_whitespace() {
        let lines = [
            "Section\x1c4. Content of\x1fAnnual Reports.\n",
            "(a) budget\x0b \x1c\n",
            "Section\x1c5. Next.\n",
        ];
        let text = SectionExtractor::new().extract(lines).unwrap();
        assert_eq!(text, "Section\x1c4. Content of\x1fAnnual Reports.\n(a) budget");

        let unterminated = SectionExtractor::new().scan(["\x1dSection 4. Content of Annual Reports.\x1e\n"]);
        assert_eq!(
            unterminated,
            SectionScan::Unterminated { partial: "Section 4. Content of Annual Reports.".to_string() }
        );
    }

    #[test]
    fn empty_and_whitespace_documents_are_missing() {
        let extractor = SectionExtractor::new();
        assert_eq!(extractor.scan(Vec::<String>::new()), SectionScan::Missing);
        assert_eq!(extractor.scan(["   \n", "\t\n", "\x1c\n"]), SectionScan::Missing);
        assert_eq!(extractor.extract(["\n"]), None);
    }

    #[test]
    fn require_maps_outcomes_to_errors() {
        assert!(matches!(
            SectionScan::Missing.require("OS1.txt"),
            Err(ExtractError::SectionNotFound(name)) if name == "OS1.txt"
        ));
        assert!(matches!(
            SectionScan::Unterminated { partial: String::new() }.require("OS2.txt"),
            Err(ExtractError::SectionUnterminated(_))
        ));
        assert_eq!(SectionScan::Closed("x".into()).require("OS3.txt").unwrap(), "x");
    }

    #[test]
    fn reader_matches_iterator_scan() {
        let doc = sample_lines().concat();
        let extractor = SectionExtractor::new();

        let from_reader = extractor.scan_reader(doc.as_bytes()).unwrap();
        assert_eq!(from_reader, extractor.scan(sample_lines()));
        assert_eq!(
            extractor.extract_from_reader(doc.as_bytes()).unwrap().as_deref(),
            Some("Section 6. Content of Annual Reports.\nreq text (a) foo")
        );
    }
}
