// src/extractors/requirements.rs

// --- Imports ---
use once_cell::sync::Lazy;
use regex::Regex;

// --- Regex Patterns (Lazy Static) ---

/// List-item delimiters at the start of a line: a parenthesized label with no
/// nested parentheses, or a single digit and a period, each followed by one space.
/// Indentation may include the U+001C..U+001F separators.
pub static GROUP_DELIMITER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\n[\s\x1C-\x1F]*\([^()]*\) |\n\d\. ")
        .expect("Failed to compile GROUP_DELIMITER_RE")
});

static NON_ALPHANUMERIC_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[^a-zA-Z0-9 ]").expect("Failed to compile NON_ALPHANUMERIC_RE")
});

// Boilerplate that follows the real requirements in most official statements.
// Matched case-insensitively against the cleaned group text.
static STOP_GROUP_RE: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?i)in addition to any of the information expressly required",
        r"(?i)any or all of the items listed above",
        // "to the extent not included in the audited financial statements"; the gap
        // is 2-10 characters, so longer phrasings such as "not already included" do not match.
        r"(?i)to the extent not .{2,10} in the audited financial statements",
    ]
    .iter()
    .map(|pat| Regex::new(pat).expect("Failed to compile STOP_GROUP_RE"))
    .collect()
});

/// Splits a "Content of Annual Reports" section into plaintext requirements.
#[derive(Debug, Default, Clone, Copy)]
pub struct RequirementSegmenter;

impl RequirementSegmenter {
    pub fn new() -> Self {
        Self
    }

    /// Returns the cleaned requirement strings in document order, stop groups removed.
    pub fn segment(&self, section_text: &str) -> Vec<String> {
        let text = format!("\n{}", section_text);

        let requirements: Vec<String> = GROUP_DELIMITER_RE
            .split(&text)
            .skip(1) // preamble before the first delimiter
            .map(clean_group)
            .filter(|group| {
                let stop = is_stop_group(group);
                if stop {
                    tracing::debug!("Dropping stop group: '{}'", group);
                }
                !stop
            })
            .collect();

        tracing::debug!("Segmented section into {} requirements", requirements.len());
        requirements
    }
}

/// Whether a group is administrative boilerplate rather than a requirement.
pub fn is_stop_group(group: &str) -> bool {
    STOP_GROUP_RE.iter().any(|re| re.is_match(group))
}

/// Normalizes one group's raw text.
///
/// The double-space collapse is a single left-to-right pass: three spaces
/// become two, not one.
pub fn clean_group(group: &str) -> String {
    let joined = group.replace('\n', " ");
    let collapsed = joined.replace("  ", " ");
    strip_non_alphanumeric(&collapsed).trim().to_string()
}

/// Drops every character outside `[A-Za-z0-9 ]`.
pub fn strip_non_alphanumeric(text: &str) -> String {
    NON_ALPHANUMERIC_RE.replace_all(text, "").into_owned()
}
