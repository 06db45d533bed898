// src/utils/text_debug.rs
use regex::Regex;

/// Wraps every match of the given patterns in `[[label]]...[[/label]]` markers.
///
/// Matches are applied in text order. A match that overlaps an earlier one is
/// dropped so the output never duplicates input text.
pub fn annotate_matches(text: &str, patterns: &[(&Regex, &str)]) -> String {
    let mut highlights: Vec<(usize, usize, &str)> = Vec::new();

    // Find all matches for each pattern and add them to highlights
    for (re, label) in patterns {
        for mat in re.find_iter(text) {
            if mat.start() < mat.end() {
                highlights.push((mat.start(), mat.end(), *label));
            }
        }
    }

    highlights.sort_by_key(|h| (h.0, std::cmp::Reverse(h.1))); // Sort by position, longest first

    let mut annotated = String::with_capacity(text.len() + highlights.len() * 16);
    let mut last_pos = 0;

    for (start, end, label) in highlights {
        if start < last_pos {
            tracing::trace!("Skipping overlapping '{}' match at {}-{}", label, start, end);
            continue;
        }

        annotated.push_str(&text[last_pos..start]);
        annotated.push_str(&format!("[[{}]]", label));
        annotated.push_str(&text[start..end]);
        annotated.push_str(&format!("[[/{}]]", label));

        last_pos = end;
    }

    // Add any remaining content
    annotated.push_str(&text[last_pos..]);
    annotated
}
