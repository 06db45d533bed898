// src/extractors/classify.rs

// --- Imports ---
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The five annual-report requirement categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    Budget,
    Attendance,
    AuditedFinancialStatements,
    AssessedValuation,
    TopTaxpayers,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Budget,
        Category::Attendance,
        Category::AuditedFinancialStatements,
        Category::AssessedValuation,
        Category::TopTaxpayers,
    ];

    /// Key used in the serialized classification.
    pub fn label(self) -> &'static str {
        match self {
            Category::Budget => "budget",
            Category::Attendance => "attendance",
            Category::AuditedFinancialStatements => "audited financial statements",
            Category::AssessedValuation => "assessed valuation",
            Category::TopTaxpayers => "top taxpayers",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// --- Regex Patterns for Keyword Matching (Lazy Static) ---
static CATEGORY_KEYWORD_RE: Lazy<Vec<(Category, Regex)>> = Lazy::new(|| {
    [
        (Category::Budget, r"(?i)budget"),
        (Category::Attendance, r"(?i)attendance|enrollment"),
        (Category::AuditedFinancialStatements, r"(?i)audited financial statements"),
        (Category::AssessedValuation, r"(?i)assessed valuation"),
        (Category::TopTaxpayers, r"(?i)tax payers|taxpayers"),
    ]
    .into_iter()
    .map(|(category, pat)| {
        (category, Regex::new(pat).expect("Failed to compile CATEGORY_KEYWORD_RE"))
    })
    .collect()
});

/// Presence flags for each category. Serializes to exactly the five category labels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    #[serde(rename = "budget")]
    pub budget: bool,
    #[serde(rename = "attendance")]
    pub attendance: bool,
    #[serde(rename = "audited financial statements")]
    pub audited_financial_statements: bool,
    #[serde(rename = "assessed valuation")]
    pub assessed_valuation: bool,
    #[serde(rename = "top taxpayers")]
    pub top_taxpayers: bool,
}

impl Classification {
    pub fn get(&self, category: Category) -> bool {
        match category {
            Category::Budget => self.budget,
            Category::Attendance => self.attendance,
            Category::AuditedFinancialStatements => self.audited_financial_statements,
            Category::AssessedValuation => self.assessed_valuation,
            Category::TopTaxpayers => self.top_taxpayers,
        }
    }

    /// Sets a flag. Flags only ever move from false to true.
    fn mark(&mut self, category: Category) {
        let flag = match category {
            Category::Budget => &mut self.budget,
            Category::Attendance => &mut self.attendance,
            Category::AuditedFinancialStatements => &mut self.audited_financial_statements,
            Category::AssessedValuation => &mut self.assessed_valuation,
            Category::TopTaxpayers => &mut self.top_taxpayers,
        };
        *flag = true;
    }

    /// `(label, present)` pairs in [`Category::ALL`] order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, bool)> + '_ {
        Category::ALL.into_iter().map(move |c| (c.label(), self.get(c)))
    }

    /// Categories whose flag is set.
    pub fn present(&self) -> Vec<Category> {
        Category::ALL.into_iter().filter(|c| self.get(*c)).collect()
    }
}

/// Keyword-based multi-label classifier over requirement strings.
#[derive(Debug, Default, Clone, Copy)]
pub struct RequirementClassifier;

impl RequirementClassifier {
    pub fn new() -> Self {
        Self
    }

    /// Every requirement is checked against every category; nothing short-circuits.
    pub fn classify<I, S>(&self, requirements: I) -> Classification
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut classification = Classification::default();

        for requirement in requirements {
            let requirement = requirement.as_ref();
            for (category, re) in CATEGORY_KEYWORD_RE.iter() {
                if re.is_match(requirement) {
                    tracing::trace!("'{}' matched category '{}'", requirement, category);
                    classification.mark(*category);
                }
            }
        }

        classification
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_requirements_is_all_false() {
        let c = RequirementClassifier::new().classify(Vec::<String>::new());
        assert_eq!(c, Classification::default());
        assert!(c.present().is_empty());
    }

    #[test]
    fn each_category_keyword() {
        let classifier = RequirementClassifier::new();
        let cases = [
            ("Adopted BUDGET for the fiscal year", Category::Budget),
            ("Average daily attendance", Category::Attendance),
            ("District enrollment", Category::Attendance),
            ("Audited Financial Statements of the District", Category::AuditedFinancialStatements),
            ("Assessed valuation of taxable property", Category::AssessedValuation),
            ("Ten largest tax payers", Category::TopTaxpayers),
            ("Top ten taxpayers", Category::TopTaxpayers),
        ];

        for (text, expected) in cases {
            let c = classifier.classify([text]);
            assert_eq!(c.present(), vec![expected], "unexpected categories for '{}'", text);
        }
    }

    #[test]
    fn one_requirement_can_set_several_flags() {
        let c = RequirementClassifier::new()
            .classify(["budget and enrollment and assessed valuation"]);
        assert!(c.budget && c.attendance && c.assessed_valuation);
        assert!(!c.audited_financial_statements && !c.top_taxpayers);
    }

    #[test]
    fn flags_are_never_reset_by_later_requirements() {
        let c = RequirementClassifier::new().classify(["The annual budget", "nothing relevant", ""]);
        assert!(c.budget);
    }

    #[test]
    fn keywords_match_as_literal_substrings() {
        let c = RequirementClassifier::new().classify(["unaudited financial statements"]);
        assert!(c.audited_financial_statements, "matching is by substring, not by word");

        // "financial statements" alone is not "audited financial statements".
        let c = RequirementClassifier::new().classify(["financial statements", "tax levies"]);
        assert_eq!(c, Classification::default());
    }

    #[test]
    fn serializes_with_fixed_keys() {
        let c = RequirementClassifier::new().classify(["The annual budget", "audited financial statements"]);
        let value = serde_json::to_value(c).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "budget": true,
                "attendance": false,
                "audited financial statements": true,
                "assessed valuation": false,
                "top taxpayers": false,
            })
        );
    }

    #[test]
    fn iter_follows_category_order() {
        let labels: Vec<&str> = Classification::default().iter().map(|(label, _)| label).collect();
        assert_eq!(
            labels,
            ["budget", "attendance", "audited financial statements", "assessed valuation", "top taxpayers"]
        );
    }
}
