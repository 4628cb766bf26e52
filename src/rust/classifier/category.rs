use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::ClassifierError;

/// The fixed set of document categories.
///
/// Declaration order matters: when two categories score the same, the one
/// declared first wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Resume,
    Invoice,
    Contract,
    Letter,
    Report,
}

impl Category {
    /// All categories in declaration order.
    pub const ALL: [Category; 5] = [
        Category::Resume,
        Category::Invoice,
        Category::Contract,
        Category::Letter,
        Category::Report,
    ];

    /// Number of categories
    pub const COUNT: usize = Self::ALL.len();

    /// Position of this category in declaration order, used as the class index
    /// of the statistical model.
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Category> {
        Self::ALL.get(index).copied()
    }

    /// Lower-case key, as used in score maps and corpus files.
    pub fn key(self) -> &'static str {
        match self {
            Category::Resume => "resume",
            Category::Invoice => "invoice",
            Category::Contract => "contract",
            Category::Letter => "letter",
            Category::Report => "report",
        }
    }

    /// Title-cased display name.
    pub fn label(self) -> &'static str {
        match self {
            Category::Resume => "Resume",
            Category::Invoice => "Invoice",
            Category::Contract => "Contract",
            Category::Letter => "Letter",
            Category::Report => "Report",
        }
    }

    /// Built-in diagnostic phrases for this category, all lower-case.
    pub fn default_keywords(self) -> &'static [&'static str] {
        match self {
            Category::Resume => &[
                "resume",
                "curriculum vitae",
                "work experience",
                "professional experience",
                "professional summary",
                "education",
                "skills",
                "employment history",
                "qualifications",
                "certifications",
                "career objective",
                "references available",
            ],
            Category::Invoice => &[
                "invoice",
                "bill to",
                "amount due",
                "total due",
                "balance due",
                "subtotal",
                "tax",
                "payment terms",
                "due date",
                "unit price",
                "quantity",
                "receipt",
            ],
            Category::Contract => &[
                "agreement",
                "contract",
                "hereby",
                "whereas",
                "party",
                "obligations",
                "termination",
                "breach",
                "governing law",
                "effective date",
                "terms and conditions",
                "confidentiality",
            ],
            Category::Letter => &[
                "dear",
                "sincerely",
                "best regards",
                "kind regards",
                "yours truly",
                "yours faithfully",
                "to whom it may concern",
                "i am writing",
                "thank you for",
                "respectfully",
            ],
            Category::Report => &[
                "report",
                "executive summary",
                "findings",
                "methodology",
                "conclusion",
                "recommendations",
                "analysis",
                "introduction",
                "results",
                "key metrics",
            ],
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Category {
    type Err = ClassifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .iter()
            .copied()
            .find(|c| c.key().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ClassifierError::ValidationError(format!("Unknown category '{}'", s)))
    }
}

/// Maps every category to its ordered list of lower-case signal phrases.
#[derive(Debug, Clone, PartialEq)]
pub struct KeywordTable {
    phrases: [Vec<String>; Category::COUNT],
}

impl Default for KeywordTable {
    fn default() -> Self {
        Self {
            phrases: Category::ALL.map(|c| {
                c.default_keywords().iter().map(|k| k.to_string()).collect()
            }),
        }
    }
}

impl KeywordTable {
    /// Creates a table with no phrases for any category.
    pub fn empty() -> Self {
        Self {
            phrases: Default::default(),
        }
    }

    /// Replaces the phrases of one category. Phrases are lower-cased and
    /// blank ones are rejected.
    pub fn with_phrases(
        mut self,
        category: Category,
        phrases: Vec<impl Into<String>>,
    ) -> Result<Self, ClassifierError> {
        let phrases: Vec<String> = phrases
            .into_iter()
            .map(|p| p.into().trim().to_lowercase())
            .collect();
        if let Some(pos) = phrases.iter().position(|p| p.is_empty()) {
            return Err(ClassifierError::ValidationError(format!(
                "Keyword {} for category '{}' cannot be empty",
                pos + 1,
                category.key()
            )));
        }
        self.phrases[category.index()] = phrases;
        Ok(self)
    }

    pub fn phrases(&self, category: Category) -> &[String] {
        &self.phrases[category.index()]
    }

    /// Counts, per category, how many of its phrases occur in `lowered`.
    /// Each phrase counts at most once regardless of repetitions.
    pub fn count_hits(&self, lowered: &str) -> [usize; Category::COUNT] {
        Category::ALL.map(|c| {
            self.phrases(c)
                .iter()
                .filter(|phrase| lowered.contains(phrase.as_str()))
                .count()
        })
    }
}
