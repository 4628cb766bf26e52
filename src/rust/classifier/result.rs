use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::category::Category;
use super::error::ClassifierError;
use super::utils::argmax;

/// Label used when a document could not be classified.
pub const UNKNOWN_LABEL: &str = "Unknown";

/// The outcome of classifying one document.
///
/// A known result carries a score for every category, rounded to two decimals
/// and summing to 100; `confidence` is the score of the chosen category and
/// the largest score. The unknown result has zero confidence and no scores.
///
/// Scores are rounded by largest remainder, not one by one, so a score may
/// differ from its plainly rounded value by 0.01: three equal thirds become
/// 33.34, 33.33 and 33.33.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(into = "ResultRecord", try_from = "ResultRecord")]
pub struct ClassificationResult {
    category: Option<Category>,
    confidence: f64,
    all_scores: BTreeMap<Category, f64>,
}

impl ClassificationResult {
    /// The result returned for unusable input or failed inference.
    pub fn unknown() -> Self {
        Self {
            category: None,
            confidence: 0.0,
            all_scores: BTreeMap::new(),
        }
    }

    /// Builds a result from normalized scores in category declaration order.
    /// The winning category is picked after rounding so that `confidence`
    /// always equals the largest rounded score.
    pub fn from_scores(scores: &[f64; Category::COUNT]) -> Self {
        let rounded = round_preserving_sum(scores);
        let Some(best) = argmax(&rounded).and_then(Category::from_index) else {
            return Self::unknown();
        };
        Self {
            category: Some(best),
            confidence: rounded[best.index()],
            all_scores: Category::ALL
                .iter()
                .map(|c| (*c, rounded[c.index()]))
                .collect(),
        }
    }

    /// The chosen category, or `None` for the unknown result.
    pub fn category(&self) -> Option<Category> {
        self.category
    }

    /// Title-cased category name, or `"Unknown"`.
    pub fn label(&self) -> &'static str {
        self.category.map(Category::label).unwrap_or(UNKNOWN_LABEL)
    }

    pub fn is_unknown(&self) -> bool {
        self.category.is_none()
    }

    /// Confidence percentage of the chosen category, 0–100.
    pub fn confidence(&self) -> f64 {
        self.confidence
    }

    pub fn all_scores(&self) -> &BTreeMap<Category, f64> {
        &self.all_scores
    }

    pub fn score(&self, category: Category) -> Option<f64> {
        self.all_scores.get(&category).copied()
    }
}

/// Rounds to two decimals. When the scores sum to 100, hundredths are
/// allocated by largest remainder so the rounded scores still sum to 100.
fn round_preserving_sum(scores: &[f64; Category::COUNT]) -> [f64; Category::COUNT] {
    let total: f64 = scores.iter().sum();
    if (total - 100.0).abs() > 1e-6 {
        return scores.map(super::utils::round2);
    }

    let cents = scores.map(|s| s * 100.0);
    let mut floors = cents.map(f64::floor);
    let deficit = (10_000.0 - floors.iter().sum::<f64>()).round().max(0.0) as usize;

    let mut order: Vec<usize> = (0..Category::COUNT).collect();
    order.sort_by(|&a, &b| {
        let ra = cents[a] - floors[a];
        let rb = cents[b] - floors[b];
        rb.total_cmp(&ra).then(a.cmp(&b))
    });
    for &i in order.iter().take(deficit) {
        floors[i] += 1.0;
    }
    floors.map(|c| c / 100.0)
}

/// Wire form: `{"category": "Invoice", "confidence": 87.5, "all_scores": {"invoice": 87.5, ...}}`.
#[derive(Serialize, Deserialize)]
struct ResultRecord {
    category: String,
    confidence: f64,
    #[serde(default)]
    all_scores: BTreeMap<Category, f64>,
}

impl From<ClassificationResult> for ResultRecord {
    fn from(result: ClassificationResult) -> Self {
        Self {
            category: result.label().to_string(),
            confidence: result.confidence,
            all_scores: result.all_scores,
        }
    }
}

impl TryFrom<ResultRecord> for ClassificationResult {
    type Error = ClassifierError;

    fn try_from(record: ResultRecord) -> Result<Self, Self::Error> {
        let category = if record.category == UNKNOWN_LABEL {
            None
        } else {
            Some(record.category.parse::<Category>()?)
        };
        Ok(Self {
            category,
            confidence: record.confidence,
            all_scores: record.all_scores,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_serializes_with_empty_scores() {
        let json = serde_json::to_string(&ClassificationResult::unknown()).unwrap();
        assert_eq!(json, r#"{"category":"Unknown","confidence":0.0,"all_scores":{}}"#);
    }

    #[test]
    fn test_rounded_scores_sum_to_exactly_one_hundred() {
        let third = 100.0 / 3.0;
        let result = ClassificationResult::from_scores(&[third, third, third, 0.0, 0.0]);
        let cents: i64 = result
            .all_scores()
            .values()
            .map(|s| (s * 100.0).round() as i64)
            .sum();
        assert_eq!(cents, 10_000);
        // The earliest category receives the spare hundredth.
        assert_eq!(result.category(), Some(Category::Resume));
        assert_eq!(result.confidence(), 33.34);
    }

    #[test]
    fn test_confidence_matches_top_score() {
        let result = ClassificationResult::from_scores(&[10.0, 60.0, 10.0, 10.0, 10.0]);
        assert_eq!(result.label(), "Invoice");
        assert_eq!(result.confidence(), 60.0);
        assert_eq!(result.score(Category::Invoice), Some(60.0));
        assert_eq!(result.all_scores().len(), Category::COUNT);
    }

    #[test]
    fn test_json_shape() {
        let result = ClassificationResult::from_scores(&[0.0, 100.0, 0.0, 0.0, 0.0]);
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["category"], "Invoice");
        assert_eq!(value["all_scores"]["invoice"], 100.0);
        let parsed: ClassificationResult = serde_json::from_value(value).unwrap();
        assert_eq!(parsed, result);
    }
}
