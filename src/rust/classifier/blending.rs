use serde::{Deserialize, Serialize};

use super::category::Category;
use super::error::ClassifierError;

/// Tunable constants of the blending rule that combines keyword evidence
/// with statistical scores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlendingConfig {
    /// Minimum keyword hits for one category before keywords override the model
    pub keyword_override_threshold: usize,
    /// Confidence granted to the keyword winner before per-hit increments
    pub keyword_base_confidence: f64,
    /// Confidence added per keyword hit on the override path
    pub keyword_confidence_step: f64,
    /// Upper bound for the keyword winner's confidence
    pub keyword_confidence_cap: f64,
    /// Multiplier applied to the other categories' statistical scores on the
    /// override path
    pub statistical_discount: f64,
    /// Points added per keyword hit when keywords do not override
    pub keyword_boost_weight: f64,
}

impl Default for BlendingConfig {
    fn default() -> Self {
        Self {
            keyword_override_threshold: 3,
            keyword_base_confidence: 75.0,
            keyword_confidence_step: 5.0,
            keyword_confidence_cap: 95.0,
            statistical_discount: 0.2,
            keyword_boost_weight: 12.0,
        }
    }
}

/// Which branch of the blending rule produced the scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlendPath {
    /// Keyword hits reached the override threshold for this category
    KeywordOverride(Category),
    /// Keyword hits were added on top of the statistical scores
    Additive,
}

/// Normalized per-category scores and the branch that produced them.
#[derive(Debug, Clone, PartialEq)]
pub struct BlendOutcome {
    pub scores: [f64; Category::COUNT],
    pub path: BlendPath,
}

impl BlendingConfig {
    pub fn validate(&self) -> Result<(), ClassifierError> {
        let non_negative = [
            ("keyword_base_confidence", self.keyword_base_confidence),
            ("keyword_confidence_step", self.keyword_confidence_step),
            ("keyword_confidence_cap", self.keyword_confidence_cap),
            ("statistical_discount", self.statistical_discount),
            ("keyword_boost_weight", self.keyword_boost_weight),
        ];
        if let Some((name, value)) = non_negative
            .iter()
            .find(|(_, v)| !v.is_finite() || *v < 0.0)
        {
            return Err(ClassifierError::ValidationError(format!(
                "{} must be a non-negative number, got {}",
                name, value
            )));
        }
        if self.keyword_confidence_cap > 100.0 {
            return Err(ClassifierError::ValidationError(format!(
                "keyword_confidence_cap cannot exceed 100, got {}",
                self.keyword_confidence_cap
            )));
        }
        if self.keyword_override_threshold == 0 {
            return Err(ClassifierError::ValidationError(
                "keyword_override_threshold must be at least 1".into(),
            ));
        }
        Ok(())
    }

    /// Combines keyword hit counts with statistical percentages.
    ///
    /// With at least `keyword_override_threshold` hits for some category, the
    /// category with most hits (earliest declared on ties) gets
    /// `min(base + step * hits, cap)` and every other category keeps
    /// `statistical_discount` of its statistical score. Otherwise each
    /// category scores `statistical + boost * hits`. Scores are then
    /// normalized to sum to 100, and the override winner is held at the cap
    /// with any surplus shared equally by the other categories.
    pub fn blend(
        &self,
        keyword_hits: &[usize; Category::COUNT],
        statistical: &[f64; Category::COUNT],
    ) -> BlendOutcome {
        let max_hits = keyword_hits.iter().copied().max().unwrap_or(0);

        if max_hits >= self.keyword_override_threshold {
            let best = keyword_hits
                .iter()
                .position(|&h| h == max_hits)
                .unwrap_or(0);
            let winner_raw = (self.keyword_base_confidence
                + self.keyword_confidence_step * keyword_hits[best] as f64)
                .min(self.keyword_confidence_cap);

            let mut raw = statistical.map(|s| s * self.statistical_discount);
            raw[best] = winner_raw;

            let mut scores = normalize(raw);
            cap_winner(&mut scores, best, self.keyword_confidence_cap);

            return BlendOutcome {
                scores,
                path: BlendPath::KeywordOverride(Category::ALL[best]),
            };
        }

        let mut raw = *statistical;
        for (score, &hits) in raw.iter_mut().zip(keyword_hits) {
            *score += self.keyword_boost_weight * hits as f64;
        }
        BlendOutcome {
            scores: normalize(raw),
            path: BlendPath::Additive,
        }
    }
}

/// Scales scores to sum to 100. An all-zero input is returned unchanged.
pub fn normalize(raw: [f64; Category::COUNT]) -> [f64; Category::COUNT] {
    let sum: f64 = raw.iter().sum();
    if sum == 0.0 {
        return raw;
    }
    raw.map(|s| s / sum * 100.0)
}

/// Holds the winner at `cap` and shares any surplus equally among the other
/// categories. Their order is unchanged.
fn cap_winner(scores: &mut [f64; Category::COUNT], winner: usize, cap: f64) {
    let surplus = scores[winner] - cap;
    if surplus <= 0.0 {
        return;
    }
    scores[winner] = cap;

    let share = surplus / (Category::COUNT - 1) as f64;
    for (i, score) in scores.iter_mut().enumerate() {
        if i != winner {
            *score += share;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sum(scores: &[f64]) -> f64 {
        scores.iter().sum()
    }

    #[test]
    fn test_additive_path_boosts_keyword_hits() {
        let config = BlendingConfig::default();
        let outcome = config.blend(&[0, 2, 0, 0, 0], &[20.0; 5]);
        assert_eq!(outcome.path, BlendPath::Additive);
        // Raw: 20, 44, 20, 20, 20 -> sum 124
        assert!((outcome.scores[1] - 44.0 / 124.0 * 100.0).abs() < 1e-9);
        assert!((sum(&outcome.scores) - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_override_path_discounts_statistics() {
        let config = BlendingConfig::default();
        let statistical = [10.0, 10.0, 40.0, 20.0, 20.0];
        let outcome = config.blend(&[0, 3, 0, 1, 0], &statistical);
        assert_eq!(outcome.path, BlendPath::KeywordOverride(Category::Invoice));
        // Raw: 2, 90, 8, 4, 4 -> sum 108
        assert!((outcome.scores[1] - 90.0 / 108.0 * 100.0).abs() < 1e-9);
        assert!((outcome.scores[2] - 8.0 / 108.0 * 100.0).abs() < 1e-9);
        assert!((sum(&outcome.scores) - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_override_ties_go_to_first_declared_category() {
        let config = BlendingConfig::default();
        let outcome = config.blend(&[0, 0, 4, 4, 0], &[20.0; 5]);
        assert_eq!(outcome.path, BlendPath::KeywordOverride(Category::Contract));
    }

    #[test]
    fn test_override_confidence_is_capped_after_normalization() {
        let config = BlendingConfig::default();
        // The model agrees with the keywords, so the other categories are near zero.
        let statistical = [0.0, 100.0, 0.0, 0.0, 0.0];
        let outcome = config.blend(&[0, 9, 0, 0, 0], &statistical);
        assert_eq!(outcome.scores[1], 95.0);
        for (i, score) in outcome.scores.iter().enumerate() {
            if i != 1 {
                assert!((score - 1.25).abs() < 1e-9);
            }
        }
        assert!((sum(&outcome.scores) - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_cap_surplus_is_spread_evenly() {
        let mut scores = [98.0, 1.5, 0.5, 0.0, 0.0];
        cap_winner(&mut scores, 0, 95.0);
        assert_eq!(scores[0], 95.0);
        assert!((scores[1] - 2.25).abs() < 1e-9);
        assert!((scores[2] - 1.25).abs() < 1e-9);
        assert!((scores[3] - 0.75).abs() < 1e-9);
        assert!((scores[4] - 0.75).abs() < 1e-9);
        assert!((sum(&scores) - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_cap_does_not_amplify_small_scores() {
        let config = BlendingConfig::default();
        // One category the model gave a sliver of probability, the rest nothing.
        let statistical = [0.0, 99.9998, 0.0002, 0.0, 0.0];
        let outcome = config.blend(&[0, 9, 0, 0, 0], &statistical);
        assert_eq!(outcome.scores[1], 95.0);
        assert!(outcome.scores[2] < 1.26);
        assert!((outcome.scores[2] - outcome.scores[3]).abs() < 1e-3);
    }

    #[test]
    fn test_normalize_leaves_zero_sum_untouched() {
        assert_eq!(normalize([0.0; 5]), [0.0; 5]);
        let scaled = normalize([1.0, 1.0, 2.0, 0.0, 0.0]);
        assert_eq!(scaled, [25.0, 25.0, 50.0, 0.0, 0.0]);
    }

    #[test]
    fn test_validate_rejects_bad_constants() {
        assert!(BlendingConfig::default().validate().is_ok());
        let config = BlendingConfig {
            keyword_confidence_cap: 120.0,
            ..BlendingConfig::default()
        };
        assert!(config.validate().is_err());
        let config = BlendingConfig {
            statistical_discount: -0.5,
            ..BlendingConfig::default()
        };
        assert!(config.validate().is_err());
        let config = BlendingConfig {
            keyword_override_threshold: 0,
            ..BlendingConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
