use std::sync::Arc;

use log::{debug, error, warn};

use super::blending::{BlendOutcome, BlendPath, BlendingConfig};
use super::category::{Category, KeywordTable};
use super::error::ClassifierError;
use super::model::{StatisticalModel, TextModel};
use super::result::ClassificationResult;
use crate::telemetry::{TelemetryRecord, TelemetrySink};

/// Inputs with fewer non-whitespace characters than this are not classified.
pub const MIN_TEXT_CHARS: usize = 10;

/// A thread-safe hybrid document classifier.
///
/// Combines a keyword-signal table with a TF-IDF + gradient-boosting model.
/// Everything is fitted in [`ClassifierBuilder::build`](super::ClassifierBuilder::build)
/// and read-only afterwards, so a single instance can be shared across threads
/// with `Arc` and `classify` called concurrently without locking.
///
/// ```no_run
/// use docsort::Classifier;
///
/// let classifier = Classifier::builder().build()?;
/// let result = classifier.classify("INVOICE 42 Subtotal 90 Tax 10 Total Due 100");
/// println!("{} ({:.2}%)", result.label(), result.confidence());
/// # Ok::<(), docsort::ClassifierError>(())
/// ```
#[derive(Debug)]
pub struct Classifier {
    pub(crate) model: Arc<StatisticalModel>,
    pub(crate) keywords: Arc<KeywordTable>,
    pub(crate) blending: BlendingConfig,
    pub(crate) telemetry: Option<Arc<dyn TelemetrySink>>,
    pub(crate) training_examples: usize,
    pub(crate) training_accuracy: f64,
    pub(crate) corpus_digest: String,
}

// Compile-time verification of thread-safety
const _: () = {
    fn assert_send_sync<T: Send + Sync>() {}
    fn verify_thread_safety() {
        assert_send_sync::<Classifier>();
    }
};

impl TextModel for Classifier {
    fn model(&self) -> Option<&StatisticalModel> {
        Some(&self.model)
    }
}

impl Classifier {
    /// Creates a new ClassifierBuilder for fluent construction
    pub fn builder() -> super::builder::ClassifierBuilder {
        super::builder::ClassifierBuilder::new()
    }

    /// Returns information about the fitted classifier
    pub fn info(&self) -> super::ClassifierInfo {
        super::ClassifierInfo {
            categories: Category::ALL.to_vec(),
            vocabulary_size: self.model.vectorizer().vocabulary_size(),
            n_estimators: self.model.ensemble().n_estimators(),
            training_examples: self.training_examples,
            training_accuracy: self.training_accuracy,
            corpus_digest: self.corpus_digest.clone(),
        }
    }

    pub fn blending_config(&self) -> &BlendingConfig {
        &self.blending
    }

    /// Classifies a document.
    ///
    /// Never fails: input that is too short, and any fault while scoring,
    /// both produce [`ClassificationResult::unknown`].
    ///
    /// # Arguments
    /// * `text` - Extracted document text, any length
    pub fn classify(&self, text: &str) -> ClassificationResult {
        match self.try_classify(text) {
            Ok(result) => result,
            Err(ClassifierError::InsufficientInput(chars)) => {
                debug!("Skipping classification of short input ({} chars)", chars);
                ClassificationResult::unknown()
            }
            Err(e) => {
                error!("Classification error: {}", e);
                ClassificationResult::unknown()
            }
        }
    }

    /// Classifies a document, reporting why classification was not possible.
    ///
    /// # Errors
    /// - `InsufficientInput` if the text has fewer than 10 non-whitespace characters
    /// - `InferenceError` if vectorization or scoring fails
    pub fn try_classify(&self, text: &str) -> Result<ClassificationResult, ClassifierError> {
        let outcome = self.blend(text)?;
        let result = ClassificationResult::from_scores(&outcome.scores);
        debug!(
            "Classified as {} ({:.2}) via {:?}",
            result.label(),
            result.confidence(),
            outcome.path
        );
        Ok(result)
    }

    /// Classifies a document and reports the result to the configured
    /// telemetry sink. Telemetry failures are logged and otherwise ignored.
    pub fn classify_tracked(&self, sample_id: &str, text: &str) -> ClassificationResult {
        let result = self.classify(text);
        if let Some(sink) = &self.telemetry {
            let record = TelemetryRecord::new(sample_id, text, &result);
            if let Err(e) = sink.record(&record) {
                warn!("Failed to record classification {}: {}", sample_id, e);
            }
        }
        result
    }

    /// Scores by keyword hits alone, without the statistical model.
    ///
    /// Each category scores its share of all hits; no hits at all gives the
    /// unknown result.
    pub fn classify_by_keywords(&self, text: &str) -> ClassificationResult {
        let hits = self.keyword_counts(text);
        let total: usize = hits.iter().sum();
        if total == 0 {
            return ClassificationResult::unknown();
        }
        let shares = hits.map(|h| h as f64 / total as f64 * 100.0);
        ClassificationResult::from_scores(&shares)
    }

    /// Number of each category's signal phrases found in `text`, ignoring case.
    pub fn keyword_counts(&self, text: &str) -> [usize; Category::COUNT] {
        self.keywords.count_hits(&text.to_lowercase())
    }

    /// Statistical model percentages per category, before blending.
    pub fn statistical_scores(&self, text: &str) -> Result<[f64; Category::COUNT], ClassifierError> {
        TextModel::statistical_scores(self, text)
    }

    /// Category preferred by the statistical model alone.
    pub fn predict_statistical(&self, text: &str) -> Result<Category, ClassifierError> {
        self.predict_category(text)
    }

    /// Runs both passes and the blending rule, returning the normalized
    /// scores before rounding.
    pub fn blend(&self, text: &str) -> Result<BlendOutcome, ClassifierError> {
        let chars = text.chars().filter(|c| !c.is_whitespace()).count();
        if chars < MIN_TEXT_CHARS {
            return Err(ClassifierError::InsufficientInput(chars));
        }

        let hits = self.keyword_counts(text);
        let statistical = TextModel::statistical_scores(self, text)?;
        let outcome = self.blending.blend(&hits, &statistical);

        if let BlendPath::KeywordOverride(category) = outcome.path {
            debug!(
                "Keyword override for {} with {} hits",
                category,
                hits[category.index()]
            );
        }
        Ok(outcome)
    }
}
