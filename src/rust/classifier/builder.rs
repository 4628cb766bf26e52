use std::path::Path;
use std::sync::Arc;

use log::{info, warn};

use super::blending::BlendingConfig;
use super::category::{Category, KeywordTable};
use super::classifier::Classifier;
use super::corpus::{Augmentation, TrainingCorpus};
use super::error::ClassifierError;
use super::model::{ModelConfig, StatisticalModel, TextModel};
use crate::telemetry::TelemetrySink;

/// A builder for constructing a Classifier with a fluent interface.
///
/// Building fits the statistical model, so it is the expensive step; the
/// resulting [`Classifier`] is immutable and cheap to share.
#[derive(Debug)]
pub struct ClassifierBuilder {
    corpus: TrainingCorpus,
    augmentations: Vec<Augmentation>,
    keywords: KeywordTable,
    model_config: ModelConfig,
    blending: BlendingConfig,
    telemetry: Option<Arc<dyn TelemetrySink>>,
    model: Option<StatisticalModel>,
}

impl Default for ClassifierBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TextModel for ClassifierBuilder {
    /// Returns the model fitted so far, if any
    fn model(&self) -> Option<&StatisticalModel> {
        self.model.as_ref()
    }
}

impl ClassifierBuilder {
    /// Creates a builder with the built-in corpus, keyword table and default
    /// configuration
    ///
    /// # Example
    /// ```
    /// use docsort::ClassifierBuilder;
    ///
    /// let builder = ClassifierBuilder::new();
    /// ```
    pub fn new() -> Self {
        Self {
            corpus: TrainingCorpus::builtin(),
            augmentations: Augmentation::DEFAULT.to_vec(),
            keywords: KeywordTable::default(),
            model_config: ModelConfig::default(),
            blending: BlendingConfig::default(),
            telemetry: None,
            model: None,
        }
    }

    /// Sets the vectorizer and boosting hyper-parameters
    ///
    /// # Example
    /// ```
    /// use docsort::{BoostingConfig, ClassifierBuilder, ModelConfig};
    ///
    /// let mut config = ModelConfig::default();
    /// config.boosting = BoostingConfig { n_estimators: 50, ..BoostingConfig::default() };
    /// let builder = ClassifierBuilder::new().with_model_config(config);
    /// ```
    pub fn with_model_config(mut self, config: ModelConfig) -> Self {
        self.model_config = config;
        self
    }

    /// Sets the blending constants
    ///
    /// # Returns
    /// * `Result<Self, ClassifierError>` - The builder, or a `ValidationError`
    ///   if a constant is negative, non-finite, or the cap exceeds 100
    pub fn with_blending_config(mut self, config: BlendingConfig) -> Result<Self, ClassifierError> {
        config.validate()?;
        self.blending = config;
        Ok(self)
    }

    /// Replaces the training corpus
    pub fn with_corpus(mut self, corpus: TrainingCorpus) -> Self {
        self.corpus = corpus;
        self
    }

    /// Loads the training corpus from a JSON file
    ///
    /// # Returns
    /// * `Result<Self, ClassifierError>` - The builder, or an error if:
    ///   - The file cannot be read or parsed
    ///   - A category has no examples
    ///   - An example is blank
    pub fn with_corpus_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self, ClassifierError> {
        self.corpus = TrainingCorpus::from_json_file(path)?;
        Ok(self)
    }

    /// Sets the augmentation strategies. An empty list trains on the corpus as-is.
    pub fn with_augmentations(mut self, strategies: Vec<Augmentation>) -> Self {
        self.augmentations = strategies;
        self
    }

    /// Replaces the keyword table
    pub fn with_keywords(mut self, keywords: KeywordTable) -> Self {
        self.keywords = keywords;
        self
    }

    /// Reports every `classify_tracked` call to `sink`
    pub fn with_telemetry(mut self, sink: Arc<dyn TelemetrySink>) -> Self {
        self.telemetry = Some(sink);
        self
    }

    /// Fits the statistical model and returns the final Classifier
    ///
    /// # Returns
    /// * `Result<Classifier, ClassifierError>` - The constructed Classifier if successful, or an error if:
    ///   - The corpus is missing a category or has blank examples
    ///   - The vectorizer or ensemble configuration is invalid
    ///   - No term survives the document-frequency filters
    ///
    /// # Example
    /// ```no_run
    /// # fn main() -> Result<(), docsort::ClassifierError> {
    /// use docsort::ClassifierBuilder;
    ///
    /// let classifier = ClassifierBuilder::new().build()?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn build(mut self) -> Result<Classifier, ClassifierError> {
        self.corpus.validate()?;

        let (texts, labels) = self.corpus.augmented(&self.augmentations);
        info!(
            "Training on {} documents ({} examples, {} augmentations)",
            texts.len(),
            self.corpus.len(),
            self.augmentations.len()
        );

        self.model = Some(StatisticalModel::fit(&self.model_config, &texts, &labels)?);
        let training_accuracy = self.training_accuracy(&texts, &labels);
        info!("Training accuracy: {:.2}%", training_accuracy * 100.0);

        let model = self
            .model
            .take()
            .ok_or_else(|| ClassifierError::BuildError("No model fitted".into()))?;

        Ok(Classifier {
            model: Arc::new(model),
            keywords: Arc::new(self.keywords),
            blending: self.blending,
            telemetry: self.telemetry,
            training_examples: texts.len(),
            training_accuracy,
            corpus_digest: self.corpus.digest(),
        })
    }

    fn training_accuracy(&self, texts: &[String], labels: &[Category]) -> f64 {
        if texts.is_empty() {
            return 0.0;
        }
        let correct = texts
            .iter()
            .zip(labels)
            .filter(|(text, label)| match self.predict_category(text) {
                Ok(predicted) => predicted == **label,
                Err(e) => {
                    warn!("Failed to score training example: {}", e);
                    false
                }
            })
            .count();
        correct as f64 / texts.len() as f64
    }
}
