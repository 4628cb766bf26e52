use log::{debug, info};
use ndarray::Array1;

use super::boosting::{BoostingConfig, GradientBoosting};
use super::category::Category;
use super::error::ClassifierError;
use super::utils::argmax;
use super::vectorizer::{TfidfVectorizer, VectorizerConfig};

/// Settings for fitting the statistical model.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelConfig {
    pub vectorizer: VectorizerConfig,
    pub boosting: BoostingConfig,
    /// Distinct known words a document needs before the ensemble's
    /// probabilities are used undiluted. Documents with fewer known words
    /// are pulled toward the class priors in proportion. Zero disables this.
    pub min_evidence_terms: usize,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            vectorizer: VectorizerConfig::default(),
            boosting: BoostingConfig::default(),
            min_evidence_terms: 8,
        }
    }
}

/// A fitted TF-IDF vectorizer composed with a boosted tree ensemble.
///
/// Immutable once fitted; inference borrows it shared.
#[derive(Debug, Clone)]
pub struct StatisticalModel {
    vectorizer: TfidfVectorizer,
    ensemble: GradientBoosting,
    min_evidence_terms: usize,
}

impl StatisticalModel {
    /// Fits the vectorizer and then the ensemble on `texts`.
    pub fn fit(
        config: &ModelConfig,
        texts: &[String],
        labels: &[Category],
    ) -> Result<Self, ClassifierError> {
        if texts.len() != labels.len() {
            return Err(ClassifierError::BuildError(format!(
                "Got {} training texts but {} labels",
                texts.len(),
                labels.len()
            )));
        }

        let vectorizer = TfidfVectorizer::fit(config.vectorizer.clone(), texts)?;
        info!(
            "Vectorizer fitted with {} terms over {} documents",
            vectorizer.vocabulary_size(),
            texts.len()
        );

        let features = vectorizer
            .transform_batch(texts)
            .map_err(|e| ClassifierError::BuildError(format!("Failed to vectorize corpus: {}", e)))?;
        let label_indices: Vec<usize> = labels.iter().map(|c| c.index()).collect();

        let ensemble =
            GradientBoosting::fit(&config.boosting, &features, &label_indices, Category::COUNT)?;
        info!(
            "Ensemble fitted: {} rounds, depth <= {}, learning rate {}",
            ensemble.n_estimators(),
            config.boosting.max_depth,
            config.boosting.learning_rate
        );

        Ok(Self {
            vectorizer,
            ensemble,
            min_evidence_terms: config.min_evidence_terms,
        })
    }

    pub fn vectorizer(&self) -> &TfidfVectorizer {
        &self.vectorizer
    }

    pub fn ensemble(&self) -> &GradientBoosting {
        &self.ensemble
    }

    /// Weight in `[0, 1]` given to the ensemble for a document with
    /// `known_terms` distinct in-vocabulary words; the priors get the rest.
    pub fn evidence_weight(&self, known_terms: usize) -> f64 {
        if self.min_evidence_terms == 0 {
            return 1.0;
        }
        (known_terms as f64 / self.min_evidence_terms as f64).min(1.0)
    }

    #[cfg(test)]
    pub(crate) fn ensemble_mut(&mut self) -> &mut GradientBoosting {
        &mut self.ensemble
    }
}

/// Scores text with a fitted statistical model.
///
/// The steps are:
/// 1. Vectorize the text with the fitted TF-IDF transform
/// 2. Run the boosted ensemble to get class probabilities
/// 3. Convert the probabilities to percentages per category
///
/// A document with no in-vocabulary terms carries no evidence, so it scores
/// as the class priors rather than going through the trees. A document with
/// only a few known words gets a mix of the two, so that ordinary prose
/// sharing some words with the corpus is not scored with near certainty.
pub(crate) trait TextModel {
    /// Returns the fitted model if available
    fn model(&self) -> Option<&StatisticalModel>;

    /// Class probabilities in category declaration order.
    ///
    /// # Errors
    /// - `InferenceError` if no model is fitted
    /// - `InferenceError` if tokenization fails
    /// - `InferenceError` if the ensemble produces non-finite probabilities
    fn predict_proba(&self, text: &str) -> Result<Array1<f64>, ClassifierError> {
        let model = self
            .model()
            .ok_or_else(|| ClassifierError::InferenceError("Model not fitted".into()))?;

        let row = model.vectorizer().transform(text)?;
        let priors = model.ensemble().priors();
        let weight = if row.iter().all(|&x| x == 0.0) {
            0.0
        } else {
            model.evidence_weight(model.vectorizer().known_terms(text)?)
        };

        let probs = if weight == 0.0 {
            debug!("No known terms in input; falling back to class priors");
            priors.clone()
        } else {
            let fitted = model.ensemble().predict_proba(row.view());
            if weight < 1.0 {
                debug!("Diluting model probabilities with weight {:.2}", weight);
            }
            fitted * weight + priors * (1.0 - weight)
        };

        if probs.len() != Category::COUNT || probs.iter().any(|p| !p.is_finite()) {
            return Err(ClassifierError::InferenceError(format!(
                "Model produced invalid probabilities: {:?}",
                probs
            )));
        }
        Ok(probs)
    }

    /// Probabilities scaled to percentages (0–100) per category.
    fn statistical_scores(&self, text: &str) -> Result<[f64; Category::COUNT], ClassifierError> {
        let probs = self.predict_proba(text)?;
        Ok(Category::ALL.map(|c| probs[c.index()] * 100.0))
    }

    /// Most probable category according to the statistical model alone.
    fn predict_category(&self, text: &str) -> Result<Category, ClassifierError> {
        let probs = self.predict_proba(text)?.to_vec();
        argmax(&probs)
            .and_then(Category::from_index)
            .ok_or_else(|| ClassifierError::InferenceError("Empty probability vector".into()))
    }
}

impl TextModel for StatisticalModel {
    fn model(&self) -> Option<&StatisticalModel> {
        Some(self)
    }
}
