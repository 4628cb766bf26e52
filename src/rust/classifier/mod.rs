mod blending;
mod boosting;
pub mod builder;
mod category;
mod classifier;
mod corpus;
mod error;
mod model;
mod result;
mod utils;
mod vectorizer;

pub use blending::{normalize, BlendOutcome, BlendPath, BlendingConfig};
pub use boosting::{BoostingConfig, GradientBoosting, RegressionTree};
pub use builder::ClassifierBuilder;
pub use category::{Category, KeywordTable};
pub use classifier::{Classifier, MIN_TEXT_CHARS};
pub use corpus::{Augmentation, TrainingCorpus};
pub use error::ClassifierError;
pub use model::{ModelConfig, StatisticalModel};
pub use result::{ClassificationResult, UNKNOWN_LABEL};
pub use vectorizer::{TfidfVectorizer, VectorizerConfig};

/// Information about the fitted state of a classifier
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct ClassifierInfo {
    /// Categories in declaration order
    pub categories: Vec<Category>,
    /// Number of terms retained by the TF-IDF vectorizer
    pub vocabulary_size: usize,
    /// Boosting rounds in the fitted ensemble
    pub n_estimators: usize,
    /// Training examples after augmentation
    pub training_examples: usize,
    /// Fraction of training examples the statistical model labels correctly
    pub training_accuracy: f64,
    /// SHA-256 of the training corpus
    pub corpus_digest: String,
}
