use std::fmt;

/// Represents the different types of errors that can occur in the document classifier.
#[derive(Debug, Clone, PartialEq)]
pub enum ClassifierError {
    /// Input text was empty or carried too few non-whitespace characters
    InsufficientInput(usize),
    /// Error occurred while vectorizing or scoring a document
    InferenceError(String),
    /// Error occurred while fitting the model
    BuildError(String),
    /// Error occurred due to invalid input parameters
    ValidationError(String),
}

impl fmt::Display for ClassifierError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InsufficientInput(chars) => {
                write!(f, "Insufficient input: {} non-whitespace characters", chars)
            }
            Self::InferenceError(msg) => write!(f, "Inference error: {}", msg),
            Self::BuildError(msg) => write!(f, "Build error: {}", msg),
            Self::ValidationError(msg) => write!(f, "Validation error: {}", msg),
        }
    }
}

impl std::error::Error for ClassifierError {}
