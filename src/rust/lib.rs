//! A thread-safe hybrid document classifier combining keyword signals with a
//! TF-IDF + gradient-boosting model.
//!
//! Documents are sorted into a fixed set of categories: resume, invoice,
//! contract, letter and report.
//!
//! # Basic Usage
//!
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use docsort::{Category, Classifier};
//!
//! let classifier = Classifier::builder().build()?;
//!
//! let result = classifier.classify(
//!     "INVOICE Number 123 Total Due $500 Subtotal $450 Tax $50 Payment Terms Net 30",
//! );
//! assert_eq!(result.category(), Some(Category::Invoice));
//! println!("{}: {:.2}%", result.label(), result.confidence());
//! # Ok(())
//! # }
//! ```
//!
//! Inputs that are too short, or that fail during scoring, classify as
//! `"Unknown"` with zero confidence rather than returning an error. Use
//! [`Classifier::try_classify`] to see the reason.
//!
//! # Thread Safety
//!
//! The classifier is immutable once built and can be shared across threads
//! using `Arc`:
//!
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use docsort::Classifier;
//! use std::sync::Arc;
//! use std::thread;
//!
//! let classifier = Arc::new(Classifier::builder().build()?);
//!
//! let mut handles = vec![];
//! for _ in 0..3 {
//!     let classifier = Arc::clone(&classifier);
//!     handles.push(thread::spawn(move || {
//!         classifier.classify("Dear Sir, I am writing to follow up. Sincerely, Ann");
//!     }));
//! }
//!
//! for handle in handles {
//!     handle.join().unwrap();
//! }
//! # Ok(())
//! # }
//! ```
//!
//! For lazily built process-wide instances see [`ClassifierCell`].

pub mod classifier;
mod runtime;
pub mod telemetry;

pub use classifier::{
    Augmentation, BlendingConfig, BoostingConfig, Category, ClassificationResult, Classifier,
    ClassifierBuilder, ClassifierError, ClassifierInfo, KeywordTable, ModelConfig,
    TrainingCorpus, VectorizerConfig,
};
pub use runtime::ClassifierCell;
pub use telemetry::{HttpSink, LogSink, TelemetryError, TelemetryRecord, TelemetrySink};

pub fn init_logger() {
    env_logger::init();
}
