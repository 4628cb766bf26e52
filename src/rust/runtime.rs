use std::fmt;
use std::sync::{Arc, OnceLock};
use std::time::Instant;

use log::{error, info};

use crate::classifier::{Classifier, ClassifierBuilder, ClassifierError};

type BuildFn = Box<dyn Fn() -> Result<Classifier, ClassifierError> + Send + Sync>;

/// Builds a classifier at most once, on first use.
///
/// Concurrent callers of [`get_or_init`](Self::get_or_init) block until the
/// first build finishes and then share its outcome. A failed build is kept
/// and returned to every later caller; it is not retried.
pub struct ClassifierCell {
    cell: OnceLock<Result<Arc<Classifier>, ClassifierError>>,
    build: BuildFn,
}

impl fmt::Debug for ClassifierCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassifierCell")
            .field("initialized", &self.is_initialized())
            .finish()
    }
}

impl Default for ClassifierCell {
    fn default() -> Self {
        Self::new(|| ClassifierBuilder::new().build())
    }
}

impl ClassifierCell {
    pub fn new<F>(build: F) -> Self
    where
        F: Fn() -> Result<Classifier, ClassifierError> + Send + Sync + 'static,
    {
        Self {
            cell: OnceLock::new(),
            build: Box::new(build),
        }
    }

    /// Returns the shared classifier, building it first if needed.
    pub fn get_or_init(&self) -> Result<Arc<Classifier>, ClassifierError> {
        self.cell
            .get_or_init(|| {
                let start = Instant::now();
                info!("Building classifier...");
                match (self.build)() {
                    Ok(classifier) => {
                        info!("Classifier built in {:.2?}", start.elapsed());
                        Ok(Arc::new(classifier))
                    }
                    Err(e) => {
                        error!("Failed to build classifier: {}", e);
                        Err(e)
                    }
                }
            })
            .clone()
    }

    /// Returns the classifier if a build has already succeeded.
    pub fn get(&self) -> Option<Arc<Classifier>> {
        self.cell.get().and_then(|r| r.as_ref().ok()).cloned()
    }

    pub fn is_initialized(&self) -> bool {
        self.cell.get().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::TrainingCorpus;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;

    #[test]
    fn test_failed_build_is_cached() {
        let attempts = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&attempts);
        let cell = ClassifierCell::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            ClassifierBuilder::new().with_corpus(TrainingCorpus::new()).build()
        });

        assert!(!cell.is_initialized());
        for _ in 0..3 {
            assert!(matches!(
                cell.get_or_init(),
                Err(ClassifierError::ValidationError(_))
            ));
        }
        assert!(cell.is_initialized());
        assert!(cell.get().is_none());
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_concurrent_callers_share_one_failure() {
        let attempts = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&attempts);
        let cell = Arc::new(ClassifierCell::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            Err(ClassifierError::BuildError("unavailable".into()))
        }));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let cell = Arc::clone(&cell);
                thread::spawn(move || cell.get_or_init().is_err())
            })
            .collect();
        for handle in handles {
            assert!(handle.join().unwrap());
        }
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
    }
}
