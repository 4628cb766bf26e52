use docsort::{Category, ClassificationResult, Classifier};
use std::sync::{Arc, OnceLock};
use std::thread;

const INVOICE_TEXT: &str =
    "INVOICE Number 123 Total Due $500 Subtotal $450 Tax $50 Payment Terms Net 30";
const GENERIC_PROSE: &str = "Beneath silver clouds, quiet foxes wander along misty meadows \
                             while gentle rivers murmur softly.";

fn classifier() -> &'static Classifier {
    static CLASSIFIER: OnceLock<Classifier> = OnceLock::new();
    CLASSIFIER.get_or_init(|| {
        Classifier::builder()
            .build()
            .expect("Failed to create classifier")
    })
}

fn assert_normalized(result: &ClassificationResult) {
    let keys: Vec<Category> = result.all_scores().keys().copied().collect();
    assert_eq!(keys, Category::ALL.to_vec());
    let sum: f64 = result.all_scores().values().sum();
    assert!((sum - 100.0).abs() <= 0.01, "scores sum to {}", sum);
    let max = result
        .all_scores()
        .values()
        .copied()
        .fold(f64::MIN, f64::max);
    assert_eq!(result.confidence(), max);
    assert_eq!(result.score(result.category().unwrap()), Some(max));
}

#[test]
fn test_invoice_classification() {
    let result = classifier().classify(INVOICE_TEXT);
    assert_eq!(result.category(), Some(Category::Invoice));
    assert_eq!(result.label(), "Invoice");
    assert!(result.confidence() >= 75.0);
    assert!(result.confidence() <= 95.0);
    assert_normalized(&result);
}

#[test]
fn test_keyword_override_dominance() {
    let result = classifier().classify("Dear John, I am writing to thank you. Sincerely, Jane");
    assert_eq!(result.category(), Some(Category::Letter));
    assert!(result.confidence() >= 75.0);
    assert_normalized(&result);
}

#[test]
fn test_resume_and_contract_classification() {
    let resume = "Jane Doe Resume. Professional Summary: backend engineer. Work Experience: \
                  Acme Corp 2018-2023. Education: BSc Computer Science. Skills: Rust, SQL.";
    let result = classifier().classify(resume);
    assert_eq!(result.category(), Some(Category::Resume));
    assert!(result.confidence() >= 75.0);

    let contract = "This Agreement is entered into by each Party. WHEREAS the Party wishes to \
                    engage services; termination requires notice; governing law is Delaware.";
    let result = classifier().classify(contract);
    assert_eq!(result.category(), Some(Category::Contract));
    assert!(result.confidence() >= 75.0);
}

#[test]
fn test_override_confidence_is_capped() {
    let text = "Invoice. Bill To: Acme. Amount Due 10. Total Due 10. Balance Due 10. \
                Subtotal 9. Tax 1. Payment Terms net 30. Due Date May 1. Unit Price 3. \
                Quantity 3. Receipt attached.";
    let result = classifier().classify(text);
    assert_eq!(result.category(), Some(Category::Invoice));
    assert!(result.confidence() <= 95.0);
    assert_normalized(&result);
}

#[test]
fn test_empty_input_is_unknown() {
    let result = classifier().classify("");
    assert!(result.is_unknown());
    let json = serde_json::to_string(&result).unwrap();
    assert_eq!(json, r#"{"category":"Unknown","confidence":0.0,"all_scores":{}}"#);
}

#[test]
fn test_short_input_floor() {
    for text in ["hello", "  tax   due  ", "123456789", "\n\t a b c \n"] {
        let result = classifier().classify(text);
        assert!(result.is_unknown(), "expected unknown for {:?}", text);
        assert_eq!(result.confidence(), 0.0);
    }
    // Ten non-whitespace characters is enough.
    assert!(!classifier().classify("abcde fghij").is_unknown());
}

#[test]
fn test_generic_prose() {
    let result = classifier().classify(GENERIC_PROSE);
    assert!(!result.is_unknown());
    assert_normalized(&result);
    for score in result.all_scores().values() {
        assert!(*score <= 90.0, "score {} exceeds 90", score);
    }
}

#[test]
fn test_everyday_prose_is_not_overconfident() {
    // Both share a few words with the training corpus but match no keyword.
    let texts = [
        "The weather was pleasant yesterday and we walked to the park with the children.",
        "Please review the attached document and let me know what you think about it.",
    ];
    for text in texts {
        assert_eq!(classifier().keyword_counts(text), [0; Category::COUNT]);
        let result = classifier().classify(text);
        assert!(!result.is_unknown());
        assert_normalized(&result);
        for (category, score) in result.all_scores() {
            assert!(*score <= 90.0, "{} scored {} for {:?}", category, score, text);
        }
    }
}

#[test]
fn test_determinism() {
    let texts = [INVOICE_TEXT, GENERIC_PROSE, "Quarterly report with findings and analysis"];
    for text in texts {
        let first = classifier().classify(text);
        let second = classifier().classify(text);
        assert_eq!(first, second);
        for (a, b) in first.all_scores().values().zip(second.all_scores().values()) {
            assert_eq!(a.to_bits(), b.to_bits());
        }
    }
}

#[test]
fn test_keyword_counts_case_idempotent() {
    let texts = [
        INVOICE_TEXT,
        "DEAR SIR OR MADAM, TO WHOM IT MAY CONCERN",
        "Executive Summary, Methodology, FINDINGS and Recommendations",
    ];
    for text in texts {
        assert_eq!(
            classifier().keyword_counts(text),
            classifier().keyword_counts(&text.to_lowercase())
        );
        assert_eq!(
            classifier().keyword_counts(text),
            classifier().keyword_counts(&text.to_uppercase())
        );
    }
}

#[test]
fn test_statistical_scores_are_probabilities() {
    let scores = classifier()
        .statistical_scores("Executive summary of the quarterly findings and methodology")
        .unwrap();
    let sum: f64 = scores.iter().sum();
    assert!((sum - 100.0).abs() < 1e-6);
    assert!(scores.iter().all(|s| (0.0..=100.0).contains(s)));
}

#[test]
fn test_info() {
    let info = classifier().info();
    assert_eq!(info.categories, Category::ALL.to_vec());
    assert_eq!(info.n_estimators, 200);
    assert!(info.vocabulary_size > 0 && info.vocabulary_size <= 1000);
    assert_eq!(info.corpus_digest.len(), 64);
    assert!(info.training_accuracy > 0.5);
}

#[test]
fn test_thread_safety() {
    let classifier = Arc::new(classifier());
    let expected = classifier.classify(INVOICE_TEXT);

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let classifier = Arc::clone(&classifier);
            thread::spawn(move || classifier.classify(INVOICE_TEXT))
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), expected);
    }
}
