use docsort::{
    BlendingConfig, BoostingConfig, Category, Classifier, ClassifierError, KeywordTable,
    ModelConfig, TrainingCorpus, VectorizerConfig,
};

fn corpus_with(blank: Option<Category>) -> TrainingCorpus {
    let mut corpus = TrainingCorpus::builtin();
    if let Some(category) = blank {
        corpus.add_examples(category, vec!["   "]);
    }
    corpus
}

#[test]
fn test_empty_corpus() {
    let result = Classifier::builder()
        .with_corpus(TrainingCorpus::new())
        .build();
    assert!(matches!(result, Err(ClassifierError::ValidationError(_))));
}

#[test]
fn test_blank_example() {
    let result = Classifier::builder()
        .with_corpus(corpus_with(Some(Category::Report)))
        .build();
    match result {
        Err(ClassifierError::ValidationError(msg)) => assert!(msg.contains("report")),
        other => panic!("expected validation error, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn test_missing_corpus_file() {
    let result = Classifier::builder().with_corpus_file("/nonexistent/docsort/corpus.json");
    assert!(matches!(result, Err(ClassifierError::BuildError(_))));
}

#[test]
fn test_malformed_corpus_file() -> Result<(), Box<dyn std::error::Error>> {
    let path = std::env::temp_dir().join(format!("docsort-bad-{}.json", std::process::id()));
    std::fs::write(&path, r#"{"invoice": "not a list"}"#)?;
    let result = Classifier::builder().with_corpus_file(&path);
    std::fs::remove_file(&path)?;
    assert!(matches!(result, Err(ClassifierError::BuildError(_))));
    Ok(())
}

#[test]
fn test_unknown_category_in_corpus_file() -> Result<(), Box<dyn std::error::Error>> {
    let path = std::env::temp_dir().join(format!("docsort-memo-{}.json", std::process::id()));
    std::fs::write(&path, r#"{"memo": ["Internal memo about parking"]}"#)?;
    let result = Classifier::builder().with_corpus_file(&path);
    std::fs::remove_file(&path)?;
    assert!(result.is_err());
    Ok(())
}

#[test]
fn test_invalid_vectorizer_config() {
    let mut config = ModelConfig::default();
    config.vectorizer = VectorizerConfig {
        ngram_range: (3, 1),
        ..VectorizerConfig::default()
    };
    let result = Classifier::builder().with_model_config(config).build();
    assert!(matches!(result, Err(ClassifierError::ValidationError(_))));

    let mut config = ModelConfig::default();
    config.vectorizer.max_df = 0.0;
    let result = Classifier::builder().with_model_config(config).build();
    assert!(matches!(result, Err(ClassifierError::ValidationError(_))));
}

#[test]
fn test_invalid_boosting_config() {
    let mut config = ModelConfig::default();
    config.boosting = BoostingConfig {
        learning_rate: 0.0,
        ..BoostingConfig::default()
    };
    let result = Classifier::builder().with_model_config(config).build();
    assert!(result.is_err());
}

#[test]
fn test_invalid_blending_config() {
    let negative = BlendingConfig {
        keyword_boost_weight: -1.0,
        ..BlendingConfig::default()
    };
    assert!(matches!(
        Classifier::builder().with_blending_config(negative),
        Err(ClassifierError::ValidationError(_))
    ));

    let over_cap = BlendingConfig {
        keyword_confidence_cap: 100.5,
        ..BlendingConfig::default()
    };
    assert!(Classifier::builder().with_blending_config(over_cap).is_err());
}

#[test]
fn test_blank_keyword_phrase() {
    let result = KeywordTable::default().with_phrases(Category::Letter, vec!["dear", " "]);
    assert!(matches!(result, Err(ClassifierError::ValidationError(_))));

    let table = KeywordTable::empty()
        .with_phrases(Category::Letter, vec!["Dear", "Sincerely"])
        .unwrap();
    assert_eq!(table.phrases(Category::Letter), ["dear", "sincerely"]);
    assert!(table.phrases(Category::Invoice).is_empty());
}

#[test]
fn test_category_parsing() {
    assert_eq!("invoice".parse::<Category>(), Ok(Category::Invoice));
    assert_eq!("Resume".parse::<Category>(), Ok(Category::Resume));
    assert!(matches!(
        "memo".parse::<Category>(),
        Err(ClassifierError::ValidationError(_))
    ));
}

#[test]
fn test_error_messages() {
    let err = ClassifierError::InsufficientInput(3);
    assert!(err.to_string().contains('3'));
    let err = ClassifierError::BuildError("no corpus".into());
    assert!(err.to_string().contains("no corpus"));
}
