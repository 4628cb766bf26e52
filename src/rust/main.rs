use std::io::Read;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{bail, Context, Result};
use clap::Parser;
use docsort::telemetry::TRACKING_URI_ENV;
use docsort::{ClassificationResult, Classifier, HttpSink, ModelConfig, TelemetryRecord};
use log::{info, warn};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Files whose extracted text should be classified
    files: Vec<PathBuf>,

    /// Classify this text instead of files or stdin
    #[arg(short, long)]
    text: Option<String>,

    /// Print one JSON object per document
    #[arg(long)]
    json: bool,

    /// Use only the keyword table, skipping the statistical model
    #[arg(long)]
    keywords_only: bool,

    /// Train on a JSON corpus of the form {"invoice": ["..."], ...}
    #[arg(long)]
    corpus: Option<PathBuf>,

    /// Base URL of a tracking server that receives every classification
    #[arg(long, env = TRACKING_URI_ENV)]
    tracking_uri: Option<String>,

    /// Print information about the fitted model and exit
    #[arg(long)]
    info: bool,

    /// Number of boosting rounds
    #[arg(long)]
    estimators: Option<usize>,

    /// Maximum depth of each tree
    #[arg(long)]
    max_depth: Option<usize>,

    /// Shrinkage applied to each tree
    #[arg(long)]
    learning_rate: Option<f64>,

    /// Upper bound on the TF-IDF vocabulary size
    #[arg(long)]
    max_features: Option<usize>,

    /// Known words a document needs before the model is fully trusted (0 disables)
    #[arg(long)]
    min_evidence_terms: Option<usize>,
}

impl Args {
    fn model_config(&self) -> ModelConfig {
        let mut config = ModelConfig::default();
        if let Some(n) = self.estimators {
            config.boosting.n_estimators = n;
        }
        if let Some(depth) = self.max_depth {
            config.boosting.max_depth = depth;
        }
        if let Some(rate) = self.learning_rate {
            config.boosting.learning_rate = rate;
        }
        if let Some(n) = self.max_features {
            config.vectorizer.max_features = n;
        }
        if let Some(n) = self.min_evidence_terms {
            config.min_evidence_terms = n;
        }
        config
    }

    /// Collects `(sample_id, text)` pairs from `--text`, files, or stdin.
    fn documents(&self) -> Result<Vec<(String, String)>> {
        if let Some(text) = &self.text {
            if !self.files.is_empty() {
                bail!("--text cannot be combined with file arguments");
            }
            return Ok(vec![("text".to_string(), text.clone())]);
        }
        if self.files.is_empty() {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .context("Failed to read stdin")?;
            return Ok(vec![("stdin".to_string(), text)]);
        }
        self.files
            .iter()
            .map(|path| {
                let text = std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read {}", path.display()))?;
                Ok((path.display().to_string(), text))
            })
            .collect()
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let start_time = Instant::now();
    info!("Building classifier...");

    let mut builder = Classifier::builder().with_model_config(args.model_config());
    if let Some(path) = &args.corpus {
        builder = builder.with_corpus_file(path)?;
    }
    let classifier = builder.build()?;
    info!("Classifier built in {:.2?}", start_time.elapsed());

    if args.info {
        println!("{}", serde_json::to_string_pretty(&classifier.info())?);
        return Ok(());
    }

    let sink = match &args.tracking_uri {
        Some(uri) if !uri.trim().is_empty() => Some(HttpSink::new(uri)?),
        _ => None,
    };

    let documents = args.documents()?;
    let classify_start = Instant::now();
    for (sample_id, text) in &documents {
        let result = if args.keywords_only {
            classifier.classify_by_keywords(text)
        } else {
            classifier.classify(text)
        };

        if let Some(sink) = &sink {
            let record = TelemetryRecord::new(sample_id, text, &result);
            if let Err(e) = sink.send(&record).await {
                warn!("Failed to record classification {}: {}", sample_id, e);
            }
        }

        print_result(sample_id, &result, args.json)?;
    }

    info!(
        "Classified {} documents in {:.2?}",
        documents.len(),
        classify_start.elapsed()
    );
    Ok(())
}

fn print_result(sample_id: &str, result: &ClassificationResult, json: bool) -> Result<()> {
    if json {
        let line = serde_json::json!({ "source": sample_id, "result": result });
        println!("{}", serde_json::to_string(&line)?);
        return Ok(());
    }

    let mut scores: Vec<_> = result.all_scores().iter().collect();
    scores.sort_by(|a, b| b.1.total_cmp(a.1).then(a.0.cmp(b.0)));

    println!("\n{}:", sample_id);
    println!("  Predicted category: {} ({:.2}%)", result.label(), result.confidence());
    if !scores.is_empty() {
        println!("  Scores (sorted):");
        for (category, score) in scores {
            println!("    {}: {:.2}%", category, score);
        }
    }
    Ok(())
}
