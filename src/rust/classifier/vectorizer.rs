use std::collections::{HashMap, HashSet};

use log::debug;
use ndarray::{Array1, Array2};
use tokenizers::pre_tokenizers::whitespace::Whitespace;
use tokenizers::{OffsetReferential, OffsetType, PreTokenizedString, PreTokenizer};

use super::error::ClassifierError;
use super::utils::l2_normalize;

/// Settings for the TF-IDF vectorizer.
#[derive(Debug, Clone, PartialEq)]
pub struct VectorizerConfig {
    /// Upper bound on the vocabulary size
    pub max_features: usize,
    /// Inclusive range of n-gram lengths, in words
    pub ngram_range: (usize, usize),
    /// Minimum number of documents a term must appear in
    pub min_df: usize,
    /// Maximum fraction of documents a term may appear in
    pub max_df: f32,
    pub lowercase: bool,
    /// Drop common English function words before building n-grams
    pub stop_words: bool,
}

impl Default for VectorizerConfig {
    fn default() -> Self {
        Self {
            max_features: 1000,
            ngram_range: (1, 4),
            min_df: 2,
            max_df: 0.9,
            lowercase: true,
            stop_words: true,
        }
    }
}

/// A fitted TF-IDF transform: a bounded vocabulary of word n-grams with
/// smoothed inverse document frequencies. Rows are L2-normalized.
#[derive(Debug, Clone)]
pub struct TfidfVectorizer {
    config: VectorizerConfig,
    vocabulary: HashMap<String, usize>,
    idf: Array1<f32>,
}

impl TfidfVectorizer {
    /// Learns the vocabulary and IDF weights from `documents`.
    pub fn fit(config: VectorizerConfig, documents: &[String]) -> Result<Self, ClassifierError> {
        let (min_n, max_n) = config.ngram_range;
        if min_n == 0 || min_n > max_n {
            return Err(ClassifierError::ValidationError(format!(
                "Invalid n-gram range ({}, {})",
                min_n, max_n
            )));
        }
        if !(config.max_df > 0.0 && config.max_df <= 1.0) {
            return Err(ClassifierError::ValidationError(format!(
                "max_df must be in (0, 1], got {}",
                config.max_df
            )));
        }
        if documents.is_empty() {
            return Err(ClassifierError::BuildError(
                "Cannot fit vectorizer on an empty corpus".into(),
            ));
        }

        let n_docs = documents.len();
        let mut doc_freq: HashMap<String, usize> = HashMap::new();
        let mut term_freq: HashMap<String, usize> = HashMap::new();

        for doc in documents {
            let terms = analyze(&config, doc).map_err(|e| {
                ClassifierError::BuildError(format!("Failed to tokenize training document: {}", e))
            })?;
            let mut seen = HashSet::new();
            for term in terms {
                *term_freq.entry(term.clone()).or_insert(0) += 1;
                if seen.insert(term.clone()) {
                    *doc_freq.entry(term).or_insert(0) += 1;
                }
            }
        }

        let max_doc_count = config.max_df * n_docs as f32;
        let smooth_idf = |df: usize| ((1.0 + n_docs as f32) / (1.0 + df as f32)).ln() + 1.0;

        let mut ranked: Vec<(String, f32)> = doc_freq
            .iter()
            .filter(|&(_, &df)| df >= config.min_df && df as f32 <= max_doc_count)
            .map(|(term, &df)| (term.clone(), term_freq[term] as f32 * smooth_idf(df)))
            .collect();
        ranked.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.0.cmp(&b.0))
        });
        ranked.truncate(config.max_features);

        if ranked.is_empty() {
            return Err(ClassifierError::BuildError(
                "No terms left after pruning; the corpus is too small or too uniform".into(),
            ));
        }

        let mut terms: Vec<String> = ranked.into_iter().map(|(term, _)| term).collect();
        terms.sort();

        let idf = Array1::from_iter(terms.iter().map(|t| smooth_idf(doc_freq[t])));
        let vocabulary = terms
            .into_iter()
            .enumerate()
            .map(|(i, t)| (t, i))
            .collect::<HashMap<_, _>>();

        debug!(
            "Fitted vectorizer: {} documents, {} candidate terms, {} kept",
            n_docs,
            doc_freq.len(),
            vocabulary.len()
        );

        Ok(Self {
            config,
            vocabulary,
            idf,
        })
    }

    pub fn vocabulary_size(&self) -> usize {
        self.vocabulary.len()
    }

    pub fn contains(&self, term: &str) -> bool {
        self.vocabulary.contains_key(term)
    }

    /// Maps one document to its TF-IDF feature row.
    pub fn transform(&self, text: &str) -> Result<Array1<f32>, ClassifierError> {
        let terms = analyze(&self.config, text)
            .map_err(|e| ClassifierError::InferenceError(format!("Failed to tokenize input: {}", e)))?;
        let mut row = Array1::<f32>::zeros(self.vocabulary.len());
        for term in terms {
            if let Some(&idx) = self.vocabulary.get(&term) {
                row[idx] += 1.0;
            }
        }
        row *= &self.idf;
        Ok(l2_normalize(&row))
    }

    /// Number of distinct single-word vocabulary terms in `text`.
    pub fn known_terms(&self, text: &str) -> Result<usize, ClassifierError> {
        let tokens = words(&self.config, text)
            .map_err(|e| ClassifierError::InferenceError(format!("Failed to tokenize input: {}", e)))?;
        let known: HashSet<&String> = tokens
            .iter()
            .filter(|t| self.vocabulary.contains_key(t.as_str()))
            .collect();
        Ok(known.len())
    }

    /// Maps many documents to a `(n_documents, vocabulary_size)` matrix.
    pub fn transform_batch(&self, documents: &[String]) -> Result<Array2<f32>, ClassifierError> {
        let mut matrix = Array2::<f32>::zeros((documents.len(), self.vocabulary.len()));
        for (i, doc) in documents.iter().enumerate() {
            matrix.row_mut(i).assign(&self.transform(doc)?);
        }
        Ok(matrix)
    }
}

/// Splits text into word tokens of two or more word characters.
pub(crate) fn tokenize(text: &str) -> tokenizers::Result<Vec<String>> {
    let mut pretokenized = PreTokenizedString::from(text);
    Whitespace::default().pre_tokenize(&mut pretokenized)?;
    Ok(pretokenized
        .get_splits(OffsetReferential::Original, OffsetType::Char)
        .into_iter()
        .map(|(piece, _, _)| piece)
        .filter(|piece| {
            piece.chars().count() >= 2 && piece.chars().all(|c| c.is_alphanumeric() || c == '_')
        })
        .map(str::to_string)
        .collect())
}

/// Common English function words. Matched against lower-cased tokens.
const STOP_WORDS: &[&str] = &[
    "about", "above", "after", "again", "against", "all", "also", "am", "an", "and", "any",
    "are", "as", "at", "be", "because", "been", "before", "being", "below", "between", "both",
    "but", "by", "can", "could", "did", "do", "does", "doing", "down", "during", "each", "few",
    "for", "from", "further", "had", "has", "have", "having", "he", "her", "here", "hers",
    "herself", "him", "himself", "his", "how", "if", "in", "into", "is", "it", "its", "itself",
    "just", "know", "let", "me", "more", "most", "my", "myself", "no", "nor", "not", "now", "of",
    "off", "on", "once", "only", "or", "other", "our", "ours", "ourselves", "out", "over", "own",
    "please", "same", "she", "should", "so", "some", "such", "than", "that", "the", "their",
    "theirs", "them", "themselves", "then", "there", "these", "they", "think", "this", "those",
    "through", "to", "too", "under", "until", "up", "us", "very", "was", "we", "were", "what",
    "when", "where", "which", "while", "who", "whom", "why", "will", "with", "would", "you",
    "your", "yours", "yourself", "yourselves",
];

fn is_stop_word(token: &str) -> bool {
    STOP_WORDS.contains(&token.to_lowercase().as_str())
}

/// Tokenizes, lower-cases and drops stop words as configured.
fn words(config: &VectorizerConfig, text: &str) -> tokenizers::Result<Vec<String>> {
    let mut tokens = if config.lowercase {
        tokenize(&text.to_lowercase())?
    } else {
        tokenize(text)?
    };
    if config.stop_words {
        tokens.retain(|t| !is_stop_word(t));
    }
    Ok(tokens)
}

/// Tokenizes and expands into n-gram terms.
fn analyze(config: &VectorizerConfig, text: &str) -> tokenizers::Result<Vec<String>> {
    let tokens = words(config, text)?;
    let (min_n, max_n) = config.ngram_range;
    let mut terms = Vec::new();
    for n in min_n..=max_n {
        if n > tokens.len() {
            break;
        }
        terms.extend(tokens.windows(n).map(|w| w.join(" ")));
    }
    Ok(terms)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn docs(texts: &[&str]) -> Vec<String> {
        texts.iter().map(|t| t.to_string()).collect()
    }

    #[test]
    fn test_tokenize_drops_punctuation_and_single_chars() {
        let tokens = tokenize("Total Due: $500, a B-52!").unwrap();
        assert_eq!(tokens, vec!["Total", "Due", "500", "52"]);
    }

    #[test]
    fn test_ngrams_are_counted_in_vocabulary() {
        let corpus = docs(&[
            "total due now",
            "total due later",
            "dear friend",
            "dear colleague",
        ]);
        let vectorizer = TfidfVectorizer::fit(VectorizerConfig::default(), &corpus).unwrap();
        assert!(vectorizer.contains("total due"));
        assert!(vectorizer.contains("dear"));
        // Single-document terms are pruned.
        assert!(!vectorizer.contains("friend"));
    }

    #[test]
    fn test_max_df_prunes_ubiquitous_terms() {
        let corpus = docs(&["common alpha", "common alpha", "common beta", "common beta"]);
        let vectorizer = TfidfVectorizer::fit(VectorizerConfig::default(), &corpus).unwrap();
        assert!(!vectorizer.contains("common"));
        assert!(vectorizer.contains("alpha"));
    }

    #[test]
    fn test_max_features_bounds_vocabulary() {
        let corpus = docs(&["aa bb cc dd", "aa bb cc dd", "ee ff", "ee ff"]);
        let config = VectorizerConfig {
            max_features: 3,
            ..VectorizerConfig::default()
        };
        let vectorizer = TfidfVectorizer::fit(config, &corpus).unwrap();
        assert_eq!(vectorizer.vocabulary_size(), 3);
    }

    #[test]
    fn test_transform_is_unit_length_or_zero() {
        let corpus = docs(&["invoice total", "invoice total", "dear sir", "dear sir"]);
        let vectorizer = TfidfVectorizer::fit(VectorizerConfig::default(), &corpus).unwrap();

        let row = vectorizer.transform("INVOICE total").unwrap();
        let norm: f32 = row.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-5);

        let empty = vectorizer.transform("nothing familiar here").unwrap();
        assert!(empty.iter().all(|&x| x == 0.0));
    }

    #[test]
    fn test_stop_words_are_dropped_before_ngrams() {
        let corpus = docs(&[
            "the total of the invoice",
            "the total of the invoice",
            "dear friend",
            "dear friend",
        ]);
        let vectorizer = TfidfVectorizer::fit(VectorizerConfig::default(), &corpus).unwrap();
        assert!(!vectorizer.contains("the"));
        assert!(vectorizer.contains("total invoice"));

        let config = VectorizerConfig {
            stop_words: false,
            ..VectorizerConfig::default()
        };
        let vectorizer = TfidfVectorizer::fit(config, &corpus).unwrap();
        assert!(vectorizer.contains("the total"));
    }

    #[test]
    fn test_known_terms_counts_distinct_words() {
        let corpus = docs(&["invoice total", "invoice total", "dear sir", "dear sir"]);
        let vectorizer = TfidfVectorizer::fit(VectorizerConfig::default(), &corpus).unwrap();
        assert_eq!(vectorizer.known_terms("Invoice invoice TOTAL for the sir").unwrap(), 3);
        assert_eq!(vectorizer.known_terms("nothing familiar here").unwrap(), 0);
    }

    #[test]
    fn test_fit_rejects_degenerate_input() {
        assert!(TfidfVectorizer::fit(VectorizerConfig::default(), &[]).is_err());
        let unique = docs(&["alpha", "beta"]);
        assert!(matches!(
            TfidfVectorizer::fit(VectorizerConfig::default(), &unique),
            Err(ClassifierError::BuildError(_))
        ));
        let config = VectorizerConfig {
            ngram_range: (2, 1),
            ..VectorizerConfig::default()
        };
        assert!(TfidfVectorizer::fit(config, &unique).is_err());
    }
}
