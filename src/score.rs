/// Exact-match and token-F1 scoring between normalized answer strings.
///
/// Uses the SQuAD/HotpotQA scoring convention: answers are lowercased,
/// stripped of punctuation and articles, then compared whole (EM) and as
/// token multisets (F1). Categorical answers (yes/no/noanswer) never earn
/// partial credit.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static ARTICLES: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(a|an|the)\b").expect("Failed to compile article pattern")
});

/// Answers that are categorical verdicts rather than spans. A mismatch on one
/// of these scores zero outright, never partial token overlap.
const CATEGORICAL: [&str; 3] = ["yes", "no", "noanswer"];

/// Scores for one (prediction, ground truth) pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricRecord {
    pub em: bool,
    pub f1: f64,
    pub precision: f64,
    pub recall: f64,
}

impl MetricRecord {
    pub fn zero() -> Self {
        MetricRecord {
            em: false,
            f1: 0.0,
            precision: 0.0,
            recall: 0.0,
        }
    }
}

/// Scoring normalization: lowercase, strip punctuation, drop articles,
/// collapse whitespace. Distinct from the type-specific canonicalization
/// that runs before it.
pub fn normalize_answer(s: &str) -> String {
    let lowered = s.to_lowercase();
    let no_punct: String = lowered
        .chars()
        .filter(|c| !c.is_ascii_punctuation())
        .collect();
    let no_articles = ARTICLES.replace_all(&no_punct, " ");
    no_articles.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Boolean equality after scoring normalization.
pub fn exact_match(prediction: &str, ground_truth: &str) -> bool {
    normalize_answer(prediction) == normalize_answer(ground_truth)
}

/// Token-level (f1, precision, recall) after scoring normalization.
pub fn f1_score(prediction: &str, ground_truth: &str) -> (f64, f64, f64) {
    let prediction = normalize_answer(prediction);
    let ground_truth = normalize_answer(ground_truth);

    const ZERO: (f64, f64, f64) = (0.0, 0.0, 0.0);

    // Categorical answers get no partial credit
    if CATEGORICAL.contains(&prediction.as_str()) && prediction != ground_truth {
        return ZERO;
    }
    if CATEGORICAL.contains(&ground_truth.as_str()) && prediction != ground_truth {
        return ZERO;
    }

    let prediction_tokens: Vec<&str> = prediction.split_whitespace().collect();
    let ground_truth_tokens: Vec<&str> = ground_truth.split_whitespace().collect();

    let mut truth_counts: HashMap<&str, usize> = HashMap::new();
    for tok in &ground_truth_tokens {
        *truth_counts.entry(tok).or_insert(0) += 1;
    }

    // Multiset intersection size
    let mut num_same = 0usize;
    for tok in &prediction_tokens {
        if let Some(count) = truth_counts.get_mut(tok) {
            if *count > 0 {
                *count -= 1;
                num_same += 1;
            }
        }
    }

    if num_same == 0 || prediction_tokens.is_empty() || ground_truth_tokens.is_empty() {
        return ZERO;
    }

    let precision = num_same as f64 / prediction_tokens.len() as f64;
    let recall = num_same as f64 / ground_truth_tokens.len() as f64;
    let f1 = 2.0 * precision * recall / (precision + recall);
    (f1, precision, recall)
}

/// Score a normalized pair: EM plus token F1.
pub fn score_pair(prediction: &str, ground_truth: &str) -> MetricRecord {
    let em = exact_match(prediction, ground_truth);
    let (f1, precision, recall) = f1_score(prediction, ground_truth);
    MetricRecord {
        em,
        f1,
        precision,
        recall,
    }
}
