/// Corpus evaluation runner: extraction -> normalization -> scoring across
/// every case of every item, folded into corpus totals.
///
/// Items are independent, so the per-item pass fans out over a rayon worker
/// pool and the corpus totals come from a commutative reduce-then-merge over
/// the per-item results. Nothing here blocks: a bad parse degrades to a
/// scoring mismatch, and only an answer type outside the closed vocabulary
/// aborts the run.

use std::collections::BTreeMap;

use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config::{Config, MissingCase};
use crate::dataset::{ModelAnswerSet, QuestionItem};
use crate::errors::EvalError;
use crate::ner::EntityRecognizer;
use crate::router::{baseline_dispatch, CaseSpec, TypeRouter, FULL_DISPATCH};
use crate::score::{score_pair, MetricRecord};

/// Which slice of the dispatch table a run scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PipelineMode {
    /// All six cases.
    Full,
    /// Cases 1-2 only, for answering systems without sub-question decomposition.
    Baseline,
}

impl PipelineMode {
    pub fn dispatch(&self) -> &'static [CaseSpec] {
        match self {
            PipelineMode::Full => &FULL_DISPATCH,
            PipelineMode::Baseline => baseline_dispatch(),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            PipelineMode::Full => "full",
            PipelineMode::Baseline => "baseline",
        }
    }
}

/// Extraction and scores for one case of one item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseResult {
    pub prediction: String,
    pub ground_truth: String,
    pub em: bool,
    pub f1: f64,
    pub precision: f64,
    pub recall: f64,
}

/// Result record for one item: the question fields a reader needs to audit a
/// score, plus the per-case extractions and metrics keyed by case id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemResult {
    #[serde(rename = "_id")]
    pub id: String,
    pub question: String,
    pub answer: String,
    pub previous_question: String,
    pub previous_answer: String,
    pub cases: BTreeMap<String, CaseResult>,
}

/// Running additive totals for one case across the corpus.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct CaseTotals {
    pub count: usize,
    pub em: f64,
    pub f1: f64,
    pub precision: f64,
    pub recall: f64,
}

impl CaseTotals {
    fn add(&mut self, rec: &MetricRecord) {
        self.count += 1;
        self.em += if rec.em { 1.0 } else { 0.0 };
        self.f1 += rec.f1;
        self.precision += rec.precision;
        self.recall += rec.recall;
    }

    fn merge(&mut self, other: &CaseTotals) {
        self.count += other.count;
        self.em += other.em;
        self.f1 += other.f1;
        self.precision += other.precision;
        self.recall += other.recall;
    }

    pub fn mean_em(&self) -> f64 {
        if self.count == 0 { 0.0 } else { self.em / self.count as f64 }
    }

    pub fn mean_f1(&self) -> f64 {
        if self.count == 0 { 0.0 } else { self.f1 / self.count as f64 }
    }

    pub fn mean_precision(&self) -> f64 {
        if self.count == 0 { 0.0 } else { self.precision / self.count as f64 }
    }

    pub fn mean_recall(&self) -> f64 {
        if self.count == 0 { 0.0 } else { self.recall / self.count as f64 }
    }
}

/// Corpus-level summary: item count, the headline case_1 exact-match count,
/// and additive per-case totals.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CorpusSummary {
    pub total_items: usize,
    pub case_1_em_count: usize,
    pub cases: BTreeMap<String, CaseTotals>,
}

impl CorpusSummary {
    fn from_item(result: &ItemResult) -> Self {
        let mut summary = CorpusSummary {
            total_items: 1,
            ..Default::default()
        };
        for (case_id, case) in &result.cases {
            let rec = MetricRecord {
                em: case.em,
                f1: case.f1,
                precision: case.precision,
                recall: case.recall,
            };
            summary.cases.entry(case_id.clone()).or_default().add(&rec);
        }
        if result.cases.get("case_1").map(|c| c.em).unwrap_or(false) {
            summary.case_1_em_count = 1;
        }
        summary
    }

    fn merge(mut self, other: CorpusSummary) -> Self {
        self.total_items += other.total_items;
        self.case_1_em_count += other.case_1_em_count;
        for (case_id, totals) in other.cases {
            self.cases.entry(case_id).or_default().merge(&totals);
        }
        self
    }
}

/// A completed evaluation pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvalRun {
    pub mode: PipelineMode,
    pub results: Vec<ItemResult>,
    pub summary: CorpusSummary,
}

/// Score every case of one item.
///
/// A case with no cached answer follows the configured policy: scored as
/// zero against an empty prediction, or dropped from the record entirely.
pub fn evaluate_item(
    router: &TypeRouter<'_>,
    mode: PipelineMode,
    item: &QuestionItem,
    answers: &ModelAnswerSet,
    missing_case: MissingCase,
) -> Result<ItemResult, EvalError> {
    let mut cases = BTreeMap::new();

    for spec in mode.dispatch() {
        let raw = match answers.answer_for(spec.case) {
            Some(raw) => raw,
            None => match missing_case {
                MissingCase::Zero => "",
                MissingCase::Skip => {
                    tracing::debug!(
                        item_id = %item.id,
                        case = spec.case.id(),
                        "No cached answer for case - skipping"
                    );
                    continue;
                }
            },
        };

        let pair = router.route_case(spec, item, raw)?;
        let rec = score_pair(&pair.prediction, &pair.ground_truth);
        cases.insert(
            spec.case.id().to_string(),
            CaseResult {
                prediction: pair.prediction,
                ground_truth: pair.ground_truth,
                em: rec.em,
                f1: rec.f1,
                precision: rec.precision,
                recall: rec.recall,
            },
        );
    }

    Ok(ItemResult {
        id: item.id.clone(),
        question: item.question.clone(),
        answer: item.answer.clone(),
        previous_question: item.previous_question.clone(),
        previous_answer: item.previous_answer.clone(),
        cases,
    })
}

/// Run a full corpus pass.
///
/// Fans out over items on the rayon pool; per-item results are independent
/// and collect back in input order. The first fatal configuration error
/// aborts the run.
pub fn run_evaluation(
    items: &[QuestionItem],
    answers: &BTreeMap<String, ModelAnswerSet>,
    mode: PipelineMode,
    config: &Config,
) -> Result<EvalRun, EvalError> {
    let ner = EntityRecognizer::new();
    let router = TypeRouter::new(&ner, config.default_year);

    for item in items {
        if item.question_decomposition.len() != 3 {
            tracing::warn!(
                item_id = %item.id,
                steps = item.question_decomposition.len(),
                "Item does not have exactly 3 decomposition steps"
            );
        }
    }

    let pb = ProgressBar::new(items.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{pos}/{len}] {msg} [{elapsed_precise} / {eta_precise}]")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );

    let results: Vec<ItemResult> = items
        .par_iter()
        .map(|item| {
            let set = answers.get(&item.id).ok_or_else(|| EvalError::MissingAnswers {
                id: item.id.clone(),
            })?;
            let result = evaluate_item(&router, mode, item, set, config.missing_case)?;
            pb.inc(1);
            Ok(result)
        })
        .collect::<Result<Vec<_>, EvalError>>()?;

    pb.finish_and_clear();

    // Reduce-then-merge: no shared counters, just additive partial sums
    let summary = results
        .par_iter()
        .map(CorpusSummary::from_item)
        .reduce(CorpusSummary::default, CorpusSummary::merge);

    Ok(EvalRun {
        mode,
        results,
        summary,
    })
}
