/// hopeval: answer extraction, normalization and scoring for multi-hop QA.
///
/// Benchmarks free-text model answers against MoreHopQA ground truth. The
/// pipeline per item: pull the intended answer out of the raw response (tag
/// extraction), canonicalize it by declared answer type (free text, number,
/// date), score the pair (exact match + token F1), and fold the six per-item
/// cases into corpus totals. Model invocation, prompting and caching live
/// outside this crate; it consumes a dataset file and a cached-answers file.

pub mod config;
pub mod dataset;
pub mod errors;
pub mod extract;
pub mod logging;
pub mod ner;
pub mod normalize;
pub mod report;
pub mod router;
pub mod runner;
pub mod score;
