/// Reporting for evaluation runs: plain-text summary on stdout and a JSON
/// results file keyed by item id.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::Utc;

use crate::router::Case;
use crate::runner::{EvalRun, ItemResult};

/// Print a formatted summary to stdout.
pub fn print_summary(run: &EvalRun) {
    println!("=== MoreHopQA Evaluation: {} pipeline ===", run.mode.name());
    println!("Total questions: {}", run.summary.total_items);
    println!(
        "Correct answers in overall question: {}",
        run.summary.case_1_em_count
    );
    println!();
    println!("Per-case means:");
    println!(
        "  {:<8}  {:>8}  {:>8}  {:>10}  {:>8}",
        "case", "em", "f1", "precision", "recall"
    );

    // Fixed case order for readability
    for case in Case::ALL {
        if let Some(totals) = run.summary.cases.get(case.id()) {
            println!(
                "  {:<8}  {:>8.3}  {:>8.3}  {:>10.3}  {:>8.3}",
                case.id(),
                totals.mean_em(),
                totals.mean_f1(),
                totals.mean_precision(),
                totals.mean_recall()
            );
        }
    }
}

/// Results filename convention: {name}_{mode}_{timestamp}.json
pub fn results_path(output_dir: &Path, name: &str, run: &EvalRun) -> PathBuf {
    output_dir.join(format!(
        "{}_{}_{}.json",
        name,
        run.mode.name(),
        Utc::now().format("%y%m%d-%H%M%S")
    ))
}

/// Save the per-item results as a JSON mapping keyed by item id.
pub fn save_results(run: &EvalRun, path: &Path) -> Result<(), anyhow::Error> {
    let by_id: BTreeMap<&str, &ItemResult> = run
        .results
        .iter()
        .map(|r| (r.id.as_str(), r))
        .collect();
    let json = serde_json::to_string_pretty(&by_id)?;
    std::fs::write(path, json)?;
    Ok(())
}

/// Load a previously saved results file.
pub fn load_results(path: &Path) -> Result<BTreeMap<String, ItemResult>, anyhow::Error> {
    let json = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&json)?)
}
