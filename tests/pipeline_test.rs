use std::collections::BTreeMap;

use hopeval::config::{Config, MissingCase};
use hopeval::dataset::{ModelAnswerSet, QuestionItem};
use hopeval::runner::{run_evaluation, PipelineMode};

fn make_item(id: &str, answer: &str, answer_type: &str, prev: &str, prev_type: &str) -> QuestionItem {
    serde_json::from_value(serde_json::json!({
        "_id": id,
        "context": [["Evidence", ["A sentence of supporting text."]]],
        "question": "What is the answer overall?",
        "previous_question": "What was the previous hop?",
        "ques_on_last_hop": "And on the last hop?",
        "answer": answer,
        "previous_answer": prev,
        "answer_type": answer_type,
        "previous_answer_type": prev_type,
        "question_decomposition": [
            {"question": "step 1", "answer": prev},
            {"question": "step 2", "answer": answer},
            {"question": "step 3", "answer": answer}
        ]
    }))
    .unwrap()
}

fn make_answers(cases: &[(&str, &str)]) -> ModelAnswerSet {
    let map: serde_json::Map<String, serde_json::Value> = cases
        .iter()
        .map(|(case, text)| (format!("{case}_answer"), serde_json::json!(text)))
        .collect();
    serde_json::from_value(serde_json::Value::Object(map)).unwrap()
}

fn test_config() -> Config {
    Config {
        log_level: "info".to_string(),
        log_file: None,
        default_year: 2000,
        missing_case: MissingCase::Zero,
    }
}

#[test]
fn string_answer_scores_exact_match_through_tags() {
    let items = vec![make_item("q1", "Paris", "string", "France", "place")];
    let mut cache = BTreeMap::new();
    cache.insert(
        "q1".to_string(),
        make_answers(&[
            ("case_1", "I think <answer>paris</answer>"),
            ("case_2", "<answer>France</answer>"),
        ]),
    );

    let run = run_evaluation(&items, &cache, PipelineMode::Baseline, &test_config()).unwrap();
    let case_1 = &run.results[0].cases["case_1"];
    assert!(case_1.em);
    assert_eq!(case_1.f1, 1.0);
    assert_eq!(run.summary.case_1_em_count, 1);
}

#[test]
fn number_answer_normalizes_separators_on_both_sides() {
    let items = vec![make_item("q1", "1000000", "number", "France", "place")];
    let mut cache = BTreeMap::new();
    cache.insert(
        "q1".to_string(),
        make_answers(&[
            ("case_1", "<answer>1,000,000</answer>"),
            ("case_2", "France"),
        ]),
    );

    let run = run_evaluation(&items, &cache, PipelineMode::Baseline, &test_config()).unwrap();
    let case_1 = &run.results[0].cases["case_1"];
    assert_eq!(case_1.prediction, "1000000.0");
    assert_eq!(case_1.ground_truth, "1000000.0");
    assert!(case_1.em);
}

#[test]
fn spelled_out_number_recovers_via_entity_fallback() {
    let items = vec![make_item("q1", "3", "number", "France", "place")];
    let mut cache = BTreeMap::new();
    cache.insert(
        "q1".to_string(),
        make_answers(&[
            ("case_1", "<answer>There were three of them</answer>"),
            ("case_2", "France"),
        ]),
    );

    let run = run_evaluation(&items, &cache, PipelineMode::Baseline, &test_config()).unwrap();
    let case_1 = &run.results[0].cases["case_1"];
    assert_eq!(case_1.prediction, "3.0");
    assert_eq!(case_1.ground_truth, "3.0");
    assert!(case_1.em);
}

#[test]
fn date_answer_normalizes_prose_on_prediction_side() {
    let items = vec![make_item("q1", "March 3, 1999", "date", "France", "place")];
    let mut cache = BTreeMap::new();
    cache.insert(
        "q1".to_string(),
        make_answers(&[
            ("case_1", "<answer>born on March 3, 1999</answer>"),
            ("case_2", "France"),
        ]),
    );

    let run = run_evaluation(&items, &cache, PipelineMode::Baseline, &test_config()).unwrap();
    let case_1 = &run.results[0].cases["case_1"];
    assert_eq!(case_1.prediction, "1999-03-03 00:00");
    assert_eq!(case_1.ground_truth, "1999-03-03 00:00");
    assert!(case_1.em);
}

#[test]
fn unsupported_answer_type_aborts_instead_of_scoring() {
    let items = vec![make_item("q1", "red", "color", "France", "place")];
    let mut cache = BTreeMap::new();
    cache.insert(
        "q1".to_string(),
        make_answers(&[("case_1", "<answer>red</answer>"), ("case_2", "France")]),
    );

    let err = run_evaluation(&items, &cache, PipelineMode::Baseline, &test_config()).unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("answer_type"));
    assert!(msg.contains("color"));
}

#[test]
fn full_pipeline_scores_all_six_cases() {
    let items = vec![make_item("q1", "1960", "year", "Houston Baptist University", "organization")];
    let mut cache = BTreeMap::new();
    cache.insert(
        "q1".to_string(),
        make_answers(&[
            ("case_1", "<answer>1960</answer>"),
            ("case_2", "<answer>Houston Baptist University</answer>"),
            ("case_3", "<answer>1960</answer>"),
            ("case_4", "<answer>in the year 1960</answer>"),
            ("case_5", "<answer>Houston Baptist College</answer>"),
            ("case_6", "<answer>Houston Baptist University</answer>"),
        ]),
    );

    let run = run_evaluation(&items, &cache, PipelineMode::Full, &test_config()).unwrap();
    let cases = &run.results[0].cases;
    assert_eq!(cases.len(), 6);

    // Cases 1/3 are exact; case_4's prose still recovers "1960" via the
    // token-scan fallback
    assert!(cases["case_1"].em);
    assert!(cases["case_3"].em);
    assert!(cases["case_4"].em);

    // Case 5 is a partial free-text match against the previous answer
    assert!(!cases["case_5"].em);
    assert!(cases["case_5"].f1 > 0.0 && cases["case_5"].f1 < 1.0);

    // Case 6 compares against the first decomposition step
    assert!(cases["case_6"].em);

    let summary = &run.summary;
    assert_eq!(summary.total_items, 1);
    assert_eq!(summary.case_1_em_count, 1);
    assert_eq!(summary.cases.len(), 6);
}

#[test]
fn corpus_totals_average_across_items() {
    let items = vec![
        make_item("q1", "Paris", "string", "France", "place"),
        make_item("q2", "Paris", "string", "France", "place"),
    ];
    let mut cache = BTreeMap::new();
    cache.insert(
        "q1".to_string(),
        make_answers(&[("case_1", "<answer>Paris</answer>"), ("case_2", "France")]),
    );
    cache.insert(
        "q2".to_string(),
        make_answers(&[("case_1", "<answer>Lyon</answer>"), ("case_2", "France")]),
    );

    let run = run_evaluation(&items, &cache, PipelineMode::Baseline, &test_config()).unwrap();
    assert_eq!(run.summary.total_items, 2);
    assert_eq!(run.summary.case_1_em_count, 1);
    let case_1 = &run.summary.cases["case_1"];
    assert!((case_1.mean_em() - 0.5).abs() < 1e-12);
    let case_2 = &run.summary.cases["case_2"];
    assert!((case_2.mean_em() - 1.0).abs() < 1e-12);
}

#[test]
fn results_round_trip_through_json() {
    let items = vec![make_item("q1", "Paris", "string", "France", "place")];
    let mut cache = BTreeMap::new();
    cache.insert(
        "q1".to_string(),
        make_answers(&[("case_1", "<answer>Paris</answer>"), ("case_2", "France")]),
    );

    let run = run_evaluation(&items, &cache, PipelineMode::Baseline, &test_config()).unwrap();

    let dir = std::env::temp_dir().join(format!("hopeval-test-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("results.json");
    hopeval::report::save_results(&run, &path).unwrap();

    let loaded = hopeval::report::load_results(&path).unwrap();
    assert_eq!(loaded.len(), 1);
    assert!(loaded["q1"].cases["case_1"].em);

    std::fs::remove_dir_all(&dir).ok();
}
