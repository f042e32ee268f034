/// MoreHopQA dataset types for parsing ground-truth items and cached model answers.
///
/// Matches the published MoreHopQA JSON schema: each item carries the main
/// multi-hop question, the previous-hop question it was extended from, the
/// last-hop question, and a three-step decomposition with per-step answers.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::EvalError;
use crate::router::Case;

/// A single ground-truth item from the MoreHopQA dataset.
///
/// Answer types are kept as Strings for schema flexibility; the router parses
/// them against the closed vocabulary and rejects anything it does not know.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionItem {
    /// Unique identifier. Encodes a group/variant suffix used for few-shot
    /// exclusion by the answering side; opaque to the evaluator.
    #[serde(rename = "_id")]
    pub id: String,
    /// Supporting evidence: (title, sentences) pairs.
    #[serde(default)]
    pub context: Vec<(String, Vec<String>)>,
    pub question: String,
    pub previous_question: String,
    pub ques_on_last_hop: String,
    pub answer: String,
    pub previous_answer: String,
    /// One of: string, letter, person, organization, character, number, year,
    /// date, datetime. Validated at routing time.
    pub answer_type: String,
    /// One of: person, place, organization, number, year, date, datetime.
    pub previous_answer_type: String,
    /// Exactly three sub-question records for a well-formed item.
    pub question_decomposition: Vec<SubQuestion>,
}

/// One step of a question decomposition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubQuestion {
    pub question: String,
    pub answer: String,
    #[serde(default)]
    pub answer_type: Option<String>,
    /// Nested sub-sub-question/answer pairs, present on some items.
    #[serde(default)]
    pub details: Option<serde_json::Value>,
}

impl QuestionItem {
    /// Ground truth for the first decomposition step (compared by case 6).
    ///
    /// Missing decomposition entries are a dataset defect, not a soft parse
    /// failure, so this surfaces as a fatal error.
    pub fn decomposition_answer(&self) -> Result<&str, EvalError> {
        self.question_decomposition
            .first()
            .map(|s| s.answer.as_str())
            .ok_or_else(|| {
                EvalError::Dataset(format!("item '{}' has an empty question_decomposition", self.id))
            })
    }
}

/// Raw model answers for one item, keyed by case.
///
/// Produced externally by the answering system and cached as JSON. Cache
/// entries also hold the prompt text per case; prompts are ignored here.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModelAnswerSet {
    #[serde(rename = "case_1_answer", default)]
    pub case_1: Option<String>,
    #[serde(rename = "case_2_answer", default)]
    pub case_2: Option<String>,
    #[serde(rename = "case_3_answer", default)]
    pub case_3: Option<String>,
    #[serde(rename = "case_4_answer", default)]
    pub case_4: Option<String>,
    #[serde(rename = "case_5_answer", default)]
    pub case_5: Option<String>,
    #[serde(rename = "case_6_answer", default)]
    pub case_6: Option<String>,
    /// Prompt fields and anything else the answering side cached.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl ModelAnswerSet {
    /// Raw generated text for a case, if the answering system produced one.
    pub fn answer_for(&self, case: Case) -> Option<&str> {
        match case {
            Case::One => self.case_1.as_deref(),
            Case::Two => self.case_2.as_deref(),
            Case::Three => self.case_3.as_deref(),
            Case::Four => self.case_4.as_deref(),
            Case::Five => self.case_5.as_deref(),
            Case::Six => self.case_6.as_deref(),
        }
    }
}

/// Load a MoreHopQA dataset from a JSON file.
///
/// Expects a JSON array of QuestionItem objects.
pub fn load_dataset(path: &Path) -> Result<Vec<QuestionItem>, anyhow::Error> {
    let file = std::fs::File::open(path)?;
    let reader = std::io::BufReader::new(file);
    let items: Vec<QuestionItem> = serde_json::from_reader(reader)?;
    Ok(items)
}

/// Load cached model answers from a JSON file.
///
/// Expects a JSON object mapping item id to a ModelAnswerSet.
pub fn load_answers(path: &Path) -> Result<BTreeMap<String, ModelAnswerSet>, anyhow::Error> {
    let file = std::fs::File::open(path)?;
    let reader = std::io::BufReader::new(file);
    let answers: BTreeMap<String, ModelAnswerSet> = serde_json::from_reader(reader)?;
    Ok(answers)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_item_json() -> &'static str {
        r#"{
            "_id": "8813f87c0bab11ebab90acde48001122_1",
            "context": [["Kurram Garhi", ["Kurram Garhi is a small village."]]],
            "question": "When was the institute that owned The Collegian founded?",
            "previous_question": "Which institute owned The Collegian?",
            "ques_on_last_hop": "When was Houston Baptist University founded?",
            "answer": "1960",
            "previous_answer": "Houston Baptist University",
            "answer_type": "year",
            "previous_answer_type": "organization",
            "question_decomposition": [
                {"question": "Which institute owned The Collegian?", "answer": "Houston Baptist University"},
                {"question": "When was it founded?", "answer": "1960"},
                {"question": "So when overall?", "answer": "1960"}
            ]
        }"#
    }

    #[test]
    fn test_item_deserializes() {
        let item: QuestionItem = serde_json::from_str(sample_item_json()).unwrap();
        assert_eq!(item.id, "8813f87c0bab11ebab90acde48001122_1");
        assert_eq!(item.answer_type, "year");
        assert_eq!(item.question_decomposition.len(), 3);
        assert_eq!(item.decomposition_answer().unwrap(), "Houston Baptist University");
        assert_eq!(item.context[0].0, "Kurram Garhi");
    }

    #[test]
    fn test_answer_set_tolerates_prompts_and_gaps() {
        let json = r#"{
            "case_1_answer": "<answer>1960</answer>",
            "case_1_prompt": "Answer the question...",
            "case_2_answer": "Houston Baptist University"
        }"#;
        let set: ModelAnswerSet = serde_json::from_str(json).unwrap();
        assert_eq!(set.answer_for(Case::One), Some("<answer>1960</answer>"));
        assert_eq!(set.answer_for(Case::Two), Some("Houston Baptist University"));
        assert_eq!(set.answer_for(Case::Six), None);
        assert!(set.extra.contains_key("case_1_prompt"));
    }
}
