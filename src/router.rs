/// Case dispatch: maps each of the six per-item cases to its ground-truth
/// field and type-specific normalizer.
///
/// The six-case structure is fixed by the dataset: case 1 asks the main
/// multi-hop question, case 2 the previous-hop question, case 3 the last-hop
/// question, and cases 4-6 the decomposition sub-questions in reverse order.
/// Cases 1/3/4 are all answered by the item's main answer, cases 2/5 by the
/// previous-hop answer, and case 6 by the first decomposition step. The
/// mapping is a const table rather than control flow so it can be validated
/// and tested as data.

use serde::{Deserialize, Serialize};

use crate::dataset::QuestionItem;
use crate::errors::EvalError;
use crate::extract::extract_answer;
use crate::ner::EntityRecognizer;
use crate::normalize::{DateNormalizer, NumberNormalizer};

/// One of the six sub-question roles scored per item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Case {
    One,
    Two,
    Three,
    Four,
    Five,
    Six,
}

impl Case {
    pub const ALL: [Case; 6] = [
        Case::One,
        Case::Two,
        Case::Three,
        Case::Four,
        Case::Five,
        Case::Six,
    ];

    /// Stable string key used in answer caches and result files.
    pub fn id(&self) -> &'static str {
        match self {
            Case::One => "case_1",
            Case::Two => "case_2",
            Case::Three => "case_3",
            Case::Four => "case_4",
            Case::Five => "case_5",
            Case::Six => "case_6",
        }
    }
}

/// Which ground-truth field a case is compared against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TruthField {
    Answer,
    PreviousAnswer,
    /// First decomposition step; compared as free text, no type dispatch.
    Decomposition,
}

/// One row of the dispatch table.
#[derive(Debug, Clone, Copy)]
pub struct CaseSpec {
    pub case: Case,
    pub truth: TruthField,
}

/// Full pipeline: all six cases.
pub const FULL_DISPATCH: [CaseSpec; 6] = [
    CaseSpec { case: Case::One, truth: TruthField::Answer },
    CaseSpec { case: Case::Two, truth: TruthField::PreviousAnswer },
    CaseSpec { case: Case::Three, truth: TruthField::Answer },
    CaseSpec { case: Case::Four, truth: TruthField::Answer },
    CaseSpec { case: Case::Five, truth: TruthField::PreviousAnswer },
    CaseSpec { case: Case::Six, truth: TruthField::Decomposition },
];

/// Baseline pipeline: the answering system did no decomposition, so only the
/// main and previous-hop questions are scored.
pub fn baseline_dispatch() -> &'static [CaseSpec] {
    &FULL_DISPATCH[..2]
}

/// Semantic family of an answer type; selects the normalizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeFamily {
    FreeText,
    Numeric,
    Temporal,
}

/// Parse the main answer_type against its closed vocabulary.
pub fn main_type_family(value: &str) -> Result<TypeFamily, EvalError> {
    match value {
        "string" | "letter" | "person" | "organization" | "character" => Ok(TypeFamily::FreeText),
        "number" | "year" => Ok(TypeFamily::Numeric),
        "date" | "datetime" => Ok(TypeFamily::Temporal),
        other => Err(EvalError::unsupported("answer_type", other)),
    }
}

/// Parse the previous-hop answer type against its closed vocabulary.
/// Differs from the main vocabulary: adds `place`, drops the main-only
/// free-text categories.
pub fn previous_type_family(value: &str) -> Result<TypeFamily, EvalError> {
    match value {
        "person" | "place" | "organization" => Ok(TypeFamily::FreeText),
        "number" | "year" => Ok(TypeFamily::Numeric),
        "date" | "datetime" => Ok(TypeFamily::Temporal),
        other => Err(EvalError::unsupported("previous_answer_type", other)),
    }
}

/// A (prediction, ground truth) pair after tag extraction and type-specific
/// canonicalization, ready for scoring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedPair {
    pub prediction: String,
    pub ground_truth: String,
}

/// Applies the dispatch table: tag extraction on the raw model text, then the
/// type family's normalizer on both sides of the pair.
pub struct TypeRouter<'a> {
    number: NumberNormalizer<'a>,
    date: DateNormalizer<'a>,
}

impl<'a> TypeRouter<'a> {
    pub fn new(ner: &'a EntityRecognizer, default_year: i32) -> Self {
        TypeRouter {
            number: NumberNormalizer::new(ner),
            date: DateNormalizer::new(ner, default_year),
        }
    }

    /// Produce the normalized pair for one case of one item.
    ///
    /// An answer type outside the closed vocabulary is a fatal configuration
    /// error and aborts the item; nothing is scored for it.
    pub fn route_case(
        &self,
        spec: &CaseSpec,
        item: &QuestionItem,
        raw_answer: &str,
    ) -> Result<NormalizedPair, EvalError> {
        let extracted = extract_answer(raw_answer);

        let (truth, family) = match spec.truth {
            TruthField::Answer => (
                item.answer.as_str(),
                main_type_family(&item.answer_type)?,
            ),
            TruthField::PreviousAnswer => (
                item.previous_answer.as_str(),
                previous_type_family(&item.previous_answer_type)?,
            ),
            TruthField::Decomposition => (item.decomposition_answer()?, TypeFamily::FreeText),
        };

        let pair = match family {
            TypeFamily::FreeText => NormalizedPair {
                prediction: extracted.to_string(),
                ground_truth: truth.to_string(),
            },
            TypeFamily::Numeric => NormalizedPair {
                prediction: self.number.normalize(extracted),
                ground_truth: self.number.normalize(truth),
            },
            TypeFamily::Temporal => NormalizedPair {
                prediction: self.date.normalize(extracted),
                ground_truth: self.date.normalize(truth),
            },
        };
        Ok(pair)
    }
}
