/// Number canonicalization: maps free text to a float-formatted decimal string.
///
/// Strategy chain, first success wins:
/// 1. Strip thousands separators, parse the whole string as a number.
/// 2. Recognize numeric expressions (including spelled-out numbers) and take
///    the last one.
/// 3. Scan whitespace tokens and take the last one that parses as a number.
/// 4. Give up and return the input unchanged.
///
/// The "take the last" bias in steps 2 and 3 matches how models phrase
/// answers: the final stated value is usually the one they commit to.

use crate::ner::EntityRecognizer;

pub struct NumberNormalizer<'a> {
    ner: &'a EntityRecognizer,
}

impl<'a> NumberNormalizer<'a> {
    pub fn new(ner: &'a EntityRecognizer) -> Self {
        NumberNormalizer { ner }
    }

    pub fn normalize(&self, raw: &str) -> String {
        direct_parse(raw)
            .or_else(|| self.entity_parse(raw))
            .or_else(|| token_scan(raw))
            .unwrap_or_else(|| raw.to_string())
    }

    /// Strategy 2: last recognized numeric expression in the text.
    fn entity_parse(&self, raw: &str) -> Option<String> {
        self.ner
            .number_entities(raw)
            .last()
            .map(|ent| format_float(ent.value))
    }
}

/// Strategy 1: the whole string is a number, modulo thousands separators.
fn direct_parse(raw: &str) -> Option<String> {
    raw.trim().replace(',', "").parse::<f64>().ok().map(format_float)
}

/// Strategy 3: last whitespace token that parses as a number.
fn token_scan(raw: &str) -> Option<String> {
    raw.split_whitespace()
        .filter_map(|tok| tok.parse::<f64>().ok())
        .last()
        .map(format_float)
}

/// Canonical form: shortest round-trip decimal with a trailing `.0` for
/// integral values ("1234.0", "12.5").
fn format_float(v: f64) -> String {
    format!("{:?}", v)
}
