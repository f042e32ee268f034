/// Lightweight entity recognition shared by the number and date normalizers.
///
/// This is deliberately not a general NER system: the normalizers only ever
/// ask two questions of a short answer string — "which numeric expressions
/// does it contain?" and "which date expressions does it contain?" — so a
/// pair of compiled patterns plus a spelled-out-number grammar covers the
/// fallback path without any model weights. The recognizer is built once per
/// run and shared read-only across worker threads.

use once_cell::sync::Lazy;
use regex::Regex;

/// Matches common date surface forms: ISO dates, slash dates, month-name
/// dates with optional day and year, and bare 4-digit years.
static DATE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?ix)\b(?:
            \d{4}-\d{1,2}-\d{1,2}
            |\d{1,2}/\d{1,2}/\d{4}
            |(?:January|February|March|April|May|June|July|August|September|October|November|December)\s+\d{1,2}(?:\s*,\s*\d{4})?
            |\d{1,2}(?:st|nd|rd|th)?\s+(?:of\s+)?(?:January|February|March|April|May|June|July|August|September|October|November|December)(?:\s*,?\s+\d{4})?
            |(?:January|February|March|April|May|June|July|August|September|October|November|December)\s+\d{4}
            |(?:1[0-9]|20)\d{2}
        )\b",
    )
    .expect("Failed to compile date entity pattern")
});

/// A recognized numeric expression.
#[derive(Debug, Clone, PartialEq)]
pub struct NumberEntity {
    pub text: String,
    pub value: f64,
}

/// Shared read-only recognizer handle.
///
/// All patterns are compiled lazily at first use; the struct itself is a
/// zero-sized handle that makes the dependency explicit at call sites.
#[derive(Debug, Default, Clone, Copy)]
pub struct EntityRecognizer;

impl EntityRecognizer {
    pub fn new() -> Self {
        EntityRecognizer
    }

    /// All date expressions in the text, in order of appearance.
    pub fn date_entities<'a>(&self, text: &'a str) -> Vec<&'a str> {
        DATE_PATTERN.find_iter(text).map(|m| m.as_str()).collect()
    }

    /// All numeric expressions in the text, in order of appearance.
    ///
    /// Covers digit literals (with optional thousands separators) and
    /// spelled-out numbers ("three hundred and twelve", "twenty-one").
    pub fn number_entities(&self, text: &str) -> Vec<NumberEntity> {
        let tokens: Vec<&str> = text.split_whitespace().collect();
        let mut entities = Vec::new();
        let mut span: Vec<NumberWord> = Vec::new();
        let mut span_text: Vec<&str> = Vec::new();

        for token in &tokens {
            match classify(token) {
                Some(word) => {
                    span.push(word);
                    span_text.push(token);
                }
                // "and" only continues an already-open span ("one hundred and two")
                None if token.eq_ignore_ascii_case("and") && !span.is_empty() => {}
                None => {
                    flush_span(&mut span, &mut span_text, &mut entities);
                }
            }
        }
        flush_span(&mut span, &mut span_text, &mut entities);
        entities
    }
}

/// One token's role inside a spelled-out number.
#[derive(Debug, Clone, Copy)]
enum NumberWord {
    /// zero..nineteen, twenty..ninety, or a digit literal
    Value(f64),
    /// hundred
    Hundred,
    /// thousand, million, billion, trillion
    Scale(f64),
}

fn flush_span(
    span: &mut Vec<NumberWord>,
    span_text: &mut Vec<&str>,
    out: &mut Vec<NumberEntity>,
) {
    if let Some(value) = evaluate_span(span) {
        out.push(NumberEntity {
            text: span_text.join(" "),
            value,
        });
    }
    span.clear();
    span_text.clear();
}

/// Standard spelled-number accumulation: units/tens add into a running group,
/// "hundred" multiplies the group, larger scales close it into the total.
fn evaluate_span(span: &[NumberWord]) -> Option<f64> {
    if span.is_empty() {
        return None;
    }
    let mut total = 0.0;
    let mut current = 0.0;
    for word in span {
        match word {
            NumberWord::Value(v) => current += v,
            NumberWord::Hundred => {
                current = if current == 0.0 { 100.0 } else { current * 100.0 };
            }
            NumberWord::Scale(s) => {
                let group = if current == 0.0 { 1.0 } else { current };
                total += group * s;
                current = 0.0;
            }
        }
    }
    Some(total + current)
}

fn classify(token: &str) -> Option<NumberWord> {
    let cleaned = token
        .trim_matches(|c: char| c.is_ascii_punctuation() && c != '-' && c != '.')
        .to_lowercase();
    if cleaned.is_empty() {
        return None;
    }

    // Digit literal, allowing thousands separators
    if let Ok(v) = cleaned.trim_end_matches('.').replace(',', "").parse::<f64>() {
        return Some(NumberWord::Value(v));
    }

    // Hyphenated compounds: twenty-one, ninety-nine
    if let Some((tens, unit)) = cleaned.split_once('-') {
        if let (Some(t), Some(u)) = (small_number(tens), small_number(unit)) {
            return Some(NumberWord::Value(t + u));
        }
    }

    if let Some(v) = small_number(&cleaned) {
        return Some(NumberWord::Value(v));
    }
    match cleaned.as_str() {
        "hundred" => Some(NumberWord::Hundred),
        "thousand" => Some(NumberWord::Scale(1_000.0)),
        "million" => Some(NumberWord::Scale(1_000_000.0)),
        "billion" => Some(NumberWord::Scale(1_000_000_000.0)),
        "trillion" => Some(NumberWord::Scale(1_000_000_000_000.0)),
        _ => None,
    }
}

fn small_number(word: &str) -> Option<f64> {
    let v = match word {
        "zero" => 0.0,
        "one" => 1.0,
        "two" => 2.0,
        "three" => 3.0,
        "four" => 4.0,
        "five" => 5.0,
        "six" => 6.0,
        "seven" => 7.0,
        "eight" => 8.0,
        "nine" => 9.0,
        "ten" => 10.0,
        "eleven" => 11.0,
        "twelve" => 12.0,
        "thirteen" => 13.0,
        "fourteen" => 14.0,
        "fifteen" => 15.0,
        "sixteen" => 16.0,
        "seventeen" => 17.0,
        "eighteen" => 18.0,
        "nineteen" => 19.0,
        "twenty" => 20.0,
        "thirty" => 30.0,
        "forty" => 40.0,
        "fifty" => 50.0,
        "sixty" => 60.0,
        "seventy" => 70.0,
        "eighty" => 80.0,
        "ninety" => 90.0,
        _ => return None,
    };
    Some(v)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spelled_out_simple() {
        let ner = EntityRecognizer::new();
        let ents = ner.number_entities("three");
        assert_eq!(ents.len(), 1);
        assert_eq!(ents[0].value, 3.0);
    }

    #[test]
    fn test_spelled_out_compound() {
        let ner = EntityRecognizer::new();
        let ents = ner.number_entities("about three hundred and twelve people");
        assert_eq!(ents.len(), 1);
        assert_eq!(ents[0].value, 312.0);
    }

    #[test]
    fn test_hyphenated_and_scales() {
        let ner = EntityRecognizer::new();
        assert_eq!(ner.number_entities("twenty-one")[0].value, 21.0);
        assert_eq!(ner.number_entities("two thousand")[0].value, 2000.0);
        assert_eq!(ner.number_entities("3.5 million")[0].value, 3_500_000.0);
        assert_eq!(ner.number_entities("a million")[0].value, 1_000_000.0);
    }

    #[test]
    fn test_last_entity_is_final_value() {
        let ner = EntityRecognizer::new();
        let ents = ner.number_entities("either five or seven, probably seven");
        assert_eq!(ents.last().unwrap().value, 7.0);
    }

    #[test]
    fn test_no_numbers_yields_empty() {
        let ner = EntityRecognizer::new();
        assert!(ner.number_entities("no digits in sight").is_empty());
    }

    #[test]
    fn test_date_entities() {
        let ner = EntityRecognizer::new();
        let ents = ner.date_entities("He was born on March 3, 1999 in Paris.");
        assert_eq!(ents, vec!["March 3, 1999"]);
    }

    #[test]
    fn test_date_entities_take_last() {
        let ner = EntityRecognizer::new();
        let ents = ner.date_entities("Founded in 1948, rebuilt 12 June 1960.");
        assert_eq!(ents.last().copied(), Some("12 June 1960"));
    }

    #[test]
    fn test_bare_year_is_a_date() {
        let ner = EntityRecognizer::new();
        assert_eq!(ner.date_entities("sometime around 1987"), vec!["1987"]);
    }
}
