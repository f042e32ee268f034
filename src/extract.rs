/// Answer tag extraction: pulls the intended answer out of a raw model response.
///
/// Models are prompted to wrap their final answer in <answer></answer> tags.
/// Extraction never fails: when no tag pair is present the whole response is
/// returned, and the scoring step decides how wrong that was.

use once_cell::sync::Lazy;
use regex::Regex;

/// Matches the span between the first <answer> and the last </answer>,
/// across newlines and regardless of tag casing.
static ANSWER_TAGS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)<answer>(.*)</answer>")
        .expect("Failed to compile answer tag pattern")
});

/// Return the text between <answer> and </answer> tags, trimmed.
///
/// Falls back to the trimmed raw response when no tag pair is found.
pub fn extract_answer(raw: &str) -> &str {
    match ANSWER_TAGS.captures(raw) {
        Some(caps) => caps.get(1).map_or(raw, |m| m.as_str()).trim(),
        None => raw.trim(),
    }
}
