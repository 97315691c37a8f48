// Text Processing Service
// Tokenization and surface feature extraction

use crate::models::FeatureSet;
use regex::Regex;
use std::collections::{HashMap, HashSet};
use std::sync::OnceLock;

const FEATURE_PRECISION: i32 = 4;
const REPEAT_MIN_COUNT: usize = 3;
const NGRAM_SIZE: usize = 3;

fn horizontal_ws_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[ \t\x0C\x0B\u{00A0}\u{3000}]+").expect("whitespace regex"))
}

fn sentence_end_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[.!?]+").expect("sentence end regex"))
}

/// Normalize typographic punctuation and whitespace
pub fn normalize_punctuation(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }

    // Smart quotes
    let s = text
        .replace(['\u{201c}', '\u{201d}'], "\"")
        .replace(['\u{2018}', '\u{2019}'], "'")
        // Em/en dash
        .replace(['\u{2014}', '\u{2013}'], "-")
        // Ellipsis
        .replace('\u{2026}', "...")
        .replace("\r\n", "\n")
        .replace('\r', "\n");

    let s = horizontal_ws_re().replace_all(&s, " ");

    s.lines()
        .map(|ln| ln.trim())
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

/// Split on whitespace and strip leading/trailing punctuation from each token
pub fn tokenize_words(text: &str) -> Vec<String> {
    text.split_whitespace()
        .map(|tok| tok.trim_matches(|c: char| !c.is_alphanumeric()))
        .filter(|tok| !tok.is_empty())
        .map(|tok| tok.to_string())
        .collect()
}

/// Split into sentences on runs of `.`, `!` and `?`
///
/// A single `.` between two digits is a decimal point. Fragments without any
/// word are dropped, and trailing text without a terminator is its own sentence.
pub fn split_sentences(text: &str) -> Vec<String> {
    if text.trim().is_empty() {
        return vec![];
    }

    let mut sentences = Vec::new();
    let mut cursor = 0usize;

    for m in sentence_end_re().find_iter(text) {
        if is_decimal_point(text, m.start(), m.end()) {
            continue;
        }
        push_sentence(&mut sentences, &text[cursor..m.end()]);
        cursor = m.end();
    }
    push_sentence(&mut sentences, &text[cursor..]);

    sentences
}

fn is_decimal_point(text: &str, start: usize, end: usize) -> bool {
    if end - start != 1 || &text[start..end] != "." {
        return false;
    }
    let before = text[..start].chars().next_back();
    let after = text[end..].chars().next();
    matches!((before, after), (Some(b), Some(a)) if b.is_ascii_digit() && a.is_ascii_digit())
}

fn push_sentence(out: &mut Vec<String>, fragment: &str) {
    let trimmed = fragment.trim();
    if trimmed.chars().any(|c| c.is_alphanumeric()) {
        out.push(trimmed.to_string());
    }
}

/// Compute the full feature set for a text
pub fn extract_features(text: &str) -> FeatureSet {
    let normalized = normalize_punctuation(text);
    let sentences = split_sentences(&normalized);

    let mut words: Vec<String> = Vec::new();
    let mut sentence_lengths: Vec<f64> = Vec::with_capacity(sentences.len());
    for sentence in &sentences {
        let tokens = tokenize_words(sentence);
        sentence_lengths.push(tokens.len() as f64);
        words.extend(tokens);
    }

    let n_words = words.len();
    let n_sentences = sentences.len();
    if n_words == 0 {
        return FeatureSet::default();
    }

    let lowered: Vec<String> = words.iter().map(|w| w.to_lowercase()).collect();
    let unique: HashSet<&str> = lowered.iter().map(|w| w.as_str()).collect();

    let total_chars: usize = words.iter().map(|w| w.chars().count()).sum();
    let commas = normalized.chars().filter(|c| *c == ',').count();

    FeatureSet {
        n_words,
        n_sentences,
        avg_sentence_length: round_to(safe_div(n_words as f64, n_sentences as f64)),
        sentence_length_std: round_to(std_dev(&sentence_lengths)),
        lexical_diversity: round_to(safe_div(unique.len() as f64, n_words as f64)),
        avg_word_length: round_to(safe_div(total_chars as f64, n_words as f64)),
        commas_per_sentence: round_to(safe_div(commas as f64, n_sentences as f64)),
        repeat_ratio: round_to(repeat_ratio(&lowered)),
        trigram_repeat_rate: round_to(ngram_repeat_rate(&lowered, NGRAM_SIZE)),
    }
}

fn safe_div(num: f64, den: f64) -> f64 {
    if den > 0.0 {
        num / den
    } else {
        0.0
    }
}

fn round_to(value: f64) -> f64 {
    let factor = 10f64.powi(FEATURE_PRECISION);
    (value * factor).round() / factor
}

fn std_dev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let mean = values.iter().sum::<f64>() / values.len() as f64;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

// Fraction of vocabulary items that occur at least REPEAT_MIN_COUNT times
fn repeat_ratio(tokens: &[String]) -> f64 {
    let mut freq: HashMap<&str, usize> = HashMap::new();
    for t in tokens {
        *freq.entry(t.as_str()).or_insert(0) += 1;
    }
    let repeats = freq.values().filter(|&&v| v >= REPEAT_MIN_COUNT).count();
    safe_div(repeats as f64, freq.len() as f64)
}

fn ngram_repeat_rate(tokens: &[String], n: usize) -> f64 {
    if n == 0 || tokens.len() < n {
        return 0.0;
    }
    let mut counts: HashMap<&[String], usize> = HashMap::new();
    for window in tokens.windows(n) {
        *counts.entry(window).or_insert(0) += 1;
    }
    let total = tokens.len() - n + 1;
    let repeats = counts.values().filter(|&&c| c >= 2).map(|&c| c - 1).sum::<usize>();
    safe_div(repeats as f64, total as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_punctuation() {
        let input = "Don\u{2019}t  say \u{201c}never\u{201d}\u{2014}ever\r\n";
        let output = normalize_punctuation(input);
        assert_eq!(output, "Don't say \"never\"-ever");
    }

    #[test]
    fn test_tokenize_strips_edge_punctuation() {
        let words = tokenize_words("Hello, world! (quoted) don't -- 3.5");
        assert_eq!(words, vec!["Hello", "world", "quoted", "don't", "3.5"]);
    }

    #[test]
    fn test_split_sentences_keeps_decimals() {
        let sentences = split_sentences("Pi is 3.14 roughly. Really?! Yes... ok");
        assert_eq!(sentences, vec!["Pi is 3.14 roughly.", "Really?!", "Yes...", "ok"]);
    }

    #[test]
    fn test_split_sentences_drops_bare_punctuation() {
        assert!(split_sentences("   ").is_empty());
        assert!(split_sentences("... !!! ??").is_empty());
    }

    #[test]
    fn test_empty_text_yields_zero_features() {
        assert_eq!(extract_features(""), FeatureSet::default());
        assert_eq!(extract_features(" \n\t "), FeatureSet::default());
    }

    #[test]
    fn test_run_on_text_is_one_sentence() {
        let features = extract_features("no terminal punctuation anywhere in this text, just words");
        assert_eq!(features.n_sentences, 1);
        assert_eq!(features.n_words, 9);
        assert_eq!(features.avg_sentence_length, 9.0);
        assert_eq!(features.sentence_length_std, 0.0);
        assert_eq!(features.commas_per_sentence, 1.0);
    }

    #[test]
    fn test_basic_statistics() {
        let features = extract_features("The cat sat. The cat ran away quickly!");
        assert_eq!(features.n_words, 8);
        assert_eq!(features.n_sentences, 2);
        assert_eq!(features.avg_sentence_length, 4.0);
        assert_eq!(features.sentence_length_std, 1.0);
        // the, cat, sat, ran, away, quickly
        assert_eq!(features.lexical_diversity, 0.75);
        assert_eq!(features.trigram_repeat_rate, 0.0);
    }

    #[test]
    fn test_lexical_diversity_is_case_insensitive() {
        let features = extract_features("Word word WORD word.");
        assert_eq!(features.lexical_diversity, 0.25);
        assert_eq!(features.repeat_ratio, 1.0);
    }

    #[test]
    fn test_extract_is_deterministic() {
        let text = "Some text, with commas. And a second sentence here! Does it repeat? It does.";
        assert_eq!(extract_features(text), extract_features(text));
    }

    #[test]
    fn test_ngram_repeat_rate() {
        let tokens: Vec<String> = "a b c a b c".split(' ').map(String::from).collect();
        // windows: abc bca cab abc -> one repeat out of four
        assert_eq!(ngram_repeat_rate(&tokens, 3), 0.25);
        assert_eq!(ngram_repeat_rate(&tokens[..2], 3), 0.0);
    }
}
