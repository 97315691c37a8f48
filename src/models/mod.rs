// HumanLens Data Models
// Shapes shared by the detector, the request layer and the history store

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

// ============ Prediction ============

#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub enum Prediction {
    #[serde(rename = "AI-generated")]
    AiGenerated,
    #[serde(rename = "Human-written")]
    HumanWritten,
    #[serde(rename = "Too short")]
    TooShort,
}

impl Prediction {
    pub fn label(&self) -> &'static str {
        match self {
            Self::AiGenerated => "AI-generated",
            Self::HumanWritten => "Human-written",
            Self::TooShort => "Too short",
        }
    }
}

impl std::fmt::Display for Prediction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

// ============ Features ============

/// Surface statistics of one text. Field order is the feature declaration order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureSet {
    pub n_words: usize,
    pub n_sentences: usize,
    pub avg_sentence_length: f64,
    pub sentence_length_std: f64,
    pub lexical_diversity: f64,
    pub avg_word_length: f64,
    pub commas_per_sentence: f64,
    pub repeat_ratio: f64,
    pub trigram_repeat_rate: f64,
}

impl FeatureSet {
    pub const NAMES: [&'static str; 9] = [
        "n_words",
        "n_sentences",
        "avg_sentence_length",
        "sentence_length_std",
        "lexical_diversity",
        "avg_word_length",
        "commas_per_sentence",
        "repeat_ratio",
        "trigram_repeat_rate",
    ];

    /// Look up a feature by name as a float.
    pub fn get(&self, name: &str) -> Option<f64> {
        let value = match name {
            "n_words" => self.n_words as f64,
            "n_sentences" => self.n_sentences as f64,
            "avg_sentence_length" => self.avg_sentence_length,
            "sentence_length_std" => self.sentence_length_std,
            "lexical_diversity" => self.lexical_diversity,
            "avg_word_length" => self.avg_word_length,
            "commas_per_sentence" => self.commas_per_sentence,
            "repeat_ratio" => self.repeat_ratio,
            "trigram_repeat_rate" => self.trigram_repeat_rate,
            _ => return None,
        };
        Some(value)
    }

    /// (name, value) pairs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, f64)> + '_ {
        Self::NAMES
            .iter()
            .filter_map(move |name| self.get(name).map(|v| (*name, v)))
    }
}

/// Signed percentage points per scored feature, in rule-table order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContributionSet(pub IndexMap<String, f64>);

impl ContributionSet {
    pub fn new() -> Self {
        Self(IndexMap::new())
    }

    pub fn insert(&mut self, name: &str, value: f64) {
        self.0.insert(name.to_string(), value);
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.0.get(name).copied()
    }

    pub fn total(&self) -> f64 {
        self.0.values().sum()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

// ============ Analysis Result ============

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub prediction: Prediction,
    pub confidence: f64,
    pub features: FeatureSet,
    pub contributions: ContributionSet,
    /// Serialized as `[name, value]` pairs.
    pub top_contributors: Vec<(String, f64)>,
    #[serde(default)]
    pub explanations: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

// ============ Request Layer ============

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzeRequest {
    pub text: String,
}

// ============ History ============

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryRecord {
    pub id: i64,
    /// Unix time in seconds.
    pub timestamp: f64,
    pub text_hash: String,
    pub prediction: String,
    pub confidence: f64,
    pub n_words: i64,
}
