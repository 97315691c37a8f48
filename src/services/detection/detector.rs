// Detector
// Feature extraction -> rule scoring -> decision -> explanations.
// Pure and stateless; one instance can serve any number of callers.

use crate::models::{AnalysisResult, Prediction};
use crate::services::config_store::DetectionConfig;
use crate::services::text_processor::extract_features;
use tracing::debug;

use super::explanation::{explain_contributors, top_contributors, DEFAULT_TOP_CONTRIBUTORS};
use super::rules::{default_rules, ScoringRule};
use super::scoring::score;
use super::sensitivity::{decision_threshold, DecisionPolicy};

#[derive(Debug, Clone)]
pub struct Detector {
    rules: Vec<ScoringRule>,
    policy: DecisionPolicy,
    top_n: usize,
}

impl Default for Detector {
    fn default() -> Self {
        Self {
            rules: default_rules(),
            policy: DecisionPolicy::default(),
            top_n: DEFAULT_TOP_CONTRIBUTORS,
        }
    }
}

impl Detector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &DetectionConfig) -> Self {
        let threshold = config
            .decision_threshold
            .filter(|t| t.is_finite())
            .map(|t| t.clamp(0.0, 1.0))
            .unwrap_or_else(|| decision_threshold(&config.sensitivity));
        Self {
            rules: default_rules(),
            policy: DecisionPolicy {
                min_words: config.min_words,
                threshold,
                too_short_confidence: config.too_short_confidence,
            },
            top_n: config.top_contributors,
        }
    }

    /// Replace the rule table
    pub fn with_rules(mut self, rules: Vec<ScoringRule>) -> Self {
        self.rules = rules;
        self
    }

    pub fn with_policy(mut self, policy: DecisionPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn rules(&self) -> &[ScoringRule] {
        &self.rules
    }

    pub fn policy(&self) -> &DecisionPolicy {
        &self.policy
    }

    /// Analyze one text. Never fails: empty or short input takes the too-short path.
    pub fn analyze(&self, text: &str) -> AnalysisResult {
        let features = extract_features(text);
        let (contributions, raw_confidence) = score(&features, &self.rules);
        let decision = self.policy.decide(features.n_words, raw_confidence);

        let top = top_contributors(&contributions, self.top_n);
        let explanations = explain_contributors(&top, &features, &self.rules);
        let prediction = Prediction::from(decision.state);

        debug!(
            n_words = features.n_words,
            n_sentences = features.n_sentences,
            raw_confidence,
            confidence = decision.confidence,
            prediction = %prediction,
            "detector.analyzed"
        );

        AnalysisResult {
            prediction,
            confidence: decision.confidence,
            features,
            contributions,
            top_contributors: top,
            explanations,
            note: decision.note,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FeatureSet;

    fn repetitive_text() -> String {
        "The cat sat on the mat. ".repeat(34)
    }

    fn varied_text() -> String {
        let lengths = [2usize, 30, 5, 41, 8, 19, 3, 27, 11, 36, 18];
        let mut next = 0usize;
        let mut sentences = Vec::new();
        for len in lengths {
            let words: Vec<String> = (next..next + len).map(|i| format!("word{}", i)).collect();
            next += len;
            sentences.push(format!("{}.", words.join(" ")));
        }
        sentences.join(" ")
    }

    #[test]
    fn test_empty_input_is_too_short() {
        let result = Detector::new().analyze("");
        assert_eq!(result.prediction, Prediction::TooShort);
        assert_eq!(result.confidence, 0.0);
        assert!(result.note.is_some());
        assert_eq!(result.features, FeatureSet::default());
        assert!(!result.contributions.is_empty());
    }

    #[test]
    fn test_nineteen_words_forced_too_short() {
        let text = "ant bee cow dog elk fox gnu hen imp jay kite lark mole newt owl pig quail rat seal";
        let result = Detector::new().analyze(text);
        assert_eq!(result.features.n_words, 19);
        assert_eq!(result.features.lexical_diversity, 1.0);
        assert_eq!(result.prediction, Prediction::TooShort);
        assert_eq!(result.features.n_sentences, 1);
    }

    #[test]
    fn test_repetitive_text_is_ai() {
        let result = Detector::new().analyze(&repetitive_text());
        assert_eq!(result.features.n_words, 204);
        assert!(result.features.lexical_diversity < 0.2);
        assert_eq!(result.features.sentence_length_std, 0.0);
        assert!(result.confidence >= 0.5, "confidence {}", result.confidence);
        assert_eq!(result.prediction, Prediction::AiGenerated);
        assert!(result.note.is_none());
        assert_eq!(result.contributions.get("lexical_diversity"), Some(30.0));
    }

    #[test]
    fn test_varied_text_is_human() {
        let result = Detector::new().analyze(&varied_text());
        assert_eq!(result.features.n_words, 200);
        assert!(result.features.lexical_diversity > 0.7);
        assert!(result.features.sentence_length_std > 8.0);
        assert!(result.confidence < 0.5, "confidence {}", result.confidence);
        assert_eq!(result.prediction, Prediction::HumanWritten);
    }

    #[test]
    fn test_top_contributors_bounded_and_sorted() {
        let result = Detector::new().analyze(&repetitive_text());
        assert!(result.top_contributors.len() <= DEFAULT_TOP_CONTRIBUTORS);
        assert!(result
            .top_contributors
            .windows(2)
            .all(|w| w[0].1.abs() >= w[1].1.abs()));
        assert_eq!(result.explanations.len(), result.top_contributors.len());
        assert_eq!(result.top_contributors[0], ("lexical_diversity".to_string(), 30.0));
    }

    #[test]
    fn test_json_round_trip() {
        let result = Detector::new().analyze(&repetitive_text());
        let json = serde_json::to_string(&result).unwrap();
        let parsed: AnalysisResult = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, result);

        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["prediction"], "AI-generated");
        assert!(value["features"]["n_words"].is_u64());
        assert!(value["top_contributors"][0].is_array());
        assert!(value.get("note").is_none());
    }

    #[test]
    fn test_config_threshold_override() {
        let config = DetectionConfig {
            decision_threshold: Some(0.95),
            ..DetectionConfig::default()
        };
        let result = Detector::from_config(&config).analyze(&repetitive_text());
        assert_eq!(result.prediction, Prediction::HumanWritten);
    }

    #[test]
    fn test_config_min_words() {
        let config = DetectionConfig {
            min_words: 500,
            top_contributors: 2,
            ..DetectionConfig::default()
        };
        let result = Detector::from_config(&config).analyze(&repetitive_text());
        assert_eq!(result.prediction, Prediction::TooShort);
        assert_eq!(result.top_contributors.len(), 2);
    }

    #[test]
    fn test_custom_rule_table() {
        let detector = Detector::new().with_rules(Vec::new());
        let result = detector.analyze(&repetitive_text());
        assert!(result.contributions.is_empty());
        assert_eq!(result.confidence, 0.0);
        assert_eq!(result.prediction, Prediction::HumanWritten);
    }

    #[test]
    fn test_concurrent_calls_agree() {
        let detector = Detector::new();
        let text = varied_text();
        let expected = detector.analyze(&text);
        std::thread::scope(|s| {
            let handles: Vec<_> = (0..4).map(|_| s.spawn(|| detector.analyze(&text))).collect();
            for h in handles {
                assert_eq!(h.join().unwrap(), expected);
            }
        });
    }
}
