// Decision Policy
// Sensitivity influences the decision threshold, not the raw confidence.

use crate::models::Prediction;

pub const DEFAULT_MIN_WORDS: usize = 20;
pub const DEFAULT_TOO_SHORT_CONFIDENCE: f64 = 0.0;

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum DetectionSensitivity {
    Low,
    Medium,
    High,
}

impl DetectionSensitivity {
    pub fn from_str(val: &str) -> Self {
        match val.trim().to_lowercase().as_str() {
            "low" => Self::Low,
            "high" => Self::High,
            _ => Self::Medium,
        }
    }

    /// Confidence at or above which a text is labelled AI-generated.
    pub fn decision_threshold(&self) -> f64 {
        match self {
            Self::Low => 0.60,
            Self::Medium => 0.50,
            Self::High => 0.40,
        }
    }
}

pub fn decision_threshold(sensitivity: &str) -> f64 {
    DetectionSensitivity::from_str(sensitivity).decision_threshold()
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum DecisionState {
    TooShort,
    Human,
    Ai,
}

impl From<DecisionState> for Prediction {
    fn from(state: DecisionState) -> Self {
        match state {
            DecisionState::TooShort => Prediction::TooShort,
            DecisionState::Human => Prediction::HumanWritten,
            DecisionState::Ai => Prediction::AiGenerated,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Decision {
    pub state: DecisionState,
    pub confidence: f64,
    pub note: Option<String>,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct DecisionPolicy {
    pub min_words: usize,
    pub threshold: f64,
    pub too_short_confidence: f64,
}

impl Default for DecisionPolicy {
    fn default() -> Self {
        Self {
            min_words: DEFAULT_MIN_WORDS,
            threshold: DetectionSensitivity::Medium.decision_threshold(),
            too_short_confidence: DEFAULT_TOO_SHORT_CONFIDENCE,
        }
    }
}

impl DecisionPolicy {
    pub fn with_sensitivity(sensitivity: &str) -> Self {
        Self {
            threshold: decision_threshold(sensitivity),
            ..Self::default()
        }
    }

    /// Map word count and scorer confidence to a label.
    pub fn decide(&self, n_words: usize, confidence: f64) -> Decision {
        if n_words < self.min_words {
            let note = if n_words == 0 {
                "Empty text: nothing to analyze.".to_string()
            } else {
                format!(
                    "Input has {} word{}; texts under {} words are too short to judge and are treated as human-written by default.",
                    n_words,
                    if n_words == 1 { "" } else { "s" },
                    self.min_words
                )
            };
            return Decision {
                state: DecisionState::TooShort,
                confidence: self.too_short_confidence.clamp(0.0, 1.0),
                note: Some(note),
            };
        }

        let confidence = if confidence.is_finite() {
            confidence.clamp(0.0, 1.0)
        } else {
            0.0
        };
        let state = if confidence >= self.threshold {
            DecisionState::Ai
        } else {
            DecisionState::Human
        };

        Decision {
            state,
            confidence,
            note: None,
        }
    }
}
