// Scoring Rules
// Declarative table mapping one feature to one contribution (percentage points).
// Positive points push toward "AI-generated", negative toward "human-written".

use serde::{Deserialize, Serialize};

/// Linear interpolation from `(lo, at_lo)` to `(hi, at_hi)`, flat outside the span
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ramp {
    pub lo: f64,
    pub hi: f64,
    pub at_lo: f64,
    pub at_hi: f64,
}

impl Ramp {
    pub const fn new(lo: f64, hi: f64, at_lo: f64, at_hi: f64) -> Self {
        Self { lo, hi, at_lo, at_hi }
    }

    pub fn eval(&self, x: f64) -> f64 {
        if x <= self.lo {
            return self.at_lo;
        }
        if x >= self.hi {
            return self.at_hi;
        }
        let t = (x - self.lo) / (self.hi - self.lo).max(f64::EPSILON);
        self.at_lo + t * (self.at_hi - self.at_lo)
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Transform {
    Ramp(Ramp),
    /// Sum of a falling ramp for small values and a rising ramp for large ones.
    UShape { low: Ramp, high: Ramp },
}

impl Transform {
    pub fn eval(&self, x: f64) -> f64 {
        match self {
            Self::Ramp(r) => r.eval(x),
            Self::UShape { low, high } => low.eval(x) + high.eval(x),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringRule {
    pub feature: String,
    pub transform: Transform,
    /// Phrase used when the rule pushes toward AI.
    pub ai_hint: String,
    /// Phrase used when the rule pushes toward human.
    pub human_hint: String,
}

impl ScoringRule {
    pub fn new(feature: &str, transform: Transform, ai_hint: &str, human_hint: &str) -> Self {
        Self {
            feature: feature.to_string(),
            transform,
            ai_hint: ai_hint.to_string(),
            human_hint: human_hint.to_string(),
        }
    }

    /// Contribution for a raw feature value; non-finite values contribute nothing.
    pub fn contribution(&self, value: f64) -> f64 {
        if !value.is_finite() {
            return 0.0;
        }
        let points = self.transform.eval(value);
        if points.is_finite() {
            points
        } else {
            0.0
        }
    }

    pub fn hint(&self, contribution: f64) -> &str {
        if contribution >= 0.0 {
            &self.ai_hint
        } else {
            &self.human_hint
        }
    }
}

/// Hand-tuned default rule table, in declaration order
pub fn default_rules() -> Vec<ScoringRule> {
    vec![
        ScoringRule::new(
            "lexical_diversity",
            Transform::Ramp(Ramp::new(0.30, 0.70, 30.0, -20.0)),
            "low lexical diversity",
            "varied vocabulary",
        ),
        ScoringRule::new(
            "sentence_length_std",
            Transform::Ramp(Ramp::new(2.0, 8.0, 25.0, -15.0)),
            "uniform sentence lengths",
            "irregular sentence lengths",
        ),
        ScoringRule::new(
            "repeat_ratio",
            Transform::Ramp(Ramp::new(0.05, 0.30, -5.0, 15.0)),
            "many frequently repeated words",
            "few repeated words",
        ),
        ScoringRule::new(
            "trigram_repeat_rate",
            Transform::Ramp(Ramp::new(0.02, 0.20, 0.0, 15.0)),
            "repeated three-word phrases",
            "no repeated phrases",
        ),
        ScoringRule::new(
            "avg_sentence_length",
            Transform::UShape {
                low: Ramp::new(4.0, 10.0, 8.0, 0.0),
                high: Ramp::new(30.0, 45.0, 0.0, 8.0),
            },
            "extreme average sentence length",
            "typical sentence length",
        ),
        ScoringRule::new(
            "avg_word_length",
            Transform::Ramp(Ramp::new(4.0, 5.5, -5.0, 10.0)),
            "long, formal words",
            "short, plain words",
        ),
        ScoringRule::new(
            "commas_per_sentence",
            Transform::Ramp(Ramp::new(0.2, 1.5, -5.0, 5.0)),
            "dense comma usage",
            "sparse comma usage",
        ),
    ]
}
