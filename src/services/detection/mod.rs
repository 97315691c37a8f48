// Detection Module
// Rule-based AI text detection organized into specialized submodules:
// - rules: declarative feature -> contribution table
// - scoring: applies the rule table and derives a confidence
// - sensitivity: decision policy (too short / human / AI)
// - explanation: ranks contributions and renders readable lines
// - detector: ties the pipeline together

pub mod rules;
pub mod scoring;
pub mod sensitivity;
pub mod explanation;
pub mod detector;

// Re-export commonly used items
pub use detector::Detector;
pub use rules::{default_rules, Ramp, ScoringRule, Transform};
pub use scoring::{confidence_from_total, score};
pub use sensitivity::{
    decision_threshold,
    Decision,
    DecisionPolicy,
    DecisionState,
    DetectionSensitivity,
};
pub use explanation::{explain_contributors, top_contributors};
