// HumanLens Core Services

pub mod text_processor;
pub mod config_store;
pub mod history_store;
pub mod detection;

pub use text_processor::*;
pub use config_store::*;
pub use history_store::*;

// Re-export detection module items
pub use detection::{
    default_rules,
    score,
    top_contributors,
    DecisionPolicy,
    Detector,
    DetectionSensitivity,
    ScoringRule,
};
