// Scoring
// Applies the rule table to a feature set and sums points into a confidence

use crate::models::{ContributionSet, FeatureSet};

use super::rules::ScoringRule;

const CONTRIBUTION_PRECISION: i32 = 2;
const CONFIDENCE_PRECISION: i32 = 4;

/// Score features against `rules`. Returns per-rule contributions and confidence in [0, 1].
pub fn score(features: &FeatureSet, rules: &[ScoringRule]) -> (ContributionSet, f64) {
    let mut contributions = ContributionSet::new();
    for rule in rules {
        let value = features.get(&rule.feature).unwrap_or(0.0);
        let points = round_to(rule.contribution(value), CONTRIBUTION_PRECISION);
        contributions.insert(&rule.feature, points);
    }

    let confidence = confidence_from_total(contributions.total());
    (contributions, confidence)
}

/// Clamp a percentage-point total into a [0, 1] confidence.
pub fn confidence_from_total(total: f64) -> f64 {
    if !total.is_finite() {
        return 0.0;
    }
    round_to((total / 100.0).clamp(0.0, 1.0), CONFIDENCE_PRECISION)
}

fn round_to(value: f64, digits: i32) -> f64 {
    let factor = 10f64.powi(digits);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::detection::rules::default_rules;

    #[test]
    fn test_all_zero_features_stay_in_range() {
        let (contributions, confidence) = score(&FeatureSet::default(), &default_rules());
        assert_eq!(contributions.len(), default_rules().len());
        assert!((0.0..=1.0).contains(&confidence));
    }

    #[test]
    fn test_extreme_features_clamp() {
        let ai_like = FeatureSet {
            n_words: 500,
            n_sentences: 100,
            avg_sentence_length: 5.0,
            sentence_length_std: 0.0,
            lexical_diversity: 0.05,
            avg_word_length: 7.0,
            commas_per_sentence: 3.0,
            repeat_ratio: 0.9,
            trigram_repeat_rate: 0.9,
        };
        let (_, confidence) = score(&ai_like, &default_rules());
        assert_eq!(confidence, 1.0);

        let human_like = FeatureSet {
            n_words: 500,
            n_sentences: 25,
            avg_sentence_length: 20.0,
            sentence_length_std: 15.0,
            lexical_diversity: 0.95,
            avg_word_length: 3.5,
            commas_per_sentence: 0.0,
            repeat_ratio: 0.0,
            trigram_repeat_rate: 0.0,
        };
        let (_, confidence) = score(&human_like, &default_rules());
        assert_eq!(confidence, 0.0);
    }

    #[test]
    fn test_contributions_follow_rule_order() {
        let (contributions, _) = score(&FeatureSet::default(), &default_rules());
        let names: Vec<&str> = contributions.iter().map(|(k, _)| k).collect();
        let expected: Vec<String> = default_rules().into_iter().map(|r| r.feature).collect();
        assert_eq!(names, expected.iter().map(|s| s.as_str()).collect::<Vec<_>>());
    }

    #[test]
    fn test_confidence_from_total() {
        assert_eq!(confidence_from_total(-40.0), 0.0);
        assert_eq!(confidence_from_total(55.5), 0.555);
        assert_eq!(confidence_from_total(250.0), 1.0);
        assert_eq!(confidence_from_total(f64::NAN), 0.0);
    }

    #[test]
    fn test_empty_rule_table_scores_zero() {
        let (contributions, confidence) = score(&FeatureSet::default(), &[]);
        assert!(contributions.is_empty());
        assert_eq!(confidence, 0.0);
    }
}
