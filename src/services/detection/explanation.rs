// Explanation Builder
// Ranks contributions and renders them as readable lines

use crate::models::{ContributionSet, FeatureSet};

use super::rules::ScoringRule;

pub const DEFAULT_TOP_CONTRIBUTORS: usize = 5;

/// Top `n` contributions by absolute value, sign preserved.
/// Ties keep declaration order.
pub fn top_contributors(contributions: &ContributionSet, n: usize) -> Vec<(String, f64)> {
    let mut ranked: Vec<(String, f64)> = contributions
        .iter()
        .map(|(name, value)| (name.to_string(), value))
        .collect();
    // sort_by is stable
    ranked.sort_by(|a, b| {
        b.1.abs()
            .partial_cmp(&a.1.abs())
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    ranked.truncate(n);
    ranked
}

pub fn explain_contributors(
    top: &[(String, f64)],
    features: &FeatureSet,
    rules: &[ScoringRule],
) -> Vec<String> {
    top.iter()
        .map(|(name, points)| {
            let value = features.get(name).unwrap_or(0.0);
            match rules.iter().find(|r| &r.feature == name) {
                Some(rule) => format!(
                    "{} = {:.3}: {} ({:+.2} pts)",
                    name,
                    value,
                    rule.hint(*points),
                    points
                ),
                None => format!("{} = {:.3} ({:+.2} pts)", name, value, points),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::detection::rules::default_rules;

    fn contributions(pairs: &[(&str, f64)]) -> ContributionSet {
        let mut set = ContributionSet::new();
        for (name, value) in pairs {
            set.insert(name, *value);
        }
        set
    }

    #[test]
    fn test_sorted_by_magnitude_with_sign() {
        let set = contributions(&[("a", 3.0), ("b", -12.0), ("c", 7.5), ("d", 0.0)]);
        let top = top_contributors(&set, 3);
        assert_eq!(
            top,
            vec![("b".to_string(), -12.0), ("c".to_string(), 7.5), ("a".to_string(), 3.0)]
        );
    }

    #[test]
    fn test_ties_keep_declaration_order() {
        let set = contributions(&[("first", -5.0), ("second", 5.0), ("third", 5.0), ("big", 9.0)]);
        let top = top_contributors(&set, 5);
        let names: Vec<&str> = top.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["big", "first", "second", "third"]);
    }

    #[test]
    fn test_length_bounded_by_n() {
        let set = contributions(&[("a", 1.0), ("b", 2.0)]);
        assert_eq!(top_contributors(&set, 5).len(), 2);
        assert_eq!(top_contributors(&set, 1).len(), 1);
        assert!(top_contributors(&set, 0).is_empty());
    }

    #[test]
    fn test_explanations_use_rule_hints() {
        let features = FeatureSet {
            lexical_diversity: 0.18,
            ..FeatureSet::default()
        };
        let top = vec![("lexical_diversity".to_string(), 30.0), ("n_words".to_string(), 0.0)];
        let lines = explain_contributors(&top, &features, &default_rules());
        assert_eq!(lines[0], "lexical_diversity = 0.180: low lexical diversity (+30.00 pts)");
        assert_eq!(lines[1], "n_words = 0.000 (+0.00 pts)");
    }
}
