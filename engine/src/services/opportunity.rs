//! Opportunity scoring and ranking.
//!
//! The ranker joins the three per-group signals (gap rate, seasonality
//! variation, diet penetration), normalizes each to `[0, 1]` over the batch,
//! and combines them with configured weights into one composite score per
//! group. The penetration component is inverted after scaling: low diet
//! penetration is white space, so it should raise the score rather than
//! lower it.

use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

use crate::config::ScoreWeights;
use crate::core::domain::DimensionKey;
use crate::error::{ConfigError, Diagnostic, MetricSource};
use crate::services::gaps::GapMetric;
use crate::services::seasonality::SeasonalityMetric;

/// Composite opportunity score for one dimension group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OpportunityScore {
    pub key: DimensionKey,
    /// Min-max scaled gap rate, `[0, 1]`.
    pub gap_component: f64,
    /// Min-max scaled coefficient of variation, `[0, 1]`.
    pub seasonality_component: f64,
    /// Inverted min-max scaled diet penetration, `[0, 1]`.
    pub penetration_component: f64,
    pub composite_score: f64,
    /// 1-based, descending score, ties broken by key.
    pub rank: usize,
}

/// Join the three metric sets and rank every fully-joined group.
///
/// Weights are validated before any input is read. Groups missing from any
/// input (including groups whose coefficient of variation is undefined) are
/// excluded from the ranking and reported as [`Diagnostic::JoinKeyMissing`],
/// one diagnostic per missing source.
pub fn rank_opportunities(
    gaps: &[GapMetric],
    seasonality: &[SeasonalityMetric],
    penetration: &BTreeMap<DimensionKey, f64>,
    weights: &ScoreWeights,
) -> Result<(Vec<OpportunityScore>, Vec<Diagnostic>), ConfigError> {
    weights.validate()?;

    let gap_by_key: BTreeMap<&DimensionKey, f64> =
        gaps.iter().map(|m| (&m.key, m.gap_rate)).collect();
    // Only groups with a defined CV carry a usable seasonality signal.
    let seasonality_by_key: BTreeMap<&DimensionKey, f64> = seasonality
        .iter()
        .filter_map(|m| m.coefficient_of_variation.map(|cv| (&m.key, cv)))
        .collect();

    let mut universe: BTreeSet<&DimensionKey> = BTreeSet::new();
    universe.extend(gap_by_key.keys());
    universe.extend(seasonality_by_key.keys());
    universe.extend(penetration.keys());

    let mut diagnostics = Vec::new();
    let mut joined: Vec<(&DimensionKey, f64, f64, f64)> = Vec::new();

    for key in universe {
        let gap = gap_by_key.get(key);
        let season = seasonality_by_key.get(key);
        let pen = penetration.get(key);

        match (gap, season, pen) {
            (Some(&g), Some(&s), Some(&p)) => joined.push((key, g, s, p)),
            _ => {
                for (missing, source) in [
                    (gap.is_none(), MetricSource::Gap),
                    (season.is_none(), MetricSource::Seasonality),
                    (pen.is_none(), MetricSource::Penetration),
                ] {
                    if missing {
                        diagnostics.push(Diagnostic::JoinKeyMissing {
                            key: key.clone(),
                            missing_from: source,
                        });
                    }
                }
            }
        }
    }

    let gap_scaled = min_max_scale(joined.iter().map(|(_, g, _, _)| *g).collect());
    let season_scaled = min_max_scale(joined.iter().map(|(_, _, s, _)| *s).collect());
    let pen_scaled = min_max_scale(joined.iter().map(|(_, _, _, p)| *p).collect());

    let mut scores: Vec<OpportunityScore> = joined
        .iter()
        .enumerate()
        .map(|(i, (key, _, _, _))| {
            let gap_component = gap_scaled[i];
            let seasonality_component = season_scaled[i];
            let penetration_component = 1.0 - pen_scaled[i];
            let composite_score = weights.gap * gap_component
                + weights.seasonality * seasonality_component
                + weights.penetration * penetration_component;
            OpportunityScore {
                key: (*key).clone(),
                gap_component,
                seasonality_component,
                penetration_component,
                composite_score,
                rank: 0,
            }
        })
        .collect();

    scores.sort_by(|a, b| {
        b.composite_score
            .partial_cmp(&a.composite_score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.key.cmp(&b.key))
    });
    for (i, score) in scores.iter_mut().enumerate() {
        score.rank = i + 1;
    }

    Ok((scores, diagnostics))
}

/// Min-max scale to `[0, 1]`; a constant (or single-element) batch maps to
/// 0.5 so it neither dominates nor vanishes from the composite.
fn min_max_scale(values: Vec<f64>) -> Vec<f64> {
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    if values.is_empty() || max == min {
        return vec![0.5; values.len()];
    }
    values.iter().map(|v| (v - min) / (max - min)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::domain::MonthKey;
    use crate::services::seasonality::PeakTroughRatio;

    fn key(name: &str) -> DimensionKey {
        DimensionKey::new(vec![name.to_string()])
    }

    fn gap(name: &str, rate: f64) -> GapMetric {
        GapMetric {
            key: key(name),
            total_records: 10,
            zero_records: (rate * 10.0) as usize,
            gap_rate: rate,
        }
    }

    fn season(name: &str, cv: Option<f64>) -> SeasonalityMetric {
        SeasonalityMetric {
            key: key(name),
            mean: 100.0,
            stddev: cv.map(|c| c * 100.0),
            coefficient_of_variation: cv,
            peak_period: MonthKey::new(2024, 7),
            trough_period: MonthKey::new(2024, 2),
            peak_to_trough_ratio: PeakTroughRatio::Finite(2.0),
            periods_observed: 12,
            low_confidence: cv.is_none(),
        }
    }

    fn pen(entries: &[(&str, f64)]) -> BTreeMap<DimensionKey, f64> {
        entries.iter().map(|(n, v)| (key(n), *v)).collect()
    }

    #[test]
    fn test_invalid_weights_fail_before_any_join() {
        let weights = ScoreWeights::new(0.5, 0.4, 0.2);
        let result = rank_opportunities(
            &[gap("A", 0.5)],
            &[season("A", Some(0.3))],
            &pen(&[("A", 0.1)]),
            &weights,
        );

        match result {
            Err(ConfigError::InvalidWeights { sum }) => assert!((sum - 1.1).abs() < 1e-9),
            other => panic!("expected InvalidWeights, got {other:?}"),
        }
    }

    #[test]
    fn test_full_join_ranks_every_key() {
        let gaps = vec![gap("A", 0.1), gap("B", 0.5), gap("C", 0.9)];
        let seasons = vec![
            season("A", Some(0.2)),
            season("B", Some(0.5)),
            season("C", Some(0.8)),
        ];
        let penetration = pen(&[("A", 0.9), ("B", 0.5), ("C", 0.1)]);

        let (scores, diagnostics) = rank_opportunities(
            &gaps,
            &seasons,
            &penetration,
            &ScoreWeights::default(),
        )
        .unwrap();

        assert!(diagnostics.is_empty());
        assert_eq!(scores.len(), 3);

        // C has the widest gaps, strongest seasonality and least diet
        // penetration, so it must lead.
        assert_eq!(scores[0].key, key("C"));
        assert_eq!(scores[0].rank, 1);
        assert_eq!(scores[0].gap_component, 1.0);
        assert_eq!(scores[0].penetration_component, 1.0);
        assert!((scores[0].composite_score - 1.0).abs() < 1e-12);

        assert_eq!(scores[2].key, key("A"));
        assert!((scores[2].composite_score - 0.0).abs() < 1e-12);
    }

    #[test]
    fn test_constant_component_pins_at_half() {
        let gaps = vec![gap("A", 0.4), gap("B", 0.4)];
        let seasons = vec![season("A", Some(0.2)), season("B", Some(0.6))];
        let penetration = pen(&[("A", 0.3), ("B", 0.3)]);

        let (scores, _) = rank_opportunities(
            &gaps,
            &seasons,
            &penetration,
            &ScoreWeights::default(),
        )
        .unwrap();

        assert!(scores.iter().all(|s| s.gap_component == 0.5));
        assert!(scores.iter().all(|s| s.penetration_component == 0.5));
    }

    #[test]
    fn test_low_penetration_scores_high() {
        let gaps = vec![gap("A", 0.4), gap("B", 0.4)];
        let seasons = vec![season("A", Some(0.4)), season("B", Some(0.4))];
        // A is saturated with diet product, B is white space.
        let penetration = pen(&[("A", 0.8), ("B", 0.05)]);

        let (scores, _) = rank_opportunities(
            &gaps,
            &seasons,
            &penetration,
            &ScoreWeights::default(),
        )
        .unwrap();

        assert_eq!(scores[0].key, key("B"));
        assert_eq!(scores[0].penetration_component, 1.0);
        assert_eq!(scores[1].penetration_component, 0.0);
    }

    #[test]
    fn test_missing_key_excluded_with_diagnostic() {
        let gaps = vec![gap("A", 0.1), gap("B", 0.5)];
        let seasons = vec![season("A", Some(0.2)), season("B", Some(0.5))];
        let penetration = pen(&[("A", 0.9)]); // B missing here

        let (scores, diagnostics) = rank_opportunities(
            &gaps,
            &seasons,
            &penetration,
            &ScoreWeights::default(),
        )
        .unwrap();

        assert_eq!(scores.len(), 1);
        assert_eq!(scores[0].key, key("A"));

        assert_eq!(diagnostics.len(), 1);
        assert_eq!(
            diagnostics[0],
            Diagnostic::JoinKeyMissing {
                key: key("B"),
                missing_from: MetricSource::Penetration,
            }
        );
    }

    #[test]
    fn test_undefined_cv_counts_as_missing_seasonality() {
        let gaps = vec![gap("A", 0.1), gap("B", 0.5)];
        let seasons = vec![season("A", Some(0.2)), season("B", None)];
        let penetration = pen(&[("A", 0.9), ("B", 0.5)]);

        let (scores, diagnostics) = rank_opportunities(
            &gaps,
            &seasons,
            &penetration,
            &ScoreWeights::default(),
        )
        .unwrap();

        assert_eq!(scores.len(), 1);
        assert_eq!(
            diagnostics[0],
            Diagnostic::JoinKeyMissing {
                key: key("B"),
                missing_from: MetricSource::Seasonality,
            }
        );
    }

    #[test]
    fn test_equal_scores_break_ties_alphabetically() {
        // Identical inputs for both keys produce identical composites.
        let gaps = vec![gap("Zeta", 0.4), gap("Alpha", 0.4)];
        let seasons = vec![season("Zeta", Some(0.3)), season("Alpha", Some(0.3))];
        let penetration = pen(&[("Zeta", 0.2), ("Alpha", 0.2)]);

        let (scores, _) = rank_opportunities(
            &gaps,
            &seasons,
            &penetration,
            &ScoreWeights::default(),
        )
        .unwrap();

        assert_eq!(scores[0].composite_score, scores[1].composite_score);
        assert_eq!(scores[0].key, key("Alpha"));
        assert_eq!(scores[0].rank, 1);
        assert_eq!(scores[1].key, key("Zeta"));
        assert_eq!(scores[1].rank, 2);
    }

    #[test]
    fn test_ranks_form_a_total_order() {
        let names = ["A", "B", "C", "D", "E"];
        let gaps: Vec<GapMetric> = names
            .iter()
            .enumerate()
            .map(|(i, n)| gap(n, i as f64 / 10.0))
            .collect();
        let seasons: Vec<SeasonalityMetric> = names
            .iter()
            .map(|n| season(n, Some(0.4)))
            .collect();
        let penetration = pen(&names.iter().map(|n| (*n, 0.2)).collect::<Vec<_>>());

        let (scores, _) = rank_opportunities(
            &gaps,
            &seasons,
            &penetration,
            &ScoreWeights::default(),
        )
        .unwrap();

        let mut ranks: Vec<usize> = scores.iter().map(|s| s.rank).collect();
        ranks.sort_unstable();
        assert_eq!(ranks, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_min_max_scale_constant_is_half() {
        assert_eq!(min_max_scale(vec![3.0, 3.0, 3.0]), vec![0.5, 0.5, 0.5]);
        assert_eq!(min_max_scale(vec![]), Vec::<f64>::new());
        assert_eq!(min_max_scale(vec![1.0, 3.0]), vec![0.0, 1.0]);
    }
}
