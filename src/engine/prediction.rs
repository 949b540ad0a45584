//! The prediction rule table.
//!
//! One pure function over the drift summary, both form assessments, and the
//! table-rank gap. Thresholds live in a single `PredictionPolicy` rather
//! than scattered constants, so variants are a config edit, not a code
//! fork. First matching rule wins; no rule means no prediction.

use serde::Deserialize;

use crate::model::{AssessmentPair, DriftSummary, Outcome, Trend};

/// Tunable thresholds for the decision rules.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PredictionPolicy {
    /// A fixture enters scoring only if some outcome drifted down at least
    /// this far (signed percentage points).
    pub drift_gate: i32,
    /// Rule 1: both sides off form but the rating gap stays under this.
    pub contrarian_rating_gap: f64,
    /// Rule 2: away surging, home fading, rating gap under this.
    pub upset_rating_gap: f64,
    /// Rule 3a: draw drift at or below this counts as strongly negative.
    pub strong_draw_drift: i32,
    /// Rule 3a: rating gap under this counts as small.
    pub draw_rating_gap: f64,
}

impl Default for PredictionPolicy {
    fn default() -> Self {
        Self {
            drift_gate: -8,
            contrarian_rating_gap: 0.4,
            upset_rating_gap: 0.3,
            strong_draw_drift: -10,
            draw_rating_gap: 0.2,
        }
    }
}

impl PredictionPolicy {
    /// Whether the aggregated drift is sharp enough to evaluate at all.
    /// Weaker moves are noise and are never scored.
    pub fn crosses_gate(&self, drift: &DriftSummary) -> bool {
        drift.steepest() <= self.drift_gate
    }
}

/// Structural draw condition: evenly matched by rating and by table
/// position, on either a tight or a moderately-loose band.
fn possible_draw(rating_gap: f64, rank_gap: u32) -> bool {
    (rating_gap < 0.2 && rank_gap < 4)
        || (rating_gap > 0.2 && rating_gap < 0.4 && rank_gap > 3 && rank_gap < 6)
}

/// Derive a prediction, or `None` when no rule fires.
///
/// Deterministic: same inputs, same answer. Rules are evaluated strictly
/// in order.
pub fn predict(
    drift: &DriftSummary,
    assessment: &AssessmentPair,
    rank_gap: u32,
    policy: &PredictionPolicy,
) -> Option<Outcome> {
    let home = assessment.home;
    let away = assessment.away;
    let rating_gap = (home.rating - away.rating).abs();

    // 1. Both sides fading but still close on rating: the market has
    //    over-punished the favorite playing at home.
    if home.trend == Trend::Downward
        && away.trend == Trend::Downward
        && rating_gap < policy.contrarian_rating_gap
    {
        return Some(Outcome::Home);
    }

    // 2. Away side surging into a fading home side.
    if away.trend == Trend::Upward
        && home.trend == Trend::Downward
        && rating_gap < policy.upset_rating_gap
    {
        return Some(Outcome::Away);
    }

    // 3. Draw: either both sides surging with the draw price collapsing
    //    and ratings tight, or the home side holding form with a negative
    //    draw drift and the structural draw condition met.
    let both_upward = home.trend == Trend::Upward && away.trend == Trend::Upward;
    if both_upward && drift.draw <= policy.strong_draw_drift && rating_gap < policy.draw_rating_gap
    {
        return Some(Outcome::Draw);
    }
    if home.trend != Trend::Downward && drift.draw < 0 && possible_draw(rating_gap, rank_gap) {
        return Some(Outcome::Draw);
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::FormAssessment;

    fn pair(
        home_trend: Trend,
        home_rating: f64,
        away_trend: Trend,
        away_rating: f64,
    ) -> AssessmentPair {
        AssessmentPair {
            home: FormAssessment { trend: home_trend, rating: home_rating },
            away: FormAssessment { trend: away_trend, rating: away_rating },
        }
    }

    fn drift(home: i32, draw: i32, away: i32) -> DriftSummary {
        DriftSummary { home, draw, away }
    }

    #[test]
    fn test_gate_requires_a_sharp_drop() {
        let policy = PredictionPolicy::default();
        assert!(policy.crosses_gate(&drift(-8, 0, 2)));
        assert!(policy.crosses_gate(&drift(1, -12, 3)));
        assert!(!policy.crosses_gate(&drift(-7, -3, 5)));
    }

    #[test]
    fn test_rule1_both_downward_close_ratings() {
        let policy = PredictionPolicy::default();
        let a = pair(Trend::Downward, 0.3, Trend::Downward, 0.1);
        assert_eq!(predict(&drift(-10, 0, 0), &a, 5, &policy), Some(Outcome::Home));
    }

    #[test]
    fn test_rule1_needs_tight_rating_gap() {
        let policy = PredictionPolicy::default();
        let a = pair(Trend::Downward, 0.9, Trend::Downward, 0.1);
        assert_eq!(predict(&drift(-10, 0, 0), &a, 5, &policy), None);
    }

    #[test]
    fn test_rule2_away_surge() {
        let policy = PredictionPolicy::default();
        let a = pair(Trend::Downward, 0.4, Trend::Upward, 0.5);
        assert_eq!(predict(&drift(0, 0, -10), &a, 8, &policy), Some(Outcome::Away));
    }

    #[test]
    fn test_rule2_wide_gap_blocks_upset() {
        let policy = PredictionPolicy::default();
        let a = pair(Trend::Downward, 0.8, Trend::Upward, 0.4);
        assert_eq!(predict(&drift(0, 0, -10), &a, 8, &policy), None);
    }

    #[test]
    fn test_rule_order_contrarian_wins_over_draw() {
        // Rule 1 matches before the draw rules can be considered.
        let policy = PredictionPolicy::default();
        let a = pair(Trend::Downward, 0.2, Trend::Downward, 0.15);
        assert_eq!(predict(&drift(-9, -12, 0), &a, 1, &policy), Some(Outcome::Home));
    }

    #[test]
    fn test_rule3_both_upward_draw_collapse() {
        let policy = PredictionPolicy::default();
        let a = pair(Trend::Upward, 0.6, Trend::Upward, 0.5);
        assert_eq!(predict(&drift(0, -12, 0), &a, 9, &policy), Some(Outcome::Draw));
    }

    #[test]
    fn test_rule3_structural_draw() {
        let policy = PredictionPolicy::default();
        let a = pair(Trend::Stable, 0.5, Trend::Stable, 0.45);
        assert_eq!(predict(&drift(-9, -2, 0), &a, 2, &policy), Some(Outcome::Draw));
    }

    #[test]
    fn test_rule3_structural_draw_loose_band() {
        // Moderate rating gap only draws with a moderate rank gap.
        let policy = PredictionPolicy::default();
        let a = pair(Trend::Stable, 0.8, Trend::Stable, 0.5);
        assert_eq!(predict(&drift(0, -3, 0), &a, 4, &policy), Some(Outcome::Draw));
        assert_eq!(predict(&drift(0, -3, 0), &a, 7, &policy), None);
    }

    #[test]
    fn test_rule3_needs_negative_draw_drift() {
        let policy = PredictionPolicy::default();
        let a = pair(Trend::Stable, 0.5, Trend::Stable, 0.45);
        assert_eq!(predict(&drift(-9, 0, 0), &a, 2, &policy), None);
    }

    #[test]
    fn test_downward_home_never_structural_draw() {
        let policy = PredictionPolicy::default();
        let a = pair(Trend::Downward, 0.5, Trend::Stable, 0.45);
        assert_eq!(predict(&drift(0, -5, 0), &a, 2, &policy), None);
    }

    #[test]
    fn test_no_rule_no_prediction() {
        let policy = PredictionPolicy::default();
        let a = pair(Trend::Upward, 1.2, Trend::Downward, 0.1);
        assert_eq!(predict(&drift(-15, 5, 5), &a, 12, &policy), None);
    }

    #[test]
    fn test_prediction_is_deterministic() {
        let policy = PredictionPolicy::default();
        let a = pair(Trend::Downward, 0.3, Trend::Downward, 0.1);
        let d = drift(-10, -1, 2);
        let first = predict(&d, &a, 3, &policy);
        for _ in 0..10 {
            assert_eq!(predict(&d, &a, 3, &policy), first);
        }
    }
}
