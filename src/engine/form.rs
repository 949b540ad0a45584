//! Team-form signals: a trend classification and a continuous rating.
//!
//! Both walk the recent-match history most-recent-first and weight newer
//! matches higher. The rating is a relative signal, not a probability;
//! only its sign and its distance from the opponent's rating matter.

use crate::model::{FormAssessment, FormEntry, MatchResult, TeamStanding, Trend};

/// Multiplier applied to the trend weight for each older match.
const TREND_DECAY: f64 = 0.8;
/// Weighted sum above which form counts as upward (strict), below the
/// negation of which it counts as downward.
const TREND_BAND: f64 = 0.5;

/// Starting recency weight for the points blend, decreasing linearly.
const POINTS_WEIGHT_START: f64 = 1.5;
const POINTS_WEIGHT_STEP: f64 = 0.2;
/// Maximum weighted points over a five-match window:
/// 3 x (1.5 + 1.3 + 1.1 + 0.9 + 0.7).
const POINTS_NORMALIZER: f64 = 16.5;

/// Home sides get a small fixed uplift.
const HOME_MULTIPLIER: f64 = 1.1;

/// Per-entry trend contribution: the base result value shifted by goal
/// difference, so a heavy defeat drags harder than a narrow one.
fn contribution(entry: &FormEntry) -> f64 {
    let gd = entry.goal_diff() as f64;
    match entry.result {
        MatchResult::W => 1.0 + gd / 5.0,
        MatchResult::D => gd / 5.0,
        MatchResult::L => -1.0 - (-gd) / 5.0,
    }
}

/// Recency-weighted sum of result contributions.
pub fn trend_score(form: &[FormEntry]) -> f64 {
    let mut weight = 1.0;
    let mut total = 0.0;
    for entry in form {
        total += weight * contribution(entry);
        weight *= TREND_DECAY;
    }
    total
}

/// Classify a weighted trend score. The band edges are exclusive: a score
/// of exactly 0.5 is still stable.
pub fn classify_trend(score: f64) -> Trend {
    if score > TREND_BAND {
        Trend::Upward
    } else if score < -TREND_BAND {
        Trend::Downward
    } else {
        Trend::Stable
    }
}

pub fn trend(form: &[FormEntry]) -> Trend {
    classify_trend(trend_score(form))
}

fn points(result: MatchResult) -> f64 {
    match result {
        MatchResult::W => 3.0,
        MatchResult::D => 1.0,
        MatchResult::L => 0.0,
    }
}

/// Blended form rating, roughly in [-1, 2].
///
/// Combines recency-weighted points, mean goal differential, table
/// position, the standing's raw goal difference, and the trend score,
/// with fixed blend weights; home sides are multiplied up once.
pub fn rating(standing: &TeamStanding, total_teams: u32, is_home: bool) -> f64 {
    if standing.form.is_empty() || total_teams == 0 {
        return 0.0;
    }

    let mut weighted_points = 0.0;
    for (i, entry) in standing.form.iter().enumerate() {
        let weight = (POINTS_WEIGHT_START - POINTS_WEIGHT_STEP * i as f64).max(0.0);
        weighted_points += points(entry.result) * weight;
    }
    let points_factor = weighted_points / POINTS_NORMALIZER;

    let avg_goal_diff = standing
        .form
        .iter()
        .map(|e| e.goal_diff() as f64)
        .sum::<f64>()
        / standing.form.len() as f64;

    let position_factor = 1.0 - standing.rank as f64 / total_teams as f64;
    let goal_diff_factor = standing.goal_difference as f64 / 10.0;
    let trend_factor = trend_score(&standing.form);

    let blended = 0.4 * points_factor
        + 0.2 * avg_goal_diff
        + 0.2 * position_factor
        + 0.1 * goal_diff_factor
        + 0.1 * trend_factor;

    if is_home {
        blended * HOME_MULTIPLIER
    } else {
        blended
    }
}

/// Trend + rating in one pass, as stored on a candidate.
pub fn assess(standing: &TeamStanding, total_teams: u32, is_home: bool) -> FormAssessment {
    FormAssessment {
        trend: trend(&standing.form),
        rating: rating(standing, total_teams, is_home),
    }
}
