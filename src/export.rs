//! Flat CSV of every settled candidate across all day files, one row per
//! fixture, for offline analysis of how the rule table is doing.

use anyhow::{Context, Result};
use std::path::Path;

use crate::model::{FixtureCandidate, Trend, Verdict};
use crate::store::CandidateStore;

const HEADER: &str = "home_drift,draw_drift,away_drift,url,prediction,\
home_trend,away_trend,home_rating,away_rating,score_type,verdict\n";

fn trend_label(trend: Trend) -> &'static str {
    match trend {
        Trend::Upward => "upward",
        Trend::Downward => "downward",
        Trend::Stable => "stable",
    }
}

fn row(candidate: &FixtureCandidate) -> Option<String> {
    let settlement = candidate.settlement.as_ref()?;
    let prediction = candidate
        .prediction
        .map(|p| p.to_string())
        .unwrap_or_default();
    let verdict = match settlement.verdict {
        Verdict::Win => "win",
        Verdict::Lose => "lose",
    };
    Some(format!(
        "{},{},{},\"{}\",{},{},{},{:.3},{:.3},{},{}\n",
        candidate.drift.home,
        candidate.drift.draw,
        candidate.drift.away,
        candidate.fixture_url,
        prediction,
        trend_label(candidate.assessment.home.trend),
        trend_label(candidate.assessment.away.trend),
        candidate.assessment.home.rating,
        candidate.assessment.away.rating,
        settlement.outcome_type,
        verdict,
    ))
}

/// Render rows for one day's candidates; unsettled fixtures are skipped.
pub fn summary_rows(candidates: &[FixtureCandidate]) -> String {
    candidates.iter().filter_map(row).collect()
}

/// Write the full summary sheet. Returns the number of rows written.
pub fn write_summary_csv(store: &CandidateStore, path: &Path) -> Result<usize> {
    let mut body = String::from(HEADER);
    let mut rows = 0;
    for day in store.list_days()? {
        let day_rows = summary_rows(&store.load_day(day)?);
        rows += day_rows.lines().count();
        body.push_str(&day_rows);
    }
    std::fs::write(path, body)
        .with_context(|| format!("writing summary csv to {}", path.display()))?;
    Ok(rows)
}
