//! Odds-drift aggregation.
//!
//! The odds-movement page renders one row per bookmaker, each cell titled
//! with an opening and closing price ("1.50 » 1.30"). A row's drift is the
//! percent change between the two; the fixture-level figure is the mean of
//! valid rows, rounded to whole percentage points. Unparseable cells are
//! absent, not zero, so they never dilute the average.

use crate::model::DriftSummary;

/// An opening/closing price pair for one outcome on one bookmaker row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OddsObservation {
    pub opening: f64,
    pub closing: f64,
}

/// One bookmaker row: raw movement strings per outcome, as scraped.
/// A missing cell means the bookmaker never listed that outcome.
#[derive(Debug, Clone, Default)]
pub struct MovementRow {
    pub home: Option<String>,
    pub draw: Option<String>,
    pub away: Option<String>,
}

/// Parse a movement title like `"1.50 » 1.30"` into an observation.
/// Returns `None` for anything that is not two parseable prices.
pub fn parse_observation(title: &str) -> Option<OddsObservation> {
    let (open, close) = title.split_once('»')?;
    let opening: f64 = open.trim().parse().ok()?;
    let closing: f64 = close.trim().parse().ok()?;
    if !opening.is_finite() || !closing.is_finite() || opening <= 0.0 {
        return None;
    }
    Some(OddsObservation { opening, closing })
}

/// Percent drift of one observation, signed (a shortening price is negative).
pub fn observation_drift(obs: OddsObservation) -> f64 {
    (obs.closing - obs.opening) / obs.opening * 100.0
}

/// Mean of the valid per-row drifts, rounded to the nearest integer
/// percentage point. `None` when no row parsed: an outcome with no signal
/// excludes the fixture from scoring rather than scoring as zero.
pub fn aggregate(cells: &[Option<String>]) -> Option<i32> {
    let drifts: Vec<f64> = cells
        .iter()
        .filter_map(|cell| cell.as_deref())
        .filter_map(parse_observation)
        .map(observation_drift)
        .collect();
    if drifts.is_empty() {
        return None;
    }
    let mean = drifts.iter().sum::<f64>() / drifts.len() as f64;
    Some(mean.round() as i32)
}

/// Reduce a fixture's bookmaker rows to one `DriftSummary`.
///
/// Each outcome column aggregates independently; if any column has zero
/// valid rows the whole fixture is unsummarizable for this run.
pub fn summarize(rows: &[MovementRow]) -> Option<DriftSummary> {
    let column = |pick: fn(&MovementRow) -> &Option<String>| -> Vec<Option<String>> {
        rows.iter().map(|r| pick(r).clone()).collect()
    };
    let home = aggregate(&column(|r| &r.home))?;
    let draw = aggregate(&column(|r| &r.draw))?;
    let away = aggregate(&column(|r| &r.away))?;
    Some(DriftSummary { home, draw, away })
}
