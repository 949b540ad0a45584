use serde::Deserialize;

use crate::engine::drift::MovementRow;
use crate::model::OddsTriple;

/// Normalized records handed to the pipeline (gateway-agnostic).

/// A scheduled fixture as listed for one league.
#[derive(Debug, Clone)]
pub struct FixtureInfo {
    /// Source-assigned match id, stable across runs.
    pub id: String,
    pub country: String,
    pub team_home: String,
    pub team_away: String,
    /// Listed kickoff time, "HH:MM".
    pub kickoff_time: String,
    pub url: String,
}

/// Everything the odds-movement page yields for one fixture.
#[derive(Debug, Clone)]
pub struct OddsPage {
    /// Current (closing) 1X2 prices.
    pub closing: OddsTriple,
    /// One row per bookmaker, raw movement strings per outcome.
    pub movement: Vec<MovementRow>,
}

// ── Gateway JSON response types ──────────────────────────────────────

/// Fixture list for one league page.
#[derive(Debug, Deserialize)]
pub struct GwFixtureList {
    #[serde(default)]
    pub matches: Vec<GwFixture>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GwFixture {
    pub id: String,
    #[serde(default)]
    pub team_home: String,
    #[serde(default)]
    pub team_away: String,
    /// "HH:MM" as rendered in the schedule column.
    #[serde(default)]
    pub kickoff: String,
}

/// Odds-comparison page: current prices plus per-bookmaker movement.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GwOddsPage {
    pub odds: GwOddsCells,
    #[serde(default)]
    pub movement: Vec<GwMovementRow>,
}

/// Raw cell text for the three 1X2 prices ("-" when not offered).
#[derive(Debug, Deserialize, Default)]
pub struct GwOddsCells {
    #[serde(default)]
    pub home: String,
    #[serde(default)]
    pub draw: String,
    #[serde(default)]
    pub away: String,
}

/// One bookmaker row; each cell carries the movement title string
/// ("1.50 » 1.30") or nothing when the bookmaker skipped the outcome.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GwMovementRow {
    #[serde(default)]
    pub bookmaker: String,
    pub home: Option<String>,
    pub draw: Option<String>,
    pub away: Option<String>,
}

impl From<GwMovementRow> for MovementRow {
    fn from(row: GwMovementRow) -> Self {
        MovementRow { home: row.home, draw: row.draw, away: row.away }
    }
}

/// Standings page filtered to the two sides of a fixture.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GwStandings {
    pub home: GwStandingRow,
    pub away: GwStandingRow,
    pub total_teams: u32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GwStandingRow {
    pub rank: u32,
    #[serde(default)]
    pub points: u32,
    #[serde(default)]
    pub goal_difference: i32,
    /// Most-recent-first form strip.
    #[serde(default)]
    pub form: Vec<GwFormCell>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GwFormCell {
    /// "W", "D" or "L".
    pub result: String,
    #[serde(default)]
    pub goals_for: i32,
    #[serde(default)]
    pub goals_against: i32,
}

/// Match summary page; `score` is present once the match finished.
#[derive(Debug, Deserialize)]
pub struct GwMatchSummary {
    #[serde(default)]
    pub status: String,
    pub score: Option<String>,
}

/// The allowed `OddsTriple` parse: every cell must be a positive price.
pub fn parse_odds_cells(cells: &GwOddsCells) -> Option<OddsTriple> {
    let parse = |s: &str| -> Option<f64> {
        let v: f64 = s.trim().parse().ok()?;
        (v.is_finite() && v > 0.0).then_some(v)
    };
    Some(OddsTriple {
        home: parse(&cells.home)?,
        draw: parse(&cells.draw)?,
        away: parse(&cells.away)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_odds_cells() {
        let cells = GwOddsCells {
            home: "2.10".into(),
            draw: "3.40".into(),
            away: "3.10".into(),
        };
        let odds = parse_odds_cells(&cells).unwrap();
        assert_eq!(odds.home, 2.10);
        assert_eq!(odds.away, 3.10);
    }

    #[test]
    fn test_parse_odds_cells_dash_is_absent() {
        let cells = GwOddsCells {
            home: "2.10".into(),
            draw: "-".into(),
            away: "3.10".into(),
        };
        assert!(parse_odds_cells(&cells).is_none());
    }
}
