//! Deterministic in-memory fixture source and record builders shared by
//! the integration tests.

// Each test binary compiles its own copy; not every helper is used in both.
#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};

use driftwatch::engine::drift::MovementRow;
use driftwatch::error::SourceError;
use driftwatch::feed::types::{FixtureInfo, OddsPage};
use driftwatch::feed::FixtureSource;
use driftwatch::model::{
    AssessmentPair, DriftSummary, FixtureCandidate, FormAssessment, FormEntry, MatchResult,
    OddsTriple, Outcome, StandingsPair, TeamStanding, Trend,
};

/// Canned responses keyed the way the real gateway is keyed.
#[derive(Default)]
pub struct FakeSource {
    pub fixtures: HashMap<String, Vec<FixtureInfo>>,
    pub odds: HashMap<String, OddsPage>,
    pub standings: HashMap<String, StandingsPair>,
    pub scores: HashMap<String, Option<String>>,
    /// Urls whose score fetch fails with a network error.
    pub failing_scores: HashSet<String>,
}

#[async_trait]
impl FixtureSource for FakeSource {
    async fn list_fixtures(&self, league: &str) -> Result<Vec<FixtureInfo>, SourceError> {
        self.fixtures
            .get(league)
            .cloned()
            .ok_or_else(|| SourceError::Unavailable(format!("league {league} down")))
    }

    async fn fetch_odds(&self, fixture_url: &str) -> Result<OddsPage, SourceError> {
        self.odds
            .get(fixture_url)
            .cloned()
            .ok_or_else(|| SourceError::Unavailable(format!("odds {fixture_url} down")))
    }

    async fn fetch_standings(
        &self,
        fixture_url: &str,
        _team_home: &str,
        _team_away: &str,
    ) -> Result<StandingsPair, SourceError> {
        self.standings
            .get(fixture_url)
            .cloned()
            .ok_or_else(|| SourceError::Unavailable(format!("standings {fixture_url} down")))
    }

    async fn fetch_final_score(&self, fixture_url: &str) -> Result<Option<String>, SourceError> {
        if self.failing_scores.contains(fixture_url) {
            return Err(SourceError::Unavailable(format!("score {fixture_url} down")));
        }
        self.scores
            .get(fixture_url)
            .cloned()
            .ok_or_else(|| SourceError::Unavailable(format!("score {fixture_url} down")))
    }
}

pub fn fixture_url(id: &str) -> String {
    format!("https://gw.local/match/{id}")
}

pub fn fixture_info(id: &str, league: &str) -> FixtureInfo {
    FixtureInfo {
        id: id.to_string(),
        country: league.split('/').next().unwrap_or(league).to_string(),
        team_home: format!("{id} Home"),
        team_away: format!("{id} Away"),
        kickoff_time: "17:30".to_string(),
        url: fixture_url(id),
    }
}

/// A losing streak long enough to classify as downward.
pub fn losing_form() -> Vec<FormEntry> {
    (0..5)
        .map(|i| FormEntry {
            result: MatchResult::L,
            goals_for: 0,
            goals_against: 2,
            sequence_index: i,
        })
        .collect()
}

pub fn standing(rank: u32, form: Vec<FormEntry>) -> TeamStanding {
    TeamStanding { rank, points: 20, goal_difference: 0, form }
}

/// A movement row where every outcome carries the same drop.
pub fn movement_row(home: &str, draw: &str, away: &str) -> MovementRow {
    MovementRow {
        home: Some(home.to_string()),
        draw: Some(draw.to_string()),
        away: Some(away.to_string()),
    }
}

pub fn odds_page(closing: OddsTriple, movement: Vec<MovementRow>) -> OddsPage {
    OddsPage { closing, movement }
}

/// A stored candidate as the scan would have recorded it.
pub fn candidate(id: &str, prediction: Option<Outcome>, odds: OddsTriple) -> FixtureCandidate {
    FixtureCandidate {
        id: id.to_string(),
        country: "england".to_string(),
        team_home: format!("{id} Home"),
        team_away: format!("{id} Away"),
        kickoff_time: "17:30".to_string(),
        fixture_url: fixture_url(id),
        initial_odds: odds,
        drift: DriftSummary { home: -12, draw: 0, away: 3 },
        standings: StandingsPair {
            home: standing(4, losing_form()),
            away: standing(6, losing_form()),
            total_teams: 20,
        },
        assessment: AssessmentPair {
            home: FormAssessment { trend: Trend::Downward, rating: 0.2 },
            away: FormAssessment { trend: Trend::Downward, rating: 0.1 },
        },
        prediction,
        settlement: None,
    }
}
