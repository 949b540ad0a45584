//! Flashscore fixtures via a page-render gateway.
//!
//! Flashscore pages are script-rendered, so a headless render gateway does
//! the DOM evaluation and hands back the extracted cells as JSON. This
//! module only speaks HTTP/JSON to that gateway; selector changes never
//! touch the pipeline.
//!
//! Routes, relative to the gateway base:
//!   /league/{league}/fixtures        scheduled matches for one league page
//!   {match_url}/odds                 1X2 prices + per-bookmaker movement
//!   {match_url}/standings?home=&away=  table rows + form for both sides
//!   {match_url}/summary              status and final score

use async_trait::async_trait;
use rand::seq::SliceRandom;
use reqwest::Client;
use std::time::Duration;

use super::types::*;
use super::FixtureSource;
use crate::error::SourceError;
use crate::model::{FormEntry, MatchResult, StandingsPair, TeamStanding};

/// Rotated per request; scrape traffic from one static agent gets binned.
const USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/88.0.4324.104 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/14.0.1 Safari/605.1.15",
    "Mozilla/5.0 (iPhone; CPU iPhone OS 14_4 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/14.0.3 Mobile/15E148 Safari/604.1",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/88.0.705.63 Safari/537.36 Edg/88.0.705.6",
];

pub struct FlashscoreSource {
    client: Client,
    base_url: String,
}

impl FlashscoreSource {
    pub fn new(base_url: &str, request_timeout_ms: u64) -> Result<Self, SourceError> {
        let client = Client::builder()
            .timeout(Duration::from_millis(request_timeout_ms))
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn user_agent() -> &'static str {
        USER_AGENTS
            .choose(&mut rand::thread_rng())
            .copied()
            .unwrap_or(USER_AGENTS[0])
    }

    async fn get_json(&self, url: &str) -> Result<String, SourceError> {
        let resp = self
            .client
            .get(url)
            .header(reqwest::header::USER_AGENT, Self::user_agent())
            .send()
            .await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(SourceError::Unavailable(format!("{url} returned {status}")));
        }
        Ok(resp.text().await?)
    }
}

// ── Parsing (public for unit tests against fixture strings) ──────────

pub fn parse_fixture_list(
    json: &str,
    league: &str,
    base_url: &str,
) -> Result<Vec<FixtureInfo>, SourceError> {
    let list: GwFixtureList = serde_json::from_str(json)
        .map_err(|e| SourceError::Malformed(format!("fixture list: {e}")))?;

    // League paths look like "england/premier-league"; the country is the
    // first segment.
    let country = league.split('/').next().unwrap_or(league).to_string();

    Ok(list
        .matches
        .into_iter()
        .filter(|m| !m.id.is_empty() && !m.team_home.is_empty() && !m.team_away.is_empty())
        .map(|m| FixtureInfo {
            url: format!("{}/match/{}", base_url, m.id),
            id: m.id,
            country: country.clone(),
            team_home: m.team_home,
            team_away: m.team_away,
            kickoff_time: m.kickoff,
        })
        .collect())
}

pub fn parse_odds_page(json: &str) -> Result<OddsPage, SourceError> {
    let page: GwOddsPage = serde_json::from_str(json)
        .map_err(|e| SourceError::Malformed(format!("odds page: {e}")))?;
    let closing = parse_odds_cells(&page.odds)
        .ok_or_else(|| SourceError::Malformed("odds cells not numeric".to_string()))?;
    Ok(OddsPage {
        closing,
        movement: page.movement.into_iter().map(Into::into).collect(),
    })
}

fn standing_row(row: GwStandingRow) -> TeamStanding {
    let form = row
        .form
        .into_iter()
        .filter_map(|cell| {
            let result = match cell.result.as_str() {
                "W" => MatchResult::W,
                "D" => MatchResult::D,
                "L" => MatchResult::L,
                _ => return None,
            };
            Some((result, cell.goals_for, cell.goals_against))
        })
        .enumerate()
        .map(|(i, (result, goals_for, goals_against))| FormEntry {
            result,
            goals_for,
            goals_against,
            sequence_index: i,
        })
        .collect();
    TeamStanding {
        rank: row.rank,
        points: row.points,
        goal_difference: row.goal_difference,
        form,
    }
}

pub fn parse_standings(json: &str) -> Result<StandingsPair, SourceError> {
    let page: GwStandings = serde_json::from_str(json)
        .map_err(|e| SourceError::Malformed(format!("standings: {e}")))?;
    if page.total_teams == 0 {
        return Err(SourceError::Malformed("standings: zero teams".to_string()));
    }
    Ok(StandingsPair {
        home: standing_row(page.home),
        away: standing_row(page.away),
        total_teams: page.total_teams,
    })
}

pub fn parse_final_score(json: &str) -> Result<Option<String>, SourceError> {
    let summary: GwMatchSummary = serde_json::from_str(json)
        .map_err(|e| SourceError::Malformed(format!("match summary: {e}")))?;
    if summary.status == "finished" {
        Ok(summary.score)
    } else {
        Ok(None)
    }
}

#[async_trait]
impl FixtureSource for FlashscoreSource {
    async fn list_fixtures(&self, league: &str) -> Result<Vec<FixtureInfo>, SourceError> {
        let url = format!("{}/league/{}/fixtures", self.base_url, league);
        let body = self.get_json(&url).await?;
        parse_fixture_list(&body, league, &self.base_url)
    }

    async fn fetch_odds(&self, fixture_url: &str) -> Result<OddsPage, SourceError> {
        let body = self.get_json(&format!("{fixture_url}/odds")).await?;
        parse_odds_page(&body)
    }

    async fn fetch_standings(
        &self,
        fixture_url: &str,
        team_home: &str,
        team_away: &str,
    ) -> Result<StandingsPair, SourceError> {
        let url = format!("{fixture_url}/standings?home={team_home}&away={team_away}");
        let body = self.get_json(&url).await?;
        parse_standings(&body)
    }

    async fn fetch_final_score(&self, fixture_url: &str) -> Result<Option<String>, SourceError> {
        let body = self.get_json(&format!("{fixture_url}/summary")).await?;
        parse_final_score(&body)
    }
}
