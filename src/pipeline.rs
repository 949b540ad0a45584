//! The scan pipeline: league discovery -> odds floor -> drift gate ->
//! standings -> form signals -> prediction.
//!
//! One fixture at a time through one shared source session; ordering is
//! discovery order and fully deterministic. Per-fixture failures are
//! logged and skipped -- a bad fixture never sinks the batch.

use tracing::{debug, info, warn};

use crate::engine::{drift, form, prediction, PredictionPolicy};
use crate::error::SourceError;
use crate::feed::types::FixtureInfo;
use crate::feed::FixtureSource;
use crate::model::{AssessmentPair, FixtureCandidate};

/// Form signals need at least this many recent matches per team.
const MIN_FORM_LENGTH: usize = 4;

pub struct ScanPipeline<'a> {
    source: &'a dyn FixtureSource,
    policy: &'a PredictionPolicy,
    /// Home and away closing odds must both be at least this. Short-priced
    /// favourites leave no room for the contrarian rules to pay.
    min_odds: f64,
}

impl<'a> ScanPipeline<'a> {
    pub fn new(source: &'a dyn FixtureSource, policy: &'a PredictionPolicy, min_odds: f64) -> Self {
        Self { source, policy, min_odds }
    }

    /// Scan every league in scope and return the day's accepted candidates
    /// (drift-gated, with standings and form attached; prediction may
    /// still be absent when no rule fired).
    pub async fn scan(&self, leagues: &[String]) -> Vec<FixtureCandidate> {
        let mut candidates = Vec::new();

        for league in leagues {
            let fixtures = match self.source.list_fixtures(league).await {
                Ok(fixtures) => fixtures,
                Err(e) => {
                    warn!(league, error = %e, "league listing failed, skipping");
                    continue;
                }
            };
            info!(league, fixtures = fixtures.len(), "league listed");

            for (i, fixture) in fixtures.iter().enumerate() {
                debug!(
                    league,
                    id = %fixture.id,
                    n = i + 1,
                    of = fixtures.len(),
                    "evaluating fixture"
                );
                match self.evaluate(fixture).await {
                    Ok(Some(candidate)) => candidates.push(candidate),
                    Ok(None) => {}
                    Err(e) => warn!(id = %fixture.id, error = %e, "fixture skipped"),
                }
            }
        }

        let predicted = candidates.iter().filter(|c| c.prediction.is_some()).count();
        info!(candidates = candidates.len(), predicted, "scan complete");
        candidates
    }

    async fn evaluate(
        &self,
        fixture: &FixtureInfo,
    ) -> Result<Option<FixtureCandidate>, SourceError> {
        let odds_page = self.source.fetch_odds(&fixture.url).await?;
        let closing = odds_page.closing;

        if closing.home < self.min_odds || closing.away < self.min_odds {
            debug!(id = %fixture.id, "below odds floor");
            return Ok(None);
        }

        let Some(drift_summary) = drift::summarize(&odds_page.movement) else {
            debug!(id = %fixture.id, "no usable movement rows");
            return Ok(None);
        };
        if !self.policy.crosses_gate(&drift_summary) {
            debug!(id = %fixture.id, ?drift_summary, "drift below gate");
            return Ok(None);
        }

        let standings = self
            .source
            .fetch_standings(&fixture.url, &fixture.team_home, &fixture.team_away)
            .await?;
        if standings.home.form.len() < MIN_FORM_LENGTH
            || standings.away.form.len() < MIN_FORM_LENGTH
        {
            debug!(id = %fixture.id, "form history too short");
            return Ok(None);
        }

        let assessment = AssessmentPair {
            home: form::assess(&standings.home, standings.total_teams, true),
            away: form::assess(&standings.away, standings.total_teams, false),
        };
        let rank_gap = standings.home.rank.abs_diff(standings.away.rank);
        let predicted = prediction::predict(&drift_summary, &assessment, rank_gap, self.policy);

        if let Some(outcome) = predicted {
            info!(
                id = %fixture.id,
                home = %fixture.team_home,
                away = %fixture.team_away,
                ?drift_summary,
                prediction = %outcome,
                "prediction recorded"
            );
        }

        Ok(Some(FixtureCandidate {
            id: fixture.id.clone(),
            country: fixture.country.clone(),
            team_home: fixture.team_home.clone(),
            team_away: fixture.team_away.clone(),
            kickoff_time: fixture.kickoff_time.clone(),
            fixture_url: fixture.url.clone(),
            initial_odds: closing,
            drift: drift_summary,
            standings,
            assessment,
            prediction: predicted,
            settlement: None,
        }))
    }
}
