pub mod flashscore;
pub mod types;

use async_trait::async_trait;

use crate::error::SourceError;
use crate::model::StandingsPair;
use types::{FixtureInfo, OddsPage};

/// The narrow capability the pipeline consumes: list fixtures for a league,
/// pull odds movement and standings for one fixture, and later its final
/// score. Every call may fail; callers treat failure as "unavailable now",
/// never as fatal to the batch.
#[async_trait]
pub trait FixtureSource: Send + Sync {
    async fn list_fixtures(&self, league: &str) -> Result<Vec<FixtureInfo>, SourceError>;
    async fn fetch_odds(&self, fixture_url: &str) -> Result<OddsPage, SourceError>;
    async fn fetch_standings(
        &self,
        fixture_url: &str,
        team_home: &str,
        team_away: &str,
    ) -> Result<StandingsPair, SourceError>;
    /// `None` while the match has not finished.
    async fn fetch_final_score(&self, fixture_url: &str) -> Result<Option<String>, SourceError>;
}
