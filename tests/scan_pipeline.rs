//! Integration tests for the scan pipeline against a deterministic source:
//! odds floor, drift gate, form requirements, and per-league failure
//! tolerance.

mod common;

use common::{fixture_info, fixture_url, losing_form, movement_row, odds_page, standing, FakeSource};
use driftwatch::engine::PredictionPolicy;
use driftwatch::model::{FormEntry, MatchResult, OddsTriple, Outcome, StandingsPair};
use driftwatch::pipeline::ScanPipeline;
use driftwatch::store::CandidateStore;

const LEAGUE: &str = "england/premier-league";

fn playable_odds() -> OddsTriple {
    OddsTriple { home: 2.10, draw: 3.40, away: 3.10 }
}

/// A source with one fixture whose home price collapsed and whose teams
/// are both on losing runs -- the contrarian home rule fires.
fn source_with_drifting_fixture(id: &str) -> FakeSource {
    let mut source = FakeSource::default();
    source.fixtures.insert(LEAGUE.to_string(), vec![fixture_info(id, LEAGUE)]);
    source.odds.insert(
        fixture_url(id),
        odds_page(
            playable_odds(),
            vec![
                movement_row("2.30 » 2.10", "3.40 » 3.40", "3.10 » 3.10"),
                movement_row("2.40 » 2.15", "3.50 » 3.45", "3.00 » 3.20"),
            ],
        ),
    );
    source.standings.insert(
        fixture_url(id),
        StandingsPair {
            home: standing(4, losing_form()),
            away: standing(6, losing_form()),
            total_teams: 20,
        },
    );
    source
}

#[tokio::test]
async fn test_scan_records_contrarian_home_pick() {
    let source = source_with_drifting_fixture("a");
    let policy = PredictionPolicy::default();
    let pipeline = ScanPipeline::new(&source, &policy, 2.0);

    let candidates = pipeline.scan(&[LEAGUE.to_string()]).await;
    assert_eq!(candidates.len(), 1);

    let candidate = &candidates[0];
    assert_eq!(candidate.id, "a");
    assert_eq!(candidate.country, "england");
    assert!(candidate.drift.home <= -8, "got {}", candidate.drift.home);
    assert_eq!(candidate.prediction, Some(Outcome::Home));
    assert!(candidate.settlement.is_none());
}

#[tokio::test]
async fn test_scan_then_upsert_roundtrips() {
    let source = source_with_drifting_fixture("a");
    let policy = PredictionPolicy::default();
    let pipeline = ScanPipeline::new(&source, &policy, 2.0);
    let candidates = pipeline.scan(&[LEAGUE.to_string()]).await;

    let dir = tempfile::tempdir().unwrap();
    let store = CandidateStore::new(dir.path());
    let today = chrono::NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
    assert_eq!(store.upsert_day(today, candidates.clone()).unwrap(), 1);
    // Re-running the same scan adds nothing.
    assert_eq!(store.upsert_day(today, candidates).unwrap(), 0);

    let stored = store.load_day(today).unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].prediction, Some(Outcome::Home));
}

#[tokio::test]
async fn test_weak_drift_is_not_scored() {
    let mut source = source_with_drifting_fixture("a");
    source.odds.insert(
        fixture_url("a"),
        odds_page(
            playable_odds(),
            vec![movement_row("2.20 » 2.10", "3.40 » 3.40", "3.10 » 3.10")],
        ),
    );
    let policy = PredictionPolicy::default();
    let pipeline = ScanPipeline::new(&source, &policy, 2.0);
    assert!(pipeline.scan(&[LEAGUE.to_string()]).await.is_empty());
}

#[tokio::test]
async fn test_short_priced_fixture_is_filtered() {
    let mut source = source_with_drifting_fixture("a");
    source.odds.insert(
        fixture_url("a"),
        odds_page(
            OddsTriple { home: 1.45, draw: 4.20, away: 6.80 },
            vec![movement_row("1.60 » 1.45", "4.20 » 4.20", "6.80 » 6.80")],
        ),
    );
    let policy = PredictionPolicy::default();
    let pipeline = ScanPipeline::new(&source, &policy, 2.0);
    assert!(pipeline.scan(&[LEAGUE.to_string()]).await.is_empty());
}

#[tokio::test]
async fn test_thin_form_history_is_not_scored() {
    let mut source = source_with_drifting_fixture("a");
    let thin: Vec<FormEntry> = (0..3)
        .map(|i| FormEntry {
            result: MatchResult::L,
            goals_for: 0,
            goals_against: 1,
            sequence_index: i,
        })
        .collect();
    source.standings.insert(
        fixture_url("a"),
        StandingsPair {
            home: standing(4, thin.clone()),
            away: standing(6, thin),
            total_teams: 20,
        },
    );
    let policy = PredictionPolicy::default();
    let pipeline = ScanPipeline::new(&source, &policy, 2.0);
    assert!(pipeline.scan(&[LEAGUE.to_string()]).await.is_empty());
}

#[tokio::test]
async fn test_failed_league_does_not_sink_the_batch() {
    let source = source_with_drifting_fixture("a");
    let policy = PredictionPolicy::default();
    let pipeline = ScanPipeline::new(&source, &policy, 2.0);

    // The unknown league errors; the known one still produces its candidate.
    let leagues = vec!["spain/laliga".to_string(), LEAGUE.to_string()];
    let candidates = pipeline.scan(&leagues).await;
    assert_eq!(candidates.len(), 1);
    assert_eq!(candidates[0].id, "a");
}

#[tokio::test]
async fn test_failed_standings_skips_fixture_only() {
    let mut source = source_with_drifting_fixture("a");
    source.standings.clear();
    let policy = PredictionPolicy::default();
    let pipeline = ScanPipeline::new(&source, &policy, 2.0);
    assert!(pipeline.scan(&[LEAGUE.to_string()]).await.is_empty());
}
