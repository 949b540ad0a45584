//! Day-by-day settlement of recorded predictions.
//!
//! One pass per run: Idle -> CheckingBacklog -> Settling(day) ->
//! Persisting -> Idle, looping Settling/Persisting until the backlog of
//! unchecked days is drained. The checkpoint is the last durable act for
//! each day, so a crash at any earlier point re-runs that day from the
//! top; day writes are merge-safe and the ledger append is guarded by
//! date, which makes the re-run harmless.
//!
//! Per-fixture score fetches are best-effort. A fixture that cannot be
//! settled is logged and left behind; once the checkpoint passes its day
//! it is permanently out of scope (accepted loss, bounded to one day).

use chrono::NaiveDate;
use tracing::{debug, info, warn};

use crate::engine::form;
use crate::feed::FixtureSource;
use crate::model::{DayLedgerEntry, Outcome, SettlementResult, Verdict};
use crate::store::ledger::DayTally;
use crate::store::{CandidateStore, CheckpointStore, LedgerStore};

/// What one settled day looked like, for logging and notification.
#[derive(Debug, Clone)]
pub struct DaySettlement {
    pub date: NaiveDate,
    /// Appended ledger entry; `None` when nothing settled or the date was
    /// already in the ledger.
    pub ledger_entry: Option<DayLedgerEntry>,
    /// Predicted fixtures still lacking a result after this pass.
    pub unsettled: u32,
}

pub struct SettlementEngine<'a> {
    source: &'a dyn FixtureSource,
    candidates: &'a CandidateStore,
    checkpoint: &'a CheckpointStore,
    ledger: &'a LedgerStore,
}

/// Parse a reported final score ("2-1", "2:1", "2 - 1") into goal counts.
pub fn parse_score(text: &str) -> Option<(u32, u32)> {
    let (home, away) = text.split_once(['-', ':'])?;
    Some((home.trim().parse().ok()?, away.trim().parse().ok()?))
}

impl<'a> SettlementEngine<'a> {
    pub fn new(
        source: &'a dyn FixtureSource,
        candidates: &'a CandidateStore,
        checkpoint: &'a CheckpointStore,
        ledger: &'a LedgerStore,
    ) -> Self {
        Self { source, candidates, checkpoint, ledger }
    }

    /// Settle every unchecked day strictly before `today`, oldest first,
    /// advancing the checkpoint after each day persists.
    ///
    /// Store failures abort the run; the next invocation resumes from the
    /// last durable checkpoint.
    pub async fn run(&self, today: NaiveDate) -> anyhow::Result<Vec<DaySettlement>> {
        let yesterday = today.pred_opt().expect("calendar underflow");

        // A missing checkpoint means a fresh deployment: start counting
        // from yesterday so the first run never walks into deep history.
        let first_unsettled = match self.checkpoint.load()? {
            Some(cp) => cp.last_settled_date.succ_opt().expect("calendar overflow"),
            None => today,
        };

        let mut settled = Vec::new();
        let mut day = first_unsettled;
        while day <= yesterday {
            let summary = self.settle_day(day, false).await?;
            self.checkpoint.advance(day)?;
            if summary.unsettled > 0 {
                warn!(
                    date = %day,
                    unsettled = summary.unsettled,
                    "checkpoint advanced past fixtures without results"
                );
            }
            settled.push(summary);
            day = day.succ_opt().expect("calendar overflow");
        }

        if settled.is_empty() {
            debug!(%today, "no settlement backlog");
        }
        Ok(settled)
    }

    /// Settle one day's candidates and fold the tally into the ledger.
    /// With `recheck`, fixtures already bearing a result are re-fetched
    /// and re-classified (out-of-band correction path); the ledger still
    /// refuses duplicate dates.
    pub async fn settle_day(
        &self,
        day: NaiveDate,
        recheck: bool,
    ) -> anyhow::Result<DaySettlement> {
        let mut candidates = self.candidates.load_day(day)?;
        let predicted = candidates.iter().filter(|c| c.prediction.is_some()).count();
        info!(date = %day, fixtures = candidates.len(), predicted, "settling day");

        if candidates.is_empty() {
            return Ok(DaySettlement { date: day, ledger_entry: None, unsettled: 0 });
        }

        for candidate in candidates.iter_mut() {
            let Some(prediction) = candidate.prediction else {
                continue;
            };
            if candidate.settlement.is_some() && !recheck {
                continue;
            }

            let score_text = match self.source.fetch_final_score(&candidate.fixture_url).await {
                Ok(Some(text)) => text,
                Ok(None) => {
                    warn!(id = %candidate.id, "no final score yet, leaving unsettled");
                    continue;
                }
                Err(e) => {
                    warn!(id = %candidate.id, error = %e, "score fetch failed, leaving unsettled");
                    continue;
                }
            };

            let Some((home_goals, away_goals)) = parse_score(&score_text) else {
                warn!(id = %candidate.id, score = %score_text, "unparseable score, leaving unsettled");
                continue;
            };

            let outcome = Outcome::from_score(home_goals, away_goals);
            let verdict = if outcome == prediction { Verdict::Win } else { Verdict::Lose };
            let profit = match verdict {
                Verdict::Win => candidate.initial_odds.for_outcome(outcome) - 1.0,
                Verdict::Lose => -1.0,
            };

            // Recompute form signals from the stored standings so drifted
            // ratings show up next to the original call in the logs. The
            // recorded prediction is never touched.
            let total = candidate.standings.total_teams;
            let home_now = form::assess(&candidate.standings.home, total, true);
            let away_now = form::assess(&candidate.standings.away, total, false);
            debug!(
                id = %candidate.id,
                home_rating_then = candidate.assessment.home.rating,
                home_rating_now = home_now.rating,
                away_rating_then = candidate.assessment.away.rating,
                away_rating_now = away_now.rating,
                "settlement audit"
            );

            info!(
                id = %candidate.id,
                score = %score_text,
                ?verdict,
                profit,
                "fixture settled"
            );
            candidate.settlement = Some(SettlementResult {
                final_score: score_text,
                outcome_type: outcome,
                verdict,
                profit,
            });
        }

        // The tally covers every settled fixture of the day, not just the
        // ones settled in this pass: a crash between the day write and the
        // ledger append must not produce a zero entry on resume.
        let mut tally = DayTally { total_fixtures: 0, wins: 0, losses: 0, day_profit: 0.0 };
        let mut unsettled = 0u32;
        for candidate in &candidates {
            if candidate.prediction.is_none() {
                continue;
            }
            match &candidate.settlement {
                Some(result) => {
                    tally.total_fixtures += 1;
                    match result.verdict {
                        Verdict::Win => tally.wins += 1,
                        Verdict::Lose => tally.losses += 1,
                    }
                    tally.day_profit += result.profit;
                }
                None => unsettled += 1,
            }
        }

        self.candidates.write_day(day, &candidates)?;

        let ledger_entry = if tally.total_fixtures > 0 {
            self.ledger.append_if_absent(day, tally)?
        } else {
            None
        };

        if let Some(entry) = &ledger_entry {
            info!(
                date = %day,
                wins = entry.wins,
                losses = entry.losses,
                day_profit = entry.day_profit,
                cumulative = entry.cumulative_profit,
                "day folded into ledger"
            );
        }

        Ok(DaySettlement { date: day, ledger_entry, unsettled })
    }
}
