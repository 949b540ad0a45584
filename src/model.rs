//! Persisted domain records. Field names here are the on-disk JSON schema,
//! so renames are breaking changes for existing day files.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One of the three 1X2 outcomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Home,
    Draw,
    Away,
}

impl Outcome {
    /// Classify a final score by goal comparison.
    pub fn from_score(home_goals: u32, away_goals: u32) -> Self {
        if home_goals > away_goals {
            Outcome::Home
        } else if home_goals < away_goals {
            Outcome::Away
        } else {
            Outcome::Draw
        }
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Outcome::Home => "home",
            Outcome::Draw => "draw",
            Outcome::Away => "away",
        };
        f.write_str(label)
    }
}

/// Result letter of a single past match, as shown in a form strip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchResult {
    W,
    D,
    L,
}

/// One entry in a team's recent-match history, most-recent-first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormEntry {
    pub result: MatchResult,
    pub goals_for: i32,
    pub goals_against: i32,
    /// 0 = most recent match.
    pub sequence_index: usize,
}

impl FormEntry {
    pub fn goal_diff(&self) -> i32 {
        self.goals_for - self.goals_against
    }
}

/// A team's league-table row plus its recent form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamStanding {
    pub rank: u32,
    pub points: u32,
    pub goal_difference: i32,
    pub form: Vec<FormEntry>,
}

/// Both teams' standings for one fixture.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StandingsPair {
    pub home: TeamStanding,
    pub away: TeamStanding,
    pub total_teams: u32,
}

/// Closing 1X2 odds as recorded at scan time.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct OddsTriple {
    pub home: f64,
    pub draw: f64,
    pub away: f64,
}

impl OddsTriple {
    pub fn for_outcome(&self, outcome: Outcome) -> f64 {
        match outcome {
            Outcome::Home => self.home,
            Outcome::Draw => self.draw,
            Outcome::Away => self.away,
        }
    }
}

/// Averaged pre-kickoff odds movement per outcome, in signed integer
/// percentage points (a falling price is negative).
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DriftSummary {
    pub home: i32,
    pub draw: i32,
    pub away: i32,
}

impl DriftSummary {
    /// The sharpest drop across the three outcomes.
    pub fn steepest(&self) -> i32 {
        self.home.min(self.draw).min(self.away)
    }
}

/// Form trend classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Upward,
    Downward,
    Stable,
}

/// Trend + rating computed for one team at scan time.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct FormAssessment {
    pub trend: Trend,
    pub rating: f64,
}

/// Form assessments for both sides of a fixture.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AssessmentPair {
    pub home: FormAssessment,
    pub away: FormAssessment,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Win,
    Lose,
}

/// Outcome check attached to a candidate once its day is settled.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettlementResult {
    /// Final score as reported by the source, e.g. "2-1".
    pub final_score: String,
    /// Which outcome the score realized.
    pub outcome_type: Outcome,
    pub verdict: Verdict,
    /// Flat one-unit staking: odds − 1 on a win, −1 on a loss.
    pub profit: f64,
}

/// A fixture that passed the drift gate and was scored on one run.
///
/// Immutable after creation except for `settlement`, which is written at
/// most once (re-checks excepted).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixtureCandidate {
    /// Source-assigned match id, stable across runs within a day.
    pub id: String,
    pub country: String,
    pub team_home: String,
    pub team_away: String,
    /// Kickoff time as listed by the source, "HH:MM".
    pub kickoff_time: String,
    pub fixture_url: String,
    pub initial_odds: OddsTriple,
    pub drift: DriftSummary,
    pub standings: StandingsPair,
    pub assessment: AssessmentPair,
    pub prediction: Option<Outcome>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settlement: Option<SettlementResult>,
}

/// One settled calendar day in the append-only ledger.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DayLedgerEntry {
    pub date: NaiveDate,
    pub total_fixtures: u32,
    pub wins: u32,
    pub losses: u32,
    pub day_profit: f64,
    pub cumulative_profit: f64,
}

/// Cursor over settled days. Advances monotonically; never rolls back.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Checkpoint {
    pub last_settled_date: NaiveDate,
}
