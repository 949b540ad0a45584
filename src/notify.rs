//! Telegram notification gateway.
//!
//! Fire-and-forget summaries: today's new predictions after a scan, and
//! one tally per settled day. Delivery failure is logged and dropped --
//! never retried in-line, never allowed to block persistence.

use anyhow::{Context, Result};
use reqwest::Client;
use serde_json::json;
use std::time::Duration;
use tracing::{info, warn};

use crate::model::{DayLedgerEntry, FixtureCandidate};

const TELEGRAM_API: &str = "https://api.telegram.org";
const SEND_TIMEOUT_MS: u64 = 10_000;

/// Day profit is quoted as a percentage of bank at flat 5% stakes.
const STAKE_PCT_OF_BANK: f64 = 5.0;

pub struct TelegramNotifier {
    client: Client,
    token: String,
    chat_id: String,
}

impl TelegramNotifier {
    pub fn new(token: String, chat_id: String) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(SEND_TIMEOUT_MS))
            .build()
            .context("building telegram client")?;
        Ok(Self { client, token, chat_id })
    }

    /// Send one Markdown message. Errors are for the caller to log; by
    /// policy they are never fatal.
    pub async fn send(&self, text: &str) -> Result<()> {
        let url = format!("{}/bot{}/sendMessage", TELEGRAM_API, self.token);
        let resp = self
            .client
            .post(&url)
            .json(&json!({
                "chat_id": self.chat_id,
                "text": text,
                "parse_mode": "Markdown",
            }))
            .send()
            .await
            .context("telegram send failed")?;
        let status = resp.status();
        if !status.is_success() {
            anyhow::bail!("telegram responded {status}");
        }
        info!("notification delivered");
        Ok(())
    }

    /// Best-effort wrapper used by the pipeline: log and move on.
    pub async fn send_or_log(&self, text: &str) {
        if let Err(e) = self.send(text).await {
            warn!(error = %e, "notification dropped");
        }
    }
}

/// Minutes past midnight for a "HH:MM" kickoff string; unparseable times
/// sort last.
fn kickoff_minutes(time: &str) -> u32 {
    time.split_once(':')
        .and_then(|(h, m)| Some(h.trim().parse::<u32>().ok()? * 60 + m.trim().parse::<u32>().ok()?))
        .unwrap_or(u32::MAX)
}

/// Render today's predicted fixtures, earliest kickoff first.
pub fn render_predictions(candidates: &[FixtureCandidate]) -> String {
    let mut predicted: Vec<&FixtureCandidate> =
        candidates.iter().filter(|c| c.prediction.is_some()).collect();
    predicted.sort_by_key(|c| kickoff_minutes(&c.kickoff_time));

    let mut text = String::from("*Today's picks:*\n");
    for (i, candidate) in predicted.iter().enumerate() {
        let prediction = candidate.prediction.expect("filtered to predicted");
        text.push_str(&format!(
            "{}. {} {} - {} ({})\nPrediction: *{}*\n[Match details]({})\n",
            i + 1,
            candidate.kickoff_time,
            candidate.team_home,
            candidate.team_away,
            candidate.country,
            prediction,
            candidate.fixture_url,
        ));
    }
    text
}

/// Render a settled day's tally.
pub fn render_day_result(entry: &DayLedgerEntry) -> String {
    format!(
        "Results for {}:\n\nMatches: {}\nWon: {}\nLost: {}\nProfit: {:+.2}% of bank",
        entry.date,
        entry.total_fixtures,
        entry.wins,
        entry.losses,
        entry.day_profit * STAKE_PCT_OF_BANK,
    )
}
