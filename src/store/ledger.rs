//! Append-only profit ledger, one entry per settled calendar day.
//! Past entries are never rewritten; cumulative profit chains forward
//! from the previous entry.

use chrono::NaiveDate;
use std::path::{Path, PathBuf};

use super::{read_json, write_json_atomic};
use crate::error::StoreError;
use crate::model::DayLedgerEntry;

/// A day's win/loss tally before it is folded into the ledger.
#[derive(Debug, Clone, Copy)]
pub struct DayTally {
    pub total_fixtures: u32,
    pub wins: u32,
    pub losses: u32,
    pub day_profit: f64,
}

pub struct LedgerStore {
    path: PathBuf,
}

impl LedgerStore {
    pub fn new(data_dir: &Path) -> Self {
        Self { path: data_dir.join("ledger.json") }
    }

    pub fn load(&self) -> Result<Vec<DayLedgerEntry>, StoreError> {
        Ok(read_json(&self.path)?.unwrap_or_default())
    }

    /// Fold a day's tally into the ledger. Returns the appended entry, or
    /// `None` if the date already has one (re-settles never double-count).
    pub fn append_if_absent(
        &self,
        date: NaiveDate,
        tally: DayTally,
    ) -> Result<Option<DayLedgerEntry>, StoreError> {
        let mut entries = self.load()?;
        if entries.iter().any(|e| e.date == date) {
            return Ok(None);
        }

        let previous = entries.last().map(|e| e.cumulative_profit).unwrap_or(0.0);
        let entry = DayLedgerEntry {
            date,
            total_fixtures: tally.total_fixtures,
            wins: tally.wins,
            losses: tally.losses,
            day_profit: tally.day_profit,
            cumulative_profit: previous + tally.day_profit,
        };
        entries.push(entry.clone());
        write_json_atomic(&self.path, &entries)?;
        Ok(Some(entry))
    }
}
