//! Per-day candidate collections, one JSON file per calendar date.
//!
//! Writes are merge-by-id with first-write-wins inside a day: re-running
//! the scan never duplicates a fixture and never clobbers a fixture that
//! already carries a settlement result. There is no cross-day dedup.

use chrono::NaiveDate;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use super::{read_json, write_json_atomic};
use crate::error::StoreError;
use crate::model::FixtureCandidate;

pub struct CandidateStore {
    dir: PathBuf,
}

impl CandidateStore {
    pub fn new(data_dir: &Path) -> Self {
        Self { dir: data_dir.join("results") }
    }

    /// `<data_dir>/results/YYYY-MM-DD.json`
    pub fn day_path(&self, date: NaiveDate) -> PathBuf {
        self.dir.join(format!("{date}.json"))
    }

    /// The day's collection, empty if nothing was recorded.
    pub fn load_day(&self, date: NaiveDate) -> Result<Vec<FixtureCandidate>, StoreError> {
        Ok(read_json(&self.day_path(date))?.unwrap_or_default())
    }

    /// Replace the day's collection wholesale (settlement rewrites embed
    /// results this way).
    pub fn write_day(
        &self,
        date: NaiveDate,
        candidates: &[FixtureCandidate],
    ) -> Result<(), StoreError> {
        write_json_atomic(&self.day_path(date), &candidates)
    }

    /// Every date with a day file on disk, ascending.
    pub fn list_days(&self) -> Result<Vec<NaiveDate>, StoreError> {
        let entries = match std::fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        let mut days: Vec<NaiveDate> = entries
            .filter_map(|entry| entry.ok())
            .filter_map(|entry| {
                let name = entry.file_name();
                let path = Path::new(&name);
                // Abandoned .tmp files from an interrupted write are not days.
                if path.extension()?.to_str()? != "json" {
                    return None;
                }
                path.file_stem()?.to_str()?.parse().ok()
            })
            .collect();
        days.sort();
        Ok(days)
    }

    /// Merge newly scraped candidates into the day keyed by id. Existing
    /// entries win on conflict; new unique entries append in discovery
    /// order. Returns how many were actually added.
    pub fn upsert_day(
        &self,
        date: NaiveDate,
        new_candidates: Vec<FixtureCandidate>,
    ) -> Result<usize, StoreError> {
        let mut merged = self.load_day(date)?;
        let known: HashSet<String> = merged.iter().map(|c| c.id.clone()).collect();

        let mut added = 0;
        for candidate in new_candidates {
            if !known.contains(&candidate.id) {
                merged.push(candidate);
                added += 1;
            }
        }

        self.write_day(date, &merged)?;
        Ok(added)
    }
}
