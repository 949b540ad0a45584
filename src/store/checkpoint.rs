//! The settlement cursor: the last calendar day whose predictions were
//! checked. Advancing is the final act of settling a day, so a crash
//! anywhere earlier re-runs that day from the top (safe, because day
//! writes are merge-by-id and the ledger append is guarded by date).

use chrono::NaiveDate;
use std::path::{Path, PathBuf};

use super::{read_json, write_json_atomic};
use crate::error::StoreError;
use crate::model::Checkpoint;

pub struct CheckpointStore {
    path: PathBuf,
}

impl CheckpointStore {
    pub fn new(data_dir: &Path) -> Self {
        Self { path: data_dir.join("checkpoint.json") }
    }

    pub fn load(&self) -> Result<Option<Checkpoint>, StoreError> {
        read_json(&self.path)
    }

    /// Move the cursor to `date`. Requests that would move it backwards
    /// are ignored: the cursor never decreases.
    pub fn advance(&self, date: NaiveDate) -> Result<(), StoreError> {
        if let Some(existing) = self.load()? {
            if existing.last_settled_date >= date {
                return Ok(());
            }
        }
        write_json_atomic(&self.path, &Checkpoint { last_settled_date: date })
    }
}
