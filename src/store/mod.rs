//! File-backed stores: per-day candidate collections, the settlement
//! checkpoint, and the append-only profit ledger. One JSON document per
//! concept, always replaced whole.

pub mod candidates;
pub mod checkpoint;
pub mod ledger;

pub use candidates::CandidateStore;
pub use checkpoint::CheckpointStore;
pub use ledger::LedgerStore;

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::Path;

use crate::error::StoreError;

/// Serialize to a sibling temp file, then rename over the target. A kill
/// mid-write leaves either the old document or the new one, never a torn
/// file.
pub(crate) fn write_json_atomic<T: Serialize>(path: &Path, value: &T) -> Result<(), StoreError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let tmp = path.with_extension("tmp");
    fs::write(&tmp, serde_json::to_vec_pretty(value)?)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

/// `None` when the file does not exist yet; any other IO problem is an
/// error, not an empty read.
pub(crate) fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, StoreError> {
    match fs::read_to_string(path) {
        Ok(content) => Ok(Some(serde_json::from_str(&content)?)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}
