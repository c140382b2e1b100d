//! Batch production — dedup, chunking, and file output.
//!
//! Output files are named `addresses_size-{N}.{i}.json`, matching the
//! format the authority's submission tooling already consumes.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use vestclaw_core::config::BatchConfig;
use vestclaw_core::error::{Result, VestClawError};
use vestclaw_core::types::LockRequest;
use vestclaw_ledger::validate_request;

use crate::csv::{CsvRow, parse_rows};

/// Map rows to single-entry lock requests against the base timestamp.
pub fn to_requests(rows: &[CsvRow], base_timestamp: u64) -> Vec<LockRequest> {
    rows.iter()
        .map(|row| {
            LockRequest::new(
                row.account,
                vec![base_timestamp.saturating_add(row.seconds)],
                vec![row.amount],
            )
        })
        .collect()
}

/// Drop exact-duplicate requests; the first occurrence wins.
pub fn dedupe(requests: Vec<LockRequest>) -> Vec<LockRequest> {
    let mut seen = HashSet::new();
    requests
        .into_iter()
        .filter(|req| seen.insert(req.clone()))
        .collect()
}

/// Split requests into chunks of `size` (0 is treated as 1).
pub fn chunk(requests: Vec<LockRequest>, size: usize) -> Vec<Vec<LockRequest>> {
    let size = size.max(1);
    let mut chunks = Vec::with_capacity(requests.len().div_ceil(size));
    let mut iter = requests.into_iter().peekable();
    while iter.peek().is_some() {
        chunks.push(iter.by_ref().take(size).collect());
    }
    chunks
}

/// Load a batch file back into lock requests.
pub fn load_batch(path: &Path) -> Result<Vec<LockRequest>> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| VestClawError::BatchFile(format!("read {}: {e}", path.display())))?;
    serde_json::from_str(&text)
        .map_err(|e| VestClawError::BatchFile(format!("parse {}: {e}", path.display())))
}

/// Validate every request in a batch against the ledger's lock rules.
/// Returns `(request index, violation)` pairs; empty means submittable.
pub fn check_batch(requests: &[LockRequest], genesis: u64) -> Vec<(usize, VestClawError)> {
    requests
        .iter()
        .enumerate()
        .filter_map(|(i, req)| validate_request(req, genesis).err().map(|e| (i, e)))
        .collect()
}

/// Summary of one ETL run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrepareOutcome {
    pub rows_parsed: usize,
    pub unique_requests: usize,
    pub files: Vec<PathBuf>,
}

/// Full ETL pipeline: parse → map → dedup → chunk → write.
pub fn prepare(csv_text: &str, out_dir: &Path, cfg: &BatchConfig) -> Result<PrepareOutcome> {
    let rows = parse_rows(csv_text)?;
    let rows_parsed = rows.len();

    let mut requests = to_requests(&rows, cfg.base_timestamp);
    if cfg.dedupe {
        let before = requests.len();
        requests = dedupe(requests);
        if requests.len() < before {
            tracing::info!("🧹 Dropped {} duplicate request(s)", before - requests.len());
        }
    }
    let unique_requests = requests.len();

    std::fs::create_dir_all(out_dir)
        .map_err(|e| VestClawError::BatchFile(format!("create {}: {e}", out_dir.display())))?;

    let mut files = Vec::new();
    for (i, batch) in chunk(requests, cfg.chunk_size).into_iter().enumerate() {
        let path = out_dir.join(format!("addresses_size-{}.{i}.json", cfg.chunk_size));
        let json = serde_json::to_string_pretty(&batch)
            .map_err(|e| VestClawError::BatchFile(format!("serialize batch {i}: {e}")))?;
        std::fs::write(&path, &json)
            .map_err(|e| VestClawError::BatchFile(format!("write {}: {e}", path.display())))?;
        tracing::debug!("💾 Wrote {} request(s) to {}", batch.len(), path.display());
        files.push(path);
    }

    tracing::info!(
        "📦 Prepared {} batch file(s) from {} row(s) in {}",
        files.len(),
        rows_parsed,
        out_dir.display()
    );
    Ok(PrepareOutcome {
        rows_parsed,
        unique_requests,
        files,
    })
}
