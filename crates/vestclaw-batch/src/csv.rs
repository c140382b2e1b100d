//! CSV ingestion — row parsing and address normalization.
//!
//! The upstream export is small and flat (a header line, then
//! `address,seconds,amount` rows), so this reads it with plain string
//! splitting. Rows with malformed addresses or numbers are skipped with
//! a warning, never fatal — the spreadsheet is operator-maintained and
//! a single bad row must not sink the run.

use vestclaw_core::error::{Result, VestClawError};
use vestclaw_core::types::AccountId;

/// One validated spreadsheet row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvRow {
    pub account: AccountId,
    /// Offset in seconds from the base timestamp.
    pub seconds: u64,
    pub amount: u64,
}

/// Parse the CSV text into validated rows, skipping bad ones.
///
/// Header must name the `address`, `seconds`, and `amount` columns
/// (any order, case-insensitive; `weys` is accepted as a legacy alias
/// for `amount`).
pub fn parse_rows(text: &str) -> Result<Vec<CsvRow>> {
    let mut lines = text.lines();
    let header = lines
        .next()
        .ok_or_else(|| VestClawError::BatchFile("empty CSV input".into()))?;

    let columns: Vec<String> = header.split(',').map(|c| c.trim().to_lowercase()).collect();
    let col = |name: &str| columns.iter().position(|c| c == name);
    let addr_idx = col("address")
        .ok_or_else(|| VestClawError::BatchFile("missing 'address' column".into()))?;
    let secs_idx = col("seconds")
        .ok_or_else(|| VestClawError::BatchFile("missing 'seconds' column".into()))?;
    let amount_idx = col("amount")
        .or_else(|| col("weys"))
        .ok_or_else(|| VestClawError::BatchFile("missing 'amount' column".into()))?;

    let mut rows = Vec::new();
    let mut skipped = 0usize;

    for (lineno, line) in lines.enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split(',').map(str::trim).collect();
        let Some(parsed) = parse_fields(&fields, addr_idx, secs_idx, amount_idx) else {
            tracing::warn!("⚠️ Skipping row {}: {line}", lineno + 2);
            skipped += 1;
            continue;
        };
        rows.push(parsed);
    }

    tracing::info!("📋 Parsed {} row(s), skipped {}", rows.len(), skipped);
    Ok(rows)
}

fn parse_fields(fields: &[&str], addr: usize, secs: usize, amount: usize) -> Option<CsvRow> {
    let account = AccountId::parse(fields.get(addr)?).ok()?;
    let seconds = fields.get(secs)?.parse().ok()?;
    let amount = fields.get(amount)?.parse().ok()?;
    Some(CsvRow {
        account,
        seconds,
        amount,
    })
}
