//! # VestClaw Batch
//!
//! Input-preparation tooling: turns a raw spreadsheet export
//! (`address,seconds,amount` rows) into the fixed-size lock-request
//! batches the authority submits to the ledger.
//!
//! Pure ETL — nothing here mutates a ledger. Dedup policy, chunk size,
//! and the base timestamp are tool knobs (`BatchConfig`), not ledger
//! semantics.

pub mod csv;
pub mod producer;

pub use csv::{CsvRow, parse_rows};
pub use producer::{PrepareOutcome, check_batch, chunk, dedupe, load_batch, prepare, to_requests};
