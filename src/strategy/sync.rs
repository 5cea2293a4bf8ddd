//! Synchronous processing strategy
//!
//! This module provides a synchronous, single-threaded implementation of the
//! ProcessingStrategy trait.
//!
//! # Design
//!
//! The SyncProcessingStrategy focuses on orchestration, delegating:
//! - CSV parsing to `SyncReader` (iterator interface)
//! - Per-group accumulation to `LedgerBook`
//! - Settlement to `SettlementEngine`
//! - Output to `csv_format::write_reports`
//!
//! Rows are streamed one at a time; only the accepted members and
//! transactions are kept in memory.

use crate::core::{LedgerBook, LedgerStore, SettlementEngine};
use crate::io::csv_format::{write_reports, MemberCsvRecord, TransactionCsvRecord};
use crate::io::sync_reader::SyncReader;
use crate::strategy::{window_label, LedgerInput, LedgerOptions, ProcessingStrategy};
use crate::types::LedgerError;
use std::io::Write;

/// Synchronous processing strategy
///
/// # Examples
///
/// ```no_run
/// use split_ledger::strategy::{LedgerInput, LedgerOptions, ProcessingStrategy, SyncProcessingStrategy};
/// use std::io;
///
/// let strategy = SyncProcessingStrategy::new(LedgerOptions::default());
/// let input = LedgerInput::new("members.csv", "transactions.csv");
///
/// strategy.process(&input, &mut io::stdout()).expect("Processing failed");
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct SyncProcessingStrategy {
    options: LedgerOptions,
}

impl SyncProcessingStrategy {
    pub fn new(options: LedgerOptions) -> Self {
        Self { options }
    }

    /// Read both input files into a ledger book
    ///
    /// Invalid rows, duplicate members and transactions outside the period
    /// window are skipped.
    pub fn load(&self, input: &LedgerInput) -> Result<LedgerBook, LedgerError> {
        let mut book = LedgerBook::new();

        for result in SyncReader::<MemberCsvRecord>::open(&input.members_path)? {
            if let Err(e) = result.and_then(|record| book.add_member(record)) {
                tracing::warn!("skipping member: {e}");
            }
        }

        let mut outside_period = 0usize;
        for result in SyncReader::<TransactionCsvRecord>::open(&input.transactions_path)? {
            match result {
                Ok(record) if record.in_period(self.options.period) => {
                    book.add_transaction(record)
                }
                Ok(_) => outside_period += 1,
                Err(e) => tracing::warn!("skipping transaction: {e}"),
            }
        }

        tracing::debug!(
            groups = book.len(),
            outside_period,
            window = %window_label(self.options.period),
            "ledger loaded"
        );
        Ok(book)
    }
}

impl ProcessingStrategy for SyncProcessingStrategy {
    fn process(&self, input: &LedgerInput, output: &mut dyn Write) -> Result<(), LedgerError> {
        let book = self.load(input)?;

        let engine = SettlementEngine::new(self.options.payer_policy);
        let reports = engine.settle_all(&book);

        write_reports(&reports, self.options.format, output)
    }
}
