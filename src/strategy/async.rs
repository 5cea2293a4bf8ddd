//! Asynchronous batch processing strategy
//!
//! This module provides an asynchronous, multi-threaded implementation of the
//! ProcessingStrategy trait. Transactions are applied in batches partitioned
//! by group, and groups are settled in parallel.
//!
//! # Architecture
//!
//! ```text
//! AsyncProcessingStrategy
//!     ├── BatchConfig (batch_size, max_concurrent_batches)
//!     ├── AsyncReader (batch CSV reading)
//!     └── BatchProcessor (group partitioning + task spawning)
//!         ├── AsyncLedgerBook (thread-safe group ledgers)
//!         └── SettlementEngine (stateless, shared)
//! ```
//!
//! # Ordering
//!
//! - Batches are applied one after another, so a group's transactions keep
//!   their file order even when they span several batches
//! - Within a batch, different groups are applied in parallel
//! - Reports are sorted by group id, matching the sync strategy byte for byte

use crate::core::r#async::{AsyncLedgerBook, BatchProcessor};
use crate::core::SettlementEngine;
use crate::io::async_reader::AsyncReader;
use crate::io::csv_format::{write_reports, MemberCsvRecord, TransactionCsvRecord};
use crate::strategy::{window_label, LedgerInput, LedgerOptions, ProcessingStrategy};
use crate::types::LedgerError;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use tokio_util::compat::{Compat, TokioAsyncReadCompatExt};

/// Configuration for batch processing
///
/// Controls how transactions are batched and the number of worker threads.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BatchConfig {
    /// Number of transactions per batch
    pub batch_size: usize,
    /// Number of runtime worker threads
    pub max_concurrent_batches: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            batch_size: 1000,
            max_concurrent_batches: num_cpus::get(),
        }
    }
}

impl BatchConfig {
    /// Create a new BatchConfig with custom values
    ///
    /// Zero values fall back to the defaults with a warning.
    pub fn new(batch_size: usize, max_concurrent_batches: usize) -> Self {
        let default = Self::default();

        let batch_size = if batch_size == 0 {
            tracing::warn!(
                "Invalid batch_size ({}), using default ({})",
                batch_size,
                default.batch_size
            );
            default.batch_size
        } else {
            batch_size
        };

        let max_concurrent_batches = if max_concurrent_batches == 0 {
            tracing::warn!(
                "Invalid max_concurrent_batches ({}), using default ({})",
                max_concurrent_batches,
                default.max_concurrent_batches
            );
            default.max_concurrent_batches
        } else {
            max_concurrent_batches
        };

        Self {
            batch_size,
            max_concurrent_batches,
        }
    }
}

/// Asynchronous batch processing strategy
///
/// # Configuration
///
/// - `batch_size`: Number of transactions per batch (default: 1000)
/// - `max_concurrent_batches`: Number of worker threads (default: CPU cores)
#[derive(Debug, Clone)]
pub struct AsyncProcessingStrategy {
    config: BatchConfig,
    options: LedgerOptions,
}

impl AsyncProcessingStrategy {
    pub fn new(config: BatchConfig, options: LedgerOptions) -> Self {
        Self { config, options }
    }
}

/// Open an input file for csv-async
async fn open_input(path: &Path) -> Result<Compat<tokio::fs::File>, LedgerError> {
    let file = tokio::fs::File::open(path)
        .await
        .map_err(|e| LedgerError::open_failed(path, e))?;

    // csv-async reads futures::io, tokio files need the compat layer
    Ok(file.compat())
}

impl ProcessingStrategy for AsyncProcessingStrategy {
    /// Process the input files and write the group reports to output
    ///
    /// 1. Creates a tokio multi-threaded runtime
    /// 2. Loads all members into the shared `AsyncLedgerBook`
    /// 3. Reads transactions in batches, dropping those outside the period
    /// 4. Applies each batch (groups in parallel) before reading the next
    /// 5. Settles every group in its own task
    /// 6. Writes the reports
    fn process(&self, input: &LedgerInput, output: &mut dyn Write) -> Result<(), LedgerError> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(self.config.max_concurrent_batches)
            .build()
            .map_err(|e| LedgerError::Runtime {
                message: format!("Failed to create tokio runtime: {e}"),
            })?;

        let reports = runtime.block_on(async {
            let book = Arc::new(AsyncLedgerBook::new());
            let engine = Arc::new(SettlementEngine::new(self.options.payer_policy));
            let processor = BatchProcessor::new(Arc::clone(&book), engine);

            let members = open_input(&input.members_path).await?;
            let mut reader = AsyncReader::<_, MemberCsvRecord>::new(members);
            for record in reader.read_all(self.config.batch_size).await {
                if let Err(e) = book.add_member(record) {
                    tracing::warn!("skipping member: {e}");
                }
            }

            let transactions = open_input(&input.transactions_path).await?;
            let mut reader = AsyncReader::<_, TransactionCsvRecord>::new(transactions);
            let mut outside_period = 0usize;
            loop {
                let batch = reader.read_batch(self.config.batch_size).await;
                if batch.is_empty() {
                    break;
                }

                let (batch, skipped): (Vec<_>, Vec<_>) = batch
                    .into_iter()
                    .partition(|record| record.in_period(self.options.period));
                outside_period += skipped.len();

                // Wait for the batch before reading the next one so group order holds
                processor.process_batch(batch).await?;
            }

            tracing::debug!(
                groups = book.len(),
                outside_period,
                window = %window_label(self.options.period),
                "ledger loaded"
            );
            Ok::<_, LedgerError>(processor.settle_groups().await)
        })?;

        write_reports(&reports, self.options.format, output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::csv_format::OutputFormat;
    use crate::strategy::SyncProcessingStrategy;
    use std::io::Write;
    use tempfile::NamedTempFile;

    /// Helper function to create a temporary CSV file for testing
    fn create_temp_csv(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("Failed to create temp file");
        file.write_all(content.as_bytes())
            .expect("Failed to write to temp file");
        file.flush().expect("Failed to flush temp file");
        file
    }

    fn run(strategy: &dyn ProcessingStrategy, members: &str, transactions: &str) -> String {
        let members = create_temp_csv(members);
        let transactions = create_temp_csv(transactions);
        let input = LedgerInput::new(members.path(), transactions.path());

        let mut output = Vec::new();
        strategy.process(&input, &mut output).unwrap();
        String::from_utf8(output).unwrap()
    }

    const MEMBERS: &str = "group,id,name,email,avatar\n\
                           flat,kim,Kim,,\n\
                           trip,amy,Amy,,\n\
                           flat,lee,Lee,,\n\
                           trip,bob,Bob,,\n\
                           flat,max,Max,,\n";

    const TRANSACTIONS: &str = "group,type,amount,paid_by,month,year\n\
                                trip,expense,100,amy,1,2024\n\
                                flat,expense,90,kim,1,2024\n\
                                trip,expense,40,bob,2,2024\n\
                                flat,income,30,,1,2024\n\
                                flat,expense,15.50,lee,1,2024\n\
                                trip,expense,abc,bob,1,2024\n\
                                ghost,expense,10,nobody,1,2024\n";

    #[test]
    fn test_matches_sync_strategy_output() {
        for format in [OutputFormat::Csv, OutputFormat::Json] {
            let options = LedgerOptions {
                format,
                ..LedgerOptions::default()
            };
            let sync = run(&SyncProcessingStrategy::new(options), MEMBERS, TRANSACTIONS);
            let async_output = run(
                &AsyncProcessingStrategy::new(BatchConfig::new(2, 2), options),
                MEMBERS,
                TRANSACTIONS,
            );

            assert_eq!(sync, async_output);
        }
    }

    #[test]
    fn test_maintains_group_order_across_batches() {
        let options = LedgerOptions {
            format: OutputFormat::Csv,
            ..LedgerOptions::default()
        };
        let output = run(
            &AsyncProcessingStrategy::new(BatchConfig::new(1, 4), options),
            MEMBERS,
            TRANSACTIONS,
        );

        // trip: amy paid 100, bob paid 40, share 70 each
        assert!(output.contains("trip,amy,Amy,,,100.00,70.00,30.00"));
        assert!(output.contains("trip,bob,Bob,,amy,Amy,,30.00"));

        let flat_line = output.lines().position(|l| l.starts_with("flat,")).unwrap();
        let trip_line = output.lines().position(|l| l.starts_with("trip,")).unwrap();
        assert!(flat_line < trip_line);
    }

    #[test]
    fn test_period_window() {
        let options = LedgerOptions {
            format: OutputFormat::Csv,
            period: Some(crate::types::Period {
                month: 2,
                year: 2024,
            }),
            ..LedgerOptions::default()
        };
        let output = run(
            &AsyncProcessingStrategy::new(BatchConfig::default(), options),
            MEMBERS,
            TRANSACTIONS,
        );

        assert!(output.contains("trip,bob,Bob,,,40.00,20.00,20.00"));
        assert!(output.contains("flat,kim,Kim,,,0.00,0.00,0.00"));
    }

    #[test]
    fn test_handles_missing_file() {
        let strategy = AsyncProcessingStrategy::new(BatchConfig::default(), LedgerOptions::default());
        let input = LedgerInput::new("nonexistent.csv", "nonexistent.csv");
        let mut output = Vec::new();

        let result = strategy.process(&input, &mut output);
        assert!(matches!(result, Err(LedgerError::FileNotFound { .. })));
    }

    #[test]
    fn test_batch_config_zero_values_fall_back() {
        let config = BatchConfig::new(0, 0);
        assert_eq!(config, BatchConfig::default());
    }
}
