//! Processing strategy module for ledger settlement
//!
//! This module defines the Strategy pattern for complete settlement pipelines,
//! covering CSV parsing, per-group accumulation, settlement and report output.
//! This allows different implementations (synchronous, asynchronous batch) to
//! be selected at runtime.

use crate::cli::StrategyType;
use crate::core::aggregator::PayerPolicy;
use crate::io::csv_format::OutputFormat;
use crate::types::{LedgerError, Period};
use std::io::Write;
use std::path::{Path, PathBuf};

pub mod r#async;
pub mod sync;

pub use self::r#async::{AsyncProcessingStrategy, BatchConfig};
pub use sync::SyncProcessingStrategy;

/// Paths of the two input files
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerInput {
    /// Members CSV (`group,id,name,email,avatar`)
    pub members_path: PathBuf,

    /// Transactions CSV (`group,type,amount,paid_by,month,year`)
    pub transactions_path: PathBuf,
}

impl LedgerInput {
    pub fn new(members_path: impl AsRef<Path>, transactions_path: impl AsRef<Path>) -> Self {
        LedgerInput {
            members_path: members_path.as_ref().to_path_buf(),
            transactions_path: transactions_path.as_ref().to_path_buf(),
        }
    }
}

/// Options shared by every strategy
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LedgerOptions {
    /// Only transactions recorded in this period are considered
    pub period: Option<Period>,

    /// Treatment of expenses whose payer is not a group member
    pub payer_policy: PayerPolicy,

    /// Report output format
    pub format: OutputFormat,
}

/// Log label for a period window, `all` when no window is set
pub(crate) fn window_label(period: Option<Period>) -> String {
    period.map_or_else(|| "all".to_string(), |period| period.to_string())
}

/// Processing strategy trait for complete settlement pipelines
///
/// Each strategy reads members and transactions, settles every group and
/// writes the reports to output.
pub trait ProcessingStrategy: Send + Sync {
    /// Process the input files and write the group reports to output
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - An input file cannot be opened (file not found, permission denied)
    /// - The async runtime cannot be created
    /// - Output cannot be written
    ///
    /// Invalid rows and failing groups are logged and skipped; they do not
    /// cause this method to return an error.
    fn process(&self, input: &LedgerInput, output: &mut dyn Write) -> Result<(), LedgerError>;
}

/// Create a processing strategy based on the specified strategy type
///
/// # Arguments
///
/// * `strategy_type` - The type of processing strategy to create (Sync or Async)
/// * `config` - Optional configuration for async batch processing (ignored for sync)
/// * `options` - Period window, payer policy and output format
pub fn create_strategy(
    strategy_type: StrategyType,
    config: Option<BatchConfig>,
    options: LedgerOptions,
) -> Box<dyn ProcessingStrategy> {
    match strategy_type {
        StrategyType::Sync => Box::new(SyncProcessingStrategy::new(options)),
        StrategyType::Async => {
            let config = config.unwrap_or_default();
            Box::new(AsyncProcessingStrategy::new(config, options))
        }
    }
}
