use crate::core::aggregator::PayerPolicy;
use crate::io::csv_format::OutputFormat;
use crate::strategy::{BatchConfig, LedgerInput, LedgerOptions};
use crate::types::{LedgerError, Period};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Compute group balances and the payments that settle them
#[derive(Parser, Debug)]
#[command(name = "split-ledger")]
#[command(about = "Compute group balances and the payments that settle them", long_about = None)]
pub struct CliArgs {
    /// Members CSV file path
    #[arg(value_name = "MEMBERS", help = "Path to the members CSV file")]
    pub members_file: PathBuf,

    /// Transactions CSV file path
    #[arg(value_name = "TRANSACTIONS", help = "Path to the transactions CSV file")]
    pub transactions_file: PathBuf,

    /// Processing strategy
    #[arg(
        long = "strategy",
        value_name = "STRATEGY",
        default_value = "async",
        help = "Processing strategy: 'sync' for synchronous or 'async' for asynchronous"
    )]
    pub strategy: StrategyType,

    /// Number of transactions per batch (async mode only)
    #[arg(
        long = "batch-size",
        value_name = "SIZE",
        help = "Number of transactions per batch (default: 1000)"
    )]
    pub batch_size: Option<usize>,

    /// Number of worker threads (async mode only)
    #[arg(
        long = "max-concurrent",
        value_name = "COUNT",
        help = "Number of worker threads (default: CPU cores)"
    )]
    pub max_concurrent_batches: Option<usize>,

    /// Month of the period window (1-12), requires --year
    #[arg(long = "month", value_name = "MONTH")]
    pub month: Option<u8>,

    /// Year of the period window, requires --month
    #[arg(long = "year", value_name = "YEAR")]
    pub year: Option<i32>,

    /// Treatment of expenses whose payer is not a group member
    #[arg(long = "unknown-payer", value_name = "POLICY", default_value = "reject")]
    pub unknown_payer: PayerPolicy,

    /// Report output format
    #[arg(long = "format", value_name = "FORMAT", default_value = "json")]
    pub format: OutputFormat,

    /// Log level used when RUST_LOG is not set
    #[arg(long = "log-level", value_name = "LEVEL", default_value = "warn")]
    pub log_level: String,
}

/// Available processing strategies
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum StrategyType {
    Sync,
    Async,
}

impl CliArgs {
    /// Create a BatchConfig from CLI arguments
    ///
    /// Missing values use the defaults; zero values fall back to the defaults
    /// with a warning.
    pub fn to_batch_config(&self) -> BatchConfig {
        if self.batch_size.is_some() || self.max_concurrent_batches.is_some() {
            let default = BatchConfig::default();
            BatchConfig::new(
                self.batch_size.unwrap_or(default.batch_size),
                self.max_concurrent_batches
                    .unwrap_or(default.max_concurrent_batches),
            )
        } else {
            BatchConfig::default()
        }
    }

    /// The period window, if one was requested
    ///
    /// # Errors
    ///
    /// `InvalidPeriod` if only one of month and year is given, or the month
    /// is outside 1-12.
    pub fn period(&self) -> Result<Option<Period>, LedgerError> {
        Period::from_parts(self.month, self.year)
    }

    /// Collect the options shared by all strategies
    pub fn to_options(&self) -> Result<LedgerOptions, LedgerError> {
        Ok(LedgerOptions {
            period: self.period()?,
            payer_policy: self.unknown_payer,
            format: self.format,
        })
    }

    /// The two input paths
    pub fn to_input(&self) -> LedgerInput {
        LedgerInput::new(&self.members_file, &self.transactions_file)
    }
}
