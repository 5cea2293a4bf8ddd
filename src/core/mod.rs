//! Core business logic module
//!
//! This module contains the settlement components:
//! - `aggregator` - Folds transactions into per-member balances
//! - `optimizer` - Greedy largest-first settlement matching
//! - `engine` - Settles groups and builds reports
//! - `ledger_book` - Per-group member and transaction storage
//! - `traits` - Storage abstraction shared by the sync and async books
//! - `async` - Concurrent implementations

pub mod aggregator;
pub mod r#async;
pub mod engine;
pub mod ledger_book;
pub mod optimizer;
pub mod traits;

pub use aggregator::{BalanceAggregator, PayerPolicy};
pub use engine::{SettlementEngine, BALANCE_SUM_TOLERANCE};
pub use ledger_book::{GroupLedger, LedgerBook};
pub use optimizer::{SettlementOptimizer, SETTLEMENT_EPSILON};
pub use r#async::{AsyncLedgerBook, BatchProcessor};
pub use traits::LedgerStore;
