//! Split Ledger Library
//! # Overview
//!
//! This library computes, for groups of people sharing costs, each member's net
//! balance and a short list of payments that settles every balance. Input is
//! streamed from CSV files using either a sync or an async strategy.
//!
//! # Architecture
//!
//! - [`types`] - Core data types (Member, Transaction, Balance, Settlement, reports)
//! - [`cli`] - CLI arguments parsing and log setup
//! - [`core`] - Business logic components:
//!   - [`core::aggregator`] - Folds transactions into per-member balances
//!   - [`core::optimizer`] - Greedy largest-first settlement matching
//!   - [`core::engine`] - Per-group settlement and report building
//!   - [`core::ledger_book`] - Per-group accumulation of input records
//! - [`io`] - CSV readers and report writers
//! - [`strategy`] - Complete pipelines (sync, async batch)
//!
//! # Transaction Kinds
//!
//! - **Expense**: paid by one member, split equally across all members
//! - **Income**: received by the group, reduces every member's share equally
//!
//! # Balances
//!
//! Each member has:
//! - `paid`: total of the expenses they paid
//! - `share`: their equal portion of expenses minus incomes
//! - `balance`: `paid - share`; positive means the group owes them

pub mod cli;
pub mod core;
pub mod io;
pub mod strategy;
pub mod types;

pub use core::{BalanceAggregator, PayerPolicy, SettlementEngine, SettlementOptimizer};
pub use io::write_reports;
pub use types::{
    Balance, GroupReport, LedgerError, Member, Settlement, Transaction, TransactionKind,
};
