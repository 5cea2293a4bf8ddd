//! Asynchronous implementations of core components
//!
//! This module provides thread-safe, concurrent implementations of the ledger
//! components using DashMap for locking.
//!
//! # Architecture
//!
//! - **AsyncLedgerBook**: Thread-safe group ledgers using DashMap
//! - **BatchProcessor**: Applies batches partitioned by group and settles
//!   groups in parallel tasks
//!
//! # Thread Safety
//!
//! - Operations on different groups proceed in parallel
//! - Operations on the same group are serialized by the map entry lock
//! - No global locks

pub mod batch_processor;
pub mod ledger_book;

pub use batch_processor::BatchProcessor;
pub use ledger_book::AsyncLedgerBook;
