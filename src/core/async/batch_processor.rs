//! Batch processing with group-based partitioning
//!
//! This module provides the `BatchProcessor` struct, which applies transaction
//! batches to a shared `AsyncLedgerBook` and settles the collected groups
//! concurrently.
//!
//! # Design
//!
//! Batches are partitioned by group id. Each partition is applied by its own
//! tokio task, so different groups proceed in parallel while the transactions
//! of one group keep their input order. Settlement then spawns one task per
//! group; groups never share state, so no further coordination is needed.
//!
//! # Architecture
//!
//! ```text
//! BatchProcessor
//!     ├── Arc<AsyncLedgerBook>     (shared group ledgers)
//!     └── Arc<SettlementEngine>    (shared, stateless settlement)
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use super::AsyncLedgerBook;
use crate::core::engine::SettlementEngine;
use crate::types::{GroupId, GroupReport, LedgerError, TransactionRecord};

/// Batch processor with group-based partitioning
///
/// Cloning is cheap and every clone shares the same book and engine.
#[derive(Debug, Clone)]
pub struct BatchProcessor {
    book: Arc<AsyncLedgerBook>,
    engine: Arc<SettlementEngine>,
}

impl BatchProcessor {
    /// Create a new BatchProcessor
    ///
    /// # Arguments
    ///
    /// * `book` - Shared ledger that batches are applied to
    /// * `engine` - Engine used to settle each group
    pub fn new(book: Arc<AsyncLedgerBook>, engine: Arc<SettlementEngine>) -> Self {
        Self { book, engine }
    }

    /// The shared ledger book
    pub fn book(&self) -> &Arc<AsyncLedgerBook> {
        &self.book
    }

    /// Partition a batch of transactions by group id
    ///
    /// # Guarantees
    ///
    /// - Each record appears in exactly one partition
    /// - Records of a group keep their original order
    pub fn partition_by_group(
        &self,
        batch: Vec<TransactionRecord>,
    ) -> HashMap<GroupId, Vec<TransactionRecord>> {
        let mut group_batches: HashMap<GroupId, Vec<TransactionRecord>> = HashMap::new();

        for record in batch {
            group_batches
                .entry(record.group.clone())
                .or_default()
                .push(record);
        }

        group_batches
    }

    /// Apply all transactions of one group in order
    pub async fn apply_group_transactions(&self, transactions: Vec<TransactionRecord>) -> usize {
        let count = transactions.len();
        for record in transactions {
            self.book.add_transaction(record);
        }
        count
    }

    /// Apply a batch of transactions with group-based partitioning
    ///
    /// # Returns
    ///
    /// The number of records applied.
    ///
    /// # Errors
    ///
    /// Returns `Runtime` if a worker task failed; records handled by that
    /// task may be partially applied.
    pub async fn process_batch(&self, batch: Vec<TransactionRecord>) -> Result<usize, LedgerError> {
        let group_batches = self.partition_by_group(batch);

        let mut tasks = Vec::with_capacity(group_batches.len());
        for (_group, transactions) in group_batches {
            let processor = self.clone();
            tasks.push(tokio::spawn(async move {
                processor.apply_group_transactions(transactions).await
            }));
        }

        let mut applied = 0;
        for task in tasks {
            applied += task.await.map_err(|e| LedgerError::Runtime {
                message: format!("batch task failed: {e}"),
            })?;
        }

        Ok(applied)
    }

    /// Settle every group in the book concurrently
    ///
    /// One task is spawned per group. Groups that fail to settle, and groups
    /// whose task panicked, are logged and left out. Reports are returned in
    /// group id order.
    pub async fn settle_groups(&self) -> Vec<GroupReport> {
        let mut tasks = Vec::new();
        for (group, ledger) in self.book.snapshot() {
            let engine = Arc::clone(&self.engine);
            let task = tokio::spawn(async move {
                let result = engine.settle_group(&group, &ledger);
                (group, result)
            });
            tasks.push(task);
        }

        let mut reports = Vec::with_capacity(tasks.len());
        for task in tasks {
            match task.await {
                Ok((_, Ok(report))) => reports.push(report),
                Ok((group, Err(e))) => {
                    tracing::error!(group = %group, "skipping group: {e}");
                }
                Err(e) => {
                    tracing::error!("settlement task panicked: {e}");
                }
            }
        }

        reports.sort_by(|a, b| a.group.cmp(&b.group));
        reports
    }
}
