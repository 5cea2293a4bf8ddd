//! Thread-safe ledger for async batch processing
//!
//! This module provides the `AsyncLedgerBook`, which collects members and
//! transactions per group using concurrent data structures so that batches
//! for different groups can be applied from separate tasks.
//!
//! # Design
//!
//! The book uses `DashMap` (a concurrent HashMap) keyed by group id. Writers
//! for different groups touch different shards and proceed in parallel, while
//! writes to the same group are serialized by the entry lock.
//!
//! # Ordering
//!
//! Per-group input order is preserved only if all records of a group are
//! applied from one task, which is what `BatchProcessor` guarantees.

use crate::core::ledger_book::GroupLedger;
use crate::core::traits::LedgerStore;
use crate::types::{GroupId, LedgerError, MemberRecord, TransactionRecord};
use dashmap::DashMap;

/// Thread-safe group ledgers for async batch processing
///
/// All methods take `&self` and are safe to call from multiple tasks. The
/// book is usually shared behind an `Arc`.
#[derive(Debug, Default)]
pub struct AsyncLedgerBook {
    /// Concurrent map of group id to ledger
    groups: DashMap<GroupId, GroupLedger>,
}

impl AsyncLedgerBook {
    /// Create an empty book
    pub fn new() -> Self {
        Self {
            groups: DashMap::new(),
        }
    }

    /// Add a member to its group
    ///
    /// # Errors
    ///
    /// Returns `DuplicateMember` if the id already exists in the group. The
    /// earlier member is kept.
    pub fn add_member(&self, record: MemberRecord) -> Result<(), LedgerError> {
        let MemberRecord { group, member } = record;
        let mut entry = self
            .groups
            .entry(group.clone())
            .or_insert_with(GroupLedger::default);
        entry.add_member(&group, member)
    }

    /// Append a transaction to its group
    pub fn add_transaction(&self, record: TransactionRecord) {
        self.groups
            .entry(record.group)
            .or_insert_with(GroupLedger::default)
            .add_transaction(record.transaction);
    }

    /// Snapshot of a single group's ledger
    ///
    /// Concurrent writes after the call are not reflected in the returned value.
    pub fn get(&self, group: &str) -> Option<GroupLedger> {
        self.groups.get(group).map(|entry| entry.value().clone())
    }

    /// Snapshot of every group, sorted by group id
    pub fn snapshot(&self) -> Vec<(GroupId, GroupLedger)> {
        let mut groups: Vec<(GroupId, GroupLedger)> = self
            .groups
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect();
        groups.sort_by(|a, b| a.0.cmp(&b.0));
        groups
    }

    /// Number of groups seen so far
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Whether no group has been seen yet
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

impl LedgerStore for AsyncLedgerBook {
    fn add_member(&mut self, record: MemberRecord) -> Result<(), LedgerError> {
        AsyncLedgerBook::add_member(self, record)
    }

    fn add_transaction(&mut self, record: TransactionRecord) {
        AsyncLedgerBook::add_transaction(self, record)
    }

    fn groups(&self) -> Vec<(GroupId, GroupLedger)> {
        self.snapshot()
    }
}
