//! Core traits for ledger storage
//!
//! This module defines the trait abstraction that allows both the synchronous
//! and the concurrent ledger book to feed the settlement engine.

use crate::core::ledger_book::GroupLedger;
use crate::types::{GroupId, LedgerError, MemberRecord, TransactionRecord};

/// Trait for collecting members and transactions per group
///
/// Implementations can be synchronous (using HashMap) or concurrent (using DashMap).
pub trait LedgerStore {
    /// Add a member to its group
    ///
    /// Fails with `DuplicateMember` if the id is already present in the group;
    /// the earlier member is kept.
    fn add_member(&mut self, record: MemberRecord) -> Result<(), LedgerError>;

    /// Append a transaction to its group
    fn add_transaction(&mut self, record: TransactionRecord);

    /// Snapshot of every group, sorted by group id
    fn groups(&self) -> Vec<(GroupId, GroupLedger)>;
}
