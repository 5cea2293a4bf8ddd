//! In-memory ledger for the synchronous strategy
//!
//! This module provides the `LedgerBook`, which collects members and
//! transactions per group as records are read.
//!
//! # Duplicate Handling
//!
//! Member ids must be unique within a group. A repeated id is rejected and
//! the first occurrence is kept, so one bad row cannot poison the whole group.
//!
//! # Ordering
//!
//! Members and transactions keep their input order inside a group. Group
//! listings are sorted by group id so reports are deterministic.

use crate::core::traits::LedgerStore;
use crate::types::{GroupId, LedgerError, Member, MemberRecord, Transaction, TransactionRecord};
use std::collections::HashMap;

/// Members and transactions of a single group
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroupLedger {
    /// Group members in input order
    pub members: Vec<Member>,

    /// Transactions in input order
    pub transactions: Vec<Transaction>,
}

impl GroupLedger {
    /// Add a member, rejecting an id already present in the group
    pub fn add_member(&mut self, group: &str, member: Member) -> Result<(), LedgerError> {
        if self.members.iter().any(|m| m.id == member.id) {
            return Err(LedgerError::duplicate_member(&member.id, group));
        }
        self.members.push(member);
        Ok(())
    }

    /// Append a transaction
    pub fn add_transaction(&mut self, transaction: Transaction) {
        self.transactions.push(transaction);
    }
}

/// Group ledgers keyed by group id
///
/// A group exists as soon as any member or transaction names it. Groups that
/// only ever received transactions have no members and fail settlement.
#[derive(Debug, Default)]
pub struct LedgerBook {
    groups: HashMap<GroupId, GroupLedger>,
}

impl LedgerBook {
    /// Create an empty ledger book
    pub fn new() -> Self {
        LedgerBook {
            groups: HashMap::new(),
        }
    }

    /// Get a group's ledger
    pub fn get(&self, group: &str) -> Option<&GroupLedger> {
        self.groups.get(group)
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

impl LedgerStore for LedgerBook {
    fn add_member(&mut self, record: MemberRecord) -> Result<(), LedgerError> {
        let MemberRecord { group, member } = record;
        let ledger = self.groups.entry(group.clone()).or_default();
        ledger.add_member(&group, member)
    }

    fn add_transaction(&mut self, record: TransactionRecord) {
        self.groups
            .entry(record.group)
            .or_default()
            .add_transaction(record.transaction);
    }

    fn groups(&self) -> Vec<(GroupId, GroupLedger)> {
        let mut groups: Vec<(GroupId, GroupLedger)> = self
            .groups
            .iter()
            .map(|(group, ledger)| (group.clone(), ledger.clone()))
            .collect();
        groups.sort_by(|a, b| a.0.cmp(&b.0));
        groups
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn member_record(group: &str, id: &str) -> MemberRecord {
        MemberRecord {
            group: group.to_string(),
            member: Member::new(id, id.to_uppercase()),
        }
    }

    fn expense_record(group: &str, amount: i64, payer: &str) -> TransactionRecord {
        TransactionRecord {
            group: group.to_string(),
            transaction: Transaction::expense(Decimal::from(amount), payer),
            period: None,
        }
    }

    #[test]
    fn test_new_book_is_empty() {
        let book = LedgerBook::new();
        assert!(book.is_empty());
        assert!(book.groups().is_empty());
    }

    #[test]
    fn test_members_keep_input_order() {
        let mut book = LedgerBook::new();
        for id in ["zed", "amy", "kim"] {
            book.add_member(member_record("trip", id)).unwrap();
        }

        let ids: Vec<&str> = book
            .get("trip")
            .unwrap()
            .members
            .iter()
            .map(|m| m.id.as_str())
            .collect();
        assert_eq!(ids, vec!["zed", "amy", "kim"]);
    }

    #[test]
    fn test_duplicate_member_rejected_first_kept() {
        let mut book = LedgerBook::new();
        book.add_member(member_record("trip", "amy")).unwrap();

        let mut again = member_record("trip", "amy");
        again.member.name = "Impostor".to_string();
        let result = book.add_member(again);

        assert_eq!(result.unwrap_err(), LedgerError::duplicate_member("amy", "trip"));
        let ledger = book.get("trip").unwrap();
        assert_eq!(ledger.members.len(), 1);
        assert_eq!(ledger.members[0].name, "AMY");
    }

    #[test]
    fn test_same_member_in_two_groups() {
        let mut book = LedgerBook::new();
        book.add_member(member_record("trip", "amy")).unwrap();
        book.add_member(member_record("flat", "amy")).unwrap();

        assert_eq!(book.len(), 2);
    }

    #[test]
    fn test_transactions_grouped_in_order() {
        let mut book = LedgerBook::new();
        book.add_transaction(expense_record("trip", 10, "amy"));
        book.add_transaction(expense_record("flat", 99, "kim"));
        book.add_transaction(expense_record("trip", 20, "bob"));

        let amounts: Vec<Decimal> = book
            .get("trip")
            .unwrap()
            .transactions
            .iter()
            .map(|t| t.amount)
            .collect();
        assert_eq!(amounts, vec![Decimal::from(10), Decimal::from(20)]);
    }

    #[test]
    fn test_transaction_only_group_has_no_members() {
        let mut book = LedgerBook::new();
        book.add_transaction(expense_record("ghost", 10, "amy"));

        let ledger = book.get("ghost").unwrap();
        assert!(ledger.members.is_empty());
        assert_eq!(ledger.transactions.len(), 1);
    }

    #[test]
    fn test_groups_sorted_by_id() {
        let mut book = LedgerBook::new();
        for group in ["zeta", "alpha", "mid"] {
            book.add_member(member_record(group, "amy")).unwrap();
        }

        let names: Vec<GroupId> = book.groups().into_iter().map(|(g, _)| g).collect();
        assert_eq!(names, vec!["alpha", "mid", "zeta"]);
    }
}
