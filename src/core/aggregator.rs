//! Balance aggregation
//!
//! This module provides the `BalanceAggregator`, which folds a group's
//! transactions into one [`Balance`] per member.
//!
//! Every transaction is split equally across all current members:
//! - **Expense**: the payer's `paid` grows by the full amount and every member's
//!   `share` grows by `amount / member_count`
//! - **Income**: every member's `share` shrinks by `amount / member_count`
//!
//! Because the per-person share of a transaction is the same for every member,
//! the running share is kept once for the whole group and only `paid` is
//! tracked per member. The result is built fresh; inputs are never mutated.

use crate::types::{Balance, LedgerError, Member, Transaction, TransactionKind};
use clap::ValueEnum;
use rust_decimal::Decimal;
use std::collections::HashMap;

/// How to treat an expense whose payer is not a member of the group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum PayerPolicy {
    /// Fail the whole group with `UnknownMember`
    #[default]
    Reject,

    /// Apply the share effect, skip the payer credit and log a warning
    Skip,
}

/// Folds transactions into per-member balances
#[derive(Debug, Clone, Copy, Default)]
pub struct BalanceAggregator {
    payer_policy: PayerPolicy,
}

impl BalanceAggregator {
    /// Create an aggregator with the given unknown-payer policy
    pub fn new(payer_policy: PayerPolicy) -> Self {
        Self { payer_policy }
    }

    /// Compute the balance of every member of a group
    ///
    /// # Arguments
    ///
    /// * `group` - Group label, used for error context and logging only
    /// * `members` - Group members, in the order balances should be returned
    /// * `transactions` - Transactions already filtered to the group and period
    ///
    /// # Returns
    ///
    /// One `Balance` per member, in `members` order, with unrounded values.
    ///
    /// # Errors
    ///
    /// - `DegenerateInput` if `members` is empty
    /// - `DuplicateMember` if a member id appears twice
    /// - `UnknownMember` / `MissingPayer` for an expense without a resolvable
    ///   payer under [`PayerPolicy::Reject`]
    /// - `ArithmeticOverflow` if a running total leaves the decimal range
    pub fn aggregate(
        &self,
        group: &str,
        members: &[Member],
        transactions: &[Transaction],
    ) -> Result<Vec<Balance>, LedgerError> {
        if members.is_empty() {
            return Err(LedgerError::degenerate_input(group, "group has no members"));
        }

        let mut index: HashMap<&str, usize> = HashMap::with_capacity(members.len());
        for (position, member) in members.iter().enumerate() {
            if index.insert(member.id.as_str(), position).is_some() {
                return Err(LedgerError::duplicate_member(&member.id, group));
            }
        }

        let member_count = Decimal::from(members.len());
        let mut paid = vec![Decimal::ZERO; members.len()];
        let mut share = Decimal::ZERO;

        for transaction in transactions {
            let share_per_person = transaction
                .amount
                .checked_div(member_count)
                .ok_or_else(|| LedgerError::arithmetic_overflow("share", group))?;

            match transaction.kind {
                TransactionKind::Expense => {
                    if let Some(position) = self.resolve_payer(group, &index, transaction)? {
                        paid[position] = paid[position]
                            .checked_add(transaction.amount)
                            .ok_or_else(|| LedgerError::arithmetic_overflow("paid", group))?;
                    }
                    share = share
                        .checked_add(share_per_person)
                        .ok_or_else(|| LedgerError::arithmetic_overflow("share", group))?;
                }
                TransactionKind::Income => {
                    share = share
                        .checked_sub(share_per_person)
                        .ok_or_else(|| LedgerError::arithmetic_overflow("share", group))?;
                }
            }
        }

        members
            .iter()
            .zip(paid)
            .map(|(member, paid)| {
                let balance = paid
                    .checked_sub(share)
                    .ok_or_else(|| LedgerError::arithmetic_overflow("balance", group))?;
                Ok(Balance {
                    id: member.id.clone(),
                    paid,
                    share,
                    balance,
                })
            })
            .collect()
    }

    /// Find the member credited for an expense
    ///
    /// Returns `Ok(None)` when the payer cannot be resolved and the policy
    /// allows skipping the credit.
    fn resolve_payer(
        &self,
        group: &str,
        index: &HashMap<&str, usize>,
        transaction: &Transaction,
    ) -> Result<Option<usize>, LedgerError> {
        let resolved = match transaction.paid_by.as_deref() {
            Some(payer) => index
                .get(payer)
                .copied()
                .ok_or_else(|| LedgerError::unknown_member(payer, group)),
            None => Err(LedgerError::missing_payer(group)),
        };

        match (resolved, self.payer_policy) {
            (Ok(position), _) => Ok(Some(position)),
            (Err(e), PayerPolicy::Reject) => Err(e),
            (Err(e), PayerPolicy::Skip) => {
                tracing::warn!(group, amount = %transaction.amount, "skipping payer credit: {e}");
                Ok(None)
            }
        }
    }
}
