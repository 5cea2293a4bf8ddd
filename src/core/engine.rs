//! Settlement engine
//!
//! This module provides the `SettlementEngine` that turns a group's ledger into
//! a display-ready [`GroupReport`] by coordinating the `BalanceAggregator` and
//! the `SettlementOptimizer`.
//!
//! The engine enforces the following rules:
//! - Balances are computed and settled unrounded; rounding happens only when
//!   the report is built
//! - Balances that drift away from the unattributed income by more than
//!   [`BALANCE_SUM_TOLERANCE`] are logged, never corrected
//! - A failing group is reported and skipped without affecting other groups

use crate::core::aggregator::{BalanceAggregator, PayerPolicy};
use crate::core::ledger_book::GroupLedger;
use crate::core::optimizer::SettlementOptimizer;
use crate::core::traits::LedgerStore;
use crate::types::{
    round2, Balance, GroupReport, GroupSummary, LedgerError, Member, MemberRef, Settlement,
    SettlementView, Transaction, TransactionKind, UserBalance,
};
use rust_decimal::Decimal;
use std::collections::HashMap;

/// Largest tolerated gap between the balance sum and the total income
pub const BALANCE_SUM_TOLERANCE: Decimal = Decimal::ONE;

/// Group settlement engine
///
/// Stateless apart from its configuration, so a single engine can be shared
/// across tasks.
#[derive(Debug, Clone, Copy, Default)]
pub struct SettlementEngine {
    aggregator: BalanceAggregator,
    optimizer: SettlementOptimizer,
}

impl SettlementEngine {
    /// Create an engine with the given unknown-payer policy
    pub fn new(payer_policy: PayerPolicy) -> Self {
        SettlementEngine {
            aggregator: BalanceAggregator::new(payer_policy),
            optimizer: SettlementOptimizer::default(),
        }
    }

    /// Settle a single group
    ///
    /// # Arguments
    ///
    /// * `group` - Group id, copied into the report
    /// * `ledger` - Members and transactions of the group, already filtered to
    ///   the requested period
    ///
    /// # Returns
    ///
    /// * `Ok(GroupReport)` with rounded balances, settlements and summary
    /// * `Err(LedgerError)` if the balances could not be computed
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The group has no members
    /// - A member id is repeated
    /// - An expense payer cannot be resolved under [`PayerPolicy::Reject`]
    /// - A total leaves the decimal range
    pub fn settle_group(&self, group: &str, ledger: &GroupLedger) -> Result<GroupReport, LedgerError> {
        let balances = self
            .aggregator
            .aggregate(group, &ledger.members, &ledger.transactions)?;
        let summary = summarize(group, &ledger.transactions)?;

        if let Some(drift) = balance_drift(&balances, summary.total_income) {
            tracing::warn!(
                group,
                drift = %round2(drift),
                total_income = %summary.total_income,
                "balances do not sum to the group income"
            );
        }

        let settlements = self.optimizer.settle(&balances);

        tracing::debug!(
            group,
            members = ledger.members.len(),
            transactions = ledger.transactions.len(),
            settlements = settlements.len(),
            "settled group"
        );

        build_report(group, &ledger.members, &balances, &settlements, summary)
    }

    /// Settle every group in a store
    ///
    /// Groups that fail are logged and left out of the result. Reports are
    /// returned in group id order.
    pub fn settle_all<S>(&self, store: &S) -> Vec<GroupReport>
    where
        S: LedgerStore + ?Sized,
    {
        store
            .groups()
            .into_iter()
            .filter_map(|(group, ledger)| match self.settle_group(&group, &ledger) {
                Ok(report) => Some(report),
                Err(e) => {
                    tracing::error!(group = %group, "skipping group: {e}");
                    None
                }
            })
            .collect()
    }
}

/// Totals over the transactions of a group, rounded for display
fn summarize(group: &str, transactions: &[Transaction]) -> Result<GroupSummary, LedgerError> {
    let mut total_expense = Decimal::ZERO;
    let mut total_income = Decimal::ZERO;

    for transaction in transactions {
        let total = match transaction.kind {
            TransactionKind::Expense => &mut total_expense,
            TransactionKind::Income => &mut total_income,
        };
        *total = total
            .checked_add(transaction.amount)
            .ok_or_else(|| LedgerError::arithmetic_overflow("summary", group))?;
    }

    let net_amount = total_expense
        .checked_sub(total_income)
        .ok_or_else(|| LedgerError::arithmetic_overflow("summary", group))?;

    Ok(GroupSummary {
        total_expense: round2(total_expense),
        total_income: round2(total_income),
        net_amount: round2(net_amount),
        count: transactions.len(),
    })
}

/// Gap between the balance sum and the income nobody was credited for
///
/// Expenses cancel out across members; every income lowers all shares
/// without crediting anyone, so the balances should sum to total income.
/// Returns the gap only when it exceeds [`BALANCE_SUM_TOLERANCE`].
fn balance_drift(balances: &[Balance], total_income: Decimal) -> Option<Decimal> {
    let sum: Decimal = balances.iter().map(|b| b.balance).sum();
    let drift = (sum - total_income).abs();
    (drift > BALANCE_SUM_TOLERANCE).then_some(drift)
}

fn build_report(
    group: &str,
    members: &[Member],
    balances: &[Balance],
    settlements: &[Settlement],
    summary: GroupSummary,
) -> Result<GroupReport, LedgerError> {
    let by_id: HashMap<&str, &Member> = members.iter().map(|m| (m.id.as_str(), m)).collect();
    let lookup = |id: &str| {
        by_id
            .get(id)
            .copied()
            .ok_or_else(|| LedgerError::unknown_member(id, group))
    };

    let user_balances = balances
        .iter()
        .map(|balance| {
            let member = lookup(&balance.id)?;
            Ok(UserBalance {
                user_id: member.id.clone(),
                name: member.name.clone(),
                email: member.email.clone(),
                avatar: member.avatar.clone(),
                paid: round2(balance.paid),
                share: round2(balance.share),
                balance: round2(balance.balance),
            })
        })
        .collect::<Result<Vec<_>, LedgerError>>()?;

    let settlements = settlements
        .iter()
        .map(|settlement| {
            Ok(SettlementView {
                from: MemberRef::from(lookup(&settlement.from)?),
                to: MemberRef::from(lookup(&settlement.to)?),
                amount: settlement.amount,
            })
        })
        .collect::<Result<Vec<_>, LedgerError>>()?;

    Ok(GroupReport {
        group: group.to_string(),
        user_balances,
        settlements,
        summary,
    })
}
