//! Settlement optimization
//!
//! Turns per-member net balances into a short list of directed payments that
//! zeroes every balance, using greedy largest-first matching:
//!
//! 1. Members with `balance > ε` are creditors, members with `balance < -ε`
//!    are debtors (tracked by the magnitude of their debt)
//! 2. Both lists are sorted by amount, largest first; ties keep input order
//! 3. The largest remaining debtor pays the largest remaining creditor
//!    `min(credit, debt)`; whichever side is exhausted advances
//!
//! Each step exhausts at least one party, so `N` unsettled members need at
//! most `N - 1` payments. Greedy matching is not a proven minimum for every
//! distribution, but it is deterministic and optimal for the common shapes.

use crate::types::{round2, Balance, Settlement};
use rust_decimal::Decimal;

/// Balances at or below this magnitude count as settled (0.01)
pub const SETTLEMENT_EPSILON: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// Remaining amount for one side of the matching
#[derive(Debug)]
struct Position<'a> {
    id: &'a str,
    remaining: Decimal,
}

/// Computes settlement payments from net balances
#[derive(Debug, Clone, Copy)]
pub struct SettlementOptimizer {
    epsilon: Decimal,
}

impl Default for SettlementOptimizer {
    fn default() -> Self {
        Self {
            epsilon: SETTLEMENT_EPSILON,
        }
    }
}

impl SettlementOptimizer {
    /// Compute the payments that settle all balances
    ///
    /// Balances are expected to sum to zero but this is not enforced. When
    /// they don't, the surplus side is left partly unmatched.
    ///
    /// # Arguments
    ///
    /// * `balances` - Unrounded net balances, in a stable order
    ///
    /// # Returns
    ///
    /// Settlements in emission order. Every amount is rounded to two decimals
    /// and strictly positive, and no settlement pays a member to itself.
    pub fn settle(&self, balances: &[Balance]) -> Vec<Settlement> {
        let epsilon = self.epsilon;

        let mut creditors: Vec<Position<'_>> = balances
            .iter()
            .filter(|b| b.balance > epsilon)
            .map(|b| Position {
                id: &b.id,
                remaining: b.balance,
            })
            .collect();

        let mut debtors: Vec<Position<'_>> = balances
            .iter()
            .filter(|b| b.balance < -epsilon)
            .map(|b| Position {
                id: &b.id,
                remaining: b.balance.abs(),
            })
            .collect();

        // sort_by is stable: equal amounts keep input order
        creditors.sort_by(|a, b| b.remaining.cmp(&a.remaining));
        debtors.sort_by(|a, b| b.remaining.cmp(&a.remaining));

        let mut settlements = Vec::with_capacity(creditors.len() + debtors.len());
        let (mut i, mut j) = (0, 0);

        while i < creditors.len() && j < debtors.len() {
            let amount = creditors[i].remaining.min(debtors[j].remaining);

            if amount > epsilon {
                let rounded = round2(amount);
                if !rounded.is_zero() {
                    settlements.push(Settlement {
                        from: debtors[j].id.to_string(),
                        to: creditors[i].id.to_string(),
                        amount: rounded,
                    });
                }
            }

            creditors[i].remaining -= amount;
            debtors[j].remaining -= amount;

            if creditors[i].remaining <= epsilon {
                i += 1;
            }
            if debtors[j].remaining <= epsilon {
                j += 1;
            }
        }

        settlements
    }
}
