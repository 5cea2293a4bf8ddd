//! Per-member balance derived by the aggregator

use super::member::MemberId;
use rust_decimal::{Decimal, RoundingStrategy};

/// Net financial position of one member
///
/// Values are unrounded; rounding happens only when building a report.
#[derive(Debug, Clone, PartialEq)]
pub struct Balance {
    /// Member the balance belongs to
    pub id: MemberId,

    /// Sum of the expenses this member paid
    pub paid: Decimal,

    /// This member's portion of shared costs (reduced by incomes)
    pub share: Decimal,

    /// `paid - share`
    ///
    /// Positive: the group owes this member. Negative: this member owes the group.
    pub balance: Decimal,
}

/// Round a money value to two decimal places for display
///
/// Midpoints round away from zero. A result of zero is normalised so a tiny
/// negative residue never prints as `-0.00`.
pub fn round2(value: Decimal) -> Decimal {
    let rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    if rounded.is_zero() {
        Decimal::new(0, 2)
    } else {
        rounded
    }
}
