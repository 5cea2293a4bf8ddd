//! Settlement instruction produced by the optimizer

use super::member::MemberId;
use rust_decimal::Decimal;

/// A directed payment that reduces outstanding balances
///
/// `from` always had a negative balance and `to` a positive one. `amount` is
/// rounded to two decimals and strictly positive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settlement {
    /// Paying (debtor) member
    pub from: MemberId,

    /// Receiving (creditor) member
    pub to: MemberId,

    /// Amount to transfer
    pub amount: Decimal,
}
