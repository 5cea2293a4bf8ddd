//! Transaction-related types for the split ledger
//!
//! This module defines the shared transaction kinds, the engine-facing
//! [`Transaction`] value and the [`TransactionRecord`] produced by the CSV
//! collaborator (a transaction tagged with its group and accounting period).

use super::error::LedgerError;
use super::member::MemberId;
use rust_decimal::Decimal;
use std::fmt;

/// Group identifier
///
/// Opaque string supplied by the collaborator; groups are compared by exact match.
pub type GroupId = String;

/// Kinds of shared transactions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionKind {
    /// An amount paid by one member and split equally across all members
    ///
    /// Credits the payer's `paid` and adds `amount / member_count` to every
    /// member's `share`.
    Expense,

    /// An amount received by the group as a whole
    ///
    /// Subtracts `amount / member_count` from every member's `share`. Income
    /// has no payer semantics and never touches `paid`.
    Income,
}

/// A single shared transaction as seen by the balance aggregator
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    /// Positive amount in currency-agnostic units
    pub amount: Decimal,

    /// Expense or income
    pub kind: TransactionKind,

    /// Paying member, required for expenses and ignored for income
    pub paid_by: Option<MemberId>,
}

impl Transaction {
    /// Create an expense paid by `paid_by`
    pub fn expense(amount: Decimal, paid_by: impl Into<MemberId>) -> Self {
        Transaction {
            amount,
            kind: TransactionKind::Expense,
            paid_by: Some(paid_by.into()),
        }
    }

    /// Create a group income
    pub fn income(amount: Decimal) -> Self {
        Transaction {
            amount,
            kind: TransactionKind::Income,
            paid_by: None,
        }
    }
}

/// Calendar month window used to filter transactions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Period {
    /// Month of the year (1-12)
    pub month: u8,

    /// Calendar year
    pub year: i32,
}

impl Period {
    /// Build a period window from an optional month and year
    ///
    /// Both absent gives `None`.
    ///
    /// # Errors
    ///
    /// `InvalidPeriod` if only one of month and year is given, or the month
    /// is outside 1-12.
    pub fn from_parts(month: Option<u8>, year: Option<i32>) -> Result<Option<Period>, LedgerError> {
        match (month, year) {
            (None, None) => Ok(None),
            (Some(month), Some(year)) if (1..=12).contains(&month) => {
                Ok(Some(Period { month, year }))
            }
            (Some(month), Some(year)) => Err(LedgerError::invalid_period(format!("{month}/{year}"))),
            (Some(month), None) => Err(LedgerError::invalid_period(format!("{month}/?"))),
            (None, Some(year)) => Err(LedgerError::invalid_period(format!("?/{year}"))),
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// Transaction record read from the collaborator's CSV input
///
/// Carries the group the transaction belongs to and, when known, the
/// accounting period used for month/year filtering.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionRecord {
    /// Group the transaction was recorded in
    pub group: GroupId,

    /// The transaction itself
    pub transaction: Transaction,

    /// Accounting period, if the record carried month and year
    pub period: Option<Period>,
}

impl TransactionRecord {
    /// Whether this record falls inside the requested period window
    ///
    /// No window means every record matches. Records without a period never
    /// match an explicit window.
    pub fn in_period(&self, window: Option<Period>) -> bool {
        match window {
            None => true,
            Some(window) => self.period == Some(window),
        }
    }
}
