//! Types module
//!
//! Contains core data structures used throughout the application.
//! This module organizes types into logical submodules:
//! - `member`: Group members and membership records
//! - `transaction`: Transaction kinds, records and accounting periods
//! - `balance`: Per-member balances and display rounding
//! - `settlement`: Payment instructions produced by the optimizer
//! - `report`: Rounded, display-ready group reports
//! - `error`: Error types for the split ledger

pub mod balance;
pub mod error;
pub mod member;
pub mod report;
pub mod settlement;
pub mod transaction;

pub use balance::{round2, Balance};
pub use error::LedgerError;
pub use member::{Member, MemberId, MemberRecord};
pub use report::{GroupReport, GroupSummary, MemberRef, SettlementView, UserBalance};
pub use settlement::Settlement;
pub use transaction::{GroupId, Period, Transaction, TransactionKind, TransactionRecord};
