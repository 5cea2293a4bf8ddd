//! Error types for the split ledger
//!
//! This module defines all error types that can occur while reading ledger
//! input, computing balances and writing reports. Errors are designed to be
//! descriptive and user-friendly for CLI output.
//!
//! # Error Categories
//!
//! - **File I/O Errors**: File not found, permission denied, output failures
//! - **CSV Parsing Errors**: Malformed CSV, invalid kinds, amounts or periods
//! - **Engine Errors**: Degenerate groups, unknown payers, duplicate members

use super::member::MemberId;
use super::transaction::GroupId;
use std::io::ErrorKind;
use std::path::Path;
use thiserror::Error;

/// Main error type for the split ledger
///
/// Record-level errors (parsing, conversion, duplicate members) are logged and
/// the record is skipped. Group-level errors (degenerate input, unknown payer)
/// skip the affected group only. Everything else aborts the run.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LedgerError {
    /// File not found at the specified path
    ///
    /// This is a fatal error that prevents processing from starting.
    #[error("File not found: {path}")]
    FileNotFound {
        /// The path that was not found
        path: String,
    },

    /// I/O error occurred while reading or writing files
    #[error("I/O error: {message}")]
    IoError {
        /// Description of the I/O error
        message: String,
    },

    /// CSV parsing error occurred
    ///
    /// This is a recoverable error - the malformed record is skipped
    /// and processing continues with the next record.
    #[error("CSV parse error{}: {message}", line.map(|l| format!(" at line {}", l)).unwrap_or_default())]
    ParseError {
        /// Line number where the error occurred (if available)
        line: Option<u64>,
        /// Description of the parsing error
        message: String,
    },

    /// Transaction kind other than EXPENSE or INCOME
    #[error("Invalid transaction type '{kind}' in group {group}")]
    InvalidTransactionType {
        /// The invalid type string
        kind: String,
        /// Group the record was tagged with
        group: GroupId,
    },

    /// Amount missing, malformed, or not strictly positive
    #[error("Invalid amount '{amount}' in group {group}")]
    InvalidAmount {
        /// The invalid amount string
        amount: String,
        /// Group the record was tagged with
        group: GroupId,
    },

    /// Expense without a paying member
    #[error("Expense in group {group} requires a payer")]
    MissingPayer {
        /// Group the record was tagged with
        group: GroupId,
    },

    /// Month outside 1-12, or only one of month/year given
    #[error("Invalid period '{period}'")]
    InvalidPeriod {
        /// The offending month/year text
        period: String,
    },

    /// Input that would make balances meaningless (e.g. a group without members)
    #[error("Degenerate input for group {group}: {reason}")]
    DegenerateInput {
        /// Affected group
        group: GroupId,
        /// Why the input cannot be settled
        reason: String,
    },

    /// A transaction names a payer who is not a member of the group
    #[error("Unknown member '{member}' in group {group}")]
    UnknownMember {
        /// The payer reference that did not resolve
        member: MemberId,
        /// Affected group
        group: GroupId,
    },

    /// The same member id appears twice in a group
    #[error("Duplicate member '{member}' in group {group}")]
    DuplicateMember {
        /// Repeated member id
        member: MemberId,
        /// Affected group
        group: GroupId,
    },

    /// Arithmetic overflow while accumulating balances
    ///
    /// The affected group is skipped to keep its report trustworthy.
    #[error("Arithmetic overflow in {operation} for group {group}")]
    ArithmeticOverflow {
        /// Operation that would overflow
        operation: String,
        /// Affected group
        group: GroupId,
    },

    /// Failure of the async runtime or of a worker task
    #[error("Runtime error: {message}")]
    Runtime {
        /// Description of the failure
        message: String,
    },
}

// Conversion from io::Error to LedgerError
impl From<std::io::Error> for LedgerError {
    fn from(error: std::io::Error) -> Self {
        LedgerError::IoError {
            message: error.to_string(),
        }
    }
}

// Conversion from csv::Error to LedgerError
impl From<csv::Error> for LedgerError {
    fn from(error: csv::Error) -> Self {
        let line = error.position().map(|pos| pos.line());

        LedgerError::ParseError {
            line,
            message: error.to_string(),
        }
    }
}

impl From<serde_json::Error> for LedgerError {
    fn from(error: serde_json::Error) -> Self {
        LedgerError::IoError {
            message: error.to_string(),
        }
    }
}

// Helper functions for creating common errors

impl LedgerError {
    /// Create a DegenerateInput error
    pub fn degenerate_input(group: &str, reason: &str) -> Self {
        LedgerError::DegenerateInput {
            group: group.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Create an UnknownMember error
    pub fn unknown_member(member: &str, group: &str) -> Self {
        LedgerError::UnknownMember {
            member: member.to_string(),
            group: group.to_string(),
        }
    }

    /// Create a DuplicateMember error
    pub fn duplicate_member(member: &str, group: &str) -> Self {
        LedgerError::DuplicateMember {
            member: member.to_string(),
            group: group.to_string(),
        }
    }

    /// Create an ArithmeticOverflow error
    pub fn arithmetic_overflow(operation: &str, group: &str) -> Self {
        LedgerError::ArithmeticOverflow {
            operation: operation.to_string(),
            group: group.to_string(),
        }
    }

    /// Create an InvalidAmount error
    pub fn invalid_amount(amount: &str, group: &str) -> Self {
        LedgerError::InvalidAmount {
            amount: amount.to_string(),
            group: group.to_string(),
        }
    }

    /// Create an InvalidTransactionType error
    pub fn invalid_transaction_type(kind: &str, group: &str) -> Self {
        LedgerError::InvalidTransactionType {
            kind: kind.to_string(),
            group: group.to_string(),
        }
    }

    /// Create a MissingPayer error
    pub fn missing_payer(group: &str) -> Self {
        LedgerError::MissingPayer {
            group: group.to_string(),
        }
    }

    /// Create an InvalidPeriod error
    pub fn invalid_period(period: impl Into<String>) -> Self {
        LedgerError::InvalidPeriod {
            period: period.into(),
        }
    }

    /// Map a failure to open an input file
    ///
    /// A missing file becomes `FileNotFound`; anything else is an `IoError`
    /// naming the path.
    pub fn open_failed(path: &Path, error: std::io::Error) -> Self {
        match error.kind() {
            ErrorKind::NotFound => LedgerError::FileNotFound {
                path: path.display().to_string(),
            },
            _ => LedgerError::IoError {
                message: format!("Failed to open file '{}': {}", path.display(), error),
            },
        }
    }

    /// Attach a CSV line number to a record conversion error
    pub fn at_line(self, line: u64) -> Self {
        match self {
            LedgerError::ParseError { line: None, message } => LedgerError::ParseError {
                line: Some(line),
                message,
            },
            LedgerError::ParseError { .. } => self,
            other => LedgerError::ParseError {
                line: Some(line),
                message: other.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::file_not_found(
        LedgerError::FileNotFound { path: "members.csv".to_string() },
        "File not found: members.csv"
    )]
    #[case::io_error(
        LedgerError::IoError { message: "Permission denied".to_string() },
        "I/O error: Permission denied"
    )]
    #[case::parse_error_with_line(
        LedgerError::ParseError { line: Some(42), message: "Invalid field".to_string() },
        "CSV parse error at line 42: Invalid field"
    )]
    #[case::parse_error_without_line(
        LedgerError::ParseError { line: None, message: "Invalid field".to_string() },
        "CSV parse error: Invalid field"
    )]
    #[case::invalid_transaction_type(
        LedgerError::InvalidTransactionType { kind: "refund".to_string(), group: "trip".to_string() },
        "Invalid transaction type 'refund' in group trip"
    )]
    #[case::invalid_amount(
        LedgerError::InvalidAmount { amount: "-5".to_string(), group: "trip".to_string() },
        "Invalid amount '-5' in group trip"
    )]
    #[case::missing_payer(
        LedgerError::MissingPayer { group: "trip".to_string() },
        "Expense in group trip requires a payer"
    )]
    #[case::degenerate_input(
        LedgerError::DegenerateInput { group: "trip".to_string(), reason: "group has no members".to_string() },
        "Degenerate input for group trip: group has no members"
    )]
    #[case::unknown_member(
        LedgerError::UnknownMember { member: "zoe".to_string(), group: "trip".to_string() },
        "Unknown member 'zoe' in group trip"
    )]
    #[case::duplicate_member(
        LedgerError::DuplicateMember { member: "bob".to_string(), group: "flat".to_string() },
        "Duplicate member 'bob' in group flat"
    )]
    #[case::arithmetic_overflow(
        LedgerError::ArithmeticOverflow { operation: "share".to_string(), group: "trip".to_string() },
        "Arithmetic overflow in share for group trip"
    )]
    #[case::invalid_period(
        LedgerError::InvalidPeriod { period: "13/2024".to_string() },
        "Invalid period '13/2024'"
    )]
    fn test_error_display(#[case] error: LedgerError, #[case] expected: &str) {
        assert_eq!(error.to_string(), expected);
    }

    #[rstest]
    #[case::degenerate_input(
        LedgerError::degenerate_input("trip", "group has no members"),
        LedgerError::DegenerateInput { group: "trip".to_string(), reason: "group has no members".to_string() }
    )]
    #[case::unknown_member(
        LedgerError::unknown_member("zoe", "trip"),
        LedgerError::UnknownMember { member: "zoe".to_string(), group: "trip".to_string() }
    )]
    #[case::duplicate_member(
        LedgerError::duplicate_member("bob", "flat"),
        LedgerError::DuplicateMember { member: "bob".to_string(), group: "flat".to_string() }
    )]
    #[case::missing_payer(
        LedgerError::missing_payer("trip"),
        LedgerError::MissingPayer { group: "trip".to_string() }
    )]
    fn test_helper_functions(#[case] result: LedgerError, #[case] expected: LedgerError) {
        assert_eq!(result, expected);
    }

    #[test]
    fn test_at_line_wraps_conversion_errors() {
        let error = LedgerError::missing_payer("trip").at_line(7);
        assert_eq!(
            error.to_string(),
            "CSV parse error at line 7: Expense in group trip requires a payer"
        );
    }

    #[test]
    fn test_at_line_keeps_existing_line() {
        let error = LedgerError::ParseError {
            line: Some(3),
            message: "bad".to_string(),
        };
        assert_eq!(error.clone().at_line(9), error);
    }

    #[test]
    fn test_open_failed_missing_file() {
        let error = LedgerError::open_failed(
            Path::new("members.csv"),
            std::io::Error::new(ErrorKind::NotFound, "gone"),
        );
        assert_eq!(
            error,
            LedgerError::FileNotFound {
                path: "members.csv".to_string()
            }
        );
    }

    #[test]
    fn test_open_failed_other_io_error() {
        let error = LedgerError::open_failed(
            Path::new("members.csv"),
            std::io::Error::new(ErrorKind::PermissionDenied, "Permission denied"),
        );
        assert_eq!(
            error.to_string(),
            "I/O error: Failed to open file 'members.csv': Permission denied"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error =
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "Permission denied");
        let error: LedgerError = io_error.into();
        assert!(matches!(error, LedgerError::IoError { .. }));
        assert_eq!(error.to_string(), "I/O error: Permission denied");
    }
}
