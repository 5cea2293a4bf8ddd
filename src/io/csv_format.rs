//! CSV format handling for ledger input and report output
//!
//! This module centralizes all format concerns, providing:
//! - Row structures for deserializing the members and transactions files
//! - Conversion from rows to domain records
//! - Report serialization as JSON or as CSV tables
//!
//! All functions are pure (no file handling) for easy testing.

use crate::types::{
    GroupReport, LedgerError, Member, MemberRecord, Period, Transaction, TransactionKind,
    TransactionRecord,
};
use clap::ValueEnum;
use csv::WriterBuilder;
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::str::FromStr;

/// Report output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// `{"groups": [...]}`, pretty-printed
    #[default]
    Json,

    /// Balances table, blank line, settlements table
    Csv,
}

/// A CSV row that converts into a domain record
///
/// Implemented by both input row types so the readers can stay generic.
pub trait LedgerRow: DeserializeOwned {
    /// Domain record produced by the conversion
    type Record;

    /// Validate the row and convert it
    fn convert(self) -> Result<Self::Record, LedgerError>;
}

/// Row of the members file
///
/// Columns: group, id, name, email, avatar. Email and avatar may be empty.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct MemberCsvRecord {
    pub group: String,
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub avatar: Option<String>,
}

/// Row of the transactions file
///
/// Columns: group, type, amount, paid_by, month, year. The payer is only
/// meaningful for expenses; month and year are optional.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct TransactionCsvRecord {
    pub group: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub amount: Option<String>,
    #[serde(default)]
    pub paid_by: Option<String>,
    #[serde(default)]
    pub month: Option<String>,
    #[serde(default)]
    pub year: Option<String>,
}

impl LedgerRow for MemberCsvRecord {
    type Record = MemberRecord;

    fn convert(self) -> Result<MemberRecord, LedgerError> {
        convert_member_record(self)
    }
}

impl LedgerRow for TransactionCsvRecord {
    type Record = TransactionRecord;

    fn convert(self) -> Result<TransactionRecord, LedgerError> {
        convert_transaction_record(self)
    }
}

/// Trimmed field value, `None` when absent or blank
fn non_blank(field: Option<String>) -> Option<String> {
    field
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn required(value: &str, column: &str) -> Result<String, LedgerError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(LedgerError::ParseError {
            line: None,
            message: format!("missing {column}"),
        });
    }
    Ok(value.to_string())
}

/// Convert a members row to a `MemberRecord`
///
/// A blank name falls back to the member id so reports always have a label.
pub fn convert_member_record(csv_record: MemberCsvRecord) -> Result<MemberRecord, LedgerError> {
    let group = required(&csv_record.group, "group")?;
    let id = required(&csv_record.id, "member id")?;
    let name = non_blank(csv_record.name).unwrap_or_else(|| id.clone());

    Ok(MemberRecord {
        group,
        member: Member {
            id,
            name,
            email: non_blank(csv_record.email).unwrap_or_default(),
            avatar: non_blank(csv_record.avatar).unwrap_or_default(),
        },
    })
}

/// Convert a transactions row to a `TransactionRecord`
///
/// This function:
/// - Parses the type case-insensitively into a `TransactionKind`
/// - Parses the amount and checks it is strictly positive
/// - Requires a payer for expenses and drops it for income
/// - Parses the optional month/year pair
///
/// # Errors
///
/// `InvalidTransactionType`, `InvalidAmount`, `MissingPayer`, `InvalidPeriod`,
/// or `ParseError` for a blank group.
pub fn convert_transaction_record(
    csv_record: TransactionCsvRecord,
) -> Result<TransactionRecord, LedgerError> {
    let group = required(&csv_record.group, "group")?;

    let kind = match csv_record.kind.trim().to_lowercase().as_str() {
        "expense" => TransactionKind::Expense,
        "income" => TransactionKind::Income,
        _ => return Err(LedgerError::invalid_transaction_type(&csv_record.kind, &group)),
    };

    let amount_text = non_blank(csv_record.amount).unwrap_or_default();
    let amount = Decimal::from_str(&amount_text)
        .ok()
        .filter(|amount| amount.is_sign_positive() && !amount.is_zero())
        .ok_or_else(|| LedgerError::invalid_amount(&amount_text, &group))?;

    let paid_by = match kind {
        TransactionKind::Expense => Some(
            non_blank(csv_record.paid_by).ok_or_else(|| LedgerError::missing_payer(&group))?,
        ),
        TransactionKind::Income => None,
    };

    let period = parse_period(non_blank(csv_record.month), non_blank(csv_record.year))?;

    Ok(TransactionRecord {
        group,
        transaction: Transaction {
            amount,
            kind,
            paid_by,
        },
        period,
    })
}

/// Parse an optional month/year pair
///
/// Non-numeric values are an `InvalidPeriod` carrying the raw text; the
/// numbers are then validated by [`Period::from_parts`].
pub fn parse_period(month: Option<String>, year: Option<String>) -> Result<Option<Period>, LedgerError> {
    let invalid = || {
        LedgerError::invalid_period(format!(
            "{}/{}",
            month.as_deref().unwrap_or("?"),
            year.as_deref().unwrap_or("?")
        ))
    };
    let month_value = month
        .as_deref()
        .map(str::parse::<u8>)
        .transpose()
        .map_err(|_| invalid())?;
    let year_value = year
        .as_deref()
        .map(str::parse::<i32>)
        .transpose()
        .map_err(|_| invalid())?;

    Period::from_parts(month_value, year_value)
}

#[derive(Serialize)]
struct ReportDocument<'a> {
    groups: &'a [GroupReport],
}

/// Write reports in the requested format
pub fn write_reports(
    reports: &[GroupReport],
    format: OutputFormat,
    output: &mut dyn Write,
) -> Result<(), LedgerError> {
    match format {
        OutputFormat::Json => write_reports_json(reports, output),
        OutputFormat::Csv => write_reports_csv(reports, output),
    }
}

/// Write reports as a pretty-printed JSON document `{"groups": [...]}`
pub fn write_reports_json(reports: &[GroupReport], output: &mut dyn Write) -> Result<(), LedgerError> {
    serde_json::to_writer_pretty(&mut *output, &ReportDocument { groups: reports })?;
    writeln!(output)?;
    output.flush()?;
    Ok(())
}

fn write_error(e: csv::Error) -> LedgerError {
    LedgerError::IoError {
        message: format!("Failed to write CSV record: {e}"),
    }
}

/// Write reports as two CSV tables
///
/// The balances table comes first, followed by a blank line and the
/// settlements table. Rows follow report order; money uses two decimals.
pub fn write_reports_csv(reports: &[GroupReport], output: &mut dyn Write) -> Result<(), LedgerError> {
    {
        let mut writer = WriterBuilder::new().from_writer(&mut *output);
        writer
            .write_record([
                "group", "user_id", "name", "email", "avatar", "paid", "share", "balance",
            ])
            .map_err(write_error)?;

        for report in reports {
            for balance in &report.user_balances {
                writer
                    .write_record(&[
                        report.group.clone(),
                        balance.user_id.clone(),
                        balance.name.clone(),
                        balance.email.clone(),
                        balance.avatar.clone(),
                        format!("{:.2}", balance.paid),
                        format!("{:.2}", balance.share),
                        format!("{:.2}", balance.balance),
                    ])
                    .map_err(write_error)?;
            }
        }
        writer.flush()?;
    }

    writeln!(output)?;

    {
        let mut writer = WriterBuilder::new().from_writer(&mut *output);
        writer
            .write_record([
                "group",
                "from_id",
                "from_name",
                "from_avatar",
                "to_id",
                "to_name",
                "to_avatar",
                "amount",
            ])
            .map_err(write_error)?;

        for report in reports {
            for settlement in &report.settlements {
                writer
                    .write_record(&[
                        report.group.clone(),
                        settlement.from.user_id.clone(),
                        settlement.from.name.clone(),
                        settlement.from.avatar.clone(),
                        settlement.to.user_id.clone(),
                        settlement.to.name.clone(),
                        settlement.to.avatar.clone(),
                        format!("{:.2}", settlement.amount),
                    ])
                    .map_err(write_error)?;
            }
        }
        writer.flush()?;
    }

    output.flush()?;
    Ok(())
}
