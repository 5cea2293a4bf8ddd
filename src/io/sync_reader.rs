//! Synchronous CSV reader with iterator interface
//!
//! Provides a streaming iterator over ledger records from a CSV file.
//! Delegates row formats and validation to the csv_format module.
//!
//! # Design
//!
//! The SyncReader is generic over the row type ([`LedgerRow`]), so the same
//! reader serves both the members file and the transactions file. Rows are
//! deserialized one at a time without loading the file into memory.
//!
//! ```no_run
//! use split_ledger::io::csv_format::TransactionCsvRecord;
//! use split_ledger::io::sync_reader::SyncReader;
//! use std::path::Path;
//!
//! let reader = SyncReader::<TransactionCsvRecord>::open(Path::new("transactions.csv")).unwrap();
//! for result in reader {
//!     match result {
//!         Ok(record) => println!("{} {}", record.group, record.transaction.amount),
//!         Err(e) => eprintln!("Error: {}", e),
//!     }
//! }
//! ```
//!
//! # Error Handling
//!
//! - Fatal errors (file not found, I/O errors) are returned from `open()`
//! - Individual record errors are yielded as Err variants carrying the line number

use crate::io::csv_format::LedgerRow;
use crate::types::LedgerError;
use csv::{ReaderBuilder, Trim};
use std::fs::File;
use std::marker::PhantomData;
use std::path::Path;

/// Synchronous CSV reader
///
/// Yields `Result<T::Record, LedgerError>` for every data row.
#[derive(Debug)]
pub struct SyncReader<T> {
    reader: csv::Reader<File>,
    line_num: u64,
    _row: PhantomData<T>,
}

impl<T: LedgerRow> SyncReader<T> {
    /// Open a CSV file for streaming iteration
    ///
    /// The CSV reader is configured to:
    /// - Trim whitespace from all fields
    /// - Allow flexible field counts (optional trailing columns)
    /// - Use an 8KB buffer
    ///
    /// # Errors
    ///
    /// `FileNotFound` if the path does not exist, `IoError` otherwise.
    pub fn open(path: &Path) -> Result<Self, LedgerError> {
        let file = File::open(path).map_err(|e| LedgerError::open_failed(path, e))?;

        let reader = ReaderBuilder::new()
            .trim(Trim::All)
            .flexible(true)
            .buffer_capacity(8 * 1024)
            .from_reader(file);

        Ok(Self {
            reader,
            line_num: 0,
            _row: PhantomData,
        })
    }
}

impl<T: LedgerRow> Iterator for SyncReader<T> {
    type Item = Result<T::Record, LedgerError>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut deserializer = self.reader.deserialize::<T>();
        let row = deserializer.next()?;
        self.line_num += 1;

        // +1 for the header row
        let line = self.line_num + 1;
        Some(match row {
            Ok(row) => row.convert().map_err(|e| e.at_line(line)),
            Err(e) => Err(LedgerError::from(e).at_line(line)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::csv_format::{MemberCsvRecord, TransactionCsvRecord};
    use crate::types::{Period, TransactionKind};
    use rust_decimal::Decimal;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const TX_HEADER: &str = "group,type,amount,paid_by,month,year\n";

    /// Helper function to create a temporary CSV file for testing
    fn create_temp_csv(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("Failed to create temp file");
        file.write_all(content.as_bytes())
            .expect("Failed to write to temp file");
        file.flush().expect("Failed to flush temp file");
        file
    }

    fn read_transactions(content: &str) -> Vec<Result<crate::types::TransactionRecord, LedgerError>> {
        let file = create_temp_csv(content);
        SyncReader::<TransactionCsvRecord>::open(file.path())
            .unwrap()
            .collect()
    }

    #[test]
    fn test_open_fails_on_missing_file() {
        let result = SyncReader::<MemberCsvRecord>::open(Path::new("nonexistent.csv"));
        assert_eq!(
            result.unwrap_err(),
            LedgerError::FileNotFound {
                path: "nonexistent.csv".to_string()
            }
        );
    }

    #[test]
    fn test_reads_members() {
        let file = create_temp_csv(
            "group,id,name,email,avatar\n\
             trip,amy,Amy,amy@example.com,https://img/amy.png\n\
             trip,bob,Bob,,\n",
        );

        let records: Vec<_> = SyncReader::<MemberCsvRecord>::open(file.path())
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].group, "trip");
        assert_eq!(records[0].member.avatar, "https://img/amy.png");
        assert_eq!(records[1].member.name, "Bob");
        assert_eq!(records[1].member.email, "");
    }

    #[test]
    fn test_reads_members_without_optional_columns() {
        let file = create_temp_csv("group,id,name\ntrip,amy,Amy\n");

        let records: Vec<_> = SyncReader::<MemberCsvRecord>::open(file.path())
            .unwrap()
            .filter_map(Result::ok)
            .collect();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].member.avatar, "");
    }

    #[test]
    fn test_reads_transactions() {
        let records = read_transactions(&format!(
            "{TX_HEADER}trip,EXPENSE,120.50,amy,3,2024\ntrip,income,30,,,\n"
        ));

        assert_eq!(records.len(), 2);
        let expense = records[0].as_ref().unwrap();
        assert_eq!(expense.transaction.kind, TransactionKind::Expense);
        assert_eq!(expense.transaction.amount, Decimal::new(12050, 2));
        assert_eq!(expense.period, Some(Period { month: 3, year: 2024 }));

        let income = records[1].as_ref().unwrap();
        assert_eq!(income.transaction.kind, TransactionKind::Income);
        assert_eq!(income.period, None);
    }

    #[test]
    fn test_handles_whitespace() {
        let records =
            read_transactions(&format!("{TX_HEADER}  trip  ,  expense , 10.0 ,  amy ,,\n"));

        let record = records[0].as_ref().unwrap();
        assert_eq!(record.group, "trip");
        assert_eq!(record.transaction.paid_by.as_deref(), Some("amy"));
    }

    #[test]
    fn test_includes_line_numbers_in_errors() {
        let records = read_transactions(&format!(
            "{TX_HEADER}trip,expense,10,amy,,\ntrip,expense,ten,amy,,\ntrip,expense,5,bob,,\n"
        ));

        assert_eq!(records.len(), 3);
        assert!(records[0].is_ok());
        assert!(records[2].is_ok());

        let error = records[1].as_ref().unwrap_err();
        assert_eq!(
            error.to_string(),
            "CSV parse error at line 3: Invalid amount 'ten' in group trip"
        );
    }

    #[test]
    fn test_continues_after_error() {
        let records = read_transactions(&format!(
            "{TX_HEADER}trip,expense,10,amy,,\ntrip,refund,10,amy,,\ntrip,expense,,bob,,\ntrip,income,5,,,\n"
        ));

        let valid: Vec<_> = records.into_iter().filter_map(Result::ok).collect();
        assert_eq!(valid.len(), 2);
        assert_eq!(valid[1].transaction.kind, TransactionKind::Income);
    }

    #[test]
    fn test_invalid_period_reported() {
        let records = read_transactions(&format!("{TX_HEADER}trip,expense,10,amy,13,2024\n"));

        let error = records[0].as_ref().unwrap_err();
        assert!(error.to_string().contains("Invalid period '13/2024'"));
    }

    #[test]
    fn test_empty_file_after_header() {
        assert!(read_transactions(TX_HEADER).is_empty());
    }
}
