//! I/O module
//!
//! Handles CSV parsing and report output.
//!
//! # Components
//!
//! - `csv_format` - Row formats, record conversion and report serialization
//! - `sync_reader` - Synchronous CSV reader with iterator interface
//! - `async_reader` - Asynchronous CSV reader with batch reading interface

pub mod async_reader;
pub mod csv_format;
pub mod sync_reader;

pub use async_reader::AsyncReader;
pub use csv_format::{
    convert_member_record, convert_transaction_record, write_reports, LedgerRow, MemberCsvRecord,
    OutputFormat, TransactionCsvRecord,
};
pub use sync_reader::SyncReader;
