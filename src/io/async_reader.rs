//! Asynchronous CSV reader with batch interface
//!
//! Provides batch reading over ledger records for the async strategy.
//!
//! # Design
//!
//! The AsyncReader uses:
//! - csv-async for streaming CSV parsing
//! - the csv_format module for row validation and conversion
//!
//! ```text
//! CSV file → AsyncReader<R, T> → batches of T::Record
//!                  ↓
//!           csv_format module
//!           (LedgerRow::convert)
//! ```
//!
//! Invalid rows are logged with their line number and skipped.

use crate::io::csv_format::LedgerRow;
use crate::types::LedgerError;
use csv_async::AsyncReaderBuilder;
use futures::io::AsyncRead;
use futures::stream::StreamExt;
use std::marker::PhantomData;

/// Asynchronous CSV reader
///
/// Generic over the source `R` and the row type `T`.
pub struct AsyncReader<R: AsyncRead + Unpin, T> {
    csv_reader: csv_async::AsyncDeserializer<R>,
    line_num: u64,
    _row: PhantomData<T>,
}

impl<R, T> AsyncReader<R, T>
where
    R: AsyncRead + Unpin + Send + 'static,
    T: LedgerRow + Unpin + Send + 'static,
{
    /// Create a new AsyncReader from an async source
    pub fn new(reader: R) -> Self {
        let csv_reader = AsyncReaderBuilder::new()
            .flexible(true)
            .trim(csv_async::Trim::All)
            .create_deserializer(reader);

        Self {
            csv_reader,
            line_num: 0,
            _row: PhantomData,
        }
    }

    /// Read a batch of records
    ///
    /// Reads up to `batch_size` valid records. Invalid rows are logged as
    /// warnings and skipped, so the batch may span more rows than it holds.
    ///
    /// # Returns
    ///
    /// The converted records. Returns an empty vector at end of input.
    pub async fn read_batch(&mut self, batch_size: usize) -> Vec<T::Record> {
        let mut batch = Vec::with_capacity(batch_size);
        let mut rows = self.csv_reader.deserialize::<T>();

        while batch.len() < batch_size {
            let row = match rows.next().await {
                Some(row) => row,
                None => break,
            };
            self.line_num += 1;

            // +1 for the header row
            let line = self.line_num + 1;
            let result = match row {
                Ok(row) => row.convert(),
                Err(e) => Err(LedgerError::ParseError {
                    line: None,
                    message: e.to_string(),
                }),
            };

            match result {
                Ok(record) => batch.push(record),
                Err(e) => tracing::warn!("skipping record: {}", e.at_line(line)),
            }
        }

        batch
    }

    /// Read every remaining record
    pub async fn read_all(&mut self, batch_size: usize) -> Vec<T::Record> {
        let mut records = Vec::new();
        loop {
            let batch = self.read_batch(batch_size).await;
            if batch.is_empty() {
                break;
            }
            records.extend(batch);
        }
        records
    }
}
