use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use csv::ReaderBuilder;
use serde::Deserialize;
use tracing::{debug, info};

use crate::columns::{parse_amount, parse_date, TransactionColumns};
use crate::errors::LoadError;
use crate::model::{TransactionTable, TABLE_COLUMNS};

/// One CSV row as it appears on disk; typed coercion happens afterwards so that
/// failures can report the offending line.
#[derive(Debug, Deserialize)]
struct RawTransaction {
    #[serde(rename = "Date")]
    date: String,
    #[serde(rename = "Product")]
    product: Option<String>,
    #[serde(rename = "Region")]
    region: Option<String>,
    #[serde(rename = "Total_Sales")]
    total_sales: String,
}

/// Read the sales CSV at `path` into a [`TransactionTable`].
pub fn load_transactions(path: impl AsRef<Path>) -> Result<TransactionTable, LoadError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| match source.kind() {
        io::ErrorKind::NotFound => LoadError::NotFound {
            path: path.to_path_buf(),
        },
        _ => LoadError::Io {
            path: path.to_path_buf(),
            source,
        },
    })?;

    let table = parse_transactions(file)?;
    info!(path = %path.display(), rows = table.len(), "loaded transactions");
    Ok(table)
}

/// Parse sales CSV content from any reader. Columns are matched by exact header
/// name; their order and any extra columns are irrelevant.
pub fn parse_transactions<R: Read>(reader: R) -> Result<TransactionTable, LoadError> {
    let mut csv_reader = ReaderBuilder::new().has_headers(true).from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    for column in TABLE_COLUMNS {
        if !headers.iter().any(|header| header == column) {
            return Err(LoadError::MissingColumn { column });
        }
    }

    let mut columns = TransactionColumns::default();
    let mut rows = 0usize;
    for result in csv_reader.records() {
        let record = result?;
        let line = record.position().map(|pos| pos.line()).unwrap_or_default();
        let raw: RawTransaction = record.deserialize(Some(&headers))?;

        let date = parse_date(&raw.date, line)?;
        let total_sales = parse_amount(&raw.total_sales, line)?;
        columns.push(date, raw.product, raw.region, total_sales);
        rows += 1;
    }

    debug!(rows, "assembling transaction table");
    let df = columns.build()?;
    Ok(TransactionTable::new(df))
}
