use chrono::{Datelike, NaiveDate};
use polars::prelude::*;

pub const DATE_COLUMN: &str = "Date";
pub const PRODUCT_COLUMN: &str = "Product";
pub const REGION_COLUMN: &str = "Region";
pub const TOTAL_SALES_COLUMN: &str = "Total_Sales";

pub const TABLE_COLUMNS: [&str; 4] = [
    DATE_COLUMN,
    PRODUCT_COLUMN,
    REGION_COLUMN,
    TOTAL_SALES_COLUMN,
];

// Days between 0001-01-01 (CE day 1) and 1970-01-01, the epoch of polars `Date`.
const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;

/// The loaded sales dataset, one row per transaction in file order.
///
/// The frame always holds exactly [`TABLE_COLUMNS`]: `Date` as a polars date,
/// `Product` and `Region` as nullable strings and `Total_Sales` as nullable `f64`.
#[derive(Debug, Clone)]
pub struct TransactionTable {
    df: DataFrame,
}

impl TransactionTable {
    pub(crate) fn new(df: DataFrame) -> Self {
        Self { df }
    }

    pub fn df(&self) -> &DataFrame {
        &self.df
    }

    pub fn len(&self) -> usize {
        self.df.height()
    }

    pub fn is_empty(&self) -> bool {
        self.df.height() == 0
    }

    pub fn products(&self) -> PolarsResult<&StringChunked> {
        self.df.column(PRODUCT_COLUMN)?.str()
    }

    pub fn regions(&self) -> PolarsResult<&StringChunked> {
        self.df.column(REGION_COLUMN)?.str()
    }

    pub fn total_sales(&self) -> PolarsResult<&Float64Chunked> {
        self.df.column(TOTAL_SALES_COLUMN)?.f64()
    }

    pub fn dates(&self) -> PolarsResult<Vec<Option<NaiveDate>>> {
        let days = self.df.column(DATE_COLUMN)?.date()?.physical();
        Ok(days
            .into_iter()
            .map(|value| value.and_then(date_from_epoch_days))
            .collect())
    }

    /// Earliest and latest transaction date, or `None` for an empty table.
    pub fn date_span(&self) -> PolarsResult<Option<(NaiveDate, NaiveDate)>> {
        let dates = self.dates()?;
        let mut span: Option<(NaiveDate, NaiveDate)> = None;
        for date in dates.into_iter().flatten() {
            span = Some(match span {
                None => (date, date),
                Some((first, last)) => (first.min(date), last.max(date)),
            });
        }
        Ok(span)
    }
}

pub(crate) fn epoch_days(date: NaiveDate) -> i32 {
    date.num_days_from_ce() - UNIX_EPOCH_DAYS_FROM_CE
}

fn date_from_epoch_days(days: i32) -> Option<NaiveDate> {
    NaiveDate::from_num_days_from_ce_opt(days + UNIX_EPOCH_DAYS_FROM_CE)
}
