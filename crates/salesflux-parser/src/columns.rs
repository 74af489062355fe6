use chrono::{NaiveDate, NaiveDateTime};
use polars::prelude::*;

use crate::errors::LoadError;
use crate::model::{
    epoch_days, DATE_COLUMN, PRODUCT_COLUMN, REGION_COLUMN, TOTAL_SALES_COLUMN,
};

/// Column buffers filled row by row before the table is assembled.
#[derive(Debug, Default)]
pub(crate) struct TransactionColumns {
    dates: Vec<i32>,
    products: Vec<Option<String>>,
    regions: Vec<Option<String>>,
    total_sales: Vec<Option<f64>>,
}

impl TransactionColumns {
    pub fn push(
        &mut self,
        date: NaiveDate,
        product: Option<String>,
        region: Option<String>,
        total_sales: Option<f64>,
    ) {
        self.dates.push(epoch_days(date));
        self.products.push(product);
        self.regions.push(region);
        self.total_sales.push(total_sales);
    }

    pub fn build(self) -> Result<DataFrame, LoadError> {
        let date_series = Series::new(DATE_COLUMN.into(), self.dates)
            .cast(&DataType::Date)
            .map_err(|err| LoadError::Frame {
                message: format!("failed to cast date column: {err}"),
            })?;

        let products: Vec<Option<&str>> = self.products.iter().map(|v| v.as_deref()).collect();
        let regions: Vec<Option<&str>> = self.regions.iter().map(|v| v.as_deref()).collect();

        let cols: Vec<Column> = vec![
            date_series.into(),
            Series::new(PRODUCT_COLUMN.into(), products).into(),
            Series::new(REGION_COLUMN.into(), regions).into(),
            Series::new(TOTAL_SALES_COLUMN.into(), self.total_sales).into(),
        ];

        DataFrame::new(cols).map_err(|err| LoadError::Frame {
            message: err.to_string(),
        })
    }
}

/// Parse a calendar date, truncating any time-of-day component.
pub fn parse_date(value: &str, line: u64) -> Result<NaiveDate, LoadError> {
    static DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];
    static DATETIME_FORMATS: &[&str] = &[
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M",
    ];

    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(LoadError::DataRow {
            line,
            message: "missing Date value".to_string(),
        });
    }

    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, fmt) {
            return Ok(date);
        }
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, fmt) {
            return Ok(dt.date());
        }
    }

    Err(LoadError::DataRow {
        line,
        message: format!("invalid date '{trimmed}'"),
    })
}

/// Parse a sales amount; blank and `NaN` cells are missing values.
pub(crate) fn parse_amount(value: &str, line: u64) -> Result<Option<f64>, LoadError> {
    let trimmed = value.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("nan") {
        return Ok(None);
    }

    match trimmed.parse::<f64>() {
        Ok(parsed) if parsed.is_finite() => Ok(Some(parsed)),
        Ok(_) => Err(LoadError::DataRow {
            line,
            message: format!("Total_Sales value '{trimmed}' is not finite"),
        }),
        Err(err) => Err(LoadError::DataRow {
            line,
            message: format!("failed to parse column '{TOTAL_SALES_COLUMN}' as float: {err}"),
        }),
    }
}
