use polars::prelude::*;
use salesflux_parser::TransactionTable;
use serde::Serialize;

use crate::aggregate::AggregateView;

/// Headline figures for one dataset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SalesMetrics {
    pub row_count: usize,
    pub total_revenue: f64,
    /// `None` when no row carries a product label.
    pub top_product: Option<String>,
    pub product_count: usize,
    pub region_count: usize,
}

impl SalesMetrics {
    /// Derive the metrics from the table and its product/region views.
    ///
    /// Total revenue sums every non-missing `Total_Sales` value, including rows
    /// whose product or region is missing. An empty table yields zero revenue
    /// and no top product.
    pub fn compute(
        table: &TransactionTable,
        by_product: &AggregateView,
        by_region: &AggregateView,
    ) -> PolarsResult<Self> {
        let total_revenue: f64 = table.total_sales()?.into_iter().flatten().sum();
        let top_product = by_product.top().map(|(label, _)| label.to_string());

        Ok(Self {
            row_count: table.len(),
            total_revenue,
            top_product,
            product_count: by_product.len(),
            region_count: by_region.len(),
        })
    }
}
