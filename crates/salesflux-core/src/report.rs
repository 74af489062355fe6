use std::fs;
use std::path::Path;

use tracing::info;

use crate::config::{display_path, ensure_parent_dir};
use crate::error::Result;
use crate::metrics::SalesMetrics;

pub const CURRENCY_SYMBOL: &str = "₹";
const MISSING_PRODUCT: &str = "N/A";

/// The markdown summary of one run.
#[derive(Debug, Clone)]
pub struct ReportDocument<'a> {
    metrics: &'a SalesMetrics,
    data_source: String,
}

impl<'a> ReportDocument<'a> {
    pub fn new(metrics: &'a SalesMetrics, data_source: &Path) -> Self {
        Self {
            metrics,
            data_source: display_path(data_source),
        }
    }

    pub fn render(&self) -> String {
        let top_product = self
            .metrics
            .top_product
            .as_deref()
            .unwrap_or(MISSING_PRODUCT);
        let leader_insight = match self.metrics.top_product.as_deref() {
            Some(product) => {
                format!("The '{product}' category is driving the majority of income.")
            }
            None => "No product revenue was recorded in this dataset.".to_string(),
        };

        let lines = [
            "# 📊 Week 4: E-commerce Performance Report".to_string(),
            String::new(),
            "## 🔍 Executive Summary".to_string(),
            format!(
                "This automated report summarizes the analysis of {} transactions.",
                self.metrics.row_count
            ),
            String::new(),
            "## 📈 Key Business Metrics".to_string(),
            format!(
                "- **Total Revenue:** {}",
                format_currency(self.metrics.total_revenue)
            ),
            format!("- **Top Performing Product:** {top_product}"),
            format!("- **Data Source:** {}", self.data_source),
            String::new(),
            "## 💡 Business Insights".to_string(),
            format!("1. **Revenue Leader:** {leader_insight}"),
            "2. **Market Reach:** Sales are distributed across all regions, showing a healthy market presence.".to_string(),
        ];

        let mut doc = lines.join("\n");
        doc.push('\n');
        doc
    }

    /// Write the document to `path`, replacing any previous report.
    pub fn write_to(&self, path: &Path) -> Result<()> {
        ensure_parent_dir(path)?;
        let content = self.render();
        fs::write(path, content.as_bytes())?;
        info!(path = %path.display(), bytes = content.len(), "report written");
        Ok(())
    }
}

pub fn format_currency(amount: f64) -> String {
    format!("{CURRENCY_SYMBOL}{}", format_thousands(amount))
}

/// Two decimals with comma-grouped thousands, e.g. `1234567.891` -> `1,234,567.89`.
/// Non-finite amounts (an overflowed sum) are printed as `inf`, `-inf` or `NaN`.
pub fn format_thousands(amount: f64) -> String {
    if !amount.is_finite() {
        return amount.to_string();
    }

    let fixed = format!("{:.2}", amount.abs());
    let (whole, fraction) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (idx, digit) in whole.chars().enumerate() {
        if idx > 0 && (whole.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if amount < 0.0 { "-" } else { "" };
    format!("{sign}{grouped}.{fraction}")
}
