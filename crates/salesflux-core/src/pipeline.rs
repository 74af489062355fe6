// crates/salesflux-core/src/pipeline.rs

use std::io::Write;
use std::path::{Path, PathBuf};

use salesflux_parser::{load_transactions, LoadError};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::aggregate::AggregateView;
use crate::charts::{render_product_bar_chart, render_region_pie_chart};
use crate::config::{display_path, PipelineConfig};
use crate::error::Result;
use crate::metrics::SalesMetrics;
use crate::report::ReportDocument;

/// What a run produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    pub metrics: SalesMetrics,
    pub product_chart: PathBuf,
    pub region_chart: PathBuf,
    pub report: PathBuf,
}

#[derive(Debug)]
pub enum RunOutcome {
    Completed(RunSummary),
    /// The input could not be loaded; nothing was written.
    LoadFailed(LoadError),
}

impl RunOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, RunOutcome::Completed(_))
    }
}

/// Run load -> metrics -> charts -> report, printing progress lines to `out`.
///
/// A load failure is reported on `out` and returned as
/// [`RunOutcome::LoadFailed`] before any artifact is touched. Failures after
/// loading (rendering, writing) are returned as errors.
pub fn run<W: Write>(config: &PipelineConfig, out: &mut W) -> Result<RunOutcome> {
    writeln!(out, "🚀 Initializing Full Data Pipeline...")?;

    let table = match load_transactions(&config.input) {
        Ok(table) => table,
        Err(err) => {
            writeln!(out, "❌ Error: {err}")?;
            warn!(input = %config.input.display(), error = %err, "pipeline aborted at load");
            return Ok(RunOutcome::LoadFailed(err));
        }
    };
    writeln!(out, "✅ Data loaded and date formats standardized.")?;
    if let Some((first, last)) = table.date_span()? {
        debug!(%first, %last, "transaction date span");
    }

    let by_product = AggregateView::by_product(&table)?;
    let by_region = AggregateView::by_region(&table)?;
    let metrics = SalesMetrics::compute(&table, &by_product, &by_region)?;
    info!(
        products = by_product.len(),
        regions = by_region.len(),
        total_revenue = metrics.total_revenue,
        "aggregates built"
    );

    writeln!(out, "📊 Generating Visualizations...")?;
    let outputs = &config.outputs;
    render_product_bar_chart(&by_product, &outputs.product_chart)?;
    render_region_pie_chart(&by_region, &outputs.region_chart)?;

    ReportDocument::new(&metrics, &config.input).write_to(&outputs.report)?;
    writeln!(
        out,
        "✅ Report successfully generated at: {}",
        display_path(&outputs.report)
    )?;
    writeln!(
        out,
        "✅ Analysis complete. Files saved in '{}' and '{}' folders.",
        folder_label(&outputs.product_chart),
        folder_label(&outputs.report)
    )?;

    Ok(RunOutcome::Completed(RunSummary {
        metrics,
        product_chart: outputs.product_chart.clone(),
        region_chart: outputs.region_chart.clone(),
        report: outputs.report.clone(),
    }))
}

fn folder_label(path: &Path) -> String {
    match path.parent().filter(|p| !p.as_os_str().is_empty()) {
        Some(parent) => format!("{}/", display_path(parent)),
        None => "./".to_string(),
    }
}
