use std::fmt::Display;
use std::path::Path;

use once_cell::sync::OnceCell;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::register_font;
use tracing::{info, warn};

use crate::aggregate::AggregateView;
use crate::config::ensure_parent_dir;
use crate::error::{PipelineError, Result};

const FONT_FAMILY: &str = "sans-serif";
static FONT_BYTES: &[u8] = include_bytes!("../assets/DejaVuSans.ttf");
static FONT_REGISTERED: OnceCell<()> = OnceCell::new();

pub const PRODUCT_CHART_TITLE: &str = "Total Revenue by Product Category";
pub const REGION_CHART_TITLE: &str = "Regional Sales Contribution";
const PRODUCT_AXIS_LABEL: &str = "Revenue (₹)";

const PRODUCT_CHART_SIZE: (u32, u32) = (1000, 600);
const REGION_CHART_SIZE: (u32, u32) = (800, 800);

const BAR_COLOR: RGBColor = RGBColor(0, 128, 128);
const PIE_COLORS: [RGBColor; 4] = [
    RGBColor(0xff, 0x99, 0x99),
    RGBColor(0x66, 0xb3, 0xff),
    RGBColor(0x99, 0xff, 0x99),
    RGBColor(0xff, 0xcc, 0x99),
];

fn ensure_font() -> Result<()> {
    FONT_REGISTERED
        .get_or_try_init(|| {
            register_font(FONT_FAMILY, FontStyle::Normal, FONT_BYTES).map_err(|_| {
                PipelineError::Chart("bundled chart font could not be loaded".to_string())
            })
        })
        .map(|_| ())
}

fn chart_error(err: impl Display) -> PipelineError {
    PipelineError::Chart(err.to_string())
}

/// Horizontal bar chart of revenue per product, bars ascending by value from the bottom.
/// The category axis has exactly one band per product.
pub fn render_product_bar_chart(view: &AggregateView, path: &Path) -> Result<()> {
    ensure_font()?;
    ensure_parent_dir(path)?;

    let root = BitMapBackend::new(path, PRODUCT_CHART_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(chart_error)?;

    let bars = view.sorted_by_value();
    if bars.is_empty() {
        draw_empty_chart(&root, PRODUCT_CHART_TITLE)?;
    } else {
        draw_bars(&root, &bars)?;
    }

    root.present().map_err(chart_error)?;
    info!(path = %path.display(), bars = bars.len(), "product chart written");
    Ok(())
}

fn draw_bars(root: &DrawingArea<BitMapBackend<'_>, Shift>, bars: &[(String, f64)]) -> Result<()> {
    let labels: Vec<&str> = bars.iter().map(|(label, _)| label.as_str()).collect();
    let max = bars.iter().map(|(_, value)| *value).fold(0.0, f64::max);
    let min = bars.iter().map(|(_, value)| *value).fold(0.0, f64::min);
    let x_start = if min < 0.0 { min * 1.05 } else { 0.0 };
    let x_end = if max > 0.0 { max * 1.05 } else { 1.0 };

    let longest_label = labels.iter().map(|label| label.chars().count()).max().unwrap_or(0);
    let y_label_area = (longest_label as u32 * 9 + 20).clamp(60, 300);

    let categories = (0.0..bars.len() as f64).with_key_points(band_centers(bars.len()));
    let mut chart = ChartBuilder::on(root)
        .caption(PRODUCT_CHART_TITLE, (FONT_FAMILY, 28))
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(y_label_area)
        .build_cartesian_2d(x_start..x_end, categories)
        .map_err(chart_error)?;

    let y_formatter = |value: &f64| {
        labels
            .get(band_index(*value))
            .map(|label| label.to_string())
            .unwrap_or_default()
    };
    let x_formatter = |value: &f64| format_axis_amount(*value);

    chart
        .configure_mesh()
        .disable_y_mesh()
        .y_label_formatter(&y_formatter)
        .x_label_formatter(&x_formatter)
        .x_desc(PRODUCT_AXIS_LABEL)
        .label_style((FONT_FAMILY, 14))
        .axis_desc_style((FONT_FAMILY, 16))
        .draw()
        .map_err(chart_error)?;

    chart
        .draw_series(bars.iter().enumerate().map(|(idx, (_, value))| {
            let (low, high) = bar_span(idx);
            Rectangle::new([(0.0, low), (*value, high)], BAR_COLOR.filled())
        }))
        .map_err(chart_error)?;

    Ok(())
}

// Bar `idx` owns the band `idx..idx + 1` on the category axis.
const BAR_FILL: f64 = 0.7;

fn band_centers(count: usize) -> Vec<f64> {
    (0..count).map(|idx| idx as f64 + 0.5).collect()
}

fn band_index(value: f64) -> usize {
    value.floor().max(0.0) as usize
}

fn bar_span(idx: usize) -> (f64, f64) {
    let gap = (1.0 - BAR_FILL) / 2.0;
    (idx as f64 + gap, idx as f64 + 1.0 - gap)
}

/// Pie chart of each region's share of revenue, labelled with one-decimal percentages.
pub fn render_region_pie_chart(view: &AggregateView, path: &Path) -> Result<()> {
    ensure_font()?;
    ensure_parent_dir(path)?;

    let root = BitMapBackend::new(path, REGION_CHART_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(chart_error)?;

    let wedges = view.shares();
    let skipped = view.len() - wedges.len();
    if skipped > 0 {
        warn!(skipped, "regions with non-positive revenue left out of pie chart");
    }

    if wedges.is_empty() {
        draw_empty_chart(&root, REGION_CHART_TITLE)?;
    } else {
        draw_pie(&root, &wedges)?;
    }

    root.present().map_err(chart_error)?;
    info!(path = %path.display(), wedges = wedges.len(), "region chart written");
    Ok(())
}

fn draw_pie(root: &DrawingArea<BitMapBackend<'_>, Shift>, wedges: &[(String, f64)]) -> Result<()> {
    root.titled(REGION_CHART_TITLE, (FONT_FAMILY, 28))
        .map_err(chart_error)?;

    // Pie coordinates are absolute backend pixels, so centre on the full canvas
    // shifted below the title.
    let (width, height) = root.dim_in_pixel();
    let center = (width as i32 / 2, height as i32 / 2 + 20);
    let radius = f64::from(width.min(height)) * 0.33;

    let sizes: Vec<f64> = wedges.iter().map(|(_, value)| *value).collect();
    let labels: Vec<&str> = wedges.iter().map(|(label, _)| label.as_str()).collect();
    let colors: Vec<RGBColor> = (0..wedges.len())
        .map(|idx| PIE_COLORS[idx % PIE_COLORS.len()])
        .collect();

    let mut pie = Pie::new(&center, &radius, &sizes, &colors, &labels);
    pie.start_angle(-90.0);
    pie.label_style((FONT_FAMILY, 20).into_font().color(&BLACK));
    pie.percentages((FONT_FAMILY, radius * 0.08).into_font().color(&BLACK));
    root.draw(&pie).map_err(chart_error)?;

    Ok(())
}

fn draw_empty_chart(root: &DrawingArea<BitMapBackend<'_>, Shift>, title: &str) -> Result<()> {
    let area = root
        .titled(title, (FONT_FAMILY, 28))
        .map_err(chart_error)?;
    let (width, height) = area.dim_in_pixel();
    area.draw(&Text::new(
        "No data",
        (width as i32 / 2 - 40, height as i32 / 2),
        (FONT_FAMILY, 24),
    ))
    .map_err(chart_error)?;
    Ok(())
}

/// Compact axis tick labels: `1500000` -> `1.5M`, `25000` -> `25K`.
fn format_axis_amount(value: f64) -> String {
    let abs = value.abs();
    if abs >= 1_000_000.0 {
        format!("{:.1}M", value / 1_000_000.0)
    } else if abs >= 1_000.0 {
        format!("{:.0}K", value / 1_000.0)
    } else {
        format!("{value:.0}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn axis_amounts_are_compact() {
        assert_eq!(format_axis_amount(0.0), "0");
        assert_eq!(format_axis_amount(950.0), "950");
        assert_eq!(format_axis_amount(25_000.0), "25K");
        assert_eq!(format_axis_amount(1_500_000.0), "1.5M");
        assert_eq!(format_axis_amount(-2_000.0), "-2K");
    }

    #[test]
    fn category_axis_has_one_band_per_bar() {
        for count in [1, 5] {
            let centers = band_centers(count);
            assert_eq!(centers.len(), count);
            assert!(centers.iter().all(|c| *c > 0.0 && *c < count as f64));

            let indices: Vec<usize> = centers.iter().map(|c| band_index(*c)).collect();
            assert_eq!(indices, (0..count).collect::<Vec<_>>());
        }

        let (low, high) = bar_span(4);
        assert!(low > 4.0 && high < 5.0 && low < high);
    }

    #[test]
    fn bundled_font_registers() {
        ensure_font().expect("font registration");
        ensure_font().expect("registration is idempotent");
    }
}
