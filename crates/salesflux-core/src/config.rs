use std::fs;
use std::io;
use std::path::{Path, PathBuf, MAIN_SEPARATOR};

use tracing::debug;

pub const DEFAULT_INPUT_PATH: &str = "data/sales_data.csv";
pub const DEFAULT_PRODUCT_CHART_PATH: &str = "visualizations/sales_by_product.png";
pub const DEFAULT_REGION_CHART_PATH: &str = "visualizations/sales_by_region.png";
pub const DEFAULT_REPORT_PATH: &str = "report/analysis_report.md";

/// Where the run writes its three artifacts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    pub product_chart: PathBuf,
    pub region_chart: PathBuf,
    pub report: PathBuf,
}

impl Default for OutputPaths {
    fn default() -> Self {
        Self {
            product_chart: PathBuf::from(DEFAULT_PRODUCT_CHART_PATH),
            region_chart: PathBuf::from(DEFAULT_REGION_CHART_PATH),
            report: PathBuf::from(DEFAULT_REPORT_PATH),
        }
    }
}

impl OutputPaths {
    /// The default layout relocated under `root`.
    pub fn under(root: &Path) -> Self {
        let defaults = Self::default();
        Self {
            product_chart: root.join(defaults.product_chart),
            region_chart: root.join(defaults.region_chart),
            report: root.join(defaults.report),
        }
    }

    /// Distinct parent directories of the artifacts, in artifact order.
    pub fn directories(&self) -> Vec<&Path> {
        let mut dirs: Vec<&Path> = Vec::new();
        for path in [&self.product_chart, &self.region_chart, &self.report] {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                if !dirs.contains(&parent) {
                    dirs.push(parent);
                }
            }
        }
        dirs
    }

    /// Create every output directory that does not exist yet.
    pub fn prepare(&self) -> io::Result<()> {
        for dir in self.directories() {
            fs::create_dir_all(dir)?;
            debug!(dir = %dir.display(), "output directory ready");
        }
        Ok(())
    }
}

/// Input location and output layout for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    pub input: PathBuf,
    pub outputs: OutputPaths,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from(DEFAULT_INPUT_PATH),
            outputs: OutputPaths::default(),
        }
    }
}

impl PipelineConfig {
    /// The default relative layout resolved against `root` instead of the working directory.
    pub fn rooted_at(root: &Path) -> Self {
        Self {
            input: root.join(DEFAULT_INPUT_PATH),
            outputs: OutputPaths::under(root),
        }
    }
}

/// Render a path with `/` separators for user-facing text.
pub fn display_path(path: &Path) -> String {
    path.to_string_lossy().replace(MAIN_SEPARATOR, "/")
}

pub(crate) fn ensure_parent_dir(path: &Path) -> io::Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => fs::create_dir_all(parent),
        _ => Ok(()),
    }
}
