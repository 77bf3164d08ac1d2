//! Chart series output
//!
//! Comparisons describe each chart as labelled series and hand it to a
//! [`ChartSink`]. The bundled sink writes one CSV file per chart; rendering
//! pixels is left to whatever reads those files.

use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

/// How a chart is meant to be drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    /// One bar per label
    Bar,
    /// Bars for several series side by side
    GroupedBar,
    /// One line per series
    Line,
}

/// A named column of values, one per chart label
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    /// Legend name
    pub name: String,
    /// Values aligned with [`Chart::labels`]
    pub values: Vec<f64>,
}

impl Series {
    /// Series named `name`
    pub fn new(name: impl Into<String>, values: Vec<f64>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }
}

/// Everything needed to draw one chart
#[derive(Debug, Clone, PartialEq)]
pub struct Chart {
    /// Identifier, used as the file stem by file-based sinks
    pub name: String,
    /// Human-readable title
    pub title: String,
    /// Y axis label
    pub y_label: String,
    /// Drawing style
    pub kind: ChartKind,
    /// X axis labels
    pub labels: Vec<String>,
    /// Data series
    pub series: Vec<Series>,
}

/// Chart sink errors
#[derive(Debug, Error)]
pub enum ChartError {
    /// A series does not have one value per label
    #[error("Series '{series}' of chart '{chart}' has {values} values for {labels} labels")]
    Misaligned {
        /// Chart name
        chart: String,
        /// Series name
        series: String,
        /// Number of values in the series
        values: usize,
        /// Number of chart labels
        labels: usize,
    },

    /// Writing the chart failed
    #[error("Failed to write chart to {path}: {source}")]
    Write {
        /// Destination path
        path: PathBuf,
        /// Underlying CSV or IO error
        #[source]
        source: csv::Error,
    },
}

impl Chart {
    /// Check every series has exactly one value per label
    pub fn validate(&self) -> Result<(), ChartError> {
        for series in &self.series {
            if series.values.len() != self.labels.len() {
                return Err(ChartError::Misaligned {
                    chart: self.name.clone(),
                    series: series.name.clone(),
                    values: series.values.len(),
                    labels: self.labels.len(),
                });
            }
        }
        Ok(())
    }
}

/// Destination for comparison charts
pub trait ChartSink {
    /// Emit one chart
    fn emit(&mut self, chart: &Chart) -> Result<(), ChartError>;
}

/// Writes each chart as `<dir>/<name>.csv`
#[derive(Debug, Clone)]
pub struct CsvChartSink {
    dir: PathBuf,
    written: Vec<PathBuf>,
}

impl CsvChartSink {
    /// Sink writing into `dir`, which must exist
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            written: Vec::new(),
        }
    }

    /// Files written so far, in emission order
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }

    fn write_csv(path: &Path, chart: &Chart) -> Result<(), csv::Error> {
        let mut writer = csv::Writer::from_path(path)?;

        let mut header = vec!["label"];
        header.extend(chart.series.iter().map(|s| s.name.as_str()));
        writer.write_record(&header)?;

        for (i, label) in chart.labels.iter().enumerate() {
            let mut record = vec![label.clone()];
            record.extend(chart.series.iter().map(|s| s.values[i].to_string()));
            writer.write_record(&record)?;
        }

        writer.flush()?;
        Ok(())
    }
}

impl ChartSink for CsvChartSink {
    fn emit(&mut self, chart: &Chart) -> Result<(), ChartError> {
        chart.validate()?;

        let path = self.dir.join(format!("{}.csv", chart.name));
        Self::write_csv(&path, chart).map_err(|source| ChartError::Write {
            path: path.clone(),
            source,
        })?;

        info!("Saved '{}' chart series as {}", chart.title, path.display());
        self.written.push(path);
        Ok(())
    }
}

/// Collects charts in memory
#[derive(Debug, Default)]
pub struct MemoryChartSink {
    /// Charts received, in emission order
    pub charts: Vec<Chart>,
}

impl ChartSink for MemoryChartSink {
    fn emit(&mut self, chart: &Chart) -> Result<(), ChartError> {
        chart.validate()?;
        self.charts.push(chart.clone());
        Ok(())
    }
}
