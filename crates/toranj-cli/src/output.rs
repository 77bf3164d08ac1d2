// Table rendering for comparison results
//
// Every renderer returns a String so commands decide where it goes.

use anyhow::{Context, Result};
use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, Cell, Color, Table};
use serde::Serialize;
use toranj_core::results::compare::{format_marked, mark_best, SpeedupTable};
use toranj_core::results::variant::VariantPivot;

/// Output format for comparison tables
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table
    Table,
    /// JSON for programmatic consumption
    Json,
    /// CSV for data export
    Csv,
}

impl OutputFormat {
    /// Check if format is machine-readable
    pub fn is_machine_readable(&self) -> bool {
        matches!(self, OutputFormat::Json | OutputFormat::Csv)
    }
}

#[derive(Serialize)]
struct MarkedVariantRow {
    threads: u32,
    param: u64,
    reference: f64,
    alternative: f64,
    reference_best: bool,
    alternative_best: bool,
}

/// Render a variant pivot with the faster side of each row starred
pub fn render_variant(pivot: &VariantPivot, format: OutputFormat) -> Result<String> {
    let marks = mark_best(pivot);

    match format {
        OutputFormat::Table => {
            let mut table = Table::new();
            table.load_preset(UTF8_FULL).set_header(vec![
                Cell::new("threads"),
                Cell::new("param"),
                Cell::new(&pivot.reference),
                Cell::new(&pivot.alternative),
            ]);
            for (row, best) in pivot.rows.iter().zip(&marks) {
                table.add_row(vec![
                    Cell::new(row.threads),
                    Cell::new(row.param),
                    marked_cell(row.reference, best.reference),
                    marked_cell(row.alternative, best.alternative),
                ]);
            }
            Ok(table.to_string())
        }
        OutputFormat::Json => {
            let rows: Vec<MarkedVariantRow> = pivot
                .rows
                .iter()
                .zip(&marks)
                .map(|(row, best)| MarkedVariantRow {
                    threads: row.threads,
                    param: row.param,
                    reference: row.reference,
                    alternative: row.alternative,
                    reference_best: best.reference,
                    alternative_best: best.alternative,
                })
                .collect();
            let doc = serde_json::json!({
                "reference": pivot.reference,
                "alternative": pivot.alternative,
                "rows": rows,
            });
            serde_json::to_string_pretty(&doc).context("Failed to serialize variant table")
        }
        OutputFormat::Csv => {
            let mut writer = csv::Writer::from_writer(Vec::new());
            writer.write_record([
                "threads",
                "param",
                pivot.reference.as_str(),
                pivot.alternative.as_str(),
            ])?;
            for (row, best) in pivot.rows.iter().zip(&marks) {
                writer.write_record([
                    row.threads.to_string(),
                    row.param.to_string(),
                    format_marked(row.reference, best.reference),
                    format_marked(row.alternative, best.alternative),
                ])?;
            }
            csv_string(writer)
        }
    }
}

/// Render an old-vs-new speedup table
pub fn render_speedup(table: &SpeedupTable, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Table => {
            let mut out = Table::new();
            out.load_preset(UTF8_FULL).set_header(vec![
                "binary", "threads", "param", "old", "new", "speedup",
            ]);
            for row in &table.rows {
                let color = if row.speedup >= 1.0 {
                    Color::Green
                } else {
                    Color::Red
                };
                out.add_row(vec![
                    Cell::new(&row.binary),
                    Cell::new(row.threads),
                    Cell::new(row.param),
                    Cell::new(format!("{:.6}", row.old_time)),
                    Cell::new(format!("{:.6}", row.new_time)),
                    Cell::new(format!("{:.3}x", row.speedup)).fg(color),
                ]);
            }
            Ok(out.to_string())
        }
        OutputFormat::Json => {
            serde_json::to_string_pretty(table).context("Failed to serialize speedup table")
        }
        OutputFormat::Csv => {
            let mut writer = csv::Writer::from_writer(Vec::new());
            writer.write_record(["binary", "threads", "param", "old", "new", "speedup"])?;
            for row in &table.rows {
                writer.write_record([
                    row.binary.clone(),
                    row.threads.to_string(),
                    row.param.to_string(),
                    row.old_time.to_string(),
                    row.new_time.to_string(),
                    row.speedup.to_string(),
                ])?;
            }
            csv_string(writer)
        }
    }
}

fn marked_cell(value: f64, best: bool) -> Cell {
    let cell = Cell::new(format_marked(value, best));
    if best {
        cell.fg(Color::Green)
    } else {
        cell
    }
}

fn csv_string(writer: csv::Writer<Vec<u8>>) -> Result<String> {
    let bytes = writer
        .into_inner()
        .map_err(|e| anyhow::anyhow!("Failed to flush CSV output: {}", e))?;
    String::from_utf8(bytes).context("CSV output was not UTF-8")
}
