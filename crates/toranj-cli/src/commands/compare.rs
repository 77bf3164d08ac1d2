use anyhow::{bail, Context, Result};
use colored::Colorize;
use regex::Regex;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use toranj_core::results::compare::{normalize_global, normalize_rows, speedup};
use toranj_core::results::variant::{extract_variant, VariantPivot};
use toranj_core::results::{parse_log, ParseOptions, ResultsTable};

use crate::charts::{Chart, ChartKind, ChartSink, CsvChartSink, Series};
use crate::cli::CompareArgs;
use crate::config::CliConfig;
use crate::fetch::read_log;
use crate::output::{render_speedup, render_variant, OutputFormat};

/// Compare result logs and write chart series next to the output prefix
pub async fn execute(args: CompareArgs, config: &CliConfig) -> Result<()> {
    if args.new.is_none() && args.compare_variant.is_none() {
        bail!("Comparing old against new needs a second log; pass NEW or use --compare-variant");
    }

    let options = ParseOptions {
        include_throughput: args.include_throughput || config.compare.include_throughput,
    };
    let pattern = args
        .pattern
        .as_deref()
        .map(Regex::new)
        .transpose()
        .context("Invalid --pattern")?;
    let filters = Filters {
        ignore_chapel: args.ignore_chapel,
        pattern,
    };

    let old = load(&args.old, options, &filters).await?;
    let new = match &args.new {
        Some(source) => Some(load(source, options, &filters).await?),
        None => None,
    };

    let prefix = args
        .output_prefix
        .clone()
        .unwrap_or_else(|| config.compare.output_prefix.clone());
    let (dir, stem) = split_prefix(&prefix);
    let mut sink = CsvChartSink::new(dir);

    let mut sections = Vec::new();
    if let Some(base) = &args.compare_variant {
        sections.push(variant_report(
            base, "old", &old, &stem, args.raw_line, args.format, &mut sink,
        )?);
        if let Some(new) = &new {
            sections.push(variant_report(
                base, "new", new, &stem, args.raw_line, args.format, &mut sink,
            )?);
        }
    } else if let Some(new) = &new {
        sections.push(old_new_report(
            &old, new, &stem, args.raw_line, args.format, &mut sink,
        )?);
    }

    for section in sections {
        println!("{}", section);
    }
    info!("Wrote {} chart series files", sink.written().len());
    Ok(())
}

/// Binary filters applied to every loaded table
#[derive(Debug, Default)]
pub struct Filters {
    /// Drop binaries whose name contains "chapel"
    pub ignore_chapel: bool,
    /// Keep only binaries matching this pattern
    pub pattern: Option<Regex>,
}

impl Filters {
    /// Apply the chapel exclusion, then the pattern
    pub fn apply(&self, table: ResultsTable) -> ResultsTable {
        let table = if self.ignore_chapel {
            table.without_binaries_containing("chapel")
        } else {
            table
        };
        match &self.pattern {
            Some(pattern) => table.matching(pattern),
            None => table,
        }
    }
}

async fn load(source: &str, options: ParseOptions, filters: &Filters) -> Result<ResultsTable> {
    let text = read_log(source).await?;
    let table = parse_log(&text, options).with_context(|| format!("Failed to parse {}", source))?;
    info!("Loaded {} rows from {}", table.len(), source);
    let table = filters.apply(table);
    if table.is_empty() {
        warn!("No rows left in {} after filtering", source);
    }
    Ok(table)
}

/// Split `dir/stem` into the sink directory and the chart name stem
pub fn split_prefix(prefix: &str) -> (PathBuf, String) {
    let path = Path::new(prefix);
    let stem = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| prefix.to_string());
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    (dir, stem)
}

fn pivot_series(pivot: &VariantPivot) -> Vec<Series> {
    vec![
        Series::new(&pivot.reference, pivot.reference_times()),
        Series::new(&pivot.alternative, pivot.alternative_times()),
    ]
}

/// Reference vs C++ variant of `base` within one log
pub fn variant_report(
    base: &str,
    tag: &str,
    table: &ResultsTable,
    stem: &str,
    raw_line: bool,
    format: OutputFormat,
    sink: &mut dyn ChartSink,
) -> Result<String> {
    let pivot = extract_variant(table, base)
        .with_context(|| format!("Cannot compare variants of '{}' in the {} log", base, tag))?;
    info!(
        "{} log: {} vs {} over {} configurations",
        tag,
        pivot.reference,
        pivot.alternative,
        pivot.rows.len()
    );
    let labels = pivot.labels();

    let normalized = normalize_rows(&pivot);
    sink.emit(&Chart {
        name: format!("{}_{}_norm_{}_bar", stem, base, tag),
        title: format!("{} {} vs {} (normalized, {})", base, pivot.reference, pivot.alternative, tag),
        y_label: "Normalized time".to_string(),
        kind: ChartKind::GroupedBar,
        labels: labels.clone(),
        series: pivot_series(&normalized),
    })?;

    if raw_line {
        let global = normalize_global(&pivot);
        sink.emit(&Chart {
            name: format!("{}_{}_raw_{}_line", stem, base, tag),
            title: format!("{} raw normalized times ({})", base, tag),
            y_label: "Time / max time".to_string(),
            kind: ChartKind::Line,
            labels: labels.clone(),
            series: pivot_series(&global),
        })?;
    }

    sink.emit(&Chart {
        name: format!("{}_{}_actual_{}_line", stem, base, tag),
        title: format!("{} average times ({})", base, tag),
        y_label: "Average time (s)".to_string(),
        kind: ChartKind::Line,
        labels,
        series: pivot_series(&pivot),
    })?;

    let rendered = render_variant(&pivot, format)?;
    Ok(if format.is_machine_readable() {
        rendered
    } else {
        format!("{}\n{}", format!("{} ({} log)", base, tag).bold(), rendered)
    })
}

/// Old vs new average times with per-configuration speedups
pub fn old_new_report(
    old: &ResultsTable,
    new: &ResultsTable,
    stem: &str,
    raw_line: bool,
    format: OutputFormat,
    sink: &mut dyn ChartSink,
) -> Result<String> {
    let joined = speedup(old, new);
    if joined.rows.is_empty() {
        warn!("The two logs share no (binary, threads, param) configurations");
    }
    let labels = joined.labels();

    sink.emit(&Chart {
        name: format!("{}_actual_oldnew_line", stem),
        title: "Average time, old vs new".to_string(),
        y_label: "Average time (s)".to_string(),
        kind: ChartKind::Line,
        labels: labels.clone(),
        series: vec![
            Series::new("old", joined.old_times()),
            Series::new("new", joined.new_times()),
        ],
    })?;

    if raw_line {
        let (old_norm, new_norm) = joined.normalized_times();
        sink.emit(&Chart {
            name: format!("{}_raw_oldnew_line", stem),
            title: "Normalized time, old vs new".to_string(),
            y_label: "Time / max time".to_string(),
            kind: ChartKind::Line,
            labels: labels.clone(),
            series: vec![Series::new("old", old_norm), Series::new("new", new_norm)],
        })?;
    }

    for kind in [ChartKind::Bar, ChartKind::Line] {
        let suffix = if kind == ChartKind::Bar { "bar" } else { "line" };
        sink.emit(&Chart {
            name: format!("{}_speedup_{}", stem, suffix),
            title: "Speedup (old / new)".to_string(),
            y_label: "Speedup".to_string(),
            kind,
            labels: labels.clone(),
            series: vec![Series::new("speedup", joined.speedups())],
        })?;
    }

    render_speedup(&joined, format)
}
