//! Runtime table persistence and per-image aggregation.
//!
//! The runtime table has one row per image:
//! `image,start,end,run_0..run_{N-1},cpu_time_0..cpu_time_{N-1}`.
//! The summary table has one `avg_time, avg_cpu_time` line per image, in
//! runtime-table order.

use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

use anyhow::{Context, Result};
use csv::{ReaderBuilder, StringRecord, WriterBuilder};
use imagenet_utils::{format_decimal, mean, round_to};

use crate::measure::ImageResult;

/// Written in place of a timing whose repetition failed.
pub const NO_DATA: &str = "NA";
/// Header line of the summary table.
pub const SUMMARY_HEADER: &str = "avg_time, avg_cpu_time";

const LEADING_COLUMNS: [&str; 3] = ["image", "start", "end"];

/// Mean timings of one image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SummaryRow {
    pub avg_time: Option<f64>,
    pub avg_cpu_time: Option<f64>,
}

/// Column names of a runtime table with `repeat_count` repetitions.
pub fn runtime_header(repeat_count: usize) -> Vec<String> {
    let mut header: Vec<String> = LEADING_COLUMNS.iter().map(|c| c.to_string()).collect();
    header.extend((0..repeat_count).map(|i| format!("run_{i}")));
    header.extend((0..repeat_count).map(|i| format!("cpu_time_{i}")));
    header
}

/// Write the raw runtime table. The parent directory must already exist.
pub fn write_runtime_table(
    path: &Path,
    results: &[ImageResult],
    repeat_count: usize,
) -> Result<()> {
    for result in results {
        anyhow::ensure!(
            result.network_times.len() == repeat_count && result.cpu_times.len() == repeat_count,
            "{} has {} device and {} host timings, expected {repeat_count}",
            result.image,
            result.network_times.len(),
            result.cpu_times.len()
        );
    }

    let file = File::create(path)
        .with_context(|| format!("failed to create runtime table {}", path.display()))?;
    let mut writer = WriterBuilder::new().from_writer(BufWriter::new(file));
    writer
        .write_record(runtime_header(repeat_count))
        .context("failed to write runtime table header")?;
    for result in results {
        let mut row = Vec::with_capacity(3 + 2 * repeat_count);
        row.push(result.image.clone());
        row.push(format_decimal(result.start));
        row.push(format_decimal(result.end));
        row.extend(result.network_times.iter().map(|t| format_cell(*t)));
        row.extend(result.cpu_times.iter().map(|t| format_cell(*t)));
        writer
            .write_record(&row)
            .with_context(|| format!("failed to write runtime row for {}", result.image))?;
    }
    writer
        .flush()
        .with_context(|| format!("failed to flush runtime table {}", path.display()))?;
    Ok(())
}

/// Compute per-image means from a runtime table written with `repeat_count` repetitions.
///
/// The header is validated first, so a stale table written with a different
/// repetition count is rejected instead of misparsed. Missing cells are
/// skipped; a group without any value averages to `None`.
pub fn aggregate_runtime_table(path: &Path, repeat_count: usize) -> Result<Vec<SummaryRow>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .with_context(|| format!("failed to open runtime table {}", path.display()))?;

    let header = reader
        .headers()
        .with_context(|| format!("failed to read header of {}", path.display()))?
        .clone();
    validate_header(&header, repeat_count)
        .with_context(|| format!("unexpected layout in {}", path.display()))?;

    let mut rows = Vec::new();
    for (line, record) in reader.records().enumerate() {
        let record =
            record.with_context(|| format!("failed to read row {} of {}", line + 1, path.display()))?;
        let row = summarize_record(&record, repeat_count)
            .with_context(|| format!("malformed row {} in {}", line + 1, path.display()))?;
        rows.push(row);
    }
    Ok(rows)
}

/// Write the summary table.
pub fn write_summary_table(path: &Path, rows: &[SummaryRow]) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("failed to create summary table {}", path.display()))?;
    let mut out = BufWriter::new(file);
    writeln!(out, "{SUMMARY_HEADER}")?;
    for row in rows {
        writeln!(
            out,
            "{}, {}",
            format_cell(row.avg_time),
            format_cell(row.avg_cpu_time)
        )?;
    }
    out.flush()
        .with_context(|| format!("failed to flush summary table {}", path.display()))?;
    Ok(())
}

fn validate_header(header: &StringRecord, repeat_count: usize) -> Result<()> {
    let expected = runtime_header(repeat_count);
    let actual_runs = header.iter().filter(|h| h.starts_with("run_")).count();
    anyhow::ensure!(
        header.len() == expected.len(),
        "table has {} columns ({actual_runs} run columns), expected {} for {repeat_count} repetitions",
        header.len(),
        expected.len()
    );
    for (idx, (actual, wanted)) in header.iter().zip(&expected).enumerate() {
        anyhow::ensure!(
            actual == wanted,
            "column {idx} is '{actual}', expected '{wanted}'"
        );
    }
    Ok(())
}

fn summarize_record(record: &StringRecord, repeat_count: usize) -> Result<SummaryRow> {
    anyhow::ensure!(
        record.len() == 3 + 2 * repeat_count,
        "expected {} fields, found {}",
        3 + 2 * repeat_count,
        record.len()
    );
    // start and end are validated but not used further
    parse_cell(&record[1]).context("invalid start timestamp")?;
    parse_cell(&record[2]).context("invalid end timestamp")?;

    let network = present_values(record, 3..3 + repeat_count)?;
    let cpu = present_values(record, 3 + repeat_count..3 + 2 * repeat_count)?;
    Ok(SummaryRow {
        avg_time: mean(&network).map(|m| round_to(m, 2)),
        avg_cpu_time: mean(&cpu).map(|m| round_to(m, 2)),
    })
}

fn present_values(record: &StringRecord, range: std::ops::Range<usize>) -> Result<Vec<f64>> {
    let mut values = Vec::with_capacity(range.len());
    for idx in range {
        if let Some(value) =
            parse_cell(&record[idx]).with_context(|| format!("invalid value in column {idx}"))?
        {
            values.push(value);
        }
    }
    Ok(values)
}

fn parse_cell(cell: &str) -> Result<Option<f64>> {
    let cell = cell.trim();
    if cell.is_empty() || cell == NO_DATA {
        return Ok(None);
    }
    let value = cell
        .parse::<f64>()
        .with_context(|| format!("'{cell}' is not a number"))?;
    Ok(Some(value))
}

fn format_cell(value: Option<f64>) -> String {
    value.map_or_else(|| NO_DATA.to_string(), format_decimal)
}
