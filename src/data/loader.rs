use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result, bail};
use arrow::array::{Array, ArrayRef, AsArray};
use arrow::datatypes::{DataType, Float32Type, Float64Type, Int32Type, Int64Type};
use arrow::util::display::array_value_to_string;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::model::{CellValue, Column, Dataset};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a measurement table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row of column names, one sample per row (primary)
/// * `.json`    – `[{ "Strains": "A.J_1", "CE(16:0)": 1.2, ... }, ...]`
/// * `.parquet` – flat scalar columns
///
/// The dataset is named after the file stem.
pub fn load_file(path: &Path) -> Result<Dataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let name = dataset_name(path);
    let columns = match ext.as_str() {
        "csv" => load_csv(path)?,
        "json" => load_json(path)?,
        "parquet" | "pq" => load_parquet(path)?,
        other => bail!("Unsupported file extension: .{other}"),
    };
    let dataset = Dataset::new(name, columns)
        .with_context(|| format!("building dataset from {}", path.display()))?;
    log::info!(
        "Loaded '{}': {} rows × {} columns",
        dataset.name(),
        dataset.len(),
        dataset.n_columns()
    );
    Ok(dataset)
}

/// Registry key for a file: its stem, or the whole path if it has none.
pub fn dataset_name(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .map(str::to_string)
        .unwrap_or_else(|| path.display().to_string())
}

/// Turn per-column cell buffers into typed columns, preserving order.
fn into_columns(headers: Vec<String>, cells: Vec<Vec<CellValue>>) -> Vec<Column> {
    unique_headers(headers)
        .into_iter()
        .zip(cells)
        .map(|(name, values)| Column::from_cells(name, values))
        .collect()
}

/// Rename repeated headers `X`, `X` to `X`, `X.1` so every column stays
/// addressable by name.
fn unique_headers(headers: Vec<String>) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::with_capacity(headers.len());
    let mut out = Vec::with_capacity(headers.len());
    for name in headers {
        let mut unique = name.clone();
        let mut n = 0;
        while seen.contains(&unique) {
            n += 1;
            unique = format!("{name}.{n}");
        }
        if n > 0 {
            log::warn!("Duplicate column '{name}' renamed to '{unique}'");
        }
        seen.insert(unique.clone());
        out.push(unique);
    }
    out
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with column names, then one row per sample.
/// Every cell is type-guessed; empty cells and [`NA_TOKENS`] are missing
/// values.
fn load_csv(path: &Path) -> Result<Vec<Column>> {
    let mut reader = csv::Reader::from_path(path).context("opening CSV")?;
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let mut cells: Vec<Vec<CellValue>> = vec![Vec::new(); headers.len()];

    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        for (col_idx, buffer) in cells.iter_mut().enumerate() {
            buffer.push(guess_cell_type(record.get(col_idx).unwrap_or("")));
        }
    }

    Ok(into_columns(headers, cells))
}

/// Cell texts read as missing values, the same set pandas uses by default.
const NA_TOKENS: [&str; 19] = [
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

fn guess_cell_type(s: &str) -> CellValue {
    let s = s.trim();
    if NA_TOKENS.contains(&s) {
        return CellValue::Null;
    }
    if let Ok(i) = s.parse::<i64>() {
        return CellValue::Integer(i);
    }
    if let Ok(f) = s.parse::<f64>() {
        // Spellings like "+nan" or "NAN" still parse to NaN.
        return if f.is_nan() {
            CellValue::Null
        } else {
            CellValue::Float(f)
        };
    }
    if s == "true" || s == "false" {
        return CellValue::Bool(s == "true");
    }
    CellValue::String(s.to_string())
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, `df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "Strains": "A.J_1", "CE(16:0)": 1.5, "PC(34:1)": null },
///   ...
/// ]
/// ```
///
/// Column order is the key order of the records; keys missing from a record
/// are missing values.
fn load_json(path: &Path) -> Result<Vec<Column>> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;

    let records = root.as_array().context("Expected top-level JSON array")?;

    let mut headers: Vec<String> = Vec::new();
    let mut cells: Vec<Vec<CellValue>> = Vec::new();

    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .with_context(|| format!("Row {i} is not a JSON object"))?;

        for key in obj.keys() {
            if !headers.contains(key) {
                headers.push(key.clone());
                // Earlier rows did not have this column.
                cells.push(vec![CellValue::Null; i]);
            }
        }
        for (name, buffer) in headers.iter().zip(cells.iter_mut()) {
            buffer.push(obj.get(name).map(json_to_cell).unwrap_or(CellValue::Null));
        }
    }

    Ok(into_columns(headers, cells))
}

fn json_to_cell(val: &JsonValue) -> CellValue {
    match val {
        JsonValue::String(s) => CellValue::String(s.clone()),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                CellValue::Integer(i)
            } else if let Some(f) = n.as_f64() {
                CellValue::Float(f)
            } else {
                CellValue::String(n.to_string())
            }
        }
        JsonValue::Bool(b) => CellValue::Bool(*b),
        JsonValue::Null => CellValue::Null,
        other => CellValue::String(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file with one scalar column per measurement.
///
/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`). Types other than strings, integers,
/// floats and booleans are read as their display text.
fn load_parquet(path: &Path) -> Result<Vec<Column>> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let headers: Vec<String> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();
    let reader = builder.build().context("building parquet reader")?;

    let mut cells: Vec<Vec<CellValue>> = vec![Vec::new(); headers.len()];

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        for (col_idx, buffer) in cells.iter_mut().enumerate() {
            let col = batch.column(col_idx);
            buffer.extend((0..batch.num_rows()).map(|row| extract_cell(col, row)));
        }
    }

    Ok(into_columns(headers, cells))
}

/// Extract a single cell from an Arrow column at a given row.
fn extract_cell(col: &ArrayRef, row: usize) -> CellValue {
    if col.is_null(row) {
        return CellValue::Null;
    }
    match col.data_type() {
        DataType::Utf8 => CellValue::String(col.as_string::<i32>().value(row).to_string()),
        DataType::LargeUtf8 => CellValue::String(col.as_string::<i64>().value(row).to_string()),
        DataType::Int32 => CellValue::Integer(col.as_primitive::<Int32Type>().value(row) as i64),
        DataType::Int64 => CellValue::Integer(col.as_primitive::<Int64Type>().value(row)),
        DataType::Float32 => CellValue::Float(col.as_primitive::<Float32Type>().value(row) as f64),
        DataType::Float64 => {
            let v = col.as_primitive::<Float64Type>().value(row);
            // Pandas writes missing floats as NaN rather than null.
            if v.is_nan() {
                CellValue::Null
            } else {
                CellValue::Float(v)
            }
        }
        DataType::Boolean => CellValue::Bool(col.as_boolean().value(row)),
        _ => array_value_to_string(col, row)
            .map(CellValue::String)
            .unwrap_or(CellValue::Null),
    }
}
