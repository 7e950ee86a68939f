use std::collections::BTreeSet;
use std::path::Path;

use arrow::array::{Array, ArrayRef, AsArray};
use arrow::datatypes::{DataType, Float32Type, Float64Type, Int32Type, Int64Type};
use arrow::util::display::array_value_to_string;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::error::{LoadError, Result};
use super::model::{CellValue, Dataset};

/// Cell texts read as missing values, compared case-insensitively.
const NULL_MARKERS: [&str; 4] = ["na", "n/a", "nan", "null"];

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a transaction table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv` / `.txt` / no extension – comma-separated with a header row
/// * `.tsv`     – tab-separated with a header row
/// * `.json`    – `[{ "gender": "Female", "price": 12.5, ... }, ...]`
/// * `.parquet` – flat columns of strings, integers, floats or booleans
pub fn load_file(path: &Path) -> Result<Dataset> {
    if !path.exists() {
        return Err(LoadError::NotFound {
            path: path.to_path_buf(),
        });
    }

    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let dataset = match ext.as_str() {
        "csv" | "txt" | "" => load_delimited(path, b',')?,
        "tsv" => load_delimited(path, b'\t')?,
        "json" => load_json(path)?,
        "parquet" | "pq" => load_parquet(path)?,
        other => {
            return Err(LoadError::UnsupportedFormat {
                path: path.to_path_buf(),
                extension: other.to_string(),
            })
        }
    };

    log::info!(
        "Loaded {} rows from {} with columns {:?}",
        dataset.len(),
        path.display(),
        dataset.column_names().collect::<Vec<_>>()
    );
    Ok(dataset)
}

// ---------------------------------------------------------------------------
// Delimited text loader
// ---------------------------------------------------------------------------

/// Header row with column names, one record per line. Column types are
/// inferred per column from the cell texts.
fn load_delimited(path: &Path, delimiter: u8) -> Result<Dataset> {
    let csv_err = |source| LoadError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(csv_err)?;

    let headers: Vec<String> = reader
        .headers()
        .map_err(csv_err)?
        .iter()
        .map(|h| h.to_string())
        .collect();
    check_headers(path, &headers)?;

    let mut raw_rows: Vec<csv::StringRecord> = Vec::new();
    for result in reader.records() {
        raw_rows.push(result.map_err(csv_err)?);
    }

    let mut rows: Vec<Vec<CellValue>> = vec![Vec::with_capacity(headers.len()); raw_rows.len()];
    for col_idx in 0..headers.len() {
        let texts: Vec<&str> = raw_rows
            .iter()
            .map(|r| r.get(col_idx).unwrap_or(""))
            .collect();
        for (row, cell) in rows.iter_mut().zip(parse_column(&texts)) {
            row.push(cell);
        }
    }

    Ok(Dataset::from_rows(headers, rows))
}

fn check_headers(path: &Path, headers: &[String]) -> Result<()> {
    if headers.iter().all(|h| h.is_empty()) {
        return Err(LoadError::Format {
            path: path.to_path_buf(),
            reason: "missing header row".into(),
        });
    }
    let mut seen = BTreeSet::new();
    for h in headers {
        if !seen.insert(h.as_str()) {
            return Err(LoadError::Format {
                path: path.to_path_buf(),
                reason: format!("duplicate column '{h}'"),
            });
        }
    }
    Ok(())
}

fn is_null_text(s: &str) -> bool {
    s.is_empty() || NULL_MARKERS.iter().any(|m| s.eq_ignore_ascii_case(m))
}

/// Parse one column of cell texts. Integers when every non-null cell is an
/// integer, floats when every non-null cell is a number, text otherwise.
fn parse_column(texts: &[&str]) -> Vec<CellValue> {
    let present = || texts.iter().filter(|t| !is_null_text(t));
    let any_present = present().next().is_some();
    let all_int = any_present && present().all(|t| t.parse::<i64>().is_ok());
    let all_num = any_present && present().all(|t| t.parse::<f64>().is_ok());

    texts
        .iter()
        .map(|&t| {
            if is_null_text(t) {
                return CellValue::Null;
            }
            if all_int {
                if let Ok(i) = t.parse::<i64>() {
                    return CellValue::Integer(i);
                }
            }
            if all_num {
                if let Ok(f) = t.parse::<f64>() {
                    return CellValue::Float(f);
                }
            }
            CellValue::String(t.to_string())
        })
        .collect()
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, `df.to_json(orient='records')`).
/// Keys missing from a record read as null.
fn load_json(path: &Path) -> Result<Dataset> {
    let text = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let root: JsonValue = serde_json::from_str(&text).map_err(|source| LoadError::Json {
        path: path.to_path_buf(),
        source,
    })?;

    let records = root.as_array().ok_or_else(|| LoadError::Format {
        path: path.to_path_buf(),
        reason: "expected a top-level JSON array".into(),
    })?;

    let mut objects = Vec::with_capacity(records.len());
    for (i, rec) in records.iter().enumerate() {
        let obj = rec.as_object().ok_or_else(|| LoadError::Format {
            path: path.to_path_buf(),
            reason: format!("row {i} is not a JSON object"),
        })?;
        objects.push(obj);
    }

    // Column order follows first appearance across records.
    let mut headers: Vec<String> = Vec::new();
    let mut seen = BTreeSet::new();
    for obj in &objects {
        for key in obj.keys() {
            if seen.insert(key.as_str()) {
                headers.push(key.clone());
            }
        }
    }

    let rows = objects
        .iter()
        .map(|obj| {
            headers
                .iter()
                .map(|h| obj.get(h).map(json_to_cell).unwrap_or(CellValue::Null))
                .collect()
        })
        .collect();

    Ok(Dataset::from_rows(headers, rows))
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

/// Load a Parquet file with one flat column per attribute.
///
/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`).
fn load_parquet(path: &Path) -> Result<Dataset> {
    let parquet_err = |source| LoadError::Parquet {
        path: path.to_path_buf(),
        source,
    };

    let file = std::fs::File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file).map_err(parquet_err)?;
    let headers: Vec<String> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();
    let reader = builder.build().map_err(parquet_err)?;

    let mut rows = Vec::new();
    for batch_result in reader {
        let batch = batch_result.map_err(|source| LoadError::Arrow {
            path: path.to_path_buf(),
            source,
        })?;
        for row in 0..batch.num_rows() {
            rows.push(
                batch
                    .columns()
                    .iter()
                    .map(|col| extract_cell(col, row))
                    .collect(),
            );
        }
    }

    Ok(Dataset::from_rows(headers, rows))
}

/// Extract a single cell from an Arrow column at a given row.
fn extract_cell(col: &ArrayRef, row: usize) -> CellValue {
    if col.is_null(row) {
        return CellValue::Null;
    }
    let cell = match col.data_type() {
        DataType::Utf8 => col
            .as_string_opt::<i32>()
            .map(|a| CellValue::String(a.value(row).to_string())),
        DataType::LargeUtf8 => col
            .as_string_opt::<i64>()
            .map(|a| CellValue::String(a.value(row).to_string())),
        DataType::Int32 => col
            .as_primitive_opt::<Int32Type>()
            .map(|a| CellValue::Integer(a.value(row) as i64)),
        DataType::Int64 => col
            .as_primitive_opt::<Int64Type>()
            .map(|a| CellValue::Integer(a.value(row))),
        DataType::Float32 => col
            .as_primitive_opt::<Float32Type>()
            .map(|a| CellValue::Float(a.value(row) as f64)),
        DataType::Float64 => col
            .as_primitive_opt::<Float64Type>()
            .map(|a| CellValue::Float(a.value(row))),
        DataType::Boolean => col.as_boolean_opt().map(|a| CellValue::Bool(a.value(row))),
        _ => array_value_to_string(col, row).ok().map(CellValue::String),
    };
    cell.unwrap_or(CellValue::Null)
}
