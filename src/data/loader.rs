use std::path::{Path, PathBuf};
use std::sync::Arc;

use arrow::array::{Array, AsArray};
use arrow::datatypes::{DataType, Float32Type, Float64Type, Int32Type, Int64Type};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::catalog::{parse_partition_name, YearKey};
use super::model::{CellValue, RawDataset};
use crate::error::{DashboardError, DashboardResult};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Reads year partitions out of one directory.
#[derive(Debug, Clone)]
pub struct DatasetLoader {
    dir: PathBuf,
}

impl DatasetLoader {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Path of the partition for `year`. The directory listing is searched
    /// the same way the catalog reads it, so any key the catalog lists
    /// resolves; when several formats exist the preferred extension wins.
    pub fn resolve(&self, year: &YearKey) -> DashboardResult<PathBuf> {
        let not_found = || DashboardError::DatasetNotFound {
            year: year.clone(),
            dir: self.dir.clone(),
        };
        let entries = match std::fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Err(not_found()),
            Err(e) => return Err(e.into()),
        };

        let mut best: Option<(usize, PathBuf)> = None;
        for entry in entries {
            let entry = entry?;
            let Some((key, preference)) = entry.file_name().to_str().and_then(parse_partition_name)
            else {
                continue;
            };
            let better = best.as_ref().map_or(true, |(current, _)| preference < *current);
            if key == *year && better && entry.path().is_file() {
                best = Some((preference, entry.path()));
            }
        }
        best.map(|(_, path)| path).ok_or_else(not_found)
    }

    /// Load the partition for `year`. Values are not cleaned or coerced.
    pub fn load(&self, year: &YearKey) -> DashboardResult<RawDataset> {
        let path = self.resolve(year)?;
        let (columns, rows) = load_file(&path)?;
        log::info!(
            "Loaded {} rows x {} columns for {year} from {}",
            rows.len(),
            columns.len(),
            path.display()
        );
        Ok(RawDataset {
            year: year.clone(),
            source: path,
            columns,
            rows,
        })
    }
}

/// Column names plus rows of cells, as parsed from one partition file.
type Table = (Vec<String>, Vec<Vec<CellValue>>);

/// Parse one file, dispatching by extension.
///
/// Supported formats:
/// * `.csv`     – header row, comma-delimited rows
/// * `.json`    – `[{ "Country": "...", "Happiness Score": 7.5, ... }, ...]`
/// * `.parquet` – flat string / integer / float / boolean columns
pub fn load_file(path: &Path) -> DashboardResult<Table> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "csv" => load_csv(path),
        "json" => load_json(path),
        "parquet" | "pq" => load_parquet(path),
        other => Err(DashboardError::parse(
            path,
            format!("unsupported file extension: .{other}"),
        )),
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

fn load_csv(path: &Path) -> DashboardResult<Table> {
    let mut reader = csv::Reader::from_path(path).map_err(|e| csv_error(path, e))?;
    let columns: Vec<String> = reader
        .headers()
        .map_err(|e| csv_error(path, e))?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let mut rows = Vec::new();
    for result in reader.records() {
        // Ragged rows surface here: the reader is not `flexible`.
        let record = result.map_err(|e| csv_error(path, e))?;
        rows.push(record.iter().map(CellValue::infer).collect());
    }
    Ok((columns, rows))
}

fn csv_error(path: &Path, error: csv::Error) -> DashboardError {
    match error.kind() {
        csv::ErrorKind::Io(io) => DashboardError::Io(std::io::Error::new(io.kind(), error.to_string())),
        _ => DashboardError::parse(path, error.to_string()),
    }
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Records-oriented JSON, as `df.to_json(orient='records')` writes it.
/// Keys absent from a record are missing cells.
fn load_json(path: &Path) -> DashboardResult<Table> {
    let text = std::fs::read_to_string(path)?;
    let root: JsonValue =
        serde_json::from_str(&text).map_err(|e| DashboardError::parse(path, e.to_string()))?;

    let records = root
        .as_array()
        .ok_or_else(|| DashboardError::parse(path, "expected a top-level JSON array"))?;

    let mut columns: Vec<String> = Vec::new();
    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .ok_or_else(|| DashboardError::parse(path, format!("row {i} is not a JSON object")))?;
        for key in obj.keys() {
            if !columns.contains(key) {
                columns.push(key.clone());
            }
        }
    }

    let rows = records
        .iter()
        .filter_map(JsonValue::as_object)
        .map(|obj| {
            columns
                .iter()
                .map(|col| obj.get(col).map(json_to_cell).unwrap_or(CellValue::Null))
                .collect()
        })
        .collect();

    Ok((columns, rows))
}

fn json_to_cell(val: &JsonValue) -> CellValue {
    match val {
        JsonValue::String(s) => CellValue::infer(s),
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

fn load_parquet(path: &Path) -> DashboardResult<Table> {
    let parse = |e: &dyn std::fmt::Display| DashboardError::parse(path, e.to_string());

    let file = std::fs::File::open(path)?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file).map_err(|e| parse(&e))?;
    let columns: Vec<String> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();
    let reader = builder.build().map_err(|e| parse(&e))?;

    let mut rows = Vec::new();
    for batch_result in reader {
        let batch = batch_result.map_err(|e| parse(&e))?;
        let offset = rows.len();
        for row in 0..batch.num_rows() {
            let cells = batch
                .columns()
                .iter()
                .map(|col| extract_cell(col, row))
                .collect::<Result<Vec<_>, String>>()
                .map_err(|e| parse(&format!("row {}: {e}", offset + row)))?;
            rows.push(cells);
        }
    }
    Ok((columns, rows))
}

/// Extract a single cell from an Arrow column at a given row.
fn extract_cell(col: &Arc<dyn Array>, row: usize) -> Result<CellValue, String> {
    if col.is_null(row) {
        return Ok(CellValue::Null);
    }
    let cell = match col.data_type() {
        DataType::Utf8 => CellValue::infer(col.as_string::<i32>().value(row)),
        DataType::LargeUtf8 => CellValue::infer(col.as_string::<i64>().value(row)),
        DataType::Int32 => CellValue::Integer(col.as_primitive::<Int32Type>().value(row) as i64),
        DataType::Int64 => CellValue::Integer(col.as_primitive::<Int64Type>().value(row)),
        DataType::Float32 => CellValue::Float(col.as_primitive::<Float32Type>().value(row) as f64),
        DataType::Float64 => CellValue::Float(col.as_primitive::<Float64Type>().value(row)),
        DataType::Boolean => CellValue::Bool(col.as_boolean().value(row)),
        other => return Err(format!("unsupported column type {other:?}")),
    };
    Ok(cell)
}
