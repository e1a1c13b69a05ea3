//! Record writers
//!
//! JSON lines and tab-separated text go to any `Write`; Parquet goes to a
//! file through an Arrow record batch built from a normalized `Table`.

use super::table::{render_cell, Table};
use crate::error::{Error, Result};
use crate::types::JsonValue;
use arrow::array::{ArrayRef, BooleanArray, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use parquet::basic::Compression;
use parquet::file::properties::WriterProperties;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

/// Buffered writer to a file, or to stdout when no path is given
pub fn open_output(path: Option<&Path>) -> Result<Box<dyn Write>> {
    match path {
        Some(path) => {
            let file = File::create(path).map_err(|e| {
                Error::output(format!("Failed to create {}: {e}", path.display()))
            })?;
            Ok(Box::new(BufWriter::new(file)))
        }
        None => Ok(Box::new(BufWriter::new(io::stdout()))),
    }
}

/// Write one JSON document per record
pub fn write_json_lines<W: Write>(writer: &mut W, records: &[JsonValue]) -> Result<usize> {
    for record in records {
        serde_json::to_writer(&mut *writer, record)?;
        writer.write_all(b"\n")?;
    }
    writer.flush()?;
    Ok(records.len())
}

/// Write a header line and one tab-separated line per row
pub fn write_pretty<W: Write>(writer: &mut W, table: &Table) -> Result<usize> {
    if table.columns().is_empty() {
        writer.flush()?;
        return Ok(0);
    }

    writeln!(writer, "{}", table.columns().join("\t"))?;
    for row in table.rows() {
        let line: Vec<String> = table
            .columns()
            .iter()
            .map(|column| sanitize(&render_cell(row.get(column))))
            .collect();
        writeln!(writer, "{}", line.join("\t"))?;
    }
    writer.flush()?;
    Ok(table.len())
}

fn sanitize(cell: &str) -> String {
    cell.replace(['\t', '\n', '\r'], " ")
}

/// Convert a table into a record batch.
///
/// Each column becomes Boolean, Int64 or Float64 when every non-null value
/// fits, and Utf8 otherwise (non-string values as JSON text).
pub fn table_to_batch(table: &Table) -> Result<RecordBatch> {
    let mut fields = Vec::with_capacity(table.columns().len());
    let mut arrays: Vec<ArrayRef> = Vec::with_capacity(table.columns().len());

    for column in table.columns() {
        let data_type = infer_column_type(table.column_values(column));
        let array: ArrayRef = match data_type {
            DataType::Boolean => Arc::new(BooleanArray::from(
                table
                    .column_values(column)
                    .map(JsonValue::as_bool)
                    .collect::<Vec<_>>(),
            )),
            DataType::Int64 => Arc::new(Int64Array::from(
                table
                    .column_values(column)
                    .map(JsonValue::as_i64)
                    .collect::<Vec<_>>(),
            )),
            DataType::Float64 => Arc::new(Float64Array::from(
                table
                    .column_values(column)
                    .map(JsonValue::as_f64)
                    .collect::<Vec<_>>(),
            )),
            _ => Arc::new(StringArray::from(
                table
                    .column_values(column)
                    .map(|v| (!v.is_null()).then(|| render_cell(Some(v))))
                    .collect::<Vec<_>>(),
            )),
        };
        fields.push(Field::new(column, data_type, true));
        arrays.push(array);
    }

    RecordBatch::try_new(Arc::new(Schema::new(fields)), arrays)
        .map_err(|e| Error::output(format!("Failed to build record batch: {e}")))
}

fn infer_column_type<'a>(values: impl Iterator<Item = &'a JsonValue>) -> DataType {
    let mut inferred: Option<DataType> = None;

    for value in values {
        let current = match value {
            JsonValue::Null => continue,
            JsonValue::Bool(_) => DataType::Boolean,
            JsonValue::Number(n) if n.is_i64() => DataType::Int64,
            JsonValue::Number(_) => DataType::Float64,
            _ => return DataType::Utf8,
        };
        inferred = Some(match (inferred, current) {
            (None, t) => t,
            (Some(a), b) if a == b => a,
            (Some(DataType::Int64 | DataType::Float64), DataType::Int64 | DataType::Float64) => {
                DataType::Float64
            }
            _ => return DataType::Utf8,
        });
    }

    inferred.unwrap_or(DataType::Utf8)
}

/// Write a table to a Snappy-compressed Parquet file.
///
/// A table without columns writes no file.
pub fn write_parquet(path: &Path, table: &Table) -> Result<usize> {
    if table.columns().is_empty() {
        debug!("No columns, skipping Parquet output to {}", path.display());
        return Ok(0);
    }

    let batch = table_to_batch(table)?;
    let file = File::create(path)
        .map_err(|e| Error::output(format!("Failed to create {}: {e}", path.display())))?;
    let props = WriterProperties::builder()
        .set_compression(Compression::SNAPPY)
        .build();

    let mut writer = ArrowWriter::try_new(file, batch.schema(), Some(props))
        .map_err(|e| Error::output(format!("Failed to create Parquet writer: {e}")))?;
    writer
        .write(&batch)
        .map_err(|e| Error::output(format!("Failed to write batch: {e}")))?;
    writer
        .close()
        .map_err(|e| Error::output(format!("Failed to close Parquet writer: {e}")))?;

    Ok(batch.num_rows())
}
