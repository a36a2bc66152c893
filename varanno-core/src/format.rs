//! Serialization of annotation records to CSV or JSON.

use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;
use std::str::FromStr;

use serde_json::{Map, Value};

use crate::consts::{GENE_FIELDS, VARIANT_FIELDS};
use crate::errors::AnnotError;
use crate::record::FlatRecord;

/// Output serialization format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Csv,
    Json,
}

impl FromStr for OutputFormat {
    type Err = AnnotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "csv" => Ok(OutputFormat::Csv),
            "json" => Ok(OutputFormat::Json),
            other => Err(AnnotError::Validation(format!(
                "unknown output format '{}', expected 'csv' or 'json'",
                other
            ))),
        }
    }
}

/// Where and how a batch's records are written.
///
/// `fields` is an optional ordered allow-list: when given, output columns are
/// exactly the requested fields in the requested order. `destination` of
/// `None` writes to stdout; a path is created or truncated as needed.
#[derive(Debug, Clone, Default)]
pub struct OutputSpec {
    pub format: OutputFormat,
    pub fields: Option<Vec<String>>,
    pub destination: Option<PathBuf>,
}

/// Column set for a record slice: the allow-list when given, else the union
/// of field names across all records in canonical order
/// ([`GENE_FIELDS`]/[`VARIANT_FIELDS`]), independent of which record happens
/// to come first. `freq_<source>` fields keep the normalizer's order after
/// the variant fields; names outside the canonical lists come last in
/// first-seen order.
fn header(records: &[FlatRecord], fields: Option<&[String]>) -> Vec<String> {
    if let Some(fields) = fields {
        return fields.to_vec();
    }
    let mut columns: Vec<String> = Vec::new();
    for record in records {
        for name in record.names() {
            if !columns.iter().any(|c| c == name) {
                columns.push(name.to_string());
            }
        }
    }

    let canonical: &[&str] = if columns.iter().any(|c| c == "variant_id") {
        VARIANT_FIELDS
    } else {
        GENE_FIELDS
    };
    // Stable sort keeps the first-seen order within each group.
    columns.sort_by_key(|column| match canonical.iter().position(|f| f == column) {
        Some(rank) => (0, rank),
        None if column.starts_with("freq_") => (1, 0),
        None => (2, 0),
    });
    columns
}

/// CSV cell rendering: scalars verbatim, absent fields empty, nested values
/// as compact JSON. The csv writer takes care of quoting.
fn cell(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        Some(nested) => nested.to_string(),
    }
}

fn csv_error(e: csv::Error) -> AnnotError {
    match e.into_kind() {
        csv::ErrorKind::Io(inner) => AnnotError::Io(inner),
        other => AnnotError::Io(io::Error::other(format!("csv write failed: {:?}", other))),
    }
}

fn write_csv<W: Write>(records: &[FlatRecord], columns: &[String], out: W) -> Result<(), AnnotError> {
    let mut writer = csv::Writer::from_writer(out);
    writer.write_record(columns).map_err(csv_error)?;
    for record in records {
        let row: Vec<String> = columns.iter().map(|c| cell(record.get(c))).collect();
        writer.write_record(&row).map_err(csv_error)?;
    }
    writer.flush()?;
    Ok(())
}

fn write_json<W: Write>(
    records: &[FlatRecord],
    columns: &[String],
    mut out: W,
) -> Result<(), AnnotError> {
    let objects: Vec<Value> = records
        .iter()
        .map(|record| {
            let mut object = Map::new();
            for column in columns {
                let value = record.get(column).cloned().unwrap_or(Value::Null);
                object.insert(column.clone(), value);
            }
            Value::Object(object)
        })
        .collect();

    serde_json::to_writer_pretty(&mut out, &objects)
        .map_err(|e| AnnotError::Io(io::Error::other(e)))?;
    out.write_all(b"\n")?;
    out.flush()?;
    Ok(())
}

///
/// Write a batch of records according to the output spec.
///
/// CSV and JSON carry exactly the same key set for a given record slice, so
/// the two formats are value-equivalent. A write failure is an
/// [`AnnotError::Io`] and is fatal to the run; the destination file handle is
/// dropped (and therefore closed) on every exit path.
///
pub fn write_records(records: &[FlatRecord], spec: &OutputSpec) -> Result<(), AnnotError> {
    let columns = header(records, spec.fields.as_deref());

    match &spec.destination {
        Some(path) => {
            let file = File::create(path)?;
            match spec.format {
                OutputFormat::Csv => write_csv(records, &columns, file),
                OutputFormat::Json => write_json(records, &columns, file),
            }
        }
        None => {
            let stdout = io::stdout();
            let handle = stdout.lock();
            match spec.format {
                OutputFormat::Csv => write_csv(records, &columns, handle),
                OutputFormat::Json => write_json(records, &columns, handle),
            }
        }
    }
}
