//! CSV export of stored collections.
//!
//! Rendering is independent of where the file ends up. An [`ExportSink`]
//! receives the finished [`CsvExport`]: the REST layer captures it for a
//! download response, and [`DirectorySink`] writes it to disk.
//!
//! The header is taken from the first record's keys in insertion order and
//! every other row is laid out against it. Records with a different key set
//! are still exported (missing keys become empty cells, extra keys are
//! dropped); use [`check_shape`] or [`export_strict`] to refuse such input.

use csv::{QuoteStyle, Terminator, WriterBuilder};
use serde::Serialize;
use serde_json::{Map, Value};
use shared::{AcceptanceLog, BmiRecord, Child, ExportToPathRequest, ExportToPathResponse};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{error, info};

use crate::error::{AppError, AppResult};
use crate::storage::{Collection, RecordStore};

pub const CSV_MIME_TYPE: &str = "text/csv";

type Row = Map<String, Value>;

/// A rendered CSV document ready for delivery
#[derive(Debug, Clone, PartialEq)]
pub struct CsvExport {
    pub filename: String,
    pub content: String,
    pub record_count: usize,
}

impl CsvExport {
    pub fn mime_type(&self) -> &'static str {
        CSV_MIME_TYPE
    }
}

/// Destination for a finished export
pub trait ExportSink: Send {
    fn deliver(&mut self, export: &CsvExport) -> AppResult<()>;
}

/// Keeps the export in memory, for handing back in an HTTP response
#[derive(Debug, Default)]
pub struct CaptureSink {
    pub captured: Option<CsvExport>,
}

impl ExportSink for CaptureSink {
    fn deliver(&mut self, export: &CsvExport) -> AppResult<()> {
        self.captured = Some(export.clone());
        Ok(())
    }
}

/// Writes exports as files inside a directory, creating it if needed
#[derive(Debug)]
pub struct DirectorySink {
    dir: PathBuf,
    written: Option<PathBuf>,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            written: None,
        }
    }

    /// Path of the last file written by this sink
    pub fn written_path(&self) -> Option<&Path> {
        self.written.as_deref()
    }
}

impl ExportSink for DirectorySink {
    fn deliver(&mut self, export: &CsvExport) -> AppResult<()> {
        fs::create_dir_all(&self.dir).map_err(|e| {
            AppError::Internal(format!(
                "Failed to create export directory {}: {}",
                self.dir.display(),
                e
            ))
        })?;

        let path = self.dir.join(&export.filename);
        fs::write(&path, &export.content).map_err(|e| {
            AppError::Internal(format!("Failed to write {}: {}", path.display(), e))
        })?;

        self.written = Some(path);
        Ok(())
    }
}

/// Flatten records into JSON objects, keeping field order
pub fn to_rows<T: Serialize>(records: &[T]) -> AppResult<Vec<Row>> {
    records
        .iter()
        .enumerate()
        .map(|(i, record)| {
            match serde_json::to_value(record)
                .map_err(|e| AppError::Internal(format!("Failed to serialize record {}: {}", i, e)))?
            {
                Value::Object(map) => Ok(map),
                other => Err(AppError::Internal(format!(
                    "Record {} is not an object: {}",
                    i, other
                ))),
            }
        })
        .collect()
}

/// Text of a single cell. Null becomes empty and arrays are comma-joined.
pub fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => match (n.as_i64(), n.as_u64(), n.as_f64()) {
            (Some(i), _, _) => i.to_string(),
            (None, Some(u), _) => u.to_string(),
            (None, None, Some(f)) => f.to_string(),
            _ => n.to_string(),
        },
        Value::String(s) => s.clone(),
        Value::Array(items) => items.iter().map(cell_text).collect::<Vec<_>>().join(","),
        Value::Object(_) => value.to_string(),
    }
}

fn header_of(rows: &[Row]) -> Vec<String> {
    rows.first()
        .map(|row| row.keys().cloned().collect())
        .unwrap_or_default()
}

/// Report the first row whose keys differ from the header's
pub fn check_shape(rows: &[Row]) -> AppResult<()> {
    let header = header_of(rows);

    for (row_index, row) in rows.iter().enumerate().skip(1) {
        let missing: Vec<String> = header
            .iter()
            .filter(|key| !row.contains_key(key.as_str()))
            .cloned()
            .collect();
        let extra: Vec<String> = row
            .keys()
            .filter(|key| !header.contains(key))
            .cloned()
            .collect();

        if !missing.is_empty() || !extra.is_empty() {
            return Err(AppError::ExportShapeMismatch {
                row: row_index,
                missing,
                extra,
            });
        }
    }
    Ok(())
}

/// Render rows as CSV. Every field is quoted and lines are separated by `\n`
/// with no trailing newline.
pub fn render(rows: &[Row]) -> AppResult<String> {
    let header = header_of(rows);

    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    let write_err = |e: csv::Error| AppError::Internal(format!("Failed to write CSV: {}", e));

    writer.write_record(&header).map_err(write_err)?;
    for row in rows {
        let cells: Vec<String> = header
            .iter()
            .map(|key| row.get(key).map(cell_text).unwrap_or_default())
            .collect();
        writer.write_record(&cells).map_err(write_err)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| AppError::Internal(format!("Failed to flush CSV: {}", e)))?;
    let mut content = String::from_utf8(bytes)
        .map_err(|e| AppError::Internal(format!("CSV is not valid UTF-8: {}", e)))?;
    if content.ends_with('\n') {
        content.pop();
    }
    Ok(content)
}

fn build(rows: Vec<Row>, name: &str) -> AppResult<CsvExport> {
    Ok(CsvExport {
        filename: format!("{}.csv", name),
        content: render(&rows)?,
        record_count: rows.len(),
    })
}

/// Render `records` and hand the result to `sink`.
///
/// Empty input returns `Ok(None)` without touching the sink.
pub fn export_to_csv<T: Serialize>(
    records: &[T],
    name: &str,
    sink: &mut dyn ExportSink,
) -> AppResult<Option<CsvExport>> {
    if records.is_empty() {
        info!("Nothing to export for {}", name);
        return Ok(None);
    }

    let export = build(to_rows(records)?, name)?;
    sink.deliver(&export)?;
    Ok(Some(export))
}

/// Like [`export_to_csv`] but refuses records whose keys differ from the first record's
pub fn export_strict<T: Serialize>(
    records: &[T],
    name: &str,
    sink: &mut dyn ExportSink,
) -> AppResult<Option<CsvExport>> {
    if records.is_empty() {
        return Ok(None);
    }

    let rows = to_rows(records)?;
    check_shape(&rows)?;
    let export = build(rows, name)?;
    sink.deliver(&export)?;
    Ok(Some(export))
}

/// Base file name chosen by a caller. Only a bare name is accepted.
fn export_name(requested: Option<&str>, collection: Collection) -> AppResult<String> {
    let name = match requested.map(str::trim) {
        Some(name) if !name.is_empty() => name.strip_suffix(".csv").unwrap_or(name),
        _ => return Ok(collection.report_name().to_string()),
    };

    let valid = name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        && !name.is_empty();
    if !valid {
        return Err(AppError::InvalidInput(format!(
            "Export file name '{}' may only contain letters, digits, '_' and '-'",
            name
        )));
    }
    Ok(name.to_string())
}

/// Export service that turns stored collections into CSV documents
#[derive(Clone)]
pub struct ExportService {
    store: RecordStore,
    export_dir: PathBuf,
}

impl ExportService {
    pub fn new(store: RecordStore, export_dir: impl Into<PathBuf>) -> Self {
        Self {
            store,
            export_dir: export_dir.into(),
        }
    }

    async fn export_into(
        &self,
        collection: Collection,
        name: &str,
        sink: &mut dyn ExportSink,
    ) -> AppResult<Option<CsvExport>> {
        match collection {
            Collection::Children => {
                let records: Vec<Child> = self.store.get_all(collection).await;
                export_to_csv(&records, name, sink)
            }
            Collection::BmiRecords => {
                let records: Vec<BmiRecord> = self.store.get_all(collection).await;
                export_to_csv(&records, name, sink)
            }
            Collection::AcceptanceLogs => {
                let records: Vec<AcceptanceLog> = self.store.get_all(collection).await;
                export_to_csv(&records, name, sink)
            }
        }
    }

    /// Render a collection for download. `None` when the collection is empty.
    pub async fn export_collection(&self, collection: Collection) -> AppResult<Option<CsvExport>> {
        info!("Exporting {:?} for download", collection);
        let mut sink = CaptureSink::default();
        self.export_into(collection, collection.report_name(), &mut sink)
            .await?;
        Ok(sink.captured)
    }

    /// Write a collection into the export directory
    pub async fn export_collection_to(
        &self,
        collection: Collection,
        request: ExportToPathRequest,
    ) -> AppResult<ExportToPathResponse> {
        let name = export_name(request.filename.as_deref(), collection)?;
        info!(
            "Exporting {:?} to {} as {}.csv",
            collection,
            self.export_dir.display(),
            name
        );

        let mut sink = DirectorySink::new(&self.export_dir);
        match self.export_into(collection, &name, &mut sink).await {
            Ok(Some(export)) => {
                let file_path = sink
                    .written_path()
                    .map(|p| p.to_string_lossy().to_string())
                    .unwrap_or_default();
                info!("Exported {} records to {}", export.record_count, file_path);
                Ok(ExportToPathResponse {
                    success: true,
                    message: format!("File exported successfully to: {}", file_path),
                    file_path,
                    record_count: export.record_count,
                })
            }
            Ok(None) => Ok(ExportToPathResponse {
                success: false,
                message: "No records to export".to_string(),
                file_path: String::new(),
                record_count: 0,
            }),
            Err(AppError::Internal(message)) => {
                error!("Export of {:?} failed: {}", collection, message);
                Ok(ExportToPathResponse {
                    success: false,
                    message,
                    file_path: self.export_dir.to_string_lossy().to_string(),
                    record_count: 0,
                })
            }
            Err(e) => Err(e),
        }
    }
}
