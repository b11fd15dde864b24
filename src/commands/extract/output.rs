use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use csv::WriterBuilder;

use crate::model::{DocumentRecord, FieldKey};
use crate::util::create_output_file;

pub(super) const DEFAULT_CSV_NAME: &str = "resultado_crlv.csv";
pub(super) const DEFAULT_JSON_NAME: &str = "resultado_crlv.json";
pub(super) const DOCUMENT_COLUMN: &str = "arquivo";

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

pub(super) fn csv_header() -> Vec<&'static str> {
    std::iter::once(DOCUMENT_COLUMN)
        .chain(FieldKey::ALL.iter().map(|field| field.as_str()))
        .collect()
}

/// Absent values become empty cells.
pub(super) fn csv_row(document: &DocumentRecord) -> Vec<&str> {
    std::iter::once(document.arquivo.as_str())
        .chain(
            FieldKey::ALL
                .iter()
                .map(|field| document.record.get(*field).unwrap_or("")),
        )
        .collect()
}

pub(super) fn write_csv(path: &Path, records: &[DocumentRecord], with_bom: bool) -> Result<()> {
    let mut output = create_output_file(path)?;
    if with_bom {
        output
            .write_all(UTF8_BOM)
            .with_context(|| format!("failed to write csv file: {}", path.display()))?;
    }

    let mut writer = WriterBuilder::new().from_writer(output);
    writer
        .write_record(csv_header())
        .with_context(|| format!("failed to write csv header: {}", path.display()))?;
    for document in records {
        writer.write_record(csv_row(document)).with_context(|| {
            format!(
                "failed to write csv row for {}: {}",
                document.arquivo,
                path.display()
            )
        })?;
    }
    writer
        .flush()
        .with_context(|| format!("failed to finalize csv file: {}", path.display()))?;

    Ok(())
}
