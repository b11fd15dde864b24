use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::commands::inventory::document_name;
use crate::extraction::{CrlvExtractor, Miss};
use crate::model::{
    DocumentFailure, DocumentRecord, ExtractCounts, ExtractionRecord, FieldFoundCount, FieldKey,
};
use crate::render::{RenderOptions, render_pages};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) enum DocumentOutcome {
    Extracted {
        document: DocumentRecord,
        misses: Vec<(FieldKey, Miss)>,
    },
    Failed(DocumentFailure),
}

#[derive(Debug, Default)]
pub(super) struct BatchResults {
    pub(super) records: Vec<DocumentRecord>,
    pub(super) failures: Vec<DocumentFailure>,
}

impl BatchResults {
    pub(super) fn from_outcomes(outcomes: Vec<DocumentOutcome>) -> Self {
        let mut results = Self::default();
        for outcome in outcomes {
            match outcome {
                DocumentOutcome::Extracted { document, .. } => results.records.push(document),
                DocumentOutcome::Failed(failure) => results.failures.push(failure),
            }
        }
        results
    }

    pub(super) fn counts(&self) -> ExtractCounts {
        let fields_found = FieldKey::ALL
            .iter()
            .map(|field| FieldFoundCount {
                field: *field,
                found: self
                    .records
                    .iter()
                    .filter(|document| document.record.get(*field).is_some())
                    .count(),
            })
            .collect();

        ExtractCounts {
            document_count: self.records.len() + self.failures.len(),
            extracted_count: self.records.len(),
            failed_count: self.failures.len(),
            complete_record_count: self
                .records
                .iter()
                .filter(|document| document.record.found_count() == FieldKey::ALL.len())
                .count(),
            fields_found,
        }
    }
}

/// Extract every document independently, returning outcomes in input order.
pub(super) fn process_documents(
    extractor: &CrlvExtractor,
    documents: &[PathBuf],
    options: RenderOptions,
    jobs: Option<usize>,
) -> Result<Vec<DocumentOutcome>> {
    let work = || {
        documents
            .par_iter()
            .map(|path| process_document(extractor, path, options))
            .collect::<Vec<DocumentOutcome>>()
    };

    match jobs {
        Some(threads) => {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(threads)
                .build()
                .context("failed to build extraction worker pool")?;
            Ok(pool.install(work))
        }
        None => Ok(work()),
    }
}

pub(super) fn process_document(
    extractor: &CrlvExtractor,
    path: &Path,
    options: RenderOptions,
) -> DocumentOutcome {
    let arquivo = document_name(path).unwrap_or_else(|_| path.display().to_string());

    match render_pages(path, options) {
        Ok(pages) => {
            let extraction = extractor.extract_pages(&pages);
            let misses = extraction.misses().collect();
            DocumentOutcome::Extracted {
                document: DocumentRecord {
                    arquivo,
                    record: extraction.record,
                },
                misses,
            }
        }
        Err(error) => DocumentOutcome::Failed(DocumentFailure {
            arquivo,
            error: format!("{error:#}"),
        }),
    }
}

pub(super) fn log_outcome(outcome: &DocumentOutcome) {
    match outcome {
        DocumentOutcome::Extracted { document, misses } => {
            for (field, miss) in misses {
                debug!(
                    arquivo = %document.arquivo,
                    field = field.as_str(),
                    reason = miss.as_str(),
                    "field not resolved"
                );
            }
            log_record(&document.arquivo, &document.record);
        }
        DocumentOutcome::Failed(failure) => {
            warn!(arquivo = %failure.arquivo, error = %failure.error, "document skipped");
        }
    }
}

fn log_record(arquivo: &str, record: &ExtractionRecord) {
    let shown = |field: FieldKey| record.get(field).unwrap_or("-");

    info!(
        arquivo = %arquivo,
        renavam = %shown(FieldKey::Renavam),
        placa = %shown(FieldKey::Placa),
        ano_fabricacao = %shown(FieldKey::AnoFabricacao),
        ano_modelo = %shown(FieldKey::AnoModelo),
        marca_modelo_versao = %shown(FieldKey::MarcaModeloVersao),
        cor = %shown(FieldKey::CorPredominante),
        chassi = %shown(FieldKey::TesteChassi),
        "document extracted"
    );
}
