use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use tracing::info;

use crate::cli::InventoryArgs;
use crate::model::{DocumentEntry, DocumentInventoryManifest};
use crate::render::DocumentKind;
use crate::util::{digest_file, now_utc_string, write_json_pretty};

pub fn run(args: InventoryArgs) -> Result<()> {
    let manifest = build_manifest(&args.input_dir)?;

    if args.dry_run {
        info!(
            document_count = manifest.document_count,
            source = %manifest.source_directory,
            "inventory dry-run complete"
        );
        return Ok(());
    }

    let manifest_path = args
        .manifest_path
        .unwrap_or_else(|| args.input_dir.join("crlv_inventory.json"));

    write_json_pretty(&manifest_path, &manifest)?;
    info!(path = %manifest_path.display(), "wrote inventory manifest");
    info!(document_count = manifest.document_count, "inventory completed");

    Ok(())
}

pub fn build_manifest(input_dir: &Path) -> Result<DocumentInventoryManifest> {
    let document_paths = discover_documents(input_dir)?;

    if document_paths.is_empty() {
        bail!("no PDF or text documents found in {}", input_dir.display());
    }

    let mut documents = Vec::with_capacity(document_paths.len());
    for path in document_paths {
        let digest = digest_file(&path)?;
        documents.push(DocumentEntry {
            filename: document_name(&path)?,
            sha256: digest.sha256,
            size_bytes: digest.size_bytes,
        });
    }

    Ok(DocumentInventoryManifest {
        manifest_version: 1,
        generated_at: now_utc_string(),
        source_directory: input_dir.display().to_string(),
        document_count: documents.len(),
        documents,
    })
}

/// Renderable documents directly inside `input_dir`, sorted by path.
pub fn discover_documents(input_dir: &Path) -> Result<Vec<PathBuf>> {
    let mut documents = Vec::new();

    let entries = fs::read_dir(input_dir)
        .with_context(|| format!("failed to read {}", input_dir.display()))?;

    for entry in entries {
        let entry =
            entry.with_context(|| format!("failed to read entry in {}", input_dir.display()))?;
        let path = entry.path();

        if !entry
            .file_type()
            .with_context(|| format!("failed to inspect file type: {}", path.display()))?
            .is_file()
        {
            continue;
        }

        if DocumentKind::from_path(&path).is_some() {
            documents.push(path);
        }
    }

    documents.sort();
    Ok(documents)
}

pub fn document_name(path: &Path) -> Result<String> {
    path.file_name()
        .and_then(|name| name.to_str())
        .map(ToOwned::to_owned)
        .with_context(|| format!("invalid UTF-8 filename: {}", path.display()))
}
