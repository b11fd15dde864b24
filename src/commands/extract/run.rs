use anyhow::Result;
use chrono::Utc;
use tracing::{info, warn};

use super::*;
use crate::cli::ExtractArgs;
use crate::commands::inventory::discover_documents;
use crate::extraction::{CrlvExtractor, LayoutProfile};
use crate::model::{ExtractPaths, ExtractRunManifest, ToolVersions};
use crate::render::pdftotext_version;
use crate::util::{now_utc_string, utc_compact_string, write_json_pretty};

pub fn run(args: ExtractArgs) -> Result<()> {
    let started_ts = Utc::now();
    let started_at = now_utc_string();
    let run_id = format!("run-{}", utc_compact_string(started_ts));

    let output_dir = args
        .output_dir
        .clone()
        .unwrap_or_else(|| args.input_dir.clone());
    let csv_path = args
        .csv_path
        .clone()
        .unwrap_or_else(|| output_dir.join(DEFAULT_CSV_NAME));
    let json_path = args
        .json_path
        .clone()
        .unwrap_or_else(|| output_dir.join(DEFAULT_JSON_NAME));
    let manifest_path = args.manifest_path.clone().unwrap_or_else(|| {
        output_dir.join("manifests").join(format!(
            "extract_run_{}.json",
            utc_compact_string(started_ts)
        ))
    });

    info!(input_dir = %args.input_dir.display(), run_id = %run_id, "starting extraction");

    let profile = LayoutProfile::load(args.render.layout_profile.as_deref())?;
    let extractor = CrlvExtractor::new(profile)?;

    let documents = discover_documents(&args.input_dir)?;
    if documents.is_empty() {
        warn!(input_dir = %args.input_dir.display(), "no PDF or text documents found");
    }

    let outcomes = process_documents(
        &extractor,
        &documents,
        args.render.render_options(),
        args.jobs,
    )?;
    outcomes.iter().for_each(log_outcome);

    let results = BatchResults::from_outcomes(outcomes);
    let counts = results.counts();

    write_csv(&csv_path, &results.records, !args.no_csv_bom)?;
    info!(path = %csv_path.display(), "wrote csv results");
    write_json_pretty(&json_path, &results.records)?;
    info!(path = %json_path.display(), "wrote json results");

    let manifest = ExtractRunManifest {
        manifest_version: 1,
        run_id,
        started_at,
        completed_at: now_utc_string(),
        command: extract_command_string(&args),
        tool_versions: ToolVersions {
            crlv: env!("CARGO_PKG_VERSION").to_string(),
            pdftotext: pdftotext_version(),
        },
        paths: ExtractPaths {
            input_dir: args.input_dir.display().to_string(),
            csv_path: csv_path.display().to_string(),
            json_path: json_path.display().to_string(),
            manifest_path: manifest_path.display().to_string(),
        },
        layout_profile: extractor.profile().clone(),
        counts,
        failures: results.failures,
    };
    write_json_pretty(&manifest_path, &manifest)?;
    info!(path = %manifest_path.display(), "wrote extraction run manifest");

    info!(
        documents = manifest.counts.document_count,
        extracted = manifest.counts.extracted_count,
        failed = manifest.counts.failed_count,
        complete = manifest.counts.complete_record_count,
        "extraction completed"
    );

    Ok(())
}

fn extract_command_string(args: &ExtractArgs) -> String {
    let mut command = vec![
        "crlv".to_string(),
        "extract".to_string(),
        "--input-dir".to_string(),
        args.input_dir.display().to_string(),
    ];

    if let Some(path) = &args.output_dir {
        command.push("--output-dir".to_string());
        command.push(path.display().to_string());
    }
    if let Some(path) = &args.csv_path {
        command.push("--csv-path".to_string());
        command.push(path.display().to_string());
    }
    if let Some(path) = &args.json_path {
        command.push("--json-path".to_string());
        command.push(path.display().to_string());
    }
    if let Some(path) = &args.manifest_path {
        command.push("--manifest-path".to_string());
        command.push(path.display().to_string());
    }
    if let Some(jobs) = args.jobs {
        command.push("--jobs".to_string());
        command.push(jobs.to_string());
    }
    if args.no_csv_bom {
        command.push("--no-csv-bom".to_string());
    }
    if args.render.layout {
        command.push("--layout".to_string());
    }
    if let Some(max_pages) = args.render.max_pages {
        command.push("--max-pages".to_string());
        command.push(max_pages.to_string());
    }
    if let Some(path) = &args.render.layout_profile {
        command.push("--layout-profile".to_string());
        command.push(path.display().to_string());
    }

    command.join(" ")
}
