use std::io::{self, Write};

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{info, warn};

use crate::cli::InspectArgs;
use crate::commands::inventory::document_name;
use crate::extraction::{CrlvExtractor, FieldResolution, LabelIndex, LayoutProfile, LineSequence};
use crate::render::render_pages;

#[derive(Debug, Serialize)]
struct InspectedLine<'a> {
    index: usize,
    original: &'a str,
    normalized: &'a str,
}

#[derive(Debug, Serialize)]
struct InspectReport<'a> {
    arquivo: String,
    page_count: usize,
    line_count: usize,
    layout_profile: &'a LayoutProfile,
    labels: &'a LabelIndex,
    fields: &'a [FieldResolution],
    lines: Vec<InspectedLine<'a>>,
}

pub fn run(args: InspectArgs) -> Result<()> {
    let profile = LayoutProfile::load(args.render.layout_profile.as_deref())?;
    let extractor = CrlvExtractor::new(profile)?;

    let pages = render_pages(&args.document, args.render.render_options())?;
    let lines = LineSequence::from_pages(&pages);
    let extraction = extractor.extract(&lines);

    if lines.is_empty() {
        warn!(document = %args.document.display(), "document rendered no text");
    } else if extraction.labels.is_empty() {
        warn!(document = %args.document.display(), "no field labels located");
    }

    info!(
        document = %args.document.display(),
        pages = pages.len(),
        lines = lines.len(),
        labels = extraction.labels.len(),
        found = extraction.record.found_count(),
        "inspected document"
    );

    let report = InspectReport {
        arquivo: document_name(&args.document)?,
        page_count: pages.len(),
        line_count: lines.len(),
        layout_profile: extractor.profile(),
        labels: &extraction.labels,
        fields: &extraction.resolutions,
        lines: inspected_lines(&lines),
    };

    let mut output = io::BufWriter::new(io::stdout().lock());
    serde_json::to_writer_pretty(&mut output, &report)
        .context("failed to serialize inspect json output")?;
    writeln!(output)?;
    output.flush()?;
    Ok(())
}

fn inspected_lines(lines: &LineSequence) -> Vec<InspectedLine<'_>> {
    lines
        .original_lines()
        .iter()
        .zip(lines.normalized_lines())
        .enumerate()
        .map(|(index, (original, normalized))| InspectedLine {
            index,
            original,
            normalized,
        })
        .collect()
}
