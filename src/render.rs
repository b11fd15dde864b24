use std::fs;
use std::path::Path;
use std::process::Command;

use anyhow::{Context, Result, bail};

const PAGE_BREAK: char = '\u{000C}';

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderOptions {
    /// Ask pdftotext to keep the physical column layout.
    pub layout: bool,
    pub max_pages: Option<usize>,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum DocumentKind {
    Pdf,
    Text,
}

impl DocumentKind {
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?;
        if extension.eq_ignore_ascii_case("pdf") {
            Some(Self::Pdf)
        } else if extension.eq_ignore_ascii_case("txt") {
            Some(Self::Text)
        } else {
            None
        }
    }
}

/// Render a document into page texts, in page order.
pub fn render_pages(path: &Path, options: RenderOptions) -> Result<Vec<String>> {
    match DocumentKind::from_path(path) {
        Some(DocumentKind::Pdf) => render_pdf_pages(path, options),
        Some(DocumentKind::Text) => read_text_pages(path, options.max_pages),
        None => bail!("unsupported document type: {}", path.display()),
    }
}

fn render_pdf_pages(path: &Path, options: RenderOptions) -> Result<Vec<String>> {
    let mut command = Command::new("pdftotext");
    command.arg("-enc").arg("UTF-8").arg("-f").arg("1");
    if options.layout {
        command.arg("-layout");
    }
    if let Some(max_pages) = options.max_pages {
        command.arg("-l").arg(max_pages.to_string());
    }
    command.arg(path).arg("-");

    let output = command
        .output()
        .with_context(|| format!("failed to execute pdftotext for {}", path.display()))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        bail!(
            "pdftotext returned non-zero exit status for {}: {}",
            path.display(),
            stderr.trim()
        );
    }

    Ok(split_pages(&String::from_utf8_lossy(&output.stdout), None))
}

fn read_text_pages(path: &Path, max_pages: Option<usize>) -> Result<Vec<String>> {
    let raw = fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    let text = String::from_utf8(raw)
        .with_context(|| format!("document is not valid UTF-8: {}", path.display()))?;
    Ok(split_pages(&text, max_pages))
}

pub fn split_pages(raw: &str, max_pages: Option<usize>) -> Vec<String> {
    let mut pages: Vec<String> = raw
        .split(PAGE_BREAK)
        .map(|chunk| chunk.replace('\u{0000}', ""))
        .collect();

    while let Some(last_page) = pages.last() {
        if last_page.trim().is_empty() {
            pages.pop();
            continue;
        }
        break;
    }

    if let Some(max_pages) = max_pages {
        pages.truncate(max_pages);
    }

    pages
}

pub fn pdftotext_version() -> Option<String> {
    let output = Command::new("pdftotext").arg("-v").output().ok()?;

    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    let source = if stdout.trim().is_empty() {
        stderr.trim()
    } else {
        stdout.trim()
    };

    source
        .lines()
        .next()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| line.to_string())
}
