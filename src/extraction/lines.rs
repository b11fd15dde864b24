use super::normalize::{is_line_break, normalize};

/// Original and normalized views of a document's text, index-aligned.
///
/// Only constructible from original lines, so `normalized[i]` is always
/// `normalize(original[i])` and both views have the same length.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineSequence {
    original: Vec<String>,
    normalized: Vec<String>,
}

impl LineSequence {
    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let original = lines.into_iter().map(Into::into).collect::<Vec<String>>();
        let normalized = original.iter().map(|line| normalize(line)).collect();
        Self {
            original,
            normalized,
        }
    }

    /// Concatenate page texts in page order, one entry per physical line.
    pub fn from_pages(pages: &[String]) -> Self {
        Self::from_lines(pages.iter().flat_map(|page| split_page_lines(page)))
    }

    pub fn len(&self) -> usize {
        self.original.len()
    }

    pub fn is_empty(&self) -> bool {
        self.original.is_empty()
    }

    pub fn original(&self, index: usize) -> Option<&str> {
        self.original.get(index).map(String::as_str)
    }

    pub fn normalized(&self, index: usize) -> Option<&str> {
        self.normalized.get(index).map(String::as_str)
    }

    pub fn original_lines(&self) -> &[String] {
        &self.original
    }

    pub fn normalized_lines(&self) -> &[String] {
        &self.normalized
    }

    /// Up to `count` original lines starting at `start`, clamped to the end.
    pub fn original_window(&self, start: usize, count: usize) -> &[String] {
        let start = start.min(self.original.len());
        let end = start.saturating_add(count).min(self.original.len());
        &self.original[start..end]
    }
}

/// A trailing break does not open an empty final line.
fn split_page_lines(page: &str) -> Vec<String> {
    let page = page.replace("\r\n", "\n");
    let mut lines = page
        .split(is_line_break)
        .map(ToOwned::to_owned)
        .collect::<Vec<String>>();
    if lines.last().is_some_and(String::is_empty) {
        lines.pop();
    }
    lines
}
