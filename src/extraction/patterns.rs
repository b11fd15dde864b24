use anyhow::{Context, Result};
use regex::Regex;

/// Shape validators for the dense machine-readable fields.
#[derive(Debug, Clone)]
pub struct PatternLibrary {
    plate: Regex,
    year: Regex,
    renavam: Regex,
}

impl PatternLibrary {
    pub fn new() -> Result<Self> {
        Ok(Self {
            // ABC1234 (legacy) or ABC1D23 (Mercosul)
            plate: Regex::new(r"\b([A-Z]{3}\d{4}|[A-Z]{3}\d[A-Z]\d{2})\b")
                .context("failed to compile plate regex")?,
            year: Regex::new(r"\b(19|20)\d{2}\b").context("failed to compile year regex")?,
            renavam: Regex::new(r"\b\d{9,12}\b").context("failed to compile renavam regex")?,
        })
    }

    pub fn find_plate<'a>(&self, text: &'a str) -> Option<&'a str> {
        self.plate.find(text).map(|found| found.as_str())
    }

    pub fn find_year<'a>(&self, text: &'a str) -> Option<&'a str> {
        self.year.find(text).map(|found| found.as_str())
    }

    pub fn find_renavam<'a>(&self, text: &'a str) -> Option<&'a str> {
        self.renavam.find(text).map(|found| found.as_str())
    }
}
