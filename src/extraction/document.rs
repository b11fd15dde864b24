use anyhow::Result;
use serde::Serialize;

use super::labels::{LABEL_TABLE, LabelIndex, locate};
use super::layout::LayoutProfile;
use super::lines::LineSequence;
use super::patterns::PatternLibrary;
use super::resolvers::{FieldResolver, Miss};
use crate::model::{ExtractionRecord, FieldKey};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldResolution {
    pub field: FieldKey,
    pub value: Option<String>,
    pub miss: Option<Miss>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentExtraction {
    pub labels: LabelIndex,
    pub resolutions: Vec<FieldResolution>,
    pub record: ExtractionRecord,
}

impl DocumentExtraction {
    pub fn misses(&self) -> impl Iterator<Item = (FieldKey, Miss)> + '_ {
        self.resolutions
            .iter()
            .filter_map(|resolution| resolution.miss.map(|miss| (resolution.field, miss)))
    }
}

/// Compiled patterns plus layout profile, shared read-only by every
/// document of a batch.
#[derive(Debug, Clone)]
pub struct CrlvExtractor {
    patterns: PatternLibrary,
    profile: LayoutProfile,
}

impl CrlvExtractor {
    pub fn new(profile: LayoutProfile) -> Result<Self> {
        Ok(Self {
            patterns: PatternLibrary::new()?,
            profile,
        })
    }

    pub fn profile(&self) -> &LayoutProfile {
        &self.profile
    }

    pub fn extract_pages(&self, pages: &[String]) -> DocumentExtraction {
        self.extract(&LineSequence::from_pages(pages))
    }

    pub fn extract(&self, lines: &LineSequence) -> DocumentExtraction {
        let labels = locate(lines.normalized_lines(), &LABEL_TABLE);
        let resolver = FieldResolver::new(lines, &labels, &self.patterns, &self.profile);

        let mut record = ExtractionRecord::default();
        let mut resolutions = Vec::with_capacity(FieldKey::ALL.len());
        for field in FieldKey::ALL {
            let resolution = match resolver.resolve(field) {
                Ok(value) => FieldResolution {
                    field,
                    value: Some(value),
                    miss: None,
                },
                Err(miss) => FieldResolution {
                    field,
                    value: None,
                    miss: Some(miss),
                },
            };
            record.set(field, resolution.value.clone());
            resolutions.push(resolution);
        }

        DocumentExtraction {
            labels,
            resolutions,
            record,
        }
    }
}
