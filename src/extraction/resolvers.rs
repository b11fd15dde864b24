use serde::Serialize;

use super::labels::LabelIndex;
use super::layout::LayoutProfile;
use super::lines::LineSequence;
use super::lookahead::next_valid_line;
use super::normalize::{normalize, title_case};
use super::patterns::PatternLibrary;
use crate::model::FieldKey;

/// Characters removed from the RENAVAM block so that a number wrapped or
/// grouped with dots still reads as one digit run.
const RENAVAM_SEPARATORS: [char; 2] = ['.', ' '];

/// Why a field resolved to absence.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Miss {
    LabelNotFound,
    PatternMismatch,
    HorizonExhausted,
}

impl Miss {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::LabelNotFound => "label_not_found",
            Self::PatternMismatch => "pattern_mismatch",
            Self::HorizonExhausted => "horizon_exhausted",
        }
    }
}

pub type FieldOutcome = std::result::Result<String, Miss>;

/// Resolves field values for one document from its located labels.
#[derive(Debug, Clone, Copy)]
pub struct FieldResolver<'a> {
    lines: &'a LineSequence,
    labels: &'a LabelIndex,
    patterns: &'a PatternLibrary,
    profile: &'a LayoutProfile,
}

impl<'a> FieldResolver<'a> {
    pub fn new(
        lines: &'a LineSequence,
        labels: &'a LabelIndex,
        patterns: &'a PatternLibrary,
        profile: &'a LayoutProfile,
    ) -> Self {
        Self {
            lines,
            labels,
            patterns,
            profile,
        }
    }

    pub fn resolve(&self, field: FieldKey) -> FieldOutcome {
        match field {
            FieldKey::Renavam => self.renavam(),
            FieldKey::Placa => self.placa(),
            FieldKey::AnoFabricacao | FieldKey::AnoModelo => self.year(field),
            FieldKey::MarcaModeloVersao => self
                .scanned_line(field, self.profile.make_model_offset)
                .map(ToOwned::to_owned),
            FieldKey::CorPredominante => self
                .scanned_line(field, self.profile.color_offset)
                .map(|line| title_case(&normalize(line))),
            FieldKey::TesteChassi => self
                .scanned_line(field, self.profile.chassis_offset)
                .map(|line| title_case(&normalize(line))),
        }
    }

    fn label(&self, field: FieldKey) -> Result<usize, Miss> {
        self.labels.get(field).ok_or(Miss::LabelNotFound)
    }

    fn renavam(&self) -> FieldOutcome {
        let label = self.label(FieldKey::Renavam)?;

        let block = self
            .lines
            .original_window(label.saturating_add(1), self.profile.renavam_window)
            .join(" ")
            .replace(&RENAVAM_SEPARATORS[..], "");
        if let Some(found) = self.patterns.find_renavam(&block) {
            return Ok(found.to_string());
        }

        // Dense digit runs are rare elsewhere in the document, so a
        // document-wide search is an acceptable fallback.
        let document = self.lines.original_lines().join(" ");
        self.patterns
            .find_renavam(&document)
            .map(ToOwned::to_owned)
            .ok_or(Miss::PatternMismatch)
    }

    fn placa(&self) -> FieldOutcome {
        let label = self.label(FieldKey::Placa)?;

        let block = normalize(
            &self
                .lines
                .original_window(label, self.profile.plate_window)
                .join(" "),
        );
        if let Some(found) = self.patterns.find_plate(&block) {
            return Ok(found.to_string());
        }

        let document = self.lines.normalized_lines().join(" ");
        self.patterns
            .find_plate(&document)
            .map(ToOwned::to_owned)
            .ok_or(Miss::PatternMismatch)
    }

    /// Scanned line first; only when it holds no year are the fixed probe
    /// offsets tried. Never searches past the probe range.
    fn year(&self, field: FieldKey) -> FieldOutcome {
        let label = self.label(field)?;

        let scanned = label
            .checked_add(self.profile.year_scan_offset)
            .and_then(|start| {
                next_valid_line(
                    self.lines,
                    start,
                    self.profile.max_lookahead,
                    &self.profile.placeholder_token,
                )
            });
        if let Some(year) = scanned.and_then(|line| self.patterns.find_year(line)) {
            return Ok(year.to_string());
        }

        // Stops at the end of the document whatever the configured range.
        let probed = (self.profile.year_probe_first_offset..=self.profile.year_probe_last_offset)
            .map_while(|offset| {
                label
                    .checked_add(offset)
                    .and_then(|index| self.lines.original(index))
            })
            .find_map(|line| self.patterns.find_year(line));

        match probed {
            Some(year) => Ok(year.to_string()),
            None if scanned.is_none() => Err(Miss::HorizonExhausted),
            None => Err(Miss::PatternMismatch),
        }
    }

    fn scanned_line(&self, field: FieldKey, offset: usize) -> Result<&'a str, Miss> {
        let label = self.label(field)?;
        let start = label.checked_add(offset).ok_or(Miss::HorizonExhausted)?;
        next_valid_line(
            self.lines,
            start,
            self.profile.max_lookahead,
            &self.profile.placeholder_token,
        )
        .ok_or(Miss::HorizonExhausted)
    }
}
