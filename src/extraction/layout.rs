use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::normalize::normalize;

/// Largest offset, window, or horizon a profile may configure, in lines.
pub const MAX_LINE_SPAN: usize = 64;

/// Per-field line offsets and horizons relating each label to its value.
///
/// Offsets are counted from the label line. A JSON profile may override
/// any subset of these; missing keys keep their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LayoutProfile {
    pub max_lookahead: usize,
    pub placeholder_token: String,
    /// Lines after the RENAVAM label joined into the search block.
    pub renavam_window: usize,
    /// Lines starting at the plate label (label line included).
    pub plate_window: usize,
    pub year_scan_offset: usize,
    pub year_probe_first_offset: usize,
    pub year_probe_last_offset: usize,
    pub make_model_offset: usize,
    pub color_offset: usize,
    pub chassis_offset: usize,
}

impl Default for LayoutProfile {
    fn default() -> Self {
        Self {
            max_lookahead: 8,
            placeholder_token: "NULL".to_string(),
            renavam_window: 6,
            plate_window: 6,
            year_scan_offset: 1,
            year_probe_first_offset: 2,
            year_probe_last_offset: 7,
            make_model_offset: 4,
            color_offset: 3,
            chassis_offset: 3,
        }
    }
}

impl LayoutProfile {
    /// Default profile, or the one stored at `path` when given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };

        let raw =
            fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
        let profile: Self = serde_json::from_slice(&raw)
            .with_context(|| format!("failed to parse layout profile {}", path.display()))?;
        let profile = profile
            .validated()
            .with_context(|| format!("invalid layout profile {}", path.display()))?;

        info!(path = %path.display(), "loaded layout profile");
        Ok(profile)
    }

    pub fn validated(mut self) -> Result<Self> {
        for (name, value) in self.line_spans() {
            if value > MAX_LINE_SPAN {
                bail!("{name} ({value}) exceeds the limit of {MAX_LINE_SPAN} lines");
            }
        }
        if self.renavam_window == 0 {
            bail!("renavam_window must be at least 1");
        }
        if self.plate_window == 0 {
            bail!("plate_window must be at least 1");
        }
        if self.year_probe_first_offset > self.year_probe_last_offset {
            bail!(
                "year_probe_first_offset ({}) is past year_probe_last_offset ({})",
                self.year_probe_first_offset,
                self.year_probe_last_offset
            );
        }

        self.placeholder_token = normalize(&self.placeholder_token);
        if self.placeholder_token.is_empty() {
            bail!("placeholder_token must not be blank");
        }

        Ok(self)
    }

    fn line_spans(&self) -> [(&'static str, usize); 9] {
        [
            ("max_lookahead", self.max_lookahead),
            ("renavam_window", self.renavam_window),
            ("plate_window", self.plate_window),
            ("year_scan_offset", self.year_scan_offset),
            ("year_probe_first_offset", self.year_probe_first_offset),
            ("year_probe_last_offset", self.year_probe_last_offset),
            ("make_model_offset", self.make_model_offset),
            ("color_offset", self.color_offset),
            ("chassis_offset", self.chassis_offset),
        ]
    }
}
