//! Moderation tuning knobs.
//!
//! Every threshold the scorer applies is configuration, not a hardcoded
//! business fact: the minimum scope sample, the MAD ratio bands, the score
//! each band assigns, the global wage bounds, and the credit amounts.
//! Values load from a TOML file when present and fall back to the defaults
//! below otherwise.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModerationConfig {
    /// Minimum approved-report count a scope needs before its MAD
    /// statistics are trusted for classification.
    #[serde(default = "default_min_scope_sample")]
    pub min_scope_sample: usize,

    /// `|value − median| / MAD` above which a value is a strong outlier.
    #[serde(default = "default_strong_outlier_ratio")]
    pub strong_outlier_ratio: f64,

    /// Ratio above which (and up to the strong bound) a value is a
    /// moderate outlier.
    #[serde(default = "default_moderate_outlier_ratio")]
    pub moderate_outlier_ratio: f64,

    /// Ratio above which (and up to the moderate bound) a value scores
    /// neutral instead of normal.
    #[serde(default = "default_watch_ratio")]
    pub watch_ratio: f64,

    /// Score for values inside the normal band.
    #[serde(default = "default_score_normal")]
    pub score_normal: i32,

    /// Score for moderate outliers.
    #[serde(default = "default_score_moderate_outlier")]
    pub score_moderate_outlier: i32,

    /// Score for strong outliers and out-of-bounds values.
    #[serde(default = "default_score_strong_outlier")]
    pub score_strong_outlier: i32,

    /// Global minimum plausible wage, smallest-currency-unit per hour.
    #[serde(default = "default_floor_cents")]
    pub floor_cents: i64,

    /// Global maximum plausible wage, smallest-currency-unit per hour.
    #[serde(default = "default_ceiling_cents")]
    pub ceiling_cents: i64,

    /// Credit granted for every approved submission.
    #[serde(default = "default_base_credit")]
    pub base_credit: i64,

    /// One-time bonus for a user's first ever submission.
    #[serde(default = "default_first_report_bonus")]
    pub first_report_bonus: i64,
}

impl Default for ModerationConfig {
    fn default() -> Self {
        Self {
            min_scope_sample: default_min_scope_sample(),
            strong_outlier_ratio: default_strong_outlier_ratio(),
            moderate_outlier_ratio: default_moderate_outlier_ratio(),
            watch_ratio: default_watch_ratio(),
            score_normal: default_score_normal(),
            score_moderate_outlier: default_score_moderate_outlier(),
            score_strong_outlier: default_score_strong_outlier(),
            floor_cents: default_floor_cents(),
            ceiling_cents: default_ceiling_cents(),
            base_credit: default_base_credit(),
            first_report_bonus: default_first_report_bonus(),
        }
    }
}

impl ModerationConfig {
    /// Load the config from `path`, falling back to defaults when the file
    /// does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("read moderation config {}", path.display()))?;
        toml::from_str(&raw)
            .with_context(|| format!("parse moderation config {}", path.display()))
    }
}

const fn default_min_scope_sample() -> usize {
    3
}

const fn default_strong_outlier_ratio() -> f64 {
    6.0
}

const fn default_moderate_outlier_ratio() -> f64 {
    3.0
}

const fn default_watch_ratio() -> f64 {
    1.5
}

const fn default_score_normal() -> i32 {
    5
}

const fn default_score_moderate_outlier() -> i32 {
    -2
}

const fn default_score_strong_outlier() -> i32 {
    -5
}

const fn default_floor_cents() -> i64 {
    500
}

const fn default_ceiling_cents() -> i64 {
    100_000
}

const fn default_base_credit() -> i64 {
    10
}

const fn default_first_report_bonus() -> i64 {
    25
}
