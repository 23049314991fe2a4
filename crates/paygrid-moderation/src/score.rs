//! Sanity scoring for new wage reports.
//!
//! Scope resolution walks outward until it finds a trustworthy peer
//! population: the report's location first, then its organization, then
//! the configured global bounds. A scope is trustworthy when it holds at
//! least `min_scope_sample` approved reports; smaller populations produce
//! MAD values too noisy to classify against.
//!
//! Scoring is best-effort by contract: a failure retrieving statistics is
//! logged and the report gets the neutral score 0, so a submission is
//! never blocked by the moderation read path.

use rusqlite::Connection;
use tracing::{debug, warn};

use crate::config::ModerationConfig;
use crate::stats::{Scope, ScopeStats, scope_stats};
use paygrid_core::model::wage::{NewWageReport, WageStatus};

/// Classify `value_cents` against a scope's robust statistics.
///
/// With a degenerate spread (`mad == 0`) only an exact match with the
/// median is normal; everything else is neutral. Otherwise the ratio
/// `|value − median| / mad` is placed into the configured bands.
#[must_use]
pub fn classify_against(value_cents: i64, stats: &ScopeStats, cfg: &ModerationConfig) -> i32 {
    #[allow(clippy::cast_precision_loss)]
    let deviation = (value_cents as f64 - stats.median).abs();

    if stats.mad.abs() <= f64::EPSILON {
        return if deviation <= f64::EPSILON {
            cfg.score_normal
        } else {
            0
        };
    }

    let ratio = deviation / stats.mad;
    if ratio > cfg.strong_outlier_ratio {
        cfg.score_strong_outlier
    } else if ratio > cfg.moderate_outlier_ratio {
        cfg.score_moderate_outlier
    } else if ratio > cfg.watch_ratio {
        0
    } else {
        cfg.score_normal
    }
}

/// Absolute-bounds fallback when no scope has a trustworthy population.
#[must_use]
pub fn bounds_score(value_cents: i64, cfg: &ModerationConfig) -> i32 {
    if value_cents < cfg.floor_cents || value_cents > cfg.ceiling_cents {
        cfg.score_strong_outlier
    } else {
        0
    }
}

/// Compute the sanity score for a report that is about to be inserted.
///
/// Never fails: any statistics retrieval error is logged and the neutral
/// score 0 is returned so the submission proceeds.
#[must_use]
pub fn sanity_score(conn: &Connection, report: &NewWageReport, cfg: &ModerationConfig) -> i32 {
    for scope in candidate_scopes(report) {
        match scope_stats(conn, scope) {
            Ok(stats) if stats.count >= cfg.min_scope_sample => {
                let score = classify_against(report.hourly_cents, &stats, cfg);
                debug!(
                    %scope,
                    count = stats.count,
                    median = stats.median,
                    mad = stats.mad,
                    score,
                    "scored against scope statistics"
                );
                return score;
            }
            Ok(stats) => {
                debug!(%scope, count = stats.count, "scope population too small, widening");
            }
            Err(error) => {
                warn!(error = %error, "statistics unavailable, scoring neutral");
                return 0;
            }
        }
    }

    bounds_score(report.hourly_cents, cfg)
}

/// One-shot status assignment at creation time. Later peer-population
/// drift never retroactively rescores an existing report.
#[must_use]
pub const fn initial_status(sanity_score: i32) -> WageStatus {
    if sanity_score >= 0 {
        WageStatus::Approved
    } else {
        WageStatus::Pending
    }
}

fn candidate_scopes(report: &NewWageReport) -> Vec<Scope> {
    let mut scopes = Vec::with_capacity(2);
    if let Some(location_id) = report.location_id {
        scopes.push(Scope::Location(location_id));
    }
    if let Some(organization_id) = report.organization_id {
        scopes.push(Scope::Organization(organization_id));
    }
    scopes
}
