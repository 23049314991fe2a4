//! Wage-report lifecycle state machine.
//!
//! The pipeline runs synchronously inside each triggering write's
//! transaction and keeps three pieces of derived state exactly in sync
//! with the report's approval status:
//!
//! - the per-location and per-organization approved-report counters,
//!   adjusted exactly once for every crossing of the approved boundary,
//!   in either direction, floored at zero;
//! - the `wages`/`locations`/`organizations` cache versions, bumped after
//!   every committed mutation whether or not the boundary was crossed;
//! - gamification credit, awarded only on first-time approved creation
//!   and never replayed on later status transitions.
//!
//! Scoring and credit awarding are best-effort collaborators: their
//! failures are logged and absorbed so a submission is never blocked by a
//! non-essential subsystem. Counter and cache writes are not — any failure
//! there rolls back the whole mutation.

#![allow(clippy::module_name_repetitions)]

use anyhow::{Context as AnyhowContext, anyhow};
use rusqlite::{Connection, TransactionBehavior, params};
use tracing::warn;

use crate::config::ModerationConfig;
use crate::credit::{CreditSink, REASON_FIRST_REPORT, REASON_WAGE_SUBMITTED};
use crate::score;
use paygrid_core::cache::{self, Resource};
use paygrid_core::error::ErrorCode;
use paygrid_core::model::now_us;
use paygrid_core::model::place::{
    decrement_location_count, decrement_organization_count, increment_location_count,
    increment_organization_count,
};
use paygrid_core::model::wage::{NewWageReport, WageReport, WageStatus, count_user_reports, get_wage_report};

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// Errors surfaced by wage-report writes.
#[derive(Debug, thiserror::Error)]
pub enum ModerationError {
    /// The report being mutated does not exist.
    #[error("wage report not found: {0}")]
    ReportNotFound(i64),

    /// An underlying database error.
    #[error(transparent)]
    Db(#[from] anyhow::Error),
}

impl ModerationError {
    /// Stable machine-readable code for this error.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::ReportNotFound(_) => ErrorCode::WageReportNotFound,
            Self::Db(_) => ErrorCode::CorruptStore,
        }
    }
}

// ---------------------------------------------------------------------------
// Pipeline
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Adjust {
    Increment,
    Decrement,
}

/// The moderation pipeline: scoring at creation plus the counter/cache
/// state machine over the report lifecycle.
pub struct ModerationPipeline<'s> {
    cfg: ModerationConfig,
    credits: &'s dyn CreditSink,
}

impl<'s> ModerationPipeline<'s> {
    #[must_use]
    pub const fn new(cfg: ModerationConfig, credits: &'s dyn CreditSink) -> Self {
        Self { cfg, credits }
    }

    #[must_use]
    pub const fn config(&self) -> &ModerationConfig {
        &self.cfg
    }

    /// Persist a new wage report: score it against its peers, assign the
    /// one-shot status, adjust counters and credit if it lands approved,
    /// and bump the cache versions — all in one transaction.
    ///
    /// # Errors
    ///
    /// Returns [`ModerationError::Db`] on store failure. Scoring and
    /// credit failures are absorbed and never abort the submission.
    pub fn submit(
        &self,
        conn: &mut Connection,
        new: &NewWageReport,
    ) -> Result<WageReport, ModerationError> {
        let tx = conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .context("begin wage submit")?;

        let sanity_score = score::sanity_score(&tx, new, &self.cfg);
        let status = score::initial_status(sanity_score);

        let now = now_us();
        tx.execute(
            "INSERT INTO wage_reports (
                user_id, location_id, organization_id, hourly_cents,
                status, sanity_score, is_deleted, created_at_us, updated_at_us
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, 0, ?7, ?7)",
            params![
                new.user_id,
                new.location_id,
                new.organization_id,
                new.hourly_cents,
                status.as_str(),
                sanity_score,
                now
            ],
        )
        .context("insert wage report")?;
        let wage_id = tx.last_insert_rowid();

        if status.is_approved() {
            adjust_place_counters(&tx, new.location_id, new.organization_id, Adjust::Increment)?;

            if let Some(user_id) = new.user_id {
                self.award_logged(&tx, user_id, self.cfg.base_credit, REASON_WAGE_SUBMITTED);
                if count_user_reports(&tx, user_id)? == 1 {
                    self.award_logged(&tx, user_id, self.cfg.first_report_bonus, REASON_FIRST_REPORT);
                }
            }
        }

        bump_wage_caches(&tx)?;
        let report = get_wage_report(&tx, wage_id)?
            .ok_or_else(|| anyhow!("wage report {wage_id} vanished inside its own transaction"))?;
        tx.commit().context("commit wage submit")?;

        tracing::debug!(wage_id, score = sanity_score, status = %status, "wage report submitted");
        Ok(report)
    }

    /// Apply a moderation status change, adjusting counters when the
    /// approved boundary is crossed. Creation-time credit is never
    /// replayed here.
    ///
    /// # Errors
    ///
    /// Returns [`ModerationError::ReportNotFound`] or
    /// [`ModerationError::Db`].
    pub fn set_status(
        &self,
        conn: &mut Connection,
        wage_id: i64,
        status: WageStatus,
    ) -> Result<WageReport, ModerationError> {
        let tx = conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .context("begin status change")?;

        let before =
            get_wage_report(&tx, wage_id)?.ok_or(ModerationError::ReportNotFound(wage_id))?;

        if status != before.status {
            tx.execute(
                "UPDATE wage_reports SET status = ?2, updated_at_us = ?3 WHERE wage_id = ?1",
                params![wage_id, status.as_str(), now_us()],
            )
            .context("update wage status")?;

            // A soft-deleted report is already outside the counted set;
            // its status can change without touching the counters.
            if !before.is_deleted {
                match (before.status.is_approved(), status.is_approved()) {
                    (false, true) => adjust_place_counters(
                        &tx,
                        before.location_id,
                        before.organization_id,
                        Adjust::Increment,
                    )?,
                    (true, false) => adjust_place_counters(
                        &tx,
                        before.location_id,
                        before.organization_id,
                        Adjust::Decrement,
                    )?,
                    _ => {}
                }
            }
        }

        bump_wage_caches(&tx)?;
        let report = get_wage_report(&tx, wage_id)?
            .ok_or_else(|| anyhow!("wage report {wage_id} vanished inside its own transaction"))?;
        tx.commit().context("commit status change")?;
        Ok(report)
    }

    /// Soft-delete a report. An approved report leaves the counted set.
    ///
    /// # Errors
    ///
    /// Returns [`ModerationError::ReportNotFound`] or
    /// [`ModerationError::Db`].
    pub fn soft_delete(
        &self,
        conn: &mut Connection,
        wage_id: i64,
    ) -> Result<WageReport, ModerationError> {
        let tx = conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .context("begin soft delete")?;

        let before =
            get_wage_report(&tx, wage_id)?.ok_or(ModerationError::ReportNotFound(wage_id))?;

        if !before.is_deleted {
            tx.execute(
                "UPDATE wage_reports
                 SET is_deleted = 1, deleted_at_us = ?2, updated_at_us = ?2
                 WHERE wage_id = ?1",
                params![wage_id, now_us()],
            )
            .context("soft delete wage report")?;

            if before.status.is_approved() {
                adjust_place_counters(
                    &tx,
                    before.location_id,
                    before.organization_id,
                    Adjust::Decrement,
                )?;
            }
        }

        bump_wage_caches(&tx)?;
        let report = get_wage_report(&tx, wage_id)?
            .ok_or_else(|| anyhow!("wage report {wage_id} vanished inside its own transaction"))?;
        tx.commit().context("commit soft delete")?;
        Ok(report)
    }

    /// Restore a soft-deleted report. An approved report re-enters the
    /// counted set.
    ///
    /// # Errors
    ///
    /// Returns [`ModerationError::ReportNotFound`] or
    /// [`ModerationError::Db`].
    pub fn restore(
        &self,
        conn: &mut Connection,
        wage_id: i64,
    ) -> Result<WageReport, ModerationError> {
        let tx = conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .context("begin restore")?;

        let before =
            get_wage_report(&tx, wage_id)?.ok_or(ModerationError::ReportNotFound(wage_id))?;

        if before.is_deleted {
            tx.execute(
                "UPDATE wage_reports
                 SET is_deleted = 0, deleted_at_us = NULL, updated_at_us = ?2
                 WHERE wage_id = ?1",
                params![wage_id, now_us()],
            )
            .context("restore wage report")?;

            if before.status.is_approved() {
                adjust_place_counters(
                    &tx,
                    before.location_id,
                    before.organization_id,
                    Adjust::Increment,
                )?;
            }
        }

        bump_wage_caches(&tx)?;
        let report = get_wage_report(&tx, wage_id)?
            .ok_or_else(|| anyhow!("wage report {wage_id} vanished inside its own transaction"))?;
        tx.commit().context("commit restore")?;
        Ok(report)
    }

    /// Permanently delete a report. Terminal: counters are adjusted one
    /// final time and the row is gone.
    ///
    /// # Errors
    ///
    /// Returns [`ModerationError::ReportNotFound`] or
    /// [`ModerationError::Db`].
    pub fn hard_delete(&self, conn: &mut Connection, wage_id: i64) -> Result<(), ModerationError> {
        let tx = conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .context("begin hard delete")?;

        let before =
            get_wage_report(&tx, wage_id)?.ok_or(ModerationError::ReportNotFound(wage_id))?;

        if before.counts_as_approved() {
            adjust_place_counters(
                &tx,
                before.location_id,
                before.organization_id,
                Adjust::Decrement,
            )?;
        }

        tx.execute(
            "DELETE FROM wage_reports WHERE wage_id = ?1",
            params![wage_id],
        )
        .context("hard delete wage report")?;

        bump_wage_caches(&tx)?;
        tx.commit().context("commit hard delete")?;

        tracing::debug!(wage_id, "wage report permanently deleted");
        Ok(())
    }

    fn award_logged(&self, conn: &Connection, user_id: i64, amount: i64, reason: &str) {
        if let Err(error) = self.credits.award(conn, user_id, amount, reason) {
            warn!(error = %error, "credit award failed; submission proceeds");
        }
    }
}

fn adjust_place_counters(
    conn: &Connection,
    location_id: Option<i64>,
    organization_id: Option<i64>,
    adjust: Adjust,
) -> anyhow::Result<()> {
    if let Some(id) = location_id {
        match adjust {
            Adjust::Increment => increment_location_count(conn, id)?,
            Adjust::Decrement => decrement_location_count(conn, id)?,
        }
    }
    if let Some(id) = organization_id {
        match adjust {
            Adjust::Increment => increment_organization_count(conn, id)?,
            Adjust::Decrement => decrement_organization_count(conn, id)?,
        }
    }
    Ok(())
}

fn bump_wage_caches(conn: &Connection) -> anyhow::Result<()> {
    cache::bump(conn, Resource::Wages)?;
    cache::bump(conn, Resource::Locations)?;
    cache::bump(conn, Resource::Organizations)?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credit::{CreditAwardFailed, LedgerCreditSink, total_credits};
    use paygrid_core::db;
    use paygrid_core::model::place::{get_location, get_organization};

    struct FailingCreditSink;

    impl CreditSink for FailingCreditSink {
        fn award(
            &self,
            _conn: &Connection,
            user_id: i64,
            _amount: i64,
            reason: &str,
        ) -> Result<(), CreditAwardFailed> {
            Err(CreditAwardFailed {
                user_id,
                reason: reason.to_string(),
                message: "ledger offline".to_string(),
            })
        }
    }

    fn seed_place(conn: &Connection) -> (i64, i64) {
        conn.execute(
            "INSERT INTO locations (name, created_at_us, updated_at_us) VALUES ('Salem', 1, 1)",
            [],
        )
        .expect("insert location");
        let location_id = conn.last_insert_rowid();
        conn.execute(
            "INSERT INTO organizations (name, created_at_us, updated_at_us) VALUES ('Acme', 1, 1)",
            [],
        )
        .expect("insert organization");
        (location_id, conn.last_insert_rowid())
    }

    fn report(
        user_id: Option<i64>,
        location_id: Option<i64>,
        organization_id: Option<i64>,
        cents: i64,
    ) -> NewWageReport {
        NewWageReport {
            user_id,
            location_id,
            organization_id,
            hourly_cents: cents,
        }
    }

    fn location_count(conn: &Connection, id: i64) -> i64 {
        get_location(conn, id)
            .expect("query")
            .expect("row")
            .approved_wage_count
    }

    fn organization_count(conn: &Connection, id: i64) -> i64 {
        get_organization(conn, id)
            .expect("query")
            .expect("row")
            .approved_wage_count
    }

    fn wages_version(conn: &Connection) -> i64 {
        cache::current(conn, Resource::Wages).expect("version")
    }

    // -----------------------------------------------------------------------
    // submit
    // -----------------------------------------------------------------------

    #[test]
    fn approved_submission_increments_both_counters() {
        let mut conn = db::open_in_memory().expect("open store");
        let (location_id, organization_id) = seed_place(&conn);
        let sink = LedgerCreditSink;
        let pipeline = ModerationPipeline::new(ModerationConfig::default(), &sink);

        let submitted = pipeline
            .submit(&mut conn, &report(None, Some(location_id), Some(organization_id), 1_600))
            .expect("submit");

        assert_eq!(submitted.status, WageStatus::Approved);
        assert_eq!(location_count(&conn, location_id), 1);
        assert_eq!(organization_count(&conn, organization_id), 1);
        assert_eq!(wages_version(&conn), 1);
    }

    #[test]
    fn pending_submission_touches_no_counters_but_bumps_caches() {
        let mut conn = db::open_in_memory().expect("open store");
        let (location_id, organization_id) = seed_place(&conn);
        let sink = LedgerCreditSink;
        let pipeline = ModerationPipeline::new(ModerationConfig::default(), &sink);

        // Build an approved population, then submit a moderate outlier:
        // 1000 against median 1600 / MAD 100 → r = 6.0 → score −2.
        for cents in [1_500, 1_600, 1_700] {
            pipeline
                .submit(&mut conn, &report(None, Some(location_id), Some(organization_id), cents))
                .expect("seed submit");
        }
        let version_before = wages_version(&conn);

        let outlier = pipeline
            .submit(&mut conn, &report(Some(9), Some(location_id), Some(organization_id), 1_000))
            .expect("submit outlier");

        assert_eq!(outlier.sanity_score, -2);
        assert_eq!(outlier.status, WageStatus::Pending);
        assert_eq!(location_count(&conn, location_id), 3, "counters unchanged");
        assert_eq!(wages_version(&conn), version_before + 1);
        assert_eq!(total_credits(&conn, 9).expect("sum"), 0, "no credit while pending");
    }

    #[test]
    fn first_submission_grants_base_plus_bonus_once() {
        let mut conn = db::open_in_memory().expect("open store");
        let (location_id, organization_id) = seed_place(&conn);
        let sink = LedgerCreditSink;
        let cfg = ModerationConfig::default();
        let pipeline = ModerationPipeline::new(cfg.clone(), &sink);

        pipeline
            .submit(&mut conn, &report(Some(7), Some(location_id), Some(organization_id), 1_600))
            .expect("first submit");
        assert_eq!(
            total_credits(&conn, 7).expect("sum"),
            cfg.base_credit + cfg.first_report_bonus
        );

        pipeline
            .submit(&mut conn, &report(Some(7), Some(location_id), Some(organization_id), 1_610))
            .expect("second submit");
        assert_eq!(
            total_credits(&conn, 7).expect("sum"),
            2 * cfg.base_credit + cfg.first_report_bonus,
            "bonus is one-time"
        );
    }

    #[test]
    fn credit_failure_does_not_abort_submission() {
        let mut conn = db::open_in_memory().expect("open store");
        let (location_id, organization_id) = seed_place(&conn);
        let pipeline = ModerationPipeline::new(ModerationConfig::default(), &FailingCreditSink);

        let submitted = pipeline
            .submit(&mut conn, &report(Some(7), Some(location_id), Some(organization_id), 1_600))
            .expect("submit survives credit failure");

        assert_eq!(submitted.status, WageStatus::Approved);
        assert_eq!(location_count(&conn, location_id), 1);
    }

    #[test]
    fn scopeless_submission_is_bounds_checked() {
        let mut conn = db::open_in_memory().expect("open store");
        let sink = LedgerCreditSink;
        let pipeline = ModerationPipeline::new(ModerationConfig::default(), &sink);

        let plausible = pipeline
            .submit(&mut conn, &report(None, None, None, 1_600))
            .expect("submit");
        assert_eq!(plausible.sanity_score, 0);
        assert_eq!(plausible.status, WageStatus::Approved);

        let implausible = pipeline
            .submit(&mut conn, &report(None, None, None, 150))
            .expect("submit");
        assert_eq!(implausible.sanity_score, -5);
        assert_eq!(implausible.status, WageStatus::Pending);
    }

    // -----------------------------------------------------------------------
    // set_status
    // -----------------------------------------------------------------------

    #[test]
    fn approving_a_pending_report_increments_without_credit_replay() {
        let mut conn = db::open_in_memory().expect("open store");
        let (location_id, organization_id) = seed_place(&conn);
        let sink = LedgerCreditSink;
        let pipeline = ModerationPipeline::new(ModerationConfig::default(), &sink);

        for cents in [1_500, 1_600, 1_700] {
            pipeline
                .submit(&mut conn, &report(None, Some(location_id), Some(organization_id), cents))
                .expect("seed submit");
        }
        let outlier = pipeline
            .submit(&mut conn, &report(Some(7), Some(location_id), Some(organization_id), 1_000))
            .expect("submit outlier");
        assert_eq!(outlier.status, WageStatus::Pending);
        let credits_before = total_credits(&conn, 7).expect("sum");

        let approved = pipeline
            .set_status(&mut conn, outlier.wage_id, WageStatus::Approved)
            .expect("approve");
        assert_eq!(approved.status, WageStatus::Approved);
        assert_eq!(location_count(&conn, location_id), 4);
        assert_eq!(
            total_credits(&conn, 7).expect("sum"),
            credits_before,
            "no creation-time credit replay"
        );
    }

    #[test]
    fn rejecting_an_approved_report_decrements() {
        let mut conn = db::open_in_memory().expect("open store");
        let (location_id, organization_id) = seed_place(&conn);
        let sink = LedgerCreditSink;
        let pipeline = ModerationPipeline::new(ModerationConfig::default(), &sink);

        let submitted = pipeline
            .submit(&mut conn, &report(None, Some(location_id), Some(organization_id), 1_600))
            .expect("submit");
        pipeline
            .set_status(&mut conn, submitted.wage_id, WageStatus::Rejected)
            .expect("reject");

        assert_eq!(location_count(&conn, location_id), 0);
        assert_eq!(organization_count(&conn, organization_id), 0);
    }

    #[test]
    fn same_status_update_only_bumps_caches() {
        let mut conn = db::open_in_memory().expect("open store");
        let (location_id, organization_id) = seed_place(&conn);
        let sink = LedgerCreditSink;
        let pipeline = ModerationPipeline::new(ModerationConfig::default(), &sink);

        let submitted = pipeline
            .submit(&mut conn, &report(None, Some(location_id), Some(organization_id), 1_600))
            .expect("submit");
        let version_before = wages_version(&conn);

        pipeline
            .set_status(&mut conn, submitted.wage_id, WageStatus::Approved)
            .expect("no-op status");
        assert_eq!(location_count(&conn, location_id), 1, "counter untouched");
        assert_eq!(wages_version(&conn), version_before + 1);
    }

    #[test]
    fn status_change_on_missing_report_is_an_error() {
        let mut conn = db::open_in_memory().expect("open store");
        let sink = LedgerCreditSink;
        let pipeline = ModerationPipeline::new(ModerationConfig::default(), &sink);

        let err = pipeline
            .set_status(&mut conn, 404, WageStatus::Approved)
            .expect_err("missing");
        assert!(matches!(err, ModerationError::ReportNotFound(404)));
        assert_eq!(err.code(), ErrorCode::WageReportNotFound);
    }

    // -----------------------------------------------------------------------
    // soft delete / restore / hard delete
    // -----------------------------------------------------------------------

    #[test]
    fn soft_delete_and_restore_round_trip_counters() {
        let mut conn = db::open_in_memory().expect("open store");
        let (location_id, organization_id) = seed_place(&conn);
        let sink = LedgerCreditSink;
        let pipeline = ModerationPipeline::new(ModerationConfig::default(), &sink);

        let submitted = pipeline
            .submit(&mut conn, &report(None, Some(location_id), Some(organization_id), 1_600))
            .expect("submit");

        let deleted = pipeline
            .soft_delete(&mut conn, submitted.wage_id)
            .expect("soft delete");
        assert!(deleted.is_deleted);
        assert_eq!(location_count(&conn, location_id), 0);
        assert_eq!(organization_count(&conn, organization_id), 0);

        let restored = pipeline
            .restore(&mut conn, submitted.wage_id)
            .expect("restore");
        assert!(!restored.is_deleted);
        assert_eq!(location_count(&conn, location_id), 1);
        assert_eq!(organization_count(&conn, organization_id), 1);
    }

    #[test]
    fn soft_deleting_a_pending_report_leaves_counters_alone() {
        let mut conn = db::open_in_memory().expect("open store");
        let (location_id, organization_id) = seed_place(&conn);
        let sink = LedgerCreditSink;
        let pipeline = ModerationPipeline::new(ModerationConfig::default(), &sink);

        for cents in [1_500, 1_600, 1_700] {
            pipeline
                .submit(&mut conn, &report(None, Some(location_id), Some(organization_id), cents))
                .expect("seed submit");
        }
        let outlier = pipeline
            .submit(&mut conn, &report(None, Some(location_id), Some(organization_id), 1_000))
            .expect("submit outlier");

        pipeline
            .soft_delete(&mut conn, outlier.wage_id)
            .expect("soft delete");
        assert_eq!(location_count(&conn, location_id), 3);
    }

    #[test]
    fn repeated_soft_delete_decrements_only_once() {
        let mut conn = db::open_in_memory().expect("open store");
        let (location_id, organization_id) = seed_place(&conn);
        let sink = LedgerCreditSink;
        let pipeline = ModerationPipeline::new(ModerationConfig::default(), &sink);

        let submitted = pipeline
            .submit(&mut conn, &report(None, Some(location_id), Some(organization_id), 1_600))
            .expect("submit");
        pipeline
            .soft_delete(&mut conn, submitted.wage_id)
            .expect("first delete");
        pipeline
            .soft_delete(&mut conn, submitted.wage_id)
            .expect("second delete");

        assert_eq!(location_count(&conn, location_id), 0, "floored, not negative");
    }

    #[test]
    fn status_change_while_deleted_skips_counters() {
        let mut conn = db::open_in_memory().expect("open store");
        let (location_id, organization_id) = seed_place(&conn);
        let sink = LedgerCreditSink;
        let pipeline = ModerationPipeline::new(ModerationConfig::default(), &sink);

        let submitted = pipeline
            .submit(&mut conn, &report(None, Some(location_id), Some(organization_id), 1_600))
            .expect("submit");
        pipeline
            .soft_delete(&mut conn, submitted.wage_id)
            .expect("soft delete");

        pipeline
            .set_status(&mut conn, submitted.wage_id, WageStatus::Rejected)
            .expect("reject while deleted");
        assert_eq!(location_count(&conn, location_id), 0, "no double decrement");

        pipeline
            .restore(&mut conn, submitted.wage_id)
            .expect("restore");
        assert_eq!(
            location_count(&conn, location_id),
            0,
            "restored as rejected, still uncounted"
        );
    }

    #[test]
    fn hard_delete_is_terminal_and_decrements() {
        let mut conn = db::open_in_memory().expect("open store");
        let (location_id, organization_id) = seed_place(&conn);
        let sink = LedgerCreditSink;
        let pipeline = ModerationPipeline::new(ModerationConfig::default(), &sink);

        let submitted = pipeline
            .submit(&mut conn, &report(None, Some(location_id), Some(organization_id), 1_600))
            .expect("submit");
        pipeline
            .hard_delete(&mut conn, submitted.wage_id)
            .expect("hard delete");

        assert_eq!(location_count(&conn, location_id), 0);
        assert!(
            get_wage_report(&conn, submitted.wage_id)
                .expect("query")
                .is_none(),
            "row is gone"
        );

        let err = pipeline
            .hard_delete(&mut conn, submitted.wage_id)
            .expect_err("terminal");
        assert!(matches!(err, ModerationError::ReportNotFound(_)));
    }

    #[test]
    fn hard_deleting_a_soft_deleted_report_skips_counters() {
        let mut conn = db::open_in_memory().expect("open store");
        let (location_id, organization_id) = seed_place(&conn);
        let sink = LedgerCreditSink;
        let pipeline = ModerationPipeline::new(ModerationConfig::default(), &sink);

        let submitted = pipeline
            .submit(&mut conn, &report(None, Some(location_id), Some(organization_id), 1_600))
            .expect("submit");
        pipeline
            .soft_delete(&mut conn, submitted.wage_id)
            .expect("soft delete");
        pipeline
            .hard_delete(&mut conn, submitted.wage_id)
            .expect("hard delete");

        assert_eq!(location_count(&conn, location_id), 0, "already uncounted");
    }
}
