//! Credit-award collaborator contract.
//!
//! Gamification credit is downstream of moderation: the pipeline calls
//! [`CreditSink::award`] and logs-and-discards any failure. An award
//! failure must never abort the submission that triggered it, so the
//! operation is modeled as an explicit fallible call whose error the
//! caller drops — not as a silently caught panic.

use anyhow::Context as AnyhowContext;
use rusqlite::{Connection, params};

use paygrid_core::model::now_us;

/// Reason tag for the per-submission base credit.
pub const REASON_WAGE_SUBMITTED: &str = "wage-submitted";

/// Reason tag for the one-time first-submission bonus.
pub const REASON_FIRST_REPORT: &str = "first-report";

/// Downstream gamification failure. Recovered locally by the pipeline:
/// logged, never propagated, never retried.
#[derive(Debug, thiserror::Error)]
#[error("credit award failed for user {user_id} ({reason}): {message}")]
pub struct CreditAwardFailed {
    pub user_id: i64,
    pub reason: String,
    pub message: String,
}

/// Where awarded credit goes. Distinct reason tags make repeated calls
/// for the same submission safe to distinguish downstream.
pub trait CreditSink {
    /// Award `amount` credit to `user_id` tagged with `reason`.
    ///
    /// # Errors
    ///
    /// Returns [`CreditAwardFailed`] when the award cannot be recorded;
    /// callers treat this as fire-and-forget.
    fn award(
        &self,
        conn: &Connection,
        user_id: i64,
        amount: i64,
        reason: &str,
    ) -> Result<(), CreditAwardFailed>;
}

/// Records awards in the append-only `credit_ledger` table, joining the
/// caller's transaction.
#[derive(Debug, Clone, Copy, Default)]
pub struct LedgerCreditSink;

impl CreditSink for LedgerCreditSink {
    fn award(
        &self,
        conn: &Connection,
        user_id: i64,
        amount: i64,
        reason: &str,
    ) -> Result<(), CreditAwardFailed> {
        conn.execute(
            "INSERT INTO credit_ledger (user_id, amount, reason, created_at_us)
             VALUES (?1, ?2, ?3, ?4)",
            params![user_id, amount, reason, now_us()],
        )
        .map_err(|error| CreditAwardFailed {
            user_id,
            reason: reason.to_string(),
            message: error.to_string(),
        })?;
        Ok(())
    }
}

/// Discards every award. Useful when gamification is disabled.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullCreditSink;

impl CreditSink for NullCreditSink {
    fn award(
        &self,
        _conn: &Connection,
        _user_id: i64,
        _amount: i64,
        _reason: &str,
    ) -> Result<(), CreditAwardFailed> {
        Ok(())
    }
}

/// Sum of all credit ever awarded to a user through the ledger.
///
/// # Errors
///
/// Returns an error on database failure.
pub fn total_credits(conn: &Connection, user_id: i64) -> anyhow::Result<i64> {
    conn.query_row(
        "SELECT COALESCE(SUM(amount), 0) FROM credit_ledger WHERE user_id = ?1",
        params![user_id],
        |row| row.get(0),
    )
    .with_context(|| format!("sum credits for user {user_id}"))
}
