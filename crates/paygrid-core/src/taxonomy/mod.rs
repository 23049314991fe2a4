//! Industry taxonomy engine.
//!
//! Keeps the category tree consistent around every write:
//!
//! - [`cycle::ensure_no_cycle`] rejects parent assignments that would make
//!   a node its own ancestor, before any row is touched.
//! - [`materialize::resolve_placement`] derives `depth`/`path` for the
//!   mutated node; callers never supply them.
//! - [`materialize::rebuild_descendants`] cascades the derived columns to
//!   the whole subtree after a parent/slug change, in one bulk fetch.
//!
//! The write drivers in this module compose those steps inside a single
//! `BEGIN IMMEDIATE` transaction and bump the `industries` cache version on
//! every committed mutation, deletes included. Validation failures reject
//! the write pre-commit; any later failure rolls the whole mutation back.

#![allow(
    clippy::must_use_candidate,
    clippy::module_name_repetitions,
    clippy::doc_markdown,
)]

pub mod cycle;
pub mod materialize;

pub use cycle::{MAX_ANCESTOR_HOPS, ensure_no_cycle};
pub use materialize::{Placement, rebuild_descendants, resolve_placement};

use anyhow::{Context as AnyhowContext, anyhow};
use rusqlite::{Connection, TransactionBehavior, params};

use crate::cache::{self, Resource};
use crate::error::ErrorCode;
use crate::model::industry::{Industry, NewIndustry, get_children, get_industry};
use crate::model::now_us;

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// Errors surfaced by taxonomy writes.
#[derive(Debug, thiserror::Error)]
pub enum TaxonomyError {
    /// The parent assignment would make the node its own ancestor.
    #[error("assigning industry {industry_id} under {proposed_parent} would create a cycle")]
    CycleDetected {
        industry_id: i64,
        proposed_parent: i64,
    },

    /// The referenced parent row does not exist.
    #[error("parent industry not found: {0}")]
    ParentNotFound(i64),

    /// The industry being mutated does not exist.
    #[error("industry not found: {0}")]
    IndustryNotFound(i64),

    /// The slug is blank or contains the path separator.
    #[error("invalid industry slug '{0}'")]
    InvalidSlug(String),

    /// An underlying database error.
    #[error(transparent)]
    Db(#[from] anyhow::Error),
}

impl TaxonomyError {
    /// Stable machine-readable code for this error.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::CycleDetected { .. } => ErrorCode::CycleDetected,
            Self::ParentNotFound(_) => ErrorCode::ParentNotFound,
            Self::IndustryNotFound(_) => ErrorCode::IndustryNotFound,
            Self::InvalidSlug(_) => ErrorCode::InvalidSlug,
            Self::Db(_) => ErrorCode::CorruptStore,
        }
    }
}

// ---------------------------------------------------------------------------
// Change description
// ---------------------------------------------------------------------------

/// How a mutation touches the parent reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParentChange {
    /// Leave the parent as it is.
    #[default]
    Keep,
    /// Detach the node and make it a root.
    Clear,
    /// Move the node under the given parent.
    SetTo(i64),
}

/// Caller-visible fields of an industry update. Derived columns are never
/// part of a change.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct IndustryChange {
    pub parent: ParentChange,
    pub slug: Option<String>,
    pub name: Option<String>,
}

fn normalize_slug(raw: &str) -> Result<String, TaxonomyError> {
    let slug = raw.trim();
    if slug.is_empty() || slug.contains('/') {
        return Err(TaxonomyError::InvalidSlug(raw.to_string()));
    }
    Ok(slug.to_string())
}

// ---------------------------------------------------------------------------
// Write drivers
// ---------------------------------------------------------------------------

/// Create an industry, deriving its placement and validating the parent
/// chain inside one transaction.
///
/// # Errors
///
/// Returns [`TaxonomyError::InvalidSlug`], [`TaxonomyError::ParentNotFound`],
/// [`TaxonomyError::CycleDetected`], or [`TaxonomyError::Db`]. On error no
/// row is persisted.
pub fn create_industry(
    conn: &mut Connection,
    new: &NewIndustry,
) -> Result<Industry, TaxonomyError> {
    let slug = normalize_slug(&new.slug)?;

    let tx = conn
        .transaction_with_behavior(TransactionBehavior::Immediate)
        .context("begin industry create")?;

    let placement = resolve_placement(&tx, new.parent_id, &slug)?;
    let now = now_us();
    tx.execute(
        "INSERT INTO industries (
            parent_id, slug, name, depth, path, created_at_us, updated_at_us
         ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)",
        params![new.parent_id, slug, new.name, placement.depth, placement.path, now],
    )
    .context("insert industry")?;
    let industry_id = tx.last_insert_rowid();

    if let Some(parent_id) = new.parent_id {
        ensure_no_cycle(&tx, industry_id, parent_id)?;
    }

    cache::bump(&tx, Resource::Industries)?;

    let industry = get_industry(&tx, industry_id)?
        .ok_or_else(|| anyhow!("industry {industry_id} vanished inside its own transaction"))?;
    tx.commit().context("commit industry create")?;

    tracing::debug!(industry_id, path = %industry.path, "industry created");
    Ok(industry)
}

/// Apply an industry update: validate the parent chain, re-derive
/// placement when `parent` or `slug` changed, cascade to descendants, and
/// bump the cache version — all in one transaction.
///
/// # Errors
///
/// Returns [`TaxonomyError::IndustryNotFound`], [`TaxonomyError::InvalidSlug`],
/// [`TaxonomyError::CycleDetected`], [`TaxonomyError::ParentNotFound`], or
/// [`TaxonomyError::Db`]. On error the tree is unchanged.
pub fn update_industry(
    conn: &mut Connection,
    industry_id: i64,
    change: &IndustryChange,
) -> Result<Industry, TaxonomyError> {
    let tx = conn
        .transaction_with_behavior(TransactionBehavior::Immediate)
        .context("begin industry update")?;

    let current = get_industry(&tx, industry_id)?
        .ok_or(TaxonomyError::IndustryNotFound(industry_id))?;

    let new_parent = match change.parent {
        ParentChange::Keep => current.parent_id,
        ParentChange::Clear => None,
        ParentChange::SetTo(parent_id) => Some(parent_id),
    };
    let new_slug = match &change.slug {
        Some(slug) => normalize_slug(slug)?,
        None => current.slug.clone(),
    };
    let new_name = change.name.clone().unwrap_or_else(|| current.name.clone());

    let parent_changed = new_parent != current.parent_id;
    let slug_changed = new_slug != current.slug;

    // Becoming root-less needs no ancestor walk; only a newly set or moved
    // parent can close a cycle.
    if parent_changed {
        if let Some(candidate) = new_parent {
            ensure_no_cycle(&tx, industry_id, candidate)?;
        }
    }

    let now = now_us();
    if parent_changed || slug_changed {
        let placement = resolve_placement(&tx, new_parent, &new_slug)?;
        tx.execute(
            "UPDATE industries
             SET parent_id = ?2, slug = ?3, name = ?4, depth = ?5, path = ?6,
                 updated_at_us = ?7
             WHERE industry_id = ?1",
            params![
                industry_id,
                new_parent,
                new_slug,
                new_name,
                placement.depth,
                placement.path,
                now
            ],
        )
        .context("update industry identity")?;

        let fresh = get_industry(&tx, industry_id)?
            .ok_or_else(|| anyhow!("industry {industry_id} vanished inside its own transaction"))?;
        rebuild_descendants(&tx, &fresh)?;
    } else if change.name.is_some() {
        tx.execute(
            "UPDATE industries SET name = ?2, updated_at_us = ?3 WHERE industry_id = ?1",
            params![industry_id, new_name, now],
        )
        .context("update industry name")?;
    }

    cache::bump(&tx, Resource::Industries)?;

    let updated = get_industry(&tx, industry_id)?
        .ok_or_else(|| anyhow!("industry {industry_id} vanished inside its own transaction"))?;
    tx.commit().context("commit industry update")?;

    Ok(updated)
}

/// Delete an industry. Its direct children become roots and their subtrees
/// are re-derived; the cache version is bumped like any other committed
/// mutation.
///
/// # Errors
///
/// Returns [`TaxonomyError::IndustryNotFound`] or [`TaxonomyError::Db`].
pub fn delete_industry(conn: &mut Connection, industry_id: i64) -> Result<(), TaxonomyError> {
    let tx = conn
        .transaction_with_behavior(TransactionBehavior::Immediate)
        .context("begin industry delete")?;

    if get_industry(&tx, industry_id)?.is_none() {
        return Err(TaxonomyError::IndustryNotFound(industry_id));
    }
    let children = get_children(&tx, industry_id)?;

    tx.execute(
        "DELETE FROM industries WHERE industry_id = ?1",
        params![industry_id],
    )
    .context("delete industry")?;

    // ON DELETE SET NULL promoted each child to a root; re-derive their
    // subtrees from the new placement.
    let now = now_us();
    for child in children {
        tx.execute(
            "UPDATE industries
             SET depth = 0, path = slug, updated_at_us = ?2
             WHERE industry_id = ?1",
            params![child.industry_id, now],
        )
        .context("promote orphaned child")?;
        let fresh = get_industry(&tx, child.industry_id)?.ok_or_else(|| {
            anyhow!("child industry {} vanished inside delete", child.industry_id)
        })?;
        rebuild_descendants(&tx, &fresh)?;
    }

    cache::bump(&tx, Resource::Industries)?;
    tx.commit().context("commit industry delete")?;

    tracing::debug!(industry_id, "industry deleted");
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
