//! Canonical SQLite schema for the paygrid store.
//!
//! The schema is normalized around the four externally cached resources:
//! - `industries` holds the category tree with engine-computed `depth`/`path`
//! - `locations` and `organizations` carry the approved-report counters
//! - `wage_reports` holds submissions with frozen `sanity_score`/`status`
//! - `cache_versions` holds the named monotonic counters read by cache-key
//!   builders
//! - `store_meta` tracks the applied schema version

/// Migration v1: core tables plus store metadata.
pub const MIGRATION_V1_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS industries (
    industry_id INTEGER PRIMARY KEY,
    parent_id INTEGER REFERENCES industries(industry_id) ON DELETE SET NULL,
    slug TEXT NOT NULL UNIQUE CHECK (length(trim(slug)) > 0),
    name TEXT NOT NULL CHECK (length(trim(name)) > 0),
    depth INTEGER NOT NULL DEFAULT 0 CHECK (depth >= 0),
    path TEXT NOT NULL CHECK (length(path) > 0),
    created_at_us INTEGER NOT NULL,
    updated_at_us INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS locations (
    location_id INTEGER PRIMARY KEY,
    name TEXT NOT NULL CHECK (length(trim(name)) > 0),
    approved_wage_count INTEGER NOT NULL DEFAULT 0 CHECK (approved_wage_count >= 0),
    created_at_us INTEGER NOT NULL,
    updated_at_us INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS organizations (
    organization_id INTEGER PRIMARY KEY,
    name TEXT NOT NULL CHECK (length(trim(name)) > 0),
    approved_wage_count INTEGER NOT NULL DEFAULT 0 CHECK (approved_wage_count >= 0),
    created_at_us INTEGER NOT NULL,
    updated_at_us INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS wage_reports (
    wage_id INTEGER PRIMARY KEY,
    user_id INTEGER,
    location_id INTEGER REFERENCES locations(location_id) ON DELETE SET NULL,
    organization_id INTEGER REFERENCES organizations(organization_id) ON DELETE SET NULL,
    hourly_cents INTEGER NOT NULL CHECK (hourly_cents > 0),
    status TEXT NOT NULL CHECK (status IN ('pending', 'approved', 'rejected')),
    sanity_score INTEGER NOT NULL DEFAULT 0,
    is_deleted INTEGER NOT NULL DEFAULT 0 CHECK (is_deleted IN (0, 1)),
    deleted_at_us INTEGER,
    created_at_us INTEGER NOT NULL,
    updated_at_us INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS cache_versions (
    resource TEXT PRIMARY KEY CHECK (length(trim(resource)) > 0),
    version INTEGER NOT NULL DEFAULT 0 CHECK (version >= 0)
);

CREATE TABLE IF NOT EXISTS credit_ledger (
    entry_id INTEGER PRIMARY KEY,
    user_id INTEGER NOT NULL,
    amount INTEGER NOT NULL CHECK (amount > 0),
    reason TEXT NOT NULL CHECK (length(trim(reason)) > 0),
    created_at_us INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS store_meta (
    id INTEGER PRIMARY KEY CHECK (id = 1),
    schema_version INTEGER NOT NULL,
    created_at_us INTEGER NOT NULL DEFAULT 0
);

INSERT OR IGNORE INTO store_meta (id, schema_version, created_at_us)
VALUES (1, 1, 0);
"#;

/// Migration v2: write-path and moderation read-path indexes.
pub const MIGRATION_V2_SQL: &str = r#"
CREATE INDEX IF NOT EXISTS idx_industries_parent
    ON industries(parent_id);

CREATE INDEX IF NOT EXISTS idx_industries_path
    ON industries(path);

CREATE INDEX IF NOT EXISTS idx_wage_reports_location_status
    ON wage_reports(location_id, status, is_deleted);

CREATE INDEX IF NOT EXISTS idx_wage_reports_org_status
    ON wage_reports(organization_id, status, is_deleted);

CREATE INDEX IF NOT EXISTS idx_wage_reports_user
    ON wage_reports(user_id);

CREATE INDEX IF NOT EXISTS idx_credit_ledger_user
    ON credit_ledger(user_id, reason);

UPDATE store_meta
SET schema_version = 2
WHERE id = 1;
"#;

/// Indexes expected by the taxonomy cascade and moderation scope queries.
pub const REQUIRED_INDEXES: &[&str] = &[
    "idx_industries_parent",
    "idx_industries_path",
    "idx_wage_reports_location_status",
    "idx_wage_reports_org_status",
    "idx_wage_reports_user",
    "idx_credit_ledger_user",
];
