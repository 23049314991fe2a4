use std::fmt;

/// Machine-readable error codes for API-layer decision making.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    ConfigParseError,
    IndustryNotFound,
    ParentNotFound,
    CycleDetected,
    InvalidSlug,
    WageReportNotFound,
    InvalidStatusValue,
    StatisticsUnavailable,
    CreditAwardFailed,
    CorruptStore,
    InternalUnexpected,
}

impl ErrorCode {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::ConfigParseError => "E1001",
            Self::IndustryNotFound => "E2001",
            Self::ParentNotFound => "E2002",
            Self::CycleDetected => "E2003",
            Self::InvalidSlug => "E2004",
            Self::WageReportNotFound => "E3001",
            Self::InvalidStatusValue => "E3002",
            Self::StatisticsUnavailable => "E3003",
            Self::CreditAwardFailed => "E3004",
            Self::CorruptStore => "E5001",
            Self::InternalUnexpected => "E9001",
        }
    }

    /// Short human-facing summary for logs and API error bodies.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::ConfigParseError => "Config file parse error",
            Self::IndustryNotFound => "Industry not found",
            Self::ParentNotFound => "Parent industry not found",
            Self::CycleDetected => "Parent assignment would create a cycle",
            Self::InvalidSlug => "Invalid industry slug",
            Self::WageReportNotFound => "Wage report not found",
            Self::InvalidStatusValue => "Invalid wage report status",
            Self::StatisticsUnavailable => "Moderation statistics unavailable",
            Self::CreditAwardFailed => "Credit award failed",
            Self::CorruptStore => "Corrupt SQLite store",
            Self::InternalUnexpected => "Internal unexpected error",
        }
    }

    /// Optional remediation hint that can be surfaced to operators.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::ConfigParseError => Some("Fix syntax in paygrid.toml and retry."),
            Self::IndustryNotFound | Self::WageReportNotFound => None,
            Self::ParentNotFound => Some("Create the parent industry first, or clear the parent."),
            Self::CycleDetected => {
                Some("Choose a parent outside the industry's own subtree.")
            }
            Self::InvalidSlug => Some("Slugs must be non-blank and must not contain '/'."),
            Self::InvalidStatusValue => Some("Use one of: pending, approved, rejected."),
            Self::StatisticsUnavailable => {
                Some("The submission was accepted with a neutral score; no action needed.")
            }
            Self::CreditAwardFailed => {
                Some("The submission was accepted; re-run the credit reconciliation if needed.")
            }
            Self::CorruptStore => Some("Restore the store from backup and re-apply migrations."),
            Self::InternalUnexpected => Some("Retry once. If persistent, report a bug with logs."),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
