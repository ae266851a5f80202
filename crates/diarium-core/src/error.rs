use std::fmt;

/// Machine-readable error codes for build tooling and operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    ConfigParseError,
    SourceNotConfigured,
    YearNotConfigured,
    SnapshotMissing,
    SnapshotCorrupt,
    SnapshotSchemaMismatch,
    QueryFailed,
    CountyNotFound,
    MunicipalityNotFound,
}

impl ErrorCode {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::ConfigParseError => "E1001",
            Self::SourceNotConfigured => "E1002",
            Self::YearNotConfigured => "E1003",
            Self::SnapshotMissing => "E2001",
            Self::SnapshotCorrupt => "E2002",
            Self::SnapshotSchemaMismatch => "E2003",
            Self::QueryFailed => "E3001",
            Self::CountyNotFound => "E4001",
            Self::MunicipalityNotFound => "E4002",
        }
    }

    /// Short human-facing summary for logs and terminal output.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::ConfigParseError => "Config file parse error",
            Self::SourceNotConfigured => "Snapshot source not configured",
            Self::YearNotConfigured => "Site year not configured",
            Self::SnapshotMissing => "Snapshot database not found",
            Self::SnapshotCorrupt => "Snapshot is not a SQLite database",
            Self::SnapshotSchemaMismatch => "Snapshot schema mismatch",
            Self::QueryFailed => "Aggregation query failed",
            Self::CountyNotFound => "County not found",
            Self::MunicipalityNotFound => "Municipality not found",
        }
    }

    /// Optional remediation hint that can be surfaced to operators.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::ConfigParseError => Some("Fix syntax in diarium.toml and retry."),
            Self::SourceNotConfigured => {
                Some("Set DIARIUM_SOURCE_DIR, pass --source-dir, or add source_dir to diarium.toml.")
            }
            Self::YearNotConfigured => {
                Some("Set DIARIUM_YEAR, pass --year, or add year to diarium.toml.")
            }
            Self::SnapshotMissing => {
                Some("Point the source directory at a collector output containing db.sqlite.")
            }
            Self::SnapshotCorrupt | Self::SnapshotSchemaMismatch => {
                Some("Regenerate the snapshot with the collector; this build never repairs it.")
            }
            Self::QueryFailed => None,
            Self::CountyNotFound | Self::MunicipalityNotFound => {
                Some("Run `dia geography` to list valid geography slugs.")
            }
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
