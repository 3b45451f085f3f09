use std::fmt::{Display, Formatter};

/// Process exit codes (spec §6).
pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_USAGE: i32 = 1;
pub const EXIT_BOOTSTRAP: i32 = 2;
pub const EXIT_STORE_QUERY: i32 = 3;
pub const EXIT_VCS: i32 = 4;
/// Not named by spec §6's exit code table (which only enumerates usage,
/// bootstrap/store-open, store-query, and VCS failures); replay failures
/// that happen after ingestion and before the Commit Driver get their own
/// nonzero code rather than being folded into one of those (see DESIGN.md).
pub const EXIT_REPLAY: i32 = 5;

#[derive(Debug)]
pub enum CliError {
    /// Missing positional argument or unknown flag. clap handles this
    /// itself before `run` is reached, but the variant exists for any
    /// usage-shaped error the driver detects itself.
    Usage(String),
    Store(c9rev2git_store::Error),
    Vcs(c9rev2git_vcs::Error),
    Core {
        document_path: String,
        rev_num: i64,
        source: c9rev2git_core::Error,
    },
}

impl CliError {
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Usage(_) => EXIT_USAGE,
            Self::Store(c9rev2git_store::Error::OpenFailed { .. }) => EXIT_BOOTSTRAP,
            Self::Store(_) => EXIT_STORE_QUERY,
            Self::Vcs(c9rev2git_vcs::Error::DirectoryUnavailable { .. }) => EXIT_BOOTSTRAP,
            Self::Vcs(_) => EXIT_VCS,
            Self::Core { .. } => EXIT_REPLAY,
        }
    }
}

impl Display for CliError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Usage(message) => write!(f, "usage error: {message}"),
            Self::Store(source) => write!(f, "{source}"),
            Self::Vcs(source) => write!(f, "{source}"),
            Self::Core {
                document_path,
                rev_num,
                source,
            } => write!(f, "{document_path} [rev: {rev_num}]: {source}"),
        }
    }
}

impl std::error::Error for CliError {}

impl From<c9rev2git_store::Error> for CliError {
    fn from(source: c9rev2git_store::Error) -> Self {
        Self::Store(source)
    }
}

impl From<c9rev2git_vcs::Error> for CliError {
    fn from(source: c9rev2git_vcs::Error) -> Self {
        Self::Vcs(source)
    }
}
