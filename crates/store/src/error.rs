use std::fmt::{Display, Formatter};
use std::path::PathBuf;

/// Bootstrap/query errors from the source store (spec §4.F, §7).
#[derive(Debug)]
pub enum Error {
    /// Opening the SQLite file failed.
    OpenFailed { path: PathBuf, source: rusqlite::Error },
    /// A query against `Documents` or `Revisions` failed.
    QueryFailed { context: &'static str, source: rusqlite::Error },
    /// A revision's operation string could not be decoded.
    OperationMalformed {
        document_path: String,
        rev_num: i64,
        source: c9rev2git_core::Error,
    },
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::OpenFailed { path, source } => {
                write!(f, "failed to open store {}: {source}", path.display())
            }
            Self::QueryFailed { context, source } => {
                write!(f, "{context}: {source}")
            }
            Self::OperationMalformed {
                document_path,
                rev_num,
                source,
            } => write!(
                f,
                "{document_path} [rev: {rev_num}]: {source}"
            ),
        }
    }
}

impl std::error::Error for Error {}
