use std::fmt::{Display, Formatter};
use std::path::PathBuf;

/// Errors from bootstrapping or writing to the output repository
/// (spec §4.E, §4.G, §7).
#[derive(Debug)]
pub enum Error {
    /// The output directory already exists, or could not be created.
    DirectoryUnavailable { path: PathBuf, source: std::io::Error },
    /// Repository initialisation or the root commit failed.
    BootstrapFailed { context: &'static str, source: git2::Error },
    /// Staging a path or creating a commit failed.
    CommitFailed {
        document_path: String,
        context: &'static str,
        source: git2::Error,
    },
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DirectoryUnavailable { path, source } => {
                write!(f, "failed to create working directory {}: {source}", path.display())
            }
            Self::BootstrapFailed { context, source } => {
                write!(f, "{context}: {source}")
            }
            Self::CommitFailed {
                document_path,
                context,
                source,
            } => write!(f, "{document_path}: {context}: {source}"),
        }
    }
}

impl std::error::Error for Error {}
