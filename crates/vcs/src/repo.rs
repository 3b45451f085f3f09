use crate::error::Error;
use git2::{Oid, Repository, Signature};
use std::fs;
use std::path::Path;

/// Fallback commit identity used when the repository/global git config
/// provides neither `user.name` nor `user.email` (spec §6 "Commit identity").
const FALLBACK_NAME: &str = "c9rev2git";
const FALLBACK_EMAIL: &str = "bot@localhost";

/// The output working tree plus the one piece of mutable state the Commit
/// Driver owns: the current tip of the linear history (spec §9, "Global
/// mutable state" — kept as explicit instance state rather than module
/// statics).
pub struct Repo {
    repository: Repository,
    head: Oid,
}

impl Repo {
    /// Repo Bootstrap (spec §4.G): create `repo_dir` with mode 0755, fail if
    /// it already exists; initialise a non-bare repository there; create an
    /// empty root commit with no parents and publish it as `HEAD`.
    pub fn bootstrap(repo_dir: &Path) -> Result<Self, Error> {
        create_working_directory(repo_dir)?;

        let repository = Repository::init(repo_dir).map_err(|source| Error::BootstrapFailed {
            context: "failed to initialise repository",
            source,
        })?;

        let head = create_root_commit(&repository)?;

        Ok(Self { repository, head })
    }

    /// Commit Driver (spec §4.E): stage `doc_path` (relative to the working
    /// tree), create a commit on `HEAD` whose sole parent is the previous
    /// `HEAD`, and advance the tracked tip.
    pub fn commit(&mut self, doc_path: &str, rev_num: i64) -> Result<(), Error> {
        let commit_error = |context: &'static str| {
            move |source: git2::Error| Error::CommitFailed {
                document_path: doc_path.to_string(),
                context,
                source,
            }
        };

        let mut index = self.repository.index().map_err(commit_error("failed to acquire index"))?;
        index
            .add_path(Path::new(doc_path))
            .map_err(commit_error("failed to stage path"))?;
        index.write().map_err(commit_error("failed to persist index"))?;

        let tree_oid = index.write_tree().map_err(commit_error("failed to write tree"))?;
        let tree = self
            .repository
            .find_tree(tree_oid)
            .map_err(commit_error("failed to look up tree"))?;

        let parent = self
            .repository
            .find_commit(self.head)
            .map_err(commit_error("failed to look up parent commit"))?;

        let signature = self.resolve_signature().map_err(commit_error("failed to build signature"))?;
        let message = format!("./{doc_path} [rev: {rev_num}]");

        let new_head = self
            .repository
            .commit(
                Some("HEAD"),
                &signature,
                &signature,
                &message,
                &tree,
                &[&parent],
            )
            .map_err(commit_error("failed to create commit"))?;

        self.head = new_head;
        Ok(())
    }

    /// Signature from the repository/global git config when available,
    /// otherwise the built-in fallback identity (spec §6).
    fn resolve_signature(&self) -> Result<Signature<'static>, git2::Error> {
        self.repository
            .signature()
            .or_else(|_| Signature::now(FALLBACK_NAME, FALLBACK_EMAIL))
    }
}

fn create_working_directory(repo_dir: &Path) -> Result<(), Error> {
    if repo_dir.exists() {
        return Err(Error::DirectoryUnavailable {
            path: repo_dir.to_path_buf(),
            source: std::io::Error::new(
                std::io::ErrorKind::AlreadyExists,
                "output directory already exists",
            ),
        });
    }

    fs::create_dir_all(repo_dir).map_err(|source| Error::DirectoryUnavailable {
        path: repo_dir.to_path_buf(),
        source,
    })?;
    set_permissions(repo_dir)?;
    Ok(())
}

#[cfg(unix)]
fn set_permissions(repo_dir: &Path) -> Result<(), Error> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(repo_dir, fs::Permissions::from_mode(0o755)).map_err(|source| {
        Error::DirectoryUnavailable {
            path: repo_dir.to_path_buf(),
            source,
        }
    })
}

#[cfg(not(unix))]
fn set_permissions(_repo_dir: &Path) -> Result<(), Error> {
    Ok(())
}

fn create_root_commit(repository: &Repository) -> Result<Oid, Error> {
    let bootstrap_error = |context: &'static str| {
        move |source: git2::Error| Error::BootstrapFailed { context, source }
    };

    let tree_oid = {
        let mut index = repository
            .index()
            .map_err(bootstrap_error("failed to acquire index for root commit"))?;
        index
            .write_tree()
            .map_err(bootstrap_error("failed to write empty tree"))?
    };
    let tree = repository
        .find_tree(tree_oid)
        .map_err(bootstrap_error("failed to look up empty tree"))?;

    let signature = repository
        .signature()
        .or_else(|_| Signature::now(FALLBACK_NAME, FALLBACK_EMAIL))
        .map_err(bootstrap_error("failed to build signature for root commit"))?;

    repository
        .commit(
            Some("HEAD"),
            &signature,
            &signature,
            "Initial commit",
            &tree,
            &[],
        )
        .map_err(bootstrap_error("failed to create root commit"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn bootstrap_creates_root_commit() {
        let dir = tempdir().unwrap();
        let repo_dir = dir.path().join("repo");
        let repo = Repo::bootstrap(&repo_dir).unwrap();

        let head_commit = repo.repository.find_commit(repo.head).unwrap();
        assert_eq!(head_commit.message(), Some("Initial commit"));
        assert_eq!(head_commit.parent_count(), 0);
    }

    #[test]
    fn bootstrap_fails_if_directory_exists() {
        let dir = tempdir().unwrap();
        let repo_dir = dir.path().join("repo");
        fs::create_dir(&repo_dir).unwrap();

        let err = Repo::bootstrap(&repo_dir).unwrap_err();
        assert!(matches!(err, Error::DirectoryUnavailable { .. }));
    }

    #[test]
    fn commit_chains_onto_previous_head() {
        let dir = tempdir().unwrap();
        let repo_dir = dir.path().join("repo");
        let mut repo = Repo::bootstrap(&repo_dir).unwrap();
        let root_head = repo.head;

        fs::write(repo_dir.join("hello.txt"), "Hello").unwrap();
        repo.commit("hello.txt", 1).unwrap();

        let commit = repo.repository.find_commit(repo.head).unwrap();
        assert_eq!(commit.message(), Some("./hello.txt [rev: 1]"));
        assert_eq!(commit.parent_count(), 1);
        assert_eq!(commit.parent_id(0).unwrap(), root_head);
    }

    #[test]
    fn commit_history_is_linear() {
        let dir = tempdir().unwrap();
        let repo_dir = dir.path().join("repo");
        let mut repo = Repo::bootstrap(&repo_dir).unwrap();

        fs::write(repo_dir.join("a.txt"), "Hi").unwrap();
        repo.commit("a.txt", 1).unwrap();
        fs::write(repo_dir.join("a.txt"), "Hi there").unwrap();
        repo.commit("a.txt", 2).unwrap();

        let commit = repo.repository.find_commit(repo.head).unwrap();
        assert_eq!(commit.parent_count(), 1);
        let parent = commit.parent(0).unwrap();
        assert_eq!(parent.message(), Some("./a.txt [rev: 1]"));
        assert_eq!(parent.parent_count(), 1);
    }
}
