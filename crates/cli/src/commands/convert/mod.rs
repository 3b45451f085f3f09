use crate::app::AppContext;
use crate::error::CliError;
use c9rev2git_core::replay::{self, Direction};
use c9rev2git_core::{reset, Document};
use c9rev2git_store::ingest;
use c9rev2git_vcs::Repo;
use log::info;
use std::fs;
use std::path::{Path, PathBuf};

/// The Driver (spec §2 component H): ingest, bootstrap, then replay each
/// document's revisions in `(document-ingest-order, revision-number-order)`.
pub fn run(context: &AppContext) -> Result<(), CliError> {
    let documents = ingest(&context.database_path)?;
    let mut repo = Repo::bootstrap(&context.output_dir)?;

    for document in &documents {
        let doc_path = write_initial_snapshot(&context.output_dir, document)?;
        info!(
            "{} ({} revisions)",
            document.path,
            document.revisions.len()
        );
        replay_document(&mut repo, document, &doc_path)?;
    }

    Ok(())
}

/// Write the document's final stored state to the working tree, creating
/// parent directories as needed (spec §4.F, §8 invariant 4).
fn write_initial_snapshot(repo_dir: &Path, document: &Document) -> Result<PathBuf, CliError> {
    let doc_path = repo_dir.join(&document.path);
    if let Some(parent) = doc_path.parent() {
        fs::create_dir_all(parent).map_err(|source| core_io_error(document, "failed to create parent directories", source))?;
    }
    fs::write(&doc_path, &document.contents)
        .map_err(|source| core_io_error(document, "failed to write final snapshot", source))?;
    Ok(doc_path)
}

fn replay_document(repo: &mut Repo, document: &Document, doc_path: &Path) -> Result<(), CliError> {
    if document.revisions.is_empty() {
        // Invariant 2: a document with zero stored revisions contributes one
        // commit of its already-written final snapshot.
        repo.commit(&document.path, document.final_rev_num)?;
        return Ok(());
    }

    let operations: Vec<_> = document
        .revisions
        .iter()
        .map(|revision| revision.operation.clone())
        .collect();

    let initial_state = if reset::is_reset(&operations[0]) {
        Vec::new()
    } else {
        replay::reconstruct_initial_state(&document.contents, &operations)
            .map_err(|source| core_replay_error(document, document.revisions[0].rev_num, source))?
    };
    fs::write(doc_path, &initial_state)
        .map_err(|source| core_io_error(document, "failed to write initial state", source))?;

    let mut state = initial_state;
    for revision in &document.revisions {
        state = replay::apply(&state, &revision.operation, Direction::Forward)
            .map_err(|source| core_replay_error(document, revision.rev_num, source))?;
        fs::write(doc_path, &state)
            .map_err(|source| core_io_error(document, "failed to write revision state", source))?;
        repo.commit(&document.path, revision.rev_num)?;
    }

    Ok(())
}

fn core_replay_error(document: &Document, rev_num: i64, source: c9rev2git_core::Error) -> CliError {
    CliError::Core {
        document_path: document.path.clone(),
        rev_num,
        source,
    }
}

fn core_io_error(document: &Document, context: &'static str, source: std::io::Error) -> CliError {
    CliError::Core {
        document_path: document.path.clone(),
        rev_num: document.final_rev_num,
        source: c9rev2git_core::Error::io(context, source),
    }
}
