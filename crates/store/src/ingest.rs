use crate::error::Error;
use c9rev2git_core::{op, Document, Revision};
use rusqlite::Connection;
use std::collections::HashMap;
use std::path::Path;

/// The literal operation string that marks a revision as a no-op to be
/// skipped during ingestion (spec §3, §4.F, scenario S6).
const EMPTY_OPERATION: &str = "[]";

/// Open the source store and load every document and its revisions, in the
/// order required by spec §4.F: `Documents` by `id` ascending, then
/// `Revisions` by `(document_id, revNum)` ascending.
pub fn ingest(db_path: &Path) -> Result<Vec<Document>, Error> {
    let conn = Connection::open(db_path).map_err(|source| Error::OpenFailed {
        path: db_path.to_path_buf(),
        source,
    })?;

    let mut documents = load_documents(&conn)?;
    load_revisions(&conn, &mut documents)?;
    Ok(documents)
}

fn load_documents(conn: &Connection) -> Result<Vec<Document>, Error> {
    let mut stmt = conn
        .prepare("SELECT id, path, contents, revNum FROM Documents ORDER BY id ASC")
        .map_err(|source| Error::QueryFailed {
            context: "failed to prepare Documents query",
            source,
        })?;

    let rows = stmt
        .query_map([], |row| {
            let id: i64 = row.get(0)?;
            let path: String = row.get(1)?;
            let contents = contents_as_bytes(row, 2)?;
            let rev_num: i64 = row.get(3)?;
            Ok(Document::new(id, path, contents, rev_num))
        })
        .map_err(|source| Error::QueryFailed {
            context: "failed to query Documents",
            source,
        })?;

    let mut documents = Vec::new();
    for row in rows {
        documents.push(row.map_err(|source| Error::QueryFailed {
            context: "failed to read Documents row",
            source,
        })?);
    }
    Ok(documents)
}

/// `Documents.contents` is declared BLOB, but SQLite's type affinity does
/// not force a storage class, and rows are sometimes written with a text
/// literal; accept either so ingestion does not depend on how the producer
/// happened to bind the value.
fn contents_as_bytes(row: &rusqlite::Row<'_>, idx: usize) -> rusqlite::Result<Vec<u8>> {
    use rusqlite::types::ValueRef;
    match row.get_ref(idx)? {
        ValueRef::Blob(bytes) => Ok(bytes.to_vec()),
        ValueRef::Text(bytes) => Ok(bytes.to_vec()),
        ValueRef::Null => Ok(Vec::new()),
        other => Err(rusqlite::Error::InvalidColumnType(
            idx,
            "contents".to_string(),
            other.data_type(),
        )),
    }
}

fn load_revisions(conn: &Connection, documents: &mut [Document]) -> Result<(), Error> {
    let index_by_id: HashMap<i64, usize> = documents
        .iter()
        .enumerate()
        .map(|(idx, doc)| (doc.id, idx))
        .collect();

    let mut stmt = conn
        .prepare(
            "SELECT document_id, revNum, operation FROM Revisions \
             ORDER BY document_id ASC, revNum ASC",
        )
        .map_err(|source| Error::QueryFailed {
            context: "failed to prepare Revisions query",
            source,
        })?;

    let rows = stmt
        .query_map([], |row| {
            let document_id: i64 = row.get(0)?;
            let rev_num: i64 = row.get(1)?;
            let operation: String = row.get(2)?;
            Ok((document_id, rev_num, operation))
        })
        .map_err(|source| Error::QueryFailed {
            context: "failed to query Revisions",
            source,
        })?;

    for row in rows {
        let (document_id, rev_num, operation) = row.map_err(|source| Error::QueryFailed {
            context: "failed to read Revisions row",
            source,
        })?;

        if operation == EMPTY_OPERATION {
            continue;
        }

        let Some(&idx) = index_by_id.get(&document_id) else {
            // A revision referencing a document id absent from Documents;
            // there is nowhere to file it, so it is silently dropped, matching
            // the read-only, trust-the-store posture of an ingestion layer.
            continue;
        };

        let instructions = op::lex(&operation).map_err(|source| Error::OperationMalformed {
            document_path: documents[idx].path.clone(),
            rev_num,
            source,
        })?;
        documents[idx].revisions.push(Revision::new(rev_num, instructions));
    }

    Ok(())
}
