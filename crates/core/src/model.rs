use crate::op::Instruction;

/// One document as recorded in the source store: its path in the working
/// tree, the final bytes it settled on, and the ordered edits that produced
/// those bytes.
#[derive(Debug, Clone)]
pub struct Document {
    pub id: i64,
    pub path: String,
    pub contents: Vec<u8>,
    pub final_rev_num: i64,
    pub revisions: Vec<Revision>,
}

impl Document {
    pub fn new(id: i64, path: String, contents: Vec<u8>, final_rev_num: i64) -> Self {
        Self {
            id,
            path,
            contents,
            final_rev_num,
            revisions: Vec::new(),
        }
    }

    /// True when the final revision number is 0, in which case `revisions`
    /// must be empty per the data model invariant in spec §3.
    pub fn has_no_revisions(&self) -> bool {
        self.final_rev_num == 0
    }
}

/// One recorded edit to a document's content, already lexed into
/// instructions (see [`crate::op`]).
#[derive(Debug, Clone)]
pub struct Revision {
    pub rev_num: i64,
    pub operation: Vec<Instruction>,
}

impl Revision {
    pub fn new(rev_num: i64, operation: Vec<Instruction>) -> Self {
        Self { rev_num, operation }
    }
}
