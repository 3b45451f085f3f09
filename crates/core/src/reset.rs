use crate::op::Instruction;

/// Spec §4.B: a document's first recorded revision can only refer to
/// positions in a prior document if it contains a Retain or Delete. If
/// every instruction is an Insert, the document was necessarily empty
/// before that revision, and the working file can be truncated instead of
/// reconstructed by inverse replay.
pub fn is_reset(first_revision: &[Instruction]) -> bool {
    first_revision
        .iter()
        .all(|instr| matches!(instr, Instruction::Insert(_)))
}
