//! Forward and inverse replay of one revision's instructions against a
//! pre-image, sharing a single dispatch loop (spec §4.D "Symmetry", §9
//! "Shared instruction dispatch") that differs only in which of
//! Insert/Delete consumes the read cursor versus writes to the post-image.

use crate::error::Error;
use crate::op::Instruction;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Forward Replayer (spec §4.D): Insert writes, Delete consumes.
    Forward,
    /// Inverse Replayer (spec §4.C): Insert consumes, Delete writes.
    Reverse,
}

/// Apply one revision's instructions to `pre`, producing the post-image.
///
/// In `Direction::Forward` this reproduces the state immediately after the
/// revision was recorded; in `Direction::Reverse` it reproduces the state
/// immediately before it, given `pre` is the state immediately after.
pub fn apply(pre: &[u8], instructions: &[Instruction], direction: Direction) -> Result<Vec<u8>, Error> {
    let mut post = Vec::new();
    let mut cursor = 0usize;

    for instruction in instructions {
        match (direction, instruction) {
            (Direction::Forward, Instruction::Insert(text)) => {
                post.extend_from_slice(text);
            }
            (Direction::Reverse, Instruction::Insert(text)) => {
                cursor = advance(cursor, text.len(), pre.len())?;
            }
            (Direction::Forward, Instruction::Delete(text)) => {
                let end = advance(cursor, text.len(), pre.len())?;
                let found = &pre[cursor..end];
                if found != text.as_slice() {
                    return Err(Error::state_mismatch(format!(
                        "delete payload {:?} does not match pre-image bytes {:?} at cursor {cursor}",
                        String::from_utf8_lossy(text),
                        String::from_utf8_lossy(found),
                    )));
                }
                cursor = end;
            }
            (Direction::Reverse, Instruction::Delete(text)) => {
                post.extend_from_slice(text);
            }
            (_, Instruction::Retain(n)) => {
                let end = advance(cursor, *n, pre.len())?;
                post.extend_from_slice(&pre[cursor..end]);
                cursor = end;
            }
        }
    }

    Ok(post)
}

fn advance(cursor: usize, len: usize, pre_len: usize) -> Result<usize, Error> {
    let end = cursor.checked_add(len).ok_or_else(|| {
        Error::state_mismatch("cursor overflow while advancing through pre-image".to_string())
    })?;
    if end > pre_len {
        return Err(Error::state_mismatch(format!(
            "cursor {end} exceeds pre-image length {pre_len}"
        )));
    }
    Ok(end)
}

/// Reconstruct the initial (pre-first-revision) document state from the
/// final on-disk snapshot by running every revision's instructions in
/// reverse, from last to first (spec §4.C).
pub fn reconstruct_initial_state(
    final_snapshot: &[u8],
    revisions: &[Vec<Instruction>],
) -> Result<Vec<u8>, Error> {
    let mut state = final_snapshot.to_vec();
    for instructions in revisions.iter().rev() {
        state = apply(&state, instructions, Direction::Reverse)?;
    }
    Ok(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::op::lex;

    fn instrs(raw: &str) -> Vec<Instruction> {
        lex(raw).unwrap()
    }

    #[test]
    fn forward_insert_from_empty() {
        // S1
        let post = apply(b"", &instrs(r#"["iHello"]"#), Direction::Forward).unwrap();
        assert_eq!(post, b"Hello");
    }

    #[test]
    fn forward_retain_then_insert() {
        // S2: "Hi" -> "Hi there"
        let post = apply(b"Hi", &instrs(r#"["r2","i there"]"#), Direction::Forward).unwrap();
        assert_eq!(post, b"Hi there");
    }

    #[test]
    fn forward_delete() {
        // S4: "abc" -> "ac"
        let post = apply(b"abc", &instrs(r#"["r1","db","r1"]"#), Direction::Forward).unwrap();
        assert_eq!(post, b"ac");
    }

    #[test]
    fn forward_delete_mismatch_is_state_error() {
        let err = apply(b"abc", &instrs(r#"["r1","dx","r1"]"#), Direction::Forward).unwrap_err();
        assert!(matches!(err, Error::OperationDoesNotMatchState { .. }));
    }

    #[test]
    fn reverse_insert_then_retain() {
        // S3: world! reverted through ["r5","i!"] -> world
        let pre = apply(b"world!", &instrs(r#"["r5","i!"]"#), Direction::Reverse).unwrap();
        assert_eq!(pre, b"world");
    }

    #[test]
    fn reverse_delete_restores_text() {
        // Forward applied ["r1","db","r1"] to "abc" -> "ac"; reverse should
        // reconstruct "abc" from "ac".
        let pre = apply(b"ac", &instrs(r#"["r1","db","r1"]"#), Direction::Reverse).unwrap();
        assert_eq!(pre, b"abc");
    }

    #[test]
    fn retain_past_end_is_state_error() {
        let err = apply(b"ab", &instrs(r#"["r5"]"#), Direction::Forward).unwrap_err();
        assert!(matches!(err, Error::OperationDoesNotMatchState { .. }));
    }

    #[test]
    fn round_trip_invariant() {
        // Invariant 1: inverse-then-forward reproduces the final snapshot.
        let revisions: Vec<Vec<Instruction>> =
            vec![instrs(r#"["iHi"]"#), instrs(r#"["r2","i there"]"#)];
        let final_snapshot = b"Hi there".to_vec();

        let initial = reconstruct_initial_state(&final_snapshot, &revisions).unwrap();
        assert_eq!(initial, b"");

        let mut state = initial;
        for instructions in &revisions {
            state = apply(&state, instructions, Direction::Forward).unwrap();
        }
        assert_eq!(state, final_snapshot);
    }

    #[test]
    fn round_trip_invariant_with_inversion_required() {
        // S3-shaped: first revision contains a Retain, so reset is false.
        let revisions: Vec<Vec<Instruction>> = vec![instrs(r#"["r5","i!"]"#)];
        let final_snapshot = b"world!".to_vec();

        let initial = reconstruct_initial_state(&final_snapshot, &revisions).unwrap();
        assert_eq!(initial, b"world");

        let mut state = initial;
        for instructions in &revisions {
            state = apply(&state, instructions, Direction::Forward).unwrap();
        }
        assert_eq!(state, final_snapshot);
    }
}
