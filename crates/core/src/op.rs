//! Decodes the bracketed, quoted, escape-aware operation string format
//! described in spec §4.A into an ordered list of [`Instruction`]s.

use crate::error::Error;

/// One step of an operational-transform edit. Retain counts and
/// Insert/Delete payloads are measured in bytes (spec §9 open question 4).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Instruction {
    Retain(usize),
    Insert(Vec<u8>),
    Delete(Vec<u8>),
}

/// Decode a raw operation string such as `["iHello","r2"]` into its
/// instruction sequence.
///
/// Callers are expected to have already filtered out the literal `[]`
/// operation (spec §4.F); an empty instruction list here is still
/// rejected as malformed, since a well-formed Operation is non-empty.
pub fn lex(raw: &str) -> Result<Vec<Instruction>, Error> {
    let bytes = raw.as_bytes();
    if bytes.len() < 2 || bytes[0] != b'[' || bytes[bytes.len() - 1] != b']' {
        return Err(Error::malformed(format!(
            "operation is not bracketed: {raw:?}"
        )));
    }
    let inner = &bytes[1..bytes.len() - 1];

    let mut instructions = Vec::new();
    let mut i = 0;
    loop {
        if i >= inner.len() {
            break;
        }
        if inner[i] != b'"' {
            return Err(Error::malformed(format!(
                "expected '\"' at byte {i} of {raw:?}"
            )));
        }
        i += 1;

        let (payload, next) = decode_quoted(inner, i, raw)?;
        i = next;
        instructions.push(decode_instruction(&payload, raw)?);

        match inner.get(i) {
            None => break,
            Some(b',') => {
                i += 1;
            }
            Some(other) => {
                return Err(Error::malformed(format!(
                    "expected ',' or end after instruction, found {:?} at byte {i} of {raw:?}",
                    *other as char
                )));
            }
        }
    }

    if instructions.is_empty() {
        return Err(Error::malformed(format!(
            "operation has no instructions: {raw:?}"
        )));
    }
    Ok(instructions)
}

/// Scan a quoted, escape-aware string starting just past the opening `"`.
/// Returns the decoded payload bytes and the index just past the closing `"`.
fn decode_quoted(inner: &[u8], mut i: usize, raw: &str) -> Result<(Vec<u8>, usize), Error> {
    let mut payload = Vec::new();
    loop {
        match inner.get(i) {
            None => {
                return Err(Error::malformed(format!(
                    "unterminated quoted string in {raw:?}"
                )));
            }
            Some(b'"') => {
                i += 1;
                return Ok((payload, i));
            }
            Some(b'\\') => {
                i += 1;
                match inner.get(i) {
                    None => {
                        return Err(Error::malformed(format!(
                            "dangling escape at end of {raw:?}"
                        )));
                    }
                    Some(b'"') => payload.push(b'"'),
                    Some(b'\\') => payload.push(b'\\'),
                    Some(b'n') => payload.push(b'\n'),
                    Some(b't') => payload.push(b'\t'),
                    // Open question #1 (spec §9): unrecognised escapes pass
                    // both bytes through unchanged rather than erroring.
                    Some(&other) => {
                        payload.push(b'\\');
                        payload.push(other);
                    }
                }
                i += 1;
            }
            Some(&c) => {
                payload.push(c);
                i += 1;
            }
        }
    }
}

fn decode_instruction(payload: &[u8], raw: &str) -> Result<Instruction, Error> {
    let (&tag, rest) = payload.split_first().ok_or_else(|| {
        Error::malformed(format!("empty instruction payload in {raw:?}"))
    })?;
    match tag {
        b'i' => Ok(Instruction::Insert(rest.to_vec())),
        b'd' => Ok(Instruction::Delete(rest.to_vec())),
        b'r' => {
            let digits = std::str::from_utf8(rest).map_err(|_| {
                Error::malformed(format!("retain payload is not UTF-8 in {raw:?}"))
            })?;
            let n: usize = digits.parse().map_err(|_| {
                Error::malformed(format!(
                    "non-numeric retain payload {digits:?} in {raw:?}"
                ))
            })?;
            Ok(Instruction::Retain(n))
        }
        other => Err(Error::malformed(format!(
            "unknown instruction tag {:?} in {raw:?}",
            other as char
        ))),
    }
}

/// Re-encode an instruction list to the wire format of spec §4.A. Used by
/// the op-lexer round-trip property (spec §8.6); payloads containing
/// unspecified escapes are not guaranteed to round-trip byte-for-byte.
pub fn encode(instructions: &[Instruction]) -> String {
    // Built as raw bytes, not `String::push(b as char)`, so multi-byte UTF-8
    // payloads round-trip instead of having each continuation byte
    // reinterpreted as its own Latin-1 code point.
    let mut out: Vec<u8> = vec![b'['];
    for (idx, instr) in instructions.iter().enumerate() {
        if idx > 0 {
            out.push(b',');
        }
        out.push(b'"');
        match instr {
            Instruction::Retain(n) => {
                out.push(b'r');
                out.extend_from_slice(n.to_string().as_bytes());
            }
            Instruction::Insert(text) => {
                out.push(b'i');
                push_escaped(&mut out, text);
            }
            Instruction::Delete(text) => {
                out.push(b'd');
                push_escaped(&mut out, text);
            }
        }
        out.push(b'"');
    }
    out.push(b']');
    String::from_utf8(out).expect("encode only copies bytes from a valid UTF-8 source string")
}

fn push_escaped(out: &mut Vec<u8>, text: &[u8]) {
    for &b in text {
        match b {
            b'"' => out.extend_from_slice(b"\\\""),
            b'\\' => out.extend_from_slice(b"\\\\"),
            b'\n' => out.extend_from_slice(b"\\n"),
            b'\t' => out.extend_from_slice(b"\\t"),
            _ => out.push(b),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_insert() {
        let instrs = lex(r#"["iHello"]"#).unwrap();
        assert_eq!(instrs, vec![Instruction::Insert(b"Hello".to_vec())]);
    }

    #[test]
    fn retain_then_insert() {
        let instrs = lex(r#"["r2","i there"]"#).unwrap();
        assert_eq!(
            instrs,
            vec![
                Instruction::Retain(2),
                Instruction::Insert(b" there".to_vec())
            ]
        );
    }

    #[test]
    fn retain_delete_retain() {
        let instrs = lex(r#"["r1","db","r1"]"#).unwrap();
        assert_eq!(
            instrs,
            vec![
                Instruction::Retain(1),
                Instruction::Delete(b"b".to_vec()),
                Instruction::Retain(1)
            ]
        );
    }

    #[test]
    fn escaped_quotes() {
        // S5: `["i\"quoted\""]` decodes to one Insert of `"quoted"` (7 bytes).
        let instrs = lex(r#"["i\"quoted\""]"#).unwrap();
        assert_eq!(instrs, vec![Instruction::Insert(b"\"quoted\"".to_vec())]);
        assert_eq!(instrs[0], Instruction::Insert(b"\"quoted\"".to_vec()));
        match &instrs[0] {
            Instruction::Insert(payload) => assert_eq!(payload.len(), 8),
            _ => panic!("expected insert"),
        }
    }

    #[test]
    fn escaped_backslash_newline_tab() {
        let instrs = lex(r#"["i\\\n\t"]"#).unwrap();
        assert_eq!(instrs, vec![Instruction::Insert(b"\\\n\t".to_vec())]);
    }

    #[test]
    fn unknown_escape_passes_through() {
        let instrs = lex(r#"["i\q"]"#).unwrap();
        assert_eq!(instrs, vec![Instruction::Insert(b"\\q".to_vec())]);
    }

    #[test]
    fn rejects_missing_brackets() {
        assert!(lex(r#""iHello""#).is_err());
    }

    #[test]
    fn rejects_unterminated_string() {
        assert!(lex(r#"["iHello]"#).is_err());
    }

    #[test]
    fn rejects_unknown_tag() {
        assert!(lex(r#"["xHello"]"#).is_err());
    }

    #[test]
    fn rejects_non_numeric_retain() {
        assert!(lex(r#"["rabc"]"#).is_err());
    }

    #[test]
    fn round_trip_without_unspecified_escapes() {
        let raw = r#"["r2","i there","dold"]"#;
        let instrs = lex(raw).unwrap();
        assert_eq!(encode(&instrs), raw);
    }
}
