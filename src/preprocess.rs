//! Minimal preprocessor: line-continuation and comment stripping.
//!
//! No macro expansion, no `#include`. Line numbers seen by the tokenizer are
//! preserved exactly: every newline present in the input survives into the
//! output unless it was itself the continuation backslash's partner.

use crate::error::ParseError;

/// Strips `\`-newline continuations and C-style comments from `source`,
/// returning the cleaned text. Line numbering is preserved: a stripped
/// `//` comment keeps its trailing newline, and a stripped `/* */` block
/// comment keeps every newline it spanned so the tokenizer's line counter
/// stays in sync with the original file.
pub fn preprocess(source: &str) -> Result<String, ParseError> {
    let bytes = source.as_bytes();
    let mut out = String::with_capacity(source.len());
    let mut i = 0usize;
    let n = bytes.len();

    while i < n {
        let c = bytes[i];
        if c == b'\\' && i + 1 < n && bytes[i + 1] == b'\n' {
            // Line continuation: erase both bytes.
            i += 2;
            continue;
        }
        if c == b'/' && i + 1 < n && bytes[i + 1] == b'/' {
            i += 2;
            while i < n && bytes[i] != b'\n' {
                i += 1;
            }
            continue;
        }
        if c == b'/' && i + 1 < n && bytes[i + 1] == b'*' {
            i += 2;
            let mut closed = false;
            while i + 1 < n {
                if bytes[i] == b'*' && bytes[i + 1] == b'/' {
                    i += 2;
                    closed = true;
                    break;
                }
                if bytes[i] == b'\n' {
                    out.push('\n');
                }
                i += 1;
            }
            if !closed {
                return Err(ParseError::UnterminatedComment);
            }
            continue;
        }
        out.push(c as char);
        i += 1;
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_line_comment_keeps_newline() {
        let out = preprocess("int a; // comment\nint b;\n").unwrap();
        assert_eq!(out, "int a; \nint b;\n");
    }

    #[test]
    fn strips_block_comment_preserves_line_count() {
        let out = preprocess("int a;\n/* multi\nline\ncomment */int b;\n").unwrap();
        assert_eq!(out.lines().count(), 4);
    }

    #[test]
    fn strips_line_continuation() {
        let out = preprocess("int ab\\\nc;\n").unwrap();
        assert_eq!(out, "int abc;\n");
    }

    #[test]
    fn unterminated_block_comment_errors() {
        let err = preprocess("int a; /* oops").unwrap_err();
        assert_eq!(err, ParseError::UnterminatedComment);
    }
}
