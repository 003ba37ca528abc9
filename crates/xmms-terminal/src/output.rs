//! Word-wrapped output for help text.

use std::io::{self, Write};

/// Write `text` word by word, wrapping before column `max`.
///
/// `start` is the column the cursor is already at. Wrapped lines are padded
/// to `indent`. No trailing newline is written.
pub fn write_indented(
    out: &mut dyn Write,
    text: &str,
    start: usize,
    indent: usize,
    max: usize,
) -> io::Result<()> {
    let mut pos = start;
    for word in text.split_whitespace() {
        let len = word.chars().count();
        loop {
            while pos < indent {
                out.write_all(b" ")?;
                pos += 1;
            }
            if pos != indent && len + pos + 1 >= max {
                out.write_all(b"\n")?;
                pos = 0;
                continue;
            }
            break;
        }
        if pos != indent {
            out.write_all(b" ")?;
            pos += 1;
        }
        out.write_all(word.as_bytes())?;
        pos += len;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wrap(text: &str, start: usize, indent: usize, max: usize) -> String {
        let mut out = Vec::new();
        write_indented(&mut out, text, start, indent, max).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn short_text_stays_on_one_line() {
        assert_eq!(wrap("hello  world", 0, 0, 75), "hello world");
    }

    #[test]
    fn pads_to_indent() {
        assert_eq!(wrap("abc", 2, 5, 75), "   abc");
    }

    #[test]
    fn continues_after_start_column() {
        assert_eq!(wrap("abc def", 20, 21, 76), " abc def");
    }

    #[test]
    fn wraps_and_indents() {
        let text = "aaaa bbbb cccc dddd";
        assert_eq!(wrap(text, 0, 2, 12), "  aaaa bbbb\n  cccc dddd");
    }

    #[test]
    fn overlong_word_is_not_split() {
        assert_eq!(wrap("abcdefghijkl", 0, 0, 5), "abcdefghijkl");
    }

    #[test]
    fn empty_text_writes_nothing() {
        assert_eq!(wrap("   ", 0, 4, 10), "");
    }
}
