use crate::error::{Error, Result};
use crate::token::{Token, TokenKind};

const INDENT_UNIT: &str = "  ";
const ITEM_MARKER: &str = "   - ";
const PAIR_SEPARATOR: &str = ": ";

/// Byte-buffer output sink with cached indentation strings.
pub struct Writer {
    buffer: Vec<u8>,
    indent_cache: Vec<String>,
}

impl Writer {
    pub fn new() -> Self {
        Self {
            buffer: Vec::new(),
            indent_cache: vec![String::new()],
        }
    }

    pub fn finish(self) -> String {
        String::from_utf8(self.buffer).expect("writer output must be valid UTF-8")
    }

    pub fn finish_bytes(self) -> Vec<u8> {
        self.buffer
    }

    pub(crate) fn write_str(&mut self, s: &str) {
        self.buffer.extend_from_slice(s.as_bytes());
    }

    pub(crate) fn write_newline(&mut self) {
        self.buffer.push(b'\n');
    }

    pub(crate) fn write_indent(&mut self, depth: usize) {
        if depth == 0 {
            return;
        }
        if depth >= self.indent_cache.len() {
            self.extend_indent_cache(depth);
        }
        self.buffer
            .extend_from_slice(self.indent_cache[depth].as_bytes());
    }

    pub(crate) fn write_quoted(&mut self, s: &str) {
        self.buffer.push(b'\'');
        self.buffer.extend_from_slice(s.as_bytes());
        self.buffer.push(b'\'');
    }

    fn extend_indent_cache(&mut self, depth: usize) {
        while self.indent_cache.len() <= depth {
            let mut next = String::with_capacity(
                self.indent_cache.last().map_or(0, String::len) + INDENT_UNIT.len(),
            );
            if let Some(prev) = self.indent_cache.last() {
                next.push_str(prev);
            }
            next.push_str(INDENT_UNIT);
            self.indent_cache.push(next);
        }
    }
}

impl Default for Writer {
    fn default() -> Self {
        Self::new()
    }
}

/// Render the subtree at the front of `tokens`, returning how many slots it
/// consumed (including its own), so the caller can advance past it.
///
/// The sequence is consumed strictly forward: a container's extent is never
/// looked up, only accumulated from the recursive consumption of its
/// children. An empty slice consumes nothing and prints nothing, which also
/// covers truncated sequences from foreign producers.
pub fn render(
    writer: &mut Writer,
    source: &str,
    tokens: &[Token],
    indent: usize,
) -> Result<usize> {
    let Some(token) = tokens.first() else {
        return Ok(0);
    };

    match token.kind {
        TokenKind::Primitive => {
            writer.write_str(token.slice(source));
            Ok(1)
        }
        TokenKind::String => {
            writer.write_quoted(token.slice(source));
            Ok(1)
        }
        TokenKind::Object => {
            writer.write_newline();
            let mut cursor = 1;
            for _ in 0..token.children {
                let Some(key) = tokens.get(cursor) else { break };
                if key.kind.is_container() {
                    return Err(Error::format(key.span.start, "object key is a container"));
                }
                writer.write_indent(indent);
                cursor += render(writer, source, rest(tokens, cursor), indent + 1)?;
                if key.children > 0 {
                    writer.write_str(PAIR_SEPARATOR);
                    cursor += render(writer, source, rest(tokens, cursor), indent + 1)?;
                }
                writer.write_newline();
            }
            Ok(cursor)
        }
        TokenKind::Array => {
            writer.write_newline();
            let mut cursor = 1;
            for _ in 0..token.children {
                writer.write_indent(indent.saturating_sub(1));
                writer.write_str(ITEM_MARKER);
                cursor += render(writer, source, rest(tokens, cursor), indent + 1)?;
                writer.write_newline();
            }
            Ok(cursor)
        }
    }
}

fn rest(tokens: &[Token], cursor: usize) -> &[Token] {
    tokens.get(cursor..).unwrap_or(&[])
}

/// Render a whole token sequence to a string. The root is rendered at one
/// indent level, so a top-level object's pairs sit at a single two-space
/// indent and a top-level array's markers sit flush left.
pub fn to_string(source: &str, tokens: &[Token]) -> Result<String> {
    let mut writer = Writer::new();
    render(&mut writer, source, tokens, 1)?;
    Ok(writer.finish())
}

/// Render a whole token sequence as raw bytes.
pub fn to_vec(source: &str, tokens: &[Token]) -> Result<Vec<u8>> {
    let mut writer = Writer::new();
    render(&mut writer, source, tokens, 1)?;
    Ok(writer.finish_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::Span;

    fn primitive(start: usize, end: usize) -> Token {
        Token::new(TokenKind::Primitive, Span::new(start, end))
    }

    #[rstest::rstest]
    fn test_writer_indent_cache() {
        let mut writer = Writer::new();
        writer.write_indent(0);
        writer.write_str("a");
        writer.write_newline();
        writer.write_indent(2);
        writer.write_str("b");
        assert_eq!(writer.finish(), "a\n    b");
    }

    #[rstest::rstest]
    fn test_writer_quoted() {
        let mut writer = Writer::new();
        writer.write_quoted("hello");
        assert_eq!(writer.finish(), "'hello'");
    }

    #[rstest::rstest]
    fn test_empty_sequence_consumes_nothing() {
        let mut writer = Writer::new();
        let consumed = render(&mut writer, "", &[], 1).unwrap();
        assert_eq!(consumed, 0);
        assert_eq!(writer.finish(), "");
    }

    #[rstest::rstest]
    fn test_primitive_consumes_one_slot() {
        let mut writer = Writer::new();
        let tokens = [primitive(0, 1)];
        let consumed = render(&mut writer, "1", &tokens, 1).unwrap();
        assert_eq!(consumed, 1);
        assert_eq!(writer.finish(), "1");
    }

    #[rstest::rstest]
    fn test_container_key_rejected() {
        // An object whose "key" slot holds a container must not be
        // traversed; JSON forbids non-scalar keys.
        let source = r#"{[]:1}"#;
        let mut object = Token::new(TokenKind::Object, Span::new(0, 6));
        object.children = 1;
        let mut key = Token::new(TokenKind::Array, Span::new(1, 3));
        key.children = 0;
        let tokens = [object, key, primitive(4, 5)];

        let mut writer = Writer::new();
        let err = render(&mut writer, source, &tokens, 1).unwrap_err();
        assert!(matches!(err, Error::Format { .. }));
    }

    #[rstest::rstest]
    fn test_truncated_sequence_stops_short() {
        // Object claims two pairs but only one key survives; rendering must
        // not read past the slice.
        let source = r#"{"a"}"#;
        let mut object = Token::new(TokenKind::Object, Span::new(0, 5));
        object.children = 2;
        let key = Token::new(TokenKind::String, Span::new(2, 3));
        let tokens = [object, key];

        let mut writer = Writer::new();
        let consumed = render(&mut writer, source, &tokens, 1).unwrap();
        assert_eq!(consumed, 2);
    }
}
