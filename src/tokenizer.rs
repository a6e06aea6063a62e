use memchr::memchr2;

use crate::token::{Span, Token, TokenKind};

/// Span end for a container whose closing bracket has not been seen yet.
/// Never survives a successful parse: the end-of-input check rejects any
/// token still open.
const OPEN: usize = usize::MAX;

/// Outcome of a single tokenization attempt.
///
/// `Capacity` is the retry signal: the caller owns the slot buffer, grows it
/// and runs a fresh tokenizer over the same source. Everything else is a
/// malformed-input report with the byte offset where scanning stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenizeError {
    Capacity,
    Format { offset: usize, reason: &'static str },
}

/// Single-pass JSON tokenizer filling a caller-provided slot slice.
///
/// Produces the flat pre-order sequence described in [`Token`]: containers
/// precede their flattened children, object pairs alternate key/value, and a
/// key that has a value carries `children == 1`. State is one byte cursor,
/// the next free slot, and the index the next value attaches to; open
/// containers are found by scanning backwards through the slots already
/// written, so no side stack is kept.
///
/// A tokenizer is good for exactly one attempt. Its cursor is not reset on
/// return, so the store builds a new one per retry.
pub struct Tokenizer {
    pos: usize,
    next: usize,
    attach: Option<usize>,
}

impl Tokenizer {
    pub fn new() -> Self {
        Self {
            pos: 0,
            next: 0,
            attach: None,
        }
    }

    /// Tokenize `source` into `tokens`, returning the number of slots
    /// populated.
    pub fn parse(
        &mut self,
        source: &str,
        tokens: &mut [Token],
    ) -> Result<usize, TokenizeError> {
        let bytes = source.as_bytes();

        while self.pos < bytes.len() {
            match bytes[self.pos] {
                b'{' | b'[' => self.open_container(bytes[self.pos], tokens)?,
                b'}' | b']' => self.close_container(bytes[self.pos], tokens)?,
                b'"' => {
                    let span = self.scan_string(bytes)?;
                    let idx = self.alloc(tokens)?;
                    tokens[idx] = Token::new(TokenKind::String, span);
                    if let Some(attach) = self.attach {
                        tokens[attach].children += 1;
                    }
                }
                b' ' | b'\t' | b'\r' | b'\n' => {}
                b':' => {
                    let Some(key) = self.next.checked_sub(1) else {
                        return Err(self.invalid("unexpected ':'"));
                    };
                    self.attach = Some(key);
                }
                b',' => self.detach_to_container(tokens),
                b'-' | b'0'..=b'9' | b't' | b'f' | b'n' => {
                    if let Some(attach) = self.attach {
                        let holder = &tokens[attach];
                        if holder.kind == TokenKind::Object {
                            return Err(self.invalid("object keys must be strings"));
                        }
                        if holder.kind == TokenKind::String && holder.children != 0 {
                            return Err(self.invalid("expected ',' or '}'"));
                        }
                    }
                    let span = self.scan_primitive(bytes)?;
                    let idx = self.alloc(tokens)?;
                    tokens[idx] = Token::new(TokenKind::Primitive, span);
                    if let Some(attach) = self.attach {
                        tokens[attach].children += 1;
                    }
                }
                _ => return Err(self.invalid("unexpected character")),
            }
            self.pos += 1;
        }

        if tokens[..self.next].iter().any(|t| t.span.end == OPEN) {
            return Err(TokenizeError::Format {
                offset: bytes.len(),
                reason: "unexpected end of input",
            });
        }

        Ok(self.next)
    }

    fn alloc(&mut self, tokens: &[Token]) -> Result<usize, TokenizeError> {
        if self.next >= tokens.len() {
            return Err(TokenizeError::Capacity);
        }
        let idx = self.next;
        self.next += 1;
        Ok(idx)
    }

    fn invalid(&self, reason: &'static str) -> TokenizeError {
        TokenizeError::Format {
            offset: self.pos,
            reason,
        }
    }

    fn open_container(&mut self, byte: u8, tokens: &mut [Token]) -> Result<(), TokenizeError> {
        let kind = if byte == b'{' {
            TokenKind::Object
        } else {
            TokenKind::Array
        };
        let idx = self.alloc(tokens)?;
        if let Some(attach) = self.attach {
            if tokens[attach].kind == TokenKind::Object {
                return Err(self.invalid("object keys must be strings"));
            }
            tokens[attach].children += 1;
        }
        tokens[idx] = Token::new(kind, Span::new(self.pos, OPEN));
        self.attach = Some(idx);
        Ok(())
    }

    fn close_container(&mut self, byte: u8, tokens: &mut [Token]) -> Result<(), TokenizeError> {
        let kind = if byte == b'}' {
            TokenKind::Object
        } else {
            TokenKind::Array
        };
        let Some(idx) = (0..self.next).rev().find(|&i| tokens[i].span.end == OPEN) else {
            return Err(self.invalid("unmatched closing bracket"));
        };
        if tokens[idx].kind != kind {
            return Err(self.invalid("mismatched closing bracket"));
        }
        tokens[idx].span.end = self.pos + 1;
        self.attach = (0..idx).rev().find(|&i| tokens[i].span.end == OPEN);
        Ok(())
    }

    /// After a value inside an object the attach point is still the key;
    /// a comma hands the next slot back to the enclosing container.
    fn detach_to_container(&mut self, tokens: &[Token]) {
        if let Some(attach) = self.attach {
            if !tokens[attach].kind.is_container() {
                self.attach = (0..self.next)
                    .rev()
                    .find(|&i| tokens[i].kind.is_container() && tokens[i].span.end == OPEN);
            }
        }
    }

    /// Scan a double-quoted string starting at the opening quote. The
    /// returned span excludes both quotes; the cursor is left on the closing
    /// quote for the main loop to step past.
    fn scan_string(&mut self, bytes: &[u8]) -> Result<Span, TokenizeError> {
        let start = self.pos + 1;
        let mut cursor = start;

        while let Some(rel) = memchr2(b'"', b'\\', &bytes[cursor..]) {
            let at = cursor + rel;
            if bytes[at] == b'"' {
                self.pos = at;
                return Ok(Span::new(start, at));
            }
            match bytes.get(at + 1) {
                Some(b'"' | b'/' | b'\\' | b'b' | b'f' | b'r' | b'n' | b't') => {
                    cursor = at + 2;
                }
                Some(b'u') => {
                    let hex = bytes
                        .get(at + 2..at + 6)
                        .ok_or(TokenizeError::Format {
                            offset: at,
                            reason: "truncated unicode escape",
                        })?;
                    if !hex.iter().all(u8::is_ascii_hexdigit) {
                        return Err(TokenizeError::Format {
                            offset: at,
                            reason: "invalid unicode escape",
                        });
                    }
                    cursor = at + 6;
                }
                Some(_) => {
                    return Err(TokenizeError::Format {
                        offset: at,
                        reason: "invalid escape sequence",
                    });
                }
                None => break,
            }
        }

        Err(TokenizeError::Format {
            offset: bytes.len(),
            reason: "unterminated string",
        })
    }

    /// Scan a primitive (number, `true`, `false`, `null`) starting at its
    /// first byte. The primitive runs until a structural delimiter,
    /// whitespace, or end of input; the cursor is left on its last byte.
    fn scan_primitive(&mut self, bytes: &[u8]) -> Result<Span, TokenizeError> {
        let start = self.pos;
        let mut cursor = start;

        while cursor < bytes.len() {
            match bytes[cursor] {
                b'\t' | b'\r' | b'\n' | b' ' | b',' | b':' | b']' | b'}' => break,
                c if c < 0x20 || c >= 0x7f => {
                    return Err(TokenizeError::Format {
                        offset: cursor,
                        reason: "invalid character in value",
                    });
                }
                _ => cursor += 1,
            }
        }

        self.pos = cursor - 1;
        Ok(Span::new(start, cursor))
    }
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self::new()
    }
}
