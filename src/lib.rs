//! Flat pre-order JSON tokenizer with a YAML-like outline renderer.
//!
//! A document's structure is held as a flat sequence of tokens in pre-order,
//! with no tree built and no parent or child pointers. [`TokenStore`] grows
//! the slot buffer by doubling and re-tokenizing until the document fits;
//! [`render::render`] walks the finished sequence with a forward-only cursor,
//! reconstructing hierarchy purely from each token's child count.

pub mod error;
pub mod render;
pub mod store;
pub mod token;
pub mod tokenizer;

use std::io::Write;

pub use crate::error::{Error, Result};
pub use crate::render::Writer;
pub use crate::store::{TokenStore, INITIAL_CAPACITY};
pub use crate::token::{Span, Token, TokenKind};

/// Tokenize `source` and render it as indented, YAML-like text.
pub fn to_string(source: &str) -> Result<String> {
    let store = TokenStore::parse(source)?;
    render::to_string(source, store.tokens())
}

/// Tokenize `source` and render it as raw bytes.
pub fn to_vec(source: &str) -> Result<Vec<u8>> {
    let store = TokenStore::parse(source)?;
    render::to_vec(source, store.tokens())
}

/// Tokenize `source` and write the rendered text to `writer`.
pub fn to_writer<W: Write>(mut writer: W, source: &str) -> Result<()> {
    let bytes = to_vec(source)?;
    writer.write_all(&bytes)?;
    Ok(())
}
