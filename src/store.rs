use crate::error::{Error, Result};
use crate::token::Token;
use crate::tokenizer::{TokenizeError, Tokenizer};

/// Default number of token slots for the first tokenization attempt.
pub const INITIAL_CAPACITY: usize = 2;

/// Owns the flat token sequence for one source document.
///
/// The required slot count is unknown up front, so `parse` runs the
/// tokenizer against a small buffer and, whenever the attempt reports it ran
/// out of slots, doubles the buffer and re-tokenizes the same source from
/// scratch. The tokenizer is stateful, so every attempt gets a fresh one;
/// a partially filled buffer is never resumed. Growth has no upper bound;
/// the only fatal outcomes are malformed input and a failed allocation.
#[derive(Debug)]
pub struct TokenStore {
    tokens: Vec<Token>,
    len: usize,
}

impl TokenStore {
    /// Tokenize `source` with the default initial capacity.
    pub fn parse(source: &str) -> Result<Self> {
        Self::parse_with_capacity(source, INITIAL_CAPACITY)
    }

    /// Tokenize `source` starting from `initial` slots. A zero `initial` is
    /// clamped to 1 so the doubling loop always makes progress.
    pub fn parse_with_capacity(source: &str, initial: usize) -> Result<Self> {
        let mut tokens = alloc_slots(initial.max(1))?;

        loop {
            let mut tokenizer = Tokenizer::new();
            match tokenizer.parse(source, &mut tokens) {
                Ok(len) => return Ok(Self { tokens, len }),
                Err(TokenizeError::Capacity) => {
                    let grown = alloc_slots(tokens.len() * 2)?;
                    // Old buffer is discarded only now that the new one
                    // exists; on allocation failure it was already dropped
                    // inside alloc_slots' error path.
                    tokens = grown;
                }
                Err(TokenizeError::Format { offset, reason }) => {
                    return Err(Error::format(offset, reason));
                }
            }
        }
    }

    /// The populated prefix of the slot buffer, in pre-order.
    pub fn tokens(&self) -> &[Token] {
        &self.tokens[..self.len]
    }

    /// Number of populated slots.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Total slots allocated, including unpopulated ones.
    pub fn capacity(&self) -> usize {
        self.tokens.len()
    }
}

/// Allocate a zeroed slot buffer of exactly `capacity` tokens, reporting
/// `ResourceExhausted` instead of aborting when the allocator refuses.
fn alloc_slots(capacity: usize) -> Result<Vec<Token>> {
    let mut slots = Vec::new();
    slots
        .try_reserve_exact(capacity)
        .map_err(|_| Error::ResourceExhausted)?;
    slots.resize(capacity, Token::default());
    Ok(slots)
}
