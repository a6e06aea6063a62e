use thiserror::Error;

/// Fatal errors surfaced by the library.
///
/// Running out of token slots is not represented here: that condition is
/// local to the token store, which recovers by doubling capacity and retrying
/// tokenization from scratch. It only becomes visible as `ResourceExhausted`
/// when the growth allocation itself cannot be satisfied.
#[derive(Debug, Error)]
pub enum Error {
    #[error("malformed JSON at byte {offset}: {reason}")]
    Format { offset: usize, reason: &'static str },

    #[error("i/o: {0}")]
    Io(#[from] std::io::Error),

    #[error("token storage growth failed: out of memory")]
    ResourceExhausted,
}

impl Error {
    pub(crate) fn format(offset: usize, reason: &'static str) -> Self {
        Error::Format { offset, reason }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
