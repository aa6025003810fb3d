use thiserror::Error;

use crate::store::StoreError;

/// Unified result type for the gridboard crate.
pub type Result<T> = std::result::Result<T, BoardError>;

/// Errors surfaced by the layout engine and its collaborators.
#[derive(Debug, Error)]
pub enum BoardError {
    #[error("invalid item dimensions {width}x{height}")]
    InvalidDimensions { width: u16, height: u16 },
    #[error("item id `{0}` already present in layout")]
    DuplicateIdentity(String),
    #[error("layout store error: {0}")]
    Store(#[from] StoreError),
}
