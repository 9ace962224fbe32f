//! Error types for the typesetting pipeline

use thiserror::Error;

/// Errors surfaced by the typesetter
#[derive(Error, Debug)]
pub enum TypesetError {
    #[error(
        "pagination stopped after {cap} iterations with {unplaced_blocks} block(s) unplaced \
         ({placed_pages} page(s) produced)"
    )]
    IterationCapExceeded {
        placed_pages: usize,
        unplaced_blocks: usize,
        cap: usize,
    },

    #[error("unknown page size class: {0}")]
    UnknownPageSize(String),

    #[error("unknown theme: {0}")]
    UnknownTheme(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("unknown chapter id: {0}")]
    UnknownChapter(u64),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, TypesetError>;
