//! Crate-boundary error taxonomy (supplements `semindex_core::error`).
//!
//! `semindex-core`'s `IndexError` covers the two conditions the definition
//! pipeline itself can fail on. This crate adds the two conditions that can
//! only arise one layer up, before the pipeline ever runs: an extension this
//! crate does not map to a `Language`, and a `.scm` query file that fails to
//! compile (a programmer error in an adapter, caught in CI, never a property
//! of the file being indexed).

use crate::language::Language;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RootError {
    #[error("no Language mapped to file extension: {0:?}")]
    UnsupportedExtension(String),

    #[error("failed to compile {language} capture query")]
    QueryCompilation {
        language: Language,
        #[source]
        source: tree_sitter::QueryError,
    },

    #[error("tree-sitter failed to parse {file_path}")]
    ParseFailed { file_path: String },

    #[error(transparent)]
    Index(#[from] semindex_core::IndexError),
}

pub type RootResult<T> = Result<T, RootError>;
