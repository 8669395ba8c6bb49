//! semindex: single-file semantic indexer
//!
//! Parses one source file (JavaScript, TypeScript, TSX, Python, or Rust),
//! runs its language adapter's capture query against the resulting tree,
//! and assembles a `SemanticIndex`: every top-level definition, the lexical
//! scope tree, and a name-to-symbol inverted index. Cross-file resolution,
//! call graphs, and other downstream passes are not built here.

pub mod error;
pub mod index;
pub mod language;

pub use error::{RootError, RootResult};
pub use index::{index_file, SemanticIndex, SymbolReference};
pub use language::Language;

// Definition-extraction core, re-exported so a caller building against
// `SemanticIndex`'s fields never has to add `semindex-core` as a direct
// dependency of its own.
pub use semindex_core::definition;
pub use semindex_core::scope::{Scope, ScopeId, ScopeKind};
pub use semindex_core::{Diagnostic, DiagnosticSink, SymbolId, SymbolKind};

// Language adapters, for callers that want to run an adapter's dispatch
// table or AST-shape helpers directly rather than through `index_file`.
pub use semindex_js as js;
pub use semindex_python as python;
pub use semindex_rust as rust;
