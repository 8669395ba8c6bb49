//! Core infrastructure for semindex: the definition model, the incremental
//! builder, the scope tree, and the `LanguageAdapter` trait that every
//! per-language crate implements.
//!
//! This crate is the definition-extraction pipeline described by the
//! project's design notes: the polymorphic [`AnyDefinition`](definition::AnyDefinition)
//! model and its [`DefinitionBuilder`](builder::DefinitionBuilder), the
//! per-language capture dispatch seam ([`adapter`]), and the scope-resolution
//! helpers ([`scope`]) those handlers rely on. Parsing, query execution, CLI
//! plumbing, cross-file resolution, and the reference-extraction pipeline are
//! all external collaborators.

pub mod adapter;
pub mod builder;
pub mod definition;
pub mod diagnostics;
pub mod error;
pub mod identifier;
pub mod indexer;
pub mod location;
pub mod scope;

pub use adapter::{
    AstShapeHelpers, Capture, DispatchTable, Handler, LanguageAdapter, MetadataExtractors,
    ProcessingContext,
};
pub use builder::{BuilderResult, DefinitionBuilder};
pub use diagnostics::{Diagnostic, DiagnosticSink};
pub use error::{IndexError, IndexResult};
pub use identifier::{symbol, SymbolId, SymbolKind};
pub use indexer::{index, IndexOutcome};
pub use location::{node_to_location, Location};
pub use scope::{Scope, ScopeId, ScopeKind, ScopeLookupError, ScopeSeed, ScopeTree};
