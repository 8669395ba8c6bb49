//! Soft-error sidecar.
//!
//! Per the error-handling design: only `ConfigurationError` and
//! `MalformedCapture` escape as hard errors (see [`crate::error`]); everything
//! else -- a missing parent, a missing body scope, a duplicate definition --
//! is absorbed by the builder to keep partial analysis productive on
//! incomplete sources. Each soft error is recorded here instead, as a
//! sidecar to `BuilderResult`, not part of it.

use crate::identifier::SymbolId;
use crate::location::Location;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// A child capture (method, parameter, property, enum member,
    /// decorator) whose parent was not registered when the capture arrived.
    MissingParent {
        child_name: String,
        location: Location,
    },
    /// `body_scope_for` could not resolve a distinct body scope for a
    /// callable; the containing scope was used instead.
    MissingBodyScope {
        callable_name: String,
        location: Location,
    },
    /// Two captures minted the same `SymbolId`; the first write won.
    DuplicateDefinition { symbol_id: SymbolId },
}

/// Append-only collector of soft errors encountered while building an index.
#[derive(Debug, Clone, Default)]
pub struct DiagnosticSink {
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticSink {
    pub fn new() -> Self {
        DiagnosticSink::default()
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        match &diagnostic {
            Diagnostic::MissingParent {
                child_name,
                location,
            } => {
                tracing::warn!(
                    child = %child_name,
                    file = %location.file_path,
                    line = location.start_line,
                    "capture arrived with no registered parent"
                );
            }
            Diagnostic::MissingBodyScope {
                callable_name,
                location,
            } => {
                tracing::warn!(
                    callable = %callable_name,
                    file = %location.file_path,
                    line = location.start_line,
                    "falling back to containing scope for callable body"
                );
            }
            Diagnostic::DuplicateDefinition { symbol_id } => {
                tracing::debug!(symbol_id = %symbol_id, "duplicate definition ignored (first write wins)");
            }
        }
        self.diagnostics.push(diagnostic);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.diagnostics
    }
}
