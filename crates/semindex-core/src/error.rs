//! Hard error taxonomy.
//!
//! Per §7 only two conditions escape the pipeline as errors: an unsupported
//! language (no adapter registered) and a capture whose dot-delimited name
//! falls outside the enumerated category/entity sets an adapter recognises.
//! Everything else -- missing parent, missing body scope, duplicate
//! definition -- is a soft error, recorded on [`crate::diagnostics::DiagnosticSink`]
//! instead of propagated here.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum IndexError {
    /// No `LanguageAdapter` is registered for the requested language.
    #[error("unsupported language: {0}")]
    UnsupportedLanguage(String),

    /// A capture's name does not parse into a recognised category/entity
    /// pair, or parses into one the adapter does not claim. This indicates
    /// a mismatch between the adapter's query file and its dispatch table,
    /// not a malformed source file.
    #[error("malformed capture: {0}")]
    MalformedCapture(String),
}

pub type IndexResult<T> = Result<T, IndexError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsupported_language_message_names_the_language() {
        let err = IndexError::UnsupportedLanguage("cobol".to_string());
        assert_eq!(err.to_string(), "unsupported language: cobol");
    }

    #[test]
    fn malformed_capture_message_names_the_capture() {
        let err = IndexError::MalformedCapture("definition.bogus".to_string());
        assert_eq!(err.to_string(), "malformed capture: definition.bogus");
    }
}
