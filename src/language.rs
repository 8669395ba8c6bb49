//! Language selection: the `Language` enum, its per-grammar mapping, and
//! the file-extension inference convenience (§C).
//!
//! The core pipeline itself never infers a language from a path -- `language`
//! is an explicit input per spec.md §6. Extension inference lives here, one
//! layer up, for callers that only have a path.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One of the five grammar selections this crate supports. `Tsx` is a
/// distinct selection from `TypeScript` (JSX changes how `class`/`function`
/// bodies may embed markup) but shares `semindex-js`'s dispatch table and
/// helpers -- the definition shapes this indexer extracts are identical.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Language {
    JavaScript,
    TypeScript,
    Tsx,
    Python,
    Rust,
}

impl Language {
    /// Infer a language from a file extension (without the leading `.`).
    /// Returns `None` for anything this crate does not recognise; callers
    /// that already know the language should pass it explicitly instead.
    pub fn from_extension(extension: &str) -> Option<Language> {
        match extension {
            "js" | "jsx" | "mjs" | "cjs" => Some(Language::JavaScript),
            "ts" | "mts" | "cts" => Some(Language::TypeScript),
            "tsx" => Some(Language::Tsx),
            "py" | "pyi" => Some(Language::Python),
            "rs" => Some(Language::Rust),
            _ => None,
        }
    }

    /// Infer a language from a file path's extension.
    pub fn from_path(file_path: &str) -> Option<Language> {
        let extension = file_path.rsplit('.').next()?;
        if extension == file_path {
            return None;
        }
        Language::from_extension(extension)
    }

    /// `JavaScript` resolves to the TypeScript grammar, not
    /// `tree-sitter-javascript`: `semindex-js` ships one capture query for
    /// the whole JS/TS family, including node kinds (`interface_declaration`,
    /// `abstract_class_declaration`, ...) that only exist in the TypeScript
    /// grammar. TypeScript parses all valid JavaScript, so this is sound --
    /// see DESIGN.md.
    pub(crate) fn grammar(&self) -> tree_sitter::Language {
        match self {
            Language::JavaScript => tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
            Language::TypeScript => tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
            Language::Tsx => tree_sitter_typescript::LANGUAGE_TSX.into(),
            Language::Python => tree_sitter_python::LANGUAGE.into(),
            Language::Rust => tree_sitter_rust::LANGUAGE.into(),
        }
    }

    pub(crate) fn query_source(&self) -> &'static str {
        match self {
            Language::JavaScript | Language::TypeScript | Language::Tsx => {
                include_str!("../crates/semindex-js/src/queries/definitions.scm")
            }
            Language::Python => include_str!("../crates/semindex-python/src/queries/definitions.scm"),
            Language::Rust => include_str!("../crates/semindex-rust/src/queries/definitions.scm"),
        }
    }

    pub(crate) fn adapter(&self) -> Box<dyn semindex_core::LanguageAdapter> {
        match self {
            Language::JavaScript | Language::TypeScript | Language::Tsx => {
                Box::new(semindex_js::JsAdapter::default())
            }
            Language::Python => Box::new(semindex_python::PythonAdapter::default()),
            Language::Rust => Box::new(semindex_rust::RustAdapter::default()),
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Language::JavaScript => "javascript",
            Language::TypeScript => "typescript",
            Language::Tsx => "tsx",
            Language::Python => "python",
            Language::Rust => "rust",
        };
        write!(f, "{name}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn infers_typescript_family_from_extension() {
        assert_eq!(Language::from_extension("ts"), Some(Language::TypeScript));
        assert_eq!(Language::from_extension("mts"), Some(Language::TypeScript));
        assert_eq!(Language::from_extension("tsx"), Some(Language::Tsx));
    }

    #[test]
    fn infers_javascript_family_from_extension() {
        assert_eq!(Language::from_extension("js"), Some(Language::JavaScript));
        assert_eq!(Language::from_extension("mjs"), Some(Language::JavaScript));
        assert_eq!(Language::from_extension("cjs"), Some(Language::JavaScript));
    }

    #[test]
    fn unknown_extension_is_none() {
        assert_eq!(Language::from_extension("txt"), None);
    }

    #[test]
    fn from_path_reads_the_trailing_extension() {
        assert_eq!(Language::from_path("src/lib.rs"), Some(Language::Rust));
        assert_eq!(Language::from_path("noextension"), None);
    }
}
