//! Identifier Mint: pure functions producing canonical [`SymbolId`]s.
//!
//! A `SymbolId` is an opaque string of the shape
//! `kind:file:start_line:start_col:end_line:end_col:name`. Collisions are
//! impossible because `location` is unique per AST node; two invocations with
//! identical inputs always produce byte-identical output.

use crate::location::Location;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The closed set of definition kinds this indexer recognises.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SymbolKind {
    Class,
    Interface,
    Enum,
    Namespace,
    Function,
    Method,
    Constructor,
    Parameter,
    Property,
    Variable,
    Constant,
    TypeAlias,
    Decorator,
    EnumMember,
    Import,
}

impl SymbolKind {
    /// The lowercase tag used inside a `SymbolId` and in serialised output.
    pub fn as_str(&self) -> &'static str {
        match self {
            SymbolKind::Class => "class",
            SymbolKind::Interface => "interface",
            SymbolKind::Enum => "enum",
            SymbolKind::Namespace => "namespace",
            SymbolKind::Function => "function",
            SymbolKind::Method => "method",
            SymbolKind::Constructor => "constructor",
            SymbolKind::Parameter => "parameter",
            SymbolKind::Property => "property",
            SymbolKind::Variable => "variable",
            SymbolKind::Constant => "constant",
            SymbolKind::TypeAlias => "type_alias",
            SymbolKind::Decorator => "decorator",
            SymbolKind::EnumMember => "enum_member",
            SymbolKind::Import => "import",
        }
    }
}

impl fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Opaque, order-comparable symbol identifier. Callers should treat this as
/// an interned string; it is never parsed back apart for anything other than
/// the `kind_of` check used by the builder's invariants.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SymbolId(String);

impl SymbolId {
    /// The `kind` component encoded at the front of this id.
    pub fn kind_tag(&self) -> &str {
        self.0.split(':').next().unwrap_or("")
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SymbolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Mint a canonical `SymbolId` from a `(kind, name, location)` triple.
///
/// The encoding is `kind:file:start_line:start_col:end_line:end_col:name`.
/// Two invocations with identical inputs produce byte-identical output; there
/// are no error conditions since names and locations are assumed valid by
/// construction.
pub fn symbol(kind: SymbolKind, name: &str, location: &Location) -> SymbolId {
    SymbolId(format!(
        "{}:{}:{}:{}:{}:{}:{}",
        kind.as_str(),
        location.file_path,
        location.start_line,
        location.start_column,
        location.end_line,
        location.end_column,
        name,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_inputs_mint_identical_ids() {
        let loc = Location::new("a.ts", 3, 1, 3, 10);
        let a = symbol(SymbolKind::Function, "foo", &loc);
        let b = symbol(SymbolKind::Function, "foo", &loc);
        assert_eq!(a, b);
    }

    #[test]
    fn kind_tag_round_trips() {
        let loc = Location::new("a.ts", 3, 1, 3, 10);
        let id = symbol(SymbolKind::Method, "bar", &loc);
        assert_eq!(id.kind_tag(), "method");
    }

    #[test]
    fn distinct_locations_mint_distinct_ids_even_with_same_name() {
        let loc_a = Location::new("a.ts", 1, 1, 1, 8);
        let loc_b = Location::new("a.ts", 5, 1, 5, 8);
        let a = symbol(SymbolKind::Function, "helper", &loc_a);
        let b = symbol(SymbolKind::Function, "helper", &loc_b);
        assert_ne!(a, b);
    }
}
