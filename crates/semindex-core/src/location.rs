//! Source locations and the grammar-position normaliser.
//!
//! Per the data model: a [`Location`] is the tuple `(file_path, start_line,
//! start_column, end_line, end_column)`. Lines and `start_column` are
//! 1-indexed; `end_column` is exclusive. Two locations in the same file are
//! equal iff all five fields match.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// A half-open span of source text: `[start, end)` on columns, inclusive on
/// lines.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Location {
    pub file_path: String,
    pub start_line: u32,
    pub start_column: u32,
    pub end_line: u32,
    pub end_column: u32,
}

impl Location {
    pub fn new(
        file_path: impl Into<String>,
        start_line: u32,
        start_column: u32,
        end_line: u32,
        end_column: u32,
    ) -> Self {
        Location {
            file_path: file_path.into(),
            start_line,
            start_column,
            end_line,
            end_column,
        }
    }

    /// Sort key for the start boundary: `(line, column)`.
    pub fn start_key(&self) -> (u32, u32) {
        (self.start_line, self.start_column)
    }

    /// Sort key for the end boundary: `(line, column)`.
    pub fn end_key(&self) -> (u32, u32) {
        (self.end_line, self.end_column)
    }

    /// True if `self` strictly contains `other` (same or wider boundaries on
    /// both ends, with `self != other`). Used by the scope tree to find the
    /// innermost enclosing scope.
    pub fn strictly_contains(&self, other: &Location) -> bool {
        self.file_path == other.file_path
            && self.start_key() <= other.start_key()
            && self.end_key() >= other.end_key()
            && self != other
    }

    /// True if `self` contains the point `(line, column)`.
    pub fn contains_point(&self, line: u32, column: u32) -> bool {
        let point = (line, column);
        self.start_key() <= point && point < self.end_key()
    }

    /// Ordering used by the scope tree when inserting scopes: ascending
    /// start, ties broken by descending end (outer scopes sort before the
    /// inner scopes they contain).
    pub fn scope_insertion_order(&self, other: &Location) -> Ordering {
        self.start_key()
            .cmp(&other.start_key())
            .then_with(|| other.end_key().cmp(&self.end_key()))
    }
}

/// Converts zero-indexed tree-sitter grammar positions into the one-indexed,
/// half-open-on-columns [`Location`] convention used everywhere else in this
/// crate.
///
/// Adds 1 to the grammar's zero-indexed row to get `start_line`/`end_line`,
/// adds 1 to the start column, and copies the end column verbatim (tree-sitter
/// columns are already exclusive on the end, which matches our convention).
pub fn node_to_location(node: &tree_sitter::Node, file_path: impl Into<String>) -> Location {
    let start = node.start_position();
    let end = node.end_position();
    Location::new(
        file_path,
        start.row as u32 + 1,
        start.column as u32 + 1,
        end.row as u32 + 1,
        end.column as u32,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equality_requires_all_five_fields() {
        let a = Location::new("a.py", 1, 1, 1, 5);
        let b = Location::new("a.py", 1, 1, 1, 5);
        let c = Location::new("a.py", 1, 1, 1, 6);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn strictly_contains_outer_span() {
        let class_body = Location::new("a.py", 1, 1, 10, 1);
        let method = Location::new("a.py", 2, 3, 4, 10);
        assert!(class_body.strictly_contains(&method));
        assert!(!method.strictly_contains(&class_body));
        assert!(!class_body.strictly_contains(&class_body));
    }

    #[test]
    fn scope_insertion_order_puts_outer_before_inner() {
        let outer = Location::new("a.py", 1, 1, 10, 1);
        let inner = Location::new("a.py", 2, 1, 3, 1);
        assert_eq!(outer.scope_insertion_order(&inner), Ordering::Less);
    }

    #[test]
    fn contains_point_is_half_open_on_end_column() {
        let loc = Location::new("a.py", 1, 1, 1, 5);
        assert!(loc.contains_point(1, 4));
        assert!(!loc.contains_point(1, 5));
    }
}
