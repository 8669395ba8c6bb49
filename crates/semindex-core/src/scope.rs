//! Scope Tree: the ordered collection of lexical scopes built from
//! scope-delimiter captures.
//!
//! Built in a single pass: scopes are inserted in order of ascending
//! `location.start`, ties broken by descending `location.end` (outer before
//! inner). A newly inserted scope's parent is the innermost already-inserted
//! scope that strictly contains it; the module scope has no parent.

use crate::location::Location;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for a scope within a file's scope tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ScopeId(pub u32);

impl ScopeId {
    pub fn new(id: u32) -> Self {
        ScopeId(id)
    }
}

impl fmt::Display for ScopeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "scope_{}", self.0)
    }
}

/// Kind of lexical scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScopeKind {
    Module,
    Function,
    Method,
    Constructor,
    Class,
    Interface,
    Enum,
    Namespace,
    Block,
    Impl,
}

/// The set of scope kinds that `child_scope_with_name` is willing to match
/// against (per §4.3: the lookup is only meaningful for named, nameable
/// constructs, never anonymous blocks).
const NAMEABLE_KINDS: &[ScopeKind] = &[
    ScopeKind::Function,
    ScopeKind::Method,
    ScopeKind::Constructor,
    ScopeKind::Class,
    ScopeKind::Interface,
    ScopeKind::Enum,
    ScopeKind::Namespace,
];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scope {
    pub id: ScopeId,
    pub kind: ScopeKind,
    pub name: Option<String>,
    pub location: Location,
    pub parent: Option<ScopeId>,
}

/// A scope awaiting insertion, before the tree assigns it an id and parent.
#[derive(Debug, Clone)]
pub struct ScopeSeed {
    pub kind: ScopeKind,
    pub name: Option<String>,
    pub location: Location,
}

impl ScopeSeed {
    pub fn new(kind: ScopeKind, location: Location) -> Self {
        ScopeSeed {
            kind,
            name: None,
            location,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

/// Error returned by [`ScopeTree::child_scope_with_name`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScopeLookupError {
    #[error("no nameable child scope named {name:?} under {parent}")]
    NotFound { parent: ScopeId, name: String },
}

/// The ordered forest of lexical scopes for one file, rooted at exactly one
/// `module` scope.
#[derive(Debug, Clone, Default)]
pub struct ScopeTree {
    scopes: Vec<Scope>,
    root: Option<ScopeId>,
}

impl ScopeTree {
    pub fn new() -> Self {
        ScopeTree::default()
    }

    /// Build a scope tree from an unordered collection of scope-delimiter
    /// captures. Sorts into insertion order internally, then attaches each
    /// scope to the innermost already-inserted scope that strictly contains
    /// it. If no seed is a `Module`-kind scope, a synthetic module scope
    /// spanning the widest seed is inserted as the root so that `root_scope`
    /// always resolves (§4.3 invariant: exactly one module scope per file).
    pub fn build(file_path: &str, mut seeds: Vec<ScopeSeed>) -> Self {
        seeds.sort_by(|a, b| a.location.scope_insertion_order(&b.location));

        let mut tree = ScopeTree::new();

        let has_module_scope = seeds.iter().any(|s| s.kind == ScopeKind::Module);
        if !has_module_scope {
            let widest = synthetic_module_span(file_path, &seeds);
            tree.insert(ScopeSeed::new(ScopeKind::Module, widest));
        }

        for seed in seeds {
            tree.insert(seed);
        }
        tree
    }

    /// Insert a single scope, attaching it to the innermost scope already in
    /// the tree that strictly contains it. Scopes MUST be inserted in the
    /// order produced by [`Location::scope_insertion_order`] for this to
    /// yield correct parenting.
    pub fn insert(&mut self, seed: ScopeSeed) -> ScopeId {
        let id = ScopeId::new(self.scopes.len() as u32);
        let parent = self.innermost_containing(&seed.location);

        self.scopes.push(Scope {
            id,
            kind: seed.kind,
            name: seed.name,
            location: seed.location,
            parent,
        });

        if parent.is_none() {
            self.root = Some(id);
        }
        id
    }

    fn innermost_containing(&self, location: &Location) -> Option<ScopeId> {
        self.scopes
            .iter()
            .rev()
            .find(|s| s.location.strictly_contains(location))
            .map(|s| s.id)
    }

    pub fn get(&self, id: ScopeId) -> Option<&Scope> {
        self.scopes.get(id.0 as usize)
    }

    pub fn root_scope(&self) -> ScopeId {
        self.root.unwrap_or(ScopeId::new(0))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Scope> {
        self.scopes.iter()
    }

    pub fn len(&self) -> usize {
        self.scopes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }

    /// Smallest scope containing `loc`. Returns the module scope if no inner
    /// scope matches.
    pub fn containing_scope(&self, loc: &Location) -> ScopeId {
        self.scopes
            .iter()
            .rev()
            .filter(|s| s.location.file_path == loc.file_path)
            .filter(|s| {
                s.location.start_key() <= loc.start_key() && s.location.end_key() >= loc.end_key()
            })
            .min_by(|a, b| {
                // Smallest span wins: narrower start/end distance.
                let a_width = span_width(&a.location);
                let b_width = span_width(&b.location);
                a_width.cmp(&b_width)
            })
            .map(|s| s.id)
            .unwrap_or_else(|| self.root_scope())
    }

    /// Unique child of `parent` whose `name` matches and whose kind is one of
    /// `{function, method, constructor, class, interface, enum, namespace}`.
    pub fn child_scope_with_name(
        &self,
        parent: ScopeId,
        name: &str,
    ) -> Result<ScopeId, ScopeLookupError> {
        self.scopes
            .iter()
            .find(|s| {
                s.parent == Some(parent)
                    && s.name.as_deref() == Some(name)
                    && NAMEABLE_KINDS.contains(&s.kind)
            })
            .map(|s| s.id)
            .ok_or_else(|| ScopeLookupError::NotFound {
                parent,
                name: name.to_string(),
            })
    }

    /// Returns the inner scope corresponding to the body of a
    /// callable/class definition at `location`, identified by `name`; falls
    /// back to the containing scope if no matching named child scope exists
    /// (the grammar offered no distinct body node).
    pub fn body_scope_for(&self, name: &str, location: &Location) -> ScopeId {
        let containing = self.containing_scope(location);
        self.child_scope_with_name(containing, name)
            .unwrap_or(containing)
    }
}

fn span_width(loc: &Location) -> (u32, u32) {
    let (sl, sc) = loc.start_key();
    let (el, ec) = loc.end_key();
    (el.saturating_sub(sl), ec.saturating_sub(sc))
}

fn synthetic_module_span(file_path: &str, seeds: &[ScopeSeed]) -> Location {
    let max_line = seeds
        .iter()
        .map(|s| s.location.end_line)
        .max()
        .unwrap_or(1);
    Location::new(file_path, 1, 1, max_line.max(1), 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loc(sl: u32, sc: u32, el: u32, ec: u32) -> Location {
        Location::new("a.py", sl, sc, el, ec)
    }

    #[test]
    fn module_scope_has_no_parent() {
        let tree = ScopeTree::build(
            "a.py",
            vec![ScopeSeed::new(ScopeKind::Module, loc(1, 1, 100, 1))],
        );
        let root = tree.root_scope();
        assert!(tree.get(root).unwrap().parent.is_none());
    }

    #[test]
    fn nested_function_attaches_to_class() {
        let seeds = vec![
            ScopeSeed::new(ScopeKind::Module, loc(1, 1, 100, 1)),
            ScopeSeed::new(ScopeKind::Class, loc(1, 1, 50, 1)).with_name("Box"),
            ScopeSeed::new(ScopeKind::Method, loc(2, 3, 10, 1)).with_name("make"),
        ];
        let tree = ScopeTree::build("a.py", seeds);
        let class_id = tree
            .iter()
            .find(|s| s.kind == ScopeKind::Class)
            .unwrap()
            .id;
        let method = tree.iter().find(|s| s.kind == ScopeKind::Method).unwrap();
        assert_eq!(method.parent, Some(class_id));
    }

    #[test]
    fn containing_scope_falls_back_to_module() {
        let tree = ScopeTree::build(
            "a.py",
            vec![ScopeSeed::new(ScopeKind::Module, loc(1, 1, 100, 1))],
        );
        let found = tree.containing_scope(&loc(5, 1, 5, 10));
        assert_eq!(found, tree.root_scope());
    }

    #[test]
    fn child_scope_with_name_is_not_found_for_missing_name() {
        let seeds = vec![
            ScopeSeed::new(ScopeKind::Module, loc(1, 1, 100, 1)),
            ScopeSeed::new(ScopeKind::Function, loc(2, 1, 5, 1)).with_name("foo"),
        ];
        let tree = ScopeTree::build("a.py", seeds);
        let root = tree.root_scope();
        assert!(tree.child_scope_with_name(root, "bar").is_err());
        assert!(tree.child_scope_with_name(root, "foo").is_ok());
    }

    #[test]
    fn synthesizes_module_scope_when_absent() {
        let seeds = vec![ScopeSeed::new(ScopeKind::Function, loc(2, 1, 5, 1)).with_name("foo")];
        let tree = ScopeTree::build("a.py", seeds);
        assert!(tree.iter().any(|s| s.kind == ScopeKind::Module));
    }
}
