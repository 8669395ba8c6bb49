//! The Indexer: top-level orchestrator of the two-pass pipeline (§4.6).
//!
//! Given a selected [`LanguageAdapter`] and the capture stream produced by
//! running its query against a parsed tree, this module builds the
//! [`ScopeTree`] from the scope-delimiter captures, then routes every
//! remaining capture through the adapter's dispatch table in two passes --
//! aggregates first, then children and decorators -- so the Builder never
//! has to buffer orphans.
//!
//! Parsing the file and running the tree-sitter query are both external to
//! this module (spec.md §1); callers hand in an already-produced capture
//! stream.

use crate::adapter::{Capture, CapturePass, LanguageAdapter, ProcessingContext};
use crate::builder::{BuilderResult, DefinitionBuilder};
use crate::diagnostics::DiagnosticSink;
use crate::error::IndexResult;
use crate::scope::{ScopeSeed, ScopeTree};

/// The result of indexing one file's capture stream: the frozen definition
/// maps, the scope tree they reference, and the soft-error sidecar.
pub struct IndexOutcome {
    pub result: BuilderResult,
    pub scopes: ScopeTree,
    pub diagnostics: DiagnosticSink,
}

/// Build the file's [`ScopeTree`] from its scope-delimiter captures
/// (`scope.module`, `scope.class`, ...). Scope captures never reach a
/// dispatch table; the Indexer consumes them directly, before Pass A
/// begins.
fn build_scope_tree(adapter: &dyn LanguageAdapter, scope_captures: &[Capture], file_path: &str, source: &str) -> ScopeTree {
    let seeds = scope_captures
        .iter()
        .filter_map(|capture| {
            let kind = scope_kind_from_capture_name(&capture.name)?;
            let mut seed = ScopeSeed::new(kind, capture.location.clone());
            if let Some(name) = adapter.helpers().scope_name_for(capture.node, source) {
                seed = seed.with_name(name);
            }
            Some(seed)
        })
        .collect();
    ScopeTree::build(file_path, seeds)
}

fn scope_kind_from_capture_name(name: &str) -> Option<crate::scope::ScopeKind> {
    use crate::scope::ScopeKind;
    match name.strip_prefix("scope.")?.split('.').next()? {
        "module" => Some(ScopeKind::Module),
        "function" => Some(ScopeKind::Function),
        "method" => Some(ScopeKind::Method),
        "constructor" => Some(ScopeKind::Constructor),
        "class" => Some(ScopeKind::Class),
        "interface" => Some(ScopeKind::Interface),
        "enum" => Some(ScopeKind::Enum),
        "namespace" => Some(ScopeKind::Namespace),
        "block" => Some(ScopeKind::Block),
        "impl" => Some(ScopeKind::Impl),
        _ => None,
    }
}

/// Run the two-pass Indexer pipeline (§4.6) over one file's capture stream.
///
/// ```text
/// scopes   <- build_scope_tree(captures.where(kind=scope))
/// context  <- ProcessingContext { scopes, file_path, root_scope_id }
/// builder  <- DefinitionBuilder::new()
///
/// Pass A: aggregates only (classes, interfaces, enums, namespaces,
///         functions, variables, imports, type aliases) and no-ops
/// Pass B: children and decorators
///
/// return builder.build()
/// ```
///
/// A capture is ignored outright -- it never reaches either pass -- when the
/// adapter's dispatch table has no handler registered for its name: "captures
/// the adapter does not claim are not its concern" (§4.4). A capture the
/// dispatch table *does* claim but whose name fails to parse into a
/// recognised category/entity pair is a `MalformedCapture`, the one error
/// condition this function can return (the other, `UnsupportedLanguage`, is
/// the caller's responsibility -- it is a property of adapter *selection*,
/// which happens before this function is invoked).
pub fn index(adapter: &dyn LanguageAdapter, captures: Vec<Capture>, file_path: &str, source: &str) -> IndexResult<IndexOutcome> {
    let mut scope_captures = Vec::new();
    let mut definition_captures = Vec::new();
    for capture in captures {
        if capture.name.starts_with("scope.") {
            scope_captures.push(capture);
        } else {
            definition_captures.push(capture);
        }
    }

    let scopes = build_scope_tree(adapter, &scope_captures, file_path, source);
    let root_scope_id = scopes.root_scope();
    let context = ProcessingContext {
        scopes: &scopes,
        file_path,
        root_scope_id,
        source,
    };

    let mut pass_a = Vec::new();
    let mut pass_b = Vec::new();
    for capture in definition_captures {
        if !adapter.dispatch_table().contains_key(capture.name.as_str()) {
            continue;
        }
        match adapter.pass_of(&capture.name)? {
            CapturePass::Aggregate | CapturePass::NoOp => pass_a.push(capture),
            CapturePass::Child => pass_b.push(capture),
        }
    }

    let mut builder = DefinitionBuilder::new();
    for capture in &pass_a {
        adapter.dispatch(capture, &mut builder, &context);
    }
    for capture in &pass_b {
        adapter.dispatch(capture, &mut builder, &context);
    }

    let (result, diagnostics) = builder.build();
    Ok(IndexOutcome {
        result,
        scopes,
        diagnostics,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::{AstShapeHelpers, DispatchTable, MetadataExtractors, ReceiverKind, Visibility};
    use crate::definition::{Class, DefinitionHeader};
    use crate::identifier::{symbol, SymbolId, SymbolKind};
    use crate::location::{node_to_location, Location};
    use std::collections::HashMap;
    use tree_sitter::{Node, Parser};

    struct NullHelpers;
    impl AstShapeHelpers for NullHelpers {
        fn find_containing_class(&self, _: Node, _: &str, _: &str) -> Option<SymbolId> {
            None
        }
        fn find_containing_interface(&self, _: Node, _: &str, _: &str) -> Option<SymbolId> {
            None
        }
        fn find_containing_enum(&self, _: Node, _: &str, _: &str) -> Option<SymbolId> {
            None
        }
        fn find_containing_callable(&self, _: Node, _: &str, _: &str) -> Option<SymbolId> {
            None
        }
        fn extract_visibility(&self, _: Node, _: &str) -> Visibility {
            Visibility::FilePrivate
        }
        fn extract_generics(&self, _: Node, _: &str) -> Vec<String> {
            Vec::new()
        }
        fn extract_return_type(&self, _: Node, _: &str) -> Option<String> {
            None
        }
        fn extract_parameter_type(&self, _: Node, _: &str) -> Option<String> {
            None
        }
        fn extract_default_value(&self, _: Node, _: &str) -> Option<String> {
            None
        }
        fn extract_type_annotation(&self, _: Node, _: &str) -> Option<String> {
            None
        }
        fn extract_extends(&self, _: Node, _: &str) -> Vec<String> {
            Vec::new()
        }
        fn extract_import_path(&self, _: Node, _: &str) -> Option<String> {
            None
        }
        fn extract_import_alias(&self, _: Node, _: &str) -> Option<String> {
            None
        }
        fn is_async(&self, _: Node) -> bool {
            false
        }
        fn is_wildcard_import(&self, _: Node) -> bool {
            false
        }
        fn find_decorator_target(&self, _: Node, _: &str, _: &str) -> Option<SymbolId> {
            None
        }
    }
    impl MetadataExtractors for NullHelpers {
        fn extract_type_from_annotation(&self, _: Node, _: &str) -> Option<String> {
            None
        }
        fn extract_call_receiver(&self, _: Node, _: &str) -> Option<String> {
            None
        }
        fn extract_property_chain(&self, _: Node, _: &str) -> Vec<String> {
            Vec::new()
        }
        fn extract_receiver_info(&self, _: Node, _: &str) -> Option<ReceiverKind> {
            None
        }
        fn extract_assignment_parts(&self, _: Node, _: &str) -> Option<(String, String)> {
            None
        }
        fn extract_construct_target(&self, _: Node, _: &str) -> Option<String> {
            None
        }
        fn extract_type_arguments(&self, _: Node, _: &str) -> Vec<String> {
            Vec::new()
        }
        fn extract_is_optional_chain(&self, _: Node) -> bool {
            false
        }
        fn is_method_call(&self, _: Node) -> bool {
            false
        }
        fn extract_call_name(&self, _: Node, _: &str) -> Option<String> {
            None
        }
    }

    struct TinyAdapter {
        dispatch: DispatchTable,
        helpers: NullHelpers,
    }

    impl LanguageAdapter for TinyAdapter {
        fn dispatch_table(&self) -> &DispatchTable {
            &self.dispatch
        }
        fn helpers(&self) -> &dyn AstShapeHelpers {
            &self.helpers
        }
        fn metadata_extractors(&self) -> &dyn MetadataExtractors {
            &self.helpers
        }
    }

    fn parse(source: &str) -> tree_sitter::Tree {
        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_python::LANGUAGE.into())
            .unwrap();
        parser.parse(source, None).unwrap()
    }

    #[test]
    fn two_pass_pipeline_registers_class_then_method() {
        let source = "class Box:\n    def get(self):\n        pass\n";
        let tree = parse(source);
        let root = tree.root_node();
        let class_node = root.child(0).unwrap();
        let body = class_node.child_by_field_name("body").unwrap();
        let method_node = body.child(0).unwrap();

        let class_loc = node_to_location(&class_node, "a.py");
        let class_id_for_method_handler = symbol(SymbolKind::Class, "Box", &class_loc);

        let mut dispatch: DispatchTable = HashMap::new();
        dispatch.insert(
            "definition.class",
            Box::new(|capture: &Capture, builder: &mut DefinitionBuilder, _ctx: &ProcessingContext| {
                let location = capture.location.clone();
                let id = symbol(SymbolKind::Class, &capture.text, &location);
                let header = DefinitionHeader::new(id, &capture.text, location, crate::scope::ScopeId::new(0));
                builder.add_class(Class::new(header));
            }),
        );
        dispatch.insert(
            "definition.method",
            Box::new(move |capture: &Capture, builder: &mut DefinitionBuilder, _ctx: &ProcessingContext| {
                let location = capture.location.clone();
                let id = symbol(SymbolKind::Method, &capture.text, &location);
                let header = DefinitionHeader::new(id, &capture.text, location, crate::scope::ScopeId::new(0));
                let method = crate::definition::Method::new(header, crate::scope::ScopeId::new(0));
                builder.add_method_to_class(&class_id_for_method_handler, method);
            }),
        );

        let adapter = TinyAdapter {
            dispatch,
            helpers: NullHelpers,
        };

        let class_name_node = class_node.child_by_field_name("name").unwrap();
        let method_name_node = method_node.child_by_field_name("name").unwrap();
        let method_loc = node_to_location(&method_node, "a.py");

        // Drive pass-order directly: class capture first in the stream order
        // is irrelevant -- the two-pass split, not stream order, guarantees
        // the method attaches. We assert that by feeding method before class.
        let captures = vec![
            Capture {
                name: "scope.module".to_string(),
                node: root,
                text: String::new(),
                location: node_to_location(&root, "a.py"),
            },
            Capture {
                name: "definition.method".to_string(),
                node: method_node,
                text: method_name_node.utf8_text(source.as_bytes()).unwrap().to_string(),
                location: method_loc,
            },
            Capture {
                name: "definition.class".to_string(),
                node: class_node,
                text: class_name_node.utf8_text(source.as_bytes()).unwrap().to_string(),
                location: class_loc,
            },
        ];

        let outcome = index(&adapter, captures, "a.py", source).unwrap();
        assert_eq!(outcome.result.classes.len(), 1);
        let class = outcome.result.classes.values().next().unwrap();
        assert_eq!(class.methods.len(), 1);
        assert_eq!(class.methods[0].header.name, "get");
    }

    #[test]
    fn unclaimed_capture_is_silently_ignored() {
        let source = "x = 1\n";
        let tree = parse(source);
        let root = tree.root_node();
        let adapter = TinyAdapter {
            dispatch: HashMap::new(),
            helpers: NullHelpers,
        };
        let captures = vec![Capture {
            name: "definition.variable".to_string(),
            node: root,
            text: "x".to_string(),
            location: node_to_location(&root, "a.py"),
        }];
        let outcome = index(&adapter, captures, "a.py", source).unwrap();
        assert!(outcome.result.variables.is_empty());
        assert!(outcome.diagnostics.is_empty());
    }

    #[test]
    fn scope_captures_never_reach_dispatch_even_when_claimed() {
        let source = "x = 1\n";
        let tree = parse(source);
        let root = tree.root_node();
        let mut dispatch: DispatchTable = HashMap::new();
        dispatch.insert(
            "scope.module",
            Box::new(|_: &Capture, _: &mut DefinitionBuilder, _: &ProcessingContext| {
                panic!("scope captures must never be dispatched");
            }),
        );
        let adapter = TinyAdapter {
            dispatch,
            helpers: NullHelpers,
        };
        let captures = vec![Capture {
            name: "scope.module".to_string(),
            node: root,
            text: String::new(),
            location: node_to_location(&root, "a.py"),
        }];
        let outcome = index(&adapter, captures, "a.py", source).unwrap();
        assert_eq!(outcome.scopes.len(), 1);
    }
}
