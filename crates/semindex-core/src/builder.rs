//! Definition Builder: the append-only, order-independent accumulator of
//! partial definition state.
//!
//! The builder must not assume parents precede children within a pass --
//! that assumption lives at the pipeline level (the two-pass [`crate::indexer`]
//! contract), so the builder's own contract stays simple: registration calls
//! are idempotent (first-write-wins), and parent-attach calls are no-ops when
//! the parent is not yet registered.

use crate::definition::{
    Class, Constructor, DecoratorRecord, Enum, EnumMember, Function, Import, Interface, Method,
    Namespace, Parameter, Property, PropertySignature, TypeAlias, Variable,
};
use crate::diagnostics::{Diagnostic, DiagnosticSink};
use crate::identifier::SymbolId;
use indexmap::IndexMap;

/// Append-only accumulator of partial definition state, keyed by `SymbolId`.
#[derive(Debug, Default)]
pub struct DefinitionBuilder {
    classes: IndexMap<SymbolId, Class>,
    interfaces: IndexMap<SymbolId, Interface>,
    enums: IndexMap<SymbolId, Enum>,
    namespaces: IndexMap<SymbolId, Namespace>,
    functions: IndexMap<SymbolId, Function>,
    variables: IndexMap<SymbolId, Variable>,
    type_aliases: IndexMap<SymbolId, TypeAlias>,
    decorators: IndexMap<SymbolId, DecoratorRecord>,
    imports: IndexMap<SymbolId, Import>,
    diagnostics: DiagnosticSink,
}

macro_rules! add_aggregate {
    ($fn_name:ident, $map:ident, $ty:ty) => {
        /// Register an aggregate or terminal definition. Idempotent: if the
        /// id already exists, this call is a no-op (first-write-wins).
        pub fn $fn_name(&mut self, definition: $ty) {
            let id = definition.header.symbol_id.clone();
            if self.$map.contains_key(&id) {
                self.diagnostics
                    .push(Diagnostic::DuplicateDefinition { symbol_id: id });
                return;
            }
            self.$map.insert(id, definition);
        }
    };
}

impl DefinitionBuilder {
    pub fn new() -> Self {
        DefinitionBuilder::default()
    }

    add_aggregate!(add_class, classes, Class);
    add_aggregate!(add_interface, interfaces, Interface);
    add_aggregate!(add_enum, enums, Enum);
    add_aggregate!(add_namespace, namespaces, Namespace);
    add_aggregate!(add_function, functions, Function);
    add_aggregate!(add_variable, variables, Variable);
    add_aggregate!(add_type_alias, type_aliases, TypeAlias);
    add_aggregate!(add_import, imports, Import);

    /// Register a decorator as a free-standing definition. Decorators
    /// attached to a target via `add_decorator_to_target` are never also
    /// registered here (invariant I3); this exists only for completeness of
    /// the eight-map model and is rarely exercised by adapters, since every
    /// decorator capture has a target by construction.
    pub fn add_decorator(&mut self, decorator: DecoratorRecord) {
        let id = decorator.symbol_id.clone();
        self.decorators.entry(id).or_insert(decorator);
    }

    pub fn add_method_to_class(&mut self, class_id: &SymbolId, method: Method) {
        match self.classes.get_mut(class_id) {
            Some(class) => push_unique(&mut class.methods, method, |m| &m.header.symbol_id),
            None => self.missing_parent(&method.header.name, &method.header.location),
        }
    }

    pub fn add_constructor_to_class(&mut self, class_id: &SymbolId, constructor: Constructor) {
        match self.classes.get_mut(class_id) {
            Some(class) => push_unique(&mut class.constructors, constructor, |c| {
                &c.header.symbol_id
            }),
            None => self.missing_parent(&constructor.header.name, &constructor.header.location),
        }
    }

    pub fn add_property_to_class(&mut self, class_id: &SymbolId, property: Property) {
        match self.classes.get_mut(class_id) {
            Some(class) => push_unique(&mut class.properties, property, |p| &p.symbol_id),
            None => self.missing_parent(&property.name, &property.location),
        }
    }

    pub fn add_method_signature_to_interface(&mut self, interface_id: &SymbolId, method: Method) {
        match self.interfaces.get_mut(interface_id) {
            Some(interface) => push_unique(&mut interface.methods, method, |m| &m.header.symbol_id),
            None => self.missing_parent(&method.header.name, &method.header.location),
        }
    }

    pub fn add_property_signature_to_interface(
        &mut self,
        interface_id: &SymbolId,
        property: PropertySignature,
    ) {
        match self.interfaces.get_mut(interface_id) {
            Some(interface) => push_unique(&mut interface.properties, property, |p| &p.symbol_id),
            None => self.missing_parent(&property.name, &property.location),
        }
    }

    pub fn add_enum_member(&mut self, enum_id: &SymbolId, member: EnumMember) {
        match self.enums.get_mut(enum_id) {
            Some(e) => push_unique(&mut e.members, member, |m| &m.symbol_id),
            None => self.missing_parent(&member.name, &member.location),
        }
    }

    /// Attach a parameter to the callable it belongs to. Searches, in order:
    /// free functions, then methods within every class, then constructors
    /// within every class, then methods within every interface. The first
    /// matching container wins; a no-op (with a diagnostic) if none match.
    pub fn add_parameter_to_callable(&mut self, callable_id: &SymbolId, param: Parameter) {
        if let Some(function) = self.functions.get_mut(callable_id) {
            push_unique(&mut function.parameters, param, |p| &p.symbol_id);
            return;
        }
        for class in self.classes.values_mut() {
            if let Some(method) = class
                .methods
                .iter_mut()
                .find(|m| &m.header.symbol_id == callable_id)
            {
                push_unique(&mut method.parameters, param, |p| &p.symbol_id);
                return;
            }
        }
        for class in self.classes.values_mut() {
            if let Some(constructor) = class
                .constructors
                .iter_mut()
                .find(|c| &c.header.symbol_id == callable_id)
            {
                push_unique(&mut constructor.parameters, param, |p| &p.symbol_id);
                return;
            }
        }
        for interface in self.interfaces.values_mut() {
            if let Some(method) = interface
                .methods
                .iter_mut()
                .find(|m| &m.header.symbol_id == callable_id)
            {
                push_unique(&mut method.parameters, param, |p| &p.symbol_id);
                return;
            }
        }
        self.missing_parent(&param.name, &param.location);
    }

    /// Linear lookup required by languages (Rust) where a method's owning
    /// type is referenced by *name* in the `impl` header, not by `SymbolId`.
    pub fn find_class_by_name(&self, name: &str) -> Option<SymbolId> {
        self.classes
            .values()
            .find(|c| c.header.name == name)
            .map(|c| c.header.symbol_id.clone())
    }

    pub fn find_interface_by_name(&self, name: &str) -> Option<SymbolId> {
        self.interfaces
            .values()
            .find(|i| i.header.name == name)
            .map(|i| i.header.symbol_id.clone())
    }

    /// Resolve a decorator's target, trying in order: the class itself, a
    /// property within any class, a method within any class, a method within
    /// any interface, and finally a free function. First match wins.
    pub fn add_decorator_to_target(&mut self, target_id: &SymbolId, decorator: DecoratorRecord) {
        if let Some(class) = self.classes.get_mut(target_id) {
            push_unique(&mut class.decorators, decorator, |d| &d.symbol_id);
            return;
        }
        for class in self.classes.values_mut() {
            if let Some(property) = class
                .properties
                .iter_mut()
                .find(|p| &p.symbol_id == target_id)
            {
                push_unique(&mut property.decorators, decorator, |d| &d.symbol_id);
                return;
            }
        }
        for class in self.classes.values_mut() {
            if let Some(method) = class
                .methods
                .iter_mut()
                .find(|m| &m.header.symbol_id == target_id)
            {
                push_unique(&mut method.decorators, decorator, |d| &d.symbol_id);
                return;
            }
        }
        for interface in self.interfaces.values_mut() {
            if let Some(method) = interface
                .methods
                .iter_mut()
                .find(|m| &m.header.symbol_id == target_id)
            {
                push_unique(&mut method.decorators, decorator, |d| &d.symbol_id);
                return;
            }
        }
        if let Some(function) = self.functions.get_mut(target_id) {
            push_unique(&mut function.decorators, decorator, |d| &d.symbol_id);
            return;
        }
        self.missing_parent(&decorator.name, &decorator.location);
    }

    fn missing_parent(&mut self, child_name: &str, location: &crate::location::Location) {
        self.diagnostics.push(Diagnostic::MissingParent {
            child_name: child_name.to_string(),
            location: location.clone(),
        });
    }

    /// Finalise the builder, freezing every map, and return the result
    /// alongside the sidecar diagnostics stream.
    pub fn build(self) -> (BuilderResult, DiagnosticSink) {
        (
            BuilderResult {
                functions: self.functions,
                classes: self.classes,
                variables: self.variables,
                interfaces: self.interfaces,
                enums: self.enums,
                namespaces: self.namespaces,
                type_aliases: self.type_aliases,
                decorators: self.decorators,
                imports: self.imports,
            },
            self.diagnostics,
        )
    }
}

fn push_unique<T>(list: &mut Vec<T>, item: T, id_of: impl Fn(&T) -> &SymbolId) {
    if !list.iter().any(|existing| id_of(existing) == id_of(&item)) {
        list.push(item);
    }
}

/// The frozen, read-only result of a finished [`DefinitionBuilder`]. Nine
/// keyed-by-`SymbolId` maps, one per top-level kind.
#[derive(Debug, Default)]
pub struct BuilderResult {
    pub functions: IndexMap<SymbolId, Function>,
    pub classes: IndexMap<SymbolId, Class>,
    pub variables: IndexMap<SymbolId, Variable>,
    pub interfaces: IndexMap<SymbolId, Interface>,
    pub enums: IndexMap<SymbolId, Enum>,
    pub namespaces: IndexMap<SymbolId, Namespace>,
    pub type_aliases: IndexMap<SymbolId, TypeAlias>,
    pub decorators: IndexMap<SymbolId, DecoratorRecord>,
    pub imports: IndexMap<SymbolId, Import>,
}

impl BuilderResult {
    /// `(symbol_id, name, is_exported)` for every top-level definition,
    /// in per-map insertion order. Used by the indexer to build
    /// `symbols_by_name` without cloning full definition bodies.
    pub fn name_index_entries(&self) -> Vec<(&SymbolId, &str)> {
        let mut entries = Vec::new();
        entries.extend(self.functions.iter().map(|(id, d)| (id, d.header.name.as_str())));
        entries.extend(self.classes.iter().map(|(id, d)| (id, d.header.name.as_str())));
        entries.extend(self.variables.iter().map(|(id, d)| (id, d.header.name.as_str())));
        entries.extend(self.interfaces.iter().map(|(id, d)| (id, d.header.name.as_str())));
        entries.extend(self.enums.iter().map(|(id, d)| (id, d.header.name.as_str())));
        entries.extend(self.namespaces.iter().map(|(id, d)| (id, d.header.name.as_str())));
        entries.extend(self.type_aliases.iter().map(|(id, d)| (id, d.header.name.as_str())));
        entries.extend(self.decorators.iter().map(|(id, d)| (id, d.name.as_str())));
        entries.extend(self.imports.iter().map(|(id, d)| (id, d.header.name.as_str())));
        entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definition::{DefinitionHeader, ExportKind, ExportMetadata};
    use crate::identifier::{symbol, SymbolKind};
    use crate::location::Location;
    use crate::scope::ScopeId;

    fn loc(start: u32) -> Location {
        Location::new("a.ts", start, 1, start, 10)
    }

    fn class_header(name: &str, start: u32) -> DefinitionHeader {
        DefinitionHeader::new(
            symbol(SymbolKind::Class, name, &loc(start)),
            name,
            loc(start),
            ScopeId::new(0),
        )
    }

    #[test]
    fn add_class_is_idempotent_first_write_wins() {
        let mut builder = DefinitionBuilder::new();
        let header = class_header("User", 1);
        let id = header.symbol_id.clone();
        builder.add_class(Class::new(header.clone()).with_abstract(false));
        builder.add_class(Class::new(header).with_abstract(true));
        let (result, _) = builder.build();
        assert!(!result.classes.get(&id).unwrap().abstract_);
    }

    #[test]
    fn method_orphaned_before_class_registration_is_dropped() {
        let mut builder = DefinitionBuilder::new();
        let class_id = symbol(SymbolKind::Class, "Orphaned", &loc(1));
        let method_header = DefinitionHeader::new(
            symbol(SymbolKind::Method, "save", &loc(2)),
            "save",
            loc(2),
            ScopeId::new(0),
        );
        builder.add_method_to_class(&class_id, Method::new(method_header, ScopeId::new(1)));
        let (result, diagnostics) = builder.build();
        assert!(result.classes.is_empty());
        assert_eq!(diagnostics.len(), 1);
    }

    #[test]
    fn method_attaches_exactly_once_even_with_duplicate_capture() {
        let mut builder = DefinitionBuilder::new();
        let class_header = class_header("User", 1);
        let class_id = class_header.symbol_id.clone();
        builder.add_class(Class::new(class_header));

        let method_header = DefinitionHeader::new(
            symbol(SymbolKind::Method, "save", &loc(2)),
            "save",
            loc(2),
            ScopeId::new(0),
        );
        builder.add_method_to_class(
            &class_id,
            Method::new(method_header.clone(), ScopeId::new(1)),
        );
        builder.add_method_to_class(&class_id, Method::new(method_header, ScopeId::new(1)));

        let (result, _) = builder.build();
        assert_eq!(result.classes.get(&class_id).unwrap().methods.len(), 1);
    }

    #[test]
    fn parameter_attaches_to_method_before_constructor_search() {
        let mut builder = DefinitionBuilder::new();
        let class_header = class_header("Box", 1);
        let class_id = class_header.symbol_id.clone();
        builder.add_class(Class::new(class_header));

        let method_header = DefinitionHeader::new(
            symbol(SymbolKind::Method, "get", &loc(2)),
            "get",
            loc(2),
            ScopeId::new(0),
        );
        let method_id = method_header.symbol_id.clone();
        builder.add_method_to_class(&class_id, Method::new(method_header, ScopeId::new(1)));

        let param = Parameter::new(
            symbol(SymbolKind::Parameter, "id", &loc(3)),
            "id",
            loc(3),
        );
        builder.add_parameter_to_callable(&method_id, param);

        let (result, _) = builder.build();
        let class = result.classes.get(&class_id).unwrap();
        assert_eq!(class.methods[0].parameters.len(), 1);
    }

    #[test]
    fn decorator_attaches_to_class_before_searching_members() {
        let mut builder = DefinitionBuilder::new();
        let class_header = class_header("User", 1);
        let class_id = class_header.symbol_id.clone();
        builder.add_class(Class::new(class_header));

        let decorator = DecoratorRecord::new(
            symbol(SymbolKind::Decorator, "Entity", &loc(0)),
            "Entity",
            loc(0),
        );
        builder.add_decorator_to_target(&class_id, decorator);

        let (result, _) = builder.build();
        assert_eq!(result.classes.get(&class_id).unwrap().decorators.len(), 1);
    }

    #[test]
    fn find_class_by_name_supports_rust_impl_header_lookup() {
        let mut builder = DefinitionBuilder::new();
        builder.add_class(Class::new(class_header("Point", 1)));
        assert!(builder.find_class_by_name("Point").is_some());
        assert!(builder.find_class_by_name("Missing").is_none());
    }

    #[test]
    fn export_metadata_round_trips_through_build() {
        let mut builder = DefinitionBuilder::new();
        let header = class_header("Widget", 1)
            .with_export_metadata(ExportMetadata::new(ExportKind::Named));
        builder.add_class(Class::new(header));
        let (result, _) = builder.build();
        assert!(result.classes.values().next().unwrap().header.is_exported);
    }
}
