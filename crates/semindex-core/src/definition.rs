//! The polymorphic Definition model.
//!
//! Per the design notes, the source uses structural subtyping with
//! discriminant fields; a systems-language implementation encodes
//! `AnyDefinition` as a tagged union (sum type) with per-variant records.
//! Operations that "look through" definitions (name lookup, export
//! filtering) use exhaustive pattern matching on [`AnyDefinition`] -- never
//! open-world dispatch.
//!
//! Aggregates own their children by value (methods, parameters, properties).
//! Cross-references (`extends`, `implements`, `decorators` referencing other
//! `SymbolId`s) are by-id only; there are no back-pointers and no cycles.

use crate::identifier::SymbolId;
use crate::location::Location;
use crate::scope::ScopeId;
use serde::{Deserialize, Serialize};

/// A name referring to another symbol, used where the referent's `SymbolId`
/// is not itself resolvable from within a single file (e.g. a base class
/// named in an `extends` clause).
pub type SymbolName = String;

/// Access modifier on a class member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessModifier {
    Public,
    Private,
    Protected,
}

/// How a top-level definition is exported, when it is exported at all. This
/// is attached to a header's `export_metadata` only when `is_exported` is
/// true and the language has more to say than a bare boolean.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportMetadata {
    pub kind: ExportKind,
    /// For a re-export, the local name under which the source symbol is
    /// exposed if different from its original name (JS/TS `export { a as
    /// b }`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exported_as: Option<String>,
}

impl ExportMetadata {
    pub fn new(kind: ExportKind) -> Self {
        ExportMetadata {
            kind,
            exported_as: None,
        }
    }

    pub fn with_exported_as(mut self, name: impl Into<String>) -> Self {
        self.exported_as = Some(name.into());
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportKind {
    Named,
    Default,
    Namespace,
    ReExport,
}

/// Common fields shared by every definition kind.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefinitionHeader {
    pub symbol_id: SymbolId,
    pub name: String,
    pub location: Location,
    pub defining_scope_id: ScopeId,
    pub is_exported: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub export_metadata: Option<ExportMetadata>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub docstring: Option<String>,
}

impl DefinitionHeader {
    pub fn new(symbol_id: SymbolId, name: impl Into<String>, location: Location, defining_scope_id: ScopeId) -> Self {
        DefinitionHeader {
            symbol_id,
            name: name.into(),
            location,
            defining_scope_id,
            is_exported: false,
            export_metadata: None,
            docstring: None,
        }
    }

    pub fn with_exported(mut self, is_exported: bool) -> Self {
        self.is_exported = is_exported;
        self
    }

    pub fn with_export_metadata(mut self, metadata: ExportMetadata) -> Self {
        self.export_metadata = Some(metadata);
        self.is_exported = true;
        self
    }

    pub fn with_docstring(mut self, docstring: impl Into<String>) -> Self {
        self.docstring = Some(docstring.into());
        self
    }
}

/// A decorator application (`@Entity`, `@app.route(...)`). Attached to a
/// target's `decorators` list; never listed as a top-level definition once
/// attached (invariant I3).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecoratorRecord {
    pub symbol_id: SymbolId,
    pub name: String,
    pub location: Location,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arguments: Option<Vec<String>>,
}

impl DecoratorRecord {
    pub fn new(symbol_id: SymbolId, name: impl Into<String>, location: Location) -> Self {
        DecoratorRecord {
            symbol_id,
            name: name.into(),
            location,
            arguments: None,
        }
    }

    pub fn with_arguments(mut self, arguments: Vec<String>) -> Self {
        self.arguments = Some(arguments);
        self
    }
}

/// A parameter in a function/method/constructor signature.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Parameter {
    pub symbol_id: SymbolId,
    pub name: String,
    pub location: Location,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub r#type: Option<SymbolName>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
    pub optional: bool,
    pub is_parameter_property: bool,
}

impl Parameter {
    pub fn new(symbol_id: SymbolId, name: impl Into<String>, location: Location) -> Self {
        Parameter {
            symbol_id,
            name: name.into(),
            location,
            r#type: None,
            default_value: None,
            optional: false,
            is_parameter_property: false,
        }
    }

    pub fn with_type(mut self, ty: impl Into<String>) -> Self {
        self.r#type = Some(ty.into());
        self
    }

    pub fn with_default_value(mut self, value: impl Into<String>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    pub fn with_optional(mut self, optional: bool) -> Self {
        self.optional = optional;
        self
    }

    pub fn with_parameter_property(mut self, is_parameter_property: bool) -> Self {
        self.is_parameter_property = is_parameter_property;
        self
    }
}

/// A concrete property declaration on a class.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Property {
    pub symbol_id: SymbolId,
    pub name: String,
    pub location: Location,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub r#type: Option<SymbolName>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub initial_value: Option<String>,
    pub readonly: bool,
    pub static_: bool,
    pub optional: bool,
    pub abstract_: bool,
    pub decorators: Vec<DecoratorRecord>,
}

impl Property {
    pub fn new(symbol_id: SymbolId, name: impl Into<String>, location: Location) -> Self {
        Property {
            symbol_id,
            name: name.into(),
            location,
            r#type: None,
            initial_value: None,
            readonly: false,
            static_: false,
            optional: false,
            abstract_: false,
            decorators: Vec::new(),
        }
    }

    pub fn with_type(mut self, ty: impl Into<String>) -> Self {
        self.r#type = Some(ty.into());
        self
    }

    pub fn with_initial_value(mut self, value: impl Into<String>) -> Self {
        self.initial_value = Some(value.into());
        self
    }

    pub fn with_readonly(mut self, readonly: bool) -> Self {
        self.readonly = readonly;
        self
    }

    pub fn with_static(mut self, static_: bool) -> Self {
        self.static_ = static_;
        self
    }

    pub fn with_optional(mut self, optional: bool) -> Self {
        self.optional = optional;
        self
    }

    pub fn with_abstract(mut self, abstract_: bool) -> Self {
        self.abstract_ = abstract_;
        self
    }
}

/// An interface/protocol's property signature -- same shape as [`Property`]
/// but never carries an initial value (interfaces declare shape, not state).
pub type PropertySignature = Property;

/// A free function or a class/interface method (the latter via [`Method`]).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Function {
    pub header: DefinitionHeader,
    pub generics: Vec<SymbolName>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_type: Option<SymbolName>,
    pub parameters: Vec<Parameter>,
    pub decorators: Vec<DecoratorRecord>,
    pub body_scope_id: ScopeId,
}

impl Function {
    pub fn new(header: DefinitionHeader, body_scope_id: ScopeId) -> Self {
        Function {
            header,
            generics: Vec::new(),
            return_type: None,
            parameters: Vec::new(),
            decorators: Vec::new(),
            body_scope_id,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Method {
    pub header: DefinitionHeader,
    pub generics: Vec<SymbolName>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_type: Option<SymbolName>,
    pub parameters: Vec<Parameter>,
    pub decorators: Vec<DecoratorRecord>,
    pub body_scope_id: ScopeId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_modifier: Option<AccessModifier>,
    pub static_: bool,
    pub async_: bool,
    pub abstract_: bool,
}

impl Method {
    pub fn new(header: DefinitionHeader, body_scope_id: ScopeId) -> Self {
        Method {
            header,
            generics: Vec::new(),
            return_type: None,
            parameters: Vec::new(),
            decorators: Vec::new(),
            body_scope_id,
            access_modifier: None,
            static_: false,
            async_: false,
            abstract_: false,
        }
    }

    pub fn with_access_modifier(mut self, access_modifier: AccessModifier) -> Self {
        self.access_modifier = Some(access_modifier);
        self
    }

    pub fn with_static(mut self, static_: bool) -> Self {
        self.static_ = static_;
        self
    }

    pub fn with_async(mut self, async_: bool) -> Self {
        self.async_ = async_;
        self
    }

    pub fn with_abstract(mut self, abstract_: bool) -> Self {
        self.abstract_ = abstract_;
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Constructor {
    pub header: DefinitionHeader,
    pub parameters: Vec<Parameter>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_modifier: Option<AccessModifier>,
    pub decorators: Vec<DecoratorRecord>,
    pub body_scope_id: ScopeId,
}

impl Constructor {
    pub fn new(header: DefinitionHeader, body_scope_id: ScopeId) -> Self {
        Constructor {
            header,
            parameters: Vec::new(),
            access_modifier: None,
            decorators: Vec::new(),
            body_scope_id,
        }
    }

    pub fn with_access_modifier(mut self, access_modifier: AccessModifier) -> Self {
        self.access_modifier = Some(access_modifier);
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Class {
    pub header: DefinitionHeader,
    pub extends: Vec<SymbolName>,
    pub implements: Vec<SymbolName>,
    pub abstract_: bool,
    pub generics: Vec<SymbolName>,
    pub methods: Vec<Method>,
    pub constructors: Vec<Constructor>,
    pub properties: Vec<Property>,
    pub decorators: Vec<DecoratorRecord>,
}

impl Class {
    pub fn new(header: DefinitionHeader) -> Self {
        Class {
            header,
            extends: Vec::new(),
            implements: Vec::new(),
            abstract_: false,
            generics: Vec::new(),
            methods: Vec::new(),
            constructors: Vec::new(),
            properties: Vec::new(),
            decorators: Vec::new(),
        }
    }

    pub fn with_abstract(mut self, abstract_: bool) -> Self {
        self.abstract_ = abstract_;
        self
    }

    pub fn with_extends(mut self, extends: Vec<SymbolName>) -> Self {
        self.extends = extends;
        self
    }

    pub fn with_implements(mut self, implements: Vec<SymbolName>) -> Self {
        self.implements = implements;
        self
    }

    pub fn with_generics(mut self, generics: Vec<SymbolName>) -> Self {
        self.generics = generics;
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Interface {
    pub header: DefinitionHeader,
    pub extends: Vec<SymbolName>,
    pub generics: Vec<SymbolName>,
    pub methods: Vec<Method>,
    pub properties: Vec<PropertySignature>,
}

impl Interface {
    pub fn new(header: DefinitionHeader) -> Self {
        Interface {
            header,
            extends: Vec::new(),
            generics: Vec::new(),
            methods: Vec::new(),
            properties: Vec::new(),
        }
    }

    pub fn with_extends(mut self, extends: Vec<SymbolName>) -> Self {
        self.extends = extends;
        self
    }

    pub fn with_generics(mut self, generics: Vec<SymbolName>) -> Self {
        self.generics = generics;
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnumMember {
    pub symbol_id: SymbolId,
    pub name: String,
    pub location: Location,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<EnumMemberValue>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EnumMemberValue {
    String(String),
    Number(f64),
}

impl EnumMember {
    pub fn new(symbol_id: SymbolId, name: impl Into<String>, location: Location) -> Self {
        EnumMember {
            symbol_id,
            name: name.into(),
            location,
            value: None,
        }
    }

    pub fn with_value(mut self, value: EnumMemberValue) -> Self {
        self.value = Some(value);
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enum {
    pub header: DefinitionHeader,
    pub is_const: bool,
    pub generics: Vec<SymbolName>,
    pub members: Vec<EnumMember>,
    /// Populated only for languages where enums can carry real methods
    /// (e.g. a Python `Enum` subclass with a method body). Seldom populated
    /// elsewhere, but the field is always present (Q3).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub methods: Option<Vec<Method>>,
}

impl Enum {
    pub fn new(header: DefinitionHeader) -> Self {
        Enum {
            header,
            is_const: false,
            generics: Vec::new(),
            members: Vec::new(),
            methods: None,
        }
    }

    pub fn with_const(mut self, is_const: bool) -> Self {
        self.is_const = is_const;
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Namespace {
    pub header: DefinitionHeader,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exported_symbols: Option<Vec<SymbolId>>,
}

impl Namespace {
    pub fn new(header: DefinitionHeader) -> Self {
        Namespace {
            header,
            exported_symbols: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VariableKind {
    Variable,
    Constant,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Variable {
    pub header: DefinitionHeader,
    pub kind: VariableKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub r#type: Option<SymbolName>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub initial_value: Option<String>,
}

impl Variable {
    pub fn new(header: DefinitionHeader, kind: VariableKind) -> Self {
        Variable {
            header,
            kind,
            r#type: None,
            initial_value: None,
        }
    }

    pub fn with_type(mut self, ty: impl Into<String>) -> Self {
        self.r#type = Some(ty.into());
        self
    }

    pub fn with_initial_value(mut self, value: impl Into<String>) -> Self {
        self.initial_value = Some(value.into());
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypeAlias {
    pub header: DefinitionHeader,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub type_expression: Option<String>,
    pub generics: Vec<SymbolName>,
}

impl TypeAlias {
    pub fn new(header: DefinitionHeader) -> Self {
        TypeAlias {
            header,
            type_expression: None,
            generics: Vec::new(),
        }
    }

    pub fn with_type_expression(mut self, expr: impl Into<String>) -> Self {
        self.type_expression = Some(expr.into());
        self
    }

    pub fn with_generics(mut self, generics: Vec<SymbolName>) -> Self {
        self.generics = generics;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImportKind {
    Named,
    Default,
    Namespace,
}

pub type ModulePath = String;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Import {
    pub header: DefinitionHeader,
    pub import_path: ModulePath,
    pub import_kind: ImportKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_name: Option<String>,
    pub is_type_only: bool,
}

impl Import {
    pub fn new(
        header: DefinitionHeader,
        import_path: impl Into<String>,
        import_kind: ImportKind,
    ) -> Self {
        Import {
            header,
            import_path: import_path.into(),
            import_kind,
            original_name: None,
            is_type_only: false,
        }
    }

    pub fn with_original_name(mut self, name: impl Into<String>) -> Self {
        self.original_name = Some(name.into());
        self
    }

    pub fn with_type_only(mut self, is_type_only: bool) -> Self {
        self.is_type_only = is_type_only;
        self
    }
}

/// The tagged union over every top-level definition kind. Used by operations
/// that look through definitions uniformly (name index construction, export
/// filtering) via exhaustive matching.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AnyDefinition {
    Class(Class),
    Interface(Interface),
    Enum(Enum),
    Namespace(Namespace),
    Function(Function),
    Variable(Variable),
    TypeAlias(TypeAlias),
    Decorator(DecoratorRecord),
    Import(Import),
}

impl AnyDefinition {
    pub fn symbol_id(&self) -> &SymbolId {
        match self {
            AnyDefinition::Class(d) => &d.header.symbol_id,
            AnyDefinition::Interface(d) => &d.header.symbol_id,
            AnyDefinition::Enum(d) => &d.header.symbol_id,
            AnyDefinition::Namespace(d) => &d.header.symbol_id,
            AnyDefinition::Function(d) => &d.header.symbol_id,
            AnyDefinition::Variable(d) => &d.header.symbol_id,
            AnyDefinition::TypeAlias(d) => &d.header.symbol_id,
            AnyDefinition::Decorator(d) => &d.symbol_id,
            AnyDefinition::Import(d) => &d.header.symbol_id,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            AnyDefinition::Class(d) => &d.header.name,
            AnyDefinition::Interface(d) => &d.header.name,
            AnyDefinition::Enum(d) => &d.header.name,
            AnyDefinition::Namespace(d) => &d.header.name,
            AnyDefinition::Function(d) => &d.header.name,
            AnyDefinition::Variable(d) => &d.header.name,
            AnyDefinition::TypeAlias(d) => &d.header.name,
            AnyDefinition::Decorator(d) => &d.name,
            AnyDefinition::Import(d) => &d.header.name,
        }
    }

    pub fn is_exported(&self) -> bool {
        match self {
            AnyDefinition::Class(d) => d.header.is_exported,
            AnyDefinition::Interface(d) => d.header.is_exported,
            AnyDefinition::Enum(d) => d.header.is_exported,
            AnyDefinition::Namespace(d) => d.header.is_exported,
            AnyDefinition::Function(d) => d.header.is_exported,
            AnyDefinition::Variable(d) => d.header.is_exported,
            AnyDefinition::TypeAlias(d) => d.header.is_exported,
            AnyDefinition::Decorator(_) => false,
            AnyDefinition::Import(d) => d.header.is_exported,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identifier::{symbol, SymbolKind};

    fn loc() -> Location {
        Location::new("a.ts", 1, 1, 1, 10)
    }

    #[test]
    fn any_definition_name_matches_header() {
        let header = DefinitionHeader::new(
            symbol(SymbolKind::Function, "helper", &loc()),
            "helper",
            loc(),
            ScopeId::new(0),
        );
        let def = AnyDefinition::Function(Function::new(header, ScopeId::new(1)));
        assert_eq!(def.name(), "helper");
        assert!(!def.is_exported());
    }

    #[test]
    fn export_metadata_implies_exported() {
        let header = DefinitionHeader::new(
            symbol(SymbolKind::Import, "Button", &loc()),
            "Button",
            loc(),
            ScopeId::new(0),
        )
        .with_export_metadata(ExportMetadata::new(ExportKind::ReExport));
        assert!(header.is_exported);
    }
}
