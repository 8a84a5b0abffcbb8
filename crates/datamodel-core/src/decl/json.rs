//! JSON declaration documents.
//!
//! Two layers:
//! - **Deserialization layer**: `Raw*` structs mapping 1:1 to the document
//! - **Registry layer**: [`build_registry`] turns them into a [`TypeRegistry`]
//!
//! ```json
//! { "types": [
//!   { "kind": "class", "name": "Person",
//!     "members": [{ "name": "Name", "type": "string", "mapping": "name" }] },
//!   { "kind": "enum", "name": "Color", "underlying": "int",
//!     "members": [{ "name": "Red", "value": 0, "mapping": "red" }] }
//! ] }
//! ```

use crate::atom::Atom;
use crate::host::{
    ClassDecl, ConstructorDecl, EnumDecl, EnumMember, HostKind, HostTypeId, Mapping, MemberDecl,
    ParamDecl, RecordField,
};
use crate::registry::TypeRegistry;

use super::DeclError;
use super::type_ref::TypeRef;

#[derive(Debug, Clone, serde::Deserialize)]
pub struct RawDeclarations {
    #[serde(default)]
    pub types: Vec<RawTypeDecl>,
}

#[derive(Debug, Clone, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum RawTypeDecl {
    Class {
        name: String,
        #[serde(default)]
        members: Vec<RawMember>,
        #[serde(default)]
        constructors: Vec<RawConstructor>,
        #[serde(default = "default_true")]
        default_constructible: bool,
        #[serde(default)]
        known_type: bool,
    },
    Enum {
        name: String,
        #[serde(default = "default_underlying")]
        underlying: Atom,
        #[serde(default)]
        members: Vec<RawEnumMember>,
    },
    Record {
        name: String,
        #[serde(default)]
        fields: Vec<RawRecordField>,
    },
    Parameter {
        name: String,
        #[serde(default)]
        wildcard: bool,
    },
    Definition {
        name: String,
        arity: u8,
    },
    Expression {
        name: String,
    },
    Dynamic {
        name: String,
    },
    Handle {
        name: String,
    },
    Custom {
        name: String,
    },
}

impl RawTypeDecl {
    pub fn name(&self) -> &str {
        match self {
            RawTypeDecl::Class { name, .. }
            | RawTypeDecl::Enum { name, .. }
            | RawTypeDecl::Record { name, .. }
            | RawTypeDecl::Parameter { name, .. }
            | RawTypeDecl::Definition { name, .. }
            | RawTypeDecl::Expression { name }
            | RawTypeDecl::Dynamic { name }
            | RawTypeDecl::Handle { name }
            | RawTypeDecl::Custom { name } => name,
        }
    }
}

/// A mapping declaration: either the name itself, or an object whose
/// `name` may be missing or null.
#[derive(Debug, Clone, serde::Deserialize)]
#[serde(untagged)]
pub enum RawMapping {
    Name(String),
    Declared {
        #[serde(default)]
        name: Option<String>,
    },
}

impl From<RawMapping> for Mapping {
    fn from(raw: RawMapping) -> Self {
        match raw {
            RawMapping::Name(name) => Mapping::named(name),
            RawMapping::Declared { name } => Mapping { name },
        }
    }
}

#[derive(Debug, Clone, serde::Deserialize)]
pub struct RawMember {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: String,
    #[serde(default = "default_true")]
    pub readable: bool,
    #[serde(default = "default_true")]
    pub writable: bool,
    #[serde(default)]
    pub mapping: Option<RawMapping>,
}

#[derive(Debug, Clone, serde::Deserialize)]
pub struct RawConstructor {
    #[serde(default)]
    pub params: Vec<RawParam>,
}

#[derive(Debug, Clone, serde::Deserialize)]
pub struct RawParam {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: String,
    #[serde(default)]
    pub mapping: Option<RawMapping>,
}

#[derive(Debug, Clone, serde::Deserialize)]
pub struct RawEnumMember {
    pub name: String,
    pub value: i64,
    #[serde(default)]
    pub mapping: Option<RawMapping>,
}

#[derive(Debug, Clone, serde::Deserialize)]
pub struct RawRecordField {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: String,
    #[serde(default = "default_true")]
    pub writable: bool,
}

fn default_true() -> bool {
    true
}

fn default_underlying() -> Atom {
    Atom::Int32
}

pub fn parse_declarations(json: &str) -> Result<RawDeclarations, DeclError> {
    Ok(serde_json::from_str(json)?)
}

/// Parse a declaration document and build a registry from it.
pub fn load_declarations(json: &str) -> Result<TypeRegistry, DeclError> {
    build_registry(parse_declarations(json)?)
}

/// Register every declaration. Classes, enumerations, and records are
/// declared by name first so members may reference any type in the document.
pub fn build_registry(raw: RawDeclarations) -> Result<TypeRegistry, DeclError> {
    let mut registry = TypeRegistry::new();
    let mut pending = Vec::new();

    for decl in raw.types {
        match &decl {
            RawTypeDecl::Class { .. } | RawTypeDecl::Enum { .. } | RawTypeDecl::Record { .. } => {
                let id = registry.declare(decl.name())?;
                pending.push((id, decl));
            }
            RawTypeDecl::Parameter { name, wildcard } => {
                registry.generic_parameter(name, *wildcard)?;
            }
            RawTypeDecl::Definition { name, arity } => {
                registry.generic_definition(name, *arity)?;
            }
            RawTypeDecl::Expression { name } => {
                registry.expression(name)?;
            }
            RawTypeDecl::Dynamic { name } => {
                registry.dynamic(name)?;
            }
            RawTypeDecl::Handle { name } => {
                registry.handle(name)?;
            }
            RawTypeDecl::Custom { name } => {
                registry.custom(name)?;
            }
        }
    }

    for (id, decl) in pending {
        define(&mut registry, id, decl)?;
    }

    Ok(registry)
}

fn define(registry: &mut TypeRegistry, id: HostTypeId, decl: RawTypeDecl) -> Result<(), DeclError> {
    let kind = match decl {
        RawTypeDecl::Class {
            members,
            constructors,
            default_constructible,
            known_type,
            ..
        } => {
            let mut class = ClassDecl::new();
            class.default_constructible = default_constructible;
            for m in members {
                let ty = resolve(registry, &m.ty)?;
                class.members.push(MemberDecl {
                    name: m.name,
                    ty,
                    readable: m.readable,
                    writable: m.writable,
                    mapping: m.mapping.map(Mapping::from),
                });
            }
            for c in constructors {
                let mut ctor = ConstructorDecl::new();
                for p in c.params {
                    let ty = resolve(registry, &p.ty)?;
                    ctor = ctor.with_param(ParamDecl {
                        name: p.name,
                        ty,
                        mapping: p.mapping.map(Mapping::from),
                    });
                }
                class.constructors.push(ctor);
            }
            if known_type {
                registry.mark_known_type(id);
            }
            HostKind::Class(class)
        }
        RawTypeDecl::Enum {
            underlying,
            members,
            ..
        } => {
            let mut decl = EnumDecl::new(underlying);
            for m in members {
                let mut member = EnumMember::new(m.name, m.value);
                member.mapping = m.mapping.map(Mapping::from);
                decl.members.push(member);
            }
            HostKind::Enum(decl)
        }
        RawTypeDecl::Record { fields, .. } => {
            let mut resolved = Vec::with_capacity(fields.len());
            for f in fields {
                let ty = resolve(registry, &f.ty)?;
                let mut field = RecordField::new(f.name, ty);
                field.writable = f.writable;
                resolved.push(field);
            }
            HostKind::Record(resolved)
        }
        _ => return Ok(()),
    };
    registry.define(id, kind)?;
    Ok(())
}

/// Parse and resolve a type reference such as `List<Person>`.
pub fn resolve(registry: &mut TypeRegistry, text: &str) -> Result<HostTypeId, DeclError> {
    TypeRef::parse(text)?.resolve(registry)
}
