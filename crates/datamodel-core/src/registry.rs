//! Arena of host type descriptions.
//!
//! Atoms are pre-registered at fixed ids (their discriminant). Unnamed
//! composite shapes are interned structurally, so asking for `int[]` twice
//! yields the same id. Named types are registered once by name; classes,
//! enumerations, and records may be declared first and defined later so they
//! can refer to each other.

use std::collections::HashMap;

use crate::atom::Atom;
use crate::host::{ClassDecl, EnumDecl, Field, HostKind, HostType, HostTypeId, RecordField};
use crate::interner::Interner;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("type `{0}` is already registered")]
    DuplicateName(String),

    #[error("type `{0}` is not awaiting a definition")]
    AlreadyDefined(String),

    #[error("type `{0}` cannot be defined as a {1}")]
    NotDefinable(String, &'static str),
}

pub type RegistryResult<T> = std::result::Result<T, RegistryError>;

#[derive(Debug, Clone)]
pub struct TypeRegistry {
    types: Vec<HostType>,
    names: Interner,
    by_name: HashMap<crate::Symbol, HostTypeId>,
    shapes: HashMap<HostKind, HostTypeId>,
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeRegistry {
    pub fn new() -> Self {
        let mut registry = Self {
            types: Vec::new(),
            names: Interner::new(),
            by_name: HashMap::new(),
            shapes: HashMap::new(),
        };

        for atom in Atom::ALL {
            let sym = registry.names.intern(atom.name());
            let id = registry.push(HostType {
                name: Some(sym),
                kind: HostKind::Atom(atom),
                known_type: false,
            });
            debug_assert_eq!(id, HostTypeId::of_atom(atom));
            registry.by_name.insert(sym, id);
        }

        registry
    }

    fn push(&mut self, ty: HostType) -> HostTypeId {
        let id = HostTypeId(self.types.len() as u32);
        self.types.push(ty);
        id
    }

    fn intern_shape(&mut self, kind: HostKind) -> HostTypeId {
        debug_assert!(!kind.is_named());
        if let Some(&id) = self.shapes.get(&kind) {
            return id;
        }
        let id = self.push(HostType {
            name: None,
            kind: kind.clone(),
            known_type: false,
        });
        self.shapes.insert(kind, id);
        id
    }

    fn register_named(&mut self, name: &str, kind: HostKind) -> RegistryResult<HostTypeId> {
        debug_assert!(kind.is_named());
        if self.lookup(name).is_some() {
            return Err(RegistryError::DuplicateName(name.to_owned()));
        }
        let sym = self.names.intern(name);
        let id = self.push(HostType {
            name: Some(sym),
            kind,
            known_type: false,
        });
        self.by_name.insert(sym, id);
        Ok(id)
    }

    pub fn atom(&self, atom: Atom) -> HostTypeId {
        HostTypeId::of_atom(atom)
    }

    pub fn nullable(&mut self, inner: HostTypeId) -> HostTypeId {
        self.intern_shape(HostKind::Nullable(inner))
    }

    pub fn array(&mut self, element: HostTypeId) -> HostTypeId {
        self.intern_shape(HostKind::Array(element))
    }

    pub fn list(&mut self, element: HostTypeId) -> HostTypeId {
        self.intern_shape(HostKind::List(element))
    }

    pub fn sequence(&mut self, element: HostTypeId) -> HostTypeId {
        self.intern_shape(HostKind::Sequence(element))
    }

    pub fn multi_array(&mut self, element: HostTypeId, rank: u8) -> HostTypeId {
        self.intern_shape(HostKind::MultiArray { element, rank })
    }

    pub fn pointer(&mut self, pointee: HostTypeId) -> HostTypeId {
        self.intern_shape(HostKind::Pointer(pointee))
    }

    pub fn by_ref(&mut self, referent: HostTypeId) -> HostTypeId {
        self.intern_shape(HostKind::ByRef(referent))
    }

    pub fn tuple(&mut self, items: impl IntoIterator<Item = HostTypeId>) -> HostTypeId {
        self.intern_shape(HostKind::Tuple(items.into_iter().collect()))
    }

    pub fn anonymous(&mut self, fields: impl IntoIterator<Item = Field>) -> HostTypeId {
        self.intern_shape(HostKind::Anonymous(fields.into_iter().collect()))
    }

    pub fn function(
        &mut self,
        parameters: impl IntoIterator<Item = HostTypeId>,
        result: HostTypeId,
    ) -> HostTypeId {
        self.intern_shape(HostKind::Function {
            parameters: parameters.into_iter().collect(),
            result,
        })
    }

    pub fn quoted(&mut self, inner: HostTypeId) -> HostTypeId {
        self.intern_shape(HostKind::Quoted(inner))
    }

    pub fn expression(&mut self, name: &str) -> RegistryResult<HostTypeId> {
        self.register_named(name, HostKind::Expression)
    }

    pub fn class(&mut self, name: &str, decl: ClassDecl) -> RegistryResult<HostTypeId> {
        self.register_named(name, HostKind::Class(decl))
    }

    pub fn enumeration(&mut self, name: &str, decl: EnumDecl) -> RegistryResult<HostTypeId> {
        self.register_named(name, HostKind::Enum(decl))
    }

    pub fn record(
        &mut self,
        name: &str,
        fields: impl IntoIterator<Item = RecordField>,
    ) -> RegistryResult<HostTypeId> {
        self.register_named(name, HostKind::Record(fields.into_iter().collect()))
    }

    pub fn generic_parameter(&mut self, name: &str, wildcard: bool) -> RegistryResult<HostTypeId> {
        self.register_named(name, HostKind::GenericParameter { wildcard })
    }

    pub fn generic_definition(&mut self, name: &str, arity: u8) -> RegistryResult<HostTypeId> {
        self.register_named(name, HostKind::GenericDefinition { arity })
    }

    pub fn dynamic(&mut self, name: &str) -> RegistryResult<HostTypeId> {
        self.register_named(name, HostKind::Dynamic)
    }

    pub fn handle(&mut self, name: &str) -> RegistryResult<HostTypeId> {
        self.register_named(name, HostKind::Handle)
    }

    pub fn custom(&mut self, name: &str) -> RegistryResult<HostTypeId> {
        self.register_named(name, HostKind::Custom)
    }

    /// Register a name whose definition follows later via [`define`](Self::define).
    pub fn declare(&mut self, name: &str) -> RegistryResult<HostTypeId> {
        self.register_named(name, HostKind::Declared)
    }

    /// Complete a declared type. Only classes, enumerations, and records can
    /// be forward-declared.
    pub fn define(&mut self, id: HostTypeId, kind: HostKind) -> RegistryResult<()> {
        let name = self.display(id);
        let what = match &kind {
            HostKind::Class(_) | HostKind::Enum(_) | HostKind::Record(_) => None,
            HostKind::Expression => Some("expression"),
            HostKind::GenericParameter { .. } => Some("generic parameter"),
            HostKind::GenericDefinition { .. } => Some("generic definition"),
            HostKind::Dynamic => Some("dynamic type"),
            HostKind::Handle => Some("handle"),
            HostKind::Custom => Some("custom type"),
            HostKind::Declared => Some("declaration"),
            _ => Some("unnamed shape"),
        };
        if let Some(what) = what {
            return Err(RegistryError::NotDefinable(name, what));
        }
        let ty = &mut self.types[id.index()];
        if ty.kind != HostKind::Declared {
            return Err(RegistryError::AlreadyDefined(name));
        }
        ty.kind = kind;
        Ok(())
    }

    pub fn mark_known_type(&mut self, id: HostTypeId) {
        self.types[id.index()].known_type = true;
    }

    /// # Panics
    /// Panics if the id was not created by this registry.
    #[inline]
    pub fn get(&self, id: HostTypeId) -> &HostType {
        &self.types[id.index()]
    }

    #[inline]
    pub fn try_get(&self, id: HostTypeId) -> Option<&HostType> {
        self.types.get(id.index())
    }

    #[inline]
    pub fn kind(&self, id: HostTypeId) -> &HostKind {
        &self.get(id).kind
    }

    pub fn name(&self, id: HostTypeId) -> Option<&str> {
        self.get(id).name.map(|sym| self.names.resolve(sym))
    }

    pub fn lookup(&self, name: &str) -> Option<HostTypeId> {
        let sym = self.names.get(name)?;
        self.by_name.get(&sym).copied()
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (HostTypeId, &HostType)> {
        self.types
            .iter()
            .enumerate()
            .map(|(i, ty)| (HostTypeId(i as u32), ty))
    }

    /// Whether the type is a value type, i.e. not nullable without a wrapper.
    pub fn is_value_type(&self, id: HostTypeId) -> bool {
        match self.kind(id) {
            HostKind::Atom(atom) => atom.is_value_type(),
            HostKind::Enum(_) => true,
            _ => false,
        }
    }

    /// Host display name: `int?`, `int[]`, `List<int>`, `Func<int, bool>`, ...
    pub fn display(&self, id: HostTypeId) -> String {
        let mut out = String::new();
        self.write_display(id, &mut out);
        out
    }

    fn write_display(&self, id: HostTypeId, out: &mut String) {
        if let Some(name) = self.name(id) {
            out.push_str(name);
            return;
        }
        match self.kind(id) {
            HostKind::Nullable(inner) => {
                self.write_display(*inner, out);
                out.push('?');
            }
            HostKind::Array(element) => {
                self.write_display(*element, out);
                out.push_str("[]");
            }
            HostKind::List(element) => self.write_generic("List", &[*element], out),
            HostKind::Sequence(element) => self.write_generic("IEnumerable", &[*element], out),
            HostKind::MultiArray { element, rank } => {
                self.write_display(*element, out);
                out.push('[');
                for _ in 1..*rank {
                    out.push(',');
                }
                out.push(']');
            }
            HostKind::Pointer(inner) => {
                self.write_display(*inner, out);
                out.push('*');
            }
            HostKind::ByRef(inner) => {
                self.write_display(*inner, out);
                out.push('&');
            }
            HostKind::Tuple(items) => self.write_generic("Tuple", items, out),
            HostKind::Anonymous(fields) => {
                if fields.is_empty() {
                    out.push_str("{}");
                    return;
                }
                out.push_str("{ ");
                for (i, field) in fields.iter().enumerate() {
                    if i > 0 {
                        out.push_str("; ");
                    }
                    out.push_str(&field.name);
                    out.push_str(" : ");
                    self.write_display(field.ty, out);
                }
                out.push_str(" }");
            }
            HostKind::Function { parameters, result } => {
                let mut args = parameters.clone();
                args.push(*result);
                self.write_generic("Func", &args, out);
            }
            HostKind::Quoted(inner) => self.write_generic("Expression", &[*inner], out),
            // Named kinds always carry a name.
            _ => out.push_str("<unnamed>"),
        }
    }

    fn write_generic(&self, head: &str, args: &[HostTypeId], out: &mut String) {
        out.push_str(head);
        out.push('<');
        for (i, arg) in args.iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            self.write_display(*arg, out);
        }
        out.push('>');
    }
}
