//! Host type descriptions.
//!
//! A `HostType` is the result of scanning a type's declaration once: its
//! shape, its members with accessor capabilities, its constructors, and the
//! mapping-name metadata attached to each. Everything downstream works off
//! these records and never looks at the host again.

use crate::atom::Atom;
use crate::interner::Symbol;

/// Handle to a type in a [`TypeRegistry`](crate::TypeRegistry).
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct HostTypeId(pub(crate) u32);

impl HostTypeId {
    /// The pre-registered id of an atom.
    #[inline]
    pub const fn of_atom(atom: Atom) -> Self {
        Self(atom as u32)
    }

    #[inline]
    pub fn as_u32(self) -> u32 {
        self.0
    }

    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl From<Atom> for HostTypeId {
    fn from(atom: Atom) -> Self {
        Self::of_atom(atom)
    }
}

/// A mapping-name declaration on a member, parameter, or enumeration value.
///
/// `name: None` models a declaration that is present but carries no name,
/// which validation rejects alongside blank names.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct Mapping {
    pub name: Option<String>,
}

impl Mapping {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
        }
    }

    pub fn unnamed() -> Self {
        Self { name: None }
    }

    /// The declared name, if present and non-blank.
    pub fn valid_name(&self) -> Option<&str> {
        self.name.as_deref().filter(|n| !n.trim().is_empty())
    }
}

/// A field of an anonymous shape. Fields are positional and construction-only.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct Field {
    pub name: String,
    pub ty: HostTypeId,
}

impl Field {
    pub fn new(name: impl Into<String>, ty: HostTypeId) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}

/// A field of a runtime-declared record shape.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct RecordField {
    pub name: String,
    pub ty: HostTypeId,
    pub writable: bool,
}

impl RecordField {
    pub fn new(name: impl Into<String>, ty: HostTypeId) -> Self {
        Self {
            name: name.into(),
            ty,
            writable: true,
        }
    }

    pub fn read_only(mut self) -> Self {
        self.writable = false;
        self
    }
}

/// A member (field or property) of a user-declared class.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct MemberDecl {
    pub name: String,
    pub ty: HostTypeId,
    pub readable: bool,
    pub writable: bool,
    pub mapping: Option<Mapping>,
}

impl MemberDecl {
    pub fn new(name: impl Into<String>, ty: HostTypeId) -> Self {
        Self {
            name: name.into(),
            ty,
            readable: true,
            writable: true,
            mapping: None,
        }
    }

    /// Attach a mapping-name declaration.
    pub fn mapped(self, name: impl Into<String>) -> Self {
        self.with_mapping(Mapping::named(name))
    }

    pub fn with_mapping(mut self, mapping: Mapping) -> Self {
        self.mapping = Some(mapping);
        self
    }

    pub fn read_only(mut self) -> Self {
        self.writable = false;
        self
    }

    pub fn write_only(mut self) -> Self {
        self.readable = false;
        self
    }
}

#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct ParamDecl {
    pub name: String,
    pub ty: HostTypeId,
    pub mapping: Option<Mapping>,
}

/// A non-default initializer.
#[derive(Clone, PartialEq, Eq, Hash, Debug, Default)]
pub struct ConstructorDecl {
    pub params: Vec<ParamDecl>,
}

impl ConstructorDecl {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn param(mut self, name: impl Into<String>, ty: HostTypeId) -> Self {
        self.params.push(ParamDecl {
            name: name.into(),
            ty,
            mapping: None,
        });
        self
    }

    pub fn mapped_param(
        mut self,
        name: impl Into<String>,
        ty: HostTypeId,
        mapping: impl Into<String>,
    ) -> Self {
        self.params.push(ParamDecl {
            name: name.into(),
            ty,
            mapping: Some(Mapping::named(mapping)),
        });
        self
    }

    pub fn with_param(mut self, param: ParamDecl) -> Self {
        self.params.push(param);
        self
    }

    /// Whether any parameter carries a mapping declaration.
    pub fn is_mapped(&self) -> bool {
        self.params.iter().any(|p| p.mapping.is_some())
    }
}

/// Declaration scan of a user class.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct ClassDecl {
    pub members: Vec<MemberDecl>,
    pub constructors: Vec<ConstructorDecl>,
    pub default_constructible: bool,
}

impl Default for ClassDecl {
    fn default() -> Self {
        Self {
            members: Vec::new(),
            constructors: Vec::new(),
            default_constructible: true,
        }
    }
}

impl ClassDecl {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn member(mut self, member: MemberDecl) -> Self {
        self.members.push(member);
        self
    }

    pub fn constructor(mut self, ctor: ConstructorDecl) -> Self {
        self.constructors.push(ctor);
        self
    }

    pub fn no_default_constructor(mut self) -> Self {
        self.default_constructible = false;
        self
    }

    /// Whether the class opted into entity classification through any
    /// mapping declaration on a member or constructor parameter.
    pub fn is_mapped(&self) -> bool {
        self.members.iter().any(|m| m.mapping.is_some())
            || self.constructors.iter().any(ConstructorDecl::is_mapped)
    }
}

#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct EnumMember {
    pub name: String,
    pub value: i64,
    pub mapping: Option<Mapping>,
}

impl EnumMember {
    pub fn new(name: impl Into<String>, value: i64) -> Self {
        Self {
            name: name.into(),
            value,
            mapping: None,
        }
    }

    pub fn mapped(mut self, name: impl Into<String>) -> Self {
        self.mapping = Some(Mapping::named(name));
        self
    }

    pub fn with_mapping(mut self, mapping: Mapping) -> Self {
        self.mapping = Some(mapping);
        self
    }
}

#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct EnumDecl {
    pub underlying: Atom,
    pub members: Vec<EnumMember>,
}

impl EnumDecl {
    pub fn new(underlying: Atom) -> Self {
        Self {
            underlying,
            members: Vec::new(),
        }
    }

    pub fn member(mut self, member: EnumMember) -> Self {
        self.members.push(member);
        self
    }

    pub fn is_mapped(&self) -> bool {
        self.members.iter().any(|m| m.mapping.is_some())
    }
}

/// The shape of a host type.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub enum HostKind {
    Atom(Atom),
    /// Nullable wrapper, `T?`.
    Nullable(HostTypeId),
    /// Fixed-size array, `T[]`.
    Array(HostTypeId),
    /// Growable list with indexed access, `List<T>`.
    List(HostTypeId),
    /// Read-forward sequence without indexed access, `IEnumerable<T>`.
    Sequence(HostTypeId),
    MultiArray {
        element: HostTypeId,
        rank: u8,
    },
    Pointer(HostTypeId),
    ByRef(HostTypeId),
    Tuple(Vec<HostTypeId>),
    Anonymous(Vec<Field>),
    Function {
        parameters: Vec<HostTypeId>,
        result: HostTypeId,
    },
    /// Quoted code over a delegate shape, `Expression<T>`.
    Quoted(HostTypeId),
    /// Opaque code value.
    Expression,
    Record(Vec<RecordField>),
    Class(ClassDecl),
    Enum(EnumDecl),
    GenericParameter {
        wildcard: bool,
    },
    /// Unbound generic definition such as `List<>`.
    GenericDefinition {
        arity: u8,
    },
    /// Late-bound object type.
    Dynamic,
    /// Opaque runtime-only handle.
    Handle,
    /// Host-specific extension node kind.
    Custom,
    /// Declared by name, awaiting its definition.
    Declared,
}

impl HostKind {
    /// Named kinds are registered by name; the rest are interned by shape.
    pub fn is_named(&self) -> bool {
        matches!(
            self,
            HostKind::Expression
                | HostKind::Record(_)
                | HostKind::Class(_)
                | HostKind::Enum(_)
                | HostKind::GenericParameter { .. }
                | HostKind::GenericDefinition { .. }
                | HostKind::Dynamic
                | HostKind::Handle
                | HostKind::Custom
                | HostKind::Declared
        )
    }
}

#[derive(Clone, Debug)]
pub struct HostType {
    pub(crate) name: Option<Symbol>,
    pub kind: HostKind,
    /// Flags a type intended to be checked even though it doesn't look like
    /// a typical data shape.
    pub known_type: bool,
}

impl HostType {
    pub fn name_symbol(&self) -> Option<Symbol> {
        self.name
    }
}
