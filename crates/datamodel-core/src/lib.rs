#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Host object model for the datamodel type algebra.
//!
//! - **Atoms**: the closed catalog of intrinsically atomic types
//! - **Registry**: an arena of host type descriptions, the result of a
//!   one-time declaration scan (members, accessors, constructors, mappings)
//! - **Values**: runtime host values, including shared and cyclic ones
//! - **Declarations**: JSON documents that populate a registry

pub mod atom;
pub mod decl;
pub mod host;
pub mod interner;
pub mod registry;
pub mod value;

#[cfg(test)]
mod interner_tests;
#[cfg(test)]
mod registry_tests;
#[cfg(test)]
mod value_tests;

pub use atom::Atom;
pub use decl::DeclError;
pub use host::{
    ClassDecl, ConstructorDecl, EnumDecl, EnumMember, Field, HostKind, HostType, HostTypeId,
    Mapping, MemberDecl, ParamDecl, RecordField,
};
pub use interner::{Interner, Symbol};
pub use registry::{RegistryError, RegistryResult, TypeRegistry};
pub use value::{ArrayValue, CodeValue, EnumValue, FunctionValue, ObjectRef, Value};
