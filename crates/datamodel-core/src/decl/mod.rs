//! Loading host type declarations from JSON documents.

mod json;
mod lexer;
mod type_ref;


pub use json::{
    RawConstructor, RawDeclarations, RawEnumMember, RawMapping, RawMember, RawParam,
    RawRecordField, RawTypeDecl, build_registry, load_declarations, parse_declarations, resolve,
};
pub use type_ref::TypeRef;

use crate::registry::RegistryError;

#[derive(Debug, thiserror::Error)]
pub enum DeclError {
    #[error("invalid declaration document: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error("unknown type `{0}`")]
    UnknownType(String),

    #[error("unknown generic type `{0}`")]
    UnknownGeneric(String),

    #[error("`{name}` expects {expected} type argument(s), found {found}")]
    Arity {
        name: String,
        expected: &'static str,
        found: usize,
    },

    #[error("syntax error in `{input}`: {message}")]
    Syntax { input: String, message: String },
}
