use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use datamodel_core::decl::{DeclError, load_declarations, resolve};
use datamodel_core::{HostTypeId, TypeRegistry};
use log::debug;

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to read stdin: {0}")]
    Stdin(#[source] io::Error),

    #[error("failed to read '{}': {source}", path.display())]
    File {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{}: {source}", origin.display())]
    Declarations {
        origin: PathBuf,
        #[source]
        source: DeclError,
    },

    #[error("cannot resolve '{text}': {source}")]
    TypeRef {
        text: String,
        #[source]
        source: DeclError,
    },
}

/// Declarations loaded into a registry, plus the type under inspection.
pub struct Target {
    pub registry: TypeRegistry,
    pub ty: HostTypeId,
}

/// Load the declaration document at `path` ("-" for stdin) and resolve
/// `type_ref` against it.
pub fn load_target(path: &Path, type_ref: &str) -> Result<Target, LoadError> {
    let json = read_document(path)?;
    resolve_target(path, &json, type_ref)
}

/// Build a registry from `json` and resolve `type_ref` against it. `origin`
/// names the document in error messages.
pub fn resolve_target(origin: &Path, json: &str, type_ref: &str) -> Result<Target, LoadError> {
    let mut registry = load_declarations(json).map_err(|source| LoadError::Declarations {
        origin: origin.to_owned(),
        source,
    })?;
    let ty = resolve(&mut registry, type_ref).map_err(|source| LoadError::TypeRef {
        text: type_ref.to_owned(),
        source,
    })?;
    debug!("resolved `{type_ref}` to {}", registry.display(ty));
    Ok(Target { registry, ty })
}

fn read_document(path: &Path) -> Result<String, LoadError> {
    if path.as_os_str() == "-" {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .map_err(LoadError::Stdin)?;
        return Ok(buf);
    }
    fs::read_to_string(path).map_err(|source| LoadError::File {
        path: path.to_owned(),
        source,
    })
}
