//! Dispatch logic: extract params from ArgMatches and convert to command args.

use std::path::PathBuf;

use clap::ArgMatches;

use crate::commands::check::CheckArgs;
use crate::commands::print::{PrintArgs, PrintFormat};

pub struct CheckParams {
    pub decls_path: PathBuf,
    pub type_ref: String,
    pub allow_cycles: bool,
    pub stack: bool,
}

impl CheckParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        let (decls_path, type_ref) = target(m);
        Self {
            decls_path,
            type_ref,
            allow_cycles: m.get_flag("allow_cycles"),
            stack: !m.get_flag("no_stack"),
        }
    }
}

impl From<CheckParams> for CheckArgs {
    fn from(p: CheckParams) -> Self {
        Self {
            decls_path: p.decls_path,
            type_ref: p.type_ref,
            allow_cycles: p.allow_cycles,
            stack: p.stack,
        }
    }
}

pub struct PrintParams {
    pub decls_path: PathBuf,
    pub type_ref: String,
    pub allow_cycles: bool,
    pub stack: bool,
    pub json: bool,
    pub compact: bool,
    pub single_line: bool,
}

impl PrintParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        let (decls_path, type_ref) = target(m);
        Self {
            decls_path,
            type_ref,
            allow_cycles: m.get_flag("allow_cycles"),
            stack: !m.get_flag("no_stack"),
            json: m.get_flag("json"),
            compact: m.get_flag("compact"),
            single_line: m.get_flag("single_line"),
        }
    }
}

impl From<PrintParams> for PrintArgs {
    fn from(p: PrintParams) -> Self {
        let format = match (p.json, p.compact) {
            (true, true) => PrintFormat::CompactJson,
            (true, false) => PrintFormat::Json,
            (false, _) => PrintFormat::Text {
                multiline: !p.single_line,
            },
        };
        Self {
            decls_path: p.decls_path,
            type_ref: p.type_ref,
            allow_cycles: p.allow_cycles,
            stack: p.stack,
            format,
        }
    }
}

/// Both positionals are required, so clap has already rejected their absence.
fn target(m: &ArgMatches) -> (PathBuf, String) {
    (
        m.get_one::<PathBuf>("decls_path").cloned().unwrap_or_default(),
        m.get_one::<String>("type_ref").cloned().unwrap_or_default(),
    )
}
