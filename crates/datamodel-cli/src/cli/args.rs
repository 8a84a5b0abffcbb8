//! Shared argument builders for CLI commands.

use std::path::PathBuf;

use clap::{Arg, ArgAction, value_parser};

/// Declaration document (positional).
pub fn decls_path_arg() -> Arg {
    Arg::new("decls_path")
        .value_name("DECLS")
        .required(true)
        .value_parser(value_parser!(PathBuf))
        .help("JSON declaration document (use \"-\" for stdin)")
}

/// Type reference to classify (positional).
pub fn type_ref_arg() -> Arg {
    Arg::new("type_ref")
        .value_name("TYPE")
        .required(true)
        .help("Type reference, e.g. 'List<Person>' or 'Func<int, bool>'")
}

/// Accept cyclic graphs (--allow-cycles).
pub fn allow_cycles_arg() -> Arg {
    Arg::new("allow_cycles")
        .long("allow-cycles")
        .action(ArgAction::SetTrue)
        .help("Accept self-referential types")
}

/// Hide the enclosing-type path under each error (--no-stack).
pub fn no_stack_arg() -> Arg {
    Arg::new("no_stack")
        .long("no-stack")
        .action(ArgAction::SetTrue)
        .help("Omit the enclosing types listed under each error")
}

/// Print the serialization schema instead of the rendering (--json).
pub fn json_arg() -> Arg {
    Arg::new("json")
        .long("json")
        .action(ArgAction::SetTrue)
        .help("Print the serialization schema as JSON")
}

/// Output compact JSON (--compact).
pub fn compact_arg() -> Arg {
    Arg::new("compact")
        .long("compact")
        .action(ArgAction::SetTrue)
        .requires("json")
        .help("Output compact JSON (default: pretty)")
}

/// Render cyclic bindings on one line (--single-line).
pub fn single_line_arg() -> Arg {
    Arg::new("single_line")
        .long("single-line")
        .action(ArgAction::SetTrue)
        .conflicts_with("json")
        .help("Render cyclic bindings on a single line")
}
