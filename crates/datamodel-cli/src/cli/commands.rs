//! Command builders for the CLI.

use clap::Command;

use super::args::*;

/// Build the complete CLI with all subcommands.
pub fn build_cli() -> Command {
    Command::new("datamodel")
        .about("Classify declared host types into data types")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(check_command())
        .subcommand(print_command())
}

/// Validate a type against its declarations.
pub fn check_command() -> Command {
    Command::new("check")
        .about("Check that a type is a data type")
        .override_usage("  datamodel check <DECLS> <TYPE> [--allow-cycles]")
        .after_help(
            r#"EXAMPLES:
  datamodel check types.json Person                 # entity with mappings
  datamodel check types.json 'List<Node>' --allow-cycles
  cat types.json | datamodel check - 'Func<int, bool>'"#,
        )
        .arg(decls_path_arg())
        .arg(type_ref_arg())
        .arg(allow_cycles_arg())
        .arg(no_stack_arg())
}

/// Print the classified data type.
pub fn print_command() -> Command {
    Command::new("print")
        .about("Print the data type of a type")
        .override_usage(
            "\
  datamodel print <DECLS> <TYPE> [--allow-cycles]
  datamodel print <DECLS> <TYPE> --json [--compact]",
        )
        .after_help(
            r#"EXAMPLES:
  datamodel print types.json Person                 # { name : string; age : int }
  datamodel print types.json Node --allow-cycles    # let t0 = ... in t0
  datamodel print types.json Person --json          # serialization schema"#,
        )
        .arg(decls_path_arg())
        .arg(type_ref_arg())
        .arg(allow_cycles_arg())
        .arg(no_stack_arg())
        .arg(json_arg())
        .arg(compact_arg())
        .arg(single_line_arg())
}
