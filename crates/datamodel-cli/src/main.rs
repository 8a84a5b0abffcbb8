mod cli;
mod commands;

use cli::{CheckParams, PrintParams, build_cli};

fn main() {
    let matches = build_cli().get_matches();

    match matches.subcommand() {
        Some(("check", m)) => {
            let params = CheckParams::from_matches(m);
            commands::check::run(params.into());
        }
        Some(("print", m)) => {
            let params = PrintParams::from_matches(m);
            commands::print::run(params.into());
        }
        _ => unreachable!("clap should have caught this"),
    }
}
