use std::path::PathBuf;

use datamodel_lib::{Classifier, Error};

use super::decl_loader::load_target;

pub struct CheckArgs {
    pub decls_path: PathBuf,
    pub type_ref: String,
    pub allow_cycles: bool,
    pub stack: bool,
}

pub fn run(args: CheckArgs) {
    let target = match load_target(&args.decls_path, &args.type_ref) {
        Ok(target) => target,
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(1);
        }
    };

    let checked = Classifier::new(&target.registry)
        .allow_cycles(args.allow_cycles)
        .check(target.ty);

    match checked {
        Ok(()) => {}
        Err(Error::CheckFailed(report)) => {
            eprint!("{}", report.printer().stack(args.stack).render());
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(1);
        }
    }

    // Silent on success (like cargo check)
}
