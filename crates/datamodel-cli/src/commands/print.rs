use std::path::PathBuf;

use datamodel_lib::{Classifier, derive_schema};

use super::decl_loader::load_target;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PrintFormat {
    Text { multiline: bool },
    Json,
    CompactJson,
}

pub struct PrintArgs {
    pub decls_path: PathBuf,
    pub type_ref: String,
    pub allow_cycles: bool,
    pub stack: bool,
    pub format: PrintFormat,
}

pub fn run(args: PrintArgs) {
    let target = match load_target(&args.decls_path, &args.type_ref) {
        Ok(target) => target,
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(1);
        }
    };

    let graph = match Classifier::new(&target.registry)
        .allow_cycles(args.allow_cycles)
        .try_classify(target.ty)
    {
        Ok(graph) => graph,
        Err(report) => {
            eprint!("{}", report.printer().stack(args.stack).render());
            std::process::exit(1);
        }
    };

    let output = match args.format {
        PrintFormat::Text { multiline } => graph
            .printer(&target.registry)
            .multiline(multiline)
            .render(),
        PrintFormat::Json | PrintFormat::CompactJson => {
            let schema = derive_schema(&target.registry, &graph).unwrap_or_else(|e| {
                eprintln!("error: {e}");
                std::process::exit(1);
            });
            let json = if args.format == PrintFormat::CompactJson {
                serde_json::to_string(&schema)
            } else {
                serde_json::to_string_pretty(&schema)
            };
            json.unwrap_or_else(|e| {
                eprintln!("error: {e}");
                std::process::exit(1);
            })
        }
    };
    println!("{output}");
}
