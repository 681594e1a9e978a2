//! deplog - dependency schema checker
//!
//! Usage: deplog [OPTIONS] <files...>
//!
//! Parses dependency schema files, validates them, and reports whether each
//! schema's EGDs define key dependencies that are safe to combine with its
//! TGDs.

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use deplog::builder::SchemaBuilder;
use deplog::conflict::egds_non_conflicting_with_tgds;
use deplog::fd::analyze_egds;
use deplog::naming::{AllVariables, CapitalizedConstants, NamingCriteria};
use deplog::pretty::pretty_print;
use deplog::schema::DependencySchema;

const VERSION: &str = env!("CARGO_PKG_VERSION");

struct Options {
    capitalized_constants: bool,
    print_schema: bool,
    files: Vec<PathBuf>,
}

/// Parse command line arguments.
///
/// Options:
///   -c, --capitalized-constants   Treat capitalized identifiers as constants
///   -p, --print                   Echo the validated schema back
///   -h, --help                    Show help and exit
///   -v, --version                 Show version and exit
fn parse_args(args: &[String]) -> Options {
    let mut options = Options {
        capitalized_constants: false,
        print_schema: false,
        files: Vec::new(),
    };

    for arg in args {
        match arg.as_str() {
            "-c" | "--capitalized-constants" => options.capitalized_constants = true,
            "-p" | "--print" => options.print_schema = true,
            "-h" | "--help" => {
                println!("deplog v{} - dependency schema checker", VERSION);
                println!();
                println!("Usage: deplog [OPTIONS] <files...>");
                println!();
                println!("Options:");
                println!("  -c, --capitalized-constants  Treat capitalized identifiers as constants");
                println!("  -p, --print                  Echo the validated schema back");
                println!("  -h, --help                   Show this help message");
                println!("  -v, --version                Show version");
                std::process::exit(0);
            }
            "-v" | "--version" => {
                println!("deplog v{}", VERSION);
                std::process::exit(0);
            }
            _ if arg.starts_with('-') => {
                eprintln!("Error: Unknown option '{}'", arg);
                eprintln!("Try 'deplog --help' for usage information");
                std::process::exit(1);
            }
            _ => options.files.push(PathBuf::from(arg)),
        }
    }

    options
}

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let options = parse_args(&args);

    if options.files.is_empty() {
        eprintln!("Error: no input files");
        eprintln!("Try 'deplog --help' for usage information");
        return ExitCode::FAILURE;
    }

    let mut failed = false;
    for path in &options.files {
        if !check_file(path, &options) {
            failed = true;
        }
    }

    if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

/// Load, validate, and report on one schema file; false on any error
fn check_file(path: &PathBuf, options: &Options) -> bool {
    let source = match fs::read_to_string(path) {
        Ok(source) => source,
        Err(err) => {
            eprintln!("{}: cannot read: {}", path.display(), err);
            return false;
        }
    };

    let file = match deplog::parse(&source) {
        Ok(file) => file,
        Err(err) => {
            eprintln!("{}", err.format(&source));
            return false;
        }
    };

    let criteria: Box<dyn NamingCriteria> = if options.capitalized_constants {
        Box::new(CapitalizedConstants)
    } else {
        Box::new(AllVariables)
    };

    let mut builder = SchemaBuilder::with_criteria(criteria);
    if let Err(err) = builder.add_file(&file) {
        eprintln!("{}: schema error: {}", path.display(), err);
        return false;
    }
    let schema = match builder.build() {
        Ok(schema) => schema,
        Err(err) => {
            eprintln!("{}: schema error: {}", path.display(), err);
            return false;
        }
    };

    if options.print_schema {
        print!("{}", pretty_print(&schema));
    }

    report(path, &schema);
    true
}

/// Summarize the FD extraction and the conflict verdict for one schema
fn report(path: &PathBuf, schema: &DependencySchema) {
    let analysis = analyze_egds(schema);

    println!("{}:", path.display());
    println!(
        "  predicates: {}, dependencies: {}",
        schema.predicates().len(),
        schema.dependencies().len()
    );

    for group in &analysis.functional_dependencies {
        let pred = schema.predicate(group.fd.predicate);
        let kind = if group.fd.is_key_dependency(pred.arity) {
            "key dependency"
        } else {
            "partial functional dependency"
        };
        println!(
            "  {} on {}: key {:?} determines {:?} ({} EGDs)",
            kind,
            pred.name,
            group.fd.key_positions,
            group.fd.determined_positions,
            group.egds.len()
        );
    }
    if !analysis.non_functional_egds.is_empty() {
        println!(
            "  non-functional EGDs: {}",
            analysis.non_functional_egds.len()
        );
    }

    if analysis.all_egds_define_key_dependencies(schema) {
        if egds_non_conflicting_with_tgds(schema) {
            println!("  verdict: EGDs are key dependencies, no TGD conflicts");
        } else {
            println!("  verdict: EGDs are key dependencies, but a TGD conflicts");
        }
    } else {
        println!("  verdict: EGDs do not all define key dependencies");
    }
}
