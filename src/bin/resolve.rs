use std::env;

use gml_miner::{ExportConfig, Project, ValueKind, resolve};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 4 || args.len() > 6 {
        print_usage(&args[0]);
        std::process::exit(1);
    }

    let export_dir = &args[1];
    let object_id = &args[2];
    let attribute = &args[3];

    let kind = match args.get(4) {
        Some(kind) => kind.parse::<ValueKind>().unwrap_or_else(|e| {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }),
        None => ValueKind::Str,
    };

    let index = match args.get(5) {
        Some(index) => Some(index.parse::<usize>().unwrap_or_else(|_| {
            eprintln!("Error: index must be a non-negative integer, got '{}'", index);
            std::process::exit(1);
        })),
        None => None,
    };

    let project = Project::load(&ExportConfig::new(export_dir)).unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    });

    if !project.parents.contains(object_id) {
        eprintln!("Warning: '{}' is not in the parent map", object_id);
    }

    let chain = project.hierarchy(object_id);
    println!("hierarchy: {}", chain.join(" -> "));

    match resolve(&project.records, kind, attribute, &chain, index) {
        Some(value) => println!("{}", value),
        None => println!("<absent>"),
    }
}

fn print_usage(program: &str) {
    eprintln!(
        "Usage: {} <export_dir> <object> <attribute> [raw|num|bool|str] [index]",
        program
    );
    eprintln!("\nResolves one attribute of an object through its inheritance chain.");
    eprintln!("The value kind defaults to 'str'.");
}
