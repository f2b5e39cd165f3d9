use std::env;
use std::fs;

use gml_miner::SourceRecord;
use gml_miner::tokenizer::tokenize;
use tracing_subscriber::EnvFilter;

fn print_record(record: &SourceRecord, show_calls: bool) {
    let mut keys: Vec<&String> = record.values.keys().collect();
    keys.sort();

    let width = keys.iter().map(|k| k.len()).max().unwrap_or(0);
    for key in keys {
        println!("{:width$} = {}", key, record.values[key], width = width);
    }

    if show_calls && !record.calls.is_empty() {
        println!();
        for call in &record.calls {
            println!("{}({})", call.name, call.args.join(" | "));
        }
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();

    let mut show_calls = false;
    let mut file_path = None;

    for arg in &args[1..] {
        match arg.as_str() {
            "--calls" | "-c" => show_calls = true,
            "--help" | "-h" => {
                print_usage(&args[0]);
                std::process::exit(0);
            },
            other => {
                if file_path.is_some() {
                    eprintln!("Error: unexpected argument '{}'", other);
                    print_usage(&args[0]);
                    std::process::exit(1);
                }
                file_path = Some(other);
            },
        }
    }

    let Some(file_path) = file_path else {
        print_usage(&args[0]);
        std::process::exit(1);
    };

    let source = fs::read_to_string(file_path).unwrap_or_else(|e| {
        eprintln!("Error reading file '{}': {}", file_path, e);
        std::process::exit(1);
    });

    let record = tokenize(&source);
    print_record(&record, show_calls);
}

fn print_usage(program: &str) {
    eprintln!("Usage: {} [--calls] <file.gml>", program);
    eprintln!("\nPrints the root-scope assignments found in a script.");
    eprintln!("\nOptions:");
    eprintln!("  -c, --calls   Also print recorded calls, arguments separated by '|'");
    eprintln!("  -h, --help    Show this help");
}
