//! CLI tool for cellcursor - resolves every rendered cell of a grid description
//!
//! Usage:
//!   cellcursor_cli <grid.json>              # Output JSON to stdout
//!   cellcursor_cli <grid.json> -o out.json  # Output JSON to file
//!
//! Log to stderr with `-v` (debug) or `-vv` (trace), or set `RUST_LOG`.

#![allow(clippy::exit)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::indexing_slicing)]

use std::env;
use std::fs;
use std::io::{self, Write};

use cellcursor::resolve_grid;

/// Log level for the `-v` flags; `RUST_LOG` still overrides it.
fn verbosity(args: &[String]) -> log::LevelFilter {
    match args.iter().find(|a| a.starts_with("-v")).map(String::len) {
        Some(2) => log::LevelFilter::Debug,
        Some(_) => log::LevelFilter::Trace,
        None => log::LevelFilter::Warn,
    }
}

fn main() {
    let args: Vec<String> = env::args().collect();

    env_logger::Builder::new()
        .filter_level(verbosity(&args))
        .parse_default_env()
        .init();

    let positional: Vec<&String> = args.iter().skip(1).filter(|a| !a.starts_with("-v")).collect();
    if positional.is_empty() {
        eprintln!("Usage: cellcursor_cli <grid.json> [-o output.json] [-v|-vv]");
        std::process::exit(1);
    }

    let input_path = positional[0];
    let output_path = if positional.len() > 2 && positional[1] == "-o" {
        Some(positional[2])
    } else {
        None
    };

    // Read input file
    let config = match fs::read_to_string(input_path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error reading {}: {}", input_path, e);
            std::process::exit(1);
        }
    };

    // Resolve cells
    let cells = match resolve_grid(&config) {
        Ok(cells) => cells,
        Err(e) => {
            eprintln!("Error resolving grid: {}", e);
            std::process::exit(1);
        }
    };

    // Serialize to JSON
    let json = match serde_json::to_string_pretty(&cells) {
        Ok(j) => j,
        Err(e) => {
            eprintln!("Error serializing JSON: {}", e);
            std::process::exit(1);
        }
    };

    // Output
    match output_path {
        Some(path) => {
            if let Err(e) = fs::write(path, &json) {
                eprintln!("Error writing {}: {}", path, e);
                std::process::exit(1);
            }
            eprintln!("Written: {} ({} cells)", path, cells.len());
        }
        None => {
            io::stdout().write_all(json.as_bytes()).unwrap();
            println!();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|a| (*a).to_owned()).collect()
    }

    #[test]
    fn test_verbosity_flags() {
        assert_eq!(verbosity(&args(&["cli", "grid.json"])), log::LevelFilter::Warn);
        assert_eq!(verbosity(&args(&["cli", "-v", "grid.json"])), log::LevelFilter::Debug);
        assert_eq!(verbosity(&args(&["cli", "grid.json", "-vv"])), log::LevelFilter::Trace);
    }
}
