//! CLI tool for extracting the title and heading outline of a PDF

use pdf_outline::extract_outline;
use std::env;
use std::fs;
use std::process;
use std::time::Instant;

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: {} <pdf_file> [output_file]", args[0]);
        eprintln!();
        eprintln!("Prints the document title and H1-H6 outline as JSON.");
        eprintln!("Writes to output_file instead of stdout when given.");
        process::exit(1);
    }

    let pdf_path = &args[1];
    let output_file = args.get(2);

    let start = Instant::now();

    let result = match extract_outline(pdf_path) {
        Ok(result) => result,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    let json = match serde_json::to_string_pretty(&result) {
        Ok(json) => json,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    match output_file {
        Some(output) => {
            if let Err(e) = fs::write(output, &json) {
                eprintln!("Error writing {}: {}", output, e);
                process::exit(1);
            }
            eprintln!("File: {}", pdf_path);
            eprintln!("Title: {}", result.title.as_deref().unwrap_or("(none)"));
            eprintln!("Headings: {}", result.outline.len());
            eprintln!("Outline written to: {}", output);
        }
        None => println!("{}", json),
    }

    if result.is_empty() {
        eprintln!("Note: no title or headings found");
    }
    eprintln!("Processing time: {}ms", start.elapsed().as_millis());
}
