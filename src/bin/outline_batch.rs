//! CLI tool for extracting outlines from every PDF in a directory

use clap::Parser;
use pdf_outline::{run_batch, BatchOptions, DocumentStatus, OutlineOptions};
use std::path::PathBuf;
use std::process;

#[derive(Parser)]
#[command(name = "outline-batch", about = "Write a JSON outline for each PDF in a directory")]
struct Args {
    /// Directory containing the PDF files
    #[arg(short, long, default_value = "./input")]
    input: PathBuf,

    /// Directory receiving <name>.json results
    #[arg(short, long, default_value = "./output")]
    output: PathBuf,

    /// Do not write files for documents without title or headings
    #[arg(long)]
    skip_empty: bool,

    /// Baseline tolerance for merging runs into one line
    #[arg(long, default_value_t = pdf_outline::LINE_Y_TOLERANCE)]
    line_tolerance: f32,

    /// Height tolerance below the tallest line for H1
    #[arg(long, default_value_t = pdf_outline::H1_HEIGHT_TOLERANCE)]
    h1_tolerance: f32,
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    let options = BatchOptions {
        write_empty: !args.skip_empty,
        outline: OutlineOptions {
            line_y_tolerance: args.line_tolerance,
            h1_height_tolerance: args.h1_tolerance,
        },
        ..BatchOptions::new(args.input, args.output)
    };

    let summary = match run_batch(&options) {
        Ok(summary) => summary,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    for report in &summary.reports {
        let name = report
            .source
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        match &report.status {
            DocumentStatus::Written {
                has_title,
                headings,
            } => println!(
                "Processed: {} ({} headings{})",
                name,
                headings,
                if *has_title { ", titled" } else { "" }
            ),
            DocumentStatus::Empty => println!("Empty: {} (no title or headings)", name),
            DocumentStatus::Failed(reason) => eprintln!("Failed to process {}: {}", name, reason),
        }
    }

    println!(
        "processing: {}ms ({} written, {} empty, {} failed)",
        summary.elapsed.as_millis(),
        summary.written(),
        summary.empty(),
        summary.failed()
    );

    if summary.failed() > 0 {
        process::exit(1);
    }
}
