//! Debug tool: Print assembled lines with the signals the outline heuristics use
//!
//! Usage: debug_lines <pdf_file> [page_number]
//!
//! Prints the document height statistics and title, then each line's height,
//! width and outcome: `skip` for lines failing validation, `title` for lines
//! dropped as the title, otherwise the level the rule table assigns (`-` when
//! no rule matches). Only `H1`-`H6` lines appear in the outline.

use pdf_outline::headings::{level_for, HeightStats, RuleInput};
use pdf_outline::validate::is_valid_line;
use pdf_outline::{
    assemble_lines, collapse_repetition, detect_title, extract_text_runs, OutlineOptions,
};
use std::env;
use std::process;

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: {} <pdf_file> [page_number]", args[0]);
        eprintln!();
        eprintln!("Prints assembled lines with height, width and heading level.");
        eprintln!("If page_number is given, only that page is shown.");
        process::exit(1);
    }

    let pdf_path = &args[1];
    let filter_page: Option<u32> = args.get(2).and_then(|s| s.parse().ok());

    let runs = match extract_text_runs(pdf_path) {
        Ok(runs) => runs,
        Err(e) => {
            eprintln!("Error extracting text: {}", e);
            process::exit(1);
        }
    };

    let options = OutlineOptions::default();
    let lines = assemble_lines(&runs, options.line_y_tolerance);
    if lines.is_empty() {
        eprintln!("No text lines found in PDF.");
        process::exit(0);
    }

    let stats = HeightStats::from_lines(lines.iter().filter(|l| is_valid_line(l)));
    match stats {
        Some(s) => eprintln!(
            "Height stats: max={:.1} min={:.1} avg={:.2}",
            s.max, s.min, s.avg
        ),
        None => eprintln!("Height stats: no valid lines"),
    }
    let title = detect_title(&lines);
    eprintln!("Title: {:?}", title);
    eprintln!();

    let mut current_page = 0u32;
    for line in &lines {
        if filter_page.is_some_and(|p| p != line.page) {
            continue;
        }
        if line.page != current_page {
            current_page = line.page;
            println!("=== PAGE {} ===", current_page);
        }

        let is_title = title.as_deref().is_some_and(|t| {
            collapse_repetition(line.text.trim()).to_lowercase() == t.trim().to_lowercase()
        });
        let valid = is_valid_line(line);
        let level = match (valid, stats) {
            (true, _) if is_title => "title".to_string(),
            (true, Some(stats)) => level_for(&RuleInput {
                height: line.height,
                char_len: line.char_len(),
                stats,
                h1_tolerance: options.h1_height_tolerance,
            })
            .map(|l| l.to_string())
            .unwrap_or_else(|| "-".to_string()),
            _ => "skip".to_string(),
        };

        let preview: String = line.text.chars().take(70).collect();
        println!(
            "  h={:5.1} w={:7.1} {:>5}  {:?}",
            line.height, line.width, level, preview
        );
    }
}
