//! Directory batch processing
//!
//! Every `*.pdf` in the input directory is processed independently (in
//! parallel with rayon) and its outline written as `<stem>.json` into the
//! output directory. A document that fails to decode is reported and skipped;
//! it never stops the rest of the batch. When two inputs map to the same output
//! name (`report.pdf` and `report.PDF`), only the first in name order is
//! processed and the others are reported as failed.

use crate::outline::{OutlineOptions, OutlineResult};
use crate::{extract_outline_with_options, OutlineError};
use rayon::prelude::*;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// Options for a batch run
#[derive(Debug, Clone)]
pub struct BatchOptions {
    /// Directory scanned for PDF files (not recursive)
    pub input_dir: PathBuf,
    /// Directory receiving one JSON file per document
    pub output_dir: PathBuf,
    /// Write a result file even when no title and no heading was found
    pub write_empty: bool,
    /// Engine options applied to every document
    pub outline: OutlineOptions,
}

impl BatchOptions {
    pub fn new<I: Into<PathBuf>, O: Into<PathBuf>>(input_dir: I, output_dir: O) -> Self {
        Self {
            input_dir: input_dir.into(),
            output_dir: output_dir.into(),
            write_empty: true,
            outline: OutlineOptions::default(),
        }
    }
}

/// Outcome for a single document
#[derive(Debug, Clone, PartialEq)]
pub enum DocumentStatus {
    /// Outline written
    Written { has_title: bool, headings: usize },
    /// Neither title nor headings found
    Empty,
    /// Could not be decoded or written
    Failed(String),
}

#[derive(Debug, Clone)]
pub struct DocumentReport {
    pub source: PathBuf,
    /// Path of the written JSON file, if any
    pub output: Option<PathBuf>,
    pub status: DocumentStatus,
}

#[derive(Debug)]
pub struct BatchSummary {
    /// One report per discovered PDF, in file name order
    pub reports: Vec<DocumentReport>,
    pub elapsed: Duration,
}

impl BatchSummary {
    pub fn written(&self) -> usize {
        self.count(|s| matches!(s, DocumentStatus::Written { .. }))
    }

    pub fn empty(&self) -> usize {
        self.count(|s| matches!(s, DocumentStatus::Empty))
    }

    pub fn failed(&self) -> usize {
        self.count(|s| matches!(s, DocumentStatus::Failed(_)))
    }

    fn count(&self, pred: impl Fn(&DocumentStatus) -> bool) -> usize {
        self.reports.iter().filter(|r| pred(&r.status)).count()
    }
}

/// Check for a `.pdf` extension, ignoring case
fn is_pdf(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("pdf"))
}

/// List the PDF files of a directory, sorted by path
pub fn discover_pdfs(dir: &Path) -> Result<Vec<PathBuf>, OutlineError> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && is_pdf(&path) {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Output path for a source document
pub fn output_path_for(source: &Path, output_dir: &Path) -> PathBuf {
    let stem = source
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string());
    output_dir.join(format!("{}.json", stem))
}

/// For each source, the earlier source whose output path it would overwrite
///
/// Output names are compared case-insensitively so results also stay apart on
/// case-insensitive file systems.
pub fn find_output_collisions(sources: &[PathBuf], output_dir: &Path) -> Vec<Option<PathBuf>> {
    let mut claimed: HashMap<String, &PathBuf> = HashMap::new();
    sources
        .iter()
        .map(|source| {
            let key = output_path_for(source, output_dir)
                .to_string_lossy()
                .to_lowercase();
            match claimed.get(&key) {
                Some(first) => Some((*first).clone()),
                None => {
                    claimed.insert(key, source);
                    None
                }
            }
        })
        .collect()
}

fn write_result(result: &OutlineResult, path: &Path) -> Result<(), OutlineError> {
    let json = serde_json::to_string_pretty(result)?;
    fs::write(path, json)?;
    Ok(())
}

fn process_document(source: &Path, options: &BatchOptions) -> DocumentReport {
    let failed = |e: OutlineError| {
        log::warn!("failed to process {}: {}", source.display(), e);
        DocumentReport {
            source: source.to_path_buf(),
            output: None,
            status: DocumentStatus::Failed(e.to_string()),
        }
    };

    let result = match extract_outline_with_options(source, &options.outline) {
        Ok(result) => result,
        Err(e) => return failed(e),
    };

    let status = if result.is_empty() {
        DocumentStatus::Empty
    } else {
        DocumentStatus::Written {
            has_title: result.title.is_some(),
            headings: result.outline.len(),
        }
    };

    if status == DocumentStatus::Empty && !options.write_empty {
        log::info!("{}: no title or headings, skipped", source.display());
        return DocumentReport {
            source: source.to_path_buf(),
            output: None,
            status,
        };
    }

    let output = output_path_for(source, &options.output_dir);
    if let Err(e) = write_result(&result, &output) {
        return failed(e);
    }
    log::info!("{} -> {}", source.display(), output.display());

    DocumentReport {
        source: source.to_path_buf(),
        output: Some(output),
        status,
    }
}

/// Process every PDF of `options.input_dir`
///
/// Only directory-level problems (missing input, unwritable output directory)
/// are returned as errors; per-document failures end up in the summary.
pub fn run_batch(options: &BatchOptions) -> Result<BatchSummary, OutlineError> {
    let start = Instant::now();

    let files = discover_pdfs(&options.input_dir)?;
    fs::create_dir_all(&options.output_dir)?;
    log::info!(
        "processing {} PDF files from {}",
        files.len(),
        options.input_dir.display()
    );

    let collisions = find_output_collisions(&files, &options.output_dir);

    let reports: Vec<DocumentReport> = files
        .par_iter()
        .zip(collisions.par_iter())
        .map(|(path, collision)| match collision {
            Some(first) => {
                log::warn!(
                    "skipping {}: output name collides with {}",
                    path.display(),
                    first.display()
                );
                DocumentReport {
                    source: path.clone(),
                    output: None,
                    status: DocumentStatus::Failed(format!(
                        "output name collides with {}",
                        first.display()
                    )),
                }
            }
            None => process_document(path, options),
        })
        .collect();

    Ok(BatchSummary {
        reports,
        elapsed: start.elapsed(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_pdf() {
        assert!(is_pdf(Path::new("report.pdf")));
        assert!(is_pdf(Path::new("REPORT.PDF")));
        assert!(!is_pdf(Path::new("report.json")));
        assert!(!is_pdf(Path::new("pdf")));
    }

    #[test]
    fn test_output_path_for() {
        let out = output_path_for(Path::new("/in/file02.pdf"), Path::new("/out"));
        assert_eq!(out, PathBuf::from("/out/file02.json"));
    }

    #[test]
    fn test_find_output_collisions() {
        let sources = vec![
            PathBuf::from("/in/report.PDF"),
            PathBuf::from("/in/report.pdf"),
            PathBuf::from("/in/summary.pdf"),
            PathBuf::from("/in/Report.pdf"),
        ];
        let collisions = find_output_collisions(&sources, Path::new("/out"));
        assert_eq!(
            collisions,
            vec![
                None,
                Some(PathBuf::from("/in/report.PDF")),
                None,
                Some(PathBuf::from("/in/report.PDF")),
            ]
        );
    }

    #[test]
    fn test_batch_options_new() {
        let opts = BatchOptions::new("in", "out");
        assert!(opts.write_empty);
        assert_eq!(opts.input_dir, PathBuf::from("in"));
        assert_eq!(opts.outline.line_y_tolerance, 2.0);
    }
}
