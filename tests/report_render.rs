//! Integration tests for PDF report rendering
//!
//! These render real documents into a temp directory and check the
//! written files, not the layout internals.

use postdex::report::{PdfRenderer, NO_RESULTS_LINE};
use tempfile::TempDir;

fn titles(n: usize) -> Vec<String> {
    (1..=n)
        .map(|i| format!("How do I frobnicate the widget? (part {i})"))
        .collect()
}

#[test]
fn writes_a_pdf_to_the_output_directory() {
    let dir = TempDir::new().unwrap();
    let renderer = PdfRenderer::new(dir.path());

    let path = renderer
        .render("above_average.pdf", "Questions with above-average view count", &titles(5))
        .unwrap();

    assert_eq!(path, dir.path().join("above_average.pdf"));
    assert!(path.exists());

    let bytes = std::fs::read(&path).unwrap();
    assert!(bytes.starts_with(b"%PDF"));
    assert!(bytes.len() > 500);
}

#[test]
fn empty_result_sets_still_render_a_document() {
    let dir = TempDir::new().unwrap();
    let renderer = PdfRenderer::new(dir.path());

    let path = renderer
        .render("keyword_titles.pdf", "Questions with short words in the title", &[])
        .unwrap();

    let bytes = std::fs::read(&path).unwrap();
    assert!(bytes.starts_with(b"%PDF"));
    assert!(bytes.len() > 500);

    // The fallback line is part of the public rendering contract
    assert_eq!(NO_RESULTS_LINE, "No matching questions were found.");
}

#[test]
fn long_result_sets_paginate_into_larger_documents() {
    let dir = TempDir::new().unwrap();
    let renderer = PdfRenderer::new(dir.path());

    let short = renderer.render("short.pdf", "Heading", &titles(3)).unwrap();
    let long = renderer.render("long.pdf", "Heading", &titles(150)).unwrap();

    let short_len = std::fs::metadata(&short).unwrap().len();
    let long_len = std::fs::metadata(&long).unwrap().len();
    assert!(long_len > short_len);
}

#[test]
fn both_report_files_can_share_one_directory() {
    let dir = TempDir::new().unwrap();
    let renderer = PdfRenderer::new(dir.path());

    renderer.render("above_average.pdf", "A", &titles(2)).unwrap();
    renderer.render("keyword_titles.pdf", "B", &titles(2)).unwrap();

    let mut entries: Vec<String> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    entries.sort();
    assert_eq!(entries, vec!["above_average.pdf", "keyword_titles.pdf"]);
}
