//! Paginated PDF rendering for title lists
//!
//! Every report follows the same layout: an 18pt centered heading on the
//! first page, then one numbered 12pt line per title, flowing onto
//! additional pages as needed. An empty result set renders a single
//! fixed line instead of the list.

use super::ReportError;
use crate::util::clip_line;
use printpdf::{BuiltinFont, Mm, PdfDocument};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::info;

// A4 portrait
const PAGE_WIDTH_MM: f32 = 210.0;
const PAGE_HEIGHT_MM: f32 = 297.0;
const MARGIN_MM: f32 = 20.0;

const HEADING_SIZE_PT: f32 = 18.0;
const BODY_SIZE_PT: f32 = 12.0;

/// Vertical advance between body lines
const LINE_HEIGHT_MM: f32 = 7.0;
/// Gap between the heading baseline and the first body line
const HEADING_BLOCK_MM: f32 = 16.0;
/// Longest body line that still fits between the margins at 12pt
const LINE_CHAR_BUDGET: usize = 80;

/// Line rendered when a query matched nothing
pub const NO_RESULTS_LINE: &str = "No matching questions were found.";

/// Renders title lists into PDF files under a fixed output directory
pub struct PdfRenderer {
    output_dir: PathBuf,
}

impl PdfRenderer {
    /// The directory must already exist; the caller creates it.
    pub fn new(output_dir: impl AsRef<Path>) -> Self {
        Self {
            output_dir: output_dir.as_ref().to_path_buf(),
        }
    }

    /// Render `items` as a numbered list under `heading` and write the
    /// document to `file_name` inside the output directory.
    pub fn render(
        &self,
        file_name: &str,
        heading: &str,
        items: &[String],
    ) -> Result<PathBuf, ReportError> {
        let lines = numbered_lines(items);

        let (doc, first_page, first_layer) = PdfDocument::new(
            heading,
            Mm(PAGE_WIDTH_MM),
            Mm(PAGE_HEIGHT_MM),
            "content",
        );
        let body_font = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|e| ReportError::Render(e.to_string()))?;
        let heading_font = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(|e| ReportError::Render(e.to_string()))?;

        let heading_x = ((PAGE_WIDTH_MM - text_width_mm(heading, HEADING_SIZE_PT)) / 2.0)
            .max(MARGIN_MM);
        doc.get_page(first_page).get_layer(first_layer).use_text(
            heading,
            HEADING_SIZE_PT,
            Mm(heading_x),
            Mm(PAGE_HEIGHT_MM - MARGIN_MM),
            &heading_font,
        );

        let mut next_line = 0;
        for (page_index, &count) in paginate(lines.len()).iter().enumerate() {
            let layer = if page_index == 0 {
                doc.get_page(first_page).get_layer(first_layer)
            } else {
                let (page, layer) = doc.add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "content");
                doc.get_page(page).get_layer(layer)
            };

            let mut y = PAGE_HEIGHT_MM
                - MARGIN_MM
                - if page_index == 0 { HEADING_BLOCK_MM } else { 0.0 };
            for line in &lines[next_line..next_line + count] {
                layer.use_text(line.as_str(), BODY_SIZE_PT, Mm(MARGIN_MM), Mm(y), &body_font);
                y -= LINE_HEIGHT_MM;
            }
            next_line += count;
        }

        let path = self.output_dir.join(file_name);
        let mut writer = BufWriter::new(File::create(&path)?);
        doc.save(&mut writer)
            .map_err(|e| ReportError::Render(e.to_string()))?;
        // Surface flush failures here instead of losing them on drop
        writer.flush()?;

        info!("Wrote {} ({} entries)", path.display(), items.len());
        Ok(path)
    }
}

/// Number the items, or fall back to the fixed no-results line
fn numbered_lines(items: &[String]) -> Vec<String> {
    if items.is_empty() {
        return vec![NO_RESULTS_LINE.to_string()];
    }
    items
        .iter()
        .enumerate()
        .map(|(i, item)| clip_line(&format!("{}. {}", i + 1, item), LINE_CHAR_BUDGET))
        .collect()
}

/// Body lines that fit on one page. The first page loses room to the
/// heading block.
fn lines_per_page(first_page: bool) -> usize {
    let heading_block = if first_page { HEADING_BLOCK_MM } else { 0.0 };
    let usable = PAGE_HEIGHT_MM - 2.0 * MARGIN_MM - heading_block;
    (usable / LINE_HEIGHT_MM).floor() as usize + 1
}

/// Split `total` lines into per-page counts
fn paginate(total: usize) -> Vec<usize> {
    let first = lines_per_page(true);
    let mut pages = vec![total.min(first)];

    let per_page = lines_per_page(false);
    let mut remaining = total.saturating_sub(first);
    while remaining > 0 {
        let count = remaining.min(per_page);
        pages.push(count);
        remaining -= count;
    }
    pages
}

/// Approximate width of a Helvetica run: the average glyph advance is
/// close to half the point size, and one point is 0.3528 mm.
fn text_width_mm(text: &str, size_pt: f32) -> f32 {
    text.chars().count() as f32 * size_pt * 0.5 * 0.3528
}

#[cfg(test)]
mod tests {
    use super::*;

    fn titles(n: usize) -> Vec<String> {
        (1..=n).map(|i| format!("Question number {i}")).collect()
    }

    #[test]
    fn numbers_every_line() {
        let lines = numbered_lines(&titles(2));
        assert_eq!(lines, vec!["1. Question number 1", "2. Question number 2"]);
    }

    #[test]
    fn empty_lists_become_the_no_results_line() {
        assert_eq!(numbered_lines(&[]), vec![NO_RESULTS_LINE]);
    }

    #[test]
    fn long_lines_are_clipped_to_the_page_width() {
        let long = vec!["x".repeat(200)];
        let lines = numbered_lines(&long);
        assert_eq!(lines[0].chars().count(), LINE_CHAR_BUDGET);
        assert!(lines[0].ends_with("..."));
    }

    #[test]
    fn paginates_at_page_boundaries() {
        let first = lines_per_page(true);
        let rest = lines_per_page(false);
        assert!(first < rest);

        assert_eq!(paginate(1), vec![1]);
        assert_eq!(paginate(first), vec![first]);
        assert_eq!(paginate(first + 1), vec![first, 1]);
        assert_eq!(paginate(first + rest + 5), vec![first, rest, 5]);
    }

    #[test]
    fn renders_a_numbered_document() {
        let dir = tempfile::tempdir().unwrap();
        let renderer = PdfRenderer::new(dir.path());

        let path = renderer
            .render("list.pdf", "Test heading", &titles(3))
            .unwrap();

        assert!(path.exists());
        let bytes = std::fs::read(&path).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn renders_a_document_for_empty_results() {
        let dir = tempfile::tempdir().unwrap();
        let renderer = PdfRenderer::new(dir.path());

        let path = renderer.render("empty.pdf", "Nothing here", &[]).unwrap();
        assert!(std::fs::read(&path).unwrap().starts_with(b"%PDF"));
    }

    #[test]
    fn long_lists_flow_onto_extra_pages() {
        let dir = tempfile::tempdir().unwrap();
        let renderer = PdfRenderer::new(dir.path());

        let short = renderer.render("short.pdf", "Heading", &titles(3)).unwrap();
        let long = renderer.render("long.pdf", "Heading", &titles(120)).unwrap();

        let short_len = std::fs::metadata(&short).unwrap().len();
        let long_len = std::fs::metadata(&long).unwrap().len();
        assert!(long_len > short_len);
    }
}
