//! Text run extraction from PDF using lopdf
//!
//! Walks each page's content stream and emits one [`TextRun`] per text-showing
//! operator, with its baseline, rendered size and advance width.

use crate::OutlineError;
use lopdf::{Dictionary, Document, Object, ObjectId};
use std::collections::BTreeMap;
use std::path::Path;

/// Advance used for glyphs without width metrics, in 1/1000 em
const DEFAULT_GLYPH_WIDTH: f32 = 500.0;

/// A positioned text fragment as painted by one text-showing operator
#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    /// The text content
    pub text: String,
    /// Baseline Y in user space after the CTM (points, origin bottom-left,
    /// growing upwards). Only differences between runs are meaningful.
    pub y: f32,
    /// Rendered font size in user space
    pub height: f32,
    /// Advance width of the painted glyphs in user space
    pub width: f32,
    /// Font resource name
    pub font: String,
    /// Page number (1-indexed)
    pub page: u32,
}

/// Extract text runs from a PDF file
pub fn extract_text_runs<P: AsRef<Path>>(path: P) -> Result<Vec<TextRun>, OutlineError> {
    let doc = Document::load(path)?;
    extract_runs_from_doc(&doc)
}

/// Extract text runs from a PDF memory buffer
pub fn extract_text_runs_mem(buffer: &[u8]) -> Result<Vec<TextRun>, OutlineError> {
    let doc = Document::load_mem(buffer)?;
    extract_runs_from_doc(&doc)
}

fn extract_runs_from_doc(doc: &Document) -> Result<Vec<TextRun>, OutlineError> {
    let pages = doc.get_pages();
    let mut all_runs = Vec::new();

    for (page_num, &page_id) in pages.iter() {
        let runs = extract_page_runs(doc, page_id, *page_num)?;
        log::debug!("page {}: {} text runs", page_num, runs.len());
        all_runs.extend(runs);
    }

    Ok(all_runs)
}

/// Multiply two 2D transformation matrices
/// Matrix format: [a, b, c, d, e, f] representing:
/// | a  b  0 |
/// | c  d  0 |
/// | e  f  1 |
fn multiply_matrices(m1: &[f32; 6], m2: &[f32; 6]) -> [f32; 6] {
    [
        m1[0] * m2[0] + m1[1] * m2[2],
        m1[0] * m2[1] + m1[1] * m2[3],
        m1[2] * m2[0] + m1[3] * m2[2],
        m1[2] * m2[1] + m1[3] * m2[3],
        m1[4] * m2[0] + m1[5] * m2[2] + m2[4],
        m1[4] * m2[1] + m1[5] * m2[3] + m2[5],
    ]
}

/// Glyph width table of a font
#[derive(Debug, Clone, Default)]
struct FontMetrics {
    first_char: u32,
    widths: Vec<f32>,
    /// Composite (Type0) fonts use two-byte codes
    two_byte: bool,
}

impl FontMetrics {
    fn from_dict(doc: &Document, dict: &Dictionary) -> Self {
        let two_byte = dict
            .get(b"Subtype")
            .and_then(|o| o.as_name())
            .map(|name| name == b"Type0")
            .unwrap_or(false);

        let first_char = dict
            .get(b"FirstChar")
            .ok()
            .and_then(|o| o.as_i64().ok())
            .unwrap_or(0)
            .max(0) as u32;

        let widths = dict
            .get(b"Widths")
            .ok()
            .map(|o| resolve(doc, o))
            .and_then(|o| o.as_array().ok())
            .map(|arr| {
                arr.iter()
                    .map(|w| get_number(resolve(doc, w)).unwrap_or(DEFAULT_GLYPH_WIDTH))
                    .collect()
            })
            .unwrap_or_default();

        FontMetrics {
            first_char,
            widths,
            two_byte,
        }
    }

    /// Width of a string operand in 1/1000 em
    fn string_width(&self, bytes: &[u8], decoded: &str) -> f32 {
        if self.two_byte || self.widths.is_empty() {
            return decoded.chars().count() as f32 * DEFAULT_GLYPH_WIDTH;
        }
        bytes
            .iter()
            .map(|&b| {
                (b as u32)
                    .checked_sub(self.first_char)
                    .and_then(|i| self.widths.get(i as usize).copied())
                    .filter(|w| *w > 0.0)
                    .unwrap_or(DEFAULT_GLYPH_WIDTH)
            })
            .sum()
    }
}

/// Follow an indirect reference, returning the object itself otherwise
fn resolve<'a>(doc: &'a Document, obj: &'a Object) -> &'a Object {
    match obj {
        Object::Reference(id) => doc.get_object(*id).unwrap_or(obj),
        _ => obj,
    }
}

/// Text state shared by the text-showing operators
struct TextState {
    ctm: [f32; 6],
    text_matrix: [f32; 6],
    line_matrix: [f32; 6],
    font: String,
    font_size: f32,
    leading: f32,
}

impl TextState {
    fn new() -> Self {
        Self {
            ctm: IDENTITY,
            text_matrix: IDENTITY,
            line_matrix: IDENTITY,
            font: String::new(),
            font_size: 12.0,
            leading: 0.0,
        }
    }

    /// Move to the next line by the current leading (`TL`, default 0)
    fn next_line(&mut self) {
        self.line_matrix[5] -= self.leading;
        self.text_matrix = self.line_matrix;
    }

    /// Build a run for `text` painted at the current text position
    ///
    /// Baseline, height and width are all measured in user space (text matrix
    /// combined with the CTM).
    fn run(&self, text: String, advance: f32, page: u32) -> TextRun {
        let combined = multiply_matrices(&self.text_matrix, &self.ctm);
        let rendered_size = effective_font_size(self.font_size, &combined);
        let scale_x = (combined[0].powi(2) + combined[1].powi(2)).sqrt();
        TextRun {
            text,
            y: combined[5],
            height: rendered_size,
            width: advance / 1000.0 * self.font_size * scale_x,
            font: self.font.clone(),
            page,
        }
    }
}

const IDENTITY: [f32; 6] = [1.0, 0.0, 0.0, 1.0, 0.0, 0.0];

/// Extract text runs from a single page
fn extract_page_runs(
    doc: &Document,
    page_id: ObjectId,
    page_num: u32,
) -> Result<Vec<TextRun>, OutlineError> {
    use lopdf::content::Content;

    let mut runs = Vec::new();

    let fonts = doc.get_page_fonts(page_id).unwrap_or_default();
    let mut metrics: BTreeMap<Vec<u8>, FontMetrics> = BTreeMap::new();

    let content_data = doc
        .get_page_content(page_id)
        .map_err(|e| OutlineError::Parse(e.to_string()))?;

    let content = Content::decode(&content_data).map_err(|e| OutlineError::Parse(e.to_string()))?;

    let mut state = TextState::new();
    let mut ctm_stack: Vec<[f32; 6]> = Vec::new();
    let mut in_text_block = false;

    for op in &content.operations {
        match op.operator.as_str() {
            "q" => ctm_stack.push(state.ctm),
            "Q" => {
                if let Some(saved) = ctm_stack.pop() {
                    state.ctm = saved;
                }
            }
            "cm" => {
                if op.operands.len() >= 6 {
                    let m = read_matrix(&op.operands);
                    state.ctm = multiply_matrices(&m, &state.ctm);
                }
            }
            "BT" => {
                in_text_block = true;
                state.text_matrix = IDENTITY;
                state.line_matrix = IDENTITY;
            }
            "ET" => in_text_block = false,
            "Tf" => {
                if op.operands.len() >= 2 {
                    if let Ok(name) = op.operands[0].as_name() {
                        state.font = String::from_utf8_lossy(name).to_string();
                        if !metrics.contains_key(name) {
                            let m = fonts
                                .get(name)
                                .map(|dict| FontMetrics::from_dict(doc, dict))
                                .unwrap_or_default();
                            metrics.insert(name.to_vec(), m);
                        }
                    }
                    if let Some(size) = get_number(&op.operands[1]) {
                        state.font_size = size;
                    }
                }
            }
            "TL" => {
                if let Some(leading) = op.operands.first().and_then(get_number) {
                    state.leading = leading;
                }
            }
            "Td" | "TD" => {
                if op.operands.len() >= 2 {
                    let tx = get_number(&op.operands[0]).unwrap_or(0.0);
                    let ty = get_number(&op.operands[1]).unwrap_or(0.0);
                    if op.operator == "TD" {
                        state.leading = -ty;
                    }
                    state.line_matrix[4] += tx;
                    state.line_matrix[5] += ty;
                    state.text_matrix = state.line_matrix;
                }
            }
            "Tm" => {
                if op.operands.len() >= 6 {
                    state.text_matrix = read_matrix(&op.operands);
                    state.line_matrix = state.text_matrix;
                }
            }
            "T*" => state.next_line(),
            "Tj" | "'" | "\"" => {
                if op.operator == "Tj" && !in_text_block {
                    continue;
                }
                if op.operator != "Tj" {
                    state.next_line();
                }
                // '"' carries word and char spacing before the string
                let operand = if op.operator == "\"" {
                    op.operands.get(2)
                } else {
                    op.operands.first()
                };
                if let Some(operand) = operand {
                    let font_metrics = metrics.get(state.font.as_bytes());
                    if let Some((text, advance)) =
                        show_string(operand, doc, &fonts, &state.font, font_metrics)
                    {
                        if !text.trim().is_empty() {
                            runs.push(state.run(text, advance, page_num));
                        }
                    }
                }
            }
            "TJ" => {
                if !in_text_block {
                    continue;
                }
                if let Some(Ok(array)) = op.operands.first().map(|o| o.as_array()) {
                    let font_metrics = metrics.get(state.font.as_bytes());
                    let mut combined_text = String::new();
                    let mut advance = 0.0f32;
                    for item in array {
                        if let Some((text, w)) =
                            show_string(item, doc, &fonts, &state.font, font_metrics)
                        {
                            combined_text.push_str(&text);
                            advance += w;
                        } else if let Some(kern) = get_number(item) {
                            // Positive adjustments move the next glyph left
                            advance -= kern;
                        }
                    }
                    if !combined_text.trim().is_empty() {
                        runs.push(state.run(combined_text, advance.max(0.0), page_num));
                    }
                }
            }
            _ => {}
        }
    }

    Ok(runs)
}

fn read_matrix(operands: &[Object]) -> [f32; 6] {
    let mut m = IDENTITY;
    for (i, operand) in operands.iter().take(6).enumerate() {
        m[i] = get_number(operand).unwrap_or(IDENTITY[i]);
    }
    m
}

/// Helper to get f32 from Object
fn get_number(obj: &Object) -> Option<f32> {
    match obj {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r),
        _ => None,
    }
}

/// Compute effective font size from base size and text matrix
/// Text matrix is [a, b, c, d, tx, ty] where a,d are scale factors
fn effective_font_size(base_size: f32, text_matrix: &[f32; 6]) -> f32 {
    let scale_x = (text_matrix[0].powi(2) + text_matrix[1].powi(2)).sqrt();
    let scale_y = (text_matrix[2].powi(2) + text_matrix[3].powi(2)).sqrt();
    base_size * scale_x.max(scale_y)
}

/// Decode a string operand and measure its advance in 1/1000 em
fn show_string(
    obj: &Object,
    doc: &Document,
    fonts: &BTreeMap<Vec<u8>, &Dictionary>,
    current_font: &str,
    metrics: Option<&FontMetrics>,
) -> Option<(String, f32)> {
    let Object::String(bytes, _) = obj else {
        return None;
    };
    let text = decode_string(bytes, doc, fonts, current_font);
    let advance = match metrics {
        Some(m) => m.string_width(bytes, &text),
        None => text.chars().count() as f32 * DEFAULT_GLYPH_WIDTH,
    };
    Some((text, advance))
}

/// Decode string bytes using the font encoding, falling back to UTF-16BE or Latin-1
fn decode_string(
    bytes: &[u8],
    doc: &Document,
    fonts: &BTreeMap<Vec<u8>, &Dictionary>,
    current_font: &str,
) -> String {
    if let Some(font_dict) = fonts.get(current_font.as_bytes()) {
        if let Ok(encoding) = font_dict.get_font_encoding(doc) {
            if let Ok(text) = Document::decode_text(&encoding, bytes) {
                return text;
            }
        }
    }

    if bytes.len() >= 2 && bytes[0] == 0xFE && bytes[1] == 0xFF {
        let utf16: Vec<u16> = bytes[2..]
            .chunks_exact(2)
            .map(|chunk| u16::from_be_bytes([chunk[0], chunk[1]]))
            .collect();
        return String::from_utf16_lossy(&utf16);
    }

    bytes.iter().map(|&b| b as char).collect()
}
