use lopdf::{Document as LoDocument, Dictionary, Object};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PdfInspectError {
    pub message: String,
}

impl std::fmt::Display for PdfInspectError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "pdf inspection failed: {}", self.message)
    }
}

impl std::error::Error for PdfInspectError {}

/// What a produced document looks like from the outside: enough to verify a
/// render before distributing it.
#[derive(Debug, Clone, PartialEq)]
pub struct PdfInspectReport {
    pub version: String,
    pub page_count: usize,
    pub encrypted: bool,
    pub media_box: Option<(f32, f32)>,
    pub fonts: Vec<String>,
    pub file_size_bytes: usize,
}

pub fn inspect_pdf_bytes(bytes: &[u8]) -> Result<PdfInspectReport, PdfInspectError> {
    let pdf = LoDocument::load_mem(bytes).map_err(|err| PdfInspectError {
        message: err.to_string(),
    })?;

    let mut media_box = None;
    let mut fonts: Vec<String> = Vec::new();
    for (_, page_id) in pdf.get_pages() {
        let Ok(page) = pdf.get_dictionary(page_id) else {
            continue;
        };
        if media_box.is_none() {
            media_box = read_media_box(page);
        }
        collect_fonts(&pdf, page, &mut fonts);
    }
    fonts.sort();
    fonts.dedup();

    Ok(PdfInspectReport {
        version: pdf.version.clone(),
        page_count: pdf.get_pages().len(),
        encrypted: pdf.is_encrypted(),
        media_box,
        fonts,
        file_size_bytes: bytes.len(),
    })
}

pub fn inspect_pdf_path(path: &Path) -> Result<PdfInspectReport, PdfInspectError> {
    let data = std::fs::read(path).map_err(|err| PdfInspectError {
        message: err.to_string(),
    })?;
    inspect_pdf_bytes(&data)
}

fn read_media_box(page: &Dictionary) -> Option<(f32, f32)> {
    let values = page.get(b"MediaBox").ok()?.as_array().ok()?;
    if values.len() != 4 {
        return None;
    }
    let x0 = number(&values[0])?;
    let y0 = number(&values[1])?;
    let x1 = number(&values[2])?;
    let y1 = number(&values[3])?;
    Some((x1 - x0, y1 - y0))
}

fn collect_fonts(pdf: &LoDocument, page: &Dictionary, fonts: &mut Vec<String>) {
    let resources = match page.get(b"Resources") {
        Ok(Object::Reference(id)) => match pdf.get_dictionary(*id) {
            Ok(dict) => dict,
            Err(_) => return,
        },
        Ok(Object::Dictionary(dict)) => dict,
        _ => return,
    };
    let font_dict = match resources.get(b"Font") {
        Ok(Object::Reference(id)) => match pdf.get_dictionary(*id) {
            Ok(dict) => dict,
            Err(_) => return,
        },
        Ok(Object::Dictionary(dict)) => dict,
        _ => return,
    };
    for (_, value) in font_dict.iter() {
        let font = match value {
            Object::Reference(id) => match pdf.get_dictionary(*id) {
                Ok(dict) => dict,
                Err(_) => continue,
            },
            Object::Dictionary(dict) => dict,
            _ => continue,
        };
        if let Ok(Object::Name(name)) = font.get(b"BaseFont") {
            fonts.push(String::from_utf8_lossy(name).to_string());
        }
    }
}

fn number(object: &Object) -> Option<f32> {
    match object {
        Object::Integer(value) => Some(*value as f32),
        Object::Real(value) => Some(*value as f32),
        _ => None,
    }
}
