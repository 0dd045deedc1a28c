use crate::canvas::{Command, Document};
use crate::types::{Color, Pt, Size};
use std::io::{self, Write};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Portrait,
    Landscape,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PageFormat {
    A3,
    A4,
    A5,
    Letter,
    Legal,
    Custom(f32, f32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unit {
    Pt,
    Mm,
    In,
    Px,
}

impl Unit {
    fn to_pt(self, value: f32) -> f32 {
        match self {
            Unit::Pt => value,
            Unit::Mm => value * 72.0 / 25.4,
            Unit::In => value * 72.0,
            Unit::Px => value * 72.0 / 96.0,
        }
    }
}

// Page/output options. These only shape the canvas and writer; the box
// pipeline never reads them.
#[derive(Debug, Clone)]
pub(crate) struct PdfOptions {
    pub orientation: Orientation,
    pub format: PageFormat,
    pub unit: Unit,
    pub precision: u8,
    pub put_only_used_fonts: bool,
    pub compress: bool,
}

impl Default for PdfOptions {
    fn default() -> Self {
        Self {
            orientation: Orientation::Portrait,
            format: PageFormat::A4,
            unit: Unit::Pt,
            precision: 3,
            put_only_used_fonts: true,
            compress: false,
        }
    }
}

impl PdfOptions {
    pub fn page_size(&self) -> Size {
        let base = match self.format {
            PageFormat::A3 => Size::from_mm(297.0, 420.0),
            PageFormat::A4 => Size::a4(),
            PageFormat::A5 => Size::from_mm(148.0, 210.0),
            PageFormat::Letter => Size::letter(),
            PageFormat::Legal => Size::from_inches(8.5, 14.0),
            PageFormat::Custom(width, height) => Size {
                width: Pt::from_f32(self.unit.to_pt(width)),
                height: Pt::from_f32(self.unit.to_pt(height)),
            },
        };
        match self.orientation {
            Orientation::Portrait => base,
            Orientation::Landscape => {
                if base.width < base.height {
                    Size {
                        width: base.height,
                        height: base.width,
                    }
                } else {
                    base
                }
            }
        }
    }
}

// 4/3 * (sqrt(2) - 1): cubic Bezier approximation of a quarter circle.
const CORNER_KAPPA: f32 = 0.552_284_75;

// Helvetica ascender 718 / descender 207 per 1000 units; a middle-anchored
// baseline sits half that span below the anchor.
const MIDDLE_TO_BASELINE: f32 = (0.718 - 0.207) / 2.0;

#[derive(Debug, Clone)]
struct StreamState {
    fill: Color,
    text: Color,
    font_name: String,
    font_size: Pt,
}

impl Default for StreamState {
    fn default() -> Self {
        Self {
            fill: Color::WHITE,
            text: Color::BLACK,
            font_name: "Helvetica".to_string(),
            font_size: Pt::from_f32(12.0),
        }
    }
}

pub(crate) fn document_to_pdf(document: &Document, options: &PdfOptions) -> io::Result<Vec<u8>> {
    let mut out = Vec::new();
    document_to_writer(document, options, &mut out)?;
    Ok(out)
}

pub(crate) fn document_to_writer<W: Write>(
    document: &Document,
    options: &PdfOptions,
    writer: &mut W,
) -> io::Result<()> {
    // Content streams come first so the font table holds exactly what the
    // pages use.
    let mut used_fonts: Vec<String> = Vec::new();
    if !options.put_only_used_fonts {
        used_fonts.push("Helvetica".to_string());
    }
    let contents: Vec<Vec<u8>> = document
        .pages
        .iter()
        .map(|page| {
            let stream =
                render_commands(&page.commands, document.page_size.height, options, &mut used_fonts);
            if options.compress {
                flate_stored(stream.as_bytes())
            } else {
                stream.into_bytes()
            }
        })
        .collect();

    // Object layout: 1 catalog, 2 page tree, 3 resources, fonts, then
    // content/page pairs, info last.
    let first_page_id = 4 + used_fonts.len();
    let info_id = first_page_id + document.pages.len() * 2;
    let size = info_id + 1;

    let mut offset = 0usize;
    let mut offsets = vec![0usize; size];
    write_bytes(writer, b"%PDF-1.4\n", &mut offset)?;
    write_bytes(writer, b"%\xE2\xE3\xCF\xD3\n", &mut offset)?;

    write_object(
        writer,
        &mut offset,
        &mut offsets,
        1,
        "<< /Type /Catalog /Pages 2 0 R >>",
    )?;

    let kids: Vec<String> = (0..document.pages.len())
        .map(|index| format!("{} 0 R", first_page_id + 2 * index + 1))
        .collect();
    write_object(
        writer,
        &mut offset,
        &mut offsets,
        2,
        &format!(
            "<< /Type /Pages /Kids [{}] /Count {} >>",
            kids.join(" "),
            document.pages.len()
        ),
    )?;

    let font_entries: Vec<String> = used_fonts
        .iter()
        .enumerate()
        .map(|(index, _)| format!("/F{} {} 0 R", index + 1, 4 + index))
        .collect();
    write_object(
        writer,
        &mut offset,
        &mut offsets,
        3,
        &format!("<< /Font << {} >> >>", font_entries.join(" ")),
    )?;

    for (index, name) in used_fonts.iter().enumerate() {
        write_object(writer, &mut offset, &mut offsets, 4 + index, &font_object(name))?;
    }

    let media_box = format!(
        "[0 0 {} {}]",
        fmt_pt(document.page_size.width, 3),
        fmt_pt(document.page_size.height, 3)
    );
    for (index, data) in contents.iter().enumerate() {
        let content_id = first_page_id + 2 * index;
        let page_id = content_id + 1;
        let filter = if options.compress {
            " /Filter /FlateDecode"
        } else {
            ""
        };
        write_stream_object(writer, &mut offset, &mut offsets, content_id, filter, data)?;
        write_object(
            writer,
            &mut offset,
            &mut offsets,
            page_id,
            &format!(
                "<< /Type /Page /Parent 2 0 R /MediaBox {} /Resources 3 0 R /Contents {} 0 R >>",
                media_box, content_id
            ),
        )?;
    }

    write_object(
        writer,
        &mut offset,
        &mut offsets,
        info_id,
        "<< /Producer (boxpress) >>",
    )?;

    let xref_start = offset;
    write_str(writer, &format!("xref\n0 {}\n", size), &mut offset)?;
    write_str(writer, "0000000000 65535 f \n", &mut offset)?;
    for id in 1..size {
        write_str(writer, &format!("{:010} 00000 n \n", offsets[id]), &mut offset)?;
    }
    write_str(
        writer,
        &format!(
            "trailer\n<< /Size {} /Root 1 0 R /Info {} 0 R >>\nstartxref\n{}\n%%EOF",
            size, info_id, xref_start
        ),
        &mut offset,
    )?;
    Ok(())
}

fn render_commands(
    commands: &[Command],
    page_height: Pt,
    options: &PdfOptions,
    used_fonts: &mut Vec<String>,
) -> String {
    let precision = options.precision;
    let mut out = String::new();
    let mut state = StreamState::default();
    let mut stack: Vec<StreamState> = Vec::new();

    for cmd in commands {
        match cmd {
            Command::SaveState => {
                stack.push(state.clone());
                out.push_str("q\n");
            }
            Command::RestoreState => {
                if let Some(previous) = stack.pop() {
                    state = previous;
                    out.push_str("Q\n");
                }
            }
            Command::SetFillColor(color) => state.fill = *color,
            Command::SetTextColor(color) => state.text = *color,
            Command::SetFontName(name) => state.font_name = name.clone(),
            Command::SetFontSize(size) => state.font_size = *size,
            // Single-line middle-anchored text never consults the factor.
            Command::SetLineHeightFactor(_) => {}
            Command::DrawRoundedRect {
                x,
                y,
                width,
                height,
                radius,
                fill,
            } => {
                if *fill {
                    out.push_str(&fill_color_op(state.fill, precision));
                }
                out.push_str(&rounded_rect_path(
                    *x, *y, *width, *height, *radius, page_height, precision,
                ));
                out.push_str(if *fill { "f\n" } else { "S\n" });
            }
            Command::DrawString { x, y, text } => {
                let resource = font_resource(used_fonts, &state.font_name);
                out.push_str(&fill_color_op(state.text, precision));
                out.push_str("BT\n");
                out.push_str(&format!(
                    "/{} {} Tf\n",
                    resource,
                    fmt_pt(state.font_size, precision)
                ));
                let baseline = *y + state.font_size * MIDDLE_TO_BASELINE;
                out.push_str(&format!(
                    "{} {} Td\n",
                    fmt_pt(*x, precision),
                    fmt_pt(page_height - baseline, precision)
                ));
                out.push_str(&format!("({}) Tj\n", encode_winansi(text)));
                out.push_str("ET\n");
            }
        }
    }
    out
}

fn rounded_rect_path(
    x: Pt,
    y: Pt,
    width: Pt,
    height: Pt,
    radius: Pt,
    page_height: Pt,
    precision: u8,
) -> String {
    let x0 = x.to_f32();
    let w = width.to_f32().max(0.0);
    let h = height.to_f32().max(0.0);
    let top = page_height.to_f32() - y.to_f32();
    let bottom = top - h;
    let r = radius.to_f32().clamp(0.0, (w / 2.0).min(h / 2.0));
    let c = |value: f32| fmt_pt(Pt::from_f32(value), precision);

    if r <= 0.0 {
        return format!("{} {} {} {} re\n", c(x0), c(bottom), c(w), c(h));
    }

    let k = r * CORNER_KAPPA;
    let x1 = x0 + w;
    let mut out = String::new();
    out.push_str(&format!("{} {} m\n", c(x0 + r), c(bottom)));
    out.push_str(&format!("{} {} l\n", c(x1 - r), c(bottom)));
    out.push_str(&format!(
        "{} {} {} {} {} {} c\n",
        c(x1 - r + k),
        c(bottom),
        c(x1),
        c(bottom + r - k),
        c(x1),
        c(bottom + r)
    ));
    out.push_str(&format!("{} {} l\n", c(x1), c(top - r)));
    out.push_str(&format!(
        "{} {} {} {} {} {} c\n",
        c(x1),
        c(top - r + k),
        c(x1 - r + k),
        c(top),
        c(x1 - r),
        c(top)
    ));
    out.push_str(&format!("{} {} l\n", c(x0 + r), c(top)));
    out.push_str(&format!(
        "{} {} {} {} {} {} c\n",
        c(x0 + r - k),
        c(top),
        c(x0),
        c(top - r + k),
        c(x0),
        c(top - r)
    ));
    out.push_str(&format!("{} {} l\n", c(x0), c(bottom + r)));
    out.push_str(&format!(
        "{} {} {} {} {} {} c\n",
        c(x0),
        c(bottom + r - k),
        c(x0 + r - k),
        c(bottom),
        c(x0 + r),
        c(bottom)
    ));
    out.push_str("h\n");
    out
}

fn fill_color_op(color: Color, precision: u8) -> String {
    let c = |value: f32| fmt_pt(Pt::from_f32(value.clamp(0.0, 1.0)), precision.max(3));
    format!("{} {} {} rg\n", c(color.r), c(color.g), c(color.b))
}

fn font_resource(used_fonts: &mut Vec<String>, name: &str) -> String {
    let base = base14_name(name);
    let index = match used_fonts.iter().position(|font| font == &base) {
        Some(index) => index,
        None => {
            used_fonts.push(base);
            used_fonts.len() - 1
        }
    };
    format!("F{}", index + 1)
}

// Every requested family maps onto a base-14 face; unembedded text stays
// viewer-resolvable.
fn base14_name(name: &str) -> String {
    let base = match name.to_ascii_lowercase().as_str() {
        "helvetica" | "arial" | "sans-serif" => "Helvetica",
        "times" | "times-roman" | "times new roman" | "serif" => "Times-Roman",
        "courier" | "monospace" => "Courier",
        "symbol" => "Symbol",
        "zapfdingbats" => "ZapfDingbats",
        _ => "Helvetica",
    };
    base.to_string()
}

fn font_object(name: &str) -> String {
    format!(
        "<< /Type /Font /Subtype /Type1 /BaseFont /{} /Encoding /WinAnsiEncoding >>",
        name
    )
}

fn encode_winansi(input: &str) -> String {
    let mut out = String::new();
    for ch in input.chars() {
        let byte = match ch {
            '\u{0000}'..='\u{007F}' => ch as u8,
            '\u{00A0}'..='\u{00FF}' => ch as u8,
            // The cp1252 extensions that show up in document text.
            '\u{20AC}' => 0x80,
            '\u{2026}' => 0x85,
            '\u{2018}' => 0x91,
            '\u{2019}' => 0x92,
            '\u{201C}' => 0x93,
            '\u{201D}' => 0x94,
            '\u{2022}' => 0x95,
            '\u{2013}' => 0x96,
            '\u{2014}' => 0x97,
            '\u{2122}' => 0x99,
            _ => b'?',
        };
        match byte {
            b'\\' => out.push_str("\\\\"),
            b'(' => out.push_str("\\("),
            b')' => out.push_str("\\)"),
            b'\n' => out.push_str("\\n"),
            b'\r' => out.push_str("\\r"),
            b if b < 0x20 || b >= 0x7F => out.push_str(&format!("\\{:03o}", b)),
            b => out.push(b as char),
        }
    }
    out
}

fn fmt_pt(value: Pt, precision: u8) -> String {
    let digits = precision.min(3) as u32;
    let quantum = 10_i64.pow(3 - digits);
    let milli = value.to_milli_i64();
    let rounded = if milli >= 0 {
        (milli + quantum / 2) / quantum * quantum
    } else {
        -((-milli + quantum / 2) / quantum * quantum)
    };
    format_milli(rounded)
}

fn format_milli(milli: i64) -> String {
    if milli == 0 {
        return "0".to_string();
    }
    let sign = if milli < 0 { "-" } else { "" };
    let abs = milli.abs();
    let int_part = abs / 1000;
    let frac_part = abs % 1000;
    if frac_part == 0 {
        format!("{}{}", sign, int_part)
    } else {
        let mut s = format!("{}{}.{:03}", sign, int_part, frac_part);
        while s.ends_with('0') {
            s.pop();
        }
        if s.ends_with('.') {
            s.pop();
        }
        s
    }
}

// Zlib wrapper around stored deflate blocks: a valid /FlateDecode stream
// without carrying an encoder.
fn flate_stored(data: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(data.len() + 16);
    out.push(0x78);
    out.push(0x01);
    if data.is_empty() {
        out.extend_from_slice(&[0x01, 0x00, 0x00, 0xFF, 0xFF]);
    } else {
        let chunks: Vec<&[u8]> = data.chunks(65_535).collect();
        for (index, chunk) in chunks.iter().enumerate() {
            let last = index + 1 == chunks.len();
            out.push(if last { 0x01 } else { 0x00 });
            let len = chunk.len() as u16;
            out.extend_from_slice(&len.to_le_bytes());
            out.extend_from_slice(&(!len).to_le_bytes());
            out.extend_from_slice(chunk);
        }
    }
    out.extend_from_slice(&adler32(data).to_be_bytes());
    out
}

fn adler32(data: &[u8]) -> u32 {
    const BASE: u32 = 65_521;
    let mut a: u32 = 1;
    let mut b: u32 = 0;
    for &byte in data {
        a += byte as u32;
        if a >= BASE {
            a -= BASE;
        }
        b += a;
        b %= BASE;
    }
    (b << 16) | a
}

fn write_object<W: Write>(
    writer: &mut W,
    offset: &mut usize,
    offsets: &mut [usize],
    id: usize,
    body: &str,
) -> io::Result<()> {
    if let Some(slot) = offsets.get_mut(id) {
        *slot = *offset;
    }
    write_str(writer, &format!("{} 0 obj\n", id), offset)?;
    write_str(writer, body, offset)?;
    write_bytes(writer, b"\nendobj\n", offset)?;
    Ok(())
}

fn write_stream_object<W: Write>(
    writer: &mut W,
    offset: &mut usize,
    offsets: &mut [usize],
    id: usize,
    filter: &str,
    data: &[u8],
) -> io::Result<()> {
    if let Some(slot) = offsets.get_mut(id) {
        *slot = *offset;
    }
    write_str(
        writer,
        &format!("{} 0 obj\n<< /Length {}{} >>\nstream\n", id, data.len(), filter),
        offset,
    )?;
    write_bytes(writer, data, offset)?;
    write_bytes(writer, b"\nendstream\nendobj\n", offset)?;
    Ok(())
}

fn write_bytes<W: Write>(writer: &mut W, data: &[u8], offset: &mut usize) -> io::Result<()> {
    writer.write_all(data)?;
    *offset += data.len();
    Ok(())
}

fn write_str<W: Write>(writer: &mut W, data: &str, offset: &mut usize) -> io::Result<()> {
    write_bytes(writer, data.as_bytes(), offset)
}
