mod canvas;
mod debug;
mod element;
mod error;
mod html;
mod layout;
mod paint;
mod pdf;
mod pdfinspect;
mod style;
mod theme;
mod types;
mod units;

pub use canvas::{Canvas, Command, Document, Page};
pub use element::Element;
pub use error::BoxPressError;
pub use html::{element_by_id, first_body_element};
pub use pdf::{Orientation, PageFormat, Unit};
pub use pdfinspect::{inspect_pdf_bytes, inspect_pdf_path, PdfInspectError, PdfInspectReport};
pub use theme::{FontSizeEntry, PaletteEntry, Theme};
pub use types::{Color, Pt, Rect, Size};
pub use units::{hex_to_intensity, spacing_px, to_px};

use debug::DebugLog;
use paint::Painter;
use pdf::PdfOptions;
use std::sync::Arc;
use taffy::geometry::Size as TaffySize;
use taffy::style_helpers::length;
use taffy::{AvailableSpace, TaffyTree};

/// One configured generation pipeline: theme and page options are fixed at
/// build time, every render pass works on a fresh box tree.
pub struct BoxPress {
    theme: Theme,
    pdf_options: PdfOptions,
    page_size: Size,
    debug: Option<Arc<DebugLog>>,
}

#[derive(Clone)]
pub struct BoxPressBuilder {
    theme: Theme,
    orientation: Orientation,
    format: PageFormat,
    unit: Unit,
    precision: u8,
    put_only_used_fonts: bool,
    compress: bool,
    debug_path: Option<std::path::PathBuf>,
}

impl BoxPressBuilder {
    pub fn new() -> Self {
        Self {
            theme: Theme::default(),
            orientation: Orientation::Portrait,
            format: PageFormat::A4,
            unit: Unit::Pt,
            precision: 3,
            put_only_used_fonts: true,
            compress: false,
            debug_path: None,
        }
    }

    pub fn theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    pub fn orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }

    pub fn page_format(mut self, format: PageFormat) -> Self {
        self.format = format;
        self
    }

    pub fn unit(mut self, unit: Unit) -> Self {
        self.unit = unit;
        self
    }

    /// Decimal places for emitted coordinates; the writer works in
    /// milli-points, so 0..=3 are meaningful.
    pub fn precision(mut self, precision: u8) -> Self {
        self.precision = precision;
        self
    }

    pub fn put_only_used_fonts(mut self, enabled: bool) -> Self {
        self.put_only_used_fonts = enabled;
        self
    }

    pub fn compress(mut self, enabled: bool) -> Self {
        self.compress = enabled;
        self
    }

    pub fn debug_log(mut self, path: impl Into<std::path::PathBuf>) -> Self {
        self.debug_path = Some(path.into());
        self
    }

    pub fn build(self) -> Result<BoxPress, BoxPressError> {
        if let PageFormat::Custom(width, height) = self.format {
            if !width.is_finite() || !height.is_finite() || width <= 0.0 || height <= 0.0 {
                return Err(BoxPressError::InvalidConfiguration(format!(
                    "custom page dimensions must be positive, got {width}x{height}"
                )));
            }
        }
        if self.precision > 3 {
            return Err(BoxPressError::InvalidConfiguration(format!(
                "precision {} out of range 0..=3",
                self.precision
            )));
        }
        let debug = match &self.debug_path {
            Some(path) => Some(Arc::new(DebugLog::new(path)?)),
            None => None,
        };
        let pdf_options = PdfOptions {
            orientation: self.orientation,
            format: self.format,
            unit: self.unit,
            precision: self.precision,
            put_only_used_fonts: self.put_only_used_fonts,
            compress: self.compress,
        };
        let page_size = pdf_options.page_size();
        Ok(BoxPress {
            theme: self.theme,
            pdf_options,
            page_size,
            debug,
        })
    }
}

impl Default for BoxPressBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl BoxPress {
    pub fn builder() -> BoxPressBuilder {
        BoxPressBuilder::new()
    }

    pub fn page_size(&self) -> Size {
        self.page_size
    }

    /// Runs one generation pass: box tree, layout, paint. The returned
    /// document holds the recorded page, ready for the writer.
    pub fn render_to_document(&self, root: &Element) -> Result<Document, BoxPressError> {
        let page_width = self.page_size.width.to_f32();
        let page_height = self.page_size.height.to_f32();

        let mut taffy = TaffyTree::new();
        let tree = layout::build_box_tree(&mut taffy, root, self.debug.as_deref())?;

        // The root box spans the page whatever its measured bounds say.
        let mut root_style = taffy.style(tree.node)?.clone();
        root_style.size = TaffySize {
            width: length(page_width),
            height: length(page_height),
        };
        taffy.set_style(tree.node, root_style)?;
        taffy.compute_layout(
            tree.node,
            TaffySize {
                width: AvailableSpace::Definite(page_width),
                height: AvailableSpace::Definite(page_height),
            },
        )?;

        let mut canvas = Canvas::new(self.page_size);
        // Blank page underneath everything that follows.
        canvas.draw_rounded_rect(
            Pt::ZERO,
            Pt::ZERO,
            self.page_size.width,
            self.page_size.height,
            Pt::ZERO,
            true,
        );

        let painter = Painter {
            taffy: &taffy,
            theme: &self.theme,
            debug: self.debug.as_deref(),
        };
        painter.paint(&tree, &mut canvas, 0.0, 0.0)?;

        if let Some(log) = self.debug.as_deref() {
            log.emit_summary("generate");
            log.flush();
        }
        Ok(canvas.finish())
    }

    pub fn render_html_to_document(
        &self,
        markup: &str,
        root_id: &str,
    ) -> Result<Document, BoxPressError> {
        let root = html::element_by_id(markup, root_id)?;
        self.render_to_document(&root)
    }

    pub fn render_to_buffer(&self, root: &Element) -> Result<Vec<u8>, BoxPressError> {
        let document = self.render_to_document(root)?;
        Ok(pdf::document_to_pdf(&document, &self.pdf_options)?)
    }

    pub fn render_html_to_buffer(
        &self,
        markup: &str,
        root_id: &str,
    ) -> Result<Vec<u8>, BoxPressError> {
        let document = self.render_html_to_document(markup, root_id)?;
        Ok(pdf::document_to_pdf(&document, &self.pdf_options)?)
    }

    pub fn render_to_writer<W: std::io::Write>(
        &self,
        root: &Element,
        writer: &mut W,
    ) -> Result<(), BoxPressError> {
        let document = self.render_to_document(root)?;
        Ok(pdf::document_to_writer(&document, &self.pdf_options, writer)?)
    }

    pub fn render_to_file(
        &self,
        root: &Element,
        path: impl AsRef<std::path::Path>,
    ) -> Result<(), BoxPressError> {
        let mut file = std::fs::File::create(path)?;
        self.render_to_writer(root, &mut file)
    }
}
