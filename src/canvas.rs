use crate::types::{Color, Pt, Size};

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    SaveState,
    RestoreState,
    SetFillColor(Color),
    SetTextColor(Color),
    SetFontName(String),
    SetFontSize(Pt),
    SetLineHeightFactor(f32),
    // Rounded rectangle, filled with the current fill color or outlined
    // with the default stroke when no fill applies.
    DrawRoundedRect {
        x: Pt,
        y: Pt,
        width: Pt,
        height: Pt,
        radius: Pt,
        fill: bool,
    },
    // Left-aligned text whose y names the vertical middle of the line.
    DrawString {
        x: Pt,
        y: Pt,
        text: String,
    },
}

#[derive(Debug, Clone)]
pub struct Page {
    pub commands: Vec<Command>,
}

impl Page {
    fn new() -> Self {
        Self {
            commands: Vec::new(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Document {
    pub page_size: Size,
    pub pages: Vec<Page>,
}

#[derive(Debug, Clone, PartialEq)]
struct GraphicsState {
    fill_color: Color,
    text_color: Color,
    font_name: String,
    font_size: Pt,
    line_height_factor: f32,
}

impl GraphicsState {
    // Fresh-page state: white fill, black text, Helvetica 12 with the
    // stock line height.
    fn page_default() -> Self {
        Self {
            fill_color: Color::WHITE,
            text_color: Color::BLACK,
            font_name: "Helvetica".to_string(),
            font_size: Pt::from_f32(12.0),
            line_height_factor: 1.15,
        }
    }
}

/// Command-recording page canvas. The current graphics state is ambient and
/// mutable; `save_state`/`restore_state` bracket scoped overrides, and the
/// setters skip writes that would not change anything.
pub struct Canvas {
    page_size: Size,
    pages: Vec<Page>,
    current: Page,
    state_stack: Vec<GraphicsState>,
    current_state: GraphicsState,
}

impl Canvas {
    pub fn new(page_size: Size) -> Self {
        Self {
            page_size,
            pages: Vec::new(),
            current: Page::new(),
            state_stack: Vec::new(),
            current_state: GraphicsState::page_default(),
        }
    }

    pub fn page_size(&self) -> Size {
        self.page_size
    }

    pub fn save_state(&mut self) {
        self.state_stack.push(self.current_state.clone());
        self.current.commands.push(Command::SaveState);
    }

    pub fn restore_state(&mut self) {
        if let Some(state) = self.state_stack.pop() {
            self.current_state = state;
            self.current.commands.push(Command::RestoreState);
        }
    }

    pub fn fill_color(&self) -> Color {
        self.current_state.fill_color
    }

    pub fn text_color(&self) -> Color {
        self.current_state.text_color
    }

    pub fn font_name(&self) -> &str {
        &self.current_state.font_name
    }

    pub fn font_size(&self) -> Pt {
        self.current_state.font_size
    }

    pub fn line_height_factor(&self) -> f32 {
        self.current_state.line_height_factor
    }

    pub fn set_fill_color(&mut self, color: Color) {
        if self.current_state.fill_color == color {
            return;
        }
        self.current_state.fill_color = color;
        self.current.commands.push(Command::SetFillColor(color));
    }

    pub fn set_text_color(&mut self, color: Color) {
        if self.current_state.text_color == color {
            return;
        }
        self.current_state.text_color = color;
        self.current.commands.push(Command::SetTextColor(color));
    }

    pub fn set_font_name(&mut self, name: &str) {
        if self.current_state.font_name == name {
            return;
        }
        self.current_state.font_name = name.to_string();
        self.current
            .commands
            .push(Command::SetFontName(self.current_state.font_name.clone()));
    }

    pub fn set_font_size(&mut self, size: Pt) {
        if self.current_state.font_size == size {
            return;
        }
        self.current_state.font_size = size;
        self.current.commands.push(Command::SetFontSize(size));
    }

    pub fn set_line_height_factor(&mut self, factor: f32) {
        if self.current_state.line_height_factor == factor {
            return;
        }
        self.current_state.line_height_factor = factor;
        self.current
            .commands
            .push(Command::SetLineHeightFactor(factor));
    }

    pub fn draw_rounded_rect(
        &mut self,
        x: Pt,
        y: Pt,
        width: Pt,
        height: Pt,
        radius: Pt,
        fill: bool,
    ) {
        self.current.commands.push(Command::DrawRoundedRect {
            x,
            y,
            width,
            height,
            radius: radius.max(Pt::ZERO),
            fill,
        });
    }

    pub fn draw_string(&mut self, x: Pt, y: Pt, text: impl Into<String>) {
        self.current.commands.push(Command::DrawString {
            x,
            y,
            text: text.into(),
        });
    }

    pub fn current_command_count(&self) -> usize {
        self.current.commands.len()
    }

    pub fn show_page(&mut self) {
        let current = std::mem::replace(&mut self.current, Page::new());
        self.pages.push(current);
        self.state_stack.clear();
        self.current_state = GraphicsState::page_default();
    }

    pub fn finish(mut self) -> Document {
        if !self.current.commands.is_empty() || self.pages.is_empty() {
            self.show_page();
        }
        Document {
            page_size: self.page_size,
            pages: self.pages,
        }
    }
}
