use crate::types::Rect;

/// A node in the source hierarchy: tag, utility-class tokens, literal text,
/// a measured bounding box, and child elements in document order. The box
/// tree reads this structure; it never mutates it.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub id: Option<String>,
    pub tag: String,
    pub classes: Vec<String>,
    pub text: String,
    pub bounds: Rect,
    pub children: Vec<Element>,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            id: None,
            tag: tag.into(),
            classes: Vec::new(),
            text: String::new(),
            bounds: Rect::ZERO,
            children: Vec::new(),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Class tokens from a whitespace-separated attribute value. Duplicates
    /// and unknown tokens are kept; resolution decides what they mean.
    pub fn with_classes(mut self, classes: &str) -> Self {
        self.classes = classes.split_whitespace().map(str::to_string).collect();
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn with_bounds(mut self, x: f32, y: f32, width: f32, height: f32) -> Self {
        self.bounds = Rect::new(x, y, width, height);
        self
    }

    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }
}
