use crate::element::Element;
use crate::error::BoxPressError;
use crate::types::Rect;
use kuchiki::traits::TendrilSink;
use kuchiki::NodeRef;

/// Converts the subtree rooted at the element with the given id into a
/// source tree. Since parsed markup carries no layout measurements, the
/// bounding box the browser would report is read from `width`/`height`
/// (and optional `x`/`y`) attributes instead.
pub fn element_by_id(html: &str, id: &str) -> Result<Element, BoxPressError> {
    let document = kuchiki::parse_html().one(html);
    let selector = format!("#{}", id);
    match document.select_first(&selector) {
        Ok(node) => Ok(convert(node.as_node())),
        Err(()) => Err(BoxPressError::MissingRootElement(id.to_string())),
    }
}

/// Converts the first element under `<body>` when no id is wired into the
/// markup.
pub fn first_body_element(html: &str) -> Result<Element, BoxPressError> {
    let document = kuchiki::parse_html().one(html);
    let body = document
        .select_first("body")
        .map_err(|()| BoxPressError::MissingRootElement("body".to_string()))?;
    body.as_node()
        .children()
        .find(|child| child.as_element().is_some())
        .map(|node| convert(&node))
        .ok_or_else(|| BoxPressError::MissingRootElement("body".to_string()))
}

fn convert(node: &NodeRef) -> Element {
    let mut element = Element::new("div");
    if let Some(data) = node.as_element() {
        element.tag = data.name.local.to_string();
        let attrs = data.attributes.borrow();
        element.id = attrs
            .get("id")
            .filter(|value| !value.is_empty())
            .map(str::to_string);
        element.classes = attrs
            .get("class")
            .unwrap_or("")
            .split_whitespace()
            .map(str::to_string)
            .collect();
        element.bounds = Rect::new(
            numeric_attr(&attrs, "x"),
            numeric_attr(&attrs, "y"),
            numeric_attr(&attrs, "width"),
            numeric_attr(&attrs, "height"),
        );
    }
    element.text = node.text_contents().trim().to_string();
    element.children = node
        .children()
        .filter(|child| child.as_element().is_some())
        .map(|child| convert(&child))
        .collect();
    element
}

fn numeric_attr(attrs: &kuchiki::Attributes, name: &str) -> f32 {
    attrs
        .get(name)
        .and_then(|value| value.trim().parse::<f32>().ok())
        .unwrap_or(0.0)
}
