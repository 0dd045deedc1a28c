use crate::error::BoxPressError;
use crate::theme::Theme;
use crate::types::Color;
use crate::units::spacing_px;
use taffy::geometry::{Rect as TaffyRect, Size as TaffySize};
use taffy::style::{
    AlignContent, AlignItems, Dimension, FlexDirection, FlexWrap, JustifyContent, Style,
};
use taffy::style_helpers::{auto, length, percent};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Edge {
    All,
    Top,
    Right,
    Bottom,
    Left,
    Horizontal,
    Vertical,
}

// Per-edge-group values, one slot per group the spacing vocabulary can
// address. The layout engine receives the resolved per-edge values; the
// painter reads the raw slots for text placement.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub(crate) struct EdgeOffsets {
    all: Option<f32>,
    top: Option<f32>,
    right: Option<f32>,
    bottom: Option<f32>,
    left: Option<f32>,
    horizontal: Option<f32>,
    vertical: Option<f32>,
}

impl EdgeOffsets {
    fn set(&mut self, edge: Edge, value: f32) {
        match edge {
            Edge::All => self.all = Some(value),
            Edge::Top => self.top = Some(value),
            Edge::Right => self.right = Some(value),
            Edge::Bottom => self.bottom = Some(value),
            Edge::Left => self.left = Some(value),
            Edge::Horizontal => self.horizontal = Some(value),
            Edge::Vertical => self.vertical = Some(value),
        }
    }

    // Raw slot value: zero when that group was never set, even if a wider
    // group covers the same edge.
    pub fn slot(&self, edge: Edge) -> f32 {
        match edge {
            Edge::All => self.all,
            Edge::Top => self.top,
            Edge::Right => self.right,
            Edge::Bottom => self.bottom,
            Edge::Left => self.left,
            Edge::Horizontal => self.horizontal,
            Edge::Vertical => self.vertical,
        }
        .unwrap_or(0.0)
    }

    // Specific edge wins over axis group wins over "all".
    fn resolved_left(&self) -> f32 {
        self.left.or(self.horizontal).or(self.all).unwrap_or(0.0)
    }

    fn resolved_right(&self) -> f32 {
        self.right.or(self.horizontal).or(self.all).unwrap_or(0.0)
    }

    fn resolved_top(&self) -> f32 {
        self.top.or(self.vertical).or(self.all).unwrap_or(0.0)
    }

    fn resolved_bottom(&self) -> f32 {
        self.bottom.or(self.vertical).or(self.all).unwrap_or(0.0)
    }
}

/// The mutable constraint record behind one box: explicit size from the
/// element's bounding box plus whatever the layout token families set.
/// Converted into the layout engine's style type once, at node creation.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct LayoutStyle {
    pub width: f32,
    pub height: f32,
    pub padding: EdgeOffsets,
    pub margin: EdgeOffsets,
    pub align_items: Option<AlignItems>,
    pub align_self: Option<AlignItems>,
    pub align_content: Option<AlignContent>,
    pub justify_content: Option<JustifyContent>,
    pub direction: FlexDirection,
    pub wrap: FlexWrap,
    pub grow: f32,
    pub shrink: f32,
    pub basis: Dimension,
}

impl LayoutStyle {
    // Defaults follow the classic mobile-flexbox engine the token vocabulary
    // was written against: column main axis, no grow, no shrink, auto basis,
    // lines packed to the start.
    pub fn sized(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            padding: EdgeOffsets::default(),
            margin: EdgeOffsets::default(),
            align_items: None,
            align_self: None,
            align_content: Some(AlignContent::FlexStart),
            justify_content: None,
            direction: FlexDirection::Column,
            wrap: FlexWrap::NoWrap,
            grow: 0.0,
            shrink: 0.0,
            basis: auto(),
        }
    }

    /// Runs one utility-class token through the layout resolver families.
    /// Returns whether any family recognized it; unrecognized tokens leave
    /// the style untouched.
    pub fn apply_token(&mut self, token: &str) -> bool {
        LAYOUT_RESOLVERS.iter().any(|resolve| resolve(token, self))
    }

    pub fn to_taffy(&self) -> Style {
        Style {
            size: TaffySize {
                width: length(self.width.max(0.0)),
                height: length(self.height.max(0.0)),
            },
            padding: TaffyRect {
                left: length(self.padding.resolved_left()),
                right: length(self.padding.resolved_right()),
                top: length(self.padding.resolved_top()),
                bottom: length(self.padding.resolved_bottom()),
            },
            margin: TaffyRect {
                left: length(self.margin.resolved_left()),
                right: length(self.margin.resolved_right()),
                top: length(self.margin.resolved_top()),
                bottom: length(self.margin.resolved_bottom()),
            },
            align_items: self.align_items,
            align_self: self.align_self,
            align_content: self.align_content,
            justify_content: self.justify_content,
            flex_direction: self.direction,
            flex_wrap: self.wrap,
            flex_grow: self.grow,
            flex_shrink: self.shrink,
            flex_basis: self.basis,
            ..Style::default()
        }
    }
}

type LayoutResolver = fn(&str, &mut LayoutStyle) -> bool;

// Families in the documented order: spacing, alignment, justification, flex.
// Prefixes are disjoint, so a token is claimed by at most one family.
const LAYOUT_RESOLVERS: [LayoutResolver; 4] = [
    resolve_spacing,
    resolve_alignment,
    resolve_justify,
    resolve_flex,
];

fn resolve_spacing(token: &str, style: &mut LayoutStyle) -> bool {
    let Some((prefix, key)) = token.split_once('-') else {
        return false;
    };
    let edge = match prefix {
        "p" | "m" => Edge::All,
        "pt" | "mt" => Edge::Top,
        "pl" | "ml" => Edge::Left,
        "px" | "mx" => Edge::Horizontal,
        "py" | "my" => Edge::Vertical,
        "pb" | "mb" => Edge::Bottom,
        "pr" | "mr" => Edge::Right,
        _ => return false,
    };
    let Some(value) = spacing_px(key) else {
        return false;
    };
    if prefix.starts_with('p') {
        style.padding.set(edge, value);
    } else {
        style.margin.set(edge, value);
    }
    true
}

const ALIGN_SUFFIXES: [&str; 8] = [
    "auto", "start", "end", "center", "baseline", "stretch", "between", "around",
];

fn resolve_alignment(token: &str, style: &mut LayoutStyle) -> bool {
    let Some((prefix, suffix)) = token.split_once('-') else {
        return false;
    };
    if !ALIGN_SUFFIXES.contains(&suffix) {
        return false;
    }
    match prefix {
        "items" => {
            if let Some(value) = item_alignment(suffix) {
                style.align_items = value;
            }
            true
        }
        "self" => {
            if let Some(value) = item_alignment(suffix) {
                style.align_self = value;
            }
            true
        }
        "content" => {
            if let Some(value) = content_alignment(suffix) {
                style.align_content = value;
            }
            true
        }
        _ => false,
    }
}

// Outer None: the suffix is part of the vocabulary but has no per-item
// meaning in the layout engine (distribution values only apply to lines).
fn item_alignment(suffix: &str) -> Option<Option<AlignItems>> {
    match suffix {
        "auto" => Some(None),
        "start" => Some(Some(AlignItems::FlexStart)),
        "end" => Some(Some(AlignItems::FlexEnd)),
        "center" => Some(Some(AlignItems::Center)),
        "baseline" => Some(Some(AlignItems::Baseline)),
        "stretch" => Some(Some(AlignItems::Stretch)),
        _ => None,
    }
}

fn content_alignment(suffix: &str) -> Option<Option<AlignContent>> {
    match suffix {
        "auto" => Some(None),
        "start" => Some(Some(AlignContent::FlexStart)),
        "end" => Some(Some(AlignContent::FlexEnd)),
        "center" => Some(Some(AlignContent::Center)),
        "stretch" => Some(Some(AlignContent::Stretch)),
        "between" => Some(Some(AlignContent::SpaceBetween)),
        "around" => Some(Some(AlignContent::SpaceAround)),
        _ => None,
    }
}

fn resolve_justify(token: &str, style: &mut LayoutStyle) -> bool {
    let Some((prefix, suffix)) = token.split_once('-') else {
        return false;
    };
    if prefix != "justify" {
        return false;
    }
    let value = match suffix {
        "start" => JustifyContent::FlexStart,
        "end" => JustifyContent::FlexEnd,
        "center" => JustifyContent::Center,
        "between" => JustifyContent::SpaceBetween,
        "around" => JustifyContent::SpaceAround,
        _ => return false,
    };
    style.justify_content = Some(value);
    true
}

// Flex tokens are exact matches, not prefix-split.
fn resolve_flex(token: &str, style: &mut LayoutStyle) -> bool {
    match token {
        "flex-1" => {
            style.grow = 1.0;
            style.shrink = 1.0;
            style.basis = percent(0.0);
        }
        "flex-initial" => {
            style.grow = 0.0;
            style.shrink = 1.0;
            style.basis = auto();
        }
        "flex-none" => {
            style.grow = 0.0;
            style.shrink = 0.0;
            style.basis = auto();
        }
        "flex-auto" => {
            style.grow = 1.0;
            style.shrink = 1.0;
            style.basis = auto();
        }
        "flex-row" => style.direction = FlexDirection::Row,
        "flex-row-reverse" => style.direction = FlexDirection::RowReverse,
        "flex-column" => style.direction = FlexDirection::Column,
        "flex-column-reverse" => style.direction = FlexDirection::ColumnReverse,
        "flex-wrap" => style.wrap = FlexWrap::Wrap,
        "flex-nowrap" => style.wrap = FlexWrap::NoWrap,
        "flex-wrap-reverse" => style.wrap = FlexWrap::WrapReverse,
        "flex-grow" | "grow" => style.grow = 1.0,
        "grow-0" => style.grow = 0.0,
        "flex-shrink" | "shrink" => style.shrink = 1.0,
        "shrink-0" => style.shrink = 0.0,
        _ => return false,
    }
    true
}

/// Render-time paint directives for one element, derived from its token set
/// immediately before painting. Never stored on the layout node.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub(crate) struct PaintStyle {
    pub background: Option<Color>,
    pub text: Option<Color>,
    pub font_size: Option<f32>,
    pub line_height_factor: Option<f32>,
    pub roundness: f32,
}

pub(crate) fn resolve_paint(classes: &[String], theme: &Theme) -> Result<PaintStyle, BoxPressError> {
    let mut paint = PaintStyle::default();
    for token in classes {
        if let Some(rest) = token.strip_prefix("bg-") {
            let (name, intensity) = split_color(rest);
            if theme.has_color(name) {
                paint.background = Some(theme.resolve_color(name, intensity)?);
            }
        } else if let Some(rest) = token.strip_prefix("text-") {
            // `text-` carries both the color and the size vocabulary; the
            // first segment decides which scale it hits.
            let (name, intensity) = split_color(rest);
            if theme.has_color(name) {
                paint.text = Some(theme.resolve_color(name, intensity)?);
            }
            if let Some((size, line_height)) = theme.font_size(name) {
                paint.font_size = Some(size);
                let factor = line_height / size;
                paint.line_height_factor = factor.is_finite().then_some(factor);
            }
        } else if token == "rounded" || token.starts_with("rounded-") {
            let key = token.strip_prefix("rounded-").unwrap_or("DEFAULT");
            if let Some(radius) = theme.corner_radius(key) {
                paint.roundness = radius;
            }
        }
    }
    Ok(paint)
}

fn split_color(rest: &str) -> (&str, Option<&str>) {
    match rest.split_once('-') {
        Some((name, intensity)) => (name, Some(intensity)),
        None => (rest, None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classes(tokens: &[&str]) -> Vec<String> {
        tokens.iter().map(|t| t.to_string()).collect()
    }

    #[test]
    fn spacing_tokens_set_their_edge_group() {
        let mut style = LayoutStyle::sized(100.0, 100.0);
        for token in ["p-2", "pl-4", "px-1", "mt-8", "my-3"] {
            assert!(style.apply_token(token), "token {token}");
        }
        assert_eq!(style.padding.slot(Edge::All), 8.0);
        assert_eq!(style.padding.slot(Edge::Left), 16.0);
        assert_eq!(style.padding.slot(Edge::Horizontal), 4.0);
        assert_eq!(style.margin.slot(Edge::Top), 32.0);
        assert_eq!(style.margin.slot(Edge::Vertical), 12.0);
        assert_eq!(style.margin.slot(Edge::All), 0.0);
    }

    #[test]
    fn unknown_spacing_keys_are_no_ops() {
        let mut style = LayoutStyle::sized(100.0, 100.0);
        assert!(!style.apply_token("p-13"));
        assert!(!style.apply_token("p-huge"));
        assert_eq!(style.padding, EdgeOffsets::default());
    }

    #[test]
    fn edge_resolution_prefers_the_most_specific_group() {
        let mut style = LayoutStyle::sized(10.0, 10.0);
        style.apply_token("p-1");
        style.apply_token("px-4");
        style.apply_token("pl-8");
        assert_eq!(style.padding.resolved_left(), 32.0);
        assert_eq!(style.padding.resolved_right(), 16.0);
        assert_eq!(style.padding.resolved_top(), 4.0);
    }

    #[test]
    fn alignment_tokens_map_one_to_one() {
        let mut style = LayoutStyle::sized(10.0, 10.0);
        assert!(style.apply_token("items-center"));
        assert!(style.apply_token("self-end"));
        assert!(style.apply_token("content-between"));
        assert_eq!(style.align_items, Some(AlignItems::Center));
        assert_eq!(style.align_self, Some(AlignItems::FlexEnd));
        assert_eq!(style.align_content, Some(AlignContent::SpaceBetween));
    }

    #[test]
    fn alignment_auto_clears_the_field() {
        let mut style = LayoutStyle::sized(10.0, 10.0);
        style.apply_token("items-stretch");
        style.apply_token("items-auto");
        assert_eq!(style.align_items, None);
    }

    #[test]
    fn invalid_alignment_suffix_is_a_no_op() {
        let mut style = LayoutStyle::sized(10.0, 10.0);
        assert!(!style.apply_token("items-middle"));
        assert_eq!(style.align_items, None);
    }

    #[test]
    fn distribution_suffixes_do_not_touch_item_alignment() {
        let mut style = LayoutStyle::sized(10.0, 10.0);
        style.apply_token("items-center");
        assert!(style.apply_token("items-between"));
        assert_eq!(style.align_items, Some(AlignItems::Center));
    }

    #[test]
    fn justify_tokens_map_one_to_one() {
        let mut style = LayoutStyle::sized(10.0, 10.0);
        assert!(style.apply_token("justify-around"));
        assert_eq!(style.justify_content, Some(JustifyContent::SpaceAround));
        assert!(!style.apply_token("justify-evenly"));
    }

    #[test]
    fn flex_shorthands_set_grow_shrink_basis() {
        let mut style = LayoutStyle::sized(10.0, 10.0);
        style.apply_token("flex-1");
        assert_eq!(style.grow, 1.0);
        assert_eq!(style.shrink, 1.0);
        assert_eq!(style.basis, percent(0.0));

        style.apply_token("flex-none");
        assert_eq!(style.grow, 0.0);
        assert_eq!(style.shrink, 0.0);
        assert_eq!(style.basis, auto());

        style.apply_token("flex-row-reverse");
        assert_eq!(style.direction, FlexDirection::RowReverse);
        style.apply_token("flex-wrap");
        assert_eq!(style.wrap, FlexWrap::Wrap);
        style.apply_token("shrink-0");
        assert_eq!(style.shrink, 0.0);
    }

    #[test]
    fn token_application_is_idempotent() {
        let tokens = ["p-4", "px-2", "items-center", "justify-between", "flex-1"];
        let mut once = LayoutStyle::sized(50.0, 50.0);
        for token in tokens {
            once.apply_token(token);
        }
        let mut twice = once.clone();
        for token in tokens {
            twice.apply_token(token);
        }
        assert_eq!(once, twice);
    }

    #[test]
    fn unrecognized_tokens_leave_the_style_untouched() {
        let mut style = LayoutStyle::sized(50.0, 50.0);
        let before = style.clone();
        for token in ["z-50", "absolute", "top-2", "right-2", "btn", "btn-primary"] {
            assert!(!style.apply_token(token), "token {token}");
        }
        assert_eq!(style, before);
    }

    #[test]
    fn paint_resolves_background_and_text() {
        let theme = Theme::default();
        let paint = resolve_paint(
            &classes(&["bg-blue-500", "text-white", "rounded-md"]),
            &theme,
        )
        .unwrap();
        let blue = theme.resolve_color("blue", Some("500")).unwrap();
        assert_eq!(paint.background, Some(blue));
        assert_eq!(paint.text, Some(Color::WHITE));
        assert_eq!(paint.roundness, 6.0);
        assert_eq!(paint.font_size, None);
    }

    #[test]
    fn paint_resolves_font_size_with_line_height_factor() {
        let theme = Theme::default();
        let paint = resolve_paint(&classes(&["text-2xl"]), &theme).unwrap();
        assert_eq!(paint.font_size, Some(24.0));
        assert_eq!(paint.line_height_factor, Some(32.0 / 24.0));
        assert_eq!(paint.text, None);
    }

    #[test]
    fn later_paint_tokens_override_earlier_ones() {
        let theme = Theme::default();
        let paint = resolve_paint(&classes(&["bg-red-500", "bg-blue-500"]), &theme).unwrap();
        assert_eq!(
            paint.background,
            Some(theme.resolve_color("blue", Some("500")).unwrap())
        );
    }

    #[test]
    fn keyed_color_without_intensity_paints_the_fallback() {
        let theme = Theme::default();
        let paint = resolve_paint(&classes(&["bg-gray"]), &theme).unwrap();
        assert_eq!(paint.background, Some(Color::WHITE));
    }

    #[test]
    fn unknown_color_names_are_no_ops() {
        let theme = Theme::default();
        let paint = resolve_paint(&classes(&["bg-chartreuse-500", "text-mauve"]), &theme).unwrap();
        assert_eq!(paint.background, None);
        assert_eq!(paint.text, None);
    }

    #[test]
    fn bare_rounded_uses_the_default_radius() {
        let theme = Theme::default();
        let paint = resolve_paint(&classes(&["rounded"]), &theme).unwrap();
        assert_eq!(paint.roundness, 4.0);
    }

    #[test]
    fn unknown_radius_key_is_a_no_op() {
        let theme = Theme::default();
        let paint = resolve_paint(&classes(&["rounded-huge"]), &theme).unwrap();
        assert_eq!(paint.roundness, 0.0);
    }
}
