use crate::canvas::Canvas;
use crate::debug::DebugLog;
use crate::error::BoxPressError;
use crate::layout::BoxNode;
use crate::style::{resolve_paint, Edge};
use crate::theme::Theme;
use crate::types::Pt;
use std::ops::{Deref, DerefMut};
use taffy::TaffyTree;

// Brackets one render frame: the ambient paint state saved on entry is
// restored on every exit path, including early returns through `?`.
struct PaintScope<'a> {
    canvas: &'a mut Canvas,
}

impl<'a> PaintScope<'a> {
    fn enter(canvas: &'a mut Canvas) -> Self {
        canvas.save_state();
        Self { canvas }
    }
}

impl Drop for PaintScope<'_> {
    fn drop(&mut self) {
        self.canvas.restore_state();
    }
}

impl Deref for PaintScope<'_> {
    type Target = Canvas;
    fn deref(&self) -> &Canvas {
        self.canvas
    }
}

impl DerefMut for PaintScope<'_> {
    fn deref_mut(&mut self) -> &mut Canvas {
        self.canvas
    }
}

/// Walks the box tree in build order and emits paint primitives. Parents
/// paint before children, siblings in source order; color and font
/// overrides are scoped to the subtree through the canvas's own ambient
/// state, so a sibling starts from its parent's state, never its
/// predecessor's.
pub(crate) struct Painter<'a> {
    pub taffy: &'a TaffyTree<()>,
    pub theme: &'a Theme,
    pub debug: Option<&'a DebugLog>,
}

impl Painter<'_> {
    pub fn paint(
        &self,
        node: &BoxNode<'_>,
        canvas: &mut Canvas,
        origin_x: f32,
        origin_y: f32,
    ) -> Result<(), BoxPressError> {
        let layout = self.taffy.layout(node.node)?;
        let x = origin_x + layout.location.x;
        let y = origin_y + layout.location.y;
        let width = layout.size.width;
        let height = layout.size.height;

        let mut scope = PaintScope::enter(canvas);
        let paint = resolve_paint(&node.element.classes, self.theme)?;

        if let Some(background) = paint.background {
            scope.set_fill_color(background);
        }
        scope.draw_rounded_rect(
            Pt::from_f32(x),
            Pt::from_f32(y),
            Pt::from_f32(width),
            Pt::from_f32(height),
            Pt::from_f32(paint.roundness),
            paint.background.is_some(),
        );

        // Text settings go into the ambient state whether or not this
        // element paints text itself; descendants inherit them from there.
        if let Some(color) = paint.text {
            scope.set_text_color(color);
        }
        if let Some(size) = paint.font_size {
            scope.set_font_size(Pt::from_f32(size));
        }
        if let Some(factor) = paint.line_height_factor {
            scope.set_line_height_factor(factor);
        }

        match &node.children {
            Some(children) => {
                for child in children {
                    self.paint(child, &mut scope, x, y)?;
                }
            }
            None => {
                let pad = &node.padding;
                let text_x = x
                    + pad.slot(Edge::Left)
                    + pad.slot(Edge::All)
                    + pad.slot(Edge::Horizontal);
                let text_y = y
                    + pad.slot(Edge::Top)
                    + pad.slot(Edge::All)
                    + pad.slot(Edge::Vertical)
                    + height / 2.0;
                scope.draw_string(
                    Pt::from_f32(text_x),
                    Pt::from_f32(text_y),
                    node.element.text.clone(),
                );
                if let Some(log) = self.debug {
                    let measured = format!(
                        "{}x{}",
                        node.bounds.width.to_f32(),
                        node.bounds.height.to_f32()
                    );
                    log.event(
                        "paint.text",
                        &[
                            ("id", node.id.as_str()),
                            ("text", node.element.text.as_str()),
                            ("measured", measured.as_str()),
                        ],
                    );
                    log.increment("paint.leaves", 1);
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::Command;
    use crate::element::Element;
    use crate::layout::build_box_tree;
    use crate::types::{Color, Size};
    use taffy::geometry::Size as TaffySize;
    use taffy::AvailableSpace;

    fn paint_tree(element: &Element) -> Vec<Command> {
        let mut taffy = TaffyTree::new();
        let tree = build_box_tree(&mut taffy, element, None).unwrap();
        taffy
            .compute_layout(
                tree.node,
                TaffySize {
                    width: AvailableSpace::Definite(600.0),
                    height: AvailableSpace::Definite(800.0),
                },
            )
            .unwrap();
        let mut canvas = Canvas::new(Size::a4());
        let theme = Theme::default();
        let painter = Painter {
            taffy: &taffy,
            theme: &theme,
            debug: None,
        };
        painter.paint(&tree, &mut canvas, 0.0, 0.0).unwrap();
        canvas.finish().pages.remove(0).commands
    }

    fn leaf(classes: &str, text: &str) -> Element {
        Element::new("div")
            .with_classes(classes)
            .with_text(text)
            .with_bounds(0.0, 0.0, 100.0, 40.0)
    }

    #[test]
    fn leaves_paint_text_and_branches_do_not() {
        let commands = paint_tree(
            &Element::new("div")
                .with_bounds(0.0, 0.0, 200.0, 100.0)
                .with_text("branch text")
                .with_child(leaf("", "leaf text")),
        );
        let texts: Vec<&str> = commands
            .iter()
            .filter_map(|cmd| match cmd {
                Command::DrawString { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(texts, ["leaf text"]);
    }

    #[test]
    fn empty_leaves_still_paint_an_empty_string() {
        let commands = paint_tree(&leaf("", ""));
        assert!(commands
            .iter()
            .any(|cmd| matches!(cmd, Command::DrawString { text, .. } if text.is_empty())));
    }

    #[test]
    fn text_anchor_sums_the_raw_padding_slots() {
        let commands = paint_tree(&leaf("p-2 px-4 pl-1", "anchored"));
        let (x, y) = commands
            .iter()
            .find_map(|cmd| match cmd {
                Command::DrawString { x, y, .. } => Some((*x, *y)),
                _ => None,
            })
            .unwrap();
        // left 4 + all 8 + horizontal 16; top 0 + all 8 + vertical 0 + 40/2.
        assert_eq!(x, Pt::from_f32(28.0));
        assert_eq!(y, Pt::from_f32(28.0));
    }

    #[test]
    fn background_fills_and_its_absence_strokes() {
        let commands = paint_tree(&leaf("bg-blue-500", "x"));
        assert!(commands
            .iter()
            .any(|cmd| matches!(cmd, Command::DrawRoundedRect { fill: true, .. })));

        let commands = paint_tree(&leaf("", "x"));
        assert!(commands
            .iter()
            .any(|cmd| matches!(cmd, Command::DrawRoundedRect { fill: false, .. })));
    }

    #[test]
    fn sibling_inherits_the_parent_state_not_the_predecessors() {
        let red = Theme::default().resolve_color("red", Some("500")).unwrap();
        let element = Element::new("div")
            .with_classes("bg-blue-500")
            .with_bounds(0.0, 0.0, 200.0, 100.0)
            .with_child(leaf("bg-red-500", "first"))
            .with_child(leaf("bg-red-500", "second"));
        let commands = paint_tree(&element);
        // Each sibling must re-establish red: after the first child's frame
        // the ambient fill has reverted to the parent's blue, so the second
        // set is not deduplicated away.
        let red_sets = commands
            .iter()
            .filter(|cmd| matches!(cmd, Command::SetFillColor(color) if *color == red))
            .count();
        assert_eq!(red_sets, 2);
    }

    #[test]
    fn ambient_state_is_restored_after_the_pass() {
        let mut taffy = TaffyTree::new();
        let element = leaf("text-white text-2xl bg-blue-500", "hello");
        let tree = build_box_tree(&mut taffy, &element, None).unwrap();
        taffy
            .compute_layout(
                tree.node,
                TaffySize {
                    width: AvailableSpace::Definite(600.0),
                    height: AvailableSpace::Definite(800.0),
                },
            )
            .unwrap();
        let mut canvas = Canvas::new(Size::a4());
        let theme = Theme::default();
        let painter = Painter {
            taffy: &taffy,
            theme: &theme,
            debug: None,
        };
        painter.paint(&tree, &mut canvas, 0.0, 0.0).unwrap();
        assert_eq!(canvas.fill_color(), Color::WHITE);
        assert_eq!(canvas.text_color(), Color::BLACK);
        assert_eq!(canvas.font_size(), Pt::from_f32(12.0));
        assert_eq!(canvas.line_height_factor(), 1.15);
    }

    #[test]
    fn save_and_restore_bracket_every_frame() {
        let element = Element::new("div")
            .with_bounds(0.0, 0.0, 200.0, 100.0)
            .with_child(leaf("", "a"))
            .with_child(leaf("", "b"));
        let commands = paint_tree(&element);
        let saves = commands
            .iter()
            .filter(|cmd| matches!(cmd, Command::SaveState))
            .count();
        let restores = commands
            .iter()
            .filter(|cmd| matches!(cmd, Command::RestoreState))
            .count();
        assert_eq!(saves, 3);
        assert_eq!(restores, 3);
    }
}
