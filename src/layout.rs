use crate::debug::DebugLog;
use crate::element::Element;
use crate::error::BoxPressError;
use crate::style::{EdgeOffsets, LayoutStyle};
use crate::types::Rect;
use taffy::{NodeId, TaffyTree};

/// One node of the box tree: the source element, its bounding-box snapshot,
/// the owned layout node, and child boxes in source order. `children` is
/// absent exactly when the source element has no child elements; such leaves
/// are text-painted, never recursed into.
pub(crate) struct BoxNode<'a> {
    pub id: String,
    pub element: &'a Element,
    pub bounds: Rect,
    pub node: NodeId,
    pub padding: EdgeOffsets,
    pub children: Option<Vec<BoxNode<'a>>>,
}

/// Builds the box tree depth-first in pre-order. Every element gets one
/// layout node sized to its bounding box with all of its class tokens
/// applied; child layout nodes are appended to their parent in source
/// order. Token application cannot fail the build.
pub(crate) fn build_box_tree<'a>(
    taffy: &mut TaffyTree<()>,
    element: &'a Element,
    debug: Option<&DebugLog>,
) -> Result<BoxNode<'a>, BoxPressError> {
    build_node(taffy, element, None, debug)
}

fn build_node<'a>(
    taffy: &mut TaffyTree<()>,
    element: &'a Element,
    assigned_id: Option<String>,
    debug: Option<&DebugLog>,
) -> Result<BoxNode<'a>, BoxPressError> {
    let mut style = LayoutStyle::sized(
        element.bounds.width.to_f32(),
        element.bounds.height.to_f32(),
    );
    for token in &element.classes {
        if style.apply_token(token) {
            if let Some(log) = debug {
                log.increment("tokens.layout.applied", 1);
            }
        } else if let Some(log) = debug {
            log.increment("tokens.layout.passed", 1);
        }
    }

    let id = assigned_id
        .or_else(|| element.id.clone())
        .unwrap_or_else(|| element.tag.clone());
    let node = taffy.new_leaf(style.to_taffy())?;

    if element.children.is_empty() {
        return Ok(BoxNode {
            id,
            element,
            bounds: element.bounds,
            node,
            padding: style.padding,
            children: None,
        });
    }

    let mut children = Vec::with_capacity(element.children.len());
    for (index, child) in element.children.iter().enumerate() {
        // Children without an explicit id inherit a generated one so every
        // box stays addressable in traces.
        let child_id = child
            .id
            .clone()
            .unwrap_or_else(|| format!("{}-{}", id, index));
        let built = build_node(taffy, child, Some(child_id), debug)?;
        taffy.add_child(node, built.node)?;
        children.push(built);
    }

    Ok(BoxNode {
        id,
        element,
        bounds: element.bounds,
        node,
        padding: style.padding,
        children: Some(children),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(tag: &str, text: &str) -> Element {
        Element::new(tag).with_text(text).with_bounds(0.0, 0.0, 50.0, 20.0)
    }

    #[test]
    fn leaves_have_no_children_field() {
        let mut taffy = TaffyTree::new();
        let element = leaf("span", "x");
        let tree = build_box_tree(&mut taffy, &element, None).unwrap();
        assert!(tree.children.is_none());
    }

    #[test]
    fn child_order_matches_source_order() {
        let mut taffy = TaffyTree::new();
        let element = Element::new("div")
            .with_id("root")
            .with_bounds(0.0, 0.0, 200.0, 100.0)
            .with_child(leaf("span", "a"))
            .with_child(leaf("span", "b"))
            .with_child(leaf("span", "c"));
        let tree = build_box_tree(&mut taffy, &element, None).unwrap();

        let children = tree.children.as_ref().unwrap();
        let texts: Vec<&str> = children
            .iter()
            .map(|child| child.element.text.as_str())
            .collect();
        assert_eq!(texts, ["a", "b", "c"]);

        // The layout nodes were appended in the same order.
        let layout_children = taffy.children(tree.node).unwrap();
        let box_nodes: Vec<NodeId> = children.iter().map(|child| child.node).collect();
        assert_eq!(layout_children, box_nodes);
    }

    #[test]
    fn generated_ids_fill_in_missing_ones() {
        let mut taffy = TaffyTree::new();
        let element = Element::new("div")
            .with_id("root")
            .with_bounds(0.0, 0.0, 200.0, 100.0)
            .with_child(leaf("span", "first"))
            .with_child(leaf("span", "second").with_id("explicit"));
        let tree = build_box_tree(&mut taffy, &element, None).unwrap();
        let children = tree.children.as_ref().unwrap();
        assert_eq!(children[0].id, "root-0");
        assert_eq!(children[1].id, "explicit");
    }

    #[test]
    fn tag_stands_in_for_a_missing_root_id() {
        let mut taffy = TaffyTree::new();
        let element = leaf("span", "x");
        let tree = build_box_tree(&mut taffy, &element, None).unwrap();
        assert_eq!(tree.id, "span");
    }

    #[test]
    fn unknown_tokens_cannot_fail_the_build() {
        let mut taffy = TaffyTree::new();
        let element = Element::new("div")
            .with_classes("bogus wat-9000 p-13 items-wrong bg-blue-500")
            .with_bounds(0.0, 0.0, 10.0, 10.0);
        assert!(build_box_tree(&mut taffy, &element, None).is_ok());
    }

    #[test]
    fn layout_node_carries_the_bounding_box_size() {
        let mut taffy = TaffyTree::new();
        let element = Element::new("div").with_bounds(0.0, 0.0, 120.0, 48.0);
        let tree = build_box_tree(&mut taffy, &element, None).unwrap();
        taffy
            .compute_layout(
                tree.node,
                taffy::geometry::Size {
                    width: taffy::AvailableSpace::Definite(500.0),
                    height: taffy::AvailableSpace::Definite(500.0),
                },
            )
            .unwrap();
        let layout = taffy.layout(tree.node).unwrap();
        assert_eq!(layout.size.width, 120.0);
        assert_eq!(layout.size.height, 48.0);
    }
}
