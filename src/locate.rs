//! Climbs from a rendered node to the declaration that owns it.

use crate::classify::{is_element, is_fragment};
use crate::tree::{Cursor, NodeKind};

/// Result of a successful climb. Borrowed from the tree it was found in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComponentLocation<'t> {
    /// Variable, class, function or export declaration owning the component.
    pub declaration: Cursor<'t>,
    /// First function-like node met on the way up.
    pub component_body: Cursor<'t>,
}

/// Whether the value at `cursor` ends up returned from its function.
///
/// Call arguments, ternary branches, sequence items and logical operands
/// pass returned-ness through to their parent.
pub fn is_returned(cursor: Cursor<'_>) -> bool {
    let Some(parent) = cursor.parent() else {
        return false;
    };

    match parent.kind() {
        NodeKind::Call { .. } | NodeKind::Conditional | NodeKind::Sequence | NodeKind::Logical => {
            is_returned(parent)
        }
        NodeKind::Return => true,
        NodeKind::ArrowFunction { expression } => *expression,
        _ => false,
    }
}

/// Finds the component declaration for a rendered node, or `None` when the
/// node is not part of any component's returned output.
pub fn locate_component(cursor: Cursor<'_>) -> Option<ComponentLocation<'_>> {
    if let Some(parent) = cursor.parent() {
        if is_fragment(Some(parent)) {
            return locate_component(parent);
        }
    }

    if !is_returned(cursor) {
        tracing::trace!(node = ?cursor, "rendered node is not returned");
        return None;
    }

    let mut component_body: Option<Cursor<'_>> = None;
    let mut current = Some(cursor);

    while let Some(node) = current {
        let parent = node.parent();

        // Nested inside another rendered node: that node owns the boundary.
        if is_element(parent) {
            tracing::trace!(node = ?cursor, "stopped at enclosing element");
            return None;
        }

        if component_body.is_none() && node.kind().is_function_like() {
            component_body = Some(node);
        }

        if let Some(component_body) = component_body {
            if node.kind().is_declaration_root() {
                return Some(ComponentLocation {
                    declaration: node,
                    component_body,
                });
            }
        }

        current = parent;
    }

    tracing::trace!(node = ?cursor, "no enclosing declaration");
    None
}
