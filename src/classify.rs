//! Shape predicates for rendered nodes.
//!
//! Two authoring styles are recognized: JSX literals and explicit
//! `React.createElement(...)` calls. Import aliases are not followed.

use crate::tree::{Cursor, NodeKind};

pub const RENDER_NAMESPACE: &str = "React";
pub const FRAGMENT_NAME: &str = "Fragment";
pub const CREATE_ELEMENT: &str = "createElement";

fn identifier_name<'t>(node: Option<Cursor<'t>>) -> Option<&'t str> {
    node.and_then(|cursor| cursor.kind().name())
}

/// `object.property` where both sides are the given identifiers.
fn is_member_of(node: Cursor<'_>, object: &str, property: &str) -> bool {
    match node.kind() {
        NodeKind::Member {
            object: obj,
            property: prop,
        } => {
            identifier_name(node.follow(*obj)) == Some(object)
                && identifier_name(node.follow(*prop)) == Some(property)
        }
        _ => false,
    }
}

/// `<>...</>`, `createElement(Fragment, ...)` or `createElement(React.Fragment, ...)`.
pub fn is_fragment(node: Option<Cursor<'_>>) -> bool {
    let Some(node) = node else {
        return false;
    };

    match node.kind() {
        NodeKind::JsxFragment => true,
        NodeKind::Call { arguments, .. } => {
            let Some(first) = node.follow(arguments.first().copied().flatten()) else {
                return false;
            };
            match first.kind() {
                NodeKind::Identifier { name } => name == FRAGMENT_NAME,
                NodeKind::Member { .. } => is_member_of(first, RENDER_NAMESPACE, FRAGMENT_NAME),
                _ => false,
            }
        }
        _ => false,
    }
}

/// JSX element literal or a `React.createElement(...)` call. Fragments
/// built through `createElement` match too; see [`is_element`].
pub fn is_render_call(node: Cursor<'_>) -> bool {
    match node.kind() {
        NodeKind::JsxElement => true,
        NodeKind::Call { callee, .. } => node
            .follow(*callee)
            .is_some_and(|callee| is_member_of(callee, RENDER_NAMESPACE, CREATE_ELEMENT)),
        _ => false,
    }
}

pub fn is_element(node: Option<Cursor<'_>>) -> bool {
    node.is_some_and(|cursor| is_render_call(cursor) && !is_fragment(Some(cursor)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::{NodeId, Slot, SyntaxTree};
    use oxc_span::SPAN;

    fn member(tree: &mut SyntaxTree, parent: NodeId, object: &str, property: &str) -> NodeId {
        let member = tree.push(Some(parent), NodeKind::member(), SPAN);
        let obj = tree.push(Some(member), NodeKind::identifier(object), SPAN);
        let prop = tree.push(Some(member), NodeKind::identifier(property), SPAN);
        tree.bind(member, Slot::Object, obj);
        tree.bind(member, Slot::Property, prop);
        member
    }

    /// `React.createElement(<first>, null)` where `first` is built by `arg`.
    fn create_element(
        tree: &mut SyntaxTree,
        arg: impl FnOnce(&mut SyntaxTree, NodeId) -> NodeId,
    ) -> NodeId {
        let call = tree.push(None, NodeKind::call(2), SPAN);
        let callee = member(tree, call, "React", "createElement");
        tree.bind(call, Slot::Callee, callee);
        let first = arg(tree, call);
        tree.bind(call, Slot::Argument(0), first);
        let null = tree.push(Some(call), NodeKind::Other, SPAN);
        tree.bind(call, Slot::Argument(1), null);
        call
    }

    #[test]
    fn test_null_is_neither() {
        assert!(!is_fragment(None));
        assert!(!is_element(None));
    }

    #[test]
    fn test_jsx_literals() {
        let mut tree = SyntaxTree::new();
        let element = tree.push(None, NodeKind::JsxElement, SPAN);
        let fragment = tree.push(None, NodeKind::JsxFragment, SPAN);

        assert!(is_element(Some(tree.cursor(element))));
        assert!(!is_fragment(Some(tree.cursor(element))));
        assert!(is_fragment(Some(tree.cursor(fragment))));
        assert!(!is_element(Some(tree.cursor(fragment))));
    }

    #[test]
    fn test_create_element_with_tag() {
        let mut tree = SyntaxTree::new();
        let call = create_element(&mut tree, |tree, call| {
            tree.push(Some(call), NodeKind::Other, SPAN)
        });
        let cursor = tree.cursor(call);
        assert!(is_render_call(cursor));
        assert!(is_element(Some(cursor)));
        assert!(!is_fragment(Some(cursor)));
    }

    #[test]
    fn test_create_element_fragment_forms() {
        let mut tree = SyntaxTree::new();
        let bare = create_element(&mut tree, |tree, call| {
            tree.push(Some(call), NodeKind::identifier("Fragment"), SPAN)
        });
        let qualified = create_element(&mut tree, |tree, call| {
            member(tree, call, "React", "Fragment")
        });

        for call in [bare, qualified] {
            let cursor = tree.cursor(call);
            assert!(is_render_call(cursor));
            assert!(is_fragment(Some(cursor)));
            assert!(!is_element(Some(cursor)), "fragments are never elements");
        }
    }

    #[test]
    fn test_other_namespace_is_not_a_fragment() {
        let mut tree = SyntaxTree::new();
        let call = create_element(&mut tree, |tree, call| {
            member(tree, call, "Preact", "Fragment")
        });
        assert!(!is_fragment(Some(tree.cursor(call))));
        assert!(is_element(Some(tree.cursor(call))));
    }

    #[test]
    fn test_plain_call_is_not_rendered() {
        let mut tree = SyntaxTree::new();
        let call = tree.push(None, NodeKind::call(0), SPAN);
        let callee = tree.push(Some(call), NodeKind::identifier("render"), SPAN);
        tree.bind(call, Slot::Callee, callee);

        assert!(!is_render_call(tree.cursor(call)));
        assert!(!is_element(Some(tree.cursor(call))));
    }

    #[test]
    fn test_fragment_and_element_disjoint_over_whole_tree() {
        let mut tree = SyntaxTree::new();
        create_element(&mut tree, |tree, call| {
            tree.push(Some(call), NodeKind::identifier("Fragment"), SPAN)
        });
        create_element(&mut tree, |tree, call| {
            tree.push(Some(call), NodeKind::Other, SPAN)
        });
        tree.push(None, NodeKind::JsxFragment, SPAN);
        tree.push(None, NodeKind::JsxElement, SPAN);

        for id in tree.node_ids() {
            let cursor = Some(tree.cursor(id));
            if is_fragment(cursor) {
                assert!(!is_element(cursor));
            }
        }
    }
}
