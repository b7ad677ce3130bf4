//! Lowers an oxc program into a [`SyntaxTree`].
//!
//! The resulting parent links follow the Babel AST shape the locator walks:
//! no parenthesized expressions, expression-bodied arrows
//! own their body expression directly, and class/object methods are single
//! nodes rather than a property wrapping a function.

use oxc_allocator::Allocator;
use oxc_ast::ast::{ClassType, FunctionType, Program, PropertyKind};
use oxc_ast::AstKind;
use oxc_ast_visit::Visit;
use oxc_parser::{ParseOptions, Parser};
use oxc_span::{GetSpan, SourceType, Span};

use crate::error::{Error, Result};
use crate::tree::{NodeId, NodeKind, Slot, SyntaxTree};

struct Frame {
    node: Option<NodeId>,
    transparent: bool,
    /// Child spans still waiting to be bound into this node's shape.
    pending: Vec<(Slot, Span)>,
    /// Span of a function value folded into this method node.
    folds: Option<Span>,
}

#[derive(Default)]
struct TreeLowering {
    tree: SyntaxTree,
    stack: Vec<Frame>,
}

impl TreeLowering {
    fn current(&self) -> Option<NodeId> {
        self.stack.last().and_then(|frame| frame.node)
    }

    fn owner_frame(&mut self) -> Option<&mut Frame> {
        self.stack.iter_mut().rev().find(|frame| !frame.transparent)
    }

    fn pass_through(&mut self) {
        let node = self.current();
        self.stack.push(Frame {
            node,
            transparent: true,
            pending: Vec::new(),
            folds: None,
        });
    }

    fn parent_is_expression_arrow(&self) -> bool {
        self.current().is_some_and(|parent| {
            matches!(
                self.tree.kind(parent),
                NodeKind::ArrowFunction { expression: true }
            )
        })
    }

    fn is_transparent(&mut self, kind: &AstKind<'_>, span: Span) -> bool {
        match kind {
            AstKind::ParenthesizedExpression(_) => true,
            AstKind::FunctionBody(_) | AstKind::ExpressionStatement(_) => {
                self.parent_is_expression_arrow()
            }
            AstKind::Function(_) => self
                .owner_frame()
                .is_some_and(|frame| frame.folds == Some(span)),
            _ => false,
        }
    }

    /// Takes the pending slot of the owning node that `span` fills.
    fn claim_slot(&mut self, span: Span) -> Option<(NodeId, Slot)> {
        let frame = self.owner_frame()?;
        let index = frame
            .pending
            .iter()
            .position(|(_, pending)| *pending == span)?;
        let (slot, _) = frame.pending.remove(index);
        frame.node.map(|owner| (owner, slot))
    }

    /// Slot of the owning node that `span` would fill, without taking it.
    fn pending_slot(&mut self, span: Span) -> Option<Slot> {
        let frame = self.owner_frame()?;
        frame
            .pending
            .iter()
            .find(|(_, pending)| *pending == span)
            .map(|(slot, _)| *slot)
    }
}

/// Maps an oxc node onto the tree vocabulary, with the child spans that
/// fill its shape and the span of a function value it absorbs.
fn lower_kind(kind: &AstKind<'_>) -> Option<(NodeKind, Vec<(Slot, Span)>, Option<Span>)> {
    let lowered = match kind {
        AstKind::Program(_) => (NodeKind::Program, vec![], None),
        AstKind::JSXElement(_) => (NodeKind::JsxElement, vec![], None),
        AstKind::JSXFragment(_) => (NodeKind::JsxFragment, vec![], None),
        AstKind::CallExpression(call) => {
            let mut pending = vec![(Slot::Callee, call.callee.span())];
            pending.extend(
                call.arguments
                    .iter()
                    .enumerate()
                    .map(|(i, argument)| (Slot::Argument(i), argument.span())),
            );
            (NodeKind::call(call.arguments.len()), pending, None)
        }
        AstKind::StaticMemberExpression(member) => (
            NodeKind::member(),
            vec![
                (Slot::Object, member.object.span()),
                (Slot::Property, member.property.span),
            ],
            None,
        ),
        AstKind::IdentifierReference(ident) => {
            (NodeKind::identifier(ident.name.as_str()), vec![], None)
        }
        AstKind::IdentifierName(ident) => (NodeKind::identifier(ident.name.as_str()), vec![], None),
        AstKind::BindingIdentifier(ident) => {
            (NodeKind::identifier(ident.name.as_str()), vec![], None)
        }
        AstKind::ReturnStatement(_) => (NodeKind::Return, vec![], None),
        AstKind::ArrowFunctionExpression(arrow) => (
            NodeKind::ArrowFunction {
                expression: arrow.expression,
            },
            vec![],
            None,
        ),
        AstKind::Function(func) => {
            let lowered = match func.r#type {
                FunctionType::FunctionDeclaration => NodeKind::FunctionDeclaration { id: None },
                FunctionType::FunctionExpression => NodeKind::FunctionExpression { id: None },
                _ => return None,
            };
            let pending = func.id.iter().map(|id| (Slot::Id, id.span)).collect();
            (lowered, pending, None)
        }
        AstKind::Class(class) => {
            if !matches!(class.r#type, ClassType::ClassDeclaration) {
                return None;
            }
            let pending = class.id.iter().map(|id| (Slot::Id, id.span)).collect();
            (NodeKind::ClassDeclaration { id: None }, pending, None)
        }
        AstKind::MethodDefinition(method) => (NodeKind::ClassMethod, vec![], Some(method.value.span)),
        AstKind::ObjectProperty(prop) if prop.method || !matches!(prop.kind, PropertyKind::Init) => {
            (NodeKind::ObjectMethod, vec![], Some(prop.value.span()))
        }
        AstKind::VariableDeclaration(_) => (
            NodeKind::VariableDeclaration {
                declarations: vec![],
            },
            vec![],
            None,
        ),
        AstKind::VariableDeclarator(declarator) => (
            NodeKind::VariableDeclarator { id: None },
            vec![(Slot::Id, declarator.id.span())],
            None,
        ),
        AstKind::ExportDefaultDeclaration(export) => (
            NodeKind::ExportDefaultDeclaration { declaration: None },
            vec![(Slot::Declaration, export.declaration.span())],
            None,
        ),
        AstKind::ExportNamedDeclaration(export) => (
            NodeKind::ExportNamedDeclaration { declaration: None },
            export
                .declaration
                .iter()
                .map(|declaration| (Slot::Declaration, declaration.span()))
                .collect(),
            None,
        ),
        AstKind::ConditionalExpression(_) => (NodeKind::Conditional, vec![], None),
        AstKind::SequenceExpression(_) => (NodeKind::Sequence, vec![], None),
        AstKind::LogicalExpression(_) => (NodeKind::Logical, vec![], None),
        _ => return None,
    };
    Some(lowered)
}

impl<'a> Visit<'a> for TreeLowering {
    fn enter_node(&mut self, kind: AstKind<'a>) {
        let span = kind.span();
        if self.is_transparent(&kind, span) {
            self.pass_through();
            return;
        }

        let (node_kind, pending, folds) = match lower_kind(&kind) {
            Some(lowered) => lowered,
            // Binding pattern wrappers share the span of the identifier or
            // pattern they hold. Any other unmodelled slot child stays in
            // the tree as `Other` so it blocks return flow.
            None if self.pending_slot(span) == Some(Slot::Id) => {
                self.pass_through();
                return;
            }
            None => (NodeKind::Other, vec![], None),
        };

        let parent = self.current();
        let id = self.tree.push(parent, node_kind, span);
        if let Some((owner, slot)) = self.claim_slot(span) {
            self.tree.bind(owner, slot, id);
        }
        self.stack.push(Frame {
            node: Some(id),
            transparent: false,
            pending,
            folds,
        });
    }

    fn leave_node(&mut self, _kind: AstKind<'a>) {
        self.stack.pop();
    }
}

pub fn lower_program(program: &Program<'_>) -> SyntaxTree {
    let mut lowering = TreeLowering::default();
    lowering.visit_program(program);
    lowering.tree
}

fn source_type_for(filename: &str) -> SourceType {
    match SourceType::from_path(filename) {
        Ok(source_type) if source_type.is_typescript() => source_type.with_module(true),
        Ok(source_type) => source_type.with_module(true).with_jsx(true),
        Err(_) => SourceType::default().with_module(true).with_jsx(true),
    }
}

/// Parses `source` and lowers it. Any parser diagnostic fails the file.
pub fn parse_source(source: &str, filename: &str) -> Result<SyntaxTree> {
    let allocator = Allocator::default();
    let options = ParseOptions {
        preserve_parens: false,
        ..ParseOptions::default()
    };
    let ret = Parser::new(&allocator, source, source_type_for(filename))
        .with_options(options)
        .parse();

    if ret.panicked || !ret.errors.is_empty() {
        return Err(Error::Parse {
            file: filename.to_string(),
            messages: ret.errors.iter().map(|e| e.to_string()).collect(),
        });
    }

    Ok(lower_program(&ret.program))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::Cursor;

    fn find<'t>(tree: &'t SyntaxTree, pred: impl Fn(&NodeKind) -> bool) -> Vec<Cursor<'t>> {
        tree.node_ids()
            .map(|id| tree.cursor(id))
            .filter(|cursor| pred(cursor.kind()))
            .collect()
    }

    fn parent_label(cursor: Cursor<'_>) -> &'static str {
        cursor.parent().map(|p| p.kind().label()).unwrap_or("none")
    }

    #[test]
    fn test_expression_arrow_owns_body() {
        let tree = parse_source("const A = () => (<div />);", "a.js").unwrap();
        let elements = find(&tree, |k| matches!(k, NodeKind::JsxElement));
        assert_eq!(elements.len(), 1);
        assert_eq!(parent_label(elements[0]), "arrow-function");
    }

    #[test]
    fn test_block_arrow_returns_through_statement() {
        let tree = parse_source("const A = () => { return <div />; };", "a.jsx").unwrap();
        let elements = find(&tree, |k| matches!(k, NodeKind::JsxElement));
        assert_eq!(parent_label(elements[0]), "return-statement");
    }

    #[test]
    fn test_create_element_call_shape() {
        let tree = parse_source(
            "React.createElement(React.Fragment, null, child);",
            "a.js",
        )
        .unwrap();
        let calls = find(&tree, |k| matches!(k, NodeKind::Call { .. }));
        assert_eq!(calls.len(), 1);

        let NodeKind::Call { callee, arguments } = calls[0].kind() else {
            unreachable!()
        };
        assert_eq!(arguments.len(), 3);
        assert!(arguments.iter().all(Option::is_some));

        let callee = calls[0].follow(*callee).unwrap();
        let NodeKind::Member { object, property } = callee.kind() else {
            panic!("callee should be a member expression, got {:?}", callee);
        };
        assert_eq!(callee.follow(*object).unwrap().kind().name(), Some("React"));
        assert_eq!(
            callee.follow(*property).unwrap().kind().name(),
            Some("createElement")
        );

        let first = calls[0].follow(arguments[0]).unwrap();
        assert!(matches!(first.kind(), NodeKind::Member { .. }));
    }

    #[test]
    fn test_unmodelled_argument_stays_in_tree() {
        let sources = [
            "wrap([<div />]);",
            "wrap(new Box(<div />));",
            "wrap(!<div />);",
            "wrap(`${<div />}`);",
        ];
        for source in sources {
            let tree = parse_source(source, "a.jsx").unwrap();
            let elements = find(&tree, |k| matches!(k, NodeKind::JsxElement));
            assert_eq!(parent_label(elements[0]), "other", "{}", source);

            let calls = find(&tree, |k| matches!(k, NodeKind::Call { .. }));
            let NodeKind::Call { arguments, .. } = calls[0].kind() else {
                unreachable!()
            };
            let argument = calls[0].follow(arguments[0]).unwrap();
            assert_eq!(argument.kind().label(), "other", "{}", source);
        }
    }

    #[test]
    fn test_typed_and_destructured_bindings_pass_through() {
        let tree = parse_source("const A: Props = 1; const { b } = c;", "a.tsx").unwrap();
        let declarators = find(&tree, |k| matches!(k, NodeKind::VariableDeclarator { .. }));
        assert_eq!(declarators.len(), 2);

        let typed = declarators[0].follow(declarators[0].kind().own_id()).unwrap();
        assert_eq!(typed.kind().name(), Some("A"));
        // Object patterns are not identifiers; their properties hang off the declarator.
        let pattern_children: Vec<&str> = tree
            .node_ids()
            .map(|id| tree.cursor(id))
            .filter(|cursor| cursor.parent() == Some(declarators[1]))
            .map(|cursor| cursor.kind().label())
            .collect();
        assert!(!pattern_children.is_empty());
    }

    #[test]
    fn test_declaration_ids_bound() {
        let source = r#"
            function Foo() {}
            class Bar {}
            const Baz = 1;
            export default function Qux() {}
        "#;
        let tree = parse_source(source, "a.js").unwrap();

        let named: Vec<&str> = tree
            .node_ids()
            .map(|id| tree.cursor(id))
            .filter_map(|cursor| cursor.follow(cursor.kind().own_id()))
            .filter_map(|ident| ident.kind().name())
            .collect();
        assert_eq!(named, vec!["Foo", "Bar", "Baz", "Qux"]);

        let exports = find(&tree, |k| matches!(k, NodeKind::ExportDefaultDeclaration { .. }));
        let NodeKind::ExportDefaultDeclaration { declaration } = exports[0].kind() else {
            unreachable!()
        };
        let declaration = exports[0].follow(*declaration).unwrap();
        assert!(matches!(declaration.kind(), NodeKind::FunctionDeclaration { .. }));
    }

    #[test]
    fn test_methods_fold_function_value() {
        let source = r#"
            class A { render() { return <div />; } }
            const o = { render() { return <span />; } };
        "#;
        let tree = parse_source(source, "a.js").unwrap();
        assert_eq!(find(&tree, |k| matches!(k, NodeKind::ClassMethod)).len(), 1);
        assert_eq!(find(&tree, |k| matches!(k, NodeKind::ObjectMethod)).len(), 1);
        assert!(find(&tree, |k| matches!(k, NodeKind::FunctionExpression { .. })).is_empty());
    }

    #[test]
    fn test_class_expression_is_not_a_declaration() {
        let tree = parse_source("const A = class {};", "a.js").unwrap();
        assert!(find(&tree, |k| matches!(k, NodeKind::ClassDeclaration { .. })).is_empty());
    }

    #[test]
    fn test_parse_error_reported() {
        let err = parse_source("const = <div", "broken.js").unwrap_err();
        match err {
            Error::Parse { file, messages } => {
                assert_eq!(file, "broken.js");
                assert!(!messages.is_empty());
            }
            other => panic!("expected parse error, got {:?}", other),
        }
    }
}
