//! Arena-backed syntax tree for component lookup.
//!
//! Nodes own their children through the arena; the parent link is a plain
//! index, so upward traversal through a [`Cursor`] never owns anything.

use oxc_span::Span;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Node discriminant. Variants that carry shape data link to their
/// children by id; those links are bound through [`SyntaxTree::bind`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum NodeKind {
    Program,
    JsxElement,
    JsxFragment,
    Call {
        callee: Option<NodeId>,
        arguments: Vec<Option<NodeId>>,
    },
    Member {
        object: Option<NodeId>,
        property: Option<NodeId>,
    },
    Identifier {
        name: String,
    },
    Return,
    ArrowFunction {
        /// Expression-bodied arrow (implicit return).
        expression: bool,
    },
    FunctionExpression {
        id: Option<NodeId>,
    },
    ClassMethod,
    ObjectMethod,
    FunctionDeclaration {
        id: Option<NodeId>,
    },
    VariableDeclaration {
        declarations: Vec<NodeId>,
    },
    VariableDeclarator {
        id: Option<NodeId>,
    },
    ClassDeclaration {
        id: Option<NodeId>,
    },
    ExportDefaultDeclaration {
        declaration: Option<NodeId>,
    },
    ExportNamedDeclaration {
        declaration: Option<NodeId>,
    },
    Conditional,
    Sequence,
    Logical,
    Other,
}

impl NodeKind {
    pub fn call(argument_count: usize) -> Self {
        NodeKind::Call {
            callee: None,
            arguments: vec![None; argument_count],
        }
    }

    pub fn member() -> Self {
        NodeKind::Member {
            object: None,
            property: None,
        }
    }

    pub fn identifier(name: impl Into<String>) -> Self {
        NodeKind::Identifier { name: name.into() }
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            NodeKind::Identifier { name } => Some(name),
            _ => None,
        }
    }

    /// Functions that can serve as a component body.
    pub fn is_function_like(&self) -> bool {
        matches!(
            self,
            NodeKind::ArrowFunction { .. }
                | NodeKind::FunctionExpression { .. }
                | NodeKind::ClassMethod
                | NodeKind::ObjectMethod
                | NodeKind::FunctionDeclaration { .. }
        )
    }

    /// Declarations that can own a named component definition.
    pub fn is_declaration_root(&self) -> bool {
        matches!(
            self,
            NodeKind::VariableDeclaration { .. }
                | NodeKind::ClassDeclaration { .. }
                | NodeKind::ExportDefaultDeclaration { .. }
                | NodeKind::ExportNamedDeclaration { .. }
                | NodeKind::FunctionDeclaration { .. }
        )
    }

    /// The node's own binding identifier, for kinds that carry one.
    pub fn own_id(&self) -> Option<NodeId> {
        match self {
            NodeKind::FunctionExpression { id }
            | NodeKind::FunctionDeclaration { id }
            | NodeKind::VariableDeclarator { id }
            | NodeKind::ClassDeclaration { id } => *id,
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            NodeKind::Program => "program",
            NodeKind::JsxElement => "jsx-element",
            NodeKind::JsxFragment => "jsx-fragment",
            NodeKind::Call { .. } => "call-expression",
            NodeKind::Member { .. } => "member-expression",
            NodeKind::Identifier { .. } => "identifier",
            NodeKind::Return => "return-statement",
            NodeKind::ArrowFunction { .. } => "arrow-function",
            NodeKind::FunctionExpression { .. } => "function-expression",
            NodeKind::ClassMethod => "class-method",
            NodeKind::ObjectMethod => "object-method",
            NodeKind::FunctionDeclaration { .. } => "function-declaration",
            NodeKind::VariableDeclaration { .. } => "variable-declaration",
            NodeKind::VariableDeclarator { .. } => "variable-declarator",
            NodeKind::ClassDeclaration { .. } => "class-declaration",
            NodeKind::ExportDefaultDeclaration { .. } => "export-default-declaration",
            NodeKind::ExportNamedDeclaration { .. } => "export-named-declaration",
            NodeKind::Conditional => "conditional-expression",
            NodeKind::Sequence => "sequence-expression",
            NodeKind::Logical => "logical-expression",
            NodeKind::Other => "other",
        }
    }
}

/// Role a child plays inside its owner's [`NodeKind`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    Callee,
    Argument(usize),
    Object,
    Property,
    Id,
    Declaration,
}

#[derive(Debug, Clone, Serialize)]
pub struct Node {
    pub kind: NodeKind,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    #[serde(skip)]
    pub span: Span,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct SyntaxTree {
    nodes: Vec<Node>,
}

impl SyntaxTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Appends a node under `parent`. Variable declarators pushed under a
    /// variable declaration are recorded as its declarations.
    pub fn push(&mut self, parent: Option<NodeId>, kind: NodeKind, span: Span) -> NodeId {
        let id = NodeId(self.nodes.len());
        let is_declarator = matches!(kind, NodeKind::VariableDeclarator { .. });
        self.nodes.push(Node {
            kind,
            parent,
            children: Vec::new(),
            span,
        });

        if let Some(parent) = parent {
            let owner = &mut self.nodes[parent.0];
            owner.children.push(id);
            if is_declarator {
                if let NodeKind::VariableDeclaration { declarations } = &mut owner.kind {
                    declarations.push(id);
                }
            }
        }
        id
    }

    /// Links `child` into `owner`'s shape. Returns false when the owner's
    /// kind has no such slot.
    pub fn bind(&mut self, owner: NodeId, slot: Slot, child: NodeId) -> bool {
        let target = match (&mut self.nodes[owner.0].kind, slot) {
            (NodeKind::Call { callee, .. }, Slot::Callee) => callee,
            (NodeKind::Call { arguments, .. }, Slot::Argument(i)) => {
                if i >= arguments.len() {
                    arguments.resize(i + 1, None);
                }
                &mut arguments[i]
            }
            (NodeKind::Member { object, .. }, Slot::Object) => object,
            (NodeKind::Member { property, .. }, Slot::Property) => property,
            (
                NodeKind::FunctionExpression { id }
                | NodeKind::FunctionDeclaration { id }
                | NodeKind::VariableDeclarator { id }
                | NodeKind::ClassDeclaration { id },
                Slot::Id,
            ) => id,
            (
                NodeKind::ExportDefaultDeclaration { declaration }
                | NodeKind::ExportNamedDeclaration { declaration },
                Slot::Declaration,
            ) => declaration,
            _ => return false,
        };
        *target = Some(child);
        true
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.nodes[id.0].kind
    }

    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.nodes.len()).map(NodeId)
    }

    pub fn root(&self) -> Option<Cursor<'_>> {
        self.node_ids()
            .find(|id| self.nodes[id.0].parent.is_none())
            .map(|id| self.cursor(id))
    }

    pub fn cursor(&self, node: NodeId) -> Cursor<'_> {
        Cursor { tree: self, node }
    }
}

/// Non-owning view of a node and, through the arena, its ancestors.
#[derive(Clone, Copy)]
pub struct Cursor<'t> {
    tree: &'t SyntaxTree,
    node: NodeId,
}

impl<'t> Cursor<'t> {
    pub fn id(&self) -> NodeId {
        self.node
    }

    pub fn tree(&self) -> &'t SyntaxTree {
        self.tree
    }

    pub fn kind(&self) -> &'t NodeKind {
        self.tree.kind(self.node)
    }

    pub fn span(&self) -> Span {
        self.tree.node(self.node).span
    }

    pub fn parent(&self) -> Option<Cursor<'t>> {
        self.tree
            .node(self.node)
            .parent
            .map(|parent| self.tree.cursor(parent))
    }

    /// Follows an optional link stored in this node's kind.
    pub fn follow(&self, link: Option<NodeId>) -> Option<Cursor<'t>> {
        link.map(|id| self.tree.cursor(id))
    }

    pub fn ancestors(&self) -> impl Iterator<Item = Cursor<'t>> + 't {
        std::iter::successors(self.parent(), |cursor| cursor.parent())
    }
}

impl PartialEq for Cursor<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.tree, other.tree) && self.node == other.node
    }
}

impl Eq for Cursor<'_> {}

impl std::fmt::Debug for Cursor<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cursor")
            .field("node", &self.node)
            .field("kind", &self.kind().label())
            .finish()
    }
}
