//! Names for a located component declaration.

use crate::error::{Error, Result};
use crate::locate::ComponentLocation;
use crate::tree::{Cursor, NodeId, NodeKind};

pub const DEFAULT_EXPORT_NAME: &str = "default";

fn binding_name<'t>(owner: Cursor<'t>, link: Option<NodeId>) -> Option<&'t str> {
    owner.follow(link).and_then(|ident| ident.kind().name())
}

/// Names a located component. The first entry is the primary key; default
/// exports yield `"default"` followed by the declared name, if any.
pub fn component_names(location: &ComponentLocation<'_>) -> Result<Vec<String>> {
    let declaration = location.declaration;
    let kind = declaration.kind();

    let is_default_export = matches!(kind, NodeKind::ExportDefaultDeclaration { .. })
        || declaration
            .parent()
            .is_some_and(|parent| matches!(parent.kind(), NodeKind::ExportDefaultDeclaration { .. }));

    if is_default_export {
        let mut names = vec![DEFAULT_EXPORT_NAME.to_string()];
        if let Some(name) = binding_name(declaration, kind.own_id()) {
            if name != DEFAULT_EXPORT_NAME {
                names.push(name.to_string());
            }
        }
        return Ok(names);
    }

    let name = match kind {
        NodeKind::VariableDeclaration { declarations } => {
            let declarator = declarations.first().map(|id| declaration.tree().cursor(*id));
            declarator
                .and_then(|declarator| binding_name(declarator, declarator.kind().own_id()))
                .ok_or_else(|| {
                    Error::unsupported(
                        "variable-declaration",
                        "first declarator does not bind a plain identifier",
                    )
                })?
        }
        other => binding_name(declaration, other.own_id()).ok_or_else(|| {
            Error::unsupported(other.label(), "declaration has no identifier")
        })?,
    };

    Ok(vec![name.to_string()])
}
