//! # Reselector Native
//!
//! Finds the component that owns a rendered element and gives it a stable id.
//!
//! ## Pipeline
//!
//! 1. **Lowering**: an oxc program is lowered into an arena [`SyntaxTree`]
//!    shaped like a Babel AST (parent links, no parentheses).
//! 2. **Classification**: JSX literals and `React.createElement(...)` calls
//!    are elements; `<>...</>` and `createElement(Fragment, ...)` are fragments.
//! 3. **Location**: from a returned element, climb to the nearest variable,
//!    class, function or export declaration that has a function body on the
//!    way. Fragments are climbed through; another element is a hard stop.
//! 4. **Naming**: default exports are named `default` first, then by their
//!    declared identifier.
//! 5. **Ids**: `string-hash("<relative path>:<name>")` in hex, with the
//!    `platform.desktop` / `platform.touch` directory tokens removed.
//!
//! Selector overrides per component id live in a [`SelectorMap`] built once
//! per compile session. Maps of ids are persisted inline with the
//! [`comment`] codec.

pub mod classify;
pub mod comment;
pub mod config;
pub mod error;
pub mod id;
pub mod locate;
pub mod lower;
pub mod naming;
pub mod scan;
pub mod selectors;
pub mod tree;


pub use classify::{is_element, is_fragment, is_render_call};
pub use config::Config;
pub use error::{Error, Result};
pub use id::{component_id, component_id_in, string_hash, ComponentId};
pub use locate::{is_returned, locate_component, ComponentLocation};
pub use lower::{lower_program, parse_source};
pub use naming::component_names;
pub use scan::{scan_dir, scan_file, scan_source, ComponentRecord, FileScan, Manifest};
pub use selectors::{SelectorMap, SelectorMapBuilder};
pub use tree::{Cursor, NodeId, NodeKind, SyntaxTree};
