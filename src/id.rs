//! Stable component ids.
//!
//! An id is the `string-hash` of `<relative path>:<name>`, rendered in hex.
//! Paths are lower-cased and taken relative to the project root, and the
//! platform directory tokens are removed so that `platform.desktop` and
//! `platform.touch` builds of one component share an id.

#[cfg(feature = "napi")]
use napi_derive::napi;
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

lazy_static! {
    static ref PLATFORM_TOKEN_RE: Regex =
        Regex::new(r"(?i)platform.desktop|platform.touch").unwrap();
}

const HASH_SEED: u32 = 5381;
const ID_DELIMITER: char = ':';

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ComponentId(String);

impl ComponentId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ComponentId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<ComponentId> for String {
    fn from(id: ComponentId) -> Self {
        id.0
    }
}

/// djb2 with xor, walking UTF-16 units from the end. Same output as the
/// `string-hash` npm package.
pub fn string_hash(input: &str) -> u32 {
    let units: Vec<u16> = input.encode_utf16().collect();
    units
        .iter()
        .rev()
        .fold(HASH_SEED, |hash, &unit| hash.wrapping_mul(33) ^ u32::from(unit))
}

fn strip_platform_tokens(path: &str) -> String {
    PLATFORM_TOKEN_RE.replace_all(path, "").into_owned()
}

fn segments(path: &str) -> Vec<&str> {
    let mut out: Vec<&str> = Vec::new();
    for segment in path.split(['/', '\\']) {
        match segment {
            "" | "." => {}
            ".." => {
                if out.last().is_some_and(|last| *last != "..") {
                    out.pop();
                } else if !path.starts_with(['/', '\\']) {
                    out.push(segment);
                }
            }
            _ => out.push(segment),
        }
    }
    out
}

fn is_absolute(path: &str) -> bool {
    path.starts_with(['/', '\\']) || path.get(1..2) == Some(":")
}

/// Lexical relative path from `root` to `path`, always `/`-separated.
fn relative_path(root: &str, path: &str) -> String {
    let root_segments = segments(root);
    let joined;
    let path = if is_absolute(path) {
        path
    } else {
        joined = format!("{}/{}", root, path);
        joined.as_str()
    };
    let path_segments = segments(path);

    let common = root_segments
        .iter()
        .zip(&path_segments)
        .take_while(|(a, b)| a == b)
        .count();

    let mut parts: Vec<&str> = vec![".."; root_segments.len() - common];
    parts.extend(&path_segments[common..]);
    parts.join("/")
}

/// Project root used for ids: the lower-cased working directory without
/// platform tokens.
pub fn project_root(working_dir: &str) -> String {
    strip_platform_tokens(&working_dir.to_lowercase())
}

/// The `<relative path>:<name>` key that gets hashed.
pub fn id_key(root: &str, filename: &str, name: &str) -> String {
    let filename = strip_platform_tokens(&filename.to_lowercase());
    format!(
        "{}{}{}",
        relative_path(&project_root(root), &filename),
        ID_DELIMITER,
        name
    )
}

/// Id for `name` declared in `filename`, relative to an explicit root.
pub fn component_id_in(root: &str, filename: &str, name: &str) -> ComponentId {
    ComponentId(format!("{:x}", string_hash(&id_key(root, filename, name))))
}

/// Id for `name` declared in `filename`, relative to the working directory.
pub fn component_id(filename: &str, name: &str) -> ComponentId {
    let root = match std::env::current_dir() {
        Ok(dir) => dir.to_string_lossy().into_owned(),
        Err(e) => {
            tracing::warn!("working directory unavailable, hashing absolute path: {}", e);
            String::new()
        }
    };
    component_id_in(&root, filename, name)
}

#[cfg(feature = "napi")]
#[napi]
pub fn component_id_native(filename: String, name: String) -> String {
    component_id(&filename, &name).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_hash_known_values() {
        assert_eq!(string_hash(""), 5381);
        // 5381 * 33 ^ 'a'
        assert_eq!(string_hash("a"), (5381u32 * 33) ^ 97);
        assert_eq!(string_hash("ab"), ((5381u32 * 33) ^ 98).wrapping_mul(33) ^ 97);
    }

    #[test]
    fn test_string_hash_wraps_like_javascript() {
        assert_eq!(string_hash("src/button.js:Button"), 0x84c8_9985);
        let long = "src/components/deeply/nested/Button.js:Button".repeat(8);
        assert_eq!(string_hash(&long), 0xa3c2_3e85);
    }

    #[test]
    fn test_string_hash_uses_utf16_units() {
        // U+1F600 is a surrogate pair: two units, not one char.
        let expected = {
            let units: Vec<u16> = "😀".encode_utf16().collect();
            assert_eq!(units.len(), 2);
            (HASH_SEED.wrapping_mul(33) ^ u32::from(units[1])).wrapping_mul(33)
                ^ u32::from(units[0])
        };
        assert_eq!(string_hash("😀"), expected);
    }

    #[test]
    fn test_id_key_relative_and_lowercase() {
        assert_eq!(
            id_key("/Proj", "/Proj/src/Button.js", "Button"),
            "src/button.js:Button"
        );
        assert_eq!(
            id_key("/proj/app", "/proj/lib/Button.js", "Button"),
            "../lib/button.js:Button"
        );
    }

    #[test]
    fn test_id_key_normalizes_separators() {
        assert_eq!(
            id_key("C:\\Proj", "C:\\Proj\\src\\Button.js", "Button"),
            "src/button.js:Button"
        );
    }

    #[test]
    fn test_id_key_relative_input_resolves_against_root() {
        assert_eq!(
            id_key("/proj", "./src/../src/Button.js", "Button"),
            "src/button.js:Button"
        );
    }

    #[test]
    fn test_component_id_deterministic() {
        let a = component_id("/proj/src/Button.js", "Button");
        let b = component_id("/proj/src/Button.js", "Button");
        assert_eq!(a, b);
        assert!(a.as_str().chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn test_platform_variants_share_id() {
        let desktop = component_id("/proj/platform.desktop/src/Button.js", "Button");
        let touch = component_id("/proj/platform.touch/src/Button.js", "Button");
        assert_eq!(desktop, touch);

        let upper = component_id_in(
            "/proj/Platform.Desktop",
            "/proj/PLATFORM.TOUCH/src/Button.js",
            "Button",
        );
        assert_eq!(upper, component_id_in("/proj", "/proj/src/Button.js", "Button"));
    }

    #[test]
    fn test_name_changes_id() {
        assert_ne!(
            component_id_in("/proj", "/proj/src/Button.js", "Button"),
            component_id_in("/proj", "/proj/src/Button.js", "default")
        );
    }

    #[test]
    fn test_id_matches_manual_hash() {
        let id = component_id_in("/proj", "/proj/src/Button.js", "Button");
        assert_eq!(id.as_str(), "84c89985");
    }
}
