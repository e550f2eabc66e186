//! `require` calls in expression position.
//!
//! The call (or `require(…).default`) is replaced by an identifier, and an
//! import binding that identifier is queued for the rebuild pass.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::engine::{PendingImport, RuleContext};
use crate::tree::Node;

static SEPARATOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[-.@_:](\w)|--(\w)").expect("separator pattern must compile")
});

/// Local name for a module specifier.
///
/// Scope segments (`@…`), the build-output directory, `.` and `..` are
/// dropped, the rest is capitalised and joined, and separators are folded
/// into an uppercase next character.
///
/// Only `-`, `.`, `@`, `_` and `:` count as separators. Digits and other
/// punctuation are kept, so `./h5/player` becomes `H5Player`, not `HPlayer`.
///
/// ```
/// use modshift_core::rules::derive_import_name;
///
/// assert_eq!(
///     derive_import_name("@mycompanynamespace/some-widget/dist/sub-part", "dist"),
///     "SomeWidgetSubPart"
/// );
/// ```
pub fn derive_import_name(specifier: &str, build_dir: &str) -> String {
    let joined: String = specifier
        .split('/')
        .filter(|segment| {
            !segment.is_empty()
                && !segment.starts_with('@')
                && *segment != build_dir
                && *segment != "."
                && *segment != ".."
        })
        .map(capitalize)
        .collect();
    let joined = joined.replacen(':', "", 1);
    let folded = SEPARATOR.replace_all(&joined, |caps: &Captures<'_>| {
        caps.get(1)
            .or_else(|| caps.get(2))
            .map(|m| m.as_str().to_uppercase())
            .unwrap_or_default()
    });
    capitalize(&folded)
}

fn capitalize(segment: &str) -> String {
    let mut chars = segment.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Whether `name` can be used as a JavaScript binding
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|c| c.is_alphabetic() || c == '_' || c == '$')
        && chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$')
}

/// The `require` call of `require('x')` or `require('x').default`
fn module_call(node: &Node) -> Option<&Node> {
    if node.module_call_path().is_some() {
        return Some(node);
    }
    match node.member_of_module_call() {
        Some(("default", call)) => Some(call),
        _ => None,
    }
}

pub(super) fn matches(node: &Node, build_dir: &str) -> bool {
    module_call(node)
        .and_then(Node::module_call_path)
        .is_some_and(|path| is_identifier(&derive_import_name(path, build_dir)))
}

pub(super) fn produce(node: &Node, build_dir: &str, cx: &mut RuleContext<'_>) -> Node {
    let Some(call) = module_call(node) else {
        return node.clone();
    };
    let (Some(path), Some(literal)) = (call.module_call_path(), call.module_call_argument())
    else {
        return node.clone();
    };

    let local = derive_import_name(path, build_dir);
    cx.push_import(PendingImport {
        local: local.clone(),
        source: literal.clone(),
    });
    Node::identifier(local).in_place_of(node)
}
