//! Deep imports into a package's build output, rewritten to the package
//! entry point.
//!
//! `import Widget from '@scope/pkg/dist/sub/leaf'` becomes
//! `import { Widget } from '@scope/pkg'`, and the entry file of `@scope/pkg`
//! is asked to re-export `Widget` from `./sub/leaf`.

use tracing::debug;

use crate::comments::{lift_header, prologue_len};
use crate::engine::RuleContext;
use crate::error::{Result, TransformError};
use crate::guard;
use crate::seeder::SeedRequest;
use crate::tree::{Node, NodeKind};

/// Split a module specifier at the first occurrence of `delimiter` into the
/// package and the path inside it.
///
/// ```
/// use modshift_core::rules::split_deep_path;
///
/// assert_eq!(
///     split_deep_path("@scope/pkg/dist/sub/leaf", "/dist"),
///     Some(("@scope/pkg", "/sub/leaf"))
/// );
/// ```
pub fn split_deep_path<'p>(specifier: &'p str, delimiter: &str) -> Option<(&'p str, &'p str)> {
    if delimiter.is_empty() {
        return None;
    }
    specifier.split_once(delimiter)
}

fn deep_path<'n>(node: &'n Node, delimiter: &str) -> Option<(&'n str, &'n str)> {
    let specifier = node.import_source()?.string_value()?;
    split_deep_path(specifier, delimiter)
}

pub(super) fn matches(node: &Node, delimiter: &str) -> bool {
    deep_path(node, delimiter).is_some()
}

/// The default binding of an import without a namespace binding
fn default_binding(node: &Node) -> Option<&str> {
    let mut default = None;
    for child in &node.children {
        match &child.kind {
            NodeKind::ImportDefaultSpecifier { local } => default = Some(local.as_str()),
            NodeKind::ImportNamespaceSpecifier { .. } => return None,
            _ => {}
        }
    }
    default
}

pub(super) fn produce(node: &Node, delimiter: &str, cx: &mut RuleContext<'_>) -> Result<Node> {
    let NodeKind::ImportDeclaration { type_only } = node.kind else {
        return Ok(node.clone());
    };
    let (Some((package, subpath)), Some(local)) = (deep_path(node, delimiter), default_binding(node))
    else {
        // Named-only, namespace and side-effect imports stay as they are.
        return Ok(node.clone());
    };
    if package.is_empty() || subpath.trim_matches('/').is_empty() {
        return Ok(node.clone());
    }

    let request = SeedRequest::new(package, local, subpath);
    let outcome = cx
        .seed(&request)
        .map_err(|err| TransformError::seed(package, local, err))?;
    debug!(package, symbol = local, ?outcome, "entry point seeded");

    let mut children = vec![Node::synthesized(
        NodeKind::ImportSpecifier {
            imported: local.to_owned(),
            local: local.to_owned(),
        },
        Vec::new(),
    )];
    children.extend(
        node.children
            .iter()
            .filter(|child| matches!(child.kind, NodeKind::ImportSpecifier { .. }))
            .cloned(),
    );
    children.push(Node::string_literal(package));

    Ok(Node::synthesized(NodeKind::ImportDeclaration { type_only }, children).in_place_of(node))
}

/// Add `import Symbol from './sub/path';` after the entry file's header and
/// `export { Symbol };` at its end.
pub(super) fn produce_seed(
    root: &Node,
    request: &SeedRequest,
    cx: &mut RuleContext<'_>,
) -> Result<Node> {
    let mut statements = root.children.clone();
    let at = prologue_len(&statements);

    let import = Node::default_import(
        request.symbol.as_str(),
        Node::string_literal(request.relative_path()),
    );
    statements.insert(at, import);
    statements.push(Node::synthesized(
        NodeKind::ExportNamed,
        vec![Node::identifier(request.symbol.as_str())],
    ));

    let header = lift_header(&mut statements, cx.original_header(), cx.text(), at, true);
    cx.set_header(header);

    guard::ensure_unique(&statements, cx.path())?;
    Ok(root.with_children(statements))
}
