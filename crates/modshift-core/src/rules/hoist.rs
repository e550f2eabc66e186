//! Rebuilding the top-level statement list around pending imports.

use crate::comments::{lift_header, prologue_len};
use crate::engine::RuleContext;
use crate::error::Result;
use crate::guard;
use crate::tree::Node;

/// Insert every pending import after the prologue, re-attach the header if
/// needed, and reject lists that bind a name twice.
pub(super) fn produce(root: &Node, cx: &mut RuleContext<'_>) -> Result<Node> {
    let imports = cx.take_pending_imports();
    let inserted = !imports.is_empty();

    let mut statements = root.children.clone();
    let at = prologue_len(&statements);
    statements.splice(at..at, imports.into_iter().map(|import| import.into_node()));

    let header = lift_header(
        &mut statements,
        cx.original_header(),
        cx.text(),
        at,
        inserted,
    );
    cx.set_header(header);

    guard::ensure_unique(&statements, cx.path())?;
    Ok(root.with_children(statements))
}
