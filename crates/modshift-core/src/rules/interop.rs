//! Default-export interop for scoped and relative `require` calls.

use crate::tree::{Node, NodeKind};

fn needs_interop(path: &str) -> bool {
    path.starts_with('@') || path.starts_with("./")
}

/// `require(…).default` over an eligible path, which is left as it is
fn is_default_access(node: &Node) -> bool {
    matches!(
        node.member_of_module_call(),
        Some(("default", call)) if call.module_call_path().is_some_and(needs_interop)
    )
}

pub(super) fn matches(node: &Node) -> bool {
    is_default_access(node) || node.module_call_path().is_some_and(needs_interop)
}

pub(super) fn produce(node: &Node) -> Node {
    if is_default_access(node) {
        return node.clone();
    }
    let default = Node::synthesized(
        NodeKind::StaticMember {
            property: "default".into(),
            call_object: true,
        },
        vec![node.clone()],
    );
    Node::synthesized(NodeKind::LogicalOr, vec![default, node.clone()]).in_place_of(node)
}
