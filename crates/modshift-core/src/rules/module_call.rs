//! Top-level `require` statements to static imports.

use crate::engine::NodePosition;
use crate::tree::{Node, NodeKind};

/// The call of a top-level `require('x');` statement
fn side_effect_call(node: &Node) -> Option<&Node> {
    let NodeKind::ExpressionStatement { expression } = node.kind else {
        return None;
    };
    match node.children.as_slice() {
        [call] if call.span() == Some(expression) && call.module_call_path().is_some() => {
            Some(call)
        }
        _ => None,
    }
}

pub(super) fn matches_side_effect(node: &Node, position: NodePosition) -> bool {
    position.is_top_level() && side_effect_call(node).is_some()
}

pub(super) fn produce_side_effect(node: &Node) -> Node {
    let Some(literal) = side_effect_call(node).and_then(Node::module_call_argument) else {
        return node.clone();
    };
    Node::synthesized(
        NodeKind::ImportDeclaration { type_only: false },
        vec![literal.clone()],
    )
    .in_place_of(node)
}

/// Binding name and module path literal of
/// `const X = require('x')` / `const X = require('x').prop`
fn declaration_parts(node: &Node) -> Option<(&str, &Node)> {
    if node.kind != NodeKind::VariableDeclaration {
        return None;
    }
    let [declarator] = node.children.as_slice() else {
        return None;
    };
    let NodeKind::VariableDeclarator {
        binding: Some(binding),
        init: Some(init),
    } = &declarator.kind
    else {
        return None;
    };

    let value = declarator.children.last()?;
    if value.span() != Some(*init) {
        return None;
    }
    let call = match value.member_of_module_call() {
        Some((_, call)) => call,
        None => value,
    };
    Some((binding.as_str(), call.module_call_argument()?))
}

pub(super) fn matches_declaration(node: &Node, position: NodePosition) -> bool {
    position.is_top_level() && declaration_parts(node).is_some()
}

pub(super) fn produce_declaration(node: &Node) -> Node {
    match declaration_parts(node) {
        Some((binding, literal)) => Node::default_import(binding, literal.clone()).in_place_of(node),
        None => node.clone(),
    }
}
