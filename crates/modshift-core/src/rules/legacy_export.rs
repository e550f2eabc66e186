//! `export = value;` to `export default value;`

use crate::engine::NodePosition;
use crate::tree::{Node, NodeKind};

/// Matches at any depth; `declare module` blocks carry their own `export =`.
pub(super) fn matches(node: &Node, _position: NodePosition) -> bool {
    node.kind == NodeKind::ExportAssignment
}

pub(super) fn produce(node: &Node) -> Node {
    Node::synthesized(NodeKind::ExportDefault, node.children.clone()).in_place_of(node)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::load;
    use crate::printer::node_to_string;
    use std::path::Path;

    #[test]
    fn assignment_export_becomes_default_export() {
        let unit = load(Path::new("a.ts"), Some("export = myValue;")).unwrap();
        let node = &unit.root.children[0];
        assert!(matches(node, NodePosition::ROOT.child()));
        assert_eq!(node_to_string(&produce(node), &unit.text), "export default myValue;");
    }

    #[test]
    fn expression_text_is_preserved() {
        let text = "export = {\n  a: require('./a'), // note\n};";
        let unit = load(Path::new("a.ts"), Some(text)).unwrap();
        let produced = produce(&unit.root.children[0]);
        assert_eq!(
            node_to_string(&produced, &unit.text),
            "export default {\n  a: require('./a'), // note\n};"
        );
    }

    #[test]
    fn nested_assignment_export_matches() {
        let unit = load(Path::new("m.d.ts"), Some("declare module 'm' {\n  export = Foo;\n}")).unwrap();
        let module = &unit.root.children[0];
        let export = module
            .children
            .iter()
            .find(|child| child.kind == NodeKind::ExportAssignment)
            .unwrap();
        assert!(matches(export, NodePosition::ROOT.child().child()));
    }

    #[test]
    fn other_exports_do_not_match() {
        let text = "export default value;\nexport { x };\nexport const y = 1;\nexport * from './z';";
        let unit = load(Path::new("a.ts"), Some(text)).unwrap();
        for node in unit.statements() {
            assert!(!matches(node, NodePosition::ROOT.child()));
        }
    }
}
