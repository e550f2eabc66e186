//! Turning a rewritten tree back into text.
//!
//! Parsed nodes print as their original source, with rewritten descendants
//! spliced in at the spans they replaced. Synthesized nodes print from a
//! template per kind. The top-level statement list is regenerated: each
//! statement is preceded by its own leading trivia, in which every run of
//! whitespace that spans a line break is collapsed to a single line break
//! plus indentation. Comments survive this; empty lines do not, which is what
//! [`crate::marker`] is for.

use crate::comments::LiftedHeader;
use crate::loader::SourceUnit;
use crate::tree::{Node, NodeKind, Origin, TextSpan, slice};

/// Print a whole unit, emitting `header` in front of the statement it was
/// lifted for.
pub fn print(unit: &SourceUnit, header: Option<&LiftedHeader>) -> String {
    print_program(&unit.root, &unit.text, header)
}

pub fn print_program(root: &Node, text: &str, header: Option<&LiftedHeader>) -> String {
    let statements = &root.children;
    let mut out = String::with_capacity(text.len() + 64);

    let last_end = statements.iter().filter_map(Node::span).map(|span| span.end).max();
    if last_end.is_none() {
        // No statement maps back to the source, so whatever text exists is
        // comments only.
        out.push_str(collapse_blank_lines(text).trim_start());
    }

    let mut previous_end: Option<u32> = None;
    for (index, statement) in statements.iter().enumerate() {
        if let Some(header) = header.filter(|h| h.at == index) {
            push_header(&mut out, header);
            previous_end = None;
        }

        match statement.span() {
            Some(span) => {
                let trivia = collapse_blank_lines(span.trivia(text));
                if previous_end == Some(span.leading) {
                    out.push_str(&trivia);
                } else {
                    ensure_line_break(&mut out);
                    out.push_str(trivia.trim_start());
                }
                print_node(statement, text, &mut out);
                previous_end = Some(span.end);
            }
            None => {
                ensure_line_break(&mut out);
                print_node(statement, text, &mut out);
                previous_end = None;
            }
        }
    }

    if let Some(header) = header.filter(|h| h.at >= statements.len()) {
        push_header(&mut out, header);
        previous_end = None;
    }

    if let Some(end) = last_end {
        let trailing = collapse_blank_lines(slice(text, end, text.len() as u32));
        if previous_end == Some(end) {
            out.push_str(&trailing);
        } else {
            ensure_line_break(&mut out);
            out.push_str(trailing.trim_start());
        }
    }

    ensure_line_break(&mut out);
    out
}

fn push_header(out: &mut String, header: &LiftedHeader) {
    let text = collapse_blank_lines(&header.text);
    let text = text.trim();
    if text.is_empty() {
        return;
    }
    ensure_line_break(out);
    out.push_str(text);
    out.push('\n');
}

fn ensure_line_break(out: &mut String) {
    if !out.is_empty() && !out.ends_with('\n') {
        out.push('\n');
    }
}

/// Print a single node.
pub fn print_node(node: &Node, text: &str, out: &mut String) {
    match node.origin() {
        Origin::Parsed(span) => splice(node, *span, text, out),
        Origin::Synthesized { .. } => synthesize(node, text, out),
    }
}

pub fn node_to_string(node: &Node, text: &str) -> String {
    let mut out = String::new();
    print_node(node, text, &mut out);
    out
}

fn splice(node: &Node, span: TextSpan, text: &str, out: &mut String) {
    let mut cursor = span.start;
    for child in &node.children {
        let Some(child_span) = child.span() else {
            continue;
        };
        if child_span.start < cursor || child_span.end > span.end {
            continue;
        }
        out.push_str(slice(text, cursor, child_span.start));
        print_node(child, text, out);
        cursor = child_span.end;
    }
    out.push_str(slice(text, cursor, span.end));
}

fn synthesize(node: &Node, text: &str, out: &mut String) {
    let child = |index: usize| node.children.get(index).map(|c| node_to_string(c, text));

    match &node.kind {
        NodeKind::ImportDeclaration { type_only } => {
            out.push_str("import ");
            if *type_only {
                out.push_str("type ");
            }
            let clause = import_clause(node, text);
            if !clause.is_empty() {
                out.push_str(&clause);
                out.push_str(" from ");
            }
            if let Some(source) = node.import_source() {
                print_node(source, text, out);
            }
            out.push(';');
        }
        NodeKind::ImportDefaultSpecifier { local } => out.push_str(local),
        NodeKind::ImportNamespaceSpecifier { local } => {
            out.push_str("* as ");
            out.push_str(local);
        }
        NodeKind::ImportSpecifier { imported, local } => {
            if imported != local {
                out.push_str(imported);
                out.push_str(" as ");
            }
            out.push_str(local);
        }
        NodeKind::ExportDefault => {
            out.push_str("export default ");
            out.push_str(&child(0).unwrap_or_default());
            out.push(';');
        }
        NodeKind::ExportNamed => {
            let names: Vec<String> = (0..node.children.len()).filter_map(child).collect();
            out.push_str("export { ");
            out.push_str(&names.join(", "));
            out.push_str(" };");
        }
        NodeKind::ExpressionStatement { .. } => {
            out.push_str(&child(0).unwrap_or_default());
            out.push(';');
        }
        NodeKind::StaticMember { property, .. } => {
            out.push_str(&child(0).unwrap_or_default());
            out.push('.');
            out.push_str(property);
        }
        NodeKind::LogicalOr => {
            out.push_str(&child(0).unwrap_or_default());
            out.push_str(" || ");
            out.push_str(&child(1).unwrap_or_default());
        }
        NodeKind::CallExpression { .. } => {
            let arguments: Vec<String> = (1..node.children.len()).filter_map(child).collect();
            out.push_str(&child(0).unwrap_or_default());
            out.push('(');
            out.push_str(&arguments.join(", "));
            out.push(')');
        }
        NodeKind::Identifier(name) => out.push_str(name),
        NodeKind::StringLiteral(value) => out.push_str(&quote(value)),
        _ => {
            let parts: Vec<String> = (0..node.children.len()).filter_map(child).collect();
            out.push_str(&parts.join(" "));
        }
    }
}

fn import_clause(node: &Node, text: &str) -> String {
    let mut parts = Vec::new();
    let mut named = Vec::new();
    for child in &node.children {
        match child.kind {
            NodeKind::ImportDefaultSpecifier { .. } | NodeKind::ImportNamespaceSpecifier { .. } => {
                parts.push(node_to_string(child, text));
            }
            NodeKind::ImportSpecifier { .. } => named.push(node_to_string(child, text)),
            _ => {}
        }
    }
    if !named.is_empty() {
        parts.push(format!("{{ {} }}", named.join(", ")));
    }
    parts.join(", ")
}

/// Single-quoted string literal
pub fn quote(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('\'');
    for ch in value.chars() {
        match ch {
            '\'' => quoted.push_str("\\'"),
            '\\' => quoted.push_str("\\\\"),
            '\n' => quoted.push_str("\\n"),
            '\r' => quoted.push_str("\\r"),
            _ => quoted.push(ch),
        }
    }
    quoted.push('\'');
    quoted
}

/// Collapse every whitespace run containing a line break into one line break
/// followed by the run's last indentation. Spaces before the break are
/// dropped with the rest of the run, so trailing spaces after a statement or
/// comment do not survive. Comment text is copied as is.
pub fn collapse_blank_lines(trivia: &str) -> String {
    let mut out = String::with_capacity(trivia.len());
    let mut rest = trivia;

    while let Some(ch) = rest.chars().next() {
        let len = if rest.starts_with("//") {
            rest.find('\n').unwrap_or(rest.len())
        } else if rest.starts_with("/*") {
            rest[2..].find("*/").map_or(rest.len(), |i| i + 4)
        } else if ch.is_whitespace() {
            let len = rest.find(|c: char| !c.is_whitespace()).unwrap_or(rest.len());
            let run = &rest[..len];
            match run.rfind('\n') {
                Some(last) => {
                    out.push('\n');
                    out.push_str(&run[last + 1..]);
                }
                None => out.push_str(run),
            }
            rest = &rest[len..];
            continue;
        } else {
            ch.len_utf8()
        };
        out.push_str(&rest[..len]);
        rest = &rest[len..];
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::load;
    use std::path::Path;

    fn reprint(text: &str) -> String {
        let unit = load(Path::new("a.ts"), Some(text)).unwrap();
        print(&unit, None)
    }

    #[test]
    fn collapse_keeps_comments_and_indentation() {
        assert_eq!(collapse_blank_lines("\n\n  // a\n\n\n    "), "\n  // a\n    ");
        assert_eq!(collapse_blank_lines(" /* x\n\n y */ \n"), " /* x\n\n y */\n");
        assert_eq!(collapse_blank_lines("a; \t\n  b"), "a;\n  b");
        assert_eq!(collapse_blank_lines("  "), "  ");
    }

    #[test]
    fn unchanged_tree_prints_like_the_source_without_blank_lines() {
        let text = "// head\nconst a = 1;\n\n\nfunction f() {\n\n  return a;\n}\n// tail\n";
        assert_eq!(
            reprint(text),
            "// head\nconst a = 1;\nfunction f() {\n\n  return a;\n}\n// tail\n"
        );
    }

    #[test]
    fn same_line_layout_is_kept() {
        assert_eq!(reprint("a(); b(); // c\nd();"), "a(); b(); // c\nd();\n");
    }

    #[test]
    fn empty_source_prints_empty() {
        assert_eq!(reprint(""), "");
    }

    #[test]
    fn comment_only_source() {
        assert_eq!(reprint("\n// only\n"), "// only\n");
    }

    #[test]
    fn synthesized_import_templates() {
        let import = Node::default_import("Foo", Node::string_literal("./it's"));
        assert_eq!(node_to_string(&import, ""), "import Foo from './it\\'s';");

        let side_effect = Node::synthesized(
            NodeKind::ImportDeclaration { type_only: false },
            vec![Node::string_literal("polyfill")],
        );
        assert_eq!(node_to_string(&side_effect, ""), "import 'polyfill';");

        let named = Node::synthesized(
            NodeKind::ImportDeclaration { type_only: true },
            vec![
                Node::synthesized(
                    NodeKind::ImportSpecifier {
                        imported: "A".into(),
                        local: "A".into(),
                    },
                    Vec::new(),
                ),
                Node::synthesized(
                    NodeKind::ImportSpecifier {
                        imported: "b".into(),
                        local: "B".into(),
                    },
                    Vec::new(),
                ),
                Node::string_literal("pkg"),
            ],
        );
        assert_eq!(node_to_string(&named, ""), "import type { A, b as B } from 'pkg';");
    }

    #[test]
    fn synthesized_exports() {
        let export = Node::synthesized(NodeKind::ExportNamed, vec![Node::identifier("Widget")]);
        assert_eq!(node_to_string(&export, ""), "export { Widget };");

        let default = Node::synthesized(NodeKind::ExportDefault, vec![Node::identifier("x")]);
        assert_eq!(node_to_string(&default, ""), "export default x;");
    }

    #[test]
    fn replaced_expression_is_spliced_into_parsed_parent() {
        let text = "foo(bar, baz);\n";
        let mut unit = load(Path::new("a.ts"), Some(text)).unwrap();
        let call = &mut unit.root.children[0].children[0];
        let bar = call.children[1].clone();
        call.children[1] = Node::identifier("Qux").in_place_of(&bar);
        assert_eq!(print(&unit, None), "foo(Qux, baz);\n");
    }

    #[test]
    fn header_goes_in_front_of_its_statement() {
        let text = "const a = 1;\n";
        let mut unit = load(Path::new("a.ts"), Some(text)).unwrap();
        unit.root
            .children
            .insert(0, Node::default_import("B", Node::string_literal("./b")));
        let header = LiftedHeader {
            at: 0,
            text: "/** doc */\n".into(),
        };
        assert_eq!(
            print(&unit, Some(&header)),
            "/** doc */\nimport B from './b';\nconst a = 1;\n"
        );
    }
}
