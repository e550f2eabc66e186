//! Source loading: file text to [`SourceUnit`].
//!
//! Parsing goes through `oxc_parser` and is tolerant. Recoverable syntax
//! errors are kept as diagnostics and the recovered tree is used. Only when
//! the parser gives up entirely is the unit marked opaque, and the pipeline
//! then leaves the file alone.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use oxc_allocator::Allocator;
use oxc_ast::ast::*;
use oxc_ast_visit::{Visit, walk};
use oxc_parser::Parser;
use oxc_span::{GetSpan, SourceType};
use tracing::{debug, warn};

use crate::error::{Result, TransformError};
use crate::tree::{Node, NodeKind, TextSpan};

/// Flavour of the source, inferred from the file extension only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dialect {
    /// TypeScript / JavaScript without embedded markup
    Plain,
    /// `.tsx` / `.jsx`
    Markup,
}

impl Dialect {
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("tsx" | "jsx") => Self::Markup,
            _ => Self::Plain,
        }
    }

    pub fn source_type(self) -> SourceType {
        match self {
            Self::Plain => SourceType::ts(),
            Self::Markup => SourceType::tsx(),
        }
    }
}

/// One file's parsed representation.
#[derive(Debug, Clone)]
pub struct SourceUnit {
    pub path: PathBuf,
    pub dialect: Dialect,
    /// Full text the spans in `root` point into
    pub text: Arc<str>,
    /// Always a [`NodeKind::Program`]
    pub root: Node,
    pub diagnostics: Vec<String>,
    /// The parser could not produce a usable tree
    pub opaque: bool,
}

impl SourceUnit {
    pub fn statements(&self) -> &[Node] {
        &self.root.children
    }

    /// Same file and text, different tree
    pub fn with_root(self, root: Node) -> Self {
        Self { root, ..self }
    }
}

/// Read a source file. A missing file reads as empty text.
pub fn read_source(path: &Path) -> Result<String> {
    match std::fs::read_to_string(path) {
        Ok(text) => Ok(text),
        Err(err) if err.kind() == ErrorKind::NotFound => {
            debug!(path = %path.display(), "missing file treated as empty");
            Ok(String::new())
        }
        Err(err) => Err(TransformError::io(path, err)),
    }
}

/// Parse `text`, or the contents of `path` when no text is given.
pub fn load(path: &Path, text: Option<&str>) -> Result<SourceUnit> {
    let text = match text {
        Some(text) => text.to_owned(),
        None => read_source(path)?,
    };
    Ok(parse(path, text))
}

fn parse(path: &Path, text: String) -> SourceUnit {
    let dialect = Dialect::from_path(path);
    let len = text.len() as u32;

    let (root, diagnostics, opaque) = {
        let allocator = Allocator::default();
        let ret = Parser::new(&allocator, &text, dialect.source_type()).parse();

        let diagnostics: Vec<String> = ret.errors.iter().map(|err| err.to_string()).collect();
        for diagnostic in &diagnostics {
            warn!(path = %path.display(), "{diagnostic}");
        }

        let root = if ret.panicked {
            warn!(path = %path.display(), "parser gave up, file left untouched");
            Node::parsed(NodeKind::Program, TextSpan::new(0, len), Vec::new())
        } else {
            TreeBuilder::build(&ret.program, len)
        };
        (root, diagnostics, ret.panicked)
    };

    SourceUnit {
        path: path.to_path_buf(),
        dialect,
        text: Arc::from(text),
        root,
        diagnostics,
        opaque,
    }
}

struct Frame {
    kind: NodeKind,
    span: TextSpan,
    children: Vec<Node>,
}

/// Converts the arena AST into the owned [`Node`] tree.
struct TreeBuilder {
    stack: Vec<Frame>,
}

impl TreeBuilder {
    fn build(program: &Program<'_>, len: u32) -> Node {
        let mut builder = Self { stack: Vec::new() };
        builder.enter(NodeKind::Program, TextSpan::new(0, len));
        walk::walk_program(&mut builder, program);

        let mut root = match builder.stack.pop() {
            Some(frame) => Node::parsed(frame.kind, frame.span, frame.children),
            None => Node::parsed(NodeKind::Program, TextSpan::new(0, len), Vec::new()),
        };

        // Everything between two statements belongs to the second one.
        let mut previous_end = 0;
        for statement in &mut root.children {
            statement.set_leading(previous_end);
            if let Some(span) = statement.span() {
                previous_end = span.end;
            }
        }
        root
    }

    fn enter(&mut self, kind: NodeKind, span: impl Into<TextSpan>) {
        self.stack.push(Frame {
            kind,
            span: span.into(),
            children: Vec::new(),
        });
    }

    fn exit(&mut self) {
        if let Some(frame) = self.stack.pop() {
            self.attach(Node::parsed(frame.kind, frame.span, frame.children));
        }
    }

    fn attach(&mut self, node: Node) {
        if let Some(parent) = self.stack.last_mut() {
            parent.children.push(node);
        }
    }

    fn leaf(&mut self, kind: NodeKind, span: impl Into<TextSpan>) {
        self.attach(Node::parsed(kind, span.into(), Vec::new()));
    }
}

fn statement_kind(statement: &Statement<'_>) -> NodeKind {
    match statement {
        Statement::VariableDeclaration(_) => NodeKind::VariableDeclaration,
        Statement::ExpressionStatement(stmt) => NodeKind::ExpressionStatement {
            expression: stmt.expression.span().into(),
        },
        Statement::ImportDeclaration(decl) => NodeKind::ImportDeclaration {
            type_only: decl.import_kind.is_type(),
        },
        Statement::ExportDefaultDeclaration(_) => NodeKind::ExportDefault,
        Statement::ExportNamedDeclaration(_) => NodeKind::ExportNamed,
        Statement::ExportAllDeclaration(_) => NodeKind::ExportAll,
        Statement::TSExportAssignment(_) => NodeKind::ExportAssignment,
        _ => NodeKind::Statement,
    }
}

impl<'a> Visit<'a> for TreeBuilder {
    fn visit_hashbang(&mut self, it: &Hashbang<'a>) {
        self.leaf(NodeKind::Hashbang, it.span);
    }

    fn visit_directive(&mut self, it: &Directive<'a>) {
        self.leaf(NodeKind::Directive, it.span);
    }

    fn visit_statement(&mut self, it: &Statement<'a>) {
        self.enter(statement_kind(it), it.span());
        walk::walk_statement(self, it);
        self.exit();
    }

    fn visit_variable_declarator(&mut self, it: &VariableDeclarator<'a>) {
        let binding = match &it.id.kind {
            BindingPatternKind::BindingIdentifier(ident) => Some(ident.name.to_string()),
            _ => None,
        };
        let init = it.init.as_ref().map(|init| TextSpan::from(init.span()));
        self.enter(NodeKind::VariableDeclarator { binding, init }, it.span);
        walk::walk_variable_declarator(self, it);
        self.exit();
    }

    // Only the specifiers and the module path; attribute strings would be
    // indistinguishable from the path.
    fn visit_import_declaration(&mut self, it: &ImportDeclaration<'a>) {
        if let Some(specifiers) = &it.specifiers {
            for specifier in specifiers {
                self.visit_import_declaration_specifier(specifier);
            }
        }
        self.visit_string_literal(&it.source);
    }

    fn visit_import_default_specifier(&mut self, it: &ImportDefaultSpecifier<'a>) {
        let local = it.local.name.to_string();
        self.leaf(NodeKind::ImportDefaultSpecifier { local }, it.span);
    }

    fn visit_import_namespace_specifier(&mut self, it: &ImportNamespaceSpecifier<'a>) {
        let local = it.local.name.to_string();
        self.leaf(NodeKind::ImportNamespaceSpecifier { local }, it.span);
    }

    fn visit_import_specifier(&mut self, it: &ImportSpecifier<'a>) {
        let imported = match &it.imported {
            ModuleExportName::IdentifierName(ident) => ident.name.to_string(),
            ModuleExportName::IdentifierReference(ident) => ident.name.to_string(),
            ModuleExportName::StringLiteral(lit) => lit.value.to_string(),
        };
        let local = it.local.name.to_string();
        self.leaf(NodeKind::ImportSpecifier { imported, local }, it.span);
    }

    fn visit_ts_export_assignment(&mut self, it: &TSExportAssignment<'a>) {
        self.enter(NodeKind::Expression, it.expression.span());
        self.visit_expression(&it.expression);
        self.exit();
    }

    fn visit_call_expression(&mut self, it: &CallExpression<'a>) {
        let callee = match &it.callee {
            Expression::Identifier(ident) => Some(ident.name.to_string()),
            _ => None,
        };
        let string_argument = match it.arguments.first() {
            Some(Argument::StringLiteral(lit)) if it.arguments.len() == 1 => {
                Some(lit.value.to_string())
            }
            _ => None,
        };
        self.enter(
            NodeKind::CallExpression {
                callee,
                string_argument,
            },
            it.span,
        );
        walk::walk_call_expression(self, it);
        self.exit();
    }

    fn visit_static_member_expression(&mut self, it: &StaticMemberExpression<'a>) {
        let kind = NodeKind::StaticMember {
            property: it.property.name.to_string(),
            call_object: matches!(it.object, Expression::CallExpression(_)),
        };
        self.enter(kind, it.span);
        walk::walk_static_member_expression(self, it);
        self.exit();
    }

    fn visit_identifier_reference(&mut self, it: &IdentifierReference<'a>) {
        self.leaf(NodeKind::Identifier(it.name.to_string()), it.span);
    }

    fn visit_string_literal(&mut self, it: &StringLiteral<'a>) {
        self.leaf(NodeKind::StringLiteral(it.value.to_string()), it.span);
    }
}
