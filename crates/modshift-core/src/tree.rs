//! Owned syntax tree the rewrite rules operate on.
//!
//! The loader converts the parser's arena AST into [`Node`]s. Only the shapes
//! the rules care about get their own [`NodeKind`]; all other syntax is
//! transparent, meaning its tracked descendants hang directly off the nearest
//! tracked ancestor. Every top-level statement is tracked, so "top level"
//! always means "direct child of [`NodeKind::Program`]".

use crate::error::TriviaError;

/// Byte offsets of a parsed node inside the (marked) source text.
///
/// `leading..start` is the node's leading trivia. It is only non-empty for
/// top-level statements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextSpan {
    pub leading: u32,
    pub start: u32,
    pub end: u32,
}

impl TextSpan {
    pub fn new(start: u32, end: u32) -> Self {
        Self {
            leading: start,
            start,
            end,
        }
    }

    pub fn with_leading(mut self, leading: u32) -> Self {
        self.leading = leading.min(self.start);
        self
    }

    pub fn trivia<'t>(&self, text: &'t str) -> &'t str {
        slice(text, self.leading, self.start)
    }

    pub fn source<'t>(&self, text: &'t str) -> &'t str {
        slice(text, self.start, self.end)
    }
}

pub(crate) fn slice(text: &str, start: u32, end: u32) -> &str {
    text.get(start as usize..end as usize).unwrap_or_default()
}

impl From<oxc_span::Span> for TextSpan {
    fn from(span: oxc_span::Span) -> Self {
        Self::new(span.start, span.end)
    }
}

/// Where a node came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Origin {
    /// Produced by the loader; prints as its original text.
    Parsed(TextSpan),
    /// Built by a rule. `slot` is the span of the node it replaced, if any,
    /// and tells the printer where to splice it.
    Synthesized { slot: Option<TextSpan> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Program,
    Hashbang,
    Directive,
    /// Any statement without a more specific kind
    Statement,
    VariableDeclaration,
    /// `binding` is set for simple identifier patterns; `init` is the span of
    /// the initializer expression.
    VariableDeclarator {
        binding: Option<String>,
        init: Option<TextSpan>,
    },
    /// `expression` is the span of the statement's expression
    ExpressionStatement {
        expression: TextSpan,
    },
    ImportDeclaration {
        type_only: bool,
    },
    ImportDefaultSpecifier {
        local: String,
    },
    ImportNamespaceSpecifier {
        local: String,
    },
    ImportSpecifier {
        imported: String,
        local: String,
    },
    ExportDefault,
    ExportNamed,
    ExportAll,
    /// `export = expr;`
    ExportAssignment,
    /// Wrapper around an expression operand whose own shape is not tracked
    Expression,
    /// `callee` is set when the callee is a plain identifier; `string_argument`
    /// when the call has exactly one argument and it is a string literal.
    CallExpression {
        callee: Option<String>,
        string_argument: Option<String>,
    },
    /// `object.property`; `call_object` is set when the object is a call
    StaticMember {
        property: String,
        call_object: bool,
    },
    LogicalOr,
    Identifier(String),
    StringLiteral(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub kind: NodeKind,
    pub children: Vec<Node>,
    origin: Origin,
}

impl Node {
    pub fn parsed(kind: NodeKind, span: TextSpan, children: Vec<Node>) -> Self {
        Self {
            kind,
            children,
            origin: Origin::Parsed(span),
        }
    }

    pub fn synthesized(kind: NodeKind, children: Vec<Node>) -> Self {
        Self {
            kind,
            children,
            origin: Origin::Synthesized { slot: None },
        }
    }

    /// Same kind and origin with new children
    pub fn with_children(&self, children: Vec<Node>) -> Self {
        Self {
            kind: self.kind.clone(),
            children,
            origin: self.origin.clone(),
        }
    }

    /// Take over the position of `old` in the original text.
    pub fn in_place_of(mut self, old: &Node) -> Self {
        if let Origin::Synthesized { slot } = &mut self.origin {
            *slot = old.span();
        }
        self
    }

    pub fn identifier(name: impl Into<String>) -> Self {
        Self::synthesized(NodeKind::Identifier(name.into()), Vec::new())
    }

    pub fn string_literal(value: impl Into<String>) -> Self {
        Self::synthesized(NodeKind::StringLiteral(value.into()), Vec::new())
    }

    /// `import Local from 'source';` with `source` reused as given
    pub fn default_import(local: impl Into<String>, source: Node) -> Self {
        let specifier = Self::synthesized(
            NodeKind::ImportDefaultSpecifier {
                local: local.into(),
            },
            Vec::new(),
        );
        Self::synthesized(
            NodeKind::ImportDeclaration { type_only: false },
            vec![specifier, source],
        )
    }

    pub fn origin(&self) -> &Origin {
        &self.origin
    }

    /// Span in the original text: its own for parsed nodes, the replaced
    /// node's for synthesized ones.
    pub fn span(&self) -> Option<TextSpan> {
        match self.origin {
            Origin::Parsed(span) => Some(span),
            Origin::Synthesized { slot } => slot,
        }
    }

    pub fn is_synthesized(&self) -> bool {
        matches!(self.origin, Origin::Synthesized { .. })
    }

    /// Original comments and whitespace in front of this node.
    pub fn leading_trivia<'t>(&self, text: &'t str) -> Result<&'t str, TriviaError> {
        match self.origin {
            Origin::Parsed(span) => Ok(span.trivia(text)),
            Origin::Synthesized { .. } => Err(TriviaError::Synthesized),
        }
    }

    /// Detach the leading trivia so the printer no longer emits it.
    pub fn strip_leading_trivia(&mut self) {
        match &mut self.origin {
            Origin::Parsed(span) | Origin::Synthesized { slot: Some(span) } => {
                span.leading = span.start;
            }
            Origin::Synthesized { slot: None } => {}
        }
    }

    pub(crate) fn set_leading(&mut self, leading: u32) {
        if let Origin::Parsed(span) = &mut self.origin {
            *span = span.with_leading(leading);
        }
    }

    /// Module path literal of an import declaration
    pub fn import_source(&self) -> Option<&Node> {
        match self.kind {
            NodeKind::ImportDeclaration { .. } => {
                self.children.iter().rev().find(|c| c.string_value().is_some())
            }
            _ => None,
        }
    }

    pub fn string_value(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::StringLiteral(value) => Some(value),
            _ => None,
        }
    }

    /// The literal argument node of `require('<string>')`
    pub fn module_call_argument(&self) -> Option<&Node> {
        match &self.kind {
            NodeKind::CallExpression {
                callee: Some(callee),
                string_argument: Some(_),
            } if callee == "require" => {
                self.children.iter().rev().find(|c| c.string_value().is_some())
            }
            _ => None,
        }
    }

    /// Module path of `require('<string>')`
    pub fn module_call_path(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::CallExpression {
                callee: Some(callee),
                string_argument: Some(path),
            } if callee == "require" => Some(path),
            _ => None,
        }
    }

    /// The call under `require('<string>').property`
    pub fn member_of_module_call(&self) -> Option<(&str, &Node)> {
        match &self.kind {
            NodeKind::StaticMember {
                property,
                call_object: true,
            } => {
                let call = self.children.first()?;
                call.module_call_path()?;
                Some((property, call))
            }
            _ => None,
        }
    }

    /// First name bound by an import or variable declaration. An exported
    /// variable declaration carries its declarators directly.
    pub fn first_bound_name(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::ImportDeclaration { .. } => {
                self.children.iter().find_map(|child| match &child.kind {
                    NodeKind::ImportDefaultSpecifier { local }
                    | NodeKind::ImportNamespaceSpecifier { local }
                    | NodeKind::ImportSpecifier { local, .. } => Some(local.as_str()),
                    _ => None,
                })
            }
            NodeKind::VariableDeclaration | NodeKind::ExportNamed => {
                self.children.iter().find_map(|child| match &child.kind {
                    NodeKind::VariableDeclarator { binding, .. } => Some(binding.as_deref()),
                    _ => None,
                })?
            }
            _ => None,
        }
    }
}
