//! Keeping a file's header comment on top when its statement list is rebuilt.
//!
//! The comment block in front of the first statement belongs to that
//! statement's trivia. Once the statement is replaced, or new statements are
//! inserted in front of it, the block would end up in the wrong place or be
//! lost. [`OriginalHeader`] records it before any pass runs, and
//! [`lift_header`] detaches it so the printer can emit it ahead of the new
//! first statement.

use crate::tree::{Node, NodeKind};

/// Leading comment block of the first non-prologue statement, captured before
/// any rewrite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OriginalHeader {
    /// Offset where the trivia starts; identifies the statement carrying it
    pub offset: u32,
    pub text: String,
}

impl OriginalHeader {
    /// Returns `None` when the first statement has nothing but whitespace in
    /// front of it.
    pub fn capture(statements: &[Node], text: &str) -> Option<Self> {
        let first = statements.get(prologue_len(statements))?;
        let span = first.span()?;
        let trivia = first.leading_trivia(text).ok()?;
        if trivia.trim().is_empty() {
            return None;
        }
        Some(Self {
            offset: span.leading,
            text: trivia.to_owned(),
        })
    }
}

/// A header detached from its statement, to be printed in front of the
/// statement at index `at`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiftedHeader {
    pub at: usize,
    pub text: String,
}

/// Number of leading hashbang and directive nodes.
pub fn prologue_len(statements: &[Node]) -> usize {
    statements
        .iter()
        .take_while(|node| matches!(node.kind, NodeKind::Hashbang | NodeKind::Directive))
        .count()
}

/// Decide whether the original header has to be re-attached by hand.
///
/// `at` is the index of the first statement after the prologue in the new
/// list, after any insertions. When that statement is still the untouched
/// original and nothing was inserted in front of it, its own trivia carries
/// the header and nothing happens. Otherwise the header is stripped from
/// whichever statement still carries it and returned.
pub fn lift_header(
    statements: &mut [Node],
    original: Option<&OriginalHeader>,
    text: &str,
    at: usize,
    inserted_in_front: bool,
) -> Option<LiftedHeader> {
    let original = original?;
    if let Some(first) = statements.get(at) {
        if first.leading_trivia(text).is_ok() && !inserted_in_front {
            return None;
        }
    }

    if let Some(carrier) = statements
        .iter_mut()
        .find(|node| node.span().is_some_and(|span| span.leading == original.offset))
    {
        carrier.strip_leading_trivia();
    }

    Some(LiftedHeader {
        at,
        text: original.text.clone(),
    })
}
