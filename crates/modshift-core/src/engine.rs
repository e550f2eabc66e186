//! Rule application.
//!
//! A pass is an ordered slice of [`Rule`]s. [`apply`] walks the tree
//! pre-order: at each node the first rule that matches produces the
//! replacement and the node's subtree is not visited further; when no rule
//! matches, the children are visited and the node is rebuilt around them.
//! Every pass is a single walk over the shape it was given.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use rustc_hash::FxHashMap;
use tracing::{debug, trace};

use crate::comments::{LiftedHeader, OriginalHeader};
use crate::error::Result;
use crate::loader::SourceUnit;
use crate::rules::{Rule, RuleKind};
use crate::seeder::{EntryPointSeeder, SeedOutcome, SeedRequest};
use crate::tree::Node;

/// Depth of the node being visited; the root is 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodePosition {
    depth: usize,
}

impl NodePosition {
    pub const ROOT: Self = Self { depth: 0 };

    pub fn depth(self) -> usize {
        self.depth
    }

    pub fn is_root(self) -> bool {
        self.depth == 0
    }

    /// Direct child of the program
    pub fn is_top_level(self) -> bool {
        self.depth == 1
    }

    pub fn child(self) -> Self {
        Self {
            depth: self.depth + 1,
        }
    }
}

/// An import waiting to be placed at the top of the file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingImport {
    pub local: String,
    /// String literal node for the module path
    pub source: Node,
}

impl PendingImport {
    pub fn path(&self) -> Option<&str> {
        self.source.string_value()
    }

    pub fn into_node(self) -> Node {
        Node::default_import(self.local, self.source)
    }
}

/// Number of rewrites performed per rule kind
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleStats {
    counts: FxHashMap<RuleKind, usize>,
}

impl RuleStats {
    pub fn record(&mut self, kind: RuleKind) {
        *self.counts.entry(kind).or_default() += 1;
    }

    pub fn get(&self, kind: RuleKind) -> usize {
        self.counts.get(&kind).copied().unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (RuleKind, usize)> + '_ {
        self.counts.iter().map(|(kind, count)| (*kind, *count))
    }

    pub fn merge(&mut self, other: &RuleStats) {
        for (kind, count) in other.iter() {
            *self.counts.entry(kind).or_default() += count;
        }
    }
}

/// State threaded through every pass of one file's pipeline.
pub struct RuleContext<'s> {
    path: PathBuf,
    text: Arc<str>,
    original_header: Option<OriginalHeader>,
    pending_imports: Vec<PendingImport>,
    header: Option<LiftedHeader>,
    stats: RuleStats,
    seeder: &'s mut dyn EntryPointSeeder,
}

impl<'s> RuleContext<'s> {
    /// Captures the unit's header comment before anything is rewritten.
    pub fn new(unit: &SourceUnit, seeder: &'s mut dyn EntryPointSeeder) -> Self {
        Self {
            path: unit.path.clone(),
            text: Arc::clone(&unit.text),
            original_header: OriginalHeader::capture(unit.statements(), &unit.text),
            pending_imports: Vec::new(),
            header: None,
            stats: RuleStats::default(),
            seeder,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn original_header(&self) -> Option<&OriginalHeader> {
        self.original_header.as_ref()
    }

    /// Queue an import for the file-rebuild pass. Identical requests are
    /// recorded once.
    pub fn push_import(&mut self, import: PendingImport) {
        let duplicate = self
            .pending_imports
            .iter()
            .any(|pending| pending.local == import.local && pending.path() == import.path());
        if !duplicate {
            self.pending_imports.push(import);
        }
    }

    pub fn pending_imports(&self) -> &[PendingImport] {
        &self.pending_imports
    }

    pub fn take_pending_imports(&mut self) -> Vec<PendingImport> {
        std::mem::take(&mut self.pending_imports)
    }

    /// Lifted header for the printer, set by passes that rebuild the
    /// statement list.
    pub fn header(&self) -> Option<&LiftedHeader> {
        self.header.as_ref()
    }

    pub fn set_header(&mut self, header: Option<LiftedHeader>) {
        self.header = header;
    }

    pub fn stats(&self) -> &RuleStats {
        &self.stats
    }

    pub fn into_stats(self) -> RuleStats {
        self.stats
    }

    /// Ask the seeder to make `request.package` re-export `request.symbol`.
    pub fn seed(&mut self, request: &SeedRequest) -> Result<SeedOutcome> {
        self.seeder.ensure_export(request)
    }
}

/// Run one pass over `unit`.
pub fn apply(unit: SourceUnit, rules: &[Rule], cx: &mut RuleContext<'_>) -> Result<SourceUnit> {
    if unit.opaque {
        return Ok(unit);
    }
    let root = rewrite(&unit.root, NodePosition::ROOT, rules, cx)?;
    Ok(unit.with_root(root))
}

/// Run passes in order, each on the previous pass's output.
pub fn apply_passes(
    mut unit: SourceUnit,
    passes: &[Vec<Rule>],
    cx: &mut RuleContext<'_>,
) -> Result<SourceUnit> {
    for (index, pass) in passes.iter().enumerate() {
        let names: Vec<&str> = pass.iter().map(Rule::name).collect();
        debug!(path = %unit.path.display(), pass = index, rules = ?names, "running pass");
        unit = apply(unit, pass, cx)?;
    }
    Ok(unit)
}

fn rewrite(
    node: &Node,
    position: NodePosition,
    rules: &[Rule],
    cx: &mut RuleContext<'_>,
) -> Result<Node> {
    if let Some(rule) = rules.iter().find(|rule| rule.matches(node, position)) {
        let produced = rule.produce(node, position, cx)?;
        if produced != *node {
            trace!(rule = rule.name(), depth = position.depth(), "rewrote node");
            cx.stats.record(rule.kind());
        }
        return Ok(produced);
    }

    let children = node
        .children
        .iter()
        .map(|child| rewrite(child, position.child(), rules, cx))
        .collect::<Result<Vec<_>>>()?;
    Ok(node.with_children(children))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::load;
    use crate::printer::print;
    use crate::seeder::NoSeeding;

    fn run(text: &str, passes: &[Vec<Rule>]) -> (String, RuleStats) {
        let unit = load(Path::new("a.ts"), Some(text)).unwrap();
        let mut seeder = NoSeeding;
        let mut cx = RuleContext::new(&unit, &mut seeder);
        let unit = apply_passes(unit, passes, &mut cx).unwrap();
        let code = print(&unit, cx.header());
        (code, cx.into_stats())
    }

    #[test]
    fn idle_pass_changes_nothing() {
        let (code, stats) = run("const a = 1;\nfoo(a);\n", &[vec![Rule::Idle]]);
        assert_eq!(code, "const a = 1;\nfoo(a);\n");
        assert_eq!(stats.total(), 0);
    }

    #[test]
    fn first_matching_rule_wins_and_subtree_is_skipped() {
        // The declaration rule claims the statement, so the inline rule
        // never sees the call inside it.
        let (code, stats) = run(
            "const a = require('./a');\n",
            &[vec![
                Rule::ModuleCallDeclaration,
                Rule::InlineModuleCall {
                    build_dir: "dist".into(),
                },
            ]],
        );
        assert_eq!(code, "import a from './a';\n");
        assert_eq!(stats.get(RuleKind::ModuleCallDeclaration), 1);
        assert_eq!(stats.get(RuleKind::InlineModuleCall), 0);
    }

    #[test]
    fn unmatched_nodes_are_descended_into() {
        let (code, stats) = run(
            "function f() {\n  return g(require('./x-y'));\n}\n",
            &[vec![Rule::InlineModuleCall {
                build_dir: "dist".into(),
            }]],
        );
        assert_eq!(code, "function f() {\n  return g(XY);\n}\n");
        assert_eq!(stats.total(), 1);
    }

    #[test]
    fn pending_imports_are_deduplicated() {
        let unit = load(Path::new("a.ts"), Some("")).unwrap();
        let mut seeder = NoSeeding;
        let mut cx = RuleContext::new(&unit, &mut seeder);
        for _ in 0..2 {
            cx.push_import(PendingImport {
                local: "A".into(),
                source: Node::string_literal("./a"),
            });
        }
        cx.push_import(PendingImport {
            local: "A".into(),
            source: Node::string_literal("./b"),
        });
        assert_eq!(cx.pending_imports().len(), 2);
        assert_eq!(cx.take_pending_imports().len(), 2);
        assert!(cx.pending_imports().is_empty());
    }

    #[test]
    fn positions() {
        let root = NodePosition::ROOT;
        assert!(root.is_root());
        assert!(root.child().is_top_level());
        assert!(!root.child().child().is_top_level());
    }
}
