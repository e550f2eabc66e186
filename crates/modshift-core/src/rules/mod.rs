//! Rewrite rules.
//!
//! Each [`Rule`] is a match predicate plus a producer. Rules are plain values,
//! so a pass is just a `Vec<Rule>` that can be listed, reordered and tested
//! on its own.

mod entry_point;
mod hoist;
mod inline_module_call;
mod interop;
mod legacy_export;
mod module_call;

pub use entry_point::split_deep_path;
pub use inline_module_call::{derive_import_name, is_identifier};

use crate::engine::{NodePosition, RuleContext};
use crate::error::Result;
use crate::seeder::SeedRequest;
use crate::tree::Node;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rule {
    /// Never matches. Leaves only the printer's own normalisation.
    Idle,
    /// `require('x');` at the top level becomes `import 'x';`
    SideEffectModuleCall,
    /// `const X = require('x')` (optionally `.prop`) becomes `import X from 'x'`
    ModuleCallDeclaration,
    /// `require('x')` in expression position becomes an identifier plus a
    /// pending import
    InlineModuleCall { build_dir: String },
    /// `export = x` becomes `export default x`
    LegacyExport,
    /// Default imports through `<pkg><delimiter>/…` become named imports from
    /// `<pkg>`, seeding the package entry point
    EntryPointPath { delimiter: String },
    /// `require('@…')` / `require('./…')` becomes
    /// `require(…).default || require(…)`
    DefaultInterop,
    /// Inserts the pending imports at the top of the program
    HoistImports,
    /// Adds an import and a re-export of one symbol to an entry file
    SeedEntryPoint(SeedRequest),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RuleKind {
    Idle,
    SideEffectModuleCall,
    ModuleCallDeclaration,
    InlineModuleCall,
    LegacyExport,
    EntryPointPath,
    DefaultInterop,
    HoistImports,
    SeedEntryPoint,
}

impl RuleKind {
    pub fn name(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::SideEffectModuleCall => "side-effect-module-call",
            Self::ModuleCallDeclaration => "module-call-declaration",
            Self::InlineModuleCall => "inline-module-call",
            Self::LegacyExport => "legacy-export",
            Self::EntryPointPath => "entry-point-path",
            Self::DefaultInterop => "default-interop",
            Self::HoistImports => "hoist-imports",
            Self::SeedEntryPoint => "seed-entry-point",
        }
    }
}

impl Rule {
    pub fn kind(&self) -> RuleKind {
        match self {
            Self::Idle => RuleKind::Idle,
            Self::SideEffectModuleCall => RuleKind::SideEffectModuleCall,
            Self::ModuleCallDeclaration => RuleKind::ModuleCallDeclaration,
            Self::InlineModuleCall { .. } => RuleKind::InlineModuleCall,
            Self::LegacyExport => RuleKind::LegacyExport,
            Self::EntryPointPath { .. } => RuleKind::EntryPointPath,
            Self::DefaultInterop => RuleKind::DefaultInterop,
            Self::HoistImports => RuleKind::HoistImports,
            Self::SeedEntryPoint(_) => RuleKind::SeedEntryPoint,
        }
    }

    pub fn name(&self) -> &'static str {
        self.kind().name()
    }

    pub fn matches(&self, node: &Node, position: NodePosition) -> bool {
        match self {
            Self::Idle => false,
            Self::SideEffectModuleCall => module_call::matches_side_effect(node, position),
            Self::ModuleCallDeclaration => module_call::matches_declaration(node, position),
            Self::InlineModuleCall { build_dir } => inline_module_call::matches(node, build_dir),
            Self::LegacyExport => legacy_export::matches(node, position),
            Self::EntryPointPath { delimiter } => entry_point::matches(node, delimiter),
            Self::DefaultInterop => interop::matches(node),
            Self::HoistImports | Self::SeedEntryPoint(_) => position.is_root(),
        }
    }

    /// Build the replacement for a node this rule matched. Returning the node
    /// unchanged is allowed and is not counted as a rewrite.
    pub fn produce(
        &self,
        node: &Node,
        _position: NodePosition,
        cx: &mut RuleContext<'_>,
    ) -> Result<Node> {
        match self {
            Self::Idle => Ok(node.clone()),
            Self::SideEffectModuleCall => Ok(module_call::produce_side_effect(node)),
            Self::ModuleCallDeclaration => Ok(module_call::produce_declaration(node)),
            Self::InlineModuleCall { build_dir } => {
                Ok(inline_module_call::produce(node, build_dir, cx))
            }
            Self::LegacyExport => Ok(legacy_export::produce(node)),
            Self::EntryPointPath { delimiter } => entry_point::produce(node, delimiter, cx),
            Self::DefaultInterop => Ok(interop::produce(node)),
            Self::HoistImports => hoist::produce(node, cx),
            Self::SeedEntryPoint(request) => entry_point::produce_seed(node, request, cx),
        }
    }
}
