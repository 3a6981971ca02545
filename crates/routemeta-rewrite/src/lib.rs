//! routemeta rewriter.
//!
//! Finds calls to the route registration method of a file's default-exported
//! `RouteMap`, lowers the parameter and return types of each inline handler
//! into [`Schema`] values, files them in a [`SchemaRegistry`] and appends
//! `{ paramsTypeId, returnTypeId }` to the call. One pass per file; any
//! failure aborts the file.

pub mod anchor;
pub mod config;
pub mod diagnostics;
pub mod error;
mod frontend;
pub mod oracle;
pub mod registry;
pub mod rewriter;
pub mod schema;
pub mod visitor;

use rowan::GreenNode;
use tracing::info;

use routemeta_parser::ast::expr::CallExpr;
use routemeta_parser::ast::AstNode;
use routemeta_parser::{make, SyntaxNode};
use routemeta_typeck::ty::SymbolId;

pub use crate::anchor::find_anchor;
pub use crate::config::RewriteConfig;
pub use crate::error::RewriteError;
pub use crate::oracle::TypeOracle;
pub use crate::registry::SchemaRegistry;
pub use crate::schema::Schema;

use crate::rewriter::{is_registration_call, CallSiteRewriter};
use crate::visitor::Visitor;

/// A rewritten file and the schemas registered for it.
#[derive(Debug, Clone)]
pub struct Rewrite {
    pub green: GreenNode,
    pub registry: SchemaRegistry,
    /// Number of rewritten call sites.
    pub call_sites: usize,
}

impl Rewrite {
    pub fn syntax(&self) -> SyntaxNode {
        SyntaxNode::new_root(self.green.clone())
    }

    pub fn text(&self) -> String {
        make::print(&self.green)
    }
}

/// Rewrite every registration call under `root`.
pub fn rewrite(
    root: &SyntaxNode,
    oracle: &dyn TypeOracle,
    config: &RewriteConfig,
) -> Result<Rewrite, RewriteError> {
    let anchor = find_anchor(oracle, root, config)?;
    let mut rewriter = CallSiteRewriter::new(oracle, anchor, config);
    let green = rewriter.visit_node(root)?;
    let call_sites = rewriter.rewritten();
    let registry = rewriter.into_registry();
    info!(call_sites, schemas = registry.len(), "rewrote registration calls");
    Ok(Rewrite {
        green,
        registry,
        call_sites,
    })
}

/// Registration calls under `root`, in source order, without rewriting.
pub fn registration_calls(root: &SyntaxNode, oracle: &dyn TypeOracle, anchor: SymbolId) -> Vec<CallExpr> {
    root.descendants()
        .filter_map(CallExpr::cast)
        .filter(|call| is_registration_call(oracle, anchor, call))
        .collect()
}
