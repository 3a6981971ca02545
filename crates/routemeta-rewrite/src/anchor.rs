//! Locating the registration method.
//!
//! The anchor is the symbol of the `route` member on the class of the
//! file's default export. Call sites are matched against it by identity,
//! so aliases of the registry or of the method itself still match.

use routemeta_parser::{SyntaxKind, SyntaxNode};
use routemeta_typeck::ty::SymbolId;
use tracing::debug;

use crate::config::RewriteConfig;
use crate::error::{Result, RewriteError};
use crate::oracle::TypeOracle;
use crate::visitor::significant_children;

/// `SOURCE_FILE > STMT_LIST > EXPORT_DEFAULT`
const EXPORT_PATH: [SyntaxKind; 2] = [SyntaxKind::STMT_LIST, SyntaxKind::EXPORT_DEFAULT];

/// Nodes reached from `parent` by following `path` one child kind at a time.
fn matching_nodes(parent: &SyntaxNode, path: &[SyntaxKind]) -> Vec<SyntaxNode> {
    let Some((&kind, rest)) = path.split_first() else {
        return vec![parent.clone()];
    };
    parent
        .children()
        .filter(|child| child.kind() == kind)
        .flat_map(|child| matching_nodes(&child, rest))
        .collect()
}

pub fn find_anchor<O: TypeOracle + ?Sized>(
    oracle: &O,
    root: &SyntaxNode,
    config: &RewriteConfig,
) -> Result<SymbolId> {
    let exports = matching_nodes(root, &EXPORT_PATH);
    let [export] = exports.as_slice() else {
        return Err(RewriteError::MultipleOrMissingExports {
            found: exports.len(),
            span: exports.get(1).map(|n| n.text_range()),
        });
    };

    let malformed = |reason: String| RewriteError::MalformedExport {
        reason,
        span: Some(export.text_range()),
    };
    let parts = significant_children(export);
    if parts.len() < 3 {
        return Err(malformed(format!(
            "expected `export default <name>`, found {} parts",
            parts.len()
        )));
    }
    if parts[0].kind() != SyntaxKind::EXPORT_KW {
        return Err(malformed("expected `export`".to_string()));
    }
    if parts[1].kind() != SyntaxKind::DEFAULT_KW {
        return Err(malformed("expected `default`".to_string()));
    }
    let Some(name_ref) = parts[2].as_node().filter(|n| n.kind() == SyntaxKind::NAME_REF) else {
        return Err(malformed(format!(
            "expected an identifier after `export default`, found {:?}",
            parts[2].kind()
        )));
    };

    let name = name_ref.text().to_string();
    let span = Some(name_ref.text_range());
    let declaration = oracle
        .symbol_at(name_ref)
        .and_then(|sym| oracle.value_declaration(sym))
        .ok_or_else(|| RewriteError::UnresolvedExport {
            name: name.clone(),
            span,
        })?;

    let ty = oracle.type_of_declaration(&declaration);
    let expected = &config.registry.type_name;
    let is_registry = oracle.type_name(ty).as_ref() == Some(expected) && oracle.is_class(ty);
    if !is_registry {
        return Err(RewriteError::WrongExportType {
            expected: expected.clone(),
            found: oracle.display_type(ty),
            span,
        });
    }

    let method = &config.registry.method;
    let anchor = oracle
        .property(ty, method)
        .ok_or_else(|| RewriteError::MissingRegistrationMethod {
            ty: expected.clone(),
            method: method.clone(),
            span,
        })?;
    debug!(export = %name, registry = %expected, method = %method, "resolved registration method");
    Ok(anchor)
}
