//! Rewriting registration call sites.
//!
//! Every call whose callee resolves to the anchor method gets a trailing
//! `{ paramsTypeId: N, returnTypeId: M }` argument, where `N` and `M` are
//! registry ids of the handler's parameter and return schemas:
//!
//! ```text
//! routes.route("GET", "/people", (q: Query) => find(q));
//! routes.route("GET", "/people", (q: Query) => find(q), { paramsTypeId: 0, returnTypeId: 1 });
//! ```

use std::sync::OnceLock;

use rowan::{GreenNode, NodeOrToken, TextRange};
use tracing::debug;

use routemeta_parser::ast::expr::{ArgList, ArrowBody, CallExpr, Element, Expr};
use routemeta_parser::ast::AstNode;
use routemeta_parser::make::{self, GreenElement};
use routemeta_parser::{SyntaxElement, SyntaxKind, SyntaxNode};
use routemeta_typeck::ty::SymbolId;

use crate::config::RewriteConfig;
use crate::error::{Result, RewriteError};
use crate::oracle::TypeOracle;
use crate::registry::SchemaRegistry;
use crate::schema::lower;
use crate::visitor::{expect_child, green_element, DispatchTable, Visitor};

type CallSiteHandler = for<'a> fn(&mut CallSiteRewriter<'a>, &SyntaxNode) -> Result<GreenNode>;

/// Registry ids assigned to one call site.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteMetaInfo {
    pub params_type_id: usize,
    pub return_type_id: usize,
}

pub struct CallSiteRewriter<'a> {
    oracle: &'a dyn TypeOracle,
    anchor: SymbolId,
    config: &'a RewriteConfig,
    registry: SchemaRegistry,
    rewritten: usize,
}

impl Visitor for CallSiteRewriter<'_> {
    type Handler = CallSiteHandler;

    fn dispatch_table() -> &'static DispatchTable<CallSiteHandler> {
        static TABLE: OnceLock<DispatchTable<CallSiteHandler>> = OnceLock::new();
        TABLE.get_or_init(|| DispatchTable::new().on(SyntaxKind::CALL_EXPR, call_expr as CallSiteHandler))
    }

    fn invoke(&mut self, handler: CallSiteHandler, node: &SyntaxNode) -> Result<GreenNode> {
        handler(self, node)
    }
}

/// Whether `call` invokes `anchor` through a member access or a bare name.
pub fn is_registration_call(oracle: &dyn TypeOracle, anchor: SymbolId, call: &CallExpr) -> bool {
    match call.callee() {
        Some(callee @ (Expr::PropertyAccess(_) | Expr::NameRef(_))) => {
            oracle.symbol_at(callee.syntax()) == Some(anchor)
        }
        _ => false,
    }
}

fn call_expr(rewriter: &mut CallSiteRewriter<'_>, node: &SyntaxNode) -> Result<GreenNode> {
    let Some(call) = CallExpr::cast(node.clone()) else {
        return rewriter.visit_each_child(node);
    };
    if !is_registration_call(rewriter.oracle, rewriter.anchor, &call) {
        return rewriter.visit_each_child(node);
    }

    let meta = rewriter.analyze(&call)?;
    let visited = rewriter.visit_each_child(node)?;
    rewriter.rewritten += 1;
    append_argument(visited, rewriter.meta_object(meta))
}

impl<'a> CallSiteRewriter<'a> {
    pub fn new(oracle: &'a dyn TypeOracle, anchor: SymbolId, config: &'a RewriteConfig) -> Self {
        CallSiteRewriter {
            oracle,
            anchor,
            config,
            registry: SchemaRegistry::new(),
            rewritten: 0,
        }
    }

    /// Number of call sites rewritten so far.
    pub fn rewritten(&self) -> usize {
        self.rewritten
    }

    pub fn into_registry(self) -> SchemaRegistry {
        self.registry
    }

    /// Check the shape of a matched call, lower its handler's parameter
    /// and return types, and register both schemas.
    fn analyze(&mut self, call: &CallExpr) -> Result<RouteMetaInfo> {
        let arg_list = expect_child(call.syntax(), SyntaxKind::ARG_LIST)?;
        let args: Vec<Element> = ArgList::cast(arg_list.clone())
            .map(|list| list.args().collect())
            .unwrap_or_default();
        if args.len() != 3 {
            return Err(RewriteError::ArityError {
                what: format!("arguments to `{}`", self.config.registry.method),
                expected: 3,
                found: args.len(),
                span: Some(arg_list.text_range()),
            });
        }

        let handler = inline_handler(&args[2])?;
        let handler_range = handler.syntax().text_range();
        let handler_ty = self.oracle.type_of_expression(handler.syntax());
        let signatures = self.oracle.call_signatures(handler_ty);
        let &[signature] = signatures.as_slice() else {
            return Err(RewriteError::AmbiguousSignature {
                found: signatures.len(),
                span: Some(handler_range),
            });
        };

        let params = self.oracle.parameters(signature);
        let &[param] = params.as_slice() else {
            let span = expect_child(handler.syntax(), SyntaxKind::PARAM_LIST)
                .map(|list| list.text_range())
                .unwrap_or(handler_range);
            return Err(RewriteError::ArityError {
                what: "handler parameters".to_string(),
                expected: 1,
                found: params.len(),
                span: Some(span),
            });
        };

        let param_range = self
            .oracle
            .value_declaration(param)
            .map(|decl| decl.text_range())
            .unwrap_or(handler_range);
        let params_schema =
            lower(self.oracle, self.oracle.type_of_symbol(param)).map_err(|e| e.at(param_range))?;
        let return_schema = lower(self.oracle, self.oracle.return_type(signature))
            .map_err(|e| e.at(body_range(&handler).unwrap_or(handler_range)))?;

        let params_type_id = self.registry.register(params_schema);
        let return_type_id = self.registry.register(return_schema);
        debug!(
            offset = u32::from(call.syntax().text_range().start()),
            params_type_id,
            return_type_id,
            "registered handler schemas"
        );
        Ok(RouteMetaInfo {
            params_type_id,
            return_type_id,
        })
    }

    fn meta_object(&self, meta: RouteMetaInfo) -> GreenNode {
        let fields = &self.config.meta;
        make::object_literal(vec![
            make::property_assignment(
                &fields.params_field,
                make::number_literal(meta.params_type_id as u64),
            ),
            make::property_assignment(
                &fields.return_field,
                make::number_literal(meta.return_type_id as u64),
            ),
        ])
    }
}

/// The handler argument, if it is an arrow function or an unnamed
/// function expression written inline.
fn inline_handler(arg: &Element) -> Result<Expr> {
    let found = match arg {
        Element::Expr(expr @ Expr::Arrow(_)) => return Ok(expr.clone()),
        Element::Expr(Expr::Function(func)) => match func.name() {
            None => return Ok(Expr::Function(func.clone())),
            Some(name) => format!("named function expression `{}`", name.syntax().text()),
        },
        Element::Expr(Expr::NameRef(name)) => format!("reference to `{}`", name.syntax().text()),
        Element::Expr(expr) => describe(expr.syntax().kind()),
        Element::Spread(_) => "spread argument".to_string(),
    };
    Err(RewriteError::UnsupportedHandlerShape {
        found,
        span: Some(arg.syntax().text_range()),
    })
}

fn describe(kind: SyntaxKind) -> String {
    format!("{:?}", kind).to_lowercase().replace('_', " ")
}

fn body_range(handler: &Expr) -> Option<TextRange> {
    match handler {
        Expr::Arrow(arrow) => match arrow.body()? {
            ArrowBody::Block(block) => Some(block.syntax().text_range()),
            ArrowBody::Expr(expr) => Some(expr.syntax().text_range()),
        },
        Expr::Function(func) => func.body().map(|block| block.syntax().text_range()),
        _ => None,
    }
}

/// Append `meta` to the ARG_LIST of a visited call.
///
/// Goes after the last argument, or after a trailing comma if there is
/// one, so trivia before `)` stays where it was.
fn append_argument(call: GreenNode, meta: GreenNode) -> Result<GreenNode> {
    let call = SyntaxNode::new_root(call);
    let arg_list = expect_child(&call, SyntaxKind::ARG_LIST)?;
    let elements: Vec<SyntaxElement> = arg_list.children_with_tokens().collect();
    let malformed = || RewriteError::MalformedNode {
        node: "ARG_LIST".to_string(),
        expected: "a closing `)`".to_string(),
        span: Some(arg_list.text_range()),
    };
    let r_paren = elements
        .iter()
        .rposition(|e| e.kind() == SyntaxKind::R_PAREN)
        .ok_or_else(malformed)?;
    let last = elements[..r_paren]
        .iter()
        .rposition(|e| !e.kind().is_trivia())
        .ok_or_else(malformed)?;

    let meta = NodeOrToken::Node(meta);
    let space = NodeOrToken::Token(make::whitespace(" "));
    let comma = NodeOrToken::Token(make::comma());
    let inserted: Vec<GreenElement> = if elements[last].kind() == SyntaxKind::COMMA {
        vec![space, meta, comma]
    } else {
        vec![comma, space, meta]
    };

    let mut children: Vec<GreenElement> = elements.iter().map(green_element).collect();
    children.splice(last + 1..last + 1, inserted);
    Ok(arg_list.replace_with(make::node(SyntaxKind::ARG_LIST, children)))
}
