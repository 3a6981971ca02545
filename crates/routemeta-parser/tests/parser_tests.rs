use insta::assert_snapshot;
use routemeta_parser::ast::expr::{
    ArrowBody, ArrowFunction, Element, Expr, FunctionExpr, ObjectMember,
};
use routemeta_parser::ast::item::{ClassMember, Stmt, VarDeclarator};
use routemeta_parser::ast::ty::{Type, TypeMember};
use routemeta_parser::ast::AstNode;
use routemeta_parser::{debug_tree, parse, SyntaxKind};

const FIXTURE: &str = include_str!("../../../fixtures/simple_endpoint.ts");

fn tree(source: &str) -> String {
    let parse = parse(source);
    assert!(parse.ok(), "unexpected errors: {:?}", parse.errors());
    debug_tree(&parse.syntax())
}

// ── Lossless round trip ──────────────────────────────────────────────────

#[test]
fn fixture_round_trips() {
    let parse = parse(FIXTURE);
    assert!(parse.ok(), "{:?}", parse.errors());
    assert_eq!(parse.syntax().text().to_string(), FIXTURE);
}

#[test]
fn broken_input_still_round_trips() {
    let source = "const x = {\n  a: 1,\n  b: (\n";
    let parse = parse(source);
    assert!(!parse.ok());
    assert_eq!(parse.syntax().text().to_string(), source);
}

// ── Tree shapes ──────────────────────────────────────────────────────────

#[test]
fn method_call_shape() {
    assert_snapshot!(tree("a.b(1)"), @r#"
    SOURCE_FILE@0..6
      STMT_LIST@0..6
        EXPR_STMT@0..6
          CALL_EXPR@0..6
            PROPERTY_ACCESS@0..3
              NAME_REF@0..1
                IDENT@0..1 "a"
              DOT@1..2 "."
              IDENT@2..3 "b"
            ARG_LIST@3..6
              L_PAREN@3..4 "("
              LITERAL@4..5
                NUMBER_LITERAL@4..5 "1"
              R_PAREN@5..6 ")"
      EOF@6..6 ""
    "#);
}

#[test]
fn leading_comment_stays_in_the_file_node() {
    assert_snapshot!(tree("// hi\nconst x = 1;"), @r#"
    SOURCE_FILE@0..18
      LINE_COMMENT@0..5 "// hi"
      WHITESPACE@5..6 "\n"
      STMT_LIST@6..18
        VAR_STMT@6..18
          CONST_KW@6..11 "const"
          WHITESPACE@11..12 " "
          VAR_DECLARATOR@12..17
            NAME@12..13
              IDENT@12..13 "x"
            WHITESPACE@13..14 " "
            EQ@14..15 "="
            WHITESPACE@15..16 " "
            LITERAL@16..17
              NUMBER_LITERAL@16..17 "1"
          SEMICOLON@17..18 ";"
      EOF@18..18 ""
    "#);
}

#[test]
fn explicit_type_arguments_on_call() {
    assert_snapshot!(tree("f<A>(x)"), @r#"
    SOURCE_FILE@0..7
      STMT_LIST@0..7
        EXPR_STMT@0..7
          CALL_EXPR@0..7
            NAME_REF@0..1
              IDENT@0..1 "f"
            TYPE_ARG_LIST@1..4
              LT@1..2 "<"
              TYPE_REF@2..3
                NAME_REF@2..3
                  IDENT@2..3 "A"
              GT@3..4 ">"
            ARG_LIST@4..7
              L_PAREN@4..5 "("
              NAME_REF@5..6
                IDENT@5..6 "x"
              R_PAREN@6..7 ")"
      EOF@7..7 ""
    "#);
}

#[test]
fn less_than_is_not_type_arguments() {
    let parse = parse("a < b;");
    assert!(parse.ok());
    let kinds: Vec<SyntaxKind> = parse.syntax().descendants().map(|n| n.kind()).collect();
    assert!(kinds.contains(&SyntaxKind::BINARY_EXPR));
    assert!(!kinds.contains(&SyntaxKind::TYPE_ARG_LIST));
}

#[test]
fn arrow_function_forms() {
    let parse = parse("f(x => x, (a: T): R => a, () => { return 1; });");
    assert!(parse.ok(), "{:?}", parse.errors());
    let arrows: Vec<_> = parse
        .syntax()
        .descendants()
        .filter_map(routemeta_parser::ast::expr::ArrowFunction::cast)
        .collect();
    assert_eq!(arrows.len(), 3);
    let param_counts: Vec<usize> = arrows
        .iter()
        .map(|a| a.param_list().map(|l| l.params().count()).unwrap_or(0))
        .collect();
    assert_eq!(param_counts, vec![1, 1, 0]);
    assert!(matches!(arrows[0].body(), Some(ArrowBody::Expr(_))));
    assert!(arrows[1].return_type().is_some());
    assert!(matches!(arrows[2].body(), Some(ArrowBody::Block(_))));
}

#[test]
fn async_function_expressions() {
    let parse = parse("f(async (q: Q) => 1, async q => q, async => 1, async function (q) {});");
    assert!(parse.ok(), "{:?}", parse.errors());
    let arrows: Vec<ArrowFunction> = parse
        .syntax()
        .descendants()
        .filter_map(ArrowFunction::cast)
        .collect();
    let flags: Vec<bool> = arrows.iter().map(ArrowFunction::is_async).collect();
    assert_eq!(flags, vec![true, true, false]);
    // A lone `async` before `=>` is the parameter.
    let param = arrows[2]
        .param_list()
        .and_then(|l| l.params().next())
        .and_then(|p| p.name())
        .map(|n| n.text());
    assert_eq!(param.as_deref(), Some("async"));

    let function = parse
        .syntax()
        .descendants()
        .find_map(FunctionExpr::cast)
        .expect("function expression");
    assert!(function.is_async());
    assert!(function
        .syntax()
        .children()
        .any(|n| n.kind() == SyntaxKind::MODIFIER_LIST));
}

#[test]
fn async_call_is_not_an_arrow() {
    let parse = parse("async(x);");
    assert!(parse.ok(), "{:?}", parse.errors());
    let kinds: Vec<SyntaxKind> = parse.syntax().descendants().map(|n| n.kind()).collect();
    assert!(kinds.contains(&SyntaxKind::CALL_EXPR));
    assert!(!kinds.contains(&SyntaxKind::ARROW_FUNCTION));
}

#[test]
fn parenthesized_expression_is_not_an_arrow() {
    let parse = parse("(a + b) * c;");
    assert!(parse.ok());
    assert!(!parse
        .syntax()
        .descendants()
        .any(|n| n.kind() == SyntaxKind::ARROW_FUNCTION));
}

// ── Typed AST over the fixture ───────────────────────────────────────────

#[test]
fn fixture_class_members_in_order() {
    let parse = parse(FIXTURE);
    let class = parse
        .tree()
        .stmts()
        .find_map(|s| match s {
            Stmt::Class(c) => Some(c),
            _ => None,
        })
        .expect("class");
    assert_eq!(class.name().map(|n| n.text()).as_deref(), Some("RouteMap"));
    let members: Vec<String> = class
        .members()
        .into_iter()
        .map(|m| match m {
            ClassMember::Property(p) => format!("prop {}", p.name().map(|n| n.text()).unwrap_or_default()),
            ClassMember::Method(m) => format!("method {}", m.name().map(|n| n.text()).unwrap_or_default()),
            ClassMember::Constructor(_) => "constructor".to_string(),
            ClassMember::Index(_) => "index".to_string(),
        })
        .collect();
    assert_eq!(members, vec!["prop routes", "constructor", "method route"]);

    let route = class
        .members()
        .into_iter()
        .find_map(|m| match m {
            ClassMember::Method(m) => Some(m),
            _ => None,
        })
        .expect("route method");
    let params: Vec<(String, bool)> = route
        .param_list()
        .expect("params")
        .params()
        .map(|p| (p.name().map(|n| n.text()).unwrap_or_default(), p.is_optional()))
        .collect();
    assert_eq!(
        params,
        vec![
            ("method".to_string(), false),
            ("path".to_string(), false),
            ("handler".to_string(), false),
            ("metaInfo".to_string(), true),
        ]
    );
    let ret = route.return_type().and_then(|a| a.ty());
    assert!(matches!(ret, Some(Type::This(_))));
}

#[test]
fn fixture_type_alias_members() {
    let parse = parse(FIXTURE);
    let person = parse
        .tree()
        .stmts()
        .find_map(|s| match s {
            Stmt::TypeAlias(a) if a.name().map(|n| n.text()).as_deref() == Some("Person") => Some(a),
            _ => None,
        })
        .expect("Person alias");
    let Some(Type::Object(lit)) = person.ty() else {
        panic!("expected object type literal");
    };
    let names: Vec<String> = lit
        .members()
        .filter_map(|m| match m {
            TypeMember::Property(p) => p.name().map(|n| n.text()),
            _ => None,
        })
        .collect();
    assert_eq!(
        names,
        vec!["firstName", "lastName", "age", "birthDate", "favoriteColors"]
    );
}

#[test]
fn fixture_registration_calls() {
    let parse = parse(FIXTURE);
    let calls: Vec<String> = parse
        .syntax()
        .descendants()
        .filter_map(routemeta_parser::ast::expr::CallExpr::cast)
        .filter(|c| c.args().len() == 3)
        .map(|c| {
            let callee = c.callee().map(|e| e.syntax().text().to_string()).unwrap_or_default();
            let type_args = c.type_arg_list().map(|t| t.types().count()).unwrap_or(0);
            format!("{callee} <{type_args}>")
        })
        .collect();
    assert_eq!(calls, vec!["aliasedRouteMap.route <0>", "register <2>"]);
}

#[test]
fn object_literal_members() {
    let parse = parse("x({ a, b: 1, ...c });");
    let object = parse
        .syntax()
        .descendants()
        .find_map(routemeta_parser::ast::expr::ObjectLiteral::cast)
        .expect("object");
    let shapes: Vec<&str> = object
        .members()
        .map(|m| match m {
            ObjectMember::Shorthand(_) => "shorthand",
            ObjectMember::Property(_) => "property",
            ObjectMember::Spread(_) => "spread",
        })
        .collect();
    assert_eq!(shapes, vec!["shorthand", "property", "spread"]);
}

#[test]
fn array_spread_elements() {
    let parse = parse("[1, ...xs, 2];");
    let array = parse
        .syntax()
        .descendants()
        .find_map(routemeta_parser::ast::expr::ArrayLiteral::cast)
        .expect("array");
    let spreads = array
        .elements()
        .filter(|e| matches!(e, Element::Spread(_)))
        .count();
    assert_eq!(spreads, 1);
    assert_eq!(array.elements().count(), 3);
}

#[test]
fn keyword_named_members() {
    let parse = parse("class C { static default: number; readonly: boolean; delete() {} }\nx.default.new;");
    assert!(parse.ok(), "{:?}", parse.errors());
    let access = parse
        .syntax()
        .descendants()
        .filter_map(routemeta_parser::ast::expr::PropertyAccess::cast)
        .map(|p| p.name().unwrap_or_default())
        .collect::<Vec<_>>();
    assert_eq!(access, vec!["new", "default"]);
}

#[test]
fn object_binding_patterns() {
    let parse = parse("const { a, b: c, default: d } = o;");
    assert!(parse.ok(), "{:?}", parse.errors());
    let declarator = parse
        .syntax()
        .descendants()
        .find_map(VarDeclarator::cast)
        .expect("declarator");
    assert!(declarator.name().is_none());
    assert!(declarator.initializer().is_some());
    let bindings: Vec<(String, String)> = declarator
        .pattern()
        .expect("pattern")
        .elements()
        .map(|e| (e.property_name(), e.name().map(|n| n.text()).unwrap_or_default()))
        .collect();
    assert_eq!(
        bindings,
        vec![
            ("a".to_string(), "a".to_string()),
            ("b".to_string(), "c".to_string()),
            ("default".to_string(), "d".to_string()),
        ]
    );
}

#[test]
fn unclosed_binding_pattern() {
    let parse = parse("const { a, b = o;");
    assert!(!parse.ok());
    assert_eq!(parse.errors()[0].message, "expected `,`");
}

#[test]
fn paren_skip() {
    let parse = parse("((a));");
    let stmt = parse.tree().stmts().next();
    let Some(Stmt::Expr(e)) = stmt else {
        panic!("expected expression statement");
    };
    let inner = e.expr().map(Expr::skip_parens);
    assert!(matches!(inner, Some(Expr::NameRef(_))));
}

// ── Errors ───────────────────────────────────────────────────────────────

#[test]
fn first_error_only() {
    let parse = parse("const = 1; type = 2;");
    assert_eq!(parse.errors().len(), 1);
    let err = &parse.errors()[0];
    assert_eq!(err.message, "expected identifier");
    assert_eq!((err.span.start, err.span.end), (6, 7));
    assert!(parse
        .syntax()
        .descendants()
        .any(|n| n.kind() == SyntaxKind::ERROR_NODE));
}

#[test]
fn unclosed_block_points_at_opening_brace() {
    let parse = parse("function f() {\n  return 1;\n");
    let err = &parse.errors()[0];
    assert_eq!(err.message, "expected `}`");
    let (label, span) = err.related.clone().expect("related span");
    assert_eq!(label, "block opened here");
    assert_eq!((span.start, span.end), (13, 14));
}
