use routemeta_parser::ast::expr::{CallExpr, Expr};
use routemeta_parser::ast::item::VarDeclarator;
use routemeta_parser::ast::AstNode;
use routemeta_parser::{parse, SyntaxKind, SyntaxNode};
use routemeta_typeck::diagnostics::DiagnosticOptions;
use routemeta_typeck::ty::TypeId;
use routemeta_typeck::{check, TypeError, TypeckResult};

const FIXTURE: &str = include_str!("../../../fixtures/simple_endpoint.ts");

// ── Helpers ────────────────────────────────────────────────────────────

fn check_source(source: &str) -> (SyntaxNode, TypeckResult) {
    let parse = parse(source);
    assert!(parse.ok(), "parse errors: {:?}", parse.errors());
    let result = check(&parse);
    (parse.syntax(), result)
}

/// The VAR_DECLARATOR binding `name`.
fn declarator(root: &SyntaxNode, name: &str) -> SyntaxNode {
    root.descendants()
        .filter_map(VarDeclarator::cast)
        .find(|d| d.name().map(|n| n.text()).as_deref() == Some(name))
        .map(|d| d.syntax().clone())
        .unwrap_or_else(|| panic!("no declaration of `{}`", name))
}

fn type_of_var(root: &SyntaxNode, result: &TypeckResult, name: &str) -> TypeId {
    result.type_of_node(&declarator(root, name))
}

fn display_var(source: &str, name: &str) -> String {
    let (root, result) = check_source(source);
    assert!(result.errors.is_empty(), "{:?}", result.errors);
    result.display_type(type_of_var(&root, &result, name))
}

fn messages(source: &str) -> Vec<String> {
    let (_, result) = check_source(source);
    result.errors.iter().map(|e| e.to_string()).collect()
}

// ── Fixture ────────────────────────────────────────────────────────────

#[test]
fn fixture_checks_cleanly() {
    let (_, result) = check_source(FIXTURE);
    assert!(result.errors.is_empty(), "{:?}", result.errors);
}

#[test]
fn aliased_callees_resolve_to_the_same_member() {
    let (root, result) = check_source(FIXTURE);
    let callees: Vec<SyntaxNode> = root
        .descendants()
        .filter_map(CallExpr::cast)
        .filter(|c| c.arg_list().map(|a| a.args().count()) == Some(3))
        .filter_map(|c| c.callee().map(|e| e.syntax().clone()))
        .collect();
    assert_eq!(callees.len(), 2);

    let through_access = result.resolve_aliased(&callees[0]).expect("property access resolves");
    let through_const = result.resolve_aliased(&callees[1]).expect("const alias resolves");
    assert_eq!(through_access, through_const);
    assert_eq!(result.symbol(through_const).name, "route");

    // Without alias following, `register` is the variable itself.
    let direct = result.resolve(&callees[1]).expect("name resolves");
    assert_eq!(result.symbol(direct).name, "register");
}

#[test]
fn destructured_callees_resolve_to_the_member() {
    let source = r#"class RouteMap {
    route(path: string): number {
        return 1;
    }
}
const routeMap = new RouteMap();
const { route, route: register } = routeMap;
route("/a");
register("/b");
"#;
    let (root, result) = check_source(source);
    assert!(result.errors.is_empty(), "{:?}", result.errors);
    let member = result
        .property(type_of_var(&root, &result, "routeMap"), "route")
        .unwrap();
    let callees: Vec<SyntaxNode> = root
        .descendants()
        .filter_map(CallExpr::cast)
        .filter_map(|c| c.callee().map(|e| e.syntax().clone()))
        .collect();
    assert_eq!(callees.len(), 2);
    for callee in &callees {
        assert_eq!(result.resolve_aliased(callee), Some(member));
    }
    let direct = result.resolve(&callees[1]).expect("name resolves");
    assert_eq!(result.symbol(direct).name, "register");
}

#[test]
fn destructured_bindings_take_property_types() {
    let source = "const o = { a: 1, b: \"x\" };\nconst { a, b: renamed } = o;\nconst x = a;\nconst y = renamed;";
    assert_eq!(display_var(source, "x"), "number");
    assert_eq!(display_var(source, "y"), "string");
    assert_eq!(
        messages("const o = { a: 1 };\nconst { c } = o;"),
        ["property `c` does not exist on type `{ a: number }`"]
    );
}

#[test]
fn let_destructuring_does_not_alias() {
    let source = "const o = { f: () => 1 };\nlet { f } = o;\nf();";
    let (root, result) = check_source(source);
    assert!(result.errors.is_empty(), "{:?}", result.errors);
    let callee = root
        .descendants()
        .filter_map(CallExpr::cast)
        .find_map(|c| c.callee())
        .unwrap();
    let sym = result.resolve_aliased(callee.syntax()).unwrap();
    assert_eq!(result.resolve(callee.syntax()), Some(sym));
    assert_eq!(
        result.value_declaration(sym).map(|d| d.kind()),
        Some(SyntaxKind::BINDING_ELEMENT)
    );
}

#[test]
fn async_functions_return_promises() {
    assert_eq!(
        display_var("const f = async (n: number) => n;\nconst r = f(1);", "r"),
        "Promise<number>"
    );
    assert_eq!(
        display_var("const g = async function () {\n    return \"s\";\n};\nconst r = g();", "r"),
        "Promise<string>"
    );
}

#[test]
fn export_default_target_is_a_route_map_instance() {
    let (root, result) = check_source(FIXTURE);
    let ty = type_of_var(&root, &result, "routeMap");
    assert_eq!(result.type_name(ty), Some("RouteMap"));
    assert!(result.is_class(ty));
    assert!(result.property(ty, "route").is_some());
    assert_eq!(result.display_type(ty), "RouteMap");
}

#[test]
fn route_method_returns_this() {
    let (root, result) = check_source(FIXTURE);
    let ty = type_of_var(&root, &result, "routeMap");
    let route = result.property(ty, "route").unwrap();
    let sigs = result.call_signatures(result.type_of_symbol(route));
    assert_eq!(sigs.len(), 1);
    assert_eq!(result.display_type(result.return_type(sigs[0])), "RouteMap");
    assert_eq!(result.signature(sigs[0]).params.len(), 4);
}

#[test]
fn handler_return_type_is_inferred_from_the_body() {
    let (root, result) = check_source(FIXTURE);
    let arrow = root
        .descendants()
        .find(|n| n.kind() == SyntaxKind::ARROW_FUNCTION)
        .unwrap();
    let ty = result.type_of_node(&arrow);
    let sig = result.call_signatures(ty)[0];
    assert_eq!(
        result.display_type(result.return_type(sig)),
        "{ firstName: string; lastName: string; age: number; birthDate: Date; favoriteColors: string[] }"
    );
    let param = result.signature(sig).params[0];
    assert_eq!(
        result.display_type(result.type_of_symbol(param)),
        "{ maxAge?: number; firstName?: string }"
    );
}

// ── Expressions ────────────────────────────────────────────────────────

#[test]
fn object_literals_widen_their_property_types() {
    assert_eq!(
        display_var("const p = { a: 1, b: \"x\", c: true };", "p"),
        "{ a: number; b: string; c: boolean }"
    );
}

#[test]
fn later_object_properties_replace_earlier_ones() {
    assert_eq!(
        display_var("const base = { a: 1, b: 2 };\nconst p = { ...base, a: \"s\" };", "p"),
        "{ a: string; b: number }"
    );
}

#[test]
fn array_literals_are_array_references() {
    let (root, result) = check_source("const xs = [\"a\", \"b\"];\nconst mixed = [1, \"a\"];");
    let xs = type_of_var(&root, &result, "xs");
    assert!(result.is_array(xs));
    assert_eq!(result.type_arguments(xs), &[TypeId::STRING]);
    assert_eq!(result.display_type(xs), "string[]");
    let mixed = type_of_var(&root, &result, "mixed");
    assert_eq!(result.display_type(mixed), "(number | string)[]");
}

#[test]
fn function_return_types_come_from_return_statements() {
    let source = "\
function f() { return 1; }
function g(x: number) { if (x) { return \"a\"; } return 2; }
function h() { }
const r = f();
const s = g(1);
const t = h();
";
    let (root, result) = check_source(source);
    assert!(result.errors.is_empty(), "{:?}", result.errors);
    assert_eq!(type_of_var(&root, &result, "r"), TypeId::NUMBER);
    assert_eq!(result.display_type(type_of_var(&root, &result, "s")), "string | number");
    assert_eq!(type_of_var(&root, &result, "t"), TypeId::VOID);
}

#[test]
fn arrow_functions_display_as_function_types() {
    assert_eq!(
        display_var("const f = (a: number, b?: string) => a;", "f"),
        "(a: number, b?: string) => number"
    );
}

#[test]
fn callback_parameters_are_typed_from_context() {
    let source = "\
function run(cb: (n: number) => string): string { return cb(1); }
run(n => n + \"\");
";
    let (root, result) = check_source(source);
    assert!(result.errors.is_empty(), "{:?}", result.errors);
    let arrow = root
        .descendants()
        .find(|n| n.kind() == SyntaxKind::ARROW_FUNCTION)
        .unwrap();
    let param = arrow
        .descendants()
        .find(|n| n.kind() == SyntaxKind::PARAM)
        .unwrap();
    assert_eq!(result.type_of_node(&param), TypeId::NUMBER);
}

#[test]
fn explicit_type_arguments_instantiate_calls() {
    let source = "\
function first<T>(items: T[]): T { return items[0]; }
const s = first<string>([\"a\"]);
const unknownArg = first([1]);
";
    let (root, result) = check_source(source);
    assert!(result.errors.is_empty(), "{:?}", result.errors);
    assert_eq!(type_of_var(&root, &result, "s"), TypeId::STRING);
    assert_eq!(type_of_var(&root, &result, "unknownArg"), TypeId::ANY);
}

#[test]
fn const_aliases_follow_chains() {
    let source = "const a = 1;\nconst b = a;\nconst c = (b);\nc;";
    let (root, result) = check_source(source);
    let use_site = root
        .descendants()
        .filter_map(Expr::cast)
        .filter(|e| matches!(e, Expr::NameRef(_)))
        .last()
        .unwrap();
    let target = result.resolve_aliased(use_site.syntax()).unwrap();
    assert_eq!(result.symbol(target).name, "a");
}

// ── Declarations ───────────────────────────────────────────────────────

#[test]
fn class_members_keep_declaration_order() {
    let source = "\
class A {
    x: number;
    constructor(public y: string, plain: number) {}
    z(): void {}
    static s = 1;
}
const a = new A(\"y\", 1);
";
    let (root, result) = check_source(source);
    assert!(result.errors.is_empty(), "{:?}", result.errors);
    let ty = type_of_var(&root, &result, "a");
    let names: Vec<&str> = result
        .members(ty)
        .iter()
        .map(|&m| result.symbol(m).name.as_str())
        .collect();
    assert_eq!(names, ["x", "y", "z"]);
}

#[test]
fn derived_classes_append_base_members() {
    let source = "\
class Base { id: number; name: string; }
class Derived extends Base { name: string; extra: boolean; }
const d = new Derived();
";
    let (root, result) = check_source(source);
    let ty = type_of_var(&root, &result, "d");
    let names: Vec<&str> = result
        .members(ty)
        .iter()
        .map(|&m| result.symbol(m).name.as_str())
        .collect();
    assert_eq!(names, ["name", "extra", "id"]);
}

#[test]
fn prelude_date_is_a_class_with_get_time() {
    let (root, result) = check_source("const d = new Date();\nconst t = d.getTime();");
    assert!(result.errors.is_empty(), "{:?}", result.errors);
    let d = type_of_var(&root, &result, "d");
    assert_eq!(result.type_name(d), Some("Date"));
    assert!(result.is_class(d));
    assert!(result.property(d, "getTime").is_some());
    assert_eq!(type_of_var(&root, &result, "t"), TypeId::NUMBER);
}

#[test]
fn class_values_have_constructor_types() {
    assert_eq!(display_var("const C = Date;", "C"), "typeof Date");
}

#[test]
fn generic_aliases_substitute_their_arguments() {
    assert_eq!(
        display_var("type Box<T> = { value: T };\nconst b: Box<string> = { value: \"x\" };", "b"),
        "{ value: string }"
    );
}

#[test]
fn string_methods_come_from_the_prelude() {
    let (root, result) = check_source("const s = \"abc\";\nconst u = s.toUpperCase();\nconst n = s.length;");
    assert!(result.errors.is_empty(), "{:?}", result.errors);
    assert_eq!(type_of_var(&root, &result, "u"), TypeId::STRING);
    assert_eq!(type_of_var(&root, &result, "n"), TypeId::NUMBER);
}

#[test]
fn interfaces_merge_and_extend() {
    let source = "\
interface Named { name: string; }
interface Pet extends Named { age: number; }
interface Pet { owner: string; }
const p: Pet = { name: \"a\", age: 1, owner: \"b\" };
";
    let (root, result) = check_source(source);
    assert!(result.errors.is_empty(), "{:?}", result.errors);
    let ty = type_of_var(&root, &result, "p");
    let names: Vec<&str> = result
        .members(ty)
        .iter()
        .map(|&m| result.symbol(m).name.as_str())
        .collect();
    assert_eq!(names, ["age", "owner", "name"]);
    assert_eq!(result.display_type(ty), "Pet");
}

// ── Errors ─────────────────────────────────────────────────────────────

#[test]
fn unresolved_names_are_reported_and_typed_any() {
    let (root, result) = check_source("const x = nope;");
    assert_eq!(result.errors.len(), 1);
    assert!(matches!(&result.errors[0], TypeError::UnresolvedName { name, .. } if name == "nope"));
    assert_eq!(type_of_var(&root, &result, "x"), TypeId::ANY);
}

#[test]
fn error_messages() {
    assert_eq!(messages("type T = Missing;"), ["cannot find type `Missing`"]);
    assert_eq!(
        messages("const o = { a: 1 };\no.b;"),
        ["property `b` does not exist on type `{ a: number }`"]
    );
    assert_eq!(
        messages("const n = 1;\nn();"),
        ["type `number` has no call signatures"]
    );
    assert_eq!(
        messages("type P = Promise<string, number>;"),
        ["generic type `Promise` expects 1 type arguments, found 2"]
    );
    assert_eq!(
        messages("const n = 1;\nconst m = new n();"),
        ["type `number` is not constructable"]
    );
}

#[test]
fn undefined_and_any_receivers_are_lenient() {
    assert!(messages("const u = undefined;\nconst a: any = 1;\na.b.c();").is_empty());
}

#[test]
fn rendered_errors_carry_codes() {
    let source = "const x = nope;";
    let (_, result) = check_source(source);
    let rendered = result.render_errors(source, "main.ts", &DiagnosticOptions::colorless());
    assert_eq!(rendered.len(), 1);
    assert!(rendered[0].contains("T0001"), "{}", rendered[0]);
    assert!(rendered[0].contains("cannot find name `nope`"), "{}", rendered[0]);
}
