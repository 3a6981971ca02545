//! [`TypeOracle`] over the results of `routemeta_typeck::check`.

use routemeta_parser::SyntaxNode;
use routemeta_typeck::ty::{ObjectKind as CheckedKind, SignatureId, SymbolId, TypeData, TypeId};
use routemeta_typeck::TypeckResult;

use crate::oracle::{CoarseKind, ObjectKind, TypeOracle};

impl TypeOracle for TypeckResult {
    fn symbol_at(&self, node: &SyntaxNode) -> Option<SymbolId> {
        self.resolve_aliased(node)
    }

    fn symbol_name(&self, sym: SymbolId) -> String {
        self.symbol(sym).name.clone()
    }

    fn value_declaration(&self, sym: SymbolId) -> Option<SyntaxNode> {
        TypeckResult::value_declaration(self, sym)
    }

    fn type_of_declaration(&self, decl: &SyntaxNode) -> TypeId {
        match self.declaration_symbol(decl) {
            Some(sym) => TypeckResult::type_of_symbol(self, sym),
            None => self.type_of_node(decl),
        }
    }

    fn type_of_expression(&self, expr: &SyntaxNode) -> TypeId {
        self.type_of_node(expr)
    }

    fn type_of_symbol(&self, sym: SymbolId) -> TypeId {
        TypeckResult::type_of_symbol(self, sym)
    }

    fn coarse_kind(&self, ty: TypeId) -> CoarseKind {
        match self.type_data(ty) {
            TypeData::Undefined => CoarseKind::Undefined,
            TypeData::String => CoarseKind::String,
            TypeData::Number => CoarseKind::Number,
            TypeData::Boolean => CoarseKind::Boolean,
            TypeData::Object(_) => CoarseKind::Object,
            _ => CoarseKind::Other,
        }
    }

    fn object_kind(&self, ty: TypeId) -> Option<ObjectKind> {
        let obj = self.type_data(ty).as_object()?;
        let kind = match obj.kind {
            CheckedKind::Class | CheckedKind::Interface => ObjectKind::ClassOrInterface,
            CheckedKind::Anonymous if obj.call_signatures.is_empty() => ObjectKind::Anonymous,
            CheckedKind::Reference if self.is_array(ty) => ObjectKind::ArrayLike,
            _ => ObjectKind::Other,
        };
        Some(kind)
    }

    fn type_name(&self, ty: TypeId) -> Option<String> {
        TypeckResult::type_name(self, ty).map(str::to_string)
    }

    fn is_class(&self, ty: TypeId) -> bool {
        TypeckResult::is_class(self, ty)
    }

    fn property(&self, ty: TypeId, name: &str) -> Option<SymbolId> {
        TypeckResult::property(self, ty, name)
    }

    fn properties(&self, ty: TypeId) -> Vec<SymbolId> {
        self.members(ty).to_vec()
    }

    fn type_arguments(&self, ty: TypeId) -> Vec<TypeId> {
        TypeckResult::type_arguments(self, ty).to_vec()
    }

    fn call_signatures(&self, ty: TypeId) -> Vec<SignatureId> {
        TypeckResult::call_signatures(self, ty).to_vec()
    }

    fn parameters(&self, sig: SignatureId) -> Vec<SymbolId> {
        self.signature(sig).params.clone()
    }

    fn return_type(&self, sig: SignatureId) -> TypeId {
        TypeckResult::return_type(self, sig)
    }

    fn display_type(&self, ty: TypeId) -> String {
        TypeckResult::display_type(self, ty)
    }
}

#[cfg(test)]
mod tests {
    use routemeta_parser::SyntaxKind;

    use super::*;

    fn check(src: &str) -> (SyntaxNode, TypeckResult) {
        let parse = routemeta_parser::parse(src);
        assert!(parse.ok(), "{:?}", parse.errors());
        let result = routemeta_typeck::check(&parse);
        (parse.syntax(), result)
    }

    fn declarator(root: &SyntaxNode, name: &str) -> SyntaxNode {
        root.descendants()
            .filter(|n| n.kind() == SyntaxKind::VAR_DECLARATOR)
            .find(|n| {
                n.children()
                    .find(|c| c.kind() == SyntaxKind::NAME)
                    .is_some_and(|c| c.text() == name)
            })
            .unwrap()
    }

    #[test]
    fn classifies_primitive_and_object_types() {
        let (root, result) = check(
            r#"
const s = "a";
const n = 1;
const b = true;
const u = undefined;
const o = { a: 1 };
const xs = [1, 2];
const d = new Date();
const f = (a: number) => a;
const m = 1 > 2 ? "x" : 3;
"#,
        );
        let kind_of = |name: &str| {
            let ty = result.type_of_declaration(&declarator(&root, name));
            (result.coarse_kind(ty), TypeOracle::object_kind(&result, ty))
        };
        assert_eq!(kind_of("s"), (CoarseKind::String, None));
        assert_eq!(kind_of("n"), (CoarseKind::Number, None));
        assert_eq!(kind_of("b"), (CoarseKind::Boolean, None));
        assert_eq!(kind_of("u"), (CoarseKind::Undefined, None));
        assert_eq!(kind_of("o"), (CoarseKind::Object, Some(ObjectKind::Anonymous)));
        assert_eq!(kind_of("xs"), (CoarseKind::Object, Some(ObjectKind::ArrayLike)));
        assert_eq!(
            kind_of("d"),
            (CoarseKind::Object, Some(ObjectKind::ClassOrInterface))
        );
        assert_eq!(kind_of("f"), (CoarseKind::Object, Some(ObjectKind::Other)));
        assert_eq!(kind_of("m").0, CoarseKind::Other);
    }

    #[test]
    fn symbol_at_follows_const_aliases() {
        let (root, result) = check(
            r#"
class Box { open(): void {} }
const box = new Box();
const opener = box.open;
opener();
"#,
        );
        let call = root
            .descendants()
            .filter(|n| n.kind() == SyntaxKind::CALL_EXPR)
            .last()
            .unwrap();
        let callee = call.first_child().unwrap();
        let sym = result.symbol_at(&callee).unwrap();
        assert_eq!(result.symbol_name(sym), "open");

        let box_ty = result.type_of_declaration(&declarator(&root, "box"));
        assert_eq!(TypeOracle::property(&result, box_ty, "open"), Some(sym));
        assert!(TypeOracle::is_class(&result, box_ty));
        assert_eq!(TypeOracle::type_name(&result, box_ty).as_deref(), Some("Box"));
    }
}
