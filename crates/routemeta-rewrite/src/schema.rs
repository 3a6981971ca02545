//! Serializable shapes and the lowering of checked types into them.
//!
//! The vocabulary is closed: primitives, dates, array buffers, arrays and
//! shallow objects. Lowering anything else (unions, literal types,
//! functions, generic instantiations, recursive types) is an error.

use indexmap::IndexMap;
use routemeta_typeck::ty::TypeId;
use serde::{Deserialize, Serialize};

use crate::error::{Result, RewriteError};
use crate::oracle::{CoarseKind, ObjectKind, TypeOracle};

/// Name and duck-typing member of the built-in date class.
const DATE_TYPE: (&str, &str) = ("Date", "getTime");
const ARRAY_BUFFER_TYPE: (&str, &str) = ("ArrayBuffer", "byteLength");

/// One entry of the type manifest.
///
/// Serialized with a `name` tag: `{"name":"array","elementType":{"name":"string"}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "name", rename_all = "camelCase")]
pub enum Schema {
    Undefined,
    String,
    Number,
    Boolean,
    Date,
    ArrayBuffer,
    Array {
        #[serde(rename = "elementType")]
        element_type: Box<Schema>,
    },
    NamedObject {
        #[serde(rename = "typeName")]
        type_name: String,
        fields: IndexMap<String, Schema>,
    },
    AnonymousObject {
        fields: IndexMap<String, Schema>,
    },
}

/// Lower a checked type into a [`Schema`].
///
/// Errors carry no span; callers attach one with [`RewriteError::at`].
pub fn lower<O: TypeOracle + ?Sized>(oracle: &O, ty: TypeId) -> Result<Schema> {
    Lowering {
        oracle,
        stack: Vec::new(),
    }
    .lower(ty)
}

struct Lowering<'a, O: ?Sized> {
    oracle: &'a O,
    /// Object types currently being lowered, outermost first.
    stack: Vec<TypeId>,
}

impl<O: TypeOracle + ?Sized> Lowering<'_, O> {
    fn lower(&mut self, ty: TypeId) -> Result<Schema> {
        match self.oracle.coarse_kind(ty) {
            CoarseKind::Undefined => Ok(Schema::Undefined),
            CoarseKind::String => Ok(Schema::String),
            CoarseKind::Number => Ok(Schema::Number),
            CoarseKind::Boolean => Ok(Schema::Boolean),
            CoarseKind::Object => {
                if self.stack.contains(&ty) {
                    return Err(self.unsupported(ty, "recursive type"));
                }
                self.stack.push(ty);
                let schema = self.lower_object(ty);
                self.stack.pop();
                schema
            }
            CoarseKind::Other => Err(self.unsupported(ty, "no schema for this kind of type")),
        }
    }

    fn lower_object(&mut self, ty: TypeId) -> Result<Schema> {
        let kind = self.oracle.object_kind(ty).unwrap_or(ObjectKind::Other);
        if kind == ObjectKind::ArrayLike {
            let args = self.oracle.type_arguments(ty);
            let &[element] = args.as_slice() else {
                return Err(RewriteError::ArityError {
                    what: format!("type arguments on array type `{}`", self.oracle.display_type(ty)),
                    expected: 1,
                    found: args.len(),
                    span: None,
                });
            };
            let element_type = Box::new(self.lower(element)?);
            return Ok(Schema::Array { element_type });
        }

        let name = self.oracle.type_name(ty);
        if self.is_builtin(ty, name.as_deref(), DATE_TYPE) {
            return Ok(Schema::Date);
        }
        if self.is_builtin(ty, name.as_deref(), ARRAY_BUFFER_TYPE) {
            return Ok(Schema::ArrayBuffer);
        }

        match (kind, name) {
            (ObjectKind::ClassOrInterface, Some(type_name)) => Ok(Schema::NamedObject {
                type_name,
                fields: self.fields(ty)?,
            }),
            (ObjectKind::Anonymous, _) => Ok(Schema::AnonymousObject {
                fields: self.fields(ty)?,
            }),
            _ => Err(self.unsupported(
                ty,
                "only classes, interfaces and plain object types have a schema",
            )),
        }
    }

    /// Recognized by name plus a characteristic member, so a user type
    /// that merely shares the name is still lowered structurally.
    fn is_builtin(&self, ty: TypeId, name: Option<&str>, (expected, member): (&str, &str)) -> bool {
        name == Some(expected) && self.oracle.property(ty, member).is_some()
    }

    fn fields(&mut self, ty: TypeId) -> Result<IndexMap<String, Schema>> {
        let mut fields = IndexMap::new();
        for prop in self.oracle.properties(ty) {
            let name = self.oracle.symbol_name(prop);
            let schema = self.lower(self.oracle.type_of_symbol(prop))?;
            fields.insert(name, schema);
        }
        Ok(fields)
    }

    fn unsupported(&self, ty: TypeId, reason: &str) -> RewriteError {
        RewriteError::UnsupportedTypeShape {
            ty: self.oracle.display_type(ty),
            reason: reason.to_string(),
            span: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use routemeta_typeck::ty::{SignatureId, SymbolId};

    use super::*;
    use routemeta_parser::SyntaxNode;

    /// A type table written out by hand.
    #[derive(Default)]
    struct Table {
        types: Vec<Entry>,
        props: Vec<(String, TypeId)>,
    }

    struct Entry {
        display: String,
        coarse: CoarseKind,
        object: Option<ObjectKind>,
        name: Option<String>,
        props: Vec<SymbolId>,
        args: Vec<TypeId>,
    }

    impl Table {
        fn add(&mut self, display: &str, coarse: CoarseKind) -> TypeId {
            self.types.push(Entry {
                display: display.to_string(),
                coarse,
                object: None,
                name: None,
                props: Vec::new(),
                args: Vec::new(),
            });
            TypeId(self.types.len() as u32 - 1)
        }

        fn object(&mut self, display: &str, kind: ObjectKind, name: Option<&str>) -> TypeId {
            let ty = self.add(display, CoarseKind::Object);
            let entry = &mut self.types[ty.0 as usize];
            entry.object = Some(kind);
            entry.name = name.map(str::to_string);
            ty
        }

        fn array(&mut self, args: Vec<TypeId>) -> TypeId {
            let ty = self.object("Array", ObjectKind::ArrayLike, Some("Array"));
            self.types[ty.0 as usize].args = args;
            ty
        }

        fn prop(&mut self, owner: TypeId, name: &str, ty: TypeId) {
            self.props.push((name.to_string(), ty));
            let sym = SymbolId(self.props.len() as u32 - 1);
            self.types[owner.0 as usize].props.push(sym);
        }

        fn entry(&self, ty: TypeId) -> &Entry {
            &self.types[ty.0 as usize]
        }
    }

    impl TypeOracle for Table {
        fn symbol_at(&self, _: &SyntaxNode) -> Option<SymbolId> {
            None
        }
        fn symbol_name(&self, sym: SymbolId) -> String {
            self.props[sym.0 as usize].0.clone()
        }
        fn value_declaration(&self, _: SymbolId) -> Option<SyntaxNode> {
            None
        }
        fn type_of_declaration(&self, _: &SyntaxNode) -> TypeId {
            TypeId::ANY
        }
        fn type_of_expression(&self, _: &SyntaxNode) -> TypeId {
            TypeId::ANY
        }
        fn type_of_symbol(&self, sym: SymbolId) -> TypeId {
            self.props[sym.0 as usize].1
        }
        fn coarse_kind(&self, ty: TypeId) -> CoarseKind {
            self.entry(ty).coarse
        }
        fn object_kind(&self, ty: TypeId) -> Option<ObjectKind> {
            self.entry(ty).object
        }
        fn type_name(&self, ty: TypeId) -> Option<String> {
            self.entry(ty).name.clone()
        }
        fn is_class(&self, _: TypeId) -> bool {
            false
        }
        fn property(&self, ty: TypeId, name: &str) -> Option<SymbolId> {
            self.entry(ty)
                .props
                .iter()
                .copied()
                .find(|&p| self.props[p.0 as usize].0 == name)
        }
        fn properties(&self, ty: TypeId) -> Vec<SymbolId> {
            self.entry(ty).props.clone()
        }
        fn type_arguments(&self, ty: TypeId) -> Vec<TypeId> {
            self.entry(ty).args.clone()
        }
        fn call_signatures(&self, _: TypeId) -> Vec<SignatureId> {
            Vec::new()
        }
        fn parameters(&self, _: SignatureId) -> Vec<SymbolId> {
            Vec::new()
        }
        fn return_type(&self, _: SignatureId) -> TypeId {
            TypeId::ANY
        }
        fn display_type(&self, ty: TypeId) -> String {
            self.entry(ty).display.clone()
        }
    }

    struct Primitives {
        undefined: TypeId,
        string: TypeId,
        number: TypeId,
        boolean: TypeId,
    }

    fn primitives(table: &mut Table) -> Primitives {
        Primitives {
            undefined: table.add("undefined", CoarseKind::Undefined),
            string: table.add("string", CoarseKind::String),
            number: table.add("number", CoarseKind::Number),
            boolean: table.add("boolean", CoarseKind::Boolean),
        }
    }

    #[test]
    fn primitives_lower_to_their_singletons() {
        let mut table = Table::default();
        let p = primitives(&mut table);
        assert_eq!(lower(&table, p.undefined), Ok(Schema::Undefined));
        assert_eq!(lower(&table, p.string), Ok(Schema::String));
        assert_eq!(lower(&table, p.number), Ok(Schema::Number));
        assert_eq!(lower(&table, p.boolean), Ok(Schema::Boolean));
    }

    #[test]
    fn arrays_need_exactly_one_type_argument() {
        let mut table = Table::default();
        let p = primitives(&mut table);
        let strings = table.array(vec![p.string]);
        let nested = table.array(vec![strings]);
        assert_eq!(
            lower(&table, nested),
            Ok(Schema::Array {
                element_type: Box::new(Schema::Array {
                    element_type: Box::new(Schema::String)
                })
            })
        );

        let bare = table.array(vec![]);
        let pair = table.array(vec![p.string, p.number]);
        assert!(matches!(
            lower(&table, bare),
            Err(RewriteError::ArityError { expected: 1, found: 0, .. })
        ));
        assert!(matches!(
            lower(&table, pair),
            Err(RewriteError::ArityError { expected: 1, found: 2, .. })
        ));
    }

    #[test]
    fn objects_keep_declaration_order_and_kind() {
        let mut table = Table::default();
        let p = primitives(&mut table);
        let person = table.object("Person", ObjectKind::ClassOrInterface, Some("Person"));
        table.prop(person, "name", p.string);
        table.prop(person, "age", p.number);
        table.prop(person, "admin", p.boolean);
        let query = table.object("{ limit: number }", ObjectKind::Anonymous, None);
        table.prop(query, "limit", p.number);
        table.prop(query, "owner", person);

        let schema = lower(&table, query).unwrap();
        let Schema::AnonymousObject { fields } = schema else {
            panic!("expected an anonymous object");
        };
        assert_eq!(fields.keys().collect::<Vec<_>>(), ["limit", "owner"]);
        let Schema::NamedObject { type_name, fields } = &fields["owner"] else {
            panic!("expected a named object");
        };
        assert_eq!(type_name, "Person");
        assert_eq!(fields.keys().collect::<Vec<_>>(), ["name", "age", "admin"]);
        assert_eq!(fields["admin"], Schema::Boolean);
    }

    #[test]
    fn date_and_array_buffer_are_duck_typed() {
        let mut table = Table::default();
        let p = primitives(&mut table);
        let date = table.object("Date", ObjectKind::ClassOrInterface, Some("Date"));
        table.prop(date, "getTime", p.number);
        let buffer = table.object("ArrayBuffer", ObjectKind::ClassOrInterface, Some("ArrayBuffer"));
        table.prop(buffer, "byteLength", p.number);
        assert_eq!(lower(&table, date), Ok(Schema::Date));
        assert_eq!(lower(&table, buffer), Ok(Schema::ArrayBuffer));

        let fake = table.object("Date", ObjectKind::ClassOrInterface, Some("Date"));
        table.prop(fake, "day", p.number);
        assert!(matches!(
            lower(&table, fake),
            Ok(Schema::NamedObject { type_name, .. }) if type_name == "Date"
        ));
    }

    #[test]
    fn recursive_types_are_rejected() {
        let mut table = Table::default();
        let p = primitives(&mut table);
        let node = table.object("Node", ObjectKind::ClassOrInterface, Some("Node"));
        table.prop(node, "value", p.number);
        table.prop(node, "next", node);
        let err = lower(&table, node).unwrap_err();
        assert_eq!(
            err.to_string(),
            "cannot describe type `Node` as a schema: recursive type"
        );
    }

    #[test]
    fn shared_subtrees_are_not_cycles() {
        let mut table = Table::default();
        let p = primitives(&mut table);
        let point = table.object("Point", ObjectKind::ClassOrInterface, Some("Point"));
        table.prop(point, "x", p.number);
        let line = table.object("{ from: Point; to: Point }", ObjectKind::Anonymous, None);
        table.prop(line, "from", point);
        table.prop(line, "to", point);
        assert!(lower(&table, line).is_ok());
    }

    #[test]
    fn other_shapes_are_unsupported() {
        let mut table = Table::default();
        let union = table.add("string | number", CoarseKind::Other);
        let handler = table.object("(q: Query) => void", ObjectKind::Other, None);
        assert!(matches!(
            lower(&table, union),
            Err(RewriteError::UnsupportedTypeShape { ty, .. }) if ty == "string | number"
        ));
        assert!(matches!(
            lower(&table, handler),
            Err(RewriteError::UnsupportedTypeShape { .. })
        ));
    }

    #[test]
    fn wire_shape_uses_name_tags() {
        let mut fields = IndexMap::new();
        fields.insert("when".to_string(), Schema::Date);
        fields.insert(
            "tags".to_string(),
            Schema::Array {
                element_type: Box::new(Schema::String),
            },
        );
        let schema = Schema::NamedObject {
            type_name: "Event".to_string(),
            fields,
        };
        let json = serde_json::to_string(&schema).unwrap();
        assert_eq!(
            json,
            r#"{"name":"namedObject","typeName":"Event","fields":{"when":{"name":"date"},"tags":{"name":"array","elementType":{"name":"string"}}}}"#
        );
        assert_eq!(serde_json::from_str::<Schema>(&json).unwrap(), schema);
        assert_eq!(
            serde_json::to_string(&Schema::ArrayBuffer).unwrap(),
            r#"{"name":"arrayBuffer"}"#
        );
    }
}
