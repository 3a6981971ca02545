//! Rendering types the way TypeScript spells them.

use std::fmt::Write;

use routemeta_parser::SyntaxKind;

use crate::ty::{ObjectKind, TypeData, TypeId};
use crate::TypeckResult;

/// Nesting beyond this prints as `...`.
const MAX_DEPTH: usize = 3;

impl TypeckResult {
    pub fn display_type(&self, ty: TypeId) -> String {
        let mut out = String::new();
        self.write_type(&mut out, ty, 0);
        out
    }

    fn write_type(&self, out: &mut String, ty: TypeId, depth: usize) {
        if depth > MAX_DEPTH {
            out.push_str("...");
            return;
        }
        match self.type_data(ty) {
            TypeData::Any => out.push_str("any"),
            TypeData::Unknown => out.push_str("unknown"),
            TypeData::Never => out.push_str("never"),
            TypeData::Void => out.push_str("void"),
            TypeData::Undefined => out.push_str("undefined"),
            TypeData::Null => out.push_str("null"),
            TypeData::String => out.push_str("string"),
            TypeData::Number => out.push_str("number"),
            TypeData::Boolean => out.push_str("boolean"),
            TypeData::StringLiteral(s) => {
                let _ = write!(out, "{:?}", s);
            }
            TypeData::NumberLiteral(n) => out.push_str(n),
            TypeData::BooleanLiteral(b) => {
                let _ = write!(out, "{}", b);
            }
            TypeData::Union(members) => {
                for (i, &member) in members.iter().enumerate() {
                    if i > 0 {
                        out.push_str(" | ");
                    }
                    self.write_type(out, member, depth + 1);
                }
            }
            TypeData::TypeParam(sym) => out.push_str(&self.symbol(*sym).name),
            TypeData::Object(obj) => {
                let name = obj.symbol.map(|s| self.symbol(s).name.as_str());
                match obj.kind {
                    ObjectKind::Reference if self.is_array(ty) => {
                        let elem = obj.type_arguments.first().copied().unwrap_or(TypeId::ANY);
                        let needs_parens = matches!(self.type_data(elem), TypeData::Union(_))
                            || self.is_function_literal(elem);
                        if needs_parens {
                            out.push('(');
                        }
                        self.write_type(out, elem, depth + 1);
                        if needs_parens {
                            out.push(')');
                        }
                        out.push_str("[]");
                    }
                    ObjectKind::Reference => {
                        out.push_str(name.unwrap_or("?"));
                        self.write_args(out, &obj.type_arguments, depth);
                    }
                    ObjectKind::Class | ObjectKind::Interface => {
                        out.push_str(name.unwrap_or("?"));
                        if !obj.type_params.is_empty() {
                            let params: Vec<&str> = obj
                                .type_params
                                .iter()
                                .map(|&p| self.symbol(p).name.as_str())
                                .collect();
                            let _ = write!(out, "<{}>", params.join(", "));
                        }
                    }
                    ObjectKind::Constructor => {
                        let _ = write!(out, "typeof {}", name.unwrap_or("?"));
                    }
                    ObjectKind::Anonymous => self.write_anonymous(out, ty, depth),
                }
            }
        }
    }

    fn write_args(&self, out: &mut String, args: &[TypeId], depth: usize) {
        if args.is_empty() {
            return;
        }
        out.push('<');
        for (i, &arg) in args.iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            self.write_type(out, arg, depth + 1);
        }
        out.push('>');
    }

    fn is_function_literal(&self, ty: TypeId) -> bool {
        match self.type_data(ty) {
            TypeData::Object(obj) => {
                obj.kind == ObjectKind::Anonymous
                    && obj.members.is_empty()
                    && obj.call_signatures.len() == 1
            }
            _ => false,
        }
    }

    fn write_anonymous(&self, out: &mut String, ty: TypeId, depth: usize) {
        let Some(obj) = self.type_data(ty).as_object() else {
            return;
        };
        if self.is_function_literal(ty) {
            let sig = self.signature(obj.call_signatures[0]);
            out.push('(');
            for (i, &param) in sig.params.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                let symbol = self.symbol(param);
                let is_rest = symbol.decls.first().is_some_and(|d| {
                    d.children_with_tokens()
                        .any(|it| it.kind() == SyntaxKind::DOT_DOT_DOT)
                });
                if is_rest {
                    out.push_str("...");
                }
                out.push_str(&symbol.name);
                if symbol.is_optional {
                    out.push('?');
                }
                out.push_str(": ");
                self.write_type(out, self.type_of_symbol(param), depth + 1);
            }
            out.push_str(") => ");
            let ret = sig.return_type.unwrap_or(TypeId::ANY);
            self.write_type(out, ret, depth + 1);
            return;
        }
        if obj.members.is_empty() && obj.string_index.is_none() {
            out.push_str("{}");
            return;
        }
        out.push_str("{ ");
        let mut first = true;
        if let Some(index) = obj.string_index {
            out.push_str("[key: string]: ");
            self.write_type(out, index, depth + 1);
            first = false;
        }
        for &member in &obj.members {
            if !first {
                out.push_str("; ");
            }
            first = false;
            let symbol = self.symbol(member);
            out.push_str(&symbol.name);
            if symbol.is_optional {
                out.push('?');
            }
            out.push_str(": ");
            self.write_type(out, self.type_of_symbol(member), depth + 1);
        }
        out.push_str(" }");
    }
}
