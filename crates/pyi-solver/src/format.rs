//! Type formatting for logs, diagnostics and test assertions.
//!
//! Output follows Python's own spelling: `int`, `list[str]`, `type[C]`,
//! `int | None`, and `(x: int, *args: str) -> bool` for callables.

use crate::intern::TypeInterner;
use crate::types::*;

const MAX_FORMAT_DEPTH: u32 = 32;

pub struct TypeFormatter<'a> {
    interner: &'a TypeInterner,
}

impl<'a> TypeFormatter<'a> {
    pub fn new(interner: &'a TypeInterner) -> Self {
        Self { interner }
    }

    pub fn format(&self, type_id: TypeId) -> String {
        let mut out = String::new();
        self.write_type(&mut out, type_id, 0);
        out
    }

    fn write_type(&self, out: &mut String, type_id: TypeId, depth: u32) {
        if depth > MAX_FORMAT_DEPTH {
            out.push_str("...");
            return;
        }
        let Some(data) = self.interner.lookup(type_id) else {
            out.push_str("<error>");
            return;
        };
        match data {
            TypeData::Intrinsic(kind) => out.push_str(match kind {
                IntrinsicKind::Any => "Any",
                IntrinsicKind::Unknown => "Unknown",
                IntrinsicKind::Never => "Never",
                IntrinsicKind::NoneType => "None",
            }),
            TypeData::Instance { class, args } => {
                out.push_str(&self.interner.resolve_atom(class));
                let args = self.interner.type_list(args);
                if !args.is_empty() {
                    out.push('[');
                    self.write_list(out, &args, ", ", depth);
                    out.push(']');
                }
            }
            TypeData::ClassObject(class) => {
                out.push_str("type[");
                out.push_str(&self.interner.resolve_atom(class));
                out.push(']');
            }
            TypeData::Function(shape) => match self.interner.function_shape(shape) {
                Some(shape) => self.write_function(out, &shape, depth),
                None => out.push_str("<error>"),
            },
            TypeData::Union(list) => {
                let members = self.interner.type_list(list);
                self.write_list(out, &members, " | ", depth);
            }
        }
    }

    fn write_list(&self, out: &mut String, types: &[TypeId], sep: &str, depth: u32) {
        for (i, &member) in types.iter().enumerate() {
            if i > 0 {
                out.push_str(sep);
            }
            // Callables inside unions or argument lists need parentheses to
            // keep their return type from swallowing the separator.
            let wrap = self.interner.function_of(member).is_some();
            if wrap {
                out.push('(');
            }
            self.write_type(out, member, depth + 1);
            if wrap {
                out.push(')');
            }
        }
    }

    fn write_function(&self, out: &mut String, shape: &FunctionShape, depth: u32) {
        out.push('(');
        for (i, param) in shape.params.iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            match param.kind {
                ParamKind::VarArgs => out.push('*'),
                ParamKind::KwArgs => out.push_str("**"),
                ParamKind::Positional | ParamKind::KeywordOnly => {}
            }
            out.push_str(&self.interner.resolve_atom(param.name));
            out.push_str(": ");
            self.write_type(out, param.type_id, depth + 1);
            if param.optional {
                out.push_str(" = ...");
            }
        }
        out.push_str(") -> ");
        self.write_type(out, shape.return_type, depth + 1);
    }
}

#[cfg(test)]
#[path = "../tests/format_tests.rs"]
mod tests;
