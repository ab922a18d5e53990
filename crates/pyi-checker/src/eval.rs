//! Reference type-evaluation context.
//!
//! `EvalContext` evaluates declarations of `SourceFile` snapshots:
//!
//! - shallow mode reads explicit annotations only, plus the implicit
//!   `self` / `cls` receiver of methods
//! - deep mode, within its scope, additionally reads `# type:` comments and
//!   walks initializer and default-value expressions
//!
//! Names in annotations are resolved structurally: `typing.List[int]` and
//! `list[int]` are the same type, `Optional[T]` is `T | None`. Class names
//! are not checked against any declaration; the last segment of a dotted
//! name is the nominal class.

use crate::context::{EvalMode, TypeEvalContext};
use crate::stub_index::StubIndex;
use pyi_common::Atom;
use pyi_common::limits::{MAX_ANNOTATION_DEPTH, MAX_INITIALIZER_DEPTH, MAX_TREE_WALK_ITERATIONS};
use pyi_solver::{FunctionShape, ParamInfo, ParamKind, TypeData, TypeId, TypeInterner, TypeListId};
use pyi_syntax::{
    Decorator, DottedName, Expr, FileId, NodeArena, NodeData, NodeIndex, NodeKind, NodeRef, ParameterData,
    ParameterKind, TargetData, TypeExpr,
};
use std::fmt;
use tracing::trace;

/// Builtin classes an initializer may call or reference without a local
/// declaration.
const BUILTIN_CLASSES: &[&str] = &[
    "bool",
    "bytearray",
    "bytes",
    "complex",
    "dict",
    "float",
    "frozenset",
    "int",
    "list",
    "object",
    "set",
    "str",
    "tuple",
];

/// `typing` aliases of builtin generics.
fn builtin_alias(name: &str) -> Option<&'static str> {
    match name {
        "List" => Some("list"),
        "Dict" => Some("dict"),
        "Set" => Some("set"),
        "FrozenSet" => Some("frozenset"),
        "Tuple" => Some("tuple"),
        "Type" => Some("type"),
        "Text" => Some("str"),
        _ => None,
    }
}

#[derive(Clone, Copy)]
pub struct EvalContext<'a> {
    index: &'a dyn StubIndex,
    types: &'a TypeInterner,
    mode: EvalMode,
    /// Deep evaluation starts only from elements inside this module or
    /// class. `None` means the whole program.
    scope: Option<NodeRef>,
}

impl fmt::Debug for EvalContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EvalContext")
            .field("mode", &self.mode)
            .field("scope", &self.scope)
            .finish_non_exhaustive()
    }
}

impl<'a> EvalContext<'a> {
    /// A shallow context. `types` must share its string interner with the
    /// trees in `index`.
    pub fn shallow(index: &'a dyn StubIndex, types: &'a TypeInterner) -> Self {
        Self {
            index,
            types,
            mode: EvalMode::Shallow,
            scope: None,
        }
    }

    /// A deep context over the whole program.
    pub fn deep(index: &'a dyn StubIndex, types: &'a TypeInterner) -> Self {
        Self {
            index,
            types,
            mode: EvalMode::Deep,
            scope: None,
        }
    }

    pub fn scope(&self) -> Option<NodeRef> {
        self.scope
    }

    pub fn types(&self) -> &'a TypeInterner {
        self.types
    }

    fn arena(&self, file: FileId) -> Option<&'a NodeArena> {
        self.index.file(file).map(|f| &f.arena)
    }

    fn builtin(&self, name: &str) -> TypeId {
        self.types.instance_named(name)
    }

    /// Whether this context may walk expressions to type `element` when it
    /// is queried directly.
    fn walks_initializers(&self, element: NodeRef) -> bool {
        if self.mode != EvalMode::Deep {
            return false;
        }
        let Some(root) = self.scope else {
            return true;
        };
        if root.file != element.file {
            return false;
        }
        if root.node == NodeIndex::ROOT {
            return true;
        }
        let Some(arena) = self.arena(element.file) else {
            return false;
        };
        let mut current = Some(element.node);
        let mut iterations = 0;
        while let Some(node) = current {
            if node == root.node {
                return true;
            }
            iterations += 1;
            if iterations > MAX_TREE_WALK_ITERATIONS {
                return false;
            }
            current = arena.parent(node);
        }
        false
    }

    /// The class or module whose names an expression at `decl` sees.
    fn lookup_scope(&self, decl: NodeRef) -> Option<NodeRef> {
        let arena = self.arena(decl.file)?;
        let mut current = arena.enclosing_scope(decl.node)?;
        for _ in 0..MAX_TREE_WALK_ITERATIONS {
            match arena.kind(current)? {
                NodeKind::Module | NodeKind::Class => return Some(decl.sibling(current)),
                _ => current = arena.enclosing_scope(current)?,
            }
        }
        None
    }

    // =========================================================================
    // Annotations
    // =========================================================================

    fn annotation_type(&self, expr: &TypeExpr, depth: u32) -> Option<TypeId> {
        if depth > MAX_ANNOTATION_DEPTH {
            trace!(depth, "EvalContext::annotation_type - depth limit");
            return None;
        }
        match expr {
            TypeExpr::NoneLit => Some(TypeId::NONE_TYPE),
            TypeExpr::Name(name) => self.named_type(name),
            TypeExpr::Subscript { base, args } => self.subscript_type(base, args, depth),
            TypeExpr::Union(members) => Some(self.union_of(members, depth)),
        }
    }

    fn annotation_args(&self, args: &[TypeExpr], depth: u32) -> Vec<TypeId> {
        args.iter()
            .map(|arg| self.annotation_type(arg, depth + 1).unwrap_or(TypeId::UNKNOWN))
            .collect()
    }

    fn union_of(&self, members: &[TypeExpr], depth: u32) -> TypeId {
        self.types.union(self.annotation_args(members, depth))
    }

    /// Nominal class atom for a name, mapping `typing` aliases to builtins.
    fn class_atom(&self, last: Atom) -> Atom {
        match builtin_alias(&self.types.resolve_atom(last)) {
            Some(builtin) => self.types.intern_string(builtin),
            None => last,
        }
    }

    fn named_type(&self, name: &DottedName) -> Option<TypeId> {
        let last = name.last()?;
        Some(match &*self.types.resolve_atom(last) {
            "Any" => TypeId::ANY,
            "NoReturn" | "Never" => TypeId::NEVER,
            "None" => TypeId::NONE_TYPE,
            _ => self.types.instance(self.class_atom(last), Vec::new()),
        })
    }

    fn subscript_type(&self, base: &DottedName, args: &[TypeExpr], depth: u32) -> Option<TypeId> {
        let last = base.last()?;
        let first_arg = || {
            args.first()
                .and_then(|arg| self.annotation_type(arg, depth + 1))
                .unwrap_or(TypeId::UNKNOWN)
        };
        match &*self.types.resolve_atom(last) {
            "Optional" => Some(self.types.union2(first_arg(), TypeId::NONE_TYPE)),
            "Union" => Some(self.union_of(args, depth)),
            // Qualifiers wrap the real type.
            "Annotated" | "ClassVar" | "Final" => Some(first_arg()),
            "Type" | "type" => {
                let arg = first_arg();
                match self.types.lookup(arg) {
                    Some(TypeData::Instance { class, args }) if args == TypeListId::EMPTY => {
                        Some(self.types.class_object(class))
                    }
                    _ => Some(self.types.instance(self.types.intern_string("type"), vec![arg])),
                }
            }
            _ => Some(
                self.types
                    .instance(self.class_atom(last), self.annotation_args(args, depth)),
            ),
        }
    }

    // =========================================================================
    // Declarations
    // =========================================================================

    fn parameter_type(&self, decl: NodeRef, data: &ParameterData) -> Option<TypeId> {
        let element = self.parameter_element_type(decl, data)?;
        Some(match data.kind {
            ParameterKind::VarArgs => self
                .types
                .instance(self.types.intern_string("tuple"), vec![element]),
            ParameterKind::KwArgs => self.types.instance(
                self.types.intern_string("dict"),
                vec![self.builtin("str"), element],
            ),
            ParameterKind::Positional | ParameterKind::KeywordOnly => element,
        })
    }

    /// The type a parameter binds per argument: `int` for `*args: int`.
    fn parameter_element_type(&self, decl: NodeRef, data: &ParameterData) -> Option<TypeId> {
        if let Some(annotation) = &data.annotation {
            return self.annotation_type(annotation, 0);
        }
        if let Some(receiver) = self.implicit_receiver_type(decl) {
            return Some(receiver);
        }
        match &data.default {
            Some(default) if self.walks_initializers(decl) => {
                let scope = self.lookup_scope(decl)?;
                self.infer(default, scope, 0)
            }
            _ => None,
        }
    }

    /// `self` / `cls` of a method: the first parameter, unannotated.
    fn implicit_receiver_type(&self, param: NodeRef) -> Option<TypeId> {
        let arena = self.arena(param.file)?;
        let function = arena.parent(param.node)?;
        let data = arena.function(function)?;
        if data.params.first() != Some(&param.node) {
            return None;
        }
        let class = arena.owning_class(function)?;
        let class_name = arena.name(class)?;
        if self.has_decorator(&data.decorators, "staticmethod") {
            None
        } else if self.has_decorator(&data.decorators, "classmethod")
            || &*self.types.resolve_atom(arena.name(function)?) == "__new__"
        {
            Some(self.types.class_object(class_name))
        } else {
            Some(self.types.instance(class_name, Vec::new()))
        }
    }

    fn has_decorator(&self, decorators: &[Decorator], name: &str) -> bool {
        decorators.iter().any(|d| {
            d.name
                .last()
                .is_some_and(|last| &*self.types.resolve_atom(last) == name)
        })
    }

    fn function_type(&self, decl: NodeRef) -> Option<TypeId> {
        let arena = self.arena(decl.file)?;
        let data = arena.function(decl.node)?;
        let params = data
            .params
            .iter()
            .filter_map(|&param| {
                let node = arena.get(param)?;
                let NodeData::Parameter(param_data) = &node.data else {
                    return None;
                };
                Some(ParamInfo {
                    name: node.name,
                    type_id: self
                        .parameter_element_type(decl.sibling(param), param_data)
                        .unwrap_or(TypeId::UNKNOWN),
                    optional: param_data.default.is_some(),
                    kind: match param_data.kind {
                        ParameterKind::Positional => ParamKind::Positional,
                        ParameterKind::KeywordOnly => ParamKind::KeywordOnly,
                        ParameterKind::VarArgs => ParamKind::VarArgs,
                        ParameterKind::KwArgs => ParamKind::KwArgs,
                    },
                })
            })
            .collect();
        let return_type = self.return_type_of(decl).unwrap_or(TypeId::UNKNOWN);
        Some(self.types.function(FunctionShape {
            params,
            return_type,
        }))
    }

    fn target_type(&self, decl: NodeRef, data: &TargetData, depth: u32) -> Option<TypeId> {
        if let Some(annotation) = &data.annotation {
            return self.annotation_type(annotation, 0);
        }
        if !self.walks_initializers(decl) {
            return None;
        }
        if let Some(comment) = &data.type_comment {
            return self.annotation_type(comment, 0);
        }
        let value = data.value.as_ref()?;
        let scope = self.lookup_scope(decl)?;
        self.infer(value, scope, depth)
    }

    // =========================================================================
    // Initializers
    // =========================================================================

    fn infer(&self, expr: &Expr, scope: NodeRef, depth: u32) -> Option<TypeId> {
        if depth > MAX_INITIALIZER_DEPTH {
            trace!(depth, "EvalContext::infer - depth limit");
            return None;
        }
        match expr {
            Expr::Int(_) => Some(self.builtin("int")),
            Expr::Float(_) => Some(self.builtin("float")),
            Expr::Str(_) => Some(self.builtin("str")),
            Expr::Bytes => Some(self.builtin("bytes")),
            Expr::Bool(_) => Some(self.builtin("bool")),
            Expr::NoneLit => Some(TypeId::NONE_TYPE),
            // `x = ...` says nothing about the type.
            Expr::Ellipsis => None,
            Expr::Name(name) => self.infer_name(name, scope, depth),
            Expr::Call { callee } => {
                let callee_type = self.infer(callee, scope, depth + 1)?;
                match self.types.lookup(callee_type)? {
                    TypeData::ClassObject(class) => Some(self.types.instance(class, Vec::new())),
                    TypeData::Function(shape) => {
                        self.types.function_shape(shape).map(|s| s.return_type)
                    }
                    _ => None,
                }
            }
            Expr::Tuple(items) => {
                let args = items
                    .iter()
                    .map(|item| self.infer(item, scope, depth + 1).unwrap_or(TypeId::UNKNOWN))
                    .collect();
                Some(self.types.instance(self.types.intern_string("tuple"), args))
            }
            Expr::List(items) => {
                let element = if items.is_empty() {
                    TypeId::UNKNOWN
                } else {
                    self.types.union(
                        items
                            .iter()
                            .map(|item| self.infer(item, scope, depth + 1).unwrap_or(TypeId::UNKNOWN))
                            .collect(),
                    )
                };
                Some(self.types.instance(self.types.intern_string("list"), vec![element]))
            }
        }
    }

    fn infer_name(&self, name: &DottedName, scope: NodeRef, depth: u32) -> Option<TypeId> {
        if !name.is_simple() {
            return None;
        }
        let atom = name.last()?;
        let module = NodeRef::module(scope.file);
        let scopes = if scope == module {
            [Some(scope), None]
        } else {
            [Some(scope), Some(module)]
        };
        // The scope only bounds which elements a deepened context starts
        // from; bindings a name leads to are followed wherever they are.
        let unscoped = Self {
            scope: None,
            ..*self
        };
        for lookup in scopes.into_iter().flatten() {
            // The last binding of a name is the one in effect.
            if let Some(&decl) = self.index.find_by_name(lookup, atom).last() {
                return unscoped.value_type(decl, depth + 1);
            }
        }
        let text = self.types.resolve_atom(atom);
        BUILTIN_CLASSES
            .contains(&&*text)
            .then(|| self.types.class_object(atom))
    }

    /// The type of a declaration used as a value.
    fn value_type(&self, decl: NodeRef, depth: u32) -> Option<TypeId> {
        let node = self.arena(decl.file)?.get(decl.node)?;
        match &node.data {
            NodeData::Class(_) => Some(self.types.class_object(node.name)),
            NodeData::Function(_) => self.function_type(decl),
            NodeData::Target(data) => self.target_type(decl, data, depth),
            NodeData::Parameter(_) | NodeData::Module(_) => None,
        }
    }
}

impl TypeEvalContext for EvalContext<'_> {
    fn mode(&self) -> EvalMode {
        self.mode
    }

    fn type_of(&self, decl: NodeRef) -> Option<TypeId> {
        let node = self.arena(decl.file)?.get(decl.node)?;
        let result = match &node.data {
            NodeData::Parameter(data) => self.parameter_type(decl, data),
            NodeData::Target(data) => self.target_type(decl, data, 0),
            NodeData::Function(_) => self.function_type(decl),
            NodeData::Class(_) => Some(self.types.class_object(node.name)),
            NodeData::Module(_) => None,
        };
        trace!(
            file = decl.file.0,
            node = decl.node.0,
            mode = ?self.mode,
            type_id = ?result,
            "EvalContext::type_of"
        );
        result
    }

    fn return_type_of(&self, callable: NodeRef) -> Option<TypeId> {
        let data = self.arena(callable.file)?.function(callable.node)?;
        let declared = self.annotation_type(data.returns.as_ref()?, 0)?;
        if data.is_async {
            let coroutine = self.types.intern_string("Coroutine");
            Some(
                self.types
                    .instance(coroutine, vec![TypeId::ANY, TypeId::ANY, declared]),
            )
        } else {
            Some(declared)
        }
    }

    fn can_deepen(&self, element: NodeRef) -> bool {
        if self.mode == EvalMode::Deep {
            return false;
        }
        let Some(node) = self.arena(element.file).and_then(|a| a.get(element.node)) else {
            return false;
        };
        match &node.data {
            NodeData::Target(data) => {
                data.annotation.is_none() && (data.type_comment.is_some() || data.value.is_some())
            }
            NodeData::Parameter(data) => data.annotation.is_none() && data.default.is_some(),
            _ => false,
        }
    }

    fn deepen(&self, scope_root: NodeRef) -> Self {
        Self {
            mode: EvalMode::Deep,
            scope: Some(scope_root),
            ..*self
        }
    }
}

#[cfg(test)]
#[path = "../tests/eval_tests.rs"]
mod tests;
