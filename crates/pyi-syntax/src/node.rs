//! Node definitions for declaration trees.
//!
//! A node is one named declaration. Statements, function bodies and
//! expressions that do not declare anything are not represented; the only
//! expressions kept are initializers of target bindings and parameter
//! defaults, which a deep evaluation context may walk.

use crate::base::NodeIndex;
use pyi_common::Atom;
use smallvec::SmallVec;

/// A dotted name such as `typing.overload` or `int`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Default)]
pub struct DottedName(pub SmallVec<[Atom; 2]>);

impl DottedName {
    pub fn single(atom: Atom) -> Self {
        let mut parts = SmallVec::new();
        parts.push(atom);
        Self(parts)
    }

    pub fn from_parts(parts: impl IntoIterator<Item = Atom>) -> Self {
        Self(parts.into_iter().collect())
    }

    pub fn parts(&self) -> &[Atom] {
        &self.0
    }

    /// The last segment (`overload` for `typing.overload`).
    pub fn last(&self) -> Option<Atom> {
        self.0.last().copied()
    }

    /// Everything before the last segment.
    pub fn qualifier(&self) -> &[Atom] {
        match self.0.split_last() {
            Some((_, rest)) => rest,
            None => &[],
        }
    }

    pub fn is_simple(&self) -> bool {
        self.0.len() == 1
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// A type annotation, already parsed by the host.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypeExpr {
    /// `int`, `C`, `typing.Any`
    Name(DottedName),
    /// `list[int]`, `typing.Optional[str]`, `Union[A, B]`
    Subscript {
        base: DottedName,
        args: Vec<TypeExpr>,
    },
    /// `A | B`
    Union(Vec<TypeExpr>),
    /// `None`
    NoneLit,
}

/// An initializer or default-value expression.
#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    Int(i64),
    Float(f64),
    Str(Atom),
    Bytes,
    Bool(bool),
    NoneLit,
    /// `...`, the usual placeholder value in stubs
    Ellipsis,
    Name(DottedName),
    /// A call; only the callee matters for typing.
    Call {
        callee: Box<Expr>,
    },
    Tuple(Vec<Expr>),
    List(Vec<Expr>),
}

/// A decorator reference, e.g. `@overload` or `@typing.overload`.
///
/// Decorator call arguments are not represented.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Decorator {
    pub name: DottedName,
}

/// An import binding recorded on a module.
///
/// `from typing import overload as ov` is
/// `{ module: typing, name: Some(overload), alias: ov }`;
/// `import typing as t` is `{ module: typing, name: None, alias: t }`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ImportAlias {
    pub module: DottedName,
    pub name: Option<Atom>,
    pub alias: Atom,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Module,
    Class,
    Function,
    Parameter,
    Target,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum ParameterKind {
    #[default]
    Positional,
    KeywordOnly,
    /// `*args`
    VarArgs,
    /// `**kwargs`
    KwArgs,
}

#[derive(Clone, Debug, Default)]
pub struct ModuleData {
    /// Top-level declarations in file order.
    pub body: Vec<NodeIndex>,
    pub imports: Vec<ImportAlias>,
}

#[derive(Clone, Debug, Default)]
pub struct ClassData {
    /// Class-level declarations in file order.
    pub body: Vec<NodeIndex>,
    pub bases: Vec<TypeExpr>,
    pub decorators: Vec<Decorator>,
}

#[derive(Clone, Debug, Default)]
pub struct FunctionData {
    pub params: Vec<NodeIndex>,
    pub returns: Option<TypeExpr>,
    pub decorators: Vec<Decorator>,
    pub is_async: bool,
}

#[derive(Clone, Debug, Default)]
pub struct ParameterData {
    pub annotation: Option<TypeExpr>,
    pub default: Option<Expr>,
    pub kind: ParameterKind,
}

#[derive(Clone, Debug, Default)]
pub struct TargetData {
    pub annotation: Option<TypeExpr>,
    /// `x = [] # type: list[int]`
    pub type_comment: Option<TypeExpr>,
    pub value: Option<Expr>,
}

#[derive(Clone, Debug)]
pub enum NodeData {
    Module(ModuleData),
    Class(ClassData),
    Function(FunctionData),
    Parameter(ParameterData),
    Target(TargetData),
}

impl NodeData {
    pub fn kind(&self) -> NodeKind {
        match self {
            NodeData::Module(_) => NodeKind::Module,
            NodeData::Class(_) => NodeKind::Class,
            NodeData::Function(_) => NodeKind::Function,
            NodeData::Parameter(_) => NodeKind::Parameter,
            NodeData::Target(_) => NodeKind::Target,
        }
    }
}

/// A named declaration.
#[derive(Clone, Debug)]
pub struct Node {
    pub name: Atom,
    /// Owning node; `NodeIndex::NONE` for the module.
    pub parent: NodeIndex,
    pub data: NodeData,
}

impl Node {
    #[inline]
    pub fn kind(&self) -> NodeKind {
        self.data.kind()
    }

    #[inline]
    pub fn is_scope(&self) -> bool {
        matches!(
            self.data,
            NodeData::Module(_) | NodeData::Class(_) | NodeData::Function(_)
        )
    }
}
