//! Core type definitions.

use pyi_common::Atom;

/// Interned type handle.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeId(pub u32);

impl TypeId {
    /// `typing.Any`
    pub const ANY: TypeId = TypeId(0);
    /// An explicit "resolved, but unknown" type. Distinct from absence,
    /// which is `Option::None` at every query boundary.
    pub const UNKNOWN: TypeId = TypeId(1);
    /// The bottom type (`typing.NoReturn` / `typing.Never`), also the result
    /// of an empty union.
    pub const NEVER: TypeId = TypeId(2);
    /// The type of the `None` value.
    pub const NONE_TYPE: TypeId = TypeId(3);

    /// First id handed out for non-intrinsic types.
    pub const FIRST_USER: u32 = 4;

    #[inline]
    pub const fn is_intrinsic(self) -> bool {
        self.0 < Self::FIRST_USER
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum IntrinsicKind {
    Any,
    Unknown,
    Never,
    NoneType,
}

impl IntrinsicKind {
    pub const ALL: [IntrinsicKind; 4] = [
        IntrinsicKind::Any,
        IntrinsicKind::Unknown,
        IntrinsicKind::Never,
        IntrinsicKind::NoneType,
    ];

    pub const fn to_type_id(self) -> TypeId {
        match self {
            IntrinsicKind::Any => TypeId::ANY,
            IntrinsicKind::Unknown => TypeId::UNKNOWN,
            IntrinsicKind::Never => TypeId::NEVER,
            IntrinsicKind::NoneType => TypeId::NONE_TYPE,
        }
    }
}

/// Interned list of types (generic arguments, union members).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct TypeListId(pub u32);

impl TypeListId {
    pub const EMPTY: TypeListId = TypeListId(0);
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct FunctionShapeId(pub u32);

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub enum ParamKind {
    #[default]
    Positional,
    KeywordOnly,
    VarArgs,
    KwArgs,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ParamInfo {
    pub name: Atom,
    pub type_id: TypeId,
    /// Has a default value.
    pub optional: bool,
    pub kind: ParamKind,
}

/// A callable signature.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FunctionShape {
    pub params: Vec<ParamInfo>,
    pub return_type: TypeId,
}

/// Structural type data behind a `TypeId`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypeData {
    Intrinsic(IntrinsicKind),
    /// An instance of a nominal class, with generic arguments (`list[int]`).
    Instance { class: Atom, args: TypeListId },
    /// The class object itself (`type[C]`).
    ClassObject(Atom),
    Function(FunctionShapeId),
    /// Ordered, flattened, de-duplicated members; never fewer than two.
    Union(TypeListId),
}
