//! End-to-end behavior of the stub type provider.

mod common;

use common::{Project, at, real_method};
use pyi::syntax::Expr;
use pyi::{
    EvalMode, NodeIndex, NodeRef, ProviderError, ProviderOptions, PyiTypeProvider,
    TypeEvalContext, TypeId, TypeProvider,
};

#[test]
fn test_parameter_type_comes_from_stub_parameter() {
    let mut p = Project::new();
    let (real, (f, x), _) = p.module(
        "m",
        |b| real_method(b, "C", "f"),
        |b| {
            let c = b.class(b.root(), "C");
            let f = b.function(c, "f");
            b.param(f, "self", None);
            b.param(f, "x", Some(b.generic("typing.Sequence", vec![b.ty("bytes")])));
        },
    );
    let ty = p
        .provider()
        .parameter_type(at(real, x), at(real, f), &p.shallow())
        .expect("valid tree");
    assert_eq!(p.show(ty).as_deref(), Some("Sequence[bytes]"));
}

#[test]
fn test_parameter_absent_from_stub_has_no_type() {
    let mut p = Project::new();
    let (real, (f, x), _) = p.module(
        "m",
        |b| real_method(b, "C", "f"),
        |b| {
            let c = b.class(b.root(), "C");
            let f = b.function(c, "f");
            b.param(f, "self", None);
        },
    );
    assert_eq!(
        p.provider()
            .parameter_type(at(real, x), at(real, f), &p.shallow()),
        Ok(None)
    );
}

#[test]
fn test_overloaded_method_yields_ordered_union() {
    let mut p = Project::new();
    let (real, (f, _), _) = p.module(
        "m",
        |b| real_method(b, "C", "f"),
        |b| {
            b.import("typing", Some("overload"), "overload");
            let c = b.class(b.root(), "C");
            for arg in ["int", "str"] {
                let f = b.function(c, "f");
                b.decorate(f, "overload");
                b.param(f, "self", None);
                b.param(f, "x", Some(b.ty(arg)));
                b.returns(f, b.ty(arg));
            }
        },
    );
    let ty = p
        .provider()
        .callable_type(at(real, f), &p.shallow())
        .expect("valid tree");
    assert_eq!(
        p.show(ty).as_deref(),
        Some("((self: C, x: int) -> int) | ((self: C, x: str) -> str)")
    );

    let members = ty
        .and_then(|ty| p.types.union_members(ty))
        .expect("a two-member union");
    assert_eq!(members.len(), 2);
}

#[test]
fn test_only_marked_functions_join_the_union() {
    for marked_first in [true, false] {
        let mut p = Project::new();
        let (real, f, _) = p.module(
            "m",
            |b| b.function(b.root(), "f"),
            |b| {
                let root = b.root();
                let declare = |b: &mut pyi::TreeBuilder<'_>, marked: bool| {
                    let f = b.function(root, "f");
                    let arg = if marked {
                        b.decorate(f, "overload");
                        "int"
                    } else {
                        "str"
                    };
                    b.param(f, "x", Some(b.ty(arg)));
                    b.returns(f, b.ty(arg));
                };
                declare(b, marked_first);
                declare(b, !marked_first);
            },
        );
        let ty = p
            .provider()
            .callable_type(at(real, f), &p.shallow())
            .expect("valid tree");
        assert_eq!(
            p.show(ty).as_deref(),
            Some("(x: int) -> int"),
            "marked_first = {marked_first}"
        );
    }
}

#[test]
fn test_reference_type_is_context_independent() {
    let mut p = Project::new();
    let (real, (x, y), _) = p.module(
        "m",
        |b| {
            let root = b.root();
            let x = b.assigned(root, "x", Expr::Int(0));
            let y = b.assigned(root, "y", Expr::Int(0));
            (x, y)
        },
        |b| {
            let root = b.root();
            b.class(root, "Config");
            b.assigned(root, "x", b.call_expr("Config"));
            b.annotated(root, "y", b.ty("float"));
        },
    );
    let provider = p.provider();
    for target in [x, y] {
        let shallow = provider.reference_type(at(real, target), &p.shallow(), None);
        let deep = provider.reference_type(at(real, target), &p.deep(), None);
        assert_eq!(shallow, deep);
        assert!(shallow.expect("valid tree").is_some());
    }
    assert_eq!(
        p.show(provider.reference_type(at(real, x), &p.shallow(), None).expect("valid tree"))
            .as_deref(),
        Some("Config")
    );
}

#[test]
fn test_class_level_reference_reaching_module_name_is_context_independent() {
    let mut p = Project::new();
    let (real, y, _) = p.module(
        "m",
        |b| {
            let c = b.class(b.root(), "C");
            b.assigned(c, "y", Expr::Int(0))
        },
        |b| {
            let root = b.root();
            b.assigned(root, "X", Expr::Int(1));
            let c = b.class(root, "C");
            b.assigned(c, "y", b.name_expr("X"));
        },
    );
    let provider = p.provider();
    let shallow = provider
        .reference_type(at(real, y), &p.shallow(), None)
        .expect("valid tree");
    let deep = provider
        .reference_type(at(real, y), &p.deep(), None)
        .expect("valid tree");
    assert_eq!(shallow, deep);
    assert_eq!(p.show(shallow).as_deref(), Some("int"));
}

#[test]
fn test_declarations_without_stub_file_are_absent() {
    let mut p = Project::new();
    let (real, (f, x)) = p.file("plain.py", |b| real_method(b, "C", "f"));
    p.file("unrelated.pyi", |b| {
        let c = b.class(b.root(), "C");
        b.function(c, "f");
    });
    p.program.associate_by_path();

    let provider = p.provider();
    let locator = provider.locator();
    let ctx = p.shallow();
    for node in [NodeIndex::ROOT, f, x] {
        assert_eq!(locator.locate(at(real, node)), Ok(None));
    }
    assert_eq!(provider.callable_type(at(real, f), &ctx), Ok(None));
    assert_eq!(provider.return_type(at(real, f), &ctx), Ok(None));
    assert_eq!(
        provider.parameter_type(at(real, x), at(real, f), &ctx),
        Ok(None)
    );
}

/// A context that computes no type for functions.
#[derive(Clone, Copy)]
struct NoFunctionTypes<'a> {
    inner: pyi::EvalContext<'a>,
}

impl TypeEvalContext for NoFunctionTypes<'_> {
    fn mode(&self) -> EvalMode {
        self.inner.mode()
    }

    fn type_of(&self, decl: NodeRef) -> Option<TypeId> {
        self.inner.type_of(decl).filter(|&ty| {
            self.inner
                .types()
                .function_of(ty)
                .is_none()
        })
    }

    fn return_type_of(&self, callable: NodeRef) -> Option<TypeId> {
        self.inner.return_type_of(callable)
    }

    fn can_deepen(&self, element: NodeRef) -> bool {
        self.inner.can_deepen(element)
    }

    fn deepen(&self, scope_root: NodeRef) -> Self {
        Self {
            inner: self.inner.deepen(scope_root),
        }
    }
}

#[test]
fn test_uncomputable_overload_group_is_absent_not_empty() {
    let mut p = Project::new();
    let (real, f, _) = p.module(
        "m",
        |b| b.function(b.root(), "f"),
        |b| {
            for arg in ["int", "str"] {
                let f = b.function(b.root(), "f");
                b.decorate(f, "typing.overload");
                b.param(f, "x", Some(b.ty(arg)));
            }
        },
    );
    let ctx = NoFunctionTypes { inner: p.shallow() };
    assert_eq!(p.provider().callable_type(at(real, f), &ctx), Ok(None));
    // The same group is typed once functions are computable.
    assert!(
        p.provider()
            .callable_type(at(real, f), &p.shallow())
            .expect("valid tree")
            .is_some()
    );
}

#[test]
fn test_extra_overload_decorators_from_options() {
    let mut p = Project::new();
    let (real, f, _) = p.module(
        "m",
        |b| b.function(b.root(), "f"),
        |b| {
            b.import("compat", Some("overload"), "overload");
            for ret in ["int", "None"] {
                let f = b.function(b.root(), "f");
                b.decorate(f, "overload");
                b.returns(f, b.ty(ret));
            }
        },
    );
    let ctx = p.shallow();
    let default = p.provider().callable_type(at(real, f), &ctx);
    assert_eq!(p.show(default.expect("valid tree")).as_deref(), Some("() -> int"));

    let options = ProviderOptions::from_json(r#"{"overload_decorators": ["compat.overload"]}"#)
        .expect("valid options");
    let provider = PyiTypeProvider::for_program(&p.program, &p.types, options);
    let ty = provider.callable_type(at(real, f), &ctx);
    assert_eq!(
        p.show(ty.expect("valid tree")).as_deref(),
        Some("(() -> int) | (() -> None)")
    );
}

#[test]
fn test_nested_function_overload_is_internal_error() {
    let mut p = Project::new();
    let (real, (outer, inner), (_, stub_inner)) = p.module(
        "m",
        |b| {
            let outer = b.function(b.root(), "outer");
            let inner = b.function(outer, "inner");
            (outer, inner)
        },
        |b| {
            let outer = b.function(b.root(), "outer");
            let inner = b.function(outer, "inner");
            b.decorate(inner, "overload");
            (outer, inner)
        },
    );
    // Function locals are never located...
    assert_eq!(
        p.provider().callable_type(at(real, inner), &p.shallow()),
        Ok(None)
    );
    assert!(
        p.provider()
            .callable_type(at(real, outer), &p.shallow())
            .expect("valid tree")
            .is_some()
    );
    // ...but asking the resolver directly about a nested overload is an
    // invariant violation.
    let stub = p.program.find_file("m.pyi").expect("registered");
    let provider = p.provider();
    let overloads = provider.overloads();
    assert!(matches!(
        overloads.overload_type(at(stub, stub_inner), &p.shallow()),
        Err(ProviderError::UnexpectedScopeOwner { .. })
    ));
}

#[test]
fn test_reference_without_deepening_stays_untyped_under_shallow_context() {
    let mut p = Project::new();
    let (real, x, _) = p.module(
        "m",
        |b| b.assigned(b.root(), "x", Expr::Int(0)),
        |b| b.assigned(b.root(), "x", Expr::Int(1)),
    );
    let raw = serde_json::json!({ "deepen_references": false }).to_string();
    let options = ProviderOptions::from_json(&raw).expect("valid options");
    let provider = PyiTypeProvider::for_program(&p.program, &p.types, options);

    assert_eq!(provider.reference_type(at(real, x), &p.shallow(), None), Ok(None));
    let deep = provider
        .reference_type(at(real, x), &p.deep(), None)
        .expect("valid tree");
    assert_eq!(p.show(deep).as_deref(), Some("int"));
}
