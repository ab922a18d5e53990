use super::*;
use crate::stub_index::Program;
use crate::test_fixtures::Fixture;
use pyi_syntax::{Expr, TreeBuilder};

struct Pair {
    fx: Fixture,
    real: FileId,
    stub: FileId,
}

impl Pair {
    fn new<R, S>(
        real: impl FnOnce(&mut TreeBuilder<'_>) -> R,
        stub: impl FnOnce(&mut TreeBuilder<'_>) -> S,
    ) -> (Pair, R, S) {
        let mut fx = Fixture::new();
        let (real_id, r) = fx.add("m.py", real);
        let (stub_id, s) = fx.add("m.pyi", stub);
        fx.pair();
        (
            Pair {
                fx,
                real: real_id,
                stub: stub_id,
            },
            r,
            s,
        )
    }

    fn locator(&self) -> StubLocator<'_, Program> {
        StubLocator::new(&self.fx.program)
    }

    fn real(&self, node: NodeIndex) -> NodeRef {
        NodeRef::new(self.real, node)
    }

    fn stub(&self, node: NodeIndex) -> NodeRef {
        NodeRef::new(self.stub, node)
    }
}

#[test]
fn test_locates_method_and_parameter() {
    let (pair, (f, x), (sf, sx)) = Pair::new(
        |b| {
            let c = b.class(b.root(), "C");
            let f = b.function(c, "f");
            b.param(f, "self", None);
            let x = b.param(f, "x", None);
            (f, x)
        },
        |b| {
            let c = b.class(b.root(), "C");
            let f = b.function(c, "f");
            b.param(f, "self", None);
            let x = b.param(f, "x", Some(b.ty("int")));
            (f, x)
        },
    );
    let locator = pair.locator();
    assert_eq!(
        locator.locate_callable(pair.real(f)),
        Ok(Some(StubDeclaration {
            decl: pair.stub(sf),
            kind: NodeKind::Function
        }))
    );
    assert_eq!(
        locator.locate(pair.real(x)),
        Ok(Some(StubDeclaration {
            decl: pair.stub(sx),
            kind: NodeKind::Parameter
        }))
    );
}

#[test]
fn test_parameter_missing_from_stub_is_absent() {
    let (pair, (f, y), _) = Pair::new(
        |b| {
            let f = b.function(b.root(), "f");
            let y = b.param(f, "y", None);
            (f, y)
        },
        |b| {
            let f = b.function(b.root(), "f");
            b.param(f, "x", Some(b.ty("int")));
        },
    );
    assert_eq!(
        pair.locator().locate_parameter(pair.real(y), pair.real(f)),
        Ok(None)
    );
}

#[test]
fn test_file_without_stub_yields_absence_for_every_shape() {
    let mut fx = Fixture::new();
    let (real, (c, f, x, t)) = fx.add("lonely.py", |b| {
        let c = b.class(b.root(), "C");
        let f = b.function(c, "f");
        let x = b.param(f, "x", None);
        let t = b.annotated(b.root(), "t", b.ty("int"));
        (c, f, x, t)
    });
    fx.add("other.pyi", |b| {
        let c = b.class(b.root(), "C");
        b.function(c, "f");
    });
    fx.pair();
    let locator = StubLocator::new(&fx.program);
    for node in [NodeIndex::ROOT, c, f, x, t] {
        assert_eq!(locator.locate(NodeRef::new(real, node)), Ok(None), "{node:?}");
    }
}

#[test]
fn test_stub_file_has_no_stub_of_its_own() {
    let (pair, _, sf) = Pair::new(
        |b| {
            b.function(b.root(), "f");
        },
        |b| b.function(b.root(), "f"),
    );
    assert_eq!(pair.locator().locate(pair.stub(sf)), Ok(None));
}

#[test]
fn test_module_locates_stub_module() {
    let (pair, _, _) = Pair::new(|_| (), |_| ());
    assert_eq!(
        pair.locator().locate(NodeRef::module(pair.real)),
        Ok(Some(StubDeclaration {
            decl: NodeRef::module(pair.stub),
            kind: NodeKind::Module
        }))
    );
}

#[test]
fn test_first_fitting_declaration_wins() {
    let (pair, f, (_, first_fn)) = Pair::new(
        |b| b.function(b.root(), "f"),
        |b| {
            let var = b.annotated(b.root(), "f", b.ty("int"));
            let first = b.function(b.root(), "f");
            b.function(b.root(), "f");
            (var, first)
        },
    );
    assert_eq!(
        pair.locator()
            .locate_callable(pair.real(f))
            .map(|s| s.map(|s| s.decl)),
        Ok(Some(pair.stub(first_fn)))
    );
}

#[test]
fn test_target_prefers_variable_then_falls_back_to_function() {
    let (pair, (x, y), (sx, sy)) = Pair::new(
        |b| {
            let root = b.root();
            let x = b.assigned(root, "x", Expr::Int(1));
            let y = b.assigned(root, "y", b.name_expr("len"));
            (x, y)
        },
        |b| {
            let root = b.root();
            b.function(root, "x");
            let sx = b.annotated(root, "x", b.ty("int"));
            let sy = b.function(root, "y");
            (sx, sy)
        },
    );
    let locator = pair.locator();
    assert_eq!(
        locator.locate_target(pair.real(x)),
        Ok(Some(StubDeclaration {
            decl: pair.stub(sx),
            kind: NodeKind::Target
        }))
    );
    assert_eq!(
        locator.locate_target(pair.real(y)),
        Ok(Some(StubDeclaration {
            decl: pair.stub(sy),
            kind: NodeKind::Function
        }))
    );
}

#[test]
fn test_nested_class_member_is_found_through_class_chain() {
    let (pair, f, sf) = Pair::new(
        |b| {
            let outer = b.class(b.root(), "Outer");
            let inner = b.class(outer, "Inner");
            b.function(inner, "f")
        },
        |b| {
            b.function(b.root(), "Inner");
            let outer = b.class(b.root(), "Outer");
            let inner = b.class(outer, "Inner");
            b.function(inner, "f")
        },
    );
    assert_eq!(
        pair.locator()
            .locate_callable(pair.real(f))
            .map(|s| s.map(|s| s.decl)),
        Ok(Some(pair.stub(sf)))
    );
}

#[test]
fn test_function_locals_have_no_stub() {
    let (pair, local, _) = Pair::new(
        |b| {
            let f = b.function(b.root(), "f");
            b.assigned(f, "local", Expr::Int(0))
        },
        |b| {
            b.function(b.root(), "f");
            b.annotated(b.root(), "local", b.ty("int"));
        },
    );
    assert_eq!(pair.locator().locate(pair.real(local)), Ok(None));
}

#[test]
fn test_name_match_of_wrong_kind_is_absent() {
    let (pair, f, _) = Pair::new(
        |b| b.function(b.root(), "f"),
        |b| {
            b.class(b.root(), "f");
        },
    );
    assert_eq!(pair.locator().locate_callable(pair.real(f)), Ok(None));
}

#[test]
fn test_corrupted_trees_are_internal_errors() {
    let mut fx = Fixture::new();
    let (real, (c, f)) = fx.add("m.py", |b| {
        let c = b.class(b.root(), "C");
        let f = b.function(c, "f");
        (c, f)
    });
    fx.add("m.pyi", |_| ());
    fx.pair();

    let locator = StubLocator::new(&fx.program);
    assert_eq!(
        locator.locate(NodeRef::module(FileId(77))),
        Err(ProviderError::UnknownFile(FileId(77)))
    );
    assert_eq!(
        locator.locate(NodeRef::new(real, NodeIndex(99))),
        Err(ProviderError::DanglingNode {
            file: real,
            node: NodeIndex(99)
        })
    );

    // Make C and f each other's parent.
    let mut broken = fx.program.file(real).expect("registered").clone();
    if let Some(node) = broken.arena.get_mut(c) {
        node.parent = f;
    }
    broken.path = "broken.py".to_string();
    let broken_id = fx.program.add_file(broken);
    let stub = fx.program.find_file("m.pyi").expect("registered");
    fx.program.associate(broken_id, stub).expect("stub exists");

    let locator = StubLocator::new(&fx.program);
    assert_eq!(
        locator.locate_callable(NodeRef::new(broken_id, f)),
        Err(ProviderError::BrokenScopeChain {
            file: broken_id,
            node: f
        })
    );
}
