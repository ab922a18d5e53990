use super::*;
use crate::test_fixtures::Fixture;
use pyi_syntax::{FileId, NodeIndex, TreeBuilder};

fn stub_with<R>(build: impl FnOnce(&mut TreeBuilder<'_>) -> R) -> (Fixture, FileId, R) {
    let mut fx = Fixture::new();
    let (file, out) = fx.add("m.pyi", build);
    (fx, file, out)
}

fn decorated(b: &mut TreeBuilder<'_>, name: &str, decorator: &str) -> NodeIndex {
    let f = b.function(b.root(), name);
    b.decorate(f, decorator);
    f
}

#[test]
fn test_overload_spellings() {
    let (fx, file, nodes) = stub_with(|b| {
        b.import("typing", None, "typing");
        b.import("typing", Some("overload"), "ov");
        b.import("typing_extensions", None, "te");
        vec![
            decorated(b, "bare", "overload"),
            decorated(b, "qualified", "typing.overload"),
            decorated(b, "aliased", "ov"),
            decorated(b, "module_alias", "te.overload"),
        ]
    });
    let resolver = fx.decorators();
    let ctx = fx.shallow();
    for node in nodes {
        let tags = resolver.known_tags(NodeRef::new(file, node), &ctx);
        assert_eq!(tags, KnownDecorators::TYPING_OVERLOAD, "node {node:?}");
    }
}

#[test]
fn test_overload_imported_from_elsewhere_is_not_the_marker() {
    let (fx, file, f) = stub_with(|b| {
        b.import("mylib", Some("overload"), "overload");
        decorated(b, "f", "overload")
    });
    let resolver = fx.decorators();
    let f = NodeRef::new(file, f);
    let decorator = fx
        .program
        .file(file)
        .and_then(|source| source.arena.function(f.node))
        .map(|data| data.decorators[0].clone())
        .expect("decorated function");
    assert_eq!(
        resolver
            .qualified_name(f, &decorator, EvalMode::Shallow)
            .as_deref(),
        Some("mylib.overload")
    );
    assert!(resolver.known_tags(f, &fx.shallow()).is_empty());

    let configured = fx
        .decorators()
        .with_overload_decorators(["mylib.overload"]);
    assert_eq!(
        configured.known_tags(f, &fx.shallow()),
        KnownDecorators::TYPING_OVERLOAD
    );
}

#[test]
fn test_assignment_alias_resolves_only_in_deep_mode() {
    let (fx, file, f) = stub_with(|b| {
        b.import("typing", Some("overload"), "overload");
        let root = b.root();
        b.assigned(root, "ov2", b.name_expr("overload"));
        decorated(b, "f", "ov2")
    });
    let resolver = fx.decorators();
    let f = NodeRef::new(file, f);
    assert!(resolver.known_tags(f, &fx.shallow()).is_empty());
    assert_eq!(
        resolver.known_tags(f, &fx.deep()),
        KnownDecorators::TYPING_OVERLOAD
    );
}

#[test]
fn test_self_referencing_alias_terminates() {
    let (fx, file, f) = stub_with(|b| {
        let root = b.root();
        b.assigned(root, "loop_a", b.name_expr("loop_b"));
        b.assigned(root, "loop_b", b.name_expr("loop_a"));
        decorated(b, "f", "loop_a")
    });
    let tags = fx.decorators().known_tags(NodeRef::new(file, f), &fx.deep());
    assert!(tags.is_empty());
}

#[test]
fn test_method_decorators_combine() {
    let (fx, file, (a, b_node, c)) = stub_with(|b| {
        b.import("abc", Some("abstractmethod"), "abstractmethod");
        let class = b.class(b.root(), "C");
        let a = b.function(class, "a");
        b.decorate(a, "staticmethod");
        let bm = b.function(class, "b");
        b.decorate(bm, "classmethod");
        b.decorate(bm, "abstractmethod");
        let c = b.function(class, "c");
        b.decorate(c, "property");
        (a, bm, c)
    });
    let resolver = fx.decorators();
    let ctx = fx.shallow();
    let tags = |node| resolver.known_tags(NodeRef::new(file, node), &ctx);
    assert_eq!(tags(a), KnownDecorators::STATICMETHOD);
    assert_eq!(
        tags(b_node),
        KnownDecorators::CLASSMETHOD | KnownDecorators::ABSTRACTMETHOD
    );
    assert_eq!(tags(c), KnownDecorators::PROPERTY);
}

#[test]
fn test_non_functions_have_no_tags() {
    let (fx, file, class) = stub_with(|b| {
        let class = b.class(b.root(), "C");
        b.decorate(class, "overload");
        class
    });
    let resolver = fx.decorators();
    assert!(
        resolver
            .known_tags(NodeRef::new(file, class), &fx.shallow())
            .is_empty()
    );
    assert!(
        resolver
            .known_tags(NodeRef::module(FileId(12)), &fx.shallow())
            .is_empty()
    );
}
