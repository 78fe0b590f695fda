// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Structural tests: the grammar recognizes the constructs rewriting needs.

use jupgrade_java_cst::{
    make, parse_compilation_unit, AnnotationArgs, ClassKind, LiteralKind, NodeId, NodeKind,
    NodeTag, Tree,
};

fn parse(source: &str) -> (Tree, NodeId) {
    let tree = parse_compilation_unit(source).expect("parse error");
    let root = tree.root().expect("root");
    (tree, root)
}

fn find(tree: &Tree, root: NodeId, tag: NodeTag) -> Vec<NodeId> {
    tree.find_all(root, |kind| kind.tag() == tag)
}

#[test]
fn imports_expose_name_static_and_asterisk() {
    let (tree, root) = parse(
        "import org.junit.Test;\nimport static org.junit.Assert.*;\nimport static org.junit.Assert.assertTrue;\n",
    );
    let imports: Vec<_> = find(&tree, root, NodeTag::Import)
        .into_iter()
        .filter_map(|id| tree.get(id).and_then(NodeKind::as_import).cloned())
        .collect();
    assert_eq!(imports.len(), 3);
    assert_eq!(imports[0].name(), "org.junit.Test");
    assert!(!imports[0].is_static());
    assert_eq!(imports[1].name(), "org.junit.Assert");
    assert!(imports[1].is_static() && imports[1].is_asterisk());
    assert_eq!(imports[2].name(), "org.junit.Assert.assertTrue");
    assert!(imports[2].is_static() && !imports[2].is_asterisk());
}

#[test]
fn annotation_shapes_are_distinguished() {
    let (tree, root) = parse("@A @B() @C(\"x\") @D(a = 1, b = 2) class X {}");
    let shapes: Vec<_> = find(&tree, root, NodeTag::Annotation)
        .into_iter()
        .filter_map(|id| tree.get(id).and_then(NodeKind::as_annotation))
        .map(|annotation| match &annotation.args {
            AnnotationArgs::Marker => format!("{}:marker", annotation.name()),
            AnnotationArgs::Single { .. } => format!("{}:single", annotation.name()),
            AnnotationArgs::Pairs { pairs, .. } => {
                format!("{}:pairs{}", annotation.name(), pairs.len())
            }
        })
        .collect();
    assert_eq!(shapes, vec!["A:marker", "B:pairs0", "C:single", "D:pairs2"]);
}

#[test]
fn class_kinds_and_methods() {
    let (tree, root) = parse(
        "class A { void f() {} interface I { void g(); } enum E { X; void h() {} } record R(int x) {} @interface N {} }",
    );
    let kinds: Vec<_> = find(&tree, root, NodeTag::ClassDecl)
        .into_iter()
        .filter_map(|id| tree.get(id).and_then(NodeKind::as_class_decl))
        .map(|class| (class.name.text.clone(), class.kind))
        .collect();
    assert_eq!(
        kinds,
        vec![
            ("A".to_string(), ClassKind::Class),
            ("I".to_string(), ClassKind::Interface),
            ("E".to_string(), ClassKind::Enum),
            ("R".to_string(), ClassKind::Record),
            ("N".to_string(), ClassKind::AnnotationType),
        ]
    );
    let methods: Vec<_> = find(&tree, root, NodeTag::MethodDecl)
        .into_iter()
        .filter_map(|id| tree.get(id).and_then(NodeKind::as_method_decl))
        .map(|method| (method.name.text.clone(), method.body.is_some()))
        .collect();
    assert_eq!(
        methods,
        vec![
            ("f".to_string(), true),
            ("g".to_string(), false),
            ("h".to_string(), true),
        ]
    );
}

#[test]
fn call_scopes_are_folded() {
    let (tree, root) = parse("class A { void f() { x = Assert.assertEquals(\"m\", a.b(), 2); } }");
    let calls = find(&tree, root, NodeTag::Call);
    assert_eq!(calls.len(), 2);
    let outer = tree.get(calls[0]).and_then(NodeKind::as_call).expect("call");
    assert_eq!(outer.name.text, "assertEquals");
    let scope = outer.scope.expect("scope");
    assert_eq!(tree.node_source(scope).expect("codegen"), " Assert");
    let args = tree.get(outer.args).and_then(NodeKind::as_group).expect("args");
    assert_eq!(args.items.len(), 3);
    let first = tree.get(args.items[0]).and_then(NodeKind::as_expression).expect("expr");
    let literal = first.parts[0].as_node().expect("literal node");
    assert_eq!(
        tree.get(literal).and_then(NodeKind::as_literal).map(|l| l.kind),
        Some(LiteralKind::String)
    );
    let inner = tree.get(calls[1]).and_then(NodeKind::as_call).expect("call");
    assert_eq!(inner.name.text, "b");
    assert_eq!(tree.node_source(inner.scope.expect("scope")).expect("codegen"), " a");
}

#[test]
fn keywords_are_not_calls() {
    let (tree, root) = parse("class A { A() { super(); this(1); if (x) {} while (y) {} } }");
    assert!(find(&tree, root, NodeTag::Call).is_empty());
}

#[test]
fn parents_point_back() {
    let (tree, root) = parse("class A { void f() { g(); } }");
    for id in tree.descendants(root) {
        for child in tree.children(id) {
            assert_eq!(tree.parent(child), Some(id));
        }
    }
    assert_eq!(tree.parent(root), None);
    let call = find(&tree, root, NodeTag::Call)[0];
    let method = tree.enclosing(call, NodeTag::MethodDecl).expect("method");
    assert_eq!(tree.tag(method), Some(NodeTag::MethodDecl));
}

#[test]
fn replace_retires_and_forwards() {
    let (mut tree, root) = parse("class A { void f() { g(1); } }");
    let call = find(&tree, root, NodeTag::Call)[0];
    let replacement = make::call(&mut tree, None, "h", Vec::new());
    tree.set_leading_trivia(replacement, " ");
    tree.replace(call, replacement).expect("replace");
    assert!(!tree.is_live(call));
    assert_eq!(tree.resolve(call), replacement);
    assert_eq!(
        tree.to_source().expect("codegen"),
        "class A { void f() { h(); } }"
    );
}

#[test]
fn remove_detaches_from_parent() {
    let (mut tree, root) = parse("import a.B;\nimport c.D;\nclass A {}\n");
    let imports = find(&tree, root, NodeTag::Import);
    tree.remove(imports[1]).expect("remove");
    assert_eq!(tree.to_source().expect("codegen"), "import a.B;\nclass A {}\n");
}

#[test]
fn deep_clone_is_independent() {
    let (mut tree, root) = parse("class A { void f() { g(); } }");
    let block = find(&tree, root, NodeTag::Block)[0];
    let copy = tree.deep_clone(block).expect("clone");
    assert_ne!(copy, block);
    assert_eq!(
        tree.node_source(copy).expect("codegen"),
        tree.node_source(block).expect("codegen")
    );
    let copied_call = find(&tree, copy, NodeTag::Call)[0];
    assert_eq!(tree.parent(copied_call).map(|p| tree.tag(p)), Some(Some(NodeTag::Statement)));
    if let Some(NodeKind::Call(call)) = tree.get_mut(copied_call) {
        call.name.text = "changed".to_string();
    }
    assert_eq!(tree.node_source(block).expect("codegen"), " { g(); }");
}

#[test]
fn indent_shifts_lines_but_keeps_blank_lines_blank() {
    let (mut tree, root) = parse("class A {\n    void f() {\n        a();\n\n        b();\n    }\n}\n");
    let block = find(&tree, root, NodeTag::Block)[0];
    tree.indent(block, "    ");
    assert_eq!(
        tree.node_source(block).expect("codegen"),
        " {\n            a();\n\n            b();\n        }"
    );
}

#[test]
fn leading_trivia_follows_first_token() {
    let (mut tree, root) = parse("class A {\n    // doc\n    @Test\n    void f() {}\n}\n");
    let method = find(&tree, root, NodeTag::MethodDecl)[0];
    assert_eq!(tree.leading_trivia(method), Some("\n    // doc\n    "));
    assert_eq!(tree.take_leading_trivia(method).as_deref(), Some("\n    // doc\n    "));
    assert_eq!(tree.leading_trivia(method), Some(""));
}
