// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Round-trip tests for the jupgrade-java-cst parser.
//!
//! These tests verify that `parse(code).to_source() == code` byte for byte.
//! Rewrites rely on this: whatever a rule does not touch must print exactly
//! as it was read.
//!
//! # Test Organization
//!
//! - Fixture-based tests: one test per fixture file in `tests/fixtures/`
//! - Inline tests: individual snippets for specific constructs

use difference::assert_diff;
use itertools::Itertools;
use jupgrade_java_cst::{parse_compilation_unit, prettify_error};
use std::path::PathBuf;

/// Helper to visualize whitespace differences in test output
fn visualize(s: &str) -> String {
    s.replace(' ', "▩").lines().join("↩\n")
}

fn assert_roundtrip(input: &str, label: &str) {
    let tree = match parse_compilation_unit(input) {
        Ok(tree) => tree,
        Err(e) => panic!("{}", prettify_error(e, label)),
    };
    let generated = tree.to_source().expect("codegen");
    if generated != input {
        let got = visualize(&generated);
        let expected = visualize(input);
        assert_diff!(expected.as_ref(), got.as_ref(), "", 0);
    }
}

fn assert_roundtrip_fixture(fixture_name: &str) {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(fixture_name);

    let contents = std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Failed to read fixture {}: {}", fixture_name, e));

    assert_roundtrip(&contents, fixture_name);
}

// =============================================================================
// Fixture-based round-trip tests
// =============================================================================

#[test]
fn roundtrip_fixture_junit4_test() {
    assert_roundtrip_fixture("junit4_test.java");
}

#[test]
fn roundtrip_fixture_language_features() {
    assert_roundtrip_fixture("language_features.java");
}

#[test]
fn roundtrip_fixture_comments_everywhere() {
    assert_roundtrip_fixture("comments_everywhere.java");
}

#[test]
fn roundtrip_fixture_crlf_line_endings() {
    assert_roundtrip_fixture("crlf_line_endings.java");
}

#[test]
fn roundtrip_fixture_minimal() {
    assert_roundtrip_fixture("minimal.java");
}

// =============================================================================
// Inline round-trip tests
// =============================================================================

#[test]
fn roundtrip_byte_order_mark() {
    assert_roundtrip("\u{feff}class A {}\n", "bom");
}

#[test]
fn roundtrip_no_trailing_newline() {
    assert_roundtrip("class A { void f() { g(); } }", "no_newline");
}

#[test]
fn roundtrip_only_comments() {
    assert_roundtrip("// nothing here\n/* really */\n", "only_comments");
}

#[test]
fn roundtrip_annotation_shapes() {
    assert_roundtrip(
        "@A @B() @C(1) @D(x = 1, y = {2, 3}) @e.f.G(value = \"v\") class A {}\n",
        "annotation_shapes",
    );
}

#[test]
fn roundtrip_chained_calls() {
    assert_roundtrip(
        "class A { void f() { a.b().c[0].d(\"x\").e(); this.g(); super.h(); (i).j(); \"s\".k(); } }\n",
        "chained_calls",
    );
}

#[test]
fn roundtrip_package_annotations() {
    assert_roundtrip(
        "@Generated(\"x\")\npackage a.b;\n\nimport static a.B.*;\n",
        "package_annotations",
    );
}

#[test]
fn roundtrip_module_like_unicode() {
    assert_roundtrip(
        "class Ünïcödé { String s = \"日本語\"; char c = '\\u00e9'; }\n",
        "unicode",
    );
}
