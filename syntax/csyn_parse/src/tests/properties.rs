//! Cross-cutting properties: span coverage, lossless reconstruction and
//! re-parse idempotence.
//!
//! `reconstruct` walks every leaf in order, checks that leaves never
//! overlap and that every gap is pure whitespace, and returns the original
//! text. Re-parsing that text must yield a structurally identical tree.
//! Both properties must hold on valid input *and* across error recovery —
//! an `ERROR` node owns the tokens it skipped, so nothing ever falls out
//! of the tree.

use pretty_assertions::assert_eq;
use proptest::prelude::*;

use crate::parse;

/// Representative well-formed sources covering every layer: literals,
/// expressions, all four declarator families, statements, preprocessor
/// contexts and the vendor extensions.
const FIXTURES: &[&str] = &[
    "int main(int argc, char **argv) { return 0; }",
    "struct point { int x; int y; };",
    "typedef struct point point_t;",
    "enum color { RED, GREEN = 2, BLUE };",
    "union u { int i; float f; };",
    "#include <stdio.h>\n",
    "#include \"local.h\"\n",
    "#define MAX(a, b) ((a) > (b) ? (a) : (b))\n",
    "#define VERSION 3\n",
    "#pragma once\n",
    "#undef FOO\n",
    "#ifdef DEBUG\nstatic int level = 1;\n#else\nstatic int level = 0;\n#endif\n",
    "#if defined(A) && B > 1\nint x;\n#elif defined(C)\nint y;\n#endif\n",
    "#if A\n#if B\nint x;\n#endif\n#endif\n",
    "enum e {\n#if OLD\nA,\n#endif\nB\n};",
    "struct s {\n#ifdef WIDE\nlong w;\n#endif\nint n;\n};",
    "int add(a, b) int a; int b; { return a + b; }",
    "void f(void) { for (int i = 0; i < 10; i++) { g(i); } }",
    "void w(void) { while (i > 0) i--; do { f(); } while (cond); }",
    "void h(void) { switch (x) { case 1: f(); break; default: g(); } }",
    "void l(void) { start: g(); goto start; }",
    "const char *msg = \"hi\\n\";",
    "char c = 'a'; char nl = '\\n';",
    "const char *s = \"a\" \"b\";",
    "static inline int sq(int x) { return x * x; }",
    "int a[10]; int *b[5]; int (*c)[5];",
    "int (*fp)(void); void g(int (*)(void));",
    "long long unsigned int big;",
    "volatile int v; register int r;",
    "int x = sizeof(struct point);",
    "int y = (int)z;",
    "int *p = (int[]){1, 2};",
    "struct p q = { .x = 1, [2] = 3 };",
    "int m = a > b ? a : b; int e = a ?: b;",
    "int g2 = _Generic(x, int: 1, float: 2);",
    "struct flags { unsigned a : 1; unsigned b : 2; };",
    "extern \"C\" { int f(void); }",
    "void nop(void) { __asm__ volatile (\"nop\"); }",
    "void s2(void) { __try { f(); } __finally { g(); } }",
    "__attribute__((noreturn)) void die(void);",
    "[[deprecated]] int old_api;",
    "__declspec(dllexport) int __cdecl exported(void);",
    "int * __restrict rp;",
    "int x; /* block */ int y; // line\n",
    "void c2(void) { a = 1, b = 2; }",
    "void u(void) { ++i; --j; k++; k--; }",
    "void d(void) { if (a) if (b) g(); else h(); }",
];

#[test]
fn test_fixtures_parse_clean() {
    for source in FIXTURES {
        let result = parse(source);
        assert!(
            result.diagnostics.is_empty(),
            "diagnostics for {source:?}: {:?}\n{}",
            result.diagnostics,
            result.tree.to_sexp()
        );
    }
}

#[test]
fn test_fixtures_reconstruct_losslessly() {
    for source in FIXTURES {
        let result = parse(source);
        match result.tree.reconstruct(source) {
            Ok(text) => assert_eq!(&text, source),
            Err(error) => panic!("coverage violated for {source:?}: {error}"),
        }
    }
}

#[test]
fn test_fixtures_reparse_identically() {
    for source in FIXTURES {
        let first = parse(source);
        let Ok(text) = first.tree.reconstruct(source) else {
            panic!("reconstruction failed for {source:?}");
        };
        let second = parse(&text);
        assert_eq!(
            first.tree, second.tree,
            "re-parse diverged for {source:?}"
        );
    }
}

#[test]
fn test_coverage_holds_across_recovery() {
    // Deliberately broken inputs: recovery must keep every token.
    const BROKEN: &[&str] = &[
        "int x = ;",
        "void f( { }",
        "struct { int ; };",
        "#if\nint x;\n#endif\n",
        "a + b;",
        "void f() { case 1: ; }",
        "int @ y;",
        "\"unterminated",
        "/* unterminated",
        "}{",
    ];
    for source in BROKEN {
        let result = parse(source);
        match result.tree.reconstruct(source) {
            Ok(text) => assert_eq!(&text, source),
            Err(error) => panic!("coverage violated for {source:?}: {error}"),
        }
    }
}

// Expression generator: identifiers that cannot collide with keywords
// (every C keyword avoids the `q` prefix), small numbers, and the operator
// shapes the precedence table orders.
fn arb_expression() -> impl Strategy<Value = String> {
    let leaf = prop_oneof![
        "[0-9]{1,3}".prop_map(|n| n),
        "q[a-z0-9]{0,4}".prop_map(|v| v),
    ];
    leaf.prop_recursive(3, 24, 4, |inner| {
        prop_oneof![
            (inner.clone(), inner.clone()).prop_map(|(a, b)| format!("{a} + {b}")),
            (inner.clone(), inner.clone()).prop_map(|(a, b)| format!("{a} * {b}")),
            (inner.clone(), inner.clone()).prop_map(|(a, b)| format!("{a} < {b}")),
            (inner.clone(), inner.clone()).prop_map(|(a, b)| format!("{a} == {b}")),
            inner.clone().prop_map(|a| format!("-{a}")),
            inner.clone().prop_map(|a| format!("!{a}")),
            inner.clone().prop_map(|a| format!("({a})")),
            (inner.clone(), inner.clone(), inner).prop_map(|(a, b, c)| format!("{a} ? {b} : {c}")),
        ]
    })
}

proptest! {
    // Generated expressions parse without diagnostics, reconstruct to the
    // exact source, and re-parse to an identical tree.
    #[test]
    fn generated_expressions_round_trip(expr in arb_expression()) {
        let source = format!("void f(void) {{ q0 = {expr}; }}");
        let result = parse(&source);
        prop_assert!(result.diagnostics.is_empty(), "{:?}", result.diagnostics);
        let Ok(text) = result.tree.reconstruct(&source) else {
            return Err(TestCaseError::fail("coverage violated"));
        };
        prop_assert_eq!(&text, &source);
        let again = parse(&text);
        prop_assert_eq!(&result.tree, &again.tree);
    }

    // Generated declaration lists round-trip the same way.
    #[test]
    fn generated_declarations_round_trip(
        names in proptest::collection::vec("q[a-z0-9]{0,5}", 1..6),
        values in proptest::collection::vec(0u32..1000, 1..6),
    ) {
        let mut source = String::new();
        for (name, value) in names.iter().zip(values.iter()) {
            source.push_str(&format!("int {name} = {value};\n"));
        }
        let result = parse(&source);
        prop_assert!(result.diagnostics.is_empty(), "{:?}", result.diagnostics);
        let Ok(text) = result.tree.reconstruct(&source) else {
            return Err(TestCaseError::fail("coverage violated"));
        };
        prop_assert_eq!(&text, &source);
    }

    // Arbitrary printable input never panics and never loses a byte:
    // whatever recovery does, the leaves still cover the source.
    #[test]
    fn arbitrary_input_never_loses_tokens(source in "[ -~\n]{0,80}") {
        let result = parse(&source);
        let Ok(text) = result.tree.reconstruct(&source) else {
            return Err(TestCaseError::fail("coverage violated"));
        };
        prop_assert_eq!(&text, &source);
    }
}
