//! Parser tests.
//!
//! - `parser`: literal grammar cases — precedence shapes, the typedef
//!   ambiguity, declarators, statements, preprocessor context parity,
//!   old-style definitions, error recovery.
//! - `properties`: proptest suites — span coverage, lossless
//!   reconstruction and re-parse idempotence over generated programs and
//!   arbitrary input.

mod properties;

use csyn_ir::{FieldName, Node, NodeKind};

/// Parse, asserting the source produced no diagnostics.
pub(crate) fn parse_clean(source: &str) -> crate::ParseResult {
    let result = crate::parse(source);
    assert!(
        result.diagnostics.is_empty(),
        "unexpected diagnostics for {source:?}: {:?}",
        result.diagnostics
    );
    result
}

/// First named child of `node` with the given kind, or panic with the
/// tree's s-expression.
pub(crate) fn child_of<'n>(node: &'n Node, kind: NodeKind) -> &'n Node {
    match node.named_children().find(|n| n.kind == kind) {
        Some(found) => found,
        None => panic!("no {kind:?} in {}", node.to_sexp()),
    }
}

/// Field access that panics with context instead of returning `None`.
pub(crate) fn field_of<'n>(node: &'n Node, field: FieldName) -> &'n Node {
    match node.field(field) {
        Some(found) => found,
        None => panic!("no {field:?} field in {}", node.to_sexp()),
    }
}

/// Whether any node of `kind` occurs in the subtree.
pub(crate) fn contains_kind(node: &Node, kind: NodeKind) -> bool {
    if node.kind == kind {
        return true;
    }
    node.named_children().any(|child| contains_kind(child, kind))
}

/// The expression of the single statement inside `void f() { <expr>; }`.
pub(crate) fn statement_expression(expr: &str) -> Node {
    let source = format!("void f() {{ {expr}; }}");
    let result = parse_clean(&source);
    let definition = child_of(result.tree.root(), NodeKind::FunctionDefinition);
    let body = field_of(definition, FieldName::Body);
    let statement = child_of(body, NodeKind::ExpressionStatement);
    let inner = match statement
        .named_children()
        .find(|n| n.kind != NodeKind::Comment)
    {
        Some(inner) => inner.clone(),
        None => panic!("empty statement in {}", statement.to_sexp()),
    };
    inner
}
