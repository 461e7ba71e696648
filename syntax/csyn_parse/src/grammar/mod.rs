//! Grammar productions.
//!
//! Each module extends `Parser` with methods for one layer:
//!
//! - [`expr`]: expressions, initializers, GNU inline assembly
//! - [`types`]: type specifiers, struct/union/enum bodies, type descriptors
//! - [`decl`]: declarations, the four declarator families, definitions
//! - [`stmt`]: statements
//! - [`preproc`]: directives and the conditional template
//!
//! This module owns the item level: the translation unit, the
//! block-item/top-level-item split, and the declaration-vs-statement fork
//! that resolves the typedef ambiguity. Top-level items differ from block
//! items in exactly one way: a bare expression statement at file scope must
//! not be headed by a binary or comma expression, which would collide with
//! declarations (`a * b;` at file scope is a pointer declaration, never a
//! product).

mod decl;
mod expr;
mod preproc;
mod stmt;
mod types;

use csyn_diagnostic::ErrorCode;
use csyn_grammar::{PreprocContext, RuleName};
use csyn_ir::{FieldName, Node, NodeKind, Span, TokenKind};

use crate::{recovery, NodeBuilder, Parsed, Parser};

impl<'a> Parser<'a> {
    /// Parse the whole token stream into a `translation_unit`.
    pub(crate) fn parse_translation_unit(&mut self) -> Node {
        let mut b = NodeBuilder::new();
        while !self.at_eof() {
            self.parse_item_recovering(&mut b, true);
        }
        self.drain_trivia(&mut b);
        let end = u32::try_from(self.source.len()).unwrap_or(u32::MAX);
        b.finish_with_fallback(NodeKind::TranslationUnit, Span::new(0, end))
    }

    /// One item, converting failure into an `ERROR` node so the item loop
    /// always makes progress and every token lands in the tree.
    pub(crate) fn parse_item_recovering(&mut self, b: &mut NodeBuilder, top_level: bool) {
        let start = self.snapshot();
        let mark = b.len();
        match self.parse_item(b, top_level) {
            Ok(()) => {
                debug_assert!(self.cursor.pos() > start.pos, "item made no progress");
            }
            Err(error) => {
                b.truncate(mark);
                self.restore(start);
                let node = self.error_node(recovery::ITEM_BOUNDARY, &error);
                b.push_node(node);
            }
        }
    }

    /// A block item or top-level item, pushed into `b`.
    ///
    /// Pushing instead of returning lets the hidden `_empty_declaration`
    /// splice its `type_specifier ;` children directly into the parent,
    /// exactly as the transparent rule prescribes.
    fn parse_item(&mut self, b: &mut NodeBuilder, top_level: bool) -> Parsed<()> {
        use TokenKind as T;
        match self.current_kind() {
            T::Hash => {
                let node = self.parse_preproc_item(PreprocContext::BlockItem)?;
                b.push_node(node);
                Ok(())
            }
            T::Typedef => {
                let node = self.parse_type_definition()?;
                b.push_node(node);
                Ok(())
            }
            T::Extension if self.peek_kind() == T::Typedef => {
                let node = self.parse_type_definition()?;
                b.push_node(node);
                Ok(())
            }
            T::Extern if self.peek_kind() == T::StringStart => {
                let node = self.parse_linkage_specification()?;
                b.push_node(node);
                Ok(())
            }
            // `__extension__` may qualify a declaration or prefix an
            // expression statement. When a specifier clearly follows, the
            // qualifier reading is committed.
            T::Extension if self.peek_kind().starts_declaration_specifier() => {
                self.parse_declaration_like_into(b, false, true)
            }
            T::Extension => {
                let node = self.fork(
                    &[RuleName::TypeQualifier, RuleName::ExtensionExpression],
                    &mut [
                        &mut |p: &mut Self| p.parse_declaration_like_node(true, true),
                        &mut |p: &mut Self| p.parse_statement(top_level, true),
                    ],
                )?;
                b.push_node(node);
                Ok(())
            }
            // `[[…]]` opens either declaration modifiers or an attributed
            // statement.
            T::LBracket if self.at_double_bracket(T::LBracket) => {
                let node = self.fork(
                    &[RuleName::DeclarationModifiers, RuleName::AttributedStatement],
                    &mut [
                        &mut |p: &mut Self| p.parse_declaration_like_node(true, true),
                        &mut |p: &mut Self| p.parse_statement(top_level, true),
                    ],
                )?;
                b.push_node(node);
                Ok(())
            }
            T::MsCallModifier => self.parse_declaration_like_into(b, false, true),
            k if k.starts_declaration_specifier() => {
                self.parse_declaration_like_into(b, false, true)
            }
            T::Identifier => {
                if self.peek_kind() == T::Colon {
                    let node = self.parse_statement(top_level, true)?;
                    b.push_node(node);
                    return Ok(());
                }
                // The typedef ambiguity: `T *p;` vs the expression `T * p`.
                let conflict: &'static [RuleName] = if top_level {
                    &[RuleName::TopLevelItem, RuleName::TopLevelStatement]
                } else {
                    &[RuleName::BlockItem, RuleName::Statement]
                };
                let node = self.fork(
                    conflict,
                    &mut [
                        &mut |p: &mut Self| p.parse_declaration_like_node(true, true),
                        &mut |p: &mut Self| p.parse_statement(top_level, true),
                    ],
                )?;
                b.push_node(node);
                Ok(())
            }
            _ => {
                let node = self.parse_statement(top_level, true)?;
                b.push_node(node);
                Ok(())
            }
        }
    }

    /// `declaration | statement`, the shape labeled statements and case
    /// bodies accept. Declarations win over an equally long statement
    /// reading only through dynamic precedence.
    pub(crate) fn parse_declaration_or_statement(&mut self, allow_case: bool) -> Parsed<Node> {
        use TokenKind as T;
        match self.current_kind() {
            T::Typedef => self.parse_type_definition(),
            k if k.starts_declaration_specifier() => self.parse_declaration_node(),
            T::Identifier if self.peek_kind() != T::Colon => self.fork(
                &[RuleName::BlockItem, RuleName::Statement],
                &mut [
                    &mut |p: &mut Self| p.parse_declaration_node(),
                    &mut |p: &mut Self| p.parse_statement(false, allow_case),
                ],
            ),
            _ => self.parse_statement(false, allow_case),
        }
    }

    /// Expect an identifier token and wrap it in a named leaf role
    /// (`type_identifier`, `field_identifier`, `statement_identifier`, …).
    pub(crate) fn expect_leaf_field(
        &mut self,
        b: &mut NodeBuilder,
        field: FieldName,
        kind: NodeKind,
    ) -> Parsed<()> {
        if self.at(TokenKind::Identifier) {
            self.bump_leaf_field(b, field, kind);
            Ok(())
        } else {
            Err(self.error_here(ErrorCode::E1004))
        }
    }
}
