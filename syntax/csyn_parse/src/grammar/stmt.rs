//! Statements.
//!
//! The statement family is shared between block items and top-level items;
//! `top_level` narrows it (no SEH, and expression statements must not be
//! headed by a binary or comma expression). `allow_case` carves out the
//! non-case family used inside `case` bodies.

use csyn_diagnostic::ErrorCode;
use csyn_ir::{FieldName, Node, NodeKind, TokenKind};

use crate::{ensure_stack, NodeBuilder, Parsed, Parser};

impl<'a> Parser<'a> {
    pub(crate) fn parse_statement(&mut self, top_level: bool, allow_case: bool) -> Parsed<Node> {
        ensure_stack(|| self.parse_statement_inner(top_level, allow_case))
    }

    fn parse_statement_inner(&mut self, top_level: bool, allow_case: bool) -> Parsed<Node> {
        use TokenKind as T;
        match self.current_kind() {
            T::LBrace => self.parse_compound_statement(),
            T::If => self.parse_if_statement(),
            T::Switch => self.parse_switch_statement(),
            T::While => self.parse_while_statement(),
            T::Do => self.parse_do_statement(),
            T::For => self.parse_for_statement(),
            T::Return => self.parse_return_statement(),
            T::Break => self.parse_simple_statement(NodeKind::BreakStatement),
            T::Continue => self.parse_simple_statement(NodeKind::ContinueStatement),
            T::Goto => self.parse_goto_statement(),
            T::Case | T::Default if allow_case => self.parse_case_statement(),
            T::SehTry if !top_level => self.parse_seh_try_statement(),
            T::SehLeave if !top_level => self.parse_simple_statement(NodeKind::SehLeaveStatement),
            T::LBracket if self.at_double_bracket(T::LBracket) => {
                self.parse_attributed_statement(top_level, allow_case)
            }
            T::Identifier if self.peek_kind() == T::Colon => self.parse_labeled_statement(),
            _ => self.parse_expression_statement(top_level),
        }
    }

    /// `{ block-item* }`
    pub(crate) fn parse_compound_statement(&mut self) -> Parsed<Node> {
        let mut b = NodeBuilder::new();
        self.expect(&mut b, TokenKind::LBrace, ErrorCode::E1001)?;
        while !self.at(TokenKind::RBrace) && !self.at_eof() {
            self.parse_item_recovering(&mut b, false);
        }
        self.expect(&mut b, TokenKind::RBrace, ErrorCode::E1003)?;
        Ok(b.finish(NodeKind::CompoundStatement))
    }

    fn parse_expression_statement(&mut self, top_level: bool) -> Parsed<Node> {
        let mut b = NodeBuilder::new();
        if !self.at(TokenKind::Semicolon) {
            let expr = if top_level {
                // File scope excludes binary-headed (and comma) expression
                // statements so they cannot shadow declarations.
                let expr = self.parse_expression()?;
                if expr.kind == NodeKind::BinaryExpression {
                    return Err(crate::ParseError::new(
                        ErrorCode::E1001,
                        "binary expression is not a top-level statement",
                        expr.span,
                    ));
                }
                expr
            } else {
                self.parse_expression_or_comma()?
            };
            b.push_node(expr);
        }
        self.expect(&mut b, TokenKind::Semicolon, ErrorCode::E1001)?;
        Ok(b.finish(NodeKind::ExpressionStatement))
    }

    fn parse_if_statement(&mut self) -> Parsed<Node> {
        let mut b = NodeBuilder::new();
        self.bump(&mut b);
        let condition = self.parse_parenthesized_expression()?;
        b.push_field(FieldName::Condition, condition);
        let consequence = self.parse_statement(false, true)?;
        b.push_field(FieldName::Consequence, consequence);
        // Dangling else binds to the nearest if.
        if self.at(TokenKind::Else) {
            let mut eb = NodeBuilder::new();
            self.bump(&mut eb);
            let body = self.parse_statement(false, true)?;
            eb.push_node(body);
            b.push_field(FieldName::Alternative, eb.finish(NodeKind::ElseClause));
        }
        Ok(b.finish(NodeKind::IfStatement))
    }

    fn parse_switch_statement(&mut self) -> Parsed<Node> {
        let mut b = NodeBuilder::new();
        self.bump(&mut b);
        let condition = self.parse_parenthesized_expression()?;
        b.push_field(FieldName::Condition, condition);
        let body = self.parse_compound_statement()?;
        b.push_field(FieldName::Body, body);
        Ok(b.finish(NodeKind::SwitchStatement))
    }

    /// `case expr:` / `default:` plus the trailing run of non-case items.
    fn parse_case_statement(&mut self) -> Parsed<Node> {
        let mut b = NodeBuilder::new();
        if self.at(TokenKind::Case) {
            self.bump(&mut b);
            let value = self.parse_expression()?;
            b.push_field(FieldName::Value, value);
        } else {
            self.bump(&mut b); // default
        }
        self.expect(&mut b, TokenKind::Colon, ErrorCode::E1001)?;
        loop {
            match self.current_kind() {
                TokenKind::Case
                | TokenKind::Default
                | TokenKind::RBrace
                | TokenKind::Hash
                | TokenKind::Eof => break,
                _ => {}
            }
            let mark = b.len();
            let snapshot = self.snapshot();
            match self.parse_declaration_or_statement(false) {
                Ok(item) => b.push_node(item),
                Err(_) => {
                    // Leave the bad token for the enclosing block's
                    // recovery; the case body simply ends here.
                    b.truncate(mark);
                    self.restore(snapshot);
                    break;
                }
            }
        }
        Ok(b.finish(NodeKind::CaseStatement))
    }

    fn parse_while_statement(&mut self) -> Parsed<Node> {
        let mut b = NodeBuilder::new();
        self.bump(&mut b);
        let condition = self.parse_parenthesized_expression()?;
        b.push_field(FieldName::Condition, condition);
        let body = self.parse_statement(false, true)?;
        b.push_field(FieldName::Body, body);
        Ok(b.finish(NodeKind::WhileStatement))
    }

    fn parse_do_statement(&mut self) -> Parsed<Node> {
        let mut b = NodeBuilder::new();
        self.bump(&mut b);
        let body = self.parse_statement(false, true)?;
        b.push_field(FieldName::Body, body);
        self.expect(&mut b, TokenKind::While, ErrorCode::E1001)?;
        let condition = self.parse_parenthesized_expression()?;
        b.push_field(FieldName::Condition, condition);
        self.expect(&mut b, TokenKind::Semicolon, ErrorCode::E1001)?;
        Ok(b.finish(NodeKind::DoStatement))
    }

    fn parse_for_statement(&mut self) -> Parsed<Node> {
        use TokenKind as T;
        let mut b = NodeBuilder::new();
        self.bump(&mut b);
        self.expect(&mut b, T::LParen, ErrorCode::E1001)?;

        // Initializer: a declaration (which owns its `;`) or an optional
        // expression followed by `;`.
        if self.at(T::Semicolon) {
            self.bump(&mut b);
        } else if self.current_kind().starts_declaration_specifier() {
            let declaration = self.parse_declaration_node()?;
            b.push_field(FieldName::Initializer, declaration);
        } else if self.at(T::Identifier) {
            self.parse_for_initializer_fork(&mut b)?;
        } else {
            let init = self.parse_expression_or_comma()?;
            b.push_field(FieldName::Initializer, init);
            self.expect(&mut b, T::Semicolon, ErrorCode::E1001)?;
        }

        if !self.at(T::Semicolon) {
            let condition = self.parse_expression_or_comma()?;
            b.push_field(FieldName::Condition, condition);
        }
        self.expect(&mut b, T::Semicolon, ErrorCode::E1001)?;
        if !self.at(T::RParen) {
            let update = self.parse_expression_or_comma()?;
            b.push_field(FieldName::Update, update);
        }
        self.expect(&mut b, T::RParen, ErrorCode::E1003)?;
        let body = self.parse_statement(false, true)?;
        b.push_field(FieldName::Body, body);
        Ok(b.finish(NodeKind::ForStatement))
    }

    /// `for (T *p = x; …)` vs `for (t * p; …)` — the same typedef
    /// ambiguity as at block level. The declaration candidate includes its
    /// `;`, so the expression candidate only wins when the declaration
    /// reading fails.
    fn parse_for_initializer_fork(&mut self, b: &mut NodeBuilder) -> Parsed<()> {
        use csyn_grammar::RuleName;
        let node = self.fork(
            &[RuleName::TypeSpecifier, RuleName::Expression],
            &mut [
                &mut |p: &mut Self| p.parse_declaration_node(),
                &mut |p: &mut Self| {
                    let expr = p.parse_expression_or_comma()?;
                    if p.at(TokenKind::Semicolon) {
                        Ok(expr)
                    } else {
                        Err(p.error_here(ErrorCode::E1001))
                    }
                },
            ],
        )?;
        if node.kind == NodeKind::Declaration {
            b.push_field(FieldName::Initializer, node);
        } else {
            b.push_field(FieldName::Initializer, node);
            self.expect(b, TokenKind::Semicolon, ErrorCode::E1001)?;
        }
        Ok(())
    }

    fn parse_return_statement(&mut self) -> Parsed<Node> {
        let mut b = NodeBuilder::new();
        self.bump(&mut b);
        if !self.at(TokenKind::Semicolon) {
            let value = self.parse_expression_or_comma()?;
            b.push_node(value);
        }
        self.expect(&mut b, TokenKind::Semicolon, ErrorCode::E1001)?;
        Ok(b.finish(NodeKind::ReturnStatement))
    }

    /// Keyword plus `;`: `break;`, `continue;`, `__leave;`.
    fn parse_simple_statement(&mut self, kind: NodeKind) -> Parsed<Node> {
        let mut b = NodeBuilder::new();
        self.bump(&mut b);
        self.expect(&mut b, TokenKind::Semicolon, ErrorCode::E1001)?;
        Ok(b.finish(kind))
    }

    fn parse_goto_statement(&mut self) -> Parsed<Node> {
        let mut b = NodeBuilder::new();
        self.bump(&mut b);
        self.expect_leaf_field(&mut b, FieldName::Label, NodeKind::StatementIdentifier)?;
        self.expect(&mut b, TokenKind::Semicolon, ErrorCode::E1001)?;
        Ok(b.finish(NodeKind::GotoStatement))
    }

    /// `label:` accepts a declaration as its target, supporting the common
    /// label-before-declaration extension.
    fn parse_labeled_statement(&mut self) -> Parsed<Node> {
        let mut b = NodeBuilder::new();
        self.bump_leaf_field(&mut b, FieldName::Label, NodeKind::StatementIdentifier);
        self.expect(&mut b, TokenKind::Colon, ErrorCode::E1001)?;
        let target = self.parse_declaration_or_statement(true)?;
        b.push_node(target);
        Ok(b.finish(NodeKind::LabeledStatement))
    }

    fn parse_attributed_statement(&mut self, top_level: bool, allow_case: bool) -> Parsed<Node> {
        let mut b = NodeBuilder::new();
        while self.at_double_bracket(TokenKind::LBracket) {
            let attr = self.parse_attribute_declaration()?;
            b.push_node(attr);
        }
        let statement = self.parse_statement(top_level, allow_case)?;
        b.push_node(statement);
        Ok(b.finish(NodeKind::AttributedStatement))
    }

    fn parse_seh_try_statement(&mut self) -> Parsed<Node> {
        let mut b = NodeBuilder::new();
        self.bump(&mut b);
        let body = self.parse_compound_statement()?;
        b.push_field(FieldName::Body, body);
        match self.current_kind() {
            TokenKind::SehExcept => {
                let mut eb = NodeBuilder::new();
                self.bump(&mut eb);
                let filter = self.parse_parenthesized_expression()?;
                eb.push_field(FieldName::Filter, filter);
                let body = self.parse_compound_statement()?;
                eb.push_field(FieldName::Body, body);
                b.push_node(eb.finish(NodeKind::SehExceptClause));
            }
            TokenKind::SehFinally => {
                let mut fb = NodeBuilder::new();
                self.bump(&mut fb);
                let body = self.parse_compound_statement()?;
                fb.push_field(FieldName::Body, body);
                b.push_node(fb.finish(NodeKind::SehFinallyClause));
            }
            _ => return Err(self.error_here(ErrorCode::E1001)),
        }
        Ok(b.finish(NodeKind::SehTryStatement))
    }
}
