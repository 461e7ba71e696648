//! Preprocessor directives.
//!
//! Directives are parsed as syntax, never expanded: `#define` bodies stay
//! opaque `preproc_arg` leaves, unknown directives become `preproc_call`
//! nodes, and no include path is resolved. The conditional family is one
//! template parameterized by [`PreprocContext`]; each instantiation
//! produces its own node kinds so a conditional wrapping struct fields is
//! distinguishable from one wrapping enumerators without looking at the
//! parent.
//!
//! Conditions use the restricted, sign-free preprocessor expression
//! grammar: identifiers, macro calls, `defined`, unary and binary
//! operators, parentheses. It shares no productions with the main
//! expression grammar — bare macro-call shapes must stay legal here even
//! where ordinary call syntax would be ambiguous.

use csyn_diagnostic::ErrorCode;
use csyn_grammar::{prec, PreprocContext};
use csyn_ir::{FieldName, Node, NodeKind, TokenKind};

use crate::{recovery, NodeBuilder, Parsed, Parser};

/// Words that continue or close an open conditional.
fn is_branch_word(word: &str) -> bool {
    matches!(word, "else" | "elif" | "elifdef" | "elifndef" | "endif")
}

impl<'a> Parser<'a> {
    /// Text of the directive word after the current `#`.
    pub(crate) fn directive_word(&self) -> &'a str {
        debug_assert!(self.at(TokenKind::Hash));
        let token = *self.cursor.peek();
        self.text(&token)
    }

    /// Dispatch on the directive word. `ctx` selects which conditional
    /// instantiation a `#if`/`#ifdef` opens here.
    pub(crate) fn parse_preproc_item(&mut self, ctx: PreprocContext) -> Parsed<Node> {
        match self.directive_word() {
            "include" => self.parse_preproc_include(),
            "define" => self.parse_preproc_define(),
            "if" => self.parse_preproc_if(ctx),
            "ifdef" | "ifndef" => self.parse_preproc_ifdef(ctx),
            word if is_branch_word(word) => Err(self.error_here(ErrorCode::E1008)),
            _ => self.parse_preproc_call(),
        }
    }

    /// `#` plus the directive word, as one `preproc_directive` node.
    fn parse_directive(&mut self, b: &mut NodeBuilder, field: Option<FieldName>) {
        let mut d = NodeBuilder::new();
        self.bump(&mut d); // #
        if !self.at(TokenKind::Newline) && !self.at_eof() {
            self.bump(&mut d); // the word
        }
        let node = d.finish(NodeKind::PreprocDirective);
        match field {
            Some(field) => b.push_field(field, node),
            None => b.push_node(node),
        }
    }

    /// Attach the directive-terminating newline when present (absent only
    /// at end of file).
    fn newline_opt(&mut self, b: &mut NodeBuilder) {
        if self.at(TokenKind::Newline) {
            self.bump(b);
        }
    }

    fn parse_preproc_include(&mut self) -> Parsed<Node> {
        use TokenKind as T;
        let mut b = NodeBuilder::new();
        self.parse_directive(&mut b, None);
        match self.current_kind() {
            T::SystemLibString => {
                self.bump_leaf_field(&mut b, FieldName::Path, NodeKind::SystemLibString);
            }
            T::StringStart => {
                let path = self.parse_string_literal()?;
                b.push_field(FieldName::Path, path);
            }
            T::Identifier => {
                if self.peek_kind() == T::LParen {
                    let call = self.parse_preproc_call_expression()?;
                    b.push_field(FieldName::Path, call);
                } else {
                    self.bump_leaf_field(&mut b, FieldName::Path, NodeKind::Identifier);
                }
            }
            _ => return Err(self.error_here(ErrorCode::E1008)),
        }
        self.newline_opt(&mut b);
        Ok(b.finish(NodeKind::PreprocInclude))
    }

    /// Object-like or function-like `#define`; the lexer only produced a
    /// parameter list when the `(` was glued to the macro name.
    fn parse_preproc_define(&mut self) -> Parsed<Node> {
        use TokenKind as T;
        let mut b = NodeBuilder::new();
        self.parse_directive(&mut b, None);
        if !self.current_kind().is_word() {
            return Err(self.error_here(ErrorCode::E1004));
        }
        self.bump_leaf_field(&mut b, FieldName::Name, NodeKind::Identifier);
        let function_like = self.at(T::LParen);
        if function_like {
            let mut pb = NodeBuilder::new();
            self.bump(&mut pb); // (
            while !self.at(T::RParen) && !self.at(T::Newline) && !self.at_eof() {
                if self.at(T::Ellipsis) {
                    self.bump(&mut pb);
                } else if self.at(T::Identifier) {
                    let node = self.take_leaf(NodeKind::Identifier);
                    pb.push_node(node);
                } else {
                    return Err(self.error_here(ErrorCode::E1004));
                }
                if self.at(T::Comma) {
                    self.bump(&mut pb);
                } else {
                    break;
                }
            }
            self.expect(&mut pb, T::RParen, ErrorCode::E1003)?;
            b.push_field(FieldName::Parameters, pb.finish(NodeKind::PreprocParams));
        }
        if self.at(T::PreprocArg) {
            self.bump_leaf_field(&mut b, FieldName::Value, NodeKind::PreprocArg);
        }
        self.newline_opt(&mut b);
        Ok(b.finish(if function_like {
            NodeKind::PreprocFunctionDef
        } else {
            NodeKind::PreprocDef
        }))
    }

    /// Any other directive: `#pragma`, `#undef`, `#error`, `#warning`, …
    fn parse_preproc_call(&mut self) -> Parsed<Node> {
        let mut b = NodeBuilder::new();
        self.parse_directive(&mut b, Some(FieldName::Directive));
        if self.at(TokenKind::PreprocArg) {
            self.bump_leaf_field(&mut b, FieldName::Argument, NodeKind::PreprocArg);
        }
        self.newline_opt(&mut b);
        Ok(b.finish(NodeKind::PreprocCall))
    }

    // --- the conditional template ---

    fn parse_preproc_if(&mut self, ctx: PreprocContext) -> Parsed<Node> {
        let mut b = NodeBuilder::new();
        self.parse_directive(&mut b, None);
        let condition = self.parse_preproc_expression()?;
        b.push_field(FieldName::Condition, condition);
        self.newline_opt(&mut b);
        self.parse_preproc_body(&mut b, ctx)?;
        self.expect_endif(&mut b)?;
        Ok(b.finish(ctx.if_kind()))
    }

    fn parse_preproc_ifdef(&mut self, ctx: PreprocContext) -> Parsed<Node> {
        let mut b = NodeBuilder::new();
        self.parse_directive(&mut b, None);
        if !self.current_kind().is_word() {
            return Err(self.error_here(ErrorCode::E1004));
        }
        self.bump_leaf_field(&mut b, FieldName::Name, NodeKind::Identifier);
        self.newline_opt(&mut b);
        self.parse_preproc_body(&mut b, ctx)?;
        self.expect_endif(&mut b)?;
        Ok(b.finish(ctx.ifdef_kind()))
    }

    /// Content items up to a branch directive or `#endif`, then the
    /// optional alternative chain.
    fn parse_preproc_body(&mut self, b: &mut NodeBuilder, ctx: PreprocContext) -> Parsed<()> {
        self.parse_preproc_content(b, ctx)?;
        if self.at(TokenKind::Hash) {
            let word = self.directive_word();
            if is_branch_word(word) && word != "endif" {
                let alternative = self.parse_preproc_alternative(ctx)?;
                b.push_field(FieldName::Alternative, alternative);
            }
        }
        Ok(())
    }

    /// The per-context content loop. Every instantiation allows nested
    /// conditionals of its own context; a parser must be free to fork
    /// between "this closes the conditional" and "this begins a nested
    /// one" until the matching `#endif` arrives.
    fn parse_preproc_content(&mut self, b: &mut NodeBuilder, ctx: PreprocContext) -> Parsed<()> {
        use TokenKind as T;
        loop {
            if self.at_eof() {
                return Ok(());
            }
            if self.at(T::Hash) && is_branch_word(self.directive_word()) {
                return Ok(());
            }
            match ctx {
                PreprocContext::BlockItem => {
                    if self.at(T::RBrace) {
                        return Ok(());
                    }
                    self.parse_item_recovering(b, false);
                }
                PreprocContext::FieldDeclarationList => {
                    if self.at(T::RBrace) {
                        return Ok(());
                    }
                    let snapshot = self.snapshot();
                    let mark = b.len();
                    match self.parse_field_list_item() {
                        Ok(item) => b.push_node(item),
                        Err(error) => {
                            b.truncate(mark);
                            self.restore(snapshot);
                            let node = self.error_node(recovery::FIELD_BOUNDARY, &error);
                            b.push_node(node);
                            if self.at(T::Semicolon) {
                                self.bump(b);
                            }
                        }
                    }
                }
                PreprocContext::EnumeratorList => {
                    if self.at(T::RBrace) {
                        return Ok(());
                    }
                    if self.at(T::Hash) {
                        let node = self.parse_preproc_item(ctx)?;
                        b.push_node(node);
                        continue;
                    }
                    let enumerator = self.parse_enumerator()?;
                    b.push_node(enumerator);
                    // The comma instantiation owns each entry's comma; a
                    // missing one fails the whole candidate so the
                    // no-comma instantiation can take over.
                    self.expect(b, T::Comma, ErrorCode::E1001)?;
                }
                PreprocContext::EnumeratorListNoComma => {
                    if self.at(T::RBrace) {
                        return Ok(());
                    }
                    if self.at(T::Hash) {
                        let node = self.parse_preproc_item(ctx)?;
                        b.push_node(node);
                        continue;
                    }
                    let enumerator = self.parse_enumerator()?;
                    b.push_node(enumerator);
                }
            }
        }
    }

    /// One `#else` / `#elif` / `#elifdef` / `#elifndef` branch; the elif
    /// forms chain their own alternative recursively.
    fn parse_preproc_alternative(&mut self, ctx: PreprocContext) -> Parsed<Node> {
        let word = self.directive_word();
        match word {
            "else" => {
                let mut b = NodeBuilder::new();
                self.parse_directive(&mut b, None);
                self.newline_opt(&mut b);
                self.parse_preproc_content(&mut b, ctx)?;
                Ok(b.finish(ctx.else_kind()))
            }
            "elif" => {
                let mut b = NodeBuilder::new();
                self.parse_directive(&mut b, None);
                let condition = self.parse_preproc_expression()?;
                b.push_field(FieldName::Condition, condition);
                self.newline_opt(&mut b);
                self.parse_preproc_content(&mut b, ctx)?;
                if self.at(TokenKind::Hash)
                    && is_branch_word(self.directive_word())
                    && self.directive_word() != "endif"
                {
                    let alternative = self.parse_preproc_alternative(ctx)?;
                    b.push_field(FieldName::Alternative, alternative);
                }
                Ok(b.finish(ctx.elif_kind()))
            }
            "elifdef" | "elifndef" => {
                let mut b = NodeBuilder::new();
                self.parse_directive(&mut b, None);
                if !self.at(TokenKind::Identifier) {
                    return Err(self.error_here(ErrorCode::E1004));
                }
                self.bump_leaf_field(&mut b, FieldName::Name, NodeKind::Identifier);
                self.newline_opt(&mut b);
                self.parse_preproc_content(&mut b, ctx)?;
                if self.at(TokenKind::Hash)
                    && is_branch_word(self.directive_word())
                    && self.directive_word() != "endif"
                {
                    let alternative = self.parse_preproc_alternative(ctx)?;
                    b.push_field(FieldName::Alternative, alternative);
                }
                Ok(b.finish(ctx.elifdef_kind()))
            }
            _ => Err(self.error_here(ErrorCode::E1008)),
        }
    }

    fn expect_endif(&mut self, b: &mut NodeBuilder) -> Parsed<()> {
        if self.at(TokenKind::Hash) && self.directive_word() == "endif" {
            self.parse_directive(b, None);
            self.newline_opt(b);
            Ok(())
        } else {
            Err(self.error_here(ErrorCode::E1008))
        }
    }

    // --- the restricted preprocessor expression grammar ---

    pub(crate) fn parse_preproc_expression(&mut self) -> Parsed<Node> {
        self.parse_preproc_expr_bp(prec::LOGICAL_OR)
    }

    fn parse_preproc_expr_bp(&mut self, min_bp: i32) -> Parsed<Node> {
        let mut lhs = self.parse_preproc_prefix()?;
        while let Some(p) = prec::binary_precedence(self.current_kind()) {
            if p < min_bp {
                break;
            }
            let mut b = NodeBuilder::new();
            b.push_field(FieldName::Left, lhs);
            self.bump_field(&mut b, FieldName::Operator);
            let rhs = self.parse_preproc_expr_bp(p + 1)?;
            b.push_field(FieldName::Right, rhs);
            lhs = b.finish(NodeKind::BinaryExpression);
        }
        Ok(lhs)
    }

    fn parse_preproc_prefix(&mut self) -> Parsed<Node> {
        use TokenKind as T;
        match self.current_kind() {
            T::Bang | T::Tilde | T::Minus | T::Plus => {
                let mut b = NodeBuilder::new();
                self.bump_field(&mut b, FieldName::Operator);
                let argument = self.parse_preproc_expr_bp(prec::UNARY)?;
                b.push_field(FieldName::Argument, argument);
                Ok(b.finish(NodeKind::UnaryExpression))
            }
            T::NumberLiteral => Ok(self.take_leaf(NodeKind::NumberLiteral)),
            T::CharStart => {
                // Character constants are legal in conditions.
                let mut b = NodeBuilder::new();
                self.bump_field(&mut b, FieldName::Start);
                while matches!(self.current_kind(), T::Character | T::EscapeSequence) {
                    let kind = if self.at(T::Character) {
                        NodeKind::Character
                    } else {
                        NodeKind::EscapeSequence
                    };
                    let node = self.take_leaf(kind);
                    b.push_node(node);
                }
                if self.at(T::CharEnd) {
                    self.bump_field(&mut b, FieldName::End);
                }
                Ok(b.finish(NodeKind::CharLiteral))
            }
            T::Identifier if self.current_text() == "defined" => self.parse_preproc_defined(),
            T::Identifier => {
                if self.peek_kind() == T::LParen {
                    self.parse_preproc_call_expression()
                } else {
                    Ok(self.take_leaf(NodeKind::Identifier))
                }
            }
            T::LParen => {
                let mut b = NodeBuilder::new();
                self.bump(&mut b);
                let inner = self.parse_preproc_expression()?;
                b.push_node(inner);
                self.expect(&mut b, T::RParen, ErrorCode::E1003)?;
                Ok(b.finish(NodeKind::ParenthesizedExpression))
            }
            _ => Err(self.error_here(ErrorCode::E1002)),
        }
    }

    /// `defined(NAME)` or `defined NAME`.
    fn parse_preproc_defined(&mut self) -> Parsed<Node> {
        use TokenKind as T;
        let mut b = NodeBuilder::new();
        self.bump(&mut b); // defined
        if self.at(T::LParen) {
            self.bump(&mut b);
            if !self.at(T::Identifier) {
                return Err(self.error_here(ErrorCode::E1004));
            }
            let name = self.take_leaf(NodeKind::Identifier);
            b.push_node(name);
            self.expect(&mut b, T::RParen, ErrorCode::E1003)?;
        } else if self.at(T::Identifier) {
            let name = self.take_leaf(NodeKind::Identifier);
            b.push_node(name);
        } else {
            return Err(self.error_here(ErrorCode::E1004));
        }
        Ok(b.finish(NodeKind::PreprocDefined))
    }

    /// A bare macro-call shape: `FOO(a, b)` with preprocessor-expression
    /// arguments.
    fn parse_preproc_call_expression(&mut self) -> Parsed<Node> {
        use TokenKind as T;
        let mut b = NodeBuilder::new();
        self.bump_leaf_field(&mut b, FieldName::Function, NodeKind::Identifier);
        let mut ab = NodeBuilder::new();
        self.expect(&mut ab, T::LParen, ErrorCode::E1001)?;
        while !self.at(T::RParen) && !self.at(T::Newline) && !self.at_eof() {
            let argument = self.parse_preproc_expression()?;
            ab.push_node(argument);
            if self.at(T::Comma) {
                self.bump(&mut ab);
            } else {
                break;
            }
        }
        self.expect(&mut ab, T::RParen, ErrorCode::E1003)?;
        b.push_field(FieldName::Arguments, ab.finish(NodeKind::ArgumentList));
        Ok(b.finish(NodeKind::CallExpression))
    }
}
