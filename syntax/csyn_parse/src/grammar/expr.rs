//! Expressions.
//!
//! One Pratt loop over the static precedence ladder. Prefix operators bind
//! their operand at their own level (`! ~ - +` at UNARY, `* &` at CAST,
//! `sizeof` at SIZEOF); postfix call/field/subscript/update join in the
//! infix loop. Assignment and the conditional are right-associative and
//! sit below every binary operator; the comma expression exists only in
//! the slots that name it.
//!
//! A `(` in prefix position is the cast/call/grouping ambiguity: the
//! type-descriptor reading is attempted first and wins only when it
//! consumes the entire parenthesized region and a value (or an initializer
//! list, for compound literals) follows; otherwise the parenthesized
//! expression reading is restored.

use csyn_diagnostic::ErrorCode;
use csyn_grammar::{prec, RuleName};
use csyn_ir::{FieldName, Node, NodeKind, TokenKind};

use crate::{ensure_stack, NodeBuilder, Parsed, Parser};

/// Whether a token can begin an expression.
pub(crate) fn can_start_expression(kind: TokenKind) -> bool {
    use TokenKind as T;
    matches!(
        kind,
        T::Identifier
            | T::NumberLiteral
            | T::StringStart
            | T::CharStart
            | T::True
            | T::False
            | T::Null
            | T::LParen
            | T::Bang
            | T::Tilde
            | T::Minus
            | T::Plus
            | T::Star
            | T::Amp
            | T::PlusPlus
            | T::MinusMinus
            | T::Sizeof
            | T::Alignof
            | T::Offsetof
            | T::Generic
            | T::Asm
            | T::Extension
    )
}

/// Kinds acceptable on the left of an assignment operator.
fn is_assignment_target(kind: NodeKind) -> bool {
    matches!(
        kind,
        NodeKind::Identifier
            | NodeKind::CallExpression
            | NodeKind::FieldExpression
            | NodeKind::PointerExpression
            | NodeKind::SubscriptExpression
            | NodeKind::ParenthesizedExpression
    )
}

impl<'a> Parser<'a> {
    /// A full expression (no top-level comma).
    pub(crate) fn parse_expression(&mut self) -> Parsed<Node> {
        self.parse_expr_bp(prec::ASSIGNMENT)
    }

    /// An expression or a comma expression, for the slots that allow both.
    pub(crate) fn parse_expression_or_comma(&mut self) -> Parsed<Node> {
        let left = self.parse_expression()?;
        if !self.at(TokenKind::Comma) {
            return Ok(left);
        }
        let mut b = NodeBuilder::new();
        b.push_field(FieldName::Left, left);
        self.bump(&mut b);
        let right = self.parse_expression_or_comma()?;
        b.push_field(FieldName::Right, right);
        Ok(b.finish(NodeKind::CommaExpression))
    }

    fn parse_expr_bp(&mut self, min_bp: i32) -> Parsed<Node> {
        ensure_stack(|| self.parse_expr_bp_inner(min_bp))
    }

    fn parse_expr_bp_inner(&mut self, min_bp: i32) -> Parsed<Node> {
        use TokenKind as T;
        let mut lhs = self.parse_prefix_expression()?;
        loop {
            let kind = self.current_kind();
            if let Some(p) = prec::binary_precedence(kind) {
                if p < min_bp {
                    break;
                }
                let mut b = NodeBuilder::new();
                b.push_field(FieldName::Left, lhs);
                self.bump_field(&mut b, FieldName::Operator);
                let rhs = self.parse_expr_bp(p + 1)?;
                b.push_field(FieldName::Right, rhs);
                lhs = b.finish(NodeKind::BinaryExpression);
            } else if prec::is_assignment_operator(kind) {
                if prec::ASSIGNMENT < min_bp || !is_assignment_target(lhs.kind) {
                    break;
                }
                let mut b = NodeBuilder::new();
                b.push_field(FieldName::Left, lhs);
                self.bump_field(&mut b, FieldName::Operator);
                let rhs = self.parse_expr_bp(prec::ASSIGNMENT)?;
                b.push_field(FieldName::Right, rhs);
                lhs = b.finish(NodeKind::AssignmentExpression);
            } else if kind == T::Question {
                if prec::CONDITIONAL < min_bp {
                    break;
                }
                lhs = self.parse_conditional_tail(lhs)?;
            } else if kind == T::LParen {
                if prec::CALL < min_bp {
                    break;
                }
                let mut b = NodeBuilder::new();
                b.push_field(FieldName::Function, lhs);
                let arguments = self.parse_argument_list()?;
                b.push_field(FieldName::Arguments, arguments);
                lhs = b.finish(NodeKind::CallExpression);
            } else if kind == T::Dot || kind == T::Arrow {
                if prec::FIELD < min_bp {
                    break;
                }
                let mut b = NodeBuilder::new();
                b.push_field(FieldName::Argument, lhs);
                self.bump_field(&mut b, FieldName::Operator);
                self.expect_leaf_field(&mut b, FieldName::Field, NodeKind::FieldIdentifier)?;
                lhs = b.finish(NodeKind::FieldExpression);
            } else if kind == T::LBracket && !self.at_double_bracket(T::LBracket) {
                if prec::SUBSCRIPT < min_bp {
                    break;
                }
                let mut b = NodeBuilder::new();
                b.push_field(FieldName::Argument, lhs);
                self.bump(&mut b);
                let index = self.parse_expression()?;
                b.push_field(FieldName::Index, index);
                self.expect(&mut b, T::RBracket, ErrorCode::E1003)?;
                lhs = b.finish(NodeKind::SubscriptExpression);
            } else if kind == T::PlusPlus || kind == T::MinusMinus {
                if prec::UNARY < min_bp {
                    break;
                }
                let mut b = NodeBuilder::new();
                b.push_field(FieldName::Argument, lhs);
                self.bump_field(&mut b, FieldName::Operator);
                lhs = b.finish(NodeKind::UpdateExpression);
            } else {
                break;
            }
        }
        Ok(lhs)
    }

    /// `cond ? consequence : alternative`, with the GNU `cond ?: alt` form.
    fn parse_conditional_tail(&mut self, condition: Node) -> Parsed<Node> {
        let mut b = NodeBuilder::new();
        b.push_field(FieldName::Condition, condition);
        self.bump(&mut b); // ?
        if !self.at(TokenKind::Colon) {
            let consequence = self.parse_expression_or_comma()?;
            b.push_field(FieldName::Consequence, consequence);
        }
        self.expect(&mut b, TokenKind::Colon, ErrorCode::E1001)?;
        let alternative = self.parse_expr_bp(prec::CONDITIONAL)?;
        b.push_field(FieldName::Alternative, alternative);
        Ok(b.finish(NodeKind::ConditionalExpression))
    }

    #[allow(clippy::too_many_lines)]
    fn parse_prefix_expression(&mut self) -> Parsed<Node> {
        use TokenKind as T;
        match self.current_kind() {
            T::Bang | T::Tilde | T::Minus | T::Plus => {
                let mut b = NodeBuilder::new();
                self.bump_field(&mut b, FieldName::Operator);
                let argument = self.parse_expr_bp(prec::UNARY)?;
                b.push_field(FieldName::Argument, argument);
                Ok(b.finish(NodeKind::UnaryExpression))
            }
            T::Star | T::Amp => {
                let mut b = NodeBuilder::new();
                self.bump_field(&mut b, FieldName::Operator);
                let argument = self.parse_expr_bp(prec::CAST)?;
                b.push_field(FieldName::Argument, argument);
                Ok(b.finish(NodeKind::PointerExpression))
            }
            T::PlusPlus | T::MinusMinus => {
                let mut b = NodeBuilder::new();
                self.bump_field(&mut b, FieldName::Operator);
                let argument = self.parse_expr_bp(prec::UNARY)?;
                b.push_field(FieldName::Argument, argument);
                Ok(b.finish(NodeKind::UpdateExpression))
            }
            T::Sizeof => self.parse_sizeof_expression(),
            T::Alignof => self.parse_alignof_expression(),
            T::Offsetof => self.parse_offsetof_expression(),
            T::Generic => self.parse_generic_expression(),
            T::Asm => self.parse_gnu_asm_expression(),
            T::Extension => {
                let mut b = NodeBuilder::new();
                self.bump(&mut b);
                let inner = self.parse_expression()?;
                b.push_node(inner);
                Ok(b.finish(NodeKind::ExtensionExpression))
            }
            T::LParen => self.parse_paren_prefix(),
            T::Identifier => {
                let identifier = self.take_leaf(NodeKind::Identifier);
                if self.at(T::StringStart) {
                    self.parse_concatenated_string(identifier)
                } else {
                    Ok(identifier)
                }
            }
            T::NumberLiteral => Ok(self.take_leaf(NodeKind::NumberLiteral)),
            T::StringStart => {
                let string = self.parse_string_literal()?;
                if self.at(T::StringStart) || self.at(T::Identifier) {
                    self.parse_concatenated_string(string)
                } else {
                    Ok(string)
                }
            }
            T::CharStart => self.parse_char_literal(),
            T::True => Ok(self.take_leaf(NodeKind::True)),
            T::False => Ok(self.take_leaf(NodeKind::False)),
            T::Null => Ok(self.take_leaf(NodeKind::Null)),
            _ => Err(self.error_here(ErrorCode::E1002)),
        }
    }

    /// Prefix `(`: cast, compound literal, or grouping. Type first; the
    /// expression reading is the fallback.
    fn parse_paren_prefix(&mut self) -> Parsed<Node> {
        use crate::SpeculationKind as S;
        self.assert_conflict(&[RuleName::TypeSpecifier, RuleName::Expression]);
        if let Some(node) =
            self.try_parse_memo(S::CastFull, |p| p.parse_cast_or_compound_literal(true, true))
        {
            return Ok(node);
        }
        // Retry with struct/union/enum bodies suppressed: in
        // `(struct point){…}` the brace belongs to the compound-literal
        // initializer, not to the specifier.
        if let Some(node) = self.try_parse_memo(S::CastNoStructBody, |p| {
            p.parse_cast_or_compound_literal(true, false)
        }) {
            return Ok(node);
        }
        // Retry with the abstract declarator suppressed: in `(T)(x)` the
        // `(x)` must stay available as the cast operand instead of being
        // swallowed as a function-type suffix.
        if let Some(node) = self.try_parse_memo(S::CastNoAbstract, |p| {
            p.parse_cast_or_compound_literal(false, true)
        }) {
            return Ok(node);
        }
        self.parse_parenthesized_expression()
    }

    fn parse_cast_or_compound_literal(
        &mut self,
        allow_abstract: bool,
        allow_struct_body: bool,
    ) -> Parsed<Node> {
        let mut b = NodeBuilder::new();
        self.bump(&mut b); // (
        let saved = self.struct_body_allowed;
        self.struct_body_allowed = saved && allow_struct_body;
        let ty = self.parse_type_descriptor(allow_abstract);
        self.struct_body_allowed = saved;
        let ty = ty?;
        if !self.at(TokenKind::RParen) {
            return Err(self.error_here(ErrorCode::E1005));
        }
        b.push_field(FieldName::Type, ty);
        self.bump(&mut b); // )
        if self.at(TokenKind::LBrace) {
            let value = self.parse_initializer_list()?;
            b.push_field(FieldName::Value, value);
            Ok(b.finish(NodeKind::CompoundLiteralExpression))
        } else if can_start_expression(self.current_kind()) {
            let value = self.parse_expr_bp(prec::CAST)?;
            b.push_field(FieldName::Value, value);
            Ok(b.finish(NodeKind::CastExpression))
        } else {
            Err(self.error_here(ErrorCode::E1002))
        }
    }

    /// `( expression | comma_expression | compound_statement )` — the
    /// last arm covers GNU statement expressions.
    pub(crate) fn parse_parenthesized_expression(&mut self) -> Parsed<Node> {
        let mut b = NodeBuilder::new();
        self.expect(&mut b, TokenKind::LParen, ErrorCode::E1001)?;
        let inner = if self.at(TokenKind::LBrace) {
            self.parse_compound_statement()?
        } else {
            self.parse_expression_or_comma()?
        };
        b.push_node(inner);
        self.expect(&mut b, TokenKind::RParen, ErrorCode::E1003)?;
        Ok(b.finish(NodeKind::ParenthesizedExpression))
    }

    fn parse_sizeof_expression(&mut self) -> Parsed<Node> {
        let mut b = NodeBuilder::new();
        self.bump(&mut b);
        if self.at(TokenKind::LParen) {
            let type_arm = self.try_parse_memo(crate::SpeculationKind::SizeofType, |p| {
                let mut tb = NodeBuilder::new();
                p.bump(&mut tb); // (
                let ty = p.parse_type_descriptor(true)?;
                if !p.at(TokenKind::RParen) {
                    return Err(p.error_here(ErrorCode::E1005));
                }
                tb.push_field(FieldName::Type, ty);
                p.bump(&mut tb); // )
                Ok(tb)
            });
            if let Some(tb) = type_arm {
                b.append(tb);
                return Ok(b.finish(NodeKind::SizeofExpression));
            }
        }
        let value = self.parse_expr_bp(prec::SIZEOF)?;
        b.push_field(FieldName::Value, value);
        Ok(b.finish(NodeKind::SizeofExpression))
    }

    fn parse_alignof_expression(&mut self) -> Parsed<Node> {
        let mut b = NodeBuilder::new();
        self.bump(&mut b);
        self.expect(&mut b, TokenKind::LParen, ErrorCode::E1001)?;
        let ty = self.parse_type_descriptor(true)?;
        b.push_field(FieldName::Type, ty);
        self.expect(&mut b, TokenKind::RParen, ErrorCode::E1003)?;
        Ok(b.finish(NodeKind::AlignofExpression))
    }

    fn parse_offsetof_expression(&mut self) -> Parsed<Node> {
        let mut b = NodeBuilder::new();
        self.bump(&mut b);
        self.expect(&mut b, TokenKind::LParen, ErrorCode::E1001)?;
        let ty = self.parse_type_descriptor(true)?;
        b.push_field(FieldName::Type, ty);
        self.expect(&mut b, TokenKind::Comma, ErrorCode::E1001)?;
        self.expect_leaf_field(&mut b, FieldName::Member, NodeKind::FieldIdentifier)?;
        self.expect(&mut b, TokenKind::RParen, ErrorCode::E1003)?;
        Ok(b.finish(NodeKind::OffsetofExpression))
    }

    /// `_Generic(expr, type: expr, …)`
    fn parse_generic_expression(&mut self) -> Parsed<Node> {
        let mut b = NodeBuilder::new();
        self.bump(&mut b);
        self.expect(&mut b, TokenKind::LParen, ErrorCode::E1001)?;
        let controlling = self.parse_expression()?;
        b.push_node(controlling);
        self.expect(&mut b, TokenKind::Comma, ErrorCode::E1001)?;
        loop {
            let ty = self.parse_type_descriptor(true)?;
            b.push_node(ty);
            self.expect(&mut b, TokenKind::Colon, ErrorCode::E1001)?;
            let value = self.parse_expression()?;
            b.push_node(value);
            if self.at(TokenKind::Comma) {
                self.bump(&mut b);
            } else {
                break;
            }
        }
        self.expect(&mut b, TokenKind::RParen, ErrorCode::E1003)?;
        Ok(b.finish(NodeKind::GenericExpression))
    }

    /// `( arguments )`; compound statements are accepted as arguments so
    /// statement-taking macros still produce a usable tree.
    pub(crate) fn parse_argument_list(&mut self) -> Parsed<Node> {
        let mut b = NodeBuilder::new();
        self.expect(&mut b, TokenKind::LParen, ErrorCode::E1001)?;
        while !self.at(TokenKind::RParen) {
            let argument = if self.at(TokenKind::LBrace) {
                self.parse_compound_statement()?
            } else if self.current_kind().is_word()
                && !self.at(TokenKind::Identifier)
                && matches!(self.peek_kind(), TokenKind::Comma | TokenKind::RParen)
            {
                // Attribute arguments reuse keyword spellings:
                // `__attribute__((const))`, `__attribute__((noreturn))`.
                self.take_leaf(NodeKind::Identifier)
            } else {
                self.parse_expression()?
            };
            b.push_node(argument);
            if self.at(TokenKind::Comma) {
                self.bump(&mut b);
            } else {
                break;
            }
        }
        self.expect(&mut b, TokenKind::RParen, ErrorCode::E1003)?;
        Ok(b.finish(NodeKind::ArgumentList))
    }

    // --- initializers ---

    pub(crate) fn parse_initializer_list(&mut self) -> Parsed<Node> {
        use TokenKind as T;
        let mut b = NodeBuilder::new();
        self.expect(&mut b, T::LBrace, ErrorCode::E1001)?;
        while !self.at(T::RBrace) && !self.at_eof() {
            let item = if self.at(T::LBrace) {
                self.parse_initializer_list()?
            } else if self.at(T::Dot)
                || (self.at(T::LBracket) && !self.at_double_bracket(T::LBracket))
                || (self.at(T::Identifier) && self.peek_kind() == T::Colon)
            {
                self.parse_initializer_pair()?
            } else {
                self.parse_expression()?
            };
            b.push_node(item);
            if self.at(T::Comma) {
                self.bump(&mut b);
            } else {
                break;
            }
        }
        self.expect(&mut b, T::RBrace, ErrorCode::E1003)?;
        Ok(b.finish(NodeKind::InitializerList))
    }

    fn parse_initializer_pair(&mut self) -> Parsed<Node> {
        use TokenKind as T;
        let mut b = NodeBuilder::new();
        if self.at(T::Identifier) && self.peek_kind() == T::Colon {
            // Obsolete GNU `field: value` form.
            self.bump_leaf_field(&mut b, FieldName::Designator, NodeKind::FieldIdentifier);
            self.bump(&mut b); // :
            let value = self.parse_initializer_value()?;
            b.push_field(FieldName::Value, value);
            return Ok(b.finish(NodeKind::InitializerPair));
        }
        while self.at(T::Dot) || self.at(T::LBracket) {
            let designator = self.parse_designator()?;
            b.push_field(FieldName::Designator, designator);
        }
        self.expect(&mut b, T::Eq, ErrorCode::E1001)?;
        let value = self.parse_initializer_value()?;
        b.push_field(FieldName::Value, value);
        Ok(b.finish(NodeKind::InitializerPair))
    }

    fn parse_initializer_value(&mut self) -> Parsed<Node> {
        if self.at(TokenKind::LBrace) {
            self.parse_initializer_list()
        } else {
            self.parse_expression()
        }
    }

    fn parse_designator(&mut self) -> Parsed<Node> {
        use TokenKind as T;
        if self.at(T::Dot) {
            let mut b = NodeBuilder::new();
            self.bump(&mut b);
            self.expect_leaf_field(&mut b, FieldName::Field, NodeKind::FieldIdentifier)?;
            return Ok(b.finish(NodeKind::FieldDesignator));
        }
        let mut b = NodeBuilder::new();
        self.bump(&mut b); // [
        let first = self.parse_expression()?;
        if self.at(T::Ellipsis) {
            b.push_field(FieldName::Start, first);
            self.bump(&mut b);
            let end = self.parse_expression()?;
            b.push_field(FieldName::End, end);
            self.expect(&mut b, T::RBracket, ErrorCode::E1003)?;
            Ok(b.finish(NodeKind::SubscriptRangeDesignator))
        } else {
            b.push_node(first);
            self.expect(&mut b, T::RBracket, ErrorCode::E1003)?;
            Ok(b.finish(NodeKind::SubscriptDesignator))
        }
    }

    // --- string and character literals ---

    /// `start content/escape* end` assembled from the lexer's composite
    /// tokens; every escape stays its own inspectable node.
    pub(crate) fn parse_string_literal(&mut self) -> Parsed<Node> {
        use TokenKind as T;
        let mut b = NodeBuilder::new();
        if !self.at(T::StringStart) {
            return Err(self.error_here(ErrorCode::E1002));
        }
        self.bump_field(&mut b, FieldName::Start);
        loop {
            match self.current_kind() {
                T::StringContent => {
                    let node = self.take_leaf(NodeKind::StringContent);
                    b.push_node(node);
                }
                T::EscapeSequence => {
                    let node = self.take_leaf(NodeKind::EscapeSequence);
                    b.push_node(node);
                }
                _ => break,
            }
        }
        if self.at(T::StringEnd) {
            self.bump_field(&mut b, FieldName::End);
        }
        Ok(b.finish(NodeKind::StringLiteral))
    }

    fn parse_char_literal(&mut self) -> Parsed<Node> {
        use TokenKind as T;
        let mut b = NodeBuilder::new();
        self.bump_field(&mut b, FieldName::Start);
        loop {
            match self.current_kind() {
                T::Character => {
                    let node = self.take_leaf(NodeKind::Character);
                    b.push_node(node);
                }
                T::EscapeSequence => {
                    let node = self.take_leaf(NodeKind::EscapeSequence);
                    b.push_node(node);
                }
                _ => break,
            }
        }
        if self.at(T::CharEnd) {
            self.bump_field(&mut b, FieldName::End);
        }
        Ok(b.finish(NodeKind::CharLiteral))
    }

    /// Adjacent strings (and macro identifiers like `PRIu64`) concatenate.
    fn parse_concatenated_string(&mut self, first: Node) -> Parsed<Node> {
        use TokenKind as T;
        let mut b = NodeBuilder::new();
        b.push_node(first);
        loop {
            if self.at(T::StringStart) {
                let string = self.parse_string_literal()?;
                b.push_node(string);
            } else if self.at(T::Identifier) {
                let node = self.take_leaf(NodeKind::Identifier);
                b.push_node(node);
            } else {
                break;
            }
        }
        Ok(b.finish(NodeKind::ConcatenatedString))
    }

    /// `_string`: a string literal or a concatenation, for asm templates
    /// and clobber lists.
    pub(crate) fn parse_string_expression(&mut self) -> Parsed<Node> {
        let string = self.parse_string_literal()?;
        if self.at(TokenKind::StringStart) || self.at(TokenKind::Identifier) {
            self.parse_concatenated_string(string)
        } else {
            Ok(string)
        }
    }

    // --- GNU inline assembly ---

    pub(crate) fn parse_gnu_asm_expression(&mut self) -> Parsed<Node> {
        use TokenKind as T;
        let mut b = NodeBuilder::new();
        self.bump(&mut b); // asm
        while matches!(self.current_kind(), T::Volatile | T::Inline | T::Goto) {
            let qualifier = self.take_leaf(NodeKind::GnuAsmQualifier);
            b.push_node(qualifier);
        }
        self.expect(&mut b, T::LParen, ErrorCode::E1001)?;
        let template = self.parse_string_expression()?;
        b.push_field(FieldName::AssemblyCode, template);
        if self.at(T::Colon) {
            let outputs = self.parse_gnu_asm_operand_list(NodeKind::GnuAsmOutputOperandList)?;
            b.push_field(FieldName::OutputOperands, outputs);
            if self.at(T::Colon) {
                let inputs = self.parse_gnu_asm_operand_list(NodeKind::GnuAsmInputOperandList)?;
                b.push_field(FieldName::InputOperands, inputs);
                if self.at(T::Colon) {
                    let clobbers = self.parse_gnu_asm_clobber_list()?;
                    b.push_field(FieldName::Clobbers, clobbers);
                    if self.at(T::Colon) {
                        let labels = self.parse_gnu_asm_goto_list()?;
                        b.push_field(FieldName::GotoLabels, labels);
                    }
                }
            }
        }
        self.expect(&mut b, T::RParen, ErrorCode::E1003)?;
        Ok(b.finish(NodeKind::GnuAsmExpression))
    }

    fn parse_gnu_asm_operand_list(&mut self, kind: NodeKind) -> Parsed<Node> {
        use TokenKind as T;
        let operand_kind = if kind == NodeKind::GnuAsmOutputOperandList {
            NodeKind::GnuAsmOutputOperand
        } else {
            NodeKind::GnuAsmInputOperand
        };
        let mut b = NodeBuilder::new();
        self.bump(&mut b); // :
        while self.at(T::LBracket) || self.at(T::StringStart) {
            let mut ob = NodeBuilder::new();
            if self.at(T::LBracket) {
                self.bump(&mut ob);
                self.expect_leaf_field(&mut ob, FieldName::Symbol, NodeKind::Identifier)?;
                self.expect(&mut ob, T::RBracket, ErrorCode::E1003)?;
            }
            let constraint = self.parse_string_literal()?;
            ob.push_field(FieldName::Constraint, constraint);
            self.expect(&mut ob, T::LParen, ErrorCode::E1001)?;
            let value = self.parse_expression()?;
            ob.push_field(FieldName::Value, value);
            self.expect(&mut ob, T::RParen, ErrorCode::E1003)?;
            b.push_field(FieldName::Operand, ob.finish(operand_kind));
            if self.at(T::Comma) {
                self.bump(&mut b);
            } else {
                break;
            }
        }
        Ok(b.finish(kind))
    }

    fn parse_gnu_asm_clobber_list(&mut self) -> Parsed<Node> {
        let mut b = NodeBuilder::new();
        self.bump(&mut b); // :
        while self.at(TokenKind::StringStart) {
            let register = self.parse_string_expression()?;
            b.push_field(FieldName::Register, register);
            if self.at(TokenKind::Comma) {
                self.bump(&mut b);
            } else {
                break;
            }
        }
        Ok(b.finish(NodeKind::GnuAsmClobberList))
    }

    fn parse_gnu_asm_goto_list(&mut self) -> Parsed<Node> {
        let mut b = NodeBuilder::new();
        self.bump(&mut b); // :
        while self.at(TokenKind::Identifier) {
            self.bump_leaf_field(&mut b, FieldName::Label, NodeKind::Identifier);
            if self.at(TokenKind::Comma) {
                self.bump(&mut b);
            } else {
                break;
            }
        }
        Ok(b.finish(NodeKind::GnuAsmGotoList))
    }
}
