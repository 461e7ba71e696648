//! The token scanner.
//!
//! One forward pass over the source. Outside of preprocessor lines the
//! scanner is context-free; a `#` at the start of a logical line switches it
//! into a directive mode that controls how the rest of that line is lexed
//! (macro name, adjacent parameter list, opaque argument, include path, or
//! ordinary tokens for conditionals). An unescaped newline ends the
//! directive line and is emitted as a `Newline` token; everywhere else
//! newlines are plain whitespace.
//!
//! Backslash-newline is a line continuation in every mode, including inside
//! directive arguments and line comments.

use csyn_diagnostic::{Diagnostic, ErrorCode};
use csyn_ir::{Span, Token, TokenKind, TokenList};

use crate::cursor::Cursor;
use crate::keywords;

/// What the rest of the current line means, after a directive marker.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
enum Mode {
    /// Ordinary C tokens; newlines are whitespace.
    Normal,
    /// Just consumed a line-start `#`; the next word names the directive.
    Directive,
    /// `#define`: the next identifier is the macro name.
    DefineName,
    /// Function-like `#define` parameter list, up to the closing `)`.
    DefineParams,
    /// Opaque directive body, one `PreprocArg` token to end of line.
    Arg,
    /// `#include` path: `<…>` lexes as one `SystemLibString` token.
    IncludePath,
    /// Ordinary tokens until end of line (`#if` conditions etc.).
    Line,
}

/// 256-entry table of ASCII identifier-continue bytes
/// (`A`-`Z`, `a`-`z`, `0`-`9`, `_`, `$`).
const IDENT_CONTINUE: [bool; 256] = {
    let mut table = [false; 256];
    let mut b = 0usize;
    while b < 256 {
        table[b] = (b >= b'a' as usize && b <= b'z' as usize)
            || (b >= b'A' as usize && b <= b'Z' as usize)
            || (b >= b'0' as usize && b <= b'9' as usize)
            || b == b'_' as usize
            || b == b'$' as usize;
        b += 1;
    }
    table
};

#[inline]
fn is_ident_continue(b: u8) -> bool {
    IDENT_CONTINUE[b as usize]
}

#[inline]
fn is_ident_start(b: u8) -> bool {
    is_ident_continue(b) && !b.is_ascii_digit()
}

#[inline]
fn is_digit(b: u8) -> bool {
    b.is_ascii_digit()
}

#[inline]
fn is_hex_digit(b: u8) -> bool {
    b.is_ascii_hexdigit()
}

#[inline]
fn is_number_suffix(b: u8) -> bool {
    matches!(
        b,
        b'u' | b'U' | b'l' | b'L' | b'w' | b'W' | b'f' | b'F' | b'b' | b'B' | b'd' | b'D'
    )
}

pub(crate) struct Scanner<'a> {
    cursor: Cursor<'a>,
    tokens: TokenList,
    diagnostics: Vec<Diagnostic>,
    mode: Mode,
    /// Only whitespace and comments since the last newline.
    at_line_start: bool,
}

impl<'a> Scanner<'a> {
    pub(crate) fn new(source: &'a str) -> Self {
        Scanner {
            cursor: Cursor::new(source),
            tokens: TokenList::new(),
            diagnostics: Vec::new(),
            mode: Mode::Normal,
            at_line_start: true,
        }
    }

    pub(crate) fn run(mut self) -> (TokenList, Vec<Diagnostic>) {
        loop {
            self.skip_whitespace();

            if self.mode != Mode::Normal && self.cursor.current() == b'\n' {
                let start = self.cursor.pos();
                self.cursor.advance();
                self.tokens
                    .push(Token::new(TokenKind::Newline, Span::new(start, start + 1)));
                self.mode = Mode::Normal;
                self.at_line_start = true;
                continue;
            }

            if self.cursor.is_eof() {
                break;
            }

            match self.mode {
                Mode::Normal | Mode::Line | Mode::DefineParams => {
                    self.scan_token();
                    if self.mode == Mode::DefineParams
                        && self.last_kind() == Some(TokenKind::RParen)
                    {
                        self.mode = Mode::Arg;
                    }
                }
                Mode::Directive => self.scan_directive_word(),
                Mode::DefineName => self.scan_define_name(),
                Mode::Arg => self.scan_preproc_arg(),
                Mode::IncludePath => self.scan_include_path(),
            }
        }
        self.tokens.finish(self.cursor.pos());
        (self.tokens, self.diagnostics)
    }

    fn last_kind(&self) -> Option<TokenKind> {
        let len = self.tokens.len();
        if len == 0 {
            None
        } else {
            self.tokens.get(len - 1).map(|t| t.kind)
        }
    }

    /// Skip horizontal whitespace and `\`-newline continuations; in
    /// `Normal` mode newlines are whitespace too.
    fn skip_whitespace(&mut self) {
        loop {
            match self.cursor.current() {
                b' ' | b'\t' | b'\r' | 0x0b | 0x0c => self.cursor.advance(),
                b'\n' if self.mode == Mode::Normal => {
                    self.cursor.advance();
                    self.at_line_start = true;
                }
                b'\\' if self.cursor.peek() == b'\n' => self.cursor.advance_n(2),
                b'\\' if self.cursor.peek() == b'\r' && self.cursor.peek2() == b'\n' => {
                    self.cursor.advance_n(3);
                }
                _ => break,
            }
        }
    }

    fn push(&mut self, kind: TokenKind, start: u32) {
        let span = Span::new(start, self.cursor.pos());
        self.tokens.push(Token::new(kind, span));
        if kind != TokenKind::Comment {
            self.at_line_start = false;
        }
    }

    fn error_token(&mut self, code: ErrorCode) {
        let start = self.cursor.pos();
        self.cursor.advance_char();
        self.push(TokenKind::Error, start);
        self.diagnostics.push(
            Diagnostic::error(code).with_label(Span::new(start, self.cursor.pos()), "here"),
        );
    }

    // --- directive modes ---

    fn scan_directive_word(&mut self) {
        if !is_ident_start(self.cursor.current()) && !self.cursor.current().is_ascii_digit() {
            // `#` followed by something that is not a directive word; lex
            // the rest of the line normally and let the parser report it.
            self.mode = Mode::Line;
            self.scan_token();
            return;
        }
        let start = self.cursor.pos();
        self.cursor.eat_while(is_ident_continue);
        let text = self.cursor.slice(start, self.cursor.pos());
        self.mode = match text {
            "define" => Mode::DefineName,
            "include" => Mode::IncludePath,
            "if" | "ifdef" | "ifndef" | "elif" | "elifdef" | "elifndef" | "else" | "endif" => {
                Mode::Line
            }
            _ => Mode::Arg,
        };
        let kind = keywords::lookup(text).unwrap_or(TokenKind::Identifier);
        self.push(kind, start);
    }

    fn scan_define_name(&mut self) {
        if !is_ident_start(self.cursor.current()) {
            self.mode = Mode::Arg;
            return;
        }
        self.scan_identifier();
        // A parameter list only counts when the `(` is glued to the name.
        self.mode = if self.cursor.current() == b'(' {
            Mode::DefineParams
        } else {
            Mode::Arg
        };
    }

    /// One opaque token covering the directive body up to (not including)
    /// an unescaped newline or a trailing block comment.
    fn scan_preproc_arg(&mut self) {
        if self.cursor.current() == b'/'
            && (self.cursor.peek() == b'*' || self.cursor.peek() == b'/')
        {
            // A comment at the start of the body is a comment, not an arg.
            self.scan_comment();
            return;
        }
        let start = self.cursor.pos();
        loop {
            match self.cursor.current() {
                0 if self.cursor.is_eof() => break,
                b'\n' => break,
                b'\\' if self.cursor.peek() == b'\n' => self.cursor.advance_n(2),
                b'\\' if self.cursor.peek() == b'\r' && self.cursor.peek2() == b'\n' => {
                    self.cursor.advance_n(3);
                }
                b'/' if self.cursor.peek() == b'*' => break,
                _ => self.cursor.advance_char(),
            }
        }
        if self.cursor.pos() > start {
            self.push(TokenKind::PreprocArg, start);
        }
    }

    fn scan_include_path(&mut self) {
        if self.cursor.current() == b'<' {
            let start = self.cursor.pos();
            self.cursor.advance();
            loop {
                match self.cursor.current() {
                    0 if self.cursor.is_eof() => break,
                    b'\n' => break,
                    b'\\' if self.cursor.peek() == b'>' => self.cursor.advance_n(2),
                    b'>' => {
                        self.cursor.advance();
                        break;
                    }
                    _ => self.cursor.advance_char(),
                }
            }
            self.push(TokenKind::SystemLibString, start);
            self.mode = Mode::Line;
            return;
        }
        // `"file.h"`, a macro name, or a macro call: ordinary tokens.
        self.mode = Mode::Line;
        self.scan_token();
    }

    // --- ordinary tokens ---

    #[allow(clippy::too_many_lines)]
    fn scan_token(&mut self) {
        let start = self.cursor.pos();
        match self.cursor.current() {
            b'#' => {
                self.cursor.advance();
                if self.at_line_start {
                    self.mode = Mode::Directive;
                }
                self.push(TokenKind::Hash, start);
            }
            b'"' => self.scan_string(0),
            b'\'' => self.scan_char(0),
            b'L' | b'U' => match self.cursor.peek() {
                b'"' => self.scan_string(1),
                b'\'' => self.scan_char(1),
                _ => self.scan_identifier(),
            },
            b'u' => {
                if self.cursor.peek() == b'8' && self.cursor.peek2() == b'"' {
                    self.scan_string(2);
                } else if self.cursor.peek() == b'8' && self.cursor.peek2() == b'\'' {
                    self.scan_char(2);
                } else {
                    match self.cursor.peek() {
                        b'"' => self.scan_string(1),
                        b'\'' => self.scan_char(1),
                        _ => self.scan_identifier(),
                    }
                }
            }
            b'0'..=b'9' => self.scan_number(),
            b'.' => {
                if is_digit(self.cursor.peek()) {
                    self.scan_number();
                } else if self.cursor.peek() == b'.' && self.cursor.peek2() == b'.' {
                    self.cursor.advance_n(3);
                    self.push(TokenKind::Ellipsis, start);
                } else {
                    self.cursor.advance();
                    self.push(TokenKind::Dot, start);
                }
            }
            b'/' => match self.cursor.peek() {
                b'/' | b'*' => self.scan_comment(),
                b'=' => {
                    self.cursor.advance_n(2);
                    self.push(TokenKind::SlashEq, start);
                }
                _ => {
                    self.cursor.advance();
                    self.push(TokenKind::Slash, start);
                }
            },
            b'<' => {
                if self.cursor.peek() == b'<' && self.cursor.peek2() == b'=' {
                    self.cursor.advance_n(3);
                    self.push(TokenKind::ShlEq, start);
                } else if self.cursor.peek() == b'<' {
                    self.cursor.advance_n(2);
                    self.push(TokenKind::Shl, start);
                } else if self.cursor.peek() == b'=' {
                    self.cursor.advance_n(2);
                    self.push(TokenKind::LtEq, start);
                } else {
                    self.cursor.advance();
                    self.push(TokenKind::Lt, start);
                }
            }
            b'>' => {
                if self.cursor.peek() == b'>' && self.cursor.peek2() == b'=' {
                    self.cursor.advance_n(3);
                    self.push(TokenKind::ShrEq, start);
                } else if self.cursor.peek() == b'>' {
                    self.cursor.advance_n(2);
                    self.push(TokenKind::Shr, start);
                } else if self.cursor.peek() == b'=' {
                    self.cursor.advance_n(2);
                    self.push(TokenKind::GtEq, start);
                } else {
                    self.cursor.advance();
                    self.push(TokenKind::Gt, start);
                }
            }
            b'+' => match self.cursor.peek() {
                b'+' => {
                    self.cursor.advance_n(2);
                    self.push(TokenKind::PlusPlus, start);
                }
                b'=' => {
                    self.cursor.advance_n(2);
                    self.push(TokenKind::PlusEq, start);
                }
                _ => {
                    self.cursor.advance();
                    self.push(TokenKind::Plus, start);
                }
            },
            b'-' => match self.cursor.peek() {
                b'-' => {
                    self.cursor.advance_n(2);
                    self.push(TokenKind::MinusMinus, start);
                }
                b'=' => {
                    self.cursor.advance_n(2);
                    self.push(TokenKind::MinusEq, start);
                }
                b'>' => {
                    self.cursor.advance_n(2);
                    self.push(TokenKind::Arrow, start);
                }
                _ => {
                    self.cursor.advance();
                    self.push(TokenKind::Minus, start);
                }
            },
            b'*' => {
                if self.cursor.peek() == b'=' {
                    self.cursor.advance_n(2);
                    self.push(TokenKind::StarEq, start);
                } else {
                    self.cursor.advance();
                    self.push(TokenKind::Star, start);
                }
            }
            b'%' => {
                if self.cursor.peek() == b'=' {
                    self.cursor.advance_n(2);
                    self.push(TokenKind::PercentEq, start);
                } else {
                    self.cursor.advance();
                    self.push(TokenKind::Percent, start);
                }
            }
            b'&' => match self.cursor.peek() {
                b'&' => {
                    self.cursor.advance_n(2);
                    self.push(TokenKind::AmpAmp, start);
                }
                b'=' => {
                    self.cursor.advance_n(2);
                    self.push(TokenKind::AmpEq, start);
                }
                _ => {
                    self.cursor.advance();
                    self.push(TokenKind::Amp, start);
                }
            },
            b'|' => match self.cursor.peek() {
                b'|' => {
                    self.cursor.advance_n(2);
                    self.push(TokenKind::PipePipe, start);
                }
                b'=' => {
                    self.cursor.advance_n(2);
                    self.push(TokenKind::PipeEq, start);
                }
                _ => {
                    self.cursor.advance();
                    self.push(TokenKind::Pipe, start);
                }
            },
            b'^' => {
                if self.cursor.peek() == b'=' {
                    self.cursor.advance_n(2);
                    self.push(TokenKind::CaretEq, start);
                } else {
                    self.cursor.advance();
                    self.push(TokenKind::Caret, start);
                }
            }
            b'!' => {
                if self.cursor.peek() == b'=' {
                    self.cursor.advance_n(2);
                    self.push(TokenKind::BangEq, start);
                } else {
                    self.cursor.advance();
                    self.push(TokenKind::Bang, start);
                }
            }
            b'=' => {
                if self.cursor.peek() == b'=' {
                    self.cursor.advance_n(2);
                    self.push(TokenKind::EqEq, start);
                } else {
                    self.cursor.advance();
                    self.push(TokenKind::Eq, start);
                }
            }
            b'~' => {
                self.cursor.advance();
                self.push(TokenKind::Tilde, start);
            }
            b'?' => {
                self.cursor.advance();
                self.push(TokenKind::Question, start);
            }
            b':' => {
                if self.cursor.peek() == b':' {
                    self.cursor.advance_n(2);
                    self.push(TokenKind::ColonColon, start);
                } else {
                    self.cursor.advance();
                    self.push(TokenKind::Colon, start);
                }
            }
            b';' => {
                self.cursor.advance();
                self.push(TokenKind::Semicolon, start);
            }
            b',' => {
                self.cursor.advance();
                self.push(TokenKind::Comma, start);
            }
            b'(' => {
                self.cursor.advance();
                self.push(TokenKind::LParen, start);
            }
            b')' => {
                self.cursor.advance();
                self.push(TokenKind::RParen, start);
            }
            b'{' => {
                self.cursor.advance();
                self.push(TokenKind::LBrace, start);
            }
            b'}' => {
                self.cursor.advance();
                self.push(TokenKind::RBrace, start);
            }
            b'[' => {
                self.cursor.advance();
                self.push(TokenKind::LBracket, start);
            }
            b']' => {
                self.cursor.advance();
                self.push(TokenKind::RBracket, start);
            }
            b'\\' => {
                if matches!(self.cursor.peek(), b'u' | b'U') {
                    // Identifier starting with a universal character name.
                    if self.ucn_length().is_some() {
                        self.scan_identifier();
                    } else {
                        self.error_token(ErrorCode::E0005);
                    }
                } else {
                    self.error_token(ErrorCode::E0001);
                }
            }
            b if is_ident_start(b) => self.scan_identifier(),
            b if b >= 0x80 => {
                if self.cursor.current_char().is_some_and(char::is_alphabetic) {
                    self.scan_identifier();
                } else {
                    self.error_token(ErrorCode::E0001);
                }
            }
            _ => self.error_token(ErrorCode::E0001),
        }
    }

    /// Byte length of a well-formed `\uXXXX` / `\UXXXXXXXX` escape at the
    /// current position, if any.
    fn ucn_length(&self) -> Option<usize> {
        let digits = match self.cursor.peek() {
            b'u' => 4,
            b'U' => 8,
            _ => return None,
        };
        for i in 0..digits {
            if !is_hex_digit(self.cursor.peek_n(2 + i)) {
                return None;
            }
        }
        Some(2 + digits)
    }

    fn scan_identifier(&mut self) {
        let start = self.cursor.pos();
        loop {
            let b = self.cursor.current();
            if is_ident_continue(b) {
                self.cursor.advance();
            } else if b == b'\\' {
                match self.ucn_length() {
                    Some(len) => self.cursor.advance_n(len),
                    None => break,
                }
            } else if b >= 0x80 {
                if self.cursor.current_char().is_some_and(char::is_alphanumeric) {
                    self.cursor.advance_char();
                } else {
                    break;
                }
            } else {
                break;
            }
        }
        let text = self.cursor.slice(start, self.cursor.pos());
        let kind = keywords::lookup(text).unwrap_or(TokenKind::Identifier);
        self.push(kind, start);
    }

    fn scan_number(&mut self) {
        let start = self.cursor.pos();
        let mut hex = false;
        if self.cursor.current() == b'0' && matches!(self.cursor.peek(), b'x' | b'X') {
            hex = true;
            self.cursor.advance_n(2);
            self.eat_digits(is_hex_digit);
        } else if self.cursor.current() == b'0' && matches!(self.cursor.peek(), b'b' | b'B') {
            self.cursor.advance_n(2);
            self.eat_digits(is_digit);
        } else if self.cursor.current() == b'.' {
            // Leading-dot literal: `.5`.
            self.cursor.advance();
            self.eat_digits(is_digit);
        } else {
            self.eat_digits(is_digit);
        }

        // Fraction — but `1...2` must leave the ellipsis alone.
        if self.cursor.current() == b'.' && self.cursor.peek() != b'.' {
            self.cursor.advance();
            if hex {
                self.eat_digits(is_hex_digit);
            } else {
                self.eat_digits(is_digit);
            }
        }

        // Exponent with optional sign.
        if matches!(self.cursor.current(), b'e' | b'E' | b'p' | b'P') {
            self.cursor.advance();
            if matches!(self.cursor.current(), b'+' | b'-') && is_digit(self.cursor.peek()) {
                self.cursor.advance();
            }
            self.eat_digits(is_hex_digit);
        }

        self.cursor.eat_while(is_number_suffix);
        self.push(TokenKind::NumberLiteral, start);
    }

    /// Digits with `'` separators; a separator must be followed by a digit.
    fn eat_digits(&mut self, digit: impl Fn(u8) -> bool + Copy) {
        loop {
            if digit(self.cursor.current()) {
                self.cursor.advance();
            } else if self.cursor.current() == b'\'' && digit(self.cursor.peek()) {
                self.cursor.advance_n(2);
            } else {
                break;
            }
        }
    }

    fn scan_comment(&mut self) {
        let start = self.cursor.pos();
        if self.cursor.peek() == b'/' {
            self.cursor.advance_n(2);
            loop {
                match self.cursor.current() {
                    0 if self.cursor.is_eof() => break,
                    b'\n' => break,
                    b'\\' => {
                        // `\` escapes the following character, including a
                        // newline (line-continued comment).
                        self.cursor.advance();
                        if self.cursor.current() == b'\r' && self.cursor.peek() == b'\n' {
                            self.cursor.advance_n(2);
                        } else if !self.cursor.is_eof() {
                            self.cursor.advance_char();
                        }
                    }
                    _ => self.cursor.advance_char(),
                }
            }
        } else {
            self.cursor.advance_n(2);
            // Non-greedy scan to the first `*/`.
            loop {
                match self.cursor.find_byte(b'*') {
                    Some(star) => {
                        self.cursor.set_pos(star + 1);
                        if self.cursor.current() == b'/' {
                            self.cursor.advance();
                            break;
                        }
                    }
                    None => {
                        self.cursor.eat_while(|_| true);
                        self.diagnostics.push(
                            Diagnostic::error(ErrorCode::E0002)
                                .with_label(Span::new(start, start + 2), "opened here"),
                        );
                        break;
                    }
                }
            }
        }
        self.push(TokenKind::Comment, start);
    }

    fn scan_string(&mut self, prefix_len: usize) {
        let start = self.cursor.pos();
        self.cursor.advance_n(prefix_len + 1);
        self.push(TokenKind::StringStart, start);
        loop {
            match self.cursor.current() {
                0 if self.cursor.is_eof() => {
                    self.unterminated(ErrorCode::E0003, start);
                    break;
                }
                b'\n' => {
                    self.unterminated(ErrorCode::E0003, start);
                    break;
                }
                b'"' => {
                    let end_start = self.cursor.pos();
                    self.cursor.advance();
                    self.push(TokenKind::StringEnd, end_start);
                    break;
                }
                b'\\' => self.scan_escape_sequence(),
                _ => {
                    let run_start = self.cursor.pos();
                    match self.cursor.find_byte3(b'"', b'\\', b'\n') {
                        Some(stop) => self.cursor.set_pos(stop),
                        None => self.cursor.eat_while(|_| true),
                    }
                    self.push(TokenKind::StringContent, run_start);
                }
            }
        }
    }

    fn scan_char(&mut self, prefix_len: usize) {
        let start = self.cursor.pos();
        self.cursor.advance_n(prefix_len + 1);
        self.push(TokenKind::CharStart, start);
        loop {
            match self.cursor.current() {
                0 if self.cursor.is_eof() => {
                    self.unterminated(ErrorCode::E0004, start);
                    break;
                }
                b'\n' => {
                    self.unterminated(ErrorCode::E0004, start);
                    break;
                }
                b'\'' => {
                    let end_start = self.cursor.pos();
                    self.cursor.advance();
                    self.push(TokenKind::CharEnd, end_start);
                    break;
                }
                b'\\' => self.scan_escape_sequence(),
                _ => {
                    let ch_start = self.cursor.pos();
                    self.cursor.advance_char();
                    self.push(TokenKind::Character, ch_start);
                }
            }
        }
    }

    fn unterminated(&mut self, code: ErrorCode, opened_at: u32) {
        self.diagnostics.push(
            Diagnostic::error(code)
                .with_label(Span::new(opened_at, opened_at + 1), "opened here"),
        );
    }

    /// `\` plus one escape body: `x` + 1-4 hex, `u` + 4 hex, `U` + 8 hex,
    /// 1-3 octal digits, or any single character (including a newline).
    fn scan_escape_sequence(&mut self) {
        let start = self.cursor.pos();
        self.cursor.advance();
        match self.cursor.current() {
            b'x' => {
                self.cursor.advance();
                let mut n = 0;
                while n < 4 && is_hex_digit(self.cursor.current()) {
                    self.cursor.advance();
                    n += 1;
                }
            }
            b'u' => {
                self.cursor.advance();
                let mut n = 0;
                while n < 4 && is_hex_digit(self.cursor.current()) {
                    self.cursor.advance();
                    n += 1;
                }
            }
            b'U' => {
                self.cursor.advance();
                let mut n = 0;
                while n < 8 && is_hex_digit(self.cursor.current()) {
                    self.cursor.advance();
                    n += 1;
                }
            }
            b'0'..=b'9' => {
                let mut n = 0;
                while n < 3 && is_digit(self.cursor.current()) {
                    self.cursor.advance();
                    n += 1;
                }
            }
            b'\r' if self.cursor.peek() == b'\n' => self.cursor.advance_n(2),
            0 if self.cursor.is_eof() => {}
            _ => self.cursor.advance_char(),
        }
        self.push(TokenKind::EscapeSequence, start);
    }
}
