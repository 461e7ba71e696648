//! Hand-written C lexer.
//!
//! Produces a [`TokenList`] plus the lexical diagnostics encountered along
//! the way. Lexing never fails: bytes no pattern accepts become `Error`
//! tokens with an `E0001` diagnostic and scanning resumes one character
//! later, so a single bad byte cannot take down the rest of the file.
//!
//! Whitespace is dropped; comments are kept as tokens. Preprocessor
//! directives switch the scanner into line modes (see `scanner.rs`) so that
//! `#define` bodies lex as one opaque token, `<stdio.h>` lexes as one
//! system-lib-string, and directive lines terminate with an explicit
//! `Newline` token.

mod cursor;
mod keywords;
mod scanner;

use csyn_diagnostic::Diagnostic;
use csyn_ir::TokenList;

/// Everything the lexer produced for one source buffer.
#[derive(Clone, Debug)]
pub struct LexResult {
    pub tokens: TokenList,
    pub diagnostics: Vec<Diagnostic>,
}

impl LexResult {
    /// Whether any lexical diagnostics were emitted.
    pub fn has_errors(&self) -> bool {
        !self.diagnostics.is_empty()
    }
}

/// Lex a source buffer into tokens.
///
/// # Panics
///
/// Panics if the source is longer than `u32::MAX` bytes; spans are 32-bit.
pub fn lex(source: &str) -> LexResult {
    assert!(
        u32::try_from(source.len()).is_ok(),
        "source exceeds u32::MAX bytes"
    );
    let (tokens, diagnostics) = scanner::Scanner::new(source).run();
    LexResult {
        tokens,
        diagnostics,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use csyn_ir::TokenKind::{self, *};
    use pretty_assertions::assert_eq;

    fn kinds(source: &str) -> Vec<TokenKind> {
        lex(source)
            .tokens
            .iter()
            .map(|t| t.kind)
            .filter(|k| *k != Eof)
            .collect()
    }

    fn texts(source: &str) -> Vec<String> {
        lex(source)
            .tokens
            .iter()
            .filter(|t| t.kind != Eof)
            .map(|t| t.text(source).to_owned())
            .collect()
    }

    #[test]
    fn test_simple_declaration() {
        assert_eq!(
            kinds("int x = 42;"),
            vec![PrimitiveType, Identifier, Eq, NumberLiteral, Semicolon]
        );
    }

    #[test]
    fn test_keywords_and_identifiers() {
        assert_eq!(
            kinds("typedef struct foo foo_t;"),
            vec![Typedef, Struct, Identifier, Identifier, Semicolon]
        );
        assert_eq!(kinds("__inline__ __cdecl"), vec![Inline, MsCallModifier]);
    }

    #[test]
    fn test_operators_maximal_munch() {
        assert_eq!(kinds("a <<= b >> c"), vec![Identifier, ShlEq, Identifier, Shr, Identifier]);
        assert_eq!(kinds("a->b ... ::"), vec![Identifier, Arrow, Identifier, Ellipsis, ColonColon]);
        assert_eq!(kinds("x-- - -y"), vec![Identifier, MinusMinus, Minus, Minus, Identifier]);
    }

    #[test]
    fn test_number_literals() {
        for src in ["0x1F", "0b101", "1'000'000", "3.14f", ".5", "1e-9", "0x1.8p3", "42ULL"] {
            assert_eq!(kinds(src), vec![NumberLiteral], "{src}");
        }
        // `1...2` keeps the range designator ellipsis intact.
        assert_eq!(kinds("1...2"), vec![NumberLiteral, Ellipsis, NumberLiteral]);
    }

    #[test]
    fn test_string_literal_pieces() {
        assert_eq!(
            kinds(r#""ab\n cd""#),
            vec![StringStart, StringContent, EscapeSequence, StringContent, StringEnd]
        );
        // `\x` escapes eat up to four hex digits, so a hex-adjacent letter
        // needs a non-hex follower to terminate.
        assert_eq!(
            texts(r#""a\x41z""#),
            vec!["\"", "a", r"\x41", "z", "\""]
        );
    }

    #[test]
    fn test_string_encoding_prefixes() {
        for src in [r#"L"x""#, r#"u"x""#, r#"U"x""#, r#"u8"x""#] {
            assert_eq!(kinds(src), vec![StringStart, StringContent, StringEnd], "{src}");
        }
        // `u8` not followed by a quote stays an identifier.
        assert_eq!(kinds("u8 x"), vec![Identifier, Identifier]);
    }

    #[test]
    fn test_char_literals() {
        assert_eq!(kinds("'a'"), vec![CharStart, Character, CharEnd]);
        assert_eq!(kinds(r"'\n'"), vec![CharStart, EscapeSequence, CharEnd]);
        assert_eq!(kinds("L'a'"), vec![CharStart, Character, CharEnd]);
    }

    #[test]
    fn test_unterminated_literals() {
        let result = lex("\"abc\nint x;");
        assert!(result.has_errors());
        // Scanning resumes on the next line.
        let ks: Vec<TokenKind> = result.tokens.iter().map(|t| t.kind).collect();
        assert!(ks.contains(&PrimitiveType));

        assert!(lex("'a").has_errors());
        assert!(lex("/* never closed").has_errors());
    }

    #[test]
    fn test_comments() {
        assert_eq!(kinds("a // rest\nb"), vec![Identifier, Comment, Identifier]);
        assert_eq!(kinds("a /* x */ b"), vec![Identifier, Comment, Identifier]);
        // Line continuation extends a line comment.
        assert_eq!(kinds("// one \\\n two\nb"), vec![Comment, Identifier]);
        // Non-greedy block comment.
        assert_eq!(kinds("/* a */ x /* b */"), vec![Comment, Identifier, Comment]);
    }

    #[test]
    fn test_line_continuation_is_whitespace() {
        assert_eq!(kinds("in\\\nt"), vec![Identifier, Identifier]);
        assert_eq!(kinds("a \\\n + b"), vec![Identifier, Plus, Identifier]);
    }

    #[test]
    fn test_preproc_include() {
        assert_eq!(
            kinds("#include <stdio.h>\n"),
            vec![Hash, Identifier, SystemLibString, Newline]
        );
        assert_eq!(
            kinds("#include \"local.h\"\n"),
            vec![Hash, Identifier, StringStart, StringContent, StringEnd, Newline]
        );
    }

    #[test]
    fn test_preproc_define_object_like() {
        assert_eq!(
            kinds("#define MAX 100\n"),
            vec![Hash, Identifier, Identifier, PreprocArg, Newline]
        );
        let t = texts("#define MAX 100\n");
        assert_eq!(t[3], "100");
    }

    #[test]
    fn test_preproc_define_function_like() {
        // The `(` is glued to the name, so it opens a parameter list.
        assert_eq!(
            kinds("#define ADD(a, b) a + b\n"),
            vec![
                Hash, Identifier, Identifier, LParen, Identifier, Comma, Identifier, RParen,
                PreprocArg, Newline
            ]
        );
        // With a space, the parenthesis belongs to the replacement text.
        assert_eq!(
            kinds("#define ADD (a)\n"),
            vec![Hash, Identifier, Identifier, PreprocArg, Newline]
        );
    }

    #[test]
    fn test_preproc_conditionals_lex_normally() {
        assert_eq!(
            kinds("#if defined(X) && Y > 1\n#endif\n"),
            vec![
                Hash, If, Identifier, LParen, Identifier, RParen, AmpAmp, Identifier, Gt,
                NumberLiteral, Newline, Hash, Identifier, Newline
            ]
        );
    }

    #[test]
    fn test_preproc_arg_stops_before_block_comment() {
        assert_eq!(
            kinds("#define X a+b /* why */\n"),
            vec![Hash, Identifier, Identifier, PreprocArg, Comment, Newline]
        );
        let t = texts("#define X a+b /* why */\n");
        assert_eq!(t[3], "a+b ");
    }

    #[test]
    fn test_preproc_arg_line_continuation() {
        let t = texts("#define X a \\\n  b\nint y;");
        assert_eq!(t[3], "a \\\n  b");
        assert_eq!(
            kinds("#define X a \\\n  b\nint y;"),
            vec![Hash, Identifier, Identifier, PreprocArg, Newline, PrimitiveType, Identifier, Semicolon]
        );
    }

    #[test]
    fn test_hash_mid_line_is_not_a_directive() {
        // `#` only opens a directive at the start of a logical line.
        assert_eq!(kinds("a # b"), vec![Identifier, Hash, Identifier]);
    }

    #[test]
    fn test_comment_before_hash_keeps_line_start() {
        assert_eq!(
            kinds("/* c */ #define X 1\n"),
            vec![Comment, Hash, Identifier, Identifier, PreprocArg, Newline]
        );
    }

    #[test]
    fn test_unknown_directive_is_opaque() {
        assert_eq!(
            kinds("#pragma once\n"),
            vec![Hash, Identifier, PreprocArg, Newline]
        );
        assert_eq!(kinds("#undef FOO\n"), vec![Hash, Identifier, PreprocArg, Newline]);
    }

    #[test]
    fn test_error_byte_recovery() {
        let result = lex("a @ b");
        assert!(result.has_errors());
        assert_eq!(
            result
                .tokens
                .iter()
                .map(|t| t.kind)
                .filter(|k| *k != Eof)
                .collect::<Vec<_>>(),
            vec![Identifier, Error, Identifier]
        );
    }

    #[test]
    fn test_dollar_and_ucn_identifiers() {
        assert_eq!(kinds("$tmp _x a$b"), vec![Identifier, Identifier, Identifier]);
        assert_eq!(kinds(r"état"), vec![Identifier]);
        assert_eq!(texts(r"abé"), vec![r"abé"]);
    }

    #[test]
    fn test_spans_cover_non_whitespace() {
        let source = "int main(void) { return 0; } // done\n";
        let result = lex(source);
        let mut prev_end = 0u32;
        for token in result.tokens.iter() {
            assert!(token.span.start >= prev_end, "overlapping token spans");
            let gap = &source[prev_end as usize..token.span.start as usize];
            assert!(gap.chars().all(char::is_whitespace), "gap {gap:?}");
            prev_end = token.span.end;
        }
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            // Lexing arbitrary input never panics, never overlaps spans,
            // and never loses non-whitespace bytes.
            #[test]
            fn lex_is_total_and_covering(source in "[ -~\n]{0,120}") {
                let result = lex(&source);
                let mut prev_end = 0u32;
                for token in result.tokens.iter() {
                    prop_assert!(token.span.start >= prev_end);
                    prop_assert!((token.span.end as usize) <= source.len());
                    let gap = &source[prev_end as usize..token.span.start as usize];
                    prop_assert!(gap.chars().all(char::is_whitespace));
                    prev_end = token.span.end;
                }
            }

            // Identifier/number/punctuation soup lexes with no diagnostics.
            #[test]
            fn clean_tokens_have_no_errors(words in proptest::collection::vec("[a-z_][a-z0-9_]{0,6}|[0-9]{1,4}|[-+*/%;,()]", 0..20)) {
                let source = words.join(" ");
                let result = lex(&source);
                prop_assert!(result.diagnostics.is_empty());
            }
        }
    }
}
