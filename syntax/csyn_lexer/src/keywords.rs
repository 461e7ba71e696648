//! Keyword and reserved-word resolution.
//!
//! One flat table maps every keyword spelling to its token kind. Synonym
//! spellings (`__inline__`, `_Alignof`, the MS call modifiers, …) fold into
//! a single kind; the token span still records which spelling was written.
//!
//! The `primitive_type` word set is closed: these words always name a type,
//! so they get their own kind instead of being left as identifiers.

use std::sync::OnceLock;

use csyn_ir::TokenKind;
use rustc_hash::FxHashMap;

/// Look up a reserved word.
///
/// Returns `None` for ordinary identifiers. `defined` is *not* in the
/// table: it is only special inside preprocessor conditions and the parser
/// recognizes it by text there.
pub(crate) fn lookup(text: &str) -> Option<TokenKind> {
    table().get(text).copied()
}

fn table() -> &'static FxHashMap<&'static str, TokenKind> {
    static TABLE: OnceLock<FxHashMap<&'static str, TokenKind>> = OnceLock::new();
    TABLE.get_or_init(build_table)
}

#[allow(clippy::too_many_lines)]
fn build_table() -> FxHashMap<&'static str, TokenKind> {
    use TokenKind::*;

    let entries: &[(&str, TokenKind)] = &[
        // Statements
        ("if", If),
        ("else", Else),
        ("while", While),
        ("do", Do),
        ("for", For),
        ("return", Return),
        ("break", Break),
        ("continue", Continue),
        ("goto", Goto),
        ("switch", Switch),
        ("case", Case),
        ("default", Default),
        // Declarations
        ("struct", Struct),
        ("union", Union),
        ("enum", Enum),
        ("typedef", Typedef),
        ("extern", Extern),
        ("static", Static),
        ("auto", Auto),
        ("register", Register),
        ("inline", Inline),
        ("__inline", Inline),
        ("__inline__", Inline),
        ("__forceinline", Inline),
        ("thread_local", ThreadLocal),
        ("__thread", ThreadLocal),
        // Qualifiers
        ("const", Const),
        ("constexpr", Constexpr),
        ("volatile", Volatile),
        ("__volatile__", Volatile),
        ("restrict", Restrict),
        ("__restrict__", Restrict),
        ("__extension__", Extension),
        ("_Atomic", Atomic),
        ("_Noreturn", Noreturn),
        ("noreturn", Noreturn),
        ("_Nonnull", Nonnull),
        ("alignas", Alignas),
        ("_Alignas", Alignas),
        // Operator-like keywords
        ("sizeof", Sizeof),
        ("alignof", Alignof),
        ("_Alignof", Alignof),
        ("_alignof", Alignof),
        ("__alignof", Alignof),
        ("__alignof__", Alignof),
        ("offsetof", Offsetof),
        ("_Generic", Generic),
        // Sized specifiers
        ("signed", Signed),
        ("unsigned", Unsigned),
        ("long", Long),
        ("short", Short),
        // Vendor extensions
        ("__attribute__", Attribute),
        ("__attribute", Attribute),
        ("__declspec", Declspec),
        ("__based", Based),
        ("__cdecl", MsCallModifier),
        ("__clrcall", MsCallModifier),
        ("__stdcall", MsCallModifier),
        ("__fastcall", MsCallModifier),
        ("__thiscall", MsCallModifier),
        ("__vectorcall", MsCallModifier),
        ("__restrict", MsRestrict),
        ("__uptr", MsUptr),
        ("__sptr", MsSptr),
        ("_unaligned", MsUnaligned),
        ("__unaligned", MsUnaligned),
        ("asm", Asm),
        ("__asm__", Asm),
        ("__asm", Asm),
        ("__try", SehTry),
        ("__except", SehExcept),
        ("__finally", SehFinally),
        ("__leave", SehLeave),
        // Literal-like keywords
        ("true", True),
        ("TRUE", True),
        ("false", False),
        ("FALSE", False),
        ("NULL", Null),
        ("nullptr", Null),
        // The closed primitive-type word set
        ("bool", PrimitiveType),
        ("char", PrimitiveType),
        ("int", PrimitiveType),
        ("float", PrimitiveType),
        ("double", PrimitiveType),
        ("void", PrimitiveType),
        ("size_t", PrimitiveType),
        ("ssize_t", PrimitiveType),
        ("ptrdiff_t", PrimitiveType),
        ("intptr_t", PrimitiveType),
        ("uintptr_t", PrimitiveType),
        ("charptr_t", PrimitiveType),
        ("nullptr_t", PrimitiveType),
        ("max_align_t", PrimitiveType),
        ("int8_t", PrimitiveType),
        ("int16_t", PrimitiveType),
        ("int32_t", PrimitiveType),
        ("int64_t", PrimitiveType),
        ("uint8_t", PrimitiveType),
        ("uint16_t", PrimitiveType),
        ("uint32_t", PrimitiveType),
        ("uint64_t", PrimitiveType),
        ("char8_t", PrimitiveType),
        ("char16_t", PrimitiveType),
        ("char32_t", PrimitiveType),
        ("char64_t", PrimitiveType),
    ];

    let mut table =
        FxHashMap::with_capacity_and_hasher(entries.len(), rustc_hash::FxBuildHasher);
    for &(text, kind) in entries {
        table.insert(text, kind);
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keywords() {
        assert_eq!(lookup("if"), Some(TokenKind::If));
        assert_eq!(lookup("typedef"), Some(TokenKind::Typedef));
        assert_eq!(lookup("not_a_keyword"), None);
        assert_eq!(lookup("defined"), None);
    }

    #[test]
    fn test_synonym_folding() {
        assert_eq!(lookup("inline"), lookup("__forceinline"));
        assert_eq!(lookup("alignof"), lookup("__alignof__"));
        assert_eq!(lookup("asm"), lookup("__asm"));
        assert_eq!(lookup("__cdecl"), lookup("__vectorcall"));
        assert_eq!(lookup("NULL"), lookup("nullptr"));
    }

    #[test]
    fn test_restrict_spellings_are_distinct() {
        // `restrict`/`__restrict__` qualify types; `__restrict` modifies
        // pointers in MS declarators.
        assert_eq!(lookup("restrict"), Some(TokenKind::Restrict));
        assert_eq!(lookup("__restrict__"), Some(TokenKind::Restrict));
        assert_eq!(lookup("__restrict"), Some(TokenKind::MsRestrict));
    }

    #[test]
    fn test_primitive_types() {
        for word in ["int", "void", "uint64_t", "char32_t", "max_align_t"] {
            assert_eq!(lookup(word), Some(TokenKind::PrimitiveType), "{word}");
        }
        // `signed` is a sized specifier, not a primitive type.
        assert_eq!(lookup("signed"), Some(TokenKind::Signed));
    }
}
