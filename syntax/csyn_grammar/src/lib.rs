//! The C grammar description.
//!
//! This crate is data, defined once at authoring time and immutable for the
//! life of the process: the static precedence ladder ([`prec`]), the
//! production inventory with aliasing and dynamic precedence ([`rules`]),
//! the declared conflict sets ([`conflicts`]), the four declarator families
//! ([`declarator`]) and the four preprocessor-conditional instantiations
//! ([`preproc`]).
//!
//! The parser interprets this description; nothing here executes. Keeping
//! the description first-class means a table-compiling backend can consume
//! the same data, and [`validate`] can check authoring-time invariants the
//! way a table compiler would reject a malformed grammar.

pub mod conflicts;
pub mod declarator;
pub mod prec;
pub mod preproc;
pub mod rules;

pub use declarator::{DeclaratorContext, Wrapper};
pub use preproc::PreprocContext;
pub use rules::RuleName;

use csyn_ir::Supertype;

/// A defect in the grammar description itself.
///
/// These are authoring-time errors: fatal to grammar validation, never
/// surfaced while parsing user source.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GrammarDefect {
    #[error("precedence ladder is not strictly ordered at level {0}")]
    UnorderedLadder(i32),
    #[error("conflict set {0} is declared twice")]
    DuplicateConflictSet(usize),
    #[error("declarator family {family:?} is missing its {wrapper:?} wrapper")]
    MissingWrapper {
        family: DeclaratorContext,
        wrapper: Wrapper,
    },
    #[error("supertype {0:?} declares no variants")]
    EmptySupertype(Supertype),
}

/// Check the authoring-time invariants of the description.
///
/// Run by the test suite (and by any future table-compiling backend) to
/// reject a malformed grammar before it can parse anything.
pub fn validate() -> Result<(), GrammarDefect> {
    // The ladder must be strictly ordered.
    for pair in prec::LADDER.windows(2) {
        if pair[0] >= pair[1] {
            return Err(GrammarDefect::UnorderedLadder(pair[1]));
        }
    }

    // Conflict sets must be unique.
    for (i, a) in conflicts::CONFLICT_SETS.iter().enumerate() {
        for b in &conflicts::CONFLICT_SETS[i + 1..] {
            let same = a.len() == b.len() && a.iter().all(|r| b.contains(r));
            if same {
                return Err(GrammarDefect::DuplicateConflictSet(i));
            }
        }
    }

    // Every family must define every structural wrapper (attributes are
    // the declared exception for the abstract family).
    for family in DeclaratorContext::ALL {
        for wrapper in [
            Wrapper::Pointer,
            Wrapper::Array,
            Wrapper::Function,
            Wrapper::Parenthesized,
        ] {
            if family.wrapper_rule(wrapper).is_none() {
                return Err(GrammarDefect::MissingWrapper { family, wrapper });
            }
        }
    }

    // Supertype variant sets are closed and non-empty.
    for st in Supertype::ALL {
        if st.variants().is_empty() {
            return Err(GrammarDefect::EmptySupertype(st));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_description_validates() {
        assert_eq!(validate(), Ok(()));
    }

    #[test]
    fn test_declarator_supertypes_cover_wrapper_kinds() {
        // Every wrapper's visible kind is a variant of its family's
        // supertype, so produced trees stay inside the closed sets.
        for family in DeclaratorContext::ALL {
            let supertype = family.supertype();
            for wrapper in DeclaratorContext::WRAPPERS {
                let Some(rule) = family.wrapper_rule(wrapper) else {
                    continue;
                };
                let Some(kind) = rule.visible_kind() else {
                    panic!("{rule:?} must be visible");
                };
                assert!(
                    supertype.contains(kind),
                    "{kind:?} not in {supertype:?} variants"
                );
            }
            if let Some(base) = family.base_kind() {
                assert!(supertype.contains(base), "{base:?} not in {supertype:?}");
            }
        }
    }
}
