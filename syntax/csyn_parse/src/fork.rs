//! Snapshots and conflict forking.
//!
//! The parser may only speculate at positions the grammar declares as
//! conflict sets. [`Parser::fork`] realizes the resolution policy: parse
//! every declared alternative from the same snapshot, keep the candidates
//! that complete, and pick the winner by
//!
//! 1. consumed extent (a candidate that accounts for more input wins —
//!    candidates over the *same* span fall through to the next criterion),
//! 2. accumulated dynamic precedence,
//! 3. declaration order (earlier alternative wins a full tie).
//!
//! Forking anywhere the description does not declare a conflict is a
//! grammar defect; [`Parser::assert_conflict`] turns it into a debug-build
//! panic rather than a silent behavior.

use csyn_grammar::{conflicts, RuleName};
use csyn_ir::Node;
use tracing::trace;

use crate::{ParseError, Parsed, Parser};

/// A restorable parser position: cursor, the dynamic-precedence
/// accumulator, and the diagnostics high-water mark (a discarded
/// speculation must not leave its recovery reports behind).
#[derive(Copy, Clone, Debug)]
pub(crate) struct Snapshot {
    pub(crate) pos: usize,
    pub(crate) dyn_prec: i64,
    pub(crate) diagnostics: usize,
}

impl<'a> Parser<'a> {
    /// Capture the current position.
    pub(crate) fn snapshot(&self) -> Snapshot {
        Snapshot {
            pos: self.cursor.pos(),
            dyn_prec: self.dyn_prec,
            diagnostics: self.diagnostics.len(),
        }
    }

    /// Roll back to a snapshot.
    pub(crate) fn restore(&mut self, snapshot: Snapshot) {
        self.cursor.set_pos(snapshot.pos);
        self.dyn_prec = snapshot.dyn_prec;
        self.diagnostics.truncate(snapshot.diagnostics);
    }

    /// Attempt a parse; restore and return `None` on failure.
    pub(crate) fn try_parse<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> Parsed<T>,
    ) -> Option<T> {
        let snapshot = self.snapshot();
        match f(self) {
            Ok(value) => Some(value),
            Err(_) => {
                self.restore(snapshot);
                None
            }
        }
    }

    /// Debug-assert that `set` is a declared conflict set. Used at
    /// choice-ordered speculation sites that do not go through [`fork`].
    #[inline]
    pub(crate) fn assert_conflict(&self, set: &[RuleName]) {
        debug_assert!(
            conflicts::is_declared(set),
            "undeclared ambiguity: {set:?}"
        );
    }

    /// Fork between the alternatives of a declared conflict set.
    ///
    /// Every alternative runs from the same snapshot; completed candidates
    /// are ranked as described in the module docs. If none completes, the
    /// first alternative's error is returned and the position is restored.
    pub(crate) fn fork(
        &mut self,
        conflict: &'static [RuleName],
        alternatives: &mut [&mut dyn FnMut(&mut Self) -> Parsed<Node>],
    ) -> Parsed<Node> {
        self.assert_conflict(conflict);
        let start = self.snapshot();
        struct Candidate {
            node: Node,
            end: usize,
            delta: i64,
            diagnostics: Vec<csyn_diagnostic::Diagnostic>,
        }
        let mut best: Option<(Candidate, usize)> = None;
        let mut first_error: Option<ParseError> = None;

        for (index, alternative) in alternatives.iter_mut().enumerate() {
            self.restore(start);
            match alternative(self) {
                Ok(node) => {
                    let end = self.cursor.pos();
                    let delta = self.dyn_prec - start.dyn_prec;
                    trace!(?conflict, index, end, delta, "fork candidate completed");
                    let wins = match &best {
                        None => true,
                        Some((candidate, _)) => {
                            end > candidate.end
                                || (end == candidate.end && delta > candidate.delta)
                        }
                    };
                    if wins {
                        // Keep the recovery reports the winning derivation
                        // produced; restore() below would drop them.
                        let diagnostics = self.diagnostics[start.diagnostics..].to_vec();
                        best = Some((
                            Candidate {
                                node,
                                end,
                                delta,
                                diagnostics,
                            },
                            index,
                        ));
                    }
                }
                Err(error) => {
                    trace!(?conflict, index, "fork candidate failed");
                    if first_error.is_none() {
                        first_error = Some(error);
                    }
                }
            }
        }

        match best {
            Some((candidate, index)) => {
                trace!(?conflict, winner = index, "fork resolved");
                self.restore(start);
                self.cursor.set_pos(candidate.end);
                self.dyn_prec = start.dyn_prec + candidate.delta;
                self.diagnostics.extend(candidate.diagnostics);
                Ok(candidate.node)
            }
            None => {
                self.restore(start);
                Err(first_error
                    .unwrap_or_else(|| self.error_here(csyn_diagnostic::ErrorCode::E1001)))
            }
        }
    }
}
