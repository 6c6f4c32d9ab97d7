//! Recomputation with stale-result suppression
//!
//! Every edit to the tree advances a generation counter. A recomputation is
//! started with the token of the generation it was computed from, and its
//! outcome is only committed if no newer edit has happened in the meantime.
//! Outcomes from superseded snapshots are dropped.

use serde::Serialize;
use tracing::{debug, warn};

use crate::engine::{AllocationEngine, DerivedTree};
use crate::tree::AllocationTree;
use crate::validation::{ValidationIssue, ValidationResult};

/// Identifies the tree snapshot a recomputation was computed from
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct RecomputeToken(u64);

impl RecomputeToken {
    pub fn generation(&self) -> u64 {
        self.0
    }
}

/// Hands out tokens and tells whether a token is still the latest
#[derive(Debug, Default)]
pub struct GenerationGate {
    latest: u64,
}

impl GenerationGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a new generation and returns its token
    pub fn advance(&mut self) -> RecomputeToken {
        self.latest += 1;
        RecomputeToken(self.latest)
    }

    /// The token of the current generation
    pub fn current(&self) -> RecomputeToken {
        RecomputeToken(self.latest)
    }

    pub fn is_current(&self, token: RecomputeToken) -> bool {
        token.0 == self.latest
    }
}

/// Validation and derivation results for one tree snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Recomputation {
    pub token: RecomputeToken,
    pub validation: ValidationResult,
    /// Present only when validation passed
    pub derived: Option<DerivedTree>,
}

impl Recomputation {
    /// Validates the tree and, when it passes, derives amounts
    ///
    /// A total too large to divide up is reported as `InvalidTotalAmount`
    /// with no derived amounts, so the outcome always describes `tree`.
    pub fn compute(token: RecomputeToken, tree: &AllocationTree, engine: &AllocationEngine) -> Self {
        let mut validation = crate::validation::validate(tree);
        let derived = if validation.is_valid() {
            match engine.derive_amounts(tree) {
                Ok(derived) => Some(derived),
                Err(error) => {
                    warn!(%error, "Allocation amounts out of range");
                    validation = ValidationResult::fail(ValidationIssue::InvalidTotalAmount);
                    None
                }
            }
        } else {
            None
        };

        Self {
            token,
            validation,
            derived,
        }
    }

    /// The validation message, if any
    pub fn message(&self) -> Option<String> {
        self.validation.message()
    }
}

/// Runs recomputations and keeps the latest committed outcome
#[derive(Debug, Default)]
pub struct Recomputer {
    gate: GenerationGate,
    engine: AllocationEngine,
    committed: Option<Recomputation>,
}

impl Recomputer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks the tree as changed and returns the token for the new snapshot
    pub fn begin(&mut self) -> RecomputeToken {
        self.gate.advance()
    }

    /// Computes an outcome for `tree` as seen at `token`
    pub fn compute(&self, token: RecomputeToken, tree: &AllocationTree) -> Recomputation {
        Recomputation::compute(token, tree, &self.engine)
    }

    /// Commits an outcome if its snapshot is still the latest
    ///
    /// Returns false and drops the outcome when a newer edit has happened.
    pub fn commit(&mut self, outcome: Recomputation) -> bool {
        if !self.gate.is_current(outcome.token) {
            debug!(
                stale = outcome.token.generation(),
                latest = self.gate.current().generation(),
                "Dropping stale recomputation"
            );
            return false;
        }
        self.committed = Some(outcome);
        true
    }

    /// Begins, computes and commits in one step
    pub fn refresh(&mut self, tree: &AllocationTree) -> &Recomputation {
        let token = self.begin();
        let outcome = self.compute(token, tree);
        self.committed.insert(outcome)
    }

    /// Drops the committed outcome and supersedes any pending computation
    pub fn invalidate(&mut self) {
        self.gate.advance();
        self.committed = None;
    }

    /// The latest committed outcome
    pub fn latest(&self) -> Option<&Recomputation> {
        self.committed.as_ref()
    }
}
