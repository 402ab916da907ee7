//! Resolve experimentally observed lipid names against a reference structural database.
//!
//! Both sides arrive pre-parsed into a multi-level classification (see
//! [`ParsedEntry`]); the work done here is resolving identity across two
//! independently parsed vocabularies that disagree on specificity, spelling, and
//! class naming, and rejecting matches whose composition is implausible for the
//! dataset at hand.
//!
//! The pipeline is a fixed cascade:
//!
//! 1. Three independent match strategies ([`MatchStrategy`]) each produce a set of
//!    [`CandidatePair`]s: exact canonical-name equality at the entry's own
//!    specificity level, the same after class-synonym substitution, and raw
//!    original-name equality as a fallback for unparsed names.
//! 2. [`combine_candidates`] unions and deduplicates the strategy outputs.
//! 3. [`validate_pairs`] checks each candidate's reference-side composition
//!    against the dataset's [`ConstraintSet`].
//! 4. [`compile`] partitions the results into accepted matches, no-match buckets,
//!    and constraint-filtered entries; [`MatchingSummary`] derives the counts.
//!
//! The whole computation is pure and deterministic: identical inputs produce an
//! identical [`MatchingOutcome`].

use rayon::prelude::*;

pub mod candidate;
pub mod collection;
pub mod compiler;
pub mod constraints;
pub mod entry;
pub mod error;
pub mod matcher;
pub mod summary;
pub mod synonyms;
pub mod validator;

pub use candidate::{CandidatePair, MatchInfo};
pub use collection::{EntryId, ParsedCollection};
pub use compiler::{compile, FilteredEntry, MatchingOutcome, UnmatchedEntry};
pub use constraints::{ComponentKind, ConstraintSet};
pub use entry::{LipidLevel, ParseStatus, ParsedEntry};
pub use error::MatchError;
pub use matcher::{combine_candidates, MatchStrategy};
pub use summary::MatchingSummary;
pub use synonyms::ClassSynonyms;
pub use validator::{normalize_fa, validate_pairs, ConstraintViolation, ValidationOutcome};

/// Run the full constrained matching pipeline over two collections.
///
/// The three match strategies are independent and run concurrently; their
/// combined candidates are validated against `constraints` and compiled into the
/// outcome partitions.
pub fn match_collections(
    to_match: &ParsedCollection,
    match_to: &ParsedCollection,
    constraints: &ConstraintSet,
    synonyms: &ClassSynonyms,
) -> MatchingOutcome {
    let strategy_results: Vec<_> = MatchStrategy::ALL
        .par_iter()
        .map(|strategy| strategy.run(to_match, match_to, synonyms))
        .collect();

    let candidates = combine_candidates(strategy_results);
    let validated = validate_pairs(&candidates, match_to, constraints);
    compile(to_match, match_to, &candidates, &validated)
}
