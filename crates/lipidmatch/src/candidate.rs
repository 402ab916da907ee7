use schemars::JsonSchema;
use serde::Serialize;

use crate::collection::{EntryId, ParsedCollection};

// -------------------------------------------------------------------------------------------------
// CandidatePair
// -------------------------------------------------------------------------------------------------
/// A tentative identity correspondence between a to-match entry and a reference entry.
///
/// Pure value type; equality and ordering are over both identifiers, so a set of
/// pairs deduplicates across match strategies for free.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CandidatePair {
    pub to_match_id: EntryId,
    pub match_to_id: EntryId,
}

impl CandidatePair {
    pub fn new(to_match_id: impl Into<EntryId>, match_to_id: impl Into<EntryId>) -> Self {
        CandidatePair {
            to_match_id: to_match_id.into(),
            match_to_id: match_to_id.into(),
        }
    }
}

// -------------------------------------------------------------------------------------------------
// MatchInfo
// -------------------------------------------------------------------------------------------------
/// A candidate pair enriched with both sides' names for reporting.
///
/// Always recomputed from the collections when needed, never cached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
pub struct MatchInfo {
    pub to_match_id: EntryId,
    pub match_to_id: EntryId,
    pub to_match_original_name: String,
    pub to_match_canonical_name: String,
    pub match_to_original_name: String,
    pub match_to_canonical_name: String,
}

impl MatchInfo {
    /// Look up both sides of a pair.
    ///
    /// Pairs are only ever produced by the matchers from entries of these same
    /// collections, so the lookups cannot fail.
    pub fn resolve(
        pair: &CandidatePair,
        to_match: &ParsedCollection,
        match_to: &ParsedCollection,
    ) -> Self {
        let to_match_entry = to_match
            .get(&pair.to_match_id)
            .expect("candidate pair should reference a known to-match entry");
        let match_to_entry = match_to
            .get(&pair.match_to_id)
            .expect("candidate pair should reference a known reference entry");
        MatchInfo {
            to_match_id: pair.to_match_id.clone(),
            match_to_id: pair.match_to_id.clone(),
            to_match_original_name: to_match_entry.original_name.clone(),
            to_match_canonical_name: to_match_entry.canonical_name.clone(),
            match_to_original_name: match_to_entry.original_name.clone(),
            match_to_canonical_name: match_to_entry.canonical_name.clone(),
        }
    }
}
