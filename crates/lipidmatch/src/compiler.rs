use schemars::JsonSchema;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

use crate::candidate::{CandidatePair, MatchInfo};
use crate::collection::{EntryId, ParsedCollection};
use crate::entry::ParsedEntry;
use crate::validator::ValidationOutcome;

// -------------------------------------------------------------------------------------------------
// UnmatchedEntry
// -------------------------------------------------------------------------------------------------
/// A to-match entry for which no strategy produced a candidate pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
pub struct UnmatchedEntry {
    pub id: EntryId,
    pub canonical_name: String,
    pub original_name: String,

    /// Parser diagnostic; empty unless parsing failed
    pub message: String,
}

impl UnmatchedEntry {
    fn new(id: &EntryId, entry: &ParsedEntry) -> Self {
        UnmatchedEntry {
            id: id.clone(),
            canonical_name: entry.canonical_name.clone(),
            original_name: entry.original_name.clone(),
            message: entry.message.clone(),
        }
    }
}

// -------------------------------------------------------------------------------------------------
// FilteredEntry
// -------------------------------------------------------------------------------------------------
/// A to-match entry whose every candidate pair failed constraint validation.
///
/// The violation lists are the deduplicated unions over all of the entry's failing
/// candidates; FA values are in normalized form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
pub struct FilteredEntry {
    pub id: EntryId,
    pub canonical_name: String,
    pub original_name: String,
    pub violating_fas: Vec<String>,
    pub violating_lcbs: Vec<String>,
}

// -------------------------------------------------------------------------------------------------
// MatchingOutcome
// -------------------------------------------------------------------------------------------------
/// The compiled result of one matching run.
///
/// Every successfully parsed to-match entry lands in exactly one of: the accepted
/// matches, `parsed_no_match`, or `filtered`; every failed entry lands in the
/// accepted matches (via the fallback strategy), `unparsed_no_match`, or `filtered`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
pub struct MatchingOutcome {
    /// Candidate pairs that passed constraint validation
    pub accepted_matches: Vec<MatchInfo>,

    /// Parsed entries no strategy found a candidate for
    pub parsed_no_match: Vec<UnmatchedEntry>,

    /// Unparsed entries not even the fallback strategy found a candidate for
    pub unparsed_no_match: Vec<UnmatchedEntry>,

    /// Entries whose candidates were all rejected by the constraint set
    pub filtered: Vec<FilteredEntry>,
}

/// Compile the validated candidate pairs into the final outcome partitions.
///
/// The no-match buckets are computed against the raw combiner output: an entry
/// whose only candidates were rejected is a constraint failure, not a no-match.
/// Conversely a single passing candidate exonerates an entry from `filtered`
/// regardless of how many of its other candidates failed.
pub fn compile(
    to_match: &ParsedCollection,
    match_to: &ParsedCollection,
    candidate_pairs: &BTreeSet<CandidatePair>,
    validated: &BTreeMap<CandidatePair, ValidationOutcome>,
) -> MatchingOutcome {
    let accepted_matches: Vec<MatchInfo> = validated
        .iter()
        .filter(|(_, outcome)| outcome.passed())
        .map(|(pair, _)| MatchInfo::resolve(pair, to_match, match_to))
        .collect();

    let matched_ids: BTreeSet<&EntryId> =
        candidate_pairs.iter().map(|pair| &pair.to_match_id).collect();

    let parsed_no_match: Vec<UnmatchedEntry> = to_match
        .success_entries()
        .filter(|(id, _)| !matched_ids.contains(id))
        .map(|(id, entry)| UnmatchedEntry::new(id, entry))
        .collect();

    let unparsed_no_match: Vec<UnmatchedEntry> = to_match
        .failure_entries()
        .filter(|(id, _)| !matched_ids.contains(id))
        .map(|(id, entry)| UnmatchedEntry::new(id, entry))
        .collect();

    // group the validated pairs per to-match entry; built once, iterated once
    let mut groups: BTreeMap<&EntryId, Vec<&ValidationOutcome>> = BTreeMap::new();
    for (pair, outcome) in validated {
        groups.entry(&pair.to_match_id).or_default().push(outcome);
    }

    let filtered: Vec<FilteredEntry> = groups
        .into_iter()
        .filter(|(_, outcomes)| !outcomes.iter().any(|outcome| outcome.passed()))
        .map(|(id, outcomes)| {
            let entry = to_match
                .get(id)
                .expect("candidate pair should reference a known to-match entry");
            let mut fas = BTreeSet::new();
            let mut lcbs = BTreeSet::new();
            for outcome in outcomes {
                if let ValidationOutcome::Violation(violation) = outcome {
                    fas.extend(violation.violating_fas.iter().cloned());
                    lcbs.extend(violation.violating_lcb.iter().cloned());
                }
            }
            FilteredEntry {
                id: id.clone(),
                canonical_name: entry.canonical_name.clone(),
                original_name: entry.original_name.clone(),
                violating_fas: fas.into_iter().collect(),
                violating_lcbs: lcbs.into_iter().collect(),
            }
        })
        .collect();

    let outcome = MatchingOutcome {
        accepted_matches,
        parsed_no_match,
        unparsed_no_match,
        filtered,
    };
    debug_assert!(
        chk_completeness_partition(to_match, &outcome),
        "every parsed entry must land in exactly one outcome bucket"
    );
    outcome
}

/// Does every success-subset entry land in exactly one outcome bucket?
fn chk_completeness_partition(to_match: &ParsedCollection, outcome: &MatchingOutcome) -> bool {
    let accepted: BTreeSet<&EntryId> =
        outcome.accepted_matches.iter().map(|m| &m.to_match_id).collect();
    let no_match: BTreeSet<&EntryId> =
        outcome.parsed_no_match.iter().map(|e| &e.id).collect();
    let filtered: BTreeSet<&EntryId> = outcome.filtered.iter().map(|e| &e.id).collect();

    to_match.success_entries().all(|(id, _)| {
        let buckets = usize::from(accepted.contains(id))
            + usize::from(no_match.contains(id))
            + usize::from(filtered.contains(id));
        buckets == 1
    })
}
