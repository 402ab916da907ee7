use std::collections::{BTreeMap, BTreeSet, HashMap};
use tracing::debug;

use crate::candidate::CandidatePair;
use crate::collection::{EntryId, ParsedCollection};
use crate::entry::{LipidLevel, UNDEFINED};
use crate::synonyms::ClassSynonyms;

// -------------------------------------------------------------------------------------------------
// MatchStrategy
// -------------------------------------------------------------------------------------------------
/// The closed set of match strategies, applied as a fixed cascade.
///
/// Each strategy is an independent pure function from the two collections to a
/// set of candidate pairs; [`combine_candidates`] unions their outputs. The
/// strategies share no state and may run concurrently.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchStrategy {
    /// Exact canonical-name equality at the entry's own specificity level
    LevelExact,

    /// Level matching after class-name synonym substitution
    SynonymSubstituted,

    /// Exact raw original-name equality, covering unparsed entries too
    Fallback,
}

impl MatchStrategy {
    pub const ALL: [MatchStrategy; 3] = [
        MatchStrategy::LevelExact,
        MatchStrategy::SynonymSubstituted,
        MatchStrategy::Fallback,
    ];

    /// Run this strategy over the two collections.
    pub fn run(
        &self,
        to_match: &ParsedCollection,
        match_to: &ParsedCollection,
        synonyms: &ClassSynonyms,
    ) -> BTreeSet<CandidatePair> {
        match self {
            MatchStrategy::LevelExact => match_by_level(to_match, match_to),
            MatchStrategy::SynonymSubstituted => match_by_synonym(to_match, match_to, synonyms),
            MatchStrategy::Fallback => match_by_original_name(to_match, match_to),
        }
    }
}

// -------------------------------------------------------------------------------------------------
// level matching
// -------------------------------------------------------------------------------------------------
/// Match each successfully parsed entry against the reference classification at the
/// same specificity level the entry was resolved to.
///
/// The join is one-to-many: several reference entries may share a classification
/// string at a coarse level, and each sharing entry yields its own pair.
pub fn match_by_level(
    to_match: &ParsedCollection,
    match_to: &ParsedCollection,
) -> BTreeSet<CandidatePair> {
    let mut by_level: BTreeMap<LipidLevel, Vec<(&EntryId, &str)>> = BTreeMap::new();
    for (id, entry) in to_match.success_entries() {
        if entry.level != LipidLevel::Undefined {
            by_level
                .entry(entry.level)
                .or_default()
                .push((id, entry.canonical_name.as_str()));
        }
    }

    let mut pairs = BTreeSet::new();
    for (level, group) in by_level {
        let index = classification_index(match_to, level);
        for (to_match_id, canonical_name) in group {
            if let Some(match_to_ids) = index.get(canonical_name) {
                for match_to_id in match_to_ids {
                    pairs.insert(CandidatePair::new(to_match_id.clone(), (*match_to_id).clone()));
                }
            }
        }
    }
    pairs
}

/// Index the reference collection's classification values at one level.
///
/// Sentinel cells (empty or `UNDEFINED`) denote "no classification at this level"
/// and are never joined against.
fn classification_index(
    match_to: &ParsedCollection,
    level: LipidLevel,
) -> HashMap<&str, Vec<&EntryId>> {
    let mut index: HashMap<&str, Vec<&EntryId>> = HashMap::new();
    for (id, entry) in match_to.entries() {
        if let Some(value) = entry.classification_at(level) {
            if !value.is_empty() && value != UNDEFINED {
                index.entry(value).or_default().push(id);
            }
        }
    }
    index
}

// -------------------------------------------------------------------------------------------------
// synonym matching
// -------------------------------------------------------------------------------------------------
/// Re-run level matching with class-name synonyms substituted into the canonical names.
///
/// A configured class that never occurs in the to-match collection is a no-op, not an
/// error: datasets legitimately vary in class coverage.
pub fn match_by_synonym(
    to_match: &ParsedCollection,
    match_to: &ParsedCollection,
    synonyms: &ClassSynonyms,
) -> BTreeSet<CandidatePair> {
    let mut pairs = BTreeSet::new();
    for (class_name, synonym_names) in synonyms.iter() {
        let class_present = to_match
            .entries()
            .any(|(_, entry)| entry.canonical_name.starts_with(class_name));
        if !class_present {
            debug!("No {class_name} entries to substitute synonyms into; skipping");
            continue;
        }
        for synonym in synonym_names {
            let derived = to_match.with_substituted_canonical_names(class_name, synonym);
            pairs.extend(match_by_level(&derived, match_to));
        }
    }
    pairs
}

// -------------------------------------------------------------------------------------------------
// fallback matching
// -------------------------------------------------------------------------------------------------
/// Match by exact raw original-name equality over *all* entries of both sides.
///
/// This is the only strategy able to recover entries whose names failed to parse.
/// Empty original names never join.
pub fn match_by_original_name(
    to_match: &ParsedCollection,
    match_to: &ParsedCollection,
) -> BTreeSet<CandidatePair> {
    let mut index: HashMap<&str, Vec<&EntryId>> = HashMap::new();
    for (id, entry) in match_to.entries() {
        if !entry.original_name.is_empty() {
            index.entry(entry.original_name.as_str()).or_default().push(id);
        }
    }

    let mut pairs = BTreeSet::new();
    for (to_match_id, entry) in to_match.entries() {
        if entry.original_name.is_empty() {
            continue;
        }
        if let Some(match_to_ids) = index.get(entry.original_name.as_str()) {
            for match_to_id in match_to_ids {
                pairs.insert(CandidatePair::new(to_match_id.clone(), (*match_to_id).clone()));
            }
        }
    }
    pairs
}

// -------------------------------------------------------------------------------------------------
// combination
// -------------------------------------------------------------------------------------------------
/// Union the candidate sets of all strategies, deduplicating by pair equality.
pub fn combine_candidates<I>(results: I) -> BTreeSet<CandidatePair>
where
    I: IntoIterator<Item = BTreeSet<CandidatePair>>,
{
    let mut combined = BTreeSet::new();
    for result in results {
        combined.extend(result);
    }
    combined
}

// -------------------------------------------------------------------------------------------------
// test
// -------------------------------------------------------------------------------------------------
#[cfg(test)]
mod test {
    use super::*;

    use crate::entry::{ParseStatus, ParsedEntry};
    use pretty_assertions::assert_eq;

    fn species_entry(original: &str, canonical: &str) -> ParsedEntry {
        ParsedEntry {
            original_name: original.to_owned(),
            canonical_name: canonical.to_owned(),
            status: ParseStatus::Success,
            level: LipidLevel::Species,
            species: canonical.to_owned(),
            ..Default::default()
        }
    }

    fn collection(records: Vec<(&str, ParsedEntry)>) -> ParsedCollection {
        ParsedCollection::from_entries(records.into_iter().map(|(id, e)| (id.to_owned(), e)))
            .unwrap()
    }

    fn pair(to_match: &str, match_to: &str) -> CandidatePair {
        CandidatePair::new(to_match, match_to)
    }

    #[test]
    fn level_match_joins_at_the_entry_level() {
        let to_match = collection(vec![("d1", species_entry("PC(34:1)", "PC 34:1"))]);
        // the reference entry is resolved deeper, but its species rendering matches
        let mut r1 = species_entry("PC 16:0_18:1", "PC 16:0/18:1");
        r1.species = "PC 34:1".to_owned();
        let match_to = collection(vec![
            ("r1", r1),
            ("r2", species_entry("PE 36:2", "PE 18:1/18:1")),
        ]);

        let pairs = match_by_level(&to_match, &match_to);
        assert_eq!(pairs, BTreeSet::from([pair("d1", "r1")]));
    }

    #[test]
    fn level_match_is_one_to_many() {
        let to_match = collection(vec![(
            "d1",
            ParsedEntry {
                original_name: "PC".to_owned(),
                canonical_name: "PC".to_owned(),
                status: ParseStatus::Success,
                level: LipidLevel::Class,
                class: "PC".to_owned(),
                ..Default::default()
            },
        )]);
        let mut r1 = species_entry("PC 34:1", "PC 16:0/18:1");
        r1.class = "PC".to_owned();
        let mut r2 = species_entry("PC 36:2", "PC 18:1/18:1");
        r2.class = "PC".to_owned();
        let match_to = collection(vec![("r1", r1), ("r2", r2)]);

        let pairs = match_by_level(&to_match, &match_to);
        assert_eq!(pairs, BTreeSet::from([pair("d1", "r1"), pair("d1", "r2")]));
    }

    #[test]
    fn level_match_ignores_other_levels_and_sentinels() {
        // the canonical name exists in the reference, but only at a different level
        let mut entry = species_entry("PC 34:1", "PC 34:1");
        entry.level = LipidLevel::MolecularSpecies;
        entry.molecular_species = "PC 34:1".to_owned();
        let to_match = collection(vec![("d1", entry)]);

        let reference = species_entry("PC 34:1", "PC 34:1");
        // molecular species column carries the below-level sentinel
        let reference = ParsedEntry {
            molecular_species: UNDEFINED.to_owned(),
            ..reference
        };
        let match_to = collection(vec![("r1", reference)]);

        assert_eq!(match_by_level(&to_match, &match_to), BTreeSet::new());
    }

    #[test]
    fn undefined_level_contributes_no_pairs() {
        let entry = ParsedEntry {
            original_name: "PC 34:1".to_owned(),
            canonical_name: "PC 34:1".to_owned(),
            status: ParseStatus::Success,
            level: LipidLevel::Undefined,
            ..Default::default()
        };
        let to_match = collection(vec![("d1", entry)]);
        let match_to = collection(vec![("r1", species_entry("PC 34:1", "PC 34:1"))]);

        assert_eq!(match_by_level(&to_match, &match_to), BTreeSet::new());
    }

    #[test]
    fn synonym_match_recovers_renamed_classes() {
        // parser canonicalizes the dataset name to HexCer; the reference only knows GlcCer
        let to_match = collection(vec![("d1", species_entry("GlcCer(d34:1)", "HexCer 34:1;2"))]);
        let match_to = collection(vec![("r1", species_entry("GlcCer 34:1;2", "GlcCer 34:1;2"))]);

        assert_eq!(match_by_level(&to_match, &match_to), BTreeSet::new());

        let pairs = match_by_synonym(&to_match, &match_to, &ClassSynonyms::builtin());
        assert_eq!(pairs, BTreeSet::from([pair("d1", "r1")]));
    }

    #[test]
    fn synonym_match_skips_absent_classes() {
        let to_match = collection(vec![("d1", species_entry("PC 34:1", "PC 34:1"))]);
        let match_to = collection(vec![("r1", species_entry("GlcCer 34:1;2", "GlcCer 34:1;2"))]);

        let pairs = match_by_synonym(&to_match, &match_to, &ClassSynonyms::builtin());
        assert_eq!(pairs, BTreeSet::new());
    }

    #[test]
    fn fallback_match_recovers_unparsed_names() {
        let to_match = collection(vec![(
            "d1",
            ParsedEntry::failed("Weird Lipid X", "Name can not be parsed"),
        )]);
        let match_to = collection(vec![("r1", species_entry("Weird Lipid X", "PC 34:1"))]);

        let pairs = match_by_original_name(&to_match, &match_to);
        assert_eq!(pairs, BTreeSet::from([pair("d1", "r1")]));
    }

    #[test]
    fn fallback_match_never_joins_empty_names() {
        let to_match = collection(vec![("d1", ParsedEntry::failed("", "Missing name"))]);
        let match_to = collection(vec![("r1", ParsedEntry::failed("", "Missing name"))]);

        assert_eq!(match_by_original_name(&to_match, &match_to), BTreeSet::new());
    }

    #[test]
    fn combine_deduplicates_across_strategies() {
        let a = BTreeSet::from([pair("d1", "r1"), pair("d2", "r1")]);
        let b = BTreeSet::from([pair("d1", "r1")]);
        let combined = combine_candidates([a.clone(), b]);
        assert_eq!(combined, a);
    }

    #[test]
    fn strategies_run_through_the_sum_type() {
        let to_match = collection(vec![("d1", species_entry("PC(34:1)", "PC 34:1"))]);
        let match_to = collection(vec![("r1", species_entry("PC 34:1", "PC 34:1"))]);
        let synonyms = ClassSynonyms::builtin();

        let per_strategy: Vec<BTreeSet<CandidatePair>> = MatchStrategy::ALL
            .iter()
            .map(|s| s.run(&to_match, &match_to, &synonyms))
            .collect();
        assert_eq!(per_strategy[0], BTreeSet::from([pair("d1", "r1")]));
        assert_eq!(per_strategy[1], BTreeSet::new());
        assert_eq!(per_strategy[2], BTreeSet::new());

        let combined = combine_candidates(per_strategy);
        assert_eq!(combined, BTreeSet::from([pair("d1", "r1")]));
    }
}
