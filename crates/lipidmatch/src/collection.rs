use std::collections::BTreeMap;

use crate::entry::{ParseStatus, ParsedEntry, UNDEFINED};
use crate::error::MatchError;

/// Identifier of an entry, unique within its own collection.
///
/// Identifiers from the two sides of a matching run are never compared to each
/// other; only name and classification fields are.
pub type EntryId = String;

// -------------------------------------------------------------------------------------------------
// ParsedCollection
// -------------------------------------------------------------------------------------------------
/// An immutable, identifier-keyed collection of parsed entries.
///
/// Construction validates the parsed-record contract: identifiers are unique and
/// `status == Failed` holds exactly for entries with an empty canonical name.
/// All derived collections (subsets, concatenations, synonym substitutions) are
/// new values; nothing mutates an existing collection.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParsedCollection {
    entries: BTreeMap<EntryId, ParsedEntry>,
}

impl ParsedCollection {
    /// Build a collection from `(id, entry)` records, validating the record contract.
    pub fn from_entries<I>(records: I) -> Result<Self, MatchError>
    where
        I: IntoIterator<Item = (EntryId, ParsedEntry)>,
    {
        let mut entries = BTreeMap::new();
        for (id, entry) in records {
            Self::chk_entry(&id, &entry)?;
            if entries.insert(id.clone(), entry).is_some() {
                return Err(MatchError::SchemaMismatch {
                    detail: format!("duplicate entry identifier {id:?}"),
                });
            }
        }
        Ok(ParsedCollection { entries })
    }

    fn chk_entry(id: &str, entry: &ParsedEntry) -> Result<(), MatchError> {
        let failed = entry.status == ParseStatus::Failed;
        if failed != entry.canonical_name.is_empty() {
            return Err(MatchError::SchemaMismatch {
                detail: format!(
                    "entry {id:?} has status {:?} but canonical name {:?}",
                    entry.status, entry.canonical_name
                ),
            });
        }
        Ok(())
    }

    /// How many entries are in this collection?
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Is this collection empty?
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up one entry by identifier.
    #[inline]
    pub fn get(&self, id: &str) -> Option<&ParsedEntry> {
        self.entries.get(id)
    }

    /// Iterate over all entries in identifier order.
    pub fn entries(&self) -> impl Iterator<Item = (&EntryId, &ParsedEntry)> {
        self.entries.iter()
    }

    /// Did this entry parse to a usable canonical name?
    ///
    /// A successful parse that only reached the `UNDEFINED` rendering carries no
    /// classification to match on and counts as a failure.
    fn is_success(entry: &ParsedEntry) -> bool {
        entry.status == ParseStatus::Success && entry.canonical_name != UNDEFINED
    }

    /// Iterate over the entries with a usable canonical name.
    pub fn success_entries(&self) -> impl Iterator<Item = (&EntryId, &ParsedEntry)> {
        self.entries.iter().filter(|(_, e)| Self::is_success(e))
    }

    /// Iterate over the entries without a usable canonical name.
    pub fn failure_entries(&self) -> impl Iterator<Item = (&EntryId, &ParsedEntry)> {
        self.entries.iter().filter(|(_, e)| !Self::is_success(e))
    }

    /// How many entries are in the failure subset?
    pub fn num_failures(&self) -> usize {
        self.failure_entries().count()
    }

    /// A new collection holding only the success subset.
    pub fn success_subset(&self) -> Self {
        ParsedCollection {
            entries: self
                .success_entries()
                .map(|(id, e)| (id.clone(), e.clone()))
                .collect(),
        }
    }

    /// A new collection holding only the failure subset.
    pub fn failure_subset(&self) -> Self {
        ParsedCollection {
            entries: self
                .failure_entries()
                .map(|(id, e)| (id.clone(), e.clone()))
                .collect(),
        }
    }

    /// A new collection restricted to the given identifiers.
    ///
    /// Every requested identifier must be present in this collection.
    pub fn subset<'a, I>(&self, ids: I) -> Result<Self, MatchError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut entries = BTreeMap::new();
        for id in ids {
            let entry = self.entries.get(id).ok_or_else(|| MatchError::SchemaMismatch {
                detail: format!("identifier {id:?} is not part of the collection"),
            })?;
            entries.insert(id.to_owned(), entry.clone());
        }
        Ok(ParsedCollection { entries })
    }

    /// A new collection holding the entries of both collections.
    ///
    /// Identifiers must not collide across the two inputs.
    pub fn concat(&self, other: &Self) -> Result<Self, MatchError> {
        Self::from_entries(
            self.entries
                .iter()
                .chain(other.entries.iter())
                .map(|(id, e)| (id.clone(), e.clone())),
        )
    }

    /// A new collection with `from` textually replaced by `to` in every canonical name.
    ///
    /// All other fields are untouched. Used for class-synonym substitution, where the
    /// replacement can never empty a non-empty name, so the record contract is preserved.
    pub(crate) fn with_substituted_canonical_names(&self, from: &str, to: &str) -> Self {
        ParsedCollection {
            entries: self
                .entries
                .iter()
                .map(|(id, e)| {
                    let mut entry = e.clone();
                    entry.canonical_name = entry.canonical_name.replace(from, to);
                    (id.clone(), entry)
                })
                .collect(),
        }
    }
}
