use crate::constraints::ComponentKind;

/// Errors detected at construction and ingestion boundaries.
///
/// The matching computation itself is total: once the inputs construct
/// successfully, every run terminates with a [`crate::MatchingOutcome`].
/// Nothing here is retried or recovered locally; a malformed input aborts
/// the whole run.
#[derive(Debug, thiserror::Error)]
pub enum MatchError {
    /// A supplied constraint list contains no descriptors.
    #[error("{which} constraint list is empty")]
    EmptyConstraintSet { which: ComponentKind },

    /// An input collection does not satisfy the parsed-record contract.
    #[error("schema mismatch: {detail}")]
    SchemaMismatch { detail: String },

    /// A summary was requested over a collection with no entries.
    #[error("cannot summarize matching over an empty collection")]
    EmptyCollection,

    /// Reading a constraint list failed.
    #[error("failed to read constraint list")]
    Io(#[from] std::io::Error),
}
