use schemars::JsonSchema;
use serde::Serialize;

use crate::collection::ParsedCollection;
use crate::compiler::MatchingOutcome;
use crate::error::MatchError;

// -------------------------------------------------------------------------------------------------
// MatchingSummary
// -------------------------------------------------------------------------------------------------
/// Aggregate counts over one matching run.
///
/// Purely derived from a [`MatchingOutcome`] and its source collection; computed
/// once at construction and never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
pub struct MatchingSummary {
    pub dataset_name: String,
    pub database_name: String,

    /// Size of the source collection
    pub total_entries: usize,

    /// Entries whose name failed to parse
    pub parse_failures: usize,

    /// Parsed entries without any candidate pair
    pub parsed_no_match: usize,

    /// Unparsed entries without any candidate pair
    pub unparsed_no_match: usize,

    /// Entries rejected by the constraint set
    pub filtered: usize,

    /// Entries that could not be attached to the reference database
    pub total_failures: usize,

    /// `total_failures / total_entries`
    pub failure_ratio: f64,
}

impl MatchingSummary {
    /// Derive the summary counts for an outcome over its source collection.
    pub fn new(
        dataset_name: impl Into<String>,
        database_name: impl Into<String>,
        outcome: &MatchingOutcome,
        source: &ParsedCollection,
    ) -> Result<Self, MatchError> {
        let total_entries = source.len();
        if total_entries == 0 {
            return Err(MatchError::EmptyCollection);
        }

        let parsed_no_match = outcome.parsed_no_match.len();
        let unparsed_no_match = outcome.unparsed_no_match.len();
        let filtered = outcome.filtered.len();
        let total_failures = parsed_no_match + unparsed_no_match + filtered;

        Ok(MatchingSummary {
            dataset_name: dataset_name.into(),
            database_name: database_name.into(),
            total_entries,
            parse_failures: source.num_failures(),
            parsed_no_match,
            unparsed_no_match,
            filtered,
            total_failures,
            failure_ratio: total_failures as f64 / total_entries as f64,
        })
    }

    /// The deterministic multi-line report rendering of this summary.
    pub fn render(&self) -> String {
        [
            format!("Dataset name: {}", self.dataset_name),
            format!("Database name: {}", self.database_name),
            format!("Number of lipids: {}", self.total_entries),
            format!("Number of failures: {}", self.total_failures),
            format!("Failure proportion: {:.4}%", 100.0 * self.failure_ratio),
            format!("Number of parsing failures: {}", self.parse_failures),
            format!("Number of parsed no match lipids: {}", self.parsed_no_match),
            format!("Number of original name no match lipids: {}", self.unparsed_no_match),
            format!("Number of filtered lipids: {}", self.filtered),
        ]
        .join("\n")
    }
}

impl std::fmt::Display for MatchingSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.render())
    }
}
