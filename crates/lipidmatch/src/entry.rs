use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use strum::{EnumIter, EnumString};

use crate::error::MatchError;

/// Classification cell for a specificity level the entry was not resolved to.
pub const UNDEFINED: &str = "UNDEFINED";

/// Component slot that does not exist for the entry's lipid class.
pub const NOT_APPLICABLE: &str = "N/A";

/// Component slot that exists but could not be determined from the name.
pub const MISSING: &str = "MISSING";

// -------------------------------------------------------------------------------------------------
// ParseStatus
// -------------------------------------------------------------------------------------------------
/// The outcome the parsing collaborator reported for one name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum ParseStatus {
    Success,
    Failed,
}

impl FromStr for ParseStatus {
    type Err = MatchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "success" => Ok(ParseStatus::Success),
            "failed" => Ok(ParseStatus::Failed),
            other => Err(MatchError::SchemaMismatch {
                detail: format!("unknown parse status label {other:?}"),
            }),
        }
    }
}

// -------------------------------------------------------------------------------------------------
// LipidLevel
// -------------------------------------------------------------------------------------------------
/// The specificity level a shorthand name was resolved to, ordered from coarse to fine.
///
/// `Undefined` is the bottom value used for entries that failed to parse or whose name
/// carries no classification at all; it never participates in level-based matching.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    JsonSchema,
    EnumIter,
    EnumString,
    strum::Display,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum LipidLevel {
    Undefined,
    Category,
    Class,
    Species,
    MolecularSpecies,
    SnPosition,
    StructureDefined,
    FullStructure,
    CompleteStructure,
}

impl LipidLevel {
    /// Parse a level label as rendered by the parsing collaborator.
    ///
    /// An empty label means the entry never reached any level and maps to `Undefined`;
    /// any other unrecognized label is a schema mismatch.
    pub fn parse_label(label: &str) -> Result<Self, MatchError> {
        if label.is_empty() {
            return Ok(LipidLevel::Undefined);
        }
        label.parse().map_err(|_| MatchError::SchemaMismatch {
            detail: format!("unknown classification level label {label:?}"),
        })
    }
}

// -------------------------------------------------------------------------------------------------
// ParsedEntry
// -------------------------------------------------------------------------------------------------
/// One classified chemical-entity name, as supplied by the parsing collaborator.
///
/// The eight classification fields hold the canonical name rendered at the corresponding
/// level, or [`UNDEFINED`] when the entry's own level is below that level. Component slots
/// use [`NOT_APPLICABLE`] for slots the lipid class does not have and [`MISSING`] for slots
/// the name did not determine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedEntry {
    /// The raw name string as observed in the experiment, possibly empty
    pub original_name: String,

    /// The canonical shorthand rendering; empty exactly when parsing failed
    pub canonical_name: String,

    pub status: ParseStatus,

    /// Parser diagnostic; empty on success
    pub message: String,

    /// The specificity level the name was resolved to
    pub level: LipidLevel,

    pub category: String,
    pub class: String,
    pub species: String,
    pub molecular_species: String,
    pub sn_position: String,
    pub structure_defined: String,
    pub full_structure: String,
    pub complete_structure: String,

    /// Fatty-acyl component descriptors, up to four slots
    pub fa: [String; 4],

    /// Long-chain-base component descriptor
    pub lcb: String,
}

impl ParsedEntry {
    /// The classification value of this entry at the given level, or `None` for `Undefined`.
    pub fn classification_at(&self, level: LipidLevel) -> Option<&str> {
        let value = match level {
            LipidLevel::Undefined => return None,
            LipidLevel::Category => &self.category,
            LipidLevel::Class => &self.class,
            LipidLevel::Species => &self.species,
            LipidLevel::MolecularSpecies => &self.molecular_species,
            LipidLevel::SnPosition => &self.sn_position,
            LipidLevel::StructureDefined => &self.structure_defined,
            LipidLevel::FullStructure => &self.full_structure,
            LipidLevel::CompleteStructure => &self.complete_structure,
        };
        Some(value)
    }

    /// Build a failed-parse entry: everything but the raw name and the diagnostic is blank.
    pub fn failed(original_name: impl Into<String>, message: impl Into<String>) -> Self {
        ParsedEntry {
            original_name: original_name.into(),
            message: message.into(),
            ..Default::default()
        }
    }
}

/// The all-blank failed-parse shape the parsing collaborator emits for unusable names.
impl Default for ParsedEntry {
    fn default() -> Self {
        ParsedEntry {
            original_name: String::new(),
            canonical_name: String::new(),
            status: ParseStatus::Failed,
            message: String::new(),
            level: LipidLevel::Undefined,
            category: String::new(),
            class: String::new(),
            species: String::new(),
            molecular_species: String::new(),
            sn_position: String::new(),
            structure_defined: String::new(),
            full_structure: String::new(),
            complete_structure: String::new(),
            fa: Default::default(),
            lcb: String::new(),
        }
    }
}
