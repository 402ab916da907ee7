use lazy_static::lazy_static;
use regex::Regex;
use std::collections::{BTreeMap, BTreeSet};

use crate::candidate::CandidatePair;
use crate::collection::ParsedCollection;
use crate::constraints::ConstraintSet;
use crate::entry::{ParsedEntry, NOT_APPLICABLE};

lazy_static! {
    // bond-alteration markers (ether `O-`, plasmalogen `P-`) carried in FA descriptors
    static ref BOND_ALTERATION_PATTERN: Regex =
        Regex::new("[OP]-").expect("bond-alteration pattern should compile");
    // hydroxylation suffixes such as `;2OH`
    static ref HYDROXYLATION_PATTERN: Regex =
        Regex::new(";[0-9]+OH").expect("hydroxylation pattern should compile");
}

/// The zero-chain FA descriptor, denoting an empty acyl slot.
const ZERO_CHAIN: &str = "0:0";

/// Normalize a fatty-acyl descriptor for constraint comparison.
///
/// Bond-alteration markers and hydroxylation suffixes describe modifications of a
/// chain, not the chain itself; constraint lists are stated in terms of the bare
/// `<carbons>:<double bonds>` core.
pub fn normalize_fa(descriptor: &str) -> String {
    let stripped = BOND_ALTERATION_PATTERN.replace_all(descriptor, "");
    HYDROXYLATION_PATTERN.replace_all(&stripped, "").into_owned()
}

// -------------------------------------------------------------------------------------------------
// ValidationOutcome
// -------------------------------------------------------------------------------------------------
/// Per-pair validation result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationOutcome {
    Pass,
    Violation(ConstraintViolation),
}

impl ValidationOutcome {
    #[inline]
    pub fn passed(&self) -> bool {
        matches!(self, ValidationOutcome::Pass)
    }
}

/// The descriptor values of one reference entry that fall outside the constraint set.
///
/// Only the values that actually failed are recorded; FA values are recorded in
/// normalized form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstraintViolation {
    pub violating_fas: Vec<String>,
    pub violating_lcb: Option<String>,
}

// -------------------------------------------------------------------------------------------------
// validation
// -------------------------------------------------------------------------------------------------
/// Validate every candidate pair against the constraint set.
///
/// Validation inspects only the reference side of each pair: the reference entry's
/// composition determines whether the match is chemically plausible for the dataset.
pub fn validate_pairs(
    pairs: &BTreeSet<CandidatePair>,
    match_to: &ParsedCollection,
    constraints: &ConstraintSet,
) -> BTreeMap<CandidatePair, ValidationOutcome> {
    pairs
        .iter()
        .map(|pair| {
            let entry = match_to
                .get(&pair.match_to_id)
                .expect("candidate pair should reference a known reference entry");
            (pair.clone(), validate_entry(entry, constraints))
        })
        .collect()
}

/// Check one reference entry's composition descriptors against the constraint set.
///
/// `N/A` slots do not exist for the entry's lipid class and are excluded entirely.
/// A populated FA slot passes if its normalized value is empty, `N/A`, the
/// zero-chain descriptor, or whitelisted; a populated LCB slot passes if empty or
/// whitelisted.
pub fn validate_entry(entry: &ParsedEntry, constraints: &ConstraintSet) -> ValidationOutcome {
    let mut violating_fas = Vec::new();
    for slot in &entry.fa {
        if slot == NOT_APPLICABLE {
            continue;
        }
        let normalized = normalize_fa(slot);
        if normalized.is_empty() || normalized == NOT_APPLICABLE || normalized == ZERO_CHAIN {
            continue;
        }
        if !constraints.fa().contains(&normalized) {
            violating_fas.push(normalized);
        }
    }

    let violating_lcb = if entry.lcb == NOT_APPLICABLE || entry.lcb.is_empty() {
        None
    } else if constraints.lcb().contains(&entry.lcb) {
        None
    } else {
        Some(entry.lcb.clone())
    };

    if violating_fas.is_empty() && violating_lcb.is_none() {
        ValidationOutcome::Pass
    } else {
        ValidationOutcome::Violation(ConstraintViolation {
            violating_fas,
            violating_lcb,
        })
    }
}
