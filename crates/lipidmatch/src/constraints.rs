use std::collections::BTreeSet;
use std::io::BufRead;
use std::path::Path;
use tracing::debug;

use crate::error::MatchError;

// -------------------------------------------------------------------------------------------------
// ComponentKind
// -------------------------------------------------------------------------------------------------
/// The two kinds of composition descriptor a constraint list can govern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComponentKind {
    FattyAcyl,
    LongChainBase,
}

impl std::fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ComponentKind::FattyAcyl => "FA",
            ComponentKind::LongChainBase => "LCB",
        };
        write!(f, "{s}")
    }
}

// -------------------------------------------------------------------------------------------------
// ConstraintSet
// -------------------------------------------------------------------------------------------------
/// The dataset-specific whitelists of chemically plausible composition descriptors.
///
/// Both lists must be non-empty: an empty list would silently turn constraint
/// filtering off, so construction fails instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstraintSet {
    fa: BTreeSet<String>,
    lcb: BTreeSet<String>,
}

impl ConstraintSet {
    /// Build a constraint set from the allowed FA and LCB descriptor values.
    pub fn new<I, J>(fa: I, lcb: J) -> Result<Self, MatchError>
    where
        I: IntoIterator<Item = String>,
        J: IntoIterator<Item = String>,
    {
        let fa: BTreeSet<String> = fa.into_iter().collect();
        let lcb: BTreeSet<String> = lcb.into_iter().collect();
        if fa.is_empty() {
            return Err(MatchError::EmptyConstraintSet {
                which: ComponentKind::FattyAcyl,
            });
        }
        if lcb.is_empty() {
            return Err(MatchError::EmptyConstraintSet {
                which: ComponentKind::LongChainBase,
            });
        }
        Ok(ConstraintSet { fa, lcb })
    }

    /// Load a constraint set from two line-oriented descriptor lists.
    pub fn from_paths<P: AsRef<Path>, Q: AsRef<Path>>(
        fa_path: P,
        lcb_path: Q,
    ) -> Result<Self, MatchError> {
        let fa = read_constraint_list(fa_path.as_ref())?;
        let lcb = read_constraint_list(lcb_path.as_ref())?;
        Self::new(fa, lcb)
    }

    /// The allowed fatty-acyl descriptors.
    #[inline]
    pub fn fa(&self) -> &BTreeSet<String> {
        &self.fa
    }

    /// The allowed long-chain-base descriptors.
    #[inline]
    pub fn lcb(&self) -> &BTreeSet<String> {
        &self.lcb
    }
}

/// Read one descriptor per line from a line-oriented list file.
///
/// Surrounding whitespace is trimmed and blank lines are skipped; emptiness is
/// checked at [`ConstraintSet::new`], not here.
pub fn read_constraint_list(path: &Path) -> Result<Vec<String>, MatchError> {
    let file = std::fs::File::open(path)?;
    let values = read_constraint_lines(std::io::BufReader::new(file))?;
    debug!("Loaded {} descriptors from {}", values.len(), path.display());
    Ok(values)
}

/// Read one descriptor per line from any line-oriented source.
pub fn read_constraint_lines(reader: impl BufRead) -> Result<Vec<String>, MatchError> {
    let mut values = Vec::new();
    for line in reader.lines() {
        let line = line?;
        let token = line.trim();
        if !token.is_empty() {
            values.push(token.to_owned());
        }
    }
    Ok(values)
}
