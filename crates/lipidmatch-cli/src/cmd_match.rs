use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::info;

use lipidmatch::constraints::read_constraint_list;
use lipidmatch::{ClassSynonyms, ConstraintSet, MatchingSummary};

use crate::args::{GlobalArgs, MatchArgs};
use crate::dataset;
use crate::report::{MatchReport, MatchReporter, Reportable};

pub fn run(_global_args: &GlobalArgs, args: &MatchArgs) -> Result<()> {
    let to_match = dataset::load_collection(&args.dataset)
        .with_context(|| format!("Failed to load dataset from {}", args.dataset.display()))?;
    let match_to = dataset::load_collection(&args.database)
        .with_context(|| format!("Failed to load reference database from {}", args.database.display()))?;

    let fa_constraints = read_constraint_list(&args.fa_constraints).with_context(|| {
        format!("Failed to load FA constraint list from {}", args.fa_constraints.display())
    })?;
    let lcb_constraints = read_constraint_list(&args.lcb_constraints).with_context(|| {
        format!("Failed to load LCB constraint list from {}", args.lcb_constraints.display())
    })?;
    let constraints = ConstraintSet::new(fa_constraints, lcb_constraints)?;

    let synonyms = load_synonyms(args.synonyms.as_deref())?;

    info!(
        "Matching {} dataset entries against {} reference entries",
        to_match.len(),
        match_to.len()
    );
    let outcome = lipidmatch::match_collections(&to_match, &match_to, &constraints, &synonyms);

    let dataset_name = args
        .dataset_name
        .clone()
        .unwrap_or_else(|| name_from_path(&args.dataset));
    let database_name = args
        .database_name
        .clone()
        .unwrap_or_else(|| name_from_path(&args.database));
    let summary = MatchingSummary::new(dataset_name, database_name, &outcome, &to_match)?;
    info!(
        "Matched {} of {} entries; {} failures",
        summary.total_entries - summary.total_failures,
        summary.total_entries,
        summary.total_failures
    );

    let report = MatchReport {
        summary,
        accepted_matches: outcome.accepted_matches,
        parsed_no_match: outcome.parsed_no_match,
        unparsed_no_match: outcome.unparsed_no_match,
        filtered: outcome.filtered,
        fa_constraints: constraints.fa().iter().cloned().collect(),
        lcb_constraints: constraints.lcb().iter().cloned().collect(),
    };

    let writer = args
        .output_args
        .get_writer()
        .context("Failed to get output writer")?;
    MatchReporter { report }.report(args.output_args.format, writer)
}

/// Load caller synonym rules and merge them over the builtin table.
fn load_synonyms(path: Option<&Path>) -> Result<ClassSynonyms> {
    match path {
        None => Ok(ClassSynonyms::builtin()),
        Some(path) => {
            let file = std::fs::File::open(path).with_context(|| {
                format!("Failed to open synonym configuration at {}", path.display())
            })?;
            let overrides: BTreeMap<String, Vec<String>> =
                serde_json::from_reader(std::io::BufReader::new(file)).with_context(|| {
                    format!("Failed to parse synonym configuration at {}", path.display())
                })?;
            Ok(ClassSynonyms::with_overrides(overrides))
        }
    }
}

fn name_from_path(path: &Path) -> String {
    match path.file_stem() {
        Some(stem) => stem.to_string_lossy().into_owned(),
        None => path.display().to_string(),
    }
}
