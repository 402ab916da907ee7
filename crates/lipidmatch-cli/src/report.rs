use anyhow::Result;
use indicatif::HumanCount;
use schemars::JsonSchema;
use serde::Serialize;

use lipidmatch::{FilteredEntry, MatchInfo, MatchingSummary, UnmatchedEntry};

use crate::args::MatchOutputFormat;

/// A trait for things that can be output as a document.
///
/// Factors the format dispatch and writer handling of the output commands into
/// one place.
pub trait Reportable {
    type Format;

    fn report<W: std::io::Write>(&self, format: Self::Format, writer: W) -> Result<()>;
}

// -----------------------------------------------------------------------------
// MatchReport
// -----------------------------------------------------------------------------
/// The full audit document of one matching run.
///
/// One section per outcome partition plus the constraint lists that were applied,
/// so a reviewer can reproduce every accept/reject decision from the document
/// alone.
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct MatchReport {
    pub summary: MatchingSummary,
    pub accepted_matches: Vec<MatchInfo>,
    pub parsed_no_match: Vec<UnmatchedEntry>,
    pub unparsed_no_match: Vec<UnmatchedEntry>,
    pub filtered: Vec<FilteredEntry>,
    pub fa_constraints: Vec<String>,
    pub lcb_constraints: Vec<String>,
}

/// One line of JSON Lines output, tagged with the report section it belongs to.
#[derive(Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum ReportRecord<'a> {
    Summary(&'a MatchingSummary),
    AcceptedMatch(&'a MatchInfo),
    ParsedNoMatch(&'a UnmatchedEntry),
    UnparsedNoMatch(&'a UnmatchedEntry),
    Filtered(&'a FilteredEntry),
    FaConstraint { value: &'a str },
    LcbConstraint { value: &'a str },
}

// -----------------------------------------------------------------------------
// MatchReporter
// -----------------------------------------------------------------------------
pub struct MatchReporter {
    pub report: MatchReport,
}

impl Reportable for MatchReporter {
    type Format = MatchOutputFormat;

    fn report<W: std::io::Write>(&self, format: Self::Format, writer: W) -> Result<()> {
        match format {
            MatchOutputFormat::Human => self.human_format(writer),
            MatchOutputFormat::Json => self.json_format(writer),
            MatchOutputFormat::Jsonl => self.jsonl_format(writer),
        }
    }
}

impl MatchReporter {
    fn human_format<W: std::io::Write>(&self, mut writer: W) -> Result<()> {
        writeln!(writer)?;
        summary_table(&self.report.summary).print(&mut writer)?;
        if !self.report.filtered.is_empty() {
            writeln!(writer)?;
            writeln!(writer, "Entries rejected by the composition constraints:")?;
            writeln!(writer)?;
            filtered_table(&self.report.filtered).print(&mut writer)?;
        }
        Ok(())
    }

    fn json_format<W: std::io::Write>(&self, writer: W) -> Result<()> {
        serde_json::to_writer_pretty(writer, &self.report)?;
        Ok(())
    }

    fn jsonl_format<W: std::io::Write>(&self, mut writer: W) -> Result<()> {
        let report = &self.report;
        let records = std::iter::once(ReportRecord::Summary(&report.summary))
            .chain(report.accepted_matches.iter().map(ReportRecord::AcceptedMatch))
            .chain(report.parsed_no_match.iter().map(ReportRecord::ParsedNoMatch))
            .chain(report.unparsed_no_match.iter().map(ReportRecord::UnparsedNoMatch))
            .chain(report.filtered.iter().map(ReportRecord::Filtered))
            .chain(
                report
                    .fa_constraints
                    .iter()
                    .map(|value| ReportRecord::FaConstraint { value }),
            )
            .chain(
                report
                    .lcb_constraints
                    .iter()
                    .map(|value| ReportRecord::LcbConstraint { value }),
            );
        for record in records {
            serde_json::to_writer(&mut writer, &record)?;
            writeln!(&mut writer)?;
        }
        Ok(())
    }
}

// -----------------------------------------------------------------------------
// tables
// -----------------------------------------------------------------------------
fn table_format() -> prettytable::format::TableFormat {
    use prettytable::format::{FormatBuilder, LinePosition, LineSeparator};

    FormatBuilder::new()
        .column_separator(' ')
        .separators(&[LinePosition::Title], LineSeparator::new('─', '─', '─', '─'))
        .padding(1, 1)
        .build()
}

pub(crate) fn summary_table(summary: &MatchingSummary) -> prettytable::Table {
    use prettytable::row;

    let count = |n: usize| HumanCount(n.try_into().unwrap()).to_string();

    let mut table = prettytable::Table::new();
    table.set_format(table_format());
    table.set_titles(row![lb -> "Measure", cb -> "Value"]);
    table.add_row(row![l -> "Dataset name", r -> &summary.dataset_name]);
    table.add_row(row![l -> "Database name", r -> &summary.database_name]);
    table.add_row(row![l -> "Number of lipids", r -> count(summary.total_entries)]);
    table.add_row(row![l -> "Number of failures", r -> count(summary.total_failures)]);
    table.add_row(
        row![l -> "Failure proportion", r -> format!("{:.4}%", 100.0 * summary.failure_ratio)],
    );
    table.add_row(row![l -> "Number of parsing failures", r -> count(summary.parse_failures)]);
    table.add_row(row![l -> "Number of parsed no match lipids", r -> count(summary.parsed_no_match)]);
    table.add_row(
        row![l -> "Number of original name no match lipids", r -> count(summary.unparsed_no_match)],
    );
    table.add_row(row![l -> "Number of filtered lipids", r -> count(summary.filtered)]);
    table
}

fn filtered_table(filtered: &[FilteredEntry]) -> prettytable::Table {
    use prettytable::row;

    let mut table: prettytable::Table = filtered
        .iter()
        .map(|entry| {
            row![
                l -> &entry.canonical_name,
                l -> &entry.original_name,
                l -> entry.violating_fas.join(", "),
                l -> entry.violating_lcbs.join(", "),
            ]
        })
        .collect();
    table.set_format(table_format());
    table.set_titles(row![
        lb -> "Name",
        lb -> "Original name",
        cb -> "FA violations",
        cb -> "LCB violations",
    ]);
    table
}
