use anyhow::{Context, Result};
use csv::StringRecord;
use std::collections::HashMap;
use std::path::Path;
use tracing::debug;

use lipidmatch::{LipidLevel, MatchError, ParseStatus, ParsedCollection, ParsedEntry};

const INDEX: &str = "INDEX";
const ORIGINAL_NAME: &str = "ORIGINAL_NAME";
const PARSED_NAME: &str = "PARSED_NAME";
const STATUS: &str = "STATUS";
const MESSAGE: &str = "MESSAGE";
const LEVEL: &str = "LEVEL";
const CATEGORY: &str = "CATEGORY";
const CLASS: &str = "CLASS";
const SPECIES: &str = "SPECIES";
const MOLECULAR_SPECIES: &str = "MOLECULAR_SPECIES";
const SN_POSITION: &str = "SN_POSITION";
const STRUCTURE_DEFINED: &str = "STRUCTURE_DEFINED";
const FULL_STRUCTURE: &str = "FULL_STRUCTURE";
const COMPLETE_STRUCTURE: &str = "COMPLETE_STRUCTURE";
const FA1: &str = "FA1";
const FA2: &str = "FA2";
const FA3: &str = "FA3";
const FA4: &str = "FA4";
const LCB: &str = "LCB";

/// The columns every parsed table must expose. `MESSAGE` is optional: reference
/// databases exported without parser diagnostics omit it.
const REQUIRED_COLUMNS: [&str; 18] = [
    INDEX,
    ORIGINAL_NAME,
    PARSED_NAME,
    STATUS,
    LEVEL,
    CATEGORY,
    CLASS,
    SPECIES,
    MOLECULAR_SPECIES,
    SN_POSITION,
    STRUCTURE_DEFINED,
    FULL_STRUCTURE,
    COMPLETE_STRUCTURE,
    FA1,
    FA2,
    FA3,
    FA4,
    LCB,
];

// -----------------------------------------------------------------------------
// column mapping
// -----------------------------------------------------------------------------
/// Positions of the parsed-table columns within one CSV header row.
///
/// Unknown extra columns are ignored; a missing required column fails the whole
/// load before any matching runs.
struct ColumnMap(HashMap<&'static str, usize>);

impl ColumnMap {
    fn from_headers(headers: &StringRecord) -> Result<Self, MatchError> {
        let mut positions = HashMap::new();
        let mut missing = Vec::new();
        for name in REQUIRED_COLUMNS {
            match headers.iter().position(|h| h == name) {
                Some(i) => {
                    positions.insert(name, i);
                }
                None => missing.push(name),
            }
        }
        if !missing.is_empty() {
            return Err(MatchError::SchemaMismatch {
                detail: format!("missing columns: {}", missing.join(", ")),
            });
        }
        if let Some(i) = headers.iter().position(|h| h == MESSAGE) {
            positions.insert(MESSAGE, i);
        }
        Ok(ColumnMap(positions))
    }

    fn get<'a>(&self, record: &'a StringRecord, name: &'static str) -> &'a str {
        self.0
            .get(name)
            .and_then(|&i| record.get(i))
            .unwrap_or_default()
    }

    fn parse_entry(&self, record: &StringRecord) -> Result<(String, ParsedEntry), MatchError> {
        let id = self.get(record, INDEX).to_owned();
        let status: ParseStatus = self.get(record, STATUS).parse()?;
        let level = LipidLevel::parse_label(self.get(record, LEVEL))?;
        let entry = ParsedEntry {
            original_name: self.get(record, ORIGINAL_NAME).to_owned(),
            canonical_name: self.get(record, PARSED_NAME).to_owned(),
            status,
            message: self.get(record, MESSAGE).to_owned(),
            level,
            category: self.get(record, CATEGORY).to_owned(),
            class: self.get(record, CLASS).to_owned(),
            species: self.get(record, SPECIES).to_owned(),
            molecular_species: self.get(record, MOLECULAR_SPECIES).to_owned(),
            sn_position: self.get(record, SN_POSITION).to_owned(),
            structure_defined: self.get(record, STRUCTURE_DEFINED).to_owned(),
            full_structure: self.get(record, FULL_STRUCTURE).to_owned(),
            complete_structure: self.get(record, COMPLETE_STRUCTURE).to_owned(),
            fa: [
                self.get(record, FA1).to_owned(),
                self.get(record, FA2).to_owned(),
                self.get(record, FA3).to_owned(),
                self.get(record, FA4).to_owned(),
            ],
            lcb: self.get(record, LCB).to_owned(),
        };
        Ok((id, entry))
    }
}

// -----------------------------------------------------------------------------
// loading
// -----------------------------------------------------------------------------
/// Load a parsed collection from a CSV table on disk.
pub fn load_collection(path: &Path) -> Result<ParsedCollection> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("Failed to open parsed table at {}", path.display()))?;
    let collection = read_collection(&mut reader)?;
    debug!("Loaded {} entries from {}", collection.len(), path.display());
    Ok(collection)
}

/// Read a parsed collection from any CSV source.
pub fn read_collection<R: std::io::Read>(reader: &mut csv::Reader<R>) -> Result<ParsedCollection> {
    let headers = reader.headers().context("Failed to read CSV header row")?.clone();
    let columns = ColumnMap::from_headers(&headers)?;

    let mut records = Vec::new();
    for (row, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("Failed to read CSV record {}", row + 1))?;
        let entry = columns
            .parse_entry(&record)
            .with_context(|| format!("Failed to parse CSV record {}", row + 1))?;
        records.push(entry);
    }

    let collection = ParsedCollection::from_entries(records)?;
    Ok(collection)
}

// -----------------------------------------------------------------------------
// test
// -----------------------------------------------------------------------------
#[cfg(test)]
mod test {
    use super::*;

    use indoc::indoc;
    use pretty_assertions::assert_eq;

    fn reader(content: &str) -> csv::Reader<&[u8]> {
        csv::Reader::from_reader(content.as_bytes())
    }

    const SMALL_TABLE: &str = indoc! {"
        INDEX,ORIGINAL_NAME,PARSED_NAME,STATUS,MESSAGE,LEVEL,CATEGORY,CLASS,SPECIES,MOLECULAR_SPECIES,SN_POSITION,STRUCTURE_DEFINED,FULL_STRUCTURE,COMPLETE_STRUCTURE,FA1,FA2,FA3,FA4,LCB
        0,PC(34:1),PC 34:1,success,,SPECIES,GP,PC,PC 34:1,UNDEFINED,UNDEFINED,UNDEFINED,UNDEFINED,UNDEFINED,MISSING,MISSING,N/A,N/A,N/A
        1,Weird Lipid X,,failed,Name can not be parsed,,,,,,,,,,,,,,
    "};

    #[test]
    fn reads_success_and_failure_rows() {
        let collection = read_collection(&mut reader(SMALL_TABLE)).unwrap();
        assert_eq!(collection.len(), 2);

        let parsed = collection.get("0").unwrap();
        assert_eq!(parsed.status, ParseStatus::Success);
        assert_eq!(parsed.level, LipidLevel::Species);
        assert_eq!(parsed.canonical_name, "PC 34:1");
        assert_eq!(parsed.species, "PC 34:1");
        assert_eq!(parsed.fa[0], "MISSING");
        assert_eq!(parsed.fa[2], "N/A");
        assert_eq!(parsed.lcb, "N/A");

        let failed = collection.get("1").unwrap();
        assert_eq!(failed.status, ParseStatus::Failed);
        assert_eq!(failed.canonical_name, "");
        assert_eq!(failed.level, LipidLevel::Undefined);
        assert_eq!(failed.message, "Name can not be parsed");
    }

    #[test]
    fn message_column_is_optional_and_extras_are_ignored() {
        let table = indoc! {"
            EXTRA,INDEX,ORIGINAL_NAME,PARSED_NAME,STATUS,LEVEL,CATEGORY,CLASS,SPECIES,MOLECULAR_SPECIES,SN_POSITION,STRUCTURE_DEFINED,FULL_STRUCTURE,COMPLETE_STRUCTURE,FA1,FA2,FA3,FA4,LCB
            x,0,PC(34:1),PC 34:1,success,SPECIES,GP,PC,PC 34:1,UNDEFINED,UNDEFINED,UNDEFINED,UNDEFINED,UNDEFINED,16:0,18:1,N/A,N/A,N/A
        "};
        let collection = read_collection(&mut reader(table)).unwrap();
        let entry = collection.get("0").unwrap();
        assert_eq!(entry.message, "");
        assert_eq!(entry.fa[0], "16:0");
    }

    #[test]
    fn missing_column_is_a_schema_mismatch() {
        let table = indoc! {"
            INDEX,ORIGINAL_NAME,STATUS,LEVEL
            0,PC(34:1),success,SPECIES
        "};
        let err = read_collection(&mut reader(table)).unwrap_err();
        let err = err.downcast::<MatchError>().unwrap();
        assert!(matches!(err, MatchError::SchemaMismatch { .. }));
        assert!(err.to_string().contains("PARSED_NAME"), "unexpected message: {err}");
    }

    #[test]
    fn unknown_status_label_is_rejected() {
        let table = SMALL_TABLE.replace("success", "maybe");
        let err = read_collection(&mut reader(&table)).unwrap_err();
        let message = format!("{err:#}");
        assert!(message.contains("maybe"), "unexpected message: {message}");
    }
}
