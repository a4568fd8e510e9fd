use serde::{Deserialize, Deserializer};
use std::io::Read;

use super::BomImportError;

/// Raw BOM line before numbers are checked.
#[derive(Debug)]
pub(crate) struct BomRecord {
    pub(crate) line: usize,
    pub(crate) hs_code: Option<String>,
    pub(crate) origin: Option<String>,
    pub(crate) value: Option<String>,
    pub(crate) percentage: Option<String>,
}

pub(crate) fn parse_records<R: Read>(reader: R) -> Result<Vec<BomRecord>, BomImportError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut records = Vec::new();

    for (index, record) in csv_reader.deserialize::<BomRow>().enumerate() {
        let row = record?;
        records.push(BomRecord {
            // header occupies line 1
            line: index + 2,
            hs_code: row.hs_code,
            origin: row.origin,
            value: row.value,
            percentage: row.percentage,
        });
    }

    Ok(records)
}

#[derive(Debug, Deserialize)]
struct BomRow {
    #[serde(rename = "HS Code", default, deserialize_with = "empty_string_as_none")]
    hs_code: Option<String>,
    #[serde(rename = "Origin", default, deserialize_with = "empty_string_as_none")]
    origin: Option<String>,
    #[serde(rename = "Value", default, deserialize_with = "empty_string_as_none")]
    value: Option<String>,
    #[serde(
        rename = "Percentage",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    percentage: Option<String>,
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

/// Parse a decimal cell, tolerating a trailing `%` and thousands separators.
pub(crate) fn parse_number(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .trim()
        .trim_end_matches('%')
        .chars()
        .filter(|c| *c != ',' && *c != '_')
        .collect();
    cleaned
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_number_accepts_common_spreadsheet_forms() {
        assert_eq!(parse_number("600"), Some(600.0));
        assert_eq!(parse_number(" 1,250.50 "), Some(1250.5));
        assert_eq!(parse_number("20%"), Some(20.0));
        assert_eq!(parse_number("n/a"), None);
        assert_eq!(parse_number("inf"), None);
    }

    #[test]
    fn blank_cells_become_none() {
        let csv = "HS Code,Origin,Value,Percentage\n390120,DE,600,\n";
        let records = parse_records(csv.as_bytes()).expect("parses");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].line, 2);
        assert_eq!(records[0].hs_code.as_deref(), Some("390120"));
        assert!(records[0].percentage.is_none());
    }
}
