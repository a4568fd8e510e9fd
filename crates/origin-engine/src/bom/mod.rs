//! Bill-of-materials import from spreadsheet exports.
//!
//! Expected header: `HS Code,Origin,Value,Percentage`. A blank `Percentage` is derived
//! from `Value` and the product value handed to the importer.

mod parser;

use std::io::Read;
use std::path::Path;

use tracing::debug;

use crate::origin::Material;

#[derive(Debug)]
pub enum BomImportError {
    Io(std::io::Error),
    Csv(csv::Error),
    MissingField { line: usize, field: &'static str },
    InvalidNumber {
        line: usize,
        field: &'static str,
        value: String,
    },
}

impl std::fmt::Display for BomImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BomImportError::Io(err) => write!(f, "failed to read bill of materials: {}", err),
            BomImportError::Csv(err) => write!(f, "invalid bill of materials CSV: {}", err),
            BomImportError::MissingField { line, field } => {
                write!(f, "line {}: missing required column '{}'", line, field)
            }
            BomImportError::InvalidNumber { line, field, value } => {
                write!(f, "line {}: '{}' is not a valid {}", line, value, field)
            }
        }
    }
}

impl std::error::Error for BomImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BomImportError::Io(err) => Some(err),
            BomImportError::Csv(err) => Some(err),
            BomImportError::MissingField { .. } | BomImportError::InvalidNumber { .. } => None,
        }
    }
}

impl From<std::io::Error> for BomImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for BomImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

pub struct BomImporter;

impl BomImporter {
    pub fn from_path<P: AsRef<Path>>(
        path: P,
        product_value: f64,
    ) -> Result<Vec<Material>, BomImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file, product_value)
    }

    pub fn from_reader<R: Read>(
        reader: R,
        product_value: f64,
    ) -> Result<Vec<Material>, BomImportError> {
        let mut materials = Vec::new();

        for record in parser::parse_records(reader)? {
            let line = record.line;
            let hs_code = record.hs_code.ok_or(BomImportError::MissingField {
                line,
                field: "HS Code",
            })?;
            let origin = record.origin.ok_or(BomImportError::MissingField {
                line,
                field: "Origin",
            })?;
            let value = number(line, "Value", record.value.as_deref())?
                .ok_or(BomImportError::MissingField {
                    line,
                    field: "Value",
                })?;
            let percentage = match number(line, "Percentage", record.percentage.as_deref())? {
                Some(percentage) => percentage,
                None if product_value > 0.0 => value / product_value * 100.0,
                None => 0.0,
            };

            materials.push(Material {
                hs_code,
                origin: origin.to_ascii_uppercase(),
                value,
                percentage,
            });
        }

        debug!(materials = materials.len(), "bill of materials imported");
        Ok(materials)
    }
}

fn number(
    line: usize,
    field: &'static str,
    raw: Option<&str>,
) -> Result<Option<f64>, BomImportError> {
    match raw {
        None => Ok(None),
        Some(raw) => parser::parse_number(raw)
            .map(Some)
            .ok_or_else(|| BomImportError::InvalidNumber {
                line,
                field,
                value: raw.to_string(),
            }),
    }
}
