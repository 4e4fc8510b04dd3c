use super::mapping::{column_for_header, RatingsColumn};
use super::normalizer::strip_invisible;
use super::RatingsImportError;
use std::collections::HashMap;
use std::io::Read;

/// One data row of a ratings CSV, with the 1-based source line for error reporting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RatingsRecord {
    pub(crate) line: u64,
    pub(crate) option_id: String,
    pub(crate) criterion_id: String,
    pub(crate) value: Option<String>,
}

pub(crate) fn parse_records<R: Read>(reader: R) -> Result<Vec<RatingsRecord>, RatingsImportError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let mut positions: HashMap<RatingsColumn, usize> = HashMap::new();
    for (index, header) in csv_reader.headers()?.iter().enumerate() {
        if let Some(column) = column_for_header(header) {
            positions.entry(column).or_insert(index);
        }
    }

    for column in RatingsColumn::required() {
        if !positions.contains_key(&column) {
            return Err(RatingsImportError::MissingColumn(column.label()));
        }
    }

    let field = |record: &csv::StringRecord, column: RatingsColumn| -> String {
        positions
            .get(&column)
            .and_then(|index| record.get(*index))
            .map(strip_invisible)
            .unwrap_or_default()
    };

    let mut records = Vec::new();
    for result in csv_reader.records() {
        let record = result?;
        let line = record.position().map_or(0, |position| position.line());
        let value = field(&record, RatingsColumn::Value);

        records.push(RatingsRecord {
            line,
            option_id: field(&record, RatingsColumn::Option),
            criterion_id: field(&record, RatingsColumn::Criterion),
            value: (!value.is_empty()).then_some(value),
        });
    }

    Ok(records)
}
