//! Bulk ratings import from `option,criterion,value` CSV exports.

mod mapping;
mod normalizer;
mod parser;

use crate::workflows::decision::domain::{
    Criterion, CriterionKind, DecisionOption, RatingsMatrix, SevenLevel,
};
use crate::workflows::decision::desirability::accept_rating_value;
use std::collections::{HashMap, HashSet};
use std::io::Read;
use std::path::Path;
use tracing::debug;

use parser::RatingsRecord;

#[derive(Debug, thiserror::Error)]
pub enum RatingsImportError {
    #[error("failed to read ratings file: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid ratings CSV data: {0}")]
    Csv(#[from] csv::Error),
    #[error("ratings CSV is missing the '{0}' column")]
    MissingColumn(&'static str),
    #[error("line {line}: unknown option '{option_id}'")]
    UnknownOption { line: u64, option_id: String },
    #[error("line {line}: unknown criterion '{criterion_id}'")]
    UnknownCriterion { line: u64, criterion_id: String },
    #[error("line {line}: '{value}' is not a valid value for criterion '{criterion_id}'")]
    InvalidValue {
        line: u64,
        criterion_id: String,
        value: String,
    },
}

/// Applies CSV rows to a ratings matrix through the same edit operations the UI uses.
pub struct RatingsCsvImporter;

impl RatingsCsvImporter {
    pub fn from_path<P: AsRef<Path>>(
        path: P,
        options: &[DecisionOption],
        criteria: &[Criterion],
        base: RatingsMatrix,
    ) -> Result<RatingsMatrix, RatingsImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file, options, criteria, base)
    }

    /// Rows apply in file order. An empty value clears the cell; any invalid row aborts the
    /// import without returning a partially edited matrix.
    pub fn from_reader<R: Read>(
        reader: R,
        options: &[DecisionOption],
        criteria: &[Criterion],
        base: RatingsMatrix,
    ) -> Result<RatingsMatrix, RatingsImportError> {
        let option_ids: HashSet<&str> = options.iter().map(|option| option.id.as_str()).collect();
        let criteria_by_id: HashMap<&str, &Criterion> = criteria
            .iter()
            .map(|criterion| (criterion.id.as_str(), criterion))
            .collect();

        let mut matrix = base;
        let records = parser::parse_records(reader)?;
        let row_count = records.len();

        for record in records {
            if !option_ids.contains(record.option_id.as_str()) {
                return Err(RatingsImportError::UnknownOption {
                    line: record.line,
                    option_id: record.option_id,
                });
            }

            let criterion = criteria_by_id
                .get(record.criterion_id.as_str())
                .copied()
                .ok_or_else(|| RatingsImportError::UnknownCriterion {
                    line: record.line,
                    criterion_id: record.criterion_id.clone(),
                })?;

            apply_record(&mut matrix, criterion, record)?;
        }

        debug!(rows = row_count, cells = matrix.len(), "imported ratings CSV");
        Ok(matrix)
    }
}

fn invalid(record: RatingsRecord, value: String) -> RatingsImportError {
    RatingsImportError::InvalidValue {
        line: record.line,
        criterion_id: record.criterion_id,
        value,
    }
}

fn apply_record(
    matrix: &mut RatingsMatrix,
    criterion: &Criterion,
    record: RatingsRecord,
) -> Result<(), RatingsImportError> {
    let Some(value) = record.value.clone() else {
        matrix.remove(&record.option_id, &record.criterion_id);
        return Ok(());
    };

    match &criterion.kind {
        CriterionKind::Rating120 => {
            if let Ok(number) = value.parse::<f64>() {
                let accepted =
                    accept_rating_value(Some(number)).ok_or_else(|| invalid(record.clone(), value))?;
                matrix.set_rating_numeric(&record.option_id, &record.criterion_id, Some(accepted));
            } else {
                let level = value
                    .parse::<SevenLevel>()
                    .map_err(|_| invalid(record.clone(), value))?;
                matrix.set_rating_seven_level(&record.option_id, &record.criterion_id, Some(level));
            }
        }
        CriterionKind::NumericMeasured { .. } => {
            let raw = value
                .parse::<f64>()
                .ok()
                .filter(|raw| raw.is_finite())
                .ok_or_else(|| invalid(record.clone(), value))?;
            matrix.set_measured_raw(&record.option_id, &record.criterion_id, Some(raw));
        }
    }

    Ok(())
}
