use super::constants::CELL_KEY_SEPARATOR;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// One alternative under consideration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionOption {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub order: u32,
}

impl DecisionOption {
    pub fn new(id: impl Into<String>, title: impl Into<String>, order: u32) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            order,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CriterionType {
    #[serde(rename = "rating_1_20")]
    Rating120,
    #[serde(rename = "numeric_measured")]
    NumericMeasured,
}

impl CriterionType {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Rating120 => "Rating (1-20)",
            Self::NumericMeasured => "Measured value",
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Rating120 => "rating_1_20",
            Self::NumericMeasured => "numeric_measured",
        }
    }
}

impl fmt::Display for CriterionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which end of a measured scale is preferable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RawDirection {
    #[serde(alias = "lower_raw_better")]
    LowerBetter,
    #[serde(alias = "higher_raw_better")]
    HigherBetter,
}

impl RawDirection {
    pub const fn label(self) -> &'static str {
        match self {
            Self::LowerBetter => "Lower is better",
            Self::HigherBetter => "Higher is better",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum CriterionKind {
    #[serde(rename = "rating_1_20")]
    Rating120,
    #[serde(rename = "numeric_measured")]
    NumericMeasured {
        raw_direction: RawDirection,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        unit: Option<String>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Criterion {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub order: u32,
    #[serde(flatten)]
    pub kind: CriterionKind,
}

impl Criterion {
    pub fn rating(id: impl Into<String>, title: impl Into<String>, order: u32) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            order,
            kind: CriterionKind::Rating120,
        }
    }

    pub fn measured(
        id: impl Into<String>,
        title: impl Into<String>,
        order: u32,
        raw_direction: RawDirection,
        unit: Option<&str>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            order,
            kind: CriterionKind::NumericMeasured {
                raw_direction,
                unit: unit.map(str::to_string),
            },
        }
    }

    pub fn criterion_type(&self) -> CriterionType {
        match self.kind {
            CriterionKind::Rating120 => CriterionType::Rating120,
            CriterionKind::NumericMeasured { .. } => CriterionType::NumericMeasured,
        }
    }
}

/// Discrete rating labels offered as an alternative to the 1-20 slider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SevenLevel {
    Terrible,
    VeryPoor,
    Poor,
    Ok,
    Good,
    VeryGood,
    Excellent,
}

impl SevenLevel {
    pub const fn ordered() -> [Self; 7] {
        [
            Self::Terrible,
            Self::VeryPoor,
            Self::Poor,
            Self::Ok,
            Self::Good,
            Self::VeryGood,
            Self::Excellent,
        ]
    }

    /// Desirability represented by the label. The table is deliberately non-uniform.
    pub const fn desirability(self) -> f64 {
        match self {
            Self::Terrible => 1.0,
            Self::VeryPoor => 4.2,
            Self::Poor => 7.3,
            Self::Ok => 10.5,
            Self::Good => 13.7,
            Self::VeryGood => 16.8,
            Self::Excellent => 20.0,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Terrible => "Terrible",
            Self::VeryPoor => "Very poor",
            Self::Poor => "Poor",
            Self::Ok => "OK",
            Self::Good => "Good",
            Self::VeryGood => "Very good",
            Self::Excellent => "Excellent",
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Terrible => "terrible",
            Self::VeryPoor => "very_poor",
            Self::Poor => "poor",
            Self::Ok => "ok",
            Self::Good => "good",
            Self::VeryGood => "very_good",
            Self::Excellent => "excellent",
        }
    }

    /// Closest label by absolute distance; equal distances resolve to the earlier label.
    pub fn nearest(value: f64) -> Self {
        let mut nearest = Self::Terrible;
        let mut nearest_delta = f64::INFINITY;

        for candidate in Self::ordered() {
            let delta = (candidate.desirability() - value).abs();
            if delta < nearest_delta {
                nearest = candidate;
                nearest_delta = delta;
            }
        }

        nearest
    }
}

impl fmt::Display for SevenLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Accepts `very_good`, `Very Good`, `very-good`, and similar spellings.
impl FromStr for SevenLevel {
    type Err = UnknownSevenLevel;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value
            .trim()
            .to_ascii_lowercase()
            .split(|c: char| c.is_whitespace() || c == '-' || c == '_')
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join("_");

        Self::ordered()
            .into_iter()
            .find(|level| level.as_str() == normalized)
            .ok_or_else(|| UnknownSevenLevel(value.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("'{0}' is not a seven-level rating label")]
pub struct UnknownSevenLevel(pub String);

/// Which sub-value of a rating cell is authoritative when both are present.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RatingInputMode {
    #[default]
    Numeric,
    SevenLevel,
}

impl RatingInputMode {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Numeric => "Numeric (1-20)",
            Self::SevenLevel => "Seven-level",
        }
    }
}

impl FromStr for RatingInputMode {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "numeric" => Ok(Self::Numeric),
            "seven_level" | "seven" => Ok(Self::SevenLevel),
            other => Err(format!("unknown rating input mode '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Rating120Cell {
    pub numeric_value: Option<f64>,
    pub seven_level_value: Option<SevenLevel>,
    #[serde(default)]
    pub last_edited_mode: Option<RatingInputMode>,
}

impl Rating120Cell {
    pub fn is_missing(&self) -> bool {
        self.numeric_value.is_none() && self.seven_level_value.is_none()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NumericMeasuredCell {
    pub raw_value: Option<f64>,
}

impl NumericMeasuredCell {
    pub fn is_missing(&self) -> bool {
        self.raw_value.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "criterion_type")]
pub enum RatingCell {
    #[serde(rename = "rating_1_20")]
    Rating120(Rating120Cell),
    #[serde(rename = "numeric_measured")]
    NumericMeasured(NumericMeasuredCell),
}

impl RatingCell {
    pub fn criterion_type(&self) -> CriterionType {
        match self {
            Self::Rating120(_) => CriterionType::Rating120,
            Self::NumericMeasured(_) => CriterionType::NumericMeasured,
        }
    }

    pub fn is_missing(&self) -> bool {
        match self {
            Self::Rating120(cell) => cell.is_missing(),
            Self::NumericMeasured(cell) => cell.is_missing(),
        }
    }
}

pub fn cell_key(option_id: &str, criterion_id: &str) -> String {
    format!("{option_id}{CELL_KEY_SEPARATOR}{criterion_id}")
}

/// Splits a matrix key at the first separator. Either half being empty is malformed.
pub fn parse_cell_key(key: &str) -> Option<(&str, &str)> {
    let (option_id, criterion_id) = key.split_once(CELL_KEY_SEPARATOR)?;
    if option_id.is_empty() || criterion_id.is_empty() {
        return None;
    }
    Some((option_id, criterion_id))
}

/// Sparse ratings keyed by `optionId::criterionId`. An absent key is a missing cell.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RatingsMatrix {
    cells: BTreeMap<String, RatingCell>,
}

impl RatingsMatrix {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, option_id: &str, criterion_id: &str) -> Option<&RatingCell> {
        self.cells.get(&cell_key(option_id, criterion_id))
    }

    /// The rating cell for the pair, or `None` when absent or holding a measured value.
    pub fn rating_cell(&self, option_id: &str, criterion_id: &str) -> Option<&Rating120Cell> {
        match self.get(option_id, criterion_id)? {
            RatingCell::Rating120(cell) => Some(cell),
            RatingCell::NumericMeasured(_) => None,
        }
    }

    pub fn measured_cell(
        &self,
        option_id: &str,
        criterion_id: &str,
    ) -> Option<&NumericMeasuredCell> {
        match self.get(option_id, criterion_id)? {
            RatingCell::NumericMeasured(cell) => Some(cell),
            RatingCell::Rating120(_) => None,
        }
    }

    /// Finite raw value for a measured pair, if any.
    pub fn raw_value(&self, option_id: &str, criterion_id: &str) -> Option<f64> {
        self.measured_cell(option_id, criterion_id)?
            .raw_value
            .filter(|value| value.is_finite())
    }

    pub fn insert(&mut self, option_id: &str, criterion_id: &str, cell: RatingCell) {
        self.cells.insert(cell_key(option_id, criterion_id), cell);
    }

    pub fn remove(&mut self, option_id: &str, criterion_id: &str) -> Option<RatingCell> {
        self.cells.remove(&cell_key(option_id, criterion_id))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &RatingCell)> {
        self.cells.iter().map(|(key, cell)| (key.as_str(), cell))
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// Positive integer weight per criterion id. Missing entries are unweighted and zero
/// weights are never stored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CriterionWeights {
    weights: BTreeMap<String, u32>,
}

impl CriterionWeights {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, criterion_id: &str) -> Option<u32> {
        self.weights.get(criterion_id).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.weights
            .iter()
            .map(|(id, weight)| (id.as_str(), *weight))
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    pub(crate) fn entries_mut(&mut self) -> &mut BTreeMap<String, u32> {
        &mut self.weights
    }
}

impl<K: Into<String>> FromIterator<(K, u32)> for CriterionWeights {
    fn from_iter<I: IntoIterator<Item = (K, u32)>>(iter: I) -> Self {
        let weights = iter
            .into_iter()
            .filter(|(_, weight)| *weight >= 1)
            .map(|(id, weight)| (id.into(), weight))
            .collect();
        Self { weights }
    }
}

impl<'de> Deserialize<'de> for CriterionWeights {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let weights = BTreeMap::<String, u32>::deserialize(deserializer)?;
        Ok(weights.into_iter().collect())
    }
}
