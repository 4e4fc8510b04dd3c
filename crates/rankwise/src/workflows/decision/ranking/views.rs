use super::super::coverage::CoverageSeverity;
use super::super::scoring::ContributionRow;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultMethod {
    Wsm,
    Wpm,
}

impl ResultMethod {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Wsm => "Weighted sum",
            Self::Wpm => "Weighted product",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankingRow {
    pub option_id: String,
    pub option_title: String,
    pub option_order: u32,
    pub rank: Option<usize>,
    pub score: Option<f64>,
    pub score_label: String,
    pub method: ResultMethod,
    pub coverage_percent: u8,
    pub coverage_severity: CoverageSeverity,
    pub is_complete: bool,
    pub missing_criterion_ids: Vec<String>,
    pub contributions: Vec<ContributionRow>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MethodAgreement {
    Agree,
    Differ,
    InsufficientData,
}

impl MethodAgreement {
    pub const fn summary(self) -> &'static str {
        match self {
            Self::InsufficientData => {
                "Strict check is unavailable until at least one option has scorable data."
            }
            Self::Agree => "WSM and strict-check WPM agree on the top option.",
            Self::Differ => "WSM and strict-check WPM differ for the top option.",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MethodRanking {
    pub method: ResultMethod,
    pub rows: Vec<RankingRow>,
    pub top_option_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MethodDifference {
    pub top_changed: bool,
    pub wsm_top_option_id: Option<String>,
    pub wpm_top_option_id: Option<String>,
    pub wsm_top_option_title: Option<String>,
    pub wpm_top_option_title: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MethodCheck {
    pub state: MethodAgreement,
    pub summary: String,
    pub can_expand: bool,
    pub wsm: MethodRanking,
    pub wpm: MethodRanking,
    pub difference: MethodDifference,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultsProjection {
    pub ranking_rows: Vec<RankingRow>,
    pub method_check: MethodCheck,
    pub has_measured_criteria: bool,
}
