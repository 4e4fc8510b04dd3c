use super::normalizer::normalize_header;
use std::collections::HashMap;
use std::sync::OnceLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum RatingsColumn {
    Option,
    Criterion,
    Value,
}

impl RatingsColumn {
    pub(crate) const fn required() -> [Self; 3] {
        [Self::Option, Self::Criterion, Self::Value]
    }

    pub(crate) const fn label(self) -> &'static str {
        match self {
            Self::Option => "option",
            Self::Criterion => "criterion",
            Self::Value => "value",
        }
    }
}

static HEADER_MAP: OnceLock<HashMap<String, RatingsColumn>> = OnceLock::new();

pub(crate) fn column_for_header(header: &str) -> Option<RatingsColumn> {
    header_map().get(&normalize_header(header)).copied()
}

fn header_map() -> &'static HashMap<String, RatingsColumn> {
    HEADER_MAP.get_or_init(|| {
        const HEADER_TO_COLUMN: &[(&str, RatingsColumn)] = &[
            ("option", RatingsColumn::Option),
            ("option id", RatingsColumn::Option),
            ("criterion", RatingsColumn::Criterion),
            ("criterion id", RatingsColumn::Criterion),
            ("value", RatingsColumn::Value),
            ("rating", RatingsColumn::Value),
            ("raw value", RatingsColumn::Value),
        ];

        HEADER_TO_COLUMN
            .iter()
            .map(|(header, column)| (normalize_header(header), *column))
            .collect()
    })
}
