use metrics_exporter_prometheus::PrometheusHandle;
use rankwise::workflows::decision::RatingInputMode;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

pub(crate) fn parse_mode(raw: &str) -> Result<RatingInputMode, String> {
    raw.parse::<RatingInputMode>()
        .map_err(|err| format!("{err} (expected numeric or seven-level)"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_mode_accepts_cli_spellings() {
        assert_eq!(parse_mode("numeric"), Ok(RatingInputMode::Numeric));
        assert_eq!(parse_mode("seven-level"), Ok(RatingInputMode::SevenLevel));
        assert!(parse_mode("stars")
            .expect_err("unknown mode")
            .contains("expected numeric or seven-level"));
    }
}
