use rankwise::workflows::decision::{
    DecisionSnapshot, MethodAgreement, RatingInputMode, RatingsMatrix, SevenLevel,
};
use rankwise::workflows::import::{RatingsCsvImporter, RatingsImportError};

fn laptop_snapshot() -> DecisionSnapshot {
    let snapshot: DecisionSnapshot =
        serde_json::from_str(include_str!("fixtures/laptops.json")).expect("fixture parses");
    snapshot.validate().expect("fixture is consistent");
    snapshot
}

fn imported_snapshot() -> DecisionSnapshot {
    let mut snapshot = laptop_snapshot();
    let data = include_bytes!("fixtures/laptop_ratings.csv");
    let base = std::mem::take(&mut snapshot.ratings);
    snapshot.ratings =
        RatingsCsvImporter::from_reader(&data[..], &snapshot.options, &snapshot.criteria, base)
            .expect("ratings import");
    snapshot
}

#[test]
fn importer_merges_csv_ratings_into_the_snapshot() {
    let snapshot = imported_snapshot();
    snapshot.validate().expect("imported snapshot stays consistent");

    let brick_battery = snapshot
        .ratings
        .rating_cell("brick", "battery")
        .expect("label imported");
    assert_eq!(brick_battery.seven_level_value, Some(SevenLevel::Excellent));
    assert_eq!(brick_battery.numeric_value, Some(20.0));

    let aero_keyboard = snapshot
        .ratings
        .rating_cell("aero", "keyboard")
        .expect("label imported");
    assert_eq!(aero_keyboard.numeric_value, Some(13.7));

    assert!(snapshot.ratings.get("canvas", "battery").is_none());
    assert_eq!(snapshot.ratings.raw_value("aero", "price"), Some(1900.0));
    assert_eq!(snapshot.ratings.raw_value("canvas", "weight"), Some(1.8));
}

#[test]
fn imported_ratings_rank_end_to_end() {
    let snapshot = imported_snapshot();
    let projection = snapshot.results(RatingInputMode::Numeric);

    let order: Vec<&str> = projection
        .ranking_rows
        .iter()
        .map(|row| row.option_id.as_str())
        .collect();
    assert_eq!(order, vec!["brick", "aero", "canvas"]);
    assert_eq!(projection.method_check.state, MethodAgreement::Agree);
    assert!(projection.has_measured_criteria);

    let canvas = &projection.ranking_rows[2];
    assert_eq!(canvas.missing_criterion_ids, vec!["battery".to_string()]);
    assert_eq!(canvas.coverage_percent, 70);

    let diagnostics = snapshot.diagnostics(RatingInputMode::Numeric);
    let battery = diagnostics
        .criterion_blank_rates
        .iter()
        .find(|rate| rate.criterion_id == "battery")
        .expect("battery blank rate");
    assert!(battery.is_soft_warning);
}

#[test]
fn importer_reports_the_failing_line() {
    let snapshot = laptop_snapshot();
    let csv = "option,criterion,value\naero,battery,12\naero,weight,light\n";

    let error = RatingsCsvImporter::from_reader(
        csv.as_bytes(),
        &snapshot.options,
        &snapshot.criteria,
        RatingsMatrix::new(),
    )
    .expect_err("non-numeric weight rejected");

    match &error {
        RatingsImportError::InvalidValue {
            line,
            criterion_id,
            value,
        } => {
            assert_eq!(*line, 3);
            assert_eq!(criterion_id, "weight");
            assert_eq!(value, "light");
        }
        other => panic!("expected invalid value, got {other:?}"),
    }
    assert!(error.to_string().starts_with("line 3:"));
}

#[test]
fn importer_surfaces_missing_files_as_io_errors() {
    let snapshot = laptop_snapshot();
    let result = RatingsCsvImporter::from_path(
        "does/not/exist.csv",
        &snapshot.options,
        &snapshot.criteria,
        RatingsMatrix::new(),
    );
    assert!(matches!(result, Err(RatingsImportError::Io(_))));
}
