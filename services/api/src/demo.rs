use crate::infra::parse_mode;
use clap::Args;
use rankwise::config::AppConfig;
use rankwise::error::AppError;
use rankwise::workflows::decision::{
    Criterion, CriterionKind, CriterionWeights, DecisionDiagnostics, DecisionOption,
    DecisionSnapshot, RankingRow, RatingInputMode, RatingsMatrix, RawDirection, ResultMethod,
    ResultsProjection, SevenLevel,
};
use rankwise::workflows::import::RatingsCsvImporter;
use serde::Serialize;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct RankArgs {
    /// Decision snapshot JSON with options, criteria, ratings, and weights
    #[arg(long)]
    pub(crate) input: PathBuf,
    /// Optional option,criterion,value CSV applied on top of the snapshot ratings
    #[arg(long)]
    pub(crate) ratings_csv: Option<PathBuf>,
    /// Display mode deciding which rating sub-value wins (numeric or seven-level)
    #[arg(long, value_parser = parse_mode)]
    pub(crate) mode: Option<RatingInputMode>,
    /// Print per-criterion contributions under each option
    #[arg(long)]
    pub(crate) explain: bool,
    /// Fill blank rating cells with the neutral value before ranking
    #[arg(long)]
    pub(crate) fill_neutral: bool,
    /// Emit the full projection as JSON instead of text
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Display mode deciding which rating sub-value wins (numeric or seven-level)
    #[arg(long, value_parser = parse_mode)]
    pub(crate) mode: Option<RatingInputMode>,
    /// Fill blank rating cells with the neutral value before ranking
    #[arg(long)]
    pub(crate) fill_neutral: bool,
}

#[derive(Debug, Serialize)]
struct RankOutput<'a> {
    rating_input_mode: RatingInputMode,
    filled_count: usize,
    results: &'a ResultsProjection,
    diagnostics: &'a DecisionDiagnostics,
}

pub(crate) fn run_rank(args: RankArgs) -> Result<(), AppError> {
    let RankArgs {
        input,
        ratings_csv,
        mode,
        explain,
        fill_neutral,
        json,
    } = args;

    let mode = resolve_mode(mode)?;
    let mut snapshot = load_snapshot(input, ratings_csv)?;
    let filled_count = if fill_neutral {
        snapshot.fill_missing_with_neutral(mode)
    } else {
        0
    };

    let results = snapshot.results(mode);
    let diagnostics = snapshot.diagnostics(mode);

    if json {
        let output = RankOutput {
            rating_input_mode: mode,
            filled_count,
            results: &results,
            diagnostics: &diagnostics,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        render_results(&snapshot, &results, &diagnostics, mode, filled_count, explain);
    }

    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs { mode, fill_neutral } = args;
    let mode = resolve_mode(mode)?;

    let mut snapshot = sample_snapshot();
    snapshot.validate()?;

    println!("Rankwise demo: choosing an apartment");
    let pending = snapshot.review_items();
    if !pending.is_empty() {
        println!("Blank ratings awaiting review");
        for item in &pending {
            println!("- {} / {}", item.option_title, item.criterion_title);
        }
    }

    let filled_count = if fill_neutral {
        snapshot.fill_missing_with_neutral(mode)
    } else {
        0
    };

    let results = snapshot.results(mode);
    let diagnostics = snapshot.diagnostics(mode);
    render_results(&snapshot, &results, &diagnostics, mode, filled_count, true);
    Ok(())
}

fn resolve_mode(requested: Option<RatingInputMode>) -> Result<RatingInputMode, AppError> {
    match requested {
        Some(mode) => Ok(mode),
        None => Ok(AppConfig::load()?.decision.rating_input_mode),
    }
}

pub(crate) fn load_snapshot(
    input: PathBuf,
    ratings_csv: Option<PathBuf>,
) -> Result<DecisionSnapshot, AppError> {
    let raw = std::fs::read_to_string(input)?;
    let mut snapshot: DecisionSnapshot = serde_json::from_str(&raw)?;
    snapshot.validate()?;

    if let Some(path) = ratings_csv {
        let base = std::mem::take(&mut snapshot.ratings);
        snapshot.ratings =
            RatingsCsvImporter::from_path(path, &snapshot.options, &snapshot.criteria, base)?;
    }

    Ok(snapshot)
}

pub(crate) fn sample_snapshot() -> DecisionSnapshot {
    let options = vec![
        DecisionOption::new("loft", "Harbor Loft", 0),
        DecisionOption::new("studio", "Elm Street Studio", 1),
        DecisionOption::new("duplex", "Maple Duplex", 2),
    ];
    let criteria = vec![
        Criterion::rating("light", "Natural light", 0),
        Criterion::rating("commute", "Commute", 1),
        Criterion::measured("rent", "Monthly rent", 2, RawDirection::LowerBetter, Some("USD")),
        Criterion::measured("area", "Floor area", 3, RawDirection::HigherBetter, Some("m2")),
    ];

    let mut ratings = RatingsMatrix::new();
    ratings.set_rating_numeric("loft", "light", Some(18.0));
    ratings.set_rating_seven_level("studio", "light", Some(SevenLevel::Poor));
    ratings.set_rating_numeric("duplex", "light", Some(12.5));
    ratings.set_rating_seven_level("loft", "commute", Some(SevenLevel::Ok));
    ratings.set_rating_numeric("studio", "commute", Some(19.0));
    ratings.set_measured_raw("loft", "rent", Some(2150.0));
    ratings.set_measured_raw("studio", "rent", Some(1290.0));
    ratings.set_measured_raw("duplex", "rent", Some(1640.0));
    ratings.set_measured_raw("loft", "area", Some(74.0));
    ratings.set_measured_raw("studio", "area", Some(31.0));
    ratings.set_measured_raw("duplex", "area", Some(88.0));

    let weights: CriterionWeights = [("light", 2), ("commute", 3), ("rent", 4), ("area", 1)]
        .into_iter()
        .collect();

    DecisionSnapshot {
        options,
        criteria,
        ratings,
        weights,
    }
}

fn criterion_line(criterion: &Criterion) -> String {
    let mut line = format!("- {}: {}", criterion.title, criterion.criterion_type().label());
    if let CriterionKind::NumericMeasured {
        raw_direction,
        unit,
    } = &criterion.kind
    {
        line.push_str(", ");
        line.push_str(raw_direction.label());
        if let Some(unit) = unit {
            line.push_str(&format!(" ({unit})"));
        }
    }
    line
}

fn weights_line(weights: &CriterionWeights) -> String {
    if weights.is_empty() {
        return "Weights: none assigned".to_string();
    }
    let entries: Vec<String> = weights
        .iter()
        .map(|(criterion_id, weight)| format!("{criterion_id}={weight}"))
        .collect();
    format!("Weights: {}", entries.join(", "))
}

fn rank_label(row: &RankingRow) -> String {
    match row.rank {
        Some(rank) => format!("#{rank}"),
        None => "--".to_string(),
    }
}

pub(crate) fn render_results(
    snapshot: &DecisionSnapshot,
    results: &ResultsProjection,
    diagnostics: &DecisionDiagnostics,
    mode: RatingInputMode,
    filled_count: usize,
    explain: bool,
) {
    println!(
        "\nDecision results: {} options, {} criteria (display mode {})",
        snapshot.options.len(),
        snapshot.criteria.len(),
        mode.label()
    );
    if filled_count > 0 {
        println!(
            "Filled {} blank ratings with the neutral value ({})",
            filled_count,
            SevenLevel::Ok.label()
        );
    }

    let mut criteria: Vec<&Criterion> = snapshot.criteria.iter().collect();
    criteria.sort_by(|a, b| a.order.cmp(&b.order).then_with(|| a.id.cmp(&b.id)));
    println!("\nCriteria");
    for criterion in criteria {
        println!("{}", criterion_line(criterion));
    }
    println!("{}", weights_line(&snapshot.weights));

    let weight_status = &diagnostics.weight_status;
    if !weight_status.is_complete {
        println!(
            "Weights assigned for {}/{} criteria; unweighted criteria are ignored: {}",
            weight_status.assigned_count,
            weight_status.total_criteria,
            weight_status.missing_criterion_ids.join(", ")
        );
    }

    println!("\n{} ranking", ResultMethod::Wsm.label());
    for row in &results.ranking_rows {
        println!(
            "- {} {}: {} ({}% coverage, {})",
            rank_label(row),
            row.option_title,
            row.score_label,
            row.coverage_percent,
            row.coverage_severity.label()
        );

        if explain {
            for contribution in &row.contributions {
                match contribution.desirability {
                    Some(desirability) => println!(
                        "    {}: desirability {:.2}, weight {} ({:.1}%), contribution {:.3}",
                        contribution.criterion_title,
                        desirability,
                        contribution.criterion_weight,
                        contribution.normalized_weight * 100.0,
                        contribution.wsm_contribution
                    ),
                    None => println!("    {}: no data", contribution.criterion_title),
                }
            }
        }
    }

    let check = &results.method_check;
    println!("\nStrict check: {}", check.summary);
    if check.can_expand {
        println!(
            "- {} favors {} | {} favors {}",
            ResultMethod::Wsm.label(),
            check.difference.wsm_top_option_title.as_deref().unwrap_or("--"),
            ResultMethod::Wpm.label(),
            check.difference.wpm_top_option_title.as_deref().unwrap_or("--")
        );
        for row in &check.wpm.rows {
            println!("  {} {}: {}", rank_label(row), row.option_title, row.score_label);
        }
    }

    let sparse: Vec<_> = diagnostics
        .criterion_blank_rates
        .iter()
        .filter(|rate| rate.is_soft_warning)
        .collect();
    if !sparse.is_empty() {
        println!("\nSparse criteria");
        for rate in sparse {
            println!(
                "- {}: {}/{} options blank",
                rate.criterion_id, rate.blanks, rate.total_options
            );
        }
    }

    let completion = &diagnostics.ratings_completion;
    println!(
        "\nRatings completion: {}% ({} of {} cells)",
        completion.completion_percent, completion.filled_count, completion.total_cells
    );
}
