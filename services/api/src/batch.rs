use crate::cli::ArtifactArgs;
use crate::infra::{apply_artifact_overrides, load_prediction_service};
use clap::Args;
use sales_forecast::config::AppConfig;
use sales_forecast::error::AppError;
use sales_forecast::prediction::{BatchRow, BatchScorer, BatchSummary, PredictionOutcome};
use sales_forecast::telemetry;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct PredictArgs {
    /// CSV file whose headers are the request fields (store_ID, day_of_week, ...)
    #[arg(long)]
    pub(crate) input: PathBuf,
    #[command(flatten)]
    pub(crate) artifacts: ArtifactArgs,
}

pub(crate) fn run_batch_prediction(args: PredictArgs) -> Result<(), AppError> {
    let PredictArgs { input, artifacts } = args;

    let mut config = AppConfig::load()?;
    apply_artifact_overrides(&mut config.artifacts, artifacts);
    telemetry::init(&config.telemetry)?;

    let service = load_prediction_service(&config.artifacts)?;
    let rows = BatchScorer::from_path(&input, &*service)?;

    println!("Sales predictions for {}", input.display());
    for row in &rows {
        println!("{}", render_row(row));
    }

    let summary = BatchSummary::from_rows(&rows);
    println!(
        "\n{} rows: {} modelled, {} zero sales, {} rejected, {} failed",
        rows.len(),
        summary.modelled,
        summary.zero_sales,
        summary.rejected,
        summary.failed
    );

    Ok(())
}

fn render_row(row: &BatchRow) -> String {
    match &row.result {
        Ok(PredictionOutcome::ZeroSales { reason }) => {
            format!("- line {}: 0.00 ({})", row.line, reason.label())
        }
        Ok(PredictionOutcome::Modelled { sales, low_traffic }) => {
            let note = if *low_traffic { " (low traffic)" } else { "" };
            format!("- line {}: {:.2}{}", row.line, sales, note)
        }
        Err(err) if err.is_client_error() => {
            format!("- line {}: rejected, {}", row.line, err)
        }
        Err(err) => format!("- line {}: failed, {}", row.line, err),
    }
}
