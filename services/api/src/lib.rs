mod batch;
mod cli;
mod infra;
mod routes;
mod server;

use sales_forecast::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
