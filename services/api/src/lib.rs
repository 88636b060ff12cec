mod cli;
mod infra;
mod page;
mod predict;
mod routes;
mod server;

use mediation_predictor::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
