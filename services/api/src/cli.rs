use crate::predict::{run_categories, run_predict, CategoriesArgs, PredictArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use mediation_predictor::error::AppError;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "Mediation Case Predictor",
    about = "Score how likely a dispute case is to reach mediation and settle",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service with the prediction form (default command)
    Serve(ServeArgs),
    /// Score a single case from the command line
    Predict(PredictArgs),
    /// List the intake and dispute categories the encoders know
    Categories(CategoriesArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// Directory holding the model and encoder artifacts
    #[arg(long)]
    pub(crate) artifact_dir: Option<PathBuf>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Predict(args) => run_predict(args),
        Command::Categories(args) => run_categories(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_serve_without_subcommand() {
        let cli = Cli::try_parse_from(["mediation-predictor"]).expect("parses");
        assert!(cli.command.is_none());
    }

    #[test]
    fn parses_predict_arguments() {
        let cli = Cli::try_parse_from([
            "mediation-predictor",
            "predict",
            "--date",
            "2024-01-06",
            "--intake",
            "Consumer",
            "--dispute",
            "Billing",
            "--artifact-dir",
            "models",
        ])
        .expect("parses");

        match cli.command {
            Some(Command::Predict(args)) => {
                assert_eq!(args.date.map(|d| d.to_string()).as_deref(), Some("2024-01-06"));
                assert_eq!(args.intake, "Consumer");
                assert_eq!(args.artifact_dir, Some(PathBuf::from("models")));
                assert!(!args.json);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn rejects_malformed_dates() {
        let result = Cli::try_parse_from([
            "mediation-predictor",
            "predict",
            "--date",
            "06/01/2024",
            "--intake",
            "Consumer",
            "--dispute",
            "Billing",
        ]);
        assert!(result.is_err());
    }
}
