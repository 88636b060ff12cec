use chrono::{Local, NaiveDate};
use clap::Args;
use mediation_predictor::config::{AppConfig, ArtifactConfig};
use mediation_predictor::error::AppError;
use mediation_predictor::telemetry;
use mediation_predictor::workflows::mediation::features::parse_date;
use mediation_predictor::workflows::mediation::{
    panels, CaseInput, CategoryField, MediationPredictor, Prediction, PredictionView,
};
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct PredictArgs {
    /// Registration date (YYYY-MM-DD). Defaults to today.
    #[arg(long, value_parser = parse_date)]
    pub(crate) date: Option<NaiveDate>,
    /// Intake category exactly as the encoder knows it
    #[arg(long)]
    pub(crate) intake: String,
    /// Dispute category exactly as the encoder knows it
    #[arg(long)]
    pub(crate) dispute: String,
    /// Directory holding the model and encoder artifacts
    #[arg(long)]
    pub(crate) artifact_dir: Option<PathBuf>,
    /// Print the prediction as JSON instead of text panels
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct CategoriesArgs {
    /// Directory holding the model and encoder artifacts
    #[arg(long)]
    pub(crate) artifact_dir: Option<PathBuf>,
}

pub(crate) fn artifact_config(
    config: &AppConfig,
    artifact_dir: Option<PathBuf>,
) -> ArtifactConfig {
    let mut artifacts = config.artifacts.clone();
    if let Some(dir) = artifact_dir {
        artifacts.dir = dir;
    }
    artifacts
}

/// Load config, install logging, then load the artifacts for a one-shot command.
fn prepare(artifact_dir: Option<PathBuf>) -> Result<MediationPredictor, AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;
    Ok(MediationPredictor::load(&artifact_config(&config, artifact_dir))?)
}

pub(crate) fn run_predict(args: PredictArgs) -> Result<(), AppError> {
    let PredictArgs {
        date,
        intake,
        dispute,
        artifact_dir,
        json,
    } = args;

    let predictor = prepare(artifact_dir)?;

    let input = CaseInput {
        date_registered: date.unwrap_or_else(|| Local::now().date_naive()),
        type_of_intake: intake,
        type_of_dispute: dispute,
    };
    let prediction = predictor.predict(&input)?;

    if json {
        let view = PredictionView::from(prediction);
        let rendered = serde_json::to_string_pretty(&view).map_err(std::io::Error::from)?;
        println!("{rendered}");
    } else {
        print!("{}", render_prediction(&prediction));
    }

    Ok(())
}

pub(crate) fn run_categories(args: CategoriesArgs) -> Result<(), AppError> {
    let predictor = prepare(args.artifact_dir)?;
    print!("{}", render_categories(&predictor));
    Ok(())
}

pub(crate) fn render_prediction(prediction: &Prediction) -> String {
    let mut out = String::new();
    out.push_str("Mediation case prediction\n");
    out.push_str(&format!(
        "Registered {} | intake {} | dispute {}\n",
        prediction.input.date_registered,
        prediction.input.type_of_intake,
        prediction.input.type_of_dispute
    ));

    for panel in panels(&prediction.display) {
        out.push_str(&format!("\n{} {}\n", panel.icon, panel.headline));
        out.push_str(&format!(
            "  {}: {}\n",
            panel.probability_label, panel.percentage
        ));
        for note in &panel.notes {
            out.push_str(&format!("  {note}\n"));
        }
    }
    out
}

pub(crate) fn render_categories(predictor: &MediationPredictor) -> String {
    let mut out = String::new();
    for field in [CategoryField::TypeOfIntake, CategoryField::TypeOfDispute] {
        out.push_str(&format!("{}\n", field.label()));
        for (code, name) in predictor.known_categories(field).iter().enumerate() {
            out.push_str(&format!("- [{code}] {name}\n"));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use mediation_predictor::workflows::mediation::{decide, FeatureVector};

    fn prediction(proceed: f64, settled: Option<f64>) -> Prediction {
        Prediction {
            input: CaseInput {
                date_registered: NaiveDate::from_ymd_opt(2024, 1, 6).unwrap(),
                type_of_intake: "Consumer".to_string(),
                type_of_dispute: "Billing".to_string(),
            },
            features: FeatureVector {
                is_weekend: 1,
                type_of_intake_code: 0,
                type_of_dispute_code: 0,
            },
            proceed_probability: proceed,
            settled_probability: settled,
            display: decide(proceed, settled),
        }
    }

    #[test]
    fn text_output_lists_both_panels() {
        let text = render_prediction(&prediction(0.62, Some(0.71)));
        assert!(text.contains("Case likely to proceed to mediation"));
        assert!(text.contains("Probability of proceeding to mediation: 62.00%"));
        assert!(text.contains("Probability of settlement: 71.00%"));
    }

    #[test]
    fn text_output_notes_settlement_not_applicable() {
        let text = render_prediction(&prediction(0.2, None));
        assert!(text.contains("Case unlikely to proceed to mediation"));
        assert!(text.contains("settlement is not applicable"));
    }

    #[test]
    fn one_shot_commands_install_logging_before_loading() {
        let bundled = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../artifacts");
        let predictor = prepare(Some(bundled)).expect("bundled artifacts load");
        assert!(tracing::dispatcher::has_been_set());
        assert!(render_categories(&predictor).contains("Type of Dispute"));
    }

    #[test]
    fn cli_artifact_dir_overrides_config() {
        let config = AppConfig {
            environment: mediation_predictor::config::AppEnvironment::Test,
            server: mediation_predictor::config::ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 3000,
            },
            telemetry: mediation_predictor::config::TelemetryConfig {
                log_level: "info".to_string(),
            },
            artifacts: ArtifactConfig::default(),
        };
        let artifacts = artifact_config(&config, Some(PathBuf::from("/models")));
        assert_eq!(artifacts.dir, PathBuf::from("/models"));
        assert_eq!(artifacts.proceed_model, config.artifacts.proceed_model);
        assert_eq!(artifact_config(&config, None), config.artifacts);
    }
}
