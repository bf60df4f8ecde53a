//! Heart-disease classifier CLI
//! - `train`: fit logistic regression on a labelled CSV
//! - `predict`: decode predictions for `data/raw/prediction.csv`
//! - `evaluate`: accuracy, confusion matrix and report on a labelled CSV

use anyhow::{Context, Result};
use heart_predictor::data::Table;
use heart_predictor::{init_logging, AppConfig, ConsoleLog, HeartModel, LabelEncoder, Settings};
use serde::Serialize;
use std::fs;
use std::path::PathBuf;
use structopt::StructOpt;

#[derive(StructOpt, Debug)]
#[structopt(name = "heart_predictor")]
struct Cli {
    /// Path to settings file
    #[structopt(short, long, default_value = "heart.toml", parse(from_os_str))]
    config: PathBuf,

    #[structopt(subcommand)]
    cmd: Command,
}

#[derive(StructOpt, Debug)]
enum Command {
    /// Fit the model on a labelled CSV
    Train {
        #[structopt(long, parse(from_os_str))]
        data: PathBuf,
    },
    /// Predict labels for unlabelled rows
    Predict {
        /// Defaults to data/raw/prediction.csv
        #[structopt(long, parse(from_os_str))]
        input: Option<PathBuf>,
        /// Defaults to data/output/predictions.csv
        #[structopt(long, parse(from_os_str))]
        output: Option<PathBuf>,
    },
    /// Score the saved model on a labelled CSV
    Evaluate {
        #[structopt(long, parse(from_os_str))]
        data: PathBuf,
    },
}

#[derive(Serialize)]
struct EvaluationSummary<'a> {
    accuracy: f64,
    labels: &'a [String],
    confusion_matrix: Vec<Vec<usize>>,
    report: &'a str,
}

fn main() -> Result<()> {
    let args = Cli::from_args();
    let settings = Settings::load_or_default(&args.config)?;
    let cfg = AppConfig::from_settings(&settings)?;
    init_logging(&cfg)?;

    let target = settings.target_column();
    let heart = HeartModel::new(&cfg, ConsoleLog);

    match args.cmd {
        Command::Train { data } => {
            let table = Table::from_csv(&data, target)?;
            let labels = table.require_targets(target)?;
            let encoder = if cfg.label_encoder_path.exists() {
                LabelEncoder::load(&cfg.label_encoder_path)?
            } else {
                let encoder = LabelEncoder::fit(labels);
                encoder.save(&cfg.label_encoder_path)?;
                log::info!(
                    "Label encoder with classes {:?} saved to {}",
                    encoder.classes(),
                    cfg.label_encoder_path.display()
                );
                encoder
            };
            let y = encoder.transform(labels)?;
            heart.train_model(table.records, y)?;
        }
        Command::Predict { input, output } => {
            let input = input.unwrap_or_else(|| cfg.prediction_data_path.clone());
            let output = output.unwrap_or_else(|| cfg.output_data_path.join("predictions.csv"));
            let table = Table::from_csv(&input, target)?;
            let preds = heart.predict(&table.records)?;

            let mut wtr = csv::Writer::from_path(&output)
                .with_context(|| format!("creating {}", output.display()))?;
            wtr.write_record(["prediction"])?;
            for label in &preds {
                wtr.write_record([label])?;
            }
            wtr.flush()?;
            log::info!("Wrote {} predictions to {}", preds.len(), output.display());
        }
        Command::Evaluate { data } => {
            let table = Table::from_csv(&data, target)?;
            let labels = table.require_targets(target)?;
            let encoder = LabelEncoder::load(&cfg.label_encoder_path)?;
            let y = encoder.transform(labels)?;
            let eval = heart.evaluate(&table.records, &y)?;

            println!("Accuracy: {:.4}", eval.accuracy);
            println!("Confusion matrix ({}):", eval.confusion.labels.join(", "));
            println!("{}", eval.confusion.counts);
            println!("{}", eval.report);

            let summary = EvaluationSummary {
                accuracy: eval.accuracy,
                labels: &eval.confusion.labels,
                confusion_matrix: eval.confusion.to_rows(),
                report: &eval.report,
            };
            let path = cfg.output_data_path.join("evaluation.json");
            fs::write(&path, serde_json::to_string_pretty(&summary)?)?;
            log::info!("Evaluation summary written to {}", path.display());
        }
    }
    Ok(())
}
