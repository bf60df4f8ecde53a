//! Heart-disease classifier tooling.
//! - Paths and settings via `config::AppConfig`
//! - Dated log file plus stdout echo via `logging`
//! - Logistic regression (Linfa) persisted with bincode
//! - Accuracy, confusion matrix and classification report via `metrics`

pub mod artifact;
pub mod config;
pub mod data;
pub mod encoder;
pub mod error;
pub mod logging;
pub mod metrics;
pub mod ml;
pub mod model;

pub use config::{AppConfig, Settings};
pub use encoder::LabelEncoder;
pub use error::PredictionError;
pub use logging::{init_logging, log_error, log_info, ConsoleLog, EventLog};
pub use ml::{Evaluation, HeartModel};
pub use model::MlModel;
