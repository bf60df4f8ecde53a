//! Process-wide log sink plus the console echo used by every operation.
//!
//! File lines look like `2026-10-19 14:03:11 — INFO — Evaluation complete.`.

use crate::config::AppConfig;
use anyhow::{Context, Result};
use chrono::Local;
use log::LevelFilter;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;
use std::sync::OnceLock;

static INSTALLED: OnceLock<PathBuf> = OnceLock::new();

/// Installs the dated file sink. Later calls return the first file's path.
pub fn init_logging(cfg: &AppConfig) -> Result<PathBuf> {
    if let Some(path) = INSTALLED.get() {
        return Ok(path.clone());
    }

    let path = cfg.log_file_path();
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("opening log file {}", path.display()))?;

    env_logger::Builder::new()
        .filter_level(LevelFilter::Info)
        .write_style(env_logger::WriteStyle::Never)
        .target(env_logger::Target::Pipe(Box::new(file)))
        .format(|buf, record| {
            writeln!(
                buf,
                "{} — {} — {}",
                Local::now().format("%Y-%m-%d %H:%M:%S"),
                record.level(),
                record.args()
            )
        })
        .try_init()
        .context("another logger is already installed")?;

    Ok(INSTALLED.get_or_init(|| path).clone())
}

pub fn log_info(message: &str) {
    println!("[INFO] {message}");
    log::info!("{message}");
}

pub fn log_error(message: &str) {
    println!("[ERROR] {message}");
    log::error!("{message}");
}

/// Where the ML operations report outcomes.
pub trait EventLog {
    fn info(&self, message: &str);
    fn error(&self, message: &str);
}

/// Stdout echo plus the installed file sink.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleLog;

impl EventLog for ConsoleLog {
    fn info(&self, message: &str) {
        log_info(message);
    }

    fn error(&self, message: &str) {
        log_error(message);
    }
}
