use anyhow::{anyhow, Context, Result};
use chrono::Local;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Directory names treated as a source folder rather than the project root.
const SOURCE_DIR_NAMES: &[&str] = &["src"];

pub const ROOT_ENV_VAR: &str = "HEART_PROJECT_ROOT";
pub const DEFAULT_MAX_ITERATIONS: u64 = 1000;
pub const DEFAULT_TARGET_COLUMN: &str = "target";

/// Optional user settings, read from `heart.toml`.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct Settings {
    /// Overrides root resolution entirely
    #[serde(default)]
    pub project_root: Option<PathBuf>,
    /// Logistic regression iteration bound. Defaults to 1000
    #[serde(default)]
    pub max_iterations: Option<u64>,
    /// Label column in CSV inputs. Defaults to "target"
    #[serde(default)]
    pub target_column: Option<String>,
}

impl Settings {
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading settings {}", path.display()))?;
        Ok(toml::from_str(&content).map_err(|e| anyhow!(e))?)
    }

    /// Like `from_file`, but a missing file yields the defaults.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::from_file(path)
        } else {
            log::debug!("Settings file '{}' not found, using defaults", path.display());
            Ok(Self::default())
        }
    }

    pub fn max_iterations(&self) -> u64 {
        self.max_iterations.unwrap_or(DEFAULT_MAX_ITERATIONS)
    }

    pub fn target_column(&self) -> &str {
        self.target_column.as_deref().unwrap_or(DEFAULT_TARGET_COLUMN)
    }
}

/// Resolved filesystem layout. Every path lives under `project_root`.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub project_root: PathBuf,
    pub artifacts_path: PathBuf,
    pub data_path: PathBuf,
    pub raw_data_path: PathBuf,
    pub output_data_path: PathBuf,
    pub logs_path: PathBuf,

    pub model_path: PathBuf,
    pub pipeline_path: PathBuf,
    pub label_encoder_path: PathBuf,

    pub prediction_data_path: PathBuf,

    pub max_iterations: u64,
}

impl AppConfig {
    /// Builds the layout from settings. Root precedence: `project_root` in the
    /// settings, then `HEART_PROJECT_ROOT`, then the source-folder convention.
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let root = match &settings.project_root {
            Some(root) => root.clone(),
            None => match std::env::var_os(ROOT_ENV_VAR) {
                Some(root) => PathBuf::from(root),
                None => resolve_project_root(&default_base_dir()),
            },
        };
        let mut cfg = Self::with_root(root)?;
        cfg.max_iterations = settings.max_iterations();
        Ok(cfg)
    }

    /// Derives every path from `root` and creates the directories.
    pub fn with_root(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref();
        let project_root = if root.is_absolute() {
            root.to_path_buf()
        } else {
            std::env::current_dir()?.join(root)
        };

        let artifacts_path = project_root.join("artifacts");
        let data_path = project_root.join("data");
        let raw_data_path = data_path.join("raw");
        let output_data_path = data_path.join("output");
        let logs_path = project_root.join("logs");

        let cfg = Self {
            model_path: artifacts_path.join("heart_model.pkl"),
            pipeline_path: artifacts_path.join("heart_pipeline.pkl"),
            label_encoder_path: artifacts_path.join("heart_label_encoder.pkl"),
            prediction_data_path: raw_data_path.join("prediction.csv"),
            project_root,
            artifacts_path,
            data_path,
            raw_data_path,
            output_data_path,
            logs_path,
            max_iterations: DEFAULT_MAX_ITERATIONS,
        };
        cfg.create_directories()?;
        Ok(cfg)
    }

    pub fn create_directories(&self) -> Result<()> {
        for dir in [
            &self.artifacts_path,
            &self.raw_data_path,
            &self.output_data_path,
            &self.logs_path,
        ] {
            fs::create_dir_all(dir)
                .with_context(|| format!("creating directory {}", dir.display()))?;
        }
        Ok(())
    }

    /// Log file for the current local date.
    pub fn log_file_path(&self) -> PathBuf {
        let stamp = Local::now().format("%Y%m%d");
        self.logs_path.join(format!("heart_app_log_{stamp}.log"))
    }
}

/// Directory holding this source file.
pub fn default_base_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("src")
}

pub fn resolve_project_root(base_dir: &Path) -> PathBuf {
    let is_source_dir = base_dir
        .file_name()
        .and_then(|name| name.to_str())
        .map_or(false, |name| SOURCE_DIR_NAMES.contains(&name));
    match base_dir.parent() {
        Some(parent) if is_source_dir => parent.to_path_buf(),
        _ => base_dir.to_path_buf(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect_dirs(root: &Path) -> Vec<PathBuf> {
        let mut out = Vec::new();
        let mut stack = vec![root.to_path_buf()];
        while let Some(dir) = stack.pop() {
            for entry in fs::read_dir(&dir).unwrap() {
                let path = entry.unwrap().path();
                if path.is_dir() {
                    out.push(path.clone());
                    stack.push(path);
                }
            }
        }
        out.sort();
        out
    }

    #[test]
    fn source_folder_resolves_to_parent() {
        let root = resolve_project_root(Path::new("/srv/heart/src"));
        assert_eq!(root, PathBuf::from("/srv/heart"));
    }

    #[test]
    fn other_folder_is_its_own_root() {
        let root = resolve_project_root(Path::new("/srv/heart/app"));
        assert_eq!(root, PathBuf::from("/srv/heart/app"));
    }

    #[test]
    fn default_base_dir_resolves_to_manifest_dir() {
        let root = resolve_project_root(&default_base_dir());
        assert_eq!(root, PathBuf::from(env!("CARGO_MANIFEST_DIR")));
    }

    #[test]
    fn derived_paths_live_under_root() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = AppConfig::with_root(dir.path()).unwrap();

        for path in [
            &cfg.artifacts_path,
            &cfg.raw_data_path,
            &cfg.output_data_path,
            &cfg.logs_path,
            &cfg.model_path,
            &cfg.pipeline_path,
            &cfg.label_encoder_path,
            &cfg.prediction_data_path,
        ] {
            assert!(path.starts_with(dir.path()), "{} escapes root", path.display());
        }
        assert!(cfg.model_path.ends_with("artifacts/heart_model.pkl"));
        assert!(cfg.pipeline_path.ends_with("artifacts/heart_pipeline.pkl"));
        assert!(cfg.label_encoder_path.ends_with("artifacts/heart_label_encoder.pkl"));
        assert!(cfg.prediction_data_path.ends_with("data/raw/prediction.csv"));
        assert!(cfg.output_data_path.is_dir());
        assert!(cfg.logs_path.is_dir());
    }

    #[test]
    fn create_directories_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = AppConfig::with_root(dir.path()).unwrap();
        let before = collect_dirs(dir.path());

        cfg.create_directories().unwrap();
        cfg.create_directories().unwrap();

        assert_eq!(before, collect_dirs(dir.path()));
    }

    #[test]
    fn log_file_name_embeds_eight_digit_date() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = AppConfig::with_root(dir.path()).unwrap();
        let path = cfg.log_file_path();
        let name = path.file_name().unwrap().to_str().unwrap();

        let stamp = name
            .strip_prefix("heart_app_log_")
            .and_then(|rest| rest.strip_suffix(".log"))
            .expect("unexpected log file name");
        assert_eq!(stamp.len(), 8);
        assert!(stamp.chars().all(|c| c.is_ascii_digit()));
        assert_eq!(stamp, Local::now().format("%Y%m%d").to_string());
        assert_eq!(path.parent().unwrap(), cfg.logs_path);
    }

    #[test]
    fn settings_fill_defaults_and_root() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("heart.toml");
        let root = dir.path().join("project");
        fs::write(
            &file,
            format!("project_root = {:?}\nmax_iterations = 250\n", root.display().to_string()),
        )
        .unwrap();

        let settings = Settings::from_file(&file).unwrap();
        assert_eq!(settings.max_iterations(), 250);
        assert_eq!(settings.target_column(), DEFAULT_TARGET_COLUMN);

        let cfg = AppConfig::from_settings(&settings).unwrap();
        assert_eq!(cfg.project_root, root);
        assert_eq!(cfg.max_iterations, 250);
        assert!(cfg.artifacts_path.is_dir());
    }

    #[test]
    fn missing_settings_file_means_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::load_or_default(&dir.path().join("absent.toml")).unwrap();
        assert!(settings.project_root.is_none());
        assert_eq!(settings.max_iterations(), DEFAULT_MAX_ITERATIONS);
    }
}
