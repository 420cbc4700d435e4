use crate::error::Bfi2Error;
use serde::Deserialize;
use std::path::PathBuf;

/// Process-level settings read from `bfi2.toml`. Only the command-line
/// boundary consumes these; the scoring core takes everything explicitly.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub study: StudyConfig,
    #[serde(default)]
    pub scoring: ScoringPaths,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StudyConfig {
    pub name: Option<String>,
    #[serde(default = "default_persona")]
    pub default_persona: String,
}

impl Default for StudyConfig {
    fn default() -> Self {
        Self {
            name: None,
            default_persona: default_persona(),
        }
    }
}

fn default_persona() -> String {
    "unknown".to_string()
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScoringPaths {
    /// Scoring key document; the embedded BFI-2 key when absent.
    pub config: Option<PathBuf>,
    /// Question catalogue; the embedded BFI-2 items when absent.
    pub questions: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_results_dir")]
    pub results_dir: PathBuf,
    #[serde(default = "default_write_latest")]
    pub write_latest: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            results_dir: default_results_dir(),
            write_latest: default_write_latest(),
        }
    }
}

fn default_results_dir() -> PathBuf {
    PathBuf::from("results")
}

fn default_write_latest() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

impl Settings {
    pub fn validate(&self) -> Result<(), Bfi2Error> {
        if self.study.default_persona.trim().is_empty() {
            return Err(Bfi2Error::SettingsParse(
                "study.default_persona must not be empty".to_string(),
            ));
        }

        if self.output.results_dir.as_os_str().is_empty() {
            return Err(Bfi2Error::SettingsParse(
                "output.results_dir must not be empty".to_string(),
            ));
        }

        let level = self.logging.level.trim().to_ascii_lowercase();
        if !LOG_LEVELS.contains(&level.as_str()) {
            return Err(Bfi2Error::SettingsParse(format!(
                "unsupported logging.level: {} (expected one of {})",
                self.logging.level,
                LOG_LEVELS.join(", ")
            )));
        }

        Ok(())
    }
}
