pub mod cli;
pub mod toml_config;

use crate::core::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation;
#[cfg(feature = "cli")]
use crate::utils::validation::Validate;
#[cfg(feature = "cli")]
use clap::Parser;
use serde::{Deserialize, Serialize};

pub const DEFAULT_HOURS_URL: &str = "https://www.tntech.edu/recreation/hours.php";
pub const DEFAULT_CLASSES_URL: &str = "https://www.tntech.edu/recreation/group-classes.php";
pub const DEFAULT_HOURS_FILE: &str = "schedule.json";
pub const DEFAULT_CLASSES_FILE: &str = "group_classes.json";
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;
pub const DEFAULT_RETRY_DELAY_SECONDS: u64 = 2;
pub const MAX_RETRY_ATTEMPTS: u32 = 10;

/// Which pages a run scrapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum Target {
    #[default]
    All,
    Hours,
    Classes,
}

impl Target {
    pub fn includes_hours(self) -> bool {
        matches!(self, Target::All | Target::Hours)
    }

    pub fn includes_classes(self) -> bool {
        matches!(self, Target::All | Target::Classes)
    }
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "rec-etl")]
#[command(about = "Scrapes recreation center hours and group fitness classes into JSON")]
pub struct CliConfig {
    #[arg(long, default_value = DEFAULT_HOURS_URL)]
    pub hours_url: String,

    #[arg(long, default_value = DEFAULT_CLASSES_URL)]
    pub classes_url: String,

    #[arg(long, default_value = ".")]
    pub output_path: String,

    #[arg(long, default_value = DEFAULT_HOURS_FILE)]
    pub hours_file: String,

    #[arg(long, default_value = DEFAULT_CLASSES_FILE)]
    pub classes_file: String,

    #[arg(long = "format", value_delimiter = ',', default_value = "json")]
    pub output_formats: Vec<String>,

    #[arg(long, value_enum, default_value_t = Target::All)]
    pub target: Target,

    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECONDS)]
    pub timeout_seconds: u64,

    #[arg(long, default_value_t = 0)]
    pub retry_attempts: u32,

    #[arg(long, default_value_t = DEFAULT_RETRY_DELAY_SECONDS)]
    pub retry_delay_seconds: u64,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub log_json: bool,

    #[arg(long, help = "Log CPU and memory usage after each phase")]
    pub monitor: bool,
}

#[cfg(feature = "cli")]
impl ConfigProvider for CliConfig {
    fn hours_url(&self) -> &str {
        &self.hours_url
    }

    fn classes_url(&self) -> &str {
        &self.classes_url
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn hours_filename(&self) -> &str {
        &self.hours_file
    }

    fn classes_filename(&self) -> &str {
        &self.classes_file
    }

    fn output_formats(&self) -> &[String] {
        &self.output_formats
    }

    fn timeout_seconds(&self) -> u64 {
        self.timeout_seconds
    }

    fn retry_attempts(&self) -> u32 {
        self.retry_attempts
    }

    fn retry_delay_seconds(&self) -> u64 {
        self.retry_delay_seconds
    }
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_provider(self, self.target)
    }
}

/// Checks shared by every configuration source.
pub fn validate_provider<C: ConfigProvider>(config: &C, target: Target) -> Result<()> {
    if target.includes_hours() {
        validation::validate_url("hours_url", config.hours_url())?;
        validation::validate_file_name("hours_file", config.hours_filename())?;
    }
    if target.includes_classes() {
        validation::validate_url("classes_url", config.classes_url())?;
        validation::validate_file_name("classes_file", config.classes_filename())?;
    }
    validation::validate_path("output_path", config.output_path())?;
    validation::validate_output_formats("output_formats", config.output_formats())?;
    validation::validate_positive_number("timeout_seconds", config.timeout_seconds(), 1)?;
    validation::validate_range(
        "retry_attempts",
        config.retry_attempts(),
        0,
        MAX_RETRY_ATTEMPTS,
    )?;
    Ok(())
}
