pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::{cli::LocalStorage, toml_config::TomlConfig, Target};

pub use adapters::http::HttpFetcher;
pub use app::pipelines::{ClassesPipeline, HoursPipeline};
pub use app::runner::{run_scrape, RunSummary};
pub use crate::core::{etl::EtlEngine, RangeFormatter, TimeNormalizer};
pub use utils::error::{EtlError, Result};
