use crate::adapters::http::HttpFetcher;
use crate::app::pipelines::{ClassesPipeline, HoursPipeline};
use crate::config::cli::LocalStorage;
use crate::config::Target;
use crate::core::etl::EtlEngine;
use crate::core::{ConfigProvider, Pipeline};
use crate::utils::error::{EtlError, Result};

/// Outcome of one scrape run across every selected pipeline.
#[derive(Debug, Default)]
pub struct RunSummary {
    pub outputs: Vec<String>,
    pub failures: Vec<(String, EtlError)>,
}

impl RunSummary {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    /// Exit code of the most severe failure, 0 when everything succeeded.
    pub fn exit_code(&self) -> i32 {
        self.failures
            .iter()
            .map(|(_, e)| e.severity())
            .max()
            .map_or(0, |severity| severity.exit_code())
    }
}

/// Runs the hours pipeline, then the classes pipeline, for whichever the
/// target selects. A failing pipeline is recorded and the next one still runs.
pub async fn run_scrape<C>(config: &C, target: Target, monitor: bool) -> Result<RunSummary>
where
    C: ConfigProvider + Clone,
{
    let fetcher = HttpFetcher::from_config(config)?;
    let storage = LocalStorage::new(config.output_path());
    let mut summary = RunSummary::default();

    if target.includes_hours() {
        let pipeline = HoursPipeline::new(storage.clone(), fetcher.clone(), config.clone());
        run_pipeline(pipeline, monitor, &mut summary).await;
    }

    if target.includes_classes() {
        let pipeline = ClassesPipeline::new(storage, fetcher, config.clone());
        run_pipeline(pipeline, monitor, &mut summary).await;
    }

    Ok(summary)
}

async fn run_pipeline<P: Pipeline>(pipeline: P, monitor: bool, summary: &mut RunSummary) {
    let name = pipeline.name().to_string();
    let engine = EtlEngine::new_with_monitoring(pipeline, monitor);

    match engine.run().await {
        Ok(output) => {
            tracing::info!("📁 {} output saved to: {}", name, output);
            summary.outputs.push(output);
        }
        Err(e) => {
            tracing::error!(
                "❌ {} pipeline failed: {} (Category: {:?}, Severity: {:?})",
                name,
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
            summary.failures.push((name, e));
        }
    }
}
