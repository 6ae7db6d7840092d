use crate::core::Pipeline;
use crate::utils::error::Result;
use crate::utils::monitor::SystemMonitor;

pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
    monitor: SystemMonitor,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self::new_with_monitoring(pipeline, false)
    }

    pub fn new_with_monitoring(pipeline: P, monitor_enabled: bool) -> Self {
        Self {
            pipeline,
            monitor: SystemMonitor::new(monitor_enabled),
        }
    }

    pub fn pipeline(&self) -> &P {
        &self.pipeline
    }

    pub async fn run(&self) -> Result<String> {
        let name = self.pipeline.name();
        tracing::info!("🚀 Starting {} pipeline", name);

        // Extract
        tracing::debug!("[{}] extracting", name);
        let raw = self.pipeline.extract().await?;
        self.monitor.log_stats(&format!("{} extract", name));

        // Transform
        tracing::debug!("[{}] transforming", name);
        let output = self.pipeline.transform(raw).await?;
        self.monitor.log_stats(&format!("{} transform", name));

        // Load
        tracing::debug!("[{}] loading", name);
        let output_path = self.pipeline.load(output).await?;
        self.monitor.log_stats(&format!("{} load", name));

        tracing::info!("✅ {} pipeline finished, output: {}", name, output_path);
        self.monitor.log_final_stats();

        Ok(output_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::EtlError;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct StubPipeline {
        fail_transform: bool,
        calls: Mutex<Vec<&'static str>>,
    }

    impl StubPipeline {
        fn new(fail_transform: bool) -> Self {
            Self {
                fail_transform,
                calls: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl Pipeline for StubPipeline {
        type Raw = String;
        type Output = usize;

        fn name(&self) -> &str {
            "stub"
        }

        async fn extract(&self) -> Result<String> {
            self.calls.lock().unwrap().push("extract");
            Ok("<html></html>".to_string())
        }

        async fn transform(&self, raw: String) -> Result<usize> {
            self.calls.lock().unwrap().push("transform");
            if self.fail_transform {
                return Err(EtlError::ExtractionError {
                    message: "nothing to read".to_string(),
                });
            }
            Ok(raw.len())
        }

        async fn load(&self, output: usize) -> Result<String> {
            self.calls.lock().unwrap().push("load");
            Ok(format!("out/{}.json", output))
        }
    }

    #[tokio::test]
    async fn test_run_calls_phases_in_order() {
        let engine = EtlEngine::new(StubPipeline::new(false));
        let output = engine.run().await.unwrap();

        assert_eq!(output, "out/13.json");
        assert_eq!(
            *engine.pipeline().calls.lock().unwrap(),
            vec!["extract", "transform", "load"]
        );
    }

    #[tokio::test]
    async fn test_run_stops_at_failing_phase() {
        let engine = EtlEngine::new_with_monitoring(StubPipeline::new(true), false);
        let err = engine.run().await.unwrap_err();

        assert!(matches!(err, EtlError::ExtractionError { .. }));
        assert_eq!(
            *engine.pipeline().calls.lock().unwrap(),
            vec!["extract", "transform"]
        );
    }
}
