use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

/// Source of raw HTML pages.
pub trait PageSource: Send + Sync {
    fn fetch_page(&self, url: &str) -> impl std::future::Future<Output = Result<String>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn hours_url(&self) -> &str;
    fn classes_url(&self) -> &str;
    fn output_path(&self) -> &str;
    fn hours_filename(&self) -> &str;
    fn classes_filename(&self) -> &str;
    fn output_formats(&self) -> &[String];
    fn timeout_seconds(&self) -> u64;
    fn retry_attempts(&self) -> u32;
    fn retry_delay_seconds(&self) -> u64;

    fn wants_format(&self, format: &str) -> bool {
        self.output_formats()
            .iter()
            .any(|f| f.eq_ignore_ascii_case(format))
    }
}

/// Receives warnings about input that was skipped during normalization.
pub trait DiagnosticSink {
    fn warn(&self, message: &str);
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    type Raw: Send + 'static;
    type Output: Send + 'static;

    fn name(&self) -> &str;
    async fn extract(&self) -> Result<Self::Raw>;
    async fn transform(&self, raw: Self::Raw) -> Result<Self::Output>;
    async fn load(&self, output: Self::Output) -> Result<String>;
}
