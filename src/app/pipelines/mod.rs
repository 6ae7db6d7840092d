pub mod classes_pipeline;
pub mod hours_pipeline;

pub use classes_pipeline::ClassesPipeline;
pub use hours_pipeline::HoursPipeline;

use crate::utils::error::{EtlError, Result};
use serde::Serialize;
use std::path::Path;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Local wall-clock time in the format stored under `Current Time`.
pub fn current_timestamp() -> String {
    chrono::Local::now().format(TIMESTAMP_FORMAT).to_string()
}

/// Pretty JSON with four-space indentation.
pub(crate) fn to_json<T: Serialize>(value: &T) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut serializer)?;
    Ok(buf)
}

pub(crate) fn finish_csv(writer: csv::Writer<Vec<u8>>) -> Result<Vec<u8>> {
    writer
        .into_inner()
        .map_err(|e| EtlError::IoError(e.into_error()))
}

/// `schedule.json` → `schedule.csv`.
pub(crate) fn csv_filename(json_filename: &str) -> String {
    Path::new(json_filename)
        .with_extension("csv")
        .to_string_lossy()
        .into_owned()
}

pub(crate) fn output_location(output_path: &str, filename: &str) -> String {
    Path::new(output_path).join(filename).display().to_string()
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::core::{PageSource, Storage};
    use crate::utils::error::{EtlError, Result};
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    #[derive(Clone, Default)]
    pub struct MockStorage {
        files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    }

    impl MockStorage {
        pub fn new() -> Self {
            Self::default()
        }

        pub async fn get_file(&self, path: &str) -> Option<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned()
        }

        pub async fn file_names(&self) -> Vec<String> {
            let files = self.files.lock().await;
            let mut names: Vec<String> = files.keys().cloned().collect();
            names.sort();
            names
        }
    }

    impl Storage for MockStorage {
        async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned().ok_or_else(|| {
                EtlError::IoError(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("File not found: {}", path),
                ))
            })
        }

        async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
            let mut files = self.files.lock().await;
            files.insert(path.to_string(), data.to_vec());
            Ok(())
        }
    }

    /// Serves canned pages keyed by URL.
    #[derive(Clone, Default)]
    pub struct StaticPages {
        pages: HashMap<String, String>,
    }

    impl StaticPages {
        pub fn with_page(mut self, url: &str, html: &str) -> Self {
            self.pages.insert(url.to_string(), html.to_string());
            self
        }
    }

    impl PageSource for StaticPages {
        async fn fetch_page(&self, url: &str) -> Result<String> {
            self.pages
                .get(url)
                .cloned()
                .ok_or_else(|| EtlError::HttpStatusError {
                    url: url.to_string(),
                    status: 404,
                })
        }
    }

    pub struct MockConfig {
        pub output_formats: Vec<String>,
    }

    impl MockConfig {
        pub const HOURS_URL: &'static str = "http://test.local/hours.php";
        pub const CLASSES_URL: &'static str = "http://test.local/group-classes.php";

        pub fn new(output_formats: &[&str]) -> Self {
            Self {
                output_formats: output_formats.iter().map(|f| f.to_string()).collect(),
            }
        }
    }

    impl crate::core::ConfigProvider for MockConfig {
        fn hours_url(&self) -> &str {
            Self::HOURS_URL
        }

        fn classes_url(&self) -> &str {
            Self::CLASSES_URL
        }

        fn output_path(&self) -> &str {
            "test_output"
        }

        fn hours_filename(&self) -> &str {
            "schedule.json"
        }

        fn classes_filename(&self) -> &str {
            "group_classes.json"
        }

        fn output_formats(&self) -> &[String] {
            &self.output_formats
        }

        fn timeout_seconds(&self) -> u64 {
            5
        }

        fn retry_attempts(&self) -> u32 {
            0
        }

        fn retry_delay_seconds(&self) -> u64 {
            0
        }
    }
}
