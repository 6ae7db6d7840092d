use thiserror::Error;

#[derive(Error, Debug)]
pub enum EtlError {
    #[error("HTTP request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("HTTP {status} returned by {url}")]
    HttpStatusError { url: String, status: u16 },

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration field: {field}")]
    MissingConfigError { field: String },

    #[error("Extraction error: {message}")]
    ExtractionError { message: String },

    #[error("Invalid time format: {input}")]
    InvalidTimeFormat { input: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Parsing,
    Storage,
    Configuration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ErrorSeverity {
    /// Process exit code for a run whose worst failure has this severity.
    pub fn exit_code(self) -> i32 {
        match self {
            ErrorSeverity::Low => 0,      // 警告，但成功
            ErrorSeverity::Medium => 2,   // 重試錯誤
            ErrorSeverity::High => 1,     // 處理錯誤
            ErrorSeverity::Critical => 3, // 系統錯誤
        }
    }
}

impl EtlError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            EtlError::ApiError(_) | EtlError::HttpStatusError { .. } => ErrorCategory::Network,
            EtlError::ExtractionError { .. } | EtlError::InvalidTimeFormat { .. } => {
                ErrorCategory::Parsing
            }
            EtlError::CsvError(_) | EtlError::IoError(_) | EtlError::SerializationError(_) => {
                ErrorCategory::Storage
            }
            EtlError::ConfigError { .. }
            | EtlError::ConfigValidationError { .. }
            | EtlError::InvalidConfigValueError { .. }
            | EtlError::MissingConfigError { .. } => ErrorCategory::Configuration,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            EtlError::InvalidTimeFormat { .. } => ErrorSeverity::Low,
            // 網路錯誤通常重試即可
            EtlError::ApiError(_) | EtlError::HttpStatusError { .. } => ErrorSeverity::Medium,
            EtlError::ExtractionError { .. }
            | EtlError::CsvError(_)
            | EtlError::SerializationError(_) => ErrorSeverity::High,
            EtlError::IoError(_)
            | EtlError::ConfigError { .. }
            | EtlError::ConfigValidationError { .. }
            | EtlError::InvalidConfigValueError { .. }
            | EtlError::MissingConfigError { .. } => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            EtlError::ApiError(_) => {
                "Check network connectivity and that the page URL is reachable".to_string()
            }
            EtlError::HttpStatusError { status, .. } if *status >= 500 => {
                "The site is having trouble; retry later or raise --retry-attempts".to_string()
            }
            EtlError::HttpStatusError { .. } => {
                "Verify the page URL; the site may have moved the page".to_string()
            }
            EtlError::ExtractionError { .. } => {
                "The page layout may have changed; inspect the HTML and update the extractor"
                    .to_string()
            }
            EtlError::InvalidTimeFormat { .. } => {
                "Expected times like '6 AM', '6:30 p.m.' or '12 PM'".to_string()
            }
            EtlError::CsvError(_) | EtlError::SerializationError(_) => {
                "Report this as a bug together with the page that triggered it".to_string()
            }
            EtlError::IoError(_) => {
                "Check that the output directory exists and is writable".to_string()
            }
            EtlError::ConfigError { .. }
            | EtlError::ConfigValidationError { .. }
            | EtlError::InvalidConfigValueError { .. }
            | EtlError::MissingConfigError { .. } => {
                "Fix the configuration file or command line flags and run again".to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Network => format!("Could not download the page: {}", self),
            ErrorCategory::Parsing => format!("Could not read the page contents: {}", self),
            ErrorCategory::Storage => format!("Could not save the results: {}", self),
            ErrorCategory::Configuration => format!("Invalid configuration: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, EtlError>;
