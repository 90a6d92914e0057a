use thiserror::Error;

#[derive(Error, Debug)]
pub enum ContentError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Notion API returned {status} ({code}): {message}")]
    RemoteError {
        status: u16,
        code: String,
        message: String,
    },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },

    #[error("Property '{property}' has type '{found}', expected {expected}")]
    UnexpectedPropertyError {
        property: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("Validation error: {message}")]
    ValidationError { message: String },

    #[error("No content could be produced: {message}")]
    NoContentError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Remote,
    Transform,
    Cache,
    Fatal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ErrorSeverity {
    /// CLI 退出碼；回到 main 的錯誤一律非零
    pub fn exit_code(&self) -> i32 {
        match self {
            ErrorSeverity::Low | ErrorSeverity::High => 1,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::Critical => 3,
        }
    }
}

impl ContentError {
    /// 穩定的錯誤代碼，寫入 `FetchError.code` 與建置報告
    pub fn code(&self) -> &'static str {
        match self {
            ContentError::ApiError(_) => "NETWORK_ERROR",
            ContentError::RemoteError { .. } => "API_ERROR",
            ContentError::IoError(_) => "IO_ERROR",
            ContentError::ConfigError { .. }
            | ContentError::MissingConfigError { .. }
            | ContentError::InvalidConfigValueError { .. }
            | ContentError::TomlError(_) => "CONFIG_ERROR",
            ContentError::SerializationError(_)
            | ContentError::ProcessingError { .. }
            | ContentError::UnexpectedPropertyError { .. } => "PROCESSING_ERROR",
            ContentError::ValidationError { .. } => "VALIDATION_ERROR",
            ContentError::NoContentError { .. } => "NO_CONTENT",
        }
    }

    /// HTTP 狀態碼（若有）
    pub fn status(&self) -> Option<u16> {
        match self {
            ContentError::RemoteError { status, .. } => Some(*status),
            ContentError::ApiError(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            ContentError::ConfigError { .. }
            | ContentError::MissingConfigError { .. }
            | ContentError::InvalidConfigValueError { .. }
            | ContentError::TomlError(_) => ErrorCategory::Configuration,
            ContentError::ApiError(_) | ContentError::RemoteError { .. } => ErrorCategory::Remote,
            ContentError::SerializationError(_)
            | ContentError::ProcessingError { .. }
            | ContentError::UnexpectedPropertyError { .. }
            | ContentError::ValidationError { .. } => ErrorCategory::Transform,
            ContentError::IoError(_) => ErrorCategory::Cache,
            ContentError::NoContentError { .. } => ErrorCategory::Fatal,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Cache => ErrorSeverity::Low,
            ErrorCategory::Remote => ErrorSeverity::Medium,
            ErrorCategory::Configuration | ErrorCategory::Transform => ErrorSeverity::High,
            ErrorCategory::Fatal => ErrorSeverity::Critical,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            ContentError::MissingConfigError { field } => {
                format!("Required setting '{}' is not configured", field)
            }
            ContentError::InvalidConfigValueError { field, reason, .. } => {
                format!("Setting '{}' is invalid: {}", field, reason)
            }
            ContentError::RemoteError { status, message, .. } => {
                format!("The content service rejected the request ({}): {}", status, message)
            }
            ContentError::ApiError(_) => "Could not reach the content service".to_string(),
            ContentError::NoContentError { .. } => {
                "No site content could be produced from any source".to_string()
            }
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Configuration => {
                "Check NOTION_TOKEN and the NOTION_*_DATABASE_ID variables or the config file"
            }
            ErrorCategory::Remote => {
                "Verify network access and that the integration is shared with each database"
            }
            ErrorCategory::Transform => {
                "Check that the database properties match the expected names and types"
            }
            ErrorCategory::Cache => "Remove the cache directory and rebuild",
            ErrorCategory::Fatal => "Enable CONTENT_FALLBACK_ENABLED or fix the remote source",
        }
    }
}

pub type Result<T> = std::result::Result<T, ContentError>;
