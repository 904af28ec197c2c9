use crate::core::calc::CalcError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ToolkitError {
    #[error("Zip operation failed: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("HTTP {status} from {url}")]
    HttpStatusError { url: String, status: u16 },

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Env file error: {0}")]
    DotenvError(#[from] dotenvy::Error),

    #[cfg(feature = "mysql")]
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Calculation error: {0}")]
    CalcError(#[from] CalcError),

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Parse error: {message}")]
    ParseError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Configuration,
    Data,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ErrorSeverity {
    /// 對應 CLI 的退出碼
    pub fn exit_code(self) -> i32 {
        match self {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }
}

impl ToolkitError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            ToolkitError::HttpError(_) | ToolkitError::HttpStatusError { .. } => {
                ErrorCategory::Network
            }
            ToolkitError::TomlError(_)
            | ToolkitError::DotenvError(_)
            | ToolkitError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            ToolkitError::CsvError(_)
            | ToolkitError::SerializationError(_)
            | ToolkitError::CalcError(_)
            | ToolkitError::ParseError { .. } => ErrorCategory::Data,
            ToolkitError::ZipError(_) | ToolkitError::IoError(_) => ErrorCategory::System,
            #[cfg(feature = "mysql")]
            ToolkitError::DatabaseError(_) => ErrorCategory::Network,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::Configuration | ErrorCategory::Data => ErrorSeverity::High,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    /// 5xx 與傳輸錯誤可以重試，4xx 不行
    pub fn is_retryable(&self) -> bool {
        match self {
            ToolkitError::HttpError(e) => e.is_timeout() || e.is_connect() || e.is_request(),
            ToolkitError::HttpStatusError { status, .. } => *status >= 500 || *status == 429,
            _ => false,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            ToolkitError::HttpError(_) => "Check the network connection and try again",
            ToolkitError::HttpStatusError { .. } => {
                "Check that the base URL and topics still exist on the site"
            }
            ToolkitError::TomlError(_) => "Check the TOML syntax of the configuration file",
            ToolkitError::DotenvError(_) => "Check that every line of the env file is KEY=VALUE",
            ToolkitError::InvalidConfigValueError { .. } => {
                "Fix the configuration value and run again (see --help)"
            }
            ToolkitError::CalcError(_) => "Use finite operands and a non-zero divisor",
            ToolkitError::ParseError { .. } => "The page layout may have changed; rerun with --verbose",
            ToolkitError::CsvError(_) | ToolkitError::SerializationError(_) => {
                "Rerun with --verbose to see which record failed"
            }
            ToolkitError::ZipError(_) | ToolkitError::IoError(_) => {
                "Check that the output directory exists and is writable"
            }
            #[cfg(feature = "mysql")]
            ToolkitError::DatabaseError(_) => {
                "Check DATABASE_URL, that the server is running and that the table exists"
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Network => format!("Could not reach the remote service: {}", self),
            ErrorCategory::Configuration => format!("Invalid configuration: {}", self),
            ErrorCategory::Data => format!("Could not process the data: {}", self),
            ErrorCategory::System => format!("System error: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, ToolkitError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_errors_are_network_and_retryable_on_5xx() {
        let err = ToolkitError::HttpStatusError {
            url: "http://x".to_string(),
            status: 503,
        };
        assert_eq!(err.category(), ErrorCategory::Network);
        assert_eq!(err.severity().exit_code(), 2);
        assert!(err.is_retryable());

        let not_found = ToolkitError::HttpStatusError {
            url: "http://x".to_string(),
            status: 404,
        };
        assert!(!not_found.is_retryable());
    }

    #[test]
    fn test_severity_exit_codes() {
        let config = ToolkitError::InvalidConfigValueError {
            field: "max_items".to_string(),
            value: "0".to_string(),
            reason: "Value must be at least 1".to_string(),
        };
        assert_eq!(config.severity(), ErrorSeverity::High);
        assert_eq!(config.severity().exit_code(), 1);

        let io = ToolkitError::IoError(std::io::Error::other("disk full"));
        assert_eq!(io.severity(), ErrorSeverity::Critical);
        assert_eq!(io.severity().exit_code(), 3);
    }

    #[test]
    fn test_calc_error_converts() {
        let err: ToolkitError = CalcError::DivisionByZero(1.0).into();
        assert_eq!(err.category(), ErrorCategory::Data);
        assert!(err.user_friendly_message().contains("division by zero"));
    }
}
