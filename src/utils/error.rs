use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorefrontError {
    #[error("HTTP request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("Unexpected HTTP status {status} from {url}")]
    HttpStatusError { status: u16, url: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    UrlError(#[from] url::ParseError),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Authentication failed: {message}")]
    AuthError { message: String },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Configuration,
    Authentication,
    Data,
    Io,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ErrorSeverity {
    /// Process exit code used by the binaries. `Low` is treated as success.
    pub fn exit_code(self) -> i32 {
        match self {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }
}

impl StorefrontError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            StorefrontError::ApiError(_)
            | StorefrontError::HttpStatusError { .. }
            | StorefrontError::UrlError(_) => ErrorCategory::Network,
            StorefrontError::ConfigError { .. }
            | StorefrontError::ConfigValidationError { .. }
            | StorefrontError::InvalidConfigValueError { .. }
            | StorefrontError::MissingConfigError { .. } => ErrorCategory::Configuration,
            StorefrontError::AuthError { .. } => ErrorCategory::Authentication,
            StorefrontError::SerializationError(_)
            | StorefrontError::ProcessingError { .. } => ErrorCategory::Data,
            StorefrontError::IoError(_) => ErrorCategory::Io,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::Authentication | ErrorCategory::Data => ErrorSeverity::High,
            ErrorCategory::Configuration | ErrorCategory::Io => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            StorefrontError::ApiError(_) | StorefrontError::HttpStatusError { .. } => {
                "Check that the server is reachable and try again"
            }
            StorefrontError::UrlError(_) => "Check the base URL and paths in the configuration",
            StorefrontError::IoError(_) => {
                "Check that the template exists and the output directory is writable"
            }
            StorefrontError::SerializationError(_) => {
                "Check that the catalog file contains a JSON object of products"
            }
            StorefrontError::ConfigError { .. }
            | StorefrontError::ConfigValidationError { .. }
            | StorefrontError::InvalidConfigValueError { .. } => {
                "Fix the configuration file and run again"
            }
            StorefrontError::MissingConfigError { .. } => {
                "Add the missing key to the configuration or export the referenced environment variable"
            }
            StorefrontError::AuthError { .. } => {
                "Verify SUPPLIER_EMAIL and SUPPLIER_PASSWORD (sync.email, sync.password) and that the account is active"
            }
            StorefrontError::ProcessingError { .. } => "Inspect the input data for unexpected content",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Network => format!("Could not reach a remote service: {}", self),
            ErrorCategory::Configuration => format!("The configuration is invalid: {}", self),
            ErrorCategory::Authentication => format!("Login to the supplier API failed: {}", self),
            ErrorCategory::Data => format!("The data could not be processed: {}", self),
            ErrorCategory::Io => format!("A file operation failed: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, StorefrontError>;
