use thiserror::Error;

#[derive(Error, Debug)]
pub enum GranaError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Invalid JSON response: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    UrlError(#[from] url::ParseError),

    #[error("Base URL cannot carry path segments: {url}")]
    InvalidBaseUrl { url: String },

    #[error("CSV output error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid configuration value for '{field}': '{value}' ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Formula parse error at position {position}: {message}")]
    FormulaError { position: usize, message: String },

    #[error("Unknown function: {name}")]
    UnknownFunction { name: String },

    #[error("{function} expects {expected} argument(s), got {actual}")]
    ArgumentCount {
        function: &'static str,
        expected: usize,
        actual: usize,
    },
}

impl GranaError {
    pub fn config<T: Into<String>>(message: T) -> Self {
        GranaError::ConfigError {
            message: message.into(),
        }
    }

    /// 給終端使用者看的簡短訊息
    pub fn user_friendly_message(&self) -> String {
        match self {
            GranaError::HttpError(_) => {
                "Could not reach the market data service".to_string()
            }
            GranaError::JsonError(_) => {
                "The market data service returned an unexpected response".to_string()
            }
            GranaError::UrlError(_) | GranaError::InvalidBaseUrl { .. } => {
                "The configured service URL is invalid".to_string()
            }
            GranaError::CsvError(_) | GranaError::IoError(_) => {
                "Could not write the result".to_string()
            }
            GranaError::ConfigError { .. } | GranaError::InvalidConfigValueError { .. } => {
                format!("Configuration problem: {}", self)
            }
            GranaError::FormulaError { .. }
            | GranaError::UnknownFunction { .. }
            | GranaError::ArgumentCount { .. } => self.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            GranaError::HttpError(_) => {
                "Check your network connection and the --base-url / --stocks-url settings"
            }
            GranaError::JsonError(_) => {
                "The service may be down or the arguments rejected; try again with --verbose"
            }
            GranaError::UrlError(_) | GranaError::InvalidBaseUrl { .. } => {
                "Use an absolute http(s) URL such as https://app.grana.io/api"
            }
            GranaError::CsvError(_) | GranaError::IoError(_) => "Check that stdout is writable",
            GranaError::ConfigError { .. } | GranaError::InvalidConfigValueError { .. } => {
                "Review the config file and command-line flags"
            }
            GranaError::FormulaError { .. } => {
                "Write formulas like CDB(1000; \"115%\"; \"01/01/2017\")"
            }
            GranaError::UnknownFunction { .. } | GranaError::ArgumentCount { .. } => {
                "Run `grana list` to see the available functions"
            }
        }
    }

    pub fn exit_code(&self) -> i32 {
        match self {
            GranaError::FormulaError { .. }
            | GranaError::UnknownFunction { .. }
            | GranaError::ArgumentCount { .. } => 2,
            GranaError::ConfigError { .. }
            | GranaError::InvalidConfigValueError { .. }
            | GranaError::UrlError(_)
            | GranaError::InvalidBaseUrl { .. } => 3,
            _ => 1,
        }
    }
}

pub type Result<T> = std::result::Result<T, GranaError>;
