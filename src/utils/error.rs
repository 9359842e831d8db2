use thiserror::Error;

pub const INVALID_CNPJ_MESSAGE: &str = "CNPJ inválido. Digite 14 números.";
pub const NOT_FOUND_FALLBACK_MESSAGE: &str = "CNPJ não encontrado ou inválido.";
pub const NETWORK_MESSAGE: &str = "Erro ao conectar com o servidor.";

#[derive(Error, Debug)]
pub enum LookupError {
    #[error("Validation error: {message}")]
    ValidationError { message: String },

    #[error("Registry request failed: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("Registry responded with HTTP {status}")]
    HttpStatusError { status: u16 },

    #[error("Malformed registry response: {0}")]
    ParseError(#[from] serde_json::Error),

    #[error("Registry rejected the identifier: {message}")]
    NotFoundError { message: String },

    #[error("A search is already in progress")]
    SearchInProgress,

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Network,
    Response,
    Registry,
    Session,
    System,
    Configuration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl LookupError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::ValidationError {
            message: message.into(),
        }
    }

    /// Parse failure for a response that is valid JSON but has the wrong shape.
    pub fn malformed_response(message: &str) -> Self {
        Self::ParseError(<serde_json::Error as serde::de::Error>::custom(message))
    }

    pub fn not_found(message: Option<&str>) -> Self {
        let message = message
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .unwrap_or(NOT_FOUND_FALLBACK_MESSAGE);
        Self::NotFoundError {
            message: message.to_string(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::ValidationError { .. } => ErrorCategory::Input,
            Self::NetworkError(_) | Self::HttpStatusError { .. } => ErrorCategory::Network,
            Self::ParseError(_) => ErrorCategory::Response,
            Self::NotFoundError { .. } => ErrorCategory::Registry,
            Self::SearchInProgress => ErrorCategory::Session,
            Self::IoError(_) => ErrorCategory::System,
            Self::ConfigValidationError { .. } | Self::InvalidConfigValueError { .. } => {
                ErrorCategory::Configuration
            }
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Session => ErrorSeverity::Low,
            ErrorCategory::Input | ErrorCategory::Registry => ErrorSeverity::High,
            ErrorCategory::Network | ErrorCategory::Response => ErrorSeverity::Medium,
            ErrorCategory::System | ErrorCategory::Configuration => ErrorSeverity::Critical,
        }
    }

    /// The single message shown to the reader; lookup failures are not
    /// distinguished beyond their text.
    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::ValidationError { message } | Self::NotFoundError { message } => message.clone(),
            Self::NetworkError(_) | Self::HttpStatusError { .. } => NETWORK_MESSAGE.to_string(),
            Self::ParseError(_) => {
                "Resposta inválida do serviço de consulta. Tente novamente em instantes.".to_string()
            }
            Self::SearchInProgress => "Aguarde a consulta em andamento terminar.".to_string(),
            Self::IoError(e) => format!("Erro de arquivo: {}", e),
            Self::ConfigValidationError { .. } | Self::InvalidConfigValueError { .. } => {
                format!("Configuração inválida: {}", self)
            }
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Input => "Check that the CNPJ has exactly 14 digits",
            ErrorCategory::Network => {
                "Check your connection; the public registry allows only 3 requests per minute"
            }
            ErrorCategory::Response => "Try again later or switch between direct and relay mode",
            ErrorCategory::Registry => "Confirm the CNPJ number and its check digits",
            ErrorCategory::Session => "Wait for the current search to finish",
            ErrorCategory::System => "Check file permissions and available disk space",
            ErrorCategory::Configuration => "Review the configuration file and command-line flags",
        }
    }
}

pub type Result<T> = std::result::Result<T, LookupError>;
