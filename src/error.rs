use actix_web::http::StatusCode;
use actix_web::ResponseError;
use thiserror::Error;

/// Every variant describes a policy that was authored wrong. None of them is
/// retryable: the same input fails the same way until the policy is fixed.
#[derive(Debug, Error)]
pub enum CspError {
    #[error("'{0}' is an invalid CSP 1.0 directive")]
    UnknownDirective(String),

    #[error("'{value}' is exclusive for '{directive}' directive, but other values are set")]
    ExclusivityViolation { directive: String, value: String },

    #[error("'{0}' is an invalid CSP 1.0 'sandbox' keyword")]
    InvalidSandboxKeyword(String),

    #[error("'{value}' is an invalid CSP 1.0 '{directive}' value")]
    InvalidSourceValue { directive: String, value: String },

    #[error("'{0}' is an invalid 'report-uri' value, must be of type RFC 3986")]
    InvalidReportUri(String),

    #[error("'{scope}' is not a valid policy scope for '{operation}'")]
    InvalidScope { operation: String, scope: String },

    #[error("Config error: {0}")]
    ConfigError(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Header processing error: {0}")]
    HeaderError(String),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl CspError {
    /// The directive the error points at, when there is one.
    pub fn directive(&self) -> Option<&str> {
        match self {
            Self::UnknownDirective(directive)
            | Self::ExclusivityViolation { directive, .. }
            | Self::InvalidSourceValue { directive, .. } => Some(directive),
            Self::InvalidSandboxKeyword(_) => Some(crate::constants::SANDBOX),
            Self::InvalidReportUri(_) => Some(crate::constants::REPORT_URI),
            _ => None,
        }
    }

    #[inline]
    pub fn is_validation_error(&self) -> bool {
        matches!(
            self,
            Self::UnknownDirective(_)
                | Self::ExclusivityViolation { .. }
                | Self::InvalidSandboxKeyword(_)
                | Self::InvalidSourceValue { .. }
                | Self::InvalidReportUri(_)
        )
    }
}

impl ResponseError for CspError {
    fn status_code(&self) -> StatusCode {
        StatusCode::INTERNAL_SERVER_ERROR
    }
}
