use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PreviewError {
    #[error("Missing '{field}' parameter")]
    MissingParameter { field: String },

    #[error("Invalid URL '{value}': {reason}")]
    InvalidUrl { value: String, reason: String },

    #[error("Could not load URL: {message}")]
    Network { message: String },

    #[error("Upstream site responded with status {status}")]
    UpstreamStatus { status: u16 },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for '{field}' ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

impl From<reqwest::Error> for PreviewError {
    fn from(err: reqwest::Error) -> Self {
        // reqwest 的 status 錯誤來自 error_for_status，其餘都視為傳輸層失敗
        match err.status() {
            Some(status) => PreviewError::UpstreamStatus {
                status: status.as_u16(),
            },
            None => PreviewError::Network {
                message: describe_transport_error(&err),
            },
        }
    }
}

fn describe_transport_error(err: &reqwest::Error) -> String {
    let kind = if err.is_timeout() {
        "request timed out"
    } else if err.is_connect() {
        "connection failed"
    } else if err.is_redirect() {
        "too many redirects"
    } else if err.is_body() || err.is_decode() {
        "failed to read response body"
    } else {
        "request failed"
    };

    // 保留底層原因 (DNS、TLS 等)，方便使用者判斷
    let mut detail = err.to_string();
    let mut source = std::error::Error::source(err);
    while let Some(cause) = source {
        detail.push_str(": ");
        detail.push_str(&cause.to_string());
        source = cause.source();
    }

    format!("{} ({})", kind, detail)
}

impl PreviewError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            PreviewError::MissingParameter { .. } | PreviewError::InvalidUrl { .. } => {
                StatusCode::BAD_REQUEST
            }
            PreviewError::Network { .. } | PreviewError::UpstreamStatus { .. } => {
                StatusCode::BAD_GATEWAY
            }
            PreviewError::IoError(_)
            | PreviewError::ConfigError { .. }
            | PreviewError::InvalidConfigValueError { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Whether the failure happened while talking to the target site.
    pub fn is_fetch_failure(&self) -> bool {
        matches!(
            self,
            PreviewError::Network { .. } | PreviewError::UpstreamStatus { .. }
        )
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            PreviewError::MissingParameter { field } => format!("Missing '{}' parameter", field),
            PreviewError::InvalidUrl { value, reason } => {
                format!("'{}' is not a usable web address: {}", value, reason)
            }
            PreviewError::Network { message } => format!("Could not load URL: {}", message),
            PreviewError::UpstreamStatus { status } => {
                format!("This website blocked our preview (status code: {})", status)
            }
            PreviewError::IoError(e) => format!("File access failed: {}", e),
            PreviewError::ConfigError { message } => format!("Configuration problem: {}", message),
            PreviewError::InvalidConfigValueError { field, reason, .. } => {
                format!("Configuration value '{}' is invalid: {}", field, reason)
            }
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            PreviewError::MissingParameter { .. } => "Provide the page address in the 'url' field.",
            PreviewError::InvalidUrl { .. } => {
                "Use a full http:// or https:// address, e.g. https://example.com/article."
            }
            PreviewError::Network { .. } => {
                "This site may be blocking automated requests. Try another public page (blog, article, docs, etc.)."
            }
            PreviewError::UpstreamStatus { .. } => {
                "Some websites (e.g. paywalled sites or banking portals) block automated tools. Try a public site like docs or blogs."
            }
            PreviewError::IoError(_) => "Check that the file exists and is readable.",
            PreviewError::ConfigError { .. } | PreviewError::InvalidConfigValueError { .. } => {
                "Fix the configuration file and restart the service."
            }
        }
    }

    /// Diagnostic HTML fragment shown in place of the previewed page.
    pub fn diagnostic_html(&self) -> String {
        let (title, detail) = match self {
            PreviewError::Network { message } => (
                "Could not load URL".to_string(),
                escape_html(message),
            ),
            PreviewError::UpstreamStatus { status } => (
                "This website blocked our preview".to_string(),
                format!("Status code: {}", status),
            ),
            other => ("Preview failed".to_string(), escape_html(&other.to_string())),
        };

        format!(
            "<h2 style='font-family: system-ui'>{}</h2>\n<p>{}</p>\n<p>{}</p>\n",
            title,
            detail,
            escape_html(self.recovery_suggestion())
        )
    }
}

impl IntoResponse for PreviewError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if self.is_fetch_failure() {
            (status, Html(self.diagnostic_html())).into_response()
        } else {
            (status, self.to_string()).into_response()
        }
    }
}

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

pub type Result<T> = std::result::Result<T, PreviewError>;
