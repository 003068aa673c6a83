use crate::utils::error::{PreviewError, Result};
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

/// 把使用者輸入的網址正規化：去除空白，缺少 scheme 時補上 `http://`
pub fn normalize_target_url(raw: &str) -> Result<Url> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(PreviewError::MissingParameter {
            field: "url".to_string(),
        });
    }

    let candidate = if has_scheme(trimmed) {
        trimmed.to_string()
    } else {
        format!("http://{}", trimmed)
    };

    let url = Url::parse(&candidate).map_err(|e| PreviewError::InvalidUrl {
        value: trimmed.to_string(),
        reason: format!("Invalid URL format: {}", e),
    })?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        scheme => Err(PreviewError::InvalidUrl {
            value: trimmed.to_string(),
            reason: format!("Unsupported URL scheme: {}", scheme),
        }),
    }
}

// `Url::parse("localhost:8080/x")` succeeds with scheme "localhost", so only an
// explicit "://" counts as a scheme.
fn has_scheme(input: &str) -> bool {
    match input.find("://") {
        Some(idx) => {
            let scheme = &input[..idx];
            !scheme.is_empty()
                && scheme
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
        }
        None => false,
    }
}

pub fn validate_socket_addr(field_name: &str, addr: &str) -> Result<()> {
    addr.parse::<std::net::SocketAddr>()
        .map(|_| ())
        .map_err(|e| PreviewError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: addr.to_string(),
            reason: format!("Invalid socket address: {}", e),
        })
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(PreviewError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(PreviewError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}
