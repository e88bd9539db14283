use thiserror::Error;

#[derive(Debug, Error)]
pub enum NexgenError {
    #[error("Backend error: {0}")]
    Backend(String),

    #[error("Auth error: {0}")]
    Auth(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("LLM error: {0}")]
    Llm(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl NexgenError {
    /// Returns `true` when the error looks like a connectivity problem
    /// (network timeouts, refused connections, 5xx from the backend).
    /// Drives the dashboard's connection-status indicator; there is no
    /// automatic retry anywhere.
    pub fn is_connectivity(&self) -> bool {
        match self {
            Self::Http(_) => true,
            Self::Backend(msg) | Self::Llm(msg) => is_connectivity_message(msg),
            _ => false,
        }
    }
}

fn is_connectivity_message(msg: &str) -> bool {
    let msg_lower = msg.to_lowercase();
    for code in ["500", "502", "503", "504"] {
        if msg_lower.contains(code) {
            return true;
        }
    }
    let patterns = [
        "timeout",
        "timed out",
        "connection refused",
        "connection reset",
        "broken pipe",
        "dns error",
        "temporarily unavailable",
    ];
    patterns.iter().any(|p| msg_lower.contains(p))
}

pub type Result<T> = std::result::Result<T, NexgenError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connectivity_503() {
        let err = NexgenError::Backend("projects select returned 503: unavailable".into());
        assert!(err.is_connectivity());
    }

    #[test]
    fn test_connectivity_timeout() {
        let err = NexgenError::Backend("request timed out".into());
        assert!(err.is_connectivity());
    }

    #[test]
    fn test_connectivity_refused() {
        let err = NexgenError::Llm("connection refused".into());
        assert!(err.is_connectivity());
    }

    #[test]
    fn test_permission_error_is_not_connectivity() {
        let err = NexgenError::Backend("projects select returned 401: permission denied".into());
        assert!(!err.is_connectivity());
    }

    #[test]
    fn test_config_error_is_not_connectivity() {
        let err = NexgenError::Config("missing API key".into());
        assert!(!err.is_connectivity());
    }
}
