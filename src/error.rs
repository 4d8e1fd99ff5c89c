/// Runtime error type shared by the client, decoder, and embedding layers.
#[derive(Debug, thiserror::Error)]
pub enum WidgetError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
    #[error("Transport error: {0}")]
    Transport(String),
    #[error("API request failed: status={status}, message={message}")]
    Upstream { status: u16, message: String },
    #[error("Decode error: {0}")]
    Decode(String),
    #[error("Mount target not found: element with id \"{0}\"")]
    MountTargetMissing(String),
}

impl WidgetError {
    /// Build an [`WidgetError::Upstream`] from a non-success response status.
    #[must_use]
    pub fn from_status(status: http::StatusCode) -> Self {
        WidgetError::Upstream {
            status: status.as_u16(),
            message: status
                .canonical_reason()
                .unwrap_or("unknown status")
                .to_string(),
        }
    }
}

impl From<reqwest::Error> for WidgetError {
    fn from(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            return WidgetError::from_status(status);
        }
        WidgetError::Transport(err.to_string())
    }
}

impl From<std::convert::Infallible> for WidgetError {
    fn from(never: std::convert::Infallible) -> Self {
        match never {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_status_uses_canonical_reason() {
        let err = WidgetError::from_status(http::StatusCode::BAD_GATEWAY);
        match err {
            WidgetError::Upstream { status, ref message } => {
                assert_eq!(status, 502);
                assert_eq!(message, "Bad Gateway");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_mount_error_names_element() {
        let err = WidgetError::MountTargetMissing("chat".to_string());
        assert_eq!(
            err.to_string(),
            "Mount target not found: element with id \"chat\""
        );
    }
}
