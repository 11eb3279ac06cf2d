use reqwest::StatusCode;

/// Failure modes of a single weather fetch.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// The request could not be sent or no response arrived.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The provider answered with a non-success status.
    #[error("Provider returned status {status}: {body}")]
    Http { status: StatusCode, body: String },

    /// The response body did not match the expected schema.
    #[error("Failed to parse provider response: {0}")]
    Parse(String),

    /// Superseded by a newer fetch before completion. Never shown to the user.
    #[error("Fetch was cancelled")]
    Cancelled,
}

impl FetchError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, FetchError::Cancelled)
    }

    pub(crate) fn http(status: StatusCode, body: &str) -> Self {
        FetchError::Http {
            status,
            body: truncate_body(body),
        }
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(err: serde_json::Error) -> Self {
        FetchError::Parse(err.to_string())
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() > MAX {
        let mut end = MAX;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &body[..end])
    } else {
        body.to_string()
    }
}
