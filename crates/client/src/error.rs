use serde::Deserialize;

/// Errors from the client layer.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The HTTP request itself failed (network, DNS, TLS, decoding).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The server answered with a non-2xx status.
    #[error("API error ({status}) {code}: {message}")]
    Api {
        status: u16,
        code: String,
        message: String,
    },

    /// Reading or writing the persisted token failed.
    #[error("Token store error: {0}")]
    Store(#[from] std::io::Error),
}

impl ClientError {
    /// HTTP status of an [`ClientError::Api`] error.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// The server's `{"error": ..., "code": ...}` body.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
    code: String,
}

/// Build an [`ClientError::Api`] from a failed response's status and body.
///
/// Bodies that are not the server's JSON error shape are kept verbatim as
/// the message.
pub(crate) fn api_error(status: u16, body: &str) -> ClientError {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(parsed) => ClientError::Api {
            status,
            code: parsed.code,
            message: parsed.error,
        },
        Err(_) => ClientError::Api {
            status,
            code: "UNKNOWN".to_string(),
            message: body.to_string(),
        },
    }
}
