use qiniu_cert_shared::signature::SignatureError;
use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    /// Env vars or certificate files are absent; raised before any network activity.
    #[error("Missing configuration: {0:#}")]
    MissingConfiguration(anyhow::Error),
    #[error("Request error: {0}")]
    Transport(#[from] reqwest_middleware::Error),
    #[error("HTTP error {status}: {body}")]
    Protocol { status: StatusCode, body: String },
    #[error("Failed to encode request body: {0}")]
    RequestEncoding(serde_json::Error),
    #[error("Failed to parse response: {0}")]
    ResponseParsing(serde_json::Error),
    #[error("Certificate upload failed, no certificate id in the response")]
    MissingCertificateId,
    #[error(transparent)]
    Signature(#[from] SignatureError),
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::Transport(reqwest_middleware::Error::Reqwest(err))
    }
}
