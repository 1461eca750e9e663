use thiserror::Error;

#[derive(Debug, Error)]
pub enum AdviceError {
    #[error("advice request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("advice service returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("advice response contained no candidate text")]
    NoCandidates,
    #[error("advice did not match the response schema: {0}")]
    Schema(#[from] serde_json::Error),
    #[error("advice source unavailable: {0}")]
    Unavailable(String),
}
