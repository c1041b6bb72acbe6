use thiserror::Error;

/// User input violated a domain constraint. Resolved at the boundary as an
/// ephemeral user-visible message over a normal 200 response; the platform
/// reserves 4xx for requests it could not parse at all.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("{message}")]
pub struct ValidationError {
    pub message: String,
}

impl ValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}

/// A best-effort outbound call (follow-up post, message deletion) failed.
/// Always logged by the caller and never allowed to fail the response that
/// was already sent to the platform.
#[derive(Debug, Error)]
pub enum UpstreamCallFailure {
    #[error("upstream request failed: {0}")]
    Request(String),
    #[error("upstream returned status {status}: {body}")]
    UnexpectedStatus { status: u16, body: String },
}
