use thiserror::Error;

/// A failed call to the backend actor.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ActorError {
    /// No authenticated session yet, so there is no actor to call.
    #[error("Actor not available")]
    NotAvailable,

    #[error("not authorized")]
    Unauthorized,

    /// The request never got a response (network, CORS, DNS).
    #[error("transport error: {0}")]
    Transport(String),

    /// The backend answered with an error.
    #[error("rejected by backend: {0}")]
    Rejected(String),

    #[error("malformed response: {0}")]
    Decode(String),
}
