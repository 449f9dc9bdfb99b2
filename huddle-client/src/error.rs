use thiserror::Error;

/// Failure reported by the external peer-connection library.
#[derive(Debug, Clone, Error)]
pub enum LinkError {
    #[error("peer link failed: {0}")]
    Failed(String),
}

/// Terminal session failures of the call engine.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Local media permission denied or device unavailable. Fatal for
    /// this session: no room join happens and no retry is attempted.
    #[error("could not access camera/microphone: {0}")]
    MediaAcquisition(String),

    #[error(transparent)]
    Link(#[from] LinkError),
}
