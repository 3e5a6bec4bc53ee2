use thiserror::Error;

/// Failures while standing a session up or keeping it alive.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("failed to connect signaling channel: {0}")]
    Connect(#[from] tokio_tungstenite::tungstenite::Error),
    #[error("failed to set up peer connection: {0}")]
    PeerConnection(#[from] webrtc::Error),
    #[error("signaling channel closed")]
    ChannelClosed,
}

/// Failures inside one offer/answer/ICE exchange. None of these tear
/// the session down; a candidate that will not apply simply means that
/// path is never tried.
#[derive(Debug, Error)]
pub enum NegotiationError {
    #[error("failed to apply remote description: {0}")]
    RemoteDescription(webrtc::Error),
    #[error("failed to create local answer: {0}")]
    LocalAnswer(webrtc::Error),
    #[error("malformed ICE candidate payload: {0}")]
    CandidateFormat(serde_json::Error),
    #[error("failed to apply ICE candidate: {0}")]
    Candidate(webrtc::Error),
}
