use crate::error::NegotiationError;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, warn};

/// Answerer-side surface of a peer connection. The negotiation logic
/// talks to this seam so the candidate-ordering behavior can be
/// exercised against a mock.
#[async_trait]
pub trait PeerEndpoint: Send + Sync {
    async fn set_remote_offer(&self, sdp: String) -> Result<(), NegotiationError>;

    /// Create the local answer and install it as the local description.
    async fn create_local_answer(&self) -> Result<String, NegotiationError>;

    async fn apply_candidate(&self, candidate: serde_json::Value) -> Result<(), NegotiationError>;
}

#[async_trait]
impl<T: PeerEndpoint + ?Sized> PeerEndpoint for Arc<T> {
    async fn set_remote_offer(&self, sdp: String) -> Result<(), NegotiationError> {
        (**self).set_remote_offer(sdp).await
    }

    async fn create_local_answer(&self) -> Result<String, NegotiationError> {
        (**self).create_local_answer().await
    }

    async fn apply_candidate(&self, candidate: serde_json::Value) -> Result<(), NegotiationError> {
        (**self).apply_candidate(candidate).await
    }
}

/// Negotiation state for one session: applies the broadcaster's offer,
/// holds on to candidates that arrived early, and flushes them in
/// arrival order once the remote description is known.
///
/// The pending queue only covers the window between peer-connection
/// creation and remote-description application — in practice the
/// candidates of one offer/answer round trip.
pub struct Negotiator<P> {
    endpoint: P,
    pending: Vec<serde_json::Value>,
    remote_set: bool,
}

impl<P: PeerEndpoint> Negotiator<P> {
    pub fn new(endpoint: P) -> Self {
        Self {
            endpoint,
            pending: Vec::new(),
            remote_set: false,
        }
    }

    pub fn pending_candidates(&self) -> usize {
        self.pending.len()
    }

    /// Apply the offer and return the answer SDP to send back.
    ///
    /// The pending queue is flushed in arrival order before the answer
    /// is created; a candidate that fails to apply is logged and
    /// skipped, and the queue is cleared either way. If the offer
    /// itself does not apply, the queue is left for a later attempt.
    pub async fn handle_offer(&mut self, sdp: String) -> Result<String, NegotiationError> {
        self.endpoint.set_remote_offer(sdp).await?;
        self.remote_set = true;

        let flushed = self.pending.len();
        for candidate in self.pending.drain(..) {
            if let Err(e) = self.endpoint.apply_candidate(candidate).await {
                warn!("Skipping ICE candidate that failed to apply: {}", e);
            }
        }
        if flushed > 0 {
            debug!("Flushed {} early ICE candidates", flushed);
        }

        self.endpoint.create_local_answer().await
    }

    /// Queue or apply one remote candidate. Apply failures are logged,
    /// not fatal; the engine tolerates partial candidate sets.
    pub async fn handle_remote_candidate(&mut self, candidate: serde_json::Value) {
        if !self.remote_set {
            self.pending.push(candidate);
            return;
        }

        if let Err(e) = self.endpoint.apply_candidate(candidate).await {
            warn!("Failed to apply ICE candidate: {}", e);
        }
    }
}
