use crate::session::negotiator::{Negotiator, PeerEndpoint};
use crate::session::status::SessionPhase;
use mirrorcast_core::SignalMessage;
use tokio::sync::{mpsc, watch};
use tracing::{debug, info, warn};

/// Routes inbound signaling frames for one session. Runs on the
/// session's read task, one frame at a time, so the negotiation state
/// never sees overlapping events.
pub(crate) struct SignalDriver<P> {
    negotiator: Negotiator<P>,
    outbound: mpsc::UnboundedSender<SignalMessage>,
    phase: watch::Sender<SessionPhase>,
    joined: bool,
}

impl<P: PeerEndpoint> SignalDriver<P> {
    pub(crate) fn new(
        endpoint: P,
        outbound: mpsc::UnboundedSender<SignalMessage>,
        phase: watch::Sender<SessionPhase>,
    ) -> Self {
        Self {
            negotiator: Negotiator::new(endpoint),
            outbound,
            phase,
            joined: false,
        }
    }

    pub(crate) async fn handle_frame(&mut self, text: &str) {
        let msg = match SignalMessage::decode(text) {
            Ok(msg) => msg,
            Err(e) => {
                warn!("Ignoring undecodable frame from relay: {}", e);
                return;
            }
        };

        match msg {
            SignalMessage::Joined { room } => {
                info!("Joined room '{}'", room);
                self.joined = true;
                self.phase.send_replace(SessionPhase::Joined);
            }
            SignalMessage::Offer { sdp } => {
                if !self.joined {
                    warn!("Offer received before the joined ack; ignoring");
                    return;
                }
                info!("Offer received");
                match self.negotiator.handle_offer(sdp).await {
                    Ok(answer_sdp) => {
                        self.phase.send_replace(SessionPhase::RemoteDescribed);
                        if self
                            .outbound
                            .send(SignalMessage::Answer { sdp: answer_sdp })
                            .is_err()
                        {
                            warn!("Signaling channel closed before the answer went out");
                        } else {
                            info!("Answer sent");
                        }
                    }
                    Err(e) => warn!("Negotiation failed for this offer: {}", e),
                }
            }
            SignalMessage::Ice { candidate } => {
                self.negotiator.handle_remote_candidate(candidate).await;
            }
            SignalMessage::Error { reason } => {
                warn!("Relay reported a protocol error: {}", reason);
            }
            SignalMessage::Join { .. } | SignalMessage::Answer { .. } => {
                debug!("Ignoring message type the receiver never consumes");
            }
        }
    }
}
