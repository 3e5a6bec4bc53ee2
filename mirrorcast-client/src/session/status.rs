use std::time::Duration;
use tokio::sync::watch;
use webrtc::ice_transport::ice_connection_state::RTCIceConnectionState;
use webrtc::peer_connection::peer_connection_state::RTCPeerConnectionState;

/// Progress of the signaling side of a session. The peer connection's
/// own ICE and connection states are tracked separately; neither is
/// ever "corrected" from here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// Channel connecting, or connected and waiting for the join ack.
    Connecting,
    /// Join acknowledged; waiting for the broadcaster's offer.
    Joined,
    /// Remote description applied and the answer sent back.
    RemoteDescribed,
    /// Session torn down.
    Closed,
}

pub(crate) struct StatusTx {
    pub(crate) phase: watch::Sender<SessionPhase>,
    pub(crate) ice: watch::Sender<RTCIceConnectionState>,
    pub(crate) conn: watch::Sender<RTCPeerConnectionState>,
}

/// Observable session state. Cheap to clone; stays readable after the
/// session is gone (it reports the final values).
#[derive(Clone)]
pub struct SessionStatus {
    phase: watch::Receiver<SessionPhase>,
    ice: watch::Receiver<RTCIceConnectionState>,
    conn: watch::Receiver<RTCPeerConnectionState>,
}

pub(crate) fn status_channel() -> (StatusTx, SessionStatus) {
    let (phase_tx, phase_rx) = watch::channel(SessionPhase::Connecting);
    let (ice_tx, ice_rx) = watch::channel(RTCIceConnectionState::New);
    let (conn_tx, conn_rx) = watch::channel(RTCPeerConnectionState::New);

    (
        StatusTx {
            phase: phase_tx,
            ice: ice_tx,
            conn: conn_tx,
        },
        SessionStatus {
            phase: phase_rx,
            ice: ice_rx,
            conn: conn_rx,
        },
    )
}

impl SessionStatus {
    pub fn phase(&self) -> SessionPhase {
        *self.phase.borrow()
    }

    pub fn ice_state(&self) -> RTCIceConnectionState {
        *self.ice.borrow()
    }

    pub fn connection_state(&self) -> RTCPeerConnectionState {
        *self.conn.borrow()
    }

    pub fn phase_changes(&self) -> watch::Receiver<SessionPhase> {
        self.phase.clone()
    }

    pub fn ice_changes(&self) -> watch::Receiver<RTCIceConnectionState> {
        self.ice.clone()
    }

    pub fn connection_changes(&self) -> watch::Receiver<RTCPeerConnectionState> {
        self.conn.clone()
    }

    pub async fn wait_for_phase(&self, phase: SessionPhase, timeout: Duration) -> bool {
        let mut rx = self.phase.clone();
        tokio::time::timeout(timeout, rx.wait_for(|p| *p == phase))
            .await
            .map(|result| result.is_ok())
            .unwrap_or(false)
    }

    pub async fn wait_for_connected(&self, timeout: Duration) -> bool {
        let mut rx = self.conn.clone();
        tokio::time::timeout(
            timeout,
            rx.wait_for(|s| *s == RTCPeerConnectionState::Connected),
        )
        .await
        .map(|result| result.is_ok())
        .unwrap_or(false)
    }
}
