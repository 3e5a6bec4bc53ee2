use futures::{SinkExt, StreamExt};
use mirrorcast_core::SignalMessage;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::sync::{mpsc, watch};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use webrtc::api::APIBuilder;
use webrtc::api::interceptor_registry::register_default_interceptors;
use webrtc::api::media_engine::{MIME_TYPE_VP8, MediaEngine};
use webrtc::ice_transport::ice_candidate::{RTCIceCandidate, RTCIceCandidateInit};
use webrtc::interceptor::registry::Registry;
use webrtc::peer_connection::RTCPeerConnection;
use webrtc::peer_connection::configuration::RTCConfiguration;
use webrtc::peer_connection::peer_connection_state::RTCPeerConnectionState;
use webrtc::peer_connection::sdp::session_description::RTCSessionDescription;
use webrtc::rtp_transceiver::rtp_codec::RTCRtpCodecCapability;
use webrtc::track::track_local::TrackLocal;
use webrtc::track::track_local::track_local_static_sample::TrackLocalStaticSample;

/// Offerer-side driver standing in for the screen broadcaster: a real
/// peer connection with a video track, speaking the relay protocol
/// over a real WebSocket.
pub struct TestBroadcaster {
    pc: Arc<RTCPeerConnection>,
    ws: WebSocketStream<MaybeTlsStream<TcpStream>>,
    candidate_rx: mpsc::UnboundedReceiver<String>,
    state_rx: watch::Receiver<RTCPeerConnectionState>,
}

impl TestBroadcaster {
    pub async fn connect(addr: SocketAddr, room: &str) -> Self {
        let mut media_engine = MediaEngine::default();
        media_engine
            .register_default_codecs()
            .expect("Failed to register codecs");
        let registry = register_default_interceptors(Registry::new(), &mut media_engine)
            .expect("Failed to register interceptors");

        let api = APIBuilder::new()
            .with_media_engine(media_engine)
            .with_interceptor_registry(registry)
            .build();

        // No ICE servers: loopback host candidates are enough here.
        let pc = Arc::new(
            api.new_peer_connection(RTCConfiguration::default())
                .await
                .expect("Failed to create peer connection"),
        );

        let track = Arc::new(TrackLocalStaticSample::new(
            RTCRtpCodecCapability {
                mime_type: MIME_TYPE_VP8.to_owned(),
                ..Default::default()
            },
            "video".to_owned(),
            "mirrorcast".to_owned(),
        ));
        pc.add_track(track.clone() as Arc<dyn TrackLocal + Send + Sync>)
            .await
            .expect("Failed to add video track");

        let (candidate_tx, candidate_rx) = mpsc::unbounded_channel();
        pc.on_ice_candidate(Box::new(move |c: Option<RTCIceCandidate>| {
            let tx = candidate_tx.clone();
            Box::pin(async move {
                let Some(candidate) = c else { return };
                let Ok(init) = candidate.to_json() else { return };
                let Ok(payload) = serde_json::to_value(&init) else { return };
                let frame = SignalMessage::Ice { candidate: payload }
                    .encode()
                    .expect("Failed to encode candidate");
                let _ = tx.send(frame);
            })
        }));

        let (state_tx, state_rx) = watch::channel(RTCPeerConnectionState::New);
        pc.on_peer_connection_state_change(Box::new(move |state| {
            let tx = state_tx.clone();
            Box::pin(async move {
                tracing::debug!("[TestBroadcaster] Connection state: {}", state);
                tx.send_replace(state);
            })
        }));

        let (ws, _) = connect_async(format!("ws://{addr}/ws"))
            .await
            .expect("Failed to connect to relay");

        let mut broadcaster = Self {
            pc,
            ws,
            candidate_rx,
            state_rx,
        };

        broadcaster
            .send(SignalMessage::Join { room: room.into() })
            .await;
        match broadcaster.recv().await {
            SignalMessage::Joined { room: acked } => assert_eq!(acked.as_str(), room),
            other => panic!("expected joined ack, got {other:?}"),
        }

        broadcaster
    }

    /// Create and send the offer; candidates trickle afterwards from
    /// `run_until_connected`.
    pub async fn send_offer(&mut self) {
        let offer = self
            .pc
            .create_offer(None)
            .await
            .expect("Failed to create offer");
        self.pc
            .set_local_description(offer.clone())
            .await
            .expect("Failed to set local description");
        self.send(SignalMessage::Offer { sdp: offer.sdp }).await;
    }

    /// Gather the full candidate set first and put every candidate on
    /// the wire BEFORE the offer — forces the receiver through its
    /// pending-candidate queue. Returns how many went out early.
    pub async fn send_gathered_candidates_then_offer(&mut self) -> usize {
        let offer = self
            .pc
            .create_offer(None)
            .await
            .expect("Failed to create offer");
        let mut gathered = self.pc.gathering_complete_promise().await;
        self.pc
            .set_local_description(offer)
            .await
            .expect("Failed to set local description");
        let _ = gathered.recv().await;

        let mut sent = 0;
        while let Ok(frame) = self.candidate_rx.try_recv() {
            self.ws
                .send(Message::Text(frame.into()))
                .await
                .expect("Failed to send candidate");
            sent += 1;
        }

        let local = self
            .pc
            .local_description()
            .await
            .expect("Local description missing");
        self.send(SignalMessage::Offer { sdp: local.sdp }).await;
        sent
    }

    /// Pump signaling (answer in, candidates both ways) until the peer
    /// connection reports connected or the timeout elapses.
    pub async fn run_until_connected(&mut self, timeout: Duration) -> bool {
        let deadline = tokio::time::Instant::now() + timeout;

        loop {
            if *self.state_rx.borrow() == RTCPeerConnectionState::Connected {
                return true;
            }

            tokio::select! {
                _ = tokio::time::sleep_until(deadline) => return false,

                candidate = self.candidate_rx.recv() => {
                    if let Some(frame) = candidate {
                        let _ = self.ws.send(Message::Text(frame.into())).await;
                    }
                }

                frame = self.ws.next() => {
                    let Some(Ok(Message::Text(text))) = frame else { return false };
                    match SignalMessage::decode(text.as_str()) {
                        Ok(SignalMessage::Answer { sdp }) => {
                            let answer = RTCSessionDescription::answer(sdp)
                                .expect("Bad answer SDP");
                            self.pc
                                .set_remote_description(answer)
                                .await
                                .expect("Failed to set remote answer");
                        }
                        Ok(SignalMessage::Ice { candidate }) => {
                            let init: RTCIceCandidateInit = serde_json::from_value(candidate)
                                .expect("Bad candidate payload");
                            if let Err(e) = self.pc.add_ice_candidate(init).await {
                                tracing::warn!("[TestBroadcaster] Failed to add candidate: {}", e);
                            }
                        }
                        _ => {}
                    }
                }

                changed = self.state_rx.changed() => {
                    if changed.is_err() {
                        return false;
                    }
                }
            }
        }
    }

    pub async fn close(mut self) {
        let _ = self.pc.close().await;
        let _ = self.ws.close(None).await;
    }

    async fn send(&mut self, msg: SignalMessage) {
        let frame = msg.encode().expect("Failed to encode message");
        self.ws
            .send(Message::Text(frame.into()))
            .await
            .expect("Failed to send frame");
    }

    async fn recv(&mut self) -> SignalMessage {
        let result = tokio::time::timeout(Duration::from_millis(5000), async {
            while let Some(msg) = self.ws.next().await {
                if let Message::Text(text) = msg.expect("WebSocket stream error") {
                    return SignalMessage::decode(text.as_str())
                        .expect("received frame that does not decode");
                }
            }
            panic!("Connection ended while waiting for a frame");
        })
        .await;
        result.expect("Timed out waiting for a frame")
    }
}
