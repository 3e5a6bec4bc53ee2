use crate::config::IceServerConfig;
use crate::error::{NegotiationError, SessionError};
use crate::session::negotiator::PeerEndpoint;
use crate::session::status::StatusTx;
use crate::sink::MediaSink;
use async_trait::async_trait;
use mirrorcast_core::SignalMessage;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info};
use webrtc::api::APIBuilder;
use webrtc::api::interceptor_registry::register_default_interceptors;
use webrtc::api::media_engine::MediaEngine;
use webrtc::ice_transport::ice_candidate::{RTCIceCandidate, RTCIceCandidateInit};
use webrtc::ice_transport::ice_server::RTCIceServer;
use webrtc::interceptor::registry::Registry;
use webrtc::peer_connection::RTCPeerConnection;
use webrtc::peer_connection::configuration::RTCConfiguration;
use webrtc::peer_connection::sdp::session_description::RTCSessionDescription;
use webrtc::rtp_transceiver::RTCRtpTransceiverInit;
use webrtc::rtp_transceiver::rtp_codec::RTPCodecType;
use webrtc::rtp_transceiver::rtp_transceiver_direction::RTCRtpTransceiverDirection;

/// Receive-only peer connection wired for answerer duty: local
/// candidates go out over the signaling channel, incoming tracks go to
/// the media sink, and state changes feed the status watches.
pub(crate) struct RtcEndpoint {
    pc: Arc<RTCPeerConnection>,
}

impl RtcEndpoint {
    pub(crate) async fn new(
        ice_servers: &[IceServerConfig],
        outbound: mpsc::UnboundedSender<SignalMessage>,
        sink: Arc<dyn MediaSink>,
        status: &StatusTx,
    ) -> Result<Self, SessionError> {
        let mut media_engine = MediaEngine::default();
        media_engine.register_default_codecs()?;
        let registry = register_default_interceptors(Registry::new(), &mut media_engine)?;

        let api = APIBuilder::new()
            .with_media_engine(media_engine)
            .with_interceptor_registry(registry)
            .build();

        let rtc_config = RTCConfiguration {
            ice_servers: ice_servers
                .iter()
                .map(|server| RTCIceServer {
                    urls: server.urls.clone(),
                    username: server.username.clone().unwrap_or_default(),
                    credential: server.credential.clone().unwrap_or_default(),
                })
                .collect(),
            ..Default::default()
        };

        let pc = Arc::new(api.new_peer_connection(rtc_config).await?);

        // The receiver only ever consumes media.
        pc.add_transceiver_from_kind(
            RTPCodecType::Video,
            Some(RTCRtpTransceiverInit {
                direction: RTCRtpTransceiverDirection::Recvonly,
                send_encodings: vec![],
            }),
        )
        .await?;

        // Trickle ICE: every locally gathered candidate goes out as an
        // `ice` frame. The room scopes delivery, so no addressing.
        let ice_outbound = outbound.clone();
        pc.on_ice_candidate(Box::new(move |c: Option<RTCIceCandidate>| {
            let outbound = ice_outbound.clone();
            Box::pin(async move {
                let Some(candidate) = c else { return };
                let Ok(init) = candidate.to_json() else { return };
                let Ok(payload) = serde_json::to_value(&init) else { return };
                let _ = outbound.send(SignalMessage::Ice { candidate: payload });
            })
        }));

        let track_sink = sink.clone();
        pc.on_track(Box::new(move |track, _receiver, _transceiver| {
            let sink = track_sink.clone();
            Box::pin(async move {
                info!("Remote track arrived: kind={} ssrc={}", track.kind(), track.ssrc());
                sink.on_track(track).await;
            })
        }));

        let ice_status = status.ice.clone();
        pc.on_ice_connection_state_change(Box::new(move |state| {
            let tx = ice_status.clone();
            Box::pin(async move {
                debug!("ICE connection state: {}", state);
                tx.send_replace(state);
            })
        }));

        let conn_status = status.conn.clone();
        pc.on_peer_connection_state_change(Box::new(move |state| {
            let tx = conn_status.clone();
            Box::pin(async move {
                info!("Peer connection state: {}", state);
                tx.send_replace(state);
            })
        }));

        Ok(Self { pc })
    }

    pub(crate) async fn close(&self) {
        if let Err(e) = self.pc.close().await {
            debug!("Error closing peer connection: {}", e);
        }
    }
}

#[async_trait]
impl PeerEndpoint for RtcEndpoint {
    async fn set_remote_offer(&self, sdp: String) -> Result<(), NegotiationError> {
        let desc =
            RTCSessionDescription::offer(sdp).map_err(NegotiationError::RemoteDescription)?;
        self.pc
            .set_remote_description(desc)
            .await
            .map_err(NegotiationError::RemoteDescription)
    }

    async fn create_local_answer(&self) -> Result<String, NegotiationError> {
        let answer = self
            .pc
            .create_answer(None)
            .await
            .map_err(NegotiationError::LocalAnswer)?;
        self.pc
            .set_local_description(answer.clone())
            .await
            .map_err(NegotiationError::LocalAnswer)?;
        Ok(answer.sdp)
    }

    async fn apply_candidate(&self, candidate: serde_json::Value) -> Result<(), NegotiationError> {
        let init: RTCIceCandidateInit =
            serde_json::from_value(candidate).map_err(NegotiationError::CandidateFormat)?;
        self.pc
            .add_ice_candidate(init)
            .await
            .map_err(NegotiationError::Candidate)
    }
}
