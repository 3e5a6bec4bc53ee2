use crate::config::SessionConfig;
use crate::error::SessionError;
use crate::session::rtc_endpoint::RtcEndpoint;
use crate::session::signal_driver::SignalDriver;
use crate::session::status::{SessionPhase, SessionStatus, status_channel};
use crate::sink::MediaSink;
use futures::{SinkExt, StreamExt};
use mirrorcast_core::SignalMessage;
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, info, warn};

/// One signaling channel plus one peer connection.
///
/// Sessions are created whole and torn down whole. A restart builds a
/// fresh `PeerSession` and drops this one, so callbacks wired to a dead
/// session hold references into its own state only and can never touch
/// the replacement's.
pub(crate) struct PeerSession {
    endpoint: Arc<RtcEndpoint>,
    status: SessionStatus,
    phase: watch::Sender<SessionPhase>,
    write_task: JoinHandle<()>,
    read_task: JoinHandle<()>,
}

impl PeerSession {
    pub(crate) async fn connect(
        config: &SessionConfig,
        sink: Arc<dyn MediaSink>,
    ) -> Result<Self, SessionError> {
        let (status_tx, status) = status_channel();

        let (ws, _) = connect_async(config.url.as_str()).await?;
        info!("Signaling channel connected to {}", config.url);
        let (mut ws_sink, mut ws_stream) = ws.split();

        let (outbound, mut outbound_rx) = mpsc::unbounded_channel::<SignalMessage>();

        let endpoint = Arc::new(
            RtcEndpoint::new(&config.ice_servers, outbound.clone(), sink, &status_tx).await?,
        );

        // Writer: drains outbound messages onto the socket.
        let write_task = tokio::spawn(async move {
            while let Some(msg) = outbound_rx.recv().await {
                let frame = match msg.encode() {
                    Ok(frame) => frame,
                    Err(e) => {
                        warn!("Failed to serialize signal message: {}", e);
                        continue;
                    }
                };
                if ws_sink.send(Message::Text(frame.into())).await.is_err() {
                    break;
                }
            }
            let _ = ws_sink.send(Message::Close(None)).await;
        });

        // The channel is open; ask for the room straight away. Offers
        // are only honored once the ack comes back.
        outbound
            .send(SignalMessage::Join {
                room: config.room.clone(),
            })
            .map_err(|_| SessionError::ChannelClosed)?;

        let phase = status_tx.phase;
        let read_task = tokio::spawn({
            let endpoint = endpoint.clone();
            let phase = phase.clone();

            async move {
                let mut driver = SignalDriver::new(endpoint, outbound, phase.clone());
                while let Some(frame) = ws_stream.next().await {
                    match frame {
                        Ok(Message::Text(text)) => driver.handle_frame(text.as_str()).await,
                        Ok(Message::Close(_)) => {
                            info!("Signaling channel closed by relay");
                            break;
                        }
                        Ok(_) => {}
                        Err(e) => {
                            warn!("Signaling channel error: {}", e);
                            break;
                        }
                    }
                }
                phase.send_replace(SessionPhase::Closed);
            }
        });

        Ok(Self {
            endpoint,
            status,
            phase,
            write_task,
            read_task,
        })
    }

    pub(crate) fn status(&self) -> SessionStatus {
        self.status.clone()
    }

    /// Full teardown: peer connection closed, channel tasks stopped,
    /// state marked closed. Anything still queued for this session is
    /// dropped with it.
    pub(crate) async fn shutdown(self) {
        self.endpoint.close().await;
        self.read_task.abort();
        self.write_task.abort();
        self.phase.send_replace(SessionPhase::Closed);
        debug!("Session torn down");
    }
}
