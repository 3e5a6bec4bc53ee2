use crate::config::SessionConfig;
use crate::error::SessionError;
use crate::session::PeerSession;
use crate::session::status::SessionStatus;
use crate::sink::{LogSink, MediaSink};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::info;

/// Viewer-side entry point. Owns at most one live session; starting
/// again tears the previous one down first, which is also the
/// reconnect path. No automatic reconnect is attempted — when and
/// whether to retry is the caller's decision.
pub struct ReceiverClient {
    config: SessionConfig,
    sink: Arc<dyn MediaSink>,
    session: Mutex<Option<PeerSession>>,
}

impl ReceiverClient {
    pub fn new(config: SessionConfig) -> Self {
        Self::with_sink(config, Arc::new(LogSink))
    }

    pub fn with_sink(config: SessionConfig, sink: Arc<dyn MediaSink>) -> Self {
        Self {
            config,
            sink,
            session: Mutex::new(None),
        }
    }

    /// Start a fresh session, replacing and fully closing any active
    /// one first.
    pub async fn start(&self) -> Result<SessionStatus, SessionError> {
        let mut slot = self.session.lock().await;
        if let Some(old) = slot.take() {
            info!("Restarting: closing the previous session");
            old.shutdown().await;
        }

        let session = PeerSession::connect(&self.config, self.sink.clone()).await?;
        let status = session.status();
        *slot = Some(session);
        Ok(status)
    }

    /// Tear down the active session, if any.
    pub async fn stop(&self) {
        if let Some(session) = self.session.lock().await.take() {
            session.shutdown().await;
        }
    }

    pub async fn status(&self) -> Option<SessionStatus> {
        self.session.lock().await.as_ref().map(PeerSession::status)
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }
}
