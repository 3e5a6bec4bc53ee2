use async_trait::async_trait;
use std::sync::Arc;
use tracing::info;
use webrtc::track::track_remote::TrackRemote;

/// Where incoming media ends up. The embedding application decides
/// what playback means; the session only hands tracks over.
#[async_trait]
pub trait MediaSink: Send + Sync {
    async fn on_track(&self, track: Arc<TrackRemote>);
}

/// Sink for headless use: announces the track and leaves it unread.
pub struct LogSink;

#[async_trait]
impl MediaSink for LogSink {
    async fn on_track(&self, track: Arc<TrackRemote>) {
        info!(
            "Remote {} track (ssrc={}) has no playback sink attached",
            track.kind(),
            track.ssrc()
        );
    }
}
