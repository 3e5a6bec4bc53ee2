use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use mirrorcast_client::{IceServerConfig, ReceiverClient, SessionConfig};

/// Headless screen-mirroring receiver: joins a room, answers the
/// broadcaster's offer, and logs session state until interrupted.
#[derive(Parser)]
#[command(name = "mirrorcast-receiver")]
struct Args {
    /// Signaling relay URL.
    #[arg(long, default_value = "ws://127.0.0.1:8787/ws")]
    url: String,

    /// Room shared with the broadcaster.
    #[arg(long, default_value = "ktv-room-1")]
    room: String,

    /// ICE server URLs. Defaults to a public STUN server.
    #[arg(long = "ice-server")]
    ice_servers: Vec<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let mut config = SessionConfig::new(args.url, args.room.as_str());
    if !args.ice_servers.is_empty() {
        config.ice_servers = vec![IceServerConfig {
            urls: args.ice_servers,
            username: None,
            credential: None,
        }];
    }

    let client = ReceiverClient::new(config);
    let status = client
        .start()
        .await
        .context("Failed to start receiver session")?;

    let mut phase = status.phase_changes();
    let mut ice = status.ice_changes();
    let mut conn = status.connection_changes();
    let watcher = tokio::spawn(async move {
        loop {
            tokio::select! {
                changed = phase.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    info!("Session phase: {:?}", *phase.borrow());
                }
                changed = ice.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    info!("ICE state: {}", *ice.borrow());
                }
                changed = conn.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    info!("Connection state: {}", *conn.borrow());
                }
            }
        }
    });

    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for the shutdown signal")?;
    info!("Shutting down");

    client.stop().await;
    watcher.abort();
    Ok(())
}
