//! PAP TCP server.
//!
//! Listens on a TCP port and runs one session at a time. A connection must
//! open with [`UNLOCK_SIGNAL`](pap_protocol::UNLOCK_SIGNAL) before any
//! session state is created.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;

use tokio::io::AsyncWriteExt;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;

use pap_file_ops::{SystemUsers, UserDirectory};
use pap_protocol::wire::read_unlock;
use pap_protocol::DEFAULT_PORT;
use pap_session::SessionEngine;

use crate::ServerError;

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind.
    pub bind_address: IpAddr,
    /// TCP port to listen on (0 = OS-assigned).
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: DEFAULT_PORT,
        }
    }
}

/// The PAP server.
///
/// Sessions are serialized: the next connection is accepted only after
/// the current one has been closed.
pub struct PapServer<U: UserDirectory = SystemUsers> {
    addr: SocketAddr,
    engine: SessionEngine<U>,
    cancel: CancellationToken,
    local_addr: Mutex<Option<SocketAddr>>,
}

impl<U: UserDirectory> PapServer<U> {
    pub fn new(config: ServerConfig, engine: SessionEngine<U>) -> Arc<Self> {
        Arc::new(Self {
            addr: SocketAddr::new(config.bind_address, config.port),
            engine,
            cancel: CancellationToken::new(),
            local_addr: Mutex::new(None),
        })
    }

    /// Returns the local address the server is listening on.
    ///
    /// Only available after [`run`](Self::run) binds the socket.
    pub async fn local_addr(&self) -> Option<SocketAddr> {
        *self.local_addr.lock().await
    }

    /// Returns the listening port (0 if not yet bound).
    pub async fn port(&self) -> u16 {
        self.local_addr.lock().await.map(|a| a.port()).unwrap_or(0)
    }

    /// Stops the server. A session in progress is abandoned.
    pub fn shutdown(&self) {
        self.cancel.cancel();
    }

    /// Runs the server until [`shutdown`](Self::shutdown).
    pub async fn run(self: &Arc<Self>) -> Result<(), ServerError> {
        let listener = TcpListener::bind(self.addr).await?;

        let local_addr = listener.local_addr()?;
        *self.local_addr.lock().await = Some(local_addr);
        tracing::info!("pap server listening on {local_addr}");

        loop {
            tokio::select! {
                _ = self.cancel.cancelled() => {
                    tracing::info!("server shutting down");
                    break Ok(());
                }

                result = listener.accept() => {
                    match result {
                        Ok((stream, peer_addr)) => {
                            tokio::select! {
                                _ = self.cancel.cancelled() => {
                                    tracing::info!(%peer_addr, "session abandoned on shutdown");
                                    break Ok(());
                                }
                                _ = self.handle_connection(stream, peer_addr) => {}
                            }
                        }
                        Err(e) => {
                            tracing::error!("accept error: {e}");
                        }
                    }
                }
            }
        }
    }

    /// Gates one connection on the unlock byte and runs its session.
    async fn handle_connection(&self, mut stream: TcpStream, peer_addr: SocketAddr) {
        match read_unlock(&mut stream).await {
            Ok(true) => {}
            Ok(false) => {
                tracing::warn!(%peer_addr, "rejecting connection: bad unlock byte");
                return;
            }
            Err(e) => {
                tracing::warn!(%peer_addr, "connection closed before unlock: {e}");
                return;
            }
        }
        tracing::debug!(%peer_addr, "session unlocked");

        match self.engine.run(&mut stream).await {
            Ok(outcome) => {
                tracing::info!(
                    %peer_addr,
                    identity = %String::from_utf8_lossy(&outcome.identity),
                    mode = %outcome.transfer.mode(),
                    "{}",
                    outcome.transfer
                );
            }
            Err(e) => {
                tracing::warn!(%peer_addr, "session failed: {e}");
            }
        }

        if let Err(e) = stream.shutdown().await {
            tracing::debug!(%peer_addr, "shutdown after session: {e}");
        }
    }
}
