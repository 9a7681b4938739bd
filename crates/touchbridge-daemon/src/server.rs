//! TCP control server.
//!
//! One client is served at a time. Hot-plug changes are applied when a client
//! is accepted, before its first command, never while it is being served.

use std::net::{IpAddr, SocketAddr};

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::{TcpListener, TcpSocket};
use touchbridge_protocol::LineFramer;
use tracing::{debug, info, warn};

use crate::config::DaemonConfig;
use crate::dispatch::Dispatcher;
use crate::error::DaemonError;

/// Listening socket plus the dispatcher every connection feeds.
pub struct Server {
    listener: TcpListener,
    dispatcher: Dispatcher,
    read_chunk: usize,
}

impl Server {
    /// Bind the listener with address reuse enabled.
    pub fn bind(config: &DaemonConfig, dispatcher: Dispatcher) -> Result<Self, DaemonError> {
        let ip: IpAddr = config.bind.parse().map_err(|e| {
            DaemonError::Config(format!("invalid bind address {}: {e}", config.bind))
        })?;
        let addr = SocketAddr::new(ip, config.port);
        let bind_err = |source| DaemonError::Bind {
            addr: addr.to_string(),
            source,
        };

        let socket = if addr.is_ipv4() {
            TcpSocket::new_v4()
        } else {
            TcpSocket::new_v6()
        }
        .map_err(bind_err)?;
        socket.set_reuseaddr(true).map_err(bind_err)?;
        socket.bind(addr).map_err(bind_err)?;
        let listener = socket.listen(config.backlog).map_err(bind_err)?;

        info!(addr = %addr, "listening");
        Ok(Self {
            listener,
            dispatcher,
            read_chunk: config.read_chunk,
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr, DaemonError> {
        self.listener
            .local_addr()
            .map_err(|e| DaemonError::Other(e.into()))
    }

    /// Accept and serve clients until accepting or reading fails.
    pub async fn run(mut self) -> Result<(), DaemonError> {
        loop {
            let (mut stream, peer) = self.listener.accept().await.map_err(DaemonError::Accept)?;
            info!(peer = %peer, "connection accepted");

            match self.dispatcher.service_hotplug() {
                Ok(0) => {}
                Ok(changes) => info!(changes, "applied hot-plug changes"),
                Err(e) => warn!(error = %e, "failed to service hot-plug"),
            }

            serve_connection(&mut stream, &mut self.dispatcher, self.read_chunk).await?;
            info!(peer = %peer, "connection closed");
        }
    }
}

/// Serve one client until it disconnects.
///
/// Command failures are logged and the connection continues. A failed reply
/// write ends the connection like a peer close. Read errors are returned.
pub async fn serve_connection<S>(
    stream: &mut S,
    dispatcher: &mut Dispatcher,
    read_chunk: usize,
) -> Result<(), DaemonError>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let mut framer = LineFramer::new(read_chunk);
    let mut buf = vec![0u8; read_chunk];

    loop {
        let n = stream.read(&mut buf).await.map_err(DaemonError::Read)?;
        if n == 0 {
            debug!("peer closed connection");
            return Ok(());
        }

        let dropped = framer.push(&buf[..n]);
        if dropped > 0 {
            warn!(dropped, "line too long, discarded pending input");
        }

        while let Some(raw) = framer.pop_line() {
            let line = String::from_utf8_lossy(&raw);
            debug!(line = %line, "received");
            match dispatcher.handle_line(&line).await {
                Ok(Some(reply)) => {
                    if let Err(e) = write_reply(stream, &reply).await {
                        warn!(error = %e, "failed to send reply");
                        return Ok(());
                    }
                }
                Ok(None) => {}
                Err(e) => warn!(line = %line, error = %e, "command failed"),
            }
        }
    }
}

async fn write_reply<S: AsyncWrite + Unpin>(stream: &mut S, reply: &str) -> std::io::Result<()> {
    let mut out = Vec::with_capacity(reply.len() + 1);
    out.extend_from_slice(reply.as_bytes());
    out.push(b'\n');
    stream.write_all(&out).await?;
    stream.flush().await
}
