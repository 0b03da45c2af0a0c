use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tokio::task::JoinSet;
use tracing::{Instrument, debug, error, info, info_span};

use crate::config::Config;
use crate::http::connection::Connection;
use crate::http::handler::Handler;

/// A listening socket shared by a fixed pool of acceptor tasks.
///
/// Every acceptor hands each accepted socket to its own task and goes
/// straight back to `accept`, so a slow connection never holds up the next
/// one. All acceptors and connections run on the same runtime.
pub struct Server<H> {
    listener: Arc<TcpListener>,
    handler: Arc<H>,
    workers: usize,
    max_head_bytes: usize,
    max_body_bytes: usize,
}

impl<H: Handler> Server<H> {
    pub async fn bind(cfg: &Config, handler: H) -> anyhow::Result<Self> {
        let addr = cfg.listen_addr();
        let listener = TcpListener::bind(&addr)
            .await
            .with_context(|| format!("failed to bind {addr}"))?;

        info!(addr = %listener.local_addr()?, workers = cfg.workers, "Listening");

        Ok(Self {
            listener: Arc::new(listener),
            handler: Arc::new(handler),
            workers: cfg.workers,
            max_head_bytes: cfg.max_head_bytes,
            max_body_bytes: cfg.max_body_bytes,
        })
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Runs the acceptors. Only returns if an acceptor task dies.
    pub async fn run(self) -> anyhow::Result<()> {
        let mut acceptors = JoinSet::new();

        for worker in 0..self.workers {
            acceptors.spawn(accept_loop(
                worker,
                Arc::clone(&self.listener),
                Arc::clone(&self.handler),
                self.max_head_bytes,
                self.max_body_bytes,
            ));
        }

        while let Some(res) = acceptors.join_next().await {
            res.context("acceptor task failed")?;
        }

        Ok(())
    }
}

async fn accept_loop<H: Handler>(
    worker: usize,
    listener: Arc<TcpListener>,
    handler: Arc<H>,
    max_head_bytes: usize,
    max_body_bytes: usize,
) {
    loop {
        let (socket, peer) = match listener.accept().await {
            Ok(accepted) => accepted,
            Err(e) => {
                error!(worker, error = %e, "Failed to accept connection");
                continue;
            }
        };
        debug!(worker, peer = %peer, "Accepted connection");

        let handler = Arc::clone(&handler);
        let span = info_span!("connection", peer = %peer);

        tokio::spawn(
            async move {
                let mut conn = Connection::new(socket, handler)
                    .with_max_head_bytes(max_head_bytes)
                    .with_max_body_bytes(max_body_bytes);
                if let Err(e) = conn.run().await {
                    error!(error = %e, "Connection aborted");
                }
            }
            .instrument(span),
        );
    }
}
