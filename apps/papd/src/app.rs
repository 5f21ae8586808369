//! Wires the resolver, session engine and server together.

use std::sync::Arc;

use anyhow::Context;
use pap_file_ops::PathResolver;
use pap_server::PapServer;
use pap_session::SessionEngine;

use crate::config::Config;

/// Runs the server until Ctrl-C or a fatal server error.
pub async fn run(config: Config) -> anyhow::Result<()> {
    let server_config = config.server_config()?;

    let resolver = PathResolver::from_env().with_fallback_home(&config.fallback_home);
    let server = PapServer::new(server_config, SessionEngine::new(resolver));

    let server_run = Arc::clone(&server);
    let mut server_task = tokio::spawn(async move { server_run.run().await });

    tokio::select! {
        result = &mut server_task => {
            result
                .context("server task panicked")?
                .context("server stopped")?;
            return Ok(());
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("SIGINT received, shutting down");
        }
    }

    server.shutdown();
    server_task
        .await
        .context("server task panicked")?
        .context("server stopped")?;

    Ok(())
}
