//! `apigroups` entry point.
//!
//! This binary is the composition root. Responsibilities:
//!
//! 1. **Parse configuration**: command line flags with environment fallbacks
//!    (see [`config`]).
//! 2. **Wire observability**: `tracing-subscriber` (pretty or JSON, to stderr)
//!    and an optional OpenTelemetry OTLP exporter (see [`telemetry`]).
//! 3. **Construct adapters**: build the shared [`DummyService`], one versioned
//!    adapter per supported version, and register each explicitly on a
//!    [`Server`]. Any registration failure aborts startup.
//! 4. **Serve**: drive the server over line-delimited JSON on stdin/stdout
//!    until EOF or Ctrl-C.

mod config;
mod telemetry;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use apigroup::{Cancellation, Version};
use clap::Parser;
use dummy::{DummyService, ServerInterface};
use tokio::io::BufReader;
use tracing::info;
use transport::ndjson::{self, ServeOptions};
use transport::Server;

use crate::config::{Cli, Command, ServeArgs};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let telemetry = telemetry::init(&cli.logging)?;

    let result = run(cli.command).await;
    if let Err(err) = &result {
        tracing::error!(error = %format!("{err:#}"), "exiting with failure");
    }

    telemetry.shutdown();
    result
}

async fn run(command: Command) -> Result<()> {
    match command {
        Command::Serve(args) => serve(args).await,
        Command::Versions => {
            let server = build_server(&[])?;
            let table = serde_json::to_string_pretty(&server.methods())
                .context("encoding the method table")?;
            println!("{table}");
            Ok(())
        }
    }
}

/// Builds the shared implementation and registers one adapter per version.
///
/// `enabled` restricts which versions are registered; empty means all. Asking
/// for a version no adapter provides is a startup error.
fn build_server(enabled: &[Version]) -> Result<Server> {
    let implementation: Arc<dyn ServerInterface> = Arc::new(DummyService::new());
    let apis = dummy::versioned_apis(implementation);

    for requested in enabled {
        if !apis.iter().any(|api| api.version() == *requested) {
            bail!("no adapter serves API version {requested}");
        }
    }

    let mut server = Server::new();
    for api in apis {
        let version = api.version();
        if !enabled.is_empty() && !enabled.contains(&version) {
            info!(%version, service = api.service_name(), "version disabled by configuration");
            continue;
        }
        let service = api.service_name();
        api.register(&mut server)
            .with_context(|| format!("registering {service} ({version})"))?;
    }
    Ok(server)
}

async fn serve(args: ServeArgs) -> Result<()> {
    let server = Arc::new(build_server(&args.versions)?);

    let shutdown = Cancellation::new();
    let options = ServeOptions {
        default_timeout: (args.default_timeout_ms > 0)
            .then(|| Duration::from_millis(args.default_timeout_ms)),
        shutdown: shutdown.clone(),
    };

    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("interrupt received; cancelling in-flight calls");
            shutdown.cancel();
        }
    });

    info!(methods = server.methods().len(), "serving on stdin/stdout");
    ndjson::serve(
        server,
        BufReader::new(tokio::io::stdin()),
        tokio::io::stdout(),
        options,
    )
    .await
    .context("serving line-delimited JSON on stdio")?;
    Ok(())
}
