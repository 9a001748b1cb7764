//! # cimi-browser
//!
//! Composition root that wires the adapters together behind a CLI.
//!
//! ## Responsibilities
//! - Parse configuration (CLI args, env vars, config file)
//! - Initialise `tracing` with the configured filter
//! - Construct the `reqwest` resource client and the browser service
//! - `serve`: build the axum router and serve until SIGINT/SIGTERM
//! - `show` / `browse`: render resources in the terminal
//! - `filter`: check a `$filter` expression
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer — no domain logic belongs here.

mod browse;
mod cli;
mod config;
mod render;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use cimi_browser_adapter_http_axum::state::AppState;
use cimi_browser_adapter_http_reqwest::ReqwestResourceClient;
use cimi_browser_app::services::BrowserService;
use cimi_browser_app::session::BrowserSession;
use cimi_browser_domain::filter::Filter;
use cimi_browser_domain::location::PageLocation;
use cimi_browser_domain::reference::{BaseEndpoint, ResourceReference};
use cimi_browser_domain::view_mode::ViewMode;

use crate::cli::{Cli, Command, ServeArgs, ShowArgs};
use crate::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut config = Config::load(cli.config.as_deref())?;
    config.apply_cli(&cli);

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.logging.filter))
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::Serve(args) => serve(config, args).await,
        Command::Show(args) => show(&config, args).await,
        Command::Browse(args) => {
            config.validate()?;
            let (service, location) = connect(&config, args.location.as_deref())?;
            browse::run(BrowserSession::new(service, location)).await
        }
        Command::Filter(args) => {
            let filter = Filter::parse(&args.expression)
                .with_context(|| format!("invalid filter `{}`", args.expression))?;
            println!("{filter}");
            Ok(())
        }
    }
}

async fn serve(mut config: Config, args: ServeArgs) -> anyhow::Result<()> {
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    config.validate()?;

    let client = ReqwestResourceClient::new(&config.http)?;
    let service = BrowserService::new(client, BaseEndpoint::new(config.cimi.base_url.as_str()));
    let app = cimi_browser_adapter_http_axum::router::build(AppState::new(service));

    let bind_addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {bind_addr}"))?;
    tracing::info!(
        addr = %bind_addr,
        base_url = %config.cimi.base_url,
        "cimi-browser listening on http://{bind_addr}/webui"
    );
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn show(config: &Config, args: ShowArgs) -> anyhow::Result<()> {
    config.validate()?;
    let (service, location) = connect(config, Some(&args.location))?;
    let page = match args.filter.as_deref() {
        Some(expression) => {
            let filter = Filter::parse(expression)
                .with_context(|| format!("invalid filter `{expression}`"))?;
            service.load_filtered(&location, &filter, ViewMode::Normal).await
        }
        None => service.load(&location, ViewMode::Normal).await,
    }
    .map_err(|err| anyhow::anyhow!(err.message()))?;

    if args.json {
        println!("{}", page.json);
    } else {
        print!("{}", render::render_page(&page, None));
    }
    Ok(())
}

/// Build the service and the starting location.
///
/// A full page URL (`http://host/cimi/webui#Machine/1`) carries its own base
/// endpoint; a bare reference is resolved against the configured one.
fn connect(
    config: &Config,
    location: Option<&str>,
) -> anyhow::Result<(BrowserService<ReqwestResourceClient>, PageLocation)> {
    let (base, location) = match location {
        Some(url) if url.contains("://") => {
            let location = PageLocation::parse(url);
            (BaseEndpoint::from_page_uri(location.page_uri()), location)
        }
        reference => {
            let base = BaseEndpoint::new(config.cimi.base_url.as_str());
            let page_uri = format!("{base}{}", BaseEndpoint::UI_MARKER);
            let reference = ResourceReference::new(reference.unwrap_or_default());
            let location = PageLocation::parse(&page_uri).with_reference(reference);
            (base, location)
        }
    };
    tracing::debug!(base = %base, reference = %location.resolve_resource_path(), "connecting");
    let client = ReqwestResourceClient::new(&config.http)?;
    Ok((BrowserService::new(client, base), location))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(%err, "failed to listen for ctrl-c");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!(%err, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
    tracing::info!("shutting down");
}
