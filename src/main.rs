use anyhow::{anyhow, Context};
use clap::Parser;
use pingora_core::server::configuration::Opt;
use pingora_core::server::Server;
use std::path::PathBuf;
use std::sync::Arc;

use gemcrow::config::Config;
use gemcrow::gateway::{Gateway, PathClassifier, SystemClock};
use gemcrow::origin::HttpOrigin;
use gemcrow::proxy::GemcrowProxy;
use gemcrow::store::Store;
use gemcrow::views::ViewRenderer;

/// Gemcrow - caching proxy for RubyGems-style registries built with Cloudflare's Pingora
#[derive(Parser, Debug)]
#[command(name = "gemcrow")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.yaml")]
    config: PathBuf,

    /// Daemon mode
    #[arg(short = 'd', long)]
    daemon: bool,

    /// Test configuration and exit
    #[arg(long)]
    test: bool,

    /// Upgrade workers gracefully
    #[arg(long)]
    upgrade: bool,

    /// Delete every stored spec index file and exit
    #[arg(long)]
    purge_specs: bool,
}

fn build_gateway(config: &Config) -> anyhow::Result<Gateway> {
    let origin = HttpOrigin::new(&config.upstream).context("Failed to create upstream client")?;
    let renderer = ViewRenderer::load(config.views.dir.as_deref(), config.upstream.base_url.clone())
        .context("Failed to load view templates")?;

    Ok(Gateway::new(
        Store::on_disk(config.storage.layout()),
        Arc::new(origin),
        Arc::new(renderer),
        PathClassifier::new(config.upstream.api_prefix.clone()),
        Arc::new(SystemClock),
        config.storage.freshness_window(),
    ))
}

fn purge_specs(config: &Config) -> anyhow::Result<()> {
    let gateway = build_gateway(config)?;
    let runtime = tokio::runtime::Runtime::new().context("Failed to start runtime")?;
    runtime
        .block_on(gateway.purge_spec_index())
        .context("Failed to purge spec index files")?;
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let config = Config::from_file(&args.config)
        .map_err(|e| anyhow!("Failed to load configuration: {}", e))?;
    config
        .validate()
        .map_err(|e| anyhow!("Invalid configuration: {}", e))?;

    gemcrow::logging::init_subscriber(&config.logging)
        .map_err(|e| anyhow!("Failed to initialize logging subsystem: {}", e))?;

    tracing::info!(
        config_file = %args.config.display(),
        server_address = %config.server.address,
        server_port = config.server.port,
        upstream = %config.upstream.base_url,
        cache_dir = %config.storage.cache_dir.display(),
        specs_dir = %config.storage.specs_dir.display(),
        "Configuration loaded successfully"
    );

    if args.purge_specs {
        return purge_specs(&config);
    }

    if args.test {
        tracing::info!("Configuration test successful");
        return Ok(());
    }

    // Build Pingora server options
    let opt = Opt {
        daemon: args.daemon,
        upgrade: args.upgrade,
        ..Default::default()
    };

    let mut server =
        Server::new(Some(opt)).map_err(|e| anyhow!("Failed to create Pingora server: {}", e))?;
    server.bootstrap();

    let proxy = GemcrowProxy::new(Arc::new(build_gateway(&config)?));

    let mut proxy_service = pingora_proxy::http_proxy_service(&server.configuration, proxy);

    let listen_addr = config.server.listen_addr();
    proxy_service.add_tcp(&listen_addr);

    tracing::info!(address = %listen_addr, "Starting gemcrow");

    server.add_service(proxy_service);

    // Blocks until shutdown
    server.run_forever();

    #[allow(unreachable_code)]
    Ok(())
}
