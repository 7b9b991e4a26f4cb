use std::{io, path::PathBuf, sync::Arc};

use anyhow::Context;
use clap::Parser;
use nx_amiibo::store::FileTagStore;
use nx_nfp_mitm::{
    Config, KeyComboMonitor, LineTransport, ServerManager, VirtualPad, logging,
};
use nx_service_nfp::{ActivateTrigger, NfpUserMitmService, SERVICE_NAME};

/// Emulated `nfp:user` amiibo reader.
///
/// Reads JSON-lines requests on stdin and writes replies on stdout.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Configuration file (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Tag image file, overrides `tag_path`
    #[arg(short, long)]
    tag: Option<PathBuf>,

    /// Log file, overrides `log_path`
    #[arg(short, long)]
    log: Option<PathBuf>,

    /// Also log to stderr
    #[arg(long)]
    stderr: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => Config::default(),
    };
    if let Some(tag) = cli.tag {
        config.tag_path = tag;
    }
    if let Some(log) = cli.log {
        config.log_path = log;
    }

    let _guard = logging::init(&config.log_path, &config.log_filter, cli.stderr)
        .context("failed to initialize logging")?;

    tracing::info!(service = SERVICE_NAME, tag = %config.tag_path.display(), "starting");

    let trigger = Arc::new(ActivateTrigger::new());
    let store = Arc::new(FileTagStore::new(config.tag_path.clone()));

    let pad = VirtualPad::new();
    let monitor = KeyComboMonitor::new(
        pad.clone(),
        config.trigger_combo()?,
        trigger.clone(),
        config.poll_interval(),
    )
    .spawn()
    .context("failed to start input monitor")?;

    let service = NfpUserMitmService::new(trigger, store);
    let mut server = ServerManager::new(service, config.max_sessions);

    let stdin = io::stdin();
    let mut transport = LineTransport::new(stdin.lock(), io::stdout().lock(), pad);
    let result = server.process(&mut transport);

    monitor.stop();
    result.context("transport failed")?;

    tracing::info!("exiting");
    Ok(())
}
