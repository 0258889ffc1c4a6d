use std::fs::OpenOptions;
use std::sync::Mutex;

use anyhow::Context;
use clap::Parser;
use httpd::cli::{Args, DaemonAction};
use httpd::config::{Config, LogConfig, ServerConfig};
use httpd::daemon::{self, PidFile};
use httpd::server::{Server, Shutdown};

fn main() -> anyhow::Result<()> {
    let cfg = Config::from_args(&Args::parse())?;

    // Forking has to happen before the runtime spawns any thread.
    let daemon_pid = match (cfg.daemon, &cfg.pid_file) {
        (Some(action), Some(path)) => {
            let pid_file = PidFile::new(path);
            match action {
                DaemonAction::Stop => return daemon::stop(&pid_file),
                DaemonAction::Start => daemon::start(&pid_file)?,
                DaemonAction::Restart => daemon::restart(&pid_file)?,
            }
            Some(pid_file)
        }
        _ => None,
    };

    init_logging(&cfg.log)?;

    let server = &cfg.server;
    tracing::info!(
        server_name = %server.server_name,
        ip = %server.ip,
        port = %server.port,
        root_dir = %server.root_dir.display(),
        default_file = %server.default_file,
        pid_file = ?cfg.pid_file,
        log_file = ?cfg.log.file,
        daemon = ?cfg.daemon,
        "Configuration loaded"
    );

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to create runtime")?;
    runtime.block_on(serve(cfg.server))?;

    if let Some(pid_file) = daemon_pid {
        pid_file.remove()?;
    }

    tracing::info!("Server stopped");
    Ok(())
}

async fn serve(cfg: ServerConfig) -> anyhow::Result<()> {
    let shutdown = Shutdown::new();
    shutdown.listen_for_signals()?;

    Server::bind(cfg).await?.run(shutdown).await
}

fn init_logging(cfg: &LogConfig) -> anyhow::Result<()> {
    if !cfg.enabled {
        return Ok(());
    }

    let builder = tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true);

    match &cfg.file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("cannot open log file {}", path.display()))?;
            builder.with_ansi(false).with_writer(Mutex::new(file)).init();
        }
        None => builder.init(),
    }

    Ok(())
}
