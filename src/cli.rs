use std::path::PathBuf;

use clap::{ArgAction, Parser, ValueEnum};

/// Minimal static file HTTP/1.1 server.
///
/// Every option overrides the matching field of the YAML configuration.
#[derive(Clone, Debug, Default, Parser)]
#[command(name = "httpd", version)]
pub struct Args {
    /// Read base configuration from this YAML file
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// File holding the PID of the daemon
    #[arg(long = "pid_file", value_name = "PATH")]
    pub pid_file: Option<PathBuf>,

    /// Write the log to this file instead of stdout
    #[arg(long = "log_file", value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Turn logging on or off
    #[arg(long, value_name = "BOOL", action = ArgAction::Set)]
    pub log: Option<bool>,

    /// Host name clients must send in `Host`
    #[arg(long = "server_name", value_name = "NAME")]
    pub server_name: Option<String>,

    /// Address to listen on
    #[arg(long, value_name = "ADDR")]
    pub ip: Option<String>,

    /// Port to listen on
    #[arg(long, value_name = "PORT")]
    pub port: Option<String>,

    /// Directory files are served from
    #[arg(long = "root_dir", value_name = "PATH")]
    pub root_dir: Option<PathBuf>,

    /// File served for targets ending in `/`
    #[arg(long = "default_file", value_name = "NAME")]
    pub default_file: Option<String>,

    /// Run in the background, or stop a running daemon
    #[arg(long, value_enum, value_name = "ACTION")]
    pub daemon: Option<DaemonAction>,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum DaemonAction {
    Start,
    Stop,
    Restart,
}
