use std::io::Write;
use std::path::PathBuf;

use clap::Parser;
use httpd::cli::{Args, DaemonAction};
use httpd::config::{Config, DAEMON_LOG_FILE};

fn parse(args: &[&str]) -> Args {
    Args::try_parse_from(std::iter::once("httpd").chain(args.iter().copied())).unwrap()
}

const SERVER: &[&str] = &[
    "--server_name",
    "example.com",
    "--ip",
    "127.0.0.1",
    "--port",
    "8080",
    "--root_dir",
    "/srv/www",
];

#[test]
fn test_long_options() {
    let args = parse(&[
        "--pid_file",
        "/run/httpd.pid",
        "--log",
        "true",
        "--log_file",
        "/var/log/httpd.log",
        "--default_file",
        "home.html",
        "--daemon",
        "restart",
    ]);

    assert_eq!(args.pid_file, Some(PathBuf::from("/run/httpd.pid")));
    assert_eq!(args.log, Some(true));
    assert_eq!(args.log_file, Some(PathBuf::from("/var/log/httpd.log")));
    assert_eq!(args.default_file.as_deref(), Some("home.html"));
    assert_eq!(args.daemon, Some(DaemonAction::Restart));
}

#[test]
fn test_invalid_options_are_rejected() {
    assert!(Args::try_parse_from(["httpd", "--daemon", "pause"]).is_err());
    assert!(Args::try_parse_from(["httpd", "--log", "maybe"]).is_err());
    assert!(Args::try_parse_from(["httpd", "--unknown", "x"]).is_err());
}

#[test]
fn test_config_from_command_line_only() {
    let cfg = Config::from_args(&parse(SERVER)).unwrap();

    assert_eq!(cfg.server.server_name, "example.com");
    assert_eq!(cfg.server.ip, "127.0.0.1");
    assert_eq!(cfg.server.port, "8080");
    assert_eq!(cfg.server.root_dir, PathBuf::from("/srv/www"));
    assert_eq!(cfg.server.default_file, "index.html");
    assert!(!cfg.log.enabled);
    assert!(cfg.daemon.is_none());
}

#[test]
fn test_missing_required_option() {
    let args = parse(&["--server_name", "example.com", "--port", "8080"]);
    assert!(Config::from_args(&args).is_err());
}

#[test]
fn test_command_line_overrides_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(
        b"server: { server_name: example.com, ip: 127.0.0.1, port: 8080, root_dir: /srv }",
    )
    .unwrap();
    let path = file.path().to_str().unwrap();

    let cfg = Config::from_args(&parse(&["-c", path, "--port", "9090", "--log", "true"])).unwrap();

    assert_eq!(cfg.server.server_name, "example.com");
    assert_eq!(cfg.server.port, "9090");
    assert!(cfg.log.enabled);
}

#[test]
fn test_daemon_needs_pid_file() {
    let mut args = parse(SERVER);
    args.daemon = Some(DaemonAction::Start);
    assert!(Config::from_args(&args).is_err());

    args.pid_file = Some(PathBuf::from("/run/httpd.pid"));
    let cfg = Config::from_args(&args).unwrap();
    assert_eq!(cfg.daemon, Some(DaemonAction::Start));
    assert_eq!(cfg.log.file, Some(PathBuf::from(DAEMON_LOG_FILE)));
}
