use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Deserializer};

use crate::cli::{Args, DaemonAction};

/// Environment variable consulted when no configuration file is given on
/// the command line.
pub const CONFIG_ENV: &str = "HTTPD_CONFIG";

const DEFAULT_CONFIG_PATH: &str = "httpd.yaml";
const DEFAULT_FILE: &str = "index.html";

/// Log file used by a daemon that was not given one.
pub const DAEMON_LOG_FILE: &str = "httpd.log";

/// Top level configuration document.
///
/// ```yaml
/// pid_file: /run/httpd.pid
/// log:
///   enabled: true
///   file: /var/log/httpd.log
/// server:
///   server_name: example.com
///   ip: 127.0.0.1
///   port: 8080
///   root_dir: /srv/www
///   default_file: index.html
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub pid_file: Option<PathBuf>,
    #[serde(default)]
    pub log: LogConfig,
    #[serde(default)]
    pub server: ServerConfig,
    /// Only ever set from the command line.
    #[serde(skip)]
    pub daemon: Option<DaemonAction>,
}

/// Logging is off unless enabled.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LogConfig {
    /// When false no subscriber is installed and logging is a no-op.
    #[serde(default)]
    pub enabled: bool,
    /// Log to this file instead of stdout.
    #[serde(default)]
    pub file: Option<PathBuf>,
}

/// The single virtual server this process answers for.
///
/// Missing fields are left empty and rejected by [`ServerConfig::validate`].
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub server_name: String,
    pub ip: String,
    #[serde(deserialize_with = "port_string")]
    pub port: String,
    pub root_dir: PathBuf,
    pub default_file: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            server_name: String::new(),
            ip: String::new(),
            port: String::new(),
            root_dir: PathBuf::new(),
            default_file: DEFAULT_FILE.to_string(),
        }
    }
}

/// Accepts `port: 8080` as well as `port: "8080"`.
fn port_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Port {
        Number(u16),
        Text(String),
    }

    Ok(match Port::deserialize(deserializer)? {
        Port::Number(port) => port.to_string(),
        Port::Text(port) => port,
    })
}

impl Config {
    /// Builds the configuration from the command line.
    ///
    /// The YAML file named by `--config`, `$HTTPD_CONFIG` or `./httpd.yaml`
    /// (first one present) provides the base; options given on the command
    /// line replace its fields. Without any file every required field must
    /// come from the command line.
    pub fn from_args(args: &Args) -> Result<Self> {
        let mut config = match Self::locate(args.config.clone()) {
            Some(path) => Self::read(&path)?,
            None => Self::default(),
        };
        config.apply_args(args);
        config.validate()?;
        Ok(config)
    }

    /// Resolves which configuration file to read, if any.
    pub fn locate(arg: Option<PathBuf>) -> Option<PathBuf> {
        arg.or_else(|| std::env::var_os(CONFIG_ENV).map(PathBuf::from))
            .or_else(|| {
                let path = PathBuf::from(DEFAULT_CONFIG_PATH);
                path.is_file().then_some(path)
            })
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let config = Self::read(path)?;
        config
            .validate()
            .with_context(|| format!("invalid configuration {}", path.display()))?;
        Ok(config)
    }

    /// Parses and validates a YAML configuration document.
    pub fn from_yaml(text: &str) -> Result<Self> {
        let config: Config = serde_yaml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    fn read(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read configuration {}", path.display()))?;
        serde_yaml::from_str(&text)
            .with_context(|| format!("invalid configuration {}", path.display()))
    }

    fn apply_args(&mut self, args: &Args) {
        if let Some(path) = &args.pid_file {
            self.pid_file = Some(path.clone());
        }
        if let Some(path) = &args.log_file {
            self.log.file = Some(path.clone());
        }
        if let Some(enabled) = args.log {
            self.log.enabled = enabled;
        }

        let server = &mut self.server;
        if let Some(name) = &args.server_name {
            server.server_name = name.clone();
        }
        if let Some(ip) = &args.ip {
            server.ip = ip.clone();
        }
        if let Some(port) = &args.port {
            server.port = port.clone();
        }
        if let Some(root) = &args.root_dir {
            server.root_dir = root.clone();
        }
        if let Some(file) = &args.default_file {
            server.default_file = file.clone();
        }

        self.daemon = args.daemon;
        if self.daemon.is_some() && self.log.file.is_none() {
            self.log.file = Some(PathBuf::from(DAEMON_LOG_FILE));
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.server.validate()?;
        if self.daemon.is_some() && self.pid_file.is_none() {
            bail!("`--daemon` requires a PID file");
        }
        Ok(())
    }
}

impl ServerConfig {
    /// Checks that every field the core relies on is present and usable.
    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("server_name", self.server_name.as_str()),
            ("ip", self.ip.as_str()),
            ("port", self.port.as_str()),
            ("default_file", self.default_file.as_str()),
        ];
        for (name, value) in fields {
            if value.is_empty() {
                bail!("`server.{}` must not be empty", name);
            }
        }
        if self.root_dir.as_os_str().is_empty() {
            bail!("`server.root_dir` must not be empty");
        }
        self.port
            .parse::<u16>()
            .with_context(|| format!("`server.port` is not a valid port: {}", self.port))?;
        Ok(())
    }

    /// Address the listener binds to, as `ip:port`.
    pub fn listen_addr(&self) -> String {
        if self.ip.contains(':') {
            format!("[{}]:{}", self.ip, self.port)
        } else {
            format!("{}:{}", self.ip, self.port)
        }
    }
}
