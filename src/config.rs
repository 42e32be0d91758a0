//! Layered configuration: defaults, config file, environment, CLI.
//!
//! Priority: CLI flag > CLI env var > `CHAT_WIDGET_*` env var > config file > defaults.

use std::path::Path;

use clap::Parser;
use config::{Config, Environment, File};
use serde::Deserialize;

use crate::endpoint::DEFAULT_CHAT_PATH;
use crate::widget::SubmitPolicy;

/// Config file picked up from the working directory when `--config` is absent.
const CWD_CONFIG_FILE: &str = "config.yaml";

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Config file path
    #[arg(short, long, env = "CONFIG_FILE")]
    pub config: Option<String>,

    /// Port to listen on
    #[arg(long, env = "PORT")]
    pub port: Option<u16>,

    /// Base URL of the backend chat endpoint
    #[arg(long, env = "CHAT_ENDPOINT_URL")]
    pub endpoint: Option<String>,

    /// How overlapping submissions are scheduled
    #[arg(long, env = "SUBMIT_POLICY", value_enum)]
    pub policy: Option<SubmitPolicy>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub endpoint: EndpointConfig,
    pub widget: WidgetConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct EndpointConfig {
    /// Backend origin, e.g. `http://127.0.0.1:8080`.
    pub base_url: String,
    pub path: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct WidgetConfig {
    pub submit_policy: SubmitPolicy,
    /// Where the page loads HTMX from.
    pub htmx_src: String,
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from_args(std::env::args())
    }

    pub fn load_from_args<I, T>(args: I) -> Result<Self, config::ConfigError>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let cli =
            Cli::try_parse_from(args).map_err(|e| config::ConfigError::Message(e.to_string()))?;

        let mut builder = Config::builder()
            .set_default("server.port", 3000)?
            .set_default("server.host", "127.0.0.1")?
            .set_default("endpoint.base_url", "http://127.0.0.1:8080")?
            .set_default("endpoint.path", DEFAULT_CHAT_PATH)?
            .set_default("widget.submit_policy", SubmitPolicy::Concurrent.as_str())?
            .set_default("widget.htmx_src", "https://unpkg.com/htmx.org@2.0.8")?;

        if let Some(path) = &cli.config {
            builder = builder.add_source(File::from(Path::new(path)).required(true));
        } else if Path::new(CWD_CONFIG_FILE).exists() {
            builder = builder.add_source(File::from(Path::new(CWD_CONFIG_FILE)));
        }

        // E.g. CHAT_WIDGET_SERVER__PORT=8000
        builder = builder.add_source(
            Environment::with_prefix("CHAT_WIDGET")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        if let Some(port) = cli.port {
            builder = builder.set_override("server.port", i64::from(port))?;
        }
        if let Some(endpoint) = cli.endpoint {
            builder = builder.set_override("endpoint.base_url", endpoint)?;
        }
        if let Some(policy) = cli.policy {
            builder = builder.set_override("widget.submit_policy", policy.as_str())?;
        }

        builder.build()?.try_deserialize()
    }

    /// `host:port` the server binds to.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
