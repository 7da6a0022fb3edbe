use clap::Parser;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

/// roomcast broadcast-room server
#[derive(Parser, Serialize, Deserialize, Clone, Debug)]
#[command(name = "roomcast", version, about = "Ephemeral SSE broadcast rooms")]
pub struct Config {
    /// Port to listen on
    #[arg(long, env = "ROOMCAST_PORT", default_value = "8000")]
    pub port: u16,

    /// Bind address
    #[arg(long, env = "ROOMCAST_BIND_ADDRESS", default_value = "0.0.0.0")]
    pub bind_address: String,

    /// Path to TOML config file
    #[arg(long, default_value = "./roomcast.toml")]
    pub config: String,

    /// Enable structured JSON logging (for Docker/production)
    #[arg(long, env = "ROOMCAST_JSON_LOGS")]
    pub json_logs: bool,

    /// Output a commented TOML config template and exit
    #[arg(long)]
    pub generate_config: bool,

    /// Directory served for GET requests outside /api
    #[arg(long, env = "ROOMCAST_STATIC_DIR", default_value = "./static")]
    pub static_dir: String,

    /// Room maintenance tunables (loaded from [rooms] section in TOML)
    #[arg(skip)]
    #[serde(default = "default_rooms_config")]
    pub rooms: Option<RoomsConfig>,
}

/// Tunables for the keepalive and eviction sweeps.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomsConfig {
    /// Seconds between keepalive pings to all listeners (default: 14)
    #[serde(default = "default_keepalive_interval")]
    pub keepalive_interval_secs: u64,

    /// Seconds between eviction sweeps (default: 7200 = 2 hours)
    #[serde(default = "default_eviction_interval")]
    pub eviction_interval_secs: u64,

    /// Seconds a room may go without a config change before it is
    /// evicted (default: 86400 = 24 hours)
    #[serde(default = "default_room_ttl")]
    pub ttl_secs: u64,
}

impl Default for RoomsConfig {
    fn default() -> Self {
        Self {
            keepalive_interval_secs: 14,
            eviction_interval_secs: 7200,
            ttl_secs: 86400,
        }
    }
}

fn default_keepalive_interval() -> u64 {
    14
}

fn default_eviction_interval() -> u64 {
    7200
}

fn default_room_ttl() -> u64 {
    86400
}

fn default_rooms_config() -> Option<RoomsConfig> {
    Some(RoomsConfig::default())
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8000,
            bind_address: "0.0.0.0".to_string(),
            config: "./roomcast.toml".to_string(),
            json_logs: false,
            generate_config: false,
            static_dir: "./static".to_string(),
            rooms: Some(RoomsConfig::default()),
        }
    }
}

impl Config {
    /// Load config with layered precedence:
    /// built-in defaults < TOML file < env vars (ROOMCAST_*) < CLI args
    pub fn load() -> Result<Self, figment::Error> {
        let cli = Config::parse();
        let config_path = cli.config.clone();

        Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_path))
            .merge(Env::prefixed("ROOMCAST_"))
            .merge(Serialized::defaults(cli))
            .extract()
    }
}

/// Generate a commented TOML config template
pub fn generate_config_template() -> String {
    r#"# roomcast Server Configuration
# Place this file at ./roomcast.toml or specify with --config <path>
# All settings can be overridden via environment variables (ROOMCAST_PORT, etc.)
# or CLI flags (--port, etc.)

# Server port (default: 8000)
# port = 8000

# Bind address (default: 0.0.0.0 — all interfaces)
# bind_address = "0.0.0.0"

# Enable structured JSON logging for Docker/production
# json_logs = false

# Directory served for non-API GET requests
# static_dir = "./static"

# ---- Room Maintenance ----
# [rooms]

# Seconds between keepalive pings to open listener streams (default: 14)
# keepalive_interval_secs = 14

# Seconds between eviction sweeps (default: 7200 = 2 hours)
# eviction_interval_secs = 7200

# Seconds a room survives without a config change (default: 86400 = 24 hours)
# Broadcasts and subscriber activity do NOT reset this clock.
# ttl_secs = 86400
"#
    .to_string()
}
