use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use serde::Deserialize;
use std::env;

/// Timing and geometry knobs shared by the page scripts.
///
/// Defaults match what the server-rendered templates and stylesheets
/// assume; override them with a TOML document when embedding the portal
/// somewhere with different markup.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PortalConfig {
    /// How long a flash message stays up before fading out.
    pub flash_display_ms: u32,
    /// Fade duration for flash messages (both directions).
    pub flash_fade_ms: u32,
    /// Dialog width used for centering.
    pub modal_width: f64,
    /// Dialog height used for centering.
    pub modal_height: f64,
    /// Timer interval used when animation frames are unavailable.
    pub frame_fallback_ms: u32,
    /// Where a successful login lands.
    pub landing_url: String,
}

impl Default for PortalConfig {
    fn default() -> Self {
        PortalConfig {
            flash_display_ms: 10_000,
            flash_fade_ms: 500,
            modal_width: 500.0,
            modal_height: 250.0,
            frame_fallback_ms: 16,
            landing_url: "/".to_string(),
        }
    }
}

impl PortalConfig {
    /// Parse a TOML document; missing keys keep their defaults.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let cfg: PortalConfig = toml::from_str(s).context("invalid portal config")?;
        cfg.validate()
    }

    /// Range-check every field.
    pub fn validate(self) -> Result<Self> {
        validate_in_range(self.flash_display_ms, 500, 600_000, "flash_display_ms")?;
        validate_in_range(self.flash_fade_ms, 0, 10_000, "flash_fade_ms")?;
        validate_in_range(self.frame_fallback_ms, 1, 1000, "frame_fallback_ms")?;
        validate_in_range(self.modal_width, 50.0, 4000.0, "modal_width")?;
        validate_in_range(self.modal_height, 50.0, 4000.0, "modal_height")?;
        if !self.landing_url.starts_with('/') && !self.landing_url.starts_with("http") {
            return Err(anyhow!(
                "landing_url must be a path or absolute URL, got {}",
                self.landing_url
            ));
        }
        Ok(self)
    }
}

/// Validate that a value is within a given range (inclusive)
fn validate_in_range<T>(val: T, min: T, max: T, name: &str) -> Result<T>
where
    T: PartialOrd + std::fmt::Display + Copy,
{
    if val < min || val > max {
        Err(anyhow!("{name} must be in range [{min}, {max}], got {val}"))
    } else {
        Ok(val)
    }
}

/// pg-portal - Packet Guardian portal API client
///
/// Drives the same API catalog the browser pages use.
/// Configuration priority: CLI args > Environment variables > Defaults
#[derive(Parser, Debug)]
#[command(name = "pg-portal")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Packet Guardian portal API client", long_about = None)]
pub struct CliArgs {
    /// Portal base URL (e.g. https://pg.example.edu)
    #[arg(long, env = "PG_BASE_URL")]
    pub base_url: Option<String>,

    /// Username to authenticate as
    #[arg(short, long, env = "PG_USERNAME")]
    pub username: Option<String>,

    /// Password; when given, the client logs in before running the command
    #[arg(short, long, env = "PG_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Request timeout in milliseconds (1000-60000)
    #[arg(long, env = "PG_TIMEOUT_MS")]
    pub timeout_ms: Option<u64>,

    /// Path to a TOML file with portal settings
    #[arg(long, env = "PG_CONFIG")]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Log in and report whether the credentials were accepted
    Login,
    /// Register a device
    Register {
        /// Owner of the device (defaults to --username)
        #[arg(long)]
        owner: Option<String>,
        /// MAC address; omit for automatic registration
        #[arg(long)]
        mac: Option<String>,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long, default_value = "")]
        platform: String,
    },
    /// Delete devices owned by a user
    DeleteDevices {
        owner: String,
        #[arg(required = true)]
        macs: Vec<String>,
    },
    /// Reassign devices to a new owner
    Reassign {
        new_owner: String,
        #[arg(required = true)]
        macs: Vec<String>,
    },
    /// Set a device description
    Describe { mac: String, description: String },
    /// Flag or unflag a device
    Flag {
        mac: String,
        #[arg(long)]
        off: bool,
    },
    /// Add a username to the blacklist
    BlacklistUser { username: String },
    /// Remove a username from the blacklist
    UnblacklistUser { username: String },
    /// Blacklist devices by MAC
    BlacklistDevices {
        #[arg(required = true)]
        macs: Vec<String>,
    },
    /// Remove devices from the blacklist
    UnblacklistDevices {
        #[arg(required = true)]
        macs: Vec<String>,
    },
    /// Delete a user account
    DeleteUser { username: String },
}

#[derive(Clone, Debug)]
pub struct CliConfig {
    pub base_url: String,
    pub username: Option<String>,
    pub password: Option<String>,
    pub timeout_ms: u64,
    pub portal: PortalConfig,
    pub command: Command,
}

/// Resolve CLI args + environment into a validated config.
pub fn load(args: CliArgs) -> Result<CliConfig> {
    let base_url = args
        .base_url
        .or_else(|| env::var("PG_BASE_URL").ok())
        .unwrap_or_else(|| "http://localhost:8080".to_string());
    validate_url(&base_url, "PG_BASE_URL")?;

    let timeout_ms = args
        .timeout_ms
        .or_else(|| env::var("PG_TIMEOUT_MS").ok().and_then(|s| s.parse().ok()))
        .unwrap_or(8000);
    let timeout_ms = validate_in_range(timeout_ms, 1000, 60_000, "PG_TIMEOUT_MS")?;

    let portal = match args.config {
        Some(path) => {
            let raw = std::fs::read_to_string(&path)
                .with_context(|| format!("reading config file {path}"))?;
            PortalConfig::from_toml_str(&raw)?
        }
        None => PortalConfig::default(),
    };

    Ok(CliConfig {
        base_url: base_url.trim_end_matches('/').to_string(),
        username: args.username.filter(|u| !u.is_empty()),
        password: args.password.filter(|p| !p.is_empty()),
        timeout_ms,
        portal,
        command: args.command,
    })
}

/// Validate URL format (basic check)
fn validate_url(url: &str, name: &str) -> Result<()> {
    if url.is_empty() {
        return Err(anyhow!("{name} cannot be empty"));
    }
    if url.starts_with("http://") || url.starts_with("https://") {
        Ok(())
    } else {
        Err(anyhow!("{name} must start with http:// or https://"))
    }
}

impl CliConfig {
    pub fn print_summary(&self) {
        eprintln!("pg-portal configuration:");
        eprintln!("  Base URL: {}", self.base_url);
        eprintln!("  Timeout: {}ms", self.timeout_ms);
        if let Some(user) = &self.username {
            eprintln!("  User: {user}");
        }
        if self.password.is_some() {
            eprintln!("  Password: configured");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_page_assumptions() {
        let cfg = PortalConfig::default();
        assert_eq!(cfg.flash_display_ms, 10_000);
        assert_eq!(cfg.flash_fade_ms, 500);
        assert_eq!((cfg.modal_width, cfg.modal_height), (500.0, 250.0));
        assert_eq!(cfg.landing_url, "/");
    }

    #[test]
    fn toml_overrides_keep_other_defaults() {
        let cfg = PortalConfig::from_toml_str("flash_display_ms = 3000\n").unwrap();
        assert_eq!(cfg.flash_display_ms, 3000);
        assert_eq!(cfg.flash_fade_ms, 500);
    }

    #[test]
    fn out_of_range_values_are_rejected() {
        assert!(PortalConfig::from_toml_str("frame_fallback_ms = 0").is_err());
        assert!(PortalConfig::from_toml_str("landing_url = \"home\"").is_err());
        assert!(PortalConfig::from_toml_str("unknown_key = 1").is_err());
    }

    #[test]
    fn cli_parses_subcommands() {
        let args = CliArgs::try_parse_from([
            "pg-portal",
            "--base-url",
            "https://pg.example.edu/",
            "delete-devices",
            "alice",
            "aa:bb:cc:dd:ee:ff",
        ])
        .unwrap();
        let cfg = load(args).unwrap();
        assert_eq!(cfg.base_url, "https://pg.example.edu");
        assert_eq!(
            cfg.command,
            Command::DeleteDevices {
                owner: "alice".into(),
                macs: vec!["aa:bb:cc:dd:ee:ff".into()],
            }
        );
    }

    #[test]
    fn bad_base_url_is_rejected() {
        let args =
            CliArgs::try_parse_from(["pg-portal", "--base-url", "ftp://x", "login"]).unwrap();
        assert!(load(args).is_err());
    }
}
