//! Demo configuration, read from `pixelflow-fire.toml`.

use std::path::Path;

use pixelflow_core::{AdvanceMode, CanvasConfig, ColorMode, ConnectionInfo, DrawMode};
use serde::{Deserialize, Serialize};

/// Top-level configuration for the fire demo.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FireConfig {
    /// Display server address.
    pub network: ConnectionInfo,
    /// Canvas setup sent on connect.
    pub canvas: CanvasConfig,
    /// Simulation tuning.
    pub fire: FireSettings,
    /// Logging.
    pub logging: LoggingConfig,
}

/// Simulation tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FireSettings {
    /// Frame-rate cap; 0 disables it.
    pub fps: f64,
    /// Heat seeded into the bottom rows at start (0..=63).
    pub heat: u8,
    /// First seeded column.
    pub seed_start: i32,
    /// Last seeded column, inclusive.
    pub seed_end: i32,
    /// Largest random change applied to a burning pixel.
    pub jitter: i32,
}

/// Logging.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directive, overridden by `RUST_LOG`.
    pub level: String,
}

// ── Defaults ─────────────────────────────────────────────────────

impl Default for FireConfig {
    fn default() -> Self {
        Self {
            network: ConnectionInfo::default(),
            canvas: CanvasConfig {
                width: 256,
                height: 128,
                color_mode: ColorMode::Palette,
                advance_mode: AdvanceMode::Right,
                draw_mode: DrawMode::Buffered,
            },
            fire: FireSettings::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for FireSettings {
    fn default() -> Self {
        Self {
            fps: 60.0,
            heat: 48,
            seed_start: 10,
            seed_end: 246,
            jitter: 3,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
        }
    }
}

// ── Loading ──────────────────────────────────────────────────────

impl FireConfig {
    /// Load from a TOML file, falling back to defaults.
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(contents) => toml::from_str(&contents).unwrap_or_else(|e| {
                tracing::warn!("invalid config {}: {e}; using defaults", path.display());
                Self::default()
            }),
            Err(_) => {
                tracing::info!("no config at {}; using defaults", path.display());
                Self::default()
            }
        }
    }

    /// The default configuration as pretty TOML.
    pub fn default_toml() -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(&Self::default())
    }
}

/// Parse a `host:port` override. A bare host keeps the default port.
pub fn parse_server(addr: &str) -> Result<ConnectionInfo, String> {
    let addr = addr.trim();
    let (host, port) = match addr.rsplit_once(':') {
        Some((host, port)) => {
            let port = port
                .parse::<u16>()
                .map_err(|e| format!("bad port in {addr:?}: {e}"))?;
            (host, port)
        }
        None => (addr, pixelflow_core::DEFAULT_PORT),
    };
    if host.is_empty() {
        return Err(format!("missing host in {addr:?}"));
    }
    Ok(ConnectionInfo::new(host, port))
}

// ── Tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_serializes() {
        let text = FireConfig::default_toml().unwrap();
        assert!(text.contains("[network]"));
        assert!(text.contains("color_mode = \"palette\""));
        assert!(text.contains("draw_mode = \"buffered\""));
    }

    #[test]
    fn roundtrip_config() {
        let text = FireConfig::default_toml().unwrap();
        let parsed: FireConfig = toml::from_str(&text).unwrap();
        assert_eq!(parsed, FireConfig::default());
        assert_eq!(parsed.canvas.width, 256);
        assert_eq!(parsed.network.port, 19223);
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let parsed: FireConfig = toml::from_str("[fire]\nheat = 20\n").unwrap();
        assert_eq!(parsed.fire.heat, 20);
        assert_eq!(parsed.fire.seed_end, 246);
        assert_eq!(parsed.logging.level, "info");
    }

    #[test]
    fn missing_file_falls_back() {
        let cfg = FireConfig::load(Path::new("/nonexistent/pixelflow-fire.toml"));
        assert_eq!(cfg, FireConfig::default());
    }

    #[test]
    fn server_overrides() {
        assert_eq!(
            parse_server("10.0.0.5:4000").unwrap(),
            ConnectionInfo::new("10.0.0.5", 4000)
        );
        assert_eq!(parse_server("display").unwrap().port, 19223);
        assert!(parse_server(":4000").is_err());
        assert!(parse_server("host:99999").is_err());
    }
}
