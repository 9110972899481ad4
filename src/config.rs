//! Service configuration loaded from an optional TOML file.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct Config {
    /// GeoJSON FeatureCollection with the area boundaries
    pub areas_path: PathBuf,

    /// Plain HTTP listener
    pub http_listen: String,

    /// HTTPS listener, only started when both TLS paths are set
    pub https_listen: String,

    pub tls_cert: Option<PathBuf>,
    pub tls_key: Option<PathBuf>,

    /// Reported when no area contains the point, and appended to area names
    pub fallback_locality: String,

    /// Keep the parsed boundaries until the file changes
    pub cache_boundaries: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            areas_path: PathBuf::from("areas.json"),
            http_listen: "127.0.0.1:8080".to_string(),
            https_listen: "0.0.0.0:8443".to_string(),
            tls_cert: None,
            tls_key: None,
            fallback_locality: "Dire Dawa".to_string(),
            cache_boundaries: false,
        }
    }
}

impl Config {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path).context("Failed to read config file")?;
        let config: Config = toml::from_str(&content).context("Failed to parse config file")?;
        Ok(config)
    }

    /// Certificate chain and key, if TLS is fully configured
    pub fn tls_paths(&self) -> Option<(&Path, &Path)> {
        match (&self.tls_cert, &self.tls_key) {
            (Some(cert), Some(key)) => Some((cert.as_path(), key.as_path())),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.areas_path, PathBuf::from("areas.json"));
        assert_eq!(config.http_listen, "127.0.0.1:8080");
        assert_eq!(config.fallback_locality, "Dire Dawa");
        assert!(!config.cache_boundaries);
        assert!(config.tls_paths().is_none());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("areafinder.toml");
        fs::write(
            &path,
            r#"
            areas_path = "/srv/areas.json"
            fallback_locality = "Harar"
            tls_cert = "/etc/tls/fullchain.pem"
            tls_key = "/etc/tls/privkey.pem"
            "#,
        )
        .unwrap();

        let config = Config::load_from_file(&path).unwrap();
        assert_eq!(config.areas_path, PathBuf::from("/srv/areas.json"));
        assert_eq!(config.fallback_locality, "Harar");
        assert_eq!(config.https_listen, "0.0.0.0:8443");
        let (cert, key) = config.tls_paths().unwrap();
        assert_eq!(cert, Path::new("/etc/tls/fullchain.pem"));
        assert_eq!(key, Path::new("/etc/tls/privkey.pem"));
    }

    #[test]
    fn test_cert_without_key_disables_tls() {
        let config = Config {
            tls_cert: Some(PathBuf::from("cert.pem")),
            ..Config::default()
        };
        assert!(config.tls_paths().is_none());
    }

    #[test]
    fn test_invalid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        fs::write(&path, "cache_boundaries = \"maybe\"").unwrap();

        assert!(Config::load_from_file(&path).is_err());
        assert!(Config::load_from_file(dir.path().join("missing.toml")).is_err());
    }
}
