use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub static CONFIG_PATH: Lazy<&'static Path> = Lazy::new(|| {
    Path::new(
        option_env!("LASTSEEN_CONFIG_PATH").unwrap_or("/usr/local/etc/lastseen-face/config.toml"),
    )
});

fn default_data_dir() -> PathBuf {
    directories::ProjectDirs::from("", "", "lastseen-face")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("/var/lib/lastseen-face"))
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Maximum acceptable descriptor distance for a match, applied
    /// uniformly to every recognition in the deployment.
    pub threshold: f32,
    pub listen: String,
    pub data_dir: PathBuf,
    pub extractor_url: String,
    pub op_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            threshold: 0.6,
            listen: "0.0.0.0:5001".to_string(),
            data_dir: default_data_dir(),
            extractor_url: "http://127.0.0.1:5002/extract".to_string(),
            op_timeout_secs: 30,
        }
    }
}

pub fn load_config(path: Option<&Path>) -> Result<Config> {
    let path = path.unwrap_or(&CONFIG_PATH);
    if !path.exists() {
        return Ok(Config::default());
    }
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading config at {}", path.display()))?;
    toml::from_str(&raw).with_context(|| format!("parsing config {}", path.display()))
}

pub fn save_config(cfg: &Config, path: Option<&Path>) -> Result<()> {
    let path = path.unwrap_or(&CONFIG_PATH);
    let data = toml::to_string_pretty(cfg)?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, data)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let cfg = load_config(Some(Path::new("/nonexistent/config.toml"))).unwrap();
        assert_eq!(cfg.threshold, 0.6);
        assert_eq!(cfg.listen, "0.0.0.0:5001");
    }

    #[test]
    fn partial_file_keeps_unlisted_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "threshold = 0.45\n").unwrap();

        let cfg = load_config(Some(&path)).unwrap();
        assert_eq!(cfg.threshold, 0.45);
        assert_eq!(cfg.op_timeout_secs, 30);
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut cfg = Config::default();
        cfg.extractor_url = "http://extractor:9000/faces".to_string();
        save_config(&cfg, Some(&path)).unwrap();

        let loaded = load_config(Some(&path)).unwrap();
        assert_eq!(loaded.extractor_url, cfg.extractor_url);
    }
}
