use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{MomoError, Result};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub data_dir: String,
    #[serde(default = "default_source_file")]
    pub source_file: String,
    #[serde(default = "default_output_file")]
    pub output_file: String,
    #[serde(default = "default_bench_trials")]
    pub bench_trials: usize,
}

fn default_source_file() -> String {
    "modified_sms_v2.xml".to_string()
}

fn default_output_file() -> String {
    "transactions.json".to_string()
}

fn default_bench_trials() -> usize {
    1000
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir().to_string_lossy().to_string(),
            source_file: default_source_file(),
            output_file: default_output_file(),
            bench_trials: default_bench_trials(),
        }
    }
}

impl Settings {
    fn resolve(&self, file: &str) -> PathBuf {
        let path = Path::new(file);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            PathBuf::from(&self.data_dir).join(path)
        }
    }

    pub fn source_path(&self) -> PathBuf {
        self.resolve(&self.source_file)
    }

    pub fn output_path(&self) -> PathBuf {
        self.resolve(&self.output_file)
    }
}

fn config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("momo")
}

fn settings_path() -> PathBuf {
    config_dir().join("settings.json")
}

fn default_data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("Documents")
        .join("momo")
}

fn load_from(path: &Path) -> Settings {
    if path.exists() {
        let content = std::fs::read_to_string(path).unwrap_or_default();
        serde_json::from_str(&content).unwrap_or_default()
    } else {
        Settings::default()
    }
}

fn save_to(path: &Path, settings: &Settings) -> Result<()> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)?;
    }
    let json = serde_json::to_string_pretty(settings)
        .map_err(|e| MomoError::Settings(e.to_string()))?;
    std::fs::write(path, format!("{json}\n"))?;
    Ok(())
}

pub fn load_settings() -> Settings {
    load_from(&settings_path())
}

pub fn save_settings(settings: &Settings) -> Result<()> {
    save_to(&settings_path(), settings)
}

/// Record file to operate on: an explicit `--file` wins over settings.
pub fn records_path(file: Option<&str>) -> PathBuf {
    match file {
        Some(f) => PathBuf::from(f),
        None => load_settings().output_path(),
    }
}

pub fn shellexpand_path(path: &str) -> String {
    if path.starts_with('~') {
        if let Some(home) = dirs::home_dir() {
            return path.replacen('~', &home.to_string_lossy(), 1);
        }
    }
    std::fs::canonicalize(path)
        .unwrap_or_else(|_| PathBuf::from(path))
        .to_string_lossy()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config").join("settings.json");
        let settings = Settings {
            data_dir: "/tmp/momo".to_string(),
            source_file: "export.xml".to_string(),
            output_file: "out.json".to_string(),
            bench_trials: 50,
        };
        save_to(&path, &settings).unwrap();
        assert!(std::fs::read_to_string(&path).unwrap().ends_with("}\n"));

        let loaded = load_from(&path);
        assert_eq!(loaded.source_file, "export.xml");
        assert_eq!(loaded.data_dir, "/tmp/momo");
        assert_eq!(loaded.bench_trials, 50);
        assert_eq!(loaded.output_path(), PathBuf::from("/tmp/momo/out.json"));
    }

    #[test]
    fn test_missing_or_corrupt_settings_fall_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        assert_eq!(load_from(&path).source_file, "modified_sms_v2.xml");

        std::fs::write(&path, "{ not json").unwrap();
        let s = load_from(&path);
        assert_eq!(s.output_file, "transactions.json");
        assert_eq!(s.bench_trials, 1000);
    }

    #[test]
    fn test_defaults() {
        let s = Settings::default();
        assert_eq!(s.source_file, "modified_sms_v2.xml");
        assert_eq!(s.output_file, "transactions.json");
        assert_eq!(s.bench_trials, 1000);
        assert!(!s.data_dir.is_empty());
    }

    #[test]
    fn test_load_merges_with_defaults() {
        let json = r#"{"data_dir": "/tmp/momo", "output_file": "records.json"}"#;
        let s: Settings = serde_json::from_str(json).unwrap();
        assert_eq!(s.source_file, "modified_sms_v2.xml");
        assert_eq!(s.output_path(), PathBuf::from("/tmp/momo/records.json"));
    }

    #[test]
    fn test_absolute_paths_are_kept() {
        let s = Settings {
            output_file: "/var/data/tx.json".to_string(),
            ..Settings::default()
        };
        assert_eq!(s.output_path(), PathBuf::from("/var/data/tx.json"));
    }

    #[test]
    fn test_explicit_records_path_wins() {
        assert_eq!(records_path(Some("mine.json")), PathBuf::from("mine.json"));
    }
}
