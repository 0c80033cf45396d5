use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

/// One `{ "value": ... }` entry in the settings file
#[derive(Debug, Deserialize)]
struct Entry<T> {
    value: T,
}

/// On-disk shape of settings.json
#[derive(Debug, Deserialize)]
struct SettingsFile {
    driver_path: Entry<PathBuf>,
    page_load_timeout: Entry<u64>,
    workers: Entry<usize>,
}

/// Process-wide configuration, loaded once at startup and read-only after
#[derive(Debug, Clone)]
pub struct Settings {
    /// Path to the browser executable each worker launches
    pub driver_path: PathBuf,
    /// How long any single element wait may block
    pub page_load_timeout: Duration,
    /// Number of parallel scrape sessions
    pub workers: usize,
}

impl Settings {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file {:?}", path))?;
        let file: SettingsFile = serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse settings file {:?}", path))?;

        Ok(Self {
            driver_path: file.driver_path.value,
            page_load_timeout: Duration::from_secs(file.page_load_timeout.value),
            workers: file.workers.value.max(1),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn parses_wrapped_value_shape() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{
                "driver_path": {{ "value": "/usr/bin/chromium" }},
                "page_load_timeout": {{ "value": 15 }},
                "workers": {{ "value": 4 }}
            }}"#
        )
        .unwrap();

        let settings = Settings::load(file.path()).unwrap();
        assert_eq!(settings.driver_path, PathBuf::from("/usr/bin/chromium"));
        assert_eq!(settings.page_load_timeout, Duration::from_secs(15));
        assert_eq!(settings.workers, 4);
    }

    #[test]
    fn zero_workers_is_clamped_to_one() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{
                "driver_path": {{ "value": "/usr/bin/chromium" }},
                "page_load_timeout": {{ "value": 15 }},
                "workers": {{ "value": 0 }}
            }}"#
        )
        .unwrap();

        assert_eq!(Settings::load(file.path()).unwrap().workers, 1);
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(Settings::load("definitely/not/there.json").is_err());
    }
}
