use crate::fetch::{FetchConfig, FetchDescriptor};
use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// On-disk interpreter configuration
///
/// Either a bare array of fetch descriptors or an object with a `fetch` key.
#[derive(Debug, Default)]
pub struct Config {
    pub fetch: FetchConfig,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawConfig {
    List(Vec<FetchDescriptor>),
    Table {
        #[serde(default)]
        fetch: Vec<FetchDescriptor>,
    },
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        Self::from_json(&text)
            .with_context(|| format!("Failed to parse config {}", path.display()))
    }

    pub fn from_json(text: &str) -> Result<Self> {
        let raw: RawConfig =
            serde_json::from_str(text).context("Config is not a fetch list or table")?;
        let descriptors = match raw {
            RawConfig::List(descriptors) => descriptors,
            RawConfig::Table { fetch } => fetch,
        };
        Ok(Self {
            fetch: FetchConfig::new(descriptors),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::Config;
    use std::io::Write;

    #[test]
    fn test_bare_list() {
        let config = Config::from_json(r#"[{"from": "a.txt"}]"#).unwrap();
        assert_eq!(config.fetch.len(), 1);
        assert_eq!(config.fetch.descriptors()[0].from, "a.txt");
    }

    #[test]
    fn test_table_with_fetch_key() {
        let config = Config::from_json(
            r#"{"name": "demo", "fetch": [{"from": "/pkg/", "files": ["a", "b"]}]}"#,
        )
        .unwrap();
        assert_eq!(config.fetch.descriptors()[0].files.as_ref().unwrap().len(), 2);
    }

    #[test]
    fn test_table_without_fetch_is_empty() {
        let config = Config::from_json(r#"{"packages": ["numpy"]}"#).unwrap();
        assert!(config.fetch.is_empty());
    }

    #[test]
    fn test_invalid_json() {
        assert!(Config::from_json("[{").is_err());
        assert!(Config::from_json("42").is_err());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"fetch": [{{"from": "x.py", "to_folder": "/lib"}}]}}"#).unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.fetch.descriptors()[0].to_folder, "/lib");
    }

    #[test]
    fn test_load_missing_file() {
        let err = Config::load(std::path::Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(err.to_string().contains("Failed to read config"));
    }
}
