use std::collections::HashMap;
use std::fs;
use std::path::Path;

pub const DEFAULT_CONFIG_PATH: &str = "conf/bingo.conf";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BingoConfig {
    pub data_dir: String,
    pub log_dir: String,
    pub log_file: String,
    pub log_level: String,
}

impl Default for BingoConfig {
    fn default() -> Self {
        Self {
            data_dir: "data".to_string(),
            log_dir: "log".to_string(),
            log_file: "bingo.log".to_string(),
            log_level: "info".to_string(),
        }
    }
}

impl BingoConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn std::error::Error>> {
        let content = fs::read_to_string(path)?;
        let config_map = parse_config(&content)?;
        let defaults = Self::default();

        let value_or = |key: &str, default: String| {
            config_map
                .get(key)
                .filter(|value| !value.is_empty())
                .cloned()
                .unwrap_or(default)
        };

        Ok(BingoConfig {
            data_dir: value_or("data_dir", defaults.data_dir),
            log_dir: value_or("log_dir", defaults.log_dir),
            log_file: value_or("log_file", defaults.log_file),
            log_level: value_or("log_level", defaults.log_level),
        })
    }

    /// Read the configuration file, falling back to defaults when it is missing or unreadable.
    /// Runs before logging is set up, so the outcome goes to stderr.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        match Self::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Could not load config from {}: {}. Using defaults.", path.display(), e);
                Self::default()
            }
        }
    }

    pub fn log_path(&self) -> std::path::PathBuf {
        Path::new(&self.log_dir).join(&self.log_file)
    }
}

fn parse_config(content: &str) -> Result<HashMap<String, String>, Box<dyn std::error::Error>> {
    let mut config = HashMap::new();

    for line in content.lines() {
        let line = line.trim();

        // Skip empty lines and comments
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        match line.split_once('=') {
            Some((key, value)) => {
                config.insert(key.trim().to_string(), value.trim().to_string());
            }
            None => return Err(format!("malformed config line: {line}").into()),
        }
    }

    Ok(config)
}
