//! INI file configuration adapter.

use crate::ports::config_port::ConfigPort;
use configparser::ini::Ini;
use std::path::Path;

pub struct FileConfigAdapter {
    config: Ini,
}

impl FileConfigAdapter {
    pub fn from_file<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
        let mut config = Ini::new();
        config.load(path).map_err(std::io::Error::other)?;
        Ok(Self { config })
    }

    pub fn from_string(content: &str) -> Result<Self, String> {
        let mut config = Ini::new();
        config.read(content.to_string())?;
        Ok(Self { config })
    }

    fn parse_bool(value: &str) -> Option<bool> {
        match value.to_lowercase().as_str() {
            "true" | "yes" | "1" => Some(true),
            "false" | "no" | "0" => Some(false),
            _ => None,
        }
    }
}

impl ConfigPort for FileConfigAdapter {
    fn get_string(&self, section: &str, key: &str) -> Option<String> {
        self.config.get(section, key)
    }

    fn get_int(&self, section: &str, key: &str, default: i64) -> i64 {
        self.config
            .getint(section, key)
            .ok()
            .flatten()
            .unwrap_or(default)
    }

    fn get_double(&self, section: &str, key: &str, default: f64) -> f64 {
        self.config
            .getfloat(section, key)
            .ok()
            .flatten()
            .unwrap_or(default)
    }

    fn get_bool(&self, section: &str, key: &str, default: bool) -> bool {
        self.config
            .get(section, key)
            .as_ref()
            .and_then(|v| Self::parse_bool(v))
            .unwrap_or(default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const SAMPLE: &str = r#"
[trading]
initial_capital = 100000
default_symbol = RELIANCE
default_margin = 5x

[data]
source = mock
lookback_days = 365
"#;

    #[test]
    fn from_string_parses_sections() {
        let adapter = FileConfigAdapter::from_string(SAMPLE).unwrap();
        assert_eq!(
            adapter.get_string("trading", "default_symbol"),
            Some("RELIANCE".to_string())
        );
        assert_eq!(
            adapter.get_string("data", "source"),
            Some("mock".to_string())
        );
    }

    #[test]
    fn from_file_round_trip() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{SAMPLE}").unwrap();

        let adapter = FileConfigAdapter::from_file(file.path()).unwrap();
        assert_eq!(adapter.get_int("data", "lookback_days", 0), 365);
    }

    #[test]
    fn missing_keys_fall_back_to_defaults() {
        let adapter = FileConfigAdapter::from_string(SAMPLE).unwrap();
        assert_eq!(adapter.get_string("trading", "missing"), None);
        assert_eq!(adapter.get_int("trading", "missing", 7), 7);
        assert_eq!(adapter.get_double("trading", "missing", 0.5), 0.5);
        assert!(adapter.get_bool("trading", "missing", true));
    }

    #[test]
    fn numeric_and_bool_parsing() {
        let adapter = FileConfigAdapter::from_string(
            "[server]\nport_start = 8000\nverbose = yes\nratio = 0.25\n",
        )
        .unwrap();
        assert_eq!(adapter.get_int("server", "port_start", 0), 8000);
        assert!(adapter.get_bool("server", "verbose", false));
        assert_eq!(adapter.get_double("server", "ratio", 0.0), 0.25);
    }

    #[test]
    fn malformed_numeric_falls_back() {
        let adapter =
            FileConfigAdapter::from_string("[server]\nport_start = not-a-number\n").unwrap();
        assert_eq!(adapter.get_int("server", "port_start", 5000), 5000);
    }
}
