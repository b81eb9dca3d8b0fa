//! INI file configuration adapter.

use crate::domain::error::QuantError;
use crate::ports::config_port::ConfigPort;
use configparser::ini::Ini;
use std::path::Path;

pub struct FileConfigAdapter {
    config: Ini,
}

impl FileConfigAdapter {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, QuantError> {
        let path = path.as_ref();
        let mut config = Ini::new();
        config.load(path).map_err(|reason| QuantError::ConfigParse {
            file: path.display().to_string(),
            reason,
        })?;
        tracing::debug!(path = %path.display(), "loaded config");
        Ok(Self { config })
    }

    pub fn from_string(content: &str) -> Result<Self, QuantError> {
        let mut config = Ini::new();
        config
            .read(content.to_string())
            .map_err(|reason| QuantError::ConfigParse {
                file: "<string>".to_string(),
                reason,
            })?;
        Ok(Self { config })
    }

    fn parse_bool(value: &str) -> Option<bool> {
        match value.trim().to_lowercase().as_str() {
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
            .as_deref()
            .and_then(Self::parse_bool)
            .unwrap_or(default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", content).unwrap();
        file
    }

    #[test]
    fn from_string_parses_sections() {
        let content = r#"
[data]
path = ./prices

[backtest]
symbol = CBA
strategy = donchian
initial_cash = 25000

[rotation]
symbols = CBA, BHP, WBC
"#;
        let adapter = FileConfigAdapter::from_string(content).unwrap();
        assert_eq!(adapter.get_string("data", "path"), Some("./prices".to_string()));
        assert_eq!(adapter.get_string("backtest", "strategy"), Some("donchian".to_string()));
        assert_eq!(adapter.get_double("backtest", "initial_cash", 0.0), 25_000.0);
        assert_eq!(
            adapter.get_string("rotation", "symbols"),
            Some("CBA, BHP, WBC".to_string())
        );
    }

    #[test]
    fn get_string_returns_none_for_missing_key() {
        let adapter = FileConfigAdapter::from_string("[backtest]\nsymbol = CBA\n").unwrap();
        assert_eq!(adapter.get_string("backtest", "missing"), None);
        assert_eq!(adapter.get_string("missing_section", "key"), None);
    }

    #[test]
    fn get_int_value_and_defaults() {
        let adapter = FileConfigAdapter::from_string(
            "[monte_carlo]\nsimulations = 500\nseed = abc\n",
        )
        .unwrap();
        assert_eq!(adapter.get_int("monte_carlo", "simulations", 0), 500);
        assert_eq!(adapter.get_int("monte_carlo", "seed", 7), 7);
        assert_eq!(adapter.get_int("monte_carlo", "missing", 42), 42);
    }

    #[test]
    fn get_double_value_and_defaults() {
        let adapter = FileConfigAdapter::from_string(
            "[score]\nrisk_free_rate = 0.04\nmax_vol = high\n",
        )
        .unwrap();
        assert_eq!(adapter.get_double("score", "risk_free_rate", 0.0), 0.04);
        assert_eq!(adapter.get_double("score", "max_vol", 0.3), 0.3);
        assert_eq!(adapter.get_double("score", "missing", 99.9), 99.9);
    }

    #[test]
    fn get_bool_values() {
        let adapter = FileConfigAdapter::from_string(
            "[backtest]\na = true\nb = Yes\nc = 1\nd = false\ne = no\nf = 0\n",
        )
        .unwrap();
        for key in ["a", "b", "c"] {
            assert!(adapter.get_bool("backtest", key, false));
        }
        for key in ["d", "e", "f"] {
            assert!(!adapter.get_bool("backtest", key, true));
        }
    }

    #[test]
    fn get_bool_returns_default_for_missing_or_garbage() {
        let adapter = FileConfigAdapter::from_string("[backtest]\nweekly = maybe\n").unwrap();
        assert!(adapter.get_bool("backtest", "missing", true));
        assert!(!adapter.get_bool("backtest", "missing", false));
        assert!(adapter.get_bool("backtest", "weekly", true));
    }

    #[test]
    fn from_file_reads_config() {
        let file = create_temp_config("[data]\npath = /srv/prices\n");
        let adapter = FileConfigAdapter::from_file(file.path()).unwrap();
        assert_eq!(adapter.get_string("data", "path"), Some("/srv/prices".to_string()));
    }

    #[test]
    fn from_file_missing_file_is_config_parse_error() {
        let result = FileConfigAdapter::from_file("/nonexistent/path/config.ini");
        assert!(matches!(
            result,
            Err(QuantError::ConfigParse { file, .. }) if file == "/nonexistent/path/config.ini"
        ));
    }
}
