//! `[store]` section configuration.
//!
//! ```toml
//! [store]
//! path = "medkb.json"   # relative to the config file, `~` is expanded
//! ```

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::config::ConfigDiagnostics;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Content store snapshot file.
    pub path: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: "medkb.json".into(),
        }
    }
}

impl StoreConfig {
    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.path.as_os_str().is_empty() {
            diag.error("store.path", "store path is empty");
        } else if self.path.is_dir() {
            diag.error(
                "store.path",
                format!("`{}` is a directory, expected a file", self.path.display()),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use crate::config::{ConfigDiagnostics, test_parse_config};

    #[test]
    fn test_store_path() {
        let config = test_parse_config("[store]\npath = \"data/kb.json\"");
        assert_eq!(config.store.path, Path::new("data/kb.json"));
    }

    #[test]
    fn test_store_path_must_be_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = test_parse_config(&format!(
            "[store]\npath = {:?}",
            dir.path().display().to_string()
        ));
        let mut diag = ConfigDiagnostics::new();
        config.store.validate(&mut diag);
        assert!(diag.has_errors());
    }
}
