//! `[import]` section configuration.
//!
//! ```toml
//! [import]
//! on_existing = "update"   # update | replace | archive
//! index_title = "Index"    # title of the root index page
//! ```

use serde::{Deserialize, Serialize};

use crate::config::ConfigDiagnostics;
use crate::importer::OnExisting;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportConfig {
    /// What to do when the target category already has an article with the
    /// topic's title.
    pub on_existing: OnExisting,

    pub index_title: String,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            on_existing: OnExisting::Update,
            index_title: "Index".into(),
        }
    }
}

impl ImportConfig {
    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.index_title.trim().is_empty() {
            diag.error("import.index_title", "index title is empty");
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::config::test_parse_config;
    use crate::importer::OnExisting;

    #[test]
    fn test_import_config() {
        let config = test_parse_config("[import]\non_existing = \"archive\"");
        assert_eq!(config.import.on_existing, OnExisting::Archive);
        assert_eq!(config.import.index_title, "Index");
    }

    #[test]
    fn test_import_config_rejects_unknown_mode() {
        let result = toml::from_str::<crate::config::KbConfig>("[import]\non_existing = \"merge\"");
        assert!(result.is_err());
    }
}
