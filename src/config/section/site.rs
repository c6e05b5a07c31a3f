//! `[site]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [site]
//! name = "Knowledge Base"
//! base_url = "https://kb.example.org/"
//! admin_path = "admin/pages/{id}/edit/"
//! ```

use serde::{Deserialize, Serialize};
use url::Url;

use crate::config::ConfigDiagnostics;
use crate::config::util::{join_url, parse_base_url};

/// Placeholder replaced with the article id in `admin_path`.
pub const ID_PLACEHOLDER: &str = "{id}";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Site name, used as the `<title>` suffix of built pages.
    pub name: String,

    /// Public URL the live pages are served under.
    pub base_url: String,

    /// Admin edit page path relative to `base_url`, with an `{id}` placeholder.
    pub admin_path: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            name: "Knowledge Base".into(),
            base_url: "https://kb.optifit.dev/".into(),
            admin_path: "admin/pages/{id}/edit/".into(),
        }
    }
}

impl SiteConfig {
    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if parse_base_url(&self.base_url).is_none() {
            diag.error_with_hint(
                "site.base_url",
                format!("`{}` is not an absolute http(s) URL", self.base_url),
                "use a full URL such as \"https://kb.example.org/\"",
            );
        }
        if !self.admin_path.contains(ID_PLACEHOLDER) {
            diag.error_with_hint(
                "site.admin_path",
                format!("`{}` has no {ID_PLACEHOLDER} placeholder", self.admin_path),
                "e.g. \"admin/pages/{id}/edit/\"",
            );
        }
    }

    /// Parsed base URL. Only `None` for configs that failed validation.
    pub fn base(&self) -> Option<Url> {
        parse_base_url(&self.base_url)
    }

    /// Absolute admin URL for an article id.
    pub fn admin_url(&self, id: u64) -> Option<String> {
        let path = self.admin_path.replace(ID_PLACEHOLDER, &id.to_string());
        join_url(&self.base()?, &path)
    }

    /// Absolute live URL for a site-relative page path.
    pub fn live_url(&self, path: &str) -> Option<String> {
        join_url(&self.base()?, path)
    }
}
