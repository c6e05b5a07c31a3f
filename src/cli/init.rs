//! Project initialization: writes a default `medkb.toml`.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use crate::config::{ConfigError, KbConfig};
use crate::log;

/// Write the default config to `config.config_path`.
///
/// Refuses to overwrite an existing file unless `force` is set.
pub fn init_config(config: &KbConfig, force: bool) -> Result<()> {
    let path = &config.config_path;
    write_default_config(path, force)?;
    log!("init"; "wrote {}", config.root_relative(path).display());
    Ok(())
}

fn write_default_config(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        return Err(ConfigError::AlreadyExists(path.to_path_buf()).into());
    }
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    let content = KbConfig::default_toml()?;
    fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_default_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("medkb.toml");

        write_default_config(&path, false).unwrap();
        let written = fs::read_to_string(&path).unwrap();
        let parsed = KbConfig::from_str(&written).unwrap();
        assert_eq!(parsed.site.base_url, KbConfig::default().site.base_url);

        let err = write_default_config(&path, false).unwrap_err();
        assert!(err.to_string().contains("already exists"));
        write_default_config(&path, true).unwrap();
    }
}
