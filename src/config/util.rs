//! Configuration utility functions.

use std::path::{Path, PathBuf};

use url::Url;

/// Parse a site base URL, accepting only absolute `http`/`https` URLs.
///
/// A missing trailing slash is added so that relative joins append to the
/// path instead of replacing its last segment.
///
/// # Examples
/// ```ignore
/// parse_base_url("https://kb.example.org")       -> Some("https://kb.example.org/")
/// parse_base_url("https://example.org/kb")       -> Some("https://example.org/kb/")
/// parse_base_url("ftp://example.org/")           -> None
/// parse_base_url("kb.example.org")               -> None
/// ```
pub fn parse_base_url(url_str: &str) -> Option<Url> {
    let mut parsed = Url::parse(url_str.trim()).ok()?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return None;
    }
    if !parsed.path().ends_with('/') {
        let path = format!("{}/", parsed.path());
        parsed.set_path(&path);
    }
    Some(parsed)
}

/// Resolve `path` against `base`, returning the absolute URL as a string.
pub fn join_url(base: &Url, path: &str) -> Option<String> {
    base.join(path.trim_start_matches('/'))
        .ok()
        .map(String::from)
}

/// Find config file by searching upward from current directory
///
/// Starts from cwd and walks up parent directories until finding `config_name`
/// Returns the absolute path to the config file if found
///
/// # Example
/// ```text
/// /home/user/kb/topics/allergies/  ← cwd
/// /home/user/kb/medkb.toml         ← found!
/// ```
pub fn find_config_file(config_name: &Path) -> Option<PathBuf> {
    let cwd = std::env::current_dir().ok()?;

    if config_name.is_absolute() {
        return config_name.exists().then(|| config_name.to_path_buf());
    }

    let mut current = cwd.as_path();
    loop {
        let candidate = current.join(config_name);
        if candidate.exists() {
            return Some(candidate);
        }

        match current.parent() {
            Some(parent) => current = parent,
            None => return None,
        }
    }
}

/// Expand `~` and make `path` absolute relative to `root`.
pub fn resolve_path(path: &Path, root: &Path) -> PathBuf {
    let expanded = shellexpand::tilde(&path.to_string_lossy()).into_owned();
    let path = PathBuf::from(expanded);
    if path.is_relative() {
        root.join(path)
    } else {
        path
    }
}

// ============================================================================
// tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_base_url() {
        assert_eq!(
            parse_base_url("https://kb.example.org").map(String::from),
            Some("https://kb.example.org/".to_string())
        );
        assert_eq!(
            parse_base_url("https://example.org/kb").map(String::from),
            Some("https://example.org/kb/".to_string())
        );
        assert_eq!(
            parse_base_url("http://localhost:8000/").map(String::from),
            Some("http://localhost:8000/".to_string())
        );
        assert!(parse_base_url("ftp://example.org/").is_none());
        assert!(parse_base_url("kb.example.org").is_none());
    }

    #[test]
    fn test_join_url() {
        let base = parse_base_url("https://example.org/kb").unwrap();
        assert_eq!(
            join_url(&base, "/index/allergies/hay-fever/").as_deref(),
            Some("https://example.org/kb/index/allergies/hay-fever/")
        );
        assert_eq!(
            join_url(&base, "admin/pages/7/edit/").as_deref(),
            Some("https://example.org/kb/admin/pages/7/edit/")
        );
    }

    #[test]
    fn test_resolve_path() {
        let root = Path::new("/srv/kb");
        assert_eq!(
            resolve_path(Path::new("data/store.json"), root),
            PathBuf::from("/srv/kb/data/store.json")
        );
        assert_eq!(
            resolve_path(Path::new("/var/kb.json"), root),
            PathBuf::from("/var/kb.json")
        );
    }
}
