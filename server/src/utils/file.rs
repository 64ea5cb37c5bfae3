//! File path helpers

use std::path::PathBuf;

/// Expand `~`, `~/…` and relative paths into an absolute path.
///
/// Used for `--config`, `VITRINA_DATA_DIR` and `database.path`, which users
/// commonly pass as `~/.vitrina/…` or `./data`.
pub fn expand_path(path: &str) -> PathBuf {
    let path = path.trim();
    let cwd = || std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));

    if path.is_empty() {
        return cwd();
    }

    let expanded = match (path, dirs::home_dir()) {
        ("~", Some(home)) => home,
        (p, Some(home)) if p.starts_with("~/") => home.join(&p[2..]),
        (p, _) => PathBuf::from(p),
    };

    if expanded.is_relative() {
        cwd().join(expanded)
    } else {
        expanded
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absolute_path_unchanged() {
        assert_eq!(expand_path("/var/lib/vitrina"), PathBuf::from("/var/lib/vitrina"));
    }

    #[test]
    fn test_trims_whitespace() {
        assert_eq!(expand_path("  /tmp/data  "), PathBuf::from("/tmp/data"));
    }

    #[test]
    fn test_relative_becomes_absolute() {
        let result = expand_path("./data");
        assert!(result.is_absolute());
        assert!(result.ends_with("data"));

        let bare = expand_path("vitrina.json");
        assert!(bare.is_absolute());
        assert!(bare.ends_with("vitrina.json"));
    }

    #[test]
    fn test_tilde_expansion() {
        let result = expand_path("~/.vitrina");
        assert!(!result.to_string_lossy().contains('~'));
        assert!(result.ends_with(".vitrina"));

        if let Some(home) = dirs::home_dir() {
            assert_eq!(expand_path("~"), home);
        }
    }

    #[test]
    fn test_empty_is_cwd() {
        assert!(expand_path("").is_absolute());
    }
}
