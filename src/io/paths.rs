use std::path::{Path, PathBuf};

/// Resolve the data directory: explicit override, then `$POSTIO_DATA_DIR`,
/// then `$XDG_DATA_HOME/postio`, then `~/.local/share/postio`.
pub fn data_dir(override_dir: Option<&Path>) -> PathBuf {
    if let Some(dir) = override_dir {
        return dir.to_path_buf();
    }
    if let Some(dir) = env_path("POSTIO_DATA_DIR") {
        return dir;
    }
    let base =
        env_path("XDG_DATA_HOME").unwrap_or_else(|| dirs_home().join(".local").join("share"));
    base.join("postio")
}

/// `config.toml` inside the data directory
pub fn config_path(data_dir: &Path) -> PathBuf {
    data_dir.join("config.toml")
}

/// Log file used while the TUI owns the terminal
pub fn log_path(data_dir: &Path) -> PathBuf {
    data_dir.join("postio.log")
}

fn env_path(var: &str) -> Option<PathBuf> {
    std::env::var_os(var)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}

/// Get the user's home directory
fn dirs_home() -> PathBuf {
    std::env::var("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("/"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn override_wins() {
        let dir = data_dir(Some(Path::new("/tmp/board")));
        assert_eq!(dir, PathBuf::from("/tmp/board"));
        assert_eq!(config_path(&dir), PathBuf::from("/tmp/board/config.toml"));
        assert_eq!(log_path(&dir), PathBuf::from("/tmp/board/postio.log"));
    }
}
