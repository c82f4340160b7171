use std::path::{Path, PathBuf};

use super::error::{ConfigError, ConfigResult};

const CONFIG_FILE: &str = "config.toml";

/// `<base>/germangains/config.toml`, where `base` is `$HOME/.config` on unix
/// and `%APPDATA%` on windows.
pub fn user_config_path(base: &Path) -> PathBuf {
    base.join(crate::APPLICATION_NAME).join(CONFIG_FILE)
}

fn user_config_base() -> Option<PathBuf> {
    #[cfg(unix)]
    {
        std::env::var_os("HOME").map(|home| PathBuf::from(home).join(".config"))
    }
    #[cfg(windows)]
    {
        std::env::var_os("APPDATA").map(PathBuf::from)
    }
    #[cfg(not(any(unix, windows)))]
    {
        None
    }
}

/// Debug builds read `./config.toml`. Release builds prefer the per-user
/// file and fall back to the working directory.
pub fn find_config_file(use_local: bool) -> PathBuf {
    let local = PathBuf::from(".").join(CONFIG_FILE);
    if use_local {
        return local;
    }

    user_config_base()
        .map(|base| user_config_path(&base))
        .filter(|path| path.exists())
        .unwrap_or(local)
}

pub fn read_config(use_local: bool) -> ConfigResult<Vec<u8>> {
    read_config_from(&find_config_file(use_local))
}

pub fn read_config_from(filename: &Path) -> ConfigResult<Vec<u8>> {
    tracing::trace!("looking for config at: {}", filename.display());
    if !filename.is_file() {
        return Err(ConfigError::ConfigNotFound);
    }

    tracing::debug!("using {} as configuration file", filename.display());
    Ok(std::fs::read(filename)?)
}

#[cfg(test)]
mod test {
    use std::fs;

    use super::*;

    #[test]
    fn local_lookup_ignores_user_dir() {
        assert_eq!(find_config_file(true), PathBuf::from("./config.toml"));
    }

    #[test]
    fn user_path_is_namespaced() {
        let path = user_config_path(Path::new("/home/anna/.config"));
        assert_eq!(
            path,
            PathBuf::from("/home/anna/.config/germangains/config.toml")
        );
    }

    #[test]
    fn reads_existing_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let file_path = temp_dir.path().join("config.toml");
        fs::write(&file_path, b"[host]\nbindto = '0.0.0.0:5000'").unwrap();

        let bytes = read_config_from(&file_path).unwrap();
        assert!(bytes.starts_with(b"[host]"));
    }

    #[test]
    fn missing_file_or_directory_is_not_found() {
        let temp_dir = tempfile::tempdir().unwrap();
        let result = read_config_from(&temp_dir.path().join("nope.toml"));
        assert!(matches!(result, Err(ConfigError::ConfigNotFound)));

        let result = read_config_from(temp_dir.path());
        assert!(matches!(result, Err(ConfigError::ConfigNotFound)));
    }
}
