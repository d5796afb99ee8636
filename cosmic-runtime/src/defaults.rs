use std::path::PathBuf;

pub const CONFIG_PATH_ENV: &str = "COSMIC_CONFIG";
const CONFIG_FILE: &str = "config.json";

/// `$COSMIC_CONFIG`, else `config.json` in the platform config dir
/// (`~/.config/cosmic`, `%APPDATA%\cosmic\config`, `~/Library/Application Support/cosmic`),
/// else `./cosmic.json`.
pub fn default_config_path() -> PathBuf {
    resolve_config_path(std::env::var_os(CONFIG_PATH_ENV).map(PathBuf::from), platform_config_dir)
}

fn platform_config_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "cosmic").map(|dirs| dirs.config_dir().to_path_buf())
}

fn resolve_config_path(
    explicit: Option<PathBuf>,
    config_dir: impl FnOnce() -> Option<PathBuf>,
) -> PathBuf {
    if let Some(p) = explicit.filter(|p| !p.as_os_str().is_empty()) {
        return p;
    }
    config_dir()
        .map(|dir| dir.join(CONFIG_FILE))
        .unwrap_or_else(|| PathBuf::from("cosmic.json"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_override_wins() {
        let p = resolve_config_path(Some(PathBuf::from("/tmp/c.json")), || {
            panic!("platform dir should not be consulted")
        });
        assert_eq!(p, PathBuf::from("/tmp/c.json"));
    }

    #[test]
    fn blank_override_falls_back_to_platform_dir() {
        let p = resolve_config_path(Some(PathBuf::new()), || Some(PathBuf::from("/cfg/cosmic")));
        assert_eq!(p, PathBuf::from("/cfg/cosmic").join("config.json"));
    }

    #[test]
    fn no_home_means_working_directory() {
        assert_eq!(resolve_config_path(None, || None), PathBuf::from("cosmic.json"));
    }

    #[test]
    fn default_lives_in_the_platform_config_dir() {
        let Some(dir) = platform_config_dir() else {
            return;
        };
        assert_eq!(resolve_config_path(None, platform_config_dir), dir.join("config.json"));
    }
}
