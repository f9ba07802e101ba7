use std::path::{Path, PathBuf};

use anyhow::anyhow;

pub const SETTINGS_FILE: &str = "settings.json";

/// `<data_dir>/settings.json`, or the per-user config dir when no data dir is given.
pub fn settings_path(data_dir: Option<&Path>) -> anyhow::Result<PathBuf> {
    let root = match data_dir {
        Some(dir) => dir.to_path_buf(),
        None => dirs::config_dir()
            .ok_or_else(|| anyhow!("unable to resolve per-user config dir; pass --data-dir"))?
            .join("plc_operator"),
    };
    Ok(root.join(SETTINGS_FILE))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_data_dir_is_used_as_is() {
        let path = settings_path(Some(Path::new("/tmp/plc"))).expect("path");
        assert_eq!(path, PathBuf::from("/tmp/plc/settings.json"));
    }
}
