use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::model::ClientConfig;

const CONFIG_FILE: &str = "config.json";

/// Client-side settings on disk: the configured remote and the last
/// activity the user painted with.
#[derive(Clone, Debug)]
pub struct ClientStore {
    root: PathBuf,
}

impl ClientStore {
    /// The per-user store, e.g. `~/.config/quartergrid`.
    pub fn open_default() -> Result<Self> {
        let base = dirs::config_dir().context("locate user config directory")?;
        Ok(Self {
            root: base.join("quartergrid"),
        })
    }

    pub fn at(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn read_config(&self) -> Result<ClientConfig> {
        let path = self.root.join(CONFIG_FILE);
        if !path.exists() {
            return Ok(ClientConfig::default());
        }
        let bytes = fs::read(&path).with_context(|| format!("read {}", path.display()))?;
        serde_json::from_slice(&bytes).context("parse config.json")
    }

    pub fn write_config(&self, cfg: &ClientConfig) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(cfg).context("serialize config")?;
        write_atomic(&self.root.join(CONFIG_FILE), &bytes).context("write config.json")
    }
}

fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("create parent directories")?;
    }
    let tmp = path.with_extension(format!("tmp.{}", std::process::id()));
    fs::write(&tmp, bytes).with_context(|| format!("write temp file {}", tmp.display()))?;
    fs::rename(&tmp, path)
        .with_context(|| format!("rename {} -> {}", tmp.display(), path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Activity, ActivityId, RemoteConfig};

    #[test]
    fn missing_config_reads_as_default() {
        let dir = tempfile::tempdir().unwrap();
        let store = ClientStore::at(dir.path());
        let cfg = store.read_config().unwrap();
        assert_eq!(cfg.version, 1);
        assert!(cfg.remote.is_none());
        assert!(cfg.preferred_activity.is_none());
    }

    #[test]
    fn config_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let store = ClientStore::at(dir.path().join("nested"));

        let cfg = ClientConfig {
            remote: Some(RemoteConfig {
                base_url: "http://127.0.0.1:8080".to_string(),
            }),
            preferred_activity: Some(Activity {
                id: ActivityId("3".to_string()),
                title: "Work".to_string(),
                color: "#ff0000".to_string(),
            }),
            ..ClientConfig::default()
        };
        store.write_config(&cfg).unwrap();

        let read = store.read_config().unwrap();
        assert_eq!(read.remote.unwrap().base_url, "http://127.0.0.1:8080");
        assert_eq!(read.preferred_activity.unwrap().title, "Work");
    }
}
