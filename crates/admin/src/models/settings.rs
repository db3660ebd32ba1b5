//! Store contact/info settings persisted on the local device.
//!
//! The original kept these in browser localStorage; here they live in a
//! small JSON file next to the binary. They are presentation data plus the
//! fallback WhatsApp contact - not part of the reconciliation core.

use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

/// Store contact/info settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct StoreSettings {
    #[serde(default)]
    pub store_name: String,
    /// Raw phone as entered; normalized at the point of use.
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub address: String,
}

/// File-backed settings store.
///
/// Reads are served from memory; updates rewrite the file through a
/// temporary sibling and rename, so a crash mid-write cannot truncate the
/// previous settings.
#[derive(Debug)]
pub struct SettingsStore {
    path: PathBuf,
    current: RwLock<StoreSettings>,
}

impl SettingsStore {
    /// Load settings from `path`, falling back to defaults when the file
    /// does not exist yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub async fn load(path: impl Into<PathBuf>) -> io::Result<Self> {
        let path = path.into();
        let current = match tokio::fs::read(&path).await {
            Ok(bytes) => serde_json::from_slice(&bytes)
                .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?,
            Err(e) if e.kind() == io::ErrorKind::NotFound => StoreSettings::default(),
            Err(e) => return Err(e),
        };

        Ok(Self {
            path,
            current: RwLock::new(current),
        })
    }

    /// Current settings snapshot.
    pub async fn get(&self) -> StoreSettings {
        self.current.read().await.clone()
    }

    /// Replace the settings and persist them.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written; the in-memory copy
    /// is only replaced after the write succeeds.
    pub async fn update(&self, settings: StoreSettings) -> io::Result<()> {
        let json = serde_json::to_vec_pretty(&settings)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

        let tmp = tmp_path(&self.path);
        tokio::fs::write(&tmp, &json).await?;
        tokio::fs::rename(&tmp, &self.path).await?;

        *self.current.write().await = settings;
        Ok(())
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map_or_else(
        || std::ffi::OsString::from("settings"),
        std::ffi::OsStr::to_os_string,
    );
    name.push(".tmp");
    path.with_file_name(name)
}
