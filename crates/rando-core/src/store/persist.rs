//! Load and save the state document (JSON under the XDG state dir).

use anyhow::{Context, Result};
use std::borrow::Cow;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use super::{PersistedState, StateStore, BLOB_TTL};

impl StateStore {
    /// Default path: `~/.local/state/rando/state.json`.
    pub fn default_path() -> Result<PathBuf> {
        let xdg_dirs = xdg::BaseDirectories::with_prefix("rando")?;
        Ok(xdg_dirs.get_state_home().join("rando").join("state.json"))
    }

    pub fn open_default() -> Result<Self> {
        Self::open_at(&Self::default_path()?)
    }

    /// Open the store at `path`. A missing file yields fresh state; an
    /// unparseable one is logged and replaced by fresh state on next save.
    pub fn open_at(path: &Path) -> Result<Self> {
        let state = match std::fs::read(path) {
            Ok(bytes) => match serde_json::from_slice::<PersistedState>(&bytes) {
                Ok(state) => state,
                Err(e) => {
                    tracing::warn!(path = %path.display(), "ignoring corrupt state file: {e}");
                    PersistedState::default()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => PersistedState::default(),
            Err(e) => {
                return Err(e).with_context(|| format!("read state: {}", path.display()))
            }
        };
        Ok(Self {
            path: Some(path.to_path_buf()),
            state,
        })
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Write the state (creating the parent dir if needed), leaving out cached
    /// blobs older than [`BLOB_TTL`]. No-op for in-memory stores.
    pub fn save(&self) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create dir: {}", parent.display()))?;
        }
        let state = self.without_stale_blobs(SystemTime::now());
        let json = serde_json::to_string_pretty(state.as_ref()).context("serialize state")?;
        std::fs::write(path, json).with_context(|| format!("write state: {}", path.display()))?;
        Ok(())
    }

    fn without_stale_blobs(&self, now: SystemTime) -> Cow<'_, PersistedState> {
        let stale = self
            .state
            .cached_blobs
            .values()
            .any(|blob| !blob.is_fresh(now, BLOB_TTL));
        if !stale {
            return Cow::Borrowed(&self.state);
        }
        let mut state = self.state.clone();
        state.cached_blobs.retain(|_, blob| blob.is_fresh(now, BLOB_TTL));
        tracing::debug!(
            dropped = self.state.cached_blobs.len() - state.cached_blobs.len(),
            "pruned stale cached blobs"
        );
        Cow::Owned(state)
    }
}
