//! Session snapshots.
//!
//! A [`StateStore`] saves the mutable run-time state of the active inventory
//! (shown image, counters, flag progression, visibility) to a text file and
//! restores it onto the live display later. Layout drift between saving and
//! opening is tolerated per slot, see [`DriftWarning`].

mod codec;
mod reconcile;

use std::ffi::OsString;
use std::path::{Path, PathBuf};

pub use codec::{LabelState, Snapshot, WARNING_TEXT};
pub use reconcile::{capture, restore, DriftWarning, RestoreReport};

use crate::config::Config;
use crate::display::DisplaySink;
use crate::error::{Error, Result};

/// Snapshot files always carry this extension.
pub const STATE_EXTENSION: &str = "txt";

/// Append `.txt` unless the path already ends with it.
pub fn normalize_state_path(path: PathBuf) -> PathBuf {
    if path.extension().is_some_and(|e| e == STATE_EXTENSION) {
        return path;
    }
    let mut raw: OsString = path.into_os_string();
    raw.push(".");
    raw.push(STATE_EXTENSION);
    PathBuf::from(raw)
}

/// Saves and opens session snapshots for one config.
pub struct StateStore<'a> {
    config: &'a mut Config,
    path: Option<PathBuf>,
    /// Labels of the last saved or opened snapshot.
    last: Snapshot,
    saved: bool,
}

impl<'a> StateStore<'a> {
    /// Use `path`, or the config's `StatePath` when `None`.
    pub fn new(config: &'a mut Config, path: Option<PathBuf>) -> Self {
        let path = path
            .or_else(|| config.state_path.as_ref().map(|p| config.asset_path(p)))
            .map(normalize_state_path);

        Self {
            config,
            path,
            last: Snapshot::default(),
            saved: false,
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn config(&self) -> &Config {
        self.config
    }

    pub fn config_mut(&mut self) -> &mut Config {
        self.mark_dirty();
        self.config
    }

    /// Labels handled by the last save or open.
    pub fn states(&self) -> &[LabelState] {
        &self.last.labels
    }

    /// Whether nothing changed since the last save or open.
    pub fn is_saved(&self) -> bool {
        self.saved
    }

    pub fn mark_dirty(&mut self) {
        self.saved = false;
    }

    fn require_path(&self) -> Result<PathBuf> {
        self.path.clone().ok_or(Error::StatePathUnset)
    }

    /// Capture the live display and write it to the state file.
    pub fn save(&mut self, sink: &dyn DisplaySink) -> Result<&Snapshot> {
        let path = self.require_path()?;
        let snapshot = capture(self.config, sink)?;

        std::fs::write(&path, snapshot.to_text()).map_err(|e| Error::io(&path, e))?;
        tracing::info!("Saved {} labels to {}", snapshot.labels.len(), path.display());

        self.last = snapshot;
        self.saved = true;
        Ok(&self.last)
    }

    /// Read the state file and apply it onto the live display.
    pub fn open(&mut self, sink: &mut dyn DisplaySink) -> Result<RestoreReport> {
        let path = self.require_path()?;
        let text = std::fs::read_to_string(&path).map_err(|e| Error::io(&path, e))?;
        let snapshot = Snapshot::parse(&text)?;
        tracing::info!("Opened {} labels from {}", snapshot.labels.len(), path.display());

        let report = restore(self.config, sink, &snapshot)?;

        self.last = snapshot;
        self.saved = true;
        Ok(report)
    }
}
