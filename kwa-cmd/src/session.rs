//! Last known location for one user session.
//!
//! The context is handed to `evaluate` explicitly. The caller owns its
//! lifecycle: it is set on a successful fix, read when a query names no
//! location, and cleared on an explicit reset.

use kwa_forecast::geocode::Coordinates;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Default, PartialEq, Clone, Serialize, Deserialize)]
pub struct SessionContext {
    last_known: Option<Coordinates>,
}

impl SessionContext {
    /// Record a successful location fix. Last writer wins.
    pub fn remember(&mut self, coordinates: Coordinates) {
        self.last_known = Some(coordinates);
    }

    /// Location to use when a query does not name one.
    pub fn fallback(&self) -> Option<Coordinates> {
        self.last_known
    }

    pub fn clear(&mut self) {
        self.last_known = None;
    }

    /// Read a saved session. A missing file is an empty session.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            debug!("No session file at {}", path.display());
            return Ok(SessionContext::default());
        }
        let body = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Write the session whole, through a temporary file and a rename so a
    /// reader never sees a half-written file.
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let tmp = path.with_extension("tmp");
        std::fs::write(&tmp, serde_json::to_string_pretty(self)?)?;
        std::fs::rename(&tmp, path)?;
        info!("Session saved to {}", path.display());
        Ok(())
    }
}

/// Clear the last known location stored in `path`.
pub fn forget(path: &Path) -> anyhow::Result<()> {
    let mut session = SessionContext::load(path)?;
    if session.fallback().is_none() {
        info!("Nothing to forget in {}", path.display());
        return Ok(());
    }
    session.clear();
    session.save(path)
}
