/*!
 * Installation Identity
 * Stable, application-keyed identifier for this host, computed at most once
 *
 * The raw machine id never leaves the process: it is hashed with BLAKE3 in
 * key-derivation mode using the application id as context. Failures degrade
 * to the `"invalid"` sentinel and never propagate.
 */

use crate::core::errors::{IdentityError, IdentityResult};
use crate::core::limits::{DEFAULT_APP_ID, INVALID_MACHINE_ID, MACHINE_ID_PATHS};
use std::path::PathBuf;
use std::sync::OnceLock;
use tracing::{debug, warn};

static MACHINE_ID: OnceLock<String> = OnceLock::new();

/// Source of the per-installation identifier
pub trait MachineIdProvider: Send + Sync {
    fn machine_id(&self) -> IdentityResult<String>;
}

/// Host machine id read from the well-known files
#[derive(Debug, Clone)]
pub struct HostMachineId {
    app_id: String,
    paths: Vec<PathBuf>,
}

impl HostMachineId {
    pub fn new(app_id: impl Into<String>) -> Self {
        Self::with_paths(app_id, MACHINE_ID_PATHS.iter().map(PathBuf::from))
    }

    /// Read the raw id from `paths`, first readable non-empty file wins
    pub fn with_paths<I, P>(app_id: impl Into<String>, paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            app_id: app_id.into(),
            paths: paths.into_iter().map(Into::into).collect(),
        }
    }

    fn read_raw(&self) -> IdentityResult<String> {
        let mut last_err = None;
        for path in &self.paths {
            match std::fs::read_to_string(path) {
                Ok(contents) => {
                    let raw = contents.trim();
                    if raw.is_empty() {
                        last_err = Some(IdentityError::Empty(path.display().to_string()));
                        continue;
                    }
                    debug!(path = %path.display(), "machine id source found");
                    return Ok(raw.to_string());
                }
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => continue,
                Err(e) => last_err = Some(IdentityError::Io(e)),
            }
        }
        Err(last_err.unwrap_or(IdentityError::NotFound))
    }
}

impl Default for HostMachineId {
    fn default() -> Self {
        Self::new(DEFAULT_APP_ID)
    }
}

impl MachineIdProvider for HostMachineId {
    fn machine_id(&self) -> IdentityResult<String> {
        let raw = self.read_raw()?;
        let mut hasher = blake3::Hasher::new_derive_key(&self.app_id);
        hasher.update(raw.as_bytes());
        Ok(hasher.finalize().to_hex().to_string())
    }
}

/// Run `provider` once, substituting the sentinel on failure
pub fn resolve_machine_id(provider: &dyn MachineIdProvider) -> String {
    match provider.machine_id() {
        Ok(id) => id,
        Err(e) => {
            warn!(error = %e, "machine id unavailable, using sentinel");
            INVALID_MACHINE_ID.to_string()
        }
    }
}

/// Process-wide identifier from the host machine id under the default app id
pub fn machine_id() -> &'static str {
    machine_id_with(&HostMachineId::default())
}

/// Process-wide identifier; the first caller's provider wins, later
/// providers are never invoked.
pub fn machine_id_with(provider: &dyn MachineIdProvider) -> &'static str {
    MACHINE_ID.get_or_init(|| resolve_machine_id(provider))
}
