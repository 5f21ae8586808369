//! Fixtures shared by the handler tests.

use std::path::{Path, PathBuf};

use pap_file_ops::{LookupError, PathResolver, UserDirectory};

use crate::session::SessionEngine;

/// User database that cannot be consulted at all.
pub(crate) struct UnavailableUsers;

impl UserDirectory for UnavailableUsers {
    fn home_dir(&self, name: &str) -> Result<Option<PathBuf>, LookupError> {
        Err(LookupError {
            name: name.to_string(),
            reason: "database unavailable".into(),
        })
    }
}

/// Engine whose user lookups always fail. `$HOME` is `home`, so only
/// paths that need a lookup are affected.
pub(crate) fn unavailable_users_engine(home: &Path) -> SessionEngine<UnavailableUsers> {
    SessionEngine::new(PathResolver::new(UnavailableUsers, Some(home.to_path_buf())))
}

/// True if `dir` has no entries.
pub(crate) fn is_empty_dir(dir: &Path) -> bool {
    std::fs::read_dir(dir)
        .map(|mut entries| entries.next().is_none())
        .unwrap_or(false)
}
