//! `~` expansion for client-supplied paths.
//!
//! Paths and identities arrive as raw frame bytes and are never required
//! to be UTF-8. On Unix they map onto paths byte for byte.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::DEFAULT_FALLBACK_HOME;
use crate::users::{LookupError, SystemUsers, UserDirectory};

/// Leading byte that marks a home-relative path.
pub const HOME_MARKER: u8 = b'~';

/// Errors produced by path resolution.
///
/// An unknown user is not an error; the path is returned unexpanded.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    #[error(transparent)]
    Lookup(#[from] LookupError),
}

/// Expands home-relative paths on behalf of a session identity.
///
/// Resolution depends only on its inputs, the user database and the
/// process home captured at construction, so one resolver can serve any
/// number of sessions.
#[derive(Debug, Clone)]
pub struct PathResolver<U = SystemUsers> {
    users: U,
    process_home: Option<PathBuf>,
    fallback_home: PathBuf,
}

impl PathResolver<SystemUsers> {
    /// Resolver backed by the system user database and the current `$HOME`.
    pub fn from_env() -> Self {
        let process_home = std::env::var_os("HOME")
            .filter(|h| !h.is_empty())
            .map(PathBuf::from);
        Self::new(SystemUsers, process_home)
    }
}

impl<U: UserDirectory> PathResolver<U> {
    pub fn new(users: U, process_home: Option<PathBuf>) -> Self {
        Self {
            users,
            process_home,
            fallback_home: PathBuf::from(DEFAULT_FALLBACK_HOME),
        }
    }

    /// Overrides the home used when neither the identity nor the process
    /// environment provides one.
    pub fn with_fallback_home(mut self, home: impl Into<PathBuf>) -> Self {
        self.fallback_home = home.into();
        self
    }

    /// Resolves `raw` for a session identified as `identity`.
    ///
    /// - `/abs/x`, `rel/x`: returned unchanged.
    /// - `~`, `~/x`: home of `identity`, else `$HOME`, else the fallback home.
    /// - `~name/x`: home of `name`; unchanged if `name` is unknown.
    pub fn resolve(&self, raw: &[u8], identity: &[u8]) -> Result<PathBuf, ResolveError> {
        let Some(after_marker) = raw.strip_prefix(&[HOME_MARKER]) else {
            return Ok(path_from_bytes(raw));
        };

        let (name, rest) = match after_marker.iter().position(|&b| b == b'/') {
            Some(idx) => after_marker.split_at(idx),
            None => (after_marker, &[][..]),
        };

        if name.is_empty() {
            let home = self.session_home(identity)?;
            return Ok(join_home(&home, rest));
        }

        match self.lookup(name)? {
            Some(home) => Ok(join_home(&home, rest)),
            None => {
                debug!(
                    user = %String::from_utf8_lossy(name),
                    "unknown user, path left unexpanded"
                );
                Ok(path_from_bytes(raw))
            }
        }
    }

    fn session_home(&self, identity: &[u8]) -> Result<PathBuf, ResolveError> {
        if !identity.is_empty() {
            if let Some(home) = self.lookup(identity)? {
                return Ok(home);
            }
        }
        Ok(self
            .process_home
            .clone()
            .unwrap_or_else(|| self.fallback_home.clone()))
    }

    /// User names are looked up as UTF-8; any other name matches no user.
    fn lookup(&self, name: &[u8]) -> Result<Option<PathBuf>, ResolveError> {
        match std::str::from_utf8(name) {
            Ok(name) => Ok(self.users.home_dir(name)?),
            Err(_) => Ok(None),
        }
    }
}

/// Appends the remainder after `~` or `~name` to a home directory.
fn join_home(home: &Path, rest: &[u8]) -> PathBuf {
    let start = rest.iter().position(|&b| b != b'/').unwrap_or(rest.len());
    let rest = &rest[start..];
    if rest.is_empty() {
        return home.to_path_buf();
    }
    home.join(path_from_bytes(rest))
}

/// Converts frame bytes to a path without altering them.
#[cfg(unix)]
pub fn path_from_bytes(bytes: &[u8]) -> PathBuf {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    PathBuf::from(OsStr::from_bytes(bytes))
}

/// Converts frame bytes to a path. Non-UTF-8 sequences are replaced.
#[cfg(not(unix))]
pub fn path_from_bytes(bytes: &[u8]) -> PathBuf {
    PathBuf::from(String::from_utf8_lossy(bytes).into_owned())
}

/// Final path component as advertised to a downloading client: everything
/// after the last `/`, or the whole input if there is none.
pub fn advertised_name(path: &[u8]) -> &[u8] {
    match path.iter().rposition(|&b| b == b'/') {
        Some(idx) => &path[idx + 1..],
        None => path,
    }
}
