//! User database lookups.

use std::collections::HashMap;
use std::path::PathBuf;

/// The user database itself could not be consulted.
///
/// Distinct from an unknown user, which is `Ok(None)`.
#[derive(Debug, thiserror::Error)]
#[error("user database lookup for {name:?} failed: {reason}")]
pub struct LookupError {
    pub name: String,
    pub reason: String,
}

/// Maps user names to home directories.
pub trait UserDirectory: Send + Sync {
    /// Returns the home directory of `name`, or `None` if no such user exists.
    fn home_dir(&self, name: &str) -> Result<Option<PathBuf>, LookupError>;
}

/// The operating system's user database (`getpwnam_r` on Unix).
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemUsers;

#[cfg(unix)]
impl UserDirectory for SystemUsers {
    fn home_dir(&self, name: &str) -> Result<Option<PathBuf>, LookupError> {
        use nix::errno::Errno;

        if name.contains('\0') {
            return Ok(None);
        }

        match nix::unistd::User::from_name(name) {
            Ok(user) => Ok(user.map(|u| u.dir)),
            // getpwnam_r(3) lists these as possible "name not found" results.
            Err(Errno::ENOENT | Errno::ESRCH | Errno::EBADF | Errno::EPERM) => Ok(None),
            Err(errno) => Err(LookupError {
                name: name.to_string(),
                reason: errno.desc().to_string(),
            }),
        }
    }
}

#[cfg(not(unix))]
impl UserDirectory for SystemUsers {
    fn home_dir(&self, _name: &str) -> Result<Option<PathBuf>, LookupError> {
        Ok(None)
    }
}

/// Fixed name-to-home table.
impl UserDirectory for HashMap<String, PathBuf> {
    fn home_dir(&self, name: &str) -> Result<Option<PathBuf>, LookupError> {
        Ok(self.get(name).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_lookup() {
        let users = HashMap::from([("alice".to_string(), PathBuf::from("/home/alice"))]);
        assert_eq!(
            users.home_dir("alice").unwrap(),
            Some(PathBuf::from("/home/alice"))
        );
        assert_eq!(users.home_dir("bob").unwrap(), None);
    }

    #[cfg(unix)]
    #[test]
    fn system_lookup_current_user() {
        let Some(me) = nix::unistd::User::from_uid(nix::unistd::getuid()).unwrap() else {
            // Sandboxes may run under a uid without a passwd entry.
            return;
        };
        let home = SystemUsers.home_dir(&me.name).unwrap();
        assert_eq!(home, Some(me.dir));
    }

    #[test]
    fn system_lookup_unknown_user() {
        let home = SystemUsers
            .home_dir("pap-no-such-user-7f3a9c")
            .unwrap();
        assert_eq!(home, None);
    }

    #[test]
    fn system_lookup_rejects_nul() {
        assert_eq!(SystemUsers.home_dir("root\0x").unwrap(), None);
    }
}
