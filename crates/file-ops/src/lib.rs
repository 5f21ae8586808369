//! Filesystem helpers for PAP sessions.
//!
//! Provides `~` expansion against the user database, parent-directory
//! creation for uploads, and the filename advertised on downloads.
//!
//! Resolved paths are not confined to any root: the identity a client
//! sends is self-asserted and nothing here checks access rights. The
//! server's own filesystem permissions are the only boundary.

mod materialize;
mod resolve;
mod users;

pub use materialize::ensure_parent_dirs;
pub use resolve::{HOME_MARKER, PathResolver, ResolveError, advertised_name, path_from_bytes};
pub use users::{LookupError, SystemUsers, UserDirectory};

/// Home used for `~` when neither the identity nor `$HOME` yields one.
pub const DEFAULT_FALLBACK_HOME: &str = "/";
