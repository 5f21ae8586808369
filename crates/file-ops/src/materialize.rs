//! Parent directory creation for upload targets.

use std::io;
use std::path::{Component, Path, PathBuf};

use tracing::debug;

/// Creates every missing directory above `path`, excluding `path` itself.
///
/// Directories are created from the outermost inwards and returned in that
/// order. Existing directories are left alone. An existing non-directory in
/// the way, or any other creation failure, aborts with the underlying error.
pub fn ensure_parent_dirs(path: &Path) -> io::Result<Vec<PathBuf>> {
    let Some(parent) = path.parent() else {
        return Ok(Vec::new());
    };

    let mut created = Vec::new();
    let mut prefix = PathBuf::new();

    for component in parent.components() {
        prefix.push(component);
        if !matches!(component, Component::Normal(_)) {
            continue;
        }

        match std::fs::create_dir(&prefix) {
            Ok(()) => {
                debug!(dir = %prefix.display(), "created directory");
                created.push(prefix.clone());
            }
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                if !prefix.is_dir() {
                    return Err(io::Error::new(
                        io::ErrorKind::NotADirectory,
                        format!("{} exists and is not a directory", prefix.display()),
                    ));
                }
            }
            Err(e) => return Err(e),
        }
    }

    Ok(created)
}
