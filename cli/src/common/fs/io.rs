//! # Chatdesk Filesystem I/O Operations
//!
//! File: cli/src/common/fs/io.rs
//!
//! ## Overview
//!
//! Thin wrappers around `std::fs` that add context to errors:
//! - **`read_file_to_string`**: reads a whole file; used for the session file
//!   and for bulk-import uploads.
//! - **`write_private_file`**: writes a file after creating its parent
//!   directory, restricting permissions to the owner on Unix. Used for the
//!   session file, which holds a bearer token.
//! - **`remove_file_if_exists`**: deletes a file, treating "already gone" as success.
//!
use crate::core::error::{ChatdeskError, Result};
use anyhow::Context;
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::Path;
use tracing::{debug, info};

/// Creates the directory that will hold `path`. A parent that exists as a
/// regular file is an error.
fn prepare_parent(path: &Path) -> Result<()> {
    let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) else {
        return Ok(());
    };
    if parent.is_dir() {
        return Ok(());
    }
    if parent.exists() {
        anyhow::bail!(ChatdeskError::FileSystem(format!(
            "Cannot write {}: {} is not a directory",
            path.display(),
            parent.display()
        )));
    }
    fs::create_dir_all(parent)
        .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    info!("Created directory: {}", parent.display());
    Ok(())
}

/// Reads a UTF-8 file into memory.
pub fn read_file_to_string(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

/// Writes `content` to `path`, overwriting any existing file.
///
/// The parent directory is created if needed. On Unix the file is created
/// with mode `0600`, and an existing file is narrowed to `0600` before any
/// content is written, since callers store credentials in it.
pub fn write_private_file(path: &Path, content: &str) -> Result<()> {
    prepare_parent(path)?;

    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }
    let mut file = options
        .open(path)
        .with_context(|| format!("Failed to open {}", path.display()))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        file.set_permissions(fs::Permissions::from_mode(0o600))
            .with_context(|| format!("Failed to restrict permissions on {}", path.display()))?;
    }

    file.write_all(content.as_bytes())
        .with_context(|| format!("Failed to write {}", path.display()))?;
    debug!("Wrote {}", path.display());
    Ok(())
}

/// Removes a file. Returns `Ok(false)` when there was nothing to remove.
pub fn remove_file_if_exists(path: &Path) -> Result<bool> {
    match fs::remove_file(path) {
        Ok(()) => {
            debug!("Removed {}", path.display());
            Ok(true)
        }
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e).with_context(|| format!("Failed to remove {}", path.display())),
    }
}
