//! # Chatdesk Filesystem Utilities (`common::fs`)
//!
//! File: cli/src/common/fs/mod.rs
//!
//! Filesystem helpers shared by the session store and the admin import flow.
//! Import from the submodule directly, e.g. `crate::common::fs::io::read_file_to_string`.
//!

/// Basic file I/O (`read_file_to_string`, `write_private_file`, `remove_file_if_exists`).
pub mod io;
