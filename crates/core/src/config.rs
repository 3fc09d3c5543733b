// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Environment-driven configuration.
//!
//! Resolves where the store lives on disk. The database defaults to a
//! user-level state directory (`~/.local/state/greenroom/`) and can be
//! redirected with `GREENROOM_STATE_DIR`.

use std::path::PathBuf;

/// Environment variable names used for configuration.
pub mod names {
    /// Overrides the state directory wholesale.
    pub const GREENROOM_STATE_DIR: &str = "GREENROOM_STATE_DIR";
    /// XDG base directory for state files.
    pub const XDG_STATE_HOME: &str = "XDG_STATE_HOME";
}

/// Database filename within the state directory.
pub const DB_FILE_NAME: &str = "greenroom.db";

/// Explicit state directory from `GREENROOM_STATE_DIR`, if set and non-empty.
pub fn state_dir() -> Option<PathBuf> {
    std::env::var(names::GREENROOM_STATE_DIR)
        .ok()
        .filter(|dir| !dir.is_empty())
        .map(PathBuf::from)
}

/// XDG state home from `XDG_STATE_HOME`, if set and non-empty.
pub fn xdg_state_home() -> Option<PathBuf> {
    std::env::var(names::XDG_STATE_HOME)
        .ok()
        .filter(|dir| !dir.is_empty())
        .map(PathBuf::from)
}

/// Resolve the state directory, checking the override, then XDG, then the
/// home directory.
pub fn resolve_state_dir() -> PathBuf {
    if let Some(dir) = state_dir() {
        return dir;
    }
    if let Some(dir) = xdg_state_home() {
        return dir.join("greenroom");
    }
    dirs::home_dir()
        .map(|h| h.join(".local/state/greenroom"))
        .unwrap_or_else(|| PathBuf::from(".local/state/greenroom"))
}

/// Default database path inside the resolved state directory.
pub fn default_db_path() -> PathBuf {
    resolve_state_dir().join(DB_FILE_NAME)
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
