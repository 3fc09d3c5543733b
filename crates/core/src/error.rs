// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for gr-core operations.

use thiserror::Error;

/// All possible errors that can occur in gr-core operations.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid session token")]
    InvalidToken,

    #[error("user not found: {0}")]
    UserNotFound(i64),

    #[error("room not found: {0}")]
    RoomNotFound(i64),

    #[error("user {user_id} is not the owner of room {room_id}")]
    NotRoomOwner { room_id: i64, user_id: i64 },

    #[error("user {user_id} is not a member of room {room_id}")]
    NotInRoom { room_id: i64, user_id: i64 },

    #[error("room {0} is no longer waiting")]
    RoomNotWaiting(i64),

    #[error("could not generate an unused session token")]
    TokenGenerationFailed,

    #[error("invalid difficulty code: {0}\n  hint: valid codes are: 1 (normal), 2 (hard)")]
    InvalidDifficulty(i32),

    #[error("invalid room status code: {0}\n  hint: valid codes are: 1 (waiting), 2 (live_start), 3 (dissolution)")]
    InvalidRoomStatus(i32),

    #[error("duplicate key: {0}")]
    DuplicateKey(String),

    #[error("not-null constraint violated: {0}")]
    NotNullViolation(String),

    #[error("foreign key constraint violated: {0}")]
    ForeignKeyViolation(String),

    #[error("corrupted data: {0}")]
    CorruptedData(String),

    #[error("database error: {0}")]
    Database(#[source] rusqlite::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Classify driver errors so constraint failures surface as their own kinds.
///
/// SQLite reports every constraint breach as a single `SqliteFailure` code;
/// the extended code distinguishes unique/primary-key conflicts from NOT NULL
/// and foreign key breaches. Anything else stays a [`Error::Database`].
impl From<rusqlite::Error> for Error {
    fn from(e: rusqlite::Error) -> Self {
        if let rusqlite::Error::SqliteFailure(err, ref message) = e {
            let detail = || message.clone().unwrap_or_else(|| err.to_string());
            match err.extended_code {
                rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
                | rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY
                | rusqlite::ffi::SQLITE_CONSTRAINT_ROWID => {
                    return Error::DuplicateKey(detail());
                }
                rusqlite::ffi::SQLITE_CONSTRAINT_NOTNULL => {
                    return Error::NotNullViolation(detail());
                }
                rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY => {
                    return Error::ForeignKeyViolation(detail());
                }
                _ => {}
            }
        }
        Error::Database(e)
    }
}

/// A specialized Result type for gr-core operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
