// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Session token generation.
//!
//! Tokens are random UUIDs stored as hyphenated text in the `user.token`
//! column. The column is UNIQUE, so account creation retries a bounded
//! number of times if a freshly generated token collides.

use uuid::Uuid;

/// How many times account creation retries on a token collision before
/// giving up with [`crate::Error::TokenGenerationFailed`].
pub const MAX_TOKEN_ATTEMPTS: u32 = 3;

/// Generate a new random session token.
pub fn new_token() -> String {
    Uuid::new_v4().to_string()
}

#[cfg(test)]
#[path = "token_tests.rs"]
mod tests;
