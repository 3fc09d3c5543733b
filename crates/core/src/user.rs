// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Account types for the greenroom store.
//!
//! A [`User`] mirrors a row of the `user` table, session token included.
//! [`UserProfile`] is the token-free view handed back to callers that only
//! authenticated with a token and must not see other credentials.

use serde::{Deserialize, Serialize};

/// A full account row, including the session token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Database-assigned identifier.
    pub id: i64,
    /// Display name. Nullable in storage.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Session token issued at registration. Unique when present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    /// Avatar card shown next to the name. Nullable in storage.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub leader_card_id: Option<i32>,
}

impl User {
    /// Returns the token-free view of this account.
    pub fn profile(&self) -> UserProfile {
        UserProfile {
            id: self.id,
            name: self.name.clone(),
            leader_card_id: self.leader_card_id,
        }
    }
}

/// An account as seen by other players: everything except the token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Database-assigned identifier.
    pub id: i64,
    /// Display name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Avatar card shown next to the name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub leader_card_id: Option<i32>,
}

#[cfg(test)]
#[path = "user_tests.rs"]
mod tests;
