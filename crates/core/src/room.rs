// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Room types for the greenroom store.
//!
//! Rooms move through a small lifecycle: they are created waiting, the owner
//! starts the live, and the room is dissolved when the owner leaves or the
//! last member walks out. Status and difficulty are stored as integer codes;
//! the enums here own the mapping.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Error, Result};

/// Maximum number of members a room can hold, owner included.
pub const MAX_ROOM_MEMBERS: i64 = 4;

/// Wildcard `live_id` accepted by room listing: match every track.
pub const LIVE_ID_ANY: i32 = 0;

/// Difficulty a member selected when entering a room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LiveDifficulty {
    /// Standard chart.
    Normal,
    /// Harder chart of the same track.
    Hard,
}

impl LiveDifficulty {
    /// Returns the integer code used in storage.
    pub fn code(&self) -> i32 {
        match self {
            LiveDifficulty::Normal => 1,
            LiveDifficulty::Hard => 2,
        }
    }

    /// Decodes a stored integer code.
    pub fn from_code(code: i32) -> Result<Self> {
        match code {
            1 => Ok(LiveDifficulty::Normal),
            2 => Ok(LiveDifficulty::Hard),
            _ => Err(Error::InvalidDifficulty(code)),
        }
    }

    /// Returns the string representation used in display.
    pub fn as_str(&self) -> &'static str {
        match self {
            LiveDifficulty::Normal => "normal",
            LiveDifficulty::Hard => "hard",
        }
    }
}

impl fmt::Display for LiveDifficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Lifecycle state of a room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoomStatus {
    /// Gathering members. Initial state for new rooms; the only state that
    /// accepts joins or a start.
    Waiting,
    /// The owner started the live; members are playing.
    LiveStart,
    /// The room was dissolved. Terminal state.
    Dissolution,
}

impl RoomStatus {
    /// Returns the integer code used in storage.
    pub fn code(&self) -> i32 {
        match self {
            RoomStatus::Waiting => 1,
            RoomStatus::LiveStart => 2,
            RoomStatus::Dissolution => 3,
        }
    }

    /// Decodes a stored integer code.
    pub fn from_code(code: i32) -> Result<Self> {
        match code {
            1 => Ok(RoomStatus::Waiting),
            2 => Ok(RoomStatus::LiveStart),
            3 => Ok(RoomStatus::Dissolution),
            _ => Err(Error::InvalidRoomStatus(code)),
        }
    }

    /// Returns the string representation used in display.
    pub fn as_str(&self) -> &'static str {
        match self {
            RoomStatus::Waiting => "waiting",
            RoomStatus::LiveStart => "live_start",
            RoomStatus::Dissolution => "dissolution",
        }
    }
}

impl fmt::Display for RoomStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Outcome of a join attempt. Only [`JoinOutcome::Joined`] means a row was
/// written; the rest report why the room rejected the member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JoinOutcome {
    /// The member was added to the room.
    Joined,
    /// The room already holds [`MAX_ROOM_MEMBERS`] members.
    RoomFull,
    /// The room is no longer waiting for members.
    Disbanded,
    /// The room does not exist, or the member is already in it.
    OtherError,
}

impl JoinOutcome {
    /// Returns the string representation used in display.
    pub fn as_str(&self) -> &'static str {
        match self {
            JoinOutcome::Joined => "joined",
            JoinOutcome::RoomFull => "room_full",
            JoinOutcome::Disbanded => "disbanded",
            JoinOutcome::OtherError => "other_error",
        }
    }
}

impl fmt::Display for JoinOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A room row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    /// Database-assigned identifier.
    pub id: i64,
    /// Track being played.
    pub live_id: i32,
    /// User id of the room owner.
    pub owner: i64,
    /// Current lifecycle state.
    pub status: RoomStatus,
}

/// A membership row: one user inside one room, with their result columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomMember {
    /// Room this membership belongs to.
    pub room_id: i64,
    /// The member's user id.
    pub user_id: i64,
    /// Final score. NULL until the member submits a result.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<i32>,
    /// Difficulty the member selected on entry.
    pub select_difficulty: LiveDifficulty,
    /// Per-judgement hit counts. NULL until the member submits a result.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub judge_count_list: Option<Vec<i32>>,
}

/// A waiting room as shown in listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomSummary {
    /// Database-assigned identifier.
    pub room_id: i64,
    /// Track being played.
    pub live_id: i32,
    /// Members currently in the room.
    pub joined_user_count: i64,
    /// Room capacity.
    pub max_user_count: i64,
}

/// A member as seen while waiting in a room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaitingMember {
    /// The member's user id.
    pub user_id: i64,
    /// The member's display name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// The member's avatar card.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub leader_card_id: Option<i32>,
    /// Difficulty the member selected on entry.
    pub select_difficulty: LiveDifficulty,
    /// True when this row describes the polling user.
    pub is_me: bool,
    /// True when this row describes the room owner.
    pub is_host: bool,
}

/// One member's submitted result, reported once every member has one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberResult {
    /// The member's user id.
    pub user_id: i64,
    /// Per-judgement hit counts, in chart order.
    pub judge_count_list: Vec<i32>,
    /// Final score.
    pub score: i32,
}

#[cfg(test)]
#[path = "room_tests.rs"]
mod tests;
