// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! gr-core: storage layer for the greenroom multiplayer live service
//!
//! This crate provides the account and room data structures, the SQLite
//! store behind them, and the room lifecycle flows (create, join, start,
//! submit results, dissolve).

pub mod config;
pub mod db;
pub mod error;
pub mod room;
pub mod token;
pub mod user;

pub use db::Store;
pub use error::{Error, Result};
pub use room::{
    JoinOutcome, LiveDifficulty, MemberResult, Room, RoomMember, RoomStatus, RoomSummary,
    WaitingMember, LIVE_ID_ANY, MAX_ROOM_MEMBERS,
};
pub use user::{User, UserProfile};
