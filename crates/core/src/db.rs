// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! SQLite-backed store for accounts and multiplayer rooms.
//!
//! The [`Store`] struct provides all data access operations for users,
//! rooms, and room membership, and owns the room lifecycle flows
//! (create, join, start, submit, dissolve).

use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

use crate::config;
use crate::error::{Error, Result};
use crate::room::{
    JoinOutcome, LiveDifficulty, MemberResult, Room, RoomMember, RoomStatus, RoomSummary,
    WaitingMember, LIVE_ID_ANY, MAX_ROOM_MEMBERS,
};
use crate::token;
use crate::user::{User, UserProfile};

/// SQL schema for the room store.
pub const SCHEMA: &str = r#"
-- Registered accounts; token is the session credential issued at creation
CREATE TABLE IF NOT EXISTS user (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT,
    token TEXT UNIQUE,
    leader_card_id INTEGER
);

-- Multiplayer rooms; status holds a RoomStatus code
CREATE TABLE IF NOT EXISTS room (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    live_id INTEGER NOT NULL,
    owner INTEGER NOT NULL,
    status INTEGER NOT NULL,
    FOREIGN KEY (owner) REFERENCES user(id)
);

-- Membership and per-member results, one row per (room, user)
CREATE TABLE IF NOT EXISTS room_user (
    room_id INTEGER NOT NULL,
    user_id INTEGER NOT NULL,
    score INTEGER,                       -- NULL until a result is submitted
    select_difficulty INTEGER NOT NULL,  -- LiveDifficulty code
    judge_count_list TEXT,               -- JSON array of judge counts
    PRIMARY KEY (room_id, user_id),
    FOREIGN KEY (room_id) REFERENCES room(id),
    FOREIGN KEY (user_id) REFERENCES user(id)
);

-- Indexes
CREATE INDEX IF NOT EXISTS idx_room_status ON room(status);
CREATE INDEX IF NOT EXISTS idx_room_live ON room(live_id);
CREATE INDEX IF NOT EXISTS idx_room_user_user ON room_user(user_id);
"#;

/// Decode a stored difficulty code, returning a rusqlite error on failure.
fn difficulty_from_db(code: i32) -> std::result::Result<LiveDifficulty, rusqlite::Error> {
    LiveDifficulty::from_code(code).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Integer, Box::new(e))
    })
}

/// Decode a stored room status code, returning a rusqlite error on failure.
fn status_from_db(code: i32) -> std::result::Result<RoomStatus, rusqlite::Error> {
    RoomStatus::from_code(code).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Integer, Box::new(e))
    })
}

/// Map a listing row to a summary.
fn summary_from_row(row: &rusqlite::Row<'_>) -> std::result::Result<RoomSummary, rusqlite::Error> {
    Ok(RoomSummary {
        room_id: row.get(0)?,
        live_id: row.get(1)?,
        joined_user_count: row.get(2)?,
        max_user_count: MAX_ROOM_MEMBERS,
    })
}

/// Create all tables and indexes on a connection if they do not exist.
///
/// This is the single schema path for every way a store can be opened.
pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(SCHEMA)?;
    Ok(())
}

/// SQLite connection with account and room operations.
pub struct Store {
    /// The underlying SQLite connection.
    pub conn: Connection,
}

impl Store {
    /// Open a store at the given path, creating the file and schema if needed.
    pub fn open(path: &Path) -> Result<Self> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            if !parent.exists() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(path)?;

        // Enable foreign keys and WAL mode for concurrency
        conn.execute_batch(
            "PRAGMA foreign_keys = ON;
             PRAGMA journal_mode = WAL;
             PRAGMA busy_timeout = 5000;",
        )?;

        let store = Store { conn };
        init_schema(&store.conn)?;
        Ok(store)
    }

    /// Open an in-memory store (for testing).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        let store = Store { conn };
        init_schema(&store.conn)?;
        Ok(store)
    }

    /// Open the store at its default user-level location.
    pub fn open_default() -> Result<Self> {
        Self::open(&config::default_db_path())
    }

    /// Create a new account and return its session token.
    ///
    /// Tokens are random, and the `token` column is UNIQUE. On the remote
    /// chance a generated token is already taken the insert is retried with
    /// a fresh one, a bounded number of times.
    pub fn create_user(&self, name: &str, leader_card_id: i32) -> Result<String> {
        self.create_user_with_source(name, leader_card_id, token::new_token)
    }

    /// Insert an account, drawing candidate tokens from `next_token`.
    fn create_user_with_source(
        &self,
        name: &str,
        leader_card_id: i32,
        mut next_token: impl FnMut() -> String,
    ) -> Result<String> {
        for _ in 0..token::MAX_TOKEN_ATTEMPTS {
            let candidate = next_token();
            let inserted = self.conn.execute(
                "INSERT INTO user (name, token, leader_card_id) VALUES (?1, ?2, ?3)",
                params![name, candidate, leader_card_id],
            );
            match inserted {
                Ok(_) => return Ok(candidate),
                Err(e) => match Error::from(e) {
                    Error::DuplicateKey(_) => {
                        tracing::warn!("session token collided, retrying");
                    }
                    other => return Err(other),
                },
            }
        }
        Err(Error::TokenGenerationFailed)
    }

    /// Get a full account row by id.
    pub fn get_user(&self, id: i64) -> Result<User> {
        let user = self
            .conn
            .query_row(
                "SELECT id, name, token, leader_card_id FROM user WHERE id = ?1",
                params![id],
                |row| {
                    Ok(User {
                        id: row.get(0)?,
                        name: row.get(1)?,
                        token: row.get(2)?,
                        leader_card_id: row.get(3)?,
                    })
                },
            )
            .optional()?;

        user.ok_or(Error::UserNotFound(id))
    }

    /// Look up the account a session token belongs to.
    pub fn get_user_by_token(&self, token: &str) -> Result<UserProfile> {
        let user = self
            .conn
            .query_row(
                "SELECT id, name, leader_card_id FROM user WHERE token = ?1",
                params![token],
                |row| {
                    Ok(UserProfile {
                        id: row.get(0)?,
                        name: row.get(1)?,
                        leader_card_id: row.get(2)?,
                    })
                },
            )
            .optional()?;

        user.ok_or(Error::InvalidToken)
    }

    /// Update the name and leader card of the account behind a token.
    pub fn update_user(&mut self, token: &str, name: &str, leader_card_id: i32) -> Result<()> {
        let affected = self.conn.execute(
            "UPDATE user SET name = ?1, leader_card_id = ?2 WHERE token = ?3",
            params![name, leader_card_id, token],
        )?;

        if affected == 0 {
            return Err(Error::InvalidToken);
        }
        Ok(())
    }

    /// Create a waiting room and seat its owner, returning the room id.
    pub fn create_room(
        &self,
        token: &str,
        live_id: i32,
        difficulty: LiveDifficulty,
    ) -> Result<i64> {
        let owner = self.get_user_by_token(token)?;
        let tx = self.conn.unchecked_transaction()?;

        tx.execute(
            "INSERT INTO room (live_id, owner, status) VALUES (?1, ?2, ?3)",
            params![live_id, owner.id, RoomStatus::Waiting.code()],
        )?;
        let room_id = tx.last_insert_rowid();

        tx.execute(
            "INSERT INTO room_user (room_id, user_id, select_difficulty) VALUES (?1, ?2, ?3)",
            params![room_id, owner.id, difficulty.code()],
        )?;

        tx.commit()?;
        tracing::debug!("room {} created for live {}", room_id, live_id);
        Ok(room_id)
    }

    /// Get a room row by id.
    pub fn get_room(&self, id: i64) -> Result<Room> {
        let room = self
            .conn
            .query_row(
                "SELECT id, live_id, owner, status FROM room WHERE id = ?1",
                params![id],
                |row| {
                    let status_code: i32 = row.get(3)?;
                    Ok(Room {
                        id: row.get(0)?,
                        live_id: row.get(1)?,
                        owner: row.get(2)?,
                        status: status_from_db(status_code)?,
                    })
                },
            )
            .optional()?;

        room.ok_or(Error::RoomNotFound(id))
    }

    /// List waiting rooms with their member counts.
    ///
    /// [`LIVE_ID_ANY`] matches every track; any other value restricts the
    /// listing to rooms playing that track.
    pub fn list_rooms(&self, live_id: i32) -> Result<Vec<RoomSummary>> {
        let waiting = RoomStatus::Waiting.code();

        if live_id == LIVE_ID_ANY {
            let mut stmt = self.conn.prepare(
                "SELECT r.id, r.live_id, COUNT(*) FROM room r
                 JOIN room_user ru ON r.id = ru.room_id
                 WHERE r.status = ?1
                 GROUP BY r.id
                 ORDER BY r.id",
            )?;
            let rooms = stmt
                .query_map(params![waiting], summary_from_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rooms)
        } else {
            let mut stmt = self.conn.prepare(
                "SELECT r.id, r.live_id, COUNT(*) FROM room r
                 JOIN room_user ru ON r.id = ru.room_id
                 WHERE r.status = ?1 AND r.live_id = ?2
                 GROUP BY r.id
                 ORDER BY r.id",
            )?;
            let rooms = stmt
                .query_map(params![waiting, live_id], summary_from_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rooms)
        }
    }

    /// Try to seat the token's account in a room.
    ///
    /// Rejections are reported through [`JoinOutcome`], not errors: a full
    /// room, a room that stopped waiting, a missing room, and a repeated
    /// join all leave the store unchanged.
    pub fn join_room(
        &self,
        token: &str,
        room_id: i64,
        difficulty: LiveDifficulty,
    ) -> Result<JoinOutcome> {
        let user = self.get_user_by_token(token)?;
        let tx = self.conn.unchecked_transaction()?;

        let room = tx
            .query_row(
                "SELECT status, (SELECT COUNT(*) FROM room_user WHERE room_id = room.id)
                 FROM room WHERE id = ?1",
                params![room_id],
                |row| Ok((row.get::<_, i32>(0)?, row.get::<_, i64>(1)?)),
            )
            .optional()?;

        let Some((status_code, member_count)) = room else {
            return Ok(JoinOutcome::OtherError);
        };
        if member_count >= MAX_ROOM_MEMBERS {
            return Ok(JoinOutcome::RoomFull);
        }
        if RoomStatus::from_code(status_code)? != RoomStatus::Waiting {
            return Ok(JoinOutcome::Disbanded);
        }

        let inserted = tx.execute(
            "INSERT INTO room_user (room_id, user_id, select_difficulty) VALUES (?1, ?2, ?3)",
            params![room_id, user.id, difficulty.code()],
        );
        match inserted {
            Ok(_) => {
                tx.commit()?;
                Ok(JoinOutcome::Joined)
            }
            // Second join by the same user hits the composite primary key
            Err(e) => match Error::from(e) {
                Error::DuplicateKey(_) => Ok(JoinOutcome::OtherError),
                other => Err(other),
            },
        }
    }

    /// Report a room's status and its current members.
    ///
    /// `is_me` marks the polling account's own row, `is_host` the owner's.
    pub fn poll_room(&self, token: &str, room_id: i64) -> Result<(RoomStatus, Vec<WaitingMember>)> {
        let me = self.get_user_by_token(token)?;
        let room = self.get_room(room_id)?;

        let mut stmt = self.conn.prepare(
            "SELECT u.id, u.name, u.leader_card_id, ru.select_difficulty
             FROM room_user ru
             JOIN user u ON ru.user_id = u.id
             WHERE ru.room_id = ?1
             ORDER BY ru.user_id",
        )?;

        let members = stmt
            .query_map(params![room_id], |row| {
                let user_id: i64 = row.get(0)?;
                let difficulty_code: i32 = row.get(3)?;
                Ok(WaitingMember {
                    user_id,
                    name: row.get(1)?,
                    leader_card_id: row.get(2)?,
                    select_difficulty: difficulty_from_db(difficulty_code)?,
                    is_me: user_id == me.id,
                    is_host: user_id == room.owner,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok((room.status, members))
    }

    /// Start the live in a room. Only the owner may start it, and only
    /// while the room is still waiting.
    pub fn start_room(&mut self, token: &str, room_id: i64) -> Result<()> {
        let user = self.get_user_by_token(token)?;
        let room = self.get_room(room_id)?;

        if room.owner != user.id {
            return Err(Error::NotRoomOwner {
                room_id,
                user_id: user.id,
            });
        }
        if room.status != RoomStatus::Waiting {
            return Err(Error::RoomNotWaiting(room_id));
        }

        self.conn.execute(
            "UPDATE room SET status = ?1 WHERE id = ?2",
            params![RoomStatus::LiveStart.code(), room_id],
        )?;
        tracing::info!("room {} live started", room_id);
        Ok(())
    }

    /// Record the token's account result for a room it is a member of.
    pub fn submit_result(
        &mut self,
        token: &str,
        room_id: i64,
        judge_count_list: &[i32],
        score: i32,
    ) -> Result<()> {
        let user = self.get_user_by_token(token)?;
        let judges = serde_json::to_string(judge_count_list)?;

        let affected = self.conn.execute(
            "UPDATE room_user SET score = ?1, judge_count_list = ?2
             WHERE room_id = ?3 AND user_id = ?4",
            params![score, judges, room_id, user.id],
        )?;

        if affected == 0 {
            return Err(Error::NotInRoom {
                room_id,
                user_id: user.id,
            });
        }
        Ok(())
    }

    /// Collect every member's result for a room.
    ///
    /// Returns an empty list until all members have submitted, so callers
    /// can poll without seeing a partial scoreboard.
    pub fn room_results(&self, room_id: i64) -> Result<Vec<MemberResult>> {
        let mut stmt = self.conn.prepare(
            "SELECT user_id, score, judge_count_list
             FROM room_user WHERE room_id = ?1 ORDER BY user_id",
        )?;

        let rows = stmt
            .query_map(params![room_id], |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, Option<i32>>(1)?,
                    row.get::<_, Option<String>>(2)?,
                ))
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let mut results = Vec::with_capacity(rows.len());
        for (user_id, score, raw_judges) in rows {
            let (Some(score), Some(raw_judges)) = (score, raw_judges) else {
                return Ok(Vec::new());
            };
            let judge_count_list = serde_json::from_str(&raw_judges).map_err(|_| {
                Error::CorruptedData(format!("invalid judge_count_list for user {user_id}"))
            })?;
            results.push(MemberResult {
                user_id,
                judge_count_list,
                score,
            });
        }
        Ok(results)
    }

    /// Remove the token's account from a room.
    ///
    /// The room is dissolved when the owner leaves or the last member is
    /// gone. Dissolved rooms keep their rows; only the status changes.
    pub fn leave_room(&self, token: &str, room_id: i64) -> Result<()> {
        let user = self.get_user_by_token(token)?;
        let tx = self.conn.unchecked_transaction()?;

        let removed = tx.execute(
            "DELETE FROM room_user WHERE room_id = ?1 AND user_id = ?2",
            params![room_id, user.id],
        )?;
        if removed == 0 {
            return Err(Error::NotInRoom {
                room_id,
                user_id: user.id,
            });
        }

        let owner: i64 = tx.query_row(
            "SELECT owner FROM room WHERE id = ?1",
            params![room_id],
            |row| row.get(0),
        )?;
        let remaining: i64 = tx.query_row(
            "SELECT COUNT(*) FROM room_user WHERE room_id = ?1",
            params![room_id],
            |row| row.get(0),
        )?;

        if owner == user.id || remaining == 0 {
            tx.execute(
                "UPDATE room SET status = ?1 WHERE id = ?2",
                params![RoomStatus::Dissolution.code(), room_id],
            )?;
            tracing::info!("room {} dissolved", room_id);
        }

        tx.commit()?;
        Ok(())
    }

    /// Get a membership row by its composite key.
    pub fn get_room_member(&self, room_id: i64, user_id: i64) -> Result<RoomMember> {
        let row = self
            .conn
            .query_row(
                "SELECT score, select_difficulty, judge_count_list
                 FROM room_user WHERE room_id = ?1 AND user_id = ?2",
                params![room_id, user_id],
                |row| {
                    let difficulty_code: i32 = row.get(1)?;
                    Ok((
                        row.get::<_, Option<i32>>(0)?,
                        difficulty_from_db(difficulty_code)?,
                        row.get::<_, Option<String>>(2)?,
                    ))
                },
            )
            .optional()?;

        let Some((score, select_difficulty, raw_judges)) = row else {
            return Err(Error::NotInRoom { room_id, user_id });
        };

        let judge_count_list = raw_judges
            .map(|raw| {
                serde_json::from_str(&raw).map_err(|_| {
                    Error::CorruptedData(format!(
                        "invalid judge_count_list for user {user_id} in room {room_id}"
                    ))
                })
            })
            .transpose()?;

        Ok(RoomMember {
            room_id,
            user_id,
            score,
            select_difficulty,
            judge_count_list,
        })
    }
}

#[cfg(test)]
#[path = "db_tests.rs"]
mod tests;
