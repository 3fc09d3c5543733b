// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! End-to-end specs for a multiplayer session: create, join, start,
//! submit results, read the scoreboard, dissolve.

#![allow(clippy::panic)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use gr_core::{Error, JoinOutcome, LiveDifficulty, RoomStatus, Store, LIVE_ID_ANY};

fn register(store: &Store, name: &str) -> (i64, String) {
    let token = store.create_user(name, 1000).unwrap();
    let id = store.get_user_by_token(&token).unwrap().id;
    (id, token)
}

#[test]
fn full_multiplayer_session() {
    let mut store = Store::open_in_memory().unwrap();
    let (owner_id, owner_token) = register(&store, "owner");
    let (guest_id, guest_token) = register(&store, "guest");

    // Owner opens a room; guest discovers it in the listing and joins
    let room_id = store
        .create_room(&owner_token, 1000, LiveDifficulty::Hard)
        .unwrap();
    let listed = store.list_rooms(LIVE_ID_ANY).unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].room_id, room_id);

    let outcome = store
        .join_room(&guest_token, room_id, LiveDifficulty::Normal)
        .unwrap();
    assert_eq!(outcome, JoinOutcome::Joined);

    // Both see the same waiting room with two members
    let (status, members) = store.poll_room(&owner_token, room_id).unwrap();
    assert_eq!(status, RoomStatus::Waiting);
    assert_eq!(members.len(), 2);

    // Owner starts the live; the guest's next poll sees it
    store.start_room(&owner_token, room_id).unwrap();
    let (status, _) = store.poll_room(&guest_token, room_id).unwrap();
    assert_eq!(status, RoomStatus::LiveStart);

    // Results trickle in; the scoreboard stays hidden until both are in
    store
        .submit_result(&owner_token, room_id, &[95, 4, 1, 0, 0], 987_650)
        .unwrap();
    assert!(store.room_results(room_id).unwrap().is_empty());

    store
        .submit_result(&guest_token, room_id, &[80, 12, 5, 2, 1], 765_430)
        .unwrap();
    let results = store.room_results(room_id).unwrap();
    assert_eq!(results.len(), 2);

    let owner_result = results.iter().find(|r| r.user_id == owner_id).unwrap();
    assert_eq!(owner_result.score, 987_650);
    assert_eq!(owner_result.judge_count_list, vec![95, 4, 1, 0, 0]);
    let guest_result = results.iter().find(|r| r.user_id == guest_id).unwrap();
    assert_eq!(guest_result.score, 765_430);

    // Guest leaves first, then the owner; the room dissolves and disappears
    store.leave_room(&guest_token, room_id).unwrap();
    store.leave_room(&owner_token, room_id).unwrap();

    let room = store.get_room(room_id).unwrap();
    assert_eq!(room.status, RoomStatus::Dissolution);
    assert!(store.list_rooms(LIVE_ID_ANY).unwrap().is_empty());
}

#[test]
fn scoreboard_waits_for_every_member() {
    let mut store = Store::open_in_memory().unwrap();
    let (_, owner_token) = register(&store, "owner");
    let (_, second_token) = register(&store, "second");
    let (_, silent_token) = register(&store, "silent");

    let room_id = store
        .create_room(&owner_token, 1000, LiveDifficulty::Normal)
        .unwrap();
    store
        .join_room(&second_token, room_id, LiveDifficulty::Normal)
        .unwrap();
    store
        .join_room(&silent_token, room_id, LiveDifficulty::Normal)
        .unwrap();
    store.start_room(&owner_token, room_id).unwrap();

    store
        .submit_result(&owner_token, room_id, &[10, 0, 0], 1000)
        .unwrap();
    store
        .submit_result(&second_token, room_id, &[9, 1, 0], 900)
        .unwrap();

    // One member never submitted, so nobody gets a scoreboard
    assert!(store.room_results(room_id).unwrap().is_empty());
}

#[test]
fn owner_departure_dissolves_but_preserves_rows() {
    let store = Store::open_in_memory().unwrap();
    let (_, owner_token) = register(&store, "owner");
    let (guest_id, guest_token) = register(&store, "guest");

    let room_id = store
        .create_room(&owner_token, 1000, LiveDifficulty::Normal)
        .unwrap();
    store
        .join_room(&guest_token, room_id, LiveDifficulty::Normal)
        .unwrap();

    store.leave_room(&owner_token, room_id).unwrap();

    // The room row survives with its terminal status; the guest is still seated
    let room = store.get_room(room_id).unwrap();
    assert_eq!(room.status, RoomStatus::Dissolution);

    let (status, members) = store.poll_room(&guest_token, room_id).unwrap();
    assert_eq!(status, RoomStatus::Dissolution);
    assert_eq!(members.len(), 1);
    assert_eq!(members[0].user_id, guest_id);

    // And nobody new can take the owner's seat
    let (_, late_token) = register(&store, "late");
    let outcome = store
        .join_room(&late_token, room_id, LiveDifficulty::Normal)
        .unwrap();
    assert_eq!(outcome, JoinOutcome::Disbanded);
}

#[test]
fn leaver_cannot_submit_results() {
    let mut store = Store::open_in_memory().unwrap();
    let (_, owner_token) = register(&store, "owner");
    let (_, guest_token) = register(&store, "guest");

    let room_id = store
        .create_room(&owner_token, 1000, LiveDifficulty::Normal)
        .unwrap();
    store
        .join_room(&guest_token, room_id, LiveDifficulty::Normal)
        .unwrap();
    store.leave_room(&guest_token, room_id).unwrap();

    let result = store.submit_result(&guest_token, room_id, &[1, 2, 3], 100);
    assert!(matches!(result, Err(Error::NotInRoom { .. })));
}

#[test]
fn resubmitting_overwrites_the_previous_result() {
    let mut store = Store::open_in_memory().unwrap();
    let (owner_id, owner_token) = register(&store, "owner");
    let room_id = store
        .create_room(&owner_token, 1000, LiveDifficulty::Normal)
        .unwrap();
    store.start_room(&owner_token, room_id).unwrap();

    store
        .submit_result(&owner_token, room_id, &[5, 5, 5], 500)
        .unwrap();
    store
        .submit_result(&owner_token, room_id, &[9, 1, 0], 900)
        .unwrap();

    let member = store.get_room_member(room_id, owner_id).unwrap();
    assert_eq!(member.score, Some(900));
    assert_eq!(member.judge_count_list, Some(vec![9, 1, 0]));
}

#[test]
fn results_follow_membership_across_dissolution() {
    let mut store = Store::open_in_memory().unwrap();
    let (_, owner_token) = register(&store, "owner");
    let (guest_id, guest_token) = register(&store, "guest");
    let room_id = store
        .create_room(&owner_token, 1000, LiveDifficulty::Normal)
        .unwrap();
    store
        .join_room(&guest_token, room_id, LiveDifficulty::Normal)
        .unwrap();
    store.start_room(&owner_token, room_id).unwrap();
    store
        .submit_result(&owner_token, room_id, &[10, 0, 0], 1000)
        .unwrap();
    store
        .submit_result(&guest_token, room_id, &[8, 2, 0], 800)
        .unwrap();

    // The owner departs; the dissolved room still reports the seated guest
    store.leave_room(&owner_token, room_id).unwrap();
    assert_eq!(store.get_room(room_id).unwrap().status, RoomStatus::Dissolution);
    let results = store.room_results(room_id).unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].user_id, guest_id);
    assert_eq!(results[0].score, 800);

    // Once the last member leaves there is nothing left to report
    store.leave_room(&guest_token, room_id).unwrap();
    assert!(store.room_results(room_id).unwrap().is_empty());
}
